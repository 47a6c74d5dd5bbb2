//! Synthetic penguin measurements shared by the integration tests

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const N_ADELIE: usize = 60;
pub const N_CHINSTRAP: usize = 30;

/// CSV text in the layout of the penguins classification file: an extra
/// column, a third species that must be filtered out and the classes
/// interleaved rather than grouped.
pub fn penguins_csv() -> String {
    let mut csv = String::from("Culmen Length (mm),Culmen Depth (mm),Body Mass (g),Species\n");
    for i in 0..N_ADELIE {
        let t = i as f64;
        let length = 38.8 + 2.6 * (t * 1.3).sin();
        let depth = 18.3 + 1.2 * (t * 0.7).cos();
        writeln!(csv, "{length:.2},{depth:.2},{},Adelie", 3600 + i).unwrap();
        if i % 2 == 0 {
            let t = (i / 2) as f64;
            let length = 48.8 + 3.2 * (t * 0.9 + 0.4).sin();
            let depth = 18.4 + 1.1 * (t * 1.1).cos();
            writeln!(csv, "{length:.2},{depth:.2},{},Chinstrap", 3700 + i).unwrap();
        }
        if i % 6 == 0 {
            writeln!(csv, "{:.2},{:.2},5000,Gentoo", 47.0 + t * 0.05, 14.5).unwrap();
        }
    }
    csv
}

/// Write the synthetic dataset into `dir` and return its path
pub fn write_penguins(dir: &Path) -> PathBuf {
    let path = dir.join("penguins_classification.csv");
    std::fs::write(&path, penguins_csv()).unwrap();
    path
}
