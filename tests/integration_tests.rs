//! Integration tests for the regsweep library
//!
//! These tests run the whole workflow on a synthetic penguins file:
//! loading, stratified split, ranges, sweep and report.

mod common;

use approx::assert_abs_diff_eq;
use common::{write_penguins, N_ADELIE, N_CHINSTRAP};
use regsweep::sweep::DEFAULT_CANDIDATES;
use regsweep::persistence::RunSettings;
use regsweep::utils::validation::class_counts;
use regsweep::{
    evaluate_decision_surface, stratified_split, Dataset, LabelEncoding, LoadOptions, Pipeline,
    RangeMap, RegularizationSweep, SolverConfig, SweepOutcome, SweepReport, TabularDataset,
};
use tempfile::TempDir;

const STEP: f64 = 0.1;

fn load() -> (TempDir, TabularDataset) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_penguins(dir.path());
    let dataset =
        TabularDataset::from_path(&path, &LoadOptions::default()).expect("Failed to load dataset");
    (dir, dataset)
}

fn run_sweep(dataset: &TabularDataset, seed: u64) -> SweepOutcome {
    let (train, test) = stratified_split(dataset, 0.25, seed).unwrap();
    let ranges = RangeMap::from_dataset(dataset, 1.0).unwrap();
    RegularizationSweep::new(DEFAULT_CANDIDATES.to_vec(), SolverConfig::default())
        .unwrap()
        .run(&train, &test, &ranges, STEP, LabelEncoding::Fixed)
        .expect("Sweep should succeed")
}

#[test]
fn test_loader_keeps_two_classes_grouped() {
    let (_dir, dataset) = load();

    assert_eq!(dataset.len(), N_ADELIE + N_CHINSTRAP);
    assert_eq!(
        dataset.feature_names(),
        &["Culmen Length (mm)", "Culmen Depth (mm)"]
    );
    assert_eq!(class_counts(&dataset, 2), vec![N_ADELIE, N_CHINSTRAP]);

    // Adelie rows first, then Chinstrap rows
    let labels = dataset.labels();
    assert!(labels[..N_ADELIE].iter().all(|&l| l == 0));
    assert!(labels[N_ADELIE..].iter().all(|&l| l == 1));
}

#[test]
fn test_reversed_class_request_gives_same_model() {
    let dir = TempDir::new().unwrap();
    let path = write_penguins(dir.path());
    let forward = TabularDataset::from_path(&path, &LoadOptions::default()).unwrap();
    let reversed_options = LoadOptions {
        classes: vec!["Chinstrap".to_string(), "Adelie".to_string()],
        ..LoadOptions::default()
    };
    let reversed = TabularDataset::from_path(&path, &reversed_options).unwrap();

    assert_eq!(forward.classes(), reversed.classes());
    // Rows come out Chinstrap first, labelled by sorted name
    assert!(reversed.labels()[..N_CHINSTRAP].iter().all(|&l| l == 1));
    assert_eq!(class_counts(&reversed, 2), vec![N_ADELIE, N_CHINSTRAP]);

    let a = Pipeline::new().fit(&forward).unwrap();
    let b = Pipeline::new().fit(&reversed).unwrap();
    for (wa, wb) in a.coefficients().iter().zip(b.coefficients()) {
        assert_abs_diff_eq!(*wa, *wb, epsilon = 1e-6);
    }
    assert_abs_diff_eq!(a.intercept(), b.intercept(), epsilon = 1e-6);
    // Longer culmens push towards Chinstrap, the positive class
    assert!(a.coefficients()[0] > 0.0);

    let ranges = RangeMap::from_dataset(&forward, 1.0).unwrap();
    let sa = evaluate_decision_surface(&a, &ranges, 0.5, LabelEncoding::PerCall).unwrap();
    let sb = evaluate_decision_surface(&b, &ranges, 0.5, LabelEncoding::PerCall).unwrap();
    assert_eq!(sa.codes(), sb.codes());
    // Shortest culmen column is Adelie territory, code 0 in both
    let (rows, _) = sa.shape();
    assert_eq!(sa.code_at(rows / 2, 0), 0);
    assert_eq!(sb.code_at(rows / 2, 0), 0);
}

#[test]
fn test_split_preserves_proportions_and_covers_dataset() {
    let (_dir, dataset) = load();
    let (train, test) = stratified_split(&dataset, 0.25, 0).unwrap();

    // ceil(0.25 * 90) = 23 test rows
    assert_eq!(test.len(), 23);
    assert_eq!(train.len(), 67);
    assert_eq!(class_counts(&test, 2), vec![15, 8]);
    assert_eq!(class_counts(&train, 2), vec![45, 22]);

    let mut all: Vec<usize> = train
        .indices()
        .iter()
        .chain(test.indices())
        .copied()
        .collect();
    all.sort_unstable();
    assert_eq!(all, (0..dataset.len()).collect::<Vec<_>>());
}

#[test]
fn test_split_depends_on_seed_only() {
    let (_dir, dataset) = load();
    let (_, a) = stratified_split(&dataset, 0.25, 3).unwrap();
    let (_, b) = stratified_split(&dataset, 0.25, 3).unwrap();
    let (_, c) = stratified_split(&dataset, 0.25, 4).unwrap();
    assert_eq!(a.indices(), b.indices());
    assert_ne!(a.indices(), c.indices());
}

#[test]
fn test_ranges_span_full_dataset_with_unit_margin() {
    let (_dir, dataset) = load();
    let ranges = RangeMap::from_dataset(&dataset, 1.0).unwrap();

    assert_eq!(
        ranges.names(),
        vec!["Culmen Length (mm)", "Culmen Depth (mm)"]
    );
    for (j, (_, range)) in ranges.iter().enumerate() {
        let column = dataset.feature_column(j);
        let min = column.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = column.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_abs_diff_eq!(range.min, min - 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(range.max, max + 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_sweep_produces_panel_and_weights_per_candidate() {
    let (_dir, dataset) = load();
    let outcome = run_sweep(&dataset, 0);

    assert_eq!(outcome.len(), 4);
    let shape = outcome.fits()[0].surface.shape();
    for fit in outcome.fits() {
        assert_eq!(fit.weights.weights.len(), 2);
        assert_eq!(fit.surface.shape(), shape);
        assert!((0.0..=1.0).contains(&fit.test_accuracy));
    }

    let table = outcome.weight_table().unwrap();
    assert_eq!(table.shape(), (2, 4));
    assert_eq!(table.columns(), &["C: 0.01", "C: 0.1", "C: 1", "C: 10"]);

    // The weakly regularized model separates the species
    let last = &outcome.fits()[3];
    assert!(last.test_accuracy >= 0.9, "accuracy {}", last.test_accuracy);
    assert!(last.weights.get("Culmen Length (mm)").unwrap() > 0.0);
}

#[test]
fn test_sweep_is_reproducible() {
    let (_dir, dataset) = load();
    let first = run_sweep(&dataset, 0);
    let second = run_sweep(&dataset, 0);

    for (a, b) in first.fits().iter().zip(second.fits()) {
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.model.intercept().to_bits(), b.model.intercept().to_bits());
        assert_eq!(a.surface, b.surface);
    }
}

#[test]
fn test_weight_norm_grows_with_c() {
    let (_dir, dataset) = load();
    let outcome = run_sweep(&dataset, 0);

    let norms: Vec<f64> = outcome.fits().iter().map(|f| f.weights.norm()).collect();
    for pair in norms.windows(2) {
        assert!(pair[0] <= pair[1] + 1e-9, "norms not monotone: {norms:?}");
    }
    assert!(norms[0] < norms[3]);
}

#[test]
fn test_report_from_sweep_round_trips() {
    let (dir, dataset) = load();
    let outcome = run_sweep(&dataset, 0);

    let settings = RunSettings {
        dataset: "penguins_classification.csv".to_string(),
        classes: dataset.classes().names().to_vec(),
        seed: 0,
        test_fraction: 0.25,
        step: STEP,
        encoding: LabelEncoding::Fixed,
        n_train: 67,
        n_test: 23,
    };
    let report = SweepReport::from_outcome(&outcome, settings);
    assert_eq!(report.candidates.len(), 4);

    let path = dir.path().join("report.json");
    report.save_to_file(&path).unwrap();
    let loaded = SweepReport::load_from_file(&path).unwrap();
    assert_eq!(loaded.metadata, report.metadata);

    let expected = outcome.weight_table().unwrap();
    let table = loaded.weight_table().unwrap();
    assert_eq!(table.columns(), expected.columns());
    for j in 0..4 {
        for (a, b) in table.column(j).iter().zip(expected.column(j)) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-12);
        }
    }
}
