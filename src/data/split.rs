//! Stratified train/test splitting
//!
//! Partitions borrow the parent dataset and only hold row indices.

use crate::core::{Dataset, Result, Sample, SweepError};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

/// Default share of rows placed in the test partition
pub const DEFAULT_TEST_FRACTION: f64 = 0.25;

/// A borrowed subset of a dataset's rows
pub struct Partition<'a, D: Dataset + ?Sized> {
    parent: &'a D,
    indices: Vec<usize>,
}

impl<'a, D: Dataset + ?Sized> Clone for Partition<'a, D> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent,
            indices: self.indices.clone(),
        }
    }
}

impl<'a, D: Dataset + ?Sized> Partition<'a, D> {
    pub fn new(parent: &'a D, indices: Vec<usize>) -> Self {
        Self { parent, indices }
    }

    /// Row indices into the parent dataset
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn parent(&self) -> &'a D {
        self.parent
    }
}

impl<'a, D: Dataset + ?Sized> Dataset for Partition<'a, D> {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn feature_names(&self) -> &[String] {
        self.parent.feature_names()
    }

    fn sample(&self, i: usize) -> &Sample {
        self.parent.sample(self.indices[i])
    }
}

/// Split a dataset into `(train, test)` partitions preserving class ratios.
///
/// The test partition gets `ceil(test_fraction * n)` rows, spread over the
/// classes with the largest remainder method. Each class is shuffled with a
/// generator seeded from `seed`, so the split is reproducible.
pub fn stratified_split<'a, D: Dataset + ?Sized>(
    dataset: &'a D,
    test_fraction: f64,
    seed: u64,
) -> Result<(Partition<'a, D>, Partition<'a, D>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SweepError::InvalidParameter(format!(
            "Test fraction must be between 0 and 1, got: {test_fraction}"
        )));
    }
    if dataset.is_empty() {
        return Err(SweepError::EmptyDataset);
    }

    let n = dataset.len();
    let n_classes = dataset.labels().iter().max().map_or(0, |&m| m + 1);
    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (i, label) in dataset.labels().into_iter().enumerate() {
        by_class[label].push(i);
    }
    let by_class: Vec<Vec<usize>> = by_class.into_iter().filter(|c| !c.is_empty()).collect();

    if let Some(small) = by_class.iter().find(|c| c.len() < 2) {
        return Err(SweepError::InvalidDataset(format!(
            "Class with index {} has only {} row; stratification needs at least 2",
            dataset.sample(small[0]).label,
            small.len()
        )));
    }

    let n_test = (test_fraction * n as f64).ceil() as usize;
    let n_train = n - n_test;
    if n_test < by_class.len() || n_train < by_class.len() {
        return Err(SweepError::InvalidDataset(format!(
            "Split of {n} rows into {n_train} train / {n_test} test cannot hold all {} classes",
            by_class.len()
        )));
    }

    let counts: Vec<usize> = by_class.iter().map(Vec::len).collect();
    let test_counts = allocate_largest_remainder(&counts, n_test);

    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);
    for (mut rows, k) in by_class.into_iter().zip(test_counts) {
        rows.shuffle(&mut rng);
        test.extend_from_slice(&rows[..k]);
        train.extend_from_slice(&rows[k..]);
    }
    train.sort_unstable();
    test.sort_unstable();

    log::debug!(
        "Stratified split (seed {seed}): {} train / {} test rows",
        train.len(),
        test.len()
    );

    Ok((Partition::new(dataset, train), Partition::new(dataset, test)))
}

/// Distribute `total` over groups proportionally to `counts`, keeping every
/// group strictly inside `[1, count - 1]` when the totals allow it.
fn allocate_largest_remainder(counts: &[usize], total: usize) -> Vec<usize> {
    let n: usize = counts.iter().sum();
    let exact: Vec<f64> = counts
        .iter()
        .map(|&c| c as f64 * total as f64 / n as f64)
        .collect();
    let mut alloc: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();

    let mut order: Vec<usize> = (0..counts.len()).collect();
    // Largest fractional part first, ties go to the earlier class
    order.sort_by(|&a, &b| {
        let fa = exact[a] - exact[a].floor();
        let fb = exact[b] - exact[b].floor();
        fb.total_cmp(&fa).then(a.cmp(&b))
    });
    let mut remaining = total - alloc.iter().sum::<usize>();
    for &i in order.iter().cycle() {
        if remaining == 0 {
            break;
        }
        if alloc[i] < counts[i] {
            alloc[i] += 1;
            remaining -= 1;
        }
    }

    // Both partitions must see every class
    for i in 0..alloc.len() {
        if alloc[i] == 0 {
            if let Some(donor) = (0..alloc.len()).max_by_key(|&j| alloc[j]) {
                alloc[donor] -= 1;
                alloc[i] += 1;
            }
        } else if alloc[i] == counts[i] {
            if let Some(receiver) = (0..alloc.len())
                .filter(|&j| alloc[j] + 1 < counts[j])
                .max_by_key(|&j| counts[j] - alloc[j])
            {
                alloc[i] -= 1;
                alloc[receiver] += 1;
            }
        }
    }

    alloc
}
