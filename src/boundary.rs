//! Decision surface evaluation over a regular 2-D grid
//!
//! The classifier is queried at every grid point inside the two feature
//! ranges. The resulting class codes are what the plotting code shades.

use crate::core::{Classifier, RangeMap, Result, SweepError};
use serde::{Deserialize, Serialize};

/// Default grid resolution in feature units
pub const DEFAULT_PLOT_STEP: f64 = 0.02;

/// How predicted classes are turned into surface codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelEncoding {
    /// Code is the class index from the dataset's fixed class list, so the
    /// same class gets the same colour in every panel
    #[default]
    Fixed,
    /// Codes are assigned by sorted name of the classes present in this
    /// surface's predictions only; a surface with a single predicted class
    /// always gets code 0
    PerCall,
}

/// Class codes of a classifier evaluated on a grid
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionSurface {
    x_feature: String,
    y_feature: String,
    xs: Vec<f64>,
    ys: Vec<f64>,
    step: f64,
    /// Row-major: `codes[row * xs.len() + col]` is the code at `(xs[col], ys[row])`
    codes: Vec<u8>,
}

impl DecisionSurface {
    pub fn x_feature(&self) -> &str {
        &self.x_feature
    }

    pub fn y_feature(&self) -> &str {
        &self.y_feature
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// `(rows, cols)` of the grid
    pub fn shape(&self) -> (usize, usize) {
        (self.ys.len(), self.xs.len())
    }

    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    pub fn code_at(&self, row: usize, col: usize) -> u8 {
        self.codes[row * self.xs.len() + col]
    }

    /// Sorted distinct codes on the surface
    pub fn distinct_codes(&self) -> Vec<u8> {
        let mut seen = [false; 256];
        for &code in &self.codes {
            seen[code as usize] = true;
        }
        (0..=u8::MAX).filter(|&c| seen[c as usize]).collect()
    }

    /// True when a single code covers the whole grid
    pub fn is_uniform(&self) -> bool {
        self.codes.windows(2).all(|w| w[0] == w[1])
    }

    /// Runs of equal codes along one grid row as `(first_col, last_col, code)`
    pub fn row_runs(&self, row: usize) -> Vec<(usize, usize, u8)> {
        let cols = self.xs.len();
        let codes = &self.codes[row * cols..(row + 1) * cols];
        let mut runs = Vec::new();
        let mut start = 0;
        for col in 1..=cols {
            if col == cols || codes[col] != codes[start] {
                runs.push((start, col - 1, codes[start]));
                start = col;
            }
        }
        runs
    }
}

/// Axis values `start, start + step, ..` strictly below `stop`
pub fn grid_axis(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..n).map(|k| start + k as f64 * step).collect()
}

/// Evaluate `classifier` on the grid spanned by the two entries of `ranges`.
///
/// The first range entry is the x axis, the second the y axis.
pub fn evaluate_decision_surface<C: Classifier + ?Sized>(
    classifier: &C,
    ranges: &RangeMap,
    step: f64,
    encoding: LabelEncoding,
) -> Result<DecisionSurface> {
    let ((x_feature, x_range), (y_feature, y_range)) = ranges.axes()?;
    if classifier.n_features() != 2 {
        return Err(SweepError::DimensionMismatch {
            expected: 2,
            actual: classifier.n_features(),
        });
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(SweepError::InvalidParameter(format!(
            "Grid step must be finite and positive, got {step}"
        )));
    }

    let xs = grid_axis(x_range.min, x_range.max, step);
    let ys = grid_axis(y_range.min, y_range.max, step);
    if xs.is_empty() || ys.is_empty() {
        return Err(SweepError::InvalidParameter(format!(
            "Empty grid for ranges {x_feature} {:?} and {y_feature} {:?}",
            x_range, y_range
        )));
    }

    let mut predicted = Vec::with_capacity(xs.len() * ys.len());
    for &y in &ys {
        for &x in &xs {
            predicted.push(classifier.predict(&[x, y]).class_index);
        }
    }

    let codes = encode(&predicted, encoding)?;
    log::debug!(
        "Evaluated {}x{} decision surface ({:?} encoding)",
        ys.len(),
        xs.len(),
        encoding
    );

    Ok(DecisionSurface {
        x_feature: x_feature.to_string(),
        y_feature: y_feature.to_string(),
        xs,
        ys,
        step,
        codes,
    })
}

/// Class indices follow sorted class names, so sorting present indices sorts
/// present names.
fn encode(predicted: &[usize], encoding: LabelEncoding) -> Result<Vec<u8>> {
    let to_code = |index: usize| {
        u8::try_from(index).map_err(|_| {
            SweepError::InvalidParameter(format!("Class index {index} does not fit a surface code"))
        })
    };
    match encoding {
        LabelEncoding::Fixed => predicted.iter().map(|&i| to_code(i)).collect(),
        LabelEncoding::PerCall => {
            let mut present: Vec<usize> = predicted.to_vec();
            present.sort_unstable();
            present.dedup();
            predicted
                .iter()
                .map(|i| to_code(present.binary_search(i).unwrap_or_default()))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FeatureRange, Prediction};

    /// Class 1 right of a vertical line
    struct Threshold(f64);

    impl Classifier for Threshold {
        fn n_features(&self) -> usize {
            2
        }
        fn predict(&self, row: &[f64]) -> Prediction {
            let class_index = usize::from(row[0] >= self.0);
            Prediction::new(class_index, class_index as f64)
        }
    }

    struct Constant(usize);

    impl Classifier for Constant {
        fn n_features(&self) -> usize {
            2
        }
        fn predict(&self, _row: &[f64]) -> Prediction {
            Prediction::new(self.0, self.0 as f64)
        }
    }

    fn ranges() -> RangeMap {
        let mut ranges = RangeMap::new();
        ranges.insert("length", FeatureRange::new(0.0, 1.0));
        ranges.insert("depth", FeatureRange::new(10.0, 10.5));
        ranges
    }

    #[test]
    fn test_grid_axis_matches_arange() {
        let axis = grid_axis(0.0, 1.0, 0.25);
        assert_eq!(axis, vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(grid_axis(0.0, 1.0, 0.3).len(), 4);
        assert!(grid_axis(1.0, 0.0, 0.1).is_empty());
    }

    #[test]
    fn test_surface_shape_and_codes() {
        let surface =
            evaluate_decision_surface(&Threshold(0.5), &ranges(), 0.1, LabelEncoding::Fixed)
                .unwrap();

        assert_eq!(surface.shape(), (5, 10));
        assert_eq!(surface.x_feature(), "length");
        assert_eq!(surface.y_feature(), "depth");
        assert_eq!(surface.code_at(0, 0), 0);
        assert_eq!(surface.code_at(4, 9), 1);
        assert_eq!(surface.distinct_codes(), vec![0, 1]);
        assert!(!surface.is_uniform());

        let runs = surface.row_runs(2);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].2, 0);
        assert_eq!(runs[1], (runs[0].1 + 1, 9, 1));
    }

    #[test]
    fn test_constant_classifier_gives_uniform_surface() {
        let surface =
            evaluate_decision_surface(&Constant(1), &ranges(), 0.02, LabelEncoding::Fixed)
                .unwrap();
        assert!(surface.is_uniform());
        assert_eq!(surface.distinct_codes(), vec![1]);
        assert_eq!(surface.row_runs(0), vec![(0, surface.xs().len() - 1, 1)]);
    }

    #[test]
    fn test_per_call_encoding_renumbers_present_classes() {
        let per_call =
            evaluate_decision_surface(&Constant(1), &ranges(), 0.1, LabelEncoding::PerCall)
                .unwrap();
        assert_eq!(per_call.distinct_codes(), vec![0]);

        let both =
            evaluate_decision_surface(&Threshold(0.5), &ranges(), 0.1, LabelEncoding::PerCall)
                .unwrap();
        assert_eq!(both.distinct_codes(), vec![0, 1]);
    }

    #[test]
    fn test_requires_exactly_two_ranges() {
        let mut three = ranges();
        three.insert("mass", FeatureRange::new(0.0, 1.0));
        let result =
            evaluate_decision_surface(&Threshold(0.5), &three, 0.1, LabelEncoding::Fixed);
        assert!(matches!(
            result,
            Err(SweepError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_rejects_bad_step() {
        assert!(
            evaluate_decision_surface(&Threshold(0.5), &ranges(), 0.0, LabelEncoding::Fixed)
                .is_err()
        );
        assert!(
            evaluate_decision_surface(&Threshold(0.5), &ranges(), -0.1, LabelEncoding::Fixed)
                .is_err()
        );
    }

    #[test]
    fn test_label_encoding_serde_names() {
        let json = serde_json::to_string(&LabelEncoding::PerCall).unwrap();
        assert_eq!(json, "\"per-call\"");
        let parsed: LabelEncoding = serde_json::from_str("\"fixed\"").unwrap();
        assert_eq!(parsed, LabelEncoding::Fixed);
    }
}
