//! Damped Newton solver for L2-penalized logistic regression
//!
//! Minimizes
//!
//! ```text
//! f(w, b) = C * sum_i log(1 + exp(-y_i (w . x_i + b))) + 0.5 * |w|^2
//! ```
//!
//! with `y_i` in {-1, +1}. The intercept `b` is not penalized. Each
//! iteration solves the `(d + 1) x (d + 1)` Newton system (the penalized
//! IRLS normal equations) and backtracks until the Armijo condition holds.

use crate::core::{OptimizationResult, Result, Sample, SolverConfig, SweepError};
use faer::linalg::solvers::{Llt, Solve};
use faer::{Mat, Side};
use ndarray::{s, Array1, Array2, Axis};

const ARMIJO: f64 = 1e-4;
const MIN_STEP: f64 = 1e-10;

/// Newton solver for the penalized logistic loss
#[derive(Debug, Clone)]
pub struct NewtonSolver {
    config: SolverConfig,
}

impl NewtonSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Fit weights and intercept to already-preprocessed samples
    pub fn solve(&self, samples: &[Sample]) -> Result<OptimizationResult> {
        self.config.validate()?;
        let problem = Problem::new(samples, self.config.c)?;

        // theta = [w_0, .., w_{d-1}, b]
        let mut theta = Array1::<f64>::zeros(problem.n_params());
        let mut gradient = problem.gradient(&theta);
        let mut gradient_norm = inf_norm(&gradient);

        for iteration in 0..self.config.max_iterations {
            if gradient_norm < self.config.tolerance {
                return Ok(problem.result(&theta, iteration, gradient_norm));
            }

            let hessian = problem.hessian(&theta);
            let direction = newton_direction(&hessian, &gradient)?;

            let step = match problem.line_search(&theta, &gradient, &direction) {
                Some(step) => step,
                // Armijo cannot see progress below rounding; keep the full
                // step only if it still shrinks the gradient
                None => {
                    let candidate = &theta + &direction;
                    if inf_norm(&problem.gradient(&candidate)) < gradient_norm {
                        1.0
                    } else {
                        return Err(SweepError::NotConverged {
                            iterations: iteration,
                            gradient_norm,
                        });
                    }
                }
            };

            theta.scaled_add(step, &direction);
            gradient = problem.gradient(&theta);
            gradient_norm = inf_norm(&gradient);

            log::debug!(
                "newton iter {}: step={:.3e} |g|={:.3e} f={:.6}",
                iteration + 1,
                step,
                gradient_norm,
                problem.objective(&theta)
            );
        }

        if gradient_norm < self.config.tolerance {
            Ok(problem.result(&theta, self.config.max_iterations, gradient_norm))
        } else {
            Err(SweepError::NotConverged {
                iterations: self.config.max_iterations,
                gradient_norm,
            })
        }
    }
}

/// Solve `H d = -g` through an LLᵀ factorization of the penalized Hessian
fn newton_direction(hessian: &Array2<f64>, gradient: &Array1<f64>) -> Result<Array1<f64>> {
    let p = gradient.len();
    if hessian.dim() != (p, p) {
        return Err(SweepError::DimensionMismatch {
            expected: p,
            actual: hessian.nrows(),
        });
    }

    let h = Mat::from_fn(p, p, |i, j| hessian[[i, j]]);
    let llt = Llt::new(h.as_ref(), Side::Lower).map_err(|_| SweepError::SingularSystem)?;
    let rhs = Mat::from_fn(p, 1, |i, _| -gradient[i]);
    let sol = llt.solve(rhs.as_ref());

    let direction = Array1::from_iter((0..p).map(|i| sol[(i, 0)]));
    if direction.iter().all(|d| d.is_finite()) {
        Ok(direction)
    } else {
        Err(SweepError::SingularSystem)
    }
}

/// Training data prepared for the solver
struct Problem {
    /// `n x (d + 1)` design matrix, last column all ones for the intercept
    design: Array2<f64>,
    signs: Array1<f64>,
    dim: usize,
    c: f64,
}

impl Problem {
    fn new(samples: &[Sample], c: f64) -> Result<Self> {
        let first = samples.first().ok_or(SweepError::EmptyDataset)?;
        let dim = first.features.len();

        let mut seen = [false; 2];
        let mut signs = Array1::<f64>::zeros(samples.len());
        let mut design = Array2::<f64>::ones((samples.len(), dim + 1));
        for (i, sample) in samples.iter().enumerate() {
            if sample.features.len() != dim {
                return Err(SweepError::DimensionMismatch {
                    expected: dim,
                    actual: sample.features.len(),
                });
            }
            signs[i] = match sample.label {
                0 => -1.0,
                1 => 1.0,
                other => {
                    return Err(SweepError::InvalidDataset(format!(
                        "Binary logistic regression needs class index 0 or 1, got {other}"
                    )))
                }
            };
            seen[sample.label] = true;
            for (j, &x) in sample.features.iter().enumerate() {
                design[[i, j]] = x;
            }
        }
        if !(seen[0] && seen[1]) {
            return Err(SweepError::InvalidDataset(
                "Training data must contain both classes".to_string(),
            ));
        }

        Ok(Self {
            design,
            signs,
            dim,
            c,
        })
    }

    fn n_params(&self) -> usize {
        self.dim + 1
    }

    fn margins(&self, theta: &Array1<f64>) -> Array1<f64> {
        self.design.dot(theta)
    }

    fn penalty(&self, theta: &Array1<f64>) -> f64 {
        let w = theta.slice(s![..self.dim]);
        0.5 * w.dot(&w)
    }

    fn objective(&self, theta: &Array1<f64>) -> f64 {
        let loss: f64 = self
            .margins(theta)
            .iter()
            .zip(&self.signs)
            .map(|(&z, &y)| softplus(-y * z))
            .sum();
        self.c * loss + self.penalty(theta)
    }

    fn gradient(&self, theta: &Array1<f64>) -> Array1<f64> {
        let mut residual = self.margins(theta);
        residual.zip_mut_with(&self.signs, |z, &y| *z = -y * sigmoid(-y * *z) * self.c);
        let mut gradient = self.design.t().dot(&residual);
        let mut w_part = gradient.slice_mut(s![..self.dim]);
        w_part += &theta.slice(s![..self.dim]);
        gradient
    }

    fn hessian(&self, theta: &Array1<f64>) -> Array2<f64> {
        let weights = self.margins(theta).mapv(|z| {
            let prob = sigmoid(z);
            self.c * prob * (1.0 - prob)
        });
        let weighted = &self.design * &weights.insert_axis(Axis(1));
        let mut hessian = self.design.t().dot(&weighted);
        for j in 0..self.dim {
            hessian[[j, j]] += 1.0;
        }
        hessian
    }

    /// Backtracking step length satisfying the Armijo condition
    fn line_search(
        &self,
        theta: &Array1<f64>,
        gradient: &Array1<f64>,
        direction: &Array1<f64>,
    ) -> Option<f64> {
        let f0 = self.objective(theta);
        let slope = gradient.dot(direction);
        let mut step = 1.0;
        while step >= MIN_STEP {
            let candidate = theta + &(direction * step);
            if self.objective(&candidate) <= f0 + ARMIJO * step * slope {
                return Some(step);
            }
            step *= 0.5;
        }
        None
    }

    fn result(&self, theta: &Array1<f64>, iterations: usize, gradient_norm: f64) -> OptimizationResult {
        OptimizationResult {
            weights: theta.slice(s![..self.dim]).to_vec(),
            intercept: theta[self.dim],
            iterations,
            objective_value: self.objective(theta),
            gradient_norm,
        }
    }
}

/// Numerically stable `1 / (1 + exp(-t))`
pub fn sigmoid(t: f64) -> f64 {
    if t >= 0.0 {
        1.0 / (1.0 + (-t).exp())
    } else {
        let e = t.exp();
        e / (1.0 + e)
    }
}

/// Numerically stable `log(1 + exp(t))`
fn softplus(t: f64) -> f64 {
    if t > 0.0 {
        t + (-t).exp().ln_1p()
    } else {
        t.exp().ln_1p()
    }
}

fn inf_norm(v: &Array1<f64>) -> f64 {
    v.fold(0.0, |m, x| m.max(x.abs()))
}
