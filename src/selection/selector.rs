//! Grid search, retrain and residual calibration.
//!
//! A [`ModelSelector`] moves through
//! `Empty → DataLoaded → ModelSelected → Retrained → Calibrated`:
//!
//! - [`feed_data`](ModelSelector::feed_data) stores the dataset (once).
//! - [`select_model`](ModelSelector::select_model) scores every
//!   `(penalty, degree)` pair; running it again starts a new search.
//! - [`retrain_model`](ModelSelector::retrain_model) fits the winner; running
//!   it again replaces the model and clears the residual spread.
//! - [`calc_residual_std`](ModelSelector::calc_residual_std) measures the
//!   in-sample RMS residual, after which the probabilistic queries work.
//!
//! Calls made in the wrong state fail with
//! [`RegressionError::PreconditionViolation`].

use ndarray::{Array1, Array2};
use tracing::{debug, info, trace};

use crate::dataset::{permutation, InMemoryDataset};
use crate::error::{RegressionError, Result};
use crate::model::{NormalizedRegressor, Predictor, Regressor, RidgeRegression};
use crate::predictor::GaussianPredictor;
use crate::selection::validation::ValidationStrategy;
use crate::selection::{validate_grid, GridScore, SelectionOutcome, TrialParams};

/// Lifecycle stage of a [`ModelSelector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectorState {
    Empty,
    DataLoaded,
    ModelSelected,
    Retrained,
    /// Retrained and `residual_std` computed; queries are available.
    Calibrated,
}

#[derive(Clone, Debug)]
enum Fitted<M> {
    Retrained(NormalizedRegressor<M>),
    Calibrated(GaussianPredictor<M>),
}

/// Hyperparameter search over [`NormalizedRegressor`] fits.
#[derive(Clone, Debug)]
pub struct ModelSelector<R: Regressor = RidgeRegression> {
    regressor: R,
    normalize_penalty: bool,
    verbosity: u8,
    dataset: Option<InMemoryDataset>,
    outcome: Option<SelectionOutcome>,
    fitted: Option<Fitted<R::Model>>,
}

impl Default for ModelSelector<RidgeRegression> {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSelector<RidgeRegression> {
    /// Selector backed by closed-form ridge regression.
    pub fn new() -> Self {
        Self::with_regressor(RidgeRegression::new())
    }
}

impl<R: Regressor> ModelSelector<R> {
    pub fn with_regressor(regressor: R) -> Self {
        Self {
            regressor,
            normalize_penalty: false,
            verbosity: 0,
            dataset: None,
            outcome: None,
            fitted: None,
        }
    }

    /// Divide penalties by the target std before use.
    pub fn normalize_penalty(mut self, normalize_penalty: bool) -> Self {
        self.normalize_penalty = normalize_penalty;
        self
    }

    /// 0 silent, 1 summary, 3 per grid point, 4 per validation round.
    pub fn verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn state(&self) -> SelectorState {
        match (&self.dataset, &self.outcome, &self.fitted) {
            (None, _, _) => SelectorState::Empty,
            (Some(_), None, _) => SelectorState::DataLoaded,
            (Some(_), Some(_), None) => SelectorState::ModelSelected,
            (Some(_), Some(_), Some(Fitted::Retrained(_))) => SelectorState::Retrained,
            (Some(_), Some(_), Some(Fitted::Calibrated(_))) => SelectorState::Calibrated,
        }
    }

    /// Store the training data. Only valid on an empty selector.
    pub fn feed_data(&mut self, x: Array2<f64>, y: Array1<f64>) -> Result<()> {
        let dataset = InMemoryDataset::from_arrays(x, y)?;
        self.feed_dataset(dataset)
    }

    pub fn feed_dataset(&mut self, dataset: InMemoryDataset) -> Result<()> {
        if self.dataset.is_some() {
            return Err(RegressionError::PreconditionViolation(
                "feed_data called on a selector that already holds data".to_string(),
            ));
        }
        self.dataset = Some(dataset);
        Ok(())
    }

    /// Score every grid point and keep the one with the lowest validation error.
    ///
    /// Grid points are visited penalty-major: for each penalty, every degree
    /// in order. A later point replaces the current best only when its error
    /// is strictly lower, so ties go to the first point visited.
    ///
    /// `validation_size > 0` selects partition validation (MSE over folds of
    /// that size); `validation_size == 0` selects bootstrap validation (MAE
    /// over `bootstrap_runs` rounds of `min(bootstrap_size, n / 3)` training
    /// rows).
    ///
    /// # Errors
    /// - [`RegressionError::PreconditionViolation`] without data.
    /// - [`RegressionError::InvalidParameter`] for an empty or invalid grid
    ///   or zero bootstrap rounds.
    /// - [`RegressionError::InsufficientData`] if the dataset is too small for
    ///   the requested folds or bootstrap size; raised before any fitting.
    /// - Any fitting error, e.g. [`RegressionError::DegenerateData`] when the
    ///   targets are constant.
    pub fn select_model(
        &mut self,
        penalties: &[f64],
        degrees: &[usize],
        validation_size: usize,
        bootstrap_size: usize,
        bootstrap_runs: usize,
    ) -> Result<TrialParams> {
        let dataset = self.dataset.as_ref().ok_or_else(|| {
            RegressionError::PreconditionViolation(
                "select_model called before feed_data".to_string(),
            )
        })?;

        validate_grid(penalties, degrees)?;
        let strategy =
            ValidationStrategy::from_knobs(validation_size, bootstrap_size, bootstrap_runs);
        strategy.check(dataset.len())?;

        // Constant targets cannot be normalized; report it once, up front.
        if dataset.targets().std(0.0) == 0.0 {
            return Err(RegressionError::DegenerateData(format!(
                "all {} targets are equal",
                dataset.len()
            )));
        }

        let rounds: Vec<(InMemoryDataset, InMemoryDataset)> = strategy
            .splits(dataset.len())
            .iter()
            .map(|split| (dataset.select(&split.train), dataset.select(&split.held_out)))
            .collect();

        let mut scores = Vec::with_capacity(penalties.len() * degrees.len());
        let mut best: Option<GridScore> = None;

        for &penalty in penalties {
            for &degree in degrees {
                let params = TrialParams::new(penalty, degree);
                let error = self.validate(&strategy, &rounds, params)?;
                if self.verbosity >= 3 {
                    debug!(penalty, degree, error, "scored grid point");
                }

                let score = GridScore { params, error };
                if error.is_finite() && best.map_or(true, |b| error < b.error) {
                    best = Some(score);
                }
                scores.push(score);
            }
        }

        let best = best.ok_or_else(|| {
            RegressionError::NumericalError(
                "no grid point produced a finite validation error".to_string(),
            )
        })?;
        if self.verbosity >= 1 {
            info!(
                penalty = best.params.penalty,
                degree = best.params.degree,
                error = best.error,
                "selected hyperparameters"
            );
        }

        self.outcome = Some(SelectionOutcome {
            best: best.params,
            best_error: best.error,
            scores,
        });
        self.fitted = None;
        Ok(best.params)
    }

    /// Average held-out error of `params` over all rounds.
    fn validate(
        &self,
        strategy: &ValidationStrategy,
        rounds: &[(InMemoryDataset, InMemoryDataset)],
        params: TrialParams,
    ) -> Result<f64> {
        let mut total = 0.0;
        for (round, (train, held_out)) in rounds.iter().enumerate() {
            let fitted = self.fit(train.features(), train.targets(), params)?;
            let prediction = fitted.predict(held_out.features())?;
            let error = strategy.score(&prediction, held_out.targets())?;
            if self.verbosity >= 4 {
                trace!(round, error, "validation round");
            }
            total += error;
        }
        Ok(total / rounds.len() as f64)
    }

    fn fit(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        params: TrialParams,
    ) -> Result<NormalizedRegressor<R::Model>> {
        NormalizedRegressor::fit(
            &self.regressor,
            x,
            y,
            params.penalty,
            params.degree,
            self.normalize_penalty,
        )
    }

    /// Fit the selected grid point.
    ///
    /// `bootstrap_size == 0` trains on every row; otherwise the rows are
    /// shuffled with `seed` and the first `bootstrap_size` are used.
    pub fn retrain_model(&mut self, bootstrap_size: usize, seed: u64) -> Result<()> {
        let (dataset, outcome) = match (&self.dataset, &self.outcome) {
            (Some(dataset), Some(outcome)) => (dataset, outcome),
            _ => {
                return Err(RegressionError::PreconditionViolation(
                    "retrain_model called before select_model".to_string(),
                ))
            }
        };

        let fitted = if bootstrap_size == 0 {
            self.fit(dataset.features(), dataset.targets(), outcome.best)?
        } else {
            if bootstrap_size > dataset.len() {
                return Err(RegressionError::insufficient(
                    "bootstrap retrain",
                    bootstrap_size,
                    dataset.len(),
                ));
            }
            let order = permutation(dataset.len(), seed);
            let sample = dataset.select(&order[..bootstrap_size]);
            self.fit(sample.features(), sample.targets(), outcome.best)?
        };

        self.fitted = Some(Fitted::Retrained(fitted));
        Ok(())
    }

    /// RMS of the retrained model's residuals over the full dataset.
    pub fn calc_residual_std(&mut self) -> Result<f64> {
        let (dataset, outcome) = match (&self.dataset, &self.outcome) {
            (Some(dataset), Some(outcome)) => (dataset, outcome),
            _ => {
                return Err(RegressionError::PreconditionViolation(
                    "calc_residual_std called before retrain_model".to_string(),
                ))
            }
        };
        let regressor = match self.fitted.take() {
            Some(Fitted::Retrained(regressor)) => regressor,
            Some(Fitted::Calibrated(predictor)) => predictor.into_regressor(),
            None => {
                return Err(RegressionError::PreconditionViolation(
                    "calc_residual_std called before retrain_model".to_string(),
                ))
            }
        };

        let residual_std = match residual_rms(&regressor, dataset) {
            Ok(residual_std) => residual_std,
            Err(err) => {
                self.fitted = Some(Fitted::Retrained(regressor));
                return Err(err);
            }
        };

        if self.verbosity >= 1 {
            info!(residual_std, "calibrated residual spread");
        }
        let predictor = GaussianPredictor::new(regressor, outcome.best, residual_std)?;
        self.fitted = Some(Fitted::Calibrated(predictor));
        Ok(residual_std)
    }

    /// The calibrated predictor, available once `calc_residual_std` ran.
    pub fn predictor(&self) -> Result<&GaussianPredictor<R::Model>> {
        match &self.fitted {
            Some(Fitted::Calibrated(predictor)) => Ok(predictor),
            Some(Fitted::Retrained(_)) => Err(RegressionError::PreconditionViolation(
                "residual std not computed; call calc_residual_std first".to_string(),
            )),
            None => Err(RegressionError::PreconditionViolation(
                "no retrained model; call retrain_model first".to_string(),
            )),
        }
    }

    pub fn into_predictor(self) -> Result<GaussianPredictor<R::Model>> {
        match self.fitted {
            Some(Fitted::Calibrated(predictor)) => Ok(predictor),
            _ => Err(RegressionError::PreconditionViolation(
                "selector is not calibrated; call retrain_model and calc_residual_std first"
                    .to_string(),
            )),
        }
    }

    pub fn to_predictor(&self) -> Result<GaussianPredictor<R::Model>>
    where
        R::Model: Clone,
    {
        self.predictor().cloned()
    }

    /// `(point_estimate, std_estimate)` per row.
    pub fn predict(&self, x: &Array2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
        self.predictor()?.predict(x)
    }

    pub fn predict_datum(&self, x: &[f64]) -> Result<(f64, f64)> {
        self.predictor()?.predict_datum(x)
    }

    pub fn tail_probability(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Array1<f64>> {
        self.predictor()?.tail_probability(x, y)
    }

    pub fn tail_probability_datum(&self, x: &[f64], y: f64) -> Result<f64> {
        self.predictor()?.tail_probability_datum(x, y)
    }

    pub fn log_density(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Array1<f64>> {
        self.predictor()?.log_density(x, y)
    }

    pub fn log_density_datum(&self, x: &[f64], y: f64) -> Result<f64> {
        self.predictor()?.log_density_datum(x, y)
    }

    pub fn best_penalty(&self) -> Option<f64> {
        self.outcome.as_ref().map(|o| o.best.penalty)
    }

    pub fn best_degree(&self) -> Option<usize> {
        self.outcome.as_ref().map(|o| o.best.degree)
    }

    pub fn best_error(&self) -> Option<f64> {
        self.outcome.as_ref().map(|o| o.best_error)
    }

    /// Validation error of every grid point, in search order.
    pub fn scores(&self) -> &[GridScore] {
        self.outcome.as_ref().map_or(&[][..], |o| o.scores.as_slice())
    }

    pub fn outcome(&self) -> Option<&SelectionOutcome> {
        self.outcome.as_ref()
    }

    pub fn residual_std(&self) -> Option<f64> {
        match &self.fitted {
            Some(Fitted::Calibrated(predictor)) => Some(predictor.residual_std()),
            _ => None,
        }
    }

    pub fn dataset(&self) -> Option<&InMemoryDataset> {
        self.dataset.as_ref()
    }

    /// The retrained regressor, calibrated or not.
    pub fn regressor(&self) -> Option<&NormalizedRegressor<R::Model>> {
        match &self.fitted {
            Some(Fitted::Retrained(regressor)) => Some(regressor),
            Some(Fitted::Calibrated(predictor)) => Some(predictor.regressor()),
            None => None,
        }
    }
}

/// Root-mean-square in-sample residual; non-finite spreads are rejected.
fn residual_rms<M: Predictor>(
    regressor: &NormalizedRegressor<M>,
    dataset: &InMemoryDataset,
) -> Result<f64> {
    let residuals = dataset.targets() - &regressor.predict(dataset.features())?;
    let rms = (residuals.dot(&residuals) / residuals.len() as f64).sqrt();
    if !rms.is_finite() {
        return Err(RegressionError::NumericalError(format!(
            "residual std is not finite ({})",
            rms
        )));
    }
    Ok(rms)
}
