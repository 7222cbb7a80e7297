#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2};

use crate::error::{ElasticNetError, Result};

/// Default minimum change of the largest coefficient needed to keep iterating
pub const DEFAULT_THRESHOLD: f64 = 1.0e-4;
/// Default ratio of the smallest to the largest automatically chosen lambda
pub const DEFAULT_FLMIN: f64 = 0.001;
/// Default number of models along an automatically chosen path
pub const DEFAULT_NUMMODELS: usize = 100;
/// `flmin` values above `1.0` tell `elnet` to fit the user supplied lambdas
pub const EXPLICIT_PATH_FLMIN: f64 = 2.0;

/// Coordinate update scheme used by `elnet`
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    /// Keep inner products with all active predictors, fast for `p` up to a few hundred
    Covariance,
    /// Recompute residual inner products, better when `p` exceeds `n`
    Naive,
}

impl UpdateMode {
    /// The `ka` flag of `elnet`
    pub fn code(self) -> i32 {
        match self {
            UpdateMode::Covariance => 1,
            UpdateMode::Naive => 2,
        }
    }
}

impl Default for UpdateMode {
    fn default() -> Self {
        UpdateMode::Covariance
    }
}

/// The sequence of regularization strengths `elnet` walks through
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub enum RegularizationPath {
    /// Fit exactly these lambdas, in the given order
    Explicit(Array1<f64>),
    /// Let the solver choose `n_models` lambdas, the smallest being `flmin` times the largest
    Automatic { flmin: f64, n_models: usize },
}

impl RegularizationPath {
    /// The `flmin` argument handed to `elnet`
    pub fn flmin(&self) -> f64 {
        match self {
            RegularizationPath::Explicit(_) => EXPLICIT_PATH_FLMIN,
            RegularizationPath::Automatic { flmin, .. } => *flmin,
        }
    }

    /// Number of models requested along the path (`nlam`)
    pub fn len(&self) -> usize {
        match self {
            RegularizationPath::Explicit(lambdas) => lambdas.len(),
            RegularizationPath::Automatic { n_models, .. } => *n_models,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lambdas(&self) -> Option<&Array1<f64>> {
        match self {
            RegularizationPath::Explicit(lambdas) => Some(lambdas),
            RegularizationPath::Automatic { .. } => None,
        }
    }
}

/// A fully resolved argument set for a single `elnet` call
///
/// Every default has been applied and every check has passed for a design matrix of
/// `n_observations` rows and `n_predictors` columns. Obtained from
/// [`ElasticNetParams::check_with`]. It serializes for inspection but only
/// [`ElasticNetParams`] deserializes, so every instance went through the checks.
#[cfg_attr(feature = "serde", derive(Serialize), serde(crate = "serde_crate"))]
#[derive(Clone, Debug, PartialEq)]
pub struct ElasticNetValidParams {
    pub(crate) balance: f64,
    pub(crate) n_observations: usize,
    pub(crate) n_predictors: usize,
    pub(crate) memlimit: usize,
    pub(crate) largest: usize,
    pub(crate) threshold: f64,
    pub(crate) weights: Array1<f64>,
    pub(crate) standardize: bool,
    pub(crate) penalties: Array1<f64>,
    pub(crate) exclusion: Vec<usize>,
    pub(crate) path: RegularizationPath,
    pub(crate) update: UpdateMode,
}

impl ElasticNetValidParams {
    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn n_observations(&self) -> usize {
        self.n_observations
    }

    pub fn n_predictors(&self) -> usize {
        self.n_predictors
    }

    pub fn memlimit(&self) -> usize {
        self.memlimit
    }

    pub fn largest(&self) -> usize {
        self.largest
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn standardize(&self) -> bool {
        self.standardize
    }

    pub fn penalties(&self) -> &Array1<f64> {
        &self.penalties
    }

    /// Exclusion list in solver layout: `[count, idx1, idx2, ...]`
    pub fn exclusion(&self) -> &[usize] {
        &self.exclusion
    }

    pub fn path(&self) -> &RegularizationPath {
        &self.path
    }

    pub fn update(&self) -> UpdateMode {
        self.update
    }
}

/// A hyper-parameter set for a glmnet elastic-net path
///
/// `elnet` fits, for every lambda on the regularization path,
/// ```ignore
/// 1 / 2 * RSS / n_observations
///     + lambda * ((1 - balance) / 2 * ||beta||^2_2 + balance * ||beta||_1)
/// ```
///
/// The parameter set is resolved against a concrete design matrix with
/// [`check_with`](Self::check_with), or directly fitted with [`fit`](Self::fit) which
/// resolves it first and forwards any error.
///
/// # Parameters
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :---| :--- |
/// | [balance](Self::new) | - | Mix of L1 and L2 penalty, `0` is ridge and `1` is lasso | `[0.0, 1.0]` |
/// | [memlimit](Self::memlimit) | `n_predictors` | Predictors the solver may hold in working memory | `[largest, inf)` |
/// | [largest](Self::largest) | `n_predictors` | Nonzero coefficients allowed in any model | `[0, memlimit]` |
/// | [threshold](Self::threshold) | `1e-4` | Minimum coefficient change to keep iterating | `(0, inf)` |
/// | [weights](Self::weights) | ones | Per observation weights | length `n_observations` |
/// | [standardize](Self::standardize) | `true` | Standardize predictors before fitting | `false`, `true` |
/// | [penalties](Self::penalties) | ones | Per predictor penalty factor, `0` leaves it unpenalized | length `n_predictors` |
/// | [exclude](Self::exclude) | none | 1-based predictors forced out of every model | `[1, n_predictors]` |
/// | [lambdas](Self::lambdas) | - | Explicit regularization path | conflicts with `flmin` |
/// | [flmin](Self::flmin) | `0.001` | Smallest to largest lambda ratio of an automatic path | conflicts with `lambdas` |
/// | [nummodels](Self::nummodels) | `100` | Models along an automatic path | `[1, inf)` |
/// | [update](Self::update) | `Covariance` | Coordinate update scheme | `Covariance`, `Naive` |
///
/// # Errors
///
/// Resolution fails, in this order, with
/// [`LargestExceedsMemlimit`](ElasticNetError::LargestExceedsMemlimit),
/// [`InvalidBalance`](ElasticNetError::InvalidBalance) and
/// [`ConflictingPath`](ElasticNetError::ConflictingPath), followed by the shape checks
/// [`NoPredictors`](ElasticNetError::NoPredictors),
/// [`DimensionMismatch`](ElasticNetError::DimensionMismatch) and
/// [`InvalidExclusion`](ElasticNetError::InvalidExclusion).
///
/// # Example
///
/// ```rust
/// use glmnet::{ElasticNetParams, ElasticNetError};
/// use ndarray::array;
///
/// let x = array![[1.0, 0.0, 2.0], [0.0, 1.0, 1.0]];
/// let y = array![3.0, 2.0];
///
/// let params = ElasticNetParams::new(0.5).lambdas(&array![0.1, 0.05, 0.01]);
/// let checked = params.check_with(&x, &y)?;
///
/// assert_eq!(checked.memlimit(), 3);
/// assert_eq!(checked.path().len(), 3);
/// # Ok::<(), ElasticNetError>(())
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", default)
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ElasticNetParams {
    balance: f64,
    memlimit: Option<usize>,
    largest: Option<usize>,
    threshold: f64,
    weights: Option<Array1<f64>>,
    standardize: bool,
    penalties: Option<Array1<f64>>,
    exclude: Vec<usize>,
    lambdas: Option<Array1<f64>>,
    flmin: Option<f64>,
    nummodels: Option<usize>,
    update: UpdateMode,
}

impl Default for ElasticNetParams {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ElasticNetParams {
    /// Create a parameter set with the given L1/L2 `balance` and every option at its default
    pub fn new(balance: f64) -> ElasticNetParams {
        ElasticNetParams {
            balance,
            memlimit: None,
            largest: None,
            threshold: DEFAULT_THRESHOLD,
            weights: None,
            standardize: true,
            penalties: None,
            exclude: Vec::new(),
            lambdas: None,
            flmin: None,
            nummodels: None,
            update: UpdateMode::default(),
        }
    }

    /// Set the mix of L1 and L2 penalty. `0.0` is ridge, `1.0` is lasso.
    pub fn balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    /// Set the maximum number of predictors the solver may hold in working memory.
    ///
    /// Defaults to the number of predictors if not set
    pub fn memlimit(mut self, memlimit: usize) -> Self {
        self.memlimit = Some(memlimit);
        self
    }

    /// Set the maximum number of nonzero coefficients in any model of the path.
    ///
    /// Defaults to the number of predictors if not set, must not exceed `memlimit`
    pub fn largest(mut self, largest: usize) -> Self {
        self.largest = Some(largest);
        self
    }

    /// Set the minimum change of the largest coefficient needed to continue iterating.
    ///
    /// Defaults to `1e-4` if not set
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set per observation weights. The array is copied.
    ///
    /// Defaults to all ones
    pub fn weights<S: Data<Elem = f64>>(mut self, weights: &ArrayBase<S, Ix1>) -> Self {
        self.weights = Some(weights.to_owned());
        self
    }

    /// Standardize the predictors before fitting.
    ///
    /// Defaults to `true`
    pub fn standardize(mut self, standardize: bool) -> Self {
        self.standardize = standardize;
        self
    }

    /// Set per predictor penalty factors, `0.0` leaves a predictor unpenalized. The array
    /// is copied.
    ///
    /// Defaults to all ones
    pub fn penalties<S: Data<Elem = f64>>(mut self, penalties: &ArrayBase<S, Ix1>) -> Self {
        self.penalties = Some(penalties.to_owned());
        self
    }

    /// Force predictors out of every model. Indices are 1-based, as `elnet` expects them.
    pub fn exclude<I: IntoIterator<Item = usize>>(mut self, exclude: I) -> Self {
        self.exclude = exclude.into_iter().collect();
        self
    }

    /// Fit exactly this sequence of lambdas instead of letting the solver choose.
    ///
    /// Cannot be combined with [`flmin`](Self::flmin)
    pub fn lambdas<S: Data<Elem = f64>>(mut self, lambdas: &ArrayBase<S, Ix1>) -> Self {
        self.lambdas = Some(lambdas.to_owned());
        self
    }

    /// Set the ratio of the smallest to the largest automatically chosen lambda.
    ///
    /// Defaults to `0.001`, cannot be combined with [`lambdas`](Self::lambdas)
    pub fn flmin(mut self, flmin: f64) -> Self {
        self.flmin = Some(flmin);
        self
    }

    /// Set the number of models along an automatically chosen path. Ignored when explicit
    /// lambdas are given.
    ///
    /// Defaults to `100`
    pub fn nummodels(mut self, nummodels: usize) -> Self {
        self.nummodels = Some(nummodels);
        self
    }

    /// Select the coordinate update scheme.
    ///
    /// Defaults to [`UpdateMode::Covariance`]
    pub fn update(mut self, update: UpdateMode) -> Self {
        self.update = update;
        self
    }

    /// Apply the defaults for a design matrix `x` and target `y` and validate the result
    pub fn check_with<S, T>(
        &self,
        x: &ArrayBase<S, Ix2>,
        y: &ArrayBase<T, Ix1>,
    ) -> Result<ElasticNetValidParams>
    where
        S: Data<Elem = f64>,
        T: Data<Elem = f64>,
    {
        let (n_observations, n_predictors) = x.dim();

        let memlimit = self.memlimit.unwrap_or(n_predictors);
        let largest = self.largest.unwrap_or(n_predictors);
        if memlimit < largest {
            return Err(ElasticNetError::LargestExceedsMemlimit { largest, memlimit });
        }

        if !(0.0..=1.0).contains(&self.balance) {
            return Err(ElasticNetError::InvalidBalance(self.balance));
        }

        let weights = self
            .weights
            .clone()
            .unwrap_or_else(|| Array1::ones(n_observations));
        let penalties = self
            .penalties
            .clone()
            .unwrap_or_else(|| Array1::ones(n_predictors));

        let exclusion = exclusion_array(&self.exclude);

        let path = match (&self.lambdas, self.flmin) {
            (Some(_), Some(_)) => return Err(ElasticNetError::ConflictingPath),
            (Some(lambdas), None) => RegularizationPath::Explicit(lambdas.clone()),
            (None, flmin) => RegularizationPath::Automatic {
                flmin: flmin.unwrap_or(DEFAULT_FLMIN),
                n_models: self.nummodels.unwrap_or(DEFAULT_NUMMODELS),
            },
        };

        if n_predictors == 0 {
            return Err(ElasticNetError::NoPredictors);
        }
        check_len("target", n_observations, y.len())?;
        check_len("weights", n_observations, weights.len())?;
        check_len("penalties", n_predictors, penalties.len())?;
        if let Some(&index) = self
            .exclude
            .iter()
            .find(|&&index| index == 0 || index > n_predictors)
        {
            return Err(ElasticNetError::InvalidExclusion {
                index,
                n_predictors,
            });
        }

        Ok(ElasticNetValidParams {
            balance: self.balance,
            n_observations,
            n_predictors,
            memlimit,
            largest,
            threshold: self.threshold,
            weights,
            standardize: self.standardize,
            penalties,
            exclusion,
            path,
            update: self.update,
        })
    }
}

/// Lays out excluded predictors the way `elnet` reads them, prefixed by their count
pub(crate) fn exclusion_array(exclude: &[usize]) -> Vec<usize> {
    std::iter::once(exclude.len())
        .chain(exclude.iter().copied())
        .collect()
}

pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        Err(ElasticNetError::DimensionMismatch {
            what,
            expected,
            actual,
        })
    } else {
        Ok(())
    }
}
