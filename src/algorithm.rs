use log::{debug, trace};
use ndarray::{ArrayBase, Data, Ix1, Ix2};

use crate::error::{ElasticNetError, Result};
use crate::hyperparams::{check_len, ElasticNetParams, ElasticNetValidParams};
use crate::output::ElnetOutput;
use crate::solver::{ElnetArgs, ElnetSolver};

impl ElasticNetValidParams {
    /// Calls `solver` with the resolved arguments and translates its status code
    ///
    /// `x` and `y` must have the shape the parameters were checked against.
    pub fn fit<E, S, T>(
        &self,
        solver: &E,
        x: &ArrayBase<S, Ix2>,
        y: &ArrayBase<T, Ix1>,
    ) -> Result<ElnetOutput>
    where
        E: ElnetSolver + ?Sized,
        S: Data<Elem = f64>,
        T: Data<Elem = f64>,
    {
        check_len("predictor rows", self.n_observations, x.nrows())?;
        check_len("predictor columns", self.n_predictors, x.ncols())?;
        check_len("target", self.n_observations, y.len())?;

        let args = ElnetArgs {
            balance: self.balance,
            predictors: x.view(),
            target: y.view(),
            weights: self.weights.view(),
            exclusion: &self.exclusion,
            penalties: self.penalties.view(),
            memlimit: self.memlimit,
            flmin: self.path.flmin(),
            lambdas: self.path.lambdas().map(|lambdas| lambdas.view()),
            threshold: self.threshold,
            n_lambdas: self.path.len(),
            largest: self.largest,
            standardize: self.standardize,
            update: self.update,
        };
        args.check()?;

        debug!(
            "elnet on {}x{} design, memlimit {}, flmin {}, {} lambdas{}",
            self.n_observations,
            self.n_predictors,
            args.memlimit,
            args.flmin,
            args.n_lambdas,
            if args.lambdas.is_some() {
                " (explicit)"
            } else {
                ""
            }
        );
        let output = solver.elnet(&args)?;
        trace!("elnet returned status {}", output.status);

        match ElasticNetError::from_status(output.status) {
            Some(err) => Err(err),
            None => Ok(output),
        }
    }
}

impl ElasticNetParams {
    /// Resolves the parameters against `x` and `y`, then fits the path with `solver`
    pub fn fit<E, S, T>(
        &self,
        solver: &E,
        x: &ArrayBase<S, Ix2>,
        y: &ArrayBase<T, Ix1>,
    ) -> Result<ElnetOutput>
    where
        E: ElnetSolver + ?Sized,
        S: Data<Elem = f64>,
        T: Data<Elem = f64>,
    {
        self.check_with(x, y)?.fit(solver, x, y)
    }
}

/// Fit an elastic-net regularization path of `target` on `predictors`
///
/// Applies the defaults of `params`, validates them before `solver` is called and turns
/// a nonzero solver status into the matching [`ElasticNetError`]. On success the raw
/// solver output is returned unchanged.
///
/// # Example
///
/// ```rust
/// use glmnet::{elastic_net, ElasticNetError, ElasticNetParams, ElnetArgs, ElnetOutput, ElnetSolver};
/// use ndarray::{array, Array1, Array2};
///
/// /// A solver that fits nothing
/// struct Empty;
///
/// impl ElnetSolver for Empty {
///     fn elnet(&self, args: &ElnetArgs<'_>) -> glmnet::Result<ElnetOutput> {
///         Ok(ElnetOutput {
///             n_fits: 0,
///             intercepts: Array1::zeros(args.n_lambdas),
///             compressed_coefficients: Array2::zeros((args.memlimit, args.n_lambdas)),
///             active_indices: Array1::zeros(args.memlimit),
///             active_counts: Array1::zeros(args.n_lambdas),
///             r_squared: Array1::zeros(args.n_lambdas),
///             lambdas: Array1::zeros(args.n_lambdas),
///             n_passes: 0,
///             status: 0,
///         })
///     }
/// }
///
/// let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
/// let y = array![1.0, 2.0, 3.0];
///
/// let output = elastic_net(&Empty, &x, &y, &ElasticNetParams::new(0.5).nummodels(10))?;
/// assert_eq!(output.lambdas.len(), 10);
///
/// let err = elastic_net(&Empty, &x, &y, &ElasticNetParams::new(1.5)).unwrap_err();
/// assert!(matches!(err, ElasticNetError::InvalidBalance(_)));
/// # Ok::<(), ElasticNetError>(())
/// ```
pub fn elastic_net<E, S, T>(
    solver: &E,
    predictors: &ArrayBase<S, Ix2>,
    target: &ArrayBase<T, Ix1>,
    params: &ElasticNetParams,
) -> Result<ElnetOutput>
where
    E: ElnetSolver + ?Sized,
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
{
    params.fit(solver, predictors, target)
}
