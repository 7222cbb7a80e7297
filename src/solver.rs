use ndarray::{ArrayView1, ArrayView2};

use crate::error::{ElasticNetError, Result};
use crate::hyperparams::{check_len, UpdateMode};
use crate::output::ElnetOutput;

/// Arguments of a single `elnet` call, in the solver's positional order
///
/// All arrays are borrowed from an [`ElasticNetValidParams`](crate::ElasticNetValidParams) or
/// from the caller and must not be written to. Implementations that hand them to a routine
/// which overwrites its inputs copy them first.
#[derive(Clone, Debug)]
pub struct ElnetArgs<'a> {
    /// Mix of L1 and L2 penalty (`parm`)
    pub balance: f64,
    /// Design matrix, `n_observations x n_predictors` (`x`)
    pub predictors: ArrayView2<'a, f64>,
    /// Response (`y`)
    pub target: ArrayView1<'a, f64>,
    /// Observation weights (`w`)
    pub weights: ArrayView1<'a, f64>,
    /// Excluded predictors as `[count, idx...]` with 1-based indices (`jd`)
    pub exclusion: &'a [usize],
    /// Per predictor penalty factors (`vp`)
    pub penalties: ArrayView1<'a, f64>,
    /// Working memory limit in predictors (`nx`)
    pub memlimit: usize,
    /// Lambda ratio, or a value above `1.0` to use `lambdas` (`flmin`)
    pub flmin: f64,
    /// Explicit lambdas, only present with the sentinel `flmin` (`ulam`)
    pub lambdas: Option<ArrayView1<'a, f64>>,
    /// Convergence threshold (`thr`)
    pub threshold: f64,
    /// Number of models requested along the path (`nlam`)
    pub n_lambdas: usize,
    /// Maximum nonzero coefficients per model (`ne`)
    pub largest: usize,
    /// Standardize predictors before fitting (`isd`)
    pub standardize: bool,
    /// Coordinate update scheme (`ka`)
    pub update: UpdateMode,
}

impl<'a> ElnetArgs<'a> {
    /// Checks that every buffer has the length `elnet` reads from it
    ///
    /// `elnet` fits the explicit lambdas whenever `flmin >= 1.0`, in that case exactly
    /// `n_lambdas` of them have to be present.
    pub fn check(&self) -> Result<()> {
        let (n_observations, n_predictors) = self.predictors.dim();
        check_len("target", n_observations, self.target.len())?;
        check_len("weights", n_observations, self.weights.len())?;
        check_len("penalties", n_predictors, self.penalties.len())?;

        let (&count, excluded) = self
            .exclusion
            .split_first()
            .ok_or(ElasticNetError::DimensionMismatch {
                what: "exclusion",
                expected: 1,
                actual: 0,
            })?;
        check_len("excluded predictors", count, excluded.len())?;
        if let Some(&index) = excluded
            .iter()
            .find(|&&index| index == 0 || index > n_predictors)
        {
            return Err(ElasticNetError::InvalidExclusion {
                index,
                n_predictors,
            });
        }

        if self.flmin >= 1.0 {
            let lambdas = self
                .lambdas
                .ok_or(ElasticNetError::MissingLambdas(self.flmin))?;
            check_len("lambdas", self.n_lambdas, lambdas.len())?;
        }

        Ok(())
    }
}

/// An elastic-net path solver with the calling convention of glmnet's `elnet`
///
/// The solver reports failures through [`ElnetOutput::status`]; an `Err` is reserved
/// for problems in marshalling the call itself.
pub trait ElnetSolver {
    fn elnet(&self, args: &ElnetArgs<'_>) -> Result<ElnetOutput>;
}

impl<S: ElnetSolver + ?Sized> ElnetSolver for &S {
    fn elnet(&self, args: &ElnetArgs<'_>) -> Result<ElnetOutput> {
        (**self).elnet(args)
    }
}

impl<S: ElnetSolver + ?Sized> ElnetSolver for Box<S> {
    fn elnet(&self, args: &ElnetArgs<'_>) -> Result<ElnetOutput> {
        (**self).elnet(args)
    }
}
