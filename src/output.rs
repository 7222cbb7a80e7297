#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix2};
use sprs::{CsMat, TriMat};

use crate::error::{ElasticNetError, Result};

/// Raw result of an `elnet` call
///
/// The fields are exactly what the solver wrote, buffers are not trimmed to the number of
/// fitted models. Coefficients are stored compressed: model `k` has `active_counts[k]`
/// nonzero coefficients, the `l`-th of which belongs to predictor `active_indices[l]`
/// (1-based) and has value `compressed_coefficients[[l, k]]`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ElnetOutput {
    /// Number of models actually fitted (`lmu`)
    pub n_fits: usize,
    /// Intercept of every model (`a0`)
    pub intercepts: Array1<f64>,
    /// Compressed coefficients, `memlimit x n_lambdas` (`ca`)
    pub compressed_coefficients: Array2<f64>,
    /// 1-based predictor of every compressed coefficient row (`ia`)
    pub active_indices: Array1<usize>,
    /// Number of nonzero coefficients of every model (`nin`)
    pub active_counts: Array1<usize>,
    /// Explained deviance of every model (`rsq`)
    pub r_squared: Array1<f64>,
    /// Lambda used for every model (`alm`)
    pub lambdas: Array1<f64>,
    /// Passes over the data summed over all models (`nlp`)
    pub n_passes: usize,
    /// Solver status, `0` on success (`jerr`)
    pub status: i32,
}

impl ElnetOutput {
    /// Dense coefficients, one column per fitted model
    pub fn coefficients(&self, n_predictors: usize) -> Result<Array2<f64>> {
        let mut coefficients = Array2::zeros((n_predictors, self.n_fits));
        for (row, col, value) in self.active_entries(n_predictors)? {
            coefficients[[row, col]] = value;
        }

        Ok(coefficients)
    }

    /// Coefficients in compressed sparse column form, one column per fitted model
    pub fn coefficients_sparse(&self, n_predictors: usize) -> Result<CsMat<f64>> {
        let entries = self.active_entries(n_predictors)?;

        let (mut row_inds, mut col_inds, mut values) = (Vec::new(), Vec::new(), Vec::new());
        for (row, col, value) in entries {
            row_inds.push(row);
            col_inds.push(col);
            values.push(value);
        }

        Ok(TriMat::from_triplets((n_predictors, self.n_fits), row_inds, col_inds, values).to_csc())
    }

    /// Fitted values of every model for the observations in `x`, one column per model
    pub fn predict<S: Data<Elem = f64>>(&self, x: &ArrayBase<S, Ix2>) -> Result<Array2<f64>> {
        let coefficients = self.coefficients(x.ncols())?;
        if self.intercepts.len() < self.n_fits {
            return Err(ElasticNetError::MalformedOutput(format!(
                "{} models reported, but only {} intercepts stored",
                self.n_fits,
                self.intercepts.len()
            )));
        }

        Ok(x.dot(&coefficients) + &self.intercepts.slice(s![..self.n_fits]))
    }

    /// Expands the compressed layout into `(predictor, model, value)` triplets
    fn active_entries(&self, n_predictors: usize) -> Result<Vec<(usize, usize, f64)>> {
        let n_fits = self.n_fits;
        let (n_rows, n_cols) = self.compressed_coefficients.dim();
        if n_fits > n_cols || n_fits > self.active_counts.len() {
            return Err(ElasticNetError::MalformedOutput(format!(
                "{} models reported, but storage holds {}",
                n_fits,
                n_cols.min(self.active_counts.len())
            )));
        }

        let mut entries = Vec::new();
        for (model, &count) in self.active_counts.iter().take(n_fits).enumerate() {
            if count > n_rows || count > self.active_indices.len() {
                return Err(ElasticNetError::MalformedOutput(format!(
                    "model {} has {} active predictors, but only {} are stored",
                    model,
                    count,
                    n_rows.min(self.active_indices.len())
                )));
            }

            for (slot, &index) in self.active_indices.iter().take(count).enumerate() {
                if index == 0 || index > n_predictors {
                    return Err(ElasticNetError::MalformedOutput(format!(
                        "active predictor {} is outside of 1..={}",
                        index, n_predictors
                    )));
                }
                entries.push((index - 1, model, self.compressed_coefficients[[slot, model]]));
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::ElnetOutput;
    use crate::error::ElasticNetError;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1, Array2};
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use rand::{rngs::SmallRng, SeedableRng};

    /// Three models on four predictors, stored with room for a fourth model
    fn path() -> ElnetOutput {
        ElnetOutput {
            n_fits: 3,
            intercepts: array![1.0, 0.5, 0.25, 0.0],
            compressed_coefficients: array![
                [0.0, 2.0, 3.0, 0.0],
                [0.0, 0.0, -1.0, 0.0],
                [0.0, 0.0, 0.0, 0.0]
            ],
            active_indices: array![3, 1, 0],
            active_counts: array![0, 1, 2, 0],
            r_squared: array![0.0, 0.4, 0.7, 0.0],
            lambdas: array![1.0, 0.5, 0.1, 0.0],
            n_passes: 12,
            status: 0,
        }
    }

    #[test]
    fn expands_compressed_coefficients() {
        let coefficients = path().coefficients(4).unwrap();

        assert_abs_diff_eq!(
            coefficients,
            array![
                [0.0, 0.0, -1.0],
                [0.0, 0.0, 0.0],
                [0.0, 2.0, 3.0],
                [0.0, 0.0, 0.0]
            ]
        );
    }

    #[test]
    fn sparse_matches_dense() {
        let output = path();
        let sparse = output.coefficients_sparse(4).unwrap();

        assert_eq!(sparse.shape(), (4, 3));
        assert_eq!(sparse.nnz(), 3);
        assert_abs_diff_eq!(sparse.to_dense(), output.coefficients(4).unwrap());
    }

    #[test]
    fn predicts_every_model() {
        let x = array![[1.0, 0.0, 1.0, 5.0], [2.0, 1.0, 0.0, 5.0]];
        let fitted = path().predict(&x).unwrap();

        assert_abs_diff_eq!(fitted, array![[1.0, 2.5, 2.25], [1.0, 0.5, -1.75]]);
    }

    #[test]
    fn predict_agrees_with_dense_product() {
        let mut rng = SmallRng::seed_from_u64(42);
        let x = Array2::random_using((20, 4), Uniform::new(-1.0, 1.0), &mut rng);
        let output = path();

        let coefficients = output.coefficients(4).unwrap();
        let fitted = output.predict(&x).unwrap();
        for model in 0..output.n_fits {
            let expected: Array1<f64> =
                x.dot(&coefficients.column(model)) + output.intercepts[model];
            assert_abs_diff_eq!(fitted.column(model), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn rejects_out_of_range_predictors() {
        assert!(matches!(
            path().coefficients(2),
            Err(ElasticNetError::MalformedOutput(_))
        ));
    }

    #[test]
    fn rejects_counts_beyond_storage() {
        let mut output = path();
        output.active_counts[2] = 5;

        assert!(matches!(
            output.coefficients(4),
            Err(ElasticNetError::MalformedOutput(_))
        ));
    }

    #[test]
    fn rejects_more_fits_than_storage() {
        let mut output = path();
        output.n_fits = 5;

        assert!(output.coefficients(4).is_err());
    }
}
