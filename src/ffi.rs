//! Binding to the Fortran `elnet` routine of glmnet
//!
//! Requires the `fortran` feature and a `libglmnet` compiled from `glmnet.f`. Set
//! `GLMNET_LIB_DIR` if the library is not on the default search path.

use std::convert::TryFrom;
use std::os::raw::{c_double, c_int};

use ndarray::{Array1, Array2, ArrayView2, ShapeBuilder};

use crate::error::{ElasticNetError, Result};
use crate::output::ElnetOutput;
use crate::solver::{ElnetArgs, ElnetSolver};

extern "C" {
    fn elnet_(
        ka: *const c_int,
        parm: *const c_double,
        no: *const c_int,
        ni: *const c_int,
        x: *mut c_double,
        y: *mut c_double,
        w: *mut c_double,
        jd: *const c_int,
        vp: *mut c_double,
        ne: *const c_int,
        nx: *const c_int,
        nlam: *const c_int,
        flmin: *const c_double,
        ulam: *const c_double,
        thr: *const c_double,
        isd: *const c_int,
        lmu: *mut c_int,
        a0: *mut c_double,
        ca: *mut c_double,
        ia: *mut c_int,
        nin: *mut c_int,
        rsq: *mut c_double,
        alm: *mut c_double,
        nlp: *mut c_int,
        jerr: *mut c_int,
    );
}

/// [`ElnetSolver`] backed by the compiled glmnet library
#[derive(Clone, Copy, Debug, Default)]
pub struct FortranSolver;

impl ElnetSolver for FortranSolver {
    fn elnet(&self, args: &ElnetArgs<'_>) -> Result<ElnetOutput> {
        args.check()?;

        let (n_observations, n_predictors) = args.predictors.dim();
        let nx = args.memlimit;
        let nlam = args.n_lambdas;
        let ca_len = nx
            .checked_mul(nlam)
            .ok_or(ElasticNetError::IntegerOverflow(nx))?;

        // elnet overwrites x, y, w and vp
        let mut x = column_major(args.predictors);
        let mut y = args.target.to_vec();
        let mut w = args.weights.to_vec();
        let mut vp = args.penalties.to_vec();
        let jd = args
            .exclusion
            .iter()
            .map(|&index| fortran_int(index))
            .collect::<Result<Vec<_>>>()?;
        let ulam = match args.lambdas {
            Some(lambdas) => lambdas.to_vec(),
            None => vec![0.0],
        };

        let ka = args.update.code();
        let no = fortran_int(n_observations)?;
        let ni = fortran_int(n_predictors)?;
        let ne = fortran_int(args.largest)?;
        let nx_ = fortran_int(nx)?;
        let nlam_ = fortran_int(nlam)?;
        let isd = c_int::from(args.standardize);

        let mut a0 = vec![0.0; nlam];
        let mut ca = vec![0.0; ca_len];
        let mut ia = vec![0; nx];
        let mut nin = vec![0; nlam];
        let mut rsq = vec![0.0; nlam];
        let mut alm = vec![0.0; nlam];
        let (mut lmu, mut nlp, mut jerr): (c_int, c_int, c_int) = (0, 0, 0);

        // SAFETY: every buffer is owned here and sized as glmnet.f documents for the given
        // no, ni, nx and nlam. `args.check()` guarantees jd holds 1 + jd[0] indices in
        // 1..=ni and, for flmin >= 1, ulam holds nlam lambdas. Otherwise ulam is never read.
        unsafe {
            elnet_(
                &ka,
                &args.balance,
                &no,
                &ni,
                x.as_mut_ptr(),
                y.as_mut_ptr(),
                w.as_mut_ptr(),
                jd.as_ptr(),
                vp.as_mut_ptr(),
                &ne,
                &nx_,
                &nlam_,
                &args.flmin,
                ulam.as_ptr(),
                &args.threshold,
                &isd,
                &mut lmu,
                a0.as_mut_ptr(),
                ca.as_mut_ptr(),
                ia.as_mut_ptr(),
                nin.as_mut_ptr(),
                rsq.as_mut_ptr(),
                alm.as_mut_ptr(),
                &mut nlp,
                &mut jerr,
            );
        }

        Ok(ElnetOutput {
            n_fits: from_fortran("lmu", lmu)?,
            intercepts: Array1::from(a0),
            compressed_coefficients: Array2::from_shape_vec((nx, nlam).f(), ca)?,
            active_indices: ia
                .into_iter()
                .map(|index| from_fortran("ia", index))
                .collect::<Result<Array1<usize>>>()?,
            active_counts: nin
                .into_iter()
                .map(|count| from_fortran("nin", count))
                .collect::<Result<Array1<usize>>>()?,
            r_squared: Array1::from(rsq),
            lambdas: Array1::from(alm),
            n_passes: from_fortran("nlp", nlp)?,
            status: jerr,
        })
    }
}

/// Flattens `x` in Fortran (column-major) order
fn column_major(x: ArrayView2<'_, f64>) -> Vec<f64> {
    x.t().iter().copied().collect()
}

fn fortran_int(value: usize) -> Result<c_int> {
    c_int::try_from(value).map_err(|_| ElasticNetError::IntegerOverflow(value))
}

fn from_fortran(what: &str, value: c_int) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        ElasticNetError::MalformedOutput(format!("{} is negative ({})", what, value))
    })
}
