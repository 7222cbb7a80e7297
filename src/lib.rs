#![doc = include_str!("../README.md")]

mod algorithm;
pub mod error;
#[cfg(feature = "fortran")]
pub mod ffi;
mod hyperparams;
mod output;
mod solver;

pub use algorithm::elastic_net;
pub use error::{ElasticNetError, ErrorKind, Result};
pub use hyperparams::{
    ElasticNetParams, ElasticNetValidParams, RegularizationPath, UpdateMode, DEFAULT_FLMIN,
    DEFAULT_NUMMODELS, DEFAULT_THRESHOLD, EXPLICIT_PATH_FLMIN,
};
pub use output::ElnetOutput;
pub use solver::{ElnetArgs, ElnetSolver};

#[cfg(feature = "fortran")]
pub use ffi::FortranSolver;
