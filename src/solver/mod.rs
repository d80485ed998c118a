//! Linear separator solvers
//!
//! The default trainer runs Sequential Minimal Optimization (Platt, 1998) on
//! the dual of the soft-margin SVM with a linear kernel.

pub mod smo;

pub use self::smo::*;
