//! Numerical building blocks: special functions and the banded solver

pub mod banded;
pub mod bessel;
pub mod expint;

pub use banded::BandedMatrix;
pub use bessel::{i0, i1, k0, k0_k1, k1, BesselSet};
pub use expint::{exp1, expi};
