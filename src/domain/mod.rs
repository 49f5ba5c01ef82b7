//! Aquifer models and the solvers built on them

pub mod aquifer;
pub mod simulation;
pub mod zoned;

pub use aquifer::{InnerBoundary, OuterBoundary, ZonedAquifer};
pub use simulation::{
    diskmodel, ext_theis_2d, ext_theis_3d, theis, PartitionParams, SimulationParams,
    SimulationResult,
};
pub use zoned::ZonedLaplaceSolver;
