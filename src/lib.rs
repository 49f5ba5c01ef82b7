//! Aquiflow - transient groundwater flow to a pumping well in radially
//! zoned aquifers
//!
//! The head is solved in Laplace space for concentric zones of constant
//! transmissivity and storativity and transformed back to the time domain
//! with the Stehfest algorithm. On top of the zoned solver sit the Theis
//! solution and the extended Theis solutions for log-normal 2D
//! transmissivity and 3D conductivity fields, next to their closed-form
//! steady-state (Thiem) counterparts.

pub mod domain;
pub mod engine;
pub mod error;
pub mod laplace;
pub mod utilities;

// Re-export commonly used types
pub use domain::simulation::{
    diskmodel, ext_theis_2d, ext_theis_3d, theis, PartitionParams, SimulationParams,
    SimulationResult,
};
pub use error::{FlowError, FlowResult};

pub mod prelude {
    //! Common imports for using the Aquiflow library
    pub use crate::domain::{
        diskmodel, ext_theis_2d, ext_theis_3d, theis, PartitionParams, SimulationParams,
        SimulationResult, ZonedAquifer, ZonedLaplaceSolver,
    };
    pub use crate::error::{FlowError, FlowResult};
    pub use crate::laplace::{stehfest, LaplaceFunction, DEFAULT_STEHFEST_ORDER};
    pub use crate::utilities::analytical::{ext_thiem_2d, ext_thiem_3d, thiem, TheisSolution};
    pub use crate::utilities::upscaling::{
        ConductivityField, TransmissivityField, WellConductivity,
    };
}
