//! h2trainer-sim: Qualitative gas-dispersion model.
//!
//! A coarse 2D concentration field that shows buoyant rise, lateral mixing
//! and ceiling ventilation. It is a teaching visual, not a CFD solver.

pub mod driver;
pub mod grid;
pub mod params;
pub mod render;
pub mod scheduler;
pub mod simulator;

pub use driver::SimulationDriver;
pub use params::DispersionParams;
pub use simulator::{DispersionSimulator, RoomLayout, SimState};
