//! Fill-level forecasting and simulation.
//!
//! - [`predict_fill_levels`] / [`FillPredictor`] — linear extrapolation,
//!   clipped to `[0, 100]`
//! - [`advance_simulation`] — random fill increase for one bin per step

mod forecast;
mod simulation;

pub use forecast::{predict_fill_levels, FillHistory, FillPredictor};
pub use simulation::{advance_simulation, SimulationStep, MAX_FILL_INCREASE, MIN_FILL_INCREASE};
