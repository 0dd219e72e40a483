//! aerosweep: time-averaged lift and drag from aerodynamic run files.
//!
//! One run file holds a time series of drag and lift for one airfoil at one
//! angle of attack; its filename carries the identity (`naca_2412_i-3.dat`)
//! and the directory stands for one Reynolds number. Runs are indexed
//! `reynolds → airfoil → angle`, averaged once, and turned into angle
//! sweeps for comparison plots.
//!
//! ```rust,no_run
//! use aerosweep::config::LoadConfig;
//! use aerosweep::data::{DatasetIndex, TableLoader};
//! use aerosweep::compare::sweep_for;
//!
//! # fn main() -> aerosweep::Result<()> {
//! let mut index = DatasetIndex::new();
//! index.load(&LoadConfig { directory: "input".into(), reynolds: 50_000.0 }, &TableLoader)?;
//!
//! let sweep = sweep_for(&index, 50_000.0, &"naca_2412".into())?;
//! println!("{:?} -> {:?}", sweep.angles, sweep.avg_lifts);
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod compare;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod render;

pub use error::{Error, NameFault, Result};
