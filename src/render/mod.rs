//! Rendering of runs and angle sweeps to image files.
//!
//! The core only decides *what* is drawn and under which semantic name;
//! [`Renderer`] implementations decide how. [`PlotRenderer`] draws with
//! `plotters` (`.svg` → vector, anything else → bitmap).
//!
//! Artifact layout under an output directory, per Reynolds number:
//!
//! ```text
//! re50000/
//! ├── naca_2412-angle-3/   drag.png  lift.png   ← one run vs time
//! ├── _combined/           drag.png  lift.png   ← all runs vs time
//! └── _angles/             drag.png  lift.png   ← averaged vs angle
//! ```

mod plot;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use plot::PlotRenderer;

use crate::compare::AngleSweep;
use crate::config::ImageFormat;
use crate::data::{AirfoilId, Curve, Sample};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Quantity
// ---------------------------------------------------------------------------

/// Which force a plot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Drag,
    Lift,
}

impl Quantity {
    pub const ALL: [Quantity; 2] = [Quantity::Drag, Quantity::Lift];

    pub fn of(self, sample: &Sample) -> f64 {
        match self {
            Quantity::Drag => sample.drag,
            Quantity::Lift => sample.lift,
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Quantity::Drag => "Drag [N]",
            Quantity::Lift => "Lift [N]",
        }
    }

    /// File stem of the artifact, `drag` or `lift`.
    pub fn name(self) -> &'static str {
        match self {
            Quantity::Drag => "drag",
            Quantity::Lift => "lift",
        }
    }
}

// ---------------------------------------------------------------------------
// Options and artifact names
// ---------------------------------------------------------------------------

/// Options of a single render call.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Where to write the image. `None` renders nothing.
    pub target_path: Option<PathBuf>,
    /// Announce the finished artifact at `info` level for the user to open.
    pub display_inline: bool,
    /// Width × height in pixels.
    pub figure_size: (u32, u32),
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            target_path: None,
            display_inline: false,
            figure_size: (2000, 1000),
        }
    }
}

impl PlotOptions {
    pub fn to_path(path: impl Into<PathBuf>, figure_size: (u32, u32)) -> Self {
        Self {
            target_path: Some(path.into()),
            display_inline: false,
            figure_size,
        }
    }
}

/// Semantic name of a rendered artifact.
#[derive(Debug, Clone, Copy)]
pub enum Artifact<'a> {
    /// One run against time.
    Run(&'a Curve, Quantity),
    /// Every run of a Reynolds number against time.
    Combined(Quantity),
    /// Averaged values against angle, one line per airfoil.
    Angles(Quantity),
}

impl Artifact<'_> {
    /// Path of the artifact below `output_dir` for runs at `reynolds`.
    pub fn path(&self, output_dir: &Path, reynolds: f64, format: ImageFormat) -> PathBuf {
        let (folder, quantity) = match self {
            Artifact::Run(curve, q) => {
                (format!("{}-angle{}", curve.airfoil(), curve.angle_deg()), *q)
            }
            Artifact::Combined(q) => ("_combined".to_string(), *q),
            Artifact::Angles(q) => ("_angles".to_string(), *q),
        };
        output_dir
            .join(format!("re{reynolds:.0}"))
            .join(folder)
            .join(quantity.name())
            .with_extension(format.extension())
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Draws runs and sweeps. Each method returns the written path, or `None`
/// when `options.target_path` is unset.
pub trait Renderer {
    /// One run's `quantity` against time.
    fn time_series(&self, curve: &Curve, quantity: Quantity, options: &PlotOptions) -> Result<Option<PathBuf>>;

    /// Several runs' `quantity` against time on shared axes.
    fn overlay(&self, curves: &[&Curve], quantity: Quantity, options: &PlotOptions) -> Result<Option<PathBuf>>;

    /// Averaged `quantity` against angle, one line per airfoil.
    fn sweeps(
        &self,
        sweeps: &BTreeMap<AirfoilId, AngleSweep>,
        quantity: Quantity,
        options: &PlotOptions,
    ) -> Result<Option<PathBuf>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TimeSeries;

    #[test]
    fn test_artifact_paths_follow_layout() {
        let series = TimeSeries::from_samples(vec![Sample { time: 0.0, drag: 1.0, lift: 2.0 }]);
        let curve = Curve::new(series, "naca_2412".into(), -3.0, 50_000.0).unwrap();
        let out = Path::new("output");

        assert_eq!(
            Artifact::Run(&curve, Quantity::Drag).path(out, 50_000.0, ImageFormat::Png),
            PathBuf::from("output/re50000/naca_2412-angle-3/drag.png")
        );
        assert_eq!(
            Artifact::Combined(Quantity::Lift).path(out, 50_000.0, ImageFormat::Jpg),
            PathBuf::from("output/re50000/_combined/lift.jpg")
        );
        assert_eq!(
            Artifact::Angles(Quantity::Drag).path(out, 1e5, ImageFormat::Svg),
            PathBuf::from("output/re100000/_angles/drag.svg")
        );
    }

    #[test]
    fn test_quantity_picks_field() {
        let sample = Sample { time: 0.0, drag: 1.5, lift: -0.5 };
        assert_eq!(Quantity::Drag.of(&sample), 1.5);
        assert_eq!(Quantity::Lift.of(&sample), -0.5);
        assert_eq!(Quantity::Lift.axis_label(), "Lift [N]");
    }
}
