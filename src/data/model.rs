use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// OrderedF64 – a float usable as a BTreeMap key
// ---------------------------------------------------------------------------

/// An `f64` ordered by `total_cmp`, used for angle and Reynolds keys.
///
/// The only constructor is [`OrderedF64::new`], which folds `-0.0` into
/// `0.0` so the two never index separately. Finiteness is checked where
/// values enter the crate (filename and table parsing, config validation).
#[derive(Debug, Clone, Copy)]
pub struct OrderedF64(f64);

impl OrderedF64 {
    pub fn new(value: f64) -> Self {
        OrderedF64(value + 0.0)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for OrderedF64 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderedF64 {}

impl PartialOrd for OrderedF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::hash::Hash for OrderedF64 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for OrderedF64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AirfoilId
// ---------------------------------------------------------------------------

/// Opaque airfoil identifier such as `naca_2412`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirfoilId(String);

impl AirfoilId {
    pub fn new(id: impl Into<String>) -> Self {
        AirfoilId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AirfoilId {
    fn from(id: &str) -> Self {
        AirfoilId::new(id)
    }
}

impl fmt::Display for AirfoilId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// TimeSeries – the samples of one run
// ---------------------------------------------------------------------------

/// One row of a run table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub drag: f64,
    pub lift: f64,
}

/// Samples in source order. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    samples: Vec<Sample>,
}

impl TimeSeries {
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        TimeSeries { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn drag(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.drag)
    }

    pub fn lift(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.lift)
    }
}

impl FromIterator<Sample> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        TimeSeries::from_samples(iter.into_iter().collect())
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    sum / n as f64
}

// ---------------------------------------------------------------------------
// Curve – one run with its derived averages
// ---------------------------------------------------------------------------

/// One run: identity, time series and time-averaged lift/drag.
///
/// The averages are computed once in [`Curve::new`]. Identity is the
/// `(reynolds, airfoil, angle_deg)` triple; [`Curve::label`] is for display
/// only.
#[derive(Debug, Clone)]
pub struct Curve {
    airfoil: AirfoilId,
    angle_deg: f64,
    reynolds: f64,
    series: TimeSeries,
    avg_lift: f64,
    avg_drag: f64,
    source: Option<String>,
}

impl Curve {
    /// Build a curve, failing with [`Error::EmptySeries`] on a zero-sample run.
    pub fn new(series: TimeSeries, airfoil: AirfoilId, angle_deg: f64, reynolds: f64) -> Result<Self> {
        if series.is_empty() {
            return Err(Error::EmptySeries {
                run: run_label(reynolds, angle_deg),
            });
        }
        let avg_lift = mean(series.lift());
        let avg_drag = mean(series.drag());
        Ok(Curve {
            airfoil,
            angle_deg: angle_deg + 0.0,
            reynolds: reynolds + 0.0,
            series,
            avg_lift,
            avg_drag,
            source: None,
        })
    }

    /// Attach the name of the file this run was read from.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn airfoil(&self) -> &AirfoilId {
        &self.airfoil
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn reynolds(&self) -> f64 {
        self.reynolds
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn avg_lift(&self) -> f64 {
        self.avg_lift
    }

    pub fn avg_drag(&self) -> f64 {
        self.avg_drag
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Display label, e.g. `reynolds50000-angle-3`.
    pub fn label(&self) -> String {
        run_label(self.reynolds, self.angle_deg)
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.airfoil, self.label())
    }
}

fn run_label(reynolds: f64, angle_deg: f64) -> String {
    format!("reynolds{:.0}-angle{}", reynolds, angle_deg + 0.0)
}
