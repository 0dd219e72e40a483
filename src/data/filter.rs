use std::collections::BTreeSet;

use super::model::{AirfoilId, Curve};

// ---------------------------------------------------------------------------
// Selection: which runs take part in a comparison
// ---------------------------------------------------------------------------

/// Restricts comparison output to some airfoils and/or an angle interval.
///
/// An empty airfoil set means "every airfoil". Angle bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub airfoils: BTreeSet<AirfoilId>,
    pub min_angle: Option<f64>,
    pub max_angle: Option<f64>,
}

impl Selection {
    /// Selection that keeps every run.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_airfoils<I, A>(mut self, airfoils: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AirfoilId>,
    {
        self.airfoils.extend(airfoils.into_iter().map(Into::into));
        self
    }

    pub fn with_angle_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_angle = min;
        self.max_angle = max;
        self
    }

    pub fn includes_airfoil(&self, airfoil: &AirfoilId) -> bool {
        self.airfoils.is_empty() || self.airfoils.contains(airfoil)
    }

    pub fn includes_angle(&self, angle_deg: f64) -> bool {
        self.min_angle.map_or(true, |min| angle_deg >= min)
            && self.max_angle.map_or(true, |max| angle_deg <= max)
    }

    /// Whether a run passes both the airfoil and the angle filter.
    pub fn includes(&self, curve: &Curve) -> bool {
        self.includes_airfoil(curve.airfoil()) && self.includes_angle(curve.angle_deg())
    }
}

/// Keep the curves passing `selection`, preserving order.
pub fn select<'a>(curves: impl IntoIterator<Item = &'a Curve>, selection: &Selection) -> Vec<&'a Curve> {
    curves.into_iter().filter(|c| selection.includes(c)).collect()
}
