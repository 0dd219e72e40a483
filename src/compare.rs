//! Angle sweeps: averaged lift and drag against angle of attack, one per
//! airfoil at a given Reynolds number.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::{select, Selection};
use crate::data::{AirfoilId, Curve, DatasetIndex};
use crate::error::{Error, Result};

/// Parallel, angle-ascending arrays for one `(reynolds, airfoil)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleSweep {
    pub reynolds: f64,
    pub airfoil: AirfoilId,
    pub angles: Vec<f64>,
    pub avg_lifts: Vec<f64>,
    pub avg_drags: Vec<f64>,
}

impl AngleSweep {
    /// Build from curves already sorted by angle.
    fn from_sorted(reynolds: f64, airfoil: AirfoilId, curves: &[&Curve]) -> Self {
        AngleSweep {
            reynolds,
            airfoil,
            angles: curves.iter().map(|c| c.angle_deg()).collect(),
            avg_lifts: curves.iter().map(|c| c.avg_lift()).collect(),
            avg_drags: curves.iter().map(|c| c.avg_drag()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// `(angle, avg_lift)` points.
    pub fn lift_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.angles.iter().copied().zip(self.avg_lifts.iter().copied())
    }

    /// `(angle, avg_drag)` points.
    pub fn drag_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.angles.iter().copied().zip(self.avg_drags.iter().copied())
    }
}

/// Sweep of one airfoil. [`Error::NotFound`] when it has no runs at `reynolds`.
pub fn sweep_for(index: &DatasetIndex, reynolds: f64, airfoil: &AirfoilId) -> Result<AngleSweep> {
    let curves = index.curves_for(reynolds, airfoil);
    if curves.is_empty() {
        return Err(Error::NotFound {
            what: format!("{airfoil} (Re {reynolds})"),
        });
    }
    Ok(AngleSweep::from_sorted(reynolds, airfoil.clone(), &curves))
}

/// One sweep per airfoil known at `reynolds`.
pub fn all_sweeps(index: &DatasetIndex, reynolds: f64) -> BTreeMap<AirfoilId, AngleSweep> {
    selected_sweeps(index, reynolds, &Selection::all())
}

/// Sweeps restricted by `selection`. Airfoils left with no angle are omitted.
pub fn selected_sweeps(
    index: &DatasetIndex,
    reynolds: f64,
    selection: &Selection,
) -> BTreeMap<AirfoilId, AngleSweep> {
    index
        .all_airfoils(reynolds)
        .into_iter()
        .filter(|airfoil| selection.includes_airfoil(airfoil))
        .filter_map(|airfoil| {
            let curves = select(index.curves_for(reynolds, airfoil), selection);
            if curves.is_empty() {
                return None;
            }
            Some((
                airfoil.clone(),
                AngleSweep::from_sorted(reynolds, airfoil.clone(), &curves),
            ))
        })
        .collect()
}
