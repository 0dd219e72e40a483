use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::ops::Range;
use std::path::{Path, PathBuf};

use log::{debug, info};
use plotters::prelude::*;

use super::{PlotOptions, Quantity, Renderer};
use crate::color::{generate_palette, ColorMap};
use crate::compare::AngleSweep;
use crate::data::{AirfoilId, Curve};
use crate::error::{Error, Result};

const SINGLE_RUN_COLOR: RGBColor = RGBColor(31, 119, 180);

/// One drawn line.
struct Line {
    label: String,
    color: RGBColor,
    points: Vec<(f64, f64)>,
    markers: bool,
}

struct Axes<'a> {
    title: String,
    x_label: &'a str,
    y_label: &'a str,
}

/// [`Renderer`] drawing static images with `plotters`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlotRenderer;

impl Renderer for PlotRenderer {
    fn time_series(&self, curve: &Curve, quantity: Quantity, options: &PlotOptions) -> Result<Option<PathBuf>> {
        let Some(path) = options.target_path.as_deref() else {
            return Ok(None);
        };
        let line = Line {
            label: curve.to_string(),
            color: SINGLE_RUN_COLOR,
            points: curve.series().samples().iter().map(|s| (s.time, quantity.of(s))).collect(),
            markers: false,
        };
        let axes = Axes {
            title: curve.to_string(),
            x_label: "Time [s]",
            y_label: quantity.axis_label(),
        };
        render(path, options, &axes, &[line])
    }

    fn overlay(&self, curves: &[&Curve], quantity: Quantity, options: &PlotOptions) -> Result<Option<PathBuf>> {
        let Some(path) = options.target_path.as_deref() else {
            return Ok(None);
        };
        let lines: Vec<Line> = curves
            .iter()
            .zip(generate_palette(curves.len()))
            .map(|(curve, color)| Line {
                label: curve.to_string(),
                color,
                points: curve.series().samples().iter().map(|s| (s.time, quantity.of(s))).collect(),
                markers: false,
            })
            .collect();
        let axes = Axes {
            title: format!("{} of all runs", quantity.name()),
            x_label: "Time [s]",
            y_label: quantity.axis_label(),
        };
        render(path, options, &axes, &lines)
    }

    fn sweeps(
        &self,
        sweeps: &BTreeMap<AirfoilId, AngleSweep>,
        quantity: Quantity,
        options: &PlotOptions,
    ) -> Result<Option<PathBuf>> {
        let Some(path) = options.target_path.as_deref() else {
            return Ok(None);
        };
        let colors = ColorMap::new(sweeps.keys());
        let lines: Vec<Line> = sweeps
            .iter()
            .map(|(airfoil, sweep)| Line {
                label: airfoil.to_string(),
                color: colors.color_for(airfoil),
                points: match quantity {
                    Quantity::Drag => sweep.drag_points().collect(),
                    Quantity::Lift => sweep.lift_points().collect(),
                },
                markers: true,
            })
            .collect();
        let reynolds = sweeps.values().next().map(|s| s.reynolds).unwrap_or_default();
        let axes = Axes {
            title: format!("Time-averaged {} (Re {reynolds:.0})", quantity.name()),
            x_label: "Angle [deg]",
            y_label: quantity.axis_label(),
        };
        render(path, options, &axes, &lines)
    }
}

// =================================================================================================
// Drawing
// =================================================================================================

fn render(path: &Path, options: &PlotOptions, axes: &Axes<'_>, lines: &[Line]) -> Result<Option<PathBuf>> {
    if lines.iter().all(|l| l.points.is_empty()) {
        return Err(Error::Render {
            path: path.to_path_buf(),
            message: "no data to plot".to_string(),
        });
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let size = options.figure_size;
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("png");
    let drawn = match ext {
        "svg" => draw(SVGBackend::new(path, size), axes, lines),
        _ => draw(BitMapBackend::new(path, size), axes, lines),
    };
    drawn.map_err(|e| Error::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if options.display_inline {
        info!("Plot ready: {}", path.display());
    } else {
        debug!("Wrote {}", path.display());
    }
    Ok(Some(path.to_path_buf()))
}

fn draw<DB: DrawingBackend>(backend: DB, axes: &Axes<'_>, lines: &[Line]) -> std::result::Result<(), Box<dyn StdError>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = padded_range(lines.iter().flat_map(|l| l.points.iter().map(|p| p.0)), 0.0);
    let y_range = padded_range(lines.iter().flat_map(|l| l.points.iter().map(|p| p.1)), 0.1);

    let mut chart = ChartBuilder::on(&root)
        .caption(&axes.title, ("sans-serif", 40).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(axes.x_label)
        .y_desc(axes.y_label)
        .draw()?;

    for line in lines {
        let color = line.color;
        chart
            .draw_series(LineSeries::new(
                line.points.iter().copied(),
                ShapeStyle::from(&color).stroke_width(2),
            ))?
            .label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));

        if line.markers {
            chart.draw_series(line.points.iter().map(|&p| Circle::new(p, 4, color.filled())))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// `min..max` of `values` widened by `pad` of the span. A single value
/// gets a unit-wide window so the axis is never degenerate.
fn padded_range(values: impl Iterator<Item = f64>, pad: f64) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let span = max - min;
    if span <= f64::EPSILON * max.abs().max(1.0) {
        return (min - 0.5)..(max + 0.5);
    }
    (min - span * pad)..(max + span * pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Sample, TimeSeries};

    fn curve(angle: f64) -> Curve {
        let series = TimeSeries::from_samples(
            (0..20)
                .map(|i| {
                    let t = i as f64 * 0.1;
                    Sample { time: t, drag: 0.1 + 0.01 * t.sin(), lift: angle * 0.1 + 0.05 * t.cos() }
                })
                .collect(),
        );
        Curve::new(series, "naca_2412".into(), angle, 50_000.0).unwrap()
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range([1.0, 3.0].into_iter(), 0.0), 1.0..3.0);
        assert_eq!(padded_range([1.0, 3.0].into_iter(), 0.5), 0.0..4.0);
        assert_eq!(padded_range([2.0].into_iter(), 0.1), 1.5..2.5);
        assert_eq!(padded_range(std::iter::empty(), 0.1), 0.0..1.0);
    }

    #[test]
    fn test_no_target_renders_nothing() {
        let out = PlotRenderer
            .time_series(&curve(5.0), Quantity::Lift, &PlotOptions::default())
            .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_empty_overlay_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = PlotOptions::to_path(dir.path().join("empty.svg"), (400, 300));
        let err = PlotRenderer.overlay(&[], Quantity::Drag, &options).unwrap_err();
        assert!(matches!(err, Error::Render { .. }));
    }

    #[test]
    #[ignore = "needs a system sans-serif font"]
    fn test_renders_png_and_svg() {
        let dir = tempfile::tempdir().unwrap();
        let runs = [curve(-3.0), curve(5.0)];
        let refs: Vec<&Curve> = runs.iter().collect();

        let png = PlotOptions::to_path(dir.path().join("nested/run.png"), (800, 400));
        let written = PlotRenderer.time_series(&runs[0], Quantity::Drag, &png).unwrap();
        assert!(written.unwrap().exists());

        let svg = PlotOptions::to_path(dir.path().join("overlay.svg"), (800, 400));
        let written = PlotRenderer.overlay(&refs, Quantity::Lift, &svg).unwrap();
        assert!(written.unwrap().exists());
    }
}
