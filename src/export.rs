//! CSV export of per-run averages.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use log::debug;
use serde::Serialize;

use crate::data::{Curve, DatasetIndex};
use crate::error::{Error, Result};

/// One exported row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow<'a> {
    pub reynolds: f64,
    pub airfoil: &'a str,
    pub angle_deg: f64,
    pub avg_lift: f64,
    pub avg_drag: f64,
    pub samples: usize,
    pub source: &'a str,
}

impl<'a> From<&'a Curve> for SummaryRow<'a> {
    fn from(curve: &'a Curve) -> Self {
        SummaryRow {
            reynolds: curve.reynolds(),
            airfoil: curve.airfoil().as_str(),
            angle_deg: curve.angle_deg(),
            avg_lift: curve.avg_lift(),
            avg_drag: curve.avg_drag(),
            samples: curve.series().len(),
            source: curve.source().unwrap_or(""),
        }
    }
}

/// Rows for every run, ordered by Reynolds, airfoil, then angle.
pub fn summary_rows(index: &DatasetIndex) -> Vec<SummaryRow<'_>> {
    index
        .reynolds_numbers()
        .into_iter()
        .flat_map(|re| index.curves_at(re))
        .map(SummaryRow::from)
        .collect()
}

/// Write the summary as CSV with a header row.
pub fn write_summary<W: Write>(index: &DatasetIndex, writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in summary_rows(index) {
        writer.serialize(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the summary CSV to `path`, replacing any existing file.
pub fn write_summary_file(index: &DatasetIndex, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    debug!(
        "Writing {} summary rows to {}",
        index.len(),
        path.display()
    );
    write_summary(index, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Sample, TimeSeries};

    fn run(airfoil: &str, angle: f64, reynolds: f64) -> Curve {
        let series = TimeSeries::from_samples(vec![
            Sample { time: 0.0, drag: 0.5, lift: 1.0 },
            Sample { time: 1.0, drag: 1.5, lift: 2.0 },
        ]);
        Curve::new(series, airfoil.into(), angle, reynolds)
            .unwrap()
            .with_source(format!("{airfoil}_i{angle}.dat"))
    }

    #[test]
    fn test_rows_are_grouped_and_sorted() {
        let mut index = DatasetIndex::new();
        index.insert(run("naca_2412", 5.0, 1e5)).unwrap();
        index.insert(run("naca_2412", -3.0, 5e4)).unwrap();
        index.insert(run("naca_0012", 0.0, 5e4)).unwrap();

        let keys: Vec<(f64, &str, f64)> = summary_rows(&index)
            .iter()
            .map(|r| (r.reynolds, r.airfoil, r.angle_deg))
            .collect();
        assert_eq!(
            keys,
            vec![(5e4, "naca_0012", 0.0), (5e4, "naca_2412", -3.0), (1e5, "naca_2412", 5.0)]
        );
    }

    #[test]
    fn test_csv_output() {
        let mut index = DatasetIndex::new();
        index.insert(run("naca_0012", 2.0, 5e4)).unwrap();

        let mut buf = Vec::new();
        write_summary(&index, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "reynolds,airfoil,angle_deg,avg_lift,avg_drag,samples,source");
        assert_eq!(lines[1], "50000.0,naca_0012,2.0,1.5,1.0,2,naca_0012_i2.dat");
        assert_eq!(lines.len(), 2);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_failure_is_an_export_error() {
        let mut index = DatasetIndex::new();
        index.insert(run("naca_0012", 2.0, 5e4)).unwrap();

        let err = write_summary(&index, BrokenPipe).unwrap_err();
        assert!(matches!(err, Error::Export(_)));
    }
}
