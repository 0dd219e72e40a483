//! Helpers for writing run directories in integration tests.

use std::fs;
use std::path::Path;

/// Write a tab-separated run file with `time / dragForce / liftForce` rows.
pub fn write_run(dir: &Path, name: &str, rows: &[(f64, f64, f64)]) {
    let mut text = String::from("time\tdragForce\tliftForce\n");
    for (time, drag, lift) in rows {
        text.push_str(&format!("{time}\t{drag}\t{lift}\n"));
    }
    fs::write(dir.join(name), text).unwrap();
}

/// Two-sample run whose means are exactly `drag` and `lift`.
pub fn write_steady_run(dir: &Path, name: &str, drag: f64, lift: f64) {
    write_run(
        dir,
        name,
        &[(0.0, drag - 0.25, lift - 0.5), (0.1, drag + 0.25, lift + 0.5)],
    );
}
