use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::loader::SeriesLoader;
use super::model::{AirfoilId, Curve, OrderedF64};
use super::name::{parse_path, parse_reynolds_dir};
use crate::config::LoadConfig;
use crate::error::{Error, Result};

/// Directory entries that are never run files.
const SYSTEM_FILES: &[&str] = &["thumbs.db", "desktop.ini"];

type AngleMap = BTreeMap<OrderedF64, usize>;
type AirfoilMap = BTreeMap<AirfoilId, AngleMap>;

// ---------------------------------------------------------------------------
// DatasetIndex
// ---------------------------------------------------------------------------

/// All loaded runs, indexed `reynolds → airfoil → angle → Curve`.
///
/// Curves are owned by the flat `curves` list (insertion order); the tree
/// holds positions into it. `BTreeMap` keeps airfoils and angles sorted, so
/// queries never re-sort. The index only grows.
#[derive(Debug, Clone, Default)]
pub struct DatasetIndex {
    curves: Vec<Curve>,
    tree: BTreeMap<OrderedF64, AirfoilMap>,
}

impl DatasetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every run file of `config.directory` at `config.reynolds`.
    ///
    /// Files are processed in lexicographic filename order. The first
    /// failing file aborts the load; runs inserted before it stay in the
    /// index. Returns the number of runs added.
    pub fn load(&mut self, config: &LoadConfig, loader: &impl SeriesLoader) -> Result<usize> {
        if !(config.reynolds.is_finite() && config.reynolds > 0.0) {
            return Err(Error::Config(format!(
                "reynolds must be a positive number, got {}",
                config.reynolds
            )));
        }
        let files = run_files(&config.directory)?;
        info!(
            "Loading {} run files from {} (Re {})",
            files.len(),
            config.directory.display(),
            config.reynolds
        );

        for path in &files {
            self.load_file(path, config.reynolds, loader)?;
        }
        Ok(files.len())
    }

    /// Load each subdirectory of `root` named after a Reynolds number
    /// (`50000`, `re50000`, `Re_50000`). Other subdirectories are skipped.
    pub fn load_tree(&mut self, root: &Path, loader: &impl SeriesLoader) -> Result<usize> {
        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(root).map_err(|e| Error::io(root, e))? {
            let entry = entry.map_err(|e| Error::io(root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            match parse_reynolds_dir(&name) {
                Some(reynolds) => dirs.push((name, path, reynolds)),
                None => debug!("Skipping {name}: not a Reynolds directory"),
            }
        }
        dirs.sort_by(|a, b| a.0.cmp(&b.0));

        let mut total = 0;
        for (_, directory, reynolds) in dirs {
            total += self.load(&LoadConfig { directory, reynolds }, loader)?;
        }
        Ok(total)
    }

    fn load_file(&mut self, path: &Path, reynolds: f64, loader: &impl SeriesLoader) -> Result<()> {
        let file = file_name(path);
        info!("Processing {file}");

        let name = parse_path(path)?;
        self.check_free(reynolds, &name.airfoil, name.angle_deg, &file)?;

        let series = loader.load_series(path)?;
        let curve = Curve::new(series, name.airfoil, name.angle_deg, reynolds)
            .map_err(|err| match err {
                Error::EmptySeries { .. } => Error::EmptySeries { run: file.clone() },
                other => other,
            })?
            .with_source(file);
        self.insert(curve)
    }

    /// Add one curve. A second curve with the same `(reynolds, airfoil,
    /// angle)` is rejected with [`Error::DuplicateRun`] and nothing changes.
    pub fn insert(&mut self, curve: Curve) -> Result<()> {
        let source = curve.source().unwrap_or("<memory>").to_string();
        self.check_free(curve.reynolds(), curve.airfoil(), curve.angle_deg(), &source)?;

        let position = self.curves.len();
        self.tree
            .entry(OrderedF64::new(curve.reynolds()))
            .or_default()
            .entry(curve.airfoil().clone())
            .or_default()
            .insert(OrderedF64::new(curve.angle_deg()), position);
        self.curves.push(curve);
        Ok(())
    }

    fn check_free(&self, reynolds: f64, airfoil: &AirfoilId, angle_deg: f64, file: &str) -> Result<()> {
        let existing = self
            .angles(reynolds, airfoil)
            .and_then(|angles| angles.get(&OrderedF64::new(angle_deg)))
            .map(|&i| &self.curves[i]);

        match existing {
            Some(curve) => Err(Error::DuplicateRun {
                reynolds,
                airfoil: airfoil.to_string(),
                angle_deg,
                file: file.to_string(),
                existing: curve.source().unwrap_or("<memory>").to_string(),
            }),
            None => Ok(()),
        }
    }

    fn angles(&self, reynolds: f64, airfoil: &AirfoilId) -> Option<&AngleMap> {
        self.tree.get(&OrderedF64::new(reynolds))?.get(airfoil)
    }

    // -- Queries --

    /// All curves in insertion order.
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Reynolds numbers present, ascending.
    pub fn reynolds_numbers(&self) -> Vec<f64> {
        self.tree.keys().map(|k| k.get()).collect()
    }

    /// Airfoils present at `reynolds`, sorted. Empty when unknown.
    pub fn all_airfoils(&self, reynolds: f64) -> Vec<&AirfoilId> {
        self.tree
            .get(&OrderedF64::new(reynolds))
            .map(|airfoils| airfoils.keys().collect())
            .unwrap_or_default()
    }

    /// Curves of one airfoil at `reynolds`, by ascending angle.
    pub fn curves_for(&self, reynolds: f64, airfoil: &AirfoilId) -> Vec<&Curve> {
        self.angles(reynolds, airfoil)
            .map(|angles| angles.values().map(|&i| &self.curves[i]).collect())
            .unwrap_or_default()
    }

    /// Curves at `reynolds` for every airfoil, airfoil then angle ascending.
    pub fn curves_at(&self, reynolds: f64) -> Vec<&Curve> {
        self.tree
            .get(&OrderedF64::new(reynolds))
            .into_iter()
            .flat_map(|airfoils| airfoils.values())
            .flat_map(|angles| angles.values().map(|&i| &self.curves[i]))
            .collect()
    }

    pub fn curve(&self, reynolds: f64, airfoil: &AirfoilId, angle_deg: f64) -> Result<&Curve> {
        self.angles(reynolds, airfoil)
            .and_then(|angles| angles.get(&OrderedF64::new(angle_deg)))
            .map(|&i| &self.curves[i])
            .ok_or_else(|| Error::NotFound {
                what: format!("{airfoil} at {angle_deg} deg (Re {reynolds})"),
            })
    }
}

// ---------------------------------------------------------------------------
// Directory listing
// ---------------------------------------------------------------------------

/// Regular, non-hidden files of `dir`, sorted by filename.
pub fn run_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if !path.is_file() || is_system_entry(&name) {
            debug!("Skipping {name}");
            continue;
        }
        files.push(path);
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_system_entry(name: &str) -> bool {
    name.starts_with('.') || SYSTEM_FILES.iter().any(|s| name.eq_ignore_ascii_case(s))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Sample, TimeSeries};
    use std::fs;

    /// Serves a fixed series for every file; the file only needs to exist.
    struct ConstLoader(TimeSeries);

    impl SeriesLoader for ConstLoader {
        fn load_series(&self, _path: &Path) -> Result<TimeSeries> {
            Ok(self.0.clone())
        }
    }

    fn loader() -> ConstLoader {
        ConstLoader(TimeSeries::from_samples(vec![
            Sample { time: 0.0, drag: 1.0, lift: 2.0 },
            Sample { time: 1.0, drag: 3.0, lift: 4.0 },
        ]))
    }

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), "").unwrap();
        }
    }

    fn config(dir: &Path) -> LoadConfig {
        LoadConfig {
            directory: dir.to_path_buf(),
            reynolds: 50_000.0,
        }
    }

    #[test]
    fn test_angles_sorted_regardless_of_file_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["naca_2412_i5.dat", "naca_2412_i-3.dat", "naca_2412_i12.dat", "naca_2412_i0.dat"]);

        let mut index = DatasetIndex::new();
        assert_eq!(index.load(&config(dir.path()), &loader()).unwrap(), 4);

        let angles: Vec<f64> = index
            .curves_for(50_000.0, &"naca_2412".into())
            .iter()
            .map(|c| c.angle_deg())
            .collect();
        assert_eq!(angles, vec![-3.0, 0.0, 5.0, 12.0]);

        // Flat list follows filename order.
        let sources: Vec<_> = index.curves().iter().filter_map(|c| c.source()).collect();
        assert_eq!(
            sources,
            vec!["naca_2412_i-3.dat", "naca_2412_i0.dat", "naca_2412_i12.dat", "naca_2412_i5.dat"]
        );
    }

    #[test]
    fn test_hidden_and_system_entries_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &[".DS_Store", "Thumbs.db", "naca_0012_i2.dat"]);
        fs::create_dir(dir.path().join("plots")).unwrap();

        let mut index = DatasetIndex::new();
        assert_eq!(index.load(&config(dir.path()), &loader()).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_triple_is_rejected_without_partial_merge() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["a_naca_2412_i5.dat", "b_naca_2412_i5.dat"]);

        let mut index = DatasetIndex::new();
        let err = index.load(&config(dir.path()), &loader()).unwrap_err();
        match err {
            Error::DuplicateRun { file, existing, angle_deg, .. } => {
                assert_eq!(file, "b_naca_2412_i5.dat");
                assert_eq!(existing, "a_naca_2412_i5.dat");
                assert_eq!(angle_deg, 5.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(index.len(), 1);
        assert_eq!(index.curve(50_000.0, &"naca_2412".into(), 5.0).unwrap().source(), Some("a_naca_2412_i5.dat"));
    }

    #[test]
    fn test_same_angle_at_other_reynolds_is_not_a_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["naca_2412_i5.dat"]);

        let mut index = DatasetIndex::new();
        index.load(&config(dir.path()), &loader()).unwrap();
        index
            .load(&LoadConfig { directory: dir.path().to_path_buf(), reynolds: 100_000.0 }, &loader())
            .unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.reynolds_numbers(), vec![50_000.0, 100_000.0]);
    }

    #[test]
    fn test_malformed_name_stops_load_and_keeps_earlier_runs() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["a_naca_2412_i1.dat", "garbage.dat", "naca_2412_i9.dat"]);

        let mut index = DatasetIndex::new();
        let err = index.load(&config(dir.path()), &loader()).unwrap_err();
        assert!(matches!(&err, Error::MalformedName { file, .. } if file == "garbage.dat"));
        assert_eq!(index.len(), 1);
        assert!(index.curve(50_000.0, &"naca_2412".into(), 9.0).is_err());
    }

    #[test]
    fn test_empty_run_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["naca_2412_i1.dat"]);

        let mut index = DatasetIndex::new();
        let err = index
            .load(&config(dir.path()), &ConstLoader(TimeSeries::default()))
            .unwrap_err();
        assert!(matches!(&err, Error::EmptySeries { run } if run == "naca_2412_i1.dat"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_queries_on_unknown_keys() {
        let index = DatasetIndex::new();
        assert!(index.all_airfoils(50_000.0).is_empty());
        assert!(index.curves_for(50_000.0, &"naca_2412".into()).is_empty());
        assert!(matches!(
            index.curve(50_000.0, &"naca_2412".into(), 0.0),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_load_tree_reads_reynolds_subdirectories() {
        let root = tempfile::tempdir().unwrap();
        for sub in ["re50000", "100000", "notes"] {
            fs::create_dir(root.path().join(sub)).unwrap();
            touch(&root.path().join(sub), &["naca_0012_i4.dat"]);
        }

        let mut index = DatasetIndex::new();
        assert_eq!(index.load_tree(root.path(), &loader()).unwrap(), 2);
        assert_eq!(index.reynolds_numbers(), vec![50_000.0, 100_000.0]);
    }

    #[test]
    fn test_non_finite_reynolds_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["naca_2412_i5.dat"]);

        let mut index = DatasetIndex::new();
        for reynolds in [f64::NAN, f64::INFINITY, 0.0] {
            let cfg = LoadConfig { directory: dir.path().to_path_buf(), reynolds };
            assert!(matches!(index.load(&cfg, &loader()), Err(Error::Config(_))));
        }
        assert!(index.is_empty());
    }

    #[test]
    fn test_index_can_be_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DatasetIndex>();
    }

    #[test]
    fn test_missing_directory_is_an_io_error() {
        let mut index = DatasetIndex::new();
        let err = index
            .load(&config(Path::new("/definitely/not/here")), &loader())
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
