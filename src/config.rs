use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// LoadConfig – argument of DatasetIndex::load
// ---------------------------------------------------------------------------

/// One directory of run files, all recorded at one Reynolds number.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    pub directory: PathBuf,
    pub reynolds: f64,
}

// ---------------------------------------------------------------------------
// RunConfig – whole-tool settings
// ---------------------------------------------------------------------------

/// Image encoding for rendered artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Settings for a full load-and-report run, usually read from a JSON file
/// and then overridden from the command line.
///
/// ```json
/// { "input_dir": "runs/", "reynolds": 50000, "figure_size": [2000, 1000] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub reynolds: f64,
    /// Width × height in pixels.
    pub figure_size: (u32, u32),
    pub image_format: ImageFormat,
    /// `input_dir` holds one subdirectory per Reynolds number.
    pub per_reynolds_dirs: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            reynolds: 50_000.0,
            figure_size: (2000, 1000),
            image_format: ImageFormat::Png,
            per_reynolds_dirs: false,
        }
    }
}

impl RunConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: RunConfig = serde_json::from_str(&text).map_err(|source| Error::Json {
            file: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.reynolds.is_finite() && self.reynolds > 0.0) {
            return Err(Error::Config(format!(
                "reynolds must be a positive number, got {}",
                self.reynolds
            )));
        }
        let (w, h) = self.figure_size;
        if w == 0 || h == 0 {
            return Err(Error::Config(format!("figure_size must be non-zero, got {w}x{h}")));
        }
        Ok(())
    }

    /// The single-directory load described by this config.
    pub fn load_config(&self) -> LoadConfig {
        LoadConfig {
            directory: self.input_dir.clone(),
            reynolds: self.reynolds,
        }
    }
}
