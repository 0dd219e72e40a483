//! Command-line front end: load run directories, report averages, draw plots.

use std::path::PathBuf;

use aerosweep::compare::{selected_sweeps, sweep_for};
use aerosweep::config::{ImageFormat, RunConfig};
use aerosweep::data::filter::{select, Selection};
use aerosweep::data::{AirfoilId, DatasetIndex, TableLoader};
use aerosweep::export::{summary_rows, write_summary_file};
use aerosweep::render::{Artifact, PlotOptions, PlotRenderer, Quantity, Renderer};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

#[derive(Parser)]
#[command(name = "aerosweep")]
#[command(about = "Average lift/drag per run and compare airfoils across angles", long_about = None)]
struct Cli {
    #[command(flatten)]
    input: InputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// JSON configuration file; flags below override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory of run files
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Reynolds number of the runs in the input directory
    #[arg(short, long, global = true)]
    reynolds: Option<f64>,

    /// Input holds one subdirectory per Reynolds number (e.g. re50000/)
    #[arg(long, global = true)]
    tree: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the averaged lift/drag of every run
    Summary {
        /// Also write the table as CSV
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },
    /// Render per-run, combined and angle-sweep plots
    Plot {
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Image width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Image height in pixels
        #[arg(long)]
        height: Option<u32>,

        #[arg(long, value_enum)]
        format: Option<ImageFormat>,

        /// Only compare these airfoils (repeatable)
        #[arg(short, long = "airfoil")]
        airfoils: Vec<String>,

        #[arg(long, allow_hyphen_values = true)]
        min_angle: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        max_angle: Option<f64>,

        /// Log each finished plot path
        #[arg(long)]
        show: bool,
    },
    /// Print one airfoil's angle sweep as JSON
    Sweep {
        #[arg(value_name = "AIRFOIL")]
        airfoil: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = base_config(&cli.input)?;

    match cli.command {
        Commands::Summary { csv } => {
            let index = load(&config)?;
            for row in summary_rows(&index) {
                println!(
                    "Re {:>9.0}  {:<14} {:>7.2} deg  lift {:>12.6}  drag {:>12.6}  ({} samples, {})",
                    row.reynolds, row.airfoil, row.angle_deg, row.avg_lift, row.avg_drag, row.samples, row.source
                );
            }
            if let Some(path) = csv {
                write_summary_file(&index, &path)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!("Summary written to {}", path.display());
            }
        }
        Commands::Plot {
            output,
            width,
            height,
            format,
            airfoils,
            min_angle,
            max_angle,
            show,
        } => {
            if let Some(output) = output {
                config.output_dir = output;
            }
            if let Some(width) = width {
                config.figure_size.0 = width;
            }
            if let Some(height) = height {
                config.figure_size.1 = height;
            }
            if let Some(format) = format {
                config.image_format = format;
            }
            config.validate()?;

            let selection = Selection::all()
                .with_airfoils(airfoils.iter().map(|a| AirfoilId::new(a.as_str())))
                .with_angle_range(min_angle, max_angle);
            let index = load(&config)?;
            let written = plot_all(&index, &config, &selection, show)?;
            info!("Wrote {written} plots under {}", config.output_dir.display());
        }
        Commands::Sweep { airfoil } => {
            let index = load(&config)?;
            let sweep = sweep_for(&index, config.reynolds, &AirfoilId::new(airfoil))?;
            println!("{}", serde_json::to_string_pretty(&sweep)?);
        }
    }

    Ok(())
}

fn base_config(args: &InputArgs) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => RunConfig::default(),
    };
    if let Some(input) = &args.input {
        config.input_dir = input.clone();
    }
    if let Some(reynolds) = args.reynolds {
        config.reynolds = reynolds;
    }
    if args.tree {
        config.per_reynolds_dirs = true;
    }
    config.validate()?;
    Ok(config)
}

fn load(config: &RunConfig) -> Result<DatasetIndex> {
    let mut index = DatasetIndex::new();
    if config.per_reynolds_dirs {
        index.load_tree(&config.input_dir, &TableLoader)?;
    } else {
        index.load(&config.load_config(), &TableLoader)?;
    }
    if index.is_empty() {
        bail!("no run files found in {}", config.input_dir.display());
    }
    info!(
        "Indexed {} runs at {} Reynolds number(s)",
        index.len(),
        index.reynolds_numbers().len()
    );
    Ok(index)
}

/// Draw every artifact for every Reynolds number. Returns the plot count.
fn plot_all(index: &DatasetIndex, config: &RunConfig, selection: &Selection, show: bool) -> Result<usize> {
    let renderer = PlotRenderer;
    let mut written = 0;

    for reynolds in index.reynolds_numbers() {
        let curves = select(index.curves_at(reynolds), selection);
        if curves.is_empty() {
            continue;
        }
        let sweeps = selected_sweeps(index, reynolds, selection);

        for quantity in Quantity::ALL {
            for &curve in &curves {
                let opts = plot_options(config, Artifact::Run(curve, quantity), reynolds, show);
                written += renderer.time_series(curve, quantity, &opts)?.is_some() as usize;
            }
            let opts = plot_options(config, Artifact::Combined(quantity), reynolds, show);
            written += renderer.overlay(&curves, quantity, &opts)?.is_some() as usize;

            let opts = plot_options(config, Artifact::Angles(quantity), reynolds, show);
            written += renderer.sweeps(&sweeps, quantity, &opts)?.is_some() as usize;
        }
    }
    Ok(written)
}

fn plot_options(config: &RunConfig, artifact: Artifact<'_>, reynolds: f64, show: bool) -> PlotOptions {
    PlotOptions {
        target_path: Some(artifact.path(&config.output_dir, reynolds, config.image_format)),
        display_inline: show,
        figure_size: config.figure_size,
    }
}
