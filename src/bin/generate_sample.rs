//! Writes a synthetic run directory: `naca_<profile>_i<angle>.dat` files,
//! tab-separated `time / dragForce / liftForce`, one per airfoil and angle.
//!
//! Usage: `generate_sample [OUTPUT_DIR] [--seed N]` (default `input/`).

use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "generate_sample")]
#[command(about = "Write a synthetic directory of airfoil run files", long_about = None)]
struct Cli {
    /// Directory to write the run files into
    #[arg(value_name = "OUTPUT_DIR", default_value = "input")]
    out_dir: PathBuf,

    /// PRNG seed; the same seed writes the same files
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Dynamic pressure × reference area, so forces come out in newtons.
const FORCE_SCALE: f64 = 12.0;
const STALL_DEG: f64 = 14.0;

/// Thin-airfoil lift with a crude stall past `STALL_DEG`.
fn lift_coefficient(angle_deg: f64, zero_lift_cl: f64) -> f64 {
    let alpha = angle_deg.to_radians();
    let linear = 2.0 * PI * alpha + zero_lift_cl;
    if angle_deg.abs() <= STALL_DEG {
        linear
    } else {
        let excess = (angle_deg.abs() - STALL_DEG).to_radians();
        linear * (-4.0 * excess).exp()
    }
}

fn drag_coefficient(cl: f64, angle_deg: f64) -> f64 {
    let stall = (angle_deg.abs() - STALL_DEG).max(0.0).to_radians();
    0.008 + 0.012 * cl * cl + 1.2 * stall
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// Angle token as the tunnel software writes it: `i-3`, `i5`, `i2.5`.
fn file_name(profile: &str, angle: f64) -> String {
    format!("naca_{profile}_i{angle}.dat")
}

fn main() -> Result<()> {
    let Cli { out_dir, seed } = Cli::parse();
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(seed);

    // (profile, zero-lift cl)
    let profiles = [("0012", 0.0), ("2412", 0.25), ("4415", 0.45)];
    let angles = [-4.0, -2.0, 0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0];

    // 2 s at 200 Hz, slightly jittered sample times.
    let n_samples = 400;
    let dt = 0.005;

    let mut files = 0;
    for &(profile, cl0) in &profiles {
        for &angle in &angles {
            let cl = lift_coefficient(angle, cl0);
            let cd = drag_coefficient(cl, angle);
            // Shedding gets stronger and noisier past stall.
            let unsteady = if angle > STALL_DEG { 0.15 } else { 0.02 };
            let shedding_hz = 8.0 + angle.abs() * 0.5;

            let path = out_dir.join(file_name(profile, angle));
            let mut writer = csv::WriterBuilder::new()
                .delimiter(b'\t')
                .from_path(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            writer.write_record(["time", "dragForce", "liftForce"])?;

            for i in 0..n_samples {
                let t = i as f64 * dt + rng.gauss(0.0, dt * 0.05).abs();
                let wave = (2.0 * PI * shedding_hz * t).sin();
                let lift = FORCE_SCALE * (cl + unsteady * wave + rng.gauss(0.0, 0.01));
                let drag = FORCE_SCALE * (cd + 0.2 * unsteady * wave.abs() + rng.gauss(0.0, 0.001));
                writer.write_record([format!("{t:.5}"), format!("{drag:.6}"), format!("{lift:.6}")])?;
            }
            writer.flush()?;
            files += 1;
        }
    }

    println!(
        "Wrote {files} run files ({n_samples} samples each) to {}",
        out_dir.display()
    );
    Ok(())
}
