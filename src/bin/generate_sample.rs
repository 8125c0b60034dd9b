use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

/// Write a synthetic clinical table with the inconsistencies real exports
/// have: spaced genotypes, assorted missing markers, unparseable numbers.
#[derive(Debug, Parser)]
#[command(about)]
struct Args {
    #[arg(long, default_value = "sample_patients.csv")]
    output: PathBuf,

    #[arg(long, default_value_t = 120)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Debug, Serialize)]
struct Row {
    #[serde(rename = "Donor ID")]
    donor_id: String,
    #[serde(rename = "APOE Genotype")]
    genotype: String,
    #[serde(rename = "Age of onset cognitive symptoms")]
    onset: String,
    #[serde(rename = "Age of Dementia diagnosis")]
    diagnosis: String,
    #[serde(rename = "Sex")]
    sex: String,
    #[serde(rename = "Years of education")]
    education: String,
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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const GENOTYPES: [&str; 6] = ["3/3", "3/4", "4/4", "2/3", "2/4", "3 / 4"];
const MISSING: [&str; 5] = ["", "N/A", "na", ".", "unknown"];

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    for i in 0..args.rows {
        let genotype = if rng.chance(0.05) {
            rng.pick(&MISSING).to_string()
        } else {
            rng.pick(&GENOTYPES).to_string()
        };
        let carrier = matches!(genotype.replace(' ', "").as_str(), "3/4" | "4/4");

        let education = rng.gauss(14.0, 3.0).clamp(6.0, 22.0).round();
        let base = if carrier { 66.0 } else { 73.0 };
        let onset = round1(rng.gauss(base + 0.3 * (education - 14.0), 5.0));
        let diagnosis = round1(onset + rng.gauss(4.0, 1.5).max(0.5));

        let row = Row {
            donor_id: format!("H{:05}", 21000 + i),
            genotype,
            onset: if rng.chance(0.08) {
                rng.pick(&MISSING).to_string()
            } else {
                format!("{onset:.1}")
            },
            diagnosis: if rng.chance(0.1) {
                rng.pick(&MISSING).to_string()
            } else {
                format!("{diagnosis:.1}")
            },
            sex: if rng.chance(0.03) {
                String::new()
            } else {
                rng.pick(&["Male", "Female"]).to_string()
            },
            education: if rng.chance(0.1) {
                rng.pick(&MISSING).to_string()
            } else {
                format!("{education}")
            },
        };
        writer.serialize(&row).context("writing row")?;
    }
    writer.flush().context("flushing output")?;

    log::info!("Wrote {} rows to {}", args.rows, args.output.display());
    println!("Wrote {} patients to {}", args.rows, args.output.display());
    Ok(())
}
