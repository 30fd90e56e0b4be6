//! Writes a synthetic bank-marketing table in the dashboard's schema.
//!
//! Usage: `generate_sample [OUTPUT] [ROWS]` — `.parquet` output uses Arrow,
//! anything else is written as CSV. Defaults: `data/data_clean.csv`, 2000 rows.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const JOBS: [&str; 8] = [
    "management",
    "technician",
    "entrepreneur",
    "blue-collar",
    "admin.",
    "services",
    "retired",
    "student",
];
const MARITAL: [&str; 3] = ["married", "single", "divorced"];
const EDUCATION: [&str; 4] = ["primary", "secondary", "tertiary", "unknown"];

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
}

/// One synthetic customer.
struct Customer {
    age: i64,
    job: &'static str,
    marital: &'static str,
    education: &'static str,
    balance: i64,
    duration: i64,
    y: i64,
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<Customer> {
    (0..rows)
        .map(|_| {
            let age = rng.gauss(41.0, 10.5).clamp(18.0, 95.0).round() as i64;
            let job = rng.pick(&JOBS);
            let marital = rng.pick(&MARITAL);
            let education = rng.pick(&EDUCATION);
            // Log-normal-ish balances with a tail of overdrafts.
            let balance = (rng.gauss(6.5, 1.4).exp() - 150.0).round() as i64;
            let duration = rng.gauss(5.3, 0.8).exp().round().max(1.0) as i64;

            // Longer calls and larger balances buy more often.
            let score = -3.0 + duration as f64 / 250.0 + (balance.max(0) as f64).ln_1p() / 10.0;
            let p = 1.0 / (1.0 + (-score).exp());
            let y = i64::from(rng.next_f64() < p);

            Customer {
                age,
                job,
                marital,
                education,
                balance,
                duration,
                y,
            }
        })
        .collect()
}

fn write_csv(path: &Path, customers: &[Customer]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    writer.write_record(["age", "job", "marital", "education", "balance", "duration", "y"])?;
    for c in customers {
        writer.write_record([
            c.age.to_string(),
            c.job.to_string(),
            c.marital.to_string(),
            c.education.to_string(),
            c.balance.to_string(),
            c.duration.to_string(),
            c.y.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

fn write_parquet(path: &Path, customers: &[Customer]) -> Result<()> {
    let ints = |f: fn(&Customer) -> i64| Int64Array::from(customers.iter().map(f).collect::<Vec<_>>());
    let strs = |f: fn(&Customer) -> &'static str| {
        StringArray::from(customers.iter().map(f).collect::<Vec<_>>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("age", DataType::Int64, false),
        Field::new("job", DataType::Utf8, false),
        Field::new("marital", DataType::Utf8, false),
        Field::new("education", DataType::Utf8, false),
        Field::new("balance", DataType::Int64, false),
        Field::new("duration", DataType::Int64, false),
        Field::new("y", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(ints(|c| c.age)),
            Arc::new(strs(|c| c.job)),
            Arc::new(strs(|c| c.marital)),
            Arc::new(strs(|c| c.education)),
            Arc::new(ints(|c| c.balance)),
            Arc::new(ints(|c| c.duration)),
            Arc::new(ints(|c| c.y)),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/data_clean.csv"));
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 2000,
    };

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut rng = SimpleRng::new(42);
    let customers = generate(rows, &mut rng);

    let is_parquet = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        write_parquet(&output, &customers)?;
    } else {
        write_csv(&output, &customers)?;
    }

    let buyers = customers.iter().filter(|c| c.y == 1).count();
    println!(
        "Wrote {} customers ({buyers} buyers) to {}",
        customers.len(),
        output.display()
    );
    Ok(())
}
