//! Writes a deterministic demo table and a matching model bundle.
//!
//! Usage: `generate_demo [output_dir]` (defaults to `assets`). Produces
//! `demo_data.csv`, `demo_data.parquet` and `price_model.json`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use price_demo::data::ACTUAL_COL;
use price_demo::model::linear::LinearModel;
use price_demo::model::{ModelBundle, Regressor};

const ROWS: usize = 40;

/// Every n-th row has no recorded sale price.
const MISSING_ACTUAL_EVERY: usize = 7;

const FEATURES: [&str; 5] = ["SquareFeet", "Bedrooms", "Bathrooms", "YearBuilt", "LotSize"];

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct House {
    square_feet: i64,
    bedrooms: i64,
    bathrooms: i64,
    year_built: i64,
    lot_size: f64,
    actual: Option<f64>,
}

impl House {
    fn features(&self) -> Vec<f64> {
        vec![
            self.square_feet as f64,
            self.bedrooms as f64,
            self.bathrooms as f64,
            self.year_built as f64,
            self.lot_size,
        ]
    }
}

fn demo_model() -> LinearModel {
    LinearModel {
        intercept: -1_250_000.0,
        coefficients: vec![120.0, 8_000.0, 12_000.0, 650.0, 30_000.0],
    }
}

fn generate_houses(model: &LinearModel, rng: &mut SimpleRng) -> Vec<House> {
    (0..ROWS)
        .map(|i| {
            let bedrooms = rng.range(1, 5);
            let mut house = House {
                square_feet: 500 + bedrooms * 350 + rng.range(0, 600),
                bedrooms,
                bathrooms: rng.range(1, bedrooms.min(3)),
                year_built: rng.range(1950, 2022),
                lot_size: (rng.range(8, 100) as f64) / 100.0,
                actual: None,
            };
            if i % MISSING_ACTUAL_EVERY != MISSING_ACTUAL_EVERY - 1 {
                let price = model.predict(&house.features()) + rng.gauss(0.0, 20_000.0);
                house.actual = Some((price / 100.0).round() * 100.0);
            }
            house
        })
        .collect()
}

fn write_csv(path: &Path, houses: &[House]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    let mut header: Vec<&str> = FEATURES.to_vec();
    header.push(ACTUAL_COL);
    writer.write_record(&header)?;

    for h in houses {
        writer.write_record([
            h.square_feet.to_string(),
            h.bedrooms.to_string(),
            h.bathrooms.to_string(),
            h.year_built.to_string(),
            format!("{:.2}", h.lot_size),
            h.actual.map(|a| format!("{a:.0}")).unwrap_or_default(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, houses: &[House]) -> Result<()> {
    let int_column = |f: fn(&House) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(houses.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("SquareFeet", DataType::Int64, false),
        Field::new("Bedrooms", DataType::Int64, false),
        Field::new("Bathrooms", DataType::Int64, false),
        Field::new("YearBuilt", DataType::Int64, false),
        Field::new("LotSize", DataType::Float64, false),
        Field::new(ACTUAL_COL, DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            int_column(|h| h.square_feet),
            int_column(|h| h.bedrooms),
            int_column(|h| h.bathrooms),
            int_column(|h| h.year_built),
            Arc::new(Float64Array::from(
                houses.iter().map(|h| h.lot_size).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                houses.iter().map(|h| h.actual).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn write_bundle(path: &Path, model: LinearModel) -> Result<()> {
    let bundle = ModelBundle {
        model: Regressor::Linear(model),
        features: FEATURES.iter().map(|f| f.to_string()).collect(),
    };
    let json = serde_json::to_string_pretty(&bundle).context("serializing bundle")?;
    std::fs::write(path, json + "\n").context("writing bundle")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args().nth(1).unwrap_or_else(|| "assets".to_string());
    let out_dir = Path::new(&out_dir);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let model = demo_model();
    let houses = generate_houses(&model, &mut rng);

    write_csv(&out_dir.join("demo_data.csv"), &houses)?;
    write_parquet(&out_dir.join("demo_data.parquet"), &houses)?;
    write_bundle(&out_dir.join("price_model.json"), model)?;

    let missing = houses.iter().filter(|h| h.actual.is_none()).count();
    println!(
        "Wrote {} demo rows ({missing} without actual price) and a {}-feature model to {}",
        houses.len(),
        FEATURES.len(),
        out_dir.display()
    );
    Ok(())
}
