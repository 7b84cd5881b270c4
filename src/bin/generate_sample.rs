//! Write a synthetic smartphone listing export in CSV and Parquet form.
//!
//! Prices and ratings are stored as raw marketplace text (`"KSh 12,999"`,
//! `"4.3 out of 5"`), and a few rows are deliberately unusable so the
//! loader's cleaning has something to drop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::StringArray;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use rusty_listings::view::format_price;

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct RawListing {
    name: String,
    price: String,
    rating: String,
}

const BRANDS: [(&str, f64); 6] = [
    ("Tecno", 14_000.0),
    ("Infinix", 16_000.0),
    ("Itel", 9_000.0),
    ("Samsung", 38_000.0),
    ("Xiaomi", 24_000.0),
    ("Oppo", 28_000.0),
];
const MODELS: [&str; 8] = ["Spark 20", "Hot 40", "A70", "Galaxy A15", "Redmi 13C", "A18", "Camon 30", "Note 40"];
const STORAGE: [(&str, f64); 4] = [("64GB", 0.85), ("128GB", 1.0), ("256GB", 1.3), ("512GB", 1.8)];

fn generate(count: usize, rng: &mut SimpleRng) -> Vec<RawListing> {
    (0..count)
        .map(|i| {
            let (brand, base) = *rng.pick(&BRANDS);
            let model = rng.pick(&MODELS);
            let (storage, factor) = *rng.pick(&STORAGE);
            let name = format!("{brand} {model} {storage} Dual SIM");

            // Round to the nearest 50 like real shelf prices, minus one shilling.
            let price = ((base * factor * (0.7 + 0.6 * rng.next_f64())) / 50.0).round() * 50.0 - 1.0;
            let rating = (3.0 + 2.0 * rng.next_f64().powf(0.6)).min(5.0);

            // Every 17th row has no price, every 23rd no rating yet.
            let price = if i % 17 == 16 {
                "KSh N/A".to_string()
            } else {
                format_price(price, "KSh")
            };
            let rating = if i % 23 == 22 {
                "No ratings yet".to_string()
            } else {
                format!("{rating:.1} out of 5")
            };

            RawListing { name, price, rating }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[RawListing]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["Product Name", "Price", "Rating"])?;
    for row in rows {
        writer.write_record([&row.name, &row.price, &row.rating])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[RawListing]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Product Name", DataType::Utf8, false),
        Field::new("Price", DataType::Utf8, false),
        Field::new("Rating", DataType::Utf8, false),
    ]));

    let column = |f: fn(&RawListing) -> &str| StringArray::from(rows.iter().map(f).collect::<Vec<_>>());
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(column(|r| r.name.as_str())),
            Arc::new(column(|r| r.price.as_str())),
            Arc::new(column(|r| r.rating.as_str())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut rng = SimpleRng::new(42);
    let rows = generate(400, &mut rng);

    let csv_path = out_dir.join("jumia_enhanced_with_ratings.csv");
    let parquet_path = out_dir.join("jumia_enhanced_with_ratings.parquet");
    write_csv(&csv_path, &rows)?;
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} listings to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
