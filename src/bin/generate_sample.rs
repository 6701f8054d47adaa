use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    /// Uniform integer in `lo..=hi`.
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

/// Fertilizer name and its (nitrogen, potassium, phosphorous) profile.
const FERTILIZERS: [(&str, [i64; 3]); 7] = [
    ("Urea", [38, 0, 0]),
    ("DAP", [12, 0, 36]),
    ("14-35-14", [8, 10, 32]),
    ("28-28", [24, 0, 22]),
    ("17-17-17", [12, 12, 12]),
    ("20-20", [18, 0, 18]),
    ("10-26-26", [8, 16, 14]),
];

const SOILS: [&str; 5] = ["Sandy", "Loamy", "Black", "Red", "Clayey"];

const CROPS: [&str; 11] = [
    "Maize", "Sugarcane", "Cotton", "Tobacco", "Paddy", "Barley", "Wheat", "Millets",
    "Oil seeds", "Pulses", "Ground Nuts",
];

const COLUMNS: [&str; 9] = [
    "Temperature", "Humidity", "Moisture", "Soil Type", "Crop Type", "Nitrogen", "Potassium",
    "Phosphorous", "Fertilizer Name",
];

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_rows = 200;

    let mut temperature: Vec<i64> = Vec::new();
    let mut humidity: Vec<i64> = Vec::new();
    let mut moisture: Vec<i64> = Vec::new();
    let mut soil: Vec<&str> = Vec::new();
    let mut crop: Vec<&str> = Vec::new();
    let mut nutrients: [Vec<i64>; 3] = Default::default();
    let mut fertilizer: Vec<&str> = Vec::new();

    for _ in 0..n_rows {
        let t = rng.range(25, 38);
        temperature.push(t);
        // humidity loosely follows temperature
        humidity.push((rng.gauss(50.0 + (t - 25) as f64, 3.0).round() as i64).clamp(40, 72));
        moisture.push(rng.range(25, 65));
        soil.push(*rng.pick(&SOILS));
        crop.push(*rng.pick(&CROPS));

        let (name, profile) = *rng.pick(&FERTILIZERS);
        for (col, base) in nutrients.iter_mut().zip(profile) {
            let v = if base == 0 { 0 } else { base + rng.range(-4, 4) };
            col.push(v.max(0));
        }
        fertilizer.push(name);
    }

    // Build Arrow arrays
    let schema = Arc::new(Schema::new(
        COLUMNS
            .iter()
            .map(|&name| {
                let dtype = match name {
                    "Soil Type" | "Crop Type" | "Fertilizer Name" => DataType::Utf8,
                    _ => DataType::Int64,
                };
                Field::new(name, dtype, false)
            })
            .collect::<Vec<_>>(),
    ));

    let [nitrogen, potassium, phosphorous] = nutrients;
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(temperature.clone())),
            Arc::new(Int64Array::from(humidity.clone())),
            Arc::new(Int64Array::from(moisture.clone())),
            Arc::new(StringArray::from(soil.clone())),
            Arc::new(StringArray::from(crop.clone())),
            Arc::new(Int64Array::from(nitrogen.clone())),
            Arc::new(Int64Array::from(potassium.clone())),
            Arc::new(Int64Array::from(phosphorous.clone())),
            Arc::new(StringArray::from(fertilizer.clone())),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let parquet_path = "sample_fertilizer.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    // Write CSV with the same rows
    let csv_path = "sample_fertilizer.csv";
    let mut csv_writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    csv_writer.write_record(COLUMNS).expect("Failed to write header");
    for i in 0..n_rows {
        csv_writer
            .write_record([
                temperature[i].to_string(),
                humidity[i].to_string(),
                moisture[i].to_string(),
                soil[i].to_string(),
                crop[i].to_string(),
                nitrogen[i].to_string(),
                potassium[i].to_string(),
                phosphorous[i].to_string(),
                fertilizer[i].to_string(),
            ])
            .expect("Failed to write row");
    }
    csv_writer.flush().expect("Failed to flush CSV");

    // Sample with one categorical column missing, for trying out the error path
    let broken_path = "sample_missing_crop.csv";
    let mut broken = csv::Writer::from_path(broken_path).expect("Failed to create CSV file");
    let kept: Vec<&str> = COLUMNS.iter().copied().filter(|&c| c != "Crop Type").collect();
    broken.write_record(&kept).expect("Failed to write header");
    for i in 0..5 {
        broken
            .write_record([
                temperature[i].to_string(),
                humidity[i].to_string(),
                moisture[i].to_string(),
                soil[i].to_string(),
                nitrogen[i].to_string(),
                potassium[i].to_string(),
                phosphorous[i].to_string(),
                fertilizer[i].to_string(),
            ])
            .expect("Failed to write row");
    }
    broken.flush().expect("Failed to flush CSV");

    println!("Wrote {n_rows} rows to {parquet_path} and {csv_path}, plus {broken_path}");
}
