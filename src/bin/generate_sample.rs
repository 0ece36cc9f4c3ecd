//! Writes a demo pair of tables for `chemometrics match`:
//! `sample_theoretical.csv` (compound list with [M+H]+ adducts) and
//! `sample_experimental.parquet` (feature table, some features within a
//! few ppm of a compound).

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const PROTON: f64 = 1.007276;

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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

struct Compound {
    name: &'static str,
    formula: &'static str,
    mass: f64,
    smiles: &'static str,
}

const COMPOUNDS: &[Compound] = &[
    Compound { name: "Glycine", formula: "C2H5NO2", mass: 75.032028, smiles: "NCC(=O)O" },
    Compound { name: "Alanine", formula: "C3H7NO2", mass: 89.047678, smiles: "CC(N)C(=O)O" },
    Compound { name: "Sarcosine", formula: "C3H7NO2", mass: 89.047678, smiles: "CNCC(=O)O" },
    Compound { name: "Proline", formula: "C5H9NO2", mass: 115.063329, smiles: "OC(=O)C1CCCN1" },
    Compound { name: "Citric acid", formula: "C6H8O7", mass: 192.027003, smiles: "OC(=O)CC(O)(CC(=O)O)C(=O)O" },
    Compound { name: "Glucose", formula: "C6H12O6", mass: 180.063388, smiles: "OCC1OC(O)C(O)C(O)C1O" },
    Compound { name: "Tryptophan", formula: "C11H12N2O2", mass: 204.089878, smiles: "NC(CC1=CNC2=CC=CC=C12)C(=O)O" },
    Compound { name: "Caffeine", formula: "C8H10N4O2", mass: 194.080376, smiles: "CN1C=NC2=C1C(=O)N(C)C(=O)N2C" },
];

fn main() {
    let mut rng = SimpleRng::new(42);

    // Theoretical table
    let theoretical_path = "sample_theoretical.csv";
    let mut writer = csv::Writer::from_path(theoretical_path).expect("Failed to create CSV");
    writer
        .write_record(["Name", "Formula", "Monoisotopic_mass", "adduct", "adduct mass", "smiles"])
        .expect("Failed to write header");
    for c in COMPOUNDS {
        let mass = format!("{:.6}", c.mass);
        let adduct_mass = format!("{:.6}", c.mass + PROTON);
        writer
            .write_record([c.name, c.formula, mass.as_str(), "[M+H]+", adduct_mass.as_str(), c.smiles])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");

    // Experimental features: one near-hit per compound (within ±4 ppm),
    // plus unrelated background features.
    let mut compound: Vec<String> = Vec::new();
    let mut neutral: Vec<f64> = Vec::new();
    let mut accepted: Vec<Option<String>> = Vec::new();
    let mut msms: Vec<Option<String>> = Vec::new();

    for (i, c) in COMPOUNDS.iter().enumerate() {
        let ppm = rng.uniform(-4.0, 4.0);
        neutral.push(c.mass * (1.0 + ppm * 1e-6));
        compound.push(format!("{:.2}_{:.4}n", rng.uniform(0.5, 12.0), c.mass));
        // Every third hit is already identified, every fourth lacks MS/MS.
        accepted.push((i % 3 == 2).then(|| format!("HMDB{:07}", 100 + i)));
        msms.push((i % 4 != 3).then(|| "Yes".to_string()));
    }
    for _ in 0..40 {
        let mass = rng.uniform(60.0, 900.0);
        neutral.push(mass);
        compound.push(format!("{:.2}_{:.4}n", rng.uniform(0.5, 12.0), mass));
        accepted.push(None);
        msms.push((rng.next_f64() < 0.6).then(|| "Yes".to_string()));
    }
    let mz: Vec<f64> = neutral.iter().map(|m| m + PROTON).collect();
    let n_features = neutral.len();

    let schema = Arc::new(Schema::new(vec![
        Field::new("Compound", DataType::Utf8, false),
        Field::new("Neutral mass (Da)", DataType::Float64, false),
        Field::new("m/z", DataType::Float64, false),
        Field::new("Accepted ID", DataType::Utf8, true),
        Field::new("MSMS info available", DataType::Utf8, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(compound)),
        Arc::new(Float64Array::from(neutral)),
        Arc::new(Float64Array::from(mz)),
        Arc::new(StringArray::from(accepted)),
        Arc::new(StringArray::from(msms)),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    // Write Parquet
    let experimental_path = "sample_experimental.parquet";
    let file = std::fs::File::create(experimental_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} compounds to {theoretical_path} and {n_features} features to {experimental_path}",
        COMPOUNDS.len()
    );
}
