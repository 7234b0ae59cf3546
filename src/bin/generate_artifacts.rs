//! Writes a deterministic demo scaler/classifier pair in the format the app
//! loads. Usage: `generate_artifacts [output_dir]` (default `artifacts/demo`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{json, Value};

const FEATURE_NAMES: [&str; 11] = [
    "fixed acidity",
    "volatile acidity",
    "citric acid",
    "residual sugar",
    "chlorides",
    "free sulfur dioxide",
    "total sulfur dioxide",
    "density",
    "pH",
    "sulphates",
    "alcohol",
];

/// Red-wine column statistics; the three sulfur/sugar columns are in log1p space.
const MEANS: [f64; 11] = [8.32, 0.53, 0.27, 1.22, 0.087, 2.64, 3.66, 0.9967, 3.31, 0.66, 10.42];
const SCALES: [f64; 11] = [1.74, 0.18, 0.19, 0.26, 0.047, 0.65, 0.65, 0.0019, 0.15, 0.17, 1.07];

/// How strongly each scaled column pushes quality up (+) or down (-).
const EFFECTS: [f64; 11] = [0.1, -0.6, 0.2, 0.0, -0.2, 0.05, -0.3, -0.2, -0.1, 0.45, 0.9];

const CLASSES: [i64; 6] = [3, 4, 5, 6, 7, 8];
const N_TREES: usize = 25;
const DEPTH: u32 = 3;

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Flattened tree arrays, filled depth-first so children follow their parent.
#[derive(Default)]
struct TreeBuilder {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<Vec<f64>>,
}

impl TreeBuilder {
    /// Grow a full tree of `depth` levels below this node. `lean` accumulates
    /// the quality shift implied by the splits taken so far.
    fn grow(&mut self, rng: &mut SimpleRng, depth: u32, lean: f64) -> usize {
        let id = self.children_left.len();
        self.children_left.push(-1);
        self.children_right.push(-1);
        self.feature.push(-2);
        self.threshold.push(-2.0);
        self.value.push(Vec::new());

        if depth == 0 {
            self.value[id] = leaf_counts(rng, lean);
            return id;
        }

        let f = rng.below(FEATURE_NAMES.len());
        let threshold = rng.gauss(0.0, 0.8);
        let left = self.grow(rng, depth - 1, lean - EFFECTS[f]);
        let right = self.grow(rng, depth - 1, lean + EFFECTS[f]);

        let mut counts = vec![0.0; CLASSES.len()];
        for child in [left, right] {
            for (acc, c) in counts.iter_mut().zip(&self.value[child]) {
                *acc += c;
            }
        }

        self.children_left[id] = left as i64;
        self.children_right[id] = right as i64;
        self.feature[id] = f as i64;
        self.threshold[id] = (threshold * 1e4).round() / 1e4;
        self.value[id] = counts;
        id
    }

    fn into_json(self) -> Value {
        json!({
            "children_left": self.children_left,
            "children_right": self.children_right,
            "feature": self.feature,
            "threshold": self.threshold,
            "value": self.value,
        })
    }
}

/// Sample counts concentrated around class 5/6, shifted by `lean`.
fn leaf_counts(rng: &mut SimpleRng, lean: f64) -> Vec<f64> {
    let centre = 2.6 + lean;
    CLASSES
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let d = i as f64 - centre;
            let weight = (-d * d / 1.2).exp();
            (weight * (20.0 + rng.next_f64() * 20.0)).round()
        })
        .collect()
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts/demo"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let scaler = json!({
        "format": "wine-quality-artifact",
        "version": 1,
        "kind": "standard_scaler",
        "feature_names": FEATURE_NAMES,
        "mean": MEANS,
        "scale": SCALES,
    });

    let mut rng = SimpleRng::new(42);
    let estimators: Vec<Value> = (0..N_TREES)
        .map(|_| {
            let mut tree = TreeBuilder::default();
            tree.grow(&mut rng, DEPTH, 0.0);
            tree.into_json()
        })
        .collect();

    let classifier = json!({
        "format": "wine-quality-artifact",
        "version": 1,
        "kind": "random_forest",
        "n_features": FEATURE_NAMES.len(),
        "classes": CLASSES,
        "estimators": estimators,
    });

    let scaler_path = out_dir.join("scaler.json");
    let classifier_path = out_dir.join("classifier.json");
    write_json(&scaler_path, &scaler)?;
    write_json(&classifier_path, &classifier)?;

    println!(
        "Wrote {} and {} ({N_TREES} trees, depth {DEPTH})",
        scaler_path.display(),
        classifier_path.display()
    );
    Ok(())
}
