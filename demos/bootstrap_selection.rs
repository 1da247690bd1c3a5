//! Bootstrap model selection on two features, configured from JSON.
//!
//! Each of the `bootstrap_runs` rounds trains on a seeded third of the data
//! and scores the rest; the final model is retrained on `bootstrap_size` rows.
//!
//! Run with: RUST_LOG=trace cargo run --example bootstrap_selection

use std::error::Error;

use ndarray::{Array1, Array2};
use polyridge::selection::{build_model, SelectionConfig};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"{
    "penalties": [0.01, 0.1, 1.0],
    "degrees": [1, 2, 3],
    "validation_size": 0,
    "bootstrap_size": 50,
    "bootstrap_runs": 8,
    "normalize_penalty": true,
    "verbosity": 4
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    // Features: [load, threads]; target: latency in ms
    let n = 150;
    let x = Array2::from_shape_fn((n, 2), |(i, j)| match j {
        0 => (i % 25) as f64 / 5.0,
        _ => (i / 25 + 1) as f64,
    });
    let y = Array1::from_shape_fn(n, |i| {
        let (load, threads) = (x[[i, 0]], x[[i, 1]]);
        20.0 + 3.0 * load * load / threads + 0.8 * ((i * 13) % 7) as f64
    });

    let config = SelectionConfig::from_json_str(CONFIG)?;
    let selector = build_model(x, y, &config)?;

    println!(
        "Selected penalty {:?}, degree {:?} (mean abs error {:.3})",
        selector.best_penalty(),
        selector.best_degree(),
        selector.best_error().unwrap_or(f64::NAN)
    );

    for (load, threads) in [(1.0, 1.0), (4.0, 2.0), (4.0, 6.0)] {
        let (estimate, std) = selector.predict_datum(&[load, threads])?;
        let p99 = selector.tail_probability_datum(&[load, threads], estimate + 2.33 * std)?;
        println!(
            "load {:.1}, threads {:.0}: {:.2} ms ± {:.2} (P(Y <= +2.33σ) = {:.3})",
            load, threads, estimate, std, p99
        );
    }

    Ok(())
}
