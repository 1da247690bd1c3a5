//! Polynomial model selection with partition validation.
//!
//! This example:
//! - generates a noisy cubic,
//! - searches the default penalty and degree grids with 5-row folds,
//! - prints the per-grid-point validation errors,
//! - queries point estimates, tail probabilities and log-densities,
//! - saves the predictor and loads it back.
//!
//! Run with: RUST_LOG=debug cargo run --example fit_polynomial

use std::error::Error;

use ndarray::{array, Array1, Array2};
use polyridge::model::FittedRidge;
use polyridge::predictor::GaussianPredictor;
use polyridge::selection::{build_model, SelectionConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Polynomial Ridge Selection ===\n");

    // 1. Synthetic data: y = 0.5x³ - 2x + 1 with a deterministic wobble
    let n = 40;
    let x = Array2::from_shape_fn((n, 1), |(i, _)| -2.0 + 4.0 * i as f64 / (n - 1) as f64);
    let y = Array1::from_shape_fn(n, |i| {
        let v = x[[i, 0]];
        0.5 * v * v * v - 2.0 * v + 1.0 + 0.15 * (i as f64 * 1.7).sin()
    });

    // 2. Grid search
    let config = SelectionConfig::default().validation_size(5).verbosity(3);
    let selector = build_model(x, y, &config)?;

    println!("Validation errors (MSE):");
    for score in selector.scores() {
        println!(
            "  penalty {:>6} degree {} -> {:.6}",
            score.params.penalty, score.params.degree, score.error
        );
    }
    println!(
        "\nSelected penalty {:?}, degree {:?}, residual std {:.4}",
        selector.best_penalty(),
        selector.best_degree(),
        selector.residual_std().unwrap_or(f64::NAN)
    );

    // 3. Queries
    let probe = array![[-1.5], [0.0], [1.5]];
    let observed = array![1.5, 1.2, 0.0];
    let (estimates, stds) = selector.predict(&probe)?;
    let tails = selector.tail_probability(&probe, &observed)?;
    let densities = selector.log_density(&probe, &observed)?;
    for i in 0..probe.nrows() {
        println!(
            "x = {:>5.2}: estimate {:>7.3} ± {:.3}, P(Y <= {:.2}) = {:.3}, log p = {:.3}",
            probe[[i, 0]],
            estimates[i],
            stds[i],
            observed[i],
            tails[i],
            densities[i]
        );
    }

    // 4. Persistence
    let predictor = selector.into_predictor()?;
    let path = std::env::temp_dir().join("polyridge_fit_polynomial.bin");
    predictor.save_to_file(&path)?;
    let loaded = GaussianPredictor::<FittedRidge>::load_from_file(&path)?;
    let (estimate, _) = loaded.predict_datum(&[0.5])?;
    println!("\nReloaded predictor from {}: f(0.5) = {:.3}", path.display(), estimate);
    std::fs::remove_file(&path)?;

    Ok(())
}
