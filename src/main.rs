use std::error::Error;

use croprec::{load_model, run_recommendation, AppConfig};
use tracing_subscriber::EnvFilter;

/// Load the model named in the YAML file given as the first argument (or the
/// defaults) and print one recommendation for the configured readings.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    let loaded = load_model(&cfg.artifact)?;
    if loaded.is_best_effort() {
        eprintln!(
            "warning: model decoded via {}; text metadata may be inaccurate",
            loaded.strategy()
        );
    }

    let rec = run_recommendation(loaded.model(), &cfg.demo.inputs)?;

    println!("Recommended crop: {} (class {})", rec.crop, rec.class_index);
    for row in rec.summary.rows() {
        println!("  {:<16} {}", row.parameter, row.value);
    }

    Ok(())
}
