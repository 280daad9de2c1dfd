use passenger_forecast::{run_from_config, PipelineConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Crates that should receive log output.
const CRATE_TARGETS: &[&str] = &["air_passengers", "passenger_forecast", "ssa_math"];

/// Initialize tracing from a verbosity level.
///
/// 0 -> warn, 1 -> info, 2 -> debug, 3+ -> trace. `RUST_LOG` overrides it.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let default_filter = CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("examples")
        .join("config")
        .join("air_passengers.json");
    let mut verbosity = 1;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" => verbosity = 2,
            "-vv" => verbosity = 3,
            "-q" => verbosity = 0,
            path => config_path = PathBuf::from(path),
        }
    }
    init_logging(verbosity);

    println!("Loading configuration from: {}", config_path.display());
    let config = PipelineConfig::from_json_file(&config_path)?;
    let report = run_from_config(&config)?;

    println!(
        "Trained on {} months, held out {} months",
        report.train_len, report.test_len
    );
    println!(
        "Retained {} components ({:.2}% of energy), residual std dev {:.3}\n",
        report.summary.rank,
        report.summary.explained_energy * 100.0,
        report.model.training_residual_std_dev()
    );
    print!("{}", report);

    Ok(())
}
