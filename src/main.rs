use shor_sim::errors::RegisterError;
use shor_sim::shor::{factor, ShorConfig};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

const EXIT_USAGE: u8 = 3;
const EXIT_NORMALIZATION: u8 = 255;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let arg = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            println!("Usage: shor-sim [number]");
            return ExitCode::from(EXIT_USAGE);
        }
    };
    let n = match arg.parse::<u64>() {
        Ok(n) if n >= 15 => n,
        _ => {
            println!("Invalid number");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let mut rng = rand::thread_rng();
    match factor(&ShorConfig::new(n), &mut rng) {
        Ok(Some((a, b))) => {
            println!("{} = {} * {}", n, a, b);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("Could not determine factors.");
            ExitCode::SUCCESS
        }
        Err(err @ RegisterError::NormalizationError { .. }) => {
            error!(%err, "register lost normalization");
            ExitCode::from(EXIT_NORMALIZATION)
        }
        Err(err) => {
            error!(%err, "factoring failed");
            ExitCode::FAILURE
        }
    }
}
