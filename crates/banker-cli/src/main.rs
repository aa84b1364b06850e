//! # banker
//!
//! Command-line driver: starts one thread per consumer against a shared
//! Banker and logs every claim, grant and denial.
//!
//! ## Usage
//! ```bash
//! # Three consumers, three resource classes, run until interrupted
//! banker 10 5 7
//!
//! # Reproducible bounded run with a summary at the end
//! banker 10 5 7 --consumers 5 --seed 42 --rounds 20 --hold-ms 200
//!
//! # Non-blocking retries every 250 ms instead of waiting for releases
//! banker 10 5 7 --wait-ms 0 --backoff-ms 250 -v
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use banker::prelude::*;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "banker",
    about = "Deadlock-avoidance resource allocation with the Banker's Algorithm",
    version
)]
struct Cli {
    /// Units available at startup, one value per resource class.
    #[arg(required = true, value_name = "AVAILABLE")]
    available: Vec<u32>,

    /// Number of consumer threads.
    #[arg(short = 'n', long, default_value_t = 3)]
    consumers: u32,

    /// Seed for claims, requests and hold times. Random if omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Requests per consumer. Runs until interrupted if omitted.
    #[arg(short, long)]
    rounds: Option<u64>,

    /// Longest time a consumer holds a grant; hold times are uniform in
    /// `0..=hold-ms`.
    #[arg(long, default_value_t = 1000)]
    hold_ms: u64,

    /// How long a denied request waits for a release before giving up.
    /// `0` never blocks and retries after `--backoff-ms` instead.
    #[arg(long, default_value_t = 1000)]
    wait_ms: u64,

    /// Delay before a new request after a non-blocking denial.
    #[arg(long, default_value_t = 1000)]
    backoff_ms: u64,

    /// Enable verbose logging (repeat for more: -v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn sim_config(&self) -> SimConfig {
        let seed = self.seed.unwrap_or_else(clock_seed);
        let retry = match self.wait_ms {
            0 => RetryPolicy::Backoff(Duration::from_millis(self.backoff_ms)),
            ms => RetryPolicy::WaitForRelease(Duration::from_millis(ms)),
        };
        SimConfig {
            consumers: self.consumers,
            seed,
            rounds: self.rounds,
            hold: Duration::ZERO..=Duration::from_millis(self.hold_ms),
            retry,
            ..SimConfig::new(ResourceVector::from_slice(&self.available))
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .init();
}

fn log_event(event: &SimEvent) {
    match event {
        SimEvent::ClaimDeclared { consumer, maximum } => {
            tracing::info!(consumer = %consumer, maximum = %maximum, "maximum claim");
        }
        SimEvent::Requested { consumer, request } => {
            tracing::debug!(consumer = %consumer, request = %request, "requesting");
        }
        SimEvent::Granted {
            consumer,
            request,
            allocation,
        } => {
            tracing::info!(
                consumer = %consumer,
                request = %request,
                allocation = %allocation,
                "request accepted"
            );
        }
        SimEvent::Denied {
            consumer,
            request,
            reason,
        } => {
            tracing::info!(consumer = %consumer, request = %request, %reason, "request denied");
        }
        SimEvent::Released { consumer, released } => {
            tracing::debug!(consumer = %consumer, released = %released, "released");
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.sim_config();
    tracing::info!(
        available = %config.available,
        consumers = config.consumers,
        seed = config.seed,
        "starting"
    );

    let sim = Simulation::spawn(config).context("invalid configuration")?;

    // Ends once every consumer has exited, which only happens with --rounds.
    for event in sim.events().iter() {
        log_event(&event);
    }

    let report = sim.join().context("simulation failed")?;
    println!("{report}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_supply_and_flags() {
        let cli = Cli::try_parse_from([
            "banker", "10", "5", "7", "--consumers", "5", "--seed", "42", "--rounds", "20",
            "--wait-ms", "0", "--backoff-ms", "250",
        ])
        .unwrap();
        assert_eq!(cli.available, vec![10, 5, 7]);
        let config = cli.sim_config();
        assert_eq!(config.available, ResourceVector::from_slice(&[10, 5, 7]));
        assert_eq!(config.consumers, 5);
        assert_eq!(config.seed, 42);
        assert_eq!(config.rounds, Some(20));
        assert_eq!(
            config.retry,
            RetryPolicy::Backoff(Duration::from_millis(250))
        );
    }

    #[test]
    fn defaults_block_on_denial() {
        let cli = Cli::try_parse_from(["banker", "3"]).unwrap();
        let config = cli.sim_config();
        assert_eq!(config.consumers, 3);
        assert_eq!(config.rounds, None);
        assert_eq!(
            config.retry,
            RetryPolicy::WaitForRelease(Duration::from_millis(1000))
        );
        assert_eq!(*config.hold.end(), Duration::from_secs(1));
    }

    #[test]
    fn missing_or_malformed_supply_is_rejected() {
        assert!(Cli::try_parse_from(["banker"]).is_err());
        assert!(Cli::try_parse_from(["banker", "10", "x"]).is_err());
        assert!(Cli::try_parse_from(["banker", "-3"]).is_err());
    }

    #[test]
    fn zero_consumers_fail_at_startup() {
        let cli = Cli::try_parse_from(["banker", "1", "--consumers", "0"]).unwrap();
        assert!(Simulation::spawn(cli.sim_config()).is_err());
    }
}
