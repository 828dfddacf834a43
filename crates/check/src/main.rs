//! `sockprobe` -- collectd socket threshold check.
//!
//! Reads one metric (or the maximum over every metric matching a pattern)
//! from collectd's `unixsock` plugin and compares it to warning/critical
//! limits. Prints one result line and exits 0/1/2 for OK/WARNING/CRITICAL.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default                      | Description                       |
//! |--------------------------|----------|------------------------------|-----------------------------------|
//! | `SOCKPROBE_SOCKET`       | no       | `/var/run/collectd-unixsock` | Path of the collectd socket       |
//! | `SOCKPROBE_METRIC`       | one of   | --                           | Metric path, e.g. `load/load`     |
//! | `SOCKPROBE_PATTERN`      | one of   | --                           | Metric pattern, e.g. `cpu*/usage` |
//! | `SOCKPROBE_WARNING`      | yes      | --                           | Warning limit                     |
//! | `SOCKPROBE_CRITICAL`     | yes      | --                           | Critical limit                    |
//! | `SOCKPROBE_FIELD`        | no       | `value`                      | Field read from the value record  |
//! | `SOCKPROBE_TIMEOUT_SECS` | no       | `20`                         | Deadline for the whole check      |

use sockprobe_check::{executor, report};
use sockprobe_core::config::RawCheckConfig;
use sockprobe_core::outcome::Outcome;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sockprobe_check=warn,sockprobe_collectd=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let outcome = match RawCheckConfig::from_env().validate() {
        Ok(config) => {
            tracing::debug!(
                socket = %config.socket_path().display(),
                target_metric = config.label(),
                timeout_secs = config.timeout().as_secs_f64(),
                "Starting check",
            );
            executor::check_isolated(&config).await
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            Outcome::warning(format!("Wrong check: {e}"))
        }
    };

    println!("{}", report::render(&outcome));
    std::process::exit(report::exit_code(outcome.status));
}
