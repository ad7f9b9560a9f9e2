//! FaultLine CLI
//!
//! Command-line interface for checking fault injection rules and
//! previewing the decisions they produce.

#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use application::RandomSource;
use clap::{Parser, Subcommand};
use http::{HeaderMap, HeaderName, HeaderValue};
use infrastructure::{FaultLineConfig, HttpHeaders, LoggingConfig, RngSource, init_logging};
use serde::Serialize;
use tracing::info;

/// FaultLine CLI
#[derive(Parser)]
#[command(name = "faultline-cli")]
#[command(author, version, about = "HTTP fault injection rules", long_about = None)]
struct Cli {
    /// Verbosity level (overrides the configured log level)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./faultline.{toml,yaml,json} if present)
    #[arg(short, long, global = true, env = "FAULTLINE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every route's fault rules
    ///
    /// Prints the validated policy of each route as JSON.
    /// Example: faultline-cli --config faultline.toml validate
    Validate,

    /// Run many simulated requests through a route and report statistics
    ///
    /// Delays are counted, not slept.
    /// Example: faultline-cli simulate reviews --requests 100000 --seed 7
    Simulate {
        /// Route name
        route: String,

        /// Number of simulated requests
        #[arg(short = 'n', long, default_value = "10000")]
        requests: u64,

        /// Seed for reproducible runs (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Request header as name=value (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(HeaderName, HeaderValue)>,
    },

    /// Decide the fate of a single request
    ///
    /// Example: faultline-cli decide ratings -H x-envoy-fault-abort-request=503
    Decide {
        /// Route name
        route: String,

        /// Seed for reproducible runs (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Request header as name=value (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(HeaderName, HeaderValue)>,
    },
}

/// Determine log filter level from verbosity count
///
/// Zero keeps the configured level.
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Parse a `name=value` header argument
fn parse_header(arg: &str) -> Result<(HeaderName, HeaderValue), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{arg}'"))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|e| format!("invalid header name '{name}': {e}"))?;
    let value = HeaderValue::from_str(value.trim())
        .map_err(|e| format!("invalid header value for '{name}': {e}"))?;
    Ok((name, value))
}

fn header_map(headers: Vec<(HeaderName, HeaderValue)>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.append(name, value);
    }
    map
}

fn rng_for(seed: Option<u64>) -> RngSource {
    seed.map_or_else(RngSource::from_os, RngSource::seeded)
}

#[derive(Serialize)]
struct RouteReport<'a> {
    route: &'a str,
    policy: &'a domain::FaultPolicy,
}

#[derive(Serialize)]
struct SimulationReport<'a> {
    route: &'a str,
    requests: u64,
    seed: Option<u64>,
    fault_rate: f64,
    delay_rate: f64,
    abort_rate: f64,
    stats: infrastructure::FaultStatsSnapshot,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<FaultLineConfig> {
    match path {
        Some(path) => FaultLineConfig::load(Some(path))
            .with_context(|| format!("loading {}", path.display())),
        None => FaultLineConfig::load(None).context("loading configuration"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    // Set up logging based on verbosity
    let logging = match log_filter_from_verbosity(cli.verbose) {
        Some(level) => LoggingConfig {
            level: level.to_string(),
            ..config.logging.clone()
        },
        None => config.logging.clone(),
    };
    init_logging(&logging)?;

    match cli.command {
        Commands::Validate => {
            let table = config.route_table()?;
            let mut routes: Vec<_> = table.route_names().collect();
            routes.sort_unstable();

            for route in routes {
                if let Some(policy) = table.policy(route) {
                    let report = RouteReport {
                        route,
                        policy: &policy,
                    };
                    println!("{}", serde_json::to_string(&report)?);
                }
            }
            info!(routes = table.len(), "Configuration valid");
        },

        Commands::Simulate {
            route,
            requests,
            seed,
            headers,
        } => {
            let injector = config
                .injector_for(&route)?
                .with_context(|| format!("no route named '{route}'"))?;
            let headers = header_map(headers);
            let request = HttpHeaders::from(&headers);
            let mut rng = rng_for(seed);

            for _ in 0..requests {
                injector.maybe_inject(&request, &mut rng);
            }

            let stats = injector.stats();
            let report = SimulationReport {
                route: &route,
                requests,
                seed,
                fault_rate: stats.actual_fault_rate(),
                delay_rate: stats.delay_rate(),
                abort_rate: stats.abort_rate(),
                stats,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        },

        Commands::Decide {
            route,
            seed,
            headers,
        } => {
            let table = config.route_table()?;
            if table.policy(&route).is_none() {
                anyhow::bail!("no route named '{route}'");
            }
            let headers = header_map(headers);
            let mut rng = rng_for(seed);
            let outcome = decide(&table, &route, &headers, &mut rng);
            println!("{}", serde_json::to_string(&outcome)?);
        },
    }

    Ok(())
}

fn decide(
    table: &application::RouteFaultTable,
    route: &str,
    headers: &HeaderMap,
    rng: &mut impl RandomSource,
) -> domain::FaultOutcome {
    table.decide_for(route, &HttpHeaders::from(headers), rng)
}

#[cfg(test)]
mod tests {
    use application::{FaultDecisionEngine, FixedSequence, RouteFaultTable};
    use domain::{AbortCode, AbortSpec, FaultOutcome, FaultPolicy};

    use super::*;

    #[test]
    fn log_filter_verbosity_zero() {
        assert_eq!(log_filter_from_verbosity(0), None);
    }

    #[test]
    fn log_filter_verbosity_one() {
        assert_eq!(log_filter_from_verbosity(1), Some("info"));
    }

    #[test]
    fn log_filter_verbosity_two() {
        assert_eq!(log_filter_from_verbosity(2), Some("debug"));
    }

    #[test]
    fn log_filter_verbosity_three_or_more() {
        assert_eq!(log_filter_from_verbosity(3), Some("trace"));
        assert_eq!(log_filter_from_verbosity(10), Some("trace"));
    }

    #[test]
    fn parse_header_splits_on_first_equals() {
        let (name, value) = parse_header("X-Fault=a=b").unwrap();
        assert_eq!(name, "x-fault");
        assert_eq!(value, "a=b");
    }

    #[test]
    fn parse_header_rejects_missing_equals() {
        assert!(parse_header("x-fault").unwrap_err().contains("name=value"));
    }

    #[test]
    fn parse_header_rejects_bad_name() {
        assert!(parse_header("bad name=1").is_err());
    }

    #[test]
    fn decide_reads_headers() {
        let mut table =
            RouteFaultTable::new(FaultDecisionEngine::with_header_override(std::sync::Arc::new(
                application::OpaqueOverride,
            )));
        table
            .insert(
                "ratings",
                FaultPolicy::abort(AbortSpec::http_status(400).with_override_header("x-abort")),
            )
            .unwrap();
        let headers = header_map(vec![parse_header("x-abort=CUSTOM").unwrap()]);

        let outcome = decide(&table, "ratings", &headers, &mut FixedSequence::constant(0.0));
        assert_eq!(
            outcome,
            FaultOutcome::Abort {
                code: AbortCode::HeaderValue("CUSTOM".to_string())
            }
        );
    }

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "faultline-cli",
            "--config",
            "f.toml",
            "simulate",
            "reviews",
            "-n",
            "5",
            "--seed",
            "9",
            "-H",
            "a=b",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("f.toml")));
        let Commands::Simulate {
            route,
            requests,
            seed,
            headers,
        } = cli.command
        else {
            panic!("expected simulate");
        };
        assert_eq!(route, "reviews");
        assert_eq!(requests, 5);
        assert_eq!(seed, Some(9));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["faultline-cli"]).is_err());
    }
}
