//! Server Configuration
//!
//! Settings are resolved per field from command-line flags first, then environment
//! variables, then built-in defaults.
//!
//! | Flag                 | Environment             | Default                                  |
//! |----------------------|-------------------------|------------------------------------------|
//! | `--bind`             | `WINE_BIND`             | `127.0.0.1:8000`                         |
//! | `--model`            | `WINE_MODEL_PATH`       | `models/wine_recommendation_model.json`  |
//! | `--vectorizer`       | `WINE_VECTORIZER_PATH`  | `models/wine_vectorizer.json`            |
//! | `--catalog`          | `WINE_CATALOG_PATH`     | built-in sample wines                    |
//! | `--load-retries`     | `WINE_LOAD_RETRIES`     | `5`                                      |
//! | `--load-interval-ms` | `WINE_LOAD_INTERVAL_MS` | `2000`                                   |

use crate::model::startup::RetryPolicy;
use crate::model::store::{DEFAULT_MODEL_PATH, DEFAULT_VECTORIZER_PATH};

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub retry: RetryPolicy,
}

impl ServerConfig {
    /// Resolves the configuration from the process arguments and environment.
    pub fn from_env() -> Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_sources(&args, |key| std::env::var(key).ok())
    }

    /// Resolves the configuration from explicit flags (without the program name) and an
    /// environment lookup.
    pub fn from_sources(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let flags = parse_flags(args)?;
        let lookup = |flag: &str, var: &str| flags.get(flag).cloned().or_else(|| env(var));

        let bind_addr = lookup("--bind", "WINE_BIND")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("invalid bind address: {}", bind_addr))?;

        let model_path = lookup("--model", "WINE_MODEL_PATH")
            .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string());
        let vectorizer_path = lookup("--vectorizer", "WINE_VECTORIZER_PATH")
            .unwrap_or_else(|| DEFAULT_VECTORIZER_PATH.to_string());
        let catalog_path = lookup("--catalog", "WINE_CATALOG_PATH").map(PathBuf::from);

        let defaults = RetryPolicy::default();
        let max_attempts = match lookup("--load-retries", "WINE_LOAD_RETRIES") {
            Some(value) => value
                .parse::<u32>()
                .with_context(|| format!("invalid load retry count: {}", value))?,
            None => defaults.max_attempts,
        };
        let interval = match lookup("--load-interval-ms", "WINE_LOAD_INTERVAL_MS") {
            Some(value) => Duration::from_millis(
                value
                    .parse::<u64>()
                    .with_context(|| format!("invalid load interval: {}", value))?,
            ),
            None => defaults.interval,
        };

        Ok(Self {
            bind_addr,
            model_path: PathBuf::from(model_path),
            vectorizer_path: PathBuf::from(vectorizer_path),
            catalog_path,
            retry: RetryPolicy {
                interval,
                max_attempts,
            },
        })
    }
}

const KNOWN_FLAGS: [&str; 6] = [
    "--bind",
    "--model",
    "--vectorizer",
    "--catalog",
    "--load-retries",
    "--load-interval-ms",
];

fn parse_flags(args: &[String]) -> Result<HashMap<String, String>> {
    let mut flags = HashMap::new();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if KNOWN_FLAGS.contains(&flag) {
            let value = args
                .get(i + 1)
                .with_context(|| format!("missing value for {}", flag))?;
            flags.insert(flag.to_string(), value.clone());
            i += 2;
        } else {
            tracing::debug!("Ignoring unknown argument: {}", flag);
            i += 1;
        }
    }

    Ok(flags)
}
