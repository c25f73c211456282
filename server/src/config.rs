//! Environment-driven server configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory. Unparseable values fall back to their
//! defaults with a warning.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use satchel_core::constants::{
    DEFAULT_DROP_SCATTER, DEFAULT_REACH, DEFAULT_SWEEP_INTERVAL, DEFAULT_SWEEP_INTERVAL_MS,
    DEFAULT_TICK_RATE,
};

pub const ENV_SWEEP_INTERVAL_MS: &str = "SATCHEL_SWEEP_INTERVAL_MS";
pub const ENV_TICK_RATE: &str = "SATCHEL_TICK_RATE";
pub const ENV_REACH: &str = "SATCHEL_REACH";
pub const ENV_DROP_SCATTER: &str = "SATCHEL_DROP_SCATTER";
pub const ENV_LOG_LEVEL: &str = "SATCHEL_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "SATCHEL_LOG_FILE";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Cadence of the per-actor reachability sweep.
    pub sweep_interval: Duration,
    /// Apply-loop ticks per second.
    pub tick_rate: u32,
    /// Interaction distance for [`crate::hands::ActorHands`].
    pub reach: f32,
    /// Horizontal jitter for dropped items.
    pub drop_scatter: f32,
    pub log_level: LevelFilter,
    pub log_file: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            tick_rate: DEFAULT_TICK_RATE,
            reach: DEFAULT_REACH,
            drop_scatter: DEFAULT_DROP_SCATTER,
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl ServerConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                eprintln!("Ignoring unreadable .env file: {e}");
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let sweep_ms = parse_or(
            &lookup,
            ENV_SWEEP_INTERVAL_MS,
            DEFAULT_SWEEP_INTERVAL_MS,
        );
        let tick_rate = match parse_or(&lookup, ENV_TICK_RATE, defaults.tick_rate) {
            0 => {
                log::warn!("{ENV_TICK_RATE} must be positive, using {DEFAULT_TICK_RATE}");
                DEFAULT_TICK_RATE
            }
            rate => rate,
        };

        Self {
            sweep_interval: Duration::from_millis(sweep_ms),
            tick_rate,
            reach: parse_or(&lookup, ENV_REACH, defaults.reach),
            drop_scatter: parse_or(&lookup, ENV_DROP_SCATTER, defaults.drop_scatter).max(0.0),
            log_level: parse_or(&lookup, ENV_LOG_LEVEL, defaults.log_level),
            log_file: lookup(ENV_LOG_FILE).filter(|path| !path.trim().is_empty()),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            log::warn!("Invalid {key}={raw:?}, using {default:?}");
            default
        }
    }
}
