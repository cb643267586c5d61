use std::env;
use std::str::FromStr;

use log::warn;

use crate::blockchain::{DEFAULT_DIFFICULTY, DEFAULT_GENESIS_PAYLOAD, DIFF_MAX};
use crate::pow::miner::DEFAULT_PROGRESS_INTERVAL;

/// Runtime settings read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    pub progress_interval: u64,
    pub nickname: String,
    pub genesis_payload: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            difficulty: DEFAULT_DIFFICULTY,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            nickname: "alice".to_string(),
            genesis_payload: DEFAULT_GENESIS_PAYLOAD.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let mut difficulty = parse_or(&lookup, "POW_DIFFICULTY", defaults.difficulty);
        if difficulty > DIFF_MAX {
            warn!("POW_DIFFICULTY={difficulty} above max {DIFF_MAX}; clamping");
            difficulty = DIFF_MAX;
        }

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            difficulty,
            progress_interval: parse_or(
                &lookup,
                "POW_PROGRESS_INTERVAL",
                defaults.progress_interval,
            ),
            nickname: lookup("POW_NICKNAME").unwrap_or(defaults.nickname),
            genesis_payload: lookup("GENESIS_PAYLOAD").unwrap_or(defaults.genesis_payload),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {key}={raw:?}; using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Config::from_lookup(|_| None), Config::default());
    }

    #[test]
    fn default_nickname_is_a_placeholder() {
        assert_eq!(Config::default().nickname, "alice");
    }

    #[test]
    fn reads_values() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("POW_DIFFICULTY", "3"),
            ("POW_NICKNAME", "bob"),
        ]));
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.difficulty, 3);
        assert_eq!(cfg.nickname, "bob");
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = Config::from_lookup(lookup_from(&[("PORT", "http"), ("POW_DIFFICULTY", "-1")]));
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.difficulty, DEFAULT_DIFFICULTY);
    }

    #[test]
    fn difficulty_is_clamped() {
        let cfg = Config::from_lookup(lookup_from(&[("POW_DIFFICULTY", "12")]));
        assert_eq!(cfg.difficulty, DIFF_MAX);
    }
}
