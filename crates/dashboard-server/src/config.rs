use std::{
    env,
    net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr},
    num::ParseIntError,
    path::PathBuf,
};

use thiserror::Error;

const DEFAULT_LISTEN_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);
const DEFAULT_PREFERENCES_PATH: &str = "data/preferences.json";
const DEFAULT_PROFIT_BIAS: bool = true;

const ENV_ADDR: &str = "DASHBOARD_ADDR";
const ENV_PREFERENCES: &str = "DASHBOARD_PREFERENCES_PATH";
const ENV_SEED: &str = "DASHBOARD_SEED";
const ENV_PROFIT_BIAS: &str = "DASHBOARD_PROFIT_BIAS";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub preferences_path: PathBuf,
    /// Fixed seed for every simulator stream. Unset means OS entropy.
    pub seed: Option<u64>,
    pub profit_bias: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DASHBOARD_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(#[source] AddrParseError),
    #[error("DASHBOARD_PREFERENCES_PATH must not be empty or whitespace")]
    InvalidPreferencesPath,
    #[error("DASHBOARD_SEED must be an unsigned 64-bit integer: {0}")]
    InvalidSeed(#[source] ParseIntError),
    #[error("DASHBOARD_PROFIT_BIAS must be true or false")]
    InvalidProfitBias,
    #[error("{0} contains non-unicode data")]
    NonUnicode(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match read_env(ENV_ADDR)? {
            Some(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            None => DEFAULT_LISTEN_ADDR,
        };

        let preferences_path = match read_env(ENV_PREFERENCES)? {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::InvalidPreferencesPath);
            }
            Some(value) => PathBuf::from(value),
            None => PathBuf::from(DEFAULT_PREFERENCES_PATH),
        };

        let seed = read_env(ENV_SEED)?
            .map(|value| value.trim().parse::<u64>())
            .transpose()
            .map_err(ConfigError::InvalidSeed)?;

        let profit_bias = match read_env(ENV_PROFIT_BIAS)? {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidProfitBias)?,
            None => DEFAULT_PROFIT_BIAS,
        };

        Ok(Self {
            listen_addr,
            preferences_path,
            seed,
            profit_bias,
        })
    }
}

fn read_env(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode(key)),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
