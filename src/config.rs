use std::str::FromStr;

use argon2::Params;
use thiserror::Error;

pub const MEMORY_COST_VAR: &str = "PASSWORD_MEMORY_COST_KIB";
pub const ITERATIONS_VAR: &str = "PASSWORD_ITERATIONS";
pub const PARALLELISM_VAR: &str = "PASSWORD_PARALLELISM";
pub const MIN_LENGTH_VAR: &str = "PASSWORD_MIN_LENGTH";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Cost parameters and policy of the password encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub memory_cost_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub min_password_length: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            memory_cost_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
            min_password_length: 8,
        }
    }
}

impl EncoderConfig {
    /// Read the configuration from the environment (and `.env` if present),
    /// falling back to defaults for unset variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            memory_cost_kib: var_or(MEMORY_COST_VAR, defaults.memory_cost_kib)?,
            iterations: var_or(ITERATIONS_VAR, defaults.iterations)?,
            parallelism: var_or(PARALLELISM_VAR, defaults.parallelism)?,
            min_password_length: var_or(MIN_LENGTH_VAR, defaults.min_password_length)?,
        })
    }
}

fn var_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match dotenvy::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(default),
    }
}
