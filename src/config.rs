use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::cli::GenerateArgs;
use crate::error::PulpitError;

// Precedence: CLI > env > file > defaults.

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_THINKING_BUDGET: u32 = 4096;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

const ENV_PREFIX: &str = "PULPIT_";

/// Resolved configuration for a pulpit invocation.
///
/// The API credential is optional here on purpose: its absence is a
/// recoverable condition surfaced when generation is attempted, not a
/// startup failure, so the prompt preview keeps working without a key.
#[derive(Debug, Clone, PartialEq)]
pub struct PulpitConfig {
    pub api_key: Option<String>,
    pub api_url: Url,
    pub model: String,
    pub temperature: f64,
    pub thinking_budget: u32,
    pub timeout_secs: u64,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// TOML-deserializable config file representation. All fields optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    api_url: Option<String>,
    model: Option<String>,
    temperature: Option<f64>,
    thinking_budget: Option<u32>,
    timeout_secs: Option<u64>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

/// Intermediate layer where every field is optional, used to merge sources.
#[derive(Debug, Default)]
struct ConfigLayer {
    api_key: Option<String>,
    api_url: Option<String>,
    model: Option<String>,
    temperature: Option<f64>,
    thinking_budget: Option<u32>,
    timeout_secs: Option<u64>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

impl PulpitConfig {
    /// Load configuration with precedence: CLI > env > file > defaults.
    pub fn load(config_path: Option<&Path>, cli_args: &GenerateArgs) -> anyhow::Result<Self> {
        Self::load_with_env(config_path, cli_args, real_env_var)
    }

    /// Validate resolved values that the type system cannot enforce.
    pub fn validate(&self) -> Result<(), PulpitError> {
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(PulpitError::InvalidTemperature {
                value: self.temperature,
            });
        }
        Ok(())
    }

    /// Internal constructor that accepts an env-var lookup function,
    /// enabling deterministic testing without process-global mutation.
    fn load_with_env(
        config_path: Option<&Path>,
        cli_args: &GenerateArgs,
        env_fn: fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let file_layer = match config_path {
            Some(path) => load_file_layer(path)?,
            None => ConfigLayer::default(),
        };
        let env_layer = load_env_layer(env_fn)?;
        let cli_layer = cli_layer_from(cli_args);

        let merged = merge_layers(file_layer, env_layer, cli_layer);

        let api_url_str = merged
            .api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_url = Url::parse(&api_url_str).map_err(|e| PulpitError::InvalidApiUrl {
            value: api_url_str,
            detail: e.to_string(),
        })?;

        Ok(PulpitConfig {
            api_key: merged.api_key,
            api_url,
            model: merged.model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            temperature: merged.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            thinking_budget: merged.thinking_budget.unwrap_or(DEFAULT_THINKING_BUDGET),
            timeout_secs: merged.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            log_level: merged.log_level,
            log_file: merged.log_file,
        })
    }
}

fn load_file_layer(path: &Path) -> anyhow::Result<ConfigLayer> {
    let contents = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;
    let fc: FileConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {e}", path.display()))?;
    Ok(ConfigLayer {
        api_key: fc.api_key,
        api_url: fc.api_url,
        model: fc.model,
        temperature: fc.temperature,
        thinking_budget: fc.thinking_budget,
        timeout_secs: fc.timeout_secs,
        log_level: fc.log_level,
        log_file: fc.log_file,
    })
}

fn real_env_var(suffix: &str) -> Option<String> {
    let key = format!("{ENV_PREFIX}{suffix}");
    env::var(&key).ok().filter(|v| !v.is_empty())
}

fn load_env_layer(env_fn: fn(&str) -> Option<String>) -> Result<ConfigLayer, PulpitError> {
    Ok(ConfigLayer {
        api_key: env_fn("API_KEY"),
        api_url: env_fn("API_URL"),
        model: env_fn("MODEL"),
        temperature: parse_env_f64(env_fn, "TEMPERATURE")?,
        thinking_budget: parse_env_u32(env_fn, "THINKING_BUDGET")?,
        timeout_secs: parse_env_u64(env_fn, "TIMEOUT_SECS")?,
        log_level: env_fn("LOG_LEVEL"),
        log_file: env_fn("LOG_FILE").map(PathBuf::from),
    })
}

fn cli_layer_from(args: &GenerateArgs) -> ConfigLayer {
    ConfigLayer {
        api_key: None,
        api_url: args.api_url.clone(),
        model: args.model.clone(),
        temperature: None,
        thinking_budget: None,
        timeout_secs: None,
        log_level: args.log_level.clone(),
        log_file: args.log_file.clone(),
    }
}

/// Merge three layers, later arguments winning.
fn merge_layers(file: ConfigLayer, env: ConfigLayer, cli: ConfigLayer) -> ConfigLayer {
    ConfigLayer {
        api_key: cli.api_key.or(env.api_key).or(file.api_key),
        api_url: cli.api_url.or(env.api_url).or(file.api_url),
        model: cli.model.or(env.model).or(file.model),
        temperature: cli.temperature.or(env.temperature).or(file.temperature),
        thinking_budget: cli
            .thinking_budget
            .or(env.thinking_budget)
            .or(file.thinking_budget),
        timeout_secs: cli.timeout_secs.or(env.timeout_secs).or(file.timeout_secs),
        log_level: cli.log_level.or(env.log_level).or(file.log_level),
        log_file: cli.log_file.or(env.log_file).or(file.log_file),
    }
}

fn parse_env_f64(
    env_fn: fn(&str) -> Option<String>,
    suffix: &str,
) -> Result<Option<f64>, PulpitError> {
    match env_fn(suffix) {
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|e| PulpitError::ConfigEnvParseError {
                var: format!("{ENV_PREFIX}{suffix}"),
                detail: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn parse_env_u32(
    env_fn: fn(&str) -> Option<String>,
    suffix: &str,
) -> Result<Option<u32>, PulpitError> {
    match env_fn(suffix) {
        Some(s) => s
            .parse::<u32>()
            .map(Some)
            .map_err(|e| PulpitError::ConfigEnvParseError {
                var: format!("{ENV_PREFIX}{suffix}"),
                detail: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn parse_env_u64(
    env_fn: fn(&str) -> Option<String>,
    suffix: &str,
) -> Result<Option<u64>, PulpitError> {
    match env_fn(suffix) {
        Some(s) => s
            .parse::<u64>()
            .map(Some)
            .map_err(|e| PulpitError::ConfigEnvParseError {
                var: format!("{ENV_PREFIX}{suffix}"),
                detail: e.to_string(),
            }),
        None => Ok(None),
    }
}
