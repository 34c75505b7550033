//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{EdgeConfig, InvokeMode};
use crate::config::validation::{validate_config, ValidationError};
use crate::functions::FunctionKind;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// Environment overrides are applied after parsing and before validation.
pub fn load_config(path: &Path) -> Result<EdgeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: EdgeConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load from `path` when given, otherwise start from defaults. Environment
/// overrides and validation apply either way.
pub fn resolve_config(path: Option<&Path>) -> Result<EdgeConfig, ConfigError> {
    if let Some(path) = path {
        return load_config(path);
    }

    let mut config = EdgeConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `EDGE_*` overrides using `lookup` to read variables.
///
/// Takes the lookup as a function so the process environment is only read at
/// the composition point.
pub fn apply_env_overrides<F>(config: &mut EdgeConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = lookup("EDGE_BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }

    if let Some(name) = lookup("EDGE_FUNCTION") {
        config.bridge.function = name.parse::<FunctionKind>().map_err(|_| ConfigError::Env {
            var: "EDGE_FUNCTION",
            value: name.clone(),
        })?;
    }

    match (lookup("EDGE_LAMBDA_ENDPOINT"), lookup("EDGE_FUNCTION_NAME")) {
        (Some(endpoint), Some(function_name)) => {
            config.bridge.invoke = InvokeMode::Lambda {
                endpoint,
                function_name,
            };
        }
        (Some(endpoint), None) => {
            let function_name = match &config.bridge.invoke {
                InvokeMode::Lambda { function_name, .. } => function_name.clone(),
                InvokeMode::InProcess => config.bridge.function.default_lambda_name().to_string(),
            };
            config.bridge.invoke = InvokeMode::Lambda {
                endpoint,
                function_name,
            };
        }
        (None, Some(name)) => {
            if let InvokeMode::Lambda { function_name, .. } = &mut config.bridge.invoke {
                *function_name = name;
            } else {
                return Err(ConfigError::Env {
                    var: "EDGE_FUNCTION_NAME",
                    value: name,
                });
            }
        }
        (None, None) => {}
    }

    if let Some(host) = lookup("EDGE_PROBE_FALLBACK_HOST") {
        config.probe.fallback_host = host;
    }

    if let Some(level) = lookup("EDGE_LOG_LEVEL") {
        config.observability.log_level = level;
    }

    Ok(())
}
