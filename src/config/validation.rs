//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that every configured path is absolute
//! - Reject in-process bridging of functions that never see a request
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{EdgeConfig, InvokeMode};
use crate::event::EventType;
use crate::functions::FunctionKind;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: path '{value}' must start with '/'")]
    RelativePath { field: &'static str, value: String },

    #[error("{field}: must not be empty")]
    Empty { field: &'static str },

    #[error("{field}: '{value}' is not a valid URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("bridge.function: '{function}' runs at the {stage} stage, the bridge only sends origin-request events")]
    UnsupportedStage {
        function: FunctionKind,
        stage: EventType,
    },
}

pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    check_positive(&mut errors, "listener.max_body_bytes", config.listener.max_body_bytes as u64);
    check_positive(&mut errors, "listener.request_timeout_secs", config.listener.request_timeout_secs);

    check_positive(&mut errors, "bridge.invoke_timeout_secs", config.bridge.invoke_timeout_secs);
    let stage = config.bridge.function.event_type();
    if config.bridge.invoke == InvokeMode::InProcess && stage != EventType::OriginRequest {
        errors.push(ValidationError::UnsupportedStage {
            function: config.bridge.function,
            stage,
        });
    }
    if let InvokeMode::Lambda { endpoint, function_name } = &config.bridge.invoke {
        if url::Url::parse(endpoint).is_err() {
            errors.push(ValidationError::InvalidUrl {
                field: "bridge.invoke.endpoint",
                value: endpoint.clone(),
            });
        }
        if function_name.is_empty() {
            errors.push(ValidationError::Empty { field: "bridge.invoke.function_name" });
        }
    }

    check_path(&mut errors, "probe.health_path", &config.probe.health_path);
    check_positive(&mut errors, "probe.timeout_secs", config.probe.timeout_secs);
    if config.probe.fallback_host.is_empty() {
        errors.push(ValidationError::Empty { field: "probe.fallback_host" });
    }

    let routes = &config.routes;
    check_path(&mut errors, "routes.edge_prefix", &routes.edge_prefix);
    check_path(&mut errors, "routes.auth_prefix", &routes.auth_prefix);
    check_path(&mut errors, "routes.auth_callback_path", &routes.auth_callback_path);
    check_path(&mut errors, "routes.readiness_path", &routes.readiness_path);
    check_path(&mut errors, "routes.liveness_path", &routes.liveness_path);
    check_path(&mut errors, "routes.index_path", &routes.index_path);
    check_path(&mut errors, "routes.place_base", &routes.place_base);

    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_positive(errors: &mut Vec<ValidationError>, field: &'static str, value: u64) {
    if value == 0 {
        errors.push(ValidationError::Zero { field });
    }
}

fn check_path(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !value.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field,
            value: value.to_string(),
        });
    }
}
