//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge
//! gateway. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::functions::FunctionKind;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Local bridge listener (bind address, limits).
    pub listener: ListenerConfig,

    /// Which edge function the bridge drives, and how.
    pub bridge: BridgeConfig,

    /// Origin health probe settings.
    pub probe: ProbeConfig,

    /// Fixed paths the edge functions answer on.
    pub routes: RoutesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration for the local bridge.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3344").
    pub bind_address: String,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,

    /// Total time allowed per bridged request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3344".to_string(),
            // Edge hosts expose at most 1 MB of request body to functions.
            max_body_bytes: 1024 * 1024,
            request_timeout_secs: 30,
        }
    }
}

/// How the bridge invokes the edge function.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InvokeMode {
    /// Run the function inside the bridge process.
    InProcess,
    /// Call a Lambda-compatible invoke endpoint (e.g. `sam local start-lambda`).
    Lambda {
        /// Endpoint base URL, e.g. "http://localhost:3343".
        endpoint: String,
        /// Function name as known to the endpoint.
        function_name: String,
    },
}

impl Default for InvokeMode {
    fn default() -> Self {
        InvokeMode::InProcess
    }
}

/// Bridge configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Edge function behind the bridge.
    pub function: FunctionKind,

    /// Invocation target.
    pub invoke: InvokeMode,

    /// `distributionId` stamped on synthesized events.
    pub distribution_id: String,

    /// Timeout for out-of-process invocations, in seconds.
    pub invoke_timeout_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            function: FunctionKind::Auth,
            invoke: InvokeMode::InProcess,
            distribution_id: "LOCAL".to_string(),
            invoke_timeout_secs: 30,
        }
    }
}

/// Origin health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Well-known origin health path.
    pub health_path: String,

    /// Per-candidate timeout in seconds.
    pub timeout_secs: u64,

    /// Service name tried after the literal host (local deployments).
    pub fallback_host: String,

    /// Verify TLS certificates and hostnames. Local deployments use self-signed certs.
    pub verify_tls: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            health_path: "/fn/__hc".to_string(),
            timeout_secs: 5,
            fallback_host: "proxy".to_string(),
            verify_tls: false,
        }
    }
}

/// Fixed paths used by the edge functions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Prefix answered by the plain edge function.
    pub edge_prefix: String,

    /// Prefix owned by the auth function.
    pub auth_prefix: String,

    /// Credential callback (POST only).
    pub auth_callback_path: String,

    /// Readiness route.
    pub readiness_path: String,

    /// Liveness route.
    pub liveness_path: String,

    /// Redirect target for the bare root.
    pub index_path: String,

    /// Base under which place pages live (`<base>/place/<id>`).
    pub place_base: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            edge_prefix: "/edge/".to_string(),
            auth_prefix: "/edge/auth/".to_string(),
            auth_callback_path: "/edge/auth/google/callback".to_string(),
            readiness_path: "/edge/hc/ready".to_string(),
            liveness_path: "/edge/hc/live".to_string(),
            index_path: "/fn/index".to_string(),
            place_base: "/fn".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
