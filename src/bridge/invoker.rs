//! Edge function invocation targets.

use std::sync::Arc;
use std::time::Duration;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;
use thiserror::Error;

use crate::config::{EdgeConfig, InvokeMode};
use crate::functions::{EdgeFunction, FunctionError};

/// Failures talking to the edge function.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{0}")]
    Function(#[from] FunctionError),

    #[error("invoke request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid invoke endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("invoke endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("function error: {0}")]
    FunctionFailed(String),

    #[error("function returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Something that runs an edge event and returns the function's result.
pub trait Invoker: Send + Sync {
    fn invoke(&self, event: Value) -> BoxFuture<'_, Result<Value, BridgeError>>;
}

/// Runs the function inside the bridge process.
#[derive(Debug, Clone)]
pub struct InProcessInvoker {
    function: Arc<EdgeFunction>,
}

impl InProcessInvoker {
    pub fn new(function: EdgeFunction) -> Self {
        Self {
            function: Arc::new(function),
        }
    }
}

impl Invoker for InProcessInvoker {
    fn invoke(&self, event: Value) -> BoxFuture<'_, Result<Value, BridgeError>> {
        async move { Ok(self.function.invoke(event).await?) }.boxed()
    }
}

/// Calls `POST <endpoint>/2015-03-31/functions/<name>/invocations`, the
/// invoke API local Lambda emulators expose.
#[derive(Debug, Clone)]
pub struct LambdaInvoker {
    client: reqwest::Client,
    invoke_url: url::Url,
}

impl LambdaInvoker {
    pub fn new(endpoint: &str, function_name: &str, timeout: Duration) -> Result<Self, BridgeError> {
        let invoke_url = url::Url::parse(endpoint)?
            .join(&format!("/2015-03-31/functions/{}/invocations", function_name))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()?;

        tracing::info!(url = %invoke_url, "Lambda invoker configured");
        Ok(Self { client, invoke_url })
    }

    pub fn invoke_url(&self) -> &url::Url {
        &self.invoke_url
    }

    async fn call(&self, event: Value) -> Result<Value, BridgeError> {
        let response = self
            .client
            .post(self.invoke_url.clone())
            .json(&event)
            .send()
            .await?;

        let status = response.status();
        let function_error = response.headers().contains_key("x-amz-function-error");
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BridgeError::Status {
                status: status.as_u16(),
                body,
            });
        }
        if function_error {
            return Err(BridgeError::FunctionFailed(body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl Invoker for LambdaInvoker {
    fn invoke(&self, event: Value) -> BoxFuture<'_, Result<Value, BridgeError>> {
        self.call(event).boxed()
    }
}

/// Build the invoker the configuration asks for.
pub fn invoker_from_config(config: &EdgeConfig) -> Result<Arc<dyn Invoker>, BridgeError> {
    let function = config.bridge.function;
    match &config.bridge.invoke {
        InvokeMode::InProcess => {
            tracing::info!(function = %function, "Running edge function in process");
            Ok(Arc::new(InProcessInvoker::new(EdgeFunction::from_config(function, config)?)))
        }
        InvokeMode::Lambda {
            endpoint,
            function_name,
        } => Ok(Arc::new(LambdaInvoker::new(
            endpoint,
            function_name,
            Duration::from_secs(config.bridge.invoke_timeout_secs),
        )?)),
    }
}
