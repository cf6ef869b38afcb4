//! JSON-RPC calls

use brp_wait_core::dto::rpc::JsonRpcRequest;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::RemoteClient;
use crate::error::{ClientError, Result};

impl RemoteClient {
    /// Ask the remote to list its methods
    ///
    /// Sends `{"jsonrpc":"2.0","method":"bevy/list","id":1,"params":{}}`.
    ///
    /// # Returns
    /// The raw response body, once it is known to be JSON
    pub async fn list_methods(&self) -> Result<String> {
        self.call(&JsonRpcRequest::list()).await
    }

    /// Send a JSON-RPC request and return the raw body of a 200 reply
    ///
    /// A JSON-RPC `error` member is not treated as a failure here; the
    /// server answered, which is what callers of this crate care about.
    pub async fn call(&self, request: &JsonRpcRequest) -> Result<String> {
        debug!(
            "Sending JSON-RPC request: method={}, id={}",
            request.method, request.id
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Check the status code and that the body is JSON
    async fn handle_response(&self, response: reqwest::Response) -> Result<String> {
        let status = response.status();

        if status != StatusCode::OK {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let body = response.text().await?;

        serde_json::from_str::<Value>(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))?;

        Ok(body)
    }
}
