//! JSON-RPC 2.0 session client over TCP.
//!
//! Each call opens its own connection, writes one request line and reads one
//! response line. Calls are independent; concurrent calls may complete in
//! any order.
//!
//! Methods:
//! - `session.get` - fetch `{grid_layout, active_modules}`
//! - `session.update_grid` - replace the grid layout
//! - `session.update_modules` - replace the active module list
//! - `layouts.save_template` - store a named template
//! - `layouts.list_templates` - list stored templates
//! - `layouts.apply_template` - fetch one template by id

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use uuid::Uuid;

use panegrid_layout::{Layout, ModuleInstanceId};

use crate::remote::{LayoutTemplate, RemoteFuture, RemoteSession, RemoteSessionClient};
use crate::SessionError;

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub params: Value,
}

impl RpcRequest {
    pub fn new(method: &str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            id: Some(Uuid::new_v4().to_string()),
            params,
        }
    }
}

/// JSON-RPC response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    pub fn success(id: Option<String>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<String>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(RpcErrorObject {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// [`RemoteSessionClient`] speaking line-delimited JSON-RPC to `addr`.
#[derive(Debug, Clone)]
pub struct RpcSessionClient {
    addr: String,
}

impl RpcSessionClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Send one request and return its `result`.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, SessionError> {
        let request = RpcRequest::new(method, params);
        let stream = TcpStream::connect(&self.addr).await?;
        let (reader, mut writer) = stream.into_split();

        let mut line = serde_json::to_string(&request)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;

        let mut lines = BufReader::new(reader).lines();
        let Some(reply) = lines.next_line().await? else {
            return Err(SessionError::Remote(format!(
                "{} closed the connection before answering {method}",
                self.addr
            )));
        };
        let response: RpcResponse = serde_json::from_str(&reply)?;

        if response.id.is_some() && response.id != request.id {
            return Err(SessionError::Remote(format!(
                "response id {:?} does not match request id {:?}",
                response.id, request.id
            )));
        }
        if let Some(error) = response.error {
            tracing::debug!(method, code = error.code, message = %error.message, "RPC call failed");
            return Err(SessionError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        // serde reads `"result": null` as `None`; both mean a null result.
        Ok(response.result.unwrap_or(Value::Null))
    }

    async fn call_typed<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, SessionError> {
        let result = self.call(method, params).await?;
        Ok(serde_json::from_value(result)?)
    }
}

impl RemoteSessionClient for RpcSessionClient {
    fn fetch_session(&self) -> RemoteFuture<'_, RemoteSession> {
        Box::pin(async move {
            let result = self.call("session.get", json!({})).await?;
            if result.is_null() {
                return Ok(RemoteSession::default());
            }
            Ok(serde_json::from_value(result)?)
        })
    }

    fn update_grid_layout<'a>(&'a self, layout: &'a Layout) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.call("session.update_grid", json!({ "grid_layout": layout }))
                .await?;
            Ok(())
        })
    }

    fn update_active_modules<'a>(&'a self, modules: &'a [ModuleInstanceId]) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.call("session.update_modules", json!({ "active_modules": modules }))
                .await?;
            Ok(())
        })
    }

    fn save_template<'a>(
        &'a self,
        name: &'a str,
        grid: &'a Layout,
        modules: &'a [ModuleInstanceId],
    ) -> RemoteFuture<'a, LayoutTemplate> {
        Box::pin(async move {
            self.call_typed(
                "layouts.save_template",
                json!({ "name": name, "grid": grid, "modules": modules }),
            )
            .await
        })
    }

    fn list_templates(&self) -> RemoteFuture<'_, Vec<LayoutTemplate>> {
        Box::pin(async move { self.call_typed("layouts.list_templates", json!({})).await })
    }

    fn apply_template(&self, id: Uuid) -> RemoteFuture<'_, LayoutTemplate> {
        Box::pin(async move {
            self.call_typed("layouts.apply_template", json!({ "id": id }))
                .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_envelope() {
        let request = RpcRequest::new("session.get", json!({}));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "session.get");
        assert!(json["id"].is_string());
    }

    #[test]
    fn test_error_response_omits_result() {
        let response = RpcResponse::error(Some("1".into()), -32601, "Method not found");
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("result").is_none());
        assert_eq!(json["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_connection_refused_is_io_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = RpcSessionClient::new(addr.to_string());
        let err = client.fetch_session().await.unwrap_err();
        assert!(matches!(err, SessionError::Io(_)), "got {err:?}");
    }
}
