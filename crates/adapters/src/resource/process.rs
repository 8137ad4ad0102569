// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-backed resource client
//!
//! Each resource is a server process speaking line-delimited JSON-RPC on
//! stdio. The session keeps the process alive; dropping it kills the process.

use super::{ResourceClient, ResourceError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use tender_core::Resource;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;

/// Method used for the capability probe
const PROBE_METHOD: &str = "tools/list";

/// Spawns resource servers as child processes
#[derive(Clone, Debug, Default)]
pub struct ProcessResourceClient;

impl ProcessResourceClient {
    pub fn new() -> Self {
        Self
    }
}

/// Live connection to a resource server process
pub struct ProcessSession {
    name: String,
    child: Mutex<Child>,
    io: Mutex<SessionIo>,
    next_id: AtomicU64,
}

struct SessionIo {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<ToolList>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct ToolList {
    #[serde(default)]
    tools: Vec<Tool>,
}

#[derive(Deserialize)]
struct Tool {
    name: String,
}

#[derive(Deserialize)]
struct RpcError {
    message: String,
}

impl ProcessSession {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the server process is still running
    pub async fn is_alive(&self) -> bool {
        matches!(self.child.lock().await.try_wait(), Ok(None))
    }

    /// Kill the server process
    pub async fn shutdown(&self) -> Result<(), ResourceError> {
        let mut child = self.child.lock().await;
        if child.try_wait()?.is_none() {
            child.kill().await?;
        }
        Ok(())
    }

    fn probe_failed(&self, reason: impl Into<String>) -> ResourceError {
        ResourceError::ProbeFailed {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ResourceClient for ProcessResourceClient {
    type Session = ProcessSession;

    async fn connect(&self, resource: &Resource) -> Result<ProcessSession, ResourceError> {
        let connect_failed = |reason: String| ResourceError::ConnectFailed {
            name: resource.name.clone(),
            reason,
        };

        let mut child = Command::new(&resource.server.command)
            .args(&resource.server.args)
            .envs(&resource.server.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| connect_failed(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| connect_failed("stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| connect_failed("stdout not captured".to_string()))?;

        Ok(ProcessSession {
            name: resource.name.clone(),
            child: Mutex::new(child),
            io: Mutex::new(SessionIo {
                stdin,
                stdout: BufReader::new(stdout),
            }),
            next_id: AtomicU64::new(1),
        })
    }

    async fn probe(&self, session: &ProcessSession) -> Result<Vec<String>, ResourceError> {
        let id = session.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method: PROBE_METHOD,
        };
        let mut line =
            serde_json::to_string(&request).map_err(|e| session.probe_failed(e.to_string()))?;
        line.push('\n');

        let mut io = session.io.lock().await;
        io.stdin.write_all(line.as_bytes()).await?;
        io.stdin.flush().await?;

        let mut reply = String::new();
        if io.stdout.read_line(&mut reply).await? == 0 {
            return Err(session.probe_failed("server closed its output"));
        }

        let response: RpcResponse = serde_json::from_str(reply.trim())
            .map_err(|e| session.probe_failed(format!("malformed reply: {}", e)))?;
        if let Some(error) = response.error {
            return Err(session.probe_failed(error.message));
        }
        let tools = response
            .result
            .ok_or_else(|| session.probe_failed("reply has no result"))?;

        Ok(tools.tools.into_iter().map(|t| t.name).collect())
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
