//! TCP transport and bounded line reading.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::handlers::Handlers;
use crate::protocol::{error_codes, JsonRpcResponse};

use super::{handle_line, McpServer};

/// Per-process connection counter for log correlation.
static CONNECTION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Read one newline-terminated request of at most `max_bytes` (newline
/// included) and append it to `buf`, lossily decoded.
///
/// A request that does not fit is skipped through its newline and reported
/// as `InvalidData`; the reader is then positioned on the next request.
/// Returns 0 at EOF.
pub async fn read_line_bounded<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut String,
    max_bytes: usize,
) -> io::Result<usize> {
    let mut line = Vec::new();
    let mut limited = (&mut *reader).take(max_bytes as u64);
    limited.read_until(b'\n', &mut line).await?;

    let truncated = line.len() == max_bytes
        && line.last() != Some(&b'\n')
        && !reader.fill_buf().await?.is_empty();
    if truncated {
        let skipped = discard_through_newline(reader).await?;
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Request of {} bytes exceeds the {} byte limit",
                max_bytes + skipped,
                max_bytes
            ),
        ));
    }

    buf.push_str(&String::from_utf8_lossy(&line));
    Ok(line.len())
}

/// Drop buffered input up to and including the next newline, without
/// holding on to it. Returns how many bytes were dropped.
async fn discard_through_newline<R: AsyncBufRead + Unpin>(reader: &mut R) -> io::Result<usize> {
    let mut dropped = 0;
    loop {
        let chunk = reader.fill_buf().await?;
        if chunk.is_empty() {
            return Ok(dropped);
        }
        let (len, done) = match chunk.iter().position(|&b| b == b'\n') {
            Some(i) => (i + 1, true),
            None => (chunk.len(), false),
        };
        reader.consume(len);
        dropped += len;
        if done {
            return Ok(dropped);
        }
    }
}

impl McpServer {
    /// Serve newline-delimited JSON-RPC on `mcp.bind_address:mcp.tcp_port`.
    ///
    /// One task per client; at most `mcp.max_connections` are served at
    /// once and later clients wait for a permit.
    pub async fn run_tcp(&self) -> Result<()> {
        let bind_addr: SocketAddr = format!(
            "{}:{}",
            self.config.mcp.bind_address, self.config.mcp.tcp_port
        )
        .parse()
        .map_err(|e| {
            anyhow::anyhow!(
                "Invalid TCP bind address '{}:{}': {}",
                self.config.mcp.bind_address,
                self.config.mcp.tcp_port,
                e
            )
        })?;

        let listener = TcpListener::bind(bind_addr).await.map_err(|e| {
            error!("FATAL: Failed to bind TCP listener to {}: {}", bind_addr, e);
            anyhow::anyhow!("Failed to bind TCP listener to {}: {}", bind_addr, e)
        })?;

        info!(
            "MCP Server listening on TCP {} (max_connections={})",
            bind_addr, self.config.mcp.max_connections
        );
        self.serve(listener).await
    }

    /// Accept loop over an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        loop {
            let (stream, peer_addr) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Failed to accept TCP connection: {}", e);
                    continue;
                }
            };

            let handlers = Arc::clone(&self.handlers);
            let semaphore = Arc::clone(&self.connection_semaphore);
            let active_connections = Arc::clone(&self.active_connections);
            let request_timeout = Duration::from_secs(self.config.mcp.request_timeout);
            let max_bytes = self.config.mcp.max_payload_size;

            let conn_id = CONNECTION_COUNTER.fetch_add(1, Ordering::Relaxed);
            let conn_tag = format!("C{:03}", conn_id);

            tokio::spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(p) => p,
                    Err(_) => {
                        error!("[{}] Semaphore closed for client {}", conn_tag, peer_addr);
                        return;
                    }
                };

                let count = active_connections.fetch_add(1, Ordering::SeqCst) + 1;
                info!("[{}] Client connected: {} (active={})", conn_tag, peer_addr, count);

                if let Err(e) = handle_tcp_client(
                    stream,
                    &handlers,
                    request_timeout,
                    max_bytes,
                    &conn_tag,
                )
                .await
                {
                    warn!("[{}] Client {} error: {}", conn_tag, peer_addr, e);
                }

                let count = active_connections.fetch_sub(1, Ordering::SeqCst) - 1;
                info!("[{}] Client disconnected: {} (active={})", conn_tag, peer_addr, count);
            });
        }
    }
}

async fn handle_tcp_client(
    stream: TcpStream,
    handlers: &Handlers,
    request_timeout: Duration,
    max_bytes: usize,
    conn_tag: &str,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();

        let response = match read_line_bounded(&mut reader, &mut line, max_bytes).await {
            Ok(0) => {
                debug!("[{}] Client closed connection (EOF)", conn_tag);
                break;
            }
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                debug!("[{}] received: {}", conn_tag, trimmed);
                handle_line(handlers, trimmed, request_timeout).await
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!("[{}] Rejected oversized request: {}", conn_tag, e);
                Some(JsonRpcResponse::error(
                    None,
                    error_codes::PAYLOAD_TOO_LARGE,
                    e.to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        let Some(response) = response else {
            continue;
        };

        let response_json = serde_json::to_string(&response)?;
        debug!("[{}] sending: {}", conn_tag, response_json);
        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}
