//! stdio transport: newline-delimited JSON-RPC on stdin/stdout.
//!
//! One JSON value per line in each direction. stdout carries protocol
//! frames only; all logging goes to stderr.

use super::error::{McpError, Result};
use super::protocol::JsonRpcResponse;
use super::server::McpServer;
use opsgenie_mcp_domain::CredentialScope;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Serve the process's stdin/stdout until EOF or cancellation
pub async fn serve_stdio(
    server: &McpServer,
    scope: CredentialScope,
    cancellation: CancellationToken,
) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    info!("Opsgenie MCP server running on stdio");
    run(server, &scope, reader, writer, cancellation).await
}

/// Read frames from `reader` and write responses to `writer`.
///
/// Returns on EOF or when `cancellation` fires. Blank lines are skipped;
/// notifications produce no output line. A line that is not UTF-8 is
/// answered with a parse error like any other malformed frame.
pub async fn run<R, W>(
    server: &McpServer,
    scope: &CredentialScope,
    mut reader: R,
    mut writer: W,
    cancellation: CancellationToken,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();

    loop {
        line.clear();
        let bytes_read = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                info!("stdio transport shutting down");
                break;
            }
            read = reader.read_until(b'\n', &mut line) => read?,
        };

        if bytes_read == 0 {
            debug!("stdin closed");
            break;
        }

        let frame = match std::str::from_utf8(&line) {
            Ok(text) => text.trim(),
            Err(e) => {
                warn!("Discarding non UTF-8 stdio frame: {}", e);
                let response = JsonRpcResponse::error(None, McpError::Parse(e.to_string()));
                write_frame(&mut writer, &response).await?;
                continue;
            }
        };
        if frame.is_empty() {
            continue;
        }
        trace!("stdio received: {}", frame);

        if let Some(response) = server.handle_text(frame, scope).await {
            write_frame(&mut writer, &response).await?;
        }
    }

    writer.flush().await?;
    Ok(())
}

async fn write_frame<W, T>(writer: &mut W, frame: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut out = serde_json::to_vec(frame)?;
    out.push(b'\n');
    writer.write_all(&out).await?;
    writer.flush().await?;
    Ok(())
}
