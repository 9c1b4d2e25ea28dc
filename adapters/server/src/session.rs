//! Per-connection session tasks: a line-framed reader and a queue-draining
//! writer.

use std::net::SocketAddr;

use grid_hunt_core::{AgentId, Request, Response};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::router::{RouterHandle, OUTBOUND_QUEUE};

/// Spawns the reader and writer tasks for one accepted connection.
pub(crate) fn spawn(stream: TcpStream, peer: SocketAddr, router: RouterHandle) {
    let _ = tokio::spawn(async move {
        if let Err(error) = run(stream, peer, router).await {
            debug!(%peer, %error, "session ended with an error");
        }
    });
}

async fn run(stream: TcpStream, peer: SocketAddr, router: RouterHandle) -> anyhow::Result<()> {
    let (read_half, write_half) = stream.into_split();
    let (outbound, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE);

    let Some(agent) = router.connect(outbound.clone()).await else {
        warn!(%peer, "rejecting surplus connection");
        return Ok(());
    };

    let _ = tokio::spawn(write_responses(write_half, outbound_rx, peer));

    let result = read_requests(read_half, agent, &outbound, &router).await;
    router.disconnect(agent).await;
    result
}

async fn read_requests(
    read_half: OwnedReadHalf,
    agent: AgentId,
    outbound: &mpsc::Sender<Response>,
    router: &RouterHandle,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(read_half).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Request>(&line) {
            Ok(request) => router.request(agent, request).await,
            Err(error) => {
                // Unrecognized headers and malformed fields get the no-op
                // reply; the connection stays open.
                debug!(agent = agent.get(), %error, "ignoring malformed request");
                if outbound.send(Response::Empty).await.is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

async fn write_responses(
    mut write_half: OwnedWriteHalf,
    mut outbound: mpsc::Receiver<Response>,
    peer: SocketAddr,
) {
    while let Some(response) = outbound.recv().await {
        let encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(error) => {
                warn!(%peer, %error, "failed to encode response");
                continue;
            }
        };
        if write_half.write_all(encoded.as_bytes()).await.is_err() {
            break;
        }
        if write_half.write_all(b"\n").await.is_err() {
            break;
        }
    }
}
