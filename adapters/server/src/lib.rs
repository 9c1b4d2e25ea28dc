#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! TCP adapter that exposes the authoritative world to agent sessions.
//!
//! Every accepted connection becomes one session: a reader task parses
//! newline-delimited JSON requests and forwards them over a channel, and a
//! writer task drains a bounded outbound queue back onto the socket. A single
//! router task owns the [`World`] and the fan-out set, so all mutation is
//! serialized by construction and the first death event can never be
//! overwritten by a near-simultaneous second collision.

mod router;
mod session;

use std::net::SocketAddr;

use anyhow::Context;
use grid_hunt_world::World;
use tokio::net::TcpListener;
use tracing::info;

/// TCP server bound to one world for the lifetime of the process.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: router::RouterHandle,
}

impl Server {
    /// Binds the listener and spawns the world-owning router task.
    pub async fn bind(addr: &str, world: World) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        let local_addr = listener.local_addr().context("resolving local address")?;
        let router = router::spawn(world);
        Ok(Self {
            listener,
            local_addr,
            router,
        })
    }

    /// Address the server accepts connections on.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections until the process is stopped.
    pub async fn serve(self) -> anyhow::Result<()> {
        loop {
            let (stream, peer) = self
                .listener
                .accept()
                .await
                .context("accepting connection")?;
            info!(%peer, "connection accepted");
            session::spawn(stream, peer, self.router.clone());
        }
    }
}
