#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Agent-side SDK for the Grid Hunt protocol.
//!
//! The client owns the transport only: it performs the connect handshake,
//! offers one typed method per request, and surfaces announcements pushed by
//! the server through a separate inbox so they never interleave with request
//! replies. Exploration strategy stays with the caller.

use std::time::Duration;

use grid_hunt_core::{AgentId, BroadcastKind, CellCoord, Direction, ItemKind, Request, Response};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// How often the startup barrier polls the server.
const BARRIER_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Capacity of the inbox holding announcements pushed by the server.
const ANNOUNCEMENT_INBOX: usize = 64;

/// Errors reported by the agent client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport failed.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
    /// The server closed the connection.
    #[error("server closed the connection")]
    ConnectionClosed,
    /// A server message could not be decoded.
    #[error("malformed server message: {0}")]
    MalformedMessage(#[from] serde_json::Error),
    /// The server answered with a different message than the request expects.
    #[error("unexpected reply: {0:?}")]
    UnexpectedReply(Response),
    /// The startup barrier did not complete within its deadline.
    #[error("peers did not connect within {0:?}")]
    BarrierTimeout(Duration),
}

/// Position, dimensions, and sensor reading reported by the server.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentData {
    /// Identifier of the agent.
    pub agent_id: AgentId,
    /// Current horizontal position.
    pub x: u32,
    /// Current vertical position.
    pub y: u32,
    /// World width in cells.
    pub w: u32,
    /// World height in cells.
    pub h: u32,
    /// Gradient value of the cell the agent stands on.
    pub cell_val: f64,
}

/// Outcome of a single move request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOutcome {
    /// Horizontal position after the request was handled.
    pub x: u32,
    /// Vertical position after the request was handled.
    pub y: u32,
    /// Gradient value of the cell the agent stands on.
    pub cell_val: f64,
    /// Whether the simulation has reached its terminal state.
    pub game_over: bool,
    /// Cell of the fatal collision; present only on the killing reply.
    pub death_pos: Option<CellCoord>,
}

/// Announcement relayed from another agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Announcement {
    /// Agent that sent the announcement.
    pub sender: AgentId,
    /// Category of the announcement.
    pub msg_type: BroadcastKind,
    /// Cell the announcement refers to.
    pub position: CellCoord,
    /// Agent whose hunt the announcement concerns.
    pub owner: AgentId,
}

/// Connection to the server bound to one agent identity.
#[derive(Debug)]
pub struct AgentClient {
    agent_id: AgentId,
    writer: OwnedWriteHalf,
    replies: mpsc::Receiver<Response>,
    announcements: mpsc::Receiver<Announcement>,
}

impl AgentClient {
    /// Connects to the server and completes the identity handshake.
    ///
    /// Fails with [`ClientError::ConnectionClosed`] when the server already
    /// registered every configured agent and drops the connection.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, writer) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        let agent_id = loop {
            let line = lines
                .next_line()
                .await?
                .ok_or(ClientError::ConnectionClosed)?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Response>(&line)? {
                Response::Connected { agent_id } => break agent_id,
                other => return Err(ClientError::UnexpectedReply(other)),
            }
        };

        let (reply_tx, replies) = mpsc::channel(1);
        let (announce_tx, announcements) = mpsc::channel(ANNOUNCEMENT_INBOX);
        let _ = tokio::spawn(read_messages(lines, reply_tx, announce_tx));

        debug!(agent = agent_id.get(), "connected");
        Ok(Self {
            agent_id,
            writer,
            replies,
            announcements,
        })
    }

    /// Identity the server assigned to this connection.
    #[must_use]
    pub fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// Queries position, world dimensions, and the local sensor value.
    pub async fn data(&mut self) -> Result<AgentData, ClientError> {
        match self.request(&Request::GetData).await? {
            Response::Data {
                agent_id,
                x,
                y,
                w,
                h,
                cell_val,
            } => Ok(AgentData {
                agent_id,
                x,
                y,
                w,
                h,
                cell_val,
            }),
            other => Err(ClientError::UnexpectedReply(other)),
        }
    }

    /// Requests a single step in the provided direction.
    pub async fn step(&mut self, direction: Direction) -> Result<MoveOutcome, ClientError> {
        let request = Request::Move {
            direction: direction.index(),
        };
        match self.request(&request).await? {
            Response::Moved {
                x,
                y,
                cell_val,
                game_over,
                death_pos,
            } => Ok(MoveOutcome {
                x,
                y,
                cell_val,
                game_over,
                death_pos,
            }),
            other => Err(ClientError::UnexpectedReply(other)),
        }
    }

    /// Queries the configured total number of agents.
    pub async fn nb_agents(&mut self) -> Result<u32, ClientError> {
        match self.request(&Request::GetNbAgents).await? {
            Response::NbAgents { nb_agents } => Ok(nb_agents),
            other => Err(ClientError::UnexpectedReply(other)),
        }
    }

    /// Queries the number of agents registered so far.
    pub async fn nb_connected_agents(&mut self) -> Result<u32, ClientError> {
        match self.request(&Request::GetNbConnectedAgents).await? {
            Response::NbConnectedAgents {
                nb_connected_agents,
            } => Ok(nb_connected_agents),
            other => Err(ClientError::UnexpectedReply(other)),
        }
    }

    /// Queries which hunt the item under the agent belongs to.
    pub async fn item_owner(&mut self) -> Result<Option<(u32, ItemKind)>, ClientError> {
        match self.request(&Request::GetItemOwner).await? {
            Response::ItemOwner { owner, item } => Ok(owner.zip(item)),
            other => Err(ClientError::UnexpectedReply(other)),
        }
    }

    /// Announces a discovery or completion to every other agent.
    ///
    /// Fire-and-forget: the server relays without acknowledging, so this
    /// returns as soon as the message is written.
    pub async fn announce(
        &mut self,
        msg_type: BroadcastKind,
        position: CellCoord,
        owner: AgentId,
    ) -> Result<(), ClientError> {
        let request = Request::BroadcastMsg {
            msg_type,
            position,
            owner,
        };
        self.write_line(&request).await
    }

    /// Waits for the next announcement pushed by the server.
    ///
    /// Returns `None` once the connection is gone.
    pub async fn next_announcement(&mut self) -> Option<Announcement> {
        self.announcements.recv().await
    }

    /// Takes an already-delivered announcement without waiting.
    #[must_use]
    pub fn try_next_announcement(&mut self) -> Option<Announcement> {
        self.announcements.try_recv().ok()
    }

    /// Polls the server until every configured agent has registered.
    ///
    /// The wait is bounded: [`ClientError::BarrierTimeout`] is reported once
    /// the deadline passes, so a missing peer never hangs the caller.
    pub async fn wait_for_peers(&mut self, timeout: Duration) -> Result<(), ClientError> {
        let deadline = Instant::now() + timeout;
        loop {
            let expected = self.nb_agents().await?;
            let connected = self.nb_connected_agents().await?;
            if expected == connected {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ClientError::BarrierTimeout(timeout));
            }
            sleep(BARRIER_POLL_INTERVAL).await;
        }
    }

    async fn request(&mut self, request: &Request) -> Result<Response, ClientError> {
        self.write_line(request).await?;
        self.replies
            .recv()
            .await
            .ok_or(ClientError::ConnectionClosed)
    }

    async fn write_line(&mut self, request: &Request) -> Result<(), ClientError> {
        let mut encoded = serde_json::to_string(request)?;
        encoded.push('\n');
        self.writer.write_all(encoded.as_bytes()).await?;
        Ok(())
    }
}

/// Splits the inbound stream into request replies and pushed announcements.
async fn read_messages(
    mut lines: Lines<BufReader<OwnedReadHalf>>,
    replies: mpsc::Sender<Response>,
    announcements: mpsc::Sender<Announcement>,
) {
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) | Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Response>(&line) {
            Ok(Response::Broadcast {
                sender,
                msg_type,
                position,
                owner,
            }) => {
                let announcement = Announcement {
                    sender,
                    msg_type,
                    position,
                    owner,
                };
                if announcements.send(announcement).await.is_err() {
                    break;
                }
            }
            Ok(response) => {
                if replies.send(response).await.is_err() {
                    break;
                }
            }
            Err(error) => debug!(%error, "ignoring malformed server message"),
        }
    }
}
