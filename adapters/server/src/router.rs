//! Single-writer router that owns the world and the broadcast fan-out.

use std::collections::BTreeMap;

use grid_hunt_core::{AgentId, BroadcastKind, CellCoord, Request, Response};
use grid_hunt_world::{self as world, World};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Bound of the router's inbound request queue.
const INBOUND_QUEUE: usize = 64;

/// Bound of each session's outbound reply queue.
///
/// A session whose queue overflows is disconnected rather than allowed to
/// stall the router or the announcing agent.
pub(crate) const OUTBOUND_QUEUE: usize = 32;

/// Messages session tasks submit to the router.
pub(crate) enum RouterMsg {
    /// A fresh connection asks for an identity and hands over its queue.
    Connect {
        /// Sender half of the session's outbound queue.
        outbound: mpsc::Sender<Response>,
        /// Acknowledgement carrying the assigned identity, if any is left.
        reply: oneshot::Sender<Option<AgentId>>,
    },
    /// A parsed request from a registered session.
    Request {
        /// Identity the session is bound to.
        agent: AgentId,
        /// The request as read off the wire.
        request: Request,
    },
    /// A session's connection ended.
    Disconnect {
        /// Identity of the departed session.
        agent: AgentId,
    },
}

/// Cloneable submission handle used by session tasks.
#[derive(Clone, Debug)]
pub(crate) struct RouterHandle {
    tx: mpsc::Sender<RouterMsg>,
}

impl RouterHandle {
    /// Registers a session and waits for its identity.
    pub(crate) async fn connect(&self, outbound: mpsc::Sender<Response>) -> Option<AgentId> {
        let (reply, ack) = oneshot::channel();
        if self
            .tx
            .send(RouterMsg::Connect { outbound, reply })
            .await
            .is_err()
        {
            return None;
        }
        ack.await.ok().flatten()
    }

    /// Forwards one parsed request to the router.
    pub(crate) async fn request(&self, agent: AgentId, request: Request) {
        let _ = self.tx.send(RouterMsg::Request { agent, request }).await;
    }

    /// Reports that a session's connection ended.
    pub(crate) async fn disconnect(&self, agent: AgentId) {
        let _ = self.tx.send(RouterMsg::Disconnect { agent }).await;
    }
}

/// Spawns the router task and returns its submission handle.
pub(crate) fn spawn(world: World) -> RouterHandle {
    let (tx, rx) = mpsc::channel(INBOUND_QUEUE);
    let _ = tokio::spawn(run(world, rx));
    RouterHandle { tx }
}

async fn run(mut world: World, mut inbound: mpsc::Receiver<RouterMsg>) {
    let mut sessions: BTreeMap<AgentId, mpsc::Sender<Response>> = BTreeMap::new();

    while let Some(message) = inbound.recv().await {
        match message {
            RouterMsg::Connect { outbound, reply } => {
                let assigned = world.register_agent();
                match assigned {
                    Some(agent) => {
                        // The identity goes into the queue before the session
                        // joins the fan-out set, so the first message a client
                        // reads is always `connected`.
                        if outbound
                            .try_send(Response::Connected { agent_id: agent })
                            .is_ok()
                        {
                            let _ = sessions.insert(agent, outbound);
                            info!(agent = agent.get(), "agent registered");
                        } else {
                            warn!(agent = agent.get(), "session vanished during registration");
                        }
                    }
                    None => warn!("connection refused, every agent is registered"),
                }
                let _ = reply.send(assigned);
            }
            RouterMsg::Request { agent, request } => match request {
                Request::BroadcastMsg {
                    msg_type,
                    position,
                    owner,
                } => relay(&mut sessions, agent, msg_type, position, owner),
                request => {
                    debug!(agent = agent.get(), ?request, "applying request");
                    let was_over = world::query::game_over(&world).is_some();
                    let response = world::apply(&mut world, agent, &request);
                    if !was_over {
                        if let Some(record) = world::query::game_over(&world) {
                            info!(
                                agent = record.agent.get(),
                                x = record.position.x(),
                                y = record.position.y(),
                                "fatal wall collision, world frozen"
                            );
                        }
                    }
                    deliver(&mut sessions, agent, response);
                }
            },
            RouterMsg::Disconnect { agent } => {
                if sessions.remove(&agent).is_some() {
                    info!(agent = agent.get(), "session closed");
                }
            }
        }
    }
}

/// Fans an announcement out to every registered session except the sender.
///
/// Delivery never blocks: a session that cannot take the message loses its
/// place in the fan-out set instead of stalling the announcing agent.
fn relay(
    sessions: &mut BTreeMap<AgentId, mpsc::Sender<Response>>,
    sender: AgentId,
    msg_type: BroadcastKind,
    position: CellCoord,
    owner: AgentId,
) {
    let message = Response::Broadcast {
        sender,
        msg_type,
        position,
        owner,
    };
    let mut stalled = Vec::new();
    for (&agent, outbound) in sessions.iter() {
        if agent == sender {
            continue;
        }
        if let Err(error) = outbound.try_send(message.clone()) {
            warn!(agent = agent.get(), %error, "dropping stalled session");
            stalled.push(agent);
        }
    }
    for agent in stalled {
        let _ = sessions.remove(&agent);
    }
    debug!(sender = sender.get(), ?msg_type, "announcement relayed");
}

fn deliver(
    sessions: &mut BTreeMap<AgentId, mpsc::Sender<Response>>,
    agent: AgentId,
    response: Response,
) {
    let Some(outbound) = sessions.get(&agent) else {
        return;
    };
    if let Err(error) = outbound.try_send(response) {
        warn!(agent = agent.get(), %error, "dropping stalled session");
        let _ = sessions.remove(&agent);
    }
}
