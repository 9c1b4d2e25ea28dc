#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Hunt workspace.
//!
//! This crate defines the message surface that connects agent clients, the
//! session router, and the authoritative world. Clients submit [`Request`]
//! values describing desired queries and moves, the world answers each one
//! with a [`Response`], and the router relays broadcast announcements to
//! every other connected session. Messages travel as newline-delimited JSON;
//! the `header` field selects the variant and the remaining fields are
//! checked per variant at deserialization time.

use serde::{Deserialize, Serialize};

/// Grid value written at an item's own cell.
pub const ITEM_VALUE: f64 = 1.0;

/// Grid value written at wall body cells.
///
/// Numerically equal to [`ITEM_VALUE`]; the two are told apart by membership
/// tests against the wall and item lists, never by comparing values.
pub const WALL_VALUE: f64 = 1.0;

/// Grid value written across a wall's warning zone.
pub const WARNING_VALUE: f64 = 0.35;

/// Unique identifier assigned to an agent session.
///
/// Identifiers are handed out in connection order starting at 1 and stay
/// stable for the lifetime of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as x and y coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based horizontal index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based vertical index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Translates the cell by the provided deltas.
    ///
    /// Returns `None` when the translation would leave the non-negative
    /// coordinate space; upper bounds are the caller's concern.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<CellCoord> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(CellCoord::new(x, y))
    }

    /// Computes the Chebyshev distance between two cell coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// Movement directions an agent may request, including the diagonals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// No movement; the agent stays on its current cell.
    Stand,
    /// Movement toward decreasing x.
    Left,
    /// Movement toward increasing x.
    Right,
    /// Movement toward decreasing y.
    Up,
    /// Movement toward increasing y.
    Down,
    /// Diagonal movement toward decreasing x and decreasing y.
    UpLeft,
    /// Diagonal movement toward increasing x and decreasing y.
    UpRight,
    /// Diagonal movement toward decreasing x and increasing y.
    DownLeft,
    /// Diagonal movement toward increasing x and increasing y.
    DownRight,
}

impl Direction {
    /// Resolves the wire encoding of a direction.
    ///
    /// Returns `None` for values outside `0..=8`; the world treats those as
    /// a no-op rather than an error.
    #[must_use]
    pub const fn from_index(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Stand),
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            3 => Some(Self::Up),
            4 => Some(Self::Down),
            5 => Some(Self::UpLeft),
            6 => Some(Self::UpRight),
            7 => Some(Self::DownLeft),
            8 => Some(Self::DownRight),
            _ => None,
        }
    }

    /// Wire encoding of the direction.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Stand => 0,
            Self::Left => 1,
            Self::Right => 2,
            Self::Up => 3,
            Self::Down => 4,
            Self::UpLeft => 5,
            Self::UpRight => 6,
            Self::DownLeft => 7,
            Self::DownRight => 8,
        }
    }

    /// Cell delta applied when stepping in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Stand => (0, 0),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::UpLeft => (-1, -1),
            Self::UpRight => (1, -1),
            Self::DownLeft => (-1, 1),
            Self::DownRight => (1, 1),
        }
    }
}

/// Kinds of items hidden in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A key; the first half of an agent's hunt.
    Key,
    /// A box; the treasure the matching key opens.
    Box,
}

impl ItemKind {
    /// Gradient value written across the item's 8-neighborhood.
    ///
    /// The far ring at Chebyshev distance 2 carries half of this value, so
    /// the two kinds remain distinguishable from sensor readings alone.
    #[must_use]
    pub const fn falloff(self) -> f64 {
        match self {
            Self::Key => 0.5,
            Self::Box => 0.6,
        }
    }
}

/// Orientation of an L-pentomino wall inside its 3x3 bounding box.
///
/// The variant names the corner where the two arms of the L meet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WallRotation {
    /// Top row plus left column.
    TopLeft,
    /// Top row plus right column.
    TopRight,
    /// Left column plus bottom row.
    BottomLeft,
    /// Right column plus bottom row.
    BottomRight,
}

impl WallRotation {
    /// Resolves the numeric rotation used by map configurations.
    #[must_use]
    pub const fn from_index(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::TopLeft),
            1 => Some(Self::TopRight),
            2 => Some(Self::BottomLeft),
            3 => Some(Self::BottomRight),
            _ => None,
        }
    }

    /// Numeric encoding of the rotation.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomLeft => 2,
            Self::BottomRight => 3,
        }
    }
}

impl Default for WallRotation {
    fn default() -> Self {
        Self::TopLeft
    }
}

impl TryFrom<u8> for WallRotation {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value).ok_or_else(|| format!("invalid wall rotation {value}"))
    }
}

impl From<WallRotation> for u8 {
    fn from(rotation: WallRotation) -> Self {
        rotation.index()
    }
}

/// Announcement categories an agent may broadcast to its peers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastKind {
    /// A key was located; `owner` names the agent whose hunt it belongs to.
    KeyDiscovered,
    /// A box was located; `owner` names the agent whose hunt it belongs to.
    BoxDiscovered,
    /// The sending agent finished its hunt.
    Completed,
}

/// Requests an agent client may submit to the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "header", rename_all = "snake_case")]
pub enum Request {
    /// Queries the agent's identity, position, and local sensor value.
    GetData,
    /// Requests a single step in the encoded direction.
    Move {
        /// Wire encoding of the direction, `0..=8`; other values are a no-op.
        direction: u8,
    },
    /// Queries the configured total number of agents.
    GetNbAgents,
    /// Queries the number of agents registered so far.
    GetNbConnectedAgents,
    /// Queries which hunt the item under the agent belongs to.
    GetItemOwner,
    /// Announces a discovery or completion to every other agent.
    BroadcastMsg {
        /// Category of the announcement.
        msg_type: BroadcastKind,
        /// Cell the announcement refers to.
        position: CellCoord,
        /// Agent whose hunt the announcement concerns.
        owner: AgentId,
    },
}

/// Responses and pushed messages a client may receive from the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "header", rename_all = "snake_case")]
pub enum Response {
    /// First message on a fresh connection, carrying the assigned identity.
    Connected {
        /// Identifier assigned to the session in connection order.
        agent_id: AgentId,
    },
    /// Answer to [`Request::GetData`].
    #[serde(rename = "get_data")]
    Data {
        /// Identifier of the queried agent.
        agent_id: AgentId,
        /// Current horizontal position.
        x: u32,
        /// Current vertical position.
        y: u32,
        /// World width in cells.
        w: u32,
        /// World height in cells.
        h: u32,
        /// Gradient value of the cell the agent stands on.
        cell_val: f64,
    },
    /// Answer to [`Request::Move`].
    #[serde(rename = "move")]
    Moved {
        /// Horizontal position after the request was handled.
        x: u32,
        /// Vertical position after the request was handled.
        y: u32,
        /// Gradient value of the cell the agent stands on.
        cell_val: f64,
        /// Whether the simulation has reached its terminal state.
        game_over: bool,
        /// Cell of the fatal collision; present only on the killing reply.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        death_pos: Option<CellCoord>,
    },
    /// Answer to [`Request::GetNbAgents`].
    #[serde(rename = "get_nb_agents")]
    NbAgents {
        /// Configured total number of agents.
        nb_agents: u32,
    },
    /// Answer to [`Request::GetNbConnectedAgents`].
    #[serde(rename = "get_nb_connected_agents")]
    NbConnectedAgents {
        /// Number of agents registered so far.
        nb_connected_agents: u32,
    },
    /// Answer to [`Request::GetItemOwner`].
    #[serde(rename = "get_item_owner")]
    ItemOwner {
        /// Index of the matched item within its kind's list, if any.
        owner: Option<u32>,
        /// Kind of the matched item, if any.
        #[serde(rename = "type")]
        item: Option<ItemKind>,
    },
    /// Announcement relayed from another agent.
    #[serde(rename = "broadcast_msg")]
    Broadcast {
        /// Agent that sent the announcement.
        sender: AgentId,
        /// Category of the announcement.
        msg_type: BroadcastKind,
        /// Cell the announcement refers to.
        position: CellCoord,
        /// Agent whose hunt the announcement concerns.
        owner: AgentId,
    },
    /// No-op reply to an unrecognized or malformed message.
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_indices_round_trip() {
        for value in 0..=8 {
            let direction = Direction::from_index(value).expect("valid direction");
            assert_eq!(direction.index(), value);
        }
        assert_eq!(Direction::from_index(9), None);
    }

    #[test]
    fn opposite_directions_cancel() {
        let pairs = [
            (Direction::Left, Direction::Right),
            (Direction::Up, Direction::Down),
            (Direction::UpLeft, Direction::DownRight),
            (Direction::UpRight, Direction::DownLeft),
        ];
        for (one, other) in pairs {
            let (dx1, dy1) = one.delta();
            let (dx2, dy2) = other.delta();
            assert_eq!((dx1 + dx2, dy1 + dy2), (0, 0));
        }
    }

    #[test]
    fn offset_rejects_negative_coordinates() {
        let origin = CellCoord::new(0, 3);
        assert_eq!(origin.offset(-1, 0), None);
        assert_eq!(origin.offset(1, -1), Some(CellCoord::new(1, 2)));
    }

    #[test]
    fn chebyshev_distance_matches_expectation() {
        let origin = CellCoord::new(5, 5);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(5, 3)), 2);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(6, 4)), 1);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(5, 5)), 0);
    }

    #[test]
    fn move_request_uses_header_tag() {
        let encoded = serde_json::to_string(&Request::Move { direction: 3 }).expect("serialize");
        assert_eq!(encoded, r#"{"header":"move","direction":3}"#);
    }

    #[test]
    fn moved_reply_omits_absent_death_position() {
        let reply = Response::Moved {
            x: 4,
            y: 2,
            cell_val: 0.25,
            game_over: false,
            death_pos: None,
        };
        let encoded = serde_json::to_string(&reply).expect("serialize");
        assert!(!encoded.contains("death_pos"));

        let decoded: Response = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(decoded, reply);
    }

    #[test]
    fn unknown_header_fails_to_parse() {
        let result = serde_json::from_str::<Request>(r#"{"header":"teleport"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn wall_rotation_rejects_out_of_range_values() {
        assert!(serde_json::from_str::<WallRotation>("4").is_err());
        let rotation: WallRotation = serde_json::from_str("2").expect("deserialize");
        assert_eq!(rotation, WallRotation::BottomLeft);
    }
}
