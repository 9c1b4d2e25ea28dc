#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Grid Hunt simulation.
//!
//! The world owns the generated sensor field, the item and wall records, and
//! every agent's position. All mutation flows through [`apply`], one request
//! at a time, attributed to one agent; observers read through the [`query`]
//! module and never see mutable state. The sensor field is built once by the
//! generator in [`field`] when the world is constructed and is immutable
//! afterwards.

pub mod config;
mod field;

use std::collections::HashSet;

use grid_hunt_core::{
    AgentId, CellCoord, Direction, ItemKind, Request, Response, WallRotation, ITEM_VALUE,
};
use thiserror::Error;

use crate::config::MapConfig;
use crate::field::SignalField;

/// Errors reported while building a world from a map configuration.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The map has a zero dimension.
    #[error("map dimensions must be positive, got {width}x{height}")]
    EmptyMap {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// No agents were requested.
    #[error("at least one agent is required")]
    NoAgents,
    /// The map defines fewer agent starts than requested.
    #[error("map defines {found} agent starts, {needed} requested")]
    MissingAgents {
        /// Number of agents requested.
        needed: u32,
        /// Number of starts the map defines.
        found: usize,
    },
    /// The map defines fewer keys than requested agents.
    #[error("map defines {found} keys, {needed} requested")]
    MissingKeys {
        /// Number of agents requested.
        needed: u32,
        /// Number of keys the map defines.
        found: usize,
    },
    /// The map defines fewer boxes than requested agents.
    #[error("map defines {found} boxes, {needed} requested")]
    MissingBoxes {
        /// Number of agents requested.
        needed: u32,
        /// Number of boxes the map defines.
        found: usize,
    },
    /// An agent start lies outside the map.
    #[error("agent {id} starts out of bounds at ({x}, {y})")]
    StartOutOfBounds {
        /// Identifier the agent would have received.
        id: u32,
        /// Configured horizontal start.
        x: u32,
        /// Configured vertical start.
        y: u32,
    },
}

/// A key or box fixed on the map at build time.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Item {
    /// Cell the item occupies.
    pub(crate) cell: CellCoord,
    /// Whether the item is a key or a box.
    pub(crate) kind: ItemKind,
}

/// An L-pentomino wall with its precomputed footprint.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Wall {
    cells: [CellCoord; 5],
}

impl Wall {
    /// Creates a wall anchored at the top-left of its 3x3 bounding box.
    pub(crate) fn new(anchor: CellCoord, rotation: WallRotation) -> Self {
        let offsets: [(u32, u32); 5] = match rotation {
            WallRotation::TopLeft => [(0, 0), (1, 0), (2, 0), (0, 1), (0, 2)],
            WallRotation::TopRight => [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)],
            WallRotation::BottomLeft => [(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)],
            WallRotation::BottomRight => [(2, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
        };
        let cells = offsets.map(|(dx, dy)| CellCoord::new(anchor.x() + dx, anchor.y() + dy));
        Self { cells }
    }

    /// The five body cells of the wall.
    #[must_use]
    pub(crate) fn cells(&self) -> [CellCoord; 5] {
        self.cells
    }

    /// All 8-neighbors of the body, excluding the body itself.
    ///
    /// Coordinates are signed because the ring may reach past the map's
    /// origin; the generator clips against the bounds.
    #[must_use]
    pub(crate) fn warning_zone(&self) -> HashSet<(i64, i64)> {
        let body: HashSet<(i64, i64)> = self
            .cells
            .iter()
            .map(|cell| (i64::from(cell.x()), i64::from(cell.y())))
            .collect();
        let mut zone = HashSet::new();
        for &(x, y) in &body {
            for dy in -1_i64..=1 {
                for dx in -1_i64..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let neighbor = (x + dx, y + dy);
                    if !body.contains(&neighbor) {
                        let _ = zone.insert(neighbor);
                    }
                }
            }
        }
        zone
    }

    /// Whether the provided cell belongs to the wall body.
    #[must_use]
    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        self.cells.iter().any(|body| *body == cell)
    }
}

/// Terminal record captured when an agent walks into a wall body.
///
/// Once set it never clears, and its content is never overwritten by a later
/// collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOver {
    /// Cell of the fatal collision.
    pub position: CellCoord,
    /// Agent that walked into the wall.
    pub agent: AgentId,
}

#[derive(Clone, Debug)]
struct AgentState {
    id: AgentId,
    cell: CellCoord,
    color: [u8; 3],
    path: Vec<CellCoord>,
}

/// Represents the authoritative Grid Hunt world state.
#[derive(Debug)]
pub struct World {
    width: u32,
    height: u32,
    field: SignalField,
    keys: Vec<Item>,
    boxes: Vec<Item>,
    walls: Vec<Wall>,
    agents: Vec<AgentState>,
    expected_agents: u32,
    connected: u32,
    game_over: Option<GameOver>,
}

impl World {
    /// Builds a world from a map configuration for the given agent count.
    ///
    /// The map must define a start, a key, and a box for every requested
    /// agent; surplus entries are ignored. Item placements are trusted as-is,
    /// matching the generator's contract.
    pub fn from_map(map: &MapConfig, nb_agents: u32) -> Result<Self, WorldError> {
        if map.width == 0 || map.height == 0 {
            return Err(WorldError::EmptyMap {
                width: map.width,
                height: map.height,
            });
        }
        if nb_agents == 0 {
            return Err(WorldError::NoAgents);
        }

        let needed = usize::try_from(nb_agents).unwrap_or(usize::MAX);
        if map.agents.len() < needed {
            return Err(WorldError::MissingAgents {
                needed: nb_agents,
                found: map.agents.len(),
            });
        }
        if map.keys.len() < needed {
            return Err(WorldError::MissingKeys {
                needed: nb_agents,
                found: map.keys.len(),
            });
        }
        if map.boxes.len() < needed {
            return Err(WorldError::MissingBoxes {
                needed: nb_agents,
                found: map.boxes.len(),
            });
        }

        let mut agents = Vec::with_capacity(needed);
        for (slot, start) in map.agents.iter().take(needed).enumerate() {
            let id = AgentId::new(slot as u32 + 1);
            if start.x >= map.width || start.y >= map.height {
                return Err(WorldError::StartOutOfBounds {
                    id: id.get(),
                    x: start.x,
                    y: start.y,
                });
            }
            let cell = CellCoord::new(start.x, start.y);
            agents.push(AgentState {
                id,
                cell,
                color: start.color,
                path: vec![cell],
            });
        }

        let keys: Vec<Item> = map
            .keys
            .iter()
            .take(needed)
            .map(|placement| Item {
                cell: CellCoord::new(placement.x, placement.y),
                kind: ItemKind::Key,
            })
            .collect();
        let boxes: Vec<Item> = map
            .boxes
            .iter()
            .take(needed)
            .map(|placement| Item {
                cell: CellCoord::new(placement.x, placement.y),
                kind: ItemKind::Box,
            })
            .collect();
        let walls: Vec<Wall> = map
            .walls
            .iter()
            .map(|placement| Wall::new(CellCoord::new(placement.x, placement.y), placement.rotation))
            .collect();

        let all_items: Vec<Item> = keys.iter().copied().chain(boxes.iter().copied()).collect();
        let field = field::generate(map.width, map.height, &all_items, &walls);

        Ok(Self {
            width: map.width,
            height: map.height,
            field,
            keys,
            boxes,
            walls,
            agents,
            expected_agents: nb_agents,
            connected: 0,
            game_over: None,
        })
    }

    /// Binds the next free identity to a freshly accepted session.
    ///
    /// Identities are handed out in call order starting at 1. Returns `None`
    /// once every configured agent has registered; agents are never removed,
    /// so the count only grows.
    pub fn register_agent(&mut self) -> Option<AgentId> {
        if self.connected >= self.expected_agents {
            return None;
        }
        self.connected += 1;
        Some(AgentId::new(self.connected))
    }

    fn agent(&self, agent: AgentId) -> Option<&AgentState> {
        let slot = usize::try_from(agent.get().checked_sub(1)?).ok()?;
        self.agents.get(slot)
    }

    fn agent_mut(&mut self, agent: AgentId) -> Option<&mut AgentState> {
        let slot = usize::try_from(agent.get().checked_sub(1)?).ok()?;
        self.agents.get_mut(slot)
    }

    fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.x() < self.width && cell.y() < self.height
    }

    fn cell_value(&self, cell: CellCoord) -> f64 {
        self.field.value(cell).unwrap_or_default()
    }

    fn is_wall_body(&self, cell: CellCoord) -> bool {
        self.walls.iter().any(|wall| wall.contains(cell))
    }

    fn is_item_cell(&self, cell: CellCoord) -> bool {
        self.keys
            .iter()
            .chain(self.boxes.iter())
            .any(|item| item.cell == cell)
    }
}

/// Applies a single request attributed to the given agent.
///
/// Only legal moves mutate the world; every other outcome answers with the
/// current state. Requests from identities the world has never handed out
/// receive the no-op reply.
pub fn apply(world: &mut World, agent: AgentId, request: &Request) -> Response {
    match request {
        Request::GetData => match world.agent(agent) {
            Some(state) => Response::Data {
                agent_id: agent,
                x: state.cell.x(),
                y: state.cell.y(),
                w: world.width,
                h: world.height,
                cell_val: world.cell_value(state.cell),
            },
            None => Response::Empty,
        },
        Request::Move { direction } => handle_move(world, agent, *direction),
        Request::GetNbAgents => Response::NbAgents {
            nb_agents: world.expected_agents,
        },
        Request::GetNbConnectedAgents => Response::NbConnectedAgents {
            nb_connected_agents: world.connected,
        },
        Request::GetItemOwner => handle_item_owner(world, agent),
        // Announcements are relayed by the router; their content never
        // reaches the world.
        Request::BroadcastMsg { .. } => Response::Empty,
    }
}

fn handle_move(world: &mut World, agent: AgentId, direction: u8) -> Response {
    let Some(current) = world.agent(agent).map(|state| state.cell) else {
        return Response::Empty;
    };

    if world.game_over.is_some() {
        return moved_reply(world, current, true, None);
    }

    // Malformed direction values and out-of-bounds targets stay in place.
    let candidate = Direction::from_index(direction)
        .map(Direction::delta)
        .and_then(|(dx, dy)| current.offset(dx, dy))
        .filter(|cell| world.in_bounds(*cell));
    let Some(destination) = candidate else {
        return moved_reply(world, current, false, None);
    };

    if world.is_wall_body(destination) && !world.is_item_cell(destination) {
        world.game_over = Some(GameOver {
            position: destination,
            agent,
        });
        return moved_reply(world, current, true, Some(destination));
    }

    if let Some(state) = world.agent_mut(agent) {
        state.cell = destination;
        if state.path.last() != Some(&destination) {
            state.path.push(destination);
        }
    }
    moved_reply(world, destination, false, None)
}

fn moved_reply(
    world: &World,
    cell: CellCoord,
    game_over: bool,
    death_pos: Option<CellCoord>,
) -> Response {
    Response::Moved {
        x: cell.x(),
        y: cell.y(),
        cell_val: world.cell_value(cell),
        game_over,
        death_pos,
    }
}

fn handle_item_owner(world: &World, agent: AgentId) -> Response {
    let Some(cell) = world.agent(agent).map(|state| state.cell) else {
        return Response::Empty;
    };

    // A wall body can share the item value, so membership decides ownership.
    if world.cell_value(cell) != ITEM_VALUE {
        return Response::ItemOwner {
            owner: None,
            item: None,
        };
    }
    for (index, item) in world.keys.iter().enumerate() {
        if item.cell == cell {
            return Response::ItemOwner {
                owner: Some(index as u32),
                item: Some(ItemKind::Key),
            };
        }
    }
    for (index, item) in world.boxes.iter().enumerate() {
        if item.cell == cell {
            return Response::ItemOwner {
                owner: Some(index as u32),
                item: Some(ItemKind::Box),
            };
        }
    }
    Response::ItemOwner {
        owner: None,
        item: None,
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use grid_hunt_core::{AgentId, CellCoord, ItemKind};

    use super::{GameOver, SignalField, World};

    /// World dimensions as (width, height) in cells.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.width, world.height)
    }

    /// Configured total number of agents.
    #[must_use]
    pub fn expected_agents(world: &World) -> u32 {
        world.expected_agents
    }

    /// Number of agents registered so far.
    #[must_use]
    pub fn connected_agents(world: &World) -> u32 {
        world.connected
    }

    /// Terminal record, if the simulation has ended.
    #[must_use]
    pub fn game_over(world: &World) -> Option<GameOver> {
        world.game_over
    }

    /// Exposes a read-only view of the generated sensor field.
    #[must_use]
    pub fn field_view(world: &World) -> FieldView<'_> {
        FieldView {
            field: &world.field,
        }
    }

    /// Captures a read-only view of every agent, sorted by identifier.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView {
        let mut snapshots: Vec<AgentSnapshot> = world
            .agents
            .iter()
            .map(|state| AgentSnapshot {
                id: state.id,
                cell: state.cell,
                color: state.color,
                path: state.path.clone(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        AgentView { snapshots }
    }

    /// Lists every item on the map, keys first.
    #[must_use]
    pub fn item_view(world: &World) -> Vec<ItemSnapshot> {
        world
            .keys
            .iter()
            .chain(world.boxes.iter())
            .map(|item| ItemSnapshot {
                cell: item.cell,
                kind: item.kind,
            })
            .collect()
    }

    /// Lists every wall footprint on the map.
    #[must_use]
    pub fn wall_view(world: &World) -> Vec<WallSnapshot> {
        world
            .walls
            .iter()
            .map(|wall| WallSnapshot {
                cells: wall.cells(),
            })
            .collect()
    }

    /// Read-only view into the dense sensor field.
    #[derive(Clone, Copy, Debug)]
    pub struct FieldView<'a> {
        pub(super) field: &'a SignalField,
    }

    impl FieldView<'_> {
        /// Value stored for the provided cell, if it lies within the field.
        #[must_use]
        pub fn value(&self, cell: CellCoord) -> Option<f64> {
            self.field.value(cell)
        }

        /// Dense cell values stored in row-major order.
        #[must_use]
        pub fn cells(&self) -> &[f64] {
            self.field.cells()
        }

        /// Dimensions of the field as (width, height).
        #[must_use]
        pub fn dimensions(&self) -> (u32, u32) {
            self.field.dimensions()
        }
    }

    /// Immutable representation of a single agent's state used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct AgentSnapshot {
        /// Identifier assigned to the agent.
        pub id: AgentId,
        /// Cell the agent currently occupies.
        pub cell: CellCoord,
        /// Cosmetic color from the map configuration.
        pub color: [u8; 3],
        /// Trail of visited cells in visit order.
        pub path: Vec<CellCoord>,
    }

    /// Read-only snapshot describing every agent in the world.
    #[derive(Clone, Debug, Default)]
    pub struct AgentView {
        snapshots: Vec<AgentSnapshot>,
    }

    impl AgentView {
        /// Iterator over the captured agent snapshots in identifier order.
        pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<AgentSnapshot> {
            self.snapshots
        }
    }

    /// Position and kind of one item.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ItemSnapshot {
        /// Cell the item occupies.
        pub cell: CellCoord,
        /// Whether the item is a key or a box.
        pub kind: ItemKind,
    }

    /// Footprint of one wall.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct WallSnapshot {
        /// The five body cells of the wall.
        pub cells: [CellCoord; 5],
    }
}

#[cfg(test)]
mod tests {
    use super::config::{AgentStart, ItemPlacement, MapConfig, WallPlacement};
    use super::*;
    use grid_hunt_core::WallRotation;

    fn start_at(x: u32, y: u32) -> AgentStart {
        AgentStart {
            x,
            y,
            color: [0xc8, 0xc8, 0xc8],
        }
    }

    fn open_map() -> MapConfig {
        // Item gradient zones are pairwise disjoint by construction.
        MapConfig {
            width: 10,
            height: 10,
            agents: vec![start_at(5, 2), start_at(0, 4)],
            keys: vec![ItemPlacement { x: 5, y: 5 }, ItemPlacement { x: 0, y: 9 }],
            boxes: vec![ItemPlacement { x: 9, y: 0 }, ItemPlacement { x: 0, y: 0 }],
            walls: Vec::new(),
        }
    }

    fn walled_map() -> MapConfig {
        // One wall far from every item zone; agent 1 starts beside its body.
        MapConfig {
            width: 20,
            height: 20,
            agents: vec![start_at(13, 10), start_at(0, 0)],
            keys: vec![ItemPlacement { x: 3, y: 3 }, ItemPlacement { x: 3, y: 16 }],
            boxes: vec![
                ItemPlacement { x: 17, y: 3 },
                ItemPlacement { x: 17, y: 16 },
            ],
            walls: vec![WallPlacement {
                x: 10,
                y: 10,
                rotation: WallRotation::TopLeft,
            }],
        }
    }

    fn moved_fields(response: Response) -> (u32, u32, bool, Option<CellCoord>) {
        match response {
            Response::Moved {
                x,
                y,
                game_over,
                death_pos,
                ..
            } => (x, y, game_over, death_pos),
            other => panic!("expected a move reply, got {other:?}"),
        }
    }

    #[test]
    fn from_map_requires_enough_starts() {
        let map = open_map();
        let error = World::from_map(&map, 3).expect_err("three agents cannot fit");
        assert!(matches!(
            error,
            WorldError::MissingAgents {
                needed: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn from_map_rejects_out_of_bounds_starts() {
        let mut map = open_map();
        map.agents[1] = start_at(10, 0);
        let error = World::from_map(&map, 2).expect_err("start outside the map");
        assert!(matches!(
            error,
            WorldError::StartOutOfBounds { id: 2, x: 10, y: 0 }
        ));
    }

    #[test]
    fn registration_hands_out_identities_in_order() {
        let mut world = World::from_map(&open_map(), 2).expect("world");
        assert_eq!(world.register_agent(), Some(AgentId::new(1)));
        assert_eq!(world.register_agent(), Some(AgentId::new(2)));
        assert_eq!(world.register_agent(), None);
        assert_eq!(query::connected_agents(&world), 2);
    }

    #[test]
    fn out_of_bounds_move_stays_in_place() {
        let mut world = World::from_map(&open_map(), 2).expect("world");
        let agent = AgentId::new(2); // starts at (0, 4)

        let reply = apply(&mut world, agent, &Request::Move { direction: 1 });

        let (x, y, game_over, death_pos) = moved_fields(reply);
        assert_eq!((x, y), (0, 4));
        assert!(!game_over);
        assert_eq!(death_pos, None);
        assert_eq!(query::game_over(&world), None);
    }

    #[test]
    fn malformed_direction_is_a_no_op() {
        let mut world = World::from_map(&open_map(), 1).expect("world");
        let agent = AgentId::new(1);

        let reply = apply(&mut world, agent, &Request::Move { direction: 9 });

        let (x, y, game_over, _) = moved_fields(reply);
        assert_eq!((x, y), (5, 2));
        assert!(!game_over);
    }

    #[test]
    fn standing_keeps_the_trail_unchanged() {
        let mut world = World::from_map(&open_map(), 1).expect("world");
        let agent = AgentId::new(1);

        let _ = apply(&mut world, agent, &Request::Move { direction: 0 });

        let view = query::agent_view(&world);
        let snapshot = view.iter().next().expect("agent snapshot");
        assert_eq!(snapshot.path, vec![CellCoord::new(5, 2)]);
    }

    #[test]
    fn trail_records_revisits_but_not_repeats() {
        let mut world = World::from_map(&open_map(), 2).expect("world");
        let agent = AgentId::new(2); // starts at (0, 4)

        let _ = apply(&mut world, agent, &Request::Move { direction: 2 });
        let _ = apply(&mut world, agent, &Request::Move { direction: 1 });

        let view = query::agent_view(&world);
        let snapshot = view
            .iter()
            .find(|snapshot| snapshot.id == agent)
            .expect("agent snapshot");
        assert_eq!(
            snapshot.path,
            vec![
                CellCoord::new(0, 4),
                CellCoord::new(1, 4),
                CellCoord::new(0, 4),
            ],
        );
    }

    #[test]
    fn gradient_guides_the_walk_onto_the_key() {
        let mut world = World::from_map(&open_map(), 1).expect("world");
        let agent = AgentId::new(1); // starts at (5, 2), key at (5, 5)

        let expectations = [(5, 3, 0.25), (5, 4, 0.5), (5, 5, 1.0)];
        for (x, y, value) in expectations {
            let reply = apply(&mut world, agent, &Request::Move { direction: 4 });
            match reply {
                Response::Moved {
                    x: rx,
                    y: ry,
                    cell_val,
                    game_over,
                    ..
                } => {
                    assert_eq!((rx, ry), (x, y));
                    assert_eq!(cell_val, value);
                    assert!(!game_over);
                }
                other => panic!("expected a move reply, got {other:?}"),
            }
        }

        let owner = apply(&mut world, agent, &Request::GetItemOwner);
        assert_eq!(
            owner,
            Response::ItemOwner {
                owner: Some(0),
                item: Some(ItemKind::Key),
            },
        );
    }

    #[test]
    fn item_owner_is_none_away_from_items() {
        let mut world = World::from_map(&open_map(), 1).expect("world");
        let agent = AgentId::new(1);

        let reply = apply(&mut world, agent, &Request::GetItemOwner);

        assert_eq!(
            reply,
            Response::ItemOwner {
                owner: None,
                item: None,
            },
        );
    }

    #[test]
    fn wall_collision_freezes_the_world() {
        let mut world = World::from_map(&walled_map(), 2).expect("world");
        let killer = AgentId::new(1); // starts at (13, 10), wall body at (12, 10)
        let bystander = AgentId::new(2);

        let reply = apply(&mut world, killer, &Request::Move { direction: 1 });
        let (x, y, game_over, death_pos) = moved_fields(reply);
        assert_eq!((x, y), (13, 10), "death reply reports the pre-move cell");
        assert!(game_over);
        assert_eq!(death_pos, Some(CellCoord::new(12, 10)));

        let record = query::game_over(&world).expect("terminal record");
        assert_eq!(record.agent, killer);
        assert_eq!(record.position, CellCoord::new(12, 10));

        // Every later move from any agent reports the frozen state.
        let reply = apply(&mut world, bystander, &Request::Move { direction: 2 });
        let (x, y, game_over, death_pos) = moved_fields(reply);
        assert_eq!((x, y), (0, 0));
        assert!(game_over);
        assert_eq!(death_pos, None);

        // The first death record survives later collision attempts.
        let record = query::game_over(&world).expect("terminal record");
        assert_eq!(record.agent, killer);
    }

    #[test]
    fn queries_stay_identical_after_the_game_ends() {
        let mut world = World::from_map(&walled_map(), 1).expect("world");
        let agent = AgentId::new(1);

        let _ = apply(&mut world, agent, &Request::Move { direction: 1 });
        let first = apply(&mut world, agent, &Request::GetData);
        let second = apply(&mut world, agent, &Request::GetData);

        assert_eq!(first, second);
    }

    #[test]
    fn broadcast_requests_never_touch_the_world() {
        let mut world = World::from_map(&open_map(), 1).expect("world");
        let agent = AgentId::new(1);
        let before = apply(&mut world, agent, &Request::GetData);

        let reply = apply(
            &mut world,
            agent,
            &Request::BroadcastMsg {
                msg_type: grid_hunt_core::BroadcastKind::KeyDiscovered,
                position: CellCoord::new(3, 3),
                owner: agent,
            },
        );

        assert_eq!(reply, Response::Empty);
        assert_eq!(apply(&mut world, agent, &Request::GetData), before);
    }

    #[test]
    fn unknown_identity_receives_the_no_op_reply() {
        let mut world = World::from_map(&open_map(), 1).expect("world");

        let reply = apply(&mut world, AgentId::new(7), &Request::GetData);

        assert_eq!(reply, Response::Empty);
    }
}
