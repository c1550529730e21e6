//! Patrol routing over a floor's connection graph.
//!
//! `NavGraph` holds one node per room and two directed [`NavEdge`]s per
//! connection. Each edge carries the waypoints a guard walks through when
//! crossing the doorway: one just inside the room it leaves, one just inside
//! the room it enters, then the centre of the destination.
//!
//! [`NavGraph::random_route`] walks the graph depth-first with an explicit
//! stack, picking each next room uniformly among unvisited neighbours.
//! Backtracking pops the stack without emitting a waypoint, so consecutive
//! waypoints may jump across the floor after a dead end;
//! [`PatrolRoute::visit_order`] exposes the room sequence for callers that
//! care.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::WAYPOINT_OFFSET;
use crate::geometry::Vec3;
use crate::layout::{doorway_midpoint, LevelLayout, RoomId};

/// Directed traversal of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavEdge {
    pub from: RoomId,
    pub to: RoomId,
    /// Just inside `from`, facing the doorway.
    pub pre_waypoint: Vec3,
    /// Just inside `to`, past the doorway.
    pub post_waypoint: Vec3,
    /// Centre of `to`.
    pub destination: Vec3,
}

/// Read-only navigation graph for one floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavGraph {
    /// room index → outgoing edges, in connection order
    adjacency: Vec<Vec<NavEdge>>,
}

impl NavGraph {
    /// Build the graph for `level`, placing waypoints at height `y`.
    pub fn build(level: &LevelLayout, y: f32) -> Self {
        let mut adjacency: Vec<Vec<NavEdge>> = vec![Vec::new(); level.rooms.len()];

        for conn in &level.connections {
            let (Some(a), Some(b)) = (level.room(conn.room_a), level.room(conn.room_b)) else {
                continue;
            };
            let door = doorway_midpoint(a, b, conn.direction, y);
            let step = conn.direction.step() * WAYPOINT_OFFSET;
            let inside_a = door - step;
            let inside_b = door + step;

            adjacency[conn.room_a.index()].push(NavEdge {
                from: conn.room_a,
                to: conn.room_b,
                pre_waypoint: inside_a,
                post_waypoint: inside_b,
                destination: b.center(y),
            });
            adjacency[conn.room_b.index()].push(NavEdge {
                from: conn.room_b,
                to: conn.room_a,
                pre_waypoint: inside_b,
                post_waypoint: inside_a,
                destination: a.center(y),
            });
        }

        Self { adjacency }
    }

    /// Outgoing edges of a room (empty for unknown rooms).
    pub fn edges_from(&self, room: RoomId) -> &[NavEdge] {
        self.adjacency
            .get(room.index())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn room_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Rooms reachable from `start`, including `start`.
    pub fn reachable_from(&self, start: RoomId) -> HashSet<RoomId> {
        let mut seen = HashSet::new();
        if start.index() >= self.adjacency.len() {
            return seen;
        }
        let mut stack = vec![start];
        seen.insert(start);
        while let Some(room) = stack.pop() {
            for edge in self.edges_from(room) {
                if seen.insert(edge.to) {
                    stack.push(edge.to);
                }
            }
        }
        seen
    }

    /// Randomized depth-first patrol from `start`.
    ///
    /// Each forward step appends three waypoints (pre, post, destination).
    /// An isolated or unknown start room yields an empty route.
    pub fn random_route(&self, start: RoomId, rng: &mut impl Rng) -> PatrolRoute {
        let mut waypoints = Vec::new();
        let mut visit_order = Vec::new();
        if start.index() >= self.adjacency.len() {
            return PatrolRoute::new(waypoints, visit_order);
        }

        let mut visited: HashSet<RoomId> = HashSet::new();
        let mut stack = vec![start];
        visited.insert(start);
        visit_order.push(start);

        while let Some(&current) = stack.last() {
            // reservoir sample over unvisited neighbours
            let mut chosen: Option<&NavEdge> = None;
            let mut seen = 0u32;
            for edge in self.edges_from(current) {
                if visited.contains(&edge.to) {
                    continue;
                }
                seen += 1;
                if rng.gen_range(0..seen) == 0 {
                    chosen = Some(edge);
                }
            }

            match chosen {
                Some(edge) => {
                    waypoints.push(edge.pre_waypoint);
                    waypoints.push(edge.post_waypoint);
                    waypoints.push(edge.destination);
                    visited.insert(edge.to);
                    visit_order.push(edge.to);
                    stack.push(edge.to);
                }
                None => {
                    stack.pop();
                }
            }
        }

        PatrolRoute::new(waypoints, visit_order)
    }
}

/// A finite, single-use sequence of patrol waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
    visit_order: Vec<RoomId>,
    cursor: usize,
}

impl PatrolRoute {
    fn new(waypoints: Vec<Vec3>, visit_order: Vec<RoomId>) -> Self {
        Self {
            waypoints,
            visit_order,
            cursor: 0,
        }
    }

    /// A route with no waypoints.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Advance and return the next waypoint.
    pub fn next_waypoint(&mut self) -> Option<Vec3> {
        let wp = self.waypoints.get(self.cursor).copied();
        if wp.is_some() {
            self.cursor += 1;
        }
        wp
    }

    pub fn peek(&self) -> Option<Vec3> {
        self.waypoints.get(self.cursor).copied()
    }

    pub fn remaining(&self) -> usize {
        self.waypoints.len() - self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.waypoints.len()
    }

    /// Every waypoint, including the ones already consumed.
    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    /// Rooms in the order they were first entered, starting room first.
    pub fn visit_order(&self) -> &[RoomId] {
        &self.visit_order
    }
}
