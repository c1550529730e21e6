//! Layout constants: grid convention, door and stair geometry, waypoints.
//!
//! Grid quantities are `i32` cells; world quantities are `f32` units.
//! Rendering and physics collaborators use the same values, so changing one
//! here changes the generated geometry everywhere. [`DOOR_WIDTH`] and
//! [`WALL_THICKNESS`] size the wall cut-outs from
//! [`doorway_rect`](crate::layout::doorway_rect) that mesh and collider
//! builders subtract from each wall.

/// World units per grid cell.
pub const GRID_UNIT: f32 = 1.0;

// ── Partitioning ────────────────────────────────────────────────────────

/// Smallest legal room side, in grid cells.
pub const MIN_ROOM_SIZE: i32 = 4;
/// Extra cells an axis needs beyond `2 × MIN_ROOM_SIZE` before it can be split.
pub const SPLIT_GAP: i32 = 1;

// ── Connections ─────────────────────────────────────────────────────────

/// Shared wall length (grid cells) needed before two rooms can connect.
pub const MIN_DOOR_OVERLAP: i32 = 3;
/// Door / opening width in world units.
pub const DOOR_WIDTH: f32 = 2.0;
/// Wall thickness in world units.
pub const WALL_THICKNESS: f32 = 0.2;
/// Width of a synthesized corridor, in grid cells.
pub const CORRIDOR_WIDTH: i32 = 2;
/// How far a corridor reaches into each room past its facing wall.
pub const CORRIDOR_END_PADDING: i32 = 1;

/// Classification weights (percent).
pub mod connection_weights {
    pub const DOOR: f32 = 0.50;
    pub const OPENING: f32 = 0.25;
    pub const CORRIDOR: f32 = 0.25;
}

// ── Floors & stairs ─────────────────────────────────────────────────────

/// Default storey height in world units.
pub const FLOOR_HEIGHT: f32 = 6.0;
/// Height of one step.
pub const STEP_RISE: f32 = 0.3;
/// Tread depth of one step.
pub const STEP_DEPTH: f32 = 0.4;
/// Stair flight width.
pub const STAIR_WIDTH: f32 = 2.0;
/// Lateral clearance between the flight and the wall it is pinned to.
pub const STAIR_WALL_CLEARANCE: f32 = 0.5;
/// Landing clearance kept free at the foot of the flight.
pub const STAIR_FOOT_CLEARANCE: f32 = 1.0;
/// Padding added around a stair footprint when cutting the slab.
pub const HOLE_PADDING: f32 = 0.25;
/// Placement quota per adjacent floor pair.
pub const MAX_STAIRS_PER_PAIR: u32 = 2;

// ── Patrol ──────────────────────────────────────────────────────────────

/// Distance of a route waypoint from the doorway midpoint, on each side.
pub const WAYPOINT_OFFSET: f32 = 0.6;

/// Number of steps needed to climb `floor_height`.
pub fn stair_steps(floor_height: f32) -> u32 {
    // tolerance keeps exact multiples (6.0 / 0.3) from rounding up a step
    ((floor_height / STEP_RISE) - 1e-3).ceil().max(1.0) as u32
}

/// Horizontal run of a flight that climbs `floor_height`.
pub fn stair_run(floor_height: f32) -> f32 {
    stair_steps(floor_height) as f32 * STEP_DEPTH
}
