//! Vertical circulation: stair flights between adjacent floors.
//!
//! For every floor pair `(f, f + 1)` the planner looks for rooms on both
//! floors whose footprints overlap enough to hold a flight, pins the flight
//! against a lateral wall that has no doorway, and cuts a hole in the slab
//! between the two floors.
//!
//! # Placement tests (in order)
//!
//! 1. The overlap of the two rooms is at least `STAIR_WIDTH +
//!    STAIR_WALL_CLEARANCE` wide and `run + STAIR_FOOT_CLEARANCE +
//!    HOLE_PADDING` long.
//! 2. Lateral side: both sides door-blocked → reject; one blocked → pin to
//!    the other; neither → coin flip. The relaxed pass skips this test and
//!    always flips.
//! 3. Longitudinal offset uniform over the free range, which keeps the
//!    padded hole inside the overlap (lower bound if empty).
//! 4. The padded footprint must not intersect any hole already cut on
//!    floor `f` or `f + 1`.
//!
//! Two passes run per pair (strict, then relaxed) until the quota is met.
//! Running short of the quota is not an error.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    stair_run, HOLE_PADDING, STAIR_FOOT_CLEARANCE, STAIR_WALL_CLEARANCE, STAIR_WIDTH,
};
use crate::geometry::{Direction, Rect};
use crate::layout::{
    Hole, LevelLayout, MuseumLayout, RoomId, Slab, StairOrientation, StairPlacement,
};

/// Whether door adjacency is honoured when choosing a lateral side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementPass {
    Strict,
    Relaxed,
}

/// Holes and flights produced for a whole museum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StairPlan {
    pub holes: Vec<Hole>,
    pub stairs: Vec<StairPlacement>,
}

/// Two adjacent floors being connected.
#[derive(Debug, Clone, Copy)]
pub struct FloorPair<'a> {
    /// Index of the lower floor.
    pub floor: u32,
    pub lower: &'a LevelLayout,
    pub upper: &'a LevelLayout,
    /// Horizontal run of one flight.
    pub run: f32,
}

/// Slab cut for a flight: the footprint grown by [`HOLE_PADDING`].
pub fn hole_rect(placement: &StairPlacement) -> Rect {
    placement.footprint().pad(HOLE_PADDING)
}

/// Lateral walls of a flight climbing along `orientation`, low side first.
fn lateral_sides(orientation: StairOrientation) -> (Direction, Direction) {
    match orientation {
        StairOrientation::EastWest => (Direction::North, Direction::South),
        StairOrientation::NorthSouth => (Direction::West, Direction::East),
    }
}

/// Try to fit one flight between `lower_id` and `upper_id`.
///
/// Returns the placement when every test passes. Consumes randomness only
/// for the side coin flip and the longitudinal offset.
pub fn try_place(
    pair: &FloorPair<'_>,
    lower_id: RoomId,
    upper_id: RoomId,
    orientation: StairOrientation,
    pass: PlacementPass,
    holes: &[Hole],
    rng: &mut impl Rng,
) -> Option<StairPlacement> {
    let lower_room = pair.lower.room(lower_id)?;
    let upper_room = pair.upper.room(upper_id)?;
    let overlap = lower_room
        .world_rect()
        .intersection(&upper_room.world_rect())?;

    // 1. room for the flight
    let (long_lo, long_len, lat_lo, lat_len) = match orientation {
        StairOrientation::EastWest => (overlap.x, overlap.w, overlap.z, overlap.d),
        StairOrientation::NorthSouth => (overlap.z, overlap.d, overlap.x, overlap.w),
    };
    if lat_len < STAIR_WIDTH + STAIR_WALL_CLEARANCE
        || long_len < pair.run + STAIR_FOOT_CLEARANCE + HOLE_PADDING
    {
        return None;
    }

    // 2. lateral side
    let (low_side, high_side) = lateral_sides(orientation);
    let lower_doors = pair.lower.doorway_sides(lower_id);
    let upper_doors = pair.upper.doorway_sides(upper_id);
    let blocked = |side: Direction| lower_doors.contains(&side) || upper_doors.contains(&side);
    let side = match pass {
        PlacementPass::Strict => match (blocked(low_side), blocked(high_side)) {
            (true, true) => {
                log::trace!(
                    "floor {}: {:?}/{:?} {:?} both sides door-blocked",
                    pair.floor,
                    lower_id,
                    upper_id,
                    orientation
                );
                return None;
            }
            (true, false) => high_side,
            (false, true) => low_side,
            (false, false) => {
                if rng.gen_bool(0.5) {
                    low_side
                } else {
                    high_side
                }
            }
        },
        PlacementPass::Relaxed => {
            if rng.gen_bool(0.5) {
                low_side
            } else {
                high_side
            }
        }
    };
    let lateral = if side == low_side {
        lat_lo + STAIR_WALL_CLEARANCE
    } else {
        lat_lo + lat_len - STAIR_WALL_CLEARANCE - STAIR_WIDTH
    };

    // 3. longitudinal offset
    let lo = long_lo + STAIR_FOOT_CLEARANCE;
    let hi = long_lo + long_len - pair.run - HOLE_PADDING;
    let longitudinal = if hi > lo { rng.gen_range(lo..=hi) } else { lo };

    let (x, z) = match orientation {
        StairOrientation::EastWest => (longitudinal, lateral),
        StairOrientation::NorthSouth => (lateral, longitudinal),
    };
    let placement = StairPlacement {
        floor: pair.floor,
        x,
        z,
        orientation,
        run: pair.run,
        width: STAIR_WIDTH,
        lower_room: lower_id,
        upper_room: upper_id,
    };

    // 4. hole collision on either floor
    let cut = hole_rect(&placement);
    let collides = holes
        .iter()
        .filter(|h| h.floor == pair.floor || h.floor == pair.floor + 1)
        .any(|h| h.rect.intersects(&cut));
    if collides {
        log::trace!(
            "floor {}: {:?}/{:?} {:?} collides with an existing hole",
            pair.floor,
            lower_id,
            upper_id,
            orientation
        );
        return None;
    }

    Some(placement)
}

/// Record a flight and its two slab cuts.
fn register(plan: &mut StairPlan, placement: StairPlacement) {
    let rect = hole_rect(&placement);
    plan.holes.push(Hole {
        floor: placement.floor,
        slab: Slab::Ceiling,
        rect,
    });
    plan.holes.push(Hole {
        floor: placement.floor + 1,
        slab: Slab::Floor,
        rect,
    });
    plan.stairs.push(placement);
}

/// Place up to `max_per_pair` flights between `pair.floor` and the floor above.
/// Returns how many were placed.
pub fn plan_floor_pair(
    pair: &FloorPair<'_>,
    max_per_pair: u32,
    plan: &mut StairPlan,
    rng: &mut impl Rng,
) -> u32 {
    let mut lower_order: Vec<RoomId> = pair.lower.room_ids().collect();
    lower_order.shuffle(rng);

    let mut anchors: HashSet<RoomId> = HashSet::new();
    let mut placed = 0u32;

    for pass in [PlacementPass::Strict, PlacementPass::Relaxed] {
        'lower: for &lower_id in &lower_order {
            if placed >= max_per_pair {
                break;
            }
            if anchors.contains(&lower_id) {
                continue;
            }
            let mut upper_order: Vec<RoomId> = pair.upper.room_ids().collect();
            upper_order.shuffle(rng);

            for &upper_id in &upper_order {
                for orientation in [StairOrientation::EastWest, StairOrientation::NorthSouth] {
                    if let Some(placement) =
                        try_place(pair, lower_id, upper_id, orientation, pass, &plan.holes, rng)
                    {
                        log::debug!(
                            "floor {}→{}: {:?} stair at ({:.2}, {:.2}) rooms {:?}/{:?} [{:?}]",
                            pair.floor,
                            pair.floor + 1,
                            orientation,
                            placement.x,
                            placement.z,
                            lower_id,
                            upper_id,
                            pass
                        );
                        register(plan, placement);
                        anchors.insert(lower_id);
                        placed += 1;
                        continue 'lower;
                    }
                }
            }
        }
    }

    if placed == 0 {
        log::warn!(
            "floor {}→{}: no stair placement found",
            pair.floor,
            pair.floor + 1
        );
    }
    placed
}

/// Plan flights for every adjacent floor pair of `layout`.
pub fn plan_stairs(layout: &MuseumLayout, max_per_pair: u32, rng: &mut impl Rng) -> StairPlan {
    let run = stair_run(layout.floor_height);
    let mut plan = StairPlan::default();

    for (f, window) in layout.levels.windows(2).enumerate() {
        let pair = FloorPair {
            floor: f as u32,
            lower: &window[0],
            upper: &window[1],
            run,
        };
        plan_floor_pair(&pair, max_per_pair, &mut plan, rng);
    }
    plan
}
