//! Connection planning between the rooms of one floor.
//!
//! A single greedy pass: for each room in list order, for each side in
//! [`Direction::ALL`] order, the first neighbour (in list order) sharing at
//! least [`MIN_DOOR_OVERLAP`] cells of wall is joined unless the pair is
//! already connected. Each new pair is classified by a weighted draw:
//!
//! | Draw | Weight | Recorded as |
//! |------|--------|-------------|
//! | Door | 50% | one `Door` |
//! | Opening | 25% | one `Opening` |
//! | Corridor | 25% | corridor room + two `Opening`s |
//!
//! Corridor rooms are appended to the working room list, so rooms later in
//! the pass can see them. There is no backtracking; iteration order alone
//! decides the outcome for a given stream.

use std::collections::HashSet;

use rand::Rng;

use crate::constants::{
    connection_weights, CORRIDOR_END_PADDING, CORRIDOR_WIDTH, MIN_DOOR_OVERLAP,
};
use crate::geometry::Direction;
use crate::layout::{
    shared_boundary_in, Connection, ConnectionKind, LevelLayout, Room, RoomId, SharedBoundary,
};
use crate::seed::rng_for;

/// Weighted draw of a connection type.
pub fn classify(rng: &mut impl Rng) -> ConnectionKind {
    let roll: f32 = rng.gen();
    if roll < connection_weights::DOOR {
        ConnectionKind::Door
    } else if roll < connection_weights::DOOR + connection_weights::OPENING {
        ConnectionKind::Opening
    } else {
        ConnectionKind::Corridor
    }
}

/// Neighbours of `rooms[id]` across side `dir` with a door-sized shared wall,
/// in room-list order.
pub fn neighbors_across(
    rooms: &[Room],
    id: RoomId,
    dir: Direction,
) -> Vec<(RoomId, SharedBoundary)> {
    let Some(room) = rooms.get(id.index()) else {
        return Vec::new();
    };
    rooms
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != id.index())
        .filter_map(|(j, other)| {
            shared_boundary_in(room, other, dir)
                .filter(|b| b.len() >= MIN_DOOR_OVERLAP)
                .map(|b| (RoomId(j as u32), b))
        })
        .collect()
}

/// The neighbour a room connects to through side `dir`: the first one in
/// room-list order.
pub fn first_neighbor_across(
    rooms: &[Room],
    id: RoomId,
    dir: Direction,
) -> Option<(RoomId, SharedBoundary)> {
    neighbors_across(rooms, id, dir).into_iter().next()
}

/// Corridor room bridging `a` and `b` across `a`'s side `boundary.direction`.
///
/// Along the crossing axis it spans the gap between the two facing walls
/// plus [`CORRIDOR_END_PADDING`] on both ends; across it is
/// [`CORRIDOR_WIDTH`] wide, centred on the shared segment.
pub fn corridor_between(a: &Room, b: &Room, boundary: &SharedBoundary) -> Room {
    let dir = boundary.direction;
    let a_face = a.face(dir);
    let b_face = b.face(dir.opposite());
    let start = a_face.min(b_face) - CORRIDOR_END_PADDING;
    let length = (a_face - b_face).abs() + 2 * CORRIDOR_END_PADDING;
    let cross = (boundary.lo + boundary.hi) / 2 - CORRIDOR_WIDTH / 2;

    if dir.is_x_axis() {
        Room::corridor(start, cross, length, CORRIDOR_WIDTH)
    } else {
        Room::corridor(cross, start, CORRIDOR_WIDTH, length)
    }
}

/// Plan connections for `level` in place, appending corridor rooms to its
/// room list as they are synthesized.
pub fn plan_connections(level: &mut LevelLayout, rng: &mut impl Rng) {
    let mut joined: HashSet<(RoomId, RoomId)> =
        level.connections.iter().map(Connection::pair).collect();
    let mut corridors = 0usize;

    // The list grows while we walk it.
    let mut i = 0;
    while i < level.rooms.len() {
        let id = RoomId(i as u32);
        for dir in Direction::ALL {
            let Some((other, boundary)) = first_neighbor_across(&level.rooms, id, dir) else {
                continue;
            };
            let key = if id <= other { (id, other) } else { (other, id) };
            if !joined.insert(key) {
                continue;
            }

            match classify(rng) {
                kind @ (ConnectionKind::Door | ConnectionKind::Opening) => {
                    level.connections.push(Connection {
                        room_a: id,
                        room_b: other,
                        direction: dir,
                        kind,
                    });
                }
                ConnectionKind::Corridor => {
                    let corridor = corridor_between(
                        &level.rooms[id.index()],
                        &level.rooms[other.index()],
                        &boundary,
                    );
                    let cid = RoomId(level.rooms.len() as u32);
                    level.rooms.push(corridor);
                    joined.insert((id.min(cid), id.max(cid)));
                    joined.insert((other.min(cid), other.max(cid)));
                    level.connections.push(Connection {
                        room_a: id,
                        room_b: cid,
                        direction: dir,
                        kind: ConnectionKind::Opening,
                    });
                    level.connections.push(Connection {
                        room_a: cid,
                        room_b: other,
                        direction: dir,
                        kind: ConnectionKind::Opening,
                    });
                    corridors += 1;
                }
            }
        }
        i += 1;
    }

    log::debug!(
        "floor {}: {} rooms ({} corridors), {} connections",
        level.index,
        level.rooms.len(),
        corridors,
        level.connections.len()
    );
}

/// Build a floor from partitioned rooms, planning its connections with a
/// fresh stream seeded from `seed`.
pub fn plan_level(index: u32, rooms: Vec<Room>, seed: u64) -> LevelLayout {
    let mut level = LevelLayout::new(index, rooms);
    let mut rng = rng_for(seed);
    plan_connections(&mut level, &mut rng);
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::shared_boundary;

    fn two_rooms() -> Vec<Room> {
        vec![Room::gallery(0, 0, 6, 6), Room::gallery(6, 0, 6, 6)]
    }

    #[test]
    fn test_classify_covers_all_kinds() {
        let mut rng = rng_for(5);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.insert(classify(&mut rng));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_classify_weights_roughly_half_doors() {
        let mut rng = rng_for(17);
        let n = 4000;
        let doors = (0..n)
            .filter(|_| classify(&mut rng) == ConnectionKind::Door)
            .count();
        let ratio = doors as f32 / n as f32;
        assert!((0.45..0.55).contains(&ratio), "door ratio {}", ratio);
    }

    #[test]
    fn test_neighbors_require_door_sized_overlap() {
        let rooms = vec![
            Room::gallery(0, 0, 6, 6),
            Room::gallery(6, 4, 6, 6), // 2-cell overlap
            Room::gallery(0, 6, 6, 6),
        ];
        assert!(neighbors_across(&rooms, RoomId(0), Direction::East).is_empty());
        let south = neighbors_across(&rooms, RoomId(0), Direction::South);
        assert_eq!(south.len(), 1);
        assert_eq!(south[0].0, RoomId(2));
    }

    #[test]
    fn test_one_connection_per_side() {
        // three rooms stacked along room 0's east wall
        let rooms = vec![
            Room::gallery(0, 0, 6, 15),
            Room::gallery(6, 0, 6, 5),
            Room::gallery(6, 5, 6, 5),
            Room::gallery(6, 10, 6, 5),
        ];
        assert_eq!(neighbors_across(&rooms, RoomId(0), Direction::East).len(), 3);
        let first = first_neighbor_across(&rooms, RoomId(0), Direction::East).unwrap();
        assert_eq!(first.0, RoomId(1));

        for seed in 0..20 {
            let level = plan_level(0, rooms.clone(), seed);
            let east: Vec<_> = level
                .connections
                .iter()
                .filter(|c| c.room_a == RoomId(0) && c.direction == Direction::East)
                .collect();
            assert_eq!(east.len(), 1, "seed {}", seed);
            let target = east[0].room_b;
            assert!(target == RoomId(1) || level.rooms[target.index()].is_corridor());
        }
    }

    #[test]
    fn test_single_connection_per_pair() {
        for seed in 0..30 {
            let level = plan_level(0, two_rooms(), seed);
            let galleries = (RoomId(0), RoomId(1));
            let direct = level
                .connections
                .iter()
                .filter(|c| c.pair() == galleries)
                .count();
            if level.corridor_count() == 0 {
                assert_eq!(direct, 1, "seed {}", seed);
                assert_eq!(level.connections.len(), 1);
            } else {
                assert_eq!(direct, 0, "seed {}", seed);
                assert_eq!(level.connections.len(), 2);
            }
        }
    }

    #[test]
    fn test_corridor_spans_shared_wall() {
        let rooms = two_rooms();
        let boundary = shared_boundary(&rooms[0], &rooms[1]).unwrap();
        let c = corridor_between(&rooms[0], &rooms[1], &boundary);
        assert!(c.is_corridor());
        assert_eq!((c.x, c.w), (5, 2));
        assert_eq!((c.z, c.h), (2, 2));
        assert!(c.overlaps(&rooms[0]) && c.overlaps(&rooms[1]));
    }

    #[test]
    fn test_corridor_length_includes_separation() {
        let a = Room::gallery(0, 0, 6, 6);
        let b = Room::gallery(0, 9, 6, 6);
        let boundary = SharedBoundary {
            direction: Direction::South,
            lo: 0,
            hi: 6,
        };
        let c = corridor_between(&a, &b, &boundary);
        assert_eq!((c.z, c.h), (5, 5));
        assert_eq!((c.x, c.w), (2, 2));
    }

    #[test]
    fn test_corridor_connections_are_openings_through_corridor() {
        let level = (0..64)
            .map(|seed| plan_level(0, two_rooms(), seed))
            .find(|l| l.corridor_count() == 1)
            .expect("some seed draws a corridor");
        assert_eq!(level.rooms.len(), 3);
        let corridor = RoomId(2);
        assert!(level
            .connections
            .iter()
            .all(|c| c.kind == ConnectionKind::Opening));
        assert_eq!(level.connections_of(corridor).count(), 2);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let rooms = crate::partition::partition_floor(40, 30, 4, 3).unwrap();
        assert_eq!(plan_level(0, rooms.clone(), 9), plan_level(0, rooms, 9));
    }
}
