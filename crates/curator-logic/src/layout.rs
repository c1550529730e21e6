//! Layout data model: rooms, connections, floors, holes and stairs.
//!
//! Everything here is produced once per generation pass and is read-only
//! afterwards. Rooms are addressed by [`RoomId`], an index into their floor's
//! room list: two rooms with the same rectangle are still different rooms.

use serde::{Deserialize, Serialize};

use crate::constants::{DOOR_WIDTH, GRID_UNIT, WALL_THICKNESS};
use crate::geometry::{Direction, Rect, Vec3};

/// Handle to a room within one [`LevelLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

impl RoomId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What produced a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomKind {
    /// A leaf of the footprint partition.
    Gallery,
    /// A synthetic passage spanning the wall between two galleries.
    Corridor,
}

/// Axis-aligned room rectangle in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub z: i32,
    pub w: i32,
    pub h: i32,
    pub kind: RoomKind,
}

impl Room {
    pub fn gallery(x: i32, z: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            z,
            w,
            h,
            kind: RoomKind::Gallery,
        }
    }

    pub fn corridor(x: i32, z: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            z,
            w,
            h,
            kind: RoomKind::Corridor,
        }
    }

    pub fn max_x(&self) -> i32 {
        self.x + self.w
    }

    pub fn max_z(&self) -> i32 {
        self.z + self.h
    }

    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    pub fn is_corridor(&self) -> bool {
        self.kind == RoomKind::Corridor
    }

    /// Interior overlap in grid space (touching edges do not count).
    pub fn overlaps(&self, other: &Room) -> bool {
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.z < other.max_z()
            && other.z < self.max_z()
    }

    /// Footprint in world units.
    pub fn world_rect(&self) -> Rect {
        Rect::new(
            self.x as f32 * GRID_UNIT,
            self.z as f32 * GRID_UNIT,
            self.w as f32 * GRID_UNIT,
            self.h as f32 * GRID_UNIT,
        )
    }

    /// Centre in world units at height `y`.
    pub fn center(&self, y: f32) -> Vec3 {
        self.world_rect().center(y)
    }

    /// Coordinate of the wall on side `dir` (grid).
    pub(crate) fn face(&self, dir: Direction) -> i32 {
        match dir {
            Direction::North => self.z,
            Direction::South => self.max_z(),
            Direction::East => self.max_x(),
            Direction::West => self.x,
        }
    }

    /// Extent along the axis that runs parallel to wall `dir`.
    pub(crate) fn span_along(&self, dir: Direction) -> (i32, i32) {
        if dir.is_x_axis() {
            (self.z, self.max_z())
        } else {
            (self.x, self.max_x())
        }
    }
}

/// Wall segment two rooms have in common.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedBoundary {
    /// Side of the first room the segment lies on.
    pub direction: Direction,
    /// Segment start along the wall (grid).
    pub lo: i32,
    /// Segment end along the wall (grid).
    pub hi: i32,
}

impl SharedBoundary {
    pub fn len(&self) -> i32 {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        self.hi <= self.lo
    }
}

/// Wall segment shared by `a`'s side `dir` and `b`'s opposite side.
pub fn shared_boundary_in(a: &Room, b: &Room, dir: Direction) -> Option<SharedBoundary> {
    if a.face(dir) != b.face(dir.opposite()) {
        return None;
    }
    let (a_lo, a_hi) = a.span_along(dir);
    let (b_lo, b_hi) = b.span_along(dir);
    let boundary = SharedBoundary {
        direction: dir,
        lo: a_lo.max(b_lo),
        hi: a_hi.min(b_hi),
    };
    (!boundary.is_empty()).then_some(boundary)
}

/// First side of `a` (in [`Direction::ALL`] order) that shares a wall with `b`.
pub fn shared_boundary(a: &Room, b: &Room) -> Option<SharedBoundary> {
    Direction::ALL
        .iter()
        .find_map(|&dir| shared_boundary_in(a, b, dir))
}

/// World-space midpoint of the doorway from `a` through its side `dir` into
/// `b`, at height `y`.
///
/// The doorway plane sits halfway between `a`'s wall and `b`'s facing wall
/// (they coincide for partition neighbours); the cross coordinate is the
/// middle of the two rooms' overlap along that wall.
pub fn doorway_midpoint(a: &Room, b: &Room, dir: Direction, y: f32) -> Vec3 {
    let plane = (a.face(dir) + b.face(dir.opposite())) as f32 * GRID_UNIT / 2.0;
    let (a_lo, a_hi) = a.span_along(dir);
    let (b_lo, b_hi) = b.span_along(dir);
    let lo = a_lo.max(b_lo);
    let hi = a_hi.min(b_hi).max(lo);
    let cross = (lo + hi) as f32 * GRID_UNIT / 2.0;
    if dir.is_x_axis() {
        Vec3::new(plane, y, cross)
    } else {
        Vec3::new(cross, y, plane)
    }
}

/// Opening a Door or Opening cuts in the wall between `a` and `b`:
/// [`DOOR_WIDTH`] along the wall, [`WALL_THICKNESS`] across it, centred on
/// [`doorway_midpoint`].
pub fn doorway_rect(a: &Room, b: &Room, dir: Direction) -> Rect {
    let mid = doorway_midpoint(a, b, dir, 0.0);
    if dir.is_x_axis() {
        Rect::new(
            mid.x - WALL_THICKNESS / 2.0,
            mid.z - DOOR_WIDTH / 2.0,
            WALL_THICKNESS,
            DOOR_WIDTH,
        )
    } else {
        Rect::new(
            mid.x - DOOR_WIDTH / 2.0,
            mid.z - WALL_THICKNESS / 2.0,
            DOOR_WIDTH,
            WALL_THICKNESS,
        )
    }
}

/// How two rooms are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    Door,
    Opening,
    /// Classification only: recorded as two `Opening`s through a corridor room.
    Corridor,
}

/// Typed adjacency between two rooms on the same floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub room_a: RoomId,
    pub room_b: RoomId,
    /// Side of `room_a` through which `room_b` is reached.
    pub direction: Direction,
    pub kind: ConnectionKind,
}

impl Connection {
    /// Unordered pair key used for de-duplication.
    pub fn pair(&self) -> (RoomId, RoomId) {
        if self.room_a <= self.room_b {
            (self.room_a, self.room_b)
        } else {
            (self.room_b, self.room_a)
        }
    }

    /// The side of `room` this connection pierces, if `room` is an endpoint.
    pub fn side_of(&self, room: RoomId) -> Option<Direction> {
        if room == self.room_a {
            Some(self.direction)
        } else if room == self.room_b {
            Some(self.direction.opposite())
        } else {
            None
        }
    }
}

/// One floor: rooms plus the connections between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub index: u32,
    pub rooms: Vec<Room>,
    pub connections: Vec<Connection>,
}

impl LevelLayout {
    pub fn new(index: u32, rooms: Vec<Room>) -> Self {
        Self {
            index,
            rooms,
            connections: Vec::new(),
        }
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.index())
    }

    pub fn room_ids(&self) -> impl Iterator<Item = RoomId> + '_ {
        (0..self.rooms.len() as u32).map(RoomId)
    }

    pub fn gallery_count(&self) -> usize {
        self.rooms.iter().filter(|r| !r.is_corridor()).count()
    }

    pub fn corridor_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.is_corridor()).count()
    }

    pub fn connections_of(&self, id: RoomId) -> impl Iterator<Item = &Connection> + '_ {
        self.connections
            .iter()
            .filter(move |c| c.room_a == id || c.room_b == id)
    }

    /// Sides of a room already pierced by a door or opening.
    pub fn doorway_sides(&self, id: RoomId) -> Vec<Direction> {
        self.connections_of(id)
            .filter_map(|c| c.side_of(id))
            .collect()
    }

    /// Room containing a world point, preferring galleries over the corridors
    /// that overhang them.
    pub fn room_at(&self, p: Vec3) -> Option<RoomId> {
        let hit = |want_corridor: bool| {
            self.rooms
                .iter()
                .position(|r| r.is_corridor() == want_corridor && r.world_rect().contains_point(p))
                .map(|i| RoomId(i as u32))
        };
        hit(false).or_else(|| hit(true))
    }
}

/// All floors of a museum. Floor `i` sits at height `i × floor_height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuseumLayout {
    pub levels: Vec<LevelLayout>,
    pub floor_height: f32,
}

impl MuseumLayout {
    pub fn floor_offset(&self, floor: u32) -> f32 {
        floor as f32 * self.floor_height
    }

    pub fn level(&self, floor: u32) -> Option<&LevelLayout> {
        self.levels.get(floor as usize)
    }
}

/// Which slab of a floor a hole cuts through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slab {
    Floor,
    Ceiling,
}

/// Rectangle where a floor or ceiling slab is omitted for a stair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub floor: u32,
    pub slab: Slab,
    pub rect: Rect,
}

/// Axis a stair flight climbs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StairOrientation {
    /// Climbs toward `+x`.
    EastWest,
    /// Climbs toward `+z`.
    NorthSouth,
}

/// A stair flight from `floor` to `floor + 1`.
///
/// `(x, z)` is the footprint corner at the foot of the flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StairPlacement {
    pub floor: u32,
    pub x: f32,
    pub z: f32,
    pub orientation: StairOrientation,
    pub run: f32,
    pub width: f32,
    pub lower_room: RoomId,
    pub upper_room: RoomId,
}

impl StairPlacement {
    /// Footprint of the flight on the plane.
    pub fn footprint(&self) -> Rect {
        match self.orientation {
            StairOrientation::EastWest => Rect::new(self.x, self.z, self.run, self.width),
            StairOrientation::NorthSouth => Rect::new(self.x, self.z, self.width, self.run),
        }
    }
}

/// Complete generator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Museum {
    pub layout: MuseumLayout,
    pub holes: Vec<Hole>,
    pub stairs: Vec<StairPlacement>,
}

impl Museum {
    pub fn holes_on(&self, floor: u32) -> impl Iterator<Item = &Hole> + '_ {
        self.holes.iter().filter(move |h| h.floor == floor)
    }

    pub fn stairs_from(&self, floor: u32) -> impl Iterator<Item = &StairPlacement> + '_ {
        self.stairs.iter().filter(move |s| s.floor == floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_boundary_east() {
        let a = Room::gallery(0, 0, 5, 10);
        let b = Room::gallery(5, 2, 4, 4);
        let s = shared_boundary(&a, &b).unwrap();
        assert_eq!(s.direction, Direction::East);
        assert_eq!((s.lo, s.hi), (2, 6));
        let back = shared_boundary(&b, &a).unwrap();
        assert_eq!(back.direction, Direction::West);
    }

    #[test]
    fn test_corner_touch_is_not_shared() {
        let a = Room::gallery(0, 0, 5, 5);
        let b = Room::gallery(5, 5, 5, 5);
        assert!(shared_boundary(&a, &b).is_none());
    }

    #[test]
    fn test_doorway_midpoint_on_boundary() {
        let a = Room::gallery(0, 0, 5, 10);
        let b = Room::gallery(5, 2, 4, 4);
        let p = doorway_midpoint(&a, &b, Direction::East, 6.0);
        assert_eq!(p, Vec3::new(5.0, 6.0, 4.0));
    }

    #[test]
    fn test_doorway_rect_straddles_wall() {
        let a = Room::gallery(0, 0, 5, 10);
        let b = Room::gallery(5, 2, 4, 4);
        let east = doorway_rect(&a, &b, Direction::East);
        assert!((east.x - 4.9).abs() < 1e-5 && (east.w - 0.2).abs() < 1e-5);
        assert!((east.z - 3.0).abs() < 1e-5 && (east.d - 2.0).abs() < 1e-5);

        let top = Room::gallery(0, 0, 6, 6);
        let bottom = Room::gallery(2, 6, 6, 6);
        let south = doorway_rect(&top, &bottom, Direction::South);
        assert!((south.x - 3.0).abs() < 1e-5 && (south.w - 2.0).abs() < 1e-5);
        assert!((south.z - 5.9).abs() < 1e-5 && (south.d - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_identical_rooms_are_distinct_handles() {
        let level = LevelLayout::new(
            0,
            vec![Room::gallery(0, 0, 4, 4), Room::gallery(0, 0, 4, 4)],
        );
        let ids: Vec<RoomId> = level.room_ids().collect();
        assert_ne!(ids[0], ids[1]);
        assert_eq!(level.room(ids[0]), level.room(ids[1]));
    }

    #[test]
    fn test_doorway_sides_both_endpoints() {
        let mut level = LevelLayout::new(
            0,
            vec![Room::gallery(0, 0, 5, 5), Room::gallery(5, 0, 5, 5)],
        );
        level.connections.push(Connection {
            room_a: RoomId(0),
            room_b: RoomId(1),
            direction: Direction::East,
            kind: ConnectionKind::Door,
        });
        assert_eq!(level.doorway_sides(RoomId(0)), vec![Direction::East]);
        assert_eq!(level.doorway_sides(RoomId(1)), vec![Direction::West]);
    }

    #[test]
    fn test_room_at_prefers_gallery() {
        let level = LevelLayout::new(
            0,
            vec![Room::gallery(0, 0, 5, 5), Room::corridor(4, 1, 2, 2)],
        );
        assert_eq!(level.room_at(Vec3::new(4.5, 0.0, 2.0)), Some(RoomId(0)));
        assert_eq!(level.room_at(Vec3::new(50.0, 0.0, 2.0)), None);
    }
}
