//! Layout validation.
//!
//! Pure checks over generated data that return every problem found instead
//! of stopping at the first. Used by the integration tests and the simtest
//! harness.

use std::collections::HashSet;

use crate::config::MuseumConfig;
use crate::constants::{CORRIDOR_WIDTH, GRID_UNIT, MIN_DOOR_OVERLAP};
use crate::layout::{
    doorway_rect, shared_boundary_in, Connection, ConnectionKind, Hole, LevelLayout, Museum, Room,
};

/// A validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

fn error(category: &'static str, message: String) -> ValidationError {
    ValidationError {
        category,
        severity: Severity::Error,
        message,
    }
}

// ── A. Tiling ───────────────────────────────────────────────────────────

/// Galleries must cover the `width × depth` footprint exactly: inside it,
/// pairwise disjoint, total area equal to the footprint. Corridors overhang
/// galleries and are not part of the tiling.
pub fn check_tiling(level: &LevelLayout, width: i32, depth: i32) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let galleries: Vec<(usize, _)> = level
        .rooms
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_corridor())
        .collect();

    for &(i, r) in &galleries {
        if r.x < 0 || r.z < 0 || r.max_x() > width || r.max_z() > depth {
            errors.push(error(
                "tiling",
                format!(
                    "floor {} room #{} lies outside the {}x{} footprint",
                    level.index, i, width, depth
                ),
            ));
        }
    }

    for (n, &(i, a)) in galleries.iter().enumerate() {
        for &(j, b) in &galleries[n + 1..] {
            if a.overlaps(b) {
                errors.push(error(
                    "tiling",
                    format!("floor {} rooms #{} and #{} overlap", level.index, i, j),
                ));
            }
        }
    }

    let area: i64 = galleries.iter().map(|(_, r)| r.area()).sum();
    let expected = width as i64 * depth as i64;
    if area != expected {
        errors.push(error(
            "tiling",
            format!(
                "floor {} galleries cover {} cells, footprint is {}",
                level.index, area, expected
            ),
        ));
    }
    errors
}

// ── B. Connections ──────────────────────────────────────────────────────

/// Every connection names existing rooms, is recorded as a Door or Opening,
/// and appears once per pair. Gallery-to-gallery connections must share a
/// wall of at least [`MIN_DOOR_OVERLAP`] on the stated side, wide enough for
/// the doorway cut. A connection into a corridor must have the corridor
/// crossing the gallery's wall on the stated side, overlapping it by at
/// least [`CORRIDOR_WIDTH`] along that wall.
pub fn check_connections(level: &LevelLayout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut pairs = HashSet::new();

    for conn in &level.connections {
        let (Some(a), Some(b)) = (level.room(conn.room_a), level.room(conn.room_b)) else {
            errors.push(error(
                "connection",
                format!(
                    "floor {} connection {:?}-{:?} references a missing room",
                    level.index, conn.room_a, conn.room_b
                ),
            ));
            continue;
        };

        if conn.kind == ConnectionKind::Corridor {
            errors.push(error(
                "connection",
                format!(
                    "floor {} connection {:?}-{:?} recorded as Corridor",
                    level.index, conn.room_a, conn.room_b
                ),
            ));
        }

        if !pairs.insert(conn.pair()) {
            errors.push(error(
                "connection",
                format!(
                    "floor {} has duplicate connections between {:?} and {:?}",
                    level.index, conn.room_a, conn.room_b
                ),
            ));
        }

        if a.is_corridor() || b.is_corridor() {
            errors.extend(check_corridor_link(level.index, conn, a, b));
            continue;
        }
        let shared = match shared_boundary_in(a, b, conn.direction) {
            Some(s) if s.len() >= MIN_DOOR_OVERLAP => s,
            other => {
                let cells = other.map_or(0, |s| s.len());
                errors.push(error(
                    "connection",
                    format!(
                        "floor {} rooms {:?} and {:?} share {} cells on {:?} side, need {}",
                        level.index,
                        conn.room_a,
                        conn.room_b,
                        cells,
                        conn.direction,
                        MIN_DOOR_OVERLAP
                    ),
                ));
                continue;
            }
        };

        let cut = doorway_rect(a, b, conn.direction);
        let (cut_lo, cut_hi) = if conn.direction.is_x_axis() {
            (cut.z, cut.max_z())
        } else {
            (cut.x, cut.max_x())
        };
        let wall_lo = shared.lo as f32 * GRID_UNIT;
        let wall_hi = shared.hi as f32 * GRID_UNIT;
        if cut_lo < wall_lo - 1e-4 || cut_hi > wall_hi + 1e-4 {
            errors.push(error(
                "connection",
                format!(
                    "floor {} doorway {:?}-{:?} runs past the shared wall",
                    level.index, conn.room_a, conn.room_b
                ),
            ));
        }
    }
    errors
}

/// A gallery-corridor link: the corridor must straddle the gallery's wall on
/// side `conn.direction` and overlap it by a corridor's width.
fn check_corridor_link(
    floor: u32,
    conn: &Connection,
    a: &Room,
    b: &Room,
) -> Vec<ValidationError> {
    let dir = conn.direction;
    let (corridor, gallery, wall) = if b.is_corridor() {
        (b, a, a.face(dir))
    } else {
        (a, b, b.face(dir.opposite()))
    };

    let mut errors = Vec::new();
    let across_lo = corridor.face(dir).min(corridor.face(dir.opposite()));
    let across_hi = corridor.face(dir).max(corridor.face(dir.opposite()));
    if !(across_lo < wall && wall < across_hi) {
        errors.push(error(
            "connection",
            format!(
                "floor {} corridor link {:?}-{:?} does not cross the {:?} wall",
                floor, conn.room_a, conn.room_b, dir
            ),
        ));
    }

    let (c_lo, c_hi) = corridor.span_along(dir);
    let (g_lo, g_hi) = gallery.span_along(dir);
    let overlap = c_hi.min(g_hi) - c_lo.max(g_lo);
    if overlap < CORRIDOR_WIDTH {
        errors.push(error(
            "connection",
            format!(
                "floor {} corridor link {:?}-{:?} overlaps the wall by {} cells, need {}",
                floor, conn.room_a, conn.room_b, overlap, CORRIDOR_WIDTH
            ),
        ));
    }
    errors
}

// ── C. Holes ────────────────────────────────────────────────────────────

/// Holes on the same floor must not overlap.
pub fn check_holes(holes: &[Hole]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, a) in holes.iter().enumerate() {
        for (j, b) in holes.iter().enumerate().skip(i + 1) {
            if a.floor == b.floor && a.rect.intersects(&b.rect) {
                errors.push(error(
                    "hole_overlap",
                    format!("holes #{} and #{} overlap on floor {}", i, j, a.floor),
                ));
            }
        }
    }
    errors
}

// ── D. Vertical circulation ─────────────────────────────────────────────

/// Warn for every floor pair without a stair. Stair planning may fall short
/// of its quota, so this is never an error.
pub fn check_vertical_reachability(museum: &Museum) -> Vec<ValidationError> {
    let floors = museum.layout.levels.len() as u32;
    (0..floors.saturating_sub(1))
        .filter(|&f| museum.stairs_from(f).next().is_none())
        .map(|f| ValidationError {
            category: "vertical_reachability",
            severity: Severity::Warning,
            message: format!("no stair connects floor {} to floor {}", f, f + 1),
        })
        .collect()
}

// ── Master validation ───────────────────────────────────────────────────

/// Run every check against a generated museum.
pub fn validate_museum(museum: &Museum, config: &MuseumConfig) -> Vec<ValidationError> {
    let mut all = Vec::new();
    for level in &museum.layout.levels {
        all.extend(check_tiling(level, config.width, config.depth));
        all.extend(check_connections(level));
    }
    all.extend(check_holes(&museum.holes));
    all.extend(check_vertical_reachability(museum));
    all
}

/// Only the `Error`-severity findings.
pub fn errors_only(findings: &[ValidationError]) -> Vec<&ValidationError> {
    findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .collect()
}
