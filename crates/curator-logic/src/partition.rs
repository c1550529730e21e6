//! Footprint partitioning by recursive bisection.
//!
//! A rectangle is cut in two along one axis, then each half is cut again,
//! until the depth limit is reached or neither axis can hold two minimum-size
//! rooms. The leaves tile the footprint exactly: no gaps, no overlaps.
//!
//! ```
//! use curator_logic::partition::partition_floor;
//!
//! let rooms = partition_floor(40, 30, 4, 42).unwrap();
//! let area: i64 = rooms.iter().map(|r| r.area()).sum();
//! assert_eq!(area, 40 * 30);
//! ```

use rand::Rng;

use crate::constants::{MIN_ROOM_SIZE, SPLIT_GAP};
use crate::error::LayoutError;
use crate::layout::Room;
use crate::seed::rng_for;

/// Pending node of the split tree.
struct Node {
    x: i32,
    z: i32,
    w: i32,
    h: i32,
    depth: u32,
}

/// Smallest dimension that can still be cut into two legal rooms.
fn splittable(dim: i32) -> bool {
    dim >= 2 * MIN_ROOM_SIZE + SPLIT_GAP
}

/// Check footprint dimensions before any room is produced.
pub fn check_footprint(width: i32, depth: i32) -> Result<(), LayoutError> {
    if width <= 0 || depth <= 0 {
        return Err(LayoutError::NonPositiveFootprint { width, depth });
    }
    if width < MIN_ROOM_SIZE || depth < MIN_ROOM_SIZE {
        return Err(LayoutError::FootprintTooSmall {
            width,
            depth,
            min: MIN_ROOM_SIZE,
        });
    }
    Ok(())
}

/// Partition a `width × depth` footprint anchored at the origin.
///
/// Leaves come out in depth-first order, first half before second half, so
/// the same stream always yields the same list in the same order.
pub fn partition_footprint(
    width: i32,
    depth: i32,
    max_depth: u32,
    rng: &mut impl Rng,
) -> Result<Vec<Room>, LayoutError> {
    check_footprint(width, depth)?;

    let mut leaves = Vec::new();
    let mut stack = vec![Node {
        x: 0,
        z: 0,
        w: width,
        h: depth,
        depth: 0,
    }];

    while let Some(node) = stack.pop() {
        let split_x = splittable(node.w);
        let split_z = splittable(node.h);

        if node.depth >= max_depth || (!split_x && !split_z) {
            leaves.push(Room::gallery(node.x, node.z, node.w, node.h));
            continue;
        }

        // Both axes legal: cut across the longer one.
        let cut_along_x = if split_x && split_z {
            node.w >= node.h
        } else {
            split_x
        };

        let (first, second) = if cut_along_x {
            let offset = rng.gen_range(MIN_ROOM_SIZE..node.w - MIN_ROOM_SIZE);
            (
                Node {
                    x: node.x,
                    z: node.z,
                    w: offset,
                    h: node.h,
                    depth: node.depth + 1,
                },
                Node {
                    x: node.x + offset,
                    z: node.z,
                    w: node.w - offset,
                    h: node.h,
                    depth: node.depth + 1,
                },
            )
        } else {
            let offset = rng.gen_range(MIN_ROOM_SIZE..node.h - MIN_ROOM_SIZE);
            (
                Node {
                    x: node.x,
                    z: node.z,
                    w: node.w,
                    h: offset,
                    depth: node.depth + 1,
                },
                Node {
                    x: node.x,
                    z: node.z + offset,
                    w: node.w,
                    h: node.h - offset,
                    depth: node.depth + 1,
                },
            )
        };

        // LIFO: push the second half first so the first half is expanded first.
        stack.push(second);
        stack.push(first);
    }

    log::trace!(
        "partitioned {}x{} into {} rooms",
        width,
        depth,
        leaves.len()
    );
    Ok(leaves)
}

/// Partition with a fresh stream seeded from `seed`.
pub fn partition_floor(
    width: i32,
    depth: i32,
    max_depth: u32,
    seed: u64,
) -> Result<Vec<Room>, LayoutError> {
    let mut rng = rng_for(seed);
    partition_footprint(width, depth, max_depth, &mut rng)
}
