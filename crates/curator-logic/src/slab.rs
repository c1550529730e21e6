//! Slab patches around stair holes.
//!
//! Floor and ceiling slabs are built from axis-aligned patches. A patch that
//! touches a hole is subdivided around it into up to four pieces:
//!
//! ```text
//! ┌────┬──────┬────┐
//! │    │ top  │    │
//! │left├──────┤right
//! │    │ hole │    │
//! │    ├──────┤    │
//! │    │bottom│    │
//! └────┴──────┴────┘
//! ```
//!
//! Pieces go back on an explicit stack until no hole intersects them, so the
//! output covers exactly the slab minus the holes.

use crate::geometry::Rect;
use crate::layout::{Museum, Slab};

const EPSILON: f32 = 1e-4;

/// Overlap by more than float noise on both axes.
fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.max_x() - EPSILON
        && b.x < a.max_x() - EPSILON
        && a.z < b.max_z() - EPSILON
        && b.z < a.max_z() - EPSILON
}

/// Pieces of `patch` left after removing `hole` (which must intersect it).
fn pieces_around(patch: &Rect, hole: &Rect) -> Vec<Rect> {
    let Some(cut) = patch.intersection(hole) else {
        return vec![*patch];
    };
    let mut out = Vec::with_capacity(4);
    let left = cut.x - patch.x;
    let right = patch.max_x() - cut.max_x();
    let top = cut.z - patch.z;
    let bottom = patch.max_z() - cut.max_z();

    if left > EPSILON {
        out.push(Rect::new(patch.x, patch.z, left, patch.d));
    }
    if right > EPSILON {
        out.push(Rect::new(cut.max_x(), patch.z, right, patch.d));
    }
    if top > EPSILON {
        out.push(Rect::new(cut.x, patch.z, cut.w, top));
    }
    if bottom > EPSILON {
        out.push(Rect::new(cut.x, cut.max_z(), cut.w, bottom));
    }
    out
}

/// Decompose `rect` into patches covering `rect` minus every hole.
pub fn split_around_holes(rect: Rect, holes: &[Rect]) -> Vec<Rect> {
    let mut patches = Vec::new();
    let mut stack = vec![rect];

    while let Some(patch) = stack.pop() {
        match holes.iter().find(|h| overlaps(h, &patch)) {
            Some(hole) => stack.extend(pieces_around(&patch, hole)),
            None => patches.push(patch),
        }
    }
    patches
}

fn slab_patches(museum: &Museum, floor: u32, slab: Slab, footprint: Rect) -> Vec<Rect> {
    let holes: Vec<Rect> = museum
        .holes_on(floor)
        .filter(|h| h.slab == slab)
        .map(|h| h.rect)
        .collect();
    split_around_holes(footprint, &holes)
}

/// Floor slab patches for `floor` over `footprint`.
pub fn floor_patches(museum: &Museum, floor: u32, footprint: Rect) -> Vec<Rect> {
    slab_patches(museum, floor, Slab::Floor, footprint)
}

/// Ceiling slab patches for `floor` over `footprint`.
pub fn ceiling_patches(museum: &Museum, floor: u32, footprint: Rect) -> Vec<Rect> {
    slab_patches(museum, floor, Slab::Ceiling, footprint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(rects: &[Rect]) -> f32 {
        rects.iter().map(Rect::area).sum()
    }

    #[test]
    fn test_no_holes_single_patch() {
        let r = Rect::new(0.0, 0.0, 10.0, 8.0);
        assert_eq!(split_around_holes(r, &[]), vec![r]);
    }

    #[test]
    fn test_center_hole_four_pieces() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let hole = Rect::new(4.0, 4.0, 2.0, 2.0);
        let patches = split_around_holes(r, &[hole]);
        assert_eq!(patches.len(), 4);
        assert!((area(&patches) - 96.0).abs() < 1e-3);
        assert!(patches.iter().all(|p| !p.intersects(&hole)));
    }

    #[test]
    fn test_hole_clipped_to_slab() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let hole = Rect::new(8.0, -2.0, 5.0, 4.0);
        let patches = split_around_holes(r, &[hole]);
        assert!((area(&patches) - (100.0 - 4.0)).abs() < 1e-3);
    }

    #[test]
    fn test_multiple_holes_disjoint_patches() {
        let r = Rect::new(0.0, 0.0, 40.0, 30.0);
        let holes = [
            Rect::new(2.0, 2.0, 8.5, 2.5),
            Rect::new(20.0, 10.0, 2.5, 8.5),
        ];
        let patches = split_around_holes(r, &holes);
        let expected = 1200.0 - holes.iter().map(Rect::area).sum::<f32>();
        assert!((area(&patches) - expected).abs() < 1e-2);
        for (i, a) in patches.iter().enumerate() {
            for b in patches.iter().skip(i + 1) {
                assert!(!a.intersects(b));
            }
            for h in &holes {
                assert!(!a.intersects(h));
            }
        }
    }

    #[test]
    fn test_hole_covering_slab_leaves_nothing() {
        let r = Rect::new(0.0, 0.0, 4.0, 4.0);
        let patches = split_around_holes(r, &[Rect::new(-1.0, -1.0, 6.0, 6.0)]);
        assert!(patches.is_empty());
    }
}
