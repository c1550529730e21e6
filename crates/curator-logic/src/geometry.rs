//! Small geometry vocabulary shared by every stage.
//!
//! World space is right-handed with `y` up. The layout lives on the `x`/`z`
//! plane: `+x` is East, `+z` is South.

use serde::{Deserialize, Serialize};

/// A point or direction in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    /// Unit vector in the same direction, or `ZERO` for a zero-length input.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            *self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

/// Axis-aligned rectangle on the `x`/`z` plane, in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub z: f32,
    pub w: f32,
    pub d: f32,
}

impl Rect {
    pub fn new(x: f32, z: f32, w: f32, d: f32) -> Self {
        Self { x, z, w, d }
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.w
    }

    pub fn max_z(&self) -> f32 {
        self.z + self.d
    }

    pub fn area(&self) -> f32 {
        self.w * self.d
    }

    /// Open-interior overlap test. Rectangles that only touch along an edge
    /// do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.z < other.max_z()
            && other.z < self.max_z()
    }

    /// Intersection of two rectangles, if their interiors overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x0 = self.x.max(other.x);
        let z0 = self.z.max(other.z);
        let x1 = self.max_x().min(other.max_x());
        let z1 = self.max_z().min(other.max_z());
        Some(Rect::new(x0, z0, x1 - x0, z1 - z0))
    }

    /// Closed containment test on the plane (`y` ignored).
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.x && p.x <= self.max_x() && p.z >= self.z && p.z <= self.max_z()
    }

    /// Shrink by `margin` on every side. Collapses to the centre line when
    /// the rectangle is narrower than twice the margin.
    pub fn inset(&self, margin: f32) -> Rect {
        let mx = margin.min(self.w / 2.0);
        let mz = margin.min(self.d / 2.0);
        Rect::new(self.x + mx, self.z + mz, self.w - 2.0 * mx, self.d - 2.0 * mz)
    }

    /// Expand by `pad` on every side.
    pub fn pad(&self, pad: f32) -> Rect {
        Rect::new(
            self.x - pad,
            self.z - pad,
            self.w + 2.0 * pad,
            self.d + 2.0 * pad,
        )
    }

    pub fn center(&self, y: f32) -> Vec3 {
        Vec3::new(self.x + self.w / 2.0, y, self.z + self.d / 2.0)
    }
}

/// Compass side of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `-z`
    North,
    /// `+z`
    South,
    /// `+x`
    East,
    /// `-x`
    West,
}

impl Direction {
    /// Fixed iteration order. Generation outcomes depend on it.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Unit step on the plane.
    pub fn step(self) -> Vec3 {
        match self {
            Direction::North => Vec3::new(0.0, 0.0, -1.0),
            Direction::South => Vec3::new(0.0, 0.0, 1.0),
            Direction::East => Vec3::new(1.0, 0.0, 0.0),
            Direction::West => Vec3::new(-1.0, 0.0, 0.0),
        }
    }

    /// True for East/West.
    pub fn is_x_axis(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(4.0, 0.0, 4.0, 4.0);
        assert!(!a.intersects(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_overlapping_rects_intersect() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(3.0, 1.0, 4.0, 1.0);
        let i = a.intersection(&b).unwrap();
        assert_eq!(i, Rect::new(3.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_inset_collapses_narrow_rect() {
        let r = Rect::new(0.0, 0.0, 1.0, 10.0).inset(0.8);
        assert!((r.w - 0.0).abs() < 1e-6);
        assert!((r.x - 0.5).abs() < 1e-6);
        assert!((r.d - 8.4).abs() < 1e-5);
    }

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let sum = dir.step() + dir.opposite().step();
            assert_eq!(sum, Vec3::ZERO);
        }
    }

    #[test]
    fn test_normalize_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        let n = Vec3::new(3.0, 0.0, 4.0).normalize();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }
}
