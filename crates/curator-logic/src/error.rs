//! Layout contract violations.
//!
//! Generation itself never fails once its inputs are valid: connection and
//! stair planning degrade to fewer connections instead of erroring. These
//! errors cover the inputs that cannot produce any layout at all.

use thiserror::Error;

/// Errors reported when a museum cannot be generated from its inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Width or depth is zero or negative.
    #[error("footprint must be positive, got {width}x{depth}")]
    NonPositiveFootprint { width: i32, depth: i32 },
    /// Footprint cannot hold even a single minimum-size room.
    #[error("footprint {width}x{depth} is smaller than the minimum room size {min}")]
    FootprintTooSmall { width: i32, depth: i32, min: i32 },
    /// A museum needs at least one floor.
    #[error("museum must have at least one floor")]
    NoFloors,
    /// Floor height must be a positive, finite number.
    #[error("invalid floor height {0}")]
    InvalidFloorHeight(f32),
}
