//! Museum configuration.
//!
//! A `MuseumConfig` describes everything the generator needs besides the
//! seed. It is plain serde data so a front-end can load it from JSON or build
//! it from command-line flags, then check it with [`validate_config`] before
//! generating.
//!
//! ```
//! use curator_logic::config::{validate_config, MuseumConfig};
//!
//! let config = MuseumConfig { floors: 2, seed: Some(7), ..Default::default() };
//! assert!(validate_config(&config).is_empty());
//! let museum = config.generate().unwrap();
//! assert_eq!(museum.layout.levels.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{FLOOR_HEIGHT, MAX_STAIRS_PER_PAIR, MIN_ROOM_SIZE};
use crate::error::LayoutError;
use crate::generator::generate_museum;
use crate::layout::Museum;

/// Upper bound on floors a config may request.
pub const MAX_FLOORS: u32 = 32;
/// Upper bound on partition depth (2^depth rooms at most).
pub const MAX_PARTITION_DEPTH: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuseumConfig {
    pub name: String,
    /// Footprint width in grid cells.
    pub width: i32,
    /// Footprint depth in grid cells.
    pub depth: i32,
    pub floors: u32,
    /// Maximum bisection depth per floor.
    pub max_depth: u32,
    pub floor_height: f32,
    /// `None` lets the front-end pick one at launch.
    pub seed: Option<u64>,
    pub max_stairs_per_pair: u32,
}

impl Default for MuseumConfig {
    fn default() -> Self {
        Self {
            name: "Museum".to_string(),
            width: 40,
            depth: 30,
            floors: 3,
            max_depth: 4,
            floor_height: FLOOR_HEIGHT,
            seed: None,
            max_stairs_per_pair: MAX_STAIRS_PER_PAIR,
        }
    }
}

impl MuseumConfig {
    /// Generate with the configured seed, or seed 0 when none is set.
    pub fn generate(&self) -> Result<Museum, LayoutError> {
        generate_museum(self, self.seed.unwrap_or_default())
    }
}

/// Configuration problems.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("museum name is empty")]
    EmptyName,
    #[error("footprint {width}x{depth} is below the minimum room size {min}")]
    FootprintTooSmall { width: i32, depth: i32, min: i32 },
    #[error("floor count {0} is outside 1..={max}", max = MAX_FLOORS)]
    InvalidFloorCount(u32),
    #[error("partition depth {0} exceeds {max}", max = MAX_PARTITION_DEPTH)]
    PartitionTooDeep(u32),
    #[error("floor height {0} is not a positive number")]
    InvalidFloorHeight(f32),
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &MuseumConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.name.trim().is_empty() {
        errors.push(ConfigError::EmptyName);
    }
    if config.width < MIN_ROOM_SIZE || config.depth < MIN_ROOM_SIZE {
        errors.push(ConfigError::FootprintTooSmall {
            width: config.width,
            depth: config.depth,
            min: MIN_ROOM_SIZE,
        });
    }
    if config.floors == 0 || config.floors > MAX_FLOORS {
        errors.push(ConfigError::InvalidFloorCount(config.floors));
    }
    if config.max_depth > MAX_PARTITION_DEPTH {
        errors.push(ConfigError::PartitionTooDeep(config.max_depth));
    }
    if !(config.floor_height.is_finite() && config.floor_height > 0.0) {
        errors.push(ConfigError::InvalidFloorHeight(config.floor_height));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&MuseumConfig::default()).is_empty());
    }

    #[test]
    fn test_small_footprint() {
        let config = MuseumConfig {
            width: 3,
            ..Default::default()
        };
        assert!(validate_config(&config).contains(&ConfigError::FootprintTooSmall {
            width: 3,
            depth: 30,
            min: 4
        }));
    }

    #[test]
    fn test_floor_count_bounds() {
        let mut config = MuseumConfig {
            floors: 0,
            ..Default::default()
        };
        assert!(validate_config(&config).contains(&ConfigError::InvalidFloorCount(0)));
        config.floors = 100;
        assert!(validate_config(&config).contains(&ConfigError::InvalidFloorCount(100)));
    }

    #[test]
    fn test_bad_floor_height() {
        let config = MuseumConfig {
            floor_height: -1.0,
            ..Default::default()
        };
        assert!(validate_config(&config).contains(&ConfigError::InvalidFloorHeight(-1.0)));
        let nan = MuseumConfig {
            floor_height: f32::NAN,
            ..Default::default()
        };
        assert!(validate_config(&nan)
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidFloorHeight(_))));
    }

    #[test]
    fn test_multiple_errors_reported() {
        let config = MuseumConfig {
            name: "  ".to_string(),
            max_depth: 40,
            ..Default::default()
        };
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ConfigError::EmptyName));
        assert!(errors.contains(&ConfigError::PartitionTooDeep(40)));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: MuseumConfig = serde_json::from_str(r#"{"floors": 5, "seed": 11}"#).unwrap();
        assert_eq!(config.floors, 5);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.width, 40);
        assert_eq!(config.floor_height, FLOOR_HEIGHT);
    }
}
