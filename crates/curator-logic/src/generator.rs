//! Whole-museum generation.
//!
//! Floors are generated independently, each from its own derived seeds:
//!
//! 1. partition the footprint into galleries
//! 2. plan connections, appending corridor rooms
//!
//! Stairs are planned last over the finished floors with the stair seed.

use crate::config::MuseumConfig;
use crate::connections::plan_level;
use crate::error::LayoutError;
use crate::layout::{Museum, MuseumLayout};
use crate::partition::{check_footprint, partition_floor};
use crate::seed::{connection_seed, floor_seed, rng_for, stair_seed};
use crate::stairs::plan_stairs;

/// Generate a complete museum. Same config and seed, same museum.
pub fn generate_museum(config: &MuseumConfig, seed: u64) -> Result<Museum, LayoutError> {
    if config.floors == 0 {
        return Err(LayoutError::NoFloors);
    }
    if !(config.floor_height.is_finite() && config.floor_height > 0.0) {
        return Err(LayoutError::InvalidFloorHeight(config.floor_height));
    }
    check_footprint(config.width, config.depth)?;

    let mut levels = Vec::with_capacity(config.floors as usize);
    for floor in 0..config.floors {
        let rooms = partition_floor(
            config.width,
            config.depth,
            config.max_depth,
            floor_seed(seed, floor),
        )?;
        levels.push(plan_level(floor, rooms, connection_seed(seed, floor)));
    }

    let layout = MuseumLayout {
        levels,
        floor_height: config.floor_height,
    };
    let mut rng = rng_for(stair_seed(seed));
    let plan = plan_stairs(&layout, config.max_stairs_per_pair, &mut rng);

    let rooms: usize = layout.levels.iter().map(|l| l.rooms.len()).sum();
    let connections: usize = layout.levels.iter().map(|l| l.connections.len()).sum();
    log::info!(
        "generated '{}' (seed {}): {} floors, {} rooms, {} connections, {} stairs",
        config.name,
        seed,
        layout.levels.len(),
        rooms,
        connections,
        plan.stairs.len()
    );

    Ok(Museum {
        layout,
        holes: plan.holes,
        stairs: plan.stairs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default() {
        let museum = generate_museum(&MuseumConfig::default(), 1).unwrap();
        assert_eq!(museum.layout.levels.len(), 3);
        for (i, level) in museum.layout.levels.iter().enumerate() {
            assert_eq!(level.index, i as u32);
            assert!(level.gallery_count() >= 2);
        }
        assert_eq!(museum.holes.len(), 2 * museum.stairs.len());
    }

    #[test]
    fn test_same_seed_same_museum() {
        let config = MuseumConfig::default();
        assert_eq!(
            generate_museum(&config, 99).unwrap(),
            generate_museum(&config, 99).unwrap()
        );
    }

    #[test]
    fn test_floors_differ() {
        let museum = generate_museum(&MuseumConfig::default(), 5).unwrap();
        let levels = &museum.layout.levels;
        assert!(levels[0].rooms != levels[1].rooms || levels[1].rooms != levels[2].rooms);
    }

    #[test]
    fn test_single_floor_has_no_stairs() {
        let config = MuseumConfig {
            floors: 1,
            ..Default::default()
        };
        let museum = generate_museum(&config, 3).unwrap();
        assert!(museum.stairs.is_empty());
        assert!(museum.holes.is_empty());
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let no_floors = MuseumConfig {
            floors: 0,
            ..Default::default()
        };
        assert_eq!(generate_museum(&no_floors, 0), Err(LayoutError::NoFloors));

        let flat = MuseumConfig {
            floor_height: 0.0,
            ..Default::default()
        };
        assert_eq!(
            generate_museum(&flat, 0),
            Err(LayoutError::InvalidFloorHeight(0.0))
        );

        let tiny = MuseumConfig {
            width: 2,
            ..Default::default()
        };
        assert!(matches!(
            generate_museum(&tiny, 0),
            Err(LayoutError::FootprintTooSmall { .. })
        ));
    }
}
