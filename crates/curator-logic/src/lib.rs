//! Pure layout generation and patrol logic for Curator.
//!
//! This crate builds a reproducible, multi-floor museum layout from a single
//! seed and drives the patrol/pursuit behavior of the guards that roam it.
//! Functions take plain data and return results, so everything here is
//! unit-testable and independent of whatever renderer, physics engine or
//! audio system consumes the output.
//!
//! # Pipeline
//!
//! ```text
//! partition ──► connections ──► stairs
//!                   │
//!                   └────────► patrol ──► agent
//! ```
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`agent`] | Guard WANDER/CHASE state machine with FOV + occlusion sensing |
//! | [`config`] | Museum configuration and validation |
//! | [`connections`] | Door / opening / corridor classification between rooms |
//! | [`constants`] | Grid, door, stair and waypoint constants |
//! | [`error`] | Layout contract violations |
//! | [`generator`] | Whole-museum generation from one seed |
//! | [`geometry`] | `Vec3`, `Rect`, `Direction` |
//! | [`layout`] | Rooms, connections, floors, holes, stair placements |
//! | [`partition`] | Recursive bisection of a footprint into rooms |
//! | [`patrol`] | Navigation graph and randomized patrol routes |
//! | [`seed`] | Per-floor / per-stage seed derivation |
//! | [`slab`] | Floor/ceiling slab patches around stair holes |
//! | [`stairs`] | Vertical circulation between adjacent floors |
//! | [`validation`] | Layout invariant checks |
//!
//! ```
//! use curator_logic::config::MuseumConfig;
//! use curator_logic::generator::generate_museum;
//!
//! let config = MuseumConfig::default();
//! let museum = generate_museum(&config, 42).unwrap();
//! assert_eq!(museum.layout.levels.len(), config.floors as usize);
//! ```

pub mod agent;
pub mod config;
pub mod connections;
pub mod constants;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod layout;
pub mod partition;
pub mod patrol;
pub mod seed;
pub mod slab;
pub mod stairs;
pub mod validation;
