//! Curator Headless Generation Harness
//!
//! Generates a museum and validates layout, stair, patrol and guard logic.
//! Runs entirely in-process: no renderer, no physics, no audio.
//!
//! Usage:
//!   cargo run -p curator-simtest
//!   cargo run -p curator-simtest -- --seed 42 --floors 4 --verbose
//!   cargo run -p curator-simtest -- --config museum.json --dump layout.json

use std::path::{Path, PathBuf};
use std::process::exit;

use clap::Parser;
use curator_logic::agent::{
    Agent, AgentState, ColliderId, LineOfSight, PlayerView, SensingConfig,
};
use curator_logic::config::{validate_config, MuseumConfig};
use curator_logic::generator::generate_museum;
use curator_logic::geometry::Vec3;
use curator_logic::layout::{LevelLayout, Museum, Room, RoomId};
use curator_logic::patrol::{NavGraph, PatrolRoute};
use curator_logic::seed::{agent_seed, rng_for};
use curator_logic::validation::{
    check_connections, check_holes, check_tiling, check_vertical_reachability, Severity,
    ValidationError,
};
use rand::Rng;
use serde::Serialize;

/// Headless generation harness for Curator
#[derive(Parser, Debug)]
#[command(name = "curator-simtest")]
#[command(version, about = "Generate a museum and validate it", long_about = None)]
struct Args {
    /// Museum config as JSON; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Top-level seed (random when neither flag nor config sets one)
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    floors: Option<u32>,

    #[arg(long)]
    width: Option<i32>,

    #[arg(long)]
    depth: Option<i32>,

    /// Guards to simulate per floor
    #[arg(long, default_value_t = 3)]
    agents: u32,

    /// Simulation ticks of 0.1 s
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Write the generated museum as JSON
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Print every check, not only failures
    #[arg(short, long)]
    verbose: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

const TICK: f32 = 0.1;
const PLAYER: ColliderId = ColliderId(u64::MAX);
const WALL: ColliderId = ColliderId(0);

/// Stand-in occlusion: clear sight only within a single room.
struct RoomSight<'a> {
    level: &'a LevelLayout,
}

impl LineOfSight for RoomSight<'_> {
    fn nearest_hit(&self, from: Vec3, to: Vec3) -> Option<ColliderId> {
        match (self.level.room_at(from), self.level.room_at(to)) {
            (Some(a), Some(b)) if a == b => Some(PLAYER),
            (Some(_), Some(_)) => Some(WALL),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct Dump<'a> {
    seed: u64,
    config: &'a MuseumConfig,
    museum: &'a Museum,
}

fn main() {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    println!("=== Curator Generation Harness ===\n");

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            exit(2);
        }
    };
    let seed = config.seed.unwrap_or_else(|| {
        let drawn = rand::random();
        log::info!("no seed configured, drew {}", drawn);
        drawn
    });
    println!(
        "museum '{}': {}x{}, {} floors, seed {}\n",
        config.name, config.width, config.depth, config.floors, seed
    );

    let mut results = Vec::new();

    // 1. Configuration
    let config_ok = validate_configuration(&config, &mut results);

    if config_ok {
        match generate_museum(&config, seed) {
            Ok(museum) => {
                // 2. Layout invariants
                results.extend(validate_layout(&museum, &config));

                // 3. Determinism
                results.extend(validate_determinism(&museum, &config, seed));

                // 4. Vertical circulation
                results.extend(validate_stairs(&museum));

                // 5. Patrol routes
                results.extend(validate_patrols(&museum, seed));

                // 6. Guards
                results.extend(validate_detection());
                results.extend(simulate_guards(&museum, &config, seed, &args));

                if let Some(path) = &args.dump {
                    results.push(dump_museum(path.as_path(), seed, &config, &museum));
                }
            }
            Err(e) => results.push(TestResult {
                name: "generate".into(),
                passed: false,
                detail: e.to_string(),
            }),
        }
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        exit(1);
    }
}

fn load_config(args: &Args) -> Result<MuseumConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("reading {}: {}", path.display(), e))?;
            serde_json::from_str(&text).map_err(|e| format!("parsing {}: {}", path.display(), e))?
        }
        None => MuseumConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(floors) = args.floors {
        config.floors = floors;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    Ok(config)
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_configuration(config: &MuseumConfig, results: &mut Vec<TestResult>) -> bool {
    println!("--- Configuration ---");
    let errors = validate_config(config);
    results.push(TestResult {
        name: "config_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            "no problems".into()
        } else {
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    });
    errors.is_empty()
}

// ── 2. Layout ───────────────────────────────────────────────────────────

fn validate_layout(museum: &Museum, config: &MuseumConfig) -> Vec<TestResult> {
    println!("--- Layout ---");
    let mut results = Vec::new();

    for level in &museum.layout.levels {
        let tiling = check_tiling(level, config.width, config.depth);
        results.push(TestResult {
            name: format!("floor{}_tiling", level.index),
            passed: tiling.is_empty(),
            detail: first_message(&tiling).unwrap_or_else(|| {
                format!(
                    "{} galleries cover {}x{}",
                    level.gallery_count(),
                    config.width,
                    config.depth
                )
            }),
        });

        let connections = check_connections(level);
        results.push(TestResult {
            name: format!("floor{}_connections", level.index),
            passed: connections.is_empty(),
            detail: first_message(&connections).unwrap_or_else(|| {
                format!(
                    "{} connections, {} corridors",
                    level.connections.len(),
                    level.corridor_count()
                )
            }),
        });
    }

    let holes = check_holes(&museum.holes);
    results.push(TestResult {
        name: "holes_disjoint".into(),
        passed: holes.is_empty(),
        detail: first_message(&holes)
            .unwrap_or_else(|| format!("{} holes, none overlapping", museum.holes.len())),
    });

    results
}

fn first_message(findings: &[ValidationError]) -> Option<String> {
    findings.first().map(|f| {
        if findings.len() > 1 {
            format!("{} (+{} more)", f.message, findings.len() - 1)
        } else {
            f.message.clone()
        }
    })
}

// ── 3. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(museum: &Museum, config: &MuseumConfig, seed: u64) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let again = generate_museum(config, seed);
    vec![TestResult {
        name: "same_seed_same_museum".into(),
        passed: again.as_ref().map_or(false, |m| m == museum),
        detail: format!("seed {} regenerated", seed),
    }]
}

// ── 4. Stairs ───────────────────────────────────────────────────────────

fn validate_stairs(museum: &Museum) -> Vec<TestResult> {
    println!("--- Stairs ---");
    let mut results = Vec::new();

    for f in 0..museum.layout.levels.len().saturating_sub(1) as u32 {
        let count = museum.stairs_from(f).count();
        results.push(TestResult {
            name: format!("stairs_{}_to_{}", f, f + 1),
            // an unfilled quota is allowed
            passed: true,
            detail: format!("{} placed", count),
        });
    }

    let warnings = check_vertical_reachability(museum);
    for w in warnings.iter().filter(|w| w.severity == Severity::Warning) {
        log::warn!("{}", w.message);
    }

    results.push(TestResult {
        name: "holes_per_stair".into(),
        passed: museum.holes.len() == 2 * museum.stairs.len(),
        detail: format!("{} stairs, {} holes", museum.stairs.len(), museum.holes.len()),
    });

    results
}

// ── 5. Patrol routes ────────────────────────────────────────────────────

fn validate_patrols(museum: &Museum, seed: u64) -> Vec<TestResult> {
    println!("--- Patrol Routes ---");
    let mut results = Vec::new();

    for level in &museum.layout.levels {
        let graph = NavGraph::build(level, museum.layout.floor_offset(level.index));
        let start = RoomId(0);
        let reachable = graph.reachable_from(start).len();
        let mut rng = rng_for(agent_seed(seed, level.index));
        let route = graph.random_route(start, &mut rng);
        let expected = 3 * reachable.saturating_sub(1);

        results.push(TestResult {
            name: format!("floor{}_route_length", level.index),
            passed: route.waypoints().len() == expected,
            detail: format!(
                "{} waypoints over {}/{} reachable rooms",
                route.waypoints().len(),
                reachable,
                graph.room_count()
            ),
        });
    }

    results
}

// ── 6. Guards ───────────────────────────────────────────────────────────

/// Fixed scenarios on a single open room.
fn validate_detection() -> Vec<TestResult> {
    println!("--- Detection ---");
    let mut results = Vec::new();
    let level = LevelLayout::new(0, vec![Room::gallery(0, 0, 30, 20)]);
    let sight = RoomSight { level: &level };
    let mut rng = rng_for(0);

    let spawn = Vec3::new(5.0, 0.0, 10.0);
    let fresh = || {
        Agent::new(
            0,
            spawn,
            Some(RoomId(0)),
            PatrolRoute::empty(),
            SensingConfig::default(),
        )
    };
    let at = |x: f32, z: f32| PlayerView {
        position: Vec3::new(x, 0.0, z),
        collider: PLAYER,
    };

    let mut ahead = fresh();
    ahead.update(TICK, &at(12.0, 10.0), &level, &sight, &mut rng);
    results.push(TestResult {
        name: "detect_in_view".into(),
        passed: ahead.state() == AgentState::Chase,
        detail: "player 7 units ahead → CHASE in one tick".into(),
    });

    let mut behind = fresh();
    behind.update(TICK, &at(1.0, 10.0), &level, &sight, &mut rng);
    results.push(TestResult {
        name: "ignore_behind".into(),
        passed: behind.state() == AgentState::Wander,
        detail: "player behind → WANDER".into(),
    });

    let mut far = fresh();
    far.update(TICK, &at(25.0, 10.0), &level, &sight, &mut rng);
    results.push(TestResult {
        name: "ignore_out_of_range".into(),
        passed: far.state() == AgentState::Wander,
        detail: "player 20 units ahead → WANDER".into(),
    });

    results
}

/// Run guards on every floor with the player parked in the last gallery.
fn simulate_guards(
    museum: &Museum,
    config: &MuseumConfig,
    seed: u64,
    args: &Args,
) -> Vec<TestResult> {
    println!("--- Guard Simulation ---");
    let mut results = Vec::new();

    for level in &museum.layout.levels {
        let y = museum.layout.floor_offset(level.index);
        let graph = NavGraph::build(level, y);
        let sight = RoomSight { level };
        let mut rng = rng_for(agent_seed(seed, level.index));

        let mut agents: Vec<Agent> = (0..args.agents)
            .filter_map(|i| {
                let room = RoomId(rng.gen_range(0..level.gallery_count() as u32));
                let route = graph.random_route(room, &mut rng);
                Agent::spawn_in(i, level, room, y, route, SensingConfig::default())
            })
            .collect();

        let player_room = RoomId(level.gallery_count() as u32 - 1);
        let player = PlayerView {
            position: level
                .room(player_room)
                .map_or(Vec3::new(0.0, y, 0.0), |r| r.center(y)),
            collider: PLAYER,
        };

        for _ in 0..args.ticks {
            for agent in &mut agents {
                agent.update(TICK, &player, level, &sight, &mut rng);
            }
        }

        let w = config.width as f32;
        let d = config.depth as f32;
        let inside = agents.iter().all(|a| {
            let p = a.position();
            p.x.is_finite()
                && p.z.is_finite()
                && (-1.0..=w + 1.0).contains(&p.x)
                && (-1.0..=d + 1.0).contains(&p.z)
        });
        let chasing = agents
            .iter()
            .filter(|a| a.state() == AgentState::Chase)
            .count();

        results.push(TestResult {
            name: format!("floor{}_guards", level.index),
            passed: inside,
            detail: format!(
                "{} guards, {} chasing after {} ticks",
                agents.len(),
                chasing,
                args.ticks
            ),
        });
    }

    results
}

// ── Dump ────────────────────────────────────────────────────────────────

fn dump_museum(path: &Path, seed: u64, config: &MuseumConfig, museum: &Museum) -> TestResult {
    let dump = Dump {
        seed,
        config,
        museum,
    };
    let written = serde_json::to_string_pretty(&dump)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
    match &written {
        Ok(()) => log::info!("dumped seed {} to {}", seed, path.display()),
        Err(e) => log::error!("dump to {} failed: {}", path.display(), e),
    }
    TestResult {
        name: "dump".into(),
        passed: written.is_ok(),
        detail: match written {
            Ok(()) => format!("wrote {}", path.display()),
            Err(e) => e,
        },
    }
}
