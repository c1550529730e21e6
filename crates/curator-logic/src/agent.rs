//! Guard agents: sensing and the WANDER/CHASE state machine.
//!
//! Each tick runs two phases:
//!
//! 1. **Sense** (WANDER only). The player is detected when all three hold:
//!    - straight-line distance ≤ detection range
//!    - the angle between the agent's facing and the direction to the player
//!      is within the half field of view (compared by cosine)
//!    - a nearest-hit ray from agent to player returns the player's own
//!      collider. Any other hit, or no answer, means not visible.
//! 2. **Act**. WANDER walks the patrol route, then random points inside the
//!    current room. CHASE steers straight at the player's live position.
//!
//! | State | Speed | Target |
//! |-------|-------|--------|
//! | Wander | 1.2 | next waypoint, else random point in room |
//! | Chase | 3.5 | player position |
//!
//! There is no way back from CHASE.
//!
//! ```
//! use curator_logic::agent::{
//!     Agent, AgentState, ColliderId, LineOfSight, PlayerView, SensingConfig,
//! };
//! use curator_logic::geometry::Vec3;
//! use curator_logic::layout::{LevelLayout, Room};
//! use curator_logic::patrol::PatrolRoute;
//! use curator_logic::seed::rng_for;
//!
//! struct Clear;
//! impl LineOfSight for Clear {
//!     fn nearest_hit(&self, _: Vec3, _: Vec3) -> Option<ColliderId> {
//!         Some(ColliderId(1))
//!     }
//! }
//!
//! let level = LevelLayout::new(0, vec![Room::gallery(0, 0, 20, 20)]);
//! let mut agent = Agent::new(
//!     0,
//!     Vec3::new(5.0, 0.0, 10.0),
//!     None,
//!     PatrolRoute::empty(),
//!     SensingConfig::default(),
//! );
//! let player = PlayerView { position: Vec3::new(10.0, 0.0, 10.0), collider: ColliderId(1) };
//! agent.update(0.1, &player, &level, &Clear, &mut rng_for(0));
//! assert_eq!(agent.state(), AgentState::Chase);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;
use crate::layout::{LevelLayout, RoomId};
use crate::patrol::PatrolRoute;

/// Behaviour state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentState {
    Wander,
    Chase,
}

/// Identity of a collidable body, as reported by the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColliderId(pub u64);

/// Occlusion query supplied by the physics collaborator.
pub trait LineOfSight {
    /// Closest collider hit by a ray from `from` towards `to`.
    /// `None` when nothing is hit or the query is unavailable.
    fn nearest_hit(&self, from: Vec3, to: Vec3) -> Option<ColliderId>;
}

/// What an agent knows about the player this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Vec3,
    pub collider: ColliderId,
}

/// Tuning for sensing and locomotion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensingConfig {
    pub detection_range: f32,
    /// Half of the field-of-view cone, in degrees.
    pub half_fov_degrees: f32,
    pub wander_speed: f32,
    pub chase_speed: f32,
    /// Distance at which a wander target counts as reached.
    pub arrive_radius: f32,
    /// Inset from the room walls for random wander targets.
    pub room_margin: f32,
}

impl Default for SensingConfig {
    fn default() -> Self {
        Self {
            detection_range: 12.0,
            half_fov_degrees: 45.0,
            wander_speed: 1.2,
            chase_speed: 3.5,
            arrive_radius: 0.3,
            room_margin: 0.8,
        }
    }
}

impl SensingConfig {
    pub fn cos_half_fov(&self) -> f32 {
        self.half_fov_degrees.to_radians().cos()
    }
}

/// Horizontal part of a vector.
fn flat(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// A single guard. Owns its route and state; reads the level and the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: u32,
    state: AgentState,
    position: Vec3,
    /// Unit horizontal direction of the last movement.
    facing: Vec3,
    speed: f32,
    room: Option<RoomId>,
    route: PatrolRoute,
    target: Option<Vec3>,
    config: SensingConfig,
}

impl Agent {
    pub fn new(
        id: u32,
        position: Vec3,
        room: Option<RoomId>,
        route: PatrolRoute,
        config: SensingConfig,
    ) -> Self {
        Self {
            id,
            state: AgentState::Wander,
            position,
            facing: Vec3::new(1.0, 0.0, 0.0),
            speed: 0.0,
            room,
            route,
            target: None,
            config,
        }
    }

    /// Agent standing at the centre of `room`, at height `y`.
    pub fn spawn_in(
        id: u32,
        level: &LevelLayout,
        room: RoomId,
        y: f32,
        route: PatrolRoute,
        config: SensingConfig,
    ) -> Option<Self> {
        let r = level.room(room)?;
        Some(Self::new(id, r.center(y), Some(room), route, config))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Speed of the last tick's movement. Zero while idle.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    pub fn room(&self) -> Option<RoomId> {
        self.room
    }

    /// Whether the player is detectable from where the agent stands now.
    pub fn can_see(&self, player: &PlayerView, los: &impl LineOfSight) -> bool {
        let to_player = player.position - self.position;
        if to_player.length() > self.config.detection_range {
            return false;
        }
        // straight above or below: no horizontal bearing to test
        let horizontal = flat(to_player);
        if horizontal.length() > 1e-6
            && self.facing.dot(&horizontal.normalize()) < self.config.cos_half_fov()
        {
            return false;
        }
        los.nearest_hit(self.position, player.position) == Some(player.collider)
    }

    /// Advance one tick of `dt` seconds.
    pub fn update(
        &mut self,
        dt: f32,
        player: &PlayerView,
        level: &LevelLayout,
        los: &impl LineOfSight,
        rng: &mut impl Rng,
    ) {
        if self.state == AgentState::Wander && self.can_see(player, los) {
            log::debug!("agent {} spotted the player", self.id);
            self.state = AgentState::Chase;
            self.target = None;
        }

        let before = self.position;
        match self.state {
            AgentState::Wander => self.wander(dt, level, rng),
            AgentState::Chase => {
                let goal = Vec3::new(player.position.x, self.position.y, player.position.z);
                self.step_towards(goal, self.config.chase_speed, dt);
            }
        }

        let moved = flat(self.position - before);
        if moved.length() > 1e-6 {
            self.facing = moved.normalize();
            self.speed = moved.length() / dt;
        } else {
            self.speed = 0.0;
        }
        if let Some(room) = level.room_at(self.position) {
            self.room = Some(room);
        }
    }

    fn wander(&mut self, dt: f32, level: &LevelLayout, rng: &mut impl Rng) {
        if self.target.is_none() {
            self.target = self
                .route
                .next_waypoint()
                .or_else(|| self.random_point_in_room(level, rng));
        }
        let Some(target) = self.target else {
            return;
        };
        self.step_towards(target, self.config.wander_speed, dt);
        if self.position.distance(&target) <= self.config.arrive_radius {
            self.target = None;
        }
    }

    fn random_point_in_room(&self, level: &LevelLayout, rng: &mut impl Rng) -> Option<Vec3> {
        let room = level.room(self.room?)?;
        let bounds = room.world_rect().inset(self.config.room_margin);
        let x = bounds.x + rng.gen::<f32>() * bounds.w;
        let z = bounds.z + rng.gen::<f32>() * bounds.d;
        Some(Vec3::new(x, self.position.y, z))
    }

    /// Move up to `speed × dt` towards `goal` without overshooting.
    fn step_towards(&mut self, goal: Vec3, speed: f32, dt: f32) {
        let delta = goal - self.position;
        let dist = delta.length();
        let step = speed * dt;
        if dist <= step {
            self.position = goal;
        } else {
            self.position = self.position + delta * (step / dist);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Room;
    use crate::patrol::NavGraph;
    use crate::seed::rng_for;

    const PLAYER: ColliderId = ColliderId(7);
    const WALL: ColliderId = ColliderId(1);

    /// Line of sight that always reports the same answer.
    struct FixedHit(Option<ColliderId>);

    impl LineOfSight for FixedHit {
        fn nearest_hit(&self, _from: Vec3, _to: Vec3) -> Option<ColliderId> {
            self.0
        }
    }

    fn hall() -> LevelLayout {
        LevelLayout::new(0, vec![Room::gallery(0, 0, 30, 20)])
    }

    fn agent_at(x: f32, z: f32) -> Agent {
        Agent::new(
            0,
            Vec3::new(x, 0.0, z),
            Some(RoomId(0)),
            PatrolRoute::empty(),
            SensingConfig::default(),
        )
    }

    fn player_at(x: f32, z: f32) -> PlayerView {
        PlayerView {
            position: Vec3::new(x, 0.0, z),
            collider: PLAYER,
        }
    }

    #[test]
    fn test_starts_wandering_facing_east() {
        let agent = agent_at(5.0, 5.0);
        assert_eq!(agent.state(), AgentState::Wander);
        assert_eq!(agent.facing(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(agent.speed(), 0.0);
    }

    #[test]
    fn test_visible_player_triggers_chase_in_one_tick() {
        let mut agent = agent_at(5.0, 10.0);
        let mut rng = rng_for(1);
        agent.update(0.1, &player_at(12.0, 11.0), &hall(), &FixedHit(Some(PLAYER)), &mut rng);
        assert_eq!(agent.state(), AgentState::Chase);
    }

    #[test]
    fn test_player_behind_is_not_seen() {
        let agent = agent_at(15.0, 10.0);
        assert!(!agent.can_see(&player_at(10.0, 10.0), &FixedHit(Some(PLAYER))));
    }

    #[test]
    fn test_player_directly_overhead_is_seen() {
        let agent = agent_at(5.0, 10.0);
        let player = PlayerView {
            position: Vec3::new(5.0, 1.7, 10.0),
            collider: PLAYER,
        };
        assert!(agent.can_see(&player, &FixedHit(Some(PLAYER))));
        assert!(!agent.can_see(&player, &FixedHit(Some(WALL))));
    }

    #[test]
    fn test_fov_boundary() {
        let agent = agent_at(0.0, 0.0);
        let los = FixedHit(Some(PLAYER));
        // 40° off axis is inside a 45° half-angle, 50° is not
        let inside = 40f32.to_radians();
        let outside = 50f32.to_radians();
        assert!(agent.can_see(&player_at(5.0 * inside.cos(), 5.0 * inside.sin()), &los));
        assert!(!agent.can_see(&player_at(5.0 * outside.cos(), 5.0 * outside.sin()), &los));
    }

    #[test]
    fn test_out_of_range_is_not_seen() {
        let agent = agent_at(1.0, 10.0);
        let los = FixedHit(Some(PLAYER));
        assert!(agent.can_see(&player_at(12.9, 10.0), &los));
        assert!(!agent.can_see(&player_at(13.5, 10.0), &los));
    }

    #[test]
    fn test_occluded_or_failed_ray_is_not_seen() {
        let agent = agent_at(5.0, 10.0);
        let player = player_at(10.0, 10.0);
        assert!(!agent.can_see(&player, &FixedHit(Some(WALL))));
        assert!(!agent.can_see(&player, &FixedHit(None)));
    }

    #[test]
    fn test_chase_moves_at_chase_speed_and_never_stops() {
        let mut agent = agent_at(5.0, 10.0);
        let mut rng = rng_for(2);
        let level = hall();
        agent.update(1.0, &player_at(15.0, 10.0), &level, &FixedHit(Some(PLAYER)), &mut rng);
        assert_eq!(agent.state(), AgentState::Chase);
        assert!((agent.position().x - 8.5).abs() < 1e-4);
        assert!((agent.speed() - 3.5).abs() < 1e-4);

        // player slips behind a wall and out of range: still chasing
        let far = player_at(29.0, 19.0);
        agent.update(1.0, &far, &level, &FixedHit(Some(WALL)), &mut rng);
        assert_eq!(agent.state(), AgentState::Chase);
        assert!((agent.speed() - 3.5).abs() < 1e-3);
    }

    #[test]
    fn test_chase_stays_on_agent_height() {
        let mut agent = agent_at(5.0, 10.0);
        let mut rng = rng_for(3);
        let player = PlayerView {
            position: Vec3::new(8.0, 1.7, 10.0),
            collider: PLAYER,
        };
        agent.update(0.5, &player, &hall(), &FixedHit(Some(PLAYER)), &mut rng);
        assert_eq!(agent.position().y, 0.0);
    }

    #[test]
    fn test_wander_stays_inside_inset_room() {
        let level = LevelLayout::new(0, vec![Room::gallery(0, 0, 6, 6)]);
        let mut agent = Agent::spawn_in(
            0,
            &level,
            RoomId(0),
            0.0,
            PatrolRoute::empty(),
            SensingConfig::default(),
        )
        .unwrap();
        let mut rng = rng_for(4);
        // player far away and unseen
        let player = player_at(100.0, 100.0);
        for _ in 0..500 {
            agent.update(0.1, &player, &level, &FixedHit(None), &mut rng);
            let p = agent.position();
            assert!(p.x >= 0.8 - 1e-4 && p.x <= 5.2 + 1e-4, "x {}", p.x);
            assert!(p.z >= 0.8 - 1e-4 && p.z <= 5.2 + 1e-4, "z {}", p.z);
            assert_eq!(agent.state(), AgentState::Wander);
        }
        assert!(agent.speed() <= 1.2 + 1e-4);
    }

    #[test]
    fn test_wander_follows_patrol_route_first() {
        let mut level = LevelLayout::new(
            0,
            vec![Room::gallery(0, 0, 6, 6), Room::gallery(6, 0, 6, 6)],
        );
        level.connections.push(crate::layout::Connection {
            room_a: RoomId(0),
            room_b: RoomId(1),
            direction: crate::geometry::Direction::East,
            kind: crate::layout::ConnectionKind::Door,
        });
        let graph = NavGraph::build(&level, 0.0);
        let mut rng = rng_for(5);
        let route = graph.random_route(RoomId(0), &mut rng);
        assert_eq!(route.remaining(), 3);
        let mut agent = Agent::spawn_in(0, &level, RoomId(0), 0.0, route, SensingConfig::default())
            .unwrap();

        let player = player_at(100.0, 100.0);
        for _ in 0..200 {
            agent.update(0.1, &player, &level, &FixedHit(None), &mut rng);
        }
        assert!(agent.route().is_finished());
        assert_eq!(agent.room(), Some(RoomId(1)));
    }

    #[test]
    fn test_facing_unchanged_without_room_or_route() {
        let mut agent = Agent::new(
            0,
            Vec3::new(50.0, 0.0, 50.0),
            None,
            PatrolRoute::empty(),
            SensingConfig::default(),
        );
        let mut rng = rng_for(6);
        agent.update(0.1, &player_at(0.0, 0.0), &hall(), &FixedHit(None), &mut rng);
        assert_eq!(agent.position(), Vec3::new(50.0, 0.0, 50.0));
        assert_eq!(agent.facing(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(agent.speed(), 0.0);
        assert_eq!(agent.room(), None);
    }
}
