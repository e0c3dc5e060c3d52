//! World state and session wiring
//!
//! The [`World`] owns every piece of mutable game state. Each scheduled task is one
//! `World` method that runs to completion; the [`Session`] owns the scheduler, registers
//! the task table and feeds player commands in between callbacks.

use std::time::Duration;

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use super::aabb::Aabb;
use super::collision;
use super::difficulty::{DifficultyConfig, HazardSpeed, escalate};
use super::events::GameEvent;
use super::registry::Registry;
use super::scheduler::{Cancellations, Scheduler, Settle, TaskHandle};
use super::scoreboard::{GamePhase, HitOutcome, Scoreboard};
use super::spawn::SpawnController;
use super::state::{Body, Cloud, Entity, EntityId, EntityKind, Facing, Heading, Player};
use crate::consts::*;
use crate::error::Result;
use crate::settings::{Settings, Timings};

/// Discrete input from the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Key pressed: step once in that direction
    Move(Heading),
    /// Key released
    Stop(Heading),
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Applied in order before time advances
    pub commands: Vec<PlayerCommand>,
    /// Idle/demo mode - the autopilot dodges for the player
    pub idle_mode: bool,
}

/// Every periodic task a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    HazardFall,
    Collision,
    Spawn,
    Score,
    HazardEscalation,
    CloudEscalation,
    CloudMove,
    Animation,
}

impl TaskKind {
    pub const ALL: [TaskKind; 8] = [
        TaskKind::HazardFall,
        TaskKind::Collision,
        TaskKind::Spawn,
        TaskKind::Score,
        TaskKind::HazardEscalation,
        TaskKind::CloudEscalation,
        TaskKind::CloudMove,
        TaskKind::Animation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TaskKind::HazardFall => "hazard_fall",
            TaskKind::Collision => "collision",
            TaskKind::Spawn => "spawn",
            TaskKind::Score => "score",
            TaskKind::HazardEscalation => "hazard_escalation",
            TaskKind::CloudEscalation => "cloud_escalation",
            TaskKind::CloudMove => "cloud_move",
            TaskKind::Animation => "animation",
        }
    }

    pub fn period(self, timings: &Timings) -> Duration {
        let ms = match self {
            TaskKind::HazardFall => timings.hazard_fall_ms,
            TaskKind::Collision => timings.collision_ms,
            TaskKind::Spawn => timings.spawn_ms,
            TaskKind::Score => timings.score_ms,
            TaskKind::HazardEscalation => timings.hazard_escalation_ms,
            TaskKind::CloudEscalation => timings.cloud_escalation_ms,
            TaskKind::CloudMove => timings.cloud_move_ms,
            TaskKind::Animation => timings.animation_ms,
        };
        Duration::from_millis(ms)
    }

    /// Falling hazards and the cloud keep moving after game over so the scene drains
    pub fn stops_on_game_over(self) -> bool {
        !matches!(
            self,
            TaskKind::HazardFall | TaskKind::Collision | TaskKind::CloudMove
        )
    }

    fn run(self, world: &mut World, cancel: &mut Cancellations) {
        match self {
            TaskKind::HazardFall => world.fall_hazards(),
            TaskKind::Collision => {
                if world.collide_hazards() {
                    for handle in world.handles_stopped_on_game_over() {
                        cancel.cancel(handle);
                    }
                }
            }
            TaskKind::Spawn => world.try_spawn(),
            TaskKind::Score => world.accrue_score(),
            TaskKind::HazardEscalation => world.escalate_hazard_speed(),
            TaskKind::CloudEscalation => world.escalate_cloud_speed(),
            TaskKind::CloudMove => world.move_cloud(),
            TaskKind::Animation => world.animate_player(),
        }
    }
}

/// All mutable game state shared by the scheduled tasks
#[derive(Debug)]
pub struct World {
    registry: Registry,
    scoreboard: Scoreboard,
    difficulty: DifficultyConfig,
    hazard_speed: HazardSpeed,
    spawner: SpawnController,
    player: EntityId,
    cloud: EntityId,
    tasks: Vec<(TaskKind, TaskHandle)>,
    events: Vec<GameEvent>,
}

impl World {
    /// Spawn the player and the cloud; the cloud's start comes from `rng`
    pub fn new(difficulty: DifficultyConfig, mut rng: Box<dyn RngCore>) -> Self {
        let mut registry = Registry::new();
        let mut events = Vec::new();

        let player_pos = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
        let player = registry.spawn(
            Body::Player(Player::default()),
            player_pos,
            Vec2::splat(PLAYER_SIZE),
        );
        events.push(GameEvent::EntitySpawned {
            id: player,
            kind: EntityKind::Player,
            pos: player_pos,
        });

        let (cloud_state, cloud_pos) = Cloud::random_start(&mut rng);
        let cloud = registry.spawn(
            Body::Cloud(cloud_state),
            cloud_pos,
            Vec2::new(CLOUD_WIDTH, CLOUD_HEIGHT),
        );
        events.push(GameEvent::EntitySpawned {
            id: cloud,
            kind: EntityKind::Cloud,
            pos: cloud_pos,
        });

        Self {
            registry,
            scoreboard: Scoreboard::new(),
            difficulty,
            hazard_speed: HazardSpeed::new(&difficulty),
            spawner: SpawnController::new(rng),
            player,
            cloud,
            tasks: Vec::new(),
            events,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn difficulty(&self) -> &DifficultyConfig {
        &self.difficulty
    }

    /// Speed given to hazards spawned now
    pub fn hazard_speed(&self) -> f32 {
        self.hazard_speed.current()
    }

    pub fn player(&self) -> Option<&Entity> {
        self.registry.get(self.player)
    }

    pub fn player_state(&self) -> Option<&Player> {
        self.player().and_then(Entity::as_player)
    }

    pub fn cloud(&self) -> Option<&Entity> {
        self.registry.get(self.cloud)
    }

    pub fn cloud_state(&self) -> Option<&Cloud> {
        self.cloud().and_then(Entity::as_cloud)
    }

    pub fn hazards(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.registry.iter_alive(Some(EntityKind::Hazard))
    }

    fn handles_stopped_on_game_over(&self) -> Vec<TaskHandle> {
        self.tasks
            .iter()
            .filter(|(kind, _)| kind.stops_on_game_over())
            .map(|(_, handle)| *handle)
            .collect()
    }

    fn player_mut(&mut self) -> Option<(&mut Vec2, &mut Player)> {
        let entity = self.registry.get_mut(self.player)?;
        match &mut entity.body {
            Body::Player(player) => Some((&mut entity.pos, player)),
            _ => None,
        }
    }

    /// Step the player one unit; rejected at the play-area edge or after death
    pub fn move_player(&mut self, heading: Heading) -> bool {
        let Some((pos, player)) = self.player_mut() else {
            return false;
        };
        if !player.enabled {
            return false;
        }
        match Player::step_target(pos.x, heading) {
            Some(x) => {
                pos.x = x;
                player.facing = Facing::moving(heading);
                true
            }
            None => false,
        }
    }

    pub fn stop_player(&mut self, heading: Heading) -> bool {
        match self.player_mut() {
            Some((_, player)) if player.enabled => player.stop(heading),
            _ => false,
        }
    }

    pub fn apply(&mut self, command: PlayerCommand) -> bool {
        match command {
            PlayerCommand::Move(heading) => self.move_player(heading),
            PlayerCommand::Stop(heading) => self.stop_player(heading),
        }
    }

    /// Move every hazard down by its own speed; hazards past the floor leave
    pub fn fall_hazards(&mut self) {
        for id in self.registry.alive_ids(EntityKind::Hazard) {
            let Some(entity) = self.registry.get_mut(id) else {
                continue;
            };
            let Body::Hazard(hazard) = &entity.body else {
                continue;
            };
            if entity.pos.y < FLOOR_Y {
                entity.pos.y += hazard.fall_speed;
            } else {
                log::trace!("hazard {} left the scene", id);
                self.registry.mark_removed(id);
            }
        }
    }

    /// One collision pass. Returns `true` if this pass ended the game.
    pub fn collide_hazards(&mut self) -> bool {
        let mut died = false;
        for hit in collision::detect(&self.registry) {
            if let Some(Body::Hazard(hazard)) =
                self.registry.get_mut(hit.hazard).map(|e| &mut e.body)
            {
                hazard.collided = true;
            }
            self.registry.mark_removed(hit.hazard);

            if hit.costs_life() && self.scoreboard.on_hit(&mut self.events) == HitOutcome::Died {
                self.on_death();
                died = true;
            }
        }
        died
    }

    fn on_death(&mut self) {
        if let Some((_, player)) = self.player_mut() {
            player.enabled = false;
            player.frame_index = 0;
        }
        log::info!("Player died");
    }

    /// One spawn attempt under the cloud
    pub fn try_spawn(&mut self) {
        if !self.scoreboard.is_playing() {
            return;
        }
        let Some(cloud) = self.registry.get(self.cloud).map(Entity::bounds) else {
            return;
        };
        let speed = self.hazard_speed.current();
        if let Some(id) = self.spawner.attempt(&mut self.registry, &cloud, speed) {
            if let Some(pos) = self.registry.get(id).map(|e| e.pos) {
                log::debug!("spawned hazard {} at x={} speed={}", id, pos.x, speed);
                self.events.push(GameEvent::EntitySpawned {
                    id,
                    kind: EntityKind::Hazard,
                    pos,
                });
            }
        }
    }

    pub fn accrue_score(&mut self) {
        self.scoreboard.on_tick(&mut self.events);
    }

    pub fn escalate_hazard_speed(&mut self) {
        if !self.scoreboard.is_playing() {
            return;
        }
        if let Some(speed) = self.hazard_speed.escalate() {
            log::debug!("hazard speed -> {}", speed);
            self.events.push(GameEvent::HazardSpeedChanged { speed });
        }
    }

    pub fn escalate_cloud_speed(&mut self) {
        if !self.scoreboard.is_playing() {
            return;
        }
        let max = self.difficulty.max_cloud_speed;
        let Some(Body::Cloud(cloud)) = self.registry.get_mut(self.cloud).map(|e| &mut e.body)
        else {
            return;
        };
        if let Some(speed) = escalate(cloud.speed, max) {
            cloud.speed = speed;
            log::debug!("cloud speed -> {}", speed);
            self.events.push(GameEvent::CloudSpeedChanged { speed });
        }
    }

    pub fn move_cloud(&mut self) {
        let Some(entity) = self.registry.get_mut(self.cloud) else {
            return;
        };
        if let Body::Cloud(cloud) = &mut entity.body {
            entity.pos.x += cloud.bounce_and_step(entity.pos.x);
        }
    }

    pub fn animate_player(&mut self) {
        if let Some((_, player)) = self.player_mut() {
            if player.enabled {
                player.advance_frame();
            }
        }
    }

    /// Take buffered events in emission order
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Settle for World {
    fn settle(&mut self) {
        for id in self.registry.purge_removed() {
            self.events.push(GameEvent::EntityRemoved { id });
        }
    }
}

/// Closest hazard bearing down on the player, and the step that avoids it
pub fn autopilot(world: &World) -> Option<PlayerCommand> {
    let player = world.player()?;
    if !world.player_state()?.enabled {
        return None;
    }
    let body = player.bounds();
    // Look a little wider than the sprite so the dodge starts early
    let lane = Aabb::new(
        body.min - Vec2::new(HAZARD_SIZE, 0.0),
        body.size + Vec2::new(HAZARD_SIZE * 2.0, 0.0),
    );

    let threat = world
        .hazards()
        .filter(|h| h.bounds().spans_x(&lane) && h.bounds().max().y <= body.max().y)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

    let preferred = if threat.bounds().center().x < body.center().x {
        Heading::Right
    } else {
        Heading::Left
    };
    let other = match preferred {
        Heading::Left => Heading::Right,
        Heading::Right => Heading::Left,
    };
    let heading = if Player::step_target(player.pos.x, preferred).is_some() {
        preferred
    } else {
        other
    };
    Some(PlayerCommand::Move(heading))
}

/// One game from first tick to game over
pub struct Session {
    world: World,
    scheduler: Scheduler<World>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("now", &self.scheduler.now())
            .field("phase", &self.world.scoreboard.phase())
            .field("score", &self.world.scoreboard.score())
            .field("lives", &self.world.scoreboard.lives())
            .finish()
    }
}

impl Session {
    /// Start a session from settings, seeding a PCG stream
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let seed = settings.resolve_seed();
        log::info!("Starting {} session (seed {})", settings.difficulty, seed);
        Self::with_rng(
            settings.difficulty.config(),
            &settings.timings,
            Box::new(Pcg32::seed_from_u64(seed)),
        )
    }

    /// Start a session with an injected random source
    pub fn with_rng(
        difficulty: DifficultyConfig,
        timings: &Timings,
        rng: Box<dyn RngCore>,
    ) -> Result<Self> {
        let mut world = World::new(difficulty, rng);
        let mut scheduler = Scheduler::new();
        for kind in TaskKind::ALL {
            let handle = scheduler.register_periodic(
                kind.name(),
                kind.period(timings),
                move |world: &mut World, cancel: &mut Cancellations| kind.run(world, cancel),
            )?;
            world.tasks.push((kind, handle));
        }
        Ok(Self { world, scheduler })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Simulated time since the session started
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn phase(&self) -> GamePhase {
        self.world.scoreboard.phase()
    }

    pub fn is_over(&self) -> bool {
        self.phase() == GamePhase::GameOver
    }

    /// Whether a task is still scheduled
    pub fn is_running(&self, kind: TaskKind) -> bool {
        self.world
            .tasks
            .iter()
            .any(|(k, handle)| *k == kind && self.scheduler.is_active(*handle))
    }

    /// Apply a player command between callbacks
    pub fn handle(&mut self, command: PlayerCommand) -> bool {
        self.world.apply(command)
    }

    /// Advance simulated time, running every task that falls due
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.scheduler.advance(elapsed, &mut self.world)
    }

    /// Apply one frame of input, then advance
    pub fn tick(&mut self, input: &TickInput, elapsed: Duration) {
        for command in &input.commands {
            self.handle(*command);
        }
        if input.idle_mode {
            if let Some(command) = autopilot(&self.world) {
                self.handle(command);
            }
        }
        self.advance(elapsed);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::spawn::spawn_at;
    use crate::sim::state::Hazard;

    fn session(difficulty: Difficulty, seed: u64) -> Session {
        Session::new(&Settings::from_difficulty(difficulty).with_seed(seed)).unwrap()
    }

    /// Session whose spawn task never fires within a test
    fn quiet_session(seed: u64) -> Session {
        let timings = Timings {
            spawn_ms: 100_000_000,
            ..Timings::default()
        };
        Session::with_rng(
            Difficulty::Easy.config(),
            &timings,
            Box::new(Pcg32::seed_from_u64(seed)),
        )
        .unwrap()
    }

    fn place_hazard(world: &mut World, x: f32, y: f32) -> EntityId {
        world.registry.spawn(
            Body::Hazard(Hazard::new(2.0)),
            Vec2::new(x, y),
            Vec2::splat(HAZARD_SIZE),
        )
    }

    #[test]
    fn test_new_session_layout() {
        let mut s = session(Difficulty::Easy, 1);
        let world = s.world();
        assert_eq!(world.player().unwrap().pos, Vec2::new(450.0, 450.0));
        assert_eq!(world.cloud().unwrap().pos.y, CLOUD_Y);
        assert_eq!(world.hazard_speed(), 2.0);
        assert_eq!(world.scoreboard().lives(), 3);
        assert_eq!(s.phase(), GamePhase::Playing);
        for kind in TaskKind::ALL {
            assert!(s.is_running(kind), "{} should be scheduled", kind.name());
        }

        let events = s.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            GameEvent::EntitySpawned {
                kind: EntityKind::Player,
                ..
            }
        ));
    }

    #[test]
    fn test_move_player_left_until_edge() {
        let mut s = session(Difficulty::Easy, 1);
        let mut xs = Vec::new();
        for _ in 0..40 {
            s.handle(PlayerCommand::Move(Heading::Left));
            xs.push(s.world().player().unwrap().pos.x);
        }
        // 450 -> -10 in 23 steps, then every further step is rejected
        assert_eq!(xs[0], 430.0);
        assert_eq!(xs[22], -10.0);
        assert!(xs[23..].iter().all(|&x| x == -10.0));
        assert_eq!(
            s.world().player_state().unwrap().facing,
            Facing::MovingLeft
        );

        assert!(s.handle(PlayerCommand::Stop(Heading::Left)));
        assert_eq!(s.world().player_state().unwrap().facing, Facing::IdleLeft);
    }

    #[test]
    fn test_score_ticks_once_per_second() {
        let mut s = quiet_session(2);
        s.advance(Duration::from_millis(999));
        assert_eq!(s.world().scoreboard().score(), 0);
        s.advance(Duration::from_millis(1));
        assert_eq!(s.world().scoreboard().score(), 1);
        s.advance(Duration::from_secs(4));
        assert_eq!(s.world().scoreboard().score(), 5);
    }

    #[test]
    fn test_hazard_speed_escalation_schedule() {
        let mut s = quiet_session(3);
        let mut speeds = vec![s.world().hazard_speed()];
        for _ in 0..6 {
            s.advance(Duration::from_secs(10));
            speeds.push(s.world().hazard_speed());
        }
        assert_eq!(
            speeds,
            vec![2.0, 2.5, 3.125, 3.90625, 4.8828125, 6.103515625, 6.103515625]
        );
    }

    #[test]
    fn test_hazard_hit_costs_life_and_removes() {
        let mut s = session(Difficulty::Easy, 4);
        s.drain_events();
        let id = place_hazard(&mut s.world, 460.0, 430.0);

        assert!(!s.world.collide_hazards());
        assert!(s.world.registry().get(id).is_none());
        assert_eq!(s.world().scoreboard().lives(), 2);
        s.world.settle();

        let events = s.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::PlayerHit,
                GameEvent::LivesChanged { lives: 2 },
                GameEvent::EntityRemoved { id },
            ]
        );
        assert!(!s.world.registry().contains(id));
    }

    #[test]
    fn test_hazards_fall_then_leave() {
        let mut s = session(Difficulty::Easy, 5);
        let id = place_hazard(&mut s.world, 10.0, 496.0);
        s.world.fall_hazards();
        assert_eq!(s.world.registry().get(id).unwrap().pos.y, 498.0);
        s.world.fall_hazards();
        assert_eq!(s.world.registry().get(id).unwrap().pos.y, 500.0);
        s.world.fall_hazards();
        assert!(s.world.registry().get(id).is_none());
    }

    #[test]
    fn test_fall_speed_fixed_at_spawn() {
        let mut s = session(Difficulty::Easy, 6);
        let cloud_x = s.world().cloud().unwrap().pos.x;
        let cloud = s.world().cloud().unwrap().bounds();
        let speed = s.world.hazard_speed();
        let early = spawn_at(&mut s.world.registry, &cloud, cloud_x + 10.0, speed).unwrap();
        s.world.escalate_hazard_speed();
        assert_eq!(s.world().hazard_speed(), 2.5);
        assert_eq!(
            s.world.registry().get(early).unwrap().as_hazard().unwrap().fall_speed,
            2.0
        );
    }

    #[test]
    fn test_game_over_cancels_tasks_and_disables_player() {
        let mut s = quiet_session(7);
        for _ in 0..3 {
            place_hazard(&mut s.world, 460.0, 430.0);
            s.advance(Duration::from_millis(15));
        }
        assert!(s.is_over());
        assert_eq!(s.world().scoreboard().lives(), 0);
        for kind in TaskKind::ALL {
            assert_eq!(s.is_running(kind), !kind.stops_on_game_over());
        }

        let x = s.world().player().unwrap().pos.x;
        assert!(!s.handle(PlayerCommand::Move(Heading::Left)));
        assert_eq!(s.world().player().unwrap().pos.x, x);

        let score = s.world().scoreboard().score();
        s.advance(Duration::from_secs(30));
        assert_eq!(s.world().scoreboard().score(), score);
        assert_eq!(s.world().hazards().count(), 0);
    }

    #[test]
    fn test_cloud_stays_near_bounds() {
        let mut s = quiet_session(8);
        for _ in 0..3000 {
            s.advance(Duration::from_millis(20));
            let x = s.world().cloud().unwrap().pos.x;
            assert!((-10.0..=660.0).contains(&x), "cloud drifted to {}", x);
        }
        assert_eq!(s.world().cloud_state().unwrap().speed, 2.44140625);
    }

    #[test]
    fn test_autopilot_steps_away() {
        let mut s = session(Difficulty::Easy, 9);
        // Hazard slightly left of the player's center -> step right
        place_hazard(&mut s.world, 455.0, 300.0);
        assert_eq!(
            autopilot(s.world()),
            Some(PlayerCommand::Move(Heading::Right))
        );
    }
}
