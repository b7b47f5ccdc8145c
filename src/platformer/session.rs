//! The platformer run: one live level plus score, lives and the run state
//! machine.
//!
//! ```text
//! Playing ──all carrots──▶ FadeOut ──black──▶ next level ──▶ FadeIn ──▶ Playing
//! Playing ──owl / fall──▶ Dead ──retry──▶ Playing
//! Playing ──last level cleared──▶ Won ──retry──▶ level 1
//! ```

use bevy::prelude::*;
use rand::Rng;

use super::camera::FollowCamera;
use super::levels::{Level, LevelCatalog};
use super::particles::{spawn_burst, update_particles, Particle, BURST_SIZE};
use super::physics::{step_player, MoveIntent, Player, PLAYER_SPAWN};
use super::retry::RetryButton;
use crate::shared::{PlatformerInput, SCREEN_HEIGHT};

pub const SCORE_PER_CARROT: u32 = 10;
pub const STARTING_LIVES: u32 = 3;
/// Falling this far below the screen bottom ends the attempt.
pub const FALL_LIMIT: f32 = SCREEN_HEIGHT + 120.0;
/// Alpha change per frame for the between-level fade.
pub const FADE_STEP: f32 = 0.06;
/// Frames the score counter stays enlarged after a pickup (~220 ms).
pub const SCORE_POP_FRAMES: u32 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Playing,
    Dead,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadePhase {
    #[default]
    None,
    /// Darkening; the next level loads when fully black.
    FadeOut,
    /// Revealing the freshly loaded level.
    FadeIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LevelFade {
    pub phase: FadePhase,
    pub alpha: f32,
}

/// Something the outer layers (logging, sprites) care about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformerEvent {
    LevelLoaded(usize),
    Collected { x: f32, y: f32 },
    Respawned,
    Died,
    Won,
}

#[derive(Resource, Debug, Clone)]
pub struct PlatformerWorld {
    pub catalog: LevelCatalog,
    /// 1-based index of the live level.
    pub current_level: usize,
    pub level: Level,
    pub player: Player,
    pub score: u32,
    /// Score when the live level began; retries roll back to it.
    pub level_start_score: u32,
    pub lives: u32,
    /// Set by the first jump of an attempt. Owls and falls only kill once set.
    pub started: bool,
    /// One-shot guard so a cleared level advances exactly once.
    pub advancing: bool,
    pub phase: RunPhase,
    pub fade: LevelFade,
    pub camera: FollowCamera,
    pub particles: Vec<Particle>,
    pub score_pop: u32,
    pub retry_button: RetryButton,
    jump_latched: bool,
}

impl PlatformerWorld {
    pub fn new(catalog: LevelCatalog) -> Self {
        let mut world = Self {
            catalog,
            current_level: 1,
            level: Level::default(),
            player: Player::default(),
            score: 0,
            level_start_score: 0,
            lives: STARTING_LIVES,
            started: false,
            advancing: false,
            phase: RunPhase::Playing,
            fade: LevelFade::default(),
            camera: FollowCamera::default(),
            particles: Vec::new(),
            score_pop: 0,
            retry_button: RetryButton::default(),
            jump_latched: false,
        };
        world.load_level(1);
        world
    }

    pub fn level_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn jump_latched(&self) -> bool {
        self.jump_latched
    }

    /// Build a fresh live copy of `level` and reset everything tied to an
    /// attempt. Score and lives carry over. Out-of-range indices are ignored.
    pub fn load_level(&mut self, level: usize) -> bool {
        let Some(template) = self.catalog.get(level) else {
            warn!("[Platformer] No level {} in a table of {}", level, self.catalog.len());
            return false;
        };
        self.level = Level::from_template(template);
        self.current_level = level;
        self.player = Player::at_spawn(PLAYER_SPAWN);
        self.started = false;
        self.advancing = false;
        self.phase = RunPhase::Playing;
        self.particles.clear();
        self.camera = FollowCamera::default();
        self.level_start_score = self.score;
        self.jump_latched = false;
        info!("[Platformer] Loaded level {}/{}", level, self.catalog.len());
        true
    }

    /// Restart after a death or a win. A win, or running out of lives,
    /// starts a fresh run from level 1.
    pub fn retry(&mut self) -> usize {
        let fresh_run = self.phase == RunPhase::Won || self.lives == 0;
        self.fade = LevelFade::default();
        self.retry_button = RetryButton::default();
        if fresh_run {
            self.score = 0;
            self.lives = STARTING_LIVES;
            self.load_level(1);
        } else {
            self.score = self.level_start_score;
            self.load_level(self.current_level);
        }
        self.current_level
    }

    /// Frame-rate independent input handling: jump latch, retry key and the
    /// retry button. Call once per rendered frame before stepping.
    pub fn apply_input(&mut self, input: &PlatformerInput) -> Vec<PlatformerEvent> {
        let mut events = Vec::new();
        if input.jump_released {
            self.jump_latched = false;
        }
        if input.jump_pressed {
            self.jump_latched = true;
        }

        let overlay_visible = self.phase != RunPhase::Playing;
        let mut fire = overlay_visible && input.retry;
        if let Some(signal) = input.pointer {
            fire |= self.retry_button.handle(signal, overlay_visible);
        }
        if fire {
            let level = self.retry();
            events.push(PlatformerEvent::LevelLoaded(level));
        }
        events
    }

    /// Advance the run by one 60 Hz frame.
    pub fn step(&mut self, held: &PlatformerInput, rng: &mut impl Rng) -> Vec<PlatformerEvent> {
        let mut events = Vec::new();
        self.score_pop = self.score_pop.saturating_sub(1);
        if self.phase != RunPhase::Playing {
            return events;
        }

        if self.jump_latched {
            self.started = true;
        }
        let intent = MoveIntent {
            left: held.left,
            right: held.right,
            up: held.up,
            down: held.down,
            jump: self.jump_latched,
        };
        if step_player(&mut self.player, &intent, &self.level) {
            self.jump_latched = false;
        }

        self.collect_carrots(rng, &mut events);

        if self.level.all_collected() && !self.advancing {
            self.advancing = true;
            self.begin_advance(&mut events);
        }

        // Every owl patrols each frame; the first hit decides the outcome.
        let player_box = self.player.bounds();
        let mut hit = false;
        for enemy in &mut self.level.enemies {
            enemy.patrol();
            hit |= player_box.intersects(&enemy.hit_box());
        }
        if hit && self.started && self.phase == RunPhase::Playing {
            self.die(&mut events);
        }

        if self.player.y > FALL_LIMIT && self.phase == RunPhase::Playing {
            if self.started {
                self.die(&mut events);
            } else {
                self.player.respawn();
                events.push(PlatformerEvent::Respawned);
            }
        }

        self.camera.follow(self.player.center());
        update_particles(&mut self.particles);
        self.step_fade(&mut events);
        self.player.animate();
        events
    }

    fn collect_carrots(&mut self, rng: &mut impl Rng, events: &mut Vec<PlatformerEvent>) {
        let player_box = self.player.bounds();
        for carrot in self.level.collectibles.iter_mut().filter(|c| !c.collected) {
            if player_box.intersects(&carrot.bounds()) {
                carrot.collected = true;
                self.score += SCORE_PER_CARROT;
                self.score_pop = SCORE_POP_FRAMES;
                spawn_burst(&mut self.particles, carrot.x, carrot.y, BURST_SIZE, rng);
                events.push(PlatformerEvent::Collected {
                    x: carrot.x,
                    y: carrot.y,
                });
            }
        }
    }

    fn begin_advance(&mut self, events: &mut Vec<PlatformerEvent>) {
        if self.current_level < self.catalog.len() {
            self.fade = LevelFade {
                phase: FadePhase::FadeOut,
                alpha: 0.0,
            };
        } else {
            self.phase = RunPhase::Won;
            info!("[Platformer] All {} levels cleared with {} points", self.catalog.len(), self.score);
            events.push(PlatformerEvent::Won);
        }
    }

    fn die(&mut self, events: &mut Vec<PlatformerEvent>) {
        self.phase = RunPhase::Dead;
        self.lives = self.lives.saturating_sub(1);
        self.fade = LevelFade::default();
        info!("[Platformer] Died on level {} ({} lives left)", self.current_level, self.lives);
        events.push(PlatformerEvent::Died);
    }

    fn step_fade(&mut self, events: &mut Vec<PlatformerEvent>) {
        match self.fade.phase {
            FadePhase::None => {}
            FadePhase::FadeOut => {
                self.fade.alpha += FADE_STEP;
                if self.fade.alpha >= 1.0 {
                    self.fade.alpha = 1.0;
                    let next = self.current_level + 1;
                    if self.load_level(next) {
                        events.push(PlatformerEvent::LevelLoaded(next));
                    }
                    self.fade.phase = FadePhase::FadeIn;
                }
            }
            FadePhase::FadeIn => {
                self.fade.alpha -= FADE_STEP;
                if self.fade.alpha <= 0.0 {
                    self.fade = LevelFade::default();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> PlatformerWorld {
        PlatformerWorld::new(LevelCatalog::builtin().unwrap())
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn idle() -> PlatformerInput {
        PlatformerInput::default()
    }

    fn settle(world: &mut PlatformerWorld, rng: &mut StdRng) {
        for _ in 0..60 {
            world.step(&idle(), rng);
        }
    }

    fn press_jump(world: &mut PlatformerWorld) {
        world.apply_input(&PlatformerInput {
            jump_pressed: true,
            ..Default::default()
        });
    }

    #[test]
    fn test_new_world_starts_at_level_one_spawn() {
        let world = world();
        assert_eq!(world.current_level, 1);
        assert_eq!(world.player.x, 80.0);
        assert_eq!(world.player.y, 380.0);
        assert_eq!(world.lives, STARTING_LIVES);
        assert_eq!(world.phase, RunPhase::Playing);
    }

    #[test]
    fn test_airborne_jump_stays_latched_until_landing() {
        let mut world = world();
        let mut rng = rng();
        press_jump(&mut world);
        world.step(&idle(), &mut rng);
        assert!(world.player.vy > 0.0, "no jump while airborne");
        assert!(world.jump_latched());
        assert!(world.started);
    }

    #[test]
    fn test_release_clears_jump_latch() {
        let mut world = world();
        press_jump(&mut world);
        world.apply_input(&PlatformerInput {
            jump_released: true,
            ..Default::default()
        });
        assert!(!world.jump_latched());
    }

    #[test]
    fn test_collectible_scores_once() {
        let mut world = world();
        let mut rng = rng();
        let carrot = world.level.collectibles[0];
        world.player.x = carrot.x - 20.0;
        world.player.y = carrot.y - 28.0;
        world.step(&idle(), &mut rng);
        assert!(world.level.collectibles[0].collected);
        assert_eq!(world.score, SCORE_PER_CARROT);
        assert_eq!(world.particles.len(), BURST_SIZE);

        world.player.x = carrot.x - 20.0;
        world.player.y = carrot.y - 28.0;
        world.step(&idle(), &mut rng);
        assert_eq!(world.score, SCORE_PER_CARROT);
    }

    #[test]
    fn test_clearing_level_advances_exactly_once() {
        let mut world = world();
        let mut rng = rng();
        for carrot in &mut world.level.collectibles {
            carrot.collected = true;
        }
        let mut loads = 0;
        for _ in 0..120 {
            for event in world.step(&idle(), &mut rng) {
                if let PlatformerEvent::LevelLoaded(n) = event {
                    assert_eq!(n, 2);
                    loads += 1;
                }
            }
        }
        assert_eq!(loads, 1);
        assert_eq!(world.current_level, 2);
        assert_eq!(world.fade.phase, FadePhase::None);
        assert!(!world.advancing);
    }

    #[test]
    fn test_level_load_resets_attempt_but_not_template() {
        let mut world = world();
        world.level.collectibles[0].collected = true;
        world.player.x = 500.0;
        world.started = true;
        world.load_level(1);
        assert!(!world.level.collectibles[0].collected);
        assert_eq!(world.player.x, 80.0);
        assert_eq!(world.player.y, 380.0);
        assert!(!world.started);
    }

    #[test]
    fn test_owl_harmless_before_start() {
        let mut world = world();
        let mut rng = rng();
        world.load_level(3);
        let owl = world.level.enemies[0];
        world.player.x = owl.x - 20.0;
        world.player.y = owl.y - 28.0;
        world.step(&idle(), &mut rng);
        assert_eq!(world.phase, RunPhase::Playing);
    }

    #[test]
    fn test_owl_kills_after_start() {
        let mut world = world();
        let mut rng = rng();
        world.load_level(3);
        world.started = true;
        let owl = world.level.enemies[0];
        world.player.x = owl.x - 20.0;
        world.player.y = owl.y - 28.0;
        let events = world.step(&idle(), &mut rng);
        assert!(events.contains(&PlatformerEvent::Died));
        assert_eq!(world.phase, RunPhase::Dead);
        assert_eq!(world.lives, STARTING_LIVES - 1);
    }

    #[test]
    fn test_fall_respawns_before_start_and_kills_after() {
        let mut world = world();
        let mut rng = rng();
        world.player.y = FALL_LIMIT + 10.0;
        let events = world.step(&idle(), &mut rng);
        assert!(events.contains(&PlatformerEvent::Respawned));
        assert_eq!(world.player.y, 380.0);

        world.started = true;
        world.player.y = FALL_LIMIT + 10.0;
        world.step(&idle(), &mut rng);
        assert_eq!(world.phase, RunPhase::Dead);
    }

    #[test]
    fn test_retry_reloads_level_and_rolls_back_score() {
        let mut world = world();
        let mut rng = rng();
        world.load_level(2);
        world.score = 50;
        world.level_start_score = 30;
        world.started = true;
        world.player.y = FALL_LIMIT + 10.0;
        world.step(&idle(), &mut rng);
        assert_eq!(world.phase, RunPhase::Dead);

        let events = world.apply_input(&PlatformerInput {
            retry: true,
            ..Default::default()
        });
        assert_eq!(events, vec![PlatformerEvent::LevelLoaded(2)]);
        assert_eq!(world.phase, RunPhase::Playing);
        assert_eq!(world.score, 30);
        assert_eq!(world.lives, STARTING_LIVES - 1);
    }

    #[test]
    fn test_retry_key_ignored_while_playing() {
        let mut world = world();
        let events = world.apply_input(&PlatformerInput {
            retry: true,
            ..Default::default()
        });
        assert!(events.is_empty());
    }

    #[test]
    fn test_final_level_clear_wins() {
        let mut world = world();
        let mut rng = rng();
        world.load_level(5);
        for carrot in &mut world.level.collectibles {
            carrot.collected = true;
        }
        let events = world.step(&idle(), &mut rng);
        assert!(events.contains(&PlatformerEvent::Won));
        assert_eq!(world.phase, RunPhase::Won);

        let events = world.step(&idle(), &mut rng);
        assert!(events.is_empty(), "a won run is frozen");

        world.retry();
        assert_eq!(world.current_level, 1);
        assert_eq!(world.score, 0);
        assert_eq!(world.lives, STARTING_LIVES);
    }

    #[test]
    fn test_score_pop_expires() {
        let mut world = world();
        let mut rng = rng();
        world.score_pop = SCORE_POP_FRAMES;
        for _ in 0..SCORE_POP_FRAMES {
            world.step(&idle(), &mut rng);
        }
        assert_eq!(world.score_pop, 0);
    }

    #[test]
    fn test_grounded_jump_sets_exact_velocity() {
        let mut world = world();
        let mut rng = rng();
        settle(&mut world, &mut rng);
        assert!(world.player.on_ground);
        press_jump(&mut world);
        world.step(&idle(), &mut rng);
        assert_eq!(world.player.vy, -13.0);
        assert!(!world.jump_latched());
    }
}
