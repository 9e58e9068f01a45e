//! Frame loop and session state machine
//!
//! [`Game`] owns the simulation, the cosmetic systems, the score keeper and
//! the event dispatcher. The platform layer feeds it timestamps and input and
//! asks it for one frame at a time; it never schedules anything itself
//! beyond calling [`Scheduler::request_frame`].

use crate::Viewport;
use crate::effects::{Background, ParticleSystem};
use crate::highscores::HighScore;
use crate::input::{Action, NormalizedInput, RawInput, normalize};
use crate::persistence::KeyValueStore;
use crate::renderer::{DrawCommand, Surface};
use crate::settings::Settings;
use crate::sim::{
    Entity, EventDispatcher, GameEvent, GamePhase, GameState, Scheduler, SubscriptionId, Tier,
    TickInput, frame_delta, tick,
};
use crate::ui::HudModel;

pub struct Game<S: Scheduler, K: KeyValueStore> {
    state: GameState,
    scheduler: S,
    dispatcher: EventDispatcher,
    particles: ParticleSystem,
    background: Background,
    scores: HighScore<K>,
    settings: Settings,
    hud: HudModel,
    /// Timestamp of the previous frame (ms)
    last_time: f64,
    /// Set when a run ends on a new best, cleared by `take_new_best`
    new_best_pending: bool,
}

impl<S: Scheduler, K: KeyValueStore> Game<S, K> {
    /// Build an idle game. Settings and the best score are read from `store`.
    pub fn new(seed: u64, viewport: Viewport, scheduler: S, store: K) -> Self {
        let settings = Settings::load(&store);
        let scores = HighScore::load(store);
        let mut hud = HudModel::new();
        hud.best_score = scores.best();

        log::info!(
            "Game created: {}x{}, best {}, quality {}",
            viewport.width,
            viewport.height,
            scores.best(),
            settings.quality.as_str()
        );

        Self {
            state: GameState::new(seed, viewport),
            last_time: scheduler.now(),
            scheduler,
            dispatcher: EventDispatcher::new(),
            particles: ParticleSystem::new(settings.max_particles(), seed.wrapping_add(1)),
            background: Background::new(viewport, settings.star_count(), seed.wrapping_add(2)),
            scores,
            settings,
            hud,
            new_best_pending: false,
        }
    }

    /// Normalize and handle a raw input event. Returns what was recognized so
    /// the caller can suppress the browser default.
    pub fn handle_input(&mut self, input: &RawInput) -> Option<NormalizedInput> {
        let normalized = normalize(input)?;
        self.handle_action(normalized.action);
        Some(normalized)
    }

    /// Idle starts a run, Running applies an impulse, Ended ignores it
    pub fn handle_action(&mut self, action: Action) {
        match (action, self.state.phase) {
            (Action::Primary, GamePhase::Idle) => self.restart(),
            (Action::Primary, GamePhase::Running) => {
                self.state.impulse();
                self.process_events();
            }
            (Action::Primary, GamePhase::Ended) => {}
        }
    }

    /// Start a fresh run from any phase
    pub fn restart(&mut self) {
        self.particles.clear();
        self.new_best_pending = false;
        self.state.start();
        self.background.set_tier(self.state.tier_index);
        self.hud.show_playing();
        self.last_time = self.scheduler.now();
        self.process_events();
        self.scheduler.request_frame();
    }

    /// Run one update/render cycle for the frame at `timestamp` (ms)
    pub fn frame(&mut self, timestamp: f64, surface: &mut dyn Surface) {
        let dt = frame_delta(self.last_time, timestamp);
        let elapsed_ms = (timestamp - self.last_time).max(0.0);
        self.last_time = timestamp;

        surface.draw(DrawCommand::Clear);
        self.background
            .update(self.state.phase == GamePhase::Running);
        self.background.render(surface);

        tick(&mut self.state, &TickInput::default(), dt);
        self.process_events();

        let ctx = self.state.frame_context(dt);
        self.state.obstacles.render(&ctx, surface);
        self.particles.update_and_render(surface);
        if self.state.phase != GamePhase::Ended {
            self.state.craft.render(&ctx, surface);
        }

        self.hud.advance(elapsed_ms);

        if self.wants_frame() {
            self.scheduler.request_frame();
        }
    }

    /// Whether another frame is needed: while running, or while the
    /// explosion is still visible after a run ends.
    pub fn wants_frame(&self) -> bool {
        match self.state.phase {
            GamePhase::Running => true,
            GamePhase::Ended => self.particles.has_active(),
            GamePhase::Idle => false,
        }
    }

    /// Static start screen: background and the parked craft
    pub fn render_idle(&self, surface: &mut dyn Surface) {
        surface.draw(DrawCommand::Clear);
        self.background.render(surface);
        let ctx = self.state.frame_context(0.0);
        self.state.craft.render(&ctx, surface);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        log::debug!("Resize to {}x{}", viewport.width, viewport.height);
        self.state.resize(viewport);
        self.background.resize(viewport);
    }

    /// Handle queued simulation events, then hand them to subscribers
    fn process_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Jump { pos, color } => self.particles.jump_burst(pos, color),
                GameEvent::Collide { .. } => self.on_run_ended(),
                GameEvent::TierChanged { tier } => {
                    self.background.set_tier(tier);
                    self.hud
                        .apply(&event, self.settings.effective_tier_flash());
                }
                GameEvent::ScoreChanged { .. } => {
                    self.hud
                        .apply(&event, self.settings.effective_tier_flash());
                }
            }
            self.dispatcher.dispatch(&event);
        }
    }

    fn on_run_ended(&mut self) {
        let score = self.state.score;
        let new_best = self.scores.record(score);
        self.new_best_pending = new_best;
        self.particles
            .explosion(self.state.craft.pos, self.state.tier().color);
        self.hud.show_game_over(score, self.scores.best(), new_best);
    }

    /// Register a handler for game notifications
    pub fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.dispatcher.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    /// Tear down: drop every subscriber
    pub fn shutdown(&mut self) {
        log::info!("Shutting down ({} subscribers)", self.dispatcher.len());
        self.dispatcher.clear();
    }

    /// True once after a run ends on a new best score
    pub fn take_new_best(&mut self) -> bool {
        std::mem::take(&mut self.new_best_pending)
    }

    /// Replace settings, apply them to the effects and persist them
    pub fn set_settings(&mut self, settings: Settings) {
        if settings.max_particles() != self.particles.capacity() {
            self.particles.set_capacity(settings.max_particles());
        }
        if settings.star_count() != self.settings.star_count() {
            self.background.set_star_count(settings.star_count());
        }
        settings.save(self.scores.store_mut());
        self.settings = settings;
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn best(&self) -> u32 {
        self.scores.best()
    }

    pub fn tier(&self) -> &'static Tier {
        self.state.tier()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn hud(&self) -> &HudModel {
        &self.hud
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Consume the game and return its store (for reloading)
    pub fn into_store(self) -> K {
        self.scores.into_store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::renderer::RecordingSurface;
    use crate::settings::QualityPreset;
    use crate::sim::{FixedStepScheduler, Obstacle};
    use crate::ui::Screen;
    use std::cell::RefCell;
    use std::rc::Rc;

    type TestGame = Game<FixedStepScheduler, MemoryStore>;

    fn game() -> TestGame {
        Game::new(
            99,
            Viewport::new(1000.0, 800.0),
            FixedStepScheduler::default(),
            MemoryStore::new(),
        )
    }

    /// Drive frames while the game keeps asking for them
    fn run_loop(game: &mut TestGame, surface: &mut RecordingSurface, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && game.scheduler_mut().take_frame_request() {
            let t = game.scheduler_mut().advance();
            surface.clear();
            game.frame(t, surface);
            frames += 1;
        }
        frames
    }

    /// Put a passable obstacle right at the craft so the next frame scores
    fn obstacle_at_craft(game: &mut TestGame) {
        let pos = game.state().craft.pos;
        game.state_mut().obstacles.obstacles.push(Obstacle {
            x: pos.x - 59.0,
            gap_top: pos.y - 110.0,
            gap_size: 220.0,
            width: 60.0,
            passed: false,
            oscillates: false,
            phase: 0.0,
            base_gap_top: pos.y - 110.0,
        });
    }

    #[test]
    fn test_action_starts_then_impulses() {
        let mut game = game();
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(!game.scheduler().has_pending());

        game.handle_action(Action::Primary);
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(game.scheduler().has_pending());
        // Opening impulse produced a jump burst
        assert_eq!(game.particles().len(), 13);

        game.handle_input(&RawInput::key("Space"));
        assert_eq!(game.particles().len(), 26);
        assert_eq!(game.handle_input(&RawInput::key("KeyA")), None);
    }

    #[test]
    fn test_input_ignored_while_ended() {
        let mut game = game();
        game.restart();
        game.state_mut().end(crate::sim::CollisionCause::Boundary);
        game.process_events();
        let particles = game.particles().len();
        game.handle_action(Action::Primary);
        assert_eq!(game.phase(), GamePhase::Ended);
        assert_eq!(game.particles().len(), particles);
    }

    #[test]
    fn test_run_ends_and_loop_stops() {
        let mut game = game();
        let mut surface = RecordingSurface::new();
        game.restart();
        let frames = run_loop(&mut game, &mut surface, 10_000);
        assert!(frames < 10_000);
        assert_eq!(game.phase(), GamePhase::Ended);
        assert!(!game.particles().has_active());
        assert!(!game.scheduler().has_pending());
        assert_eq!(game.hud().screen, Screen::GameOver);
    }

    #[test]
    fn test_ended_renders_without_craft() {
        let mut game = game();
        let mut surface = RecordingSurface::new();
        game.restart();
        game.state_mut().end(crate::sim::CollisionCause::Obstacle);
        let t = game.scheduler_mut().advance();
        game.frame(t, &mut surface);
        // Explosion particles are drawn, the hull polygon is not
        assert!(surface.count(|c| matches!(c, DrawCommand::Circle { .. })) > 80);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Polygon { .. })), 0);
        assert!(game.scheduler().has_pending());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut game = game();
        let mut surface = RecordingSurface::new();
        game.restart();
        game.state_mut().score = 25;
        game.state_mut().tier_index = 2;
        run_loop(&mut game, &mut surface, 10_000);
        assert_eq!(game.phase(), GamePhase::Ended);

        game.restart();
        let state = game.state();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.tier_index, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(
            state.craft.pos,
            crate::sim::Craft::start_position(state.viewport)
        );
        assert!(state.craft.trail.is_empty());
        assert_eq!(state.craft.velocity, state.tier().jump_impulse);
        assert_eq!(game.background().tier_index(), 0);
        assert_eq!(game.hud().level_label, "1 // DRIFT");
        // Only the opening burst survives the reset
        assert_eq!(game.particles().len(), 13);
    }

    #[test]
    fn test_score_eight_promotes_to_rush() {
        let mut game = game();
        let mut surface = RecordingSurface::new();
        game.restart();
        game.state_mut().score = 7;
        obstacle_at_craft(&mut game);

        let t = game.scheduler_mut().advance();
        game.frame(t, &mut surface);

        assert_eq!(game.score(), 8);
        assert_eq!(game.tier().name, "RUSH");
        assert_eq!(game.background().tier_index(), 1);
        assert_eq!(game.hud().level_label, "2 // RUSH");
        assert!(game.hud().notification.is_some());
        assert!(game.hud().flash > 0.0);
    }

    #[test]
    fn test_best_score_persists_across_reload() {
        let mut game = game();
        let mut surface = RecordingSurface::new();
        assert_eq!(game.best(), 0);

        game.restart();
        game.state_mut().score = 15;
        run_loop(&mut game, &mut surface, 10_000);
        assert_eq!(game.best(), 15);
        assert!(game.take_new_best());
        assert!(!game.take_new_best());

        let reloaded = Game::new(
            1,
            Viewport::new(1000.0, 800.0),
            FixedStepScheduler::default(),
            game.into_store(),
        );
        assert_eq!(reloaded.best(), 15);
        assert_eq!(reloaded.hud().best_score, 15);
    }

    #[test]
    fn test_subscribers_see_events_until_shutdown() {
        let mut game = game();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        game.subscribe(move |e| sink.borrow_mut().push(*e));

        let mut surface = RecordingSurface::new();
        game.restart();
        assert!(matches!(seen.borrow().as_slice(), [GameEvent::Jump { .. }]));

        game.state_mut().score = 7;
        obstacle_at_craft(&mut game);
        let t = game.scheduler_mut().advance();
        game.frame(t, &mut surface);
        assert_eq!(
            &seen.borrow()[1..],
            &[
                GameEvent::ScoreChanged { score: 8 },
                GameEvent::TierChanged { tier: 1 },
            ]
        );

        game.state_mut().end(crate::sim::CollisionCause::Obstacle);
        let t = game.scheduler_mut().advance();
        game.frame(t, &mut surface);
        assert_eq!(
            seen.borrow().last(),
            Some(&GameEvent::Collide {
                cause: crate::sim::CollisionCause::Obstacle
            })
        );
        assert_eq!(seen.borrow().len(), 4);

        game.shutdown();
        game.restart();
        assert_eq!(seen.borrow().len(), 4);
    }

    #[test]
    fn test_craft_drawn_while_running_and_idle() {
        let mut game = game();
        let mut surface = RecordingSurface::new();
        game.render_idle(&mut surface);
        // hull plus two thruster flames
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Polygon { .. })), 3);

        surface.clear();
        game.restart();
        let t = game.scheduler_mut().advance();
        game.frame(t, &mut surface);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Polygon { .. })), 3);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Ellipse { .. })), 1);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut game = game();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let id = game.subscribe(move |_| *c.borrow_mut() += 1);
        game.restart();
        assert!(game.unsubscribe(id));
        game.handle_action(Action::Primary);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut game = game();
        let mut surface = RecordingSurface::new();
        game.restart();
        let y = game.state().craft.pos.y;
        game.scheduler_mut().skip(60_000.0);
        let t = game.scheduler_mut().advance();
        game.frame(t, &mut surface);
        // dt = 4: v = -5.5 + 1.0, y moves by v * 4
        assert!((game.state().craft.pos.y - (y - 18.0)).abs() < 1e-3);
    }

    #[test]
    fn test_idle_render_is_static() {
        let game = game();
        let mut surface = RecordingSurface::new();
        game.render_idle(&mut surface);
        assert_eq!(surface.commands[0], DrawCommand::Clear);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Polygon { .. })), 3);
    }

    #[test]
    fn test_settings_apply_and_persist() {
        let mut game = game();
        game.set_settings(Settings::from_preset(QualityPreset::Low));
        assert_eq!(game.particles().capacity(), 60);
        assert!(game.background().stars().is_empty());

        let store = game.into_store();
        assert_eq!(Settings::load(&store).quality, QualityPreset::Low);
    }

    #[test]
    fn test_resize_moves_idle_craft() {
        let mut game = game();
        game.resize(Viewport::new(2000.0, 600.0));
        assert_eq!(game.state().viewport, Viewport::new(2000.0, 600.0));
        assert_eq!(game.state().craft.pos, glam::Vec2::new(300.0, 300.0));
    }
}
