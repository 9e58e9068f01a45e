//! HUD and overlay model
//!
//! Plain data describing what the DOM overlay should show. The browser layer
//! copies it into elements each frame; tests inspect it directly.

use crate::renderer::Color;
use crate::sim::{GameEvent, tier};

/// How long the tier notification stays up
pub const NOTIFICATION_MS: f64 = 2000.0;
/// Score pop animation length
pub const SCORE_PULSE_MS: f64 = 150.0;
/// Screen flash fade time
pub const FLASH_MS: f64 = 500.0;
/// Initial screen flash opacity
pub const FLASH_OPACITY: f32 = 0.3;

/// Which overlay screen is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Playing,
    GameOver,
}

/// Tier-up banner
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: &'static str,
    pub color: Color,
    pub remaining_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HudModel {
    pub screen: Screen,
    pub score: u32,
    /// "{number} // {name}"
    pub level_label: String,
    pub level_color: Color,
    pub notification: Option<Notification>,
    /// Remaining score pop time
    pub score_pulse_ms: f64,
    /// Current white overlay opacity
    pub flash: f32,
    pub final_score: u32,
    pub best_score: u32,
    /// Set when the finished run beat the stored best
    pub new_best: bool,
}

impl Default for HudModel {
    fn default() -> Self {
        let mut hud = Self {
            screen: Screen::Start,
            score: 0,
            level_label: String::new(),
            level_color: Color::WHITE,
            notification: None,
            score_pulse_ms: 0.0,
            flash: 0.0,
            final_score: 0,
            best_score: 0,
            new_best: false,
        };
        hud.set_level(0);
        hud
    }
}

impl HudModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score_text(&self) -> String {
        self.score.to_string()
    }

    /// CSS scale for the score display
    pub fn score_scale(&self) -> f32 {
        if self.score_pulse_ms > 0.0 { 1.3 } else { 1.0 }
    }

    fn set_level(&mut self, tier_index: usize) {
        let t = tier(tier_index);
        self.level_label = format!("{} // {}", t.number(), t.name);
        self.level_color = t.color;
    }

    /// Reset for a new run
    pub fn show_playing(&mut self) {
        self.screen = Screen::Playing;
        self.score = 0;
        self.score_pulse_ms = 0.0;
        self.notification = None;
        self.new_best = false;
        self.set_level(0);
    }

    pub fn show_game_over(&mut self, score: u32, best: u32, new_best: bool) {
        self.screen = Screen::GameOver;
        self.notification = None;
        self.flash = 0.0;
        self.final_score = score;
        self.best_score = best;
        self.new_best = new_best;
    }

    /// Apply a game notification. `flash` enables the tier-up screen flash.
    pub fn apply(&mut self, event: &GameEvent, flash: bool) {
        match *event {
            GameEvent::ScoreChanged { score } => {
                self.score = score;
                self.score_pulse_ms = SCORE_PULSE_MS;
            }
            GameEvent::TierChanged { tier: index } => {
                self.set_level(index);
                let t = tier(index);
                self.notification = Some(Notification {
                    title: t.name,
                    color: t.color,
                    remaining_ms: NOTIFICATION_MS,
                });
                if flash {
                    self.flash = FLASH_OPACITY;
                }
            }
            GameEvent::Jump { .. } | GameEvent::Collide { .. } => {}
        }
    }

    /// Advance timed HUD animations by wall-clock milliseconds
    pub fn advance(&mut self, elapsed_ms: f64) {
        self.score_pulse_ms = (self.score_pulse_ms - elapsed_ms).max(0.0);

        if let Some(n) = &mut self.notification {
            n.remaining_ms -= elapsed_ms;
            if n.remaining_ms <= 0.0 {
                self.notification = None;
            }
        }

        if self.flash > 0.0 {
            let fade = FLASH_OPACITY * (elapsed_ms / FLASH_MS) as f32;
            self.flash = (self.flash - fade).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_label() {
        let hud = HudModel::new();
        assert_eq!(hud.level_label, "1 // DRIFT");
        assert_eq!(hud.screen, Screen::Start);
        assert_eq!(hud.score_text(), "0");
    }

    #[test]
    fn test_tier_change_shows_notification_and_flash() {
        let mut hud = HudModel::new();
        hud.show_playing();
        hud.apply(&GameEvent::TierChanged { tier: 1 }, true);
        assert_eq!(hud.level_label, "2 // RUSH");
        assert_eq!(hud.notification.as_ref().map(|n| n.title), Some("RUSH"));
        assert_eq!(hud.flash, FLASH_OPACITY);

        hud.advance(1999.0);
        assert!(hud.notification.is_some());
        assert_eq!(hud.flash, 0.0);
        hud.advance(1.0);
        assert!(hud.notification.is_none());
    }

    #[test]
    fn test_reduced_motion_skips_flash() {
        let mut hud = HudModel::new();
        hud.apply(&GameEvent::TierChanged { tier: 2 }, false);
        assert_eq!(hud.flash, 0.0);
        assert!(hud.notification.is_some());
    }

    #[test]
    fn test_score_pulse() {
        let mut hud = HudModel::new();
        hud.apply(&GameEvent::ScoreChanged { score: 3 }, true);
        assert_eq!(hud.score_text(), "3");
        assert_eq!(hud.score_scale(), 1.3);
        hud.advance(SCORE_PULSE_MS);
        assert_eq!(hud.score_scale(), 1.0);
    }

    #[test]
    fn test_game_over_then_restart() {
        let mut hud = HudModel::new();
        hud.apply(&GameEvent::ScoreChanged { score: 9 }, true);
        hud.apply(&GameEvent::TierChanged { tier: 1 }, true);
        hud.show_game_over(9, 12, false);
        assert_eq!(hud.screen, Screen::GameOver);
        assert_eq!((hud.final_score, hud.best_score), (9, 12));

        hud.show_playing();
        assert_eq!(hud.score, 0);
        assert_eq!(hud.level_label, "1 // DRIFT");
        assert!(hud.notification.is_none());
    }
}
