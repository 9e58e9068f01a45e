//! Difficulty tiers and score thresholds

use crate::renderer::Color;

/// A named difficulty configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    /// Position in [`TIERS`] (0-based)
    pub index: usize,
    pub name: &'static str,
    /// Accent color for the craft glow, obstacle outlines and HUD
    pub color: Color,
    /// Background gradient (top, bottom)
    pub background: (Color, Color),
    /// Horizontal scroll speed (units per 60 Hz frame)
    pub speed: f32,
    /// Vertical size of the passable gap
    pub gap_size: f32,
    /// Downward acceleration per frame
    pub gravity: f32,
    /// Velocity set by an impulse (negative is up)
    pub jump_impulse: f32,
    /// Whether gaps oscillate vertically
    pub oscillates: bool,
}

impl Tier {
    /// 1-based level number shown to the player
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

pub const TIERS: [Tier; 7] = [
    Tier {
        index: 0,
        name: "DRIFT",
        color: Color::hex(0x4ade80),
        background: (Color::hex(0x0f172a), Color::hex(0x022c22)),
        speed: 3.5,
        gap_size: 220.0,
        gravity: 0.25,
        jump_impulse: -5.5,
        oscillates: false,
    },
    Tier {
        index: 1,
        name: "RUSH",
        color: Color::hex(0x818cf8),
        background: (Color::hex(0x1e1b4b), Color::hex(0x312e81)),
        speed: 5.0,
        gap_size: 190.0,
        gravity: 0.3,
        jump_impulse: -6.5,
        oscillates: false,
    },
    Tier {
        index: 2,
        name: "HYPER",
        color: Color::hex(0xf472b6),
        background: (Color::hex(0x3f0c28), Color::hex(0x831843)),
        speed: 6.5,
        gap_size: 175.0,
        gravity: 0.38,
        jump_impulse: -7.0,
        oscillates: true,
    },
    Tier {
        index: 3,
        name: "VOID",
        color: Color::hex(0xef4444),
        background: (Color::hex(0x000000), Color::hex(0x450a0a)),
        speed: 8.0,
        gap_size: 160.0,
        gravity: 0.5,
        jump_impulse: -8.0,
        oscillates: true,
    },
    Tier {
        index: 4,
        name: "PLASMA",
        color: Color::hex(0xf59e0b),
        background: (Color::hex(0x451a03), Color::hex(0x78350f)),
        speed: 9.5,
        gap_size: 150.0,
        gravity: 0.6,
        jump_impulse: -9.0,
        oscillates: true,
    },
    Tier {
        index: 5,
        name: "QUANTUM",
        color: Color::hex(0x06b6d4),
        background: (Color::hex(0x083344), Color::hex(0x155e75)),
        speed: 11.0,
        gap_size: 145.0,
        gravity: 0.7,
        jump_impulse: -10.0,
        oscillates: true,
    },
    Tier {
        index: 6,
        name: "OMEGA",
        color: Color::hex(0xffffff),
        background: (Color::hex(0x171717), Color::hex(0x404040)),
        speed: 13.0,
        gap_size: 140.0,
        gravity: 0.85,
        jump_impulse: -11.0,
        oscillates: true,
    },
];

/// Score needed to reach a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    pub tier_index: usize,
    pub min_score: u32,
}

/// Ordered by strictly increasing `min_score`
pub const THRESHOLDS: [Threshold; 6] = [
    Threshold { tier_index: 1, min_score: 8 },
    Threshold { tier_index: 2, min_score: 20 },
    Threshold { tier_index: 3, min_score: 40 },
    Threshold { tier_index: 4, min_score: 60 },
    Threshold { tier_index: 5, min_score: 90 },
    Threshold { tier_index: 6, min_score: 120 },
];

/// Tier index for a score: the highest threshold reached, else 0
pub fn tier_for_score(score: u32) -> usize {
    THRESHOLDS
        .iter()
        .take_while(|t| score >= t.min_score)
        .last()
        .map(|t| t.tier_index)
        .unwrap_or(0)
}

/// Tier by index, clamped to the last defined tier
pub fn tier(index: usize) -> &'static Tier {
    &TIERS[index.min(TIERS.len() - 1)]
}

/// Vertical oscillation (rate per frame, amplitude) for a tier.
///
/// Bands: VOID (3) is slow and shallow, QUANTUM and above (>= 5) fast and
/// wide, everything else in between.
pub fn oscillation_band(tier_index: usize) -> (f32, f32) {
    if tier_index >= 5 {
        (0.08, 120.0)
    } else if tier_index == 3 {
        (0.03, 60.0)
    } else {
        (0.05, 100.0)
    }
}
