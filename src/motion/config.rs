//! Movement tuning and the per-tick context threaded through the integrators.

use serde::{Deserialize, Serialize};

/// Compatibility toggles reproducing legacy movement quirks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompatFlags(pub u32);

impl CompatFlags {
    /// Clip blocked player moves at full speed. A move blocked twice in one
    /// tick then slides the full velocity twice, which is what makes the
    /// classic wall-running trick work.
    pub const WALL_RUN: Self = Self(1 << 0);

    /// Actors never come to rest on top of other actors.
    pub const NO_PASS_ACTORS: Self = Self(1 << 1);

    /// Check whether all of the given flags are set.
    #[inline]
    pub fn has(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for CompatFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Movement tuning. The defaults are the canonical values the rest of the
/// simulation was balanced around; change them with care.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Hard cap on velocity magnitude applied before the sweep. Purely a
    /// numeric safety net; ordinary gameplay speeds never reach it.
    pub velocity_ceiling: f64,

    /// Sub-step size for degenerate actors whose radius is too small to
    /// derive one from (gibs can have radius zero).
    pub fallback_step: f64,

    /// Minimum horizontal speed for a corpse halfway off a ledge to keep
    /// sliding instead of taking friction.
    pub corpse_slide_min: f64,

    /// Base sink speed in liquid, scaled by mass.
    pub water_sink_speed: f64,

    /// Largest per-tick velocity correction toward the target sink speed.
    pub sink_rate_limit: f64,

    /// Landing speed of a jump under normal gravity. Frozen corpses landing
    /// harder than this shatter.
    pub landing_speed: f64,

    /// Downward speed beyond which monster-classed actors take fall damage.
    pub fall_damage_speed: f64,

    /// Floor normal z below which a slope is too steep to stand on.
    pub steep_slope: f64,

    /// Mass treated as equivalent to a player for sink-speed scaling.
    pub sink_reference_mass: f64,

    /// Simulation tics per second; also the bump-special cooldown length.
    pub tic_rate: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            velocity_ceiling: 5000.0,
            fallback_step: 30.0,
            corpse_slide_min: 0.25,
            water_sink_speed: 0.5,
            sink_rate_limit: 8.0,
            landing_speed: -8.0,
            fall_damage_speed: -23.0,
            steep_slope: 46342.0 / 65536.0,
            sink_reference_mass: 100.0,
            tic_rate: 35,
        }
    }
}

/// Per-tick state threaded through the movement calls instead of living in
/// globals.
#[derive(Debug, Clone, Default)]
pub struct TickContext {
    pub config: MotionConfig,
    pub compat: CompatFlags,

    /// Monotonic counter the collision query uses to let a push special
    /// re-fire within a single tick.
    pub push_time: u32,

    /// Current map time in tics; bump-special cooldowns compare against it.
    pub map_time: u32,
}

impl TickContext {
    pub fn new(config: MotionConfig, compat: CompatFlags) -> Self {
        Self {
            config,
            compat,
            push_time: 0,
            map_time: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = MotionConfig::default();
        assert_eq!(config.velocity_ceiling, 5000.0);
        assert_eq!(config.fallback_step, 30.0);
        assert_eq!(config.corpse_slide_min, 0.25);
        assert_eq!(config.landing_speed, -8.0);
        assert_eq!(config.fall_damage_speed, -23.0);
        assert!(config.steep_slope > 0.707 && config.steep_slope < 0.708);
        assert_eq!(config.tic_rate, 35);
    }

    #[test]
    fn test_compat_flags() {
        let compat = CompatFlags::WALL_RUN | CompatFlags::NO_PASS_ACTORS;
        assert!(compat.has(CompatFlags::WALL_RUN));
        assert!(compat.has(CompatFlags::NO_PASS_ACTORS));
        assert!(!CompatFlags::default().has(CompatFlags::WALL_RUN));
    }
}
