//! Stackable ship modifiers
//!
//! The chain is a base ship descriptor plus an ordered list of modifier
//! records; the newest record is the head. Effective stats fold from the
//! base through each record in application order, so every record either
//! overrides a stat or passes the wrapped value through.
//!
//! Expiry is checked lazily on every read against the session clock. Once a
//! record is seen expired it latches inert and stays that way. Records are
//! never removed, so the chain only grows during a session.

use std::cell::Cell;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Base combat stats and position of the player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipStats {
    pub speed: i32,
    /// Minimum interval between shots (ms)
    pub fire_rate_ms: u64,
    pub fire_power: u32,
    pub pos: IVec2,
}

impl ShipStats {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.base_speed,
            fire_rate_ms: tuning.base_fire_rate_ms,
            fire_power: tuning.base_fire_power,
            pos: IVec2::new(tuning.player_start_x, tuning.player_start_y),
        }
    }
}

/// Modifier types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKind {
    /// Speed x2
    SpeedBoost,
    /// Fire power forced to 3
    TripleShot,
    /// Fire interval halved
    RapidFire,
    /// Absorbs a limited number of hits
    Shield,
}

impl ModifierKind {
    pub const ALL: [ModifierKind; 4] = [
        ModifierKind::SpeedBoost,
        ModifierKind::TripleShot,
        ModifierKind::RapidFire,
        ModifierKind::Shield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierKind::SpeedBoost => "SpeedBoost",
            ModifierKind::TripleShot => "TripleShot",
            ModifierKind::RapidFire => "RapidFire",
            ModifierKind::Shield => "Shield",
        }
    }

    /// Configured lifetime (0 = permanent)
    pub fn duration_ms(&self, tuning: &Tuning) -> u64 {
        match self {
            ModifierKind::SpeedBoost => tuning.speed_boost_ms,
            ModifierKind::TripleShot => tuning.triple_shot_ms,
            ModifierKind::RapidFire => tuning.rapid_fire_ms,
            ModifierKind::Shield => tuning.shield_ms,
        }
    }
}

/// One applied modifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Modifier {
    pub kind: ModifierKind,
    /// Session time at which the modifier was applied (ms)
    pub applied_at_ms: u64,
    /// Lifetime in ms, 0 = permanent
    pub duration_ms: u64,
    /// Remaining hit budget (shields only)
    pub hits_remaining: u32,
    /// One-way latch, set the first time the modifier is seen expired
    expired: Cell<bool>,
    /// Expiry already handed out by `poll_expired`
    #[serde(skip)]
    reported: bool,
}

impl Modifier {
    pub fn new(kind: ModifierKind, applied_at_ms: u64, duration_ms: u64, hits: u32) -> Self {
        Self {
            kind,
            applied_at_ms,
            duration_ms,
            hits_remaining: if kind == ModifierKind::Shield { hits } else { 0 },
            expired: Cell::new(false),
            reported: false,
        }
    }

    /// Whether the modifier still alters the stats it owns at `now_ms`
    pub fn is_active(&self, now_ms: u64) -> bool {
        if self.expired.get() {
            return false;
        }
        let elapsed = now_ms.saturating_sub(self.applied_at_ms);
        let timed_out = self.duration_ms > 0 && elapsed >= self.duration_ms;
        let depleted = self.kind == ModifierKind::Shield && self.hits_remaining == 0;
        if timed_out || depleted {
            self.expired.set(true);
            return false;
        }
        true
    }

    fn label(&self) -> String {
        let extra = match self.kind {
            ModifierKind::SpeedBoost => "x2".to_string(),
            ModifierKind::TripleShot => "3 shots".to_string(),
            ModifierKind::RapidFire => "x0.5".to_string(),
            ModifierKind::Shield => self.hits_remaining.to_string(),
        };
        format!("{}({})", self.kind.as_str(), extra)
    }
}

/// Base ship wrapped by a growing stack of modifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerChain {
    pub base: ShipStats,
    /// Oldest first; the last entry is the head
    modifiers: Vec<Modifier>,
}

impl PowerChain {
    pub fn new(base: ShipStats) -> Self {
        log::debug!(
            "BasicShip created - Speed:{} FireRate:{}ms",
            base.speed,
            base.fire_rate_ms
        );
        Self {
            base,
            modifiers: Vec::new(),
        }
    }

    /// Wrap the current head with a new modifier
    pub fn push(&mut self, modifier: Modifier) {
        log::debug!("{:?} applied to {}", modifier.kind, self.status_label(modifier.applied_at_ms));
        self.modifiers.push(modifier);
    }

    /// Ship position. Modifiers never touch it.
    pub fn position(&self) -> IVec2 {
        self.base.pos
    }

    pub fn set_position(&mut self, pos: IVec2) {
        self.base.pos = pos;
    }

    /// Number of records ever applied (never shrinks)
    pub fn depth(&self) -> usize {
        self.modifiers.len()
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn effective_speed(&self, now_ms: u64) -> i32 {
        self.modifiers.iter().fold(self.base.speed, |speed, m| {
            if m.kind == ModifierKind::SpeedBoost && m.is_active(now_ms) {
                speed.saturating_mul(2)
            } else {
                speed
            }
        })
    }

    pub fn effective_fire_rate(&self, now_ms: u64) -> u64 {
        self.modifiers.iter().fold(self.base.fire_rate_ms, |rate, m| {
            if m.kind == ModifierKind::RapidFire && m.is_active(now_ms) {
                rate / 2
            } else {
                rate
            }
        })
    }

    pub fn effective_fire_power(&self, now_ms: u64) -> u32 {
        self.modifiers.iter().fold(self.base.fire_power, |power, m| {
            if m.kind == ModifierKind::TripleShot && m.is_active(now_ms) {
                3
            } else {
                power
            }
        })
    }

    pub fn has_shield(&self, now_ms: u64) -> bool {
        // Evaluate every shield so each one gets a chance to latch
        self.modifiers
            .iter()
            .filter(|m| m.kind == ModifierKind::Shield)
            .fold(false, |shielded, m| m.is_active(now_ms) || shielded)
    }

    /// Human-readable chain, e.g. `BasicShip + SpeedBoost(x2) + Shield(3)`
    pub fn status_label(&self, now_ms: u64) -> String {
        self.modifiers
            .iter()
            .fold(String::from("BasicShip"), |mut label, m| {
                if m.is_active(now_ms) {
                    label.push_str(" + ");
                    label.push_str(&m.label());
                }
                label
            })
    }

    /// Spend one hit from the newest live shield.
    ///
    /// Returns false when no shield could absorb the hit.
    pub fn absorb_hit(&mut self, now_ms: u64) -> bool {
        let Some(shield) = self
            .modifiers
            .iter_mut()
            .rev()
            .find(|m| m.kind == ModifierKind::Shield && m.is_active(now_ms))
        else {
            return false;
        };
        shield.hits_remaining -= 1;
        log::debug!("Shield absorbed hit - Remaining: {}", shield.hits_remaining);
        if shield.hits_remaining == 0 {
            shield.expired.set(true);
            log::debug!("Shield depleted");
        }
        true
    }

    /// Kinds of the modifiers that ran out since the last poll, each
    /// reported once no matter which read tripped its latch.
    pub fn poll_expired(&mut self, now_ms: u64) -> Vec<ModifierKind> {
        self.modifiers
            .iter_mut()
            .filter(|m| !m.reported && !m.is_active(now_ms))
            .map(|m| {
                m.reported = true;
                m.kind
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chain() -> PowerChain {
        PowerChain::new(ShipStats::from_tuning(&Tuning::default()))
    }

    #[test]
    fn test_base_stats() {
        let chain = chain();
        assert_eq!(chain.effective_speed(0), 8);
        assert_eq!(chain.effective_fire_rate(0), 300);
        assert_eq!(chain.effective_fire_power(0), 1);
        assert!(!chain.has_shield(0));
        assert_eq!(chain.status_label(0), "BasicShip");
    }

    #[test]
    fn test_each_modifier_while_active() {
        let mut chain = chain();
        chain.push(Modifier::new(ModifierKind::SpeedBoost, 0, 5000, 0));
        chain.push(Modifier::new(ModifierKind::RapidFire, 0, 7000, 0));
        chain.push(Modifier::new(ModifierKind::TripleShot, 0, 8000, 0));
        chain.push(Modifier::new(ModifierKind::Shield, 0, 10000, 3));

        assert_eq!(chain.effective_speed(100), 16);
        assert_eq!(chain.effective_fire_rate(100), 150);
        assert_eq!(chain.effective_fire_power(100), 3);
        assert!(chain.has_shield(100));
        assert_eq!(
            chain.status_label(100),
            "BasicShip + SpeedBoost(x2) + RapidFire(x0.5) + TripleShot(3 shots) + Shield(3)"
        );
    }

    #[test]
    fn test_stacked_modifiers_compose() {
        let mut chain = chain();
        chain.push(Modifier::new(ModifierKind::SpeedBoost, 0, 5000, 0));
        chain.push(Modifier::new(ModifierKind::SpeedBoost, 1000, 5000, 0));
        chain.push(Modifier::new(ModifierKind::RapidFire, 0, 0, 0));
        chain.push(Modifier::new(ModifierKind::RapidFire, 0, 0, 0));

        assert_eq!(chain.effective_speed(1000), 32);
        assert_eq!(chain.effective_fire_rate(1000), 75);
        // First boost has run out, second still running
        assert_eq!(chain.effective_speed(5500), 16);
        assert_eq!(chain.effective_speed(6000), 8);
    }

    #[test]
    fn test_permanent_speed_boosts_saturate() {
        let mut chain = chain();
        for _ in 0..40 {
            chain.push(Modifier::new(ModifierKind::SpeedBoost, 0, 0, 0));
        }
        assert_eq!(chain.effective_speed(0), i32::MAX);
    }

    #[test]
    fn test_rapid_fire_rounds_down() {
        let mut base = ShipStats::from_tuning(&Tuning::default());
        base.fire_rate_ms = 301;
        let mut chain = PowerChain::new(base);
        chain.push(Modifier::new(ModifierKind::RapidFire, 0, 0, 0));
        assert_eq!(chain.effective_fire_rate(0), 150);
    }

    #[test]
    fn test_expired_wrapper_invisible_in_label() {
        let mut chain = chain();
        chain.push(Modifier::new(ModifierKind::SpeedBoost, 0, 5000, 0));
        chain.push(Modifier::new(ModifierKind::Shield, 0, 10000, 3));
        assert_eq!(chain.status_label(6000), "BasicShip + Shield(3)");
        assert_eq!(chain.depth(), 2);
    }

    #[test]
    fn test_permanent_modifier_never_expires() {
        let mut chain = chain();
        chain.push(Modifier::new(ModifierKind::TripleShot, 0, 0, 0));
        assert_eq!(chain.effective_fire_power(u64::MAX), 3);
        assert!(chain.poll_expired(u64::MAX).is_empty());
    }

    #[test]
    fn test_shield_depleted_by_hits() {
        let mut chain = chain();
        chain.push(Modifier::new(ModifierKind::Shield, 0, 10000, 3));

        assert!(chain.absorb_hit(10));
        assert_eq!(chain.status_label(10), "BasicShip + Shield(2)");
        assert!(chain.absorb_hit(20));
        assert!(chain.has_shield(20));
        assert!(chain.absorb_hit(30));
        assert!(!chain.has_shield(30));
        assert!(!chain.absorb_hit(40));
        assert_eq!(chain.status_label(40), "BasicShip");
    }

    #[test]
    fn test_absorb_prefers_newest_shield() {
        let mut chain = chain();
        chain.push(Modifier::new(ModifierKind::Shield, 0, 10000, 3));
        chain.push(Modifier::new(ModifierKind::Shield, 0, 10000, 1));
        assert!(chain.absorb_hit(0));
        assert_eq!(chain.modifiers()[1].hits_remaining, 0);
        assert_eq!(chain.modifiers()[0].hits_remaining, 3);
        assert!(chain.has_shield(0));
    }

    #[test]
    fn test_poll_reports_expiry_once() {
        let mut chain = chain();
        chain.push(Modifier::new(ModifierKind::RapidFire, 0, 7000, 0));
        assert!(chain.poll_expired(6999).is_empty());
        assert_eq!(chain.poll_expired(7000), vec![ModifierKind::RapidFire]);
        assert!(chain.poll_expired(7016).is_empty());
    }

    #[test]
    fn test_poll_reports_expiry_latched_elsewhere() {
        let mut chain = chain();
        chain.push(Modifier::new(ModifierKind::SpeedBoost, 0, 5000, 0));
        chain.push(Modifier::new(ModifierKind::Shield, 0, 10000, 1));
        // Both latches trip outside of polling
        assert_eq!(chain.effective_speed(5000), 8);
        assert!(chain.absorb_hit(5000));
        assert_eq!(
            chain.poll_expired(5016),
            vec![ModifierKind::SpeedBoost, ModifierKind::Shield]
        );
        assert!(chain.poll_expired(5032).is_empty());
    }

    #[test]
    fn test_expiry_latch_survives_clock_rewind() {
        let mut chain = chain();
        chain.push(Modifier::new(ModifierKind::SpeedBoost, 1000, 5000, 0));
        assert_eq!(chain.effective_speed(6000), 8);
        // Reading an earlier time must not revive the modifier
        assert_eq!(chain.effective_speed(2000), 8);
    }

    fn any_kind() -> impl Strategy<Value = ModifierKind> {
        prop::sample::select(ModifierKind::ALL.to_vec())
    }

    fn derived(chain: &PowerChain, now: u64) -> (i32, u64, u32, bool) {
        (
            chain.effective_speed(now),
            chain.effective_fire_rate(now),
            chain.effective_fire_power(now),
            chain.has_shield(now),
        )
    }

    proptest! {
        #[test]
        fn prop_modifier_expires_monotonically(
            kind in any_kind(),
            applied in 0u64..100_000,
            duration in 1u64..20_000,
            before in 0u64..20_000,
            after in prop::collection::vec(0u64..1_000_000, 1..8),
        ) {
            let base = chain();
            let mut wrapped = base.clone();
            wrapped.push(Modifier::new(kind, applied, duration, 3));

            let now = applied + before % duration;
            prop_assert_ne!(derived(&wrapped, now), derived(&base, now));

            for extra in after {
                let later = applied + duration + extra;
                prop_assert_eq!(derived(&wrapped, later), derived(&base, later));
                prop_assert_eq!(wrapped.status_label(later), base.status_label(later));
            }
        }

        #[test]
        fn prop_shield_ends_on_hits_or_time(
            budget in 1u32..6,
            hits in 0u32..8,
            duration in 1u64..20_000,
            at_ms in 0u64..40_000,
        ) {
            let mut chain = chain();
            chain.push(Modifier::new(ModifierKind::Shield, 0, duration, budget));
            let mut absorbed = 0;
            for _ in 0..hits {
                if chain.absorb_hit(0) {
                    absorbed += 1;
                }
            }
            let expect = absorbed < budget && at_ms < duration;
            prop_assert_eq!(chain.has_shield(at_ms), expect);
            if !expect {
                prop_assert!(!chain.has_shield(at_ms + 1));
                prop_assert!(!chain.has_shield(0));
            }
        }
    }
}
