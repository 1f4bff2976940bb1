/// Hamster Tap player progress definitions.

use chrono::NaiveDate;

/// Energy capacity before any Max Energy upgrade.
pub const BASE_MAX_ENERGY: u32 = 1_000;
/// Extra capacity per Max Energy level.
pub const MAX_ENERGY_PER_LEVEL: u32 = 100;
/// Taps needed per player level.
pub const TAPS_PER_LEVEL: u64 = 100;
/// Daily bonus streak cap (days).
pub const MAX_BONUS_STREAK: u32 = 7;
/// Coins granted per streak day.
pub const BONUS_PER_STREAK_DAY: u64 = 1_000;

/// The four independent upgrade tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    TapPower,
    MaxEnergy,
    EnergyRegen,
    AutoTapper,
}

impl UpgradeKind {
    /// All upgrade kinds in shop order.
    pub fn all() -> &'static [UpgradeKind] {
        &[
            UpgradeKind::TapPower,
            UpgradeKind::MaxEnergy,
            UpgradeKind::EnergyRegen,
            UpgradeKind::AutoTapper,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            UpgradeKind::TapPower => 0,
            UpgradeKind::MaxEnergy => 1,
            UpgradeKind::EnergyRegen => 2,
            UpgradeKind::AutoTapper => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<UpgradeKind> {
        UpgradeKind::all().get(idx).copied()
    }

    /// Cost of the first level.
    pub fn base_cost(&self) -> f64 {
        match self {
            UpgradeKind::TapPower => 100.0,
            UpgradeKind::MaxEnergy => 200.0,
            UpgradeKind::EnergyRegen => 500.0,
            UpgradeKind::AutoTapper => 10_000.0,
        }
    }

    /// Cost multiplier applied per owned level.
    pub fn cost_growth(&self) -> f64 {
        match self {
            UpgradeKind::TapPower => 1.5,
            UpgradeKind::MaxEnergy => 1.4,
            UpgradeKind::EnergyRegen => 1.6,
            UpgradeKind::AutoTapper => 2.0,
        }
    }

    pub fn max_level(&self) -> u32 {
        match self {
            UpgradeKind::TapPower => 50,
            UpgradeKind::MaxEnergy => 30,
            UpgradeKind::EnergyRegen => 20,
            UpgradeKind::AutoTapper => 10,
        }
    }

    /// Price of the next level when `level` levels are already owned.
    /// Computed in `f64` and floored, rounding error included.
    pub fn cost_at(&self, level: u32) -> u64 {
        (self.base_cost() * self.cost_growth().powi(level as i32)).floor() as u64
    }
}

/// Owned level per upgrade kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpgradeLevels {
    pub tap_power: u32,
    pub max_energy: u32,
    pub energy_regen: u32,
    pub auto_tapper: u32,
}

impl UpgradeLevels {
    pub fn get(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::TapPower => self.tap_power,
            UpgradeKind::MaxEnergy => self.max_energy,
            UpgradeKind::EnergyRegen => self.energy_regen,
            UpgradeKind::AutoTapper => self.auto_tapper,
        }
    }

    pub fn get_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::TapPower => &mut self.tap_power,
            UpgradeKind::MaxEnergy => &mut self.max_energy,
            UpgradeKind::EnergyRegen => &mut self.energy_regen,
            UpgradeKind::AutoTapper => &mut self.auto_tapper,
        }
    }

    pub fn is_maxed(&self, kind: UpgradeKind) -> bool {
        self.get(kind) >= kind.max_level()
    }
}

/// The single persisted progress record.
///
/// `max_energy`, `tap_power` and `level` are methods so they always follow
/// their sources; they only exist as stored values in the JSON mirror.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerProgress {
    /// Spendable balance.
    pub coins: u64,
    /// Current energy, `<= max_energy()`.
    pub energy: u32,
    /// Manual taps only; auto-taps are not counted.
    pub total_taps: u64,
    /// Lifetime gross earnings.
    pub total_coins_earned: u64,
    /// Date of the last claimed daily bonus.
    pub last_daily_bonus: Option<NaiveDate>,
    pub daily_bonus_streak: u32,
    pub upgrades: UpgradeLevels,
}

impl PlayerProgress {
    pub fn new() -> Self {
        Self {
            coins: 0,
            energy: BASE_MAX_ENERGY,
            total_taps: 0,
            total_coins_earned: 0,
            last_daily_bonus: None,
            daily_bonus_streak: 0,
            upgrades: UpgradeLevels::default(),
        }
    }

    pub fn max_energy(&self) -> u32 {
        BASE_MAX_ENERGY + MAX_ENERGY_PER_LEVEL * self.upgrades.max_energy
    }

    pub fn tap_power(&self) -> u64 {
        1 + self.upgrades.tap_power as u64
    }

    pub fn level(&self) -> u64 {
        self.total_taps / TAPS_PER_LEVEL + 1
    }

    /// Energy restored per regeneration step.
    pub fn regen_rate(&self) -> u32 {
        1 + self.upgrades.energy_regen
    }

    /// Coins produced by one auto-tap: `floor(tap_power * 0.1 * level)`.
    pub fn auto_tap_power(&self) -> u64 {
        self.tap_power() * self.upgrades.auto_tapper as u64 / 10
    }

    pub fn auto_tapper_active(&self) -> bool {
        self.upgrades.auto_tapper > 0
    }

    /// Price of the next level of `kind`.
    pub fn upgrade_cost(&self, kind: UpgradeKind) -> u64 {
        kind.cost_at(self.upgrades.get(kind))
    }

    /// Energy fill ratio in `[0, 1]` for display.
    pub fn energy_ratio(&self) -> f64 {
        self.energy as f64 / self.max_energy() as f64
    }
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_record_matches_defaults() {
        let p = PlayerProgress::new();
        assert_eq!(p.coins, 0);
        assert_eq!(p.energy, 1_000);
        assert_eq!(p.max_energy(), 1_000);
        assert_eq!(p.tap_power(), 1);
        assert_eq!(p.level(), 1);
        assert_eq!(p.last_daily_bonus, None);
        assert_eq!(p.daily_bonus_streak, 0);
    }

    #[test]
    fn derived_stats_follow_sources() {
        let mut p = PlayerProgress::new();
        p.upgrades.tap_power = 4;
        p.upgrades.max_energy = 3;
        p.total_taps = 250;
        assert_eq!(p.tap_power(), 5);
        assert_eq!(p.max_energy(), 1_300);
        assert_eq!(p.level(), 3);
    }

    #[test]
    fn cost_curves_at_level_zero() {
        assert_eq!(UpgradeKind::TapPower.cost_at(0), 100);
        assert_eq!(UpgradeKind::MaxEnergy.cost_at(0), 200);
        assert_eq!(UpgradeKind::EnergyRegen.cost_at(0), 500);
        assert_eq!(UpgradeKind::AutoTapper.cost_at(0), 10_000);
    }

    #[test]
    fn cost_curves_floor_fractional_prices() {
        // 100 * 1.5^3 = 337.5
        assert_eq!(UpgradeKind::TapPower.cost_at(3), 337);
        // 200 * 1.4 = 280
        assert_eq!(UpgradeKind::MaxEnergy.cost_at(1), 280);
        // 500 * 1.6^1 = 800
        assert_eq!(UpgradeKind::EnergyRegen.cost_at(1), 800);
        // 10000 * 2^3 = 80000
        assert_eq!(UpgradeKind::AutoTapper.cost_at(3), 80_000);
    }

    #[test]
    fn cost_curve_keeps_float_rounding() {
        // 1.4^2 is 1.9599999999999997 in f64, so the price lands one below 392.
        assert_eq!(UpgradeKind::MaxEnergy.cost_at(2), 391);
    }

    #[test]
    fn auto_tap_power_truncates() {
        let mut p = PlayerProgress::new();
        p.upgrades.tap_power = 2; // tap power 3
        p.upgrades.auto_tapper = 2;
        assert_eq!(p.auto_tap_power(), 0);
        p.upgrades.auto_tapper = 4;
        assert_eq!(p.auto_tap_power(), 1);
        p.upgrades.tap_power = 9; // tap power 10
        p.upgrades.auto_tapper = 3;
        assert_eq!(p.auto_tap_power(), 3);
    }

    #[test]
    fn upgrade_kind_index_roundtrip() {
        for kind in UpgradeKind::all() {
            assert_eq!(UpgradeKind::from_index(kind.index()), Some(*kind));
        }
        assert_eq!(UpgradeKind::from_index(4), None);
    }

    #[test]
    fn maxed_checks_per_kind_limit() {
        let mut levels = UpgradeLevels::default();
        levels.auto_tapper = 10;
        levels.tap_power = 10;
        assert!(levels.is_maxed(UpgradeKind::AutoTapper));
        assert!(!levels.is_maxed(UpgradeKind::TapPower));
    }
}
