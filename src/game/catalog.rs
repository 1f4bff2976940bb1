/// Static upgrade and achievement definitions shown by the view.

use super::state::{PlayerProgress, UpgradeKind};

/// Display data for one upgrade track.
pub struct UpgradeDef {
    pub kind: UpgradeKind,
    pub name: &'static str,
    pub description: &'static str,
}

pub const UPGRADES: &[UpgradeDef] = &[
    UpgradeDef {
        kind: UpgradeKind::TapPower,
        name: "Tap Power",
        description: "Increase coins per tap",
    },
    UpgradeDef {
        kind: UpgradeKind::MaxEnergy,
        name: "Max Energy",
        description: "Increase maximum energy",
    },
    UpgradeDef {
        kind: UpgradeKind::EnergyRegen,
        name: "Energy Regeneration",
        description: "Faster energy recovery",
    },
    UpgradeDef {
        kind: UpgradeKind::AutoTapper,
        name: "Auto Tapper",
        description: "Automatically tap for you",
    },
];

impl UpgradeDef {
    /// Current effect summary, e.g. "+3 coins per tap".
    pub fn effect(&self, state: &PlayerProgress) -> String {
        let level = state.upgrades.get(self.kind);
        match self.kind {
            UpgradeKind::TapPower => format!("+{} coins per tap", level),
            UpgradeKind::MaxEnergy => format!("+{} max energy", level * 100),
            UpgradeKind::EnergyRegen => format!("+{} energy/second", level),
            UpgradeKind::AutoTapper => {
                if level > 0 {
                    "Active".to_string()
                } else {
                    "Inactive".to_string()
                }
            }
        }
    }
}

/// What an achievement measures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AchievementMetric {
    TotalTaps,
    TotalCoinsEarned,
}

pub struct AchievementDef {
    pub name: &'static str,
    pub description: &'static str,
    pub metric: AchievementMetric,
    pub target: u64,
    /// Displayed only; never paid out.
    pub reward: u64,
}

pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        name: "First Tap",
        description: "Tap the hamster for the first time",
        metric: AchievementMetric::TotalTaps,
        target: 1,
        reward: 100,
    },
    AchievementDef {
        name: "Tap Master",
        description: "Tap 100 times",
        metric: AchievementMetric::TotalTaps,
        target: 100,
        reward: 1_000,
    },
    AchievementDef {
        name: "Tap Legend",
        description: "Tap 1,000 times",
        metric: AchievementMetric::TotalTaps,
        target: 1_000,
        reward: 5_000,
    },
    AchievementDef {
        name: "Rich Hamster",
        description: "Earn 10,000 coins",
        metric: AchievementMetric::TotalCoinsEarned,
        target: 10_000,
        reward: 2_000,
    },
];

impl AchievementDef {
    pub fn progress(&self, state: &PlayerProgress) -> u64 {
        match self.metric {
            AchievementMetric::TotalTaps => state.total_taps,
            AchievementMetric::TotalCoinsEarned => state.total_coins_earned,
        }
    }

    pub fn is_completed(&self, state: &PlayerProgress) -> bool {
        self.progress(state) >= self.target
    }

    /// Progress ratio clamped to `[0, 1]`.
    pub fn ratio(&self, state: &PlayerProgress) -> f64 {
        (self.progress(state) as f64 / self.target as f64).min(1.0)
    }
}

pub fn completed_achievements(state: &PlayerProgress) -> usize {
    ACHIEVEMENTS.iter().filter(|a| a.is_completed(state)).count()
}
