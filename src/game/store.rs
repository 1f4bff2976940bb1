//! The authoritative owner of `PlayerProgress`.
//!
//! Every change goes through [`GameStateStore::dispatch`]: one
//! read-modify-replace step via `logic::apply`, then a full write to
//! storage when the record changed. The two background timers feed the
//! same path, so no transition can observe another half-done.

use chrono::NaiveDate;

use crate::bridge::{HapticEffect, HostBridge};
use crate::time::{Interval, TICKS_PER_SEC};

use super::logic::{self, Action};
use super::save::{self, ProgressStorage};
use super::state::{PlayerProgress, UpgradeKind};

/// Energy regenerates once per second.
pub const ENERGY_REGEN_PERIOD_TICKS: u32 = TICKS_PER_SEC;
/// Auto-tapper fires every two seconds.
pub const AUTO_TAP_PERIOD_TICKS: u32 = 2 * TICKS_PER_SEC;

/// Source of "today" on the local calendar.
pub type DayClock = Box<dyn Fn() -> NaiveDate>;

pub struct GameStateStore {
    state: PlayerProgress,
    storage: Box<dyn ProgressStorage>,
    host: Box<dyn HostBridge>,
    clock: DayClock,
    regen_timer: Interval,
    auto_tap_timer: Interval,
}

impl GameStateStore {
    /// Restore the saved record (or start fresh) and arm both timers.
    pub fn open(
        mut storage: Box<dyn ProgressStorage>,
        host: Box<dyn HostBridge>,
        clock: DayClock,
    ) -> Self {
        let state = save::load_progress(storage.as_mut());
        Self {
            state,
            storage,
            host,
            clock,
            regen_timer: Interval::new(ENERGY_REGEN_PERIOD_TICKS),
            auto_tap_timer: Interval::new(AUTO_TAP_PERIOD_TICKS),
        }
    }

    pub fn state(&self) -> &PlayerProgress {
        &self.state
    }

    pub fn host(&self) -> &dyn HostBridge {
        self.host.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Apply one action; persists when the record changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let today = self.today();
        if !logic::apply(&mut self.state, &action, today) {
            return false;
        }

        match action {
            Action::Tap => self.host.haptic(HapticEffect::LightImpact),
            Action::PurchaseUpgrade(kind) => {
                self.host.haptic(HapticEffect::Success);
                // Auto-tap output depends on both levels; restart its period.
                if matches!(kind, UpgradeKind::TapPower | UpgradeKind::AutoTapper) {
                    self.auto_tap_timer.reset();
                }
                log::info!(
                    "Hamster Tap: {:?} upgraded to level {}",
                    kind,
                    self.state.upgrades.get(kind)
                );
            }
            Action::ClaimDailyBonus => log::info!(
                "Hamster Tap: daily bonus claimed (streak {})",
                self.state.daily_bonus_streak
            ),
            Action::RegenerateEnergy | Action::AutoTap => {}
        }

        self.persist();
        true
    }

    pub fn tap(&mut self) -> bool {
        self.dispatch(Action::Tap)
    }

    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> bool {
        self.dispatch(Action::PurchaseUpgrade(kind))
    }

    pub fn claim_daily_bonus(&mut self) -> bool {
        self.dispatch(Action::ClaimDailyBonus)
    }

    pub fn can_claim_daily_bonus(&self) -> bool {
        logic::can_claim_daily_bonus(&self.state, self.today())
    }

    pub fn next_bonus_amount(&self) -> u64 {
        logic::next_bonus_amount(&self.state, self.today())
    }

    /// Advance both background timers by `delta_ticks`.
    pub fn tick(&mut self, delta_ticks: u32) {
        if delta_ticks == 0 {
            return;
        }
        for _ in 0..self.regen_timer.advance(delta_ticks) {
            self.dispatch(Action::RegenerateEnergy);
        }
        if self.state.auto_tapper_active() {
            for _ in 0..self.auto_tap_timer.advance(delta_ticks) {
                self.dispatch(Action::AutoTap);
            }
        } else {
            self.auto_tap_timer.reset();
        }
    }

    fn persist(&mut self) {
        if let Err(e) = save::save_progress(self.storage.as_mut(), &self.state) {
            log::warn!("Hamster Tap: localStorage への保存に失敗: {e}");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::game::save::STORAGE_KEY;

    fn stored(h: &Harness) -> Option<PlayerProgress> {
        let json = h.storage.0.borrow().read(STORAGE_KEY).unwrap()?;
        save::decode(&json).ok()
    }

    #[test]
    fn fresh_store_starts_from_initial_record() {
        let h = harness();
        assert_eq!(h.store.state(), &PlayerProgress::new());
    }

    #[test]
    fn tap_persists_and_fires_light_haptic() {
        let mut h = harness();
        assert!(h.store.tap());
        assert_eq!(stored(&h).unwrap().coins, 1);
        assert_eq!(*h.host.effects.borrow(), vec![HapticEffect::LightImpact]);
    }

    #[test]
    fn rejected_actions_do_not_persist_or_vibrate() {
        let mut h = harness();
        assert!(!h.store.purchase_upgrade(UpgradeKind::AutoTapper));
        assert!(stored(&h).is_none());
        assert!(h.host.effects.borrow().is_empty());
    }

    #[test]
    fn successful_purchase_fires_success_haptic() {
        let mut h = harness();
        for _ in 0..100 {
            h.store.tap();
        }
        h.host.effects.borrow_mut().clear();
        assert!(h.store.purchase_upgrade(UpgradeKind::TapPower));
        assert_eq!(h.store.state().tap_power(), 2);
        assert_eq!(h.store.state().coins, 0);
        assert_eq!(*h.host.effects.borrow(), vec![HapticEffect::Success]);
    }

    #[test]
    fn reopening_restores_saved_progress() {
        let mut h = harness();
        h.store.tap();
        h.store.claim_daily_bonus();
        let saved = h.store.state().clone();

        let reopened = harness_with(h.storage.clone());
        assert_eq!(reopened.store.state(), &saved);
    }

    #[test]
    fn daily_bonus_follows_injected_clock() {
        let mut h = harness();
        assert!(h.store.can_claim_daily_bonus());
        assert!(h.store.claim_daily_bonus());
        assert!(!h.store.can_claim_daily_bonus());
        assert!(!h.store.claim_daily_bonus());

        h.day.set(h.day.get().succ_opt().unwrap());
        assert!(h.store.can_claim_daily_bonus());
        assert_eq!(h.store.next_bonus_amount(), 2_000);
        h.store.claim_daily_bonus();
        assert_eq!(h.store.state().daily_bonus_streak, 2);
        assert_eq!(h.store.state().coins, 3_000);
    }

    #[test]
    fn regen_fires_once_per_second() {
        let mut h = harness();
        for _ in 0..5 {
            h.store.tap();
        }
        assert_eq!(h.store.state().energy, 995);
        h.store.tick(ENERGY_REGEN_PERIOD_TICKS - 1);
        assert_eq!(h.store.state().energy, 995);
        h.store.tick(1);
        assert_eq!(h.store.state().energy, 996);
        h.store.tick(ENERGY_REGEN_PERIOD_TICKS * 3);
        assert_eq!(h.store.state().energy, 999);
        assert_eq!(stored(&h).unwrap().energy, 999);
    }

    #[test]
    fn auto_tap_idle_without_upgrade() {
        let mut h = harness();
        h.store.tick(AUTO_TAP_PERIOD_TICKS * 5);
        assert_eq!(h.store.state(), &PlayerProgress::new());
        assert!(stored(&h).is_none());
    }

    #[test]
    fn auto_tap_fires_every_two_seconds() {
        let mut storage = SharedStorage::default();
        let mut seeded = PlayerProgress::new();
        seeded.upgrades.auto_tapper = 5;
        seeded.upgrades.tap_power = 9; // 10 * 0.1 * 5 = 5 coins per auto-tap
        seeded.energy = 500;
        save::save_progress(&mut storage, &seeded).unwrap();

        let mut h = harness_with(storage);
        h.store.tick(AUTO_TAP_PERIOD_TICKS - 1);
        assert_eq!(h.store.state().coins, 0);
        h.store.tick(1);
        assert_eq!(h.store.state().coins, 5);
        assert_eq!(h.store.state().total_taps, 0);
        // 2 regen steps (+2) and 1 auto-tap (-1)
        assert_eq!(h.store.state().energy, 501);
    }

    #[test]
    fn buying_auto_tapper_restarts_its_period() {
        let mut storage = SharedStorage::default();
        let mut seeded = PlayerProgress::new();
        seeded.coins = 50_000;
        seeded.upgrades.auto_tapper = 1;
        seeded.upgrades.tap_power = 19; // 20 * 0.1 * 1 = 2
        save::save_progress(&mut storage, &seeded).unwrap();

        let mut h = harness_with(storage);
        h.store.tick(AUTO_TAP_PERIOD_TICKS - 1);
        assert!(h.store.purchase_upgrade(UpgradeKind::AutoTapper));
        let coins = h.store.state().coins;
        h.store.tick(1);
        assert_eq!(h.store.state().coins, coins);
        h.store.tick(AUTO_TAP_PERIOD_TICKS - 1);
        assert_eq!(h.store.state().coins, coins + 4);
    }
}
