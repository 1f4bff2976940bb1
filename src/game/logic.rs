//! Hamster Tap game logic — pure functions over `PlayerProgress`.
//!
//! Every transition returns `true` when it changed the record. Invalid
//! requests (no energy, not enough coins, bonus already claimed, upgrade
//! already maxed) leave the record untouched and return `false`.

use chrono::NaiveDate;

use super::calendar;
use super::state::{PlayerProgress, UpgradeKind, BONUS_PER_STREAK_DAY, MAX_BONUS_STREAK};

/// Every way the record can change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Tap,
    PurchaseUpgrade(UpgradeKind),
    ClaimDailyBonus,
    /// Periodic energy regeneration step.
    RegenerateEnergy,
    /// Periodic auto-tapper step.
    AutoTap,
}

/// Apply one action. The only entry point the store uses.
pub fn apply(state: &mut PlayerProgress, action: &Action, today: NaiveDate) -> bool {
    match action {
        Action::Tap => tap(state),
        Action::PurchaseUpgrade(kind) => purchase_upgrade(state, *kind),
        Action::ClaimDailyBonus => claim_daily_bonus(state, today),
        Action::RegenerateEnergy => regenerate_energy(state),
        Action::AutoTap => auto_tap(state),
    }
}

/// Manual tap: spend one energy for `tap_power` coins.
pub fn tap(state: &mut PlayerProgress) -> bool {
    if state.energy == 0 {
        return false;
    }
    let power = state.tap_power();
    state.energy = state.energy.saturating_sub(1);
    state.coins = state.coins.saturating_add(power);
    state.total_coins_earned = state.total_coins_earned.saturating_add(power);
    state.total_taps += 1;
    true
}

/// Buy the next level of `kind` at its current price.
pub fn purchase_upgrade(state: &mut PlayerProgress, kind: UpgradeKind) -> bool {
    if state.upgrades.is_maxed(kind) {
        return false;
    }
    let cost = state.upgrade_cost(kind);
    if state.coins < cost {
        return false;
    }
    state.coins -= cost;
    *state.upgrades.get_mut(kind) += 1;
    // Capacity grows but current energy is not topped up.
    true
}

/// Streak the player would reach by claiming on `today`.
/// `None` when today's bonus is already claimed.
pub fn next_streak(state: &PlayerProgress, today: NaiveDate) -> Option<u32> {
    match state.last_daily_bonus {
        Some(last) if last == today => None,
        Some(last) if Some(last) == calendar::yesterday_of(today) => {
            Some((state.daily_bonus_streak + 1).min(MAX_BONUS_STREAK))
        }
        _ => Some(1),
    }
}

pub fn bonus_for_streak(streak: u32) -> u64 {
    streak as u64 * BONUS_PER_STREAK_DAY
}

pub fn can_claim_daily_bonus(state: &PlayerProgress, today: NaiveDate) -> bool {
    state.last_daily_bonus != Some(today)
}

/// Amount a claim made on `today` would grant.
///
/// After today's claim this reports the day-one amount, which is what the
/// streak-continuation rule yields when `last == today` is not "yesterday".
pub fn next_bonus_amount(state: &PlayerProgress, today: NaiveDate) -> u64 {
    bonus_for_streak(next_streak(state, today).unwrap_or(1))
}

pub fn claim_daily_bonus(state: &mut PlayerProgress, today: NaiveDate) -> bool {
    let streak = match next_streak(state, today) {
        Some(s) => s,
        None => return false,
    };
    let bonus = bonus_for_streak(streak);
    state.coins = state.coins.saturating_add(bonus);
    state.total_coins_earned = state.total_coins_earned.saturating_add(bonus);
    state.last_daily_bonus = Some(today);
    state.daily_bonus_streak = streak;
    true
}

/// One regeneration step, capped at capacity.
pub fn regenerate_energy(state: &mut PlayerProgress) -> bool {
    let max = state.max_energy();
    if state.energy >= max {
        return false;
    }
    state.energy = state.energy.saturating_add(state.regen_rate()).min(max);
    true
}

/// One auto-tapper step. Does not count as a tap.
pub fn auto_tap(state: &mut PlayerProgress) -> bool {
    if !state.auto_tapper_active() || state.energy == 0 {
        return false;
    }
    let power = state.auto_tap_power();
    state.coins = state.coins.saturating_add(power);
    state.total_coins_earned = state.total_coins_earned.saturating_add(power);
    state.energy = state.energy.saturating_sub(1);
    true
}

/// Format a number with commas (e.g. 1234567 → "1,234,567").
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
