//! Semantic action IDs for Hamster Tap click targets.
//!
//! Registered during render and dispatched back via `InputEvent::Click`.

use super::state::UpgradeKind;

// ── Core actions ────────────────────────────────────────────────
pub const TAP_HAMSTER: u16 = 0;
pub const OPEN_BONUS: u16 = 1;
pub const CLAIM_BONUS: u16 = 2;
pub const CLOSE_BONUS: u16 = 3;

// ── Tab navigation ──────────────────────────────────────────────
pub const TAB_HOME: u16 = 10;
pub const TAB_SHOP: u16 = 11;
pub const TAB_ACHIEVEMENTS: u16 = 12;
pub const TAB_PROFILE: u16 = 13;

// ── Upgrade purchase (base + upgrade index 0..3) ────────────────
pub const BUY_UPGRADE_BASE: u16 = 100;

pub fn buy_upgrade(kind: UpgradeKind) -> u16 {
    BUY_UPGRADE_BASE + kind.index() as u16
}

/// Upgrade addressed by a purchase action ID.
pub fn upgrade_for(action_id: u16) -> Option<UpgradeKind> {
    let idx = action_id.checked_sub(BUY_UPGRADE_BASE)?;
    UpgradeKind::from_index(idx as usize)
}
