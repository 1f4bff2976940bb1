//! Hamster Tap セーブ/ロード機能。
//!
//! The record is stored as a flat JSON object under [`STORAGE_KEY`], one
//! field per `PlayerProgress` field in camelCase. Derived stats
//! (`maxEnergy`, `tapPower`, `level`) are written for readers of the raw
//! record but recomputed on load. There is no version field: missing
//! fields take their initial values and unknown fields are ignored.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calendar;
use super::state::{PlayerProgress, UpgradeKind, UpgradeLevels, MAX_BONUS_STREAK};

/// localStorage のキー。
pub const STORAGE_KEY: &str = "hamsterGame";

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value backend the record is persisted to.
pub trait ProgressStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
    fn remove(&mut self, key: &str) -> Result<(), SaveError>;
}

/// In-memory backend. Used when localStorage is unavailable, and in tests.
#[derive(Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Browser localStorage backend. WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self, SaveError> {
        let window = web_sys::window().ok_or(SaveError::Unavailable)?;
        let storage = window
            .local_storage()
            .map_err(|e| SaveError::Storage(format!("{e:?}")))?
            .ok_or(SaveError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl ProgressStorage for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        self.storage
            .get_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.storage
            .remove_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }
}

/// JSON mirror of `PlayerProgress`.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase", default)]
struct ProgressRecord {
    coins: u64,
    energy: u32,
    max_energy: u32,
    tap_power: u64,
    level: u64,
    total_taps: u64,
    total_coins_earned: u64,
    #[serde(with = "calendar::date_string")]
    last_daily_bonus: Option<NaiveDate>,
    daily_bonus_streak: u32,
    upgrades: UpgradeRecord,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct UpgradeRecord {
    tap_power: u32,
    max_energy: u32,
    energy_regen: u32,
    auto_tapper: u32,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        extract_record(&PlayerProgress::new())
    }
}

fn extract_record(state: &PlayerProgress) -> ProgressRecord {
    ProgressRecord {
        coins: state.coins,
        energy: state.energy,
        max_energy: state.max_energy(),
        tap_power: state.tap_power(),
        level: state.level(),
        total_taps: state.total_taps,
        total_coins_earned: state.total_coins_earned,
        last_daily_bonus: state.last_daily_bonus,
        daily_bonus_streak: state.daily_bonus_streak,
        upgrades: UpgradeRecord {
            tap_power: state.upgrades.tap_power,
            max_energy: state.upgrades.max_energy,
            energy_regen: state.upgrades.energy_regen,
            auto_tapper: state.upgrades.auto_tapper,
        },
    }
}

/// Rebuild the record, clamping anything outside its invariants.
fn apply_record(record: &ProgressRecord) -> PlayerProgress {
    let mut upgrades = UpgradeLevels {
        tap_power: record.upgrades.tap_power,
        max_energy: record.upgrades.max_energy,
        energy_regen: record.upgrades.energy_regen,
        auto_tapper: record.upgrades.auto_tapper,
    };
    for kind in UpgradeKind::all() {
        let level = upgrades.get_mut(*kind);
        if *level > kind.max_level() {
            log::warn!(
                "Hamster Tap: {:?} level {} above max {}, clamping",
                kind,
                *level,
                kind.max_level()
            );
            *level = kind.max_level();
        }
    }

    let mut state = PlayerProgress {
        coins: record.coins,
        energy: record.energy,
        total_taps: record.total_taps,
        total_coins_earned: record.total_coins_earned,
        last_daily_bonus: record.last_daily_bonus,
        daily_bonus_streak: record.daily_bonus_streak,
        upgrades,
    };

    if state.energy > state.max_energy() {
        log::warn!(
            "Hamster Tap: energy {} above capacity {}, clamping",
            state.energy,
            state.max_energy()
        );
        state.energy = state.max_energy();
    }
    if state.daily_bonus_streak > MAX_BONUS_STREAK {
        log::warn!(
            "Hamster Tap: streak {} above cap, clamping",
            state.daily_bonus_streak
        );
        state.daily_bonus_streak = MAX_BONUS_STREAK;
    }
    if record.max_energy != state.max_energy()
        || record.tap_power != state.tap_power()
        || record.level != state.level()
    {
        log::debug!("Hamster Tap: stored derived stats disagreed with sources, recomputed");
    }
    state
}

pub fn encode(state: &PlayerProgress) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&extract_record(state))?)
}

pub fn decode(json: &str) -> Result<PlayerProgress, SaveError> {
    let record: ProgressRecord = serde_json::from_str(json)?;
    Ok(apply_record(&record))
}

/// Overwrite the stored record.
pub fn save_progress(
    storage: &mut dyn ProgressStorage,
    state: &PlayerProgress,
) -> Result<(), SaveError> {
    let json = encode(state)?;
    storage.write(STORAGE_KEY, &json)
}

/// Read the stored record once at start-up.
/// Absent, unreadable or malformed data yields the initial record.
pub fn load_progress(storage: &mut dyn ProgressStorage) -> PlayerProgress {
    let json = match storage.read(STORAGE_KEY) {
        Ok(Some(j)) => j,
        Ok(None) => {
            log::info!("Hamster Tap: no saved progress, starting fresh");
            return PlayerProgress::new();
        }
        Err(e) => {
            log::warn!("Hamster Tap: could not read saved progress: {e}");
            return PlayerProgress::new();
        }
    };

    match decode(&json) {
        Ok(state) => {
            log::info!(
                "Hamster Tap: restored progress (coins={}, taps={})",
                state.coins,
                state.total_taps
            );
            state
        }
        Err(e) => {
            log::warn!("Hamster Tap: セーブデータのパースに失敗（破棄します）: {e}");
            // 壊れたデータを削除
            if let Err(e) = storage.remove(STORAGE_KEY) {
                log::warn!("Hamster Tap: could not remove broken save: {e}");
            }
            PlayerProgress::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Storage whose every call fails.
    struct BrokenStorage;

    impl ProgressStorage for BrokenStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, SaveError> {
            Err(SaveError::Unavailable)
        }
        fn write(&mut self, _key: &str, _value: &str) -> Result<(), SaveError> {
            Err(SaveError::Storage("quota exceeded".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<(), SaveError> {
            Err(SaveError::Unavailable)
        }
    }

    #[test]
    fn encode_uses_camel_case_field_names() {
        let mut state = PlayerProgress::new();
        state.upgrades.energy_regen = 2;
        state.last_daily_bonus = Some(day(2026, 10, 19));
        let value: serde_json::Value = serde_json::from_str(&encode(&state).unwrap()).unwrap();
        assert_eq!(value["maxEnergy"], 1_000);
        assert_eq!(value["tapPower"], 1);
        assert_eq!(value["level"], 1);
        assert_eq!(value["totalCoinsEarned"], 0);
        assert_eq!(value["lastDailyBonus"], "Mon Oct 19 2026");
        assert_eq!(value["dailyBonusStreak"], 0);
        assert_eq!(value["upgrades"]["energyRegen"], 2);
        assert_eq!(value["upgrades"]["autoTapper"], 0);
    }

    #[test]
    fn never_claimed_is_empty_string() {
        let json = encode(&PlayerProgress::new()).unwrap();
        assert!(json.contains(r#""lastDailyBonus":"""#));
    }

    #[test]
    fn save_then_load_restores_record() {
        let mut original = PlayerProgress::new();
        original.coins = 12_345;
        original.energy = 640;
        original.total_taps = 321;
        original.total_coins_earned = 50_000;
        original.last_daily_bonus = Some(day(2026, 10, 18));
        original.daily_bonus_streak = 5;
        original.upgrades.tap_power = 7;
        original.upgrades.max_energy = 2;
        original.upgrades.auto_tapper = 1;

        let mut storage = MemoryStorage::new();
        save_progress(&mut storage, &original).unwrap();
        assert_eq!(load_progress(&mut storage), original);
    }

    #[test]
    fn loads_record_written_by_browser_build() {
        let json = r#"{
            "coins": 2500,
            "energy": 870,
            "maxEnergy": 1100,
            "tapPower": 3,
            "level": 4,
            "totalTaps": 345,
            "totalCoinsEarned": 9100,
            "lastDailyBonus": "Sun Oct 18 2026",
            "dailyBonusStreak": 3,
            "upgrades": { "tapPower": 2, "maxEnergy": 1, "energyRegen": 0, "autoTapper": 0 }
        }"#;
        let state = decode(json).unwrap();
        assert_eq!(state.coins, 2_500);
        assert_eq!(state.energy, 870);
        assert_eq!(state.max_energy(), 1_100);
        assert_eq!(state.tap_power(), 3);
        assert_eq!(state.level(), 4);
        assert_eq!(state.last_daily_bonus, Some(day(2026, 10, 18)));
        assert_eq!(state.daily_bonus_streak, 3);
    }

    #[test]
    fn stored_derived_stats_are_recomputed() {
        let json = r#"{"tapPower": 99, "maxEnergy": 5, "level": 80, "totalTaps": 150,
                       "upgrades": {"tapPower": 1}}"#;
        let state = decode(json).unwrap();
        assert_eq!(state.tap_power(), 2);
        assert_eq!(state.max_energy(), 1_000);
        assert_eq!(state.level(), 2);
    }

    #[test]
    fn missing_fields_take_initial_values() {
        let state = decode(r#"{"coins": 10}"#).unwrap();
        assert_eq!(state.coins, 10);
        assert_eq!(state.energy, 1_000);
        assert_eq!(state.last_daily_bonus, None);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let json = r#"{"energy": 5000, "dailyBonusStreak": 12,
                       "upgrades": {"autoTapper": 40, "maxEnergy": 1}}"#;
        let state = decode(json).unwrap();
        assert_eq!(state.energy, 1_100);
        assert_eq!(state.daily_bonus_streak, 7);
        assert_eq!(state.upgrades.auto_tapper, 10);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let state = decode(r#"{"coins": 3, "futureField": [1, 2, 3]}"#).unwrap();
        assert_eq!(state.coins, 3);
    }

    #[test]
    fn absent_key_loads_initial_record() {
        let mut storage = MemoryStorage::new();
        assert_eq!(load_progress(&mut storage), PlayerProgress::new());
    }

    #[test]
    fn malformed_json_loads_initial_and_clears_key() {
        let mut storage = MemoryStorage::new();
        storage.write(STORAGE_KEY, "{not json").unwrap();
        assert_eq!(load_progress(&mut storage), PlayerProgress::new());
        assert_eq!(storage.read(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn negative_coins_are_malformed() {
        let mut storage = MemoryStorage::new();
        storage.write(STORAGE_KEY, r#"{"coins": -5}"#).unwrap();
        assert_eq!(load_progress(&mut storage), PlayerProgress::new());
    }

    #[test]
    fn unreadable_storage_loads_initial_record() {
        let mut storage = BrokenStorage;
        assert_eq!(load_progress(&mut storage), PlayerProgress::new());
    }

    #[test]
    fn write_failure_is_reported() {
        let mut storage = BrokenStorage;
        let err = save_progress(&mut storage, &PlayerProgress::new()).unwrap_err();
        assert!(matches!(err, SaveError::Storage(_)));
    }

    #[test]
    fn unparseable_bonus_date_reads_as_never_claimed() {
        let state = decode(r#"{"lastDailyBonus": "someday"}"#).unwrap();
        assert_eq!(state.last_daily_bonus, None);
    }
}
