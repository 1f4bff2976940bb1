//! Hamster Tap: tap the hamster for coins, spend them on upgrades, and come
//! back every day for the streak bonus.
//!
//! [`TapGame`] pairs the persisted [`store::GameStateStore`] with view-only
//! [`UiState`] (active tab, bonus panel, tap effects) and turns input
//! events into store calls.

pub mod actions;
pub mod calendar;
pub mod catalog;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;
pub mod store;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::bridge::HapticEffect;
use crate::input::{ClickState, InputEvent};
use crate::time::{FrameTicks, TICKS_PER_SEC};

use state::UpgradeKind;
use store::GameStateStore;

/// Delay before a claimable bonus is offered on its own.
pub const BONUS_PROMPT_DELAY_TICKS: u32 = 2 * TICKS_PER_SEC;
const TAP_FLASH_TICKS: u32 = 2;
const PARTICLE_LIFE_TICKS: u32 = TICKS_PER_SEC;
const MAX_PARTICLES: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Home,
    Shop,
    Achievements,
    Profile,
}

impl Tab {
    pub fn all() -> [Tab; 4] {
        [Tab::Home, Tab::Shop, Tab::Achievements, Tab::Profile]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Shop => "Shop",
            Tab::Achievements => "Achievements",
            Tab::Profile => "Profile",
        }
    }

    pub fn action_id(&self) -> u16 {
        match self {
            Tab::Home => actions::TAB_HOME,
            Tab::Shop => actions::TAB_SHOP,
            Tab::Achievements => actions::TAB_ACHIEVEMENTS,
            Tab::Profile => actions::TAB_PROFILE,
        }
    }

    fn from_action(action_id: u16) -> Option<Tab> {
        Tab::all().into_iter().find(|t| t.action_id() == action_id)
    }
}

/// A floating "+N" rising from the hamster.
#[derive(Clone, Debug)]
pub struct Particle {
    pub text: String,
    /// Column offset from the center of the hamster.
    pub col_offset: i16,
    /// Remaining lifetime in ticks.
    pub life: u32,
    pub max_life: u32,
}

/// View state. Never persisted.
pub struct UiState {
    pub tab: Tab,
    pub show_bonus: bool,
    pub tap_flash: u32,
    pub particles: Vec<Particle>,
    /// Ticks left before the bonus panel opens by itself; `None` once the
    /// panel has been shown this session.
    pub bonus_prompt: Option<u32>,
    pub anim_frame: u32,
    rng_state: u32,
}

impl UiState {
    fn new() -> Self {
        Self {
            tab: Tab::Home,
            show_bonus: false,
            tap_flash: 0,
            particles: Vec::new(),
            bonus_prompt: Some(BONUS_PROMPT_DELAY_TICKS),
            anim_frame: 0,
            rng_state: 42,
        }
    }

    /// xorshift32
    fn next_random(&mut self) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }
}

pub struct TapGame {
    pub store: GameStateStore,
    pub ui: UiState,
}

impl TapGame {
    pub fn new(store: GameStateStore) -> Self {
        Self {
            store,
            ui: UiState::new(),
        }
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        }
    }

    fn handle_key(&mut self, key: char) -> bool {
        match key {
            ' ' | 't' => {
                self.tap();
                true
            }
            'h' => self.select_tab(Tab::Home),
            's' => self.select_tab(Tab::Shop),
            'a' => self.select_tab(Tab::Achievements),
            'p' => self.select_tab(Tab::Profile),
            '1'..='4' if self.ui.tab == Tab::Shop && !self.ui.show_bonus => {
                if let Some(kind) = UpgradeKind::from_index((key as u8 - b'1') as usize) {
                    self.store.purchase_upgrade(kind);
                }
                true
            }
            'b' => {
                if self.ui.show_bonus {
                    self.close_bonus();
                } else {
                    self.open_bonus();
                }
                true
            }
            'c' if self.ui.show_bonus => {
                self.claim_bonus();
                true
            }
            _ => false,
        }
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        match action_id {
            actions::TAP_HAMSTER => self.tap(),
            actions::OPEN_BONUS => self.open_bonus(),
            actions::CLOSE_BONUS => self.close_bonus(),
            actions::CLAIM_BONUS => self.claim_bonus(),
            id if id >= actions::BUY_UPGRADE_BASE => match actions::upgrade_for(id) {
                Some(kind) => {
                    self.store.purchase_upgrade(kind);
                }
                None => return false,
            },
            id => match Tab::from_action(id) {
                Some(tab) => {
                    self.select_tab(tab);
                }
                None => return false,
            },
        }
        true
    }

    fn tap(&mut self) {
        if !self.store.tap() {
            return;
        }
        self.ui.tap_flash = TAP_FLASH_TICKS;

        let col_offset = (self.ui.next_random() % 13) as i16 - 6; // -6..+6
        let text = format!("+{}", logic::format_number(self.store.state().tap_power()));
        self.ui.particles.push(Particle {
            text,
            col_offset,
            life: PARTICLE_LIFE_TICKS,
            max_life: PARTICLE_LIFE_TICKS,
        });
        if self.ui.particles.len() > MAX_PARTICLES {
            self.ui.particles.remove(0);
        }
    }

    fn select_tab(&mut self, tab: Tab) -> bool {
        self.ui.show_bonus = false;
        if self.ui.tab != tab {
            self.ui.tab = tab;
            self.store.host().haptic(HapticEffect::SelectionChanged);
        }
        true
    }

    fn open_bonus(&mut self) {
        self.ui.show_bonus = true;
        self.ui.bonus_prompt = None;
    }

    fn close_bonus(&mut self) {
        self.ui.show_bonus = false;
    }

    fn claim_bonus(&mut self) {
        if self.store.claim_daily_bonus() {
            self.ui.show_bonus = false;
        }
    }

    /// Advance timers and effects by the same number of ticks.
    #[cfg(test)]
    pub fn tick(&mut self, delta_ticks: u32) {
        self.advance(FrameTicks {
            world: delta_ticks,
            ui: delta_ticks,
        });
    }

    /// Game timers follow `frame.world`; animations and the bonus prompt
    /// follow the clamped `frame.ui`.
    pub fn advance(&mut self, frame: FrameTicks) {
        self.store.tick(frame.world);
        self.tick_ui(frame.ui);
    }

    fn tick_ui(&mut self, delta_ticks: u32) {
        if delta_ticks == 0 {
            return;
        }
        self.ui.anim_frame = self.ui.anim_frame.wrapping_add(delta_ticks);
        self.ui.tap_flash = self.ui.tap_flash.saturating_sub(delta_ticks);
        for p in &mut self.ui.particles {
            p.life = p.life.saturating_sub(delta_ticks);
        }
        self.ui.particles.retain(|p| p.life > 0);

        // Counts down only while a bonus is waiting for a player who has tapped.
        if let Some(left) = self.ui.bonus_prompt {
            if self.store.can_claim_daily_bonus() && self.store.state().total_taps > 0 {
                let left = left.saturating_sub(delta_ticks);
                if left == 0 {
                    self.open_bonus();
                } else {
                    self.ui.bonus_prompt = Some(left);
                }
            }
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}

#[cfg(test)]
mod tests {
    use super::store::test_support::{self, Harness, RecordingHost, SharedStorage};
    use super::*;

    fn game_with(storage: SharedStorage) -> (TapGame, RecordingHost) {
        let Harness { store, host, .. } = test_support::harness_with(storage);
        (TapGame::new(store), host)
    }

    fn game() -> (TapGame, RecordingHost) {
        game_with(SharedStorage::default())
    }

    fn seeded(edit: impl FnOnce(&mut state::PlayerProgress)) -> SharedStorage {
        let mut storage = SharedStorage::default();
        let mut progress = state::PlayerProgress::new();
        edit(&mut progress);
        save::save_progress(&mut storage, &progress).unwrap();
        storage
    }

    #[test]
    fn space_and_click_both_tap() {
        let (mut g, _h) = game();
        assert!(g.handle_input(&InputEvent::Key(' ')));
        assert!(g.handle_input(&InputEvent::Click(actions::TAP_HAMSTER)));
        assert_eq!(g.store.state().total_taps, 2);
        assert_eq!(g.store.state().coins, 2);
    }

    #[test]
    fn tap_spawns_particle_and_flash() {
        let (mut g, _h) = game();
        g.handle_input(&InputEvent::Key('t'));
        assert_eq!(g.ui.particles.len(), 1);
        assert_eq!(g.ui.particles[0].text, "+1");
        assert!((-6..=6).contains(&g.ui.particles[0].col_offset));
        assert_eq!(g.ui.tap_flash, TAP_FLASH_TICKS);

        g.tick(PARTICLE_LIFE_TICKS);
        assert!(g.ui.particles.is_empty());
        assert_eq!(g.ui.tap_flash, 0);
    }

    #[test]
    fn tap_without_energy_has_no_effects() {
        let (mut g, host) = game_with(seeded(|p| p.energy = 0));
        g.handle_input(&InputEvent::Key(' '));
        assert!(g.ui.particles.is_empty());
        assert_eq!(g.ui.tap_flash, 0);
        assert!(host.effects.borrow().is_empty());
    }

    #[test]
    fn particles_are_capped() {
        let (mut g, _h) = game();
        for _ in 0..(MAX_PARTICLES + 5) {
            g.handle_input(&InputEvent::Key(' '));
        }
        assert_eq!(g.ui.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn tab_change_fires_selection_haptic_once() {
        let (mut g, host) = game();
        g.handle_input(&InputEvent::Click(actions::TAB_SHOP));
        assert_eq!(g.ui.tab, Tab::Shop);
        g.handle_input(&InputEvent::Key('s'));
        assert_eq!(
            *host.effects.borrow(),
            vec![HapticEffect::SelectionChanged]
        );
        g.handle_input(&InputEvent::Key('p'));
        assert_eq!(g.ui.tab, Tab::Profile);
        assert_eq!(host.effects.borrow().len(), 2);
    }

    #[test]
    fn number_keys_buy_only_in_shop() {
        let (mut g, _h) = game_with(seeded(|p| p.coins = 1_000));
        g.handle_input(&InputEvent::Key('1'));
        assert_eq!(g.store.state().upgrades.tap_power, 0);

        g.handle_input(&InputEvent::Key('s'));
        g.handle_input(&InputEvent::Key('1'));
        assert_eq!(g.store.state().upgrades.tap_power, 1);
        assert_eq!(g.store.state().coins, 900);
    }

    #[test]
    fn click_buys_upgrade_by_id() {
        let (mut g, host) = game_with(seeded(|p| p.coins = 1_000));
        let id = actions::buy_upgrade(UpgradeKind::EnergyRegen);
        assert!(g.handle_input(&InputEvent::Click(id)));
        assert_eq!(g.store.state().upgrades.energy_regen, 1);
        assert_eq!(g.store.state().coins, 500);
        assert_eq!(*host.effects.borrow(), vec![HapticEffect::Success]);
    }

    #[test]
    fn unknown_click_is_not_consumed() {
        let (mut g, _h) = game();
        assert!(!g.handle_input(&InputEvent::Click(50)));
        assert!(!g.handle_input(&InputEvent::Click(actions::BUY_UPGRADE_BASE + 9)));
        assert!(!g.handle_input(&InputEvent::Key('z')));
    }

    #[test]
    fn claim_from_panel_pays_and_closes() {
        let (mut g, _h) = game();
        g.handle_input(&InputEvent::Key('c'));
        assert_eq!(g.store.state().coins, 0);

        g.handle_input(&InputEvent::Click(actions::OPEN_BONUS));
        assert!(g.ui.show_bonus);
        g.handle_input(&InputEvent::Key('c'));
        assert_eq!(g.store.state().coins, 1_000);
        assert_eq!(g.store.state().daily_bonus_streak, 1);
        assert!(!g.ui.show_bonus);
    }

    #[test]
    fn close_bonus_keeps_progress() {
        let (mut g, _h) = game();
        g.handle_input(&InputEvent::Key('b'));
        assert!(g.ui.show_bonus);
        g.handle_input(&InputEvent::Click(actions::CLOSE_BONUS));
        assert!(!g.ui.show_bonus);
        assert!(g.store.can_claim_daily_bonus());
    }

    #[test]
    fn bonus_panel_opens_after_delay_for_returning_player() {
        let (mut g, _h) = game_with(seeded(|p| p.total_taps = 10));
        g.tick(BONUS_PROMPT_DELAY_TICKS - 1);
        assert!(!g.ui.show_bonus);
        g.tick(1);
        assert!(g.ui.show_bonus);
        assert_eq!(g.ui.bonus_prompt, None);

        // Shown once per session
        g.handle_input(&InputEvent::Key('b'));
        g.tick(BONUS_PROMPT_DELAY_TICKS * 3);
        assert!(!g.ui.show_bonus);
    }

    #[test]
    fn bonus_panel_waits_for_first_tap() {
        let (mut g, _h) = game();
        g.tick(BONUS_PROMPT_DELAY_TICKS * 2);
        assert!(!g.ui.show_bonus);

        g.handle_input(&InputEvent::Key(' '));
        g.tick(BONUS_PROMPT_DELAY_TICKS);
        assert!(g.ui.show_bonus);
    }

    #[test]
    fn bonus_panel_stays_closed_when_already_claimed() {
        let today = test_support::start_day();
        let (mut g, _h) = game_with(seeded(|p| {
            p.total_taps = 10;
            p.last_daily_bonus = Some(today);
            p.daily_bonus_streak = 1;
        }));
        g.tick(BONUS_PROMPT_DELAY_TICKS * 2);
        assert!(!g.ui.show_bonus);
    }

    #[test]
    fn tick_drives_store_timers() {
        let (mut g, _h) = game_with(seeded(|p| p.energy = 10));
        g.tick(TICKS_PER_SEC * 3);
        assert_eq!(g.store.state().energy, 13);
    }

    #[test]
    fn stalled_frame_keeps_regen_but_not_animations() {
        let (mut g, _h) = game_with(seeded(|p| p.energy = 10));
        g.tap();
        g.advance(FrameTicks {
            world: TICKS_PER_SEC * 4,
            ui: 1,
        });
        assert_eq!(g.store.state().energy, 13);
        assert_eq!(g.ui.particles.len(), 1);
    }
}
