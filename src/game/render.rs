//! Hamster Tap rendering: header, tab content, bonus panel, and nav bar.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;
use crate::widgets::{ClickableList, TabBar};

use super::actions::{self, CLAIM_BONUS, CLOSE_BONUS, OPEN_BONUS, TAP_HAMSTER};
use super::catalog::{self, ACHIEVEMENTS, UPGRADES};
use super::logic::{self, format_number};
use super::state::{BONUS_PER_STREAK_DAY, MAX_BONUS_STREAK};
use super::{Tab, TapGame};

const HAMSTER_ART: &[&str] = &[
    r"  (\_/)  ",
    r" ( o.o ) ",
    r" (  ω  ) ",
    r"  U   U  ",
];

/// Squashed frame shown while the tap flash is active.
const HAMSTER_TAP_ART: &[&str] = &[
    r"         ",
    r"  (\_/)  ",
    r" ( >ω< ) ",
    r" (U   U) ",
];

/// Rows above the art inside the home panel (welcome line + spacer).
const ART_TOP: u16 = 2;

pub fn render(game: &TapGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // header
            Constraint::Min(8),    // content
            Constraint::Length(3), // nav bar
        ])
        .split(area);

    render_header(game, f, chunks[0], click_state);
    if game.ui.show_bonus {
        render_bonus_panel(game, f, chunks[1], click_state);
    } else {
        match game.ui.tab {
            Tab::Home => render_home(game, f, chunks[1], click_state),
            Tab::Shop => render_shop(game, f, chunks[1], click_state),
            Tab::Achievements => render_achievements(game, f, chunks[1], click_state),
            Tab::Profile => render_profile(game, f, chunks[1]),
        }
    }
    render_nav_bar(game, f, chunks[2], click_state);
}

fn render_header(
    game: &TapGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let state = game.store.state();
    let host = game.store.host();
    let user = host.user();

    let name = user
        .map(|u| u.display_name())
        .unwrap_or_else(|| "Player".to_string());
    let initials = user.map(|u| u.initials()).unwrap_or_else(|| "P".to_string());

    let mut cl = ClickableList::new();

    // Identity + level
    let mut id_spans = vec![
        Span::styled(
            format!(" ({}) ", initials),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ),
    ];
    if user.map(|u| u.is_premium).unwrap_or(false) {
        id_spans.push(Span::styled("⭐", Style::default().fg(Color::Yellow)));
    }
    id_spans.push(Span::styled(
        format!(" {}", name),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    id_spans.push(Span::styled(
        format!("  Lv {}", state.level()),
        Style::default().fg(Color::Cyan),
    ));
    if !host.is_hosted() {
        id_spans.push(Span::styled("  🔧dev", Style::default().fg(Color::DarkGray)));
    }
    cl.push(Line::from(id_spans));

    cl.push(Line::from(vec![
        Span::styled(
            format!(" 🪙 {}", format_number(state.coins)),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  (+{}/tap)", format_number(state.tap_power())),
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    let bar_width = (area.width as usize).saturating_sub(22).clamp(5, 30);
    cl.push(Line::from(vec![
        Span::styled(" ⚡ ", Style::default().fg(Color::Yellow)),
        Span::styled(
            progress_bar(state.energy_ratio(), bar_width),
            Style::default().fg(energy_color(state.energy_ratio())),
        ),
        Span::styled(
            format!(" {}/{}", state.energy, state.max_energy()),
            Style::default().fg(Color::White),
        ),
    ]));

    if game.store.can_claim_daily_bonus() {
        let blink = (game.ui.anim_frame / 5) % 2 == 0;
        let style = if blink {
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        };
        cl.push_clickable(
            Line::from(Span::styled(" [B] 🎁 Daily bonus ready! ", style)),
            OPEN_BONUS,
        );
    } else {
        cl.push_clickable(
            Line::from(Span::styled(
                " [B] 🎁 Daily bonus",
                Style::default().fg(Color::DarkGray),
            )),
            OPEN_BONUS,
        );
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" 🐹 Hamster Tap ");
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_home(game: &TapGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let state = game.store.state();
    let flashing = game.ui.tap_flash > 0;

    let welcome = match game.store.host().user() {
        Some(u) if !u.first_name.is_empty() => format!("Welcome back, {}!", u.first_name),
        _ => "Tap to earn coins!".to_string(),
    };

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        welcome,
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(""));

    let art = if flashing { HAMSTER_TAP_ART } else { HAMSTER_ART };
    let art_color = if flashing { Color::White } else { Color::Yellow };
    for row in art {
        cl.push_clickable(
            Line::from(Span::styled(*row, Style::default().fg(art_color))),
            TAP_HAMSTER,
        );
    }
    cl.push(Line::from(""));

    if state.energy > 0 {
        let tap_style = if flashing {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        };
        cl.push_clickable(
            Line::from(Span::styled(
                format!("[T] TAP! +{}", format_number(state.tap_power())),
                tap_style,
            )),
            TAP_HAMSTER,
        );
    } else {
        cl.push(Line::from(Span::styled(
            "Out of energy! It refills every second.",
            Style::default().fg(Color::Red),
        )));
    }

    cl.push(Line::from(""));
    cl.push(Line::from(vec![
        Span::styled(
            format!("👆 {} taps", format_number(state.total_taps)),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("  🪙 {}/tap", format_number(state.tap_power())),
            Style::default().fg(Color::Yellow),
        ),
    ]));
    if state.auto_tapper_active() {
        cl.push(Line::from(Span::styled(
            format!("🤖 Auto tapper: +{} every 2s", format_number(state.auto_tap_power())),
            Style::default().fg(Color::Green),
        )));
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }

    let border_color = if flashing { Color::White } else { Color::Yellow };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Home ");
    let inner = block.inner(area);
    f.render_widget(
        Paragraph::new(cl.into_lines())
            .block(block)
            .alignment(Alignment::Center),
        area,
    );

    let art_area = Rect::new(
        inner.x,
        inner.y,
        inner.width,
        (ART_TOP + HAMSTER_ART.len() as u16).min(inner.height),
    );
    render_particles(game, f, art_area);
}

/// Render floating "+N" particles rising over the hamster.
fn render_particles(game: &TapGame, f: &mut Frame, area: Rect) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let center_x = area.x + area.width / 2;
    let base_y = area.y + area.height;

    for particle in &game.ui.particles {
        let progress = 1.0 - (particle.life as f32 / particle.max_life as f32);
        let rise = (progress * area.height as f32) as u16;
        let y = base_y.saturating_sub(1 + rise);
        let x = (center_x as i16 + particle.col_offset).max(area.x as i16) as u16;
        let color = if particle.life > particle.max_life * 2 / 3 {
            Color::White
        } else if particle.life > particle.max_life / 3 {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        if y >= area.y && x < area.x + area.width {
            let text_len = particle.text.chars().count() as u16;
            let display_width = text_len.min(area.x + area.width - x);
            if display_width > 0 {
                let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
                f.render_widget(
                    Paragraph::new(Span::styled(particle.text.as_str(), style)),
                    Rect::new(x, y, display_width, 1),
                );
            }
        }
    }
}

fn render_shop(game: &TapGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let state = game.store.state();
    let mut cl = ClickableList::new();

    cl.push(Line::from(Span::styled(
        format!(" 🪙 {} available", format_number(state.coins)),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));

    for (i, def) in UPGRADES.iter().enumerate() {
        let level = state.upgrades.get(def.kind);
        let max = def.kind.max_level();
        let maxed = state.upgrades.is_maxed(def.kind);
        let cost = state.upgrade_cost(def.kind);
        let affordable = !maxed && state.coins >= cost;
        let action = actions::buy_upgrade(def.kind);

        let name_style = if affordable {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let price = if maxed {
            Span::styled(" MAX", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else if affordable {
            Span::styled(
                format!(" 🪙{}", format_number(cost)),
                Style::default().fg(Color::Yellow),
            )
        } else {
            Span::styled(
                format!(" 🪙{}", format_number(cost)),
                Style::default().fg(Color::Red),
            )
        };

        cl.push(Line::from(""));
        cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    format!(" [{}] ", i + 1),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(def.name, name_style),
                Span::styled(
                    format!(" Lv {}/{}", level, max),
                    Style::default().fg(Color::Cyan),
                ),
                price,
            ]),
            action,
        );
        cl.push_clickable(
            Line::from(Span::styled(
                format!("     {} · {}", def.description, def.effect(state)),
                Style::default().fg(Color::Gray),
            )),
            action,
        );
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" 🛒 Upgrade Shop ");
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_achievements(
    game: &TapGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let state = game.store.state();
    let mut cl = ClickableList::new();

    cl.push(Line::from(Span::styled(
        format!(
            " 🏆 {}/{} completed",
            catalog::completed_achievements(state),
            ACHIEVEMENTS.len()
        ),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));

    let bar_width = (area.width as usize).saturating_sub(8).clamp(5, 30);
    for a in ACHIEVEMENTS {
        let done = a.is_completed(state);
        let (mark, name_style) = if done {
            ("✅", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            ("⬜", Style::default().fg(Color::White))
        };
        cl.push(Line::from(""));
        cl.push(Line::from(vec![
            Span::styled(format!(" {} ", mark), Style::default()),
            Span::styled(a.name, name_style),
            Span::styled(
                format!(
                    "  {}/{}",
                    format_number(a.progress(state).min(a.target)),
                    format_number(a.target)
                ),
                Style::default().fg(Color::Cyan),
            ),
        ]));
        cl.push(Line::from(Span::styled(
            format!("    {} · 🪙{}", a.description, format_number(a.reward)),
            Style::default().fg(Color::Gray),
        )));
        cl.push(Line::from(Span::styled(
            format!("    {}", progress_bar(a.ratio(state), bar_width)),
            Style::default().fg(if done { Color::Green } else { Color::Yellow }),
        )));
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Achievements ");
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_profile(game: &TapGame, f: &mut Frame, area: Rect) {
    let state = game.store.state();
    let host = game.store.host();

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let row = |k: &str, v: String| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!(" {:<14}", k), label),
            Span::styled(v, value),
        ])
    };

    let mut lines: Vec<Line> = Vec::new();
    match host.user() {
        Some(u) => {
            lines.push(row("Name", u.display_name()));
            if let Some(username) = u.username.as_deref().filter(|s| !s.is_empty()) {
                lines.push(row("Username", format!("@{}", username)));
            }
            lines.push(row("Telegram ID", u.id.to_string()));
            if let Some(lang) = u.language_code.as_deref() {
                lines.push(row("Language", lang.to_string()));
            }
            if u.is_premium {
                lines.push(row("Premium", "⭐ yes".to_string()));
            }
        }
        None => lines.push(row("Name", "Player".to_string())),
    }
    let mode = if host.is_hosted() {
        "Telegram"
    } else {
        "Standalone (development mode)"
    };
    lines.push(row("Mode", mode.to_string()));

    lines.push(Line::from(""));
    lines.push(row("Level", state.level().to_string()));
    lines.push(row("Coins", format_number(state.coins)));
    lines.push(row("Total taps", format_number(state.total_taps)));
    lines.push(row("Total earned", format_number(state.total_coins_earned)));
    lines.push(row("Bonus streak", format!("{} days", state.daily_bonus_streak)));
    lines.push(row(
        "Energy",
        format!("{}/{} (+{}/s)", state.energy, state.max_energy(), state.regen_rate()),
    ));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Profile ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_bonus_panel(
    game: &TapGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let state = game.store.state();
    let today = game.store.today();
    let next = logic::next_streak(state, today);
    // Days already banked in the streak that the next claim would extend.
    let banked = match next {
        Some(n) => n.saturating_sub(1),
        None => state.daily_bonus_streak,
    };

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        " Come back every day for amazing rewards!",
        Style::default().fg(Color::Gray),
    )));
    cl.push(Line::from(vec![
        Span::styled(" 📅 Current streak: ", Style::default().fg(Color::White)),
        Span::styled(
            format!("{} days", state.daily_bonus_streak),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
    ]));
    cl.push(Line::from(""));

    for day in 1..=MAX_BONUS_STREAK {
        let amount = format_number(day as u64 * BONUS_PER_STREAK_DAY);
        let (mark, style) = if day <= banked {
            ("✓", Style::default().fg(Color::Green))
        } else if Some(day) == next {
            ("▶", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            ("·", Style::default().fg(Color::DarkGray))
        };
        cl.push(Line::from(Span::styled(
            format!("  {} Day {}  🪙{}", mark, day, amount),
            style,
        )));
    }
    cl.push(Line::from(""));

    if game.store.can_claim_daily_bonus() {
        cl.push_clickable(
            Line::from(Span::styled(
                format!(
                    " [C] Claim {} coins ",
                    format_number(game.store.next_bonus_amount())
                ),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            CLAIM_BONUS,
        );
    } else {
        cl.push(Line::from(Span::styled(
            " Next bonus tomorrow",
            Style::default().fg(Color::DarkGray),
        )));
    }
    cl.push_clickable(
        Line::from(Span::styled(" [B] Close", Style::default().fg(Color::Gray))),
        CLOSE_BONUS,
    );

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" 🎁 Daily Bonus ");
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_nav_bar(
    game: &TapGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let tab_style = |tab: Tab| -> Style {
        if tab == game.ui.tab && !game.ui.show_bonus {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    };

    let mut bar = TabBar::new("│").block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    for tab in Tab::all() {
        bar = bar.tab(tab.label(), tab_style(tab), tab.action_id());
    }

    let mut cs = click_state.borrow_mut();
    bar.render(f, area, &mut cs);
}

fn energy_color(ratio: f64) -> Color {
    if ratio > 0.5 {
        Color::Green
    } else if ratio > 0.2 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
