//! Help tab view

use crate::app::App;
use crate::ui::section_title;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let bars = &app.session.display().bars;

    let mut lines = vec![
        section_title("Navigation"),
        key_line("1-4", "Jump to tab (Compare/Column A/Column B/Help)"),
        key_line("Tab / Shift+Tab", "Next/previous tab"),
        key_line("↑/k  ↓/j", "Move upgrade cursor / scroll"),
        key_line("q / Ctrl+C", "Quit"),
        Line::from(""),
        section_title("Columns"),
        key_line("m", "Cycle mode (full body, head/chest, chest, head)"),
        key_line("s", "Switch between head and chest slot"),
        key_line("←/→", "Previous/next piece for the slot"),
        key_line("Space / Enter", "Select or remove the upgrade under the cursor"),
        Line::from(""),
        section_title("Upgrade Grid"),
        marker_line("●", Color::Green, "Selected"),
        marker_line("○", Color::White, "Selectable"),
        marker_line("✕", Color::Red, "Blocked by a selected upgrade"),
        marker_line("◌", Color::Yellow, "Needs one of its required upgrades first"),
        Line::from(""),
        Line::from("  Selecting an upgrade removes any selected upgrade it blocks."),
        Line::from("  An upgrade another selection depends on cannot be removed."),
        Line::from("  Selections are per column and reset when the pieces change."),
        Line::from(""),
        section_title("Stat Calculation"),
        Line::from("  Effective = Base × (1 + Σ Percent / 100) + Σ Absolute"),
        Line::from(format!(
            "  Bars fill at {} (most stats, 1-5 segments)",
            bars.default_max
        )),
    ];

    for (stat, max) in &bars.overrides {
        lines.push(Line::from(format!("  {} bars fill at {}", stat, max)));
    }
    lines.push(Line::from(format!(
        "  Head + chest: {} shown per location, other stats summed",
        app.session.display().non_stacking.join(", ")
    )));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Help "));

    f.render_widget(paragraph, area);
}

fn key_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:20}", key),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(desc.to_string(), Style::default().fg(Color::White)),
    ])
}

fn marker_line(marker: &str, color: Color, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:4}", marker), Style::default().fg(color)),
        Span::styled(desc.to_string(), Style::default().fg(Color::White)),
    ])
}
