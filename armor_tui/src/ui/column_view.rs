//! Column tab view - upgrade grids of the pieces in one column

use crate::app::{App, CursorCell};
use crate::ui::section_title;
use armor_core::dataset::Upgrade;
use armor_core::{Column, UpgradeStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const CELL_WIDTH: usize = 14;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(column) = app.current_tab.column() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_grids(f, app, column, chunks[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    draw_details(f, app, column, right[0]);
    draw_messages(f, app, right[1]);
}

fn status_marker(status: Option<&UpgradeStatus>) -> (&'static str, Color) {
    match status {
        Some(UpgradeStatus::Selected) => ("●", Color::Green),
        Some(UpgradeStatus::Selectable) => ("○", Color::White),
        Some(UpgradeStatus::Blocked { .. }) => ("✕", Color::Red),
        Some(UpgradeStatus::RequiresUnmet { .. }) => ("◌", Color::Yellow),
        None => ("?", Color::DarkGray),
    }
}

fn cell_label(upgrade: &Upgrade) -> String {
    let label = upgrade.display_label();
    let mut short: String = label.chars().take(CELL_WIDTH - 3).collect();
    if label.chars().count() > CELL_WIDTH - 3 {
        short.pop();
        short.push('…');
    }
    short
}

fn draw_grids(f: &mut Frame, app: &App, column: Column, area: Rect) {
    let view = app.view(column);
    let availability = app.availability(column);
    let cursor = app.cursor_cell(column);

    let mut lines = Vec::new();

    if app.session.grids(column).is_empty() {
        lines.push(Line::from(Span::styled(
            "No items for this mode",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (slot, piece_grids) in app.session.grids(column).iter().enumerate() {
        let piece = &piece_grids.piece;
        let active = slot == view.active_slot;
        lines.push(Line::from(vec![
            Span::styled(
                if active { "▶ " } else { "  " },
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!("{} ({})", piece.name, piece.kind.name()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]));

        let mut any = false;
        for grid in piece_grids.grids.non_empty() {
            any = true;
            lines.push(section_title(grid.zone.name()));
            for row in grid.rows() {
                let mut spans = vec![Span::raw("  ")];
                for cell in row {
                    match cell {
                        Some(upgrade) => {
                            let (marker, color) =
                                status_marker(availability.get(&piece.id, &upgrade.id));
                            let mut style = Style::default().fg(color);
                            let here = CursorCell {
                                piece: piece.id.clone(),
                                upgrade: upgrade.id.clone(),
                            };
                            if cursor.as_ref() == Some(&here) {
                                style = style.add_modifier(Modifier::REVERSED);
                            }
                            spans.push(Span::styled(
                                format!("{} {:<width$}", marker, cell_label(upgrade), width = CELL_WIDTH - 3),
                                style,
                            ));
                        }
                        None => spans.push(Span::styled(
                            format!("{:<width$}", "·", width = CELL_WIDTH - 1),
                            Style::default().fg(Color::DarkGray),
                        )),
                    }
                    spans.push(Span::raw(" "));
                }
                lines.push(Line::from(spans));
            }
        }
        if !any {
            lines.push(Line::from(Span::styled(
                "  no upgrades",
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Column {} · {} ", column.name(), view.mode.name())),
    );

    f.render_widget(paragraph, area);
}

fn draw_details(f: &mut Frame, app: &App, column: Column, area: Rect) {
    let mut lines = Vec::new();

    let located = app.cursor_cell(column).and_then(|cell| {
        let state = app.session.column(column);
        state
            .locate(Some(cell.piece.as_str()), &cell.upgrade)
            .map(|(piece, upgrade)| (piece.to_string(), upgrade.clone()))
    });

    match located {
        Some((piece_id, upgrade)) => {
            let status = app.availability(column).get(&piece_id, &upgrade.id);
            let (marker, color) = status_marker(status);

            lines.push(Line::from(Span::styled(
                upgrade.id.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", marker), Style::default().fg(color)),
                Span::styled(status_text(status), Style::default().fg(color)),
            ]));
            lines.push(Line::from(format!("Cost: {}", upgrade.cost.round())));
            lines.push(Line::from(""));

            lines.push(section_title("Effects"));
            let labels: Vec<String> = upgrade.effects.iter().filter_map(|e| e.label()).collect();
            if labels.is_empty() {
                lines.push(Line::from(Span::styled("none", Style::default().fg(Color::DarkGray))));
            }
            for label in labels {
                lines.push(Line::from(format!("  {}", label)));
            }

            if !upgrade.blocking.is_empty() {
                lines.push(Line::from(format!("Blocks: {}", upgrade.blocking.join(", "))));
            }
            if !upgrade.required.is_empty() {
                lines.push(Line::from(format!("Needs one of: {}", upgrade.required.join(", "))));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "No upgrade under cursor",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Upgrade "))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn status_text(status: Option<&UpgradeStatus>) -> String {
    match status {
        Some(UpgradeStatus::Selected) => "Selected".to_string(),
        Some(UpgradeStatus::Selectable) => "Selectable".to_string(),
        Some(UpgradeStatus::Blocked { by }) => format!("Blocked by {}", by.join(", ")),
        Some(UpgradeStatus::RequiresUnmet { one_of }) => {
            format!("Requires one of {}", one_of.join(", "))
        }
        None => "Unknown".to_string(),
    }
}

fn draw_messages(f: &mut Frame, app: &App, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = app.messages.len().saturating_sub(visible);
    let lines: Vec<Line> = app.messages[start..]
        .iter()
        .map(|m| Line::from(m.clone()))
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Log "))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}
