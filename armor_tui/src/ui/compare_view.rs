//! Compare tab view

use crate::app::App;
use crate::ui::{bar_text, section_title, stat_line};
use armor_core::stats::round_to;
use armor_core::Column;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const BAR_WIDTH: usize = 20;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(12)])
        .split(area);

    draw_bars(f, app, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    draw_summary(f, app, Column::A, columns[0]);
    draw_summary(f, app, Column::B, columns[1]);
}

fn format_value(app: &App, value: f64) -> String {
    let decimals = app.session.display().decimals;
    format!("{:.*}", decimals as usize, round_to(value, decimals))
}

fn draw_bars(f: &mut Frame, app: &App, area: Rect) {
    let rows = app.session.comparison_rows();
    // Rows can shrink after a mode or piece change
    let scroll = app.compare_scroll.min(rows.len().saturating_sub(1));

    let lines: Vec<Line> = if rows.is_empty() {
        vec![Line::from(Span::styled(
            "Both columns need a piece to compare",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        rows.iter()
            .map(|row| {
                let delta_style = if row.delta() > 0.0 {
                    Style::default().fg(Color::Red)
                } else if row.delta() < 0.0 {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Line::from(vec![
                    Span::styled(format!("{:18}", row.stat), Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("{:>7} ", format_value(app, row.a)),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(
                        bar_text(row.a_pct, BAR_WIDTH, row.segmented),
                        Style::default().fg(Color::Green),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        bar_text(row.b_pct, BAR_WIDTH, row.segmented),
                        Style::default().fg(Color::Red),
                    ),
                    Span::styled(
                        format!(" {:<7}", format_value(app, row.b)),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(format!("{:+.1}", row.delta()), delta_style),
                ])
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" A vs B "),
        )
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));

    f.render_widget(paragraph, area);
}

fn draw_summary(f: &mut Frame, app: &App, column: Column, area: Rect) {
    let view = app.view(column);
    let pieces = app.session.pieces(column);

    let mut lines = vec![section_title(view.mode.name())];

    if pieces.is_empty() {
        lines.push(Line::from(Span::styled(
            "No items",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for piece in &pieces {
        lines.push(Line::from(Span::styled(
            piece.name.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }

    lines.push(stat_line(
        "Upgrades",
        app.session.selection(column).len().to_string(),
    ));
    lines.push(stat_line(
        "Upgrade cost",
        app.session.total_cost(column).to_string(),
    ));

    for (stat, modifier) in app.session.aggregate_effects(column).iter() {
        let mut parts = Vec::new();
        if modifier.percent != 0.0 {
            parts.push(format!("{:+}%", round_to(modifier.percent, 2)));
        }
        if modifier.absolute != 0.0 {
            parts.push(format!("{:+}", round_to(modifier.absolute, 2)));
        }
        if !parts.is_empty() {
            lines.push(stat_line(stat, parts.join(" ")));
        }
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Column {} ", column.name())),
    );

    f.render_widget(paragraph, area);
}
