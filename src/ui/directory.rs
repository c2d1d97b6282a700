//! Directory views: row table, card grid, details pane and filter summary.
//!
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, Theme};
use crate::model::{Influencer, Score, Tier};

const CARD_WIDTH: u16 = 30;
const CARD_HEIGHT: u16 = 7;

pub fn tier_color(theme: &Theme, tier: Tier) -> Color {
    match tier {
        Tier::Gold => theme.gold,
        Tier::Silver => theme.silver,
    }
}

/// Fixed-width bar for a 0-100 score.
pub fn score_bar(score: Score, width: usize) -> String {
    let filled = score.value() as usize * width / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Short description of a picture reference; data URIs are summarized.
pub fn picture_label(picture: &str) -> String {
    match picture.strip_prefix("data:") {
        Some(rest) => {
            let (mime, payload) = rest.split_once(";base64,").unwrap_or((rest, ""));
            let bytes = payload.len() * 3 / 4;
            format!("embedded {mime} ({:.1} KB)", bytes as f64 / 1024.0)
        }
        None => picture.to_string(),
    }
}

/// First index of the page that contains `selected`.
fn page_start(selected: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    (selected / per_page) * per_page
}

pub fn render_rows(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let start = page_start(app.selected_index, app.rows_per_page);
    let end = (start + app.rows_per_page).min(app.visible.len());
    let slice = &app.visible[start..end];

    let rows = slice.iter().enumerate().map(|(i, r)| {
        let style = if start + i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(r.initials()),
            Cell::from(r.name.clone()),
            Cell::from(Span::styled(
                r.tier.label(),
                Style::default().fg(tier_color(&app.theme, r.tier)),
            )),
            Cell::from(r.platforms_label()),
            Cell::from(r.score.to_string()),
            Cell::from(r.date_label()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(35),
        Constraint::Length(7),
        Constraint::Percentage(30),
        Constraint::Length(5),
        Constraint::Length(13),
    ];
    let header = Row::new(vec!["", "NAME", "TIER", "PLATFORMS", "SCORE", "ADDED"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!("Influencers ({})", app.visible.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_cards(f: &mut Frame, area: Rect, app: &mut AppState) {
    let block = Block::default()
        .title(format!("Influencers ({})", app.visible.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cols = (inner.width / CARD_WIDTH).max(1);
    let rows_fit = (inner.height / CARD_HEIGHT).max(1);
    let card_w = inner.width / cols;
    app.rows_per_page = (cols * rows_fit) as usize;

    let start = page_start(app.selected_index, app.rows_per_page);
    let end = (start + app.rows_per_page).min(app.visible.len());

    for (i, record) in app.visible[start..end].iter().enumerate() {
        let i = i as u16;
        let rect = Rect {
            x: inner.x + (i % cols) * card_w,
            y: inner.y + (i / cols) * CARD_HEIGHT,
            width: card_w,
            height: CARD_HEIGHT,
        }
        .intersection(inner);
        if rect.is_empty() {
            continue;
        }
        let selected = start + i as usize == app.selected_index;
        render_card(f, rect, &app.theme, record, selected);
    }
}

fn render_card(f: &mut Frame, area: Rect, theme: &Theme, record: &Influencer, selected: bool) {
    let tier_style = Style::default().fg(tier_color(theme, record.tier));
    let border_style = if selected {
        Style::default()
            .fg(theme.highlight_fg)
            .add_modifier(Modifier::BOLD)
    } else {
        tier_style
    };
    let bar_w = area.width.saturating_sub(8).min(20) as usize;
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("[{}] ", record.initials()), tier_style),
            Span::styled(
                record.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(record.tier.label(), tier_style)),
        Line::from(format!("{:>3} {}", record.score, score_bar(record.score, bar_w))),
        Line::from(record.platforms_label()),
        Line::from(Span::styled(
            format!("Added {}", record.date_label()),
            Style::default().fg(theme.muted),
        )),
    ];
    let p = Paragraph::new(lines)
        .style(Style::default().fg(theme.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    f.render_widget(p, area);
}

pub fn render_empty_state(f: &mut Frame, area: Rect, app: &AppState) {
    let reset_keys = app.keymap.keys_for(KeyAction::ResetFilters);
    let reset = reset_keys.first().map(String::as_str).unwrap_or("r");
    let top_pad = area.height.saturating_sub(6) / 2;
    let mut lines: Vec<Line> = (0..top_pad).map(|_| Line::raw("")).collect();
    lines.push(Line::from(Span::styled(
        "No influencers found",
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Try adjusting your search or filters.",
        Style::default().fg(app.theme.muted),
    )));
    lines.push(Line::from(Span::styled(
        format!("Press {reset} to reset filters."),
        Style::default().fg(app.theme.muted),
    )));
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title("Influencers (0)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

pub fn render_details(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Details")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let Some(r) = app.selected() else {
        let p = Paragraph::new("No influencer selected")
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    };

    let label = Style::default().fg(app.theme.muted);
    let bar_w = area.width.saturating_sub(16).min(30) as usize;
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("[{}] ", r.initials()),
                Style::default().fg(tier_color(&app.theme, r.tier)),
            ),
            Span::styled(r.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::raw(""),
        Line::from(vec![Span::styled("ID:        ", label), Span::raw(r.id.to_string())]),
        Line::from(vec![
            Span::styled("Tier:      ", label),
            Span::styled(
                r.tier.label(),
                Style::default().fg(tier_color(&app.theme, r.tier)),
            ),
        ]),
        Line::from(vec![
            Span::styled("Score:     ", label),
            Span::raw(format!("{}/100 {}", r.score, score_bar(r.score, bar_w))),
        ]),
        Line::from(vec![Span::styled("Platforms: ", label), Span::raw(r.platforms_label())]),
        Line::from(vec![Span::styled("Added:     ", label), Span::raw(r.date_label())]),
        Line::from(vec![
            Span::styled("Picture:   ", label),
            Span::raw(picture_label(&r.profile_picture)),
        ]),
    ];
    let p = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.text))
        .wrap(Wrap { trim: false })
        .block(block);
    f.render_widget(p, area);
}

pub fn render_filter_summary(f: &mut Frame, area: Rect, app: &AppState) {
    let c = &app.criteria;
    let any = |s: String| if s.is_empty() { "any".to_string() } else { s };
    let tiers = any(c.tiers.iter().map(|t| t.label()).collect::<Vec<_>>().join(", "));
    let platforms = any(c.platforms.iter().map(|p| p.label()).collect::<Vec<_>>().join(", "));
    let query = if c.name_query.is_empty() {
        "-".to_string()
    } else {
        format!("\"{}\"", c.name_query)
    };
    let label = Style::default().fg(app.theme.muted);
    let lines = vec![
        Line::from(vec![Span::styled("Name:      ", label), Span::raw(query)]),
        Line::from(vec![Span::styled("Tier:      ", label), Span::raw(tiers)]),
        Line::from(vec![Span::styled("Platforms: ", label), Span::raw(platforms)]),
        Line::from(vec![
            Span::styled("Score:     ", label),
            Span::raw(format!("{} - {}", c.score_range.min(), c.score_range.max())),
        ]),
        Line::from(vec![
            Span::styled("Sort:      ", label),
            Span::raw(format!("{}, {}", app.sort.key.label(), app.sort.order.label())),
        ]),
    ];
    let title = if c.is_empty() { "Filters" } else { "Filters (active)" };
    let p = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_scales_with_score() {
        assert_eq!(score_bar(Score::clamped(50), 10), "█████░░░░░");
        assert_eq!(score_bar(Score::MAX, 4), "████");
        assert_eq!(score_bar(Score::MIN, 3), "░░░");
    }

    #[test]
    fn data_uris_are_summarized() {
        assert_eq!(picture_label("https://a/b.png"), "https://a/b.png");
        assert_eq!(
            picture_label("data:image/png;base64,AAAA"),
            "embedded image/png (0.0 KB)"
        );
    }

    #[test]
    fn pages_start_on_boundaries() {
        assert_eq!(page_start(0, 10), 0);
        assert_eq!(page_start(25, 10), 20);
        assert_eq!(page_start(3, 0), 3);
    }
}
