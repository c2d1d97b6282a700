//! Record modals: actions menu, add/edit form and delete confirmation.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;
use crate::app::form::{FormField, InfluencerForm, PictureSource};
use crate::app::update::ACTION_ITEMS;
use crate::model::{Platform, Tier};
use crate::ui::components::centered_rect;
use crate::ui::directory::{picture_label, score_bar};

pub fn render_actions_modal(f: &mut Frame, area: Rect, app: &AppState, selected: usize) {
    let rect = centered_rect(30, 6, area);
    let title = app
        .selected()
        .map(|r| r.name.clone())
        .unwrap_or_else(|| "Actions".to_string());
    let mut text = String::new();
    for (idx, label) in ACTION_ITEMS.iter().enumerate() {
        if idx == selected {
            text.push_str(&format!("▶ {}\n", label));
        } else {
            text.push_str(&format!("  {}\n", label));
        }
    }
    let p = Paragraph::new(text).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_modal(f: &mut Frame, area: Rect, app: &AppState, name: &str, selected: usize) {
    let width = 56u16.min(area.width.saturating_sub(4)).max(36);
    let rect = centered_rect(width, 8, area);
    let button = |label: &str, active: bool, danger: bool| {
        let mut style = Style::default();
        if danger {
            style = style.fg(app.theme.danger);
        }
        if active {
            style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
        }
        Span::styled(format!("[ {label} ]"), style)
    };
    let lines = vec![
        Line::from(format!("Delete {name}?")),
        Line::from(Span::styled(
            "This removes the influencer from the directory.",
            Style::default().fg(app.theme.muted),
        )),
        Line::raw(""),
        Line::from(vec![
            button("Delete", selected == 0, true),
            Span::raw("   "),
            button("Cancel", selected == 1, false),
        ]),
    ];
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Confirm delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.danger)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_form_modal(f: &mut Frame, area: Rect, app: &AppState, form: &InfluencerForm) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(44);
    let height = 20u16.min(area.height.saturating_sub(2)).max(12);
    let rect = centered_rect(width, height, area);

    let focus = Style::default()
        .fg(app.theme.highlight_fg)
        .add_modifier(Modifier::BOLD);
    let label = |field: FormField, text: &str| {
        if form.field == field {
            Span::styled(format!("▶ {text:<11}"), focus)
        } else {
            Span::styled(format!("  {text:<11}"), Style::default().fg(app.theme.muted))
        }
    };
    let cursor = |field: FormField| if form.field == field { "_" } else { "" };
    let choice = |on: bool, text: &str, hot: bool| {
        let mark = if on { "(•)" } else { "( )" };
        let style = if hot { focus } else { Style::default() };
        Span::styled(format!("{mark} {text}  "), style)
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        label(FormField::Name, "Name"),
        Span::raw(format!("{}{}", form.name, cursor(FormField::Name))),
    ]));
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
        label(FormField::Picture, "Picture"),
        choice(form.picture_source == PictureSource::File, "Upload file", false),
        choice(form.picture_source == PictureSource::Url, "URL", false),
    ]));
    let (input_label, input) = match form.picture_source {
        PictureSource::File => ("path: ", &form.picture_file),
        PictureSource::Url => ("url:  ", &form.picture_url),
    };
    lines.push(Line::from(vec![
        Span::raw("             "),
        Span::styled(input_label, Style::default().fg(app.theme.muted)),
        Span::raw(format!("{input}{}", cursor(FormField::Picture))),
    ]));
    if let Some(status) = &form.picture_status {
        lines.push(Line::from(vec![
            Span::raw("             "),
            Span::styled(status.clone(), Style::default().fg(app.theme.muted)),
        ]));
    }
    lines.push(Line::from(vec![
        Span::raw("             "),
        Span::styled("uses: ", Style::default().fg(app.theme.muted)),
        Span::raw(picture_label(&form.picture_value())),
    ]));
    lines.push(Line::raw(""));

    let tier_focused = form.field == FormField::Tier;
    lines.push(Line::from(vec![
        label(FormField::Tier, "Tier"),
        choice(form.tier == Tier::Gold, "Gold", tier_focused && form.tier == Tier::Gold),
        choice(
            form.tier == Tier::Silver,
            "Silver",
            tier_focused && form.tier == Tier::Silver,
        ),
    ]));

    let mut platform_spans = vec![label(FormField::Platforms, "Platforms")];
    for (idx, p) in Platform::ALL.iter().enumerate() {
        let mark = if form.platforms.contains(p) { "[x]" } else { "[ ]" };
        let hot = form.field == FormField::Platforms && form.platform_cursor == idx;
        let style = if hot { focus } else { Style::default() };
        platform_spans.push(Span::styled(format!("{mark} {}  ", p.label()), style));
    }
    lines.push(Line::from(platform_spans));

    lines.push(Line::from(vec![
        label(FormField::Score, "Score"),
        Span::raw(format!("{:>3} {}", form.score, score_bar(form.score, 20))),
    ]));
    lines.push(Line::raw(""));

    let submit_style = if form.field == FormField::Submit {
        focus.add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("[ {} ]", form.submit_label()), submit_style),
    ]));
    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(app.theme.danger),
        )));
    }
    lines.push(Line::raw(""));
    let hint = match form.field {
        FormField::Picture => "Left/Right: source  Enter: load file  Tab: next  Esc: cancel",
        FormField::Tier => "Left/Right/Space: switch tier  Tab: next  Esc: cancel",
        FormField::Platforms => "Left/Right: move  Space: toggle  Tab: next  Esc: cancel",
        FormField::Score => "Left/Right: 1  PgUp/PgDn: 10  Home/End: 0/100  Esc: cancel",
        _ => "Tab/Shift+Tab: move  Enter: next/submit  Esc: cancel",
    };
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(app.theme.muted),
    )));

    let p = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(form.title())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
