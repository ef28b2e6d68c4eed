use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, InputMode};
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    // An active prompt always owns the line: the user must see what they
    // are typing. A fresh kill/filter outcome only displaces the pill row.
    let line = match app.input_mode {
        InputMode::Filter => prompt_line("Filter", &app.prompt_buffer, theme),
        InputMode::Kill => prompt_line("Kill PID", &app.prompt_buffer, theme),
        _ => {
            if let Some((msg, _)) = &app.status_message {
                let color = if msg.starts_with("Sent") {
                    theme.status_ok
                } else {
                    theme.status_err
                };
                let line = Line::from(Span::styled(
                    format!(" {msg}"),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ));
                frame.render_widget(Paragraph::new(line).style(bg_style), area);
                return;
            }
            let mut spans = Vec::new();
            spans.extend(pill_spans("q", "Quit", theme));
            spans.extend(pill_spans("s", "Sort", theme));
            spans.extend(pill_spans("f", "Filter", theme));
            spans.extend(pill_spans("k", "Kill", theme));
            spans.extend(pill_spans(
                "+/-",
                refresh_label(app.refresh_secs),
                theme,
            ));
            spans.extend(pill_spans("?", "Help", theme));
            if !app.filter.is_empty() {
                spans.push(Span::styled(
                    format!("  Filter: {}", app.filter),
                    Style::default().fg(theme.pill_desc_fg),
                ));
            }
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line).style(bg_style), area);
}

fn refresh_label(secs: u64) -> String {
    format!("Refresh: {secs}s")
}

fn prompt_line<'a>(label: &'a str, buffer: &'a str, theme: &Theme) -> Line<'a> {
    let mut spans = vec![
        Span::styled(
            format!(" {label} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {buffer}"), Style::default().fg(theme.pill_desc_fg)),
        Span::styled("\u{2588}", Style::default().fg(theme.pill_key_bg)),
    ];
    spans.extend(pill_spans("Esc", "Cancel", theme));
    spans.extend(pill_spans("Enter", "Apply", theme));
    Line::from(spans)
}

fn pill_spans<'a>(key: &'a str, desc: impl Into<String>, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", desc.into()),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}
