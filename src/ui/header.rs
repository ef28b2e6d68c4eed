use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::app::App;
use crate::format::{format_kb, format_uptime};
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_summary(frame, chunks[0], app, theme);
    render_cpu_gauge(frame, chunks[1], app, theme);
    render_mem_gauge(frame, chunks[2], app, theme);
}

fn render_summary(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let block = bordered_block(theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = Line::from(vec![
        Span::styled(
            " proctop ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("up {}", format_uptime(app.uptime)),
            Style::default().fg(theme.text_secondary),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Procs: {}", app.process_count),
            Style::default().fg(theme.text_secondary),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Sort: {}", app.sort_key.label()),
            Style::default().fg(theme.text_secondary),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_cpu_gauge(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let ratio = (app.stats.cpu_percent / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(titled_block(" CPU ", theme))
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(format!("{:.2}%", app.stats.cpu_percent));
    frame.render_widget(gauge, area);
}

fn render_mem_gauge(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let ratio = (app.stats.mem_percent / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(titled_block(" MEM ", theme))
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(format!(
            "{}/{} ({:.2}%)",
            format_kb(app.stats.mem_used_kb),
            format_kb(app.mem_total_kb()),
            app.stats.mem_percent
        ));
    frame.render_widget(gauge, area);
}

fn bordered_block(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
}

fn titled_block(title: &'static str, theme: &Theme) -> Block<'static> {
    bordered_block(theme).title(Span::styled(
        title,
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    ))
}
