use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table};

use crate::format::{format_percent, truncate_unicode};
use crate::ui::theme::Theme;
use crate::view::ProcessRow;

/// Widest the NAME column gets before ellipsis truncation.
const NAME_WIDTH: usize = 32;

pub fn render(frame: &mut Frame, area: Rect, rows: &[ProcessRow], theme: &Theme) {
    let header = Row::new(["PID", "NAME", "CPU%", "RSS-KB"]).style(
        Style::default()
            .fg(theme.table_header_fg)
            .add_modifier(Modifier::BOLD),
    );

    let body = rows.iter().map(|row| {
        Row::new([
            Cell::from(row.pid.to_string()),
            Cell::from(truncate_unicode(&row.name, NAME_WIDTH)),
            Cell::from(format_percent(row.cpu_percent)),
            Cell::from(row.rss_kb.to_string()),
        ])
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Min(16),
        Constraint::Length(8),
        Constraint::Length(12),
    ];

    let table = Table::new(body, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border)),
    );

    frame.render_widget(table, area);
}
