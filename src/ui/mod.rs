pub mod header;
pub mod help;
pub mod statusbar;
pub mod table;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;
use crate::ui::theme::Theme;

pub fn draw(frame: &mut Frame, app: &App) {
    let theme = Theme::default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], app, &theme);

    let rows = app.visible_rows();
    table::render(frame, chunks[1], &rows, &theme);

    statusbar::render(frame, chunks[2], app, &theme);

    // Help overlay last so it sits on top of everything else.
    if app.show_help() {
        help::render(frame, frame.area(), &App::help_entries(), &theme);
    }
}
