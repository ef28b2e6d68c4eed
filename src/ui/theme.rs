use ratatui::style::Color;

/// Single fixed palette. Field names follow the regions they paint rather
/// than the colors they happen to hold.
#[derive(Debug, Clone)]
pub struct Theme {
    pub header_accent_fg: Color,
    pub header_accent_bg: Color,
    pub text_secondary: Color,
    pub border: Color,
    pub table_header_fg: Color,
    pub gauge_filled: Color,
    pub gauge_unfilled: Color,
    pub pill_key_fg: Color,
    pub pill_key_bg: Color,
    pub pill_desc_fg: Color,
    pub statusbar_bg: Color,
    pub surface_bg: Color,
    pub status_ok: Color,
    pub status_err: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            header_accent_fg: Color::Black,
            header_accent_bg: Color::Cyan,
            text_secondary: Color::Gray,
            border: Color::DarkGray,
            table_header_fg: Color::Cyan,
            gauge_filled: Color::Cyan,
            gauge_unfilled: Color::Black,
            pill_key_fg: Color::Black,
            pill_key_bg: Color::Cyan,
            pill_desc_fg: Color::Gray,
            statusbar_bg: Color::Reset,
            surface_bg: Color::Reset,
            status_ok: Color::Green,
            status_err: Color::Red,
        }
    }
}
