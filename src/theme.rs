use ratatui::style::Color;

/// Line colours for hosts, assigned in the order hosts were added.
const SERIES_PALETTE: [Color; 8] = [
    Color::Rgb(0x1f, 0x77, 0xb4),
    Color::Rgb(0xff, 0x7f, 0x0e),
    Color::Rgb(0x2c, 0xa0, 0x2c),
    Color::Rgb(0xd6, 0x27, 0x28),
    Color::Rgb(0x94, 0x67, 0xbd),
    Color::Rgb(0x8c, 0x56, 0x4b),
    Color::Rgb(0xe3, 0x77, 0xc2),
    Color::Rgb(0x7f, 0x7f, 0x7f),
];

#[derive(Debug, Clone, Copy)]
pub struct Theme;

impl Theme {
    pub fn new() -> Self {
        Self
    }

    pub fn primary(&self) -> Color {
        Color::Cyan
    }

    pub fn text(&self) -> Color {
        Color::Reset
    }

    pub fn text_dim(&self) -> Color {
        Color::Indexed(8)
    }

    pub fn background(&self) -> Color {
        Color::Reset
    }

    pub fn warning(&self) -> Color {
        Color::Yellow
    }

    pub fn error(&self) -> Color {
        Color::Red
    }

    pub fn border(&self) -> Color {
        Color::Indexed(8)
    }

    pub fn border_focused(&self) -> Color {
        Color::Cyan
    }

    pub fn highlight(&self) -> Color {
        Color::Yellow
    }

    pub fn axis(&self) -> Color {
        Color::Gray
    }

    pub fn series(&self, index: usize) -> Color {
        SERIES_PALETTE[index % SERIES_PALETTE.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}
