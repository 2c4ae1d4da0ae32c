use ratatui::style::{Color, Modifier, Style};

/// Colors of the cloze preview
#[derive(Clone, Debug)]
pub struct Theme {
    /// Foreground color for `{{cN::`, `::` and `}}`
    pub delimiter_fg: Color,

    /// Background color for `{{cN::`, `::` and `}}`
    pub delimiter_bg: Color,

    /// Foreground color for cloze content
    pub content_fg: Color,

    /// Background color for cloze content
    pub content_bg: Color,

    /// Foreground color for hints
    pub hint_fg: Color,

    /// Foreground color for the caret cell
    pub caret_fg: Color,

    /// Background color for the caret cell
    pub caret_bg: Color,

    /// Foreground color for highlighted text (InlineStyle::Highlight)
    pub highlight_fg: Color,

    /// Background color for highlighted text (InlineStyle::Highlight)
    pub highlight_bg: Color,

    /// Color for links
    pub link_color: Color,

    /// Color for inline code
    pub code_color: Color,

    /// Color for the `cN` label in listings
    pub ordinal_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            delimiter_fg: Color::Black,
            delimiter_bg: Color::Gray,
            content_fg: Color::Reset,
            content_bg: Color::LightYellow,
            hint_fg: Color::DarkGray,
            caret_fg: Color::White,
            caret_bg: Color::LightBlue,
            highlight_fg: Color::Black,
            highlight_bg: Color::LightYellow,
            link_color: Color::Blue,
            code_color: Color::Magenta,
            ordinal_color: Color::LightGreen,
        }
    }
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    /// A theme without any colors, for `NO_COLOR` and `--no-color`.
    pub fn plain() -> Self {
        Self {
            delimiter_fg: Color::Reset,
            delimiter_bg: Color::Reset,
            content_fg: Color::Reset,
            content_bg: Color::Reset,
            hint_fg: Color::Reset,
            caret_fg: Color::Reset,
            caret_bg: Color::Reset,
            highlight_fg: Color::Reset,
            highlight_bg: Color::Reset,
            link_color: Color::Reset,
            code_color: Color::Reset,
            ordinal_color: Color::Reset,
        }
    }

    pub fn delimiter_style(&self) -> Style {
        Style::default().fg(self.delimiter_fg).bg(self.delimiter_bg)
    }

    pub fn content_style(&self) -> Style {
        Style::default().fg(self.content_fg).bg(self.content_bg)
    }

    pub fn hint_style(&self) -> Style {
        Style::default()
            .fg(self.hint_fg)
            .add_modifier(Modifier::ITALIC)
    }

    /// Get the style for the caret cell (reversed so it shows without colors)
    pub fn caret_style(&self) -> Style {
        Style::default()
            .fg(self.caret_fg)
            .bg(self.caret_bg)
            .add_modifier(Modifier::REVERSED)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default().fg(self.highlight_fg).bg(self.highlight_bg)
    }

    pub fn link_style(&self) -> Style {
        Style::default()
            .fg(self.link_color)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn code_style(&self) -> Style {
        Style::default().fg(self.code_color)
    }

    pub fn ordinal_style(&self) -> Style {
        Style::default()
            .fg(self.ordinal_color)
            .add_modifier(Modifier::BOLD)
    }
}
