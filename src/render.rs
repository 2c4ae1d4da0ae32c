use std::io::{self, Write};

use crossterm::{
    queue,
    style::{
        Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
        SetForegroundColor,
    },
};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use tdoc::InlineStyle;
use unicode_width::UnicodeWidthChar;

use crate::cloze::{ClozeSpan, scan_sorted};
use crate::document::{ElementKind, Node, NodePath, flatten};
use crate::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaretPosition {
    pub line: usize,
    pub column: u16,
}

#[derive(Debug)]
pub struct Preview {
    pub lines: Vec<Line<'static>>,
    pub caret: Option<CaretPosition>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Plain,
    Delimiter,
    Content,
    Hint,
}

/// Renders the flat view of `root`, one line per block, with cloze markup
/// and the caret highlighted.
pub fn render_preview(root: &Node, caret: Option<usize>, theme: &Theme) -> Preview {
    let text = flatten(root);
    let roles = classify(text.chars().count(), &scan_sorted(&text));
    let mut renderer = Renderer::new(theme, caret);

    let mut offset = 0;
    let mut current_block: Option<Vec<usize>> = None;
    for (path, chunk) in root.text_nodes() {
        let (block, base) = text_context(root, &path, theme);
        if current_block.as_ref() != Some(&block) {
            if current_block.is_some() {
                renderer.break_line();
            }
            current_block = Some(block);
        }
        for ch in chunk.chars() {
            let role = roles.get(offset).copied().unwrap_or(Role::Plain);
            renderer.push(ch, style_for(role, base, theme), offset);
            offset += 1;
        }
    }
    renderer.finish()
}

/// One listing line: `c<N> <open>..<close> content [hint]`.
pub fn listing_line(text: &str, span: &ClozeSpan, theme: &Theme) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!("c{}", span.ordinal), theme.ordinal_style()),
        Span::raw(format!(" {}..{} ", span.open_start, span.close_end)),
        Span::styled(span.content_text(text), theme.content_style()),
    ];
    if let Some(hint) = span.hint_text(text) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("[{hint}]"), theme.hint_style()));
    }
    Line::from(spans)
}

pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

/// Writes `lines` to `out`, with terminal colors when `color` is set.
pub fn print_lines<W: Write>(out: &mut W, lines: &[Line<'_>], color: bool) -> io::Result<()> {
    for line in lines {
        print_line(out, line, color)?;
    }
    out.flush()
}

/// Like [`print_lines`]. Without colors the caret is marked with `^` on the
/// line below it.
pub fn print_preview<W: Write>(out: &mut W, preview: &Preview, color: bool) -> io::Result<()> {
    for (idx, line) in preview.lines.iter().enumerate() {
        print_line(out, line, color)?;
        if let Some(caret) = preview.caret.filter(|caret| caret.line == idx && !color) {
            let marker = format!("{}^\n", " ".repeat(caret.column as usize));
            queue!(out, Print(marker))?;
        }
    }
    out.flush()
}

fn print_line<W: Write>(out: &mut W, line: &Line<'_>, color: bool) -> io::Result<()> {
    for span in &line.spans {
        if color {
            apply_style(out, span.style)?;
        }
        queue!(out, Print(span.content.as_ref()))?;
        if color {
            queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
        }
    }
    queue!(out, Print("\n"))
}

fn apply_style<W: Write>(out: &mut W, style: Style) -> io::Result<()> {
    if let Some(fg) = style.fg {
        queue!(out, SetForegroundColor(term_color(fg)))?;
    }
    if let Some(bg) = style.bg {
        queue!(out, SetBackgroundColor(term_color(bg)))?;
    }
    const ATTRIBUTES: [(Modifier, Attribute); 6] = [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::CROSSED_OUT, Attribute::CrossedOut),
        (Modifier::REVERSED, Attribute::Reverse),
    ];
    for (modifier, attribute) in ATTRIBUTES {
        if style.add_modifier.contains(modifier) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    Ok(())
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(idx) => TermColor::AnsiValue(idx),
    }
}

/// Role of every character of the flat view. Inner spans are filled after
/// the spans around them.
fn classify(len: usize, spans: &[ClozeSpan]) -> Vec<Role> {
    let mut roles = vec![Role::Plain; len];
    let mut fill = |range: std::ops::Range<usize>, role: Role| {
        for slot in roles.iter_mut().take(range.end).skip(range.start) {
            *slot = role;
        }
    };
    for span in spans {
        fill(span.open_start..span.content_start, Role::Delimiter);
        fill(span.content_range(), Role::Content);
        if let Some(hint) = span.hint_range() {
            fill(span.content_end..hint.start, Role::Delimiter);
            fill(hint, Role::Hint);
        }
        fill(span.close_end.saturating_sub(2)..span.close_end, Role::Delimiter);
    }
    roles
}

/// The path of the closest block around the text node at `path` and the
/// inline formatting applied to it.
fn text_context(root: &Node, path: &NodePath, theme: &Theme) -> (Vec<usize>, Style) {
    let indices = path.indices();
    let mut block = Vec::new();
    let mut style = Style::default();
    let mut node = root;
    for (depth, &idx) in indices.iter().enumerate() {
        let Some(child) = node.children().get(idx) else {
            break;
        };
        node = child;
        match node.kind() {
            Some(ElementKind::Inline { style: inline, .. }) => {
                style = merge_style(style, *inline, theme);
            }
            Some(_) => block = indices[..=depth].to_vec(),
            None => {}
        }
    }
    (block, style)
}

fn merge_style(base: Style, inline: InlineStyle, theme: &Theme) -> Style {
    match inline {
        InlineStyle::None => base,
        InlineStyle::Bold => base.add_modifier(Modifier::BOLD),
        InlineStyle::Italic => base.add_modifier(Modifier::ITALIC),
        InlineStyle::Highlight => base.patch(theme.highlight_style()),
        InlineStyle::Underline => base.add_modifier(Modifier::UNDERLINED),
        InlineStyle::Strike => base.add_modifier(Modifier::CROSSED_OUT),
        InlineStyle::Link => base.patch(theme.link_style()),
        InlineStyle::Code => base.patch(theme.code_style()),
    }
}

fn style_for(role: Role, base: Style, theme: &Theme) -> Style {
    match role {
        Role::Plain => base,
        Role::Delimiter => theme.delimiter_style(),
        Role::Content => theme.content_style().patch(base),
        Role::Hint => theme.hint_style().patch(base),
    }
}

struct Renderer<'a> {
    theme: &'a Theme,
    caret_offset: Option<usize>,
    caret: Option<CaretPosition>,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    run: String,
    run_style: Style,
    width: usize,
}

impl<'a> Renderer<'a> {
    fn new(theme: &'a Theme, caret_offset: Option<usize>) -> Self {
        Self {
            theme,
            caret_offset,
            caret: None,
            lines: Vec::new(),
            spans: Vec::new(),
            run: String::new(),
            run_style: Style::default(),
            width: 0,
        }
    }

    fn push(&mut self, ch: char, style: Style, offset: usize) {
        let style = if self.caret_offset == Some(offset) {
            self.mark_caret();
            style.patch(self.theme.caret_style())
        } else {
            style
        };
        if ch == '\n' {
            self.break_line();
            return;
        }
        if style != self.run_style {
            self.flush_run();
            self.run_style = style;
        }
        self.run.push(ch);
        self.width += UnicodeWidthChar::width(ch).unwrap_or(0);
    }

    fn mark_caret(&mut self) {
        self.caret = Some(CaretPosition {
            line: self.lines.len(),
            column: u16::try_from(self.width).unwrap_or(u16::MAX),
        });
    }

    fn flush_run(&mut self) {
        if !self.run.is_empty() {
            let run = std::mem::take(&mut self.run);
            self.spans.push(Span::styled(run, self.run_style));
        }
    }

    fn break_line(&mut self) {
        self.flush_run();
        let spans = std::mem::take(&mut self.spans);
        self.lines.push(Line::from(spans));
        self.width = 0;
    }

    fn finish(mut self) -> Preview {
        if self.caret_offset.is_some() && self.caret.is_none() {
            // Caret past the last character.
            self.mark_caret();
            self.flush_run();
            self.spans
                .push(Span::styled(" ", self.theme.caret_style()));
        }
        self.break_line();
        Preview {
            lines: self.lines,
            caret: self.caret,
        }
    }
}
