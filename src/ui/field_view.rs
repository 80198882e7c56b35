use crate::field::MaskedInput;
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub line: SpanLine,
    /// Display column of the caret, relative to the start of the field.
    pub cursor_col: usize,
}

fn placeholder_style() -> Style {
    Style::new().color(Color::DarkGrey)
}

fn selection_style() -> Style {
    Style::new().reverse()
}

/// Renders the field buffer. An empty, unfocused field shows its placeholder
/// dimmed, the way a native input shows its placeholder attribute.
pub fn render_field(input: &MaskedInput) -> FieldView {
    let mask = input.mask();
    let buffer = input.buffer();

    if buffer.is_empty() && !input.is_focused() {
        return FieldView {
            line: vec![Span::styled(mask.placeholder_string(), placeholder_style())],
            cursor_col: 0,
        };
    }

    let caret = input.caret();
    let selecting = input.is_focused() && caret.has_selection();
    let mut line = SpanLine::new();
    for (pos, ch) in buffer.iter().copied().enumerate() {
        let style = if selecting && (caret.start()..caret.end()).contains(&pos) {
            selection_style()
        } else if mask.is_literal(pos)
            || input.fill_state().is_filled(pos)
            || mask.placeholder_at(pos) != Some(ch)
        {
            Style::default()
        } else {
            placeholder_style()
        };
        push_char(&mut line, ch, style);
    }

    let cursor_col = buffer
        .iter()
        .take(caret.head())
        .map(|ch| ch.width().unwrap_or(0))
        .sum();

    FieldView { line, cursor_col }
}

fn push_char(line: &mut SpanLine, ch: char, style: Style) {
    if let Some(last) = line.last_mut()
        && last.style == style
    {
        last.text.push(ch);
        return;
    }
    line.push(Span::styled(ch.to_string(), style));
}
