pub mod grammar;
mod position;

use thiserror::Error;

pub use grammar::Grammar;

pub const DEFAULT_SPECIAL_CHARACTERS: [char; 7] = [' ', '/', '(', ')', '+', '-', '.'];

#[derive(Debug, Error)]
pub enum MaskError {
    #[error("mask must not be empty")]
    Empty,
    #[error("placeholder has {placeholder} characters but the mask has {mask}")]
    PlaceholderLength { mask: usize, placeholder: usize },
    #[error("placeholder has '{found}' at position {pos} where the mask has literal '{literal}'")]
    PlaceholderLiteral {
        pos: usize,
        literal: char,
        found: char,
    },
    #[error("invalid pattern for mask token '{token}': {source}")]
    InvalidToken {
        token: char,
        #[source]
        source: regex::Error,
    },
    #[error("'{0}' is a built-in mask token and cannot be redefined")]
    ReservedToken(char),
    #[error("'{0}' is both a mask token and a special character")]
    TokenIsSpecial(char),
}

/// A positional input template together with its placeholder.
///
/// Positions whose mask character is in the special-character set are
/// literals. Every other position is editable, and the [`Grammar`] decides
/// which characters it accepts.
#[derive(Debug, Clone)]
pub struct Mask {
    tokens: Vec<char>,
    placeholder: Vec<char>,
    special: Vec<char>,
    grammar: Grammar,
}

impl Mask {
    pub fn new(mask: &str, placeholder: &str) -> Result<Self, MaskError> {
        Self::with_options(
            mask,
            placeholder,
            DEFAULT_SPECIAL_CHARACTERS.to_vec(),
            Grammar::default(),
        )
    }

    pub fn with_options(
        mask: &str,
        placeholder: &str,
        special: Vec<char>,
        grammar: Grammar,
    ) -> Result<Self, MaskError> {
        let tokens: Vec<char> = mask.chars().collect();
        if tokens.is_empty() {
            return Err(MaskError::Empty);
        }
        let placeholder = check_placeholder(&tokens, &special, placeholder)?;
        if let Some(token) = grammar.custom_tokens().find(|token| special.contains(token)) {
            return Err(MaskError::TokenIsSpecial(token));
        }

        Ok(Self {
            tokens,
            placeholder,
            special,
            grammar,
        })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Caret value reported when no editable position remains.
    pub fn past_end(&self) -> usize {
        self.tokens.len() + 1
    }

    pub fn placeholder(&self) -> &[char] {
        self.placeholder.as_slice()
    }

    pub fn placeholder_string(&self) -> String {
        self.placeholder.iter().collect()
    }

    pub fn placeholder_at(&self, pos: usize) -> Option<char> {
        self.placeholder.get(pos).copied()
    }

    pub fn special_characters(&self) -> &[char] {
        self.special.as_slice()
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Replaces the placeholder glyphs. The length and the literals must stay
    /// the same.
    pub fn set_placeholder(&mut self, placeholder: &str) -> Result<(), MaskError> {
        self.placeholder = check_placeholder(&self.tokens, &self.special, placeholder)?;
        Ok(())
    }

    pub fn is_literal(&self, pos: usize) -> bool {
        self.tokens
            .get(pos)
            .is_some_and(|token| self.special.contains(token))
    }

    pub fn is_valid_key(&self, pos: usize, input: char) -> bool {
        self.tokens
            .get(pos)
            .is_some_and(|token| self.grammar.is_valid_key(*token, input))
    }

    /// Whether `value` may be assigned verbatim: every character either equals
    /// the placeholder at its index or is accepted by the mask there.
    pub fn accepts_value(&self, value: &str) -> bool {
        value.chars().enumerate().all(|(pos, ch)| {
            self.placeholder_at(pos) == Some(ch) || self.is_valid_key(pos, ch)
        })
    }
}

fn check_placeholder(
    tokens: &[char],
    special: &[char],
    placeholder: &str,
) -> Result<Vec<char>, MaskError> {
    let placeholder: Vec<char> = placeholder.chars().collect();
    if placeholder.len() != tokens.len() {
        return Err(MaskError::PlaceholderLength {
            mask: tokens.len(),
            placeholder: placeholder.len(),
        });
    }
    let mismatch = tokens
        .iter()
        .zip(&placeholder)
        .enumerate()
        .find(|(_, (token, glyph))| special.contains(*token) && token != glyph);
    if let Some((pos, (literal, found))) = mismatch {
        return Err(MaskError::PlaceholderLiteral {
            pos,
            literal: *literal,
            found: *found,
        });
    }
    Ok(placeholder)
}
