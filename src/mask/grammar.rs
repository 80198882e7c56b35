use indexmap::IndexMap;
use regex::Regex;

use super::MaskError;

pub const DIGIT: char = '9';
pub const ALPHA: char = 'a';
pub const ANY: char = '*';

pub const BUILTIN_TOKENS: [char; 3] = [DIGIT, ALPHA, ANY];

/// Acceptance rules for mask characters.
///
/// The three built-in tokens are always present. Extra single-character
/// tokens can be registered with an anchored regular expression that is
/// matched against the typed character.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    custom: IndexMap<char, Regex>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: char, pattern: &str) -> Result<Self, MaskError> {
        self.add_token(token, pattern)?;
        Ok(self)
    }

    pub fn add_token(&mut self, token: char, pattern: &str) -> Result<(), MaskError> {
        if BUILTIN_TOKENS.contains(&token) {
            return Err(MaskError::ReservedToken(token));
        }
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(anchored.as_str())
            .map_err(|source| MaskError::InvalidToken { token, source })?;
        self.custom.insert(token, regex);
        Ok(())
    }

    pub fn custom_tokens(&self) -> impl Iterator<Item = char> + '_ {
        self.custom.keys().copied()
    }

    /// Whether `input` may be typed onto a position governed by `mask_char`.
    /// Literals and unknown mask characters never accept input.
    pub fn is_valid_key(&self, mask_char: char, input: char) -> bool {
        match mask_char {
            DIGIT => input.is_ascii_digit(),
            ALPHA => input.is_ascii_alphabetic(),
            ANY => !is_line_terminator(input),
            other => match self.custom.get(&other) {
                Some(regex) => {
                    let mut buf = [0u8; 4];
                    regex.is_match(input.encode_utf8(&mut buf))
                }
                None => false,
            },
        }
    }
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
