use super::Mask;

impl Mask {
    /// First editable position strictly after `pos`, or [`Mask::past_end`].
    pub fn next_valid_position(&self, pos: usize) -> usize {
        self.valid_position_from(pos + 1)
            .unwrap_or_else(|| self.past_end())
    }

    /// First editable position at or after `pos`.
    pub fn valid_position_from(&self, pos: usize) -> Option<usize> {
        (pos..self.len()).find(|&idx| !self.is_literal(idx))
    }

    /// Last editable position strictly before `pos`.
    pub fn previous_valid_position(&self, pos: usize) -> Option<usize> {
        (0..pos.min(self.len()))
            .rev()
            .find(|&idx| !self.is_literal(idx))
    }

    pub fn first_valid_position(&self) -> Option<usize> {
        self.valid_position_from(0)
    }

    /// First editable slot of `buffer` that still shows its placeholder glyph.
    pub fn first_available_position(&self, buffer: &[char]) -> Option<usize> {
        (0..self.len()).find(|&idx| {
            !self.is_literal(idx)
                && buffer
                    .get(idx)
                    .is_some_and(|ch| self.placeholder_at(idx) == Some(*ch))
        })
    }
}
