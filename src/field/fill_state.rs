use crate::mask::Mask;

/// Per-position record of characters the user has supplied.
///
/// A slot is `Some` only when a character that passed the mask grammar was
/// written there. Literal positions are never marked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillState {
    slots: Vec<Option<char>>,
}

impl FillState {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, pos: usize) -> Option<char> {
        self.slots.get(pos).copied().flatten()
    }

    pub fn is_filled(&self, pos: usize) -> bool {
        self.get(pos).is_some()
    }

    pub fn any_filled(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    pub fn mark_filled(&mut self, pos: usize, value: Option<char>) {
        if let Some(slot) = self.slots.get_mut(pos) {
            *slot = value;
        }
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    /// Re-derives every slot from `buffer`. Placeholder glyphs, characters
    /// the mask does not accept at their index, and indexes past the buffer
    /// become unfilled.
    pub fn init_from_buffer(&mut self, mask: &Mask, buffer: &[char]) {
        self.slots = (0..mask.len())
            .map(|pos| {
                buffer
                    .get(pos)
                    .copied()
                    .filter(|ch| mask.placeholder_at(pos) != Some(*ch))
                    .filter(|ch| mask.is_valid_key(pos, *ch))
            })
            .collect();
    }

    /// First index at or after `from` whose slot is unfilled. Literal
    /// positions qualify since they are never marked.
    pub fn next_not_filled_position(&self, from: usize) -> Option<usize> {
        (from..self.slots.len()).find(|&pos| self.slots[pos].is_none())
    }
}
