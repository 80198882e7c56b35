use super::caret::Caret;
use super::fill_state::FillState;
use crate::mask::Mask;

/// Buffer, fill state and caret of one masked field, edited in lockstep.
///
/// Operations here never emit anything and never fail; rejected edits leave
/// every piece of state untouched and return `false`.
#[derive(Debug, Clone)]
pub struct MaskEditor {
    mask: Mask,
    buffer: Vec<char>,
    fill: FillState,
    caret: Caret,
}

impl MaskEditor {
    pub fn new(mask: Mask) -> Self {
        let fill = FillState::new(mask.len());
        Self {
            mask,
            buffer: Vec::new(),
            fill,
            caret: Caret::default(),
        }
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn mask_mut(&mut self) -> &mut Mask {
        &mut self.mask
    }

    pub fn buffer(&self) -> &[char] {
        self.buffer.as_slice()
    }

    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_placeholder(&self) -> bool {
        self.buffer.as_slice() == self.mask.placeholder()
    }

    pub fn fill(&self) -> &FillState {
        &self.fill
    }

    pub fn caret(&self) -> Caret {
        self.caret
    }

    pub fn set_caret(&mut self, caret: Caret) {
        self.caret = caret;
    }

    pub fn seed_placeholder(&mut self) {
        self.buffer = self.mask.placeholder().to_vec();
    }

    pub fn init_fill_from_buffer(&mut self) {
        self.fill.init_from_buffer(&self.mask, &self.buffer);
    }

    /// Assigns `value` without touching fill state.
    pub fn replace_text(&mut self, value: &str) {
        self.buffer = value.chars().collect();
    }

    pub fn clear_text(&mut self) {
        self.buffer.clear();
    }

    pub fn reset_session(&mut self) {
        self.fill.clear();
        self.caret = Caret::default();
    }

    /// Types `ch` at the first editable position at or after the caret.
    pub fn insert_key(&mut self, ch: char) -> bool {
        let caret = self.caret;
        let Some(current) = self.mask.valid_position_from(caret.start()) else {
            log::trace!("rejected '{ch}': no editable position after {}", caret.start());
            return false;
        };
        if !self.mask.is_valid_key(current, ch) {
            log::trace!("rejected '{ch}' at position {current}");
            return false;
        }

        if caret.has_selection() {
            self.clear_range(caret.start(), caret.end());
        }
        self.write_at(current, ch);
        self.caret = Caret::at(self.mask.next_valid_position(current));
        true
    }

    /// Feeds `text` through [`MaskEditor::insert_key`] one character at a
    /// time and returns how many characters were accepted.
    pub fn insert_sequence(&mut self, text: &str) -> usize {
        text.chars().filter(|ch| self.insert_key(*ch)).count()
    }

    pub fn backspace(&mut self) -> bool {
        let caret = self.caret;
        if caret.has_selection() {
            self.clear_range(caret.start(), caret.end());
            self.caret = Caret::at(caret.start());
            return true;
        }

        let Some(prev) = self.mask.previous_valid_position(caret.start()) else {
            return false;
        };
        self.reset_at(prev);
        self.caret = Caret::at(prev);
        true
    }

    /// Clears the selection, or the next unfilled slot at or after the caret.
    /// The caret does not move in the second case.
    pub fn delete_forward(&mut self) -> bool {
        let caret = self.caret;
        if caret.has_selection() {
            self.clear_range(caret.start(), caret.end());
            self.caret = Caret::at(caret.start());
            return true;
        }

        let Some(pos) = self.fill.next_not_filled_position(caret.start()) else {
            return false;
        };
        self.reset_at(pos);
        true
    }

    /// Rebuilds the buffer from the placeholder and replays `raw` through the
    /// key path, normalizing arbitrary text into mask form.
    pub fn reconcile(&mut self, raw: &str) -> usize {
        self.seed_placeholder();
        self.fill.clear();
        let first = self
            .mask
            .first_valid_position()
            .unwrap_or_else(|| self.mask.past_end());
        self.caret = Caret::at(first);
        self.insert_sequence(raw)
    }

    pub fn select_all(&mut self) {
        self.caret = Caret::range(0, self.mask.len());
    }

    pub fn move_left(&mut self, extend: bool) -> bool {
        let caret = self.caret;
        let target = if extend || caret.is_collapsed() {
            caret.head().min(self.buffer.len()).saturating_sub(1)
        } else {
            caret.start()
        };
        self.move_head(target, extend)
    }

    pub fn move_right(&mut self, extend: bool) -> bool {
        let caret = self.caret;
        let len = self.buffer.len();
        let target = if extend || caret.is_collapsed() {
            caret.head().saturating_add(1).min(len)
        } else {
            caret.end().min(len)
        };
        self.move_head(target, extend)
    }

    fn move_head(&mut self, target: usize, extend: bool) -> bool {
        let next = if extend {
            self.caret.extend_to(target)
        } else {
            Caret::at(target)
        };
        let moved = next != self.caret;
        self.caret = next;
        moved
    }

    fn write_at(&mut self, pos: usize, ch: char) {
        while self.buffer.len() <= pos {
            let filler = self.mask.placeholder()[self.buffer.len()];
            self.buffer.push(filler);
        }
        self.buffer[pos] = ch;
        self.fill.mark_filled(pos, Some(ch));
    }

    fn reset_at(&mut self, pos: usize) {
        if let (Some(slot), Some(filler)) =
            (self.buffer.get_mut(pos), self.mask.placeholder_at(pos))
        {
            *slot = filler;
        }
        self.fill.mark_filled(pos, None);
    }

    fn clear_range(&mut self, start: usize, end: usize) {
        for pos in start..end.min(self.mask.len()) {
            self.reset_at(pos);
        }
    }
}
