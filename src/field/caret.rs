/// Caret or selection inside the field buffer.
///
/// `anchor` stays put while `head` follows extension, so a range can grow in
/// either direction. [`Caret::start`] and [`Caret::end`] give the ordered
/// half-open range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caret {
    anchor: usize,
    head: usize,
}

impl Caret {
    pub fn at(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn range(start: usize, end: usize) -> Self {
        Self {
            anchor: start,
            head: end,
        }
    }

    pub fn start(self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn head(self) -> usize {
        self.head
    }

    pub fn is_collapsed(self) -> bool {
        self.anchor == self.head
    }

    pub fn has_selection(self) -> bool {
        !self.is_collapsed()
    }

    pub fn extend_to(self, head: usize) -> Self {
        Self {
            anchor: self.anchor,
            head,
        }
    }
}
