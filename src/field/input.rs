use super::caret::Caret;
use super::editor::MaskEditor;
use super::fill_state::FillState;
use super::id::FieldId;
use crate::mask::{Mask, MaskError};
use crate::runtime::event::{FieldEvent, KeyOutcome};
use crate::runtime::scheduler::{DeferredAction, Scheduler};
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};

/// A masked text field with focus/blur lifecycle and change notifications.
///
/// Every top-level operation (key, paste, raw input) compares the buffer
/// before and after and queues at most one [`FieldEvent::ValueChanged`].
/// Hosts collect them with [`MaskedInput::drain_events`].
#[derive(Debug, Clone)]
pub struct MaskedInput {
    id: FieldId,
    editor: MaskEditor,
    focused: bool,
    events: Vec<FieldEvent>,
}

impl MaskedInput {
    pub fn new(id: impl Into<FieldId>, mask: Mask) -> Self {
        Self {
            id: id.into(),
            editor: MaskEditor::new(mask),
            focused: false,
            events: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn id(&self) -> &FieldId {
        &self.id
    }

    pub fn mask(&self) -> &Mask {
        self.editor.mask()
    }

    pub fn value(&self) -> String {
        self.editor.text()
    }

    pub fn buffer(&self) -> &[char] {
        self.editor.buffer()
    }

    pub fn caret(&self) -> Caret {
        self.editor.caret()
    }

    pub fn fill_state(&self) -> &FillState {
        self.editor.fill()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_caret(&mut self, pos: usize) {
        self.editor.set_caret(Caret::at(pos));
    }

    pub fn select(&mut self, start: usize, end: usize) {
        self.editor.set_caret(Caret::range(start, end));
    }

    /// Changes the placeholder glyphs used for future clears and rendering.
    /// The current buffer and fill state are left alone.
    pub fn set_placeholder(&mut self, placeholder: &str) -> Result<(), MaskError> {
        self.editor.mask_mut().set_placeholder(placeholder)
    }

    /// External assignment. Values the mask cannot hold empty the field.
    pub fn set_value(&mut self, value: &str) {
        if self.editor.mask().accepts_value(value) {
            self.editor.replace_text(value);
        } else {
            log::debug!("field {}: rejected external value {value:?}", self.id);
            self.editor.clear_text();
        }
    }

    pub fn focus(&mut self, scheduler: &mut Scheduler) {
        self.focused = true;
        self.editor.init_fill_from_buffer();
        if self.editor.is_empty() {
            self.editor.seed_placeholder();
            scheduler.after_turn(self.id.clone(), DeferredAction::PlaceCaretAtFirstAvailable);
        } else {
            scheduler.after_turn(self.id.clone(), DeferredAction::SelectAll);
        }
    }

    /// Applies a continuation queued by [`MaskedInput::focus`]. State is read
    /// at run time, so running the same action twice is harmless.
    pub fn run_deferred(&mut self, action: DeferredAction) {
        if !self.focused {
            return;
        }
        match action {
            DeferredAction::PlaceCaretAtFirstAvailable => {
                let mask = self.editor.mask();
                let pos = mask
                    .first_available_position(self.editor.buffer())
                    .unwrap_or(self.editor.buffer().len());
                self.editor.set_caret(Caret::at(pos));
            }
            DeferredAction::SelectAll => self.editor.select_all(),
        }
    }

    /// Ends the editing session and drops any placement still queued by
    /// [`MaskedInput::focus`].
    pub fn blur(&mut self, scheduler: &mut Scheduler) {
        scheduler.cancel(&self.id);
        if self.editor.is_placeholder() && !self.editor.fill().any_filled() {
            self.editor.clear_text();
        }
        self.focused = false;
        self.editor.reset_session();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if !self.focused {
            return KeyOutcome::Ignored;
        }
        if key.is_command() {
            return KeyOutcome::Passthrough;
        }

        let before = self.editor.text();
        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        let outcome = match key.code {
            KeyCode::Tab | KeyCode::BackTab => KeyOutcome::Passthrough,
            KeyCode::Left => {
                self.editor.move_left(extend);
                KeyOutcome::Passthrough
            }
            KeyCode::Right => {
                self.editor.move_right(extend);
                KeyOutcome::Passthrough
            }
            KeyCode::Backspace => accepted(self.editor.backspace()),
            KeyCode::Delete => accepted(self.editor.delete_forward()),
            KeyCode::Char(ch) => accepted(self.editor.insert_key(ch)),
            _ => KeyOutcome::Ignored,
        };
        self.emit_if_changed(before);
        outcome
    }

    /// Types `text` from the caret as if each character were a key press.
    /// Returns whether the buffer changed.
    pub fn paste(&mut self, text: &str) -> bool {
        if !self.focused {
            return false;
        }
        let before = self.editor.text();
        let accepted = self.editor.insert_sequence(text);
        log::trace!("field {}: pasted {accepted} of {} chars", self.id, text.chars().count());
        self.emit_if_changed(before)
    }

    /// Reconciles text that reached the field without going through key
    /// handling (autofill, host assignment) into mask form.
    pub fn handle_input(&mut self, raw: &str) -> bool {
        let before = self.editor.text();
        self.editor.reconcile(raw);
        self.emit_if_changed(before)
    }

    /// Every editable position holds a character the user supplied.
    pub fn is_complete(&self) -> bool {
        let mask = self.editor.mask();
        (0..mask.len())
            .filter(|pos| !mask.is_literal(*pos))
            .all(|pos| self.holds_input(pos))
    }

    /// User-supplied characters only, without literals or placeholder glyphs.
    pub fn raw_value(&self) -> String {
        let mask = self.editor.mask();
        (0..mask.len())
            .filter(|pos| !mask.is_literal(*pos) && self.holds_input(*pos))
            .filter_map(|pos| self.editor.buffer().get(pos).copied())
            .collect()
    }

    pub fn drain_events(&mut self) -> Vec<FieldEvent> {
        std::mem::take(&mut self.events)
    }

    fn holds_input(&self, pos: usize) -> bool {
        let Some(ch) = self.editor.buffer().get(pos).copied() else {
            return false;
        };
        let mask = self.editor.mask();
        mask.is_valid_key(pos, ch)
            && (self.editor.fill().is_filled(pos) || mask.placeholder_at(pos) != Some(ch))
    }

    fn emit_if_changed(&mut self, before: String) -> bool {
        let value = self.editor.text();
        if value == before {
            return false;
        }
        log::debug!("field {}: value changed to {value:?}", self.id);
        self.events.push(FieldEvent::ValueChanged {
            id: self.id.clone(),
            value,
        });
        true
    }
}

fn accepted(changed: bool) -> KeyOutcome {
    if changed {
        KeyOutcome::Handled
    } else {
        KeyOutcome::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::MaskedInput;
    use crate::field::caret::Caret;
    use crate::mask::Mask;
    use crate::runtime::event::{FieldEvent, KeyOutcome};
    use crate::runtime::scheduler::{DeferredAction, Scheduler};
    use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};

    fn date_input() -> MaskedInput {
        MaskedInput::new(
            "date",
            Mask::new("99/99/9999", "dd/mm/yyyy").expect("mask"),
        )
    }

    fn focus_and_settle(input: &mut MaskedInput) {
        let mut scheduler = Scheduler::new();
        input.focus(&mut scheduler);
        for task in scheduler.drain_ready() {
            assert_eq!(&task.target, input.id());
            input.run_deferred(task.action);
        }
    }

    fn changes(input: &mut MaskedInput) -> Vec<String> {
        input
            .drain_events()
            .into_iter()
            .map(|event| match event {
                FieldEvent::ValueChanged { value, .. } => value,
            })
            .collect()
    }

    #[test]
    fn focus_on_empty_field_seeds_placeholder() {
        let mut input = date_input();
        let mut scheduler = Scheduler::new();
        input.focus(&mut scheduler);

        assert_eq!(input.value(), "dd/mm/yyyy");
        assert!(!scheduler.is_idle());

        for task in scheduler.drain_ready() {
            input.run_deferred(task.action);
        }
        assert_eq!(input.caret(), Caret::at(0));
        assert!(changes(&mut input).is_empty());
    }

    #[test]
    fn focus_on_filled_field_selects_everything() {
        let mut input = date_input().with_value("31/12/2024");
        focus_and_settle(&mut input);
        assert_eq!(input.caret(), Caret::range(0, 10));
        assert_eq!(input.fill_state().get(9), Some('4'));
    }

    #[test]
    fn deferred_placement_targets_first_free_slot() {
        let mut input = date_input();
        focus_and_settle(&mut input);
        input.handle_key(KeyEvent::char('1'));
        input.handle_key(KeyEvent::char('2'));

        input.run_deferred(DeferredAction::PlaceCaretAtFirstAvailable);
        assert_eq!(input.caret(), Caret::at(3));
    }

    #[test]
    fn deferred_action_after_blur_is_dropped() {
        let mut input = date_input();
        let mut scheduler = Scheduler::new();
        input.focus(&mut scheduler);
        input.blur(&mut scheduler);
        assert!(scheduler.drain_ready().is_empty());

        input.run_deferred(DeferredAction::PlaceCaretAtFirstAvailable);
        assert_eq!(input.value(), "");
        assert_eq!(input.caret(), Caret::at(0));
    }

    #[test]
    fn blur_then_focus_on_untouched_field_is_idempotent() {
        let mut input = date_input();
        for _ in 0..3 {
            focus_and_settle(&mut input);
            assert_eq!(input.value(), "dd/mm/yyyy");
            input.blur(&mut Scheduler::new());
            assert_eq!(input.value(), "");
        }
        assert!(changes(&mut input).is_empty());
    }

    #[test]
    fn blur_keeps_typed_value() {
        let mut input = date_input();
        focus_and_settle(&mut input);
        input.handle_key(KeyEvent::char('3'));
        input.blur(&mut Scheduler::new());
        assert_eq!(input.value(), "3d/mm/yyyy");
        assert!(!input.is_focused());
    }

    #[test]
    fn refocus_does_not_count_accepted_placeholder_glyphs_as_input() {
        let mut input = MaskedInput::new(
            "date",
            Mask::new("99/99/9999", "00/00/0000").expect("mask"),
        );
        let mut scheduler = Scheduler::new();
        focus_and_settle(&mut input);
        input.handle_key(KeyEvent::char('1'));
        input.blur(&mut scheduler);
        assert_eq!(input.value(), "10/00/0000");

        focus_and_settle(&mut input);
        assert!(input.fill_state().is_filled(0));
        assert!(!input.fill_state().is_filled(1));
        assert!(!input.is_complete());
        assert_eq!(input.raw_value(), "1");

        input.set_caret(1);
        input.handle_key(KeyEvent::plain(KeyCode::Backspace));
        assert_eq!(input.value(), "00/00/0000");
        assert!(!input.fill_state().any_filled());

        input.blur(&mut scheduler);
        assert_eq!(input.value(), "");
    }

    #[test]
    fn typing_moves_to_next_editable_position() {
        let mut input = date_input();
        focus_and_settle(&mut input);

        assert_eq!(input.handle_key(KeyEvent::char('1')), KeyOutcome::Handled);
        assert_eq!(input.value(), "1d/mm/yyyy");
        assert_eq!(input.caret(), Caret::at(1));
        assert_eq!(changes(&mut input), vec!["1d/mm/yyyy".to_string()]);
    }

    #[test]
    fn rejected_key_emits_nothing() {
        let mut input = date_input();
        focus_and_settle(&mut input);
        assert_eq!(input.handle_key(KeyEvent::char('x')), KeyOutcome::Rejected);
        assert_eq!(input.value(), "dd/mm/yyyy");
        assert!(changes(&mut input).is_empty());
    }

    #[test]
    fn retyping_same_char_emits_nothing() {
        let mut input = date_input().with_value("1d/mm/yyyy");
        focus_and_settle(&mut input);
        input.set_caret(0);
        assert_eq!(input.handle_key(KeyEvent::char('1')), KeyOutcome::Handled);
        assert!(changes(&mut input).is_empty());
    }

    #[test]
    fn backspace_over_selection_resets_range() {
        let mut input = date_input().with_value("31/11/yyyy");
        focus_and_settle(&mut input);
        input.select(0, 4);

        assert_eq!(
            input.handle_key(KeyEvent::plain(KeyCode::Backspace)),
            KeyOutcome::Handled
        );
        assert_eq!(input.value(), "dd/m1/yyyy");
        assert_eq!(input.caret(), Caret::at(0));
        assert_eq!(changes(&mut input), vec!["dd/m1/yyyy".to_string()]);
    }

    #[test]
    fn type_then_backspace_restores_placeholder() {
        let mut input = date_input();
        focus_and_settle(&mut input);
        input.set_caret(3);
        input.handle_key(KeyEvent::char('7'));
        assert_eq!(input.caret(), Caret::at(4));

        input.handle_key(KeyEvent::plain(KeyCode::Backspace));
        assert_eq!(input.value(), "dd/mm/yyyy");
        assert_eq!(input.caret(), Caret::at(3));
        assert!(!input.fill_state().is_filled(3));
    }

    #[test]
    fn backspace_at_start_is_rejected() {
        let mut input = date_input();
        focus_and_settle(&mut input);
        assert_eq!(
            input.handle_key(KeyEvent::plain(KeyCode::Backspace)),
            KeyOutcome::Rejected
        );
        assert!(changes(&mut input).is_empty());
    }

    #[test]
    fn last_digit_sends_caret_past_end() {
        let mut input = MaskedInput::new("tel", Mask::new("+9999", "+dddd").expect("mask"));
        focus_and_settle(&mut input);
        input.set_caret(4);
        input.handle_key(KeyEvent::char('0'));
        assert_eq!(input.value(), "+ddd0");
        assert_eq!(input.caret(), Caret::at(6));
    }

    #[test]
    fn delete_keeps_caret_in_place() {
        let mut input = date_input().with_value("12/34/yyyy");
        focus_and_settle(&mut input);
        input.set_caret(3);
        assert_eq!(
            input.handle_key(KeyEvent::plain(KeyCode::Delete)),
            KeyOutcome::Handled
        );
        assert_eq!(input.value(), "12/34/yyyy");
        assert_eq!(input.caret(), Caret::at(3));
        assert!(changes(&mut input).is_empty());

        input.select(0, 2);
        input.handle_key(KeyEvent::plain(KeyCode::Delete));
        assert_eq!(input.value(), "dd/34/yyyy");
        assert_eq!(input.caret(), Caret::at(0));
    }

    #[test]
    fn paste_emits_once() {
        let mut input = date_input();
        focus_and_settle(&mut input);
        assert!(input.paste("22-12--201"));
        assert_eq!(input.value(), "22/12/201y");
        assert_eq!(changes(&mut input), vec!["22/12/201y".to_string()]);
    }

    #[test]
    fn paste_of_rejected_text_is_silent() {
        let mut input = date_input();
        focus_and_settle(&mut input);
        assert!(!input.paste("--//"));
        assert!(changes(&mut input).is_empty());
    }

    #[test]
    fn raw_input_is_normalized_and_emitted_once() {
        let mut input = date_input();
        focus_and_settle(&mut input);
        assert!(input.handle_input("2024-01-15"));
        assert_eq!(input.value(), "20/24/0115");
        assert_eq!(changes(&mut input).len(), 1);
        assert!(input.fill_state().is_filled(9));
    }

    #[test]
    fn raw_input_works_without_focus() {
        let mut input = date_input();
        assert!(input.handle_input("01/02/2003"));
        assert_eq!(input.value(), "01/02/2003");
        assert!(input.is_complete());
    }

    #[test]
    fn valid_value_round_trips() {
        for value in ["", "1", "31/mm/yyyy", "31/12/2024", "dd/mm/yyyy", "0"] {
            let mut input = date_input();
            input.set_value(value);
            assert_eq!(input.value(), value);
        }
    }

    #[test]
    fn invalid_value_empties_field() {
        for value in ["31-12-2024", "ab", "31/12/20241", "3x"] {
            let mut input = date_input().with_value("01/01/2000");
            input.set_value(value);
            assert_eq!(input.value(), "");
        }
    }

    #[test]
    fn set_value_does_not_emit() {
        let mut input = date_input();
        input.set_value("01/01/2000");
        assert!(changes(&mut input).is_empty());
    }

    #[test]
    fn navigation_and_commands_pass_through() {
        let mut input = date_input().with_value("12/34/yyyy");
        focus_and_settle(&mut input);
        input.set_caret(3);

        let ctrl_v = KeyEvent::new(KeyCode::Char('v'), KeyModifiers::CONTROL);
        assert_eq!(input.handle_key(ctrl_v), KeyOutcome::Passthrough);
        let meta_a = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::META);
        assert_eq!(input.handle_key(meta_a), KeyOutcome::Passthrough);
        assert_eq!(
            input.handle_key(KeyEvent::plain(KeyCode::Tab)),
            KeyOutcome::Passthrough
        );
        assert_eq!(input.value(), "12/34/yyyy");
        assert_eq!(input.caret(), Caret::at(3));

        assert_eq!(
            input.handle_key(KeyEvent::plain(KeyCode::Left)),
            KeyOutcome::Passthrough
        );
        assert_eq!(input.caret(), Caret::at(2));
        let shift_right = KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT);
        input.handle_key(shift_right);
        input.handle_key(shift_right);
        assert_eq!(input.caret(), Caret::range(2, 4));
        assert!(changes(&mut input).is_empty());
    }

    #[test]
    fn other_keys_are_left_to_host() {
        let mut input = date_input();
        focus_and_settle(&mut input);
        assert_eq!(
            input.handle_key(KeyEvent::plain(KeyCode::Enter)),
            KeyOutcome::Ignored
        );
    }

    #[test]
    fn unfocused_field_ignores_edits() {
        let mut input = date_input();
        assert_eq!(input.handle_key(KeyEvent::char('1')), KeyOutcome::Ignored);
        assert!(!input.paste("12"));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn completeness_and_raw_value() {
        let mut input = date_input();
        focus_and_settle(&mut input);
        input.paste("3112");
        assert!(!input.is_complete());
        assert_eq!(input.raw_value(), "3112");

        input.paste("2024");
        assert!(input.is_complete());
        assert_eq!(input.raw_value(), "31122024");
    }

    #[test]
    fn placeholder_change_keeps_fill_state() {
        let mut input = date_input();
        focus_and_settle(&mut input);
        input.handle_key(KeyEvent::char('4'));
        input
            .set_placeholder("__/__/____")
            .expect("same length placeholder");
        assert_eq!(input.value(), "4d/mm/yyyy");
        assert!(input.fill_state().is_filled(0));

        input.handle_key(KeyEvent::plain(KeyCode::Backspace));
        assert_eq!(input.value(), "_d/mm/yyyy");
    }
}
