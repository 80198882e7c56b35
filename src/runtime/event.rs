use crate::field::FieldId;

/// Notifications a field emits toward its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// Fired once per top-level edit whose buffer ended up different.
    ValueChanged { id: FieldId, value: String },
}

/// How a field disposed of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Mask logic ran and accepted the key.
    Handled,
    /// Mask logic ran and refused the key; nothing changed.
    Rejected,
    /// Navigation or command key; the field applied only native behavior,
    /// if any, and the host may act on it too.
    Passthrough,
    /// Not meant for the field (Enter, Esc, unfocused field, ...).
    Ignored,
}
