pub mod app;
pub mod config;
pub mod field;
pub mod mask;
pub mod runtime;
pub mod terminal;
pub mod ui;

pub use config::{Config, ConfigError, Preset};
pub use field::{Caret, FieldId, FillState, MaskEditor, MaskedInput};
pub use mask::{DEFAULT_SPECIAL_CHARACTERS, Grammar, Mask, MaskError};
pub use runtime::{DeferredAction, FieldEvent, KeyOutcome, Scheduler};
