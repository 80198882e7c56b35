pub mod caret;
pub mod editor;
pub mod fill_state;
mod id;
pub mod input;

pub use caret::Caret;
pub use editor::MaskEditor;
pub use fill_state::FillState;
pub use id::FieldId;
pub use input::MaskedInput;
