pub mod field_view;
pub mod span;
pub mod style;
