pub mod event;
pub mod scheduler;

pub use event::{FieldEvent, KeyOutcome};
pub use scheduler::{DeferredAction, DeferredTask, Scheduler};
