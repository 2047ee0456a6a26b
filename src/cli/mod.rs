// CLI module - interactive pieces of the launcher

pub mod confirm;

pub use confirm::{is_affirmative, AssumeYes, Confirm, ReadlineConfirm};
