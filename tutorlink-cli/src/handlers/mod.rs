//! Command handlers for the Tutorlink CLI

pub mod relationship;
pub mod subject;
pub mod sweep;
pub mod system;
pub mod user;

pub use relationship::handle_relationship_command;
pub use subject::handle_subject_command;
pub use sweep::{handle_run_sweeper, handle_sweep};
pub use system::{handle_clear, handle_diagnose};
pub use user::handle_user_command;
