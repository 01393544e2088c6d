pub mod cli;
pub mod config;
pub mod metrics;
pub mod models;
pub mod store;
pub mod streak;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use models::{Note, StudentProfile, StudySession, StudyStreak, Subject, Task};
pub use store::Store;
pub use utils::Profile;
