pub mod assistant;
pub mod cli;
pub mod client;
pub mod config;
pub mod database;
pub mod insights;
pub mod models;
pub mod server;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use database::Database;
pub use models::{CalendarEvent, ChatMessage, Note, Task, User, WellnessEntry};
pub use utils::Profile;
