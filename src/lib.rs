pub mod app;
pub mod auth;
pub mod characters;
pub mod config;
pub mod error;
pub mod extract;
pub mod state;

pub use app::build_app;
pub use state::AppState;
