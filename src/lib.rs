pub mod app;
pub mod config;
pub mod countdown;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::{Settings, TariffConfig};
pub use state::AppState;
