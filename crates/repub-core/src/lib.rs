pub mod collector;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod models;
pub mod run_state;
pub mod service;
pub mod testutil;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;
pub use models::{RunReport, RunStatus, SpecificRunReport};
pub use service::RepublishService;
pub use traits::Fetcher;
