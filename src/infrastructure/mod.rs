pub mod config;
pub mod identity;
pub mod logging;

pub use config::AppConfig;
pub use identity::{IdGenerator, RandomIdGenerator, SeededIdGenerator};
pub use logging::{init_logging, LoggingConfig};
