//! Application module
//!
//! Process-level setup shared by every command:
//! - Verbosity and working directory
//! - Logging setup
//! - Service assembly from configuration
//! - Fatal error reporting

pub mod config;
pub mod error_handling;
pub mod logging;
pub mod runtime;

pub use config::AppConfig;
pub use error_handling::handle_fatal_error;
pub use logging::init_logging;
pub use runtime::{build_service, load_store};
