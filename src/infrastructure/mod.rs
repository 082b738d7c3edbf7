pub mod error;
pub mod logging;
pub mod network;

pub use error::SiteError;
pub use logging::{setup_logging, LogFormat, LogOutput, LoggingConfig};
pub use network::{NetworkConfig, NetworkManager};
