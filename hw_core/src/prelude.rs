pub use crate::api::{Bridge, NativeStatus};
pub use crate::backend::NativeBackend;
pub use crate::command::CliCommand;
pub use crate::config::BridgeConfig;
pub use crate::error::BridgeError;
pub use crate::logs::init_logging;
