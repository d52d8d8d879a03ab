//! Simulation core of an arcade racer: one car on an endless, streamed track.
//!
//! Rendering, audio, and input polling live outside this crate. They drive a [`Session`]
//! once per frame and react to the [`SimEvent`]s it produces.

pub use glam;

pub mod consts;
pub mod error;
mod logging;
pub mod math;
mod sim;

pub use error::{CollaboratorError, ConfigError};
pub use sim::*;

/// Installs an `env_logger` backend with the crate's record format
///
/// The default filter is `Info`, `RUST_LOG` overrides it. Fails if a logger is already set.
pub fn init_logging() -> Result<(), log::SetLoggerError> {
    logging::try_init()
}
