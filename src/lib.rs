pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, LogFormat};

pub use config::settings::Settings;
pub use crate::core::{
    client::{resolve_client, HttpSystemClient},
    runner::MemoryStreamReader,
};
pub use domain::{
    encoding::TextEncoding,
    model::{ClientFlavor, FieldValue, SystemPayload},
    ports::{ConfigProvider, SystemApi},
};
pub use utils::error::{Result, StreamError};
