pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::ClientFlavor;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use settings::{parse_encoding, Settings};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use toml_config::FileConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "print-memory-stream")]
#[command(about = "Fetch and decode the Galactic Console system memory stream")]
pub struct CliConfig {
    #[arg(long, help = "Override the Galactic Console API base URL")]
    pub base_url: Option<String>,

    #[arg(long, help = "API key used to authenticate with the Galactic Console API")]
    pub api_key: Option<String>,

    #[arg(
        long,
        help = "Text encoding to use when decoding the memory stream (default: utf-8)"
    )]
    pub encoding: Option<String>,

    #[arg(long, value_enum, help = "Client construction pattern (default: console)")]
    pub flavor: Option<ClientFlavor>,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "TOML config file with [client] and [stream] sections")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併設定：CLI 參數 > 設定檔 > 環境變數 > 預設值
    pub fn settings(&self) -> Result<Settings> {
        self.settings_with_env(|name| std::env::var(name).ok())
    }

    pub fn settings_with_env<F>(&self, lookup: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        settings.apply_env_with(lookup);

        if let Some(path) = &self.config {
            tracing::debug!("Loading config file {}", path.display());
            settings.apply_file(&FileConfig::from_file(path)?)?;
        }

        if let Some(base_url) = &self.base_url {
            settings.base_url = Some(base_url.clone());
        }
        if let Some(api_key) = &self.api_key {
            settings.api_key = Some(api_key.clone());
        }
        if let Some(encoding) = &self.encoding {
            settings.encoding = parse_encoding(encoding)?;
        }
        if let Some(flavor) = self.flavor {
            settings.flavor = flavor;
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = Some(timeout);
        }

        Ok(settings)
    }
}
