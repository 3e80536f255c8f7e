use crate::config::toml_config::FileConfig;
use crate::core::client::DEFAULT_ROUTES;
use crate::core::extract::default_field_names;
use crate::domain::encoding::TextEncoding;
use crate::domain::model::ClientFlavor;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, StreamError};
use crate::utils::validation::{self, Validate};

pub const BASE_URL_ENV: &str = "GALACTIC_CONSOLE_BASE_URL";
pub const API_KEY_ENV: &str = "GALACTIC_CONSOLE_API_KEY";

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub flavor: ClientFlavor,
    pub timeout_seconds: Option<u64>,
    pub routes: Vec<String>,
    pub encoding: TextEncoding,
    pub field_names: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            flavor: ClientFlavor::default(),
            timeout_seconds: None,
            routes: DEFAULT_ROUTES.iter().map(|r| r.to_string()).collect(),
            encoding: TextEncoding::default(),
            field_names: default_field_names(),
        }
    }
}

pub fn parse_encoding(value: &str) -> Result<TextEncoding> {
    value
        .parse()
        .map_err(|e: crate::domain::encoding::UnknownEncoding| {
            StreamError::InvalidConfigValueError {
                field: "encoding".to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            }
        })
}

impl Settings {
    /// 環境變數的優先度最低，只填補尚未設定的值
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(base_url) = non_empty(BASE_URL_ENV) {
            self.base_url = Some(base_url);
        }
        if let Some(api_key) = non_empty(API_KEY_ENV) {
            self.api_key = Some(api_key);
        }
    }

    pub fn apply_file(&mut self, file: &FileConfig) -> Result<()> {
        if let Some(client) = &file.client {
            if let Some(base_url) = &client.base_url {
                self.base_url = Some(base_url.clone());
            }
            if let Some(api_key) = &client.api_key {
                self.api_key = Some(api_key.clone());
            }
            if let Some(flavor) = client.flavor {
                self.flavor = flavor;
            }
            if let Some(timeout) = client.timeout_seconds {
                self.timeout_seconds = Some(timeout);
            }
            if let Some(routes) = &client.routes {
                self.routes = routes.clone();
            }
        }

        if let Some(stream) = &file.stream {
            if let Some(encoding) = &stream.encoding {
                self.encoding = parse_encoding(encoding)?;
            }
            if let Some(field_names) = &stream.field_names {
                self.field_names = field_names.clone();
            }
        }

        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn flavor(&self) -> ClientFlavor {
        self.flavor
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn routes(&self) -> &[String] {
        &self.routes
    }

    fn field_names(&self) -> &[String] {
        &self.field_names
    }

    fn encoding(&self) -> TextEncoding {
        self.encoding
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        // base_url 缺少時交給 resolve_client 回報 ClientUnavailable
        if let Some(base_url) = &self.base_url {
            validation::validate_url("base_url", base_url)?;
        }

        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("timeout_seconds", timeout, 1)?;
        }

        validation::validate_name_list("routes", &self.routes)?;
        validation::validate_name_list("field_names", &self.field_names)?;

        Ok(())
    }
}
