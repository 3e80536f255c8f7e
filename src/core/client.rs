use crate::core::{ClientFlavor, ConfigProvider, SystemApi, SystemPayload};
use crate::utils::error::{Result, StreamError};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use url::Url;

/// 預設探測順序：client 本身、`system`、`systems`、`console` 各自的
/// `getSystem` / `get_system`
pub const DEFAULT_ROUTES: [&str; 8] = [
    "getSystem",
    "get_system",
    "system/getSystem",
    "system/get_system",
    "systems/getSystem",
    "systems/get_system",
    "console/getSystem",
    "console/get_system",
];

/// HTTP implementation of [`SystemApi`] for the Galactic Console API.
#[derive(Debug, Clone)]
pub struct HttpSystemClient {
    client: Client,
    base_url: Url,
    flavor: ClientFlavor,
    api_key: Option<String>,
    timeout: Option<Duration>,
    routes: Vec<String>,
}

/// Build the client described by the configuration.
///
/// Fails with [`StreamError::ClientUnavailable`] when no base URL is known,
/// since there is then no Galactic Console to talk to.
pub fn resolve_client<C: ConfigProvider>(config: &C) -> Result<HttpSystemClient> {
    let base_url = config
        .base_url()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| StreamError::ClientUnavailable {
            message: "no Galactic Console base URL configured".to_string(),
        })?;

    tracing::debug!(
        "Creating {:?} client for {} (api key: {})",
        config.flavor(),
        base_url,
        if config.api_key().is_some() { "set" } else { "none" }
    );

    HttpSystemClient::new(base_url, config.flavor())
        .map(|client| {
            client
                .with_api_key(config.api_key().map(str::to_string))
                .with_timeout(config.timeout_seconds().map(Duration::from_secs))
                .with_routes(config.routes().to_vec())
        })
}

impl HttpSystemClient {
    pub fn new(base_url: &str, flavor: ClientFlavor) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url.trim()).map_err(|e| StreamError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: base_url.to_string(),
                reason: format!("Invalid URL format: {}", e),
            })?;

        // 確保路徑以 `/` 結尾，否則 join 會覆蓋最後一段
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            flavor,
            api_key: None,
            timeout: None,
            routes: DEFAULT_ROUTES.iter().map(|r| r.to_string()).collect(),
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_routes(mut self, routes: Vec<String>) -> Self {
        if !routes.is_empty() {
            self.routes = routes;
        }
        self
    }

    fn route_url(&self, route: &str) -> Result<Url> {
        self.base_url
            .join(route.trim_start_matches('/'))
            .map_err(|e| StreamError::InvalidConfigValueError {
                field: "routes".to_string(),
                value: route.to_string(),
                reason: format!("Cannot join route onto base URL: {}", e),
            })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match (&self.api_key, self.flavor) {
            (None, _) => request,
            (Some(key), ClientFlavor::Console) => request.bearer_auth(key),
            (Some(key), ClientFlavor::OpenApi) => request.header("api_key", key),
        }
    }
}

#[async_trait::async_trait]
impl SystemApi for HttpSystemClient {
    async fn get_system(&self) -> Result<Option<SystemPayload>> {
        for route in &self.routes {
            let url = self.route_url(route)?;
            tracing::debug!("📡 Trying getSystem at {}", url);

            let mut request = self
                .authorize(self.client.get(url.clone()))
                .header(reqwest::header::ACCEPT, "application/json");

            // 設定超時
            if let Some(timeout) = self.timeout {
                request = request.timeout(timeout);
            }

            let response = request.send().await?;
            let status = response.status();
            tracing::debug!("📡 {} answered {}", url, status);

            if status == StatusCode::NOT_FOUND || status == StatusCode::METHOD_NOT_ALLOWED {
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(StreamError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                });
            }

            tracing::info!("Located getSystem call at route '{}'", route);
            let body = response.text().await?;
            return parse_system_body(&body);
        }

        Err(StreamError::CallNotFound {
            tried: self.routes.clone(),
        })
    }
}

/// 空白回應或 JSON `null` 代表呼叫成功但沒有資料
pub fn parse_system_body(body: &str) -> Result<Option<SystemPayload>> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let json_data: serde_json::Value = serde_json::from_str(body)?;
    if json_data.is_null() {
        return Ok(None);
    }

    Ok(Some(SystemPayload::from_json(json_data)))
}
