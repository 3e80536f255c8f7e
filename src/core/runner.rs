use crate::core::extract::{default_field_names, extract_memory_stream};
use crate::core::{decode::decode_memory_stream, ConfigProvider, SystemApi, TextEncoding};
use crate::utils::error::Result;

/// Runs the whole read: `getSystem`, field extraction, decoding.
pub struct MemoryStreamReader<A: SystemApi> {
    api: A,
    field_names: Vec<String>,
    encoding: TextEncoding,
}

impl<A: SystemApi> MemoryStreamReader<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            field_names: default_field_names(),
            encoding: TextEncoding::default(),
        }
    }

    pub fn from_config<C: ConfigProvider>(api: A, config: &C) -> Self {
        Self::new(api)
            .with_field_names(config.field_names().to_vec())
            .with_encoding(config.encoding())
    }

    pub fn with_field_names(mut self, field_names: Vec<String>) -> Self {
        if !field_names.is_empty() {
            self.field_names = field_names;
        }
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub async fn read(&self) -> Result<String> {
        tracing::debug!("Calling getSystem");
        let payload = self.api.get_system().await?;

        let memory_stream = extract_memory_stream(payload, &self.field_names)?;

        tracing::debug!("Decoding memory stream as {}", self.encoding);
        let decoded = decode_memory_stream(&memory_stream, self.encoding)?;
        tracing::info!("✅ Memory stream decoded ({} chars)", decoded.chars().count());

        Ok(decoded)
    }
}
