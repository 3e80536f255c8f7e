use crate::domain::encoding::TextEncoding;
use crate::domain::model::{ClientFlavor, SystemPayload};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Anything able to perform the Galactic Console `getSystem` operation.
#[async_trait]
pub trait SystemApi: Send + Sync {
    /// `Ok(None)` when the call succeeded but returned no data.
    async fn get_system(&self) -> Result<Option<SystemPayload>>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> Option<&str>;
    fn api_key(&self) -> Option<&str>;
    fn flavor(&self) -> ClientFlavor;
    fn timeout_seconds(&self) -> Option<u64>;
    /// Candidate `getSystem` routes, relative to the base URL, in probe order.
    fn routes(&self) -> &[String];
    /// Candidate memory-stream field names, in lookup order.
    fn field_names(&self) -> &[String];
    fn encoding(&self) -> TextEncoding;
}
