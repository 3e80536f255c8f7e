pub mod client;
pub mod decode;
pub mod extract;
pub mod runner;

pub use crate::domain::encoding::TextEncoding;
pub use crate::domain::model::{ClientFlavor, FieldValue, SystemPayload};
pub use crate::domain::ports::{ConfigProvider, SystemApi};
pub use crate::utils::error::Result;
