use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the Galactic Console client is constructed.
///
/// `Console` is the hand-written high-level client (`api_key` sent as a bearer
/// token). `OpenApi` is a generated client where the key lives under the
/// `api_key` security scheme and is sent as a header of that name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ClientFlavor {
    #[default]
    Console,
    #[serde(alias = "open_api", alias = "open-api")]
    #[cfg_attr(feature = "cli", value(name = "openapi"))]
    OpenApi,
}

/// A single field of a `getSystem` response.
///
/// JSON bodies only ever produce `Json`; clients that hand over raw bytes
/// (binary transports, test doubles) use `Bytes`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        FieldValue::Json(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(bytes: Vec<u8>) -> Self {
        FieldValue::Bytes(bytes)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Json(serde_json::Value::String(text.to_string()))
    }
}

/// The transient result of a `getSystem` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemPayload {
    pub fields: BTreeMap<String, FieldValue>,
}

impl SystemPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// 只有 JSON 物件會展開成欄位，其他型別視為沒有欄位的 payload
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(obj) => Self {
                fields: obj
                    .into_iter()
                    .map(|(key, value)| (key, FieldValue::Json(value)))
                    .collect(),
            },
            _ => Self::default(),
        }
    }
}
