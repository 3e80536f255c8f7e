use crate::core::{FieldValue, TextEncoding};
use crate::utils::error::{Result, StreamError};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::Serialize;
use std::io;

// 與 Python `b64decode(validate=True)` 相同：允許未用到的尾端位元
const LENIENT_BITS: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

/// Strip trailing padding the way Python's validating decoder accepts it.
///
/// Returns the unpadded data, or `None` when the padding is wrong for the
/// data length (missing, too much for a partial quantum, or misplaced).
fn strip_base64_padding(text: &str) -> Option<&str> {
    let data = text.trim_end_matches('=');
    let padding = text.len() - data.len();

    if data.contains('=') {
        return None;
    }
    match data.len() % 4 {
        0 if data.is_empty() => (padding == 0).then_some(data),
        // 完整的 quantum 後多餘的 `=` 會被忽略
        0 => Some(data),
        2 => (padding == 2).then_some(data),
        3 => (padding == 1).then_some(data),
        _ => None,
    }
}

fn decode_base64(text: &str) -> Option<Vec<u8>> {
    let data = strip_base64_padding(text)?;
    LENIENT_BITS.decode(data).ok()
}

/// JSON layout matching Python's `json.dumps` defaults (`", "` and `": "`).
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn to_spaced_json(value: &serde_json::Value) -> Result<String> {
    let mut serializer = serde_json::Serializer::with_formatter(Vec::new(), SpacedFormatter);
    value.serialize(&mut serializer)?;
    // serde_json 只會輸出合法 UTF-8
    Ok(String::from_utf8_lossy(&serializer.into_inner()).into_owned())
}

fn encode_strict(text: &str, encoding: TextEncoding) -> Result<Vec<u8>> {
    encoding
        .encode(text)
        .map_err(|c| StreamError::EncodeError {
            encoding: encoding.to_string(),
            reason: format!("character {:?} (U+{:04X}) is not representable", c, u32::from(c)),
        })
}

/// Turn the memory stream value into raw bytes.
///
/// Text is treated as strict standard base64 first and falls back to the
/// text itself; any other JSON value is serialized.
pub fn memory_stream_bytes(value: &FieldValue, encoding: TextEncoding) -> Result<Vec<u8>> {
    match value {
        FieldValue::Bytes(bytes) => Ok(bytes.clone()),
        FieldValue::Json(serde_json::Value::String(text)) => {
            match decode_base64(text) {
                Some(bytes) => {
                    tracing::debug!("Memory stream is base64 ({} bytes)", bytes.len());
                    Ok(bytes)
                }
                None => {
                    tracing::debug!("Memory stream is not base64, using text as-is");
                    encode_strict(text, encoding)
                }
            }
        }
        FieldValue::Json(other) => {
            tracing::debug!("Memory stream is structured JSON, serializing");
            encode_strict(&to_spaced_json(other)?, encoding)
        }
    }
}

/// Decode the memory stream into text.
///
/// When the bytes are not valid in `encoding`, falls back to UTF-8 with
/// U+FFFD replacement characters.
pub fn decode_memory_stream(value: &FieldValue, encoding: TextEncoding) -> Result<String> {
    let raw_bytes = memory_stream_bytes(value, encoding)?;

    match encoding.decode(&raw_bytes) {
        Some(text) => Ok(text),
        None => {
            tracing::warn!(
                "⚠️ Memory stream is not valid {}, falling back to utf-8 with replacement",
                encoding
            );
            Ok(String::from_utf8_lossy(&raw_bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base64_text() {
        let value = FieldValue::from("R2FsYWN0aWMgbWVtb3J5");
        assert_eq!(
            decode_memory_stream(&value, TextEncoding::Utf8).unwrap(),
            "Galactic memory"
        );
    }

    #[test]
    fn test_plain_text_falls_back_to_itself() {
        let value = FieldValue::from("hello, console!");
        assert_eq!(
            decode_memory_stream(&value, TextEncoding::Utf8).unwrap(),
            "hello, console!"
        );
    }

    #[test]
    fn test_unpadded_base64_is_treated_as_text() {
        // "aGk" 少了 padding，嚴格模式不接受
        let value = FieldValue::from("aGk");
        assert_eq!(decode_memory_stream(&value, TextEncoding::Utf8).unwrap(), "aGk");
    }

    #[test]
    fn test_base64_ignores_unused_trailing_bits() {
        // "QR==" 的尾端位元不為零，仍解為 "A"
        let value = FieldValue::from("QR==");
        assert_eq!(decode_memory_stream(&value, TextEncoding::Utf8).unwrap(), "A");
    }

    #[test]
    fn test_base64_surplus_padding_after_full_quantum() {
        let value = FieldValue::from("QUJD=");
        assert_eq!(decode_memory_stream(&value, TextEncoding::Utf8).unwrap(), "ABC");
        let value = FieldValue::from("QUJD==");
        assert_eq!(decode_memory_stream(&value, TextEncoding::Utf8).unwrap(), "ABC");
    }

    #[test]
    fn test_base64_wrong_padding_is_treated_as_text() {
        for text in ["QUJDRA=", "QUJDRA===", "QUJDRUY==", "=", "QR=A", "QU JD"] {
            let value = FieldValue::from(text);
            assert_eq!(decode_memory_stream(&value, TextEncoding::Utf8).unwrap(), text);
        }
        let value = FieldValue::from("QUJDRA==");
        assert_eq!(decode_memory_stream(&value, TextEncoding::Utf8).unwrap(), "ABCD");
    }

    #[test]
    fn test_empty_string_decodes_to_empty() {
        let value = FieldValue::from("");
        assert_eq!(decode_memory_stream(&value, TextEncoding::Utf8).unwrap(), "");
    }

    #[test]
    fn test_raw_bytes() {
        let value = FieldValue::Bytes("星の記憶".as_bytes().to_vec());
        assert_eq!(decode_memory_stream(&value, TextEncoding::Utf8).unwrap(), "星の記憶");
    }

    #[test]
    fn test_latin1_bytes() {
        let value = FieldValue::Bytes(b"caf\xe9".to_vec());
        assert_eq!(decode_memory_stream(&value, TextEncoding::Latin1).unwrap(), "café");
    }

    #[test]
    fn test_invalid_bytes_fall_back_to_lossy_utf8() {
        let value = FieldValue::Bytes(b"ok\xff\xfe".to_vec());
        assert_eq!(
            decode_memory_stream(&value, TextEncoding::Ascii).unwrap(),
            "ok\u{FFFD}\u{FFFD}"
        );
    }

    #[test]
    fn test_base64_in_utf16() {
        // "Hi" in UTF-16LE
        let value = FieldValue::from("SABpAA==");
        assert_eq!(decode_memory_stream(&value, TextEncoding::Utf16Le).unwrap(), "Hi");
    }

    #[test]
    fn test_base64_in_legacy_and_bom_encodings() {
        let shift_jis: TextEncoding = "shift_jis".parse().unwrap();
        assert_eq!(decode_memory_stream(&FieldValue::from("k/qWew=="), shift_jis).unwrap(), "日本");

        let utf16: TextEncoding = "utf-16".parse().unwrap();
        assert_eq!(decode_memory_stream(&FieldValue::from("//5IAGkA"), utf16).unwrap(), "Hi");
    }

    #[test]
    fn test_plain_text_in_code_page() {
        let cp1252: TextEncoding = "cp1252".parse().unwrap();
        assert_eq!(decode_memory_stream(&FieldValue::from("5 €"), cp1252).unwrap(), "5 €");
        let err = decode_memory_stream(&FieldValue::from("星"), cp1252).unwrap_err();
        assert!(matches!(err, StreamError::EncodeError { .. }));
    }

    #[test]
    fn test_structured_json_uses_spaced_layout() {
        let value = FieldValue::Json(json!({"blocks": [1, 2, 3], "label": "Ωmega"}));
        assert_eq!(
            decode_memory_stream(&value, TextEncoding::Utf8).unwrap(),
            r#"{"blocks": [1, 2, 3], "label": "Ωmega"}"#
        );
    }

    #[test]
    fn test_large_integers_keep_every_digit() {
        let payload = crate::core::client::parse_system_body(
            r#"{"memory_stream": {"big": 1180591620717411303424, "ratio": 0.1}}"#,
        )
        .unwrap();
        let value = crate::core::extract::extract_memory_stream(
            payload,
            &crate::core::extract::default_field_names(),
        )
        .unwrap();
        assert_eq!(
            decode_memory_stream(&value, TextEncoding::Utf8).unwrap(),
            r#"{"big": 1180591620717411303424, "ratio": 0.1}"#
        );
    }

    #[test]
    fn test_json_scalars() {
        assert_eq!(
            decode_memory_stream(&FieldValue::Json(json!(null)), TextEncoding::Utf8).unwrap(),
            "null"
        );
        assert_eq!(
            decode_memory_stream(&FieldValue::Json(json!(42)), TextEncoding::Utf8).unwrap(),
            "42"
        );
        assert_eq!(
            decode_memory_stream(&FieldValue::Json(json!(true)), TextEncoding::Utf8).unwrap(),
            "true"
        );
    }

    #[test]
    fn test_non_ascii_text_cannot_be_encoded_as_ascii() {
        let value = FieldValue::from("données");
        let err = decode_memory_stream(&value, TextEncoding::Ascii).unwrap_err();
        assert!(matches!(err, StreamError::EncodeError { .. }));
        assert_eq!(err.exit_code(), 5);
    }
}
