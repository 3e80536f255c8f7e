use encoding_rs::Encoding;
use std::fmt;
use std::str::FromStr;

/// Text encodings accepted by `--encoding`.
///
/// The Unicode family, `ascii` and `latin-1` follow Python codec semantics
/// (`utf-16`/`utf-32` write a little-endian BOM and sniff one on decode).
/// Every other name is looked up as a WHATWG label (`cp1252`, `shift_jis`,
/// `gbk`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
    Utf16,
    Utf16Le,
    Utf16Be,
    Utf32,
    Utf32Le,
    Utf32Be,
    Legacy(&'static Encoding),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEncoding(pub String);

impl fmt::Display for UnknownEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown encoding '{}' (try utf-8, utf-16, utf-32, ascii, latin-1, cp1252, shift_jis, gbk)",
            self.0
        )
    }
}

impl std::error::Error for UnknownEncoding {}

// Python 名稱在 WHATWG 標籤表裡沒有的別名
const PYTHON_ALIASES: [(&str, &str); 5] = [
    ("cp932", "windows-31j"),
    ("cp936", "gbk"),
    ("cp949", "euc-kr"),
    ("mac-roman", "macintosh"),
    ("macroman", "macintosh"),
];

fn lookup_label(normalized: &str) -> Option<&'static Encoding> {
    let label = PYTHON_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, label)| *label)
        .unwrap_or(normalized);

    Encoding::for_label(label.as_bytes())
        .or_else(|| Encoding::for_label(label.replace('-', "_").as_bytes()))
}

impl FromStr for TextEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // 與 Python codec 名稱一樣不分大小寫，`_` 與空白等同 `-`
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let encoding = match normalized.as_str() {
            "utf-8" | "utf8" | "u8" | "utf" => TextEncoding::Utf8,
            "ascii" | "us-ascii" | "646" => TextEncoding::Ascii,
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "8859" | "l1" | "cp819" => {
                TextEncoding::Latin1
            }
            "utf-16" | "utf16" | "u16" => TextEncoding::Utf16,
            "utf-16le" | "utf-16-le" | "utf16le" => TextEncoding::Utf16Le,
            "utf-16be" | "utf-16-be" | "utf16be" => TextEncoding::Utf16Be,
            "utf-32" | "utf32" | "u32" => TextEncoding::Utf32,
            "utf-32le" | "utf-32-le" | "utf32le" => TextEncoding::Utf32Le,
            "utf-32be" | "utf-32-be" | "utf32be" => TextEncoding::Utf32Be,
            other => match lookup_label(other) {
                Some(enc) if enc == encoding_rs::UTF_8 => TextEncoding::Utf8,
                // UTF-16 標籤與 replacement 無法反向編碼
                Some(enc) if enc.output_encoding() == enc => TextEncoding::Legacy(enc),
                _ => return Err(UnknownEncoding(s.to_string())),
            },
        };
        Ok(encoding)
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn sniff_bom<'a>(bytes: &'a [u8], le_bom: &[u8], be_bom: &[u8]) -> (&'a [u8], bool) {
    if let Some(rest) = bytes.strip_prefix(le_bom) {
        (rest, true)
    } else if let Some(rest) = bytes.strip_prefix(be_bom) {
        (rest, false)
    } else {
        (bytes, true)
    }
}

fn decode_utf16(bytes: &[u8], little_endian: bool) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            if little_endian {
                u16::from_le_bytes(pair)
            } else {
                u16::from_be_bytes(pair)
            }
        })
        .collect();
    String::from_utf16(&units).ok()
}

fn decode_utf32(bytes: &[u8], little_endian: bool) -> Option<String> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    bytes
        .chunks_exact(4)
        .map(|quad| {
            let quad = [quad[0], quad[1], quad[2], quad[3]];
            let scalar = if little_endian {
                u32::from_le_bytes(quad)
            } else {
                u32::from_be_bytes(quad)
            };
            char::from_u32(scalar)
        })
        .collect()
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Ascii => "ascii",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Utf16 => "utf-16",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
            TextEncoding::Utf32 => "utf-32",
            TextEncoding::Utf32Le => "utf-32le",
            TextEncoding::Utf32Be => "utf-32be",
            TextEncoding::Legacy(enc) => enc.name(),
        }
    }

    /// Strict encode; returns the first character that cannot be represented.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, char> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { Ok(c as u8) } else { Err(c) })
                .collect(),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).map_err(|_| c))
                .collect(),
            TextEncoding::Utf16 => Ok([0xFF, 0xFE]
                .into_iter()
                .chain(text.encode_utf16().flat_map(u16::to_le_bytes))
                .collect()),
            TextEncoding::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            TextEncoding::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            TextEncoding::Utf32 => Ok([0xFF, 0xFE, 0x00, 0x00]
                .into_iter()
                .chain(text.chars().flat_map(|c| u32::from(c).to_le_bytes()))
                .collect()),
            TextEncoding::Utf32Le => Ok(text
                .chars()
                .flat_map(|c| u32::from(c).to_le_bytes())
                .collect()),
            TextEncoding::Utf32Be => Ok(text
                .chars()
                .flat_map(|c| u32::from(c).to_be_bytes())
                .collect()),
            TextEncoding::Legacy(enc) => {
                let (bytes, _, had_errors) = enc.encode(text);
                if !had_errors {
                    return Ok(bytes.into_owned());
                }
                // encoding_rs 會以 &#NNNN; 取代無法編碼的字元，這裡找出第一個
                let mut buf = [0u8; 4];
                Err(text
                    .chars()
                    .find(|c| enc.encode(c.encode_utf8(&mut buf)).2)
                    .unwrap_or(char::REPLACEMENT_CHARACTER))
            }
        }
    }

    /// Strict decode; `None` when the bytes are not valid in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            TextEncoding::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&b| b as char).collect()),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            TextEncoding::Utf16 => {
                let (rest, little_endian) = sniff_bom(bytes, &[0xFF, 0xFE], &[0xFE, 0xFF]);
                decode_utf16(rest, little_endian)
            }
            TextEncoding::Utf16Le => decode_utf16(bytes, true),
            TextEncoding::Utf16Be => decode_utf16(bytes, false),
            TextEncoding::Utf32 => {
                let (rest, little_endian) =
                    sniff_bom(bytes, &[0xFF, 0xFE, 0x00, 0x00], &[0x00, 0x00, 0xFE, 0xFF]);
                decode_utf32(rest, little_endian)
            }
            TextEncoding::Utf32Le => decode_utf32(bytes, true),
            TextEncoding::Utf32Be => decode_utf32(bytes, false),
            TextEncoding::Legacy(enc) => enc
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
        }
    }
}
