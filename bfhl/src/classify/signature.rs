//! Validation of base64 file payloads by their leading magic bytes.
//!
//! Payloads arrive either as bare base64 or as a data URI (`data:image/png;base64,...`).
//! Once decoded, the first bytes are matched against [`KNOWN_SIGNATURES`]; only PNG is
//! registered. A payload that cannot be decoded yields a negative verdict rather than an
//! error, so a bad attachment never fails the request that carries it.

use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use tracing::debug;

/// Standard alphabet, with or without `=` padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Mime type reported when no signature matches.
pub const UNKNOWN_MIME_TYPE: &str = "unknown";

/// A binary format identified by a fixed byte prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub magic: &'static [u8],
    pub mime_type: &'static str,
}

pub const PNG: Signature = Signature {
    magic: &[0x89, 0x50, 0x4E, 0x47],
    mime_type: "image/png",
};

/// Formats recognised by [`inspect`], checked in order.
pub const KNOWN_SIGNATURES: &[Signature] = &[PNG];

/// Outcome of validating one file payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileVerdict {
    pub valid: bool,
    pub mime_type: &'static str,
    pub size_kb: u64,
}

impl FileVerdict {
    /// Verdict for a missing or undecodable payload.
    pub fn rejected() -> Self {
        Self {
            valid: false,
            mime_type: UNKNOWN_MIME_TYPE,
            size_kb: 0,
        }
    }
}

impl Default for FileVerdict {
    fn default() -> Self {
        Self::rejected()
    }
}

/// Kilobytes rounded to the nearest integer, halves rounding up (1536 bytes is 2 KB).
pub fn size_kb(len: usize) -> u64 {
    (len as u64 + 512) / 1024
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Removes a leading `data:<anything>;base64,` header, if present.
///
/// The shortest matching header is removed and the `<anything>` part may not cross a line
/// break; input without a well-formed header is returned unchanged.
pub fn strip_data_uri(input: &str) -> &str {
    const MARKER: &str = ";base64,";

    let Some(rest) = input.strip_prefix("data:") else {
        return input;
    };
    match rest.find(MARKER) {
        Some(end) if !rest[..end].contains(is_line_terminator) => &rest[end + MARKER.len()..],
        _ => input,
    }
}

/// Decodes a (possibly data-URI prefixed) base64 payload. ASCII whitespace is ignored so
/// line-wrapped payloads decode as one block.
pub fn decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let encoded: String = strip_data_uri(input).chars().filter(|c| !c.is_ascii_whitespace()).collect();
    LENIENT_BASE64.decode(encoded)
}

/// Classifies already-decoded bytes.
pub fn inspect(bytes: &[u8]) -> FileVerdict {
    let size_kb = size_kb(bytes.len());
    match KNOWN_SIGNATURES.iter().find(|signature| bytes.starts_with(signature.magic)) {
        Some(signature) => FileVerdict {
            valid: true,
            mime_type: signature.mime_type,
            size_kb,
        },
        None => FileVerdict {
            valid: false,
            mime_type: UNKNOWN_MIME_TYPE,
            size_kb,
        },
    }
}

/// Validates an optional base64 payload. Never fails: absent or malformed input produces
/// [`FileVerdict::rejected`].
pub fn validate_file(file_b64: Option<&str>) -> FileVerdict {
    let Some(file_b64) = file_b64 else {
        return FileVerdict::rejected();
    };

    match decode(file_b64) {
        Ok(bytes) => inspect(&bytes),
        Err(error) => {
            debug!(%error, "File payload is not valid base64");
            FileVerdict::rejected()
        }
    }
}
