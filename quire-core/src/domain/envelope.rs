//! Envelope decoding
//!
//! A queue message's `data` is base64 wrapping a JSON record:
//!
//! ```json
//! {"type": "text" | "image" | "url", "content": "...", "filename": "..."}
//! ```
//!
//! `parse_envelope` turns that blob into an [`Envelope`]. Records that are
//! well-formed but carry nothing renderable (unknown `type`, text or url
//! without `content`) become [`Envelope::Unknown`] rather than an error.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A decoded message payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Plain text, rendered verbatim
    Text { content: String },
    /// Binary attachment to be written under `filename`
    Image { filename: String, bytes: Vec<u8> },
    /// A link whose label and target are both `content`
    Url { content: String },
    /// Anything else; dropped without an error
    Unknown { kind: Option<String> },
}

/// Errors raised while decoding an envelope
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("envelope is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid envelope JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} envelope is missing `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("invalid image filename: {0:?}")]
    InvalidFilename(String),

    #[error("invalid queue record: {0}")]
    Record(#[source] serde_json::Error),
}

// Loosely typed: a non-string `type`, `content` or `filename` reads as absent.
#[derive(Debug, Deserialize)]
struct EnvelopeRecord {
    #[serde(rename = "type")]
    kind: Option<Value>,
    content: Option<Value>,
    filename: Option<Value>,
}

fn into_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// Decodes a base64 envelope blob
pub fn parse_envelope(data: &str) -> Result<Envelope, DecodeError> {
    let json = String::from_utf8(decode_base64(data)?)?;
    let record: EnvelopeRecord = serde_json::from_str(&json)?;

    let content = into_string(record.content);
    let kind_label = record.kind.as_ref().map(|kind| match kind {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });

    let envelope = match (record.kind.as_ref().and_then(Value::as_str), content) {
        (Some("text"), Some(content)) => Envelope::Text { content },
        (Some("url"), Some(content)) => Envelope::Url { content },
        (Some("image"), content) => {
            let filename = into_string(record.filename).ok_or(DecodeError::MissingField {
                kind: "image",
                field: "filename",
            })?;
            validate_filename(&filename)?;
            let content = content.ok_or(DecodeError::MissingField {
                kind: "image",
                field: "content",
            })?;
            Envelope::Image {
                filename,
                bytes: decode_base64(&content)?,
            }
        }
        _ => Envelope::Unknown { kind: kind_label },
    };

    Ok(envelope)
}

/// Standard-alphabet base64, tolerating line breaks inside the blob
fn decode_base64(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    if data.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD.decode(compact)
    } else {
        STANDARD.decode(data)
    }
}

// The filename is joined onto the image directory, so it must stay a single
// path component.
fn validate_filename(filename: &str) -> Result<(), DecodeError> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0'])
    {
        return Err(DecodeError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(json: &str) -> String {
        STANDARD.encode(json)
    }

    #[test]
    fn test_parse_text() {
        let envelope = parse_envelope(&encode(r#"{"type":"text","content":"hello"}"#)).unwrap();
        assert_eq!(
            envelope,
            Envelope::Text {
                content: "hello".to_string()
            }
        );
    }

    #[test]
    fn test_parse_url() {
        let envelope =
            parse_envelope(&encode(r#"{"type":"url","content":"https://example.com/a?b=c"}"#))
                .unwrap();
        assert_eq!(
            envelope,
            Envelope::Url {
                content: "https://example.com/a?b=c".to_string()
            }
        );
    }

    #[test]
    fn test_parse_image() {
        let pixels = STANDARD.encode([0x89u8, b'P', b'N', b'G', 0x00, 0xff]);
        let json = format!(r#"{{"type":"image","filename":"cat.png","content":"{}"}}"#, pixels);

        let envelope = parse_envelope(&encode(&json)).unwrap();
        assert_eq!(
            envelope,
            Envelope::Image {
                filename: "cat.png".to_string(),
                bytes: vec![0x89, b'P', b'N', b'G', 0x00, 0xff],
            }
        );
    }

    #[test]
    fn test_unknown_type_is_not_an_error() {
        let envelope = parse_envelope(&encode(r#"{"type":"video","content":"x"}"#)).unwrap();
        assert_eq!(
            envelope,
            Envelope::Unknown {
                kind: Some("video".to_string())
            }
        );
    }

    #[test]
    fn test_non_string_type_is_unknown() {
        let numeric = parse_envelope(&encode(r#"{"type":5,"content":"x"}"#)).unwrap();
        assert_eq!(
            numeric,
            Envelope::Unknown {
                kind: Some("5".to_string())
            }
        );

        let listed = parse_envelope(&encode(r#"{"type":["text"],"content":"x"}"#)).unwrap();
        assert!(matches!(listed, Envelope::Unknown { .. }));

        let null = parse_envelope(&encode(r#"{"type":null,"content":"x"}"#)).unwrap();
        assert_eq!(null, Envelope::Unknown { kind: None });
    }

    #[test]
    fn test_non_string_content_is_unknown() {
        let envelope = parse_envelope(&encode(r#"{"type":"text","content":{"a":1}}"#)).unwrap();
        assert!(matches!(envelope, Envelope::Unknown { .. }));
    }

    #[test]
    fn test_image_with_non_string_filename() {
        let result = parse_envelope(&encode(r#"{"type":"image","filename":7,"content":"AAAA"}"#));
        assert!(matches!(
            result,
            Err(DecodeError::MissingField {
                field: "filename",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_type_or_content_is_unknown() {
        let no_type = parse_envelope(&encode(r#"{"content":"x"}"#)).unwrap();
        assert_eq!(no_type, Envelope::Unknown { kind: None });

        let no_content = parse_envelope(&encode(r#"{"type":"text"}"#)).unwrap();
        assert!(matches!(no_content, Envelope::Unknown { .. }));
    }

    #[test]
    fn test_line_wrapped_base64() {
        let mut data = encode(r#"{"type":"text","content":"wrapped across lines"}"#);
        data.insert(8, '\n');
        data.insert(20, '\r');

        let envelope = parse_envelope(&data).unwrap();
        assert!(matches!(envelope, Envelope::Text { content } if content == "wrapped across lines"));
    }

    #[test]
    fn test_invalid_base64() {
        let result = parse_envelope("not base64!!!");
        assert!(matches!(result, Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_invalid_json() {
        let result = parse_envelope(&encode("{not json"));
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_json_that_is_not_an_object() {
        for json in [r#""hello""#, "42", "null"] {
            let result = parse_envelope(&encode(json));
            assert!(matches!(result, Err(DecodeError::Json(_))), "accepted {}", json);
        }
    }

    #[test]
    fn test_image_missing_fields() {
        let no_filename = parse_envelope(&encode(r#"{"type":"image","content":"AAAA"}"#));
        assert!(matches!(
            no_filename,
            Err(DecodeError::MissingField {
                field: "filename",
                ..
            })
        ));

        let no_content = parse_envelope(&encode(r#"{"type":"image","filename":"a.png"}"#));
        assert!(matches!(
            no_content,
            Err(DecodeError::MissingField {
                field: "content",
                ..
            })
        ));
    }

    #[test]
    fn test_image_with_bad_payload() {
        let result = parse_envelope(&encode(
            r#"{"type":"image","filename":"a.png","content":"%%%"}"#,
        ));
        assert!(matches!(result, Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_image_filename_must_be_single_component() {
        for name in ["", ".", "..", "../escape.png", "nested/a.png", "c:\\a.png"] {
            let json = format!(
                r#"{{"type":"image","filename":{},"content":"AAAA"}}"#,
                serde_json::to_string(name).unwrap()
            );
            let result = parse_envelope(&encode(&json));
            assert!(
                matches!(result, Err(DecodeError::InvalidFilename(_))),
                "accepted {:?}",
                name
            );
        }
    }
}
