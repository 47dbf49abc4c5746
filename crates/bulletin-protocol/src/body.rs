//! Turning typed messages into transport request bodies.

use bulletin_transport::{Body, FormPart};
#[cfg(feature = "json")]
use serde::Serialize;

#[cfg(feature = "json")]
use crate::JsonCodec;
use crate::{BoardDraft, Codec, ProtocolError};

/// Form field holding the JSON post fields.
pub const BOARD_REQUEST_PART: &str = "request";
/// Form field holding the optional uploaded file.
pub const BOARD_FILE_PART: &str = "file";

/// Encodes a value as a JSON request body.
#[cfg(feature = "json")]
pub fn json_body<T: Serialize>(value: &T) -> Result<Body, ProtocolError> {
    JsonCodec.encode(value).map(Body::Json)
}

impl BoardDraft {
    /// Builds the multipart body used by create and update: a `request`
    /// part with the encoded fields, plus a `file` part when the draft
    /// carries an attachment.
    pub fn to_form<C: Codec>(&self, codec: &C) -> Result<Body, ProtocolError> {
        let mut parts = vec![FormPart {
            name: BOARD_REQUEST_PART.to_string(),
            file_name: None,
            content_type: codec.content_type().to_string(),
            data: codec.encode(&self.fields())?,
        }];

        if let Some(attachment) = &self.attachment {
            parts.push(FormPart {
                name: BOARD_FILE_PART.to_string(),
                file_name: Some(attachment.file_name.clone()),
                content_type: attachment.content_type.clone(),
                data: attachment.data.clone(),
            });
        }

        Ok(Body::Multipart(parts))
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Attachment, BoardCategory, LoginRequest};

    #[test]
    fn test_json_body_wraps_encoded_bytes() {
        let body = json_body(&LoginRequest {
            username: "u".into(),
            password: "p".into(),
        })
        .unwrap();
        assert_eq!(
            body,
            Body::Json(br#"{"username":"u","password":"p"}"#.to_vec())
        );
    }

    #[test]
    fn test_to_form_without_attachment_has_single_json_part() {
        let draft = BoardDraft::new("title", "content", BoardCategory::Notice);

        let Body::Multipart(parts) = draft.to_form(&JsonCodec).unwrap() else {
            panic!("expected multipart body");
        };

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, BOARD_REQUEST_PART);
        assert_eq!(parts[0].content_type, "application/json");
        assert!(parts[0].file_name.is_none());
        let fields: serde_json::Value =
            serde_json::from_slice(&parts[0].data).unwrap();
        assert_eq!(fields["category"], "NOTICE");
    }

    #[test]
    fn test_to_form_with_attachment_appends_file_part() {
        let draft = BoardDraft::new("t", "c", BoardCategory::Free).with_attachment(
            Attachment {
                file_name: "cat.png".into(),
                content_type: "image/png".into(),
                data: vec![1, 2, 3],
            },
        );

        let Body::Multipart(parts) = draft.to_form(&JsonCodec).unwrap() else {
            panic!("expected multipart body");
        };

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].name, BOARD_FILE_PART);
        assert_eq!(parts[1].file_name.as_deref(), Some("cat.png"));
        assert_eq!(parts[1].content_type, "image/png");
        assert_eq!(parts[1].data, vec![1, 2, 3]);
    }
}
