//! Request/response header framing (spec §4.1).

use bytes::{Buf, BufMut};

use super::primitives::{self, TaggedFields};
use crate::error::ProtocolDecodeError;

/// `apiKey:Int16, apiVersion:Int16, correlationId:Int32, clientId:NullableString`,
/// optionally followed by request-level tagged fields when the request
/// schema is `FLEXIBLE_VERSION`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    pub api_key: i16,
    pub api_version: i16,
    pub correlation_id: i32,
    pub client_id: Option<String>,
    pub tagged_fields: Option<TaggedFields>,
}

impl RequestHeader {
    pub fn encode(&self, buf: &mut impl BufMut) {
        primitives::put_i16(buf, self.api_key);
        primitives::put_i16(buf, self.api_version);
        primitives::put_i32(buf, self.correlation_id);
        primitives::put_nullable_string(buf, self.client_id.as_deref());
        if let Some(tf) = &self.tagged_fields {
            tf.encode(buf);
        }
    }

    pub fn decode(buf: &mut impl Buf, flexible: bool) -> Result<Self, ProtocolDecodeError> {
        let api_key = primitives::get_i16(buf)?;
        let api_version = primitives::get_i16(buf)?;
        let correlation_id = primitives::get_i32(buf)?;
        let client_id = primitives::get_nullable_string(buf, "client_id")?;
        let tagged_fields = if flexible {
            Some(TaggedFields::decode(buf)?)
        } else {
            None
        };
        Ok(RequestHeader {
            api_key,
            api_version,
            correlation_id,
            client_id,
            tagged_fields,
        })
    }
}

/// `correlationId:Int32`, optional `TaggedFields` under the same
/// flexible-version condition as the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    pub correlation_id: i32,
    pub tagged_fields: Option<TaggedFields>,
}

impl ResponseHeader {
    pub fn encode(&self, buf: &mut impl BufMut) {
        primitives::put_i32(buf, self.correlation_id);
        if let Some(tf) = &self.tagged_fields {
            tf.encode(buf);
        }
    }

    pub fn decode(buf: &mut impl Buf, flexible: bool) -> Result<Self, ProtocolDecodeError> {
        let correlation_id = primitives::get_i32(buf)?;
        let tagged_fields = if flexible {
            Some(TaggedFields::decode(buf)?)
        } else {
            None
        };
        Ok(ResponseHeader {
            correlation_id,
            tagged_fields,
        })
    }
}

/// After decoding a top-level response, trailing bytes are an error
/// unless the response type is `FLEXIBLE_VERSION` (spec §4.1).
pub fn check_trailing(buf: &impl Buf, flexible: bool) -> Result<(), ProtocolDecodeError> {
    if !flexible && buf.has_remaining() {
        return Err(ProtocolDecodeError::TrailingBytes {
            count: buf.remaining(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn request_header_roundtrip_non_flexible() {
        let header = RequestHeader {
            api_key: 19,
            api_version: 3,
            correlation_id: 42,
            client_id: Some("admin".to_string()),
            tagged_fields: None,
        };
        let mut buf = BytesMut::new();
        header.encode(&mut buf);
        let mut frozen = buf.freeze();
        let decoded = RequestHeader::decode(&mut frozen, false).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn request_header_roundtrip_flexible() {
        let header = RequestHeader {
            api_key: 19,
            api_version: 5,
            correlation_id: 7,
            client_id: None,
            tagged_fields: Some(TaggedFields::default()),
        };
        let mut buf = BytesMut::new();
        header.encode(&mut buf);
        let mut frozen = buf.freeze();
        let decoded = RequestHeader::decode(&mut frozen, true).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn trailing_bytes_rejected_when_not_flexible() {
        let buf = BytesMut::from(&b"\x01"[..]).freeze();
        assert!(matches!(
            check_trailing(&buf, false),
            Err(ProtocolDecodeError::TrailingBytes { count: 1 })
        ));
        assert!(check_trailing(&buf, true).is_ok());
    }
}
