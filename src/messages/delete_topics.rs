//! `DeleteTopics` (api_key=20), versions 0-3.
//!
//! Grounded on `original_source/kafka/protocol/admin.py`
//! `DeleteTopicsRequest_v{0..3}` / `DeleteTopicsResponse_v{0..3}`
//! (v1-v3 request/response schemas are byte-identical to v0/v1
//! respectively in the source; only the throttle-time prefix differs).

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTopicsRequest {
    pub topics: Vec<String>,
    pub timeout: i32,
}

impl DeleteTopicsRequest {
    pub fn encode(&self, _version: i16, buf: &mut impl BufMut) {
        p::put_array(buf, &self.topics, |buf, t| p::put_string(buf, t));
        p::put_i32(buf, self.timeout);
    }

    pub fn decode(_version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let topics = p::get_array(buf, "topics", |buf| p::get_string(buf, "topic"))?;
        let timeout = p::get_i32(buf)?;
        Ok(DeleteTopicsRequest { topics, timeout })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicErrorCode {
    pub topic: String,
    pub error_code: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTopicsResponse {
    /// Present from v1.
    pub throttle_time_ms: i32,
    pub topic_error_codes: Vec<TopicErrorCode>,
}

impl DeleteTopicsResponse {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        if version >= 1 {
            p::put_i32(buf, self.throttle_time_ms);
        }
        p::put_array(buf, &self.topic_error_codes, |buf, e| {
            p::put_string(buf, &e.topic);
            p::put_i16(buf, e.error_code);
        });
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = if version >= 1 { p::get_i32(buf)? } else { 0 };
        let topic_error_codes = p::get_array(buf, "topic_error_codes", |buf| {
            let topic = p::get_string(buf, "topic")?;
            let error_code = p::get_i16(buf)?;
            Ok(TopicErrorCode { topic, error_code })
        })?;
        Ok(DeleteTopicsResponse {
            throttle_time_ms,
            topic_error_codes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn response_roundtrip_v0_no_throttle() {
        let resp = DeleteTopicsResponse {
            throttle_time_ms: 0,
            topic_error_codes: vec![TopicErrorCode {
                topic: "t".to_string(),
                error_code: 3,
            }],
        };
        let mut buf = BytesMut::new();
        resp.encode(0, &mut buf);
        let mut frozen = buf.freeze();
        let decoded = DeleteTopicsResponse::decode(0, &mut frozen).unwrap();
        assert_eq!(decoded, resp);
    }

    #[test]
    fn request_roundtrip() {
        let req = DeleteTopicsRequest {
            topics: vec!["a".to_string(), "b".to_string()],
            timeout: 1000,
        };
        let mut buf = BytesMut::new();
        req.encode(3, &mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(DeleteTopicsRequest::decode(3, &mut frozen).unwrap(), req);
    }
}
