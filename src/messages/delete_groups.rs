//! `DeleteGroups` (api_key=42), versions 0-1.
//!
//! Grounded on `original_source/kafka/protocol/admin.py`
//! `DeleteGroupsRequest_v{0,1}` / `DeleteGroupsResponse_v{0,1}` (byte
//! identical across versions; the API key simply gained a second
//! version number with no schema change in the source).

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteGroupsRequest {
    pub groups_names: Vec<String>,
}

impl DeleteGroupsRequest {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_array(buf, &self.groups_names, |buf, g| p::put_string(buf, g));
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let groups_names = p::get_array(buf, "groups_names", |buf| p::get_string(buf, "group_id"))?;
        Ok(DeleteGroupsRequest { groups_names })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupResult {
    pub group_id: String,
    pub error_code: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteGroupsResponse {
    pub throttle_time_ms: i32,
    pub results: Vec<GroupResult>,
}

impl DeleteGroupsResponse {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i32(buf, self.throttle_time_ms);
        p::put_array(buf, &self.results, |buf, r| {
            p::put_string(buf, &r.group_id);
            p::put_i16(buf, r.error_code);
        });
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = p::get_i32(buf)?;
        let results = p::get_array(buf, "results", |buf| {
            let group_id = p::get_string(buf, "group_id")?;
            let error_code = p::get_i16(buf)?;
            Ok(GroupResult { group_id, error_code })
        })?;
        Ok(DeleteGroupsResponse {
            throttle_time_ms,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn roundtrip() {
        let req = DeleteGroupsRequest {
            groups_names: vec!["g1".to_string(), "g2".to_string()],
        };
        let mut buf = BytesMut::new();
        req.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(DeleteGroupsRequest::decode(&mut frozen).unwrap(), req);

        let resp = DeleteGroupsResponse {
            throttle_time_ms: 0,
            results: vec![
                GroupResult {
                    group_id: "g1".to_string(),
                    error_code: 0,
                },
                GroupResult {
                    group_id: "g2".to_string(),
                    error_code: 16,
                },
            ],
        };
        let mut buf = BytesMut::new();
        resp.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(DeleteGroupsResponse::decode(&mut frozen).unwrap(), resp);
    }
}
