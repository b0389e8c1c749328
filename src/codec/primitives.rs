//! Primitive wire encoding/decoding (spec §4.1).
//!
//! Every primitive here is a free function over `bytes::{Buf, BufMut}`
//! rather than a trait-dispatched type, mirroring the teacher's direct use
//! of `bytes::BytesMut` + `ByteBuf` helpers in `kafka/client.rs`. Decoding
//! never panics: every read is preceded by a remaining-bytes check that
//! turns a short buffer into a `ProtocolDecodeError::BufferUnderrun`
//! instead of `bytes`' own panicking behavior.

use bytes::{Buf, BufMut};

use crate::error::ProtocolDecodeError;

type DecodeResult<T> = Result<T, ProtocolDecodeError>;

fn require(buf: &impl Buf, needed: usize) -> DecodeResult<()> {
    if buf.remaining() < needed {
        Err(ProtocolDecodeError::BufferUnderrun {
            needed,
            available: buf.remaining(),
        })
    } else {
        Ok(())
    }
}

pub fn get_i8(buf: &mut impl Buf) -> DecodeResult<i8> {
    require(buf, 1)?;
    Ok(buf.get_i8())
}

pub fn get_i16(buf: &mut impl Buf) -> DecodeResult<i16> {
    require(buf, 2)?;
    Ok(buf.get_i16())
}

pub fn get_i32(buf: &mut impl Buf) -> DecodeResult<i32> {
    require(buf, 4)?;
    Ok(buf.get_i32())
}

pub fn get_i64(buf: &mut impl Buf) -> DecodeResult<i64> {
    require(buf, 8)?;
    Ok(buf.get_i64())
}

pub fn get_f64(buf: &mut impl Buf) -> DecodeResult<f64> {
    require(buf, 8)?;
    Ok(buf.get_f64())
}

pub fn get_bool(buf: &mut impl Buf) -> DecodeResult<bool> {
    Ok(get_i8(buf)? != 0)
}

pub fn put_i8(buf: &mut impl BufMut, v: i8) {
    buf.put_i8(v);
}
pub fn put_i16(buf: &mut impl BufMut, v: i16) {
    buf.put_i16(v);
}
pub fn put_i32(buf: &mut impl BufMut, v: i32) {
    buf.put_i32(v);
}
pub fn put_i64(buf: &mut impl BufMut, v: i64) {
    buf.put_i64(v);
}
pub fn put_f64(buf: &mut impl BufMut, v: f64) {
    buf.put_f64(v);
}
pub fn put_bool(buf: &mut impl BufMut, v: bool) {
    buf.put_i8(if v { 1 } else { 0 });
}

/// `NULLABLE_STRING`: `Int16` length, `-1` meaning absent.
pub fn get_nullable_string(buf: &mut impl Buf, field: &'static str) -> DecodeResult<Option<String>> {
    let len = get_i16(buf)?;
    if len < -1 {
        return Err(ProtocolDecodeError::NegativeLength {
            field,
            length: len as i64,
        });
    }
    if len == -1 {
        return Ok(None);
    }
    let len = len as usize;
    require(buf, len)?;
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|_| ProtocolDecodeError::InvalidUtf8 { field })
}

/// `STRING`: `Int16` length, never absent.
pub fn get_string(buf: &mut impl Buf, field: &'static str) -> DecodeResult<String> {
    get_nullable_string(buf, field)?.ok_or(ProtocolDecodeError::NegativeLength { field, length: -1 })
}

pub fn put_nullable_string(buf: &mut impl BufMut, value: Option<&str>) {
    match value {
        None => put_i16(buf, -1),
        Some(s) => {
            put_i16(buf, s.len() as i16);
            buf.put_slice(s.as_bytes());
        }
    }
}

pub fn put_string(buf: &mut impl BufMut, value: &str) {
    put_nullable_string(buf, Some(value));
}

/// `BYTES`: `Int32` length, `-1` meaning absent (nullable variant used for fields like `member_metadata`).
pub fn get_nullable_bytes(buf: &mut impl Buf, field: &'static str) -> DecodeResult<Option<Vec<u8>>> {
    let len = get_i32(buf)?;
    if len < -1 {
        return Err(ProtocolDecodeError::NegativeLength {
            field,
            length: len as i64,
        });
    }
    if len == -1 {
        return Ok(None);
    }
    let len = len as usize;
    require(buf, len)?;
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    Ok(Some(bytes))
}

pub fn get_bytes(buf: &mut impl Buf, field: &'static str) -> DecodeResult<Vec<u8>> {
    Ok(get_nullable_bytes(buf, field)?.unwrap_or_default())
}

pub fn put_nullable_bytes(buf: &mut impl BufMut, value: Option<&[u8]>) {
    match value {
        None => put_i32(buf, -1),
        Some(b) => {
            put_i32(buf, b.len() as i32);
            buf.put_slice(b);
        }
    }
}

pub fn put_bytes(buf: &mut impl BufMut, value: &[u8]) {
    put_nullable_bytes(buf, Some(value));
}

const MAX_VARINT_BYTES: usize = 10;

/// Unsigned LEB128 varint, as used by compact strings/arrays and tagged fields.
pub fn get_unsigned_varint(buf: &mut impl Buf) -> DecodeResult<u64> {
    let mut value: u64 = 0;
    let mut shift = 0;
    for _ in 0..MAX_VARINT_BYTES {
        let byte = get_i8(buf)? as u8;
        value |= ((byte & 0x7f) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
    Err(ProtocolDecodeError::VarintTooLong {
        max_bytes: MAX_VARINT_BYTES,
    })
}

pub fn put_unsigned_varint(buf: &mut impl BufMut, mut value: u64) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.put_u8(byte);
        if value == 0 {
            break;
        }
    }
}

/// Zigzag-encoded signed varint ("Varint" primitive kind in spec §3).
pub fn get_varint(buf: &mut impl Buf) -> DecodeResult<i64> {
    let raw = get_unsigned_varint(buf)?;
    Ok(((raw >> 1) as i64) ^ -((raw & 1) as i64))
}

pub fn put_varint(buf: &mut impl BufMut, value: i64) {
    let zigzag = ((value << 1) ^ (value >> 63)) as u64;
    put_unsigned_varint(buf, zigzag);
}

/// `COMPACT_STRING`: unsigned varint length biased by +1; 0 = null, 1 = empty.
pub fn get_compact_nullable_string(buf: &mut impl Buf, field: &'static str) -> DecodeResult<Option<String>> {
    let biased = get_unsigned_varint(buf)?;
    if biased == 0 {
        return Ok(None);
    }
    let len = (biased - 1) as usize;
    require(buf, len)?;
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|_| ProtocolDecodeError::InvalidUtf8 { field })
}

pub fn get_compact_string(buf: &mut impl Buf, field: &'static str) -> DecodeResult<String> {
    get_compact_nullable_string(buf, field)?.ok_or(ProtocolDecodeError::NegativeLength { field, length: 0 })
}

pub fn put_compact_nullable_string(buf: &mut impl BufMut, value: Option<&str>) {
    match value {
        None => put_unsigned_varint(buf, 0),
        Some(s) => {
            put_unsigned_varint(buf, s.len() as u64 + 1);
            buf.put_slice(s.as_bytes());
        }
    }
}

pub fn put_compact_string(buf: &mut impl BufMut, value: &str) {
    put_compact_nullable_string(buf, Some(value));
}

/// `COMPACT_BYTES`: same biased-varint-length scheme as `COMPACT_STRING`.
pub fn get_compact_nullable_bytes(buf: &mut impl Buf, field: &'static str) -> DecodeResult<Option<Vec<u8>>> {
    let biased = get_unsigned_varint(buf)?;
    if biased == 0 {
        return Ok(None);
    }
    let len = (biased - 1) as usize;
    require(buf, len)?;
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    Ok(Some(bytes))
}

pub fn put_compact_nullable_bytes(buf: &mut impl BufMut, value: Option<&[u8]>) {
    match value {
        None => put_unsigned_varint(buf, 0),
        Some(b) => {
            put_unsigned_varint(buf, b.len() as u64 + 1);
            buf.put_slice(b);
        }
    }
}

/// `ARRAY`: `Int32` count (`-1` treated as empty/null, matching the
/// original's permissive handling) followed by `count` elements.
pub fn get_array<T>(
    buf: &mut impl Buf,
    field: &'static str,
    mut read_elem: impl FnMut(&mut dyn Buf) -> DecodeResult<T>,
) -> DecodeResult<Vec<T>> {
    let count = get_i32(buf)?;
    if count < -1 {
        return Err(ProtocolDecodeError::NegativeLength {
            field,
            length: count as i64,
        });
    }
    if count <= 0 {
        return Ok(Vec::new());
    }
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(read_elem(buf)?);
    }
    Ok(out)
}

pub fn put_array<T>(buf: &mut impl BufMut, items: &[T], mut write_elem: impl FnMut(&mut dyn BufMut, &T)) {
    put_i32(buf, items.len() as i32);
    for item in items {
        write_elem(buf, item);
    }
}

/// `COMPACT_ARRAY`: unsigned varint `count + 1`.
pub fn get_compact_array<T>(
    buf: &mut impl Buf,
    mut read_elem: impl FnMut(&mut dyn Buf) -> DecodeResult<T>,
) -> DecodeResult<Vec<T>> {
    let biased = get_unsigned_varint(buf)?;
    if biased == 0 {
        return Ok(Vec::new());
    }
    let count = (biased - 1) as usize;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(read_elem(buf)?);
    }
    Ok(out)
}

pub fn put_compact_array<T>(buf: &mut impl BufMut, items: &[T], mut write_elem: impl FnMut(&mut dyn BufMut, &T)) {
    put_unsigned_varint(buf, items.len() as u64 + 1);
    for item in items {
        write_elem(buf, item);
    }
}

/// Sparse `tagId -> bytes` section appended to a flexible-version struct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedFields(pub std::collections::BTreeMap<u32, Vec<u8>>);

impl TaggedFields {
    pub fn decode(buf: &mut impl Buf) -> DecodeResult<Self> {
        let n = get_unsigned_varint(buf)?;
        let mut map = std::collections::BTreeMap::new();
        for _ in 0..n {
            let tag = get_unsigned_varint(buf)? as u32;
            let len = get_unsigned_varint(buf)? as usize;
            require(buf, len)?;
            let mut bytes = vec![0u8; len];
            buf.copy_to_slice(&mut bytes);
            map.insert(tag, bytes);
        }
        Ok(TaggedFields(map))
    }

    pub fn encode(&self, buf: &mut impl BufMut) {
        put_unsigned_varint(buf, self.0.len() as u64);
        for (tag, bytes) in &self.0 {
            put_unsigned_varint(buf, *tag as u64);
            put_unsigned_varint(buf, bytes.len() as u64);
            buf.put_slice(bytes);
        }
    }
}

/// Decodes a fixed-width bit-field into the ordered set of enum members
/// whose bit is set, per spec §4.1 ("`BitField` ... decoding yields the
/// ordered set of enum members whose bit is set").
pub fn decode_bitfield<T: Copy>(bits: i32, vocabulary: &[(u8, T)]) -> Vec<T> {
    vocabulary
        .iter()
        .filter(|(bit, _)| bits & (1 << *bit) != 0)
        .map(|(_, member)| *member)
        .collect()
}

/// Encodes a set of enum members back into a bit-field, inverse of
/// [`decode_bitfield`].
pub fn encode_bitfield<T: Copy + PartialEq>(members: &[T], vocabulary: &[(u8, T)]) -> i32 {
    let mut bits = 0i32;
    for (bit, member) in vocabulary {
        if members.contains(member) {
            bits |= 1 << *bit;
        }
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn nullable_string_roundtrip() {
        let mut buf = BytesMut::new();
        put_nullable_string(&mut buf, Some("hello"));
        let mut frozen = buf.freeze();
        assert_eq!(get_nullable_string(&mut frozen, "x").unwrap(), Some("hello".to_string()));

        let mut buf = BytesMut::new();
        put_nullable_string(&mut buf, None);
        let mut frozen = buf.freeze();
        assert_eq!(get_nullable_string(&mut frozen, "x").unwrap(), None);
    }

    #[test]
    fn unsigned_varint_roundtrip() {
        for v in [0u64, 1, 127, 128, 300, 16384, u32::MAX as u64] {
            let mut buf = BytesMut::new();
            put_unsigned_varint(&mut buf, v);
            let mut frozen = buf.freeze();
            assert_eq!(get_unsigned_varint(&mut frozen).unwrap(), v);
        }
    }

    #[test]
    fn varint_roundtrip_negative() {
        for v in [-1i64, 0, 1, -1000, 1000, i32::MIN as i64] {
            let mut buf = BytesMut::new();
            put_varint(&mut buf, v);
            let mut frozen = buf.freeze();
            assert_eq!(get_varint(&mut frozen).unwrap(), v);
        }
    }

    #[test]
    fn compact_string_null_vs_empty() {
        let mut buf = BytesMut::new();
        put_compact_nullable_string(&mut buf, None);
        let mut frozen = buf.freeze();
        assert_eq!(get_compact_nullable_string(&mut frozen, "x").unwrap(), None);

        let mut buf = BytesMut::new();
        put_compact_nullable_string(&mut buf, Some(""));
        let mut frozen = buf.freeze();
        assert_eq!(get_compact_nullable_string(&mut frozen, "x").unwrap(), Some(String::new()));
    }

    #[test]
    fn tagged_fields_roundtrip() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(3u32, vec![1, 2, 3]);
        map.insert(7u32, vec![]);
        let tf = TaggedFields(map);
        let mut buf = BytesMut::new();
        tf.encode(&mut buf);
        let mut frozen = buf.freeze();
        let decoded = TaggedFields::decode(&mut frozen).unwrap();
        assert_eq!(decoded, tf);
    }

    #[test]
    fn buffer_underrun_is_an_error_not_a_panic() {
        let mut buf = BytesMut::from(&b"\x00"[..]).freeze();
        assert!(matches!(
            get_i32(&mut buf),
            Err(ProtocolDecodeError::BufferUnderrun { .. })
        ));
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Op {
        Read,
        Write,
        Describe,
    }

    #[test]
    fn bitfield_decodes_ordered_members() {
        let vocab = [(0u8, Op::Read), (1u8, Op::Write), (2u8, Op::Describe)];
        let members = decode_bitfield(0b101, &vocab);
        assert_eq!(members, vec![Op::Read, Op::Describe]);
        assert_eq!(encode_bitfield(&members, &vocab), 0b101);
    }
}
