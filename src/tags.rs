//! Typed access to the auxiliary tag stream.
//!
//! Tags trail the record as a linear stream of entries: a two-byte key, a
//! one-byte wire type, then a type-dependent payload. Lookup is a linear
//! scan — records typically carry a handful of tags and the stream is
//! already on hand, so no side index is kept (or needs keeping coherent
//! with splices).

use std::fmt::Write as _;

use bstr::{BStr, BString, ByteSlice};
use itertools::Itertools;

use crate::endian::{load_f32, load_i16, load_i32, load_u16, load_u32};
use crate::error::{RecordError, Result};
use crate::fields::{TAG_FIXED_SIZES, tag_value_size};

/// A decoded tag value.
///
/// Each variant maps to one wire encoding; "no value" is expressed as
/// `Option<TagValue>` at the call sites (`set_tag(key, None)` deletes).
#[derive(Clone, Debug, PartialEq)]
pub enum TagValue {
    /// `A`: a single printable character.
    Char(u8),
    /// `c`: signed 8-bit integer.
    Int8(i8),
    /// `C`: unsigned 8-bit integer.
    UInt8(u8),
    /// `s`: signed 16-bit integer.
    Int16(i16),
    /// `S`: unsigned 16-bit integer.
    UInt16(u16),
    /// `i`: signed 32-bit integer.
    Int32(i32),
    /// `I`: unsigned 32-bit integer.
    UInt32(u32),
    /// `f`: 32-bit float.
    Float(f32),
    /// `Z`: zero-terminated text.
    String(BString),
    /// `H`: zero-terminated hex text.
    Hex(BString),
    /// `B:c`
    Int8Array(Vec<i8>),
    /// `B:C`
    UInt8Array(Vec<u8>),
    /// `B:s`
    Int16Array(Vec<i16>),
    /// `B:S`
    UInt16Array(Vec<u16>),
    /// `B:i`
    Int32Array(Vec<i32>),
    /// `B:I`
    UInt32Array(Vec<u32>),
    /// `B:f`
    FloatArray(Vec<f32>),
}

impl TagValue {
    /// Wire type byte: `A c C s S i I f Z H`, or `B` for every array.
    #[must_use]
    pub fn wire_type(&self) -> u8 {
        match self {
            TagValue::Char(_) => b'A',
            TagValue::Int8(_) => b'c',
            TagValue::UInt8(_) => b'C',
            TagValue::Int16(_) => b's',
            TagValue::UInt16(_) => b'S',
            TagValue::Int32(_) => b'i',
            TagValue::UInt32(_) => b'I',
            TagValue::Float(_) => b'f',
            TagValue::String(_) => b'Z',
            TagValue::Hex(_) => b'H',
            TagValue::Int8Array(_)
            | TagValue::UInt8Array(_)
            | TagValue::Int16Array(_)
            | TagValue::UInt16Array(_)
            | TagValue::Int32Array(_)
            | TagValue::UInt32Array(_)
            | TagValue::FloatArray(_) => b'B',
        }
    }

    /// SAM type character for `KEY:TYPE:VALUE` rendering; every integral
    /// width renders as `i`.
    #[must_use]
    pub fn sam_type(&self) -> char {
        match self {
            TagValue::Char(_) => 'A',
            TagValue::Int8(_)
            | TagValue::UInt8(_)
            | TagValue::Int16(_)
            | TagValue::UInt16(_)
            | TagValue::Int32(_)
            | TagValue::UInt32(_) => 'i',
            TagValue::Float(_) => 'f',
            TagValue::String(_) => 'Z',
            TagValue::Hex(_) => 'H',
            _ => 'B',
        }
    }

    /// The value as a signed 64-bit integer, for any integral variant.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            TagValue::Int8(v) => Some(i64::from(v)),
            TagValue::UInt8(v) => Some(i64::from(v)),
            TagValue::Int16(v) => Some(i64::from(v)),
            TagValue::UInt16(v) => Some(i64::from(v)),
            TagValue::Int32(v) => Some(i64::from(v)),
            TagValue::UInt32(v) => Some(i64::from(v)),
            _ => None,
        }
    }

    /// The value as an `f32`, for the float variant.
    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        match *self {
            TagValue::Float(v) => Some(v),
            _ => None,
        }
    }

    /// The text of a `Z` or `H` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&BStr> {
        match self {
            TagValue::String(s) | TagValue::Hex(s) => Some(s.as_bstr()),
            _ => None,
        }
    }

    /// Payload length on the wire, excluding the key and type byte.
    #[must_use]
    pub(crate) fn payload_len(&self) -> usize {
        match self {
            TagValue::Char(_) | TagValue::Int8(_) | TagValue::UInt8(_) => 1,
            TagValue::Int16(_) | TagValue::UInt16(_) => 2,
            TagValue::Int32(_) | TagValue::UInt32(_) | TagValue::Float(_) => 4,
            TagValue::String(s) | TagValue::Hex(s) => s.len() + 1,
            TagValue::Int8Array(v) => 5 + v.len(),
            TagValue::UInt8Array(v) => 5 + v.len(),
            TagValue::Int16Array(v) => 5 + v.len() * 2,
            TagValue::UInt16Array(v) => 5 + v.len() * 2,
            TagValue::Int32Array(v) => 5 + v.len() * 4,
            TagValue::UInt32Array(v) => 5 + v.len() * 4,
            TagValue::FloatArray(v) => 5 + v.len() * 4,
        }
    }

    /// Append the wire type byte and payload to `out`.
    ///
    /// # Panics
    ///
    /// Panics if an array holds more than `u32::MAX` elements.
    pub(crate) fn write_payload(&self, out: &mut Vec<u8>) {
        fn header(out: &mut Vec<u8>, subtype: u8, count: usize) {
            out.push(subtype);
            let count = u32::try_from(count).expect("tag array length exceeds u32");
            out.extend_from_slice(&count.to_le_bytes());
        }

        out.push(self.wire_type());
        match self {
            TagValue::Char(c) => out.push(*c),
            TagValue::Int8(v) => out.push(v.cast_unsigned()),
            TagValue::UInt8(v) => out.push(*v),
            TagValue::Int16(v) => out.extend_from_slice(&v.to_le_bytes()),
            TagValue::UInt16(v) => out.extend_from_slice(&v.to_le_bytes()),
            TagValue::Int32(v) => out.extend_from_slice(&v.to_le_bytes()),
            TagValue::UInt32(v) => out.extend_from_slice(&v.to_le_bytes()),
            TagValue::Float(v) => out.extend_from_slice(&v.to_le_bytes()),
            TagValue::String(s) | TagValue::Hex(s) => {
                out.extend_from_slice(s);
                out.push(0);
            }
            TagValue::Int8Array(v) => {
                header(out, b'c', v.len());
                out.extend(v.iter().map(|x| x.cast_unsigned()));
            }
            TagValue::UInt8Array(v) => {
                header(out, b'C', v.len());
                out.extend_from_slice(v);
            }
            TagValue::Int16Array(v) => {
                header(out, b's', v.len());
                for x in v {
                    out.extend_from_slice(&x.to_le_bytes());
                }
            }
            TagValue::UInt16Array(v) => {
                header(out, b'S', v.len());
                for x in v {
                    out.extend_from_slice(&x.to_le_bytes());
                }
            }
            TagValue::Int32Array(v) => {
                header(out, b'i', v.len());
                for x in v {
                    out.extend_from_slice(&x.to_le_bytes());
                }
            }
            TagValue::UInt32Array(v) => {
                header(out, b'I', v.len());
                for x in v {
                    out.extend_from_slice(&x.to_le_bytes());
                }
            }
            TagValue::FloatArray(v) => {
                header(out, b'f', v.len());
                for x in v {
                    out.extend_from_slice(&x.to_le_bytes());
                }
            }
        }
    }

    /// Decode one value of wire type `type_byte` from the front of
    /// `payload`, returning the value and the payload bytes consumed.
    ///
    /// # Errors
    ///
    /// [`RecordError::UnknownTagType`] for unrecognized type or array
    /// sub-type bytes; [`RecordError::BadLength`] for payloads that run
    /// past the end of the stream.
    pub(crate) fn read(type_byte: u8, payload: &[u8]) -> Result<(Self, usize)> {
        fn truncated(type_byte: u8) -> RecordError {
            RecordError::BadLength {
                field: "tag stream",
                reason: format!("truncated '{}' payload", type_byte as char),
            }
        }

        let need = |n: usize| {
            if payload.len() < n { Err(truncated(type_byte)) } else { Ok(()) }
        };

        match type_byte {
            b'A' => {
                need(1)?;
                Ok((TagValue::Char(payload[0]), 1))
            }
            b'c' => {
                need(1)?;
                Ok((TagValue::Int8(payload[0].cast_signed()), 1))
            }
            b'C' => {
                need(1)?;
                Ok((TagValue::UInt8(payload[0]), 1))
            }
            b's' => {
                need(2)?;
                Ok((TagValue::Int16(load_i16(payload, 0)), 2))
            }
            b'S' => {
                need(2)?;
                Ok((TagValue::UInt16(load_u16(payload, 0)), 2))
            }
            b'i' => {
                need(4)?;
                Ok((TagValue::Int32(load_i32(payload, 0)), 4))
            }
            b'I' => {
                need(4)?;
                Ok((TagValue::UInt32(load_u32(payload, 0)), 4))
            }
            b'f' => {
                need(4)?;
                Ok((TagValue::Float(load_f32(payload, 0)), 4))
            }
            b'Z' | b'H' => {
                let nul = payload.iter().position(|&b| b == 0).ok_or_else(|| truncated(type_byte))?;
                let text = BString::from(&payload[..nul]);
                let value =
                    if type_byte == b'Z' { TagValue::String(text) } else { TagValue::Hex(text) };
                Ok((value, nul + 1))
            }
            b'B' => {
                need(5)?;
                let subtype = payload[0];
                let count = load_u32(payload, 1) as usize;
                let width = TAG_FIXED_SIZES[subtype as usize] as usize;
                if width == 0 || subtype == b'A' {
                    return Err(RecordError::UnknownTagType(subtype as char));
                }
                let total = count.checked_mul(width).ok_or_else(|| truncated(type_byte))?;
                need(5 + total)?;
                let elems = &payload[5..5 + total];
                let value = match subtype {
                    b'c' => TagValue::Int8Array(elems.iter().map(|&b| b.cast_signed()).collect()),
                    b'C' => TagValue::UInt8Array(elems.to_vec()),
                    b's' => {
                        TagValue::Int16Array((0..count).map(|i| load_i16(elems, i * 2)).collect())
                    }
                    b'S' => {
                        TagValue::UInt16Array((0..count).map(|i| load_u16(elems, i * 2)).collect())
                    }
                    b'i' => {
                        TagValue::Int32Array((0..count).map(|i| load_i32(elems, i * 4)).collect())
                    }
                    b'I' => {
                        TagValue::UInt32Array((0..count).map(|i| load_u32(elems, i * 4)).collect())
                    }
                    b'f' => {
                        TagValue::FloatArray((0..count).map(|i| load_f32(elems, i * 4)).collect())
                    }
                    _ => unreachable!("width check rejects other sub-types"),
                };
                Ok((value, 5 + total))
            }
            other => Err(RecordError::UnknownTagType(other as char)),
        }
    }

    /// Append the SAM `VALUE` text for this value.
    pub(crate) fn write_sam_value(&self, out: &mut String) {
        match self {
            TagValue::Char(c) => out.push(*c as char),
            TagValue::Int8(v) => {
                let _ = write!(out, "{v}");
            }
            TagValue::UInt8(v) => {
                let _ = write!(out, "{v}");
            }
            TagValue::Int16(v) => {
                let _ = write!(out, "{v}");
            }
            TagValue::UInt16(v) => {
                let _ = write!(out, "{v}");
            }
            TagValue::Int32(v) => {
                let _ = write!(out, "{v}");
            }
            TagValue::UInt32(v) => {
                let _ = write!(out, "{v}");
            }
            TagValue::Float(v) => {
                let _ = write!(out, "{v}");
            }
            TagValue::String(s) | TagValue::Hex(s) => out.push_str(&s.to_str_lossy()),
            TagValue::Int8Array(v) => {
                let _ = write!(out, "c,{}", v.iter().join(","));
            }
            TagValue::UInt8Array(v) => {
                let _ = write!(out, "C,{}", v.iter().join(","));
            }
            TagValue::Int16Array(v) => {
                let _ = write!(out, "s,{}", v.iter().join(","));
            }
            TagValue::UInt16Array(v) => {
                let _ = write!(out, "S,{}", v.iter().join(","));
            }
            TagValue::Int32Array(v) => {
                let _ = write!(out, "i,{}", v.iter().join(","));
            }
            TagValue::UInt32Array(v) => {
                let _ = write!(out, "I,{}", v.iter().join(","));
            }
            TagValue::FloatArray(v) => {
                let _ = write!(out, "f,{}", v.iter().join(","));
            }
        }
    }
}

impl From<i8> for TagValue {
    fn from(v: i8) -> Self {
        TagValue::Int8(v)
    }
}

impl From<u8> for TagValue {
    fn from(v: u8) -> Self {
        TagValue::UInt8(v)
    }
}

impl From<i16> for TagValue {
    fn from(v: i16) -> Self {
        TagValue::Int16(v)
    }
}

impl From<u16> for TagValue {
    fn from(v: u16) -> Self {
        TagValue::UInt16(v)
    }
}

impl From<i32> for TagValue {
    fn from(v: i32) -> Self {
        TagValue::Int32(v)
    }
}

impl From<u32> for TagValue {
    fn from(v: u32) -> Self {
        TagValue::UInt32(v)
    }
}

impl From<f32> for TagValue {
    fn from(v: f32) -> Self {
        TagValue::Float(v)
    }
}

impl From<&str> for TagValue {
    fn from(v: &str) -> Self {
        TagValue::String(BString::from(v))
    }
}

impl From<BString> for TagValue {
    fn from(v: BString) -> Self {
        TagValue::String(v)
    }
}

impl From<Vec<i8>> for TagValue {
    fn from(v: Vec<i8>) -> Self {
        TagValue::Int8Array(v)
    }
}

impl From<Vec<i16>> for TagValue {
    fn from(v: Vec<i16>) -> Self {
        TagValue::Int16Array(v)
    }
}

impl From<Vec<u16>> for TagValue {
    fn from(v: Vec<u16>) -> Self {
        TagValue::UInt16Array(v)
    }
}

impl From<Vec<i32>> for TagValue {
    fn from(v: Vec<i32>) -> Self {
        TagValue::Int32Array(v)
    }
}

impl From<Vec<u32>> for TagValue {
    fn from(v: Vec<u32>) -> Self {
        TagValue::UInt32Array(v)
    }
}

impl From<Vec<f32>> for TagValue {
    fn from(v: Vec<f32>) -> Self {
        TagValue::FloatArray(v)
    }
}

// ============================================================================
// Stream scanning
// ============================================================================

/// Size of the whole entry (key + type + payload) starting at `p`, or
/// `None` when the remaining stream cannot be decoded.
fn entry_size(aux: &[u8], p: usize) -> Option<usize> {
    let type_byte = aux[p + 2];
    match tag_value_size(type_byte, &aux[p + 3..]) {
        Some(size) if p + 3 + size <= aux.len() => Some(3 + size),
        _ => {
            log::warn!(
                "malformed tag stream: undecodable entry at byte {p} (type '{}')",
                type_byte as char
            );
            None
        }
    }
}

/// Decode the value stored under `key`, scanning the stream in order.
pub(crate) fn get(aux: &[u8], key: [u8; 2]) -> Result<Option<TagValue>> {
    let mut p = 0;
    while p + 3 <= aux.len() {
        if aux[p..p + 2] == key {
            let (value, _) = TagValue::read(aux[p + 2], &aux[p + 3..])?;
            return Ok(Some(value));
        }
        match entry_size(aux, p) {
            Some(size) => p += size,
            None => break,
        }
    }
    Ok(None)
}

/// Byte span `[start, end)` of the full entry for `key`, if present.
pub(crate) fn find_entry(aux: &[u8], key: [u8; 2]) -> Option<(usize, usize)> {
    let mut p = 0;
    while p + 3 <= aux.len() {
        let size = entry_size(aux, p)?;
        if aux[p..p + 2] == key {
            return Some((p, p + size));
        }
        p += size;
    }
    None
}

/// Append a full entry (key, type, payload) to `out`.
pub(crate) fn append_entry(out: &mut Vec<u8>, key: [u8; 2], value: &TagValue) {
    out.extend_from_slice(&key);
    value.write_payload(out);
}

/// Number of decodable entries in the stream.
pub(crate) fn count(aux: &[u8]) -> usize {
    let mut n = 0;
    let mut p = 0;
    while p + 3 <= aux.len() {
        match entry_size(aux, p) {
            Some(size) => {
                n += 1;
                p += size;
            }
            None => break,
        }
    }
    n
}

/// Iterator over `(key, value)` entries in stream order.
///
/// Yields `Err` once and then ends if the stream turns undecodable.
pub struct TagsIter<'a> {
    aux: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> TagsIter<'a> {
    pub(crate) fn new(aux: &'a [u8]) -> Self {
        Self { aux, pos: 0, done: false }
    }
}

impl Iterator for TagsIter<'_> {
    type Item = Result<([u8; 2], TagValue)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos + 3 > self.aux.len() {
            return None;
        }
        let key = [self.aux[self.pos], self.aux[self.pos + 1]];
        let type_byte = self.aux[self.pos + 2];
        match TagValue::read(type_byte, &self.aux[self.pos + 3..]) {
            Ok((value, consumed)) => {
                self.pos += 3 + consumed;
                Some(Ok((key, value)))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // ========================================================================
    // Encode/decode round trips per wire type
    // ========================================================================

    #[rstest]
    #[case::char(TagValue::Char(b'G'))]
    #[case::int8(TagValue::Int8(-5))]
    #[case::uint8(TagValue::UInt8(200))]
    #[case::int16(TagValue::Int16(-1234))]
    #[case::uint16(TagValue::UInt16(50_000))]
    #[case::int32(TagValue::Int32(-99_999))]
    #[case::uint32(TagValue::UInt32(3_000_000_000))]
    #[case::float(TagValue::Float(5.6))]
    #[case::string(TagValue::String("hello".into()))]
    #[case::hex(TagValue::Hex("1A2B".into()))]
    #[case::int8_array(TagValue::Int8Array(vec![-1, 0, 1]))]
    #[case::uint8_array(TagValue::UInt8Array(vec![10, 20, 30]))]
    #[case::int16_array(TagValue::Int16Array(vec![-100, 0, 200]))]
    #[case::uint16_array(TagValue::UInt16Array(vec![100, 200, 300]))]
    #[case::int32_array(TagValue::Int32Array(vec![1, 2, 3, 4, 5]))]
    #[case::uint32_array(TagValue::UInt32Array(vec![1000, 2000]))]
    #[case::float_array(TagValue::FloatArray(vec![1.0, 2.5]))]
    fn test_value_roundtrip(#[case] value: TagValue) {
        let mut payload = Vec::new();
        value.write_payload(&mut payload);
        assert_eq!(payload.len(), 1 + value.payload_len());
        let (decoded, consumed) = TagValue::read(payload[0], &payload[1..]).unwrap();
        assert_eq!(consumed, value.payload_len());
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_read_unknown_type() {
        assert_eq!(TagValue::read(b'x', &[0; 4]), Err(RecordError::UnknownTagType('x')));
    }

    #[test]
    fn test_read_unknown_array_subtype() {
        // B array with 'Z' sub-type is undecodable.
        let mut payload = vec![b'Z'];
        payload.extend_from_slice(&1u32.to_le_bytes());
        payload.push(0);
        assert_eq!(TagValue::read(b'B', &payload), Err(RecordError::UnknownTagType('Z')));
    }

    #[rstest]
    #[case::int32(b'i', &[1u8, 2] as &[u8])]
    #[case::int16(b's', &[1u8] as &[u8])]
    #[case::string_no_nul(b'Z', b"abc" as &[u8])]
    #[case::array_short_header(b'B', &[b'i', 1, 0] as &[u8])]
    fn test_read_truncated(#[case] type_byte: u8, #[case] payload: &[u8]) {
        assert!(matches!(
            TagValue::read(type_byte, payload),
            Err(RecordError::BadLength { field: "tag stream", .. })
        ));
    }

    #[test]
    fn test_read_array_count_past_end() {
        // Claims 100 i32 elements, provides 4 bytes.
        let mut payload = vec![b'i'];
        payload.extend_from_slice(&100u32.to_le_bytes());
        payload.extend_from_slice(&[0; 4]);
        assert!(TagValue::read(b'B', &payload).is_err());
    }

    // ========================================================================
    // Coercions
    // ========================================================================

    #[test]
    fn test_as_int_all_integral_widths() {
        assert_eq!(TagValue::Int8(-5).as_int(), Some(-5));
        assert_eq!(TagValue::UInt8(200).as_int(), Some(200));
        assert_eq!(TagValue::Int16(-1234).as_int(), Some(-1234));
        assert_eq!(TagValue::UInt16(50_000).as_int(), Some(50_000));
        assert_eq!(TagValue::Int32(-99_999).as_int(), Some(-99_999));
        assert_eq!(TagValue::UInt32(3_000_000_000).as_int(), Some(3_000_000_000));
        assert_eq!(TagValue::Float(1.0).as_int(), None);
        assert_eq!(TagValue::String("1".into()).as_int(), None);
    }

    #[test]
    fn test_as_float_and_as_str() {
        assert_eq!(TagValue::Float(5.6).as_float(), Some(5.6));
        assert_eq!(TagValue::Int32(5).as_float(), None);
        assert_eq!(TagValue::String("abc".into()).as_str().map(|s| s.to_vec()), Some(b"abc".to_vec()));
        assert_eq!(TagValue::Hex("1A".into()).as_str().map(|s| s.to_vec()), Some(b"1A".to_vec()));
        assert_eq!(TagValue::Int32(5).as_str(), None);
    }

    // ========================================================================
    // SAM rendering
    // ========================================================================

    #[rstest]
    #[case::char(TagValue::Char(b'G'), 'A', "G")]
    #[case::int8(TagValue::Int8(-5), 'i', "-5")]
    #[case::uint32(TagValue::UInt32(7), 'i', "7")]
    #[case::float(TagValue::Float(0.25), 'f', "0.25")]
    #[case::string(TagValue::String("abc".into()), 'Z', "abc")]
    #[case::hex(TagValue::Hex("1A2B".into()), 'H', "1A2B")]
    #[case::int_array(TagValue::Int32Array(vec![1, 2, 3]), 'B', "i,1,2,3")]
    #[case::float_array(TagValue::FloatArray(vec![1.5, 2.0]), 'B', "f,1.5,2")]
    fn test_sam_rendering(#[case] value: TagValue, #[case] sam_type: char, #[case] text: &str) {
        assert_eq!(value.sam_type(), sam_type);
        let mut out = String::new();
        value.write_sam_value(&mut out);
        assert_eq!(out, text);
    }

    // ========================================================================
    // Stream scanning
    // ========================================================================

    fn sample_stream() -> Vec<u8> {
        let mut aux = Vec::new();
        append_entry(&mut aux, *b"NM", &TagValue::UInt8(5));
        append_entry(&mut aux, *b"RG", &TagValue::String("sample1".into()));
        append_entry(&mut aux, *b"pa", &TagValue::Int32Array(vec![1, 2, 3]));
        aux
    }

    #[test]
    fn test_get_present_and_absent() {
        let aux = sample_stream();
        assert_eq!(get(&aux, *b"NM").unwrap(), Some(TagValue::UInt8(5)));
        assert_eq!(get(&aux, *b"RG").unwrap(), Some(TagValue::String("sample1".into())));
        assert_eq!(get(&aux, *b"pa").unwrap(), Some(TagValue::Int32Array(vec![1, 2, 3])));
        assert_eq!(get(&aux, *b"XX").unwrap(), None);
    }

    #[test]
    fn test_get_after_array_entry() {
        // Traversal must skip a B array correctly to reach later entries.
        let mut aux = Vec::new();
        append_entry(&mut aux, *b"pa", &TagValue::Int32Array(vec![1, 2, 3]));
        append_entry(&mut aux, *b"NM", &TagValue::UInt8(7));
        assert_eq!(get(&aux, *b"NM").unwrap(), Some(TagValue::UInt8(7)));
    }

    #[test]
    fn test_get_unknown_type_on_match_fails() {
        let aux = [b'X', b'Y', b'?', 0];
        assert_eq!(get(&aux, *b"XY"), Err(RecordError::UnknownTagType('?')));
    }

    #[test]
    fn test_get_stops_at_malformed_entry() {
        // First entry fine, second undecodable; a key beyond it is unreachable.
        let mut aux = Vec::new();
        append_entry(&mut aux, *b"AA", &TagValue::UInt8(1));
        aux.extend_from_slice(&[b'B', b'B', b'?', 0]);
        assert_eq!(get(&aux, *b"AA").unwrap(), Some(TagValue::UInt8(1)));
        assert_eq!(get(&aux, *b"CC").unwrap(), None);
    }

    #[test]
    fn test_find_entry_spans() {
        let aux = sample_stream();
        // NM:C:5 occupies [0, 4); RG:Z:sample1 occupies [4, 15).
        assert_eq!(find_entry(&aux, *b"NM"), Some((0, 4)));
        assert_eq!(find_entry(&aux, *b"RG"), Some((4, 15)));
        assert_eq!(find_entry(&aux, *b"XX"), None);
    }

    #[test]
    fn test_count_entries() {
        assert_eq!(count(&sample_stream()), 3);
        assert_eq!(count(&[]), 0);
    }

    #[test]
    fn test_count_stops_at_malformed_tail() {
        let mut aux = sample_stream();
        aux.extend_from_slice(&[b'Q', b'Q', b'?']);
        assert_eq!(count(&aux), 3);
    }

    #[test]
    fn test_iter_stream_order() {
        let aux = sample_stream();
        let entries: Vec<_> = TagsIter::new(&aux).map(Result::unwrap).collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], (*b"NM", TagValue::UInt8(5)));
        assert_eq!(entries[1], (*b"RG", TagValue::String("sample1".into())));
        assert_eq!(entries[2], (*b"pa", TagValue::Int32Array(vec![1, 2, 3])));
    }

    #[test]
    fn test_iter_yields_error_then_ends() {
        let mut aux = Vec::new();
        append_entry(&mut aux, *b"AA", &TagValue::UInt8(1));
        aux.extend_from_slice(&[b'B', b'B', b'?', 0]);
        let mut iter = TagsIter::new(&aux);
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }
}
