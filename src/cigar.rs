//! CIGAR operations packed as 32-bit length+opcode words.
//!
//! Each operation stores its length in the upper 28 bits and its opcode in
//! the low 4 (`M=0 I=1 D=2 N=3 S=4 H=5 P=6 ==7 X=8`). The CIGAR region of a
//! record follows the variable-length read name and is therefore not
//! 4-byte aligned; operations are decoded bytewise, never reinterpreted.

use std::fmt;

use crate::error::{RecordError, Result};

/// Maximum operation length; the length field is 28 bits.
pub const MAX_OP_LEN: u32 = (1 << 28) - 1;

/// Opcode characters indexed by the low 4 bits; codes 9..=15 are invalid
/// and render as `?`.
const OP_CHARS: [u8; 16] = *b"MIDNSHP=X???????";

/// Consumption classes, two bits per opcode: bit 0 = consumes query,
/// bit 1 = consumes reference. 18 bits cover the nine valid opcodes;
/// invalid codes shift past the table and consume nothing.
const CIGAR_TYPE: u32 = 0x3C1A7;

/// A single CIGAR operation: `length << 4 | opcode`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CigarOp(u32);

impl CigarOp {
    /// Create an operation from a length and an opcode character.
    ///
    /// # Errors
    ///
    /// [`RecordError::InvalidCigarOp`] for characters outside `MIDNSHP=X`;
    /// [`RecordError::BadLength`] for lengths that do not fit in 28 bits.
    pub fn new(len: u32, op: char) -> Result<Self> {
        if len > MAX_OP_LEN {
            return Err(RecordError::BadLength {
                field: "CIGAR operation",
                reason: format!("length {len} exceeds 2^28 - 1"),
            });
        }
        let code = match op {
            'M' => 0,
            'I' => 1,
            'D' => 2,
            'N' => 3,
            'S' => 4,
            'H' => 5,
            'P' => 6,
            '=' => 7,
            'X' => 8,
            _ => return Err(RecordError::InvalidCigarOp(op)),
        };
        Ok(Self((len << 4) | code))
    }

    /// Wrap a raw 32-bit operation word as read off the wire.
    #[inline]
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw 32-bit operation word.
    #[inline]
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Operation length.
    #[inline]
    #[must_use]
    pub fn len(self) -> u32 {
        self.0 >> 4
    }

    /// Whether the operation length is zero.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// The 4-bit opcode.
    #[inline]
    #[must_use]
    pub fn code(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    /// Opcode character; `?` for codes outside `MIDNSHP=X`.
    #[inline]
    #[must_use]
    pub fn op_char(self) -> char {
        OP_CHARS[self.code() as usize] as char
    }

    /// Whether the operation consumes query bases (M/I/S/=/X).
    #[inline]
    #[must_use]
    pub fn consumes_query(self) -> bool {
        (CIGAR_TYPE >> (2 * u32::from(self.code()))) & 1 != 0
    }

    /// Whether the operation consumes reference bases (M/D/N/=/X).
    #[inline]
    #[must_use]
    pub fn consumes_reference(self) -> bool {
        (CIGAR_TYPE >> (2 * u32::from(self.code()))) & 2 != 0
    }

    /// Whether the operation is an alignment match or mismatch (M/=/X).
    #[inline]
    #[must_use]
    pub fn is_match_or_mismatch(self) -> bool {
        matches!(self.code(), 0 | 7 | 8)
    }
}

impl fmt::Display for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.len(), self.op_char())
    }
}

impl fmt::Debug for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Sum of reference-consuming operation lengths (M/D/N/=/X).
///
/// This is how many reference bases the alignment spans, as used for index
/// bin computation.
#[must_use]
pub fn reference_length<I>(ops: I) -> u32
where
    I: IntoIterator<Item = CigarOp>,
{
    ops.into_iter().filter(|op| op.consumes_reference()).map(CigarOp::len).sum()
}

/// Sum of query-consuming operation lengths (M/I/S/=/X): the read length
/// the CIGAR implies.
#[must_use]
pub fn query_length<I>(ops: I) -> u32
where
    I: IntoIterator<Item = CigarOp>,
{
    ops.into_iter().filter(|op| op.consumes_query()).map(CigarOp::len).sum()
}

/// Render operations as a CIGAR string; `*` when there are none.
#[must_use]
pub fn cigar_string<I>(ops: I) -> String
where
    I: IntoIterator<Item = CigarOp>,
{
    use std::fmt::Write as _;

    let mut out = String::new();
    for op in ops {
        let _ = write!(out, "{op}");
    }
    if out.is_empty() {
        out.push('*');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // ========================================================================
    // Construction tests
    // ========================================================================

    #[rstest]
    #[case::alignment_match('M', 0)]
    #[case::insertion('I', 1)]
    #[case::deletion('D', 2)]
    #[case::skip('N', 3)]
    #[case::soft_clip('S', 4)]
    #[case::hard_clip('H', 5)]
    #[case::padding('P', 6)]
    #[case::sequence_match('=', 7)]
    #[case::sequence_mismatch('X', 8)]
    fn test_new_valid_ops(#[case] ch: char, #[case] code: u8) {
        let op = CigarOp::new(10, ch).unwrap();
        assert_eq!(op.code(), code);
        assert_eq!(op.len(), 10);
        assert_eq!(op.op_char(), ch);
    }

    #[test]
    fn test_new_invalid_op_char() {
        assert_eq!(CigarOp::new(10, 'Q'), Err(RecordError::InvalidCigarOp('Q')));
        assert_eq!(CigarOp::new(10, '*'), Err(RecordError::InvalidCigarOp('*')));
    }

    #[test]
    fn test_new_length_overflow() {
        assert!(CigarOp::new(MAX_OP_LEN, 'M').is_ok());
        assert!(matches!(
            CigarOp::new(MAX_OP_LEN + 1, 'M'),
            Err(RecordError::BadLength { field: "CIGAR operation", .. })
        ));
    }

    #[test]
    fn test_raw_roundtrip() {
        let op = CigarOp::new(22, 'M').unwrap();
        assert_eq!(op.raw(), 22 << 4);
        assert_eq!(CigarOp::from_raw(op.raw()), op);
    }

    #[test]
    fn test_invalid_code_renders_question_mark() {
        let op = CigarOp::from_raw((5 << 4) | 15);
        assert_eq!(op.op_char(), '?');
        assert_eq!(op.to_string(), "5?");
        let op = CigarOp::from_raw((3 << 4) | 9);
        assert_eq!(op.op_char(), '?');
    }

    // ========================================================================
    // Predicate tests
    // ========================================================================

    #[rstest]
    #[case::alignment_match('M', true, true)]
    #[case::insertion('I', true, false)]
    #[case::deletion('D', false, true)]
    #[case::skip('N', false, true)]
    #[case::soft_clip('S', true, false)]
    #[case::hard_clip('H', false, false)]
    #[case::padding('P', false, false)]
    #[case::sequence_match('=', true, true)]
    #[case::sequence_mismatch('X', true, true)]
    fn test_consumption_predicates(#[case] ch: char, #[case] query: bool, #[case] reference: bool) {
        let op = CigarOp::new(1, ch).unwrap();
        assert_eq!(op.consumes_query(), query, "query for {ch}");
        assert_eq!(op.consumes_reference(), reference, "reference for {ch}");
    }

    #[test]
    fn test_invalid_code_consumes_nothing() {
        let op = CigarOp::from_raw((5 << 4) | 15);
        assert!(!op.consumes_query());
        assert!(!op.consumes_reference());
    }

    #[test]
    fn test_is_match_or_mismatch() {
        assert!(CigarOp::new(1, 'M').unwrap().is_match_or_mismatch());
        assert!(CigarOp::new(1, '=').unwrap().is_match_or_mismatch());
        assert!(CigarOp::new(1, 'X').unwrap().is_match_or_mismatch());
        assert!(!CigarOp::new(1, 'I').unwrap().is_match_or_mismatch());
        assert!(!CigarOp::new(1, 'S').unwrap().is_match_or_mismatch());
    }

    // ========================================================================
    // Length sum tests
    // ========================================================================

    #[test]
    fn test_reference_length_mixed_ops() {
        // 5S10M2D3N5M3I8X2H: ref consuming = 10+2+3+5+8 = 28
        let ops = [
            CigarOp::new(5, 'S').unwrap(),
            CigarOp::new(10, 'M').unwrap(),
            CigarOp::new(2, 'D').unwrap(),
            CigarOp::new(3, 'N').unwrap(),
            CigarOp::new(5, 'M').unwrap(),
            CigarOp::new(3, 'I').unwrap(),
            CigarOp::new(8, 'X').unwrap(),
            CigarOp::new(2, 'H').unwrap(),
        ];
        assert_eq!(reference_length(ops), 28);
    }

    #[test]
    fn test_query_length_mixed_ops() {
        // 5S10M3I2D8X: query consuming = 5+10+3+8 = 26
        let ops = [
            CigarOp::new(5, 'S').unwrap(),
            CigarOp::new(10, 'M').unwrap(),
            CigarOp::new(3, 'I').unwrap(),
            CigarOp::new(2, 'D').unwrap(),
            CigarOp::new(8, 'X').unwrap(),
        ];
        assert_eq!(query_length(ops), 26);
    }

    #[test]
    fn test_length_sums_empty() {
        assert_eq!(reference_length([]), 0);
        assert_eq!(query_length([]), 0);
    }

    // ========================================================================
    // Rendering tests
    // ========================================================================

    #[test]
    fn test_cigar_string() {
        let ops = [CigarOp::new(20, 'M').unwrap(), CigarOp::new(2, 'X').unwrap()];
        assert_eq!(cigar_string(ops), "20M2X");
    }

    #[test]
    fn test_cigar_string_empty_is_star() {
        assert_eq!(cigar_string([]), "*");
    }
}
