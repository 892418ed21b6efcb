//! A single alignment record over one contiguous buffer.
//!
//! [`BamRecord`] wraps the exact wire encoding of one BAM alignment and
//! exposes it as a mutable, typed object: fixed header fields, the read
//! name, the packed CIGAR, the 4-bit packed sequence, per-base qualities,
//! and the auxiliary tag stream.
//!
//! The buffer is held as `Cow<[u8]>`: a record wrapped around a reader's
//! decoded block borrows it without copying, and the first mutation clones
//! it exactly once. Concurrent read-only access is safe (`&BamRecord` is
//! `Send + Sync`); mutation needs the usual exclusive reference, and two
//! records borrowing the same block that both mutate each clone their own
//! copy and diverge without corrupting the block.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Read, Write};

use bstr::ByteSlice;

use crate::bin::reg2bin;
use crate::builder::RecordBuilder;
use crate::cigar::{self, CigarOp};
use crate::endian::load_u32;
use crate::error::{RecordError, Result};
use crate::fields::{self, flags};
use crate::sequence::{self, SequenceView};
use crate::tags::{self, TagValue, TagsIter};

/// One alignment record, owned or borrowed from a reader's block.
#[derive(Clone)]
pub struct BamRecord<'a> {
    buf: Cow<'a, [u8]>,
}

impl<'a> BamRecord<'a> {
    /// Wrap an externally owned buffer without copying.
    ///
    /// The record aliases `bytes` until its first mutation.
    ///
    /// # Errors
    ///
    /// `BadLength` if the buffer is shorter than the 32-byte fixed header.
    pub fn from_slice(bytes: &'a [u8]) -> Result<Self> {
        Self::validate(bytes)?;
        Ok(Self { buf: Cow::Borrowed(bytes) })
    }

    /// Take ownership of a record buffer.
    ///
    /// # Errors
    ///
    /// `BadLength` if the buffer is shorter than the 32-byte fixed header.
    pub fn from_vec(bytes: Vec<u8>) -> Result<BamRecord<'static>> {
        Self::validate(&bytes)?;
        Ok(BamRecord { buf: Cow::Owned(bytes) })
    }

    /// Build a fresh owned record from its parts.
    ///
    /// The record starts unplaced (`ref_id = -1`, `position = -1`, flag 0,
    /// mapq 0) with all base qualities unknown (0xFF); use the setters to
    /// place it.
    ///
    /// # Errors
    ///
    /// `BadLength` for names outside 1..=254 bytes or containing NUL, empty
    /// sequences, or more than `u16::MAX` CIGAR operations.
    pub fn new(name: &[u8], bases: &[u8], cigar: &[CigarOp]) -> Result<BamRecord<'static>> {
        RecordBuilder::new().name(name).sequence(bases).cigar(cigar).build()
    }

    /// Build a fresh owned record with a pre-assembled tag stream.
    ///
    /// `tag_bytes` is appended verbatim as the auxiliary data region.
    ///
    /// # Errors
    ///
    /// Same as [`BamRecord::new`].
    pub fn with_raw_tags(
        name: &[u8],
        bases: &[u8],
        cigar: &[CigarOp],
        tag_bytes: &[u8],
    ) -> Result<BamRecord<'static>> {
        RecordBuilder::new().name(name).sequence(bases).cigar(cigar).raw_tags(tag_bytes).build()
    }

    fn validate(bytes: &[u8]) -> Result<()> {
        if bytes.len() < fields::MIN_BAM_HEADER_LEN {
            return Err(RecordError::BadLength {
                field: "record buffer",
                reason: format!("{} bytes, need at least {}", bytes.len(), fields::MIN_BAM_HEADER_LEN),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Buffer state
    // ========================================================================

    /// Whether the record owns its buffer (true after any mutation, or for
    /// records built rather than wrapped).
    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self.buf, Cow::Owned(_))
    }

    /// Detach from the backing block, cloning if still borrowed.
    #[must_use]
    pub fn into_owned(self) -> BamRecord<'static> {
        BamRecord { buf: Cow::Owned(self.buf.into_owned()) }
    }

    /// The raw record bytes (without the block-size prefix).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    // ========================================================================
    // Fixed-field accessors
    // ========================================================================

    /// Reference sequence ID (-1 = unmapped).
    #[inline]
    #[must_use]
    pub fn ref_id(&self) -> i32 {
        fields::ref_id(&self.buf)
    }

    /// 0-based leftmost position (-1 = unset).
    #[inline]
    #[must_use]
    pub fn position(&self) -> i32 {
        fields::pos(&self.buf)
    }

    /// BAM index bin.
    #[inline]
    #[must_use]
    pub fn bin(&self) -> u16 {
        fields::bin(&self.buf)
    }

    /// Mapping quality.
    #[inline]
    #[must_use]
    pub fn mapq(&self) -> u8 {
        fields::mapq(&self.buf)
    }

    /// Bitwise flags.
    #[inline]
    #[must_use]
    pub fn flags(&self) -> u16 {
        fields::flags(&self.buf)
    }

    /// Sequence length in bases.
    #[inline]
    #[must_use]
    pub fn sequence_length(&self) -> usize {
        fields::l_seq(&self.buf) as usize
    }

    /// Mate reference sequence ID.
    #[inline]
    #[must_use]
    pub fn mate_ref_id(&self) -> i32 {
        fields::mate_ref_id(&self.buf)
    }

    /// Mate 0-based position.
    #[inline]
    #[must_use]
    pub fn mate_position(&self) -> i32 {
        fields::mate_pos(&self.buf)
    }

    /// Template length (TLEN).
    #[inline]
    #[must_use]
    pub fn template_length(&self) -> i32 {
        fields::template_length(&self.buf)
    }

    /// Read name without its NUL terminator.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &[u8] {
        fields::read_name(&self.buf)
    }

    // ========================================================================
    // Flag predicates
    // ========================================================================

    /// Whether a flag bit is set.
    #[inline]
    #[must_use]
    pub fn has_flag(&self, bit: u16) -> bool {
        self.flags() & bit != 0
    }

    /// Read is paired in sequencing.
    #[must_use]
    pub fn is_paired(&self) -> bool {
        self.has_flag(flags::PAIRED)
    }

    /// Pair mapped in proper orientation and insert size.
    #[must_use]
    pub fn is_proper_pair(&self) -> bool {
        self.has_flag(flags::PROPER_PAIR)
    }

    /// Read is unmapped.
    #[must_use]
    pub fn is_unmapped(&self) -> bool {
        self.has_flag(flags::UNMAPPED)
    }

    /// Mate is unmapped.
    #[must_use]
    pub fn is_mate_unmapped(&self) -> bool {
        self.has_flag(flags::MATE_UNMAPPED)
    }

    /// Read is reverse complemented.
    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.has_flag(flags::REVERSE)
    }

    /// Mate is reverse complemented.
    #[must_use]
    pub fn is_mate_reverse(&self) -> bool {
        self.has_flag(flags::MATE_REVERSE)
    }

    /// First segment in template (R1).
    #[must_use]
    pub fn is_first_segment(&self) -> bool {
        self.has_flag(flags::FIRST_SEGMENT)
    }

    /// Last segment in template (R2).
    #[must_use]
    pub fn is_last_segment(&self) -> bool {
        self.has_flag(flags::LAST_SEGMENT)
    }

    /// Secondary alignment.
    #[must_use]
    pub fn is_secondary(&self) -> bool {
        self.has_flag(flags::SECONDARY)
    }

    /// Not passing quality controls.
    #[must_use]
    pub fn is_qc_fail(&self) -> bool {
        self.has_flag(flags::QC_FAIL)
    }

    /// PCR or optical duplicate.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.has_flag(flags::DUPLICATE)
    }

    /// Supplementary alignment.
    #[must_use]
    pub fn is_supplementary(&self) -> bool {
        self.has_flag(flags::SUPPLEMENTARY)
    }

    /// Strand as `+` or `-`.
    #[must_use]
    pub fn strand(&self) -> u8 {
        if self.is_reverse() { b'-' } else { b'+' }
    }

    // ========================================================================
    // Variable-region accessors
    // ========================================================================

    /// Iterate the CIGAR operations without allocating.
    ///
    /// Empty for records whose CIGAR region runs past the end of the buffer.
    #[must_use]
    pub fn cigar(&self) -> CigarIter<'_> {
        let start = fields::cigar_offset(&self.buf);
        let end = start + fields::n_cigar_op(&self.buf) as usize * 4;
        if end > self.buf.len() {
            return CigarIter { bytes: &[] };
        }
        CigarIter { bytes: &self.buf[start..end] }
    }

    /// The CIGAR rendered as text; `*` when there are no operations.
    #[must_use]
    pub fn cigar_string(&self) -> String {
        cigar::cigar_string(self.cigar())
    }

    /// Reference bases covered by the alignment: the sum of
    /// reference-consuming CIGAR lengths, 0 for unmapped records regardless
    /// of their CIGAR.
    #[must_use]
    pub fn reference_length(&self) -> i32 {
        if self.is_unmapped() { 0 } else { cigar::reference_length(self.cigar()).cast_signed() }
    }

    /// The packed 4-bit sequence bytes.
    #[must_use]
    pub fn raw_sequence(&self) -> &[u8] {
        let start = fields::seq_offset(&self.buf).min(self.buf.len());
        let end = (start + self.sequence_length().div_ceil(2)).min(self.buf.len());
        &self.buf[start..end]
    }

    /// A random-access view over the bases.
    ///
    /// Shorter than `sequence_length` only for truncated buffers.
    #[must_use]
    pub fn sequence(&self) -> SequenceView<'_> {
        let packed = self.raw_sequence();
        let len = self.sequence_length().min(packed.len() * 2);
        SequenceView::new(packed, 0, len)
    }

    /// Per-base qualities (0xFF = unknown), one byte per base.
    #[must_use]
    pub fn base_qualities(&self) -> &[u8] {
        let start = fields::qual_offset(&self.buf).min(self.buf.len());
        let end = (start + self.sequence_length()).min(self.buf.len());
        &self.buf[start..end]
    }

    // ========================================================================
    // Fixed-field setters
    // ========================================================================
    //
    // Every setter promotes a borrowed buffer to owned before writing.

    /// Set the reference sequence ID.
    pub fn set_ref_id(&mut self, id: i32) {
        fields::set_ref_id(self.buf.to_mut(), id);
    }

    /// Set the 0-based position and recompute the bin.
    pub fn set_position(&mut self, position: i32) {
        fields::set_pos(self.buf.to_mut(), position);
        self.recalculate_bin();
    }

    /// Set the BAM index bin directly.
    pub fn set_bin(&mut self, bin: u16) {
        fields::set_bin(self.buf.to_mut(), bin);
    }

    /// Set the mapping quality.
    pub fn set_mapq(&mut self, mapq: u8) {
        fields::set_mapq(self.buf.to_mut(), mapq);
    }

    /// Set the flags.
    ///
    /// The bin is *not* recomputed here, even though flipping the unmapped
    /// bit changes what [`BamRecord::reference_length`] reports; only
    /// position and CIGAR changes trigger recomputation.
    pub fn set_flags(&mut self, flags: u16) {
        fields::set_flags(self.buf.to_mut(), flags);
    }

    /// Set or clear the unmapped flag.
    pub fn set_unmapped(&mut self, unmapped: bool) {
        self.toggle_flag(flags::UNMAPPED, unmapped);
    }

    /// Set or clear the duplicate flag.
    pub fn set_duplicate(&mut self, duplicate: bool) {
        self.toggle_flag(flags::DUPLICATE, duplicate);
    }

    fn toggle_flag(&mut self, bit: u16, on: bool) {
        let flags = if on { self.flags() | bit } else { self.flags() & !bit };
        self.set_flags(flags);
    }

    /// Set the strand from a `+` or `-` character.
    ///
    /// # Errors
    ///
    /// `BadLength` for any other byte.
    pub fn set_strand(&mut self, strand: u8) -> Result<()> {
        match strand {
            b'+' => self.toggle_flag(flags::REVERSE, false),
            b'-' => self.toggle_flag(flags::REVERSE, true),
            other => {
                return Err(RecordError::BadLength {
                    field: "strand",
                    reason: format!("invalid strand character '{}'", other as char),
                });
            }
        }
        Ok(())
    }

    /// Set the mate reference sequence ID.
    pub fn set_mate_ref_id(&mut self, id: i32) {
        fields::set_mate_ref_id(self.buf.to_mut(), id);
    }

    /// Set the mate 0-based position.
    pub fn set_mate_position(&mut self, position: i32) {
        fields::set_mate_pos(self.buf.to_mut(), position);
    }

    /// Set the template length.
    pub fn set_template_length(&mut self, tlen: i32) {
        fields::set_template_length(self.buf.to_mut(), tlen);
    }

    /// Recompute the bin from the current position and reference span.
    pub fn recalculate_bin(&mut self) {
        let bin = reg2bin(self.position(), self.position() + self.reference_length());
        fields::set_bin(self.buf.to_mut(), bin);
    }

    // ========================================================================
    // Structural mutators
    // ========================================================================

    /// Replace the read name, shifting everything after it.
    ///
    /// # Errors
    ///
    /// `BadLength` for names outside 1..=254 bytes or containing NUL.
    pub fn set_name(&mut self, name: &[u8]) -> Result<()> {
        validate_name(name)?;
        let old_len = fields::l_read_name(&self.buf) as usize;
        let buf = self.buf.to_mut();
        let old_end = (32 + old_len).min(buf.len());
        let mut repl = Vec::with_capacity(name.len() + 1);
        repl.extend_from_slice(name);
        repl.push(0);
        buf.splice(32..old_end, repl);
        fields::set_l_read_name(buf, (name.len() + 1) as u8);
        Ok(())
    }

    /// Replace the CIGAR, shifting the sequence, qualities, and tags, and
    /// recompute the bin.
    ///
    /// # Errors
    ///
    /// `BadLength` if `ops` has more than `u16::MAX` operations.
    pub fn set_cigar(&mut self, ops: &[CigarOp]) -> Result<()> {
        let count = u16::try_from(ops.len()).map_err(|_| RecordError::BadLength {
            field: "CIGAR",
            reason: format!("{} operations exceed u16", ops.len()),
        })?;
        let start = fields::cigar_offset(&self.buf);
        let old_span = fields::n_cigar_op(&self.buf) as usize * 4;
        let buf = self.buf.to_mut();
        let start = start.min(buf.len());
        let old_end = (start + old_span).min(buf.len());
        let mut repl = Vec::with_capacity(ops.len() * 4);
        for op in ops {
            repl.extend_from_slice(&op.raw().to_le_bytes());
        }
        buf.splice(start..old_end, repl);
        fields::set_n_cigar_op(buf, count);
        self.recalculate_bin();
        Ok(())
    }

    /// Replace the sequence, shifting the tags.
    ///
    /// Bases are re-packed two per byte (high nibble first) and every
    /// per-base quality is reset to 0xFF (unknown).
    ///
    /// # Errors
    ///
    /// `BadLength` for an empty sequence or one longer than `u32::MAX`.
    pub fn set_sequence(&mut self, bases: &[u8]) -> Result<()> {
        if bases.is_empty() {
            return Err(RecordError::BadLength {
                field: "sequence",
                reason: "must not be empty".to_string(),
            });
        }
        let new_len = u32::try_from(bases.len()).map_err(|_| RecordError::BadLength {
            field: "sequence",
            reason: format!("{} bases exceed u32", bases.len()),
        })?;
        let start = fields::seq_offset(&self.buf);
        let old_len = self.sequence_length();
        let old_span = old_len.div_ceil(2) + old_len;
        let buf = self.buf.to_mut();
        let start = start.min(buf.len());
        let old_end = (start + old_span).min(buf.len());
        let mut repl = Vec::with_capacity(bases.len().div_ceil(2) + bases.len());
        sequence::pack_sequence_into(&mut repl, bases);
        repl.resize(repl.len() + bases.len(), 0xFF);
        buf.splice(start..old_end, repl);
        fields::set_l_seq(buf, new_len);
        Ok(())
    }

    /// Overwrite the per-base qualities in place.
    ///
    /// # Errors
    ///
    /// `BadLength` if `quals` is not exactly `sequence_length` bytes, or if
    /// the buffer is too short to hold its claimed quality region.
    pub fn set_base_qualities(&mut self, quals: &[u8]) -> Result<()> {
        if quals.len() != self.sequence_length() {
            return Err(RecordError::BadLength {
                field: "base qualities",
                reason: format!("{} values for {} bases", quals.len(), self.sequence_length()),
            });
        }
        let start = fields::qual_offset(&self.buf);
        if start + quals.len() > self.buf.len() {
            return Err(RecordError::BadLength {
                field: "record buffer",
                reason: "quality region runs past the end of the buffer".to_string(),
            });
        }
        self.buf.to_mut()[start..start + quals.len()].copy_from_slice(quals);
        Ok(())
    }

    // ========================================================================
    // Tags
    // ========================================================================

    fn aux(&self) -> &[u8] {
        fields::aux_data_slice(&self.buf)
    }

    fn aux_start(&self) -> usize {
        fields::aux_data_offset_from_record(&self.buf).unwrap_or(self.buf.len()).min(self.buf.len())
    }

    /// Decode the value stored under `key`.
    ///
    /// # Errors
    ///
    /// `BadKey` unless the key is exactly two bytes; `UnknownTagType` /
    /// `BadLength` if the matching entry cannot be decoded.
    pub fn tag(&self, key: &[u8]) -> Result<Option<TagValue>> {
        tags::get(self.aux(), tag_key(key)?)
    }

    /// Insert, replace, or delete the entry for `key`.
    ///
    /// A `Some` value replaces an existing entry in place (splicing when
    /// the payload length changes) or is appended; `None` deletes the entry
    /// and is a no-op when the key is absent. Stream order is preserved
    /// except for the mutated entry.
    ///
    /// # Errors
    ///
    /// `BadKey` unless the key is exactly two bytes.
    pub fn set_tag(&mut self, key: &[u8], value: impl Into<Option<TagValue>>) -> Result<()> {
        let key = tag_key(key)?;
        let aux_start = self.aux_start();
        let found = tags::find_entry(self.aux(), key);
        match (found, value.into()) {
            (Some((start, end)), None) => {
                self.buf.to_mut().drain(aux_start + start..aux_start + end);
            }
            (Some((start, end)), Some(value)) => {
                let new_len = 3 + value.payload_len();
                let abs = aux_start + start;
                let buf = self.buf.to_mut();
                if new_len == end - start {
                    // Same length: overwrite type and payload in place.
                    let mut repl = Vec::with_capacity(new_len - 2);
                    value.write_payload(&mut repl);
                    buf[abs + 2..abs + new_len].copy_from_slice(&repl);
                } else {
                    let mut repl = Vec::with_capacity(new_len);
                    repl.extend_from_slice(&key);
                    value.write_payload(&mut repl);
                    buf.splice(abs..aux_start + end, repl);
                }
            }
            (None, Some(value)) => {
                tags::append_entry(self.buf.to_mut(), key, &value);
            }
            (None, None) => {}
        }
        Ok(())
    }

    /// Delete the entry for `key`, reporting whether one was present.
    ///
    /// # Errors
    ///
    /// `BadKey` unless the key is exactly two bytes.
    pub fn remove_tag(&mut self, key: &[u8]) -> Result<bool> {
        let key = tag_key(key)?;
        let aux_start = self.aux_start();
        let found = tags::find_entry(self.aux(), key);
        match found {
            Some((start, end)) => {
                self.buf.to_mut().drain(aux_start + start..aux_start + end);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete every tag.
    pub fn clear_tags(&mut self) {
        let aux_start = self.aux_start();
        self.buf.to_mut().truncate(aux_start);
    }

    /// Iterate `(key, value)` entries in stream order.
    #[must_use]
    pub fn tags(&self) -> TagsIter<'_> {
        TagsIter::new(self.aux())
    }

    /// Number of decodable tag entries.
    #[must_use]
    pub fn tag_count(&self) -> usize {
        tags::count(self.aux())
    }

    // ========================================================================
    // Wire I/O
    // ========================================================================

    /// Write the record preceded by its 4-byte little-endian block size.
    ///
    /// The block size equals the buffer length exactly.
    ///
    /// # Errors
    ///
    /// I/O errors from `writer`; `InvalidData` if the buffer exceeds the
    /// 32-bit block size.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let block_size = u32::try_from(self.buf.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "record exceeds BAM block size"))?;
        writer.write_all(&block_size.to_le_bytes())?;
        writer.write_all(&self.buf)
    }

    /// Read one block-size-framed record; `None` at clean EOF.
    ///
    /// # Errors
    ///
    /// I/O errors from `reader`; `UnexpectedEof` for a record truncated
    /// mid-frame; `InvalidData` for a frame shorter than the fixed header.
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Option<BamRecord<'static>>> {
        let mut size_buf = [0u8; 4];
        // Probe one byte to tell clean EOF from a truncated stream.
        loop {
            match reader.read(&mut size_buf[..1]) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        reader.read_exact(&mut size_buf[1..])?;
        let block_size = u32::from_le_bytes(size_buf) as usize;
        let mut buf = vec![0u8; block_size];
        reader.read_exact(&mut buf)?;
        BamRecord::from_vec(buf)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

fn tag_key(key: &[u8]) -> Result<[u8; 2]> {
    if key.len() == 2 {
        Ok([key[0], key[1]])
    } else {
        Err(RecordError::BadKey { len: key.len() })
    }
}

pub(crate) fn validate_name(name: &[u8]) -> Result<()> {
    if name.is_empty() || name.len() > 254 {
        return Err(RecordError::BadLength {
            field: "read name",
            reason: format!("{} bytes, must be 1..=254", name.len()),
        });
    }
    if name.contains(&0) {
        return Err(RecordError::BadLength {
            field: "read name",
            reason: "contains interior NUL".to_string(),
        });
    }
    Ok(())
}

/// Equality is byte-for-byte buffer equality, regardless of borrow state.
impl<'a, 'b> PartialEq<BamRecord<'b>> for BamRecord<'a> {
    fn eq(&self, other: &BamRecord<'b>) -> bool {
        self.buf[..] == other.buf[..]
    }
}

impl Eq for BamRecord<'_> {}

impl AsRef<[u8]> for BamRecord<'_> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

impl fmt::Debug for BamRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BamRecord")
            .field("name", &self.name().as_bstr())
            .field("ref_id", &self.ref_id())
            .field("position", &self.position())
            .field("flags", &self.flags())
            .field("cigar", &self.cigar_string())
            .finish_non_exhaustive()
    }
}

/// Allocation-free iterator over a record's CIGAR operations.
///
/// The CIGAR region is not 4-byte aligned, so operations are decoded
/// bytewise.
pub struct CigarIter<'r> {
    bytes: &'r [u8],
}

impl Iterator for CigarIter<'_> {
    type Item = CigarOp;

    #[inline]
    fn next(&mut self) -> Option<CigarOp> {
        if self.bytes.len() < 4 {
            return None;
        }
        let op = CigarOp::from_raw(load_u32(self.bytes, 0));
        self.bytes = &self.bytes[4..];
        Some(op)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bytes.len() / 4;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for CigarIter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<CigarOp> {
        if self.bytes.len() < 4 {
            return None;
        }
        let at = self.bytes.len() - 4;
        let op = CigarOp::from_raw(load_u32(self.bytes, at));
        self.bytes = &self.bytes[..at];
        Some(op)
    }
}

impl ExactSizeIterator for CigarIter<'_> {}
impl std::iter::FusedIterator for CigarIter<'_> {}
