//! Fluent construction of owned records.
//!
//! [`RecordBuilder`] assembles a record buffer in a single pass: fixed
//! header, name, CIGAR, packed sequence, qualities, then tags. The bin is
//! computed from the position and the reference span of the CIGAR.
//!
//! ```rust,ignore
//! let record = RecordBuilder::new()
//!     .name(b"read1")
//!     .sequence(b"ACGTACGT")
//!     .cigar(&[CigarOp::new(8, 'M')?])
//!     .ref_id(0)
//!     .position(100)
//!     .tag(*b"RG", TagValue::from("grp1"))
//!     .build()?;
//! ```

use crate::bin::reg2bin;
use crate::cigar::{self, CigarOp};
use crate::error::{RecordError, Result};
use crate::fields::flags;
use crate::record::{BamRecord, validate_name};
use crate::sequence::pack_sequence_into;
use crate::tags::{self, TagValue};

/// Builder for owned records.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    name: Vec<u8>,
    flag: u16,
    ref_id: i32,
    position: i32,
    mapq: u8,
    mate_ref_id: i32,
    mate_position: i32,
    template_length: i32,
    bases: Vec<u8>,
    quals: Option<Vec<u8>>,
    cigar: Vec<CigarOp>,
    tag_bytes: Vec<u8>,
}

impl RecordBuilder {
    /// A builder for an unplaced record: `ref_id = -1`, `position = -1`,
    /// flag 0, mapq 0, no mate, no tags.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: Vec::new(),
            flag: 0,
            ref_id: -1,
            position: -1,
            mapq: 0,
            mate_ref_id: -1,
            mate_position: -1,
            template_length: 0,
            bases: Vec::new(),
            quals: None,
            cigar: Vec::new(),
            tag_bytes: Vec::new(),
        }
    }

    /// Read name (without NUL terminator).
    #[must_use]
    pub fn name(mut self, name: &[u8]) -> Self {
        self.name = name.to_vec();
        self
    }

    /// ASCII sequence bases.
    #[must_use]
    pub fn sequence(mut self, bases: &[u8]) -> Self {
        self.bases = bases.to_vec();
        self
    }

    /// Raw Phred base qualities; defaults to all 0xFF (unknown).
    #[must_use]
    pub fn qualities(mut self, quals: &[u8]) -> Self {
        self.quals = Some(quals.to_vec());
        self
    }

    /// CIGAR operations.
    #[must_use]
    pub fn cigar(mut self, ops: &[CigarOp]) -> Self {
        self.cigar = ops.to_vec();
        self
    }

    /// Bitwise flags.
    #[must_use]
    pub fn flags(mut self, flag: u16) -> Self {
        self.flag = flag;
        self
    }

    /// Reference sequence ID.
    #[must_use]
    pub fn ref_id(mut self, id: i32) -> Self {
        self.ref_id = id;
        self
    }

    /// 0-based leftmost position.
    #[must_use]
    pub fn position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    /// Mapping quality.
    #[must_use]
    pub fn mapq(mut self, mapq: u8) -> Self {
        self.mapq = mapq;
        self
    }

    /// Mate reference sequence ID.
    #[must_use]
    pub fn mate_ref_id(mut self, id: i32) -> Self {
        self.mate_ref_id = id;
        self
    }

    /// Mate 0-based position.
    #[must_use]
    pub fn mate_position(mut self, position: i32) -> Self {
        self.mate_position = position;
        self
    }

    /// Template length.
    #[must_use]
    pub fn template_length(mut self, tlen: i32) -> Self {
        self.template_length = tlen;
        self
    }

    /// Append pre-assembled tag bytes verbatim.
    #[must_use]
    pub fn raw_tags(mut self, tag_bytes: &[u8]) -> Self {
        self.tag_bytes.extend_from_slice(tag_bytes);
        self
    }

    /// Append one typed tag entry.
    #[must_use]
    pub fn tag(mut self, key: [u8; 2], value: TagValue) -> Self {
        tags::append_entry(&mut self.tag_bytes, key, &value);
        self
    }

    /// Assemble the record.
    ///
    /// # Errors
    ///
    /// `BadLength` for names outside 1..=254 bytes or containing NUL, an
    /// empty sequence, more than `u16::MAX` CIGAR operations, or a quality
    /// array whose length differs from the sequence.
    pub fn build(self) -> Result<BamRecord<'static>> {
        validate_name(&self.name)?;
        if self.bases.is_empty() {
            return Err(RecordError::BadLength {
                field: "sequence",
                reason: "must not be empty".to_string(),
            });
        }
        let l_seq = u32::try_from(self.bases.len()).map_err(|_| RecordError::BadLength {
            field: "sequence",
            reason: format!("{} bases exceed u32", self.bases.len()),
        })?;
        let n_cigar = u16::try_from(self.cigar.len()).map_err(|_| RecordError::BadLength {
            field: "CIGAR",
            reason: format!("{} operations exceed u16", self.cigar.len()),
        })?;
        if let Some(quals) = &self.quals {
            if quals.len() != self.bases.len() {
                return Err(RecordError::BadLength {
                    field: "base qualities",
                    reason: format!("{} values for {} bases", quals.len(), self.bases.len()),
                });
            }
        }

        let covered = if self.flag & flags::UNMAPPED != 0 {
            0
        } else {
            cigar::reference_length(self.cigar.iter().copied()).cast_signed()
        };
        let bin = reg2bin(self.position, self.position + covered);

        let l_read_name = self.name.len() + 1;
        let packed_len = self.bases.len().div_ceil(2);
        let mut buf = Vec::with_capacity(
            32 + l_read_name + self.cigar.len() * 4 + packed_len + self.bases.len()
                + self.tag_bytes.len(),
        );

        buf.extend_from_slice(&self.ref_id.to_le_bytes());
        buf.extend_from_slice(&self.position.to_le_bytes());
        buf.push(l_read_name as u8);
        buf.push(self.mapq);
        buf.extend_from_slice(&bin.to_le_bytes());
        buf.extend_from_slice(&n_cigar.to_le_bytes());
        buf.extend_from_slice(&self.flag.to_le_bytes());
        buf.extend_from_slice(&l_seq.to_le_bytes());
        buf.extend_from_slice(&self.mate_ref_id.to_le_bytes());
        buf.extend_from_slice(&self.mate_position.to_le_bytes());
        buf.extend_from_slice(&self.template_length.to_le_bytes());

        buf.extend_from_slice(&self.name);
        buf.push(0);
        for op in &self.cigar {
            buf.extend_from_slice(&op.raw().to_le_bytes());
        }
        pack_sequence_into(&mut buf, &self.bases);
        match self.quals {
            Some(quals) => buf.extend_from_slice(&quals),
            None => buf.resize(buf.len() + self.bases.len(), 0xFF),
        }
        buf.extend_from_slice(&self.tag_bytes);

        BamRecord::from_vec(buf)
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
