//! SAM text rendering.
//!
//! A record stores numeric reference ids; rendering SAM needs the reader's
//! reference-sequence table, consumed here through [`ReferenceNames`]. The
//! unit type implements it as the always-absent resolver for records
//! rendered without one (every reference renders as `*`).

use std::io::{self, Write};

use crate::record::BamRecord;

/// Resolves reference ids to names during text rendering.
pub trait ReferenceNames {
    /// Name of reference sequence `id`, if known.
    fn reference_name(&self, id: usize) -> Option<&str>;
}

impl ReferenceNames for () {
    fn reference_name(&self, _id: usize) -> Option<&str> {
        None
    }
}

impl<T: AsRef<str>> ReferenceNames for [T] {
    fn reference_name(&self, id: usize) -> Option<&str> {
        self.get(id).map(AsRef::as_ref)
    }
}

impl<T: AsRef<str>> ReferenceNames for Vec<T> {
    fn reference_name(&self, id: usize) -> Option<&str> {
        self.as_slice().reference_name(id)
    }
}

impl BamRecord<'_> {
    /// Write the record as one SAM line, without a trailing newline.
    ///
    /// Field order: name, flag, reference name, position+1, mapq, CIGAR,
    /// mate reference (`=` when it equals the record's own bound
    /// reference), mate position+1, template length, sequence, Phred+33
    /// qualities, then one `KEY:TYPE:VALUE` column per tag. Missing or
    /// unresolvable values render as `*`.
    ///
    /// # Errors
    ///
    /// I/O errors from `writer`; `InvalidData` if the tag stream turns
    /// undecodable mid-iteration.
    pub fn write_sam<W, R>(&self, writer: &mut W, refs: &R) -> io::Result<()>
    where
        W: Write,
        R: ReferenceNames + ?Sized,
    {
        let name = self.name();
        writer.write_all(if name.is_empty() { b"*" } else { name })?;
        write!(writer, "\t{}\t", self.flags())?;

        if self.ref_id() < 0 {
            writer.write_all(b"*")?;
        } else {
            let resolved = refs.reference_name(self.ref_id().cast_unsigned() as usize);
            writer.write_all(resolved.unwrap_or("*").as_bytes())?;
        }
        write!(writer, "\t{}\t{}\t", self.position() + 1, self.mapq())?;

        if self.cigar().len() == 0 {
            writer.write_all(b"*")?;
        } else {
            for op in self.cigar() {
                write!(writer, "{op}")?;
            }
        }

        if self.mate_ref_id() < 0 {
            writer.write_all(b"\t*\t")?;
        } else if self.mate_ref_id() == self.ref_id() {
            writer.write_all(b"\t=\t")?;
        } else {
            let resolved = refs.reference_name(self.mate_ref_id().cast_unsigned() as usize);
            write!(writer, "\t{}\t", resolved.unwrap_or("*"))?;
        }
        write!(writer, "{}\t{}\t", self.mate_position() + 1, self.template_length())?;

        if self.sequence_length() == 0 {
            writer.write_all(b"*")?;
        } else {
            writer.write_all(&self.sequence().decode())?;
        }
        writer.write_all(b"\t")?;

        let quals = self.base_qualities();
        if quals.is_empty() || quals[0] == 0xFF {
            writer.write_all(b"*")?;
        } else {
            let ascii: Vec<u8> = quals.iter().map(|&q| q.saturating_add(33)).collect();
            writer.write_all(&ascii)?;
        }

        for entry in self.tags() {
            let (key, value) =
                entry.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            let mut text = String::new();
            value.write_sam_value(&mut text);
            writer.write_all(b"\t")?;
            writer.write_all(&key)?;
            write!(writer, ":{}:{text}", value.sam_type())?;
        }

        Ok(())
    }

    /// The SAM line as a `String` (non-UTF-8 name bytes render lossily).
    ///
    /// # Errors
    ///
    /// `InvalidData` if the tag stream turns undecodable mid-iteration.
    pub fn to_sam_string<R>(&self, refs: &R) -> io::Result<String>
    where
        R: ReferenceNames + ?Sized,
    {
        let mut out = Vec::new();
        self.write_sam(&mut out, refs)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
