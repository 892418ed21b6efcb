//! MessagePack rendering through a caller-supplied packer.
//!
//! Framing and encoding belong to the consumer; the record only needs the
//! primitive pack operations of [`MsgPacker`]. Emission is a 13-element
//! array: `[name, flag, ref_id, position+1, mapq, [cigar lengths],
//! [cigar op chars], mate_ref_id, mate_position+1, template_length,
//! sequence text, quality bytes, {tag: value}]`, with the tag map in
//! stream order.

use std::io;

use crate::record::BamRecord;
use crate::tags::TagValue;

/// Primitive pack operations consumed during record emission.
pub trait MsgPacker {
    /// Start an array of `len` elements.
    fn begin_array(&mut self, len: usize) -> io::Result<()>;
    /// Start a map of `len` key/value pairs.
    fn begin_map(&mut self, len: usize) -> io::Result<()>;
    /// Pack a signed integer.
    fn pack_int(&mut self, value: i64) -> io::Result<()>;
    /// Pack an unsigned integer.
    fn pack_uint(&mut self, value: u64) -> io::Result<()>;
    /// Pack a 32-bit float.
    fn pack_float(&mut self, value: f32) -> io::Result<()>;
    /// Pack text bytes.
    fn pack_str(&mut self, text: &[u8]) -> io::Result<()>;
    /// Pack opaque binary bytes.
    fn pack_bin(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl BamRecord<'_> {
    /// Emit the record through `packer` as the 13-element array.
    ///
    /// # Errors
    ///
    /// Errors from the packer; `InvalidData` if the tag stream turns
    /// undecodable mid-iteration.
    pub fn pack_msgpack<P: MsgPacker>(&self, packer: &mut P) -> io::Result<()> {
        packer.begin_array(13)?;
        packer.pack_str(self.name())?;
        packer.pack_uint(self.flags().into())?;
        packer.pack_int(self.ref_id().into())?;
        packer.pack_int(i64::from(self.position()) + 1)?;
        packer.pack_uint(self.mapq().into())?;

        let n_ops = self.cigar().len();
        packer.begin_array(n_ops)?;
        for op in self.cigar() {
            packer.pack_uint(op.len().into())?;
        }
        packer.begin_array(n_ops)?;
        for op in self.cigar() {
            packer.pack_str(&[op.op_char() as u8])?;
        }

        packer.pack_int(self.mate_ref_id().into())?;
        packer.pack_int(i64::from(self.mate_position()) + 1)?;
        packer.pack_int(self.template_length().into())?;
        packer.pack_str(&self.sequence().decode())?;
        packer.pack_bin(self.base_qualities())?;

        packer.begin_map(self.tag_count())?;
        for entry in self.tags() {
            let (key, value) = entry.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            packer.pack_str(&key)?;
            pack_value(packer, &value)?;
        }
        Ok(())
    }
}

fn pack_value<P: MsgPacker>(packer: &mut P, value: &TagValue) -> io::Result<()> {
    fn pack_int_array<P: MsgPacker, T: Copy + Into<i64>>(
        packer: &mut P,
        values: &[T],
    ) -> io::Result<()> {
        packer.begin_array(values.len())?;
        for &v in values {
            packer.pack_int(v.into())?;
        }
        Ok(())
    }

    match value {
        TagValue::Char(c) => packer.pack_str(&[*c]),
        TagValue::Int8(v) => packer.pack_int((*v).into()),
        TagValue::UInt8(v) => packer.pack_uint((*v).into()),
        TagValue::Int16(v) => packer.pack_int((*v).into()),
        TagValue::UInt16(v) => packer.pack_uint((*v).into()),
        TagValue::Int32(v) => packer.pack_int((*v).into()),
        TagValue::UInt32(v) => packer.pack_uint((*v).into()),
        TagValue::Float(v) => packer.pack_float(*v),
        TagValue::String(s) | TagValue::Hex(s) => packer.pack_str(s),
        TagValue::Int8Array(v) => pack_int_array(packer, v),
        TagValue::Int16Array(v) => pack_int_array(packer, v),
        TagValue::Int32Array(v) => pack_int_array(packer, v),
        TagValue::UInt8Array(v) => {
            packer.begin_array(v.len())?;
            for &x in v {
                packer.pack_uint(x.into())?;
            }
            Ok(())
        }
        TagValue::UInt16Array(v) => {
            packer.begin_array(v.len())?;
            for &x in v {
                packer.pack_uint(x.into())?;
            }
            Ok(())
        }
        TagValue::UInt32Array(v) => {
            packer.begin_array(v.len())?;
            for &x in v {
                packer.pack_uint(x.into())?;
            }
            Ok(())
        }
        TagValue::FloatArray(v) => {
            packer.begin_array(v.len())?;
            for &x in v {
                packer.pack_float(x)?;
            }
            Ok(())
        }
    }
}
