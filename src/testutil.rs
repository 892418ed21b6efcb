//! Raw-byte helpers for building test records and tag streams.

/// Construct a raw BAM record buffer for testing.
///
/// Sequence and quality bytes are zero-filled; tests that care about them
/// write into the offsets returned by the `fields` helpers.
///
/// # Panics
///
/// Panics if `name` exceeds 254 bytes, `cigar_ops` exceeds `u16::MAX`
/// operations, or `seq_len` exceeds `u32::MAX`.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn make_bam_bytes(
    tid: i32,
    pos: i32,
    flag: u16,
    name: &[u8],
    cigar_ops: &[u32],
    seq_len: usize,
    mate_tid: i32,
    mate_pos: i32,
    aux_data: &[u8],
) -> Vec<u8> {
    let l_read_name = u8::try_from(name.len() + 1).unwrap(); // +1 for NUL
    let n_cigar_op = u16::try_from(cigar_ops.len()).unwrap();
    let seq_bytes = seq_len.div_ceil(2);

    let mut buf = Vec::with_capacity(
        32 + l_read_name as usize + cigar_ops.len() * 4 + seq_bytes + seq_len + aux_data.len(),
    );
    buf.extend_from_slice(&tid.to_le_bytes());
    buf.extend_from_slice(&pos.to_le_bytes());
    buf.push(l_read_name);
    buf.push(0); // mapq
    buf.extend_from_slice(&0u16.to_le_bytes()); // bin
    buf.extend_from_slice(&n_cigar_op.to_le_bytes());
    buf.extend_from_slice(&flag.to_le_bytes());
    buf.extend_from_slice(&u32::try_from(seq_len).unwrap().to_le_bytes());
    buf.extend_from_slice(&mate_tid.to_le_bytes());
    buf.extend_from_slice(&mate_pos.to_le_bytes());
    buf.extend_from_slice(&0i32.to_le_bytes()); // tlen

    buf.extend_from_slice(name);
    buf.push(0);
    for &op in cigar_ops {
        buf.extend_from_slice(&op.to_le_bytes());
    }
    buf.resize(buf.len() + seq_bytes + seq_len, 0);
    buf.extend_from_slice(aux_data);
    buf
}

/// Encode a single CIGAR op word. `op_type`: M=0, I=1, D=2, N=3, S=4, H=5,
/// P=6, `=`=7, X=8.
///
/// # Panics
///
/// Panics if `len` exceeds `u32::MAX`.
#[must_use]
pub fn encode_op(op_type: u32, len: usize) -> u32 {
    (u32::try_from(len).unwrap() << 4) | op_type
}

/// Raw bytes of an `i`-typed (i32) tag entry.
#[must_use]
pub fn make_int_tag(tag: [u8; 2], value: i32) -> Vec<u8> {
    let mut out = vec![tag[0], tag[1], b'i'];
    out.extend_from_slice(&value.to_le_bytes());
    out
}

/// Raw bytes of a `Z`-typed (NUL-terminated text) tag entry.
#[must_use]
pub fn make_string_tag(tag: [u8; 2], value: &[u8]) -> Vec<u8> {
    let mut out = vec![tag[0], tag[1], b'Z'];
    out.extend_from_slice(value);
    out.push(0);
    out
}

/// Raw bytes of a `B:i` (i32 array) tag entry.
///
/// # Panics
///
/// Panics if `values` exceeds `u32::MAX` elements.
#[must_use]
pub fn make_b_int_array_tag(tag: [u8; 2], values: &[i32]) -> Vec<u8> {
    let mut out = vec![tag[0], tag[1], b'B', b'i'];
    out.extend_from_slice(&u32::try_from(values.len()).unwrap().to_le_bytes());
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}
