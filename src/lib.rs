#![deny(unsafe_code)]

//! In-memory representation and mutation of raw BAM alignment records.
//!
//! One alignment is one contiguous little-endian buffer — the exact wire
//! encoding — exposed as a rich, mutable, typed object: fixed header
//! fields, the read name, a packed CIGAR, a 4-bit packed sequence,
//! per-base qualities, and an auxiliary tag stream. See
//! [`record::BamRecord`] for the entry point.
//!
//! Records wrapped around a reader's decoded block borrow it without
//! copying and clone exactly once on first mutation (`Cow` semantics), so
//! bulk readers can hand out records cheaply.
//!
//! File-level concerns (BGZF, headers, reference tables, indexes) live in
//! their own layers; this crate consumes them through narrow seams: a
//! [`sam::ReferenceNames`] resolver for text rendering, `std::io`
//! reader/writer handles for block-size framed wire I/O, and a
//! [`msgpack::MsgPacker`] capability for MessagePack emission.

pub mod bin;
pub mod builder;
pub mod cigar;
mod endian;
pub mod error;
pub mod fields;
pub mod msgpack;
pub mod record;
pub mod sam;
pub mod sequence;
pub mod tags;

#[cfg(any(test, feature = "test-utils"))]
pub mod testutil;

// Flat re-exports — callers use rawbam::BamRecord etc.
pub use bin::*;
pub use builder::*;
pub use cigar::*;
pub use error::*;
pub use fields::*;
pub use msgpack::*;
pub use record::*;
pub use sam::*;
pub use sequence::*;
pub use tags::*;

#[cfg(any(test, feature = "test-utils"))]
pub use testutil::*;
