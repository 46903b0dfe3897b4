//! btmeta - BitTorrent metadata library
//!
//! Bencode encoding and decoding plus torrent metainfo parsing. The
//! decoder computes the info hash in the same pass that parses the file:
//! while the `info` dictionary's value is being consumed, every raw byte
//! of it is mirrored into a SHA-1 accumulator, so the digest covers the
//! exact encoded form without buffering the document twice.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 bencode encoding/decoding with a streaming digest
//!   side-channel
//! - [`metainfo`] - Torrent metainfo projection and info hash

pub mod bencode;
pub mod metainfo;

pub use bencode::{
    decode, decode_with_info_hash, encode, encode_to_writer, BencodeError, Decoder, InfoDigest,
    Value,
};
pub use metainfo::{File, Info, InfoHash, Metainfo, MetainfoError};
