//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format used for `.torrent` files and
//! tracker responses.
//!
//! # Data Types
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Examples
//!
//! ```
//! use btmeta::bencode::{decode, encode, Value};
//!
//! let value = decode(b"d3:cow3:moo4:spam4:eggse").unwrap();
//! assert_eq!(value.get(b"cow").and_then(|v| v.as_str()), Some("moo"));
//!
//! let encoded = encode(&value).unwrap();
//! assert_eq!(encoded, b"d3:cow3:moo4:spam4:eggse");
//! ```
//!
//! # Info hash
//!
//! Identifying a torrent requires a SHA-1 digest over the raw encoded
//! bytes of the `info` dictionary exactly as they appeared in the input.
//! The decoder computes it in the same pass that builds the value tree:
//! every byte it reads goes through one cursor, and while the value under
//! a tracked dictionary key is being decoded, that cursor mirrors each
//! byte into a digest accumulator.
//!
//! ```
//! use btmeta::bencode::decode_with_info_hash;
//!
//! let data = b"d4:infod4:name4:testee";
//! let (value, digest) = decode_with_info_hash(data, b"info").unwrap();
//! assert!(digest.is_some());
//! ```
//!
//! # Error Handling
//!
//! Decoding fails with [`BencodeError`] on malformed syntax (bad integer
//! literals, missing separators, non-string dictionary keys), on input
//! that ends mid-value, on numeric overflow, and on nesting deeper than
//! 64 levels.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod digest;
mod encode;
mod error;
mod reader;
mod value;

pub use decode::{decode, decode_with_info_hash, Decoder};
pub use digest::InfoDigest;
pub use encode::{encode, encode_to_writer};
pub use error::BencodeError;
pub use value::Value;

#[cfg(test)]
mod tests;
