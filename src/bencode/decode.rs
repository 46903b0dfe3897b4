use super::error::BencodeError;
use super::reader::ByteReader;
use super::value::Value;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::Read;

const MAX_DEPTH: usize = 64;

/// Decodes a single bencode value from a byte slice.
///
/// Rejects input with bytes remaining after the value. For decoding a
/// stream of consecutive top-level values, or for computing an info hash
/// while decoding, use [`Decoder`] directly.
///
/// # Examples
///
/// ```
/// use btmeta::bencode::decode;
///
/// let value = decode(b"l4:spam4:eggse").unwrap();
/// let list = value.as_list().unwrap();
/// assert_eq!(list[0].as_str(), Some("spam"));
/// assert_eq!(list[1].as_str(), Some("eggs"));
/// ```
pub fn decode(data: &[u8]) -> Result<Value, BencodeError> {
    let mut decoder = Decoder::new(data);
    let value = decoder.next_value()?.ok_or(BencodeError::UnexpectedEof)?;
    if decoder.has_remaining()? {
        return Err(BencodeError::TrailingData);
    }
    Ok(value)
}

/// Decodes a byte slice while computing a SHA-1 digest over the raw bytes
/// of the value stored under `tracked_key` in the outermost dictionary
/// that contains it.
///
/// The digest covers the value's exact encoded extent, including its own
/// type marker and terminator. Returns `None` for the digest if the key
/// never appeared.
///
/// # Examples
///
/// ```
/// use btmeta::bencode::decode_with_info_hash;
/// use sha1::{Digest, Sha1};
///
/// let (value, digest) = decode_with_info_hash(b"d4:infod4:name4:testee", b"info").unwrap();
/// assert!(value.get(b"info").is_some());
///
/// let expected: [u8; 20] = Sha1::digest(b"d4:name4:teste").into();
/// assert_eq!(digest, Some(expected));
/// ```
pub fn decode_with_info_hash(
    data: &[u8],
    tracked_key: &[u8],
) -> Result<(Value, Option<[u8; 20]>), BencodeError> {
    let mut decoder = Decoder::with_tracked_key(data, tracked_key);
    let value = decoder.next_value()?.ok_or(BencodeError::UnexpectedEof)?;
    if decoder.has_remaining()? {
        return Err(BencodeError::TrailingData);
    }
    let digest = decoder.info_hash();
    Ok((value, digest))
}

/// Streaming bencode decoder over an arbitrary byte source.
///
/// The decoder pulls bytes lazily through a one-byte lookahead, so it
/// consumes exactly one value's worth of input per call and can decode a
/// stream of consecutive top-level values.
///
/// When constructed with [`Decoder::with_tracked_key`], the raw bytes of
/// the value stored under that dictionary key are mirrored into a digest
/// accumulator as they are read. Tracking activates at most once: a
/// nested occurrence of the key inside the tracked value neither
/// re-triggers nor resets it.
///
/// # Examples
///
/// ```
/// use btmeta::bencode::{Decoder, Value};
///
/// let mut decoder = Decoder::new(&b"i1e4:spam"[..]);
/// assert_eq!(decoder.next_value().unwrap(), Some(Value::Integer(1)));
/// assert_eq!(decoder.next_value().unwrap(), Some(Value::string("spam")));
/// assert_eq!(decoder.next_value().unwrap(), None);
/// ```
pub struct Decoder<R> {
    reader: ByteReader<R>,
    tracked_key: Option<Bytes>,
    tracked_seen: bool,
}

impl<R: Read> Decoder<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: ByteReader::new(source),
            tracked_key: None,
            tracked_seen: false,
        }
    }

    pub fn with_tracked_key(source: R, key: &[u8]) -> Self {
        Self {
            reader: ByteReader::new(source),
            tracked_key: Some(Bytes::copy_from_slice(key)),
            tracked_seen: false,
        }
    }

    /// Decodes the next top-level value.
    ///
    /// Returns `Ok(None)` when the source is cleanly exhausted before the
    /// value begins. End of input anywhere inside a value is an
    /// [`BencodeError::UnexpectedEof`] error.
    pub fn next_value(&mut self) -> Result<Option<Value>, BencodeError> {
        if self.reader.peek()?.is_none() {
            return Ok(None);
        }
        self.decode_value(0).map(Some)
    }

    /// Returns `true` if the source has bytes left.
    pub fn has_remaining(&mut self) -> Result<bool, BencodeError> {
        Ok(self.reader.peek()?.is_some())
    }

    /// SHA-1 digest over the raw bytes of the tracked key's value.
    ///
    /// `None` until a value under the tracked key has been fully decoded.
    pub fn info_hash(&self) -> Option<[u8; 20]> {
        if self.tracked_seen {
            Some(self.reader.digest().finalize())
        } else {
            None
        }
    }

    fn decode_value(&mut self, depth: usize) -> Result<Value, BencodeError> {
        if depth > MAX_DEPTH {
            return Err(BencodeError::NestingTooDeep);
        }

        match self.reader.peek()?.ok_or(BencodeError::UnexpectedEof)? {
            b'i' => self.decode_integer(),
            b'l' => self.decode_list(depth),
            b'd' => self.decode_dict(depth),
            b'0'..=b'9' => self.decode_bytes().map(Value::Bytes),
            c => Err(BencodeError::UnexpectedChar(c as char)),
        }
    }

    fn decode_integer(&mut self) -> Result<Value, BencodeError> {
        self.reader.advance(); // 'i'

        let mut c = self.reader.next_byte()?;
        let negative = c == b'-';
        if negative {
            c = self.reader.next_byte()?;
        }

        if !c.is_ascii_digit() {
            return Err(BencodeError::InvalidInteger((c as char).to_string()));
        }

        if c == b'0' {
            if negative {
                return Err(BencodeError::InvalidInteger("negative zero".into()));
            }
            let end = self.reader.next_byte()?;
            if end != b'e' {
                return Err(BencodeError::InvalidInteger("leading zero".into()));
            }
            return Ok(Value::Integer(0));
        }

        // Accumulate toward i64::MIN when negative so the full signed
        // range parses without overflowing on the magnitude.
        let mut value: i64 = 0;
        loop {
            let digit = i64::from(c - b'0');
            value = if negative {
                value.checked_mul(10).and_then(|v| v.checked_sub(digit))
            } else {
                value.checked_mul(10).and_then(|v| v.checked_add(digit))
            }
            .ok_or(BencodeError::IntegerOverflow)?;

            c = self.reader.next_byte()?;
            if !c.is_ascii_digit() {
                break;
            }
        }

        if c != b'e' {
            return Err(BencodeError::InvalidInteger((c as char).to_string()));
        }

        Ok(Value::Integer(value))
    }

    fn decode_bytes(&mut self) -> Result<Bytes, BencodeError> {
        let mut c = self.reader.next_byte()?;

        // A length may not carry leading zeros, so a first digit of zero
        // must be the whole length.
        if c == b'0' {
            if self.reader.next_byte()? != b':' {
                return Err(BencodeError::InvalidLength);
            }
            return Ok(Bytes::new());
        }

        let mut len: usize = usize::from(c - b'0');
        loop {
            c = self.reader.next_byte()?;
            if !c.is_ascii_digit() {
                break;
            }
            len = len
                .checked_mul(10)
                .and_then(|l| l.checked_add(usize::from(c - b'0')))
                .ok_or(BencodeError::IntegerOverflow)?;
        }

        if c != b':' {
            return Err(BencodeError::InvalidLength);
        }

        Ok(Bytes::from(self.reader.read_exact(len)?))
    }

    fn decode_list(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.reader.advance(); // 'l'

        let mut items = Vec::new();
        loop {
            match self.reader.peek()?.ok_or(BencodeError::UnexpectedEof)? {
                b'e' => {
                    self.reader.advance();
                    return Ok(Value::List(items));
                }
                _ => items.push(self.decode_value(depth + 1)?),
            }
        }
    }

    fn decode_dict(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.reader.advance(); // 'd'

        let mut entries = BTreeMap::new();
        loop {
            match self.reader.peek()?.ok_or(BencodeError::UnexpectedEof)? {
                b'e' => {
                    self.reader.advance();
                    return Ok(Value::Dict(entries));
                }
                b'0'..=b'9' => {}
                _ => return Err(BencodeError::NonStringKey),
            }

            let key = self.decode_bytes()?;

            // Activate digest tracking for this key's value, unless
            // already inside a tracked value.
            let track = matches!(&self.tracked_key,
                Some(tracked) if !self.reader.watching() && key == *tracked);
            if track {
                self.reader.set_watching(true);
            }

            let value = self.decode_value(depth + 1)?;

            if track {
                self.reader.set_watching(false);
                self.tracked_seen = true;
            }

            // Duplicate keys: last write wins.
            entries.insert(key, value);
        }
    }
}
