use super::digest::InfoDigest;
use super::error::BencodeError;
use std::io::Read;

/// Peekable cursor over a byte source.
///
/// Every byte the decoder consumes passes through this cursor, which is
/// the single funnel feeding the digest accumulator: while the watch flag
/// is set, each byte is mirrored into the accumulator at the moment it is
/// read from the source.
///
/// The lookahead is lazy. A byte is pulled from the source only when a
/// production needs to inspect it, and stays buffered until consumed with
/// [`ByteReader::advance`] or [`ByteReader::next_byte`].
pub(crate) struct ByteReader<R> {
    source: R,
    lookahead: Option<u8>,
    watching: bool,
    digest: InfoDigest,
}

impl<R: Read> ByteReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            lookahead: None,
            watching: false,
            digest: InfoDigest::new(),
        }
    }

    /// Fills the one-byte lookahead if empty and returns it without
    /// consuming. `Ok(None)` means the source is exhausted before the next
    /// construct begins.
    pub fn peek(&mut self) -> Result<Option<u8>, BencodeError> {
        if self.lookahead.is_none() {
            self.lookahead = self.fill()?;
        }
        Ok(self.lookahead)
    }

    /// Discards the buffered lookahead byte.
    pub fn advance(&mut self) {
        self.lookahead = None;
    }

    /// Consumes and returns the next byte. Fails with `UnexpectedEof` if
    /// the source is exhausted mid-construct.
    pub fn next_byte(&mut self) -> Result<u8, BencodeError> {
        if let Some(byte) = self.lookahead.take() {
            return Ok(byte);
        }
        self.fill()?.ok_or(BencodeError::UnexpectedEof)
    }

    /// Reads exactly `len` raw bytes.
    pub fn read_exact(&mut self, len: usize) -> Result<Vec<u8>, BencodeError> {
        debug_assert!(self.lookahead.is_none());
        let mut buf = vec![0u8; len];
        self.source.read_exact(&mut buf).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => BencodeError::UnexpectedEof,
            _ => BencodeError::Io(e),
        })?;
        if self.watching {
            self.digest.extend(&buf);
        }
        Ok(buf)
    }

    pub fn watching(&self) -> bool {
        self.watching
    }

    pub fn set_watching(&mut self, on: bool) {
        self.watching = on;
    }

    pub fn digest(&self) -> &InfoDigest {
        &self.digest
    }

    fn fill(&mut self) -> Result<Option<u8>, BencodeError> {
        let mut byte = [0u8; 1];
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    if self.watching {
                        self.digest.push(byte[0]);
                    }
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
