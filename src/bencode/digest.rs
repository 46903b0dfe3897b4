use sha1::{Digest, Sha1};

const INITIAL_CAPACITY: usize = 1024;

/// Accumulates raw bytes and produces a SHA-1 digest over them.
///
/// The decoder mirrors every byte of a tracked substructure into one of
/// these as the byte is consumed, so the digest covers the exact encoded
/// form without a second pass over the input.
///
/// Appends never fail; the backing storage grows ahead of the write so a
/// single large append reallocates at most once. [`InfoDigest::finalize`]
/// hashes the bytes appended so far, in append order; calling it again
/// after further appends digests the new larger range.
///
/// # Examples
///
/// ```
/// use btmeta::bencode::InfoDigest;
///
/// let mut digest = InfoDigest::new();
/// digest.extend(b"d4:name4:teste");
/// assert_eq!(digest.len(), 14);
/// let hash: [u8; 20] = digest.finalize();
/// # let _ = hash;
/// ```
#[derive(Debug)]
pub struct InfoDigest {
    buf: Box<[u8]>,
    len: usize,
}

impl InfoDigest {
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; INITIAL_CAPACITY].into_boxed_slice(),
            len: 0,
        }
    }

    /// Appends a single byte.
    pub fn push(&mut self, byte: u8) {
        if self.len == self.buf.len() {
            self.grow(1);
        }
        self.buf[self.len] = byte;
        self.len += 1;
    }

    /// Appends a slice of bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        if self.len + bytes.len() > self.buf.len() {
            self.grow(bytes.len());
        }
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }

    /// Number of bytes appended so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// SHA-1 digest over the bytes appended so far, in append order.
    pub fn finalize(&self) -> [u8; 20] {
        let mut hasher = Sha1::new();
        hasher.update(&self.buf[..self.len]);
        hasher.finalize().into()
    }

    // Doubles the capacity plus the size of the pending write, so the
    // write that triggered the growth always fits.
    fn grow(&mut self, pending: usize) {
        let mut next = vec![0u8; self.buf.len() * 2 + pending].into_boxed_slice();
        next[..self.len].copy_from_slice(&self.buf[..self.len]);
        self.buf = next;
    }
}

impl Default for InfoDigest {
    fn default() -> Self {
        Self::new()
    }
}
