use super::error::MetainfoError;
use super::info_hash::InfoHash;
use crate::bencode::{encode, Decoder, Value};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;

const INFO_KEY: &[u8] = b"info";

/// A parsed torrent file.
///
/// Contains all metadata from a `.torrent` file, including file
/// information, piece hashes, and tracker URLs.
///
/// # Examples
///
/// ```no_run
/// use btmeta::metainfo::Metainfo;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = std::fs::read("example.torrent")?;
/// let metainfo = Metainfo::from_bytes(&data)?;
///
/// println!("Torrent: {}", metainfo.info.name);
/// println!("Info hash: {}", metainfo.info_hash);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Metainfo {
    /// The info dictionary containing file and piece information.
    pub info: Info,
    /// The unique identifier for this torrent, the SHA-1 hash of the raw
    /// `info` dictionary bytes.
    pub info_hash: InfoHash,
    /// Primary tracker URL.
    pub announce: Option<String>,
    /// Multi-tier tracker list ([BEP-12](http://bittorrent.org/beps/bep_0012.html)).
    pub announce_list: Vec<Vec<String>>,
    /// Unix timestamp when the torrent was created.
    pub creation_date: Option<i64>,
    /// Optional comment about the torrent.
    pub comment: Option<String>,
    /// Name/version of the program that created the torrent.
    pub created_by: Option<String>,
}

/// The info dictionary from a torrent file.
///
/// The SHA-1 hash of this dictionary's encoded form is the info hash.
#[derive(Debug, Clone)]
pub struct Info {
    /// Suggested name for the file or directory.
    pub name: String,
    /// Number of bytes per piece.
    pub piece_length: u64,
    /// SHA1 hash of each piece (20 bytes each).
    pub pieces: Vec<[u8; 20]>,
    /// List of files in the torrent.
    pub files: Vec<File>,
    /// Total size of all files combined.
    pub total_length: u64,
    /// If true, clients should only use trackers in the metainfo.
    pub private: bool,
    /// Whether the torrent used the multi-file layout.
    pub multi_file: bool,
}

/// A file within a torrent.
///
/// For single-file torrents, there is one file with the torrent name.
/// For multi-file torrents, paths are rooted at the torrent's directory
/// name.
#[derive(Debug, Clone)]
pub struct File {
    /// Path to the file (relative to torrent root).
    pub path: PathBuf,
    /// Size of the file in bytes.
    pub length: u64,
    /// Byte offset within the torrent's piece data.
    pub offset: u64,
}

impl Metainfo {
    /// Parses a torrent file from raw bytes.
    ///
    /// The info hash is taken from the decoder's digest side-channel, so
    /// it covers the `info` dictionary's bytes exactly as they appear in
    /// `data`, whether or not they are in canonical key order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data is not valid bencode
    /// - Required fields are missing (info, name, pieces, etc.)
    /// - The pieces field length is not a multiple of 20
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetainfoError> {
        Self::from_reader(data)
    }

    /// Parses a torrent file from an arbitrary byte source.
    pub fn from_reader<R: Read>(source: R) -> Result<Self, MetainfoError> {
        let mut decoder = Decoder::with_tracked_key(source, INFO_KEY);
        let value = decoder
            .next_value()?
            .ok_or(MetainfoError::MissingField("root"))?;
        let dict = value.as_dict().ok_or(MetainfoError::InvalidField("root"))?;

        let info_value = dict
            .get(INFO_KEY)
            .ok_or(MetainfoError::MissingField("info"))?;

        let digest = decoder
            .info_hash()
            .ok_or(MetainfoError::MissingField("info"))?;
        let info_hash = InfoHash::new(digest);

        let info = parse_info(info_value)?;

        let announce = dict
            .get(b"announce".as_slice())
            .and_then(|v| v.as_str())
            .map(String::from);

        let announce_list = dict
            .get(b"announce-list".as_slice())
            .and_then(|v| v.as_list())
            .map(|tiers| {
                tiers
                    .iter()
                    .filter_map(|tier| {
                        tier.as_list().map(|urls| {
                            urls.iter()
                                .filter_map(|u| u.as_str().map(String::from))
                                .collect()
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let creation_date = dict
            .get(b"creation date".as_slice())
            .and_then(|v| v.as_integer());

        let comment = dict
            .get(b"comment".as_slice())
            .and_then(|v| v.as_str())
            .map(String::from);

        let created_by = dict
            .get(b"created by".as_slice())
            .and_then(|v| v.as_str())
            .map(String::from);

        tracing::debug!(
            "parsed torrent '{}': {} file(s), {} pieces",
            info.name,
            info.files.len(),
            info.pieces.len()
        );

        Ok(Self {
            info,
            info_hash,
            announce,
            announce_list,
            creation_date,
            comment,
            created_by,
        })
    }

    /// Returns all tracker URLs from both `announce` and `announce-list`.
    ///
    /// The primary tracker comes first, followed by trackers from the
    /// tier list. Duplicates are removed.
    pub fn trackers(&self) -> Vec<String> {
        let mut trackers = Vec::new();

        if let Some(ref announce) = self.announce {
            trackers.push(announce.clone());
        }

        for tier in &self.announce_list {
            for tracker in tier {
                if !trackers.contains(tracker) {
                    trackers.push(tracker.clone());
                }
            }
        }

        trackers
    }

    /// Rebuilds the torrent dictionary as a bencode value.
    ///
    /// Optional fields are emitted only when present. Keys come out in
    /// canonical order, so the result is not byte-identical to a source
    /// file that used a different ordering; the info hash of the result
    /// may therefore differ from [`Metainfo::info_hash`].
    pub fn to_value(&self) -> Value {
        let mut root = BTreeMap::new();

        if let Some(ref announce) = self.announce {
            root.insert(Bytes::from_static(b"announce"), Value::string(announce));
        }

        if !self.announce_list.is_empty() {
            let tiers = self
                .announce_list
                .iter()
                .map(|tier| Value::List(tier.iter().map(|url| Value::string(url)).collect()))
                .collect();
            root.insert(Bytes::from_static(b"announce-list"), Value::List(tiers));
        }

        if let Some(date) = self.creation_date {
            root.insert(Bytes::from_static(b"creation date"), Value::Integer(date));
        }

        if let Some(ref comment) = self.comment {
            root.insert(Bytes::from_static(b"comment"), Value::string(comment));
        }

        if let Some(ref created_by) = self.created_by {
            root.insert(Bytes::from_static(b"created by"), Value::string(created_by));
        }

        root.insert(Bytes::copy_from_slice(INFO_KEY), self.info.to_value());

        Value::Dict(root)
    }

    /// Encodes the torrent dictionary back to bencode bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MetainfoError> {
        Ok(encode(&self.to_value())?)
    }
}

impl Info {
    /// Number of pieces in the torrent.
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Rebuilds the info dictionary as a bencode value.
    pub fn to_value(&self) -> Value {
        let mut dict = BTreeMap::new();

        dict.insert(Bytes::from_static(b"name"), Value::string(&self.name));
        dict.insert(
            Bytes::from_static(b"piece length"),
            Value::Integer(self.piece_length as i64),
        );

        let mut blob = Vec::with_capacity(self.pieces.len() * 20);
        for piece in &self.pieces {
            blob.extend_from_slice(piece);
        }
        dict.insert(Bytes::from_static(b"pieces"), Value::Bytes(Bytes::from(blob)));

        if self.private {
            dict.insert(Bytes::from_static(b"private"), Value::Integer(1));
        }

        if self.multi_file {
            let files = self
                .files
                .iter()
                .map(|file| {
                    let mut entry = BTreeMap::new();
                    entry.insert(
                        Bytes::from_static(b"length"),
                        Value::Integer(file.length as i64),
                    );
                    let relative = file.path.strip_prefix(&self.name).unwrap_or(&file.path);
                    let components = relative
                        .components()
                        .map(|c| {
                            let part = c.as_os_str().to_string_lossy();
                            Value::string(&part)
                        })
                        .collect();
                    entry.insert(Bytes::from_static(b"path"), Value::List(components));
                    Value::Dict(entry)
                })
                .collect();
            dict.insert(Bytes::from_static(b"files"), Value::List(files));
        } else {
            dict.insert(
                Bytes::from_static(b"length"),
                Value::Integer(self.total_length as i64),
            );
        }

        Value::Dict(dict)
    }
}

fn parse_info(value: &Value) -> Result<Info, MetainfoError> {
    let dict = value.as_dict().ok_or(MetainfoError::InvalidField("info"))?;

    let name = dict
        .get(b"name".as_slice())
        .and_then(|v| v.as_str())
        .ok_or(MetainfoError::MissingField("name"))?
        .to_string();

    let piece_length = dict
        .get(b"piece length".as_slice())
        .and_then(|v| v.as_integer())
        .ok_or(MetainfoError::MissingField("piece length"))? as u64;

    let pieces_bytes = dict
        .get(b"pieces".as_slice())
        .and_then(|v| v.as_bytes())
        .ok_or(MetainfoError::MissingField("pieces"))?;

    if pieces_bytes.len() % 20 != 0 {
        return Err(MetainfoError::InvalidField("pieces"));
    }

    let pieces: Vec<[u8; 20]> = pieces_bytes
        .chunks_exact(20)
        .map(|chunk| {
            let mut arr = [0u8; 20];
            arr.copy_from_slice(chunk);
            arr
        })
        .collect();

    let private = dict
        .get(b"private".as_slice())
        .and_then(|v| v.as_integer())
        .map(|v| v == 1)
        .unwrap_or(false);

    let multi_file = dict.get(b"files".as_slice()).is_some();

    let (files, total_length) = if let Some(length) =
        dict.get(b"length".as_slice()).and_then(|v| v.as_integer())
    {
        let length = length as u64;
        let file = File {
            path: PathBuf::from(&name),
            length,
            offset: 0,
        };
        (vec![file], length)
    } else if let Some(files_list) = dict.get(b"files".as_slice()).and_then(|v| v.as_list()) {
        let mut files = Vec::new();
        let mut offset = 0u64;

        for file_value in files_list {
            let file_dict = file_value
                .as_dict()
                .ok_or(MetainfoError::InvalidField("files"))?;

            let length = file_dict
                .get(b"length".as_slice())
                .and_then(|v| v.as_integer())
                .ok_or(MetainfoError::MissingField("file length"))? as u64;

            let path_list = file_dict
                .get(b"path".as_slice())
                .and_then(|v| v.as_list())
                .ok_or(MetainfoError::MissingField("file path"))?;

            let path: PathBuf = std::iter::once(name.clone())
                .chain(
                    path_list
                        .iter()
                        .filter_map(|p| p.as_str().map(String::from)),
                )
                .collect();

            files.push(File {
                path,
                length,
                offset,
            });

            offset += length;
        }

        let total = offset;
        (files, total)
    } else {
        return Err(MetainfoError::MissingField("length or files"));
    };

    Ok(Info {
        name,
        piece_length,
        pieces,
        files,
        total_length,
        private,
        multi_file,
    })
}
