use super::error::BencodeError;
use super::value::Value;
use std::io::Write;

/// Encodes a bencode value to a byte vector.
///
/// Dictionary keys are emitted in ascending lexicographic byte order, the
/// canonical bencode form. The `BTreeMap` backing [`Value::Dict`] iterates
/// in exactly that order, so no sorting happens here.
///
/// # Errors
///
/// Returns an error if writing to the internal buffer fails.
///
/// # Examples
///
/// ```
/// use btmeta::bencode::{encode, Value};
///
/// assert_eq!(encode(&Value::Integer(-3)).unwrap(), b"i-3e");
/// assert_eq!(encode(&Value::string("spam")).unwrap(), b"4:spam");
///
/// let list = Value::List(vec![Value::string("spam"), Value::string("eggs")]);
/// assert_eq!(encode(&list).unwrap(), b"l4:spam4:eggse");
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, BencodeError> {
    let mut buf = Vec::new();
    encode_to_writer(value, &mut buf)?;
    Ok(buf)
}

/// Encodes a bencode value into an arbitrary byte sink.
///
/// The only failure mode is a sink write error, propagated unchanged.
pub fn encode_to_writer<W: Write>(value: &Value, writer: &mut W) -> Result<(), BencodeError> {
    match value {
        Value::Integer(n) => {
            write!(writer, "i{}e", n)?;
        }
        Value::Bytes(b) => {
            write!(writer, "{}:", b.len())?;
            writer.write_all(b)?;
        }
        Value::List(items) => {
            writer.write_all(b"l")?;
            for item in items {
                encode_to_writer(item, writer)?;
            }
            writer.write_all(b"e")?;
        }
        Value::Dict(entries) => {
            writer.write_all(b"d")?;
            for (key, val) in entries {
                write!(writer, "{}:", key.len())?;
                writer.write_all(key)?;
                encode_to_writer(val, writer)?;
            }
            writer.write_all(b"e")?;
        }
    }
    Ok(())
}
