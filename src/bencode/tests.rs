use std::collections::BTreeMap;
use std::io::Cursor;

use bytes::Bytes;
use sha1::{Digest, Sha1};

use super::*;

#[test]
fn test_decode_integer() {
    assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
    assert_eq!(decode(b"i-42e").unwrap(), Value::Integer(-42));
    assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
}

#[test]
fn test_decode_integer_extremes() {
    assert_eq!(
        decode(b"i9223372036854775807e").unwrap(),
        Value::Integer(i64::MAX)
    );
    assert_eq!(
        decode(b"i-9223372036854775808e").unwrap(),
        Value::Integer(i64::MIN)
    );
}

#[test]
fn test_decode_integer_invalid() {
    assert!(matches!(
        decode(b"i-0e"),
        Err(BencodeError::InvalidInteger(_))
    ));
    assert!(matches!(
        decode(b"i03e"),
        Err(BencodeError::InvalidInteger(_))
    ));
    assert!(matches!(decode(b"ie"), Err(BencodeError::InvalidInteger(_))));
    assert!(matches!(
        decode(b"i e"),
        Err(BencodeError::InvalidInteger(_))
    ));
    assert!(matches!(
        decode(b"i42"),
        Err(BencodeError::UnexpectedEof)
    ));
}

#[test]
fn test_decode_integer_overflow() {
    assert!(matches!(
        decode(b"i9223372036854775808e"),
        Err(BencodeError::IntegerOverflow)
    ));
    assert!(matches!(
        decode(b"i-9223372036854775809e"),
        Err(BencodeError::IntegerOverflow)
    ));
}

#[test]
fn test_decode_bytes() {
    assert_eq!(
        decode(b"4:spam").unwrap(),
        Value::Bytes(Bytes::from_static(b"spam"))
    );
    assert_eq!(decode(b"0:").unwrap(), Value::Bytes(Bytes::new()));
}

#[test]
fn test_decode_bytes_invalid() {
    // Lengths may not carry leading zeros.
    assert!(matches!(
        decode(b"0123:abc"),
        Err(BencodeError::InvalidLength)
    ));
    assert!(matches!(decode(b"4spam"), Err(BencodeError::InvalidLength)));
    assert!(matches!(decode(b"4:spa"), Err(BencodeError::UnexpectedEof)));
}

#[test]
fn test_decode_length_overflow() {
    let mut data = b"99999999999999999999999".to_vec();
    data.push(b':');
    assert!(matches!(
        decode(&data),
        Err(BencodeError::IntegerOverflow)
    ));
}

#[test]
fn test_decode_list() {
    let result = decode(b"l4:spam4:eggse").unwrap();
    let list = result.as_list().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].as_str(), Some("spam"));
    assert_eq!(list[1].as_str(), Some("eggs"));
}

#[test]
fn test_decode_dict() {
    let result = decode(b"d3:cow3:moo4:spam4:eggse").unwrap();
    let dict = result.as_dict().unwrap();
    assert_eq!(dict.len(), 2);
    assert_eq!(result.get(b"cow").and_then(|v| v.as_str()), Some("moo"));
    assert_eq!(result.get(b"spam").and_then(|v| v.as_str()), Some("eggs"));
}

#[test]
fn test_decode_empty_containers() {
    assert_eq!(decode(b"le").unwrap(), Value::List(vec![]));
    assert_eq!(decode(b"de").unwrap(), Value::Dict(BTreeMap::new()));
}

#[test]
fn test_decode_unterminated() {
    assert!(matches!(
        decode(b"l4:spam"),
        Err(BencodeError::UnexpectedEof)
    ));
    assert!(matches!(
        decode(b"d3:cow3:moo"),
        Err(BencodeError::UnexpectedEof)
    ));
}

#[test]
fn test_decode_non_string_key() {
    assert!(matches!(
        decode(b"di1ei2ee"),
        Err(BencodeError::NonStringKey)
    ));
    assert!(matches!(
        decode(b"dle4:spame"),
        Err(BencodeError::NonStringKey)
    ));
}

#[test]
fn test_decode_unknown_marker() {
    assert!(matches!(
        decode(b"x"),
        Err(BencodeError::UnexpectedChar('x'))
    ));
}

#[test]
fn test_decode_trailing_data() {
    assert!(matches!(
        decode(b"i42eextra"),
        Err(BencodeError::TrailingData)
    ));
}

#[test]
fn test_decode_duplicate_keys_last_wins() {
    let result = decode(b"d1:ai1e1:ai2ee").unwrap();
    assert_eq!(result.get(b"a"), Some(&Value::Integer(2)));
    assert_eq!(result.as_dict().unwrap().len(), 1);
}

#[test]
fn test_decode_nesting_too_deep() {
    let data = b"l".repeat(70);
    assert!(matches!(
        decode(&data),
        Err(BencodeError::NestingTooDeep)
    ));
}

#[test]
fn test_decode_stream_of_values() {
    let mut decoder = Decoder::new(Cursor::new(b"i1e4:spamle".to_vec()));
    assert_eq!(decoder.next_value().unwrap(), Some(Value::Integer(1)));
    assert_eq!(decoder.next_value().unwrap(), Some(Value::string("spam")));
    assert_eq!(decoder.next_value().unwrap(), Some(Value::List(vec![])));
    assert_eq!(decoder.next_value().unwrap(), None);
}

#[test]
fn test_decode_empty_input() {
    let mut decoder = Decoder::new(&b""[..]);
    assert_eq!(decoder.next_value().unwrap(), None);
}

#[test]
fn test_encode_integer() {
    assert_eq!(encode(&Value::Integer(42)).unwrap(), b"i42e");
    assert_eq!(encode(&Value::Integer(-42)).unwrap(), b"i-42e");
    assert_eq!(encode(&Value::Integer(0)).unwrap(), b"i0e");
}

#[test]
fn test_encode_bytes() {
    assert_eq!(
        encode(&Value::Bytes(Bytes::from_static(b"spam"))).unwrap(),
        b"4:spam"
    );
    assert_eq!(encode(&Value::Bytes(Bytes::new())).unwrap(), b"0:");
}

#[test]
fn test_encode_list() {
    let list = Value::List(vec![Value::string("spam"), Value::Integer(42)]);
    assert_eq!(encode(&list).unwrap(), b"l4:spami42ee");
}

#[test]
fn test_encode_dict_canonical_key_order() {
    // Insertion order does not matter; keys come out sorted bytewise.
    let mut dict = BTreeMap::new();
    dict.insert(Bytes::from_static(b"spam"), Value::string("eggs"));
    dict.insert(Bytes::from_static(b"cow"), Value::string("moo"));
    assert_eq!(
        encode(&Value::Dict(dict)).unwrap(),
        b"d3:cow3:moo4:spam4:eggse"
    );
}

#[test]
fn test_encode_to_writer() {
    let mut sink = Vec::new();
    encode_to_writer(&Value::string("spam"), &mut sink).unwrap();
    assert_eq!(sink, b"4:spam");
}

#[test]
fn test_roundtrip() {
    let original: &[u8] =
        b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee";
    let decoded = decode(original).unwrap();
    let encoded = encode(&decoded).unwrap();
    assert_eq!(encoded, original);
}

#[test]
fn test_roundtrip_deeply_nested() {
    let mut inner = BTreeMap::new();
    inner.insert(
        Bytes::from_static(b"deep"),
        Value::List(vec![Value::List(vec![Value::List(vec![
            Value::Integer(-7),
            Value::string("leaf"),
        ])])]),
    );
    let mut outer = BTreeMap::new();
    outer.insert(Bytes::from_static(b"a"), Value::Dict(inner));
    outer.insert(Bytes::from_static(b"b"), Value::Integer(0));
    let value = Value::List(vec![Value::Dict(outer), Value::string("tail")]);

    let encoded = encode(&value).unwrap();
    assert_eq!(decode(&encoded).unwrap(), value);
}

#[test]
fn test_digest_tracking() {
    let (value, digest) = decode_with_info_hash(b"d4:infod4:name4:testee", b"info").unwrap();
    assert!(value.get(b"info").is_some());

    let expected: [u8; 20] = Sha1::digest(b"d4:name4:teste").into();
    assert_eq!(digest, Some(expected));
}

#[test]
fn test_digest_independent_of_surrounding_keys() {
    let (_, bare) = decode_with_info_hash(b"d4:infod4:name4:testee", b"info").unwrap();
    let (_, surrounded) =
        decode_with_info_hash(b"d1:a1:b4:infod4:name4:teste1:z1:ze", b"info").unwrap();
    assert_eq!(bare, surrounded);
    assert!(bare.is_some());
}

#[test]
fn test_digest_covers_scalar_values() {
    let (_, digest) = decode_with_info_hash(b"d4:infoi42ee", b"info").unwrap();
    let expected: [u8; 20] = Sha1::digest(b"i42e").into();
    assert_eq!(digest, Some(expected));
}

#[test]
fn test_digest_not_reentrant() {
    // A nested occurrence of the tracked key must not reset tracking.
    let (_, digest) = decode_with_info_hash(b"d4:infod4:infoi1eee", b"info").unwrap();
    let expected: [u8; 20] = Sha1::digest(b"d4:infoi1ee").into();
    assert_eq!(digest, Some(expected));
}

#[test]
fn test_digest_absent_key() {
    let (_, digest) = decode_with_info_hash(b"d3:cow3:mooe", b"info").unwrap();
    assert_eq!(digest, None);
}

#[test]
fn test_digest_over_reader_source() {
    let source = Cursor::new(b"d4:infod4:name4:testee".to_vec());
    let mut decoder = Decoder::with_tracked_key(source, b"info");
    let value = decoder.next_value().unwrap().unwrap();
    assert!(value.get(b"info").is_some());

    let expected: [u8; 20] = Sha1::digest(b"d4:name4:teste").into();
    assert_eq!(decoder.info_hash(), Some(expected));
}

#[test]
fn test_info_digest_growth() {
    let mut reference = Vec::new();
    let mut digest = InfoDigest::new();

    // Single bytes past the initial capacity, then chunks of assorted
    // sizes, must neither lose nor reorder anything.
    for i in 0..3000usize {
        let byte = (i % 256) as u8;
        digest.push(byte);
        reference.push(byte);
    }
    let big = vec![0xAB; 8192];
    digest.extend(&big);
    reference.extend_from_slice(&big);
    for chunk in [1usize, 7, 63, 1024] {
        let data = vec![chunk as u8; chunk];
        digest.extend(&data);
        reference.extend_from_slice(&data);
    }

    assert_eq!(digest.len(), reference.len());
    let expected: [u8; 20] = Sha1::digest(&reference).into();
    assert_eq!(digest.finalize(), expected);
}

#[test]
fn test_info_digest_empty() {
    let digest = InfoDigest::new();
    assert!(digest.is_empty());
    let expected: [u8; 20] = Sha1::digest(b"").into();
    assert_eq!(digest.finalize(), expected);
}

#[test]
fn test_value_accessors() {
    let value = Value::Integer(42);
    assert_eq!(value.as_integer(), Some(42));
    assert!(value.as_bytes().is_none());

    let value = Value::string("test");
    assert_eq!(value.as_str(), Some("test"));
    assert!(value.as_integer().is_none());

    let value = Value::Bytes(Bytes::from_static(&[0xFF, 0xFE]));
    assert_eq!(value.as_str(), None);

    let value = Value::List(vec![]);
    assert!(value.as_list().is_some());
    assert!(value.as_dict().is_none());
}

#[test]
fn test_value_from_impls() {
    assert_eq!(Value::from(42i64), Value::Integer(42));
    assert_eq!(Value::from("spam"), Value::string("spam"));
    assert_eq!(
        Value::from(vec![Value::Integer(1)]),
        Value::List(vec![Value::Integer(1)])
    );
}
