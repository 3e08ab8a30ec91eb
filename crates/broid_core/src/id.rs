// id.rs: BrowserID value type, hex/u64 conversions and distance
use serde::de::{self, Deserializer, Visitor};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::error::ParseIdError;

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Browser characteristics, one byte per builder field.
///
/// Two ids are only comparable when produced by builders with the same
/// fields in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BrowserId(Vec<u8>);

impl BrowserId {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Big-endian bytes of `n` without leading zero bytes; 0 gives an empty id.
    pub fn from_u64(n: u64) -> Self {
        let bytes = n.to_be_bytes();
        let skip = (n.leading_zeros() / 8) as usize;
        BrowserId(bytes[skip..].to_vec())
    }

    /// Fold the bytes most-significant first.
    ///
    /// Lossless up to 8 bytes; longer ids keep only the trailing 8.
    pub fn to_u64(&self) -> u64 {
        self.0.iter().fold(0u64, |n, &b| (n << 8) | b as u64)
    }

    /// Number of positions that differ, counting every byte past the shorter
    /// id's end as a difference.
    pub fn compare(&self, other: &BrowserId) -> usize {
        let tail = self.0.len().abs_diff(other.0.len());
        let differing = self.0.iter().zip(other.0.iter()).filter(|(a, b)| a != b).count();
        tail + differing
    }
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl FromStr for BrowserId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() % 2 != 0 {
            return Err(ParseIdError::OddLength { len: bytes.len() });
        }
        let mut id = Vec::with_capacity(bytes.len() / 2);
        for (i, pair) in bytes.chunks_exact(2).enumerate() {
            match (hex_val(pair[0]), hex_val(pair[1])) {
                (Some(hi), Some(lo)) => id.push((hi << 4) | lo),
                _ => {
                    return Err(ParseIdError::InvalidDigit {
                        index: i * 2,
                        pair: String::from_utf8_lossy(pair).into_owned(),
                    })
                }
            }
        }
        Ok(BrowserId(id))
    }
}

impl fmt::Display for BrowserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(self.0.len() * 2);
        for &b in &self.0 {
            out.push(DIGITS[(b >> 4) as usize] as char);
            out.push(DIGITS[(b & 0xf) as usize] as char);
        }
        f.write_str(&out)
    }
}

impl From<Vec<u8>> for BrowserId {
    fn from(v: Vec<u8>) -> Self {
        BrowserId(v)
    }
}

impl From<&[u8]> for BrowserId {
    fn from(v: &[u8]) -> Self {
        BrowserId(v.to_vec())
    }
}

impl AsRef<[u8]> for BrowserId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for BrowserId {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

// serialized as the hex string so ids embed directly in JSON logs and cookies
impl Serialize for BrowserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct BrowserIdVisitor;

impl<'de> Visitor<'de> for BrowserIdVisitor {
    type Value = BrowserId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a hex-encoded browser id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<BrowserId, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> serde::Deserialize<'de> for BrowserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(BrowserIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATTERN: [u8; 5] = [0xde, 0xad, 0xbe, 0xef, 0x12];

    #[test]
    fn test_from_str() {
        let id: BrowserId = "".parse().expect("empty id");
        assert!(id.is_empty());

        assert_eq!("f".parse::<BrowserId>(), Err(ParseIdError::OddLength { len: 1 }));
        assert!("fac".parse::<BrowserId>().is_err());
        assert_eq!(
            "fafafs".parse::<BrowserId>(),
            Err(ParseIdError::InvalidDigit { index: 4, pair: "fs".to_string() })
        );
        assert!("+f".parse::<BrowserId>().is_err());
        assert!("é".parse::<BrowserId>().is_err());

        let id: BrowserId = "deadbeef12deadbeef12deadbeef12deadbeef12".parse().expect("parse");
        assert_eq!(id.len(), 20);
        for chunk in id.chunks(5) {
            assert_eq!(chunk, &PATTERN);
        }
        assert_eq!("DEADBEEF".parse::<BrowserId>().unwrap().to_string(), "deadbeef");
    }

    #[test]
    fn test_to_string() {
        let id: BrowserId = PATTERN.repeat(4).into();
        assert_eq!(id.to_string(), "deadbeef12deadbeef12deadbeef12deadbeef12");
        assert_eq!(BrowserId::default().to_string(), "");
        assert_eq!(BrowserId::from(vec![0x00, 0x0f]).to_string(), "000f");
    }

    #[test]
    fn test_from_u64() {
        let id = BrowserId::from_u64(0xdeadbeef01234567);
        assert_eq!(id.as_bytes(), &[0xde, 0xad, 0xbe, 0xef, 0x01, 0x23, 0x45, 0x67]);
        assert_eq!(BrowserId::from_u64(0x0100).as_bytes(), &[0x01, 0x00]);
        assert!(BrowserId::from_u64(0).is_empty());
    }

    #[test]
    fn test_to_u64() {
        let id = BrowserId::from(vec![0xde, 0xad, 0xbe, 0xef, 0x01, 0x23, 0x45, 0x67]);
        assert_eq!(id.to_u64(), 0xdeadbeef01234567);
        assert_eq!(BrowserId::default().to_u64(), 0);

        // high bytes fall off past 8
        let long =
            BrowserId::from(vec![0xaa, 0xbb, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        assert_eq!(long.to_u64(), 0x0102030405060708);
    }

    #[test]
    fn test_compare() {
        let id1 = BrowserId::from(vec![0xde, 0xad, 0xbe, 0xef]);
        let id2 = BrowserId::default();
        assert_eq!(id1.compare(&id1), 0);
        assert_eq!(id2.compare(&id2), 0);
        assert_eq!(id1.compare(&id2), 4);
        assert_eq!(id2.compare(&id1), 4);

        let id3 = BrowserId::from(vec![0xde, 0xad, 0xde, 0xef, 0x12]);
        assert_eq!(id1.compare(&id3), 2);
        assert_eq!(id3.compare(&id1), 2);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let id = BrowserId::from(vec![0xde, 0xad]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"dead\"");
        let back: BrowserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<BrowserId>("\"xyz1\"").is_err());
    }
}
