//! Strong type definitions for chainrules.
//!
//! Heights and chain identifiers are arbitrary-precision: configurations are
//! operator-supplied and nothing bounds them to 64 bits. "Unset" is never
//! encoded inside these types; it is `Option::None` at the use site, so two
//! unset values compare equal and an unset value never equals a number.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A non-negative block height of unbounded size.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockNumber(BigUint);

impl BlockNumber {
    /// Create a block number from a machine integer.
    pub fn new(n: u64) -> Self {
        Self(BigUint::from(n))
    }

    /// Borrow the underlying big integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// The value as a `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }

    /// Whether this is block zero (genesis).
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The preceding block, or zero for genesis.
    pub fn saturating_pred(&self) -> Self {
        if self.0.is_zero() {
            Self::default()
        } else {
            Self(self.0.clone() - 1u32)
        }
    }

    /// The following block.
    pub fn succ(&self) -> Self {
        Self(self.0.clone() + 1u32)
    }
}

impl fmt::Debug for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockNumber({})", self.0)
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BlockNumber {
    fn from(n: u64) -> Self {
        Self::new(n)
    }
}

impl From<BigUint> for BlockNumber {
    fn from(n: BigUint) -> Self {
        Self(n)
    }
}

impl FromStr for BlockNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_biguint(s).map(Self)
    }
}

impl Serialize for BlockNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_biguint(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for BlockNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BigUintVisitor).map(Self)
    }
}

/// A chain identifier used for replay protection.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainId(BigUint);

impl ChainId {
    /// Create a chain id from a machine integer.
    pub fn new(id: u64) -> Self {
        Self(BigUint::from(id))
    }

    /// Borrow the underlying big integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// The value as a `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({})", self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<BigUint> for ChainId {
    fn from(id: BigUint) -> Self {
        Self(id)
    }
}

impl FromStr for ChainId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_biguint(s).map(Self)
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_biguint(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BigUintVisitor).map(Self)
    }
}

/// A 32-byte hash (block hashes, trie roots, config fingerprints).
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    /// The all-zero hash.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Blake3 digest of `data`.
    pub fn blake3(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Convert to hex string (no prefix).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Parse a 64-digit hex literal at compile time.
    ///
    /// Panics (at compile time, in const context) on malformed input.
    pub const fn from_hex_const(s: &str) -> Self {
        let digits = s.as_bytes();
        assert!(digits.len() == 64, "hash literal must be 64 hex digits");
        let mut out = [0u8; 32];
        let mut i = 0;
        while i < 32 {
            out[i] = (hex_nibble(digits[2 * i]) << 4) | hex_nibble(digits[2 * i + 1]);
            i += 1;
        }
        Self(out)
    }
}

const fn hex_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit in hash literal"),
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Hash32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Hash32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Hash32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Hash32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

/// Key under which serde_json passes a raw number literal to `visit_map`.
const JSON_NUMBER_TOKEN: &str = "$serde_json::private::Number";

/// Parse a bare decimal literal, as found in a JSON number.
fn parse_decimal(s: &str) -> Result<BigUint, CoreError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidNumber(s.to_string()));
    }
    parse_biguint(s)
}

/// Parse a decimal or `0x`-prefixed hexadecimal integer literal.
fn parse_biguint(s: &str) -> Result<BigUint, CoreError> {
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(rest) => (rest, 16),
        None => (s, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(CoreError::InvalidNumber(s.to_string()));
    }
    BigUint::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| CoreError::InvalidNumber(s.to_string()))
}

/// Values that fit in 64 bits are plain integers; larger ones are decimal
/// strings so that no format ever has to round them.
fn serialize_biguint<S: Serializer>(n: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    match n.to_u64() {
        Some(small) => serializer.serialize_u64(small),
        None => serializer.serialize_str(&n.to_str_radix(10)),
    }
}

struct BigUintVisitor;

impl<'de> Visitor<'de> for BigUintVisitor {
    type Value = BigUint;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer, or a decimal or 0x-hex integer string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(BigUint::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
        Ok(BigUint::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(BigUint::from)
            .map_err(|_| E::custom(format!("negative integer {v}")))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
        u128::try_from(v)
            .map(BigUint::from)
            .map_err(|_| E::custom(format!("negative integer {v}")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Err(E::custom(format!("number {v} is not a non-negative integer")))
    }

    // serde_json with `arbitrary_precision` hands every number over as a
    // single-entry map holding the literal text.
    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        match map.next_key::<String>()?.as_deref() {
            Some(JSON_NUMBER_TOKEN) => {
                let literal: String = map.next_value()?;
                parse_decimal(&literal).map_err(de::Error::custom)
            }
            _ => Err(de::Error::invalid_type(de::Unexpected::Map, &self)),
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse_biguint(v).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_number_ordering() {
        assert!(BlockNumber::new(9) < BlockNumber::new(10));
        assert_eq!(BlockNumber::new(0), BlockNumber::default());
    }

    #[test]
    fn test_saturating_pred() {
        assert_eq!(BlockNumber::new(0).saturating_pred(), BlockNumber::new(0));
        assert_eq!(BlockNumber::new(10).saturating_pred(), BlockNumber::new(9));
    }

    #[test]
    fn test_parse_decimal_and_hex() {
        assert_eq!("1150000".parse::<BlockNumber>().unwrap(), BlockNumber::new(1_150_000));
        assert_eq!("0x10".parse::<BlockNumber>().unwrap(), BlockNumber::new(16));
        assert!("".parse::<BlockNumber>().is_err());
        assert!("-1".parse::<BlockNumber>().is_err());
        assert!("+5".parse::<BlockNumber>().is_err());
        assert!("1_000".parse::<BlockNumber>().is_err());
        assert!("0x".parse::<BlockNumber>().is_err());
    }

    #[test]
    fn test_json_small_is_number() {
        let json = serde_json::to_string(&BlockNumber::new(4_370_000)).unwrap();
        assert_eq!(json, "4370000");
    }

    #[test]
    fn test_json_large_is_string() {
        let big: BlockNumber = "340282366920938463463374607431768211457".parse().unwrap();
        let json = serde_json::to_string(&big).unwrap();
        assert_eq!(json, "\"340282366920938463463374607431768211457\"");
        let back: BlockNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, big);
    }

    #[test]
    fn test_json_rejects_lossy_numbers() {
        assert!(serde_json::from_str::<BlockNumber>("1.5").is_err());
        assert!(serde_json::from_str::<BlockNumber>("-3").is_err());
        assert!(serde_json::from_str::<BlockNumber>("1e3").is_err());
        assert!(serde_json::from_str::<BlockNumber>("2.0").is_err());
    }

    #[test]
    fn test_json_number_above_u64() {
        let n: BlockNumber = serde_json::from_str("18446744073709551616").unwrap();
        assert_eq!(n, BlockNumber::new(u64::MAX).succ());

        let id: ChainId = serde_json::from_str("100000000000000000000000").unwrap();
        assert_eq!(id.to_string(), "100000000000000000000000");
        assert_eq!(id.to_u64(), None);
    }

    #[test]
    fn test_hash_hex_roundtrip() {
        let h = Hash32::from_bytes([0x42; 32]);
        let recovered = Hash32::from_hex(&h.to_string()).unwrap();
        assert_eq!(h, recovered);
    }

    #[test]
    fn test_hash_const_matches_runtime() {
        const H: Hash32 = Hash32::from_hex_const(
            "d4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3",
        );
        let parsed =
            Hash32::from_hex("0xd4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3")
                .unwrap();
        assert_eq!(H, parsed);
    }

    #[test]
    fn test_hash_debug() {
        let debug = format!("{:?}", Hash32::from_bytes([0xcd; 32]));
        assert_eq!(debug, "Hash32(cdcdcdcdcdcdcdcd)");
    }
}
