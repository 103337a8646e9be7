//! Canonical CBOR encoding of chain configurations.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Integers above `u64::MAX` use the positive bignum tag (2)
//! - Definite lengths only
//! - No floats
//!
//! Two configurations encode to the same bytes exactly when they are equal,
//! so the Blake3 hash of the encoding identifies a configuration.

use ciborium::value::Value;
use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::config::{ChainConfig, CliqueConfig, Engine};
use crate::error::CoreError;
use crate::forks::Fork;
use crate::types::{BlockNumber, ChainId, Hash32};

/// Encoding version. Bump on any change to the layout below.
pub const CANONICAL_VERSION: u64 = 1;

/// Top-level map keys.
///
/// Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const VERSION: u64 = 0;
    pub const CHAIN_ID: u64 = 1;
    pub const DAO_FORK_SUPPORT: u64 = 2;
    pub const EIP150_HASH: u64 = 3;
    pub const ENGINE: u64 = 4;
    pub const FORKS: u64 = 5;
}

/// Engine discriminants, the first element of the engine array.
mod engine {
    pub const NONE: u64 = 0;
    pub const ETHASH: u64 = 1;
    pub const CLIQUE: u64 = 2;
}

const TAG_POSITIVE_BIGNUM: u64 = 2;

/// Encode a configuration to canonical CBOR bytes.
///
/// Unset fork blocks and an unset chain id are omitted; the fork map is
/// keyed by the fork's position in [`Fork::ALL`].
pub fn canonical_config_bytes(config: &ChainConfig) -> Result<Vec<u8>, CoreError> {
    let value = config_to_cbor_value(config);
    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value)?;
    Ok(buf)
}

/// Blake3 hash of the canonical encoding.
pub fn config_fingerprint(config: &ChainConfig) -> Result<Hash32, CoreError> {
    Ok(Hash32::blake3(&canonical_config_bytes(config)?))
}

/// Decode a configuration from canonical bytes.
///
/// Input that decodes but is not in canonical form is rejected.
pub fn decode_config(bytes: &[u8]) -> Result<ChainConfig, CoreError> {
    let value: Value =
        ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))?;
    let config = cbor_value_to_config(&value)?;

    if canonical_config_bytes(&config)? != bytes {
        return Err(CoreError::DecodingError("non-canonical encoding".into()));
    }
    Ok(config)
}

fn config_to_cbor_value(config: &ChainConfig) -> Value {
    let mut entries = Vec::with_capacity(6);

    entries.push((uint(keys::VERSION), uint(CANONICAL_VERSION)));

    if let Some(id) = &config.chain_id {
        entries.push((uint(keys::CHAIN_ID), biguint(id.as_biguint())));
    }

    entries.push((
        uint(keys::DAO_FORK_SUPPORT),
        Value::Bool(config.dao_fork_support),
    ));
    entries.push((
        uint(keys::EIP150_HASH),
        Value::Bytes(config.eip150_hash.as_bytes().to_vec()),
    ));

    let engine = match &config.engine {
        Engine::None => vec![uint(engine::NONE)],
        Engine::ProofOfWork => vec![uint(engine::ETHASH)],
        Engine::ProofOfAuthority(clique) => vec![
            uint(engine::CLIQUE),
            uint(clique.period),
            uint(clique.epoch),
        ],
    };
    entries.push((uint(keys::ENGINE), Value::Array(engine)));

    let forks = Fork::ALL
        .iter()
        .enumerate()
        .filter_map(|(idx, fork)| {
            config
                .fork_block(*fork)
                .map(|block| (uint(idx as u64), biguint(block.as_biguint())))
        })
        .collect();
    entries.push((uint(keys::FORKS), Value::Map(forks)));

    Value::Map(entries)
}

fn cbor_value_to_config(value: &Value) -> Result<ChainConfig, CoreError> {
    let map = as_map(value, "config")?;
    let get = |key: u64| lookup(map, key);

    match get(keys::VERSION).map(to_u64) {
        Some(Ok(CANONICAL_VERSION)) => {}
        Some(Ok(v)) => return Err(malformed(format!("unsupported version {v}"))),
        _ => return Err(malformed("missing version")),
    }

    let chain_id = match get(keys::CHAIN_ID) {
        Some(v) => Some(ChainId::from(to_biguint(v)?)),
        None => None,
    };

    let dao_fork_support = match get(keys::DAO_FORK_SUPPORT) {
        Some(Value::Bool(b)) => *b,
        _ => return Err(malformed("invalid dao fork support")),
    };

    let eip150_hash = match get(keys::EIP150_HASH) {
        Some(Value::Bytes(b)) if b.len() == 32 => {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(b);
            Hash32(arr)
        }
        _ => return Err(malformed("invalid eip150 hash")),
    };

    let engine = match get(keys::ENGINE) {
        Some(Value::Array(items)) => {
            let kind = items
                .first()
                .ok_or_else(|| malformed("empty engine"))
                .and_then(to_u64)?;
            match (kind, &items[1..]) {
                (engine::NONE, []) => Engine::None,
                (engine::ETHASH, []) => Engine::ProofOfWork,
                (engine::CLIQUE, [period, epoch]) => Engine::ProofOfAuthority(CliqueConfig {
                    period: to_u64(period)?,
                    epoch: to_u64(epoch)?,
                }),
                _ => return Err(malformed("invalid engine")),
            }
        }
        _ => return Err(malformed("missing engine")),
    };

    let mut config = ChainConfig {
        chain_id,
        dao_fork_support,
        eip150_hash,
        engine,
        ..ChainConfig::default()
    };

    let forks = match get(keys::FORKS) {
        Some(v) => as_map(v, "forks")?,
        None => return Err(malformed("missing forks")),
    };
    for (k, v) in forks {
        let fork = usize::try_from(to_u64(k)?)
            .ok()
            .and_then(|idx| Fork::ALL.get(idx))
            .ok_or_else(|| malformed("unknown fork index"))?;
        config.set_fork_block(*fork, Some(BlockNumber::from(to_biguint(v)?)));
    }

    Ok(config)
}

fn uint(n: u64) -> Value {
    Value::Integer(n.into())
}

fn biguint(n: &BigUint) -> Value {
    match n.to_u64() {
        Some(small) => uint(small),
        None => Value::Tag(TAG_POSITIVE_BIGNUM, Box::new(Value::Bytes(n.to_bytes_be()))),
    }
}

fn malformed(msg: impl Into<String>) -> CoreError {
    CoreError::DecodingError(msg.into())
}

fn as_map<'a>(value: &'a Value, what: &str) -> Result<&'a [(Value, Value)], CoreError> {
    match value {
        Value::Map(m) => Ok(m),
        _ => Err(malformed(format!("expected map for {what}"))),
    }
}

fn lookup(map: &[(Value, Value)], key: u64) -> Option<&Value> {
    map.iter()
        .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == i128::from(key)))
        .map(|(_, v)| v)
}

fn to_u64(value: &Value) -> Result<u64, CoreError> {
    match value {
        Value::Integer(i) => u64::try_from(*i).map_err(|_| malformed("integer out of range")),
        _ => Err(malformed("expected integer")),
    }
}

fn to_biguint(value: &Value) -> Result<BigUint, CoreError> {
    match value {
        Value::Integer(_) => Ok(BigUint::from(to_u64(value)?)),
        Value::Tag(TAG_POSITIVE_BIGNUM, inner) => match inner.as_ref() {
            Value::Bytes(b) => Ok(BigUint::from_bytes_be(b)),
            _ => Err(malformed("invalid bignum")),
        },
        _ => Err(malformed("expected number")),
    }
}

/// Recursively encode a CBOR value.
///
/// Only the value kinds a configuration encodes to are accepted.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(i) => {
            let n = u64::try_from(*i)
                .map_err(|_| CoreError::EncodingError("negative integer".into()))?;
            encode_uint(buf, 0, n);
        }
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Array(arr) => encode_array(buf, arr)?,
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        Value::Tag(tag, inner) => {
            encode_uint(buf, 6, *tag);
            encode_value_to(buf, inner)?;
        }
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        _ => {
            return Err(CoreError::EncodingError(
                "unsupported CBOR value type".into(),
            ))
        }
    }
    Ok(())
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) -> Result<(), CoreError> {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item)?;
    }
    Ok(())
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<(), CoreError> {
    let mut pairs = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_buf = Vec::new();
        encode_value_to(&mut key_buf, k)?;
        pairs.push((key_buf, v));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value)?;
    }
    Ok(())
}
