//! Hex and Bech32 Address Codecs
//!
//! The converter depends on two capabilities rather than on concrete
//! encoders, so tests can swap either one for a double.
//!
//! ## Encodings
//!
//! ```text
//! hex:     0x + 40 hex digits          (case-insensitive in, lowercase out)
//! bech32:  <prefix> 1 <data><checksum> (classic bech32 variant)
//! ```
//!
//! Both carry the same 20-byte payload.

use bech32::{self, FromBase32, ToBase32, Variant};
use thiserror::Error;

/// Length of an account address payload in bytes
pub const ADDRESS_LENGTH: usize = 20;

/// Longest human-readable part bech32 allows
pub const MAX_PREFIX_LENGTH: usize = 83;

/// Raw account address payload
pub type AddressBytes = [u8; ADDRESS_LENGTH];

/// Errors raised by the address codecs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid hex address length: expected 40 hex chars, got {0}")]
    InvalidHexLength(usize),

    #[error("decoding bech32 failed: {0}")]
    Bech32(#[from] bech32::Error),

    #[error("invalid bech32 variant: expected bech32, got bech32m")]
    WrongVariant,

    #[error("invalid Bech32 prefix; expected {expected}, got {found}")]
    WrongPrefix { expected: String, found: String },

    #[error("invalid address length: expected 20 bytes, got {0}")]
    WrongLength(usize),

    #[error("invalid bech32 prefix {0:?}: {1}")]
    InvalidPrefix(String, &'static str),
}

/// Hex side of the conversion
pub trait HexCodec: Send + Sync {
    /// Whether `address` is `0x` followed by exactly 40 hex digits
    fn is_hex_address(&self, address: &str) -> bool;

    /// Decode a hex address into its payload
    fn hex_to_bytes(&self, address: &str) -> Result<AddressBytes, CodecError>;

    /// Encode a payload as a canonical hex address
    fn bytes_to_hex(&self, bytes: &AddressBytes) -> String;
}

/// Bech32 side of the conversion
pub trait Bech32Codec: Send + Sync {
    /// Encode a payload under the given human-readable prefix
    fn encode(&self, prefix: &str, bytes: &AddressBytes) -> Result<String, CodecError>;

    /// Decode a bech32 string into `(prefix, payload)`
    fn decode(&self, address: &str) -> Result<(String, AddressBytes), CodecError>;
}

/// EVM-style `0x` hex addresses
#[derive(Debug, Clone, Copy, Default)]
pub struct EvmHexCodec;

impl HexCodec for EvmHexCodec {
    fn is_hex_address(&self, address: &str) -> bool {
        match strip_hex_prefix(address) {
            Some(digits) => {
                digits.len() == 2 * ADDRESS_LENGTH
                    && digits.bytes().all(|b| b.is_ascii_hexdigit())
            }
            None => false,
        }
    }

    fn hex_to_bytes(&self, address: &str) -> Result<AddressBytes, CodecError> {
        let digits = strip_hex_prefix(address).unwrap_or(address);

        if digits.len() != 2 * ADDRESS_LENGTH {
            return Err(CodecError::InvalidHexLength(digits.len()));
        }

        let mut result = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(digits, &mut result)?;
        Ok(result)
    }

    fn bytes_to_hex(&self, bytes: &AddressBytes) -> String {
        format!("0x{}", hex::encode(bytes))
    }
}

fn strip_hex_prefix(address: &str) -> Option<&str> {
    address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
}

/// Cosmos-SDK account addresses (classic bech32, 20-byte payload)
#[derive(Debug, Clone, Copy, Default)]
pub struct CosmosBech32Codec;

impl Bech32Codec for CosmosBech32Codec {
    fn encode(&self, prefix: &str, bytes: &AddressBytes) -> Result<String, CodecError> {
        Ok(bech32::encode(prefix, bytes.to_base32(), Variant::Bech32)?)
    }

    fn decode(&self, address: &str) -> Result<(String, AddressBytes), CodecError> {
        let (hrp, data, variant) = bech32::decode(address)?;

        if variant != Variant::Bech32 {
            return Err(CodecError::WrongVariant);
        }

        let bytes = Vec::<u8>::from_base32(&data)?;
        let length = bytes.len();
        let payload = bytes
            .try_into()
            .map_err(|_| CodecError::WrongLength(length))?;

        Ok((hrp, payload))
    }
}

/// Check that `prefix` can serve as a bech32 account prefix.
///
/// Uppercase is rejected: the encoder always emits lowercase, and a
/// case-sensitive prefix match on its own output must succeed.
pub fn validate_prefix(prefix: &str) -> Result<(), CodecError> {
    let invalid = |reason: &'static str| -> Result<(), CodecError> {
        Err(CodecError::InvalidPrefix(prefix.to_string(), reason))
    };

    if prefix.is_empty() {
        return invalid("must not be empty");
    }
    if prefix.len() > MAX_PREFIX_LENGTH {
        return invalid("must be at most 83 characters");
    }
    if !prefix.bytes().all(|b| (33..=126).contains(&b)) {
        return invalid("must be printable ASCII");
    }
    if prefix.bytes().any(|b| b.is_ascii_uppercase()) {
        return invalid("must be lowercase");
    }

    Ok(())
}
