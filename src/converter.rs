//! Hex <-> Bech32 account address conversion
//!
//! Classification order matters: the strict hex check runs first, then a
//! plain prefix match routes everything else that looks like ours to the
//! bech32 decoder. A prefixed but malformed input therefore fails with the
//! decoder's error rather than [`ConversionError::InvalidFormat`].

use std::fmt;

use thiserror::Error;

use crate::codec::{
    validate_prefix, Bech32Codec, CodecError, CosmosBech32Codec, EvmHexCodec, HexCodec,
};

/// Errors returned by [`AddressConverter::convert`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("expected a valid hex or bech32 address")]
    InvalidFormat,

    #[error(transparent)]
    Decode(CodecError),

    #[error(transparent)]
    Encode(CodecError),
}

/// Which encoding an input was classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFormat {
    Hex,
    Bech32,
}

impl AddressFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressFormat::Hex => "hex",
            AddressFormat::Bech32 => "bech32",
        }
    }
}

impl fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a conversion, tagged with the input's encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub from: AddressFormat,
    pub address: String,
}

/// Converts account addresses between hex and the network's bech32 form
#[derive(Debug, Clone)]
pub struct AddressConverter<H = EvmHexCodec, B = CosmosBech32Codec> {
    prefix: String,
    hex: H,
    bech32: B,
}

impl AddressConverter {
    /// Converter for `prefix` using the default codecs
    pub fn with_prefix(prefix: impl Into<String>) -> Result<Self, CodecError> {
        Self::new(prefix, EvmHexCodec, CosmosBech32Codec)
    }
}

impl<H: HexCodec, B: Bech32Codec> AddressConverter<H, B> {
    pub fn new(prefix: impl Into<String>, hex: H, bech32: B) -> Result<Self, CodecError> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self {
            prefix,
            hex,
            bech32,
        })
    }

    /// The bech32 account prefix this converter encodes to
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Classify `address` without decoding it
    pub fn detect(&self, address: &str) -> Option<AddressFormat> {
        if self.hex.is_hex_address(address) {
            Some(AddressFormat::Hex)
        } else if address.starts_with(self.prefix.as_str()) {
            Some(AddressFormat::Bech32)
        } else {
            None
        }
    }

    /// Convert `address` to the other encoding
    pub fn convert(&self, address: &str) -> Result<String, ConversionError> {
        self.convert_tagged(address).map(|converted| converted.address)
    }

    /// Like [`convert`](Self::convert), also reporting the input's encoding
    pub fn convert_tagged(&self, address: &str) -> Result<Converted, ConversionError> {
        let from = self.detect(address).ok_or(ConversionError::InvalidFormat)?;

        let converted = match from {
            AddressFormat::Hex => self.hex_to_bech32(address)?,
            AddressFormat::Bech32 => self.bech32_to_hex(address)?,
        };

        Ok(Converted {
            from,
            address: converted,
        })
    }

    fn hex_to_bech32(&self, address: &str) -> Result<String, ConversionError> {
        let bytes = self
            .hex
            .hex_to_bytes(address)
            .map_err(ConversionError::Decode)?;

        self.bech32
            .encode(&self.prefix, &bytes)
            .map_err(ConversionError::Encode)
    }

    fn bech32_to_hex(&self, address: &str) -> Result<String, ConversionError> {
        let (hrp, bytes) = self
            .bech32
            .decode(address)
            .map_err(ConversionError::Decode)?;

        // "secretvaloper1..." passes the prefix match for "secret"
        if hrp != self.prefix {
            return Err(ConversionError::Decode(CodecError::WrongPrefix {
                expected: self.prefix.clone(),
                found: hrp,
            }));
        }

        Ok(self.hex.bytes_to_hex(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::AddressBytes;

    const HEX: &str = "0x1234567890123456789012345678901234567890";
    const BECH32: &str = "addr1zg69v7yszg69v7yszg69v7yszg69v7ysa6dcu0";

    fn converter() -> AddressConverter {
        AddressConverter::with_prefix("addr").unwrap()
    }

    /// Bech32 codec that fails every call with a fixed error
    struct FailingBech32;

    impl Bech32Codec for FailingBech32 {
        fn encode(&self, _prefix: &str, _bytes: &AddressBytes) -> Result<String, CodecError> {
            Err(CodecError::WrongLength(0))
        }

        fn decode(&self, _address: &str) -> Result<(String, AddressBytes), CodecError> {
            Err(CodecError::Bech32(bech32::Error::InvalidChecksum))
        }
    }

    #[test]
    fn test_hex_to_bech32() {
        assert_eq!(converter().convert(HEX).unwrap(), BECH32);
    }

    #[test]
    fn test_bech32_to_hex() {
        assert_eq!(converter().convert(BECH32).unwrap(), HEX);
    }

    #[test]
    fn test_double_conversion_is_identity() {
        let converter = converter();

        let once = converter.convert(HEX).unwrap();
        assert_eq!(converter.convert(&once).unwrap(), HEX);

        let once = converter.convert(BECH32).unwrap();
        assert_eq!(converter.convert(&once).unwrap(), BECH32);
    }

    #[test]
    fn test_mixed_case_hex_comes_back_lowercase() {
        let converter = AddressConverter::with_prefix("secret").unwrap();
        let checksummed = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

        let bech32 = converter.convert(checksummed).unwrap();
        assert_eq!(bech32, "secret17w0adeg64ky0daxwd2ugyuneellmjgnxpc0mku");
        assert_eq!(
            converter.convert(&bech32).unwrap(),
            checksummed.to_lowercase()
        );
    }

    #[test]
    fn test_roundtrip_many_payloads() {
        let converter = converter();
        let codec = EvmHexCodec;

        for seed in 0u8..=255 {
            let payload: AddressBytes =
                std::array::from_fn(|i| seed.wrapping_mul(31).wrapping_add(i as u8 * 7));
            let hex = codec.bytes_to_hex(&payload);

            let bech32 = converter.convert(&hex).unwrap();
            let (_, decoded) = CosmosBech32Codec.decode(&bech32).unwrap();
            assert_eq!(decoded, payload);
            assert_eq!(converter.convert(&bech32).unwrap(), hex);
        }
    }

    #[test]
    fn test_invalid_format() {
        let converter = converter();

        for input in [
            "not-an-address",
            "",
            "1234567890123456789012345678901234567890",
            "0x12345",
            "terra1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v",
            "ADDR1ZG69V7YSZG69V7YSZG69V7YSZG69V7YSA6DCU0",
        ] {
            assert_eq!(
                converter.convert(input),
                Err(ConversionError::InvalidFormat),
                "input {input:?}"
            );
        }

        assert_eq!(
            ConversionError::InvalidFormat.to_string(),
            "expected a valid hex or bech32 address"
        );
    }

    #[test]
    fn test_prefixed_garbage_is_decode_error() {
        let converter = converter();

        assert_eq!(
            converter.convert("addr1"),
            Err(ConversionError::Decode(CodecError::Bech32(
                bech32::Error::InvalidLength
            )))
        );
        assert_eq!(
            converter.convert("addrfoo"),
            Err(ConversionError::Decode(CodecError::Bech32(
                bech32::Error::MissingSeparator
            )))
        );
    }

    #[test]
    fn test_corrupted_checksum_is_decode_error() {
        let corrupted = BECH32.replace("a6dcu0", "a6dcu2");

        assert_eq!(
            converter().convert(&corrupted),
            Err(ConversionError::Decode(CodecError::Bech32(
                bech32::Error::InvalidChecksum
            )))
        );
    }

    #[test]
    fn test_longer_hrp_with_same_start_is_rejected() {
        let converter = AddressConverter::with_prefix("secret").unwrap();
        let payload = EvmHexCodec.hex_to_bytes(HEX).unwrap();
        let valoper = CosmosBech32Codec.encode("secretvaloper", &payload).unwrap();

        assert_eq!(
            converter.convert(&valoper),
            Err(ConversionError::Decode(CodecError::WrongPrefix {
                expected: "secret".to_string(),
                found: "secretvaloper".to_string(),
            }))
        );
    }

    #[test]
    fn test_hex_check_takes_precedence() {
        // A prefix that every hex address also starts with
        let converter = AddressConverter::with_prefix("0x").unwrap();

        assert_eq!(converter.detect(HEX), Some(AddressFormat::Hex));
        assert!(converter.convert(HEX).unwrap().starts_with("0x1"));
        assert_eq!(converter.detect("0xnothex"), Some(AddressFormat::Bech32));
    }

    #[test]
    fn test_detect() {
        let converter = converter();

        assert_eq!(converter.detect(HEX), Some(AddressFormat::Hex));
        assert_eq!(converter.detect(BECH32), Some(AddressFormat::Bech32));
        assert_eq!(converter.detect("addr"), Some(AddressFormat::Bech32));
        assert_eq!(converter.detect("cosmos1abc"), None);
    }

    #[test]
    fn test_convert_tagged() {
        let converter = converter();

        assert_eq!(
            converter.convert_tagged(HEX).unwrap(),
            Converted {
                from: AddressFormat::Hex,
                address: BECH32.to_string(),
            }
        );
        assert_eq!(
            converter.convert_tagged(BECH32).unwrap().from,
            AddressFormat::Bech32
        );
    }

    #[test]
    fn test_codec_errors_pass_through_unchanged() {
        let converter = AddressConverter::new("addr", EvmHexCodec, FailingBech32).unwrap();

        assert_eq!(
            converter.convert(BECH32),
            Err(ConversionError::Decode(CodecError::Bech32(
                bech32::Error::InvalidChecksum
            )))
        );
        assert_eq!(
            converter.convert(HEX),
            Err(ConversionError::Encode(CodecError::WrongLength(0)))
        );
        // Classification happens before any codec call
        assert_eq!(
            converter.convert("nope"),
            Err(ConversionError::InvalidFormat)
        );
    }

    #[test]
    fn test_invalid_prefix_rejected_at_construction() {
        assert!(AddressConverter::with_prefix("").is_err());
        assert!(AddressConverter::with_prefix("Addr").is_err());
    }
}
