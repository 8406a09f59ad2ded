//! `utils` RPC namespace
//!
//! Stateless API object behind the `utils_*` JSON-RPC methods.

use crate::codec::{Bech32Codec, CodecError, CosmosBech32Codec, EvmHexCodec, HexCodec};
use crate::converter::{AddressConverter, ConversionError, Converted};

/// Handler for the `utils` namespace
#[derive(Debug, Clone)]
pub struct UtilsApi<H = EvmHexCodec, B = CosmosBech32Codec> {
    converter: AddressConverter<H, B>,
}

impl UtilsApi {
    /// API for a network whose account addresses use `prefix`
    pub fn from_prefix(prefix: impl Into<String>) -> Result<Self, CodecError> {
        Ok(Self::new(AddressConverter::with_prefix(prefix)?))
    }
}

impl<H: HexCodec, B: Bech32Codec> UtilsApi<H, B> {
    pub fn new(converter: AddressConverter<H, B>) -> Self {
        Self { converter }
    }

    pub fn prefix(&self) -> &str {
        self.converter.prefix()
    }

    /// Converts the provided address from hex to bech32 and vice versa
    pub fn convert_address(&self, address: &str) -> Result<String, ConversionError> {
        self.converter.convert(address)
    }

    /// [`convert_address`](Self::convert_address) with the detected input format
    pub fn convert_address_tagged(&self, address: &str) -> Result<Converted, ConversionError> {
        self.converter.convert_tagged(address)
    }
}
