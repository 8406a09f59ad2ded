//! Utils RPC: hex <-> bech32 account address conversion
//!
//! - **Codecs** - `0x` hex and Cosmos bech32 encoders behind swappable traits
//! - **Converter** - classifies an address and converts it to the other encoding
//! - **API** - the stateless `utils` namespace object
//! - **RPC / Server** - JSON-RPC 2.0 over HTTP (`utils_convertAddress`), health and metrics
//!
//! ## Usage
//!
//! ```
//! use utils_rpc::UtilsApi;
//!
//! let api = UtilsApi::from_prefix("secret").unwrap();
//! let bech32 = api
//!     .convert_address("0x1234567890123456789012345678901234567890")
//!     .unwrap();
//! assert_eq!(bech32, "secret1zg69v7yszg69v7yszg69v7yszg69v7ysh74rag");
//! ```

pub mod api;
pub mod codec;
pub mod config;
pub mod converter;
pub mod metrics;
pub mod rpc;
pub mod server;

pub use api::UtilsApi;
pub use codec::{
    validate_prefix, AddressBytes, Bech32Codec, CodecError, CosmosBech32Codec, EvmHexCodec,
    HexCodec, ADDRESS_LENGTH,
};
pub use config::Config;
pub use converter::{AddressConverter, AddressFormat, ConversionError, Converted};
pub use metrics::Metrics;
