//! Prometheus metrics for the RPC server

use prometheus::{IntCounter, Registry};

use crate::converter::AddressFormat;

/// Prometheus metrics
#[derive(Clone)]
pub struct Metrics {
    /// JSON-RPC calls received (batch entries counted individually)
    pub rpc_requests_total: IntCounter,
    /// JSON-RPC calls answered with an error object
    pub rpc_errors_total: IntCounter,
    pub hex_to_bech32_total: IntCounter,
    pub bech32_to_hex_total: IntCounter,
    /// Conversions rejected with InvalidFormat or a codec error
    pub conversion_failures_total: IntCounter,
    pub registry: Registry,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let rpc_requests_total = counter(
            &registry,
            "utils_rpc_requests_total",
            "Total number of JSON-RPC calls received",
        );
        let rpc_errors_total = counter(
            &registry,
            "utils_rpc_errors_total",
            "Total number of JSON-RPC calls answered with an error",
        );
        let hex_to_bech32_total = counter(
            &registry,
            "utils_conversions_hex_to_bech32_total",
            "Total number of hex addresses converted to bech32",
        );
        let bech32_to_hex_total = counter(
            &registry,
            "utils_conversions_bech32_to_hex_total",
            "Total number of bech32 addresses converted to hex",
        );
        let conversion_failures_total = counter(
            &registry,
            "utils_conversion_failures_total",
            "Total number of addresses that could not be converted",
        );

        Self {
            rpc_requests_total,
            rpc_errors_total,
            hex_to_bech32_total,
            bech32_to_hex_total,
            conversion_failures_total,
            registry,
        }
    }

    /// Count a successful conversion by its input format
    pub fn record_conversion(&self, from: AddressFormat) {
        match from {
            AddressFormat::Hex => self.hex_to_bech32_total.inc(),
            AddressFormat::Bech32 => self.bech32_to_hex_total.inc(),
        }
    }
}

// Names are unique constants and each is registered exactly once per registry
fn counter(registry: &Registry, name: &str, help: &str) -> IntCounter {
    let counter = IntCounter::new(name, help).expect("constant metric name is valid");
    registry
        .register(Box::new(counter.clone()))
        .expect("metric registration must not be called twice");
    counter
}
