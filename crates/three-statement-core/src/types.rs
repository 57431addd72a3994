use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Currency amounts on the statements. Decimal, never f64.
pub type Money = Decimal;

/// Growth, margins, interest and tax rates as decimals (0.25 = 25%).
pub type Rate = Decimal;

/// Ratios read as "x times" (interest coverage, debt to equity)
pub type Multiple = Decimal;

/// Envelope returned by every top-level computation: the result, the
/// fully-resolved assumptions it ran on, and anything worth a second look.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Wrap `result` in the envelope, timing from `started`.
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    started: Instant,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: started.elapsed().as_micros() as u64,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_envelope_echoes_assumptions_as_strings() {
        let out = with_metadata(
            "test",
            &json!({ "tax_rate": dec!(0.25) }),
            vec!["note".to_string()],
            Instant::now(),
            dec!(1),
        );

        assert_eq!(out.assumptions["tax_rate"], "0.25");
        assert_eq!(out.warnings, vec!["note"]);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_eq!(out.metadata.version, env!("CARGO_PKG_VERSION"));
    }
}
