//! Mock market-intelligence providers.
//!
//! Stand-ins for the market-data (IQVIA) and trade-data (EXIM) vendors.
//! Inputs are accepted as-is and only used for logging.

use crate::models::{MarketRecord, TradeRecord};
use rand::Rng;
use tracing::debug;

/// Bounds of the simulated global market size, in billions.
pub const MARKET_SIZE_RANGE: (u32, u32) = (2, 15);

/// Bounds of the simulated five-year CAGR, in percent.
pub const CAGR_RANGE: (f64, f64) = (3.5, 8.2);

/// Simulate a market-size and CAGR lookup.
///
/// Numeric fields are drawn from `rng`, so callers can seed it for
/// reproducible records.
pub fn query_market<R: Rng>(rng: &mut R, drug: &str, disease: &str) -> MarketRecord {
    debug!("Querying market data for {} in {}", drug, disease);

    let base_size = rng.gen_range(MARKET_SIZE_RANGE.0..=MARKET_SIZE_RANGE.1);
    let cagr = round_to_hundredths(rng.gen_range(CAGR_RANGE.0..=CAGR_RANGE.1));

    MarketRecord {
        source: "IQVIA Analytics (Mock)".to_string(),
        market_size_global: format!("${} Billion", base_size),
        cagr_5yr: format!("{}%", cagr),
        top_competitor: "BigPharma Inc.".to_string(),
        market_saturation: "Medium-High".to_string(),
    }
}

/// Simulate an API export/import lookup. The record is fixed.
pub fn query_trade(drug: &str) -> TradeRecord {
    debug!("Querying trade data for {}", drug);

    TradeRecord {
        source: "EXIM Trade Data (Mock)".to_string(),
        major_exporter: "India (Gujarat Region)".to_string(),
        major_importer: "USA".to_string(),
        api_price_trend: "Stable".to_string(),
        supply_chain_risk: "Low".to_string(),
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
