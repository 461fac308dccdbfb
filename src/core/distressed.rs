use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::normalize::{last_segment, normalize};
use crate::models::{DistressedAnalysis, Property};

/// Market rate per square meter for one zone, in the valuation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRate {
    pub zone: String,
    pub rate: Decimal,
}

impl MarketRate {
    pub fn new(zone: &str, rate: i64) -> Self {
        Self {
            zone: zone.to_string(),
            rate: Decimal::from(rate),
        }
    }
}

/// Ordered zone -> rate table. The first entry whose key is contained in the
/// property's comuna wins, so more specific keys must come first.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketRateTable {
    entries: Vec<MarketRate>,
    default_rate: Decimal,
}

impl MarketRateTable {
    /// Keys are normalized up front; entries with blank keys are dropped
    /// since they would shadow every later zone.
    pub fn new(entries: Vec<MarketRate>, default_rate: Decimal) -> Self {
        let entries = entries
            .into_iter()
            .filter_map(|entry| {
                let zone = normalize(entry.zone.trim());
                if zone.is_empty() {
                    tracing::warn!("Ignoring market rate entry with blank zone");
                    None
                } else {
                    Some(MarketRate { zone, rate: entry.rate })
                }
            })
            .collect();

        Self { entries, default_rate }
    }

    /// Rate for a normalized comuna token
    pub fn rate_for(&self, comuna: &str) -> Decimal {
        self.entries
            .iter()
            .find(|entry| comuna.contains(entry.zone.as_str()))
            .map_or(self.default_rate, |entry| entry.rate)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MarketRateTable {
    /// Santiago-area seed rates in UF/m²
    fn default() -> Self {
        Self::new(
            vec![
                MarketRate::new("las condes", 95),
                MarketRate::new("vitacura", 110),
                MarketRate::new("providencia", 90),
                MarketRate::new("lo barnechea", 100),
                MarketRate::new("temuco", 45),
                MarketRate::new("concon", 55),
            ],
            Decimal::from(50),
        )
    }
}

/// Flags properties priced well below their zone's market rate per m²
#[derive(Debug, Clone)]
pub struct DistressedAnalyzer {
    table: MarketRateTable,
    /// Currency code the table is denominated in
    unit_currency: String,
    /// Local currency per valuation unit (CLP per UF)
    local_per_unit: Decimal,
    /// Discount percent that must be exceeded to flag a property
    threshold_pct: Decimal,
}

impl DistressedAnalyzer {
    pub fn new(
        table: MarketRateTable,
        unit_currency: &str,
        local_per_unit: Decimal,
        threshold_pct: Decimal,
    ) -> Self {
        if local_per_unit <= Decimal::ZERO {
            tracing::warn!(
                "Non-positive {} conversion rate {}, local-currency listings will not be flagged",
                unit_currency,
                local_per_unit
            );
        }

        Self {
            table,
            unit_currency: unit_currency.trim().to_string(),
            local_per_unit,
            threshold_pct,
        }
    }

    /// Analyze a property against the market-rate table.
    ///
    /// Missing or zero square meters count as 1. A non-positive market rate
    /// or conversion constant yields a zero discount rather than a division
    /// by zero.
    pub fn analyze(&self, property: &Property) -> DistressedAnalysis {
        let normalized = normalize(&property.location);
        let market_rate = self.table.rate_for(last_segment(&normalized));

        let square_meters = match property.square_meters {
            Some(sqm) if sqm != 0 => Decimal::from(sqm),
            _ => Decimal::ONE,
        };

        let price_in_unit = if property.currency.trim().eq_ignore_ascii_case(&self.unit_currency) {
            Some(property.price)
        } else if self.local_per_unit > Decimal::ZERO {
            property.price.checked_div(self.local_per_unit)
        } else {
            None
        };
        let property_rate = price_in_unit.and_then(|price| price.checked_div(square_meters));

        // No usable rate for the property means no evidence of a discount
        let discount = property_rate.map_or(Decimal::ZERO, |rate| discount_pct(market_rate, rate));

        DistressedAnalysis {
            is_distressed: discount > self.threshold_pct,
            estimated_discount: round_half_up(discount),
            market_value: market_rate
                .checked_mul(square_meters)
                .unwrap_or(Decimal::MAX),
            market_rate,
            property_rate: property_rate.unwrap_or(Decimal::ZERO),
        }
    }
}

impl Default for DistressedAnalyzer {
    fn default() -> Self {
        Self::new(
            MarketRateTable::default(),
            "UF",
            Decimal::from(38_000),
            Decimal::from(15),
        )
    }
}

/// (market - own) / market * 100, saturating on overflow
fn discount_pct(market_rate: Decimal, property_rate: Decimal) -> Decimal {
    if market_rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    market_rate
        .checked_sub(property_rate)
        .and_then(|gap| gap.checked_div(market_rate))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::MIN)
}

/// Round to the nearest integer, halves toward positive infinity
fn round_half_up(value: Decimal) -> i32 {
    let rounded = value
        .checked_add(Decimal::new(5, 1))
        .unwrap_or(value)
        .floor();
    rounded.to_i32().unwrap_or(if rounded.is_sign_negative() {
        i32::MIN
    } else {
        i32::MAX
    })
}
