use super::money::{ExchangeRate, Money, Rate};
use rust_decimal::Decimal;
use serde::Serialize;

/// Sanitized market and tax-rate inputs for one strategy run.
///
/// Fields a strategy has no use for are left at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarketInputs {
    /// Candidate strike prices in input order
    pub strike_prices: Vec<Money>,
    /// Fair market value used for perquisite withholding
    pub fmv_price: Money,
    /// Sale (or buy-back) price
    pub sell_price: Money,
    /// Fair market value on the exercise date, the long-term cost basis
    pub fmv_at_exercise: Money,
    pub exchange_rate: ExchangeRate,
    /// Statutory rate the company withholds at
    pub short_term_tax_high: Rate,
    /// Holder's actual marginal rate
    pub short_term_tax_actual: Rate,
    pub long_term_tax: Rate,
}

/// Per-share tax amounts (USD) for a single strike price.
///
/// Negative values are credits and flow through the strategies unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaxEventBundle {
    pub perquisite_tax_high: Money,
    pub perquisite_tax_actual: Money,
    pub short_term_cg_tax: Money,
    pub long_term_cg_tax: Money,
    pub direct_sale_tax: Money,
}

impl TaxEventBundle {
    pub fn calculate(market: &MarketInputs, strike_price: Money) -> Self {
        let perquisite = market.fmv_price - strike_price;
        // selling at the withholding FMV leaves no gain to tax
        let short_term_cg_tax = if market.sell_price == market.fmv_price {
            Decimal::ZERO
        } else {
            (market.sell_price - market.fmv_price) * market.short_term_tax_high
        };

        let bundle = TaxEventBundle {
            perquisite_tax_high: perquisite * market.short_term_tax_high,
            perquisite_tax_actual: perquisite * market.short_term_tax_actual,
            short_term_cg_tax,
            long_term_cg_tax: (market.sell_price - market.fmv_at_exercise) * market.long_term_tax,
            direct_sale_tax: (market.sell_price - strike_price) * market.short_term_tax_high,
        };
        log::debug!("Tax events @ strike {}: {:?}", strike_price, bundle);
        bundle
    }
}

/// Per-share overview shown above the comparison tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerShareSummary {
    pub strike_price: Money,
    pub tax_events: TaxEventBundle,
    /// Sell price less strike
    pub gain_per_share: Money,
    /// FMV less strike, the perquisite
    pub fmv_gain: Money,
}

impl PerShareSummary {
    pub fn new(market: &MarketInputs, strike_price: Money) -> Self {
        PerShareSummary {
            strike_price,
            tax_events: TaxEventBundle::calculate(market, strike_price),
            gain_per_share: market.sell_price - strike_price,
            fmv_gain: market.fmv_price - strike_price,
        }
    }
}
