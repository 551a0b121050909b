use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monetary amount in USD unless stated otherwise. Never rounded by the engine.
pub type Money = Decimal;

/// Tax rate as a fraction (0.4274 = 42.74%).
pub type Rate = Decimal;

/// USD to INR conversion rate.
///
/// The engine works in USD only; the rate is applied by whoever displays a
/// value, exactly once per displayed amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRate(pub Decimal);

impl ExchangeRate {
    pub fn to_inr(&self, usd: Money) -> Money {
        usd * self.0
    }

    pub fn dual(&self, usd: Money) -> DualAmount {
        DualAmount {
            usd,
            inr: self.to_inr(usd),
        }
    }
}

/// A USD amount paired with its INR equivalent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DualAmount {
    pub usd: Money,
    pub inr: Money,
}

impl std::fmt::Display for DualAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", format_usd(self.usd), format_inr(self.inr))
    }
}

pub fn format_usd(amount: Money) -> String {
    if amount < Decimal::ZERO {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

pub fn format_inr(amount: Money) -> String {
    let rounded = amount.round_dp(0);
    if rounded < Decimal::ZERO {
        format!("-₹{}", rounded.abs())
    } else {
        format!("₹{}", rounded)
    }
}
