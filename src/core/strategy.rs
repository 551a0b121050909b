//! Per-quantity money waterfalls for each exercise/sale strategy.
//!
//! Every function here is pure: a row depends only on its arguments, and
//! all amounts scale linearly with the quantity.

use super::money::{Money, Rate};
use super::tax_events::TaxEventBundle;
use rust_decimal::Decimal;
use serde::Serialize;

/// A result row that can be ranked against rows for other strike prices
pub trait StrategyRow {
    fn quantity(&self) -> u32;

    /// The figure strike prices are compared on
    fn headline(&self) -> Money;
}

/// Exercise now, pay withholding at the high rate, claim the excess back later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExerciseOnlyRow {
    pub quantity: u32,
    pub exercise_amount: Money,
    pub tax_at_high_rate: Money,
    /// Upfront payment: exercise amount plus withholding
    pub total_company_deducts: Money,
    pub tax_at_actual_rate: Money,
    /// Claimed in the tax return
    pub tax_refund: Money,
    pub net_cost_after_refund: Money,
}

pub fn exercise_only(quantity: u32, strike_price: Money, events: &TaxEventBundle) -> ExerciseOnlyRow {
    let n = Decimal::from(quantity);

    let exercise_amount = n * strike_price;
    let tax_at_high_rate = n * events.perquisite_tax_high;
    let tax_at_actual_rate = n * events.perquisite_tax_actual;
    let total_company_deducts = exercise_amount + tax_at_high_rate;
    let tax_refund = tax_at_high_rate - tax_at_actual_rate;

    ExerciseOnlyRow {
        quantity,
        exercise_amount,
        tax_at_high_rate,
        total_company_deducts,
        tax_at_actual_rate,
        tax_refund,
        net_cost_after_refund: total_company_deducts - tax_refund,
    }
}

impl StrategyRow for ExerciseOnlyRow {
    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn headline(&self) -> Money {
        self.net_cost_after_refund
    }
}

/// Exercise and sell the same day: the company nets the exercise cost and
/// withholding out of the sale proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VestedRow {
    pub quantity: u32,
    pub exercise_cost: Money,
    pub sell_proceeds: Money,
    /// Perquisite tax withheld at the high rate
    pub tax_event_1: Money,
    pub tax_at_actual_rate: Money,
    pub company_deducts: Money,
    pub transfer_to_account: Money,
    /// Short-term gains tax on the move from withholding FMV to sale price
    pub tax_event_2_short: Money,
    /// What a plain sale taxed at the high rate would cost, for reference
    pub direct_sale_tax: Money,
    pub final_remains: Money,
    pub tax_refund: Money,
    pub final_amount: Money,
}

pub fn vested_same_day(
    quantity: u32,
    strike_price: Money,
    sell_price: Money,
    events: &TaxEventBundle,
) -> VestedRow {
    let n = Decimal::from(quantity);

    let exercise_cost = n * strike_price;
    let sell_proceeds = n * sell_price;
    let tax_event_1 = n * events.perquisite_tax_high;
    let tax_at_actual_rate = n * events.perquisite_tax_actual;
    let company_deducts = exercise_cost + tax_event_1;
    let transfer_to_account = sell_proceeds - company_deducts;
    let tax_event_2_short = n * events.short_term_cg_tax;
    let final_remains = transfer_to_account - tax_event_2_short;
    let tax_refund = tax_event_1 - tax_at_actual_rate;

    VestedRow {
        quantity,
        exercise_cost,
        sell_proceeds,
        tax_event_1,
        tax_at_actual_rate,
        company_deducts,
        transfer_to_account,
        tax_event_2_short,
        direct_sale_tax: n * events.direct_sale_tax,
        final_remains,
        tax_refund,
        final_amount: final_remains + tax_refund,
    }
}

impl StrategyRow for VestedRow {
    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn headline(&self) -> Money {
        self.final_amount
    }
}

/// Terms of a long-term sale for one strike price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongTermTerms {
    pub strike_price: Money,
    pub fmv_at_exercise: Money,
    pub sell_price: Money,
    pub short_term_tax_high: Rate,
    pub short_term_tax_actual: Rate,
    pub long_term_tax: Rate,
}

/// Exercise now, hold past the long-term threshold, then sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LongTermRow {
    pub quantity: u32,
    pub exercise_amount: Money,
    pub perquisite_tax_high: Money,
    pub perquisite_tax_actual: Money,
    pub total_upfront: Money,
    pub tax_refund: Money,
    pub net_exercise_cost: Money,
    pub sell_proceeds: Money,
    pub ltcg_tax: Money,
    pub net_from_sale: Money,
    pub net_profit: Money,
}

/// The perquisite is scaled by quantity here rather than taken from a
/// [`TaxEventBundle`]; both routes agree exactly.
pub fn long_term_sale(quantity: u32, terms: &LongTermTerms) -> LongTermRow {
    let n = Decimal::from(quantity);
    let perquisite = terms.fmv_at_exercise - terms.strike_price;

    let exercise_amount = n * terms.strike_price;
    let perquisite_tax_high = n * perquisite * terms.short_term_tax_high;
    let perquisite_tax_actual = n * perquisite * terms.short_term_tax_actual;
    let total_upfront = exercise_amount + perquisite_tax_high;
    let tax_refund = perquisite_tax_high - perquisite_tax_actual;
    let net_exercise_cost = total_upfront - tax_refund;

    let sell_proceeds = n * terms.sell_price;
    let ltcg_tax = n * (terms.sell_price - terms.fmv_at_exercise) * terms.long_term_tax;
    let net_from_sale = sell_proceeds - ltcg_tax;

    LongTermRow {
        quantity,
        exercise_amount,
        perquisite_tax_high,
        perquisite_tax_actual,
        total_upfront,
        tax_refund,
        net_exercise_cost,
        sell_proceeds,
        ltcg_tax,
        net_from_sale,
        net_profit: net_from_sale - net_exercise_cost,
    }
}

impl StrategyRow for LongTermRow {
    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn headline(&self) -> Money {
        self.net_profit
    }
}

/// Sale leg of already exercised shares held long-term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExercisedSharesRow {
    pub quantity: u32,
    pub sell_proceeds: Money,
    pub transfer_to_account: Money,
    pub ltcg_tax: Money,
    pub final_remains: Money,
}

pub fn exercised_shares(quantity: u32, sell_price: Money, events: &TaxEventBundle) -> ExercisedSharesRow {
    let n = Decimal::from(quantity);

    let sell_proceeds = n * sell_price;
    let ltcg_tax = n * events.long_term_cg_tax;

    ExercisedSharesRow {
        quantity,
        sell_proceeds,
        transfer_to_account: sell_proceeds,
        ltcg_tax,
        final_remains: sell_proceeds - ltcg_tax,
    }
}

impl StrategyRow for ExercisedSharesRow {
    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn headline(&self) -> Money {
        self.final_remains
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::money::ExchangeRate;
    use crate::core::tax_events::MarketInputs;
    use rust_decimal_macros::dec;

    fn bundle(strike: Money, fmv: Money, sell: Money, high: Rate, actual: Rate) -> TaxEventBundle {
        let market = MarketInputs {
            strike_prices: vec![strike],
            fmv_price: fmv,
            sell_price: sell,
            fmv_at_exercise: Decimal::ZERO,
            exchange_rate: ExchangeRate(dec!(83)),
            short_term_tax_high: high,
            short_term_tax_actual: actual,
            long_term_tax: Decimal::ZERO,
        };
        TaxEventBundle::calculate(&market, strike)
    }

    #[test]
    fn exercise_only_worked_example() {
        let events = bundle(dec!(0.133), dec!(10), Decimal::ZERO, dec!(0.4274), dec!(0.30));
        let row = exercise_only(1000, dec!(0.133), &events);

        assert_eq!(row.exercise_amount, dec!(133));
        assert_eq!(row.tax_at_high_rate, dec!(4217.1558));
        assert_eq!(row.total_company_deducts, dec!(4350.1558));
        assert_eq!(row.tax_at_actual_rate, dec!(2960.1));
        assert_eq!(row.tax_refund, dec!(1257.0558));
        assert_eq!(row.net_cost_after_refund, dec!(3093.1));
    }

    #[test]
    fn exercise_only_equal_rates_has_no_refund() {
        let events = bundle(dec!(2), dec!(10), Decimal::ZERO, dec!(0.3), dec!(0.3));
        let row = exercise_only(2500, dec!(2), &events);

        assert_eq!(row.tax_refund, Decimal::ZERO);
        assert_eq!(row.net_cost_after_refund, row.total_company_deducts);
    }

    #[test]
    fn exercise_only_underwater_strike() {
        // strike above FMV: the negative perquisite lowers the upfront payment
        let events = bundle(dec!(12), dec!(10), Decimal::ZERO, dec!(0.4), dec!(0.3));
        let row = exercise_only(1000, dec!(12), &events);

        assert_eq!(row.tax_at_high_rate, dec!(-800));
        assert_eq!(row.total_company_deducts, dec!(11200));
        assert_eq!(row.tax_refund, dec!(-200));
        assert_eq!(row.net_cost_after_refund, dec!(11400));
    }

    #[test]
    fn vested_buy_back_worked_example() {
        let events = bundle(dec!(1), dec!(5), dec!(5), dec!(0.4274), dec!(0.30));
        let row = vested_same_day(1000, dec!(1), dec!(5), &events);

        assert_eq!(row.exercise_cost, dec!(1000));
        assert_eq!(row.tax_event_1, dec!(1709.6));
        assert_eq!(row.company_deducts, dec!(2709.6));
        assert_eq!(row.sell_proceeds, dec!(5000));
        assert_eq!(row.transfer_to_account, dec!(2290.4));
        assert_eq!(row.tax_event_2_short, Decimal::ZERO);
        assert_eq!(row.tax_at_actual_rate, dec!(1200));
        assert_eq!(row.tax_refund, dec!(509.6));
        assert_eq!(row.final_amount, row.transfer_to_account + row.tax_refund);
        assert_eq!(row.final_amount, dec!(2800));
    }

    #[test]
    fn vested_sale_above_fmv_pays_short_term_tax() {
        let events = bundle(dec!(1), dec!(5), dec!(6), dec!(0.4), dec!(0.3));
        let row = vested_same_day(1000, dec!(1), dec!(6), &events);

        assert_eq!(row.tax_event_2_short, dec!(400));
        assert_eq!(row.direct_sale_tax, dec!(2000));
        assert_eq!(row.final_remains, row.transfer_to_account - dec!(400));
        assert_eq!(row.final_amount, row.final_remains + row.tax_refund);
    }

    fn long_term_terms(strike: Money) -> LongTermTerms {
        LongTermTerms {
            strike_price: strike,
            fmv_at_exercise: dec!(8),
            sell_price: dec!(20),
            short_term_tax_high: dec!(0.4274),
            short_term_tax_actual: dec!(0.3),
            long_term_tax: dec!(0.125),
        }
    }

    #[test]
    fn long_term_sale_waterfall() {
        let row = long_term_sale(1000, &long_term_terms(dec!(1)));

        assert_eq!(row.exercise_amount, dec!(1000));
        assert_eq!(row.perquisite_tax_high, dec!(2991.8));
        assert_eq!(row.perquisite_tax_actual, dec!(2100));
        assert_eq!(row.total_upfront, dec!(3991.8));
        assert_eq!(row.tax_refund, dec!(891.8));
        assert_eq!(row.net_exercise_cost, dec!(3100));
        assert_eq!(row.sell_proceeds, dec!(20000));
        assert_eq!(row.ltcg_tax, dec!(1500));
        assert_eq!(row.net_from_sale, dec!(18500));
        assert_eq!(row.net_profit, dec!(15400));
    }

    #[test]
    fn long_term_matches_bundle_path() {
        let terms = long_term_terms(dec!(0.133));
        let market = MarketInputs {
            strike_prices: vec![terms.strike_price],
            fmv_price: terms.fmv_at_exercise,
            sell_price: terms.sell_price,
            fmv_at_exercise: terms.fmv_at_exercise,
            exchange_rate: ExchangeRate::default(),
            short_term_tax_high: terms.short_term_tax_high,
            short_term_tax_actual: terms.short_term_tax_actual,
            long_term_tax: terms.long_term_tax,
        };
        let events = TaxEventBundle::calculate(&market, terms.strike_price);

        for quantity in [1, 1000, 7500, 10_000] {
            let n = Decimal::from(quantity);
            let row = long_term_sale(quantity, &terms);
            assert_eq!(row.perquisite_tax_high, n * events.perquisite_tax_high);
            assert_eq!(row.perquisite_tax_actual, n * events.perquisite_tax_actual);
            assert_eq!(row.ltcg_tax, n * events.long_term_cg_tax);
        }
    }

    #[test]
    fn exercised_shares_deducts_ltcg() {
        let events = TaxEventBundle {
            long_term_cg_tax: dec!(1.5),
            ..TaxEventBundle::default()
        };
        let row = exercised_shares(2000, dec!(20), &events);

        assert_eq!(row.sell_proceeds, dec!(40000));
        assert_eq!(row.transfer_to_account, dec!(40000));
        assert_eq!(row.ltcg_tax, dec!(3000));
        assert_eq!(row.final_remains, dec!(37000));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn price() -> impl Strategy<Value = Decimal> {
            (0i64..5_000_000).prop_map(|c| Decimal::new(c, 3))
        }

        fn rate() -> impl Strategy<Value = Decimal> {
            (0i64..=10_000).prop_map(|bp| Decimal::new(bp, 4))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn exercise_only_scales_with_quantity(
                strike in price(), fmv in price(), high in rate(), actual in rate(), n in 1u32..50_000
            ) {
                let events = bundle(strike, fmv, Decimal::ZERO, high, actual);
                let single = exercise_only(n, strike, &events);
                let double = exercise_only(2 * n, strike, &events);
                let two = dec!(2);
                prop_assert_eq!(double.exercise_amount, two * single.exercise_amount);
                prop_assert_eq!(double.total_company_deducts, two * single.total_company_deducts);
                prop_assert_eq!(double.tax_refund, two * single.tax_refund);
                prop_assert_eq!(double.net_cost_after_refund, two * single.net_cost_after_refund);
            }

            #[test]
            fn vested_scales_with_quantity(
                strike in price(), fmv in price(), sell in price(), high in rate(), actual in rate(),
                n in 1u32..50_000
            ) {
                let events = bundle(strike, fmv, sell, high, actual);
                let single = vested_same_day(n, strike, sell, &events);
                let double = vested_same_day(2 * n, strike, sell, &events);
                let two = dec!(2);
                prop_assert_eq!(double.transfer_to_account, two * single.transfer_to_account);
                prop_assert_eq!(double.tax_event_2_short, two * single.tax_event_2_short);
                prop_assert_eq!(double.final_amount, two * single.final_amount);
            }

            #[test]
            fn long_term_scales_with_quantity(
                strike in price(), fmv in price(), sell in price(), high in rate(), actual in rate(),
                lt in rate(), n in 1u32..50_000
            ) {
                let terms = LongTermTerms {
                    strike_price: strike,
                    fmv_at_exercise: fmv,
                    sell_price: sell,
                    short_term_tax_high: high,
                    short_term_tax_actual: actual,
                    long_term_tax: lt,
                };
                let single = long_term_sale(n, &terms);
                let double = long_term_sale(2 * n, &terms);
                let two = dec!(2);
                prop_assert_eq!(double.net_exercise_cost, two * single.net_exercise_cost);
                prop_assert_eq!(double.net_from_sale, two * single.net_from_sale);
                prop_assert_eq!(double.net_profit, two * single.net_profit);
            }

            #[test]
            fn equal_rates_never_refund(strike in price(), fmv in price(), rate in rate(), n in 1u32..50_000) {
                let events = bundle(strike, fmv, Decimal::ZERO, rate, rate);
                let row = exercise_only(n, strike, &events);
                prop_assert_eq!(row.tax_refund, Decimal::ZERO);
                prop_assert_eq!(row.net_cost_after_refund, row.total_company_deducts);
            }

            #[test]
            fn buy_back_has_no_short_term_tax(
                strike in price(), buy_back in price(), high in rate(), actual in rate(), n in 1u32..50_000
            ) {
                let events = bundle(strike, buy_back, buy_back, high, actual);
                let row = vested_same_day(n, strike, buy_back, &events);
                prop_assert_eq!(row.tax_event_2_short, Decimal::ZERO);
            }
        }
    }
}
