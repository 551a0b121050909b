use super::money::{ExchangeRate, Money};
use super::quantities::QuantitySchedule;
use super::ranking::{compare_routes, rank_strikes, ComparisonRow, Objective, StrikeRanking};
use super::strategy::{
    exercise_only, exercised_shares, long_term_sale, vested_same_day, ExerciseOnlyRow,
    ExercisedSharesRow, LongTermRow, LongTermTerms, StrategyRow, VestedRow,
};
use super::tax_events::{MarketInputs, PerShareSummary, TaxEventBundle};
use serde::Serialize;

/// The exercise/sale strategies a scenario can be evaluated under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Strategy {
    ExerciseOnly,
    /// Exercise and sell to the company's buy-back on the same day
    VestedSameDay,
    LongTerm,
    /// Same-day sale against exercise-and-hold
    Comparison,
}

impl Strategy {
    /// How strike prices are ranked; the comparison ranks routes instead
    pub fn objective(&self) -> Option<Objective> {
        match self {
            Strategy::ExerciseOnly => Some(Objective::Minimize),
            Strategy::VestedSameDay | Strategy::LongTerm => Some(Objective::Maximize),
            Strategy::Comparison => None,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            Strategy::ExerciseOnly => "Exercise Only",
            Strategy::VestedSameDay => "Vested Options (Same-Day Sale)",
            Strategy::LongTerm => "Long Term Sale",
            Strategy::Comparison => "Options vs Shares",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Rows for one strike price
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrikeTable<R> {
    pub strike_price: Money,
    /// FMV (or buy-back, or FMV at exercise) less strike
    pub perquisite_per_share: Money,
    /// Long-term gain per share, for long-term sales only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ltcg_per_share: Option<Money>,
    pub rows: Vec<R>,
}

/// Per-strike tables of a single strategy plus the per-quantity ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyReport<R> {
    pub strategy: Strategy,
    pub exchange_rate: ExchangeRate,
    pub ranking: Vec<StrikeRanking>,
    pub tables: Vec<StrikeTable<R>>,
}

/// Options-vs-shares breakdown for one strike price
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteComparison {
    pub summary: PerShareSummary,
    pub vested: Vec<VestedRow>,
    pub exercised: Vec<ExercisedSharesRow>,
    pub exercise: Vec<ExerciseOnlyRow>,
    pub rows: Vec<ComparisonRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    pub exchange_rate: ExchangeRate,
    pub comparisons: Vec<RouteComparison>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", content = "report")]
pub enum Report {
    ExerciseOnly(StrategyReport<ExerciseOnlyRow>),
    VestedSameDay(StrategyReport<VestedRow>),
    LongTerm(StrategyReport<LongTermRow>),
    Comparison(ComparisonReport),
}

impl Report {
    pub fn strategy(&self) -> Strategy {
        match self {
            Report::ExerciseOnly(r) => r.strategy,
            Report::VestedSameDay(r) => r.strategy,
            Report::LongTerm(r) => r.strategy,
            Report::Comparison(_) => Strategy::Comparison,
        }
    }
}

/// A strategy together with the inputs to run it on.
///
/// For [`Strategy::VestedSameDay`] `market.sell_price` is the buy-back
/// price, which also stands in for the withholding FMV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub strategy: Strategy,
    pub market: MarketInputs,
}

impl Scenario {
    pub fn new(strategy: Strategy, market: MarketInputs) -> Self {
        Scenario { strategy, market }
    }

    /// Rebuilds every table from scratch; the result depends only on `self`
    /// and `schedule`.
    pub fn evaluate(&self, schedule: &QuantitySchedule) -> Report {
        log::debug!(
            "Evaluating {} for {} strike price(s) x {} quantities",
            self.strategy,
            self.market.strike_prices.len(),
            schedule.len()
        );
        match self.strategy {
            Strategy::ExerciseOnly => Report::ExerciseOnly(self.exercise_only(schedule)),
            Strategy::VestedSameDay => Report::VestedSameDay(self.vested_same_day(schedule)),
            Strategy::LongTerm => Report::LongTerm(self.long_term(schedule)),
            Strategy::Comparison => Report::Comparison(self.comparison(schedule)),
        }
    }

    fn exercise_only(&self, schedule: &QuantitySchedule) -> StrategyReport<ExerciseOnlyRow> {
        let market = &self.market;
        let tables = self.tables(|strike_price| {
            let events = TaxEventBundle::calculate(market, strike_price);
            StrikeTable {
                strike_price,
                perquisite_per_share: market.fmv_price - strike_price,
                ltcg_per_share: None,
                rows: schedule
                    .iter()
                    .map(|n| exercise_only(n, strike_price, &events))
                    .collect(),
            }
        });
        self.report(tables)
    }

    fn vested_same_day(&self, schedule: &QuantitySchedule) -> StrategyReport<VestedRow> {
        let buy_back = self.market.sell_price;
        let market = MarketInputs {
            fmv_price: buy_back,
            ..self.market.clone()
        };
        let tables = self.tables(|strike_price| {
            let events = TaxEventBundle::calculate(&market, strike_price);
            StrikeTable {
                strike_price,
                perquisite_per_share: buy_back - strike_price,
                ltcg_per_share: None,
                rows: schedule
                    .iter()
                    .map(|n| vested_same_day(n, strike_price, buy_back, &events))
                    .collect(),
            }
        });
        self.report(tables)
    }

    fn long_term(&self, schedule: &QuantitySchedule) -> StrategyReport<LongTermRow> {
        let market = &self.market;
        let tables = self.tables(|strike_price| {
            let terms = LongTermTerms {
                strike_price,
                fmv_at_exercise: market.fmv_at_exercise,
                sell_price: market.sell_price,
                short_term_tax_high: market.short_term_tax_high,
                short_term_tax_actual: market.short_term_tax_actual,
                long_term_tax: market.long_term_tax,
            };
            StrikeTable {
                strike_price,
                perquisite_per_share: market.fmv_at_exercise - strike_price,
                ltcg_per_share: Some(market.sell_price - market.fmv_at_exercise),
                rows: schedule.iter().map(|n| long_term_sale(n, &terms)).collect(),
            }
        });
        self.report(tables)
    }

    fn comparison(&self, schedule: &QuantitySchedule) -> ComparisonReport {
        let market = &self.market;
        let comparisons = market
            .strike_prices
            .iter()
            .map(|&strike_price| {
                let events = TaxEventBundle::calculate(market, strike_price);
                let vested: Vec<_> = schedule
                    .iter()
                    .map(|n| vested_same_day(n, strike_price, market.sell_price, &events))
                    .collect();
                let exercised: Vec<_> = schedule
                    .iter()
                    .map(|n| exercised_shares(n, market.sell_price, &events))
                    .collect();
                let exercise: Vec<_> = schedule
                    .iter()
                    .map(|n| exercise_only(n, strike_price, &events))
                    .collect();
                let rows = vested
                    .iter()
                    .zip(&exercised)
                    .zip(&exercise)
                    .map(|((v, s), e)| compare_routes(v, s, e))
                    .collect();
                RouteComparison {
                    summary: PerShareSummary::new(market, strike_price),
                    vested,
                    exercised,
                    exercise,
                    rows,
                }
            })
            .collect();

        ComparisonReport {
            exchange_rate: market.exchange_rate,
            comparisons,
        }
    }

    fn tables<R, F>(&self, table_for: F) -> Vec<StrikeTable<R>>
    where
        F: Fn(Money) -> StrikeTable<R>,
    {
        self.market
            .strike_prices
            .iter()
            .map(|&strike_price| table_for(strike_price))
            .collect()
    }

    fn report<R: StrategyRow>(&self, tables: Vec<StrikeTable<R>>) -> StrategyReport<R> {
        let ranking = match self.strategy.objective() {
            Some(objective) => {
                let views: Vec<(Money, &[R])> = tables
                    .iter()
                    .map(|t| (t.strike_price, t.rows.as_slice()))
                    .collect();
                rank_strikes(&views, objective)
            }
            None => Vec::new(),
        };
        StrategyReport {
            strategy: self.strategy,
            exchange_rate: self.market.exchange_rate,
            ranking,
            tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn exercise_market(strikes: Vec<Money>) -> MarketInputs {
        MarketInputs {
            strike_prices: strikes,
            fmv_price: dec!(10),
            exchange_rate: ExchangeRate(dec!(83)),
            short_term_tax_high: dec!(0.4274),
            short_term_tax_actual: dec!(0.30),
            ..MarketInputs::default()
        }
    }

    #[test]
    fn exercise_only_report_shape() {
        let scenario = Scenario::new(
            Strategy::ExerciseOnly,
            exercise_market(vec![dec!(0.133), dec!(1)]),
        );
        let Report::ExerciseOnly(report) = scenario.evaluate(&QuantitySchedule::default()) else {
            panic!("expected exercise-only report");
        };

        assert_eq!(report.tables.len(), 2);
        assert_eq!(report.ranking.len(), 19);
        let first = &report.tables[0];
        assert_eq!(first.perquisite_per_share, dec!(9.867));
        assert_eq!(first.rows.len(), 19);
        assert_eq!(first.rows[0].quantity, 1000);
        assert_eq!(first.rows[0].net_cost_after_refund, dec!(3093.1));
        assert_eq!(first.rows[18].quantity, 10_000);

        // a lower strike always costs less to exercise
        assert!(report
            .ranking
            .iter()
            .all(|r| r.best.map(|c| c.strike_price) == Some(dec!(0.133))));
    }

    #[test]
    fn duplicate_strikes_pick_first() {
        let scenario = Scenario::new(
            Strategy::ExerciseOnly,
            exercise_market(vec![dec!(0.5), dec!(0.50)]),
        );
        let Report::ExerciseOnly(report) = scenario.evaluate(&QuantitySchedule::default()) else {
            panic!("expected exercise-only report");
        };
        let best = report.ranking[0].best.unwrap();
        assert_eq!(report.ranking[0].candidates[0], best);
    }

    #[test]
    fn vested_uses_buy_back_as_fmv_and_sale() {
        let market = MarketInputs {
            strike_prices: vec![dec!(1), dec!(2)],
            // stale FMV is ignored in favour of the buy-back price
            fmv_price: dec!(3),
            sell_price: dec!(5),
            exchange_rate: ExchangeRate(dec!(83)),
            short_term_tax_high: dec!(0.4274),
            short_term_tax_actual: dec!(0.30),
            ..MarketInputs::default()
        };
        let scenario = Scenario::new(Strategy::VestedSameDay, market);
        let Report::VestedSameDay(report) = scenario.evaluate(&QuantitySchedule::default()) else {
            panic!("expected vested report");
        };

        let row = &report.tables[0].rows[0];
        assert_eq!(report.tables[0].perquisite_per_share, dec!(4));
        assert_eq!(row.tax_event_1, dec!(1709.6));
        assert_eq!(row.transfer_to_account, dec!(2290.4));
        assert!(report
            .tables
            .iter()
            .flat_map(|t| &t.rows)
            .all(|r| r.tax_event_2_short == Decimal::ZERO));
        // lower strike leaves more after the sale
        assert_eq!(report.ranking[0].best.map(|c| c.strike_price), Some(dec!(1)));
    }

    #[test]
    fn long_term_table_headers() {
        let market = MarketInputs {
            strike_prices: vec![dec!(1)],
            fmv_at_exercise: dec!(8),
            sell_price: dec!(20),
            short_term_tax_high: dec!(0.4274),
            short_term_tax_actual: dec!(0.3),
            long_term_tax: dec!(0.125),
            ..MarketInputs::default()
        };
        let scenario = Scenario::new(Strategy::LongTerm, market);
        let Report::LongTerm(report) = scenario.evaluate(&QuantitySchedule::default()) else {
            panic!("expected long-term report");
        };

        assert_eq!(report.tables[0].perquisite_per_share, dec!(7));
        assert_eq!(report.tables[0].ltcg_per_share, Some(dec!(12)));
        assert_eq!(report.tables[0].rows[0].net_profit, dec!(15400));
        assert_eq!(report.ranking[0].best.map(|c| c.value), Some(dec!(15400)));
    }

    #[test]
    fn comparison_routes() {
        let market = MarketInputs {
            strike_prices: vec![dec!(1)],
            fmv_price: dec!(10),
            fmv_at_exercise: dec!(10),
            sell_price: dec!(12),
            exchange_rate: ExchangeRate(dec!(83)),
            short_term_tax_high: dec!(0.4),
            short_term_tax_actual: dec!(0.3),
            long_term_tax: dec!(0.125),
        };
        let scenario = Scenario::new(Strategy::Comparison, market);
        let schedule = QuantitySchedule::new(vec![1000]).unwrap();
        let Report::Comparison(report) = scenario.evaluate(&schedule) else {
            panic!("expected comparison report");
        };

        let comparison = &report.comparisons[0];
        let row = &comparison.rows[0];
        // same day: 12000 - (1000 + 3600) - 800 + 900
        assert_eq!(row.net_options, dec!(7500));
        // hold: 12000 - 250 - (1000 + 3600 - 900)
        assert_eq!(row.net_shares, dec!(8050));
        assert_eq!(row.difference, dec!(550));
        assert_eq!(row.better, crate::core::ranking::Route::Shares);
        assert_eq!(comparison.summary.gain_per_share, dec!(11));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let scenario = Scenario::new(
            Strategy::ExerciseOnly,
            exercise_market(vec![dec!(0.133), dec!(0.5), dec!(2)]),
        );
        let schedule = QuantitySchedule::default();
        assert_eq!(scenario.evaluate(&schedule), scenario.evaluate(&schedule));
    }

    #[test]
    fn alternative_schedule() {
        let scenario = Scenario::new(Strategy::ExerciseOnly, exercise_market(vec![dec!(0.133)]));
        let schedule = QuantitySchedule::new(vec![1, 10]).unwrap();
        let Report::ExerciseOnly(report) = scenario.evaluate(&schedule) else {
            panic!("expected exercise-only report");
        };
        let quantities: Vec<_> = report.tables[0].rows.iter().map(|r| r.quantity).collect();
        assert_eq!(quantities, vec![1, 10]);
        assert_eq!(report.strategy, Strategy::ExerciseOnly);
    }

    #[test]
    fn comparison_has_no_strike_ranking() {
        assert_eq!(Strategy::Comparison.objective(), None);
        assert_eq!(Strategy::ExerciseOnly.objective(), Some(Objective::Minimize));
        assert_eq!(Strategy::LongTerm.objective(), Some(Objective::Maximize));
    }
}
