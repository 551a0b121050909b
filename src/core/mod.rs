pub mod money;
pub mod quantities;
pub mod ranking;
pub mod scenario;
pub mod strategy;
pub mod tax_events;

// Flat public surface for domain types and functions.
pub use money::{format_inr, format_usd, DualAmount, ExchangeRate, Money, Rate};
pub use quantities::{QuantitySchedule, ScheduleError};
pub use ranking::{
    compare_routes, rank_strikes, select_best, Candidate, ComparisonRow, Objective, Route,
    StrikeRanking,
};
pub use scenario::{
    ComparisonReport, Report, RouteComparison, Scenario, Strategy, StrategyReport, StrikeTable,
};
pub use strategy::{
    exercise_only, exercised_shares, long_term_sale, vested_same_day, ExerciseOnlyRow,
    ExercisedSharesRow, LongTermRow, LongTermTerms, StrategyRow, VestedRow,
};
pub use tax_events::{MarketInputs, PerShareSummary, TaxEventBundle};
