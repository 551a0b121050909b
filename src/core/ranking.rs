use super::money::Money;
use super::strategy::{ExerciseOnlyRow, ExercisedSharesRow, StrategyRow, VestedRow};
use serde::Serialize;

/// Whether a lower or higher headline figure is better
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Objective {
    Minimize,
    Maximize,
}

impl Objective {
    fn improves(self, candidate: Money, current: Money) -> bool {
        match self {
            Objective::Minimize => candidate < current,
            Objective::Maximize => candidate > current,
        }
    }
}

/// One strike price's headline figure for a given quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub strike_price: Money,
    pub value: Money,
}

/// Best candidate, scanning left to right. Only a strict improvement
/// replaces the current pick, so the earliest of equal values is kept.
pub fn select_best<I>(candidates: I, objective: Objective) -> Option<Candidate>
where
    I: IntoIterator<Item = Candidate>,
{
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(current) if !objective.improves(candidate.value, current.value) => Some(current),
        _ => Some(candidate),
    })
}

/// Headline figures of every strike price at one quantity, with the winner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrikeRanking {
    pub quantity: u32,
    pub candidates: Vec<Candidate>,
    pub best: Option<Candidate>,
}

/// Ranks strike prices per quantity.
///
/// `tables` holds, for each strike price in input order, its rows in
/// schedule order; every table must have the same quantities.
pub fn rank_strikes<R: StrategyRow>(tables: &[(Money, &[R])], objective: Objective) -> Vec<StrikeRanking> {
    let Some((_, first)) = tables.first() else {
        return Vec::new();
    };

    first
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let candidates: Vec<_> = tables
                .iter()
                .filter_map(|(strike_price, rows)| {
                    rows.get(i).map(|r| Candidate {
                        strike_price: *strike_price,
                        value: r.headline(),
                    })
                })
                .collect();
            let best = select_best(candidates.iter().copied(), objective);
            StrikeRanking {
                quantity: row.quantity(),
                candidates,
                best,
            }
        })
        .collect()
}

/// Which route the cross-strategy comparison favours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    /// Exercise, hold and sell under long-term treatment
    Shares,
    /// Exercise and sell the same day
    Options,
}

impl Route {
    pub fn display(&self) -> &'static str {
        match self {
            Route::Shares => "Shares (LTCG)",
            Route::Options => "Options (Same-Day)",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Same-day sale against exercise-and-hold for one quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub quantity: u32,
    /// Final amount of the same-day sale
    pub option_sale_final: Money,
    /// Final amount of selling the held shares
    pub share_sale_final: Money,
    /// Net cost of exercising the shares that are held
    pub exercise_cost: Money,
    pub net_options: Money,
    pub net_shares: Money,
    /// `net_shares - net_options`, signed
    pub difference: Money,
    pub better: Route,
}

impl ComparisonRow {
    /// Unsigned gap between the two routes
    pub fn margin(&self) -> Money {
        self.difference.abs()
    }
}

/// Shares win only on a strictly positive difference; a tie goes to options.
pub fn compare_routes(
    vested: &VestedRow,
    exercised: &ExercisedSharesRow,
    exercise: &ExerciseOnlyRow,
) -> ComparisonRow {
    let net_options = vested.final_amount;
    let net_shares = exercised.final_remains - exercise.net_cost_after_refund;
    let difference = net_shares - net_options;
    let better = if difference > Money::ZERO {
        Route::Shares
    } else {
        Route::Options
    };

    ComparisonRow {
        quantity: vested.quantity,
        option_sale_final: vested.final_amount,
        share_sale_final: exercised.final_remains,
        exercise_cost: exercise.net_cost_after_refund,
        net_options,
        net_shares,
        difference,
        better,
    }
}
