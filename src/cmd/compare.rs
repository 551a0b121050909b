//! Compare command - same-day sale of options against exercising and holding shares

use super::display::{self, format_strike, Cells};
use super::{unexpected, Output, ScenarioArgs};
use clap::Args;
use esopc::core::{
    ComparisonReport, ComparisonRow, Money, PerShareSummary, Report, Route, RouteComparison,
};
use esopc::input::ComparisonForm;
use serde::Serialize;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct CompareCommand {
    #[command(flatten)]
    form: ComparisonForm,

    #[command(flatten)]
    args: ScenarioArgs,

    /// Also print the legs each route is built from
    #[arg(long)]
    detail: bool,
}

impl CompareCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let report = match self.args.evaluate(&self.form)? {
            Report::Comparison(report) => report,
            other => return Err(unexpected(&other)),
        };
        let shares_better = report
            .comparisons
            .iter()
            .flat_map(|c| &c.rows)
            .filter(|row| row.better == Route::Shares)
            .count();
        log::info!(
            "Options vs Shares: shares better in {} of {} rows",
            shares_better,
            report.comparisons.iter().map(|c| c.rows.len()).sum::<usize>()
        );

        match self.args.output() {
            Output::Json => display::print_json(&Report::Comparison(report)),
            Output::Csv => {
                let rows: Vec<_> = report
                    .comparisons
                    .iter()
                    .flat_map(|c| {
                        c.rows
                            .iter()
                            .map(move |row| ComparisonTableRow::new(c.summary.strike_price, row, Cells::Plain))
                    })
                    .collect();
                display::write_csv(&rows)
            }
            Output::Table => {
                self.print_tables(&report);
                Ok(())
            }
        }
    }

    fn print_tables(&self, report: &ComparisonReport) {
        let cells = Cells::Dual(report.exchange_rate);
        display::print_heading("Options vs Shares", report.exchange_rate);

        for comparison in &report.comparisons {
            print_summary(&comparison.summary, cells);
            if self.detail {
                print_legs(comparison, cells);
            }

            let rows: Vec<_> = comparison
                .rows
                .iter()
                .map(|row| ComparisonTableRow::new(comparison.summary.strike_price, row, cells))
                .collect();
            display::print_table(&rows);
            println!();
        }
    }
}

fn print_summary(summary: &PerShareSummary, cells: Cells) {
    let events = &summary.tax_events;
    println!("Strike {}", format_strike(summary.strike_price));
    println!(
        "  Gain per share: {} | FMV gain per share: {}",
        cells.money(summary.gain_per_share),
        cells.money(summary.fmv_gain)
    );
    println!(
        "  Perquisite tax per share: {} withheld, {} actual",
        cells.money(events.perquisite_tax_high),
        cells.money(events.perquisite_tax_actual)
    );
    println!(
        "  Per share: ST gains tax {} | LTCG tax {} | Direct sale tax {}",
        cells.money(events.short_term_cg_tax),
        cells.money(events.long_term_cg_tax),
        cells.money(events.direct_sale_tax)
    );
    println!();
}

fn print_legs(comparison: &RouteComparison, cells: Cells) {
    let legs: Vec<_> = comparison
        .vested
        .iter()
        .zip(&comparison.exercised)
        .zip(&comparison.exercise)
        .map(|((vested, shares), exercise)| LegRow {
            quantity: vested.quantity,
            exercise_cost: cells.money(vested.exercise_cost),
            company_deducts: cells.money(vested.company_deducts),
            option_remains: cells.money(vested.final_remains),
            option_refund: cells.money(vested.tax_refund),
            share_proceeds: cells.money(shares.sell_proceeds),
            share_ltcg: cells.money(shares.ltcg_tax),
            share_remains: cells.money(shares.final_remains),
            exercise_refund: cells.money(exercise.tax_refund),
        })
        .collect();
    display::print_table(&legs);
    println!();
}

#[derive(Debug, Clone, Tabled)]
struct LegRow {
    #[tabled(rename = "Quantity")]
    quantity: u32,

    #[tabled(rename = "Exercise Cost")]
    exercise_cost: String,

    #[tabled(rename = "Company Deducts")]
    company_deducts: String,

    #[tabled(rename = "Options Remain")]
    option_remains: String,

    #[tabled(rename = "Options Refund")]
    option_refund: String,

    #[tabled(rename = "Share Proceeds")]
    share_proceeds: String,

    #[tabled(rename = "LTCG Tax")]
    share_ltcg: String,

    #[tabled(rename = "Shares Remain")]
    share_remains: String,

    #[tabled(rename = "Exercise Refund")]
    exercise_refund: String,
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct ComparisonTableRow {
    #[tabled(skip)]
    strike_price: String,

    #[tabled(rename = "Quantity")]
    quantity: u32,

    #[tabled(rename = "Options (Same-Day)")]
    option_sale_final: String,

    #[tabled(rename = "Shares (LTCG)")]
    share_sale_final: String,

    #[tabled(rename = "Exercise Cost")]
    exercise_cost: String,

    #[tabled(rename = "Net Options")]
    net_options: String,

    #[tabled(rename = "Net Shares")]
    net_shares: String,

    #[tabled(rename = "Difference")]
    difference: String,

    #[tabled(rename = "Better")]
    better: String,
}

impl ComparisonTableRow {
    fn new(strike_price: Money, row: &ComparisonRow, cells: Cells) -> Self {
        // terminal tables show the gap, CSV keeps the sign
        let difference = match cells {
            Cells::Dual(_) => row.margin(),
            Cells::Plain => row.difference,
        };
        ComparisonTableRow {
            strike_price: strike_price.normalize().to_string(),
            quantity: row.quantity,
            option_sale_final: cells.money(row.option_sale_final),
            share_sale_final: cells.money(row.share_sale_final),
            exercise_cost: cells.money(row.exercise_cost),
            net_options: cells.money(row.net_options),
            net_shares: cells.money(row.net_shares),
            difference: cells.money(difference),
            better: row.better.to_string(),
        }
    }
}
