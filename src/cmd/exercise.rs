//! Exercise command - cost of exercising and holding, per strike and quantity

use super::display::{self, format_strike, Cells};
use super::{unexpected, Output, ScenarioArgs};
use esopc::core::{ExerciseOnlyRow, Money, Report, StrategyReport};
use esopc::input::ExerciseForm;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct ExerciseCommand {
    #[command(flatten)]
    form: ExerciseForm,

    #[command(flatten)]
    args: ScenarioArgs,
}

impl ExerciseCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let report = match self.args.evaluate(&self.form)? {
            Report::ExerciseOnly(report) => report,
            other => return Err(unexpected(&other)),
        };
        log::info!(
            "{}: {} strike price(s), {} quantities",
            report.strategy,
            report.tables.len(),
            report.ranking.len()
        );

        match self.args.output() {
            Output::Json => display::print_json(&Report::ExerciseOnly(report)),
            Output::Csv => display::write_csv(&rows(&report, Cells::Plain)),
            Output::Table => {
                print_tables(&report);
                Ok(())
            }
        }
    }
}

fn print_tables(report: &StrategyReport<ExerciseOnlyRow>) {
    let cells = Cells::Dual(report.exchange_rate);
    display::print_heading(report.strategy.display(), report.exchange_rate);

    for table in &report.tables {
        println!(
            "Strike {} | Perquisite per share {}",
            format_strike(table.strike_price),
            cells.money(table.perquisite_per_share)
        );
        let rows: Vec<_> = table
            .rows
            .iter()
            .map(|row| ExerciseRow::new(table.strike_price, row, cells))
            .collect();
        display::print_table(&rows);
        println!();
    }

    display::print_ranking("Lowest net cost by quantity", &report.ranking, cells);
}

fn rows(report: &StrategyReport<ExerciseOnlyRow>, cells: Cells) -> Vec<ExerciseRow> {
    report
        .tables
        .iter()
        .flat_map(|table| {
            table
                .rows
                .iter()
                .map(move |row| ExerciseRow::new(table.strike_price, row, cells))
        })
        .collect()
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct ExerciseRow {
    #[tabled(skip)]
    strike_price: String,

    #[tabled(rename = "Quantity")]
    quantity: u32,

    #[tabled(rename = "Exercise Amount")]
    exercise_amount: String,

    #[tabled(rename = "Tax @ High Rate")]
    tax_at_high_rate: String,

    #[tabled(rename = "Company Deducts")]
    total_company_deducts: String,

    #[tabled(rename = "Tax @ Actual Rate")]
    tax_at_actual_rate: String,

    #[tabled(rename = "Refund")]
    tax_refund: String,

    #[tabled(rename = "Net Cost")]
    net_cost_after_refund: String,
}

impl ExerciseRow {
    fn new(strike_price: Money, row: &ExerciseOnlyRow, cells: Cells) -> Self {
        ExerciseRow {
            strike_price: strike_price.normalize().to_string(),
            quantity: row.quantity,
            exercise_amount: cells.money(row.exercise_amount),
            tax_at_high_rate: cells.money(row.tax_at_high_rate),
            total_company_deducts: cells.money(row.total_company_deducts),
            tax_at_actual_rate: cells.money(row.tax_at_actual_rate),
            tax_refund: cells.money(row.tax_refund),
            net_cost_after_refund: cells.money(row.net_cost_after_refund),
        }
    }
}
