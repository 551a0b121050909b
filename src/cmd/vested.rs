//! Vested command - exercise and sell to the company buy-back on the same day

use super::display::{self, format_strike, Cells};
use super::{unexpected, Output, ScenarioArgs};
use clap::Args;
use esopc::core::{Money, Report, StrategyReport, VestedRow};
use esopc::input::VestedForm;
use serde::Serialize;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct VestedCommand {
    #[command(flatten)]
    form: VestedForm,

    #[command(flatten)]
    args: ScenarioArgs,
}

impl VestedCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let report = match self.args.evaluate(&self.form)? {
            Report::VestedSameDay(report) => report,
            other => return Err(unexpected(&other)),
        };
        log::info!(
            "{}: {} strike price(s), {} quantities",
            report.strategy,
            report.tables.len(),
            report.ranking.len()
        );

        match self.args.output() {
            Output::Json => display::print_json(&Report::VestedSameDay(report)),
            Output::Csv => {
                let rows: Vec<_> = report
                    .tables
                    .iter()
                    .flat_map(|table| {
                        table
                            .rows
                            .iter()
                            .map(move |row| VestedTableRow::new(table.strike_price, row, Cells::Plain))
                    })
                    .collect();
                display::write_csv(&rows)
            }
            Output::Table => {
                print_tables(&report);
                Ok(())
            }
        }
    }
}

fn print_tables(report: &StrategyReport<VestedRow>) {
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
            .map(|row| VestedTableRow::new(table.strike_price, row, cells))
            .collect();
        display::print_table(&rows);
        println!();
    }

    display::print_ranking("Highest final amount by quantity", &report.ranking, cells);
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct VestedTableRow {
    #[tabled(skip)]
    strike_price: String,

    #[tabled(rename = "Quantity")]
    quantity: u32,

    #[tabled(rename = "Exercise Cost")]
    exercise_cost: String,

    #[tabled(rename = "Sale Proceeds")]
    sell_proceeds: String,

    #[tabled(rename = "Perq. Tax (High)")]
    tax_event_1: String,

    #[tabled(rename = "Perq. Tax (Actual)")]
    tax_at_actual_rate: String,

    #[tabled(rename = "Company Deducts")]
    company_deducts: String,

    #[tabled(rename = "Transfer")]
    transfer_to_account: String,

    #[tabled(rename = "ST Gains Tax")]
    tax_event_2_short: String,

    #[tabled(rename = "Remains")]
    final_remains: String,

    #[tabled(rename = "Refund")]
    tax_refund: String,

    #[tabled(rename = "Final Amount")]
    final_amount: String,
}

impl VestedTableRow {
    fn new(strike_price: Money, row: &VestedRow, cells: Cells) -> Self {
        VestedTableRow {
            strike_price: strike_price.normalize().to_string(),
            quantity: row.quantity,
            exercise_cost: cells.money(row.exercise_cost),
            sell_proceeds: cells.money(row.sell_proceeds),
            tax_event_1: cells.money(row.tax_event_1),
            tax_at_actual_rate: cells.money(row.tax_at_actual_rate),
            company_deducts: cells.money(row.company_deducts),
            transfer_to_account: cells.money(row.transfer_to_account),
            tax_event_2_short: cells.money(row.tax_event_2_short),
            final_remains: cells.money(row.final_remains),
            tax_refund: cells.money(row.tax_refund),
            final_amount: cells.money(row.final_amount),
        }
    }
}
