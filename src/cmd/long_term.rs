//! Long-term command - exercise now, sell after the long-term holding period

use super::display::{self, format_strike, Cells};
use super::{unexpected, Output, ScenarioArgs};
use clap::Args;
use esopc::core::{LongTermRow, Money, Report, StrategyReport};
use esopc::input::LongTermForm;
use serde::Serialize;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct LongTermCommand {
    #[command(flatten)]
    form: LongTermForm,

    #[command(flatten)]
    args: ScenarioArgs,
}

impl LongTermCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let report = match self.args.evaluate(&self.form)? {
            Report::LongTerm(report) => report,
            other => return Err(unexpected(&other)),
        };
        log::info!(
            "{}: {} strike price(s), {} quantities",
            report.strategy,
            report.tables.len(),
            report.ranking.len()
        );

        match self.args.output() {
            Output::Json => display::print_json(&Report::LongTerm(report)),
            Output::Csv => display::write_csv(&rows(&report, Cells::Plain)),
            Output::Table => {
                print_tables(&report);
                Ok(())
            }
        }
    }
}

fn print_tables(report: &StrategyReport<LongTermRow>) {
    let cells = Cells::Dual(report.exchange_rate);
    display::print_heading(report.strategy.display(), report.exchange_rate);

    for table in &report.tables {
        let ltcg = table
            .ltcg_per_share
            .map_or("-".to_string(), |gain| cells.money(gain));
        println!(
            "Strike {} | Perquisite per share {} | Long-term gain per share {}",
            format_strike(table.strike_price),
            cells.money(table.perquisite_per_share),
            ltcg
        );
        let rows: Vec<_> = table
            .rows
            .iter()
            .map(|row| LongTermTableRow::new(table.strike_price, row, cells))
            .collect();
        display::print_table(&rows);
        println!();
    }

    display::print_ranking("Highest net profit by quantity", &report.ranking, cells);
}

fn rows(report: &StrategyReport<LongTermRow>, cells: Cells) -> Vec<LongTermTableRow> {
    let mut rows = Vec::new();
    for table in &report.tables {
        for row in &table.rows {
            rows.push(LongTermTableRow::new(table.strike_price, row, cells));
        }
    }
    rows
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct LongTermTableRow {
    #[tabled(skip)]
    strike_price: String,

    #[tabled(rename = "Quantity")]
    quantity: u32,

    #[tabled(rename = "Exercise Amount")]
    exercise_amount: String,

    #[tabled(rename = "Perq. Tax (High)")]
    perquisite_tax_high: String,

    #[tabled(rename = "Perq. Tax (Actual)")]
    perquisite_tax_actual: String,

    #[tabled(rename = "Upfront")]
    total_upfront: String,

    #[tabled(rename = "Refund")]
    tax_refund: String,

    #[tabled(rename = "Net Cost")]
    net_exercise_cost: String,

    #[tabled(rename = "Sale Proceeds")]
    sell_proceeds: String,

    #[tabled(rename = "LTCG Tax")]
    ltcg_tax: String,

    #[tabled(rename = "Net From Sale")]
    net_from_sale: String,

    #[tabled(rename = "Net Profit")]
    net_profit: String,
}

impl LongTermTableRow {
    fn new(strike_price: Money, row: &LongTermRow, cells: Cells) -> Self {
        LongTermTableRow {
            strike_price: strike_price.normalize().to_string(),
            quantity: row.quantity,
            exercise_amount: cells.money(row.exercise_amount),
            perquisite_tax_high: cells.money(row.perquisite_tax_high),
            perquisite_tax_actual: cells.money(row.perquisite_tax_actual),
            total_upfront: cells.money(row.total_upfront),
            tax_refund: cells.money(row.tax_refund),
            net_exercise_cost: cells.money(row.net_exercise_cost),
            sell_proceeds: cells.money(row.sell_proceeds),
            ltcg_tax: cells.money(row.ltcg_tax),
            net_from_sale: cells.money(row.net_from_sale),
            net_profit: cells.money(row.net_profit),
        }
    }
}
