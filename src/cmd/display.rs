//! Shared table and cell formatting for the strategy commands

use esopc::core::{format_inr, format_usd, ExchangeRate, Money, StrikeRanking};
use serde::Serialize;
use std::io;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// How money cells are rendered
#[derive(Debug, Clone, Copy)]
pub enum Cells {
    /// `$x.xx (₹y)` for terminal tables
    Dual(ExchangeRate),
    /// Unrounded USD for CSV
    Plain,
}

impl Cells {
    pub fn money(&self, usd: Money) -> String {
        match self {
            Cells::Dual(rate) => rate.dual(usd).to_string(),
            Cells::Plain => usd.normalize().to_string(),
        }
    }
}

pub fn format_strike(strike_price: Money) -> String {
    if strike_price.is_sign_negative() {
        format!("-${}", strike_price.abs().normalize())
    } else {
        format!("${}", strike_price.normalize())
    }
}

pub fn print_heading(title: &str, exchange_rate: ExchangeRate) {
    println!();
    println!("{}", title.to_uppercase());
    println!("USD/INR {}", exchange_rate.0.normalize());
    println!();
}

pub fn print_table<T: Tabled>(rows: &[T]) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

/// Headline figure of every strike per quantity, with the pick in the last column
pub fn print_ranking(title: &str, ranking: &[StrikeRanking], cells: Cells) {
    let Some(first) = ranking.first() else {
        return;
    };

    let mut builder = Builder::default();
    let mut header = vec!["Quantity".to_string()];
    header.extend(
        first
            .candidates
            .iter()
            .map(|c| format!("@ {}", format_strike(c.strike_price))),
    );
    header.push("Best".to_string());
    builder.push_record(header);

    for entry in ranking {
        let mut record = vec![entry.quantity.to_string()];
        record.extend(entry.candidates.iter().map(|c| cells.money(c.value)));
        record.push(
            entry
                .best
                .map_or("-".to_string(), |best| format_strike(best.strike_price)),
        );
        builder.push_record(record);
    }

    println!("{}", title);
    let table = builder
        .build()
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

pub fn write_csv<T: Serialize>(rows: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
