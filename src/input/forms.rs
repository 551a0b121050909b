use super::{parse, InputError, ParseMode};
use crate::core::{ExchangeRate, MarketInputs, Scenario, Strategy};
use clap::Args;
use esopc_derive::FormSchema;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;

/// How a form field is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Number,
    /// Entered as a percentage, used as a fraction
    Percent,
    /// Comma separated strike prices
    StrikeList,
}

impl FieldKind {
    pub fn display(&self) -> &'static str {
        match self {
            FieldKind::Number => "number",
            FieldKind::Percent => "percent",
            FieldKind::StrikeList => "strike list",
        }
    }
}

/// Field listing generated by `#[derive(FormSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

/// A form field value in JSON input: text or a bare number
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

fn field_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<FieldValue> = Deserialize::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        FieldValue::Text(s) => s,
        FieldValue::Number(n) => n.to_string(),
    }))
}

/// Read any form from JSON
pub fn read_form_json<T: DeserializeOwned, R: Read>(reader: R) -> serde_json::Result<T> {
    serde_json::from_reader(reader)
}

/// Raw inputs of one strategy, turned into engine inputs at the boundary
pub trait Form {
    const STRATEGY: Strategy;

    fn to_market(&self, mode: ParseMode) -> Result<MarketInputs, InputError>;

    fn fields() -> &'static [FormField];

    fn to_scenario(&self, mode: ParseMode) -> Result<Scenario, InputError> {
        Ok(Scenario::new(Self::STRATEGY, self.to_market(mode)?))
    }
}

/// Exercise-only inputs
#[derive(Args, Debug, Clone, Default, Deserialize, JsonSchema, FormSchema)]
pub struct ExerciseForm {
    /// Strike prices in USD, comma separated (default 0.133)
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    #[form(kind = "strike_list")]
    pub strike_prices: Option<String>,

    /// Fair market value per share in USD
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    pub fmv_price: Option<String>,

    /// USD to INR exchange rate
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    pub dollar_rate: Option<String>,

    /// Rate the company withholds perquisite tax at, in percent
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    #[form(kind = "percent")]
    pub short_term_tax_high: Option<String>,

    /// Your actual marginal tax rate, in percent
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    #[form(kind = "percent")]
    pub short_term_tax_actual: Option<String>,
}

impl Form for ExerciseForm {
    const STRATEGY: Strategy = Strategy::ExerciseOnly;

    fn to_market(&self, mode: ParseMode) -> Result<MarketInputs, InputError> {
        Ok(MarketInputs {
            strike_prices: parse::strike_prices(
                "strike_prices",
                self.strike_prices.as_deref(),
                dec!(0.133),
                mode,
            )?,
            fmv_price: parse::number("fmv_price", self.fmv_price.as_deref(), mode)?,
            exchange_rate: ExchangeRate(parse::number("dollar_rate", self.dollar_rate.as_deref(), mode)?),
            short_term_tax_high: parse::percent(
                "short_term_tax_high",
                self.short_term_tax_high.as_deref(),
                mode,
            )?,
            short_term_tax_actual: parse::percent(
                "short_term_tax_actual",
                self.short_term_tax_actual.as_deref(),
                mode,
            )?,
            ..MarketInputs::default()
        })
    }

    fn fields() -> &'static [FormField] {
        Self::form_schema()
    }
}

/// Vested options sold to the company buy-back on the day of exercise
#[derive(Args, Debug, Clone, Default, Deserialize, JsonSchema, FormSchema)]
pub struct VestedForm {
    /// Strike prices in USD, comma separated (default 0.133)
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    #[form(kind = "strike_list")]
    pub strike_prices: Option<String>,

    /// Buy-back price per share in USD, used as both FMV and sale price
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    pub buy_back_price: Option<String>,

    /// USD to INR exchange rate
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    pub dollar_rate: Option<String>,

    /// Rate the company withholds perquisite tax at, in percent
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    #[form(kind = "percent")]
    pub short_term_tax_high: Option<String>,

    /// Your actual marginal tax rate, in percent
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    #[form(kind = "percent")]
    pub short_term_tax_actual: Option<String>,
}

impl Form for VestedForm {
    const STRATEGY: Strategy = Strategy::VestedSameDay;

    fn to_market(&self, mode: ParseMode) -> Result<MarketInputs, InputError> {
        let buy_back = parse::number("buy_back_price", self.buy_back_price.as_deref(), mode)?;
        Ok(MarketInputs {
            strike_prices: parse::strike_prices(
                "strike_prices",
                self.strike_prices.as_deref(),
                dec!(0.133),
                mode,
            )?,
            fmv_price: buy_back,
            sell_price: buy_back,
            exchange_rate: ExchangeRate(parse::number("dollar_rate", self.dollar_rate.as_deref(), mode)?),
            short_term_tax_high: parse::percent(
                "short_term_tax_high",
                self.short_term_tax_high.as_deref(),
                mode,
            )?,
            short_term_tax_actual: parse::percent(
                "short_term_tax_actual",
                self.short_term_tax_actual.as_deref(),
                mode,
            )?,
            ..MarketInputs::default()
        })
    }

    fn fields() -> &'static [FormField] {
        Self::form_schema()
    }
}

/// Exercise now, sell after the long-term holding period
#[derive(Args, Debug, Clone, Default, Deserialize, JsonSchema, FormSchema)]
pub struct LongTermForm {
    /// Strike prices in USD, comma separated (default 1)
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    #[form(kind = "strike_list")]
    pub strike_prices: Option<String>,

    /// Fair market value per share on the exercise date, in USD
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    pub fmv_at_exercise: Option<String>,

    /// Expected sale price per share in USD
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    pub sell_price: Option<String>,

    /// USD to INR exchange rate
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    pub dollar_rate: Option<String>,

    /// Rate the company withholds perquisite tax at, in percent
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    #[form(kind = "percent")]
    pub short_term_tax_high: Option<String>,

    /// Your actual marginal tax rate, in percent
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    #[form(kind = "percent")]
    pub short_term_tax_actual: Option<String>,

    /// Long-term capital gains tax rate, in percent
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    #[form(kind = "percent")]
    pub long_term_tax: Option<String>,
}

impl Form for LongTermForm {
    const STRATEGY: Strategy = Strategy::LongTerm;

    fn to_market(&self, mode: ParseMode) -> Result<MarketInputs, InputError> {
        Ok(MarketInputs {
            strike_prices: parse::strike_prices(
                "strike_prices",
                self.strike_prices.as_deref(),
                dec!(1),
                mode,
            )?,
            fmv_at_exercise: parse::number("fmv_at_exercise", self.fmv_at_exercise.as_deref(), mode)?,
            sell_price: parse::number("sell_price", self.sell_price.as_deref(), mode)?,
            exchange_rate: ExchangeRate(parse::number("dollar_rate", self.dollar_rate.as_deref(), mode)?),
            short_term_tax_high: parse::percent(
                "short_term_tax_high",
                self.short_term_tax_high.as_deref(),
                mode,
            )?,
            short_term_tax_actual: parse::percent(
                "short_term_tax_actual",
                self.short_term_tax_actual.as_deref(),
                mode,
            )?,
            long_term_tax: parse::percent("long_term_tax", self.long_term_tax.as_deref(), mode)?,
            ..MarketInputs::default()
        })
    }

    fn fields() -> &'static [FormField] {
        Self::form_schema()
    }
}

/// Same-day sale of options against exercising and holding the shares
#[derive(Args, Debug, Clone, Default, Deserialize, JsonSchema, FormSchema)]
pub struct ComparisonForm {
    /// Strike price in USD
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    pub strike_price: Option<String>,

    /// Fair market value per share used for withholding, in USD
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    pub fmv_price: Option<String>,

    /// Fair market value per share on the exercise date, in USD
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    pub fmv_at_exercise: Option<String>,

    /// Sale price per share in USD
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    pub sell_price: Option<String>,

    /// USD to INR exchange rate
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    pub dollar_rate: Option<String>,

    /// Rate the company withholds perquisite tax at, in percent
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    #[form(kind = "percent")]
    pub short_term_tax_high: Option<String>,

    /// Your actual marginal tax rate, in percent
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    #[form(kind = "percent")]
    pub short_term_tax_actual: Option<String>,

    /// Long-term capital gains tax rate, in percent
    #[arg(long)]
    #[serde(default, deserialize_with = "field_text")]
    #[schemars(with = "Option<FieldValue>")]
    #[form(kind = "percent")]
    pub long_term_tax: Option<String>,
}

impl Form for ComparisonForm {
    const STRATEGY: Strategy = Strategy::Comparison;

    fn to_market(&self, mode: ParseMode) -> Result<MarketInputs, InputError> {
        Ok(MarketInputs {
            strike_prices: vec![parse::number("strike_price", self.strike_price.as_deref(), mode)?],
            fmv_price: parse::number("fmv_price", self.fmv_price.as_deref(), mode)?,
            fmv_at_exercise: parse::number("fmv_at_exercise", self.fmv_at_exercise.as_deref(), mode)?,
            sell_price: parse::number("sell_price", self.sell_price.as_deref(), mode)?,
            exchange_rate: ExchangeRate(parse::number("dollar_rate", self.dollar_rate.as_deref(), mode)?),
            short_term_tax_high: parse::percent(
                "short_term_tax_high",
                self.short_term_tax_high.as_deref(),
                mode,
            )?,
            short_term_tax_actual: parse::percent(
                "short_term_tax_actual",
                self.short_term_tax_actual.as_deref(),
                mode,
            )?,
            long_term_tax: parse::percent("long_term_tax", self.long_term_tax.as_deref(), mode)?,
        })
    }

    fn fields() -> &'static [FormField] {
        Self::form_schema()
    }
}
