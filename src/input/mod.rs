//! Boundary between raw form text and the calculation engine.

pub mod forms;
pub mod parse;

use crate::core::ScheduleError;

pub use forms::{
    read_form_json, ComparisonForm, ExerciseForm, FieldKind, FieldValue, Form, FormField,
    LongTermForm, VestedForm,
};

/// How unparsable form text is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Missing or non-numeric text becomes 0, bad strike entries are dropped
    #[default]
    Lenient,
    /// Any missing or malformed field is an error
    Strict,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("missing value for {field}")]
    MissingField { field: &'static str },
    #[error("invalid number for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid strike price in {field}: '{value}'")]
    InvalidStrikePrice { field: &'static str, value: String },
    #[error("invalid quantity: '{0}'")]
    InvalidQuantity(String),
    #[error("invalid quantity schedule: {0}")]
    Schedule(#[from] ScheduleError),
}
