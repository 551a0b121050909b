//! Schema command - print expected input form formats

use clap::{Args, ValueEnum};
use esopc::input::{ComparisonForm, ExerciseForm, Form, FormField, LongTermForm, VestedForm};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Form to describe
    #[arg(value_enum)]
    form: FormKind,

    /// Output format: json-schema or fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormKind {
    Exercise,
    Vested,
    LongTerm,
    Compare,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the `--input` file
    JsonSchema,
    /// Field names, kinds and descriptions
    Fields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::Fields => {
                self.print_fields();
                Ok(())
            }
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = match self.form {
            FormKind::Exercise => schema_for!(ExerciseForm),
            FormKind::Vested => schema_for!(VestedForm),
            FormKind::LongTerm => schema_for!(LongTermForm),
            FormKind::Compare => schema_for!(ComparisonForm),
        };
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_fields(&self) {
        let (title, fields) = match self.form {
            FormKind::Exercise => (ExerciseForm::STRATEGY.display(), ExerciseForm::fields()),
            FormKind::Vested => (VestedForm::STRATEGY.display(), VestedForm::fields()),
            FormKind::LongTerm => (LongTermForm::STRATEGY.display(), LongTermForm::fields()),
            FormKind::Compare => (ComparisonForm::STRATEGY.display(), ComparisonForm::fields()),
        };
        print_field_table(title, fields);
    }
}

fn print_field_table(title: &str, fields: &[FormField]) {
    let heading = format!("{} Input Form", title);
    println!("{}", heading);
    println!("{}", "=".repeat(heading.chars().count()));
    println!();
    for field in fields {
        println!(
            "{:22} ({:11})  {}",
            field.name,
            field.kind.display(),
            field.description
        );
    }
    println!();
    println!("Percent fields are entered as percentages (42.74 for 42.74%).");
}
