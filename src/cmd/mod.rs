pub mod compare;
pub mod exercise;
pub mod long_term;
pub mod schema;
pub mod vested;

mod display;

use clap::Args;
use esopc::core::{QuantitySchedule, Report, Scenario};
use esopc::input::{self, read_form_json, Form, ParseMode};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Options shared by every strategy command
#[derive(Args, Debug)]
pub struct ScenarioArgs {
    /// JSON form file (or "-" for stdin). Replaces the field flags when given.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Reject missing or malformed fields instead of treating them as 0
    #[arg(long)]
    strict: bool,

    /// Share quantities: `100,500,1000` or `START..END:STEP` (default 1000..10000:500)
    #[arg(short, long)]
    quantities: Option<String>,

    /// Output as JSON instead of formatted tables
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV instead of formatted tables
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Table,
    Json,
    Csv,
}

impl ScenarioArgs {
    pub fn output(&self) -> Output {
        if self.json {
            Output::Json
        } else if self.csv {
            Output::Csv
        } else {
            Output::Table
        }
    }

    fn mode(&self) -> ParseMode {
        if self.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }

    fn schedule(&self) -> anyhow::Result<QuantitySchedule> {
        match &self.quantities {
            Some(raw) => Ok(input::parse::quantities(raw)?),
            None => Ok(QuantitySchedule::default()),
        }
    }

    /// Build the scenario from the input file if given, else from the flags
    pub fn scenario<F>(&self, flags: &F) -> anyhow::Result<Scenario>
    where
        F: Form + DeserializeOwned + Clone,
    {
        let form = match &self.input {
            Some(path) => read_form(path)?,
            None => flags.clone(),
        };
        Ok(form.to_scenario(self.mode())?)
    }

    pub fn evaluate<F>(&self, flags: &F) -> anyhow::Result<Report>
    where
        F: Form + DeserializeOwned + Clone,
    {
        let scenario = self.scenario(flags)?;
        let schedule = self.schedule()?;
        Ok(scenario.evaluate(&schedule))
    }
}

/// Read a JSON form from a file (or stdin with "-")
pub fn read_form<F: DeserializeOwned>(path: &Path) -> anyhow::Result<F> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        read_from_file(path)
    }
}

fn read_from_file<F: DeserializeOwned>(path: &Path) -> anyhow::Result<F> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(read_form_json(reader)?)
}

fn read_from_stdin<F: DeserializeOwned>() -> anyhow::Result<F> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe a JSON form to stdin.");
    }

    Ok(read_form_json(io::Cursor::new(buffer))?)
}

/// A report of another strategy than the command asked for
fn unexpected(report: &Report) -> anyhow::Error {
    anyhow::anyhow!("unexpected {} report", report.strategy())
}
