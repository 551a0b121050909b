use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser, Debug)]
#[command(
    name = "esopc",
    version,
    about = "ESOP exercise and sale strategy calculator for Indian perquisite and capital gains tax"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cost of exercising options and holding the shares
    Exercise(cmd::exercise::ExerciseCommand),
    /// Exercise and sell to the company buy-back on the same day
    Vested(cmd::vested::VestedCommand),
    /// Exercise now and sell after the long-term holding period
    LongTerm(cmd::long_term::LongTermCommand),
    /// Compare a same-day sale of options against exercising and holding
    Compare(cmd::compare::CompareCommand),
    /// Print the input form formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Exercise(cmd) => cmd.exec(),
        Command::Vested(cmd) => cmd.exec(),
        Command::LongTerm(cmd) => cmd.exec(),
        Command::Compare(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
