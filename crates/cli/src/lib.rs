pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "atelier",
    about = "Atelier operator CLI",
    long_about = "Operate Atelier migrations, config inspection, readiness checks, and local design suggestions.",
    after_help = "Examples:\n  atelier doctor --json\n  atelier config\n  atelier suggest --cloth-type saree --occasion wedding --gender female --age-group adult"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, identity secret, upload directory, and DB connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run the suggestion engine locally and print the record as JSON")]
    Suggest(commands::suggest::SuggestArgs),
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Config => commands::CommandResult::text(commands::config::run(), 0),
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Suggest(args) => commands::suggest::run(&args),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
