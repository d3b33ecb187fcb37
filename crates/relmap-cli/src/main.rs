//! RelMap CLI
//!
//! Command-line interface for RelMap

use clap::{Args, Parser, Subcommand};
use relmap_core::logging_facility::{self, Profile};
use relmap_store::{DatabaseTarget, EngineConfig};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "relmap")]
#[command(about = "RelMap - Parent/Child relationship mapping over SQLite", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Database URL (sqlite:///:memory:, sqlite:///path.db, or a bare path)
    #[arg(long, global = true, default_value = "sqlite:///:memory:")]
    database: String,

    /// Log every SQL statement
    #[arg(long, global = true)]
    echo: bool,

    /// Logging profile (dev, prod)
    #[arg(long, global = true)]
    log: Option<Profile>,
}

impl GlobalArgs {
    fn engine_config(&self) -> Result<EngineConfig, Box<dyn std::error::Error>> {
        Ok(EngineConfig::default()
            .with_database(DatabaseTarget::parse(&self.database)?)
            .with_echo(self.echo))
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the Parent/Child graph, commit it and print what comes back
    Demo,
    /// Print the mapped columns of an entity
    Inspect(commands::inspect::InspectArgs),
    /// Print (or apply) the table DDL
    Schema(commands::schema::SchemaArgs),
}

fn main() {
    let cli = Cli::parse();

    // Echo output is only visible through a subscriber
    match (cli.global.log, cli.global.echo) {
        (Some(profile), _) => logging_facility::init(profile),
        (None, true) => logging_facility::init(Profile::Development),
        (None, false) => {}
    }

    let result = cli.global.engine_config().and_then(|config| match cli.command {
        Commands::Demo => commands::demo::execute(&config),
        Commands::Inspect(args) => commands::inspect::execute(args),
        Commands::Schema(args) => commands::schema::execute(args, &config),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
