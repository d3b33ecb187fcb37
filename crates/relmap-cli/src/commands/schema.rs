//! Schema command
//!
//! Usage: relmap schema [--apply] [--database <URL>]

use clap::Args;
use relmap_core::model;
use relmap_store::ddl::{create_all, create_table_sql};
use relmap_store::{db, EngineConfig};

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Create the tables in the configured database instead of printing DDL
    #[arg(long)]
    pub apply: bool,
}

/// Execute schema command
pub fn execute(args: SchemaArgs, config: &EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = model::registry()?;

    if !args.apply {
        for schema in registry.creation_order() {
            println!("{};\n", create_table_sql(schema));
        }
        return Ok(());
    }

    let mut conn = db::connect(config)?;
    let created = create_all(&mut conn, &registry)?;

    if created.is_empty() {
        println!("✓ Tables already up to date");
    } else {
        println!("✓ Created tables: {}", created.join(", "));
    }

    Ok(())
}
