//! Inspect command
//!
//! Usage: relmap inspect <ENTITY>

use clap::Args;
use relmap_core::model;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Entity name (Parent, Child) or table name (parent, child)
    pub entity: String,
}

/// Execute inspect command
pub fn execute(args: InspectArgs) -> Result<(), Box<dyn std::error::Error>> {
    for line in describe(&args.entity)? {
        println!("{}", line);
    }
    Ok(())
}

fn describe(entity: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let registry = model::registry()?;
    let schema = match registry.by_table(entity) {
        Some(schema) => schema,
        None => registry.get(entity)?,
    };

    let mut lines: Vec<String> = schema
        .column_descriptors()
        .iter()
        .map(|c| c.to_string())
        .collect();

    for rel in schema.relationships {
        let back = rel
            .back_populates
            .map(|b| format!(", back_populates='{}'", b))
            .unwrap_or_default();
        lines.push(format!(
            "Relationship('{}', {:?} -> {}{})",
            rel.name, rel.kind, rel.target, back
        ));
    }

    Ok(lines)
}
