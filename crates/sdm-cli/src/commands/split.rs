//! Split command implementation

use anyhow::{Context, Result};
use sdm_core::read_sql_file;
use serde::Serialize;

use crate::cli::{GlobalArgs, OutputFormat, SplitArgs};

#[derive(Debug, Serialize)]
struct SplitStatement<'a> {
    index: usize,
    sql: &'a str,
}

/// Execute the split command
pub(crate) fn execute(args: &SplitArgs, global: &GlobalArgs) -> Result<()> {
    let statements = read_sql_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    if global.verbose {
        eprintln!(
            "[verbose] {} statement(s) in {}",
            statements.len(),
            args.file.display()
        );
    }

    match args.output {
        OutputFormat::Json => {
            let items: Vec<SplitStatement<'_>> = statements
                .iter()
                .enumerate()
                .map(|(i, sql)| SplitStatement { index: i + 1, sql })
                .collect();
            let json = serde_json::to_string_pretty(&items)
                .context("Failed to serialize statements")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            for (i, sql) in statements.iter().enumerate() {
                println!("-- [{}]", i + 1);
                println!("{sql}");
            }
        }
    }
    Ok(())
}
