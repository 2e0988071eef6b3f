//! Table Playground
//!
//! Drives a fixed-key or dynamic table from a command script so probing,
//! tombstones and growth can be watched by hand.

mod script;

use std::io::{self, BufRead, BufReader};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use stat_tables::{DynamicHashTable, FixedKeyTable, PlayerStat, TableConfig};
use tracing::{info, Level};

use crate::script::{run_script, Target};

#[derive(Parser)]
#[command(name = "table-playground")]
#[command(about = "Run set/get/del scripts against the stat tables")]
#[command(version = "0.1.0")]
struct Cli {
    /// Which table to drive
    #[arg(value_enum)]
    table: TableKind,

    /// Script file; reads stdin when omitted
    #[arg(short, long)]
    script: Option<String>,

    /// TOML file with `growth_ladder` and `fixed_capacity`
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[derive(Clone, Copy, ValueEnum)]
enum TableKind {
    Fixed,
    Dynamic,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level).with_writer(io::stderr).init();

    let config = match &cli.config {
        Some(path) => TableConfig::from_file(path).with_context(|| format!("loading {path}"))?,
        None => TableConfig::default(),
    };

    let mut target = match cli.table {
        TableKind::Fixed => {
            Target::Fixed(FixedKeyTable::<i64, PlayerStat>::with_capacity(config.fixed_capacity)?)
        }
        TableKind::Dynamic => Target::Dynamic(DynamicHashTable::from_config(&config)?),
    };

    let reader: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path).with_context(|| format!("opening {path}"))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    info!("running script against {} table", match cli.table {
        TableKind::Fixed => "fixed",
        TableKind::Dynamic => "dynamic",
    });

    let failures = run_script(&mut target, reader, io::stdout().lock())?;
    info!(failures, "script finished");
    if failures > 0 {
        bail!("{failures} script line(s) failed");
    }
    Ok(())
}
