//! Line-oriented command scripts run against a table

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use colored::*;
use stat_tables::{DynamicHashTable, FixedKeyTable, KeyValueTable, TableResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { key: String, value: i64 },
    Get { key: String },
    Delete { key: String },
    Has { key: String },
    Keys,
    Values,
    Dump,
    Stats,
    Rehash,
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
///
/// Keys may contain spaces ("Games Played"), so for `set` the value is the
/// last word and the key is everything between the verb and the value.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let key = |rest: &str| -> Result<String> {
        if rest.is_empty() {
            bail!("'{verb}' needs a key");
        }
        Ok(rest.to_string())
    };

    let cmd = match verb.to_lowercase().as_str() {
        "set" => {
            let (k, v) = rest.rsplit_once(char::is_whitespace).context("usage: set <key> <value>")?;
            let value = v.parse::<i64>().with_context(|| format!("value '{v}' is not an integer"))?;
            Command::Set { key: key(k.trim())?, value }
        }
        "get" => Command::Get { key: key(rest)? },
        "del" | "delete" => Command::Delete { key: key(rest)? },
        "has" => Command::Has { key: key(rest)? },
        "keys" => Command::Keys,
        "values" => Command::Values,
        "dump" => Command::Dump,
        "stats" => Command::Stats,
        "rehash" => Command::Rehash,
        other => bail!("unknown command '{other}'"),
    };
    Ok(Some(cmd))
}

/// The table a script runs against
pub enum Target {
    Fixed(FixedKeyTable<i64>),
    Dynamic(DynamicHashTable<i64>),
}

impl Target {
    fn table(&mut self) -> &mut dyn KeyValueTable<i64> {
        match self {
            Target::Fixed(t) => t,
            Target::Dynamic(t) => t,
        }
    }

    fn stats(&self) -> String {
        match self {
            Target::Fixed(t) => format!("fixed: {} of {} slots used", t.len(), t.capacity()),
            Target::Dynamic(t) => format!(
                "dynamic: {} live, {} tombstones, capacity {} (rung {} of {})",
                t.len(),
                t.tombstones(),
                t.capacity(),
                t.size_index() + 1,
                t.ladder().len()
            ),
        }
    }

    fn dump(&self) -> String {
        match self {
            Target::Fixed(t) => t.to_string(),
            Target::Dynamic(t) => t.to_string(),
        }
    }

    fn rehash(&mut self) -> TableResult<String> {
        match self {
            Target::Fixed(_) => Ok("fixed tables never rehash".to_string()),
            Target::Dynamic(t) => {
                t.rehash()?;
                Ok(format!("capacity now {}", t.capacity()))
            }
        }
    }

    /// Run one command. Table errors become the command's output rather than
    /// aborting the script.
    pub fn execute(&mut self, cmd: &Command) -> std::result::Result<String, String> {
        let out = match cmd {
            Command::Set { key, value } => self.table().set(key, *value).map(|_| "ok".to_string()),
            Command::Get { key } => self.table().get(key).map(|v| v.to_string()),
            Command::Delete { key } => self.table().delete(key).map(|v| format!("removed {v}")),
            Command::Has { key } => Ok(self.table().contains(key).to_string()),
            Command::Keys => Ok(self.table().keys().join(", ")),
            Command::Values => {
                let values: Vec<String> = self.table().values().iter().map(|v| v.to_string()).collect();
                Ok(values.join(", "))
            }
            Command::Dump => Ok(self.dump().trim_end().to_string()),
            Command::Stats => Ok(self.stats()),
            Command::Rehash => self.rehash(),
        };
        out.map_err(|e| e.to_string())
    }
}

/// Run every line of `reader` against `target`, writing one result line per
/// command to `out`. Returns how many lines failed to parse or execute.
pub fn run_script<R: BufRead, W: Write>(target: &mut Target, reader: R, mut out: W) -> Result<usize> {
    let mut failures = 0usize;
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let cmd = match parse_line(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{} line {}: {}", "✗".red(), n + 1, e)?;
                failures += 1;
                continue;
            }
        };
        match target.execute(&cmd) {
            Ok(result) => writeln!(out, "{} {}", "›".green(), result)?,
            Err(e) => {
                writeln!(out, "{} {}", "✗".yellow(), e)?;
                failures += 1;
            }
        }
    }
    Ok(failures)
}
