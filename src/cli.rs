use std::fs;
use std::io::{self, Read};
use std::str::FromStr;

use serde_json::Value;

use crate::battle::balance::{balance_from_env, Balance};
use crate::battle::fighter::Fighter;
use crate::battle::highlights::{build_highlights, DEFAULT_MAX_HIGHLIGHTS};
use crate::battle::winrate::calc_winrate_with_damping;
use crate::parallel::{round_robin, standings, write_matrix_csv, WorkerPool};
use crate::profile::normalize::normalize_profile;
use crate::profile::record::RosterEntry;
use crate::profile::validate::{roster_entries, validate_roster_dataset};
use crate::server;

const USAGE: &str = "usage: duelist <serve|normalize|compare|matrix|validate|tags>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Normalize,
    Compare,
    Matrix,
    Validate,
    Tags,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("normalize") => Some(Command::Normalize),
        Some("compare") => Some(Command::Compare),
        Some("matrix") => Some(Command::Matrix),
        Some("validate") => Some(Command::Validate),
        Some("tags") => Some(Command::Tags),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => with_balance(handle_serve),
        Some(Command::Normalize) => handle_normalize(args),
        Some(Command::Compare) => with_balance(|balance| handle_compare(args, balance)),
        Some(Command::Matrix) => with_balance(|balance| handle_matrix(args, balance)),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Tags) => with_balance(handle_tags),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Loads the balance named by the environment (or the reference one) before running `f`.
fn with_balance(f: impl FnOnce(&Balance) -> i32) -> i32 {
    match balance_from_env() {
        Ok(balance) => f(&balance),
        Err(err) => {
            eprintln!("balance config error: {err}");
            1
        }
    }
}

fn handle_serve(balance: &Balance) -> i32 {
    let bind_addr = server::bind_addr_from_env();
    match server::run_server(&bind_addr, balance) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_normalize(args: &[String]) -> i32 {
    let Some(source) = positionals(args).first().copied() else {
        eprintln!("usage: duelist normalize <file|->");
        return 2;
    };
    let raw = match read_source(source) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("unable to read '{source}': {err}");
            return 1;
        }
    };
    print_json(&normalize_profile(&raw))
}

fn handle_compare(args: &[String], balance: &Balance) -> i32 {
    let paths = positionals(args);
    let (Some(a_path), Some(b_path)) = (paths.first(), paths.get(1)) else {
        eprintln!("usage: duelist compare <a.json> <b.json> [--k N] [--max N]");
        return 2;
    };
    let options = parse_option::<f64>(args, "--k")
        .and_then(|k| parse_option::<usize>(args, "--max").map(|max| (k, max)));
    let (damping, max) = match options {
        Ok((k, max)) => (
            k.unwrap_or_else(|| balance.damping()),
            max.unwrap_or(DEFAULT_MAX_HIGHLIGHTS),
        ),
        Err(err) => {
            eprintln!("{err}");
            return 2;
        }
    };

    let fighters = load_fighter(a_path).and_then(|a| load_fighter(b_path).map(|b| (a, b)));
    let (a, b) = match fighters {
        Ok(pair) => pair,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let result = match calc_winrate_with_damping(&a, &b, balance, damping) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("compare failed: {err}");
            return 1;
        }
    };
    print_json(&serde_json::json!({
        "a_id": a.id,
        "b_id": b.id,
        "damping": damping,
        "result": result,
        "highlights": build_highlights(&a, &b, balance, max),
    }))
}

fn handle_matrix(args: &[String], balance: &Balance) -> i32 {
    let Some(path) = positionals(args).first().copied() else {
        eprintln!("usage: duelist matrix <roster.json> [--csv] [--workers N]");
        return 2;
    };
    let as_csv = args.iter().any(|arg| arg == "--csv");
    let pool = match parse_option::<usize>(args, "--workers") {
        Ok(workers) => WorkerPool::with_workers(workers.unwrap_or(0)),
        Err(err) => {
            eprintln!("{err}");
            return 2;
        }
    };

    let fighters = match load_roster(path) {
        Ok(fighters) => fighters,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let rows = match round_robin(&fighters, balance, &pool) {
        Ok(rows) => rows,
        Err(err) => {
            eprintln!("matrix failed: {err}");
            return 1;
        }
    };

    if as_csv {
        match write_matrix_csv(&rows, io::stdout().lock()) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("failed to write csv: {err}");
                1
            }
        }
    } else {
        print_json(&serde_json::json!({
            "rows": rows,
            "standings": standings(&rows),
        }))
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let path = positionals(args)
        .first()
        .copied()
        .unwrap_or("data/roster.sample.json");

    match validate_roster_dataset(path) {
        Ok(report) => {
            for diag in &report.diagnostics {
                println!("{diag}");
            }
            if report.has_errors() {
                eprintln!("validation failed: {path}");
                1
            } else {
                println!("validation passed: {path}");
                0
            }
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

fn handle_tags(balance: &Balance) -> i32 {
    let tags: Vec<Value> = balance
        .bonuses()
        .iter()
        .map(|(tag, bonus)| serde_json::json!({ "name": tag.as_str(), "bonus": bonus }))
        .collect();
    print_json(&tags)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}

fn read_source(source: &str) -> io::Result<String> {
    if source == "-" {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        fs::read_to_string(source)
    }
}

fn read_json(path: &str) -> Result<Value, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("unable to read '{path}': {err}"))?;
    serde_json::from_str(&raw).map_err(|err| format!("unable to parse json '{path}': {err}"))
}

fn fighter_from_value(value: Value, context: &str) -> Result<Fighter, String> {
    let entry: RosterEntry =
        serde_json::from_value(value).map_err(|err| format!("{context}: {err}"))?;
    entry.to_fighter().map_err(|err| format!("{context}: {err}"))
}

fn load_fighter(path: &str) -> Result<Fighter, String> {
    fighter_from_value(read_json(path)?, path)
}

fn load_roster(path: &str) -> Result<Vec<Fighter>, String> {
    let payload = read_json(path)?;
    let entries = roster_entries(&payload)
        .ok_or_else(|| format!("{path}: expected top-level JSON array or {{ profiles: [...] }}"))?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| fighter_from_value(entry.clone(), &format!("{path} entry[{index}]")))
        .collect()
}

/// Arguments after the command name that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--k" | "--max" | "--workers" => {
                rest.next();
            }
            flag if flag.starts_with("--") => {}
            value => out.push(value),
        }
    }
    out
}

/// `Ok(None)` when the flag is absent. A flag without a value is an error.
fn option_value<'a>(args: &'a [String], name: &str) -> Result<Option<&'a str>, String> {
    let Some(index) = args.iter().position(|arg| arg == name) else {
        return Ok(None);
    };
    match args.get(index + 1).map(String::as_str) {
        Some(value) if !value.starts_with("--") => Ok(Some(value)),
        _ => Err(format!("missing value for {name}")),
    }
}

fn parse_option<T: FromStr>(args: &[String], name: &str) -> Result<Option<T>, String> {
    option_value(args, name)?
        .map(|raw| raw.parse::<T>().map_err(|_| format!("invalid {name} value '{raw}'")))
        .transpose()
}
