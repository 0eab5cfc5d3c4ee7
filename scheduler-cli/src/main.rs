//! scheduler-cli: command-line driver for the seating scheduler
//!
//! # Commands
//!
//! - `run`: read a request (JSON file, `--stdin` JSON, or the plain
//!   whitespace-integer protocol below) and print the schedule
//! - `schema`: print an example request/response pair

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scheduler_core::{schedule, Pair, ScheduleRequest};
use std::fs;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scheduler-cli")]
#[command(version = "0.1.0")]
#[command(about = "Round-table seating scheduler CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and solve a schedule.
    Run {
        /// Input JSON file path. Omit together with --stdin-plain to read
        /// interactively or via the plain integer protocol on stdin.
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Read a JSON request from stdin instead of a file.
        #[arg(long)]
        stdin: bool,

        /// Read the plain whitespace-integer protocol from stdin:
        /// `participants tables rounds`, then `d` and `d` same-once pairs,
        /// then `x` and `x` never-together pairs. Used automatically when
        /// no file is given and stdin is not a terminal.
        #[arg(long)]
        stdin_plain: bool,

        /// Output file path (defaults to stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Print an example request and response as JSON.
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            input,
            stdin,
            stdin_plain,
            output,
            pretty,
        } => cmd_run(input, stdin, stdin_plain, output, pretty),
        Commands::Schema => cmd_schema(),
    }
}

fn cmd_run(input: Option<PathBuf>, stdin: bool, stdin_plain: bool, output: Option<PathBuf>, pretty: bool) -> Result<()> {
    let request = if let Some(path) = &input {
        let json_str = fs::read_to_string(path).with_context(|| format!("failed to read file: {path:?}"))?;
        serde_json::from_str(&json_str).context("failed to parse input JSON")?
    } else if stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).context("failed to read from stdin")?;
        serde_json::from_str(&buffer).context("failed to parse input JSON")?
    } else if stdin_plain || !io::stdin().is_terminal() {
        read_plain_protocol()?
    } else {
        read_interactive()?
    };

    println!("start scheduler");
    let response = schedule(request).map_err(|e| anyhow::anyhow!("{e}"))?;

    eprintln!(
        "status={} objective={} participants={} tables={} rounds={} unsatisfied_same_once={}",
        response.solver_status,
        response.objective_value,
        response.participants,
        response.tables,
        response.rounds,
        response.unsatisfied_same_once_pairs.len(),
    );

    let output_json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };

    if let Some(output_path) = output {
        fs::write(&output_path, &output_json).with_context(|| format!("failed to write output to {output_path:?}"))?;
        eprintln!("result written to {output_path:?}");
    } else {
        println!("{output_json}");
    }

    Ok(())
}

/// Reads `participants tables rounds`, then `d` same-once pairs, then `x`
/// never-together pairs, all as whitespace-separated integers on stdin.
fn read_plain_protocol() -> Result<ScheduleRequest> {
    let mut data = String::new();
    io::stdin().read_to_string(&mut data).context("failed to read from stdin")?;
    let mut tokens = data.split_whitespace();

    let mut next_int = || -> Result<u32> {
        tokens
            .next()
            .ok_or_else(|| anyhow::anyhow!("unexpected end of input"))?
            .parse::<u32>()
            .context("expected an integer")
    };

    let participants = next_int()?;
    let tables = next_int()?;
    let rounds = next_int()?;

    let d = next_int()?;
    let mut same_once_pairs = Vec::with_capacity(d as usize);
    for _ in 0..d {
        let u = next_int()?;
        let v = next_int()?;
        same_once_pairs.push(Pair(u, v));
    }

    let x = next_int()?;
    let mut never_together_pairs = Vec::with_capacity(x as usize);
    for _ in 0..x {
        let u = next_int()?;
        let v = next_int()?;
        never_together_pairs.push(Pair(u, v));
    }

    Ok(ScheduleRequest {
        participants,
        tables,
        rounds,
        same_once_pairs,
        never_together_pairs,
        time_limit_seconds: None,
    })
}

/// Prompts for each field on stderr, one line of stdin at a time, so that
/// stdout stays clean for the final JSON result.
fn read_interactive() -> Result<ScheduleRequest> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    eprint!("Enter 'a b c' (participants tables rounds): ");
    io::stderr().flush().ok();
    let (participants, tables, rounds) = loop {
        let line = lines.next().context("unexpected end of input")??;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() == 3 {
            if let (Ok(a), Ok(b), Ok(c)) = (parts[0].parse(), parts[1].parse(), parts[2].parse()) {
                break (a, b, c);
            }
        }
        eprint!("Invalid. Please enter three integers: a b c: ");
        io::stderr().flush().ok();
    };

    let same_once_pairs = read_interactive_pairs(&mut lines, "same-once")?;
    let never_together_pairs = read_interactive_pairs(&mut lines, "never-together")?;

    Ok(ScheduleRequest {
        participants,
        tables,
        rounds,
        same_once_pairs,
        never_together_pairs,
        time_limit_seconds: None,
    })
}

fn read_interactive_pairs(lines: &mut io::Lines<io::StdinLock<'_>>, label: &str) -> Result<Vec<Pair>> {
    eprint!("Enter the number of {label} pairs: ");
    io::stderr().flush().ok();
    let count: u32 = loop {
        let line = lines.next().context("unexpected end of input")??;
        if let Ok(n) = line.trim().parse() {
            break n;
        }
        eprint!("Invalid. Enter an integer: ");
        io::stderr().flush().ok();
    };

    let mut pairs = Vec::with_capacity(count as usize);
    if count > 0 {
        eprintln!("Enter {count} lines of 'u v' pairs for {label}:");
    }
    for _ in 0..count {
        let pair = loop {
            let line = lines.next().context("unexpected end of input")??;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() == 2 {
                if let (Ok(u), Ok(v)) = (parts[0].parse(), parts[1].parse()) {
                    break Pair(u, v);
                }
            }
            eprint!("Invalid. Enter two integers: u v: ");
            io::stderr().flush().ok();
        };
        pairs.push(pair);
    }
    Ok(pairs)
}

fn cmd_schema() -> Result<()> {
    let request = ScheduleRequest {
        participants: 6,
        tables: 2,
        rounds: 3,
        same_once_pairs: vec![Pair(3, 5)],
        never_together_pairs: vec![Pair(4, 6)],
        time_limit_seconds: Some(30),
    };
    println!("=== REQUEST SCHEMA ===\n");
    println!("{}", serde_json::to_string_pretty(&request)?);

    let response = schedule(request).map_err(|e| anyhow::anyhow!("{e}"))?;
    println!("\n=== RESPONSE SCHEMA ===\n");
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
