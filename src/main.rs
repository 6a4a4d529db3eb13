//! settlement-engine CLI
//!
//! Settle a shared-expense ledger from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Settle a ledger file
//! settlement-engine settle --input ledger.json
//!
//! # Output as JSON
//! settlement-engine settle --input ledger.json --format json
//!
//! # Generate a random ledger for testing
//! settlement-engine generate --participants 8 --expenses 40
//! ```

use log::{error, info};
use rust_decimal::Decimal;
use settlement_engine::config::EngineConfig;
use settlement_engine::core::expense::{Expense, Share};
use settlement_engine::core::ledger::LedgerSnapshot;
use settlement_engine::core::participant::Participant;
use settlement_engine::settlement::engine::SettlementEngine;
use settlement_engine::simulation::stress_test::{generate_random_ledger, LedgerConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"settlement-engine — shared-expense balance settlement

USAGE:
    settlement-engine <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute net balances and a transfer plan for a ledger
    generate    Generate a random ledger (for testing)
    help        Show this message

OPTIONS (settle):
    --input <FILE>      Path to JSON ledger file
    --format <FORMAT>   Output format: text (default) or json
    --config <FILE>     JSON engine config (epsilon, scale, pass_cap)

OPTIONS (generate):
    --participants <N>  Number of participants (default: 6)
    --expenses <N>      Number of expenses (default: 20)
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG            Log level, e.g. RUST_LOG=debug

EXAMPLES:
    settlement-engine settle --input trip.json
    settlement-engine settle --input trip.json --format json
    settlement-engine generate --participants 10 --expenses 50 --output trip.json"#
    );
}

/// JSON schema for an input share.
#[derive(serde::Deserialize, serde::Serialize)]
struct ShareInput {
    participant: u64,
    amount: String,
}

/// JSON schema for an input expense.
#[derive(serde::Deserialize, serde::Serialize)]
struct ExpenseInput {
    payer: u64,
    amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    shares: Vec<ShareInput>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct LedgerFile {
    participants: Vec<Participant>,
    #[serde(default)]
    expenses: Vec<ExpenseInput>,
}

fn parse_amount(raw: &str) -> Decimal {
    raw.parse().unwrap_or_else(|e| {
        eprintln!("Invalid amount '{}': {}", raw, e);
        process::exit(1);
    })
}

fn load_ledger(path: &str) -> LedgerSnapshot {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: LedgerFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(r#"{{
  "participants": [{{ "id": 1, "label": "alice" }}, {{ "id": 2, "label": "bob" }}],
  "expenses": [
    {{ "payer": 1, "amount": "90.00", "description": "dinner",
       "shares": [{{ "participant": 1, "amount": "45.00" }}, {{ "participant": 2, "amount": "45.00" }}] }}
  ]
}}"#);
        process::exit(1);
    });

    let mut expenses = Vec::with_capacity(file.expenses.len());
    for (index, input) in file.expenses.into_iter().enumerate() {
        let shares = input
            .shares
            .iter()
            .map(|s| Share::new(s.participant, parse_amount(&s.amount)))
            .collect();
        let expense = Expense::new(input.payer, parse_amount(&input.amount), shares)
            .unwrap_or_else(|e| {
                error!("rejecting expense #{}: {}", index, e);
                eprintln!("Rejected expense #{}: {}", index, e);
                process::exit(1);
            });
        expenses.push(match input.description {
            Some(description) => expense.with_description(description),
            None => expense,
        });
    }

    LedgerSnapshot::new(file.participants, expenses)
}

fn cmd_settle(args: &[String]) {
    let mut input_path = None;
    let mut config_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--config" => {
                i += 1;
                config_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--config requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let config = match config_path {
        Some(p) => EngineConfig::from_file(&p).unwrap_or_else(|e| {
            eprintln!("Error loading config '{}': {}", p, e);
            process::exit(1);
        }),
        None => EngineConfig::default(),
    };

    let snapshot = load_ledger(&path);
    info!(
        "settling {} expenses across {} participants",
        snapshot.expenses().len(),
        snapshot.participant_count()
    );

    let report = SettlementEngine::new(config)
        .settle(&snapshot)
        .unwrap_or_else(|e| {
            eprintln!("Rejected: {}", e);
            process::exit(1);
        });

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        println!("{}", report);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = LedgerConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                config.participant_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--participants requires a number");
                        process::exit(1);
                    });
            }
            "--expenses" => {
                i += 1;
                config.expense_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--expenses requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let snapshot = generate_random_ledger(&config);

    let output = LedgerFile {
        participants: snapshot.participants().to_vec(),
        expenses: snapshot
            .expenses()
            .iter()
            .map(|e| ExpenseInput {
                payer: e.payer().value(),
                amount: e.amount().to_string(),
                description: e.description().map(str::to_owned),
                shares: e
                    .shares()
                    .iter()
                    .map(|s| ShareInput {
                        participant: s.participant.value(),
                        amount: s.amount.to_string(),
                    })
                    .collect(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            snapshot.expenses().len(),
            snapshot.participant_count(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
