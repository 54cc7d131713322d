use anyhow::{anyhow, Result};
use std::env;
use std::path::Path;
use std::process;

use iban_check::{batch_summary, load_csv, validate, validate_batch};

const USAGE: &str = "\
Usage:
  iban-check check <IBAN>...          Validate one or more IBANs
  iban-check import <file.csv> [--json]
                                      Validate a CSV with columns reference,iban";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("check") if args.len() > 2 => {
            let all_valid = run_check(&args[2..]);
            if !all_valid {
                process::exit(1);
            }
        }
        Some("import") if args.len() > 2 => {
            let json = args[3..].iter().any(|a| a == "--json");
            run_import(Path::new(&args[2]), json)?;
        }
        Some("--version") => println!("iban-check {}", iban_check::VERSION),
        _ => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    }

    Ok(())
}

/// Print one line per IBAN; returns false if any was invalid
fn run_check(inputs: &[String]) -> bool {
    let mut all_valid = true;

    for input in inputs {
        match validate(input) {
            Ok(iban) => println!("✓ {}  ({})", iban.print_format(), iban.masked()),
            Err(err) => {
                all_valid = false;
                println!("✗ {}  {}", input, err);
            }
        }
    }

    all_valid
}

fn run_import(csv_path: &Path, json: bool) -> Result<()> {
    if !csv_path.exists() {
        return Err(anyhow!("CSV file not found: {}", csv_path.display()));
    }

    log::info!("Importing IBANs from {}", csv_path.display());
    let records = load_csv(csv_path)?;
    let reports = validate_batch(&records);
    let summary = batch_summary(&reports);

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("🏦 IBAN Import - {}", csv_path.display());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for (line, report) in reports.iter().enumerate() {
        if report.valid {
            continue;
        }
        println!(
            "✗ line {} {}: {}",
            line + 2,
            report.reference.as_deref().unwrap_or("-"),
            report.message.as_deref().unwrap_or("invalid")
        );
    }

    println!("\n{}", summary.summary());
    for (country, count) in &summary.by_country {
        println!("  {}: {}", country, count);
    }

    Ok(())
}
