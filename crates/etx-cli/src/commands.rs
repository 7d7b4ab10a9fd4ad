use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use etx_check::{all_schemes, DetectionBenchmark, DetectionReport, SchemeDetection, PAYLOAD_MAX, PAYLOAD_MIN};
use etx_ledger::{reference_trades, Buyer, Ledger, LedgerConfig, Pair, Seller, SortRequest, TransactionRecord};
use etx_types::TransactionDraft;

use crate::annotate;
use crate::cli::*;
use crate::config;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::CheckDigit(args) => cmd_check_digit(args, format),
        Command::Validate(args) => cmd_validate(args, format),
        Command::Annotate(args) => cmd_annotate(args, format),
        Command::Bench(args) => cmd_bench(args, format),
        Command::Report(args) => {
            let config = config::load(cli.config.as_deref())?;
            cmd_report(args, config, format)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct CheckDigitOutput {
    payload: u32,
    check_digit: u8,
    identifier: u32,
}

fn cmd_check_digit(args: CheckDigitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let check_digit = etx_check::check_digit(args.payload)
        .with_context(|| format!("payload must lie in {PAYLOAD_MIN}..={PAYLOAD_MAX}"))?;
    let identifier = args.payload * 10 + u32::from(check_digit);
    match format {
        OutputFormat::Json => print_json(&CheckDigitOutput {
            payload: args.payload,
            check_digit,
            identifier,
        }),
        OutputFormat::Text => {
            println!(
                "{} {} → {} (check digit {})",
                "✓".green().bold(),
                args.payload,
                identifier.to_string().yellow().bold(),
                check_digit
            );
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct ValidateOutput {
    number: u32,
    valid: bool,
}

fn cmd_validate(args: ValidateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let results: Vec<ValidateOutput> = args
        .numbers
        .iter()
        .map(|&number| ValidateOutput {
            number,
            valid: etx_types::is_valid_identifier(number),
        })
        .collect();
    match format {
        OutputFormat::Json => print_json(&results),
        OutputFormat::Text => {
            for result in &results {
                if result.valid {
                    println!("{} {} valid", "✓".green().bold(), result.number);
                } else {
                    println!("{} {} invalid", "✗".red().bold(), result.number);
                }
            }
            Ok(())
        }
    }
}

fn cmd_annotate(args: AnnotateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let summary = annotate::annotate_file(&args.input, &args.output)?;
    match format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Text => {
            println!(
                "{} Annotated {} into {}",
                "✓".green().bold(),
                args.input.display(),
                args.output.display().to_string().bold()
            );
            println!("  Valid lines: {}", summary.annotated.to_string().green());
            println!("  Invalid lines: {}", summary.invalid.to_string().red());
            Ok(())
        }
    }
}

fn cmd_bench(args: BenchArgs, format: OutputFormat) -> anyhow::Result<()> {
    let schemes = all_schemes();
    let report = if args.exhaustive {
        let rows: Vec<SchemeDetection> = schemes
            .iter()
            .map(|scheme| DetectionBenchmark::exhaustive(scheme.as_ref()))
            .collect();
        DetectionReport {
            samples: (PAYLOAD_MAX - PAYLOAD_MIN + 1) as usize,
            errors_per_sample: 0,
            schemes: rows,
        }
    } else {
        let defaults = DetectionBenchmark::default();
        DetectionBenchmark {
            samples: args.samples,
            errors_per_sample: args.errors,
            seed: args.seed.unwrap_or(defaults.seed),
        }
        .run(&schemes)
    };

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            if args.exhaustive {
                println!("Exhaustive run over {} payloads", report.samples.to_string().bold());
            } else {
                println!(
                    "Sampled {} payloads, {} errors of each kind per payload",
                    report.samples.to_string().bold(),
                    report.errors_per_sample
                );
            }
            println!(
                "{:<16} {:>12} {:>10} {:>12} {:>10}",
                "scheme", "substituted", "missed %", "transposed", "missed %"
            );
            for row in &report.schemes {
                println!(
                    "{:<16} {:>12} {:>10.3} {:>12} {:>10.3}",
                    row.scheme.cyan(),
                    row.substitutions_tested,
                    row.substitution_rate(),
                    row.transpositions_tested,
                    row.transposition_rate()
                );
            }
            Ok(())
        }
    }
}

fn load_drafts(input: Option<&Path>) -> anyhow::Result<Vec<TransactionDraft>> {
    let Some(path) = input else {
        return Ok(reference_trades());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing trades in {}", path.display()))
}

fn build_ledger(input: Option<&Path>, config: LedgerConfig, format: OutputFormat) -> anyhow::Result<Ledger> {
    let drafts = load_drafts(input)?;
    let mut ledger = Ledger::new(config).context("creating ledger")?;
    for draft in drafts {
        if let Err(err) = ledger.insert(draft) {
            if format == OutputFormat::Text {
                eprintln!("{} {}", "skipped:".yellow(), err);
            }
        }
    }
    debug!(records = ledger.len(), "ledger loaded");
    Ok(ledger)
}

fn cmd_report(args: ReportArgs, config: LedgerConfig, format: OutputFormat) -> anyhow::Result<()> {
    let mut ledger = build_ledger(args.input.as_deref(), config, format)?;

    match args.view {
        ReportView::Transactions { sort_by } => {
            if let Some(key) = sort_by {
                ledger.sort_records(key.into());
            }
            let records: Vec<&TransactionRecord> = ledger.records().iter().collect();
            show_records(&records, format)
        }
        ReportView::Between { from, to } => {
            let records = ledger.records_between(from, to)?;
            show_records(&records, format)
        }
        ReportView::MaxEnergy => match ledger.max_energy_transaction() {
            Some(record) => show_records(&[record], format),
            None => empty(format),
        },
        ReportView::Sellers => {
            ledger.rebuild_derived();
            ledger.sort(SortRequest::Sellers);
            show_sellers(ledger.sellers(), format)
        }
        ReportView::Buyers => {
            ledger.rebuild_derived();
            ledger.sort(SortRequest::Buyers);
            show_buyers(ledger.buyers(), format)
        }
        ReportView::Pairs => {
            ledger.rebuild_derived();
            ledger.sort(SortRequest::Pairs);
            show_pairs(ledger.pairs(), format)
        }
        ReportView::MaxPair => {
            ledger.rebuild_derived();
            match ledger.pair_with_max_transactions() {
                Some(pair) => show_pairs(std::slice::from_ref(pair), format),
                None => empty(format),
            }
        }
        ReportView::Revenue { seller } => {
            let revenue = ledger.revenue_of_seller(seller)?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "seller": seller,
                    "revenue": revenue,
                })),
                OutputFormat::Text => {
                    println!("Seller {} revenue: {}", seller.to_string().yellow(), format!("{revenue:.2}").bold());
                    Ok(())
                }
            }
        }
    }
}

fn empty(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::Value::Null),
        OutputFormat::Text => {
            println!("No transactions.");
            Ok(())
        }
    }
}

fn show_records(records: &[&TransactionRecord], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(records);
    }
    if records.is_empty() {
        println!("No transactions.");
        return Ok(());
    }
    for record in records {
        println!(
            "{}  {} → {}  {:>8.2} kWh @ {:>6.2}  = {:>9.2}  {}",
            record.id.to_string().yellow().bold(),
            record.seller,
            record.buyer,
            record.energy,
            record.price,
            record.value,
            record.timestamp.to_string().dimmed()
        );
    }
    Ok(())
}

fn tier(price: Option<f64>) -> String {
    price.map_or_else(|| "-".to_string(), |p| format!("{p:.2}"))
}

fn show_sellers(sellers: &[Seller], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(sellers);
    }
    for seller in sellers {
        println!(
            "{}  revenue {:>10.2}  low tier {:>6}  high tier {:>6}",
            seller.id.to_string().yellow().bold(),
            seller.revenue,
            tier(seller.low_tier_price),
            tier(seller.high_tier_price)
        );
        if !seller.regular_buyers.is_empty() {
            let regulars: Vec<String> = seller.regular_buyers.iter().map(ToString::to_string).collect();
            println!("  regular buyers: {}", regulars.join(", ").cyan());
        }
    }
    Ok(())
}

fn show_buyers(buyers: &[Buyer], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(buyers);
    }
    for buyer in buyers {
        println!("{}  energy {:>10.2} kWh", buyer.id.to_string().yellow().bold(), buyer.energy);
    }
    Ok(())
}

fn show_pairs(pairs: &[Pair], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(pairs);
    }
    for pair in pairs {
        println!(
            "{} → {}  {} trade(s)  revenue {:.2}",
            pair.seller.to_string().yellow().bold(),
            pair.buyer.to_string().yellow(),
            pair.transactions.to_string().bold(),
            pair.revenue
        );
    }
    Ok(())
}
