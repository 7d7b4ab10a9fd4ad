use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use etx_ledger::RecordKey;
use etx_types::{Identifier, Timestamp};

#[derive(Parser)]
#[command(
    name = "etx",
    about = "ETX: validated ledger of energy trades",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with a `[ledger]` table
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the check digit for a five-digit payload
    CheckDigit(CheckDigitArgs),
    /// Check six-digit identifiers
    Validate(ValidateArgs),
    /// Append check digits to a file of id triples
    Annotate(AnnotateArgs),
    /// Compare error detection across check-digit schemes
    Bench(BenchArgs),
    /// Load trades and print a report
    Report(ReportArgs),
}

#[derive(Args)]
pub struct CheckDigitArgs {
    pub payload: u32,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[arg(required = true)]
    pub numbers: Vec<u32>,
}

#[derive(Args)]
pub struct AnnotateArgs {
    #[arg(short, long)]
    pub input: PathBuf,
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct BenchArgs {
    #[arg(long, default_value = "10000")]
    pub samples: usize,
    #[arg(long, default_value = "50")]
    pub errors: usize,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Enumerate every error instead of sampling
    #[arg(long)]
    pub exhaustive: bool,
}

#[derive(Args)]
pub struct ReportArgs {
    /// JSON array of trades; the reference set is used when omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    #[command(subcommand)]
    pub view: ReportView,
}

#[derive(Subcommand)]
pub enum ReportView {
    /// List every trade
    Transactions {
        #[arg(long, value_enum)]
        sort_by: Option<SortKey>,
    },
    /// Trades inside a time window (YYYY-MM-DDTHH:MM)
    Between {
        #[arg(long)]
        from: Timestamp,
        #[arg(long)]
        to: Timestamp,
    },
    /// The trade with the most energy
    MaxEnergy,
    /// Sellers by revenue
    Sellers,
    /// Buyers by energy bought
    Buyers,
    /// Seller-buyer pairs by trade count
    Pairs,
    /// The pair with the most trades
    MaxPair,
    /// Total revenue of one seller
    Revenue {
        #[arg(long)]
        seller: Identifier,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    Month,
    Seller,
    Buyer,
    Pair,
    Energy,
    Time,
}

impl From<SortKey> for RecordKey {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Month => RecordKey::Month,
            SortKey::Seller => RecordKey::SellerId,
            SortKey::Buyer => RecordKey::BuyerId,
            SortKey::Pair => RecordKey::PairKey,
            SortKey::Energy => RecordKey::Energy,
            SortKey::Time => RecordKey::Time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_check_digit() {
        let cli = Cli::try_parse_from(["etx", "check-digit", "12345"]).unwrap();
        if let Command::CheckDigit(args) = cli.command {
            assert_eq!(args.payload, 12345);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_validate_many() {
        let cli = Cli::try_parse_from(["etx", "validate", "123455", "123456"]).unwrap();
        if let Command::Validate(args) = cli.command {
            assert_eq!(args.numbers, vec![123455, 123456]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn validate_needs_a_number() {
        assert!(Cli::try_parse_from(["etx", "validate"]).is_err());
    }

    #[test]
    fn parse_annotate() {
        let cli = Cli::try_parse_from(["etx", "annotate", "-i", "in.txt", "-o", "out.txt"]).unwrap();
        if let Command::Annotate(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("in.txt"));
            assert_eq!(args.output, PathBuf::from("out.txt"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_bench_defaults() {
        let cli = Cli::try_parse_from(["etx", "bench"]).unwrap();
        if let Command::Bench(args) = cli.command {
            assert_eq!(args.samples, 10_000);
            assert_eq!(args.errors, 50);
            assert_eq!(args.seed, None);
            assert!(!args.exhaustive);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_report_sorted() {
        let cli = Cli::try_parse_from(["etx", "report", "transactions", "--sort-by", "energy"]).unwrap();
        if let Command::Report(args) = cli.command {
            assert!(args.input.is_none());
            assert!(matches!(args.view, ReportView::Transactions { sort_by: Some(SortKey::Energy) }));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_report_between() {
        let cli = Cli::try_parse_from([
            "etx", "report", "between", "--from", "2023-01-01T00:00", "--to", "2023-12-31T23:59",
        ])
        .unwrap();
        if let Command::Report(ReportArgs { view: ReportView::Between { from, to }, .. }) = cli.command {
            assert_eq!(from, Timestamp::new(1, 1, 2023, 0, 0));
            assert_eq!(to, Timestamp::new(31, 12, 2023, 23, 59));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn report_rejects_bad_timestamp() {
        assert!(Cli::try_parse_from([
            "etx", "report", "between", "--from", "2023-02-30T00:00", "--to", "2023-12-31T23:59",
        ])
        .is_err());
    }

    #[test]
    fn parse_revenue_checks_identifier() {
        let cli = Cli::try_parse_from(["etx", "report", "revenue", "--seller", "345686"]).unwrap();
        if let Command::Report(ReportArgs { view: ReportView::Revenue { seller }, .. }) = cli.command {
            assert_eq!(seller.value(), 345686);
        } else { panic!("wrong command"); }
        assert!(Cli::try_parse_from(["etx", "report", "revenue", "--seller", "345687"]).is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "etx", "--format", "json", "--config", "etx.toml", "-v", "report", "max-pair",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("etx.toml")));
        assert!(matches!(cli.command, Command::Report(ReportArgs { view: ReportView::MaxPair, .. })));
    }

    #[test]
    fn sort_keys_map_to_record_keys() {
        assert_eq!(RecordKey::from(SortKey::Pair), RecordKey::PairKey);
        assert_eq!(RecordKey::from(SortKey::Month), RecordKey::Month);
    }
}
