use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "chardiff",
    about = "chardiff: report the characters that differ between paired text values",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two values and print their differing characters
    Compare(CompareArgs),
    /// Compare two columns of a JSON table row by row
    Batch(BatchArgs),
    /// List the columns of a JSON table
    Columns(ColumnsArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    pub left: String,
    pub right: String,
    /// Also print the edit script
    #[arg(long)]
    pub opcodes: bool,
    #[command(flatten)]
    pub matching: MatchingArgs,
}

#[derive(Args)]
pub struct MatchingArgs {
    /// Ignore characters that are very frequent in long right-hand values
    #[arg(long)]
    pub auto_junk: bool,
    /// Characters that never anchor an alignment
    #[arg(long)]
    pub junk: Option<String>,
    /// Joins the reported characters
    #[arg(long)]
    pub separator: Option<String>,
}

#[derive(Args)]
pub struct BatchArgs {
    pub input: PathBuf,
    #[arg(short, long)]
    pub left: Option<String>,
    #[arg(short, long)]
    pub right: Option<String>,
    /// Write the result table here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub output_column: Option<String>,
    #[arg(long)]
    pub ratio_column: Option<String>,
    /// TOML file with batch settings; flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Compare rows on the current thread
    #[arg(long)]
    pub serial: bool,
    #[arg(long)]
    pub threads: Option<usize>,
    #[command(flatten)]
    pub matching: MatchingArgs,
}

#[derive(Args)]
pub struct ColumnsArgs {
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_compare() {
        let cli = Cli::try_parse_from(["chardiff", "compare", "kitten", "sitting"]).unwrap();
        if let Command::Compare(args) = cli.command {
            assert_eq!(args.left, "kitten");
            assert_eq!(args.right, "sitting");
            assert!(!args.opcodes);
            assert!(!args.matching.auto_junk);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_compare_with_matching_flags() {
        let cli = Cli::try_parse_from([
            "chardiff", "compare", "a b", "a  c", "--opcodes", "--auto-junk", "--junk", " ", "--separator", "|",
        ])
        .unwrap();
        if let Command::Compare(args) = cli.command {
            assert!(args.opcodes);
            assert!(args.matching.auto_junk);
            assert_eq!(args.matching.junk, Some(" ".into()));
            assert_eq!(args.matching.separator, Some("|".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_compare_empty_values() {
        let cli = Cli::try_parse_from(["chardiff", "compare", "", "abc"]).unwrap();
        if let Command::Compare(args) = cli.command {
            assert_eq!(args.left, "");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_batch() {
        let cli = Cli::try_parse_from([
            "chardiff", "batch", "rows.json", "-l", "original", "-r", "edited", "-o", "out.json",
        ])
        .unwrap();
        if let Command::Batch(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("rows.json"));
            assert_eq!(args.left, Some("original".into()));
            assert_eq!(args.right, Some("edited".into()));
            assert_eq!(args.output, Some(PathBuf::from("out.json")));
            assert!(!args.serial);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_batch_with_config_and_threads() {
        let cli = Cli::try_parse_from([
            "chardiff", "batch", "rows.json", "--config", "chardiff.toml", "--threads", "4", "--serial",
        ])
        .unwrap();
        if let Command::Batch(args) = cli.command {
            assert_eq!(args.config, Some(PathBuf::from("chardiff.toml")));
            assert_eq!(args.threads, Some(4));
            assert!(args.serial);
            assert!(args.left.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_columns() {
        let cli = Cli::try_parse_from(["chardiff", "columns", "rows.json"]).unwrap();
        assert!(matches!(cli.command, Command::Columns(_)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["chardiff", "--verbose", "columns", "x.json"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["chardiff", "--format", "json", "compare", "a", "b"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn compare_requires_two_values() {
        assert!(Cli::try_parse_from(["chardiff", "compare", "only"]).is_err());
    }
}
