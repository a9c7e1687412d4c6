use anyhow::Context;
use chardiff_batch::{run_batch, BatchConfig, BatchError, BatchReport, Table};
use chardiff_core::{Comparison, OpTag, Opcode, TextDiffer};
use colored::Colorize;
use serde::Serialize;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Compare(args) => cmd_compare(args, &cli.format),
        Command::Batch(args) => cmd_batch(args, &cli.format),
        Command::Columns(args) => cmd_columns(args, &cli.format),
    }
}

/// JSON shape of `chardiff compare`.
#[derive(Serialize)]
struct CompareOutput<'a> {
    left: &'a str,
    right: &'a str,
    delta: String,
    ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    opcodes: Option<&'a [Opcode]>,
}

fn differ_for(matching: &MatchingArgs) -> TextDiffer {
    let mut differ = TextDiffer::new().with_auto_junk(matching.auto_junk);
    if let Some(junk) = &matching.junk {
        differ = differ.with_junk_chars(junk.chars());
    }
    if let Some(separator) = &matching.separator {
        differ = differ.with_separator(separator.clone());
    }
    differ
}

fn cmd_compare(args: CompareArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let differ = differ_for(&args.matching);
    let comparison = differ.compare(&args.left, &args.right);
    let delta = differ.render(&comparison);

    match format {
        OutputFormat::Json => {
            let out = CompareOutput {
                left: &args.left,
                right: &args.right,
                delta,
                ratio: comparison.ratio(),
                opcodes: args.opcodes.then_some(comparison.opcodes.as_slice()),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if args.opcodes {
                for line in opcode_lines(&args.left, &args.right, &comparison) {
                    println!("{line}");
                }
                println!();
            }
            if delta.is_empty() {
                println!("{} No differing characters.", "✓".green().bold());
            } else {
                println!("{delta}");
            }
        }
    }
    Ok(())
}

/// One line per opcode: tag, spans, and the text each span covers.
fn opcode_lines(left: &str, right: &str, comparison: &Comparison<char>) -> Vec<String> {
    let a: Vec<char> = left.chars().collect();
    let b: Vec<char> = right.chars().collect();
    comparison
        .opcodes
        .iter()
        .map(|op| {
            let a_text: String = a[op.a_range()].iter().collect();
            let b_text: String = b[op.b_range()].iter().collect();
            let tag = format!("{:<7}", op.tag);
            let tag = match op.tag {
                OpTag::Equal => tag.dimmed(),
                OpTag::Replace => tag.yellow(),
                OpTag::Delete => tag.red(),
                OpTag::Insert => tag.green(),
            };
            format!(
                "{tag} a[{}:{}] {:?} -> b[{}:{}] {:?}",
                op.a_start, op.a_end, a_text, op.b_start, op.b_end, b_text
            )
        })
        .collect()
}

/// Settings for a batch run: the config file, then command-line overrides.
fn batch_config(args: &BatchArgs) -> anyhow::Result<BatchConfig> {
    let mut config = match &args.config {
        Some(path) => BatchConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BatchConfig::default(),
    };

    if let Some(left) = &args.left {
        config.left_column = Some(left.clone());
    }
    if let Some(right) = &args.right {
        config.right_column = Some(right.clone());
    }
    if let Some(output_column) = &args.output_column {
        config.output_column = output_column.clone();
    }
    if let Some(ratio_column) = &args.ratio_column {
        config.ratio_column = Some(ratio_column.clone());
    }
    if args.serial {
        config.parallel = false;
    }
    if let Some(threads) = args.threads {
        config.threads = Some(threads);
    }
    if args.matching.auto_junk {
        config.auto_junk = true;
    }
    if let Some(junk) = &args.matching.junk {
        config.junk_chars = junk.clone();
    }
    if let Some(separator) = &args.matching.separator {
        config.separator = separator.clone();
    }
    Ok(config)
}

fn cmd_batch(args: BatchArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = batch_config(&args)?;
    let mut table = Table::load(&args.input)
        .with_context(|| format!("failed to read table {}", args.input.display()))?;

    let report = match run_batch(&mut table, &config) {
        Ok(report) => report,
        Err(BatchError::ColumnNotFound { column, available }) => {
            print_missing_column(&column, &available);
            anyhow::bail!("column '{column}' not found in {}", args.input.display());
        }
        Err(e) => return Err(e.into()),
    };

    match &args.output {
        Some(path) => {
            table
                .save(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => {
                    print_summary(&report);
                    println!("  Written to {}", path.display().to_string().bold());
                }
            }
        }
        None => {
            // stdout carries the table; the summary goes to stderr.
            println!("{}", table.to_json_string()?);
            eprintln!(
                "{} {} of {} rows differ ({} vs {})",
                "✓".green().bold(),
                report.rows_with_differences,
                report.rows,
                report.left_column.yellow(),
                report.right_column.yellow(),
            );
        }
    }
    Ok(())
}

fn print_summary(report: &BatchReport) {
    println!(
        "{} Compared {} and {}",
        "✓".green().bold(),
        report.left_column.yellow(),
        report.right_column.yellow()
    );
    println!("  Rows: {}", report.rows.to_string().bold());
    println!(
        "  With differences: {}",
        report.rows_with_differences.to_string().red()
    );
    println!("  Identical: {}", report.identical_rows().to_string().green());
    println!("  Result column: {}", report.output_column.cyan());
}

fn print_missing_column(column: &str, available: &[String]) {
    eprintln!("{} Column '{}' not found.", "✗".red().bold(), column.yellow());
    eprintln!("Available columns:");
    for name in available {
        eprintln!("  -> '{}'", name.cyan());
    }
}

fn cmd_columns(args: ColumnsArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut table = Table::load(&args.input)
        .with_context(|| format!("failed to read table {}", args.input.display()))?;
    table.trim_headers();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table.columns)?),
        OutputFormat::Text => {
            println!(
                "{} columns, {} rows",
                table.columns.len().to_string().bold(),
                table.len()
            );
            for name in &table.columns {
                println!("  -> '{}'", name.cyan());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn batch_args(argv: &[&str]) -> BatchArgs {
        let mut full = vec!["chardiff", "batch"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Batch(args) => args,
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chardiff.toml");
        std::fs::write(
            &path,
            "left_column = \"a\"\nright_column = \"b\"\nseparator = \"/\"\nthreads = 2\n",
        )
        .unwrap();

        let args = batch_args(&[
            "rows.json",
            "--config",
            path.to_str().unwrap(),
            "--right",
            "c",
            "--serial",
        ]);
        let config = batch_config(&args).unwrap();
        assert_eq!(config.left_column.as_deref(), Some("a"));
        assert_eq!(config.right_column.as_deref(), Some("c"));
        assert_eq!(config.separator, "/");
        assert_eq!(config.threads, Some(2));
        assert!(!config.parallel);
    }

    #[test]
    fn defaults_without_config_file() {
        let config = batch_config(&batch_args(&["rows.json", "-l", "x", "-r", "y"])).unwrap();
        assert_eq!(config.columns().unwrap(), ("x", "y"));
        assert!(config.parallel);
        assert_eq!(config.output_column, chardiff_batch::DEFAULT_OUTPUT_COLUMN);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = batch_args(&["rows.json", "--config", "/no/such/chardiff.toml"]);
        assert!(batch_config(&args).is_err());
    }

    #[test]
    fn opcode_lines_show_covered_text() {
        colored::control::set_override(false);
        let comparison = TextDiffer::new().compare("café", "cafe");
        let lines = opcode_lines("café", "cafe", &comparison);
        assert_eq!(
            lines,
            vec![
                r#"equal   a[0:3] "caf" -> b[0:3] "caf""#.to_string(),
                r#"replace a[3:4] "é" -> b[3:4] "e""#.to_string(),
            ]
        );
    }

    #[test]
    fn matching_flags_build_differ() {
        let matching = MatchingArgs {
            auto_junk: true,
            junk: Some(" ".into()),
            separator: Some("".into()),
        };
        let differ = differ_for(&matching);
        assert!(differ.auto_junk);
        assert_eq!(differ.junk_chars, vec![' ']);
        assert_eq!(differ.diff("kitten", "sitting"), "egiks");
    }
}
