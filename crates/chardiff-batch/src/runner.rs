//! Row-by-row comparison of two table columns.

use std::borrow::Cow;

use chardiff_core::TextDiffer;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::BatchConfig;
use crate::error::BatchResult;
use crate::table::Table;

/// Result of comparing one row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RowOutcome {
    /// Rendered differing characters; empty when the values agree.
    pub delta: String,
    /// Similarity ratio in `[0, 1]`.
    pub ratio: f64,
}

impl RowOutcome {
    pub fn has_differences(&self) -> bool {
        !self.delta.is_empty()
    }
}

/// Summary of a batch run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchReport {
    pub left_column: String,
    pub right_column: String,
    pub output_column: String,
    pub rows: usize,
    pub rows_with_differences: usize,
    pub outcomes: Vec<RowOutcome>,
}

impl BatchReport {
    pub fn identical_rows(&self) -> usize {
        self.rows - self.rows_with_differences
    }
}

/// Compare one pair of possibly-missing values.
pub fn compare_pair(differ: &TextDiffer, left: Option<&str>, right: Option<&str>) -> RowOutcome {
    let comparison = differ.compare_values(left, right);
    RowOutcome {
        delta: differ.render(&comparison),
        ratio: comparison.ratio(),
    }
}

/// Compare every pair, in order, serially or on the rayon pool.
pub fn compare_pairs(
    pairs: &[(Option<Cow<'_, str>>, Option<Cow<'_, str>>)],
    config: &BatchConfig,
) -> BatchResult<Vec<RowOutcome>> {
    let differ = config.differ();
    let run = |(left, right): &(Option<Cow<'_, str>>, Option<Cow<'_, str>>)| {
        compare_pair(&differ, left.as_deref(), right.as_deref())
    };

    if !config.parallel {
        return Ok(pairs.iter().map(run).collect());
    }

    match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            debug!(threads, "comparing rows on dedicated pool");
            Ok(pool.install(|| pairs.par_iter().map(run).collect()))
        }
        None => Ok(pairs.par_iter().map(run).collect()),
    }
}

/// Compare the configured columns of `table` and write the result column
/// (and the ratio column, if configured) back into it.
pub fn run_batch(table: &mut Table, config: &BatchConfig) -> BatchResult<BatchReport> {
    if config.trim_headers {
        table.trim_headers();
    }
    let (left, right) = config.columns()?;
    let left_idx = table.column_index(left, config.trim_headers)?;
    let right_idx = table.column_index(right, config.trim_headers)?;
    let left_name = table.columns[left_idx].clone();
    let right_name = table.columns[right_idx].clone();

    info!(
        left = %left_name,
        right = %right_name,
        rows = table.len(),
        parallel = config.parallel,
        "comparing columns"
    );

    let pairs: Vec<_> = (0..table.len())
        .map(|row| (table.text(row, left_idx), table.text(row, right_idx)))
        .collect();
    let outcomes = compare_pairs(&pairs, config)?;

    let deltas = outcomes
        .iter()
        .map(|o| Value::String(o.delta.clone()))
        .collect();
    table.set_column(&config.output_column, deltas)?;
    if let Some(ratio_column) = &config.ratio_column {
        let ratios = outcomes.iter().map(|o| Value::from(o.ratio)).collect();
        table.set_column(ratio_column, ratios)?;
    }

    let rows_with_differences = outcomes.iter().filter(|o| o.has_differences()).count();
    info!(
        rows = outcomes.len(),
        differing = rows_with_differences,
        output = %config.output_column,
        "comparison complete"
    );

    Ok(BatchReport {
        left_column: left_name,
        right_column: right_name,
        output_column: config.output_column.clone(),
        rows: outcomes.len(),
        rows_with_differences,
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BatchError;
    use serde_json::json;

    fn lyrics_table() -> Table {
        Table::from_json_str(
            r#"{
                "columns": [" original ", "edited ", "note"],
                "rows": [
                    ["kitten", "sitting", 1],
                    ["abc", "abc", 2],
                    [null, null, 3],
                    [null, "abc", 4],
                    ["café", "cafe", 5],
                    [12, 13, 6]
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn compares_each_row_and_appends_column() {
        let mut table = lyrics_table();
        let config = BatchConfig::for_columns("original", "edited");
        let report = run_batch(&mut table, &config).unwrap();

        assert_eq!(table.columns, vec!["original", "edited", "note", "差異字元"]);
        let out: Vec<&Value> = table.rows.iter().map(|r| &r[3]).collect();
        assert_eq!(
            out,
            vec![
                &json!("e, g, i, k, s"),
                &json!(""),
                &json!(""),
                &json!("a, b, c"),
                &json!("e, é"),
                &json!("2, 3"),
            ]
        );
        assert_eq!(report.rows, 6);
        assert_eq!(report.rows_with_differences, 4);
        assert_eq!(report.identical_rows(), 2);
        assert_eq!(report.left_column, "original");
    }

    #[test]
    fn serial_and_parallel_agree() {
        let mut serial_table = lyrics_table();
        let mut serial = BatchConfig::for_columns("original", "edited");
        serial.parallel = false;
        let serial_report = run_batch(&mut serial_table, &serial).unwrap();

        let mut pooled_table = lyrics_table();
        let mut pooled = BatchConfig::for_columns("original", "edited");
        pooled.threads = Some(3);
        let pooled_report = run_batch(&mut pooled_table, &pooled).unwrap();

        assert_eq!(serial_report, pooled_report);
        assert_eq!(serial_table, pooled_table);
    }

    #[test]
    fn ratio_column_is_optional() {
        let mut table = lyrics_table();
        let mut config = BatchConfig::for_columns("original", "edited");
        config.output_column = "diff".into();
        config.ratio_column = Some("similarity".into());
        run_batch(&mut table, &config).unwrap();

        assert_eq!(table.columns, vec!["original", "edited", "note", "diff", "similarity"]);
        assert_eq!(table.rows[1][4], json!(1.0));
        assert_eq!(table.rows[3][4], json!(0.0));
    }

    #[test]
    fn unknown_column_lists_choices() {
        let mut table = lyrics_table();
        let config = BatchConfig::for_columns("original", "revised");
        let err = run_batch(&mut table, &config).unwrap_err();
        assert_eq!(
            err,
            BatchError::ColumnNotFound {
                column: "revised".into(),
                available: vec!["original".into(), "edited".into(), "note".into()],
            }
        );
        // Nothing was written.
        assert_eq!(table.columns.len(), 3);
    }

    #[test]
    fn untrimmed_headers_need_exact_names() {
        let mut table = lyrics_table();
        let mut config = BatchConfig::for_columns("original", "edited");
        config.trim_headers = false;
        assert!(matches!(
            run_batch(&mut table, &config),
            Err(BatchError::ColumnNotFound { .. })
        ));

        let config = BatchConfig {
            trim_headers: false,
            ..BatchConfig::for_columns(" original ", "edited ")
        };
        assert!(run_batch(&mut table, &config).is_ok());
    }

    #[test]
    fn rerun_replaces_output_column() {
        let mut table = lyrics_table();
        let config = BatchConfig::for_columns("original", "edited");
        run_batch(&mut table, &config).unwrap();
        run_batch(&mut table, &config).unwrap();
        assert_eq!(table.columns.len(), 4);
    }

    #[test]
    fn same_column_twice_is_all_identical() {
        let mut table = lyrics_table();
        let config = BatchConfig::for_columns("edited", "edited");
        let report = run_batch(&mut table, &config).unwrap();
        assert_eq!(report.rows_with_differences, 0);
    }

    #[test]
    fn compare_pair_normalizes_missing() {
        let differ = TextDiffer::new();
        assert_eq!(compare_pair(&differ, None, None).delta, "");
        assert_eq!(compare_pair(&differ, None, Some("ab")).delta, "a, b");
        assert_eq!(compare_pair(&differ, None, Some("ab")).ratio, 0.0);
    }
}
