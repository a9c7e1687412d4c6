//! Batch comparison of two text columns.
//!
//! Loads a JSON table, resolves two named columns, compares every row with
//! the [`chardiff_core`] engine and appends the differing characters as a new
//! column. Rows are independent, so they are compared on the rayon pool
//! unless the configuration asks for a serial run.
//!
//! # Quick Start
//!
//! ```rust
//! use chardiff_batch::{run_batch, BatchConfig, Table};
//!
//! let mut table = Table::from_json_str(
//!     r#"{"columns": ["before", "after"], "rows": [["kitten", "sitting"], [null, null]]}"#,
//! ).unwrap();
//! let mut config = BatchConfig::for_columns("before", "after");
//! config.output_column = "diff".into();
//!
//! let report = run_batch(&mut table, &config).unwrap();
//! assert_eq!(report.rows_with_differences, 1);
//! assert_eq!(table.rows[0][2], "e, g, i, k, s");
//! assert_eq!(table.rows[1][2], "");
//! ```

pub mod config;
pub mod error;
pub mod runner;
pub mod table;

pub use config::{BatchConfig, DEFAULT_OUTPUT_COLUMN};
pub use error::{BatchError, BatchResult};
pub use runner::{compare_pair, compare_pairs, run_batch, BatchReport, RowOutcome};
pub use table::{cell_text, Table};
