pub mod summarizer;
pub mod types;
pub mod utils;

pub use summarizer::{summarize, ExcelSummarizer};
pub use types::{AnalysisResult, CellValue, ColumnRequest, ColumnSummary, SummaryError};
