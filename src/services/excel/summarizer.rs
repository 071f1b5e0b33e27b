use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use super::types::*;
use super::utils::*;

pub struct ExcelSummarizer;

impl ExcelSummarizer {
    /// Summarizes the requested columns of the first worksheet in `file_data`.
    ///
    /// The workbook format is detected from content, so xlsx, xlsm, xlsb, xls
    /// and ods payloads are all accepted regardless of `filename`.
    pub fn summarize(
        &self,
        file_data: &[u8],
        filename: &str,
        request: &ColumnRequest,
    ) -> Result<AnalysisResult, SummaryError> {
        let start = std::time::Instant::now();
        tracing::debug!("Opening workbook '{}' ({} bytes)", filename, file_data.len());

        let range = self.first_worksheet(file_data, filename)?;
        let result = self.summarize_range(&range, filename, request)?;

        tracing::debug!(
            "Summarized {} columns of '{}' in {:?}",
            result.summary.len(),
            filename,
            start.elapsed()
        );
        Ok(result)
    }

    fn first_worksheet(&self, file_data: &[u8], filename: &str) -> Result<Range<Data>, SummaryError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(file_data)).map_err(|e| {
            tracing::debug!("Failed to open workbook '{}': {}", filename, e);
            SummaryError::parse(filename, e)
        })?;

        match workbook.worksheet_range_at(0) {
            Some(Ok(range)) => Ok(range),
            Some(Err(e)) => Err(SummaryError::parse(filename, e)),
            None => Err(SummaryError::parse(filename, "workbook contains no worksheets")),
        }
    }

    /// Summarizes an already loaded worksheet. The first row of `range` is the header.
    pub fn summarize_range(
        &self,
        range: &Range<Data>,
        filename: &str,
        request: &ColumnRequest,
    ) -> Result<AnalysisResult, SummaryError> {
        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| SummaryError::parse(filename, "worksheet has no header row"))?;

        let positions = header_positions(header);
        let targets = request
            .names()
            .iter()
            .map(|name| {
                positions
                    .get(&normalize_header(name))
                    .map(|&idx| (name.as_str(), idx))
                    .ok_or_else(|| SummaryError::UnknownColumn {
                        column: name.clone(),
                        file: filename.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if range.height() < 2 {
            return Err(SummaryError::EmptyWorksheet {
                file: filename.to_string(),
            });
        }

        let mut totals = vec![ColumnAccumulator::default(); targets.len()];
        for row in rows {
            for (acc, &(_, idx)) in totals.iter_mut().zip(&targets) {
                let cell = row.get(idx).map_or(CellValue::Empty, to_cell_value);
                if let Some(value) = numeric_value(&cell) {
                    acc.push(value);
                }
            }
        }

        let summary = totals
            .into_iter()
            .zip(&targets)
            .map(|(acc, &(name, _))| acc.finish(name, filename))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AnalysisResult {
            file: filename.to_string(),
            summary,
        })
    }
}

/// Maps normalized header text to its column index. Blank headers are not
/// addressable, and the leftmost of duplicated headers wins.
fn header_positions(header: &[Data]) -> HashMap<String, usize> {
    let mut positions = HashMap::new();
    for (idx, cell) in header.iter().enumerate() {
        let name = normalize_header(&header_text(cell));
        if !name.is_empty() {
            positions.entry(name).or_insert(idx);
        }
    }
    positions
}

/// Parses `file_bytes` and returns sum/average for each requested column, in
/// request order.
pub fn summarize<S: AsRef<str>>(
    file_bytes: &[u8],
    filename: &str,
    requested_columns: &[S],
) -> Result<AnalysisResult, SummaryError> {
    let request = ColumnRequest::new(requested_columns)?;
    ExcelSummarizer.summarize(file_bytes, filename, &request)
}
