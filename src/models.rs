use std::collections::BTreeMap;

use bytes::Bytes;
use serde::Serialize;

const ALLOWED_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

/// Field name to the problems found with it.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: Option<String>,
    pub data: Bytes,
}

/// Raw multipart fields as received.
#[derive(Debug, Default)]
pub struct AnalyzeForm {
    pub file: Option<UploadedFile>,
    pub columns: Vec<String>,
}

/// An upload that passed validation.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub file_name: String,
    pub file_data: Bytes,
    pub columns: Vec<String>,
}

impl AnalyzeForm {
    pub fn validate(self, max_file_size: usize) -> Result<AnalyzeRequest, FieldErrors> {
        let mut errors = FieldErrors::default();

        let file = match self.file {
            None => {
                errors.add("file", "No file was submitted.");
                None
            }
            Some(UploadedFile { name, data }) => {
                let name = name.unwrap_or_default();
                let lower = name.to_lowercase();
                if name.trim().is_empty() {
                    errors.add("file", "The submitted file has no filename.");
                } else if !ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
                    errors.add("file", "File must be an Excel file (.xlsx or .xls)");
                }
                if data.is_empty() {
                    errors.add("file", "The submitted file is empty.");
                } else if data.len() > max_file_size {
                    errors.add(
                        "file",
                        format!("File exceeds the maximum size of {} bytes", max_file_size),
                    );
                }
                Some((name, data))
            }
        };

        if self.columns.is_empty() {
            errors.add("columns", "At least one column name must be provided");
        } else if self.columns.iter().any(|c| c.trim().is_empty()) {
            errors.add("columns", "All column names must be non-empty strings");
        }

        match file {
            Some((file_name, file_data)) if errors.is_empty() => Ok(AnalyzeRequest {
                file_name,
                file_data,
                columns: self.columns.iter().map(|c| c.trim().to_string()).collect(),
            }),
            _ => Err(errors),
        }
    }
}
