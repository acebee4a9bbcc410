use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

use super::layout::{ReportPayload, StyleDescriptor, StyleRegion};
use super::repository::{ReportSink, SheetTarget, SinkError};

#[derive(Debug, Serialize)]
struct StyledRegion<'a> {
    #[serde(flatten)]
    region: &'a StyleRegion,
    format: StyleDescriptor,
}

#[derive(Debug, Serialize)]
struct SheetDocument<'a> {
    target: &'a SheetTarget,
    #[serde(flatten)]
    payload: &'a ReportPayload,
}

/// One path segment per identifier; never a separator or a dot-only name.
fn path_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            ch if ch.is_whitespace() => '_',
            ch => ch,
        })
        .collect();

    if cleaned.chars().all(|ch| ch == '.') {
        format!("_{cleaned}")
    } else {
        cleaned
    }
}

/// `<directory>/<sheet id>/<sheet name>.<extension>`
fn sheet_path(directory: &Path, target: &SheetTarget, extension: &str) -> PathBuf {
    directory
        .join(path_component(&target.sheet_id))
        .join(format!("{}.{extension}", path_component(&target.sheet_name)))
}

/// Writes the matrix as CSV and the style regions as a JSON sidecar.
/// Both files are replaced wholesale on every write.
#[derive(Debug, Clone)]
pub struct CsvSheetSink {
    directory: PathBuf,
}

impl CsvSheetSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn matrix_path(&self, target: &SheetTarget) -> PathBuf {
        sheet_path(&self.directory, target, "csv")
    }

    pub fn styles_path(&self, target: &SheetTarget) -> PathBuf {
        sheet_path(&self.directory, target, "styles.json")
    }

    pub fn encode_matrix(payload: &ReportPayload) -> Result<Vec<u8>, SinkError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        for row in &payload.matrix {
            writer
                .write_record(row.iter().map(|cell| cell.to_string()))
                .map_err(|err| SinkError::Encoding(err.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|err| SinkError::Encoding(err.to_string()))
    }

    fn encode_styles(payload: &ReportPayload) -> Result<Vec<u8>, SinkError> {
        let styled: Vec<StyledRegion<'_>> = payload
            .regions
            .iter()
            .map(|region| StyledRegion {
                region,
                format: region.descriptor(),
            })
            .collect();
        serde_json::to_vec_pretty(&styled).map_err(|err| SinkError::Encoding(err.to_string()))
    }
}

#[async_trait]
impl ReportSink for CsvSheetSink {
    async fn replace(
        &self,
        target: &SheetTarget,
        payload: &ReportPayload,
    ) -> Result<(), SinkError> {
        let matrix = Self::encode_matrix(payload)?;
        let styles = Self::encode_styles(payload)?;

        write_replacing(&[
            (self.matrix_path(target), matrix),
            (self.styles_path(target), styles),
        ])
        .await
    }
}

/// Writes target and payload into a single JSON document.
#[derive(Debug, Clone)]
pub struct JsonSheetSink {
    directory: PathBuf,
}

impl JsonSheetSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn document_path(&self, target: &SheetTarget) -> PathBuf {
        sheet_path(&self.directory, target, "json")
    }
}

#[async_trait]
impl ReportSink for JsonSheetSink {
    async fn replace(
        &self,
        target: &SheetTarget,
        payload: &ReportPayload,
    ) -> Result<(), SinkError> {
        let document = SheetDocument { target, payload };
        let bytes = serde_json::to_vec_pretty(&document)
            .map_err(|err| SinkError::Encoding(err.to_string()))?;

        write_replacing(&[(self.document_path(target), bytes)]).await
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".partial");
    PathBuf::from(staged)
}

/// Clear-then-write for a set of files: every file is staged next to its
/// destination before any of them is swapped in. A failed stage leaves the
/// previous files untouched.
async fn write_replacing(files: &[(PathBuf, Vec<u8>)]) -> Result<(), SinkError> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, bytes) in files {
        let staging = staging_path(path);
        let written = async {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&staging, bytes).await
        }
        .await;

        if let Err(err) = written {
            for leftover in staged.iter().chain(std::iter::once(&staging)) {
                let _ = tokio::fs::remove_file(leftover).await;
            }
            return Err(err.into());
        }
        staged.push(staging);
    }

    for ((path, _), staging) in files.iter().zip(&staged) {
        tokio::fs::rename(staging, path).await?;
    }
    Ok(())
}
