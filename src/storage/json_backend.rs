use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};

use crate::{domain::Expense, errors::TrackerError};

use super::{ExpenseStore, Result};

pub const DEFAULT_STORAGE_FILE: &str = "expenses.json";

const TMP_SUFFIX: &str = "tmp";
const INDENT: &[u8] = b"    ";

/// Keeps the whole expense sequence in a single JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_FILE)
    }
}

impl ExpenseStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Expense>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    path = %self.path.display(),
                    "no expense file yet, starting empty"
                );
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        decode_expenses(&data)
    }

    fn save(&self, expenses: &[Expense]) -> Result<()> {
        let json = encode_expenses(expenses)?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        tracing::debug!(
            path = %self.path.display(),
            count = expenses.len(),
            "expense file written"
        );
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Serializes expenses as a JSON array of records, indented by four spaces.
pub fn encode_expenses(expenses: &[Expense]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    expenses.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Parses a stored document. Any bad entry fails the whole document.
pub fn decode_expenses(data: &str) -> Result<Vec<Expense>> {
    let entries = match serde_json::from_str::<Value>(data)? {
        Value::Array(entries) => entries,
        _ => {
            return Err(TrackerError::MalformedFile(
                "expected a list of expenses at the top level".into(),
            ))
        }
    };
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| Expense::from_record(idx + 1, entry))
        .collect()
}

fn ensure_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() || path.exists() {
        return Ok(());
    }
    fs::create_dir_all(path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()?;
    Ok(())
}
