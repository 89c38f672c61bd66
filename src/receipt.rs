//! Install receipt written into the prefix after a successful install.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

use crate::formula::{Formula, FormulaEnv};

pub const RECEIPT_FILENAME: &str = "INSTALL_RECEIPT.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReceipt {
    pub formula: String,
    pub homepage: String,
    pub head: String,
    pub source_dir: PathBuf,
    pub prefix: PathBuf,
    pub configure_args: Vec<String>,
    pub installed_at_utc: String,
}

impl InstallReceipt {
    pub fn new(
        formula: &dyn Formula,
        env: &FormulaEnv,
        source_dir: &Path,
        configure_args: Vec<String>,
        installed_at_utc: String,
    ) -> Self {
        Self {
            formula: formula.name().to_string(),
            homepage: formula.homepage().to_string(),
            head: formula.head().to_string(),
            source_dir: source_dir.to_path_buf(),
            prefix: env.prefix_path().to_path_buf(),
            configure_args,
            installed_at_utc,
        }
    }
}

pub fn receipt_path(prefix: &Path) -> PathBuf {
    prefix.join(RECEIPT_FILENAME)
}

/// Write `receipt` to `<prefix>/INSTALL_RECEIPT.json`, creating the prefix if needed.
pub fn write_receipt(receipt: &InstallReceipt) -> Result<PathBuf> {
    fs::create_dir_all(&receipt.prefix)
        .with_context(|| format!("creating prefix '{}'", receipt.prefix.display()))?;
    let path = receipt_path(&receipt.prefix);
    let json = serde_json::to_vec_pretty(receipt).context("serializing install receipt")?;
    fs::write(&path, json)
        .with_context(|| format!("writing install receipt '{}'", path.display()))?;
    Ok(path)
}

/// The receipt of an earlier install into `prefix`, if there is one.
pub fn find_receipt(prefix: &Path) -> Result<Option<InstallReceipt>> {
    if !receipt_path(prefix).is_file() {
        return Ok(None);
    }
    read_receipt(prefix).map(Some)
}

pub fn read_receipt(prefix: &Path) -> Result<InstallReceipt> {
    let path = receipt_path(prefix);
    let bytes =
        fs::read(&path).with_context(|| format!("reading install receipt '{}'", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing install receipt '{}'", path.display()))
}

pub fn now_utc_compact() -> String {
    let now = OffsetDateTime::now_utc();
    format!(
        "{:04}{:02}{:02}T{:02}{:02}{:02}Z",
        now.year(),
        now.month() as u8,
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}
