//! Transaction export
//!
//! Exported payloads are held in a transient [`BlobRef`] while they are
//! saved. The reference is revoked when it is dropped, so every exit path
//! releases it.

mod blob;

pub use blob::{BlobRef, BlobStore, save_download};

use crate::error::TallyError;
use crate::preferences::YearMonth;
use std::fmt;
use std::str::FromStr;

/// Export file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    /// Endpoint path for this format
    pub fn path(&self) -> String {
        format!("/export/transactions.{}", self.extension())
    }

    /// `transactions.<ext>`, or `transactions-YYYY-MM.<ext>` for one month
    pub fn file_name(&self, month: Option<YearMonth>) -> String {
        match month {
            Some(month) => format!("transactions-{}.{}", month, self.extension()),
            None => format!("transactions.{}", self.extension()),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            other => Err(TallyError::validation_field(
                format!("Unsupported export format '{}'", other),
                "format",
            )),
        }
    }
}
