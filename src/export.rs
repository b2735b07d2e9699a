//! CSV export of the roster. Rows follow storage order and fields are written
//! verbatim; names containing commas produce extra columns.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{PersistenceError, RosterError};
use crate::models::Player;
use crate::roster::RosterStore;

/// File name offered for exports unless the caller picks another one.
pub const DEFAULT_EXPORT_FILENAME: &str = "game-scores.csv";
/// Content type attached to every export.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

const HEADER: [&str; 2] = ["Name", "Score"];
const LINE_END: &str = "\r\n";

/// Build the CSV body: a `Name,Score` header and one CRLF-terminated line per
/// player.
pub fn to_csv(players: &[Player]) -> String {
    let mut csv = HEADER.join(",");
    csv.push_str(LINE_END);
    for player in players {
        csv.push_str(&player.name);
        csv.push(',');
        csv.push_str(&player.score.to_string());
        csv.push_str(LINE_END);
    }
    csv
}

/// A ready-to-deliver export: what the user would receive as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

impl CsvExport {
    /// Snapshot the roster into an export. Refuses an empty roster.
    pub fn from_roster(roster: &RosterStore, filename: &str) -> Result<Self, RosterError> {
        let body = roster.export_csv()?;
        Ok(Self {
            filename: filename.to_string(),
            content_type: CSV_CONTENT_TYPE,
            body,
        })
    }

    /// Write the export into `dir`, creating the directory when needed, and
    /// return the full path of the written file.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, PersistenceError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, self.body.as_bytes())?;
        info!(path = %path.display(), bytes = self.body.len(), "roster exported");
        Ok(path)
    }
}
