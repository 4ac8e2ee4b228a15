use std::collections::HashSet;

use blake3::Hasher;
use doublemass_parser::{parse_rainfall_csv_with, ColumnMapping};
use tracing::{info, warn};

use crate::error::DoubleMassError;
use crate::station::{normalize, StationId, StationTable};

#[derive(Debug)]
pub struct UploadInput<'a> {
    pub filename: &'a str,
    pub contents: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Accepted,
    DuplicateName,
    DuplicateContent,
    Failed,
}

#[derive(Debug)]
pub struct UploadReport {
    pub filename: String,
    pub hash: String,
    pub status: UploadStatus,
    pub station_id: Option<StationId>,
    pub message: Option<String>,
}

/// Uploads seen so far in one interactive session. Owned by the caller.
#[derive(Debug, Default, Clone)]
pub struct UploadSession {
    filenames: HashSet<String>,
    hashes: HashSet<String>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers the upload unless its name or content was already accepted.
    pub fn register(&mut self, filename: &str, contents: &[u8]) -> UploadStatus {
        self.check(filename, &compute_hash(contents))
    }

    fn check(&mut self, filename: &str, hash: &str) -> UploadStatus {
        if self.filenames.contains(filename) {
            return UploadStatus::DuplicateName;
        }
        if self.hashes.contains(hash) {
            return UploadStatus::DuplicateContent;
        }
        self.filenames.insert(filename.to_string());
        self.hashes.insert(hash.to_string());
        UploadStatus::Accepted
    }

    /// Drops an accepted upload so the same file can be sent again.
    pub fn forget(&mut self, filename: &str, contents: &[u8]) {
        self.filenames.remove(filename);
        self.hashes.remove(&compute_hash(contents));
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.filenames.contains(filename)
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}

pub fn duplicate_message(filename: &str) -> String {
    format!("The file '{filename}' has already been uploaded.")
}

pub fn duplicate_content_message(filename: &str) -> String {
    format!("The contents of '{filename}' match a file that has already been uploaded.")
}

/// Registers, parses and normalizes one upload.
///
/// Duplicates and failures come back as a report without a table; a repeated
/// name and repeated content under a new name get different messages. A file that
/// fails to parse is not remembered, so a corrected copy can be sent under the same name.
pub fn ingest_upload(
    session: &mut UploadSession,
    input: UploadInput<'_>,
    mapping: &ColumnMapping,
) -> (UploadReport, Option<StationTable>) {
    let hash = compute_hash(input.contents);
    let status = session.check(input.filename, &hash);

    if status != UploadStatus::Accepted {
        warn!(filename = input.filename, ?status, "duplicate upload ignored");
        return (
            UploadReport {
                filename: input.filename.to_string(),
                hash,
                status,
                station_id: None,
                message: Some(match status {
                    UploadStatus::DuplicateContent => duplicate_content_message(input.filename),
                    _ => duplicate_message(input.filename),
                }),
            },
            None,
        );
    }

    match load_station(input.filename, input.contents, mapping) {
        Ok(table) => {
            info!(
                filename = input.filename,
                station = %table.station_id,
                rows = table.height(),
                missing = table.missing_values(),
                "upload accepted"
            );
            (
                UploadReport {
                    filename: input.filename.to_string(),
                    hash,
                    status: UploadStatus::Accepted,
                    station_id: Some(table.station_id.clone()),
                    message: None,
                },
                Some(table),
            )
        }
        Err(err) => {
            warn!(filename = input.filename, error = %err, "upload rejected");
            session.forget(input.filename, input.contents);
            (
                UploadReport {
                    filename: input.filename.to_string(),
                    hash,
                    status: UploadStatus::Failed,
                    station_id: None,
                    message: Some(err.to_string()),
                },
                None,
            )
        }
    }
}

/// Parses and normalizes a file without any session bookkeeping.
pub fn load_station(
    filename: &str,
    contents: &[u8],
    mapping: &ColumnMapping,
) -> Result<StationTable, DoubleMassError> {
    StationId::from_filename(filename)?;
    let text = String::from_utf8_lossy(contents);
    let raw = parse_rainfall_csv_with(&text, mapping)?;
    normalize(&raw, filename)
}

fn compute_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    let hash = hasher.finalize();
    hash.to_hex().to_string()
}
