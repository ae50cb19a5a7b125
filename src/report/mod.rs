use serde::Serialize;

use crate::batch::BatchSummary;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Washed,
    Failed,
}

#[derive(Serialize)]
pub struct JsonReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub files: Vec<FileReportSection>,
}

#[derive(Serialize)]
pub struct FileReportSection {
    pub input: String,
    pub output: String,
    pub status: EntryStatus,
    pub message: String,
}

impl From<&BatchSummary> for JsonReport {
    fn from(summary: &BatchSummary) -> Self {
        Self {
            total: summary.total(),
            succeeded: summary.succeeded(),
            failed: summary.failed(),
            files: summary
                .entries
                .iter()
                .map(|entry| FileReportSection {
                    input: entry.input.display().to_string(),
                    output: entry.output.display().to_string(),
                    status: if entry.result.is_success() {
                        EntryStatus::Washed
                    } else {
                        EntryStatus::Failed
                    },
                    message: entry.result.to_string(),
                })
                .collect(),
        }
    }
}

impl JsonReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
