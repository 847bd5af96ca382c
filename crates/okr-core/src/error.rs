use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes surfaced by the CLI and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    DatasetReadFailed,
    DatasetParseError,
    UnsupportedDatasetFormat,
    EmptyDataset,
    DuplicateId,
    DanglingObjectiveRef,
    ProgressOutOfRange,
    ObjectiveNotFound,
    KeyResultNotFound,
    EventLogParseError,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::DatasetReadFailed => "E1002",
            Self::DatasetParseError => "E1003",
            Self::UnsupportedDatasetFormat => "E1004",
            Self::EmptyDataset => "E2001",
            Self::DuplicateId => "E2002",
            Self::DanglingObjectiveRef => "E2003",
            Self::ProgressOutOfRange => "E2004",
            Self::ObjectiveNotFound => "E3001",
            Self::KeyResultNotFound => "E3002",
            Self::EventLogParseError => "E4001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::DatasetReadFailed => "Dataset file could not be read",
            Self::DatasetParseError => "Dataset parse error",
            Self::UnsupportedDatasetFormat => "Unsupported dataset format",
            Self::EmptyDataset => "Dataset has no objectives",
            Self::DuplicateId => "Duplicate objective or key result id",
            Self::DanglingObjectiveRef => "Key result references a missing objective",
            Self::ProgressOutOfRange => "Objective progress outside 0-100",
            Self::ObjectiveNotFound => "Objective not found",
            Self::KeyResultNotFound => "Key result not found",
            Self::EventLogParseError => "Event log parse error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .okr/config.toml and retry."),
            Self::DatasetReadFailed => Some("Check the --data path and its read permissions."),
            Self::DatasetParseError => {
                Some("Run `okr validate --data <file>` for the exact location of the error.")
            }
            Self::UnsupportedDatasetFormat => Some("Use a .json, .yaml, .yml or .toml file."),
            Self::EmptyDataset => Some("Add at least one objective to the dataset."),
            Self::DuplicateId => Some("Give every objective and key result a unique id."),
            Self::DanglingObjectiveRef => {
                Some("Point objective_id at an existing objective or add the objective.")
            }
            Self::ProgressOutOfRange => Some("Use a progress_pct between 0 and 100."),
            Self::ObjectiveNotFound => Some("Run `okr objectives` to list known ids."),
            Self::KeyResultNotFound => Some("Run `okr krs` to list key results."),
            Self::EventLogParseError => {
                Some("Each line must be a JSON object with kind, id and timestamp.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while loading configuration, datasets, or event logs.
///
/// Unknown ids arriving through UI events are not errors; the store ignores
/// them. These variants only surface at load time or from explicit CLI
/// lookups.
#[derive(Debug, thiserror::Error)]
pub enum OkrError {
    #[error("failed to read {path}: {source}")]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {origin}: {message}")]
    DatasetParse { origin: String, message: String },

    #[error("unsupported dataset format for {path} (expected .json, .yaml, .yml or .toml)")]
    UnsupportedFormat { path: PathBuf },

    #[error("dataset has no objectives")]
    EmptyDataset,

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("key result '{kr_id}' references missing objective '{objective_id}'")]
    DanglingObjective { kr_id: String, objective_id: String },

    #[error("objective '{id}' has progress {value} outside 0-100")]
    ProgressOutOfRange { id: String, value: f64 },

    #[error("objective '{0}' not found")]
    ObjectiveNotFound(String),

    #[error("key result '{0}' not found")]
    KeyResultNotFound(String),

    #[error("failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("event log line {line}: {message}")]
    EventLogParse { line: usize, message: String },
}

impl OkrError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::DatasetRead { .. } => ErrorCode::DatasetReadFailed,
            Self::DatasetParse { .. } => ErrorCode::DatasetParseError,
            Self::UnsupportedFormat { .. } => ErrorCode::UnsupportedDatasetFormat,
            Self::EmptyDataset => ErrorCode::EmptyDataset,
            Self::DuplicateId { .. } => ErrorCode::DuplicateId,
            Self::DanglingObjective { .. } => ErrorCode::DanglingObjectiveRef,
            Self::ProgressOutOfRange { .. } => ErrorCode::ProgressOutOfRange,
            Self::ObjectiveNotFound(_) => ErrorCode::ObjectiveNotFound,
            Self::KeyResultNotFound(_) => ErrorCode::KeyResultNotFound,
            Self::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Self::EventLogParse { .. } => ErrorCode::EventLogParseError,
        }
    }

    /// Remediation text for the CLI, falling back to the code's summary.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or(code.message()).to_string()
    }
}
