//! The static OKR document: objectives, key results, series and notes.
//!
//! A dataset is supplied once at startup as JSON, YAML, or TOML and never
//! mutated afterwards. Loading runs [`Dataset::validate`]; hard errors
//! (missing objectives, duplicate ids, dangling `objective_id`, progress out
//! of range) reject the document, warnings are logged and kept in the report.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::OkrError;
use crate::model::{KeyResult, Objective};

const SAMPLE_JSON: &str = include_str!("../data/sample.json");

/// Serialization formats accepted for dataset files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Yaml,
    Toml,
}

impl DatasetFormat {
    /// Pick the format from a file extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Objectives and key results for one reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Reporting period label, e.g. `2025-12`.
    #[serde(default)]
    pub period: String,
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub key_results: Vec<KeyResult>,
}

impl Dataset {
    /// The built-in sample document.
    ///
    /// # Panics
    ///
    /// Never in practice: the embedded document is covered by tests.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn sample() -> Self {
        serde_json::from_str(SAMPLE_JSON).expect("embedded sample dataset is valid JSON")
    }

    /// Parse a document without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`OkrError::DatasetParse`] when the text is not a dataset.
    pub fn parse(text: &str, format: DatasetFormat, origin: &str) -> Result<Self, OkrError> {
        let parsed = match format {
            DatasetFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            DatasetFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            DatasetFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| OkrError::DatasetParse {
            origin: origin.to_string(),
            message,
        })
    }

    /// Read and parse a dataset file without validating it.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, has an unknown
    /// extension, or fails to parse.
    pub fn read(path: &Path) -> Result<Self, OkrError> {
        let format = DatasetFormat::from_path(path).ok_or_else(|| OkrError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let text = std::fs::read_to_string(path).map_err(|source| OkrError::DatasetRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, format, &path.display().to_string())
    }

    /// Read, parse, and validate a dataset file.
    ///
    /// # Errors
    ///
    /// Returns an error when [`Dataset::read`] fails or the document
    /// violates a hard invariant.
    pub fn load(path: &Path) -> Result<Self, OkrError> {
        let dataset = Self::read(path)?;
        dataset.ensure_valid()?;
        info!(
            path = %path.display(),
            objectives = dataset.objectives.len(),
            key_results = dataset.key_results.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Validate and log warnings; fail on the first hard error.
    ///
    /// # Errors
    ///
    /// Returns the first hard error found by [`Dataset::validate`].
    pub fn ensure_valid(&self) -> Result<(), OkrError> {
        let report = self.validate();
        for warning in &report.warnings {
            warn!("dataset: {warning}");
        }
        match report.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Check every dataset invariant and collect the findings.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        if self.objectives.is_empty() {
            report.errors.push(OkrError::EmptyDataset);
        }

        let mut objective_ids = HashSet::new();
        for objective in &self.objectives {
            if !objective_ids.insert(objective.id.as_str()) {
                report.errors.push(OkrError::DuplicateId {
                    kind: "objective",
                    id: objective.id.clone(),
                });
            }
            if !(0.0..=100.0).contains(&objective.progress_pct) {
                report.errors.push(OkrError::ProgressOutOfRange {
                    id: objective.id.clone(),
                    value: objective.progress_pct,
                });
            }
        }

        let mut kr_ids = HashSet::new();
        let mut members: HashMap<&str, Vec<&str>> = HashMap::new();
        for kr in &self.key_results {
            if !kr_ids.insert(kr.id.as_str()) {
                report.errors.push(OkrError::DuplicateId {
                    kind: "key result",
                    id: kr.id.clone(),
                });
            }
            if objective_ids.contains(kr.objective_id.as_str()) {
                members
                    .entry(kr.objective_id.as_str())
                    .or_default()
                    .push(kr.id.as_str());
            } else {
                report.errors.push(OkrError::DanglingObjective {
                    kr_id: kr.id.clone(),
                    objective_id: kr.objective_id.clone(),
                });
            }
            check_key_result(kr, &mut report.warnings);
        }

        for objective in &self.objectives {
            let Some(declared) = &objective.declared_krs else {
                continue;
            };
            let scanned = members.get(objective.id.as_str()).cloned().unwrap_or_default();
            let declared_refs: Vec<&str> = declared.iter().map(String::as_str).collect();
            if declared_refs != scanned {
                report.warnings.push(ValidationWarning::DeclaredMembershipMismatch {
                    objective_id: objective.id.clone(),
                    declared: declared.clone(),
                    scanned: scanned.iter().map(|id| (*id).to_string()).collect(),
                });
            }
        }

        report
    }

    #[must_use]
    pub fn objective(&self, id: &str) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.id == id)
    }

    #[must_use]
    pub fn objective_index(&self, id: &str) -> Option<usize> {
        self.objectives.iter().position(|o| o.id == id)
    }

    #[must_use]
    pub fn key_result(&self, id: &str) -> Option<&KeyResult> {
        self.key_results.iter().find(|kr| kr.id == id)
    }

    /// Key results of one objective, found by foreign-key scan in dataset order.
    pub fn key_results_for<'a>(
        &'a self,
        objective_id: &'a str,
    ) -> impl Iterator<Item = &'a KeyResult> + 'a {
        self.key_results
            .iter()
            .filter(move |kr| kr.objective_id == objective_id)
    }
}

fn check_key_result(kr: &KeyResult, warnings: &mut Vec<ValidationWarning>) {
    for note in &kr.notes {
        if NaiveDate::parse_from_str(&note.date, "%Y-%m-%d").is_err() {
            warnings.push(ValidationWarning::BadNoteDate {
                kr_id: kr.id.clone(),
                date: note.date.clone(),
            });
        }
    }
    let out_of_order = kr
        .series
        .windows(2)
        .find(|pair| pair[0].period >= pair[1].period);
    if let Some(pair) = out_of_order {
        warnings.push(ValidationWarning::SeriesOutOfOrder {
            kr_id: kr.id.clone(),
            period: pair[1].period.clone(),
        });
    }
}

/// Non-fatal findings from [`Dataset::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// `Objective.krs` disagrees with the `objective_id` scan.
    DeclaredMembershipMismatch {
        objective_id: String,
        declared: Vec<String>,
        scanned: Vec<String>,
    },
    /// A note date that is not `YYYY-MM-DD`.
    BadNoteDate { kr_id: String, date: String },
    /// Series periods that do not strictly increase.
    SeriesOutOfOrder { kr_id: String, period: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeclaredMembershipMismatch {
                objective_id,
                declared,
                scanned,
            } => write!(
                f,
                "objective '{objective_id}' declares krs [{}] but key results point at it: [{}]",
                declared.join(", "),
                scanned.join(", ")
            ),
            Self::BadNoteDate { kr_id, date } => {
                write!(f, "key result '{kr_id}' has a note dated '{date}' (expected YYYY-MM-DD)")
            }
            Self::SeriesOutOfOrder { kr_id, period } => {
                write!(f, "key result '{kr_id}' series is out of order at period '{period}'")
            }
        }
    }
}

/// Result of [`Dataset::validate`].
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<OkrError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
