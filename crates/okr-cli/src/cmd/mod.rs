pub mod completions;
pub mod krs;
pub mod objectives;
pub mod replay;
pub mod show;
pub mod ui;
pub mod validate;

use anyhow::Context;
use okr_core::config::EffectiveConfig;
use okr_core::{AppState, Dataset, OkrError};

/// Load the configured dataset, rejecting documents that break invariants.
///
/// # Errors
///
/// Returns an error when the dataset cannot be read, parsed, or validated.
pub fn load_dataset(config: &EffectiveConfig) -> anyhow::Result<Dataset> {
    config
        .dataset
        .load()
        .with_context(|| format!("loading dataset from {}", config.dataset))
}

/// Build the selection state, honouring an explicit `--objective` strictly
/// and the configured default leniently.
///
/// # Errors
///
/// Returns [`OkrError::ObjectiveNotFound`] when `explicit` names no
/// objective, or [`OkrError::EmptyDataset`].
pub fn session(
    dataset: Dataset,
    explicit: Option<&str>,
    config: &EffectiveConfig,
) -> anyhow::Result<AppState> {
    if let Some(id) = explicit {
        if dataset.objective(id).is_none() {
            return Err(OkrError::ObjectiveNotFound(id.to_string()).into());
        }
        return Ok(AppState::with_selection(dataset, Some(id))?);
    }
    Ok(AppState::with_selection(
        dataset,
        config.default_objective.as_deref(),
    )?)
}
