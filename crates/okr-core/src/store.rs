//! Application state: the dataset plus selection, mutated only through
//! named operations.
//!
//! # Invariants
//!
//! - `active_objective_id` always names an objective in the dataset.
//! - An open drawer always names a key result in the dataset.
//! - Unknown ids never change state; they are logged and ignored.

use serde::Serialize;
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::OkrError;
use crate::event::{EventKind, UiEvent, latest_click_index};

/// Detail drawer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", content = "kr_id", rename_all = "snake_case")]
pub enum Drawer {
    #[default]
    Closed,
    Open(String),
}

impl Drawer {
    #[must_use]
    pub fn open_kr_id(&self) -> Option<&str> {
        match self {
            Self::Closed => None,
            Self::Open(id) => Some(id),
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

/// Dataset plus selection for one single-user session.
#[derive(Debug, Clone)]
pub struct AppState {
    dataset: Dataset,
    active_objective_id: String,
    drawer: Drawer,
    /// Latest click timestamp per objective, indexed like `dataset.objectives`.
    objective_clicks: Vec<Option<i64>>,
}

impl AppState {
    /// Start a session with the first objective selected.
    ///
    /// # Errors
    ///
    /// Returns [`OkrError::EmptyDataset`] when there is nothing to select.
    pub fn new(dataset: Dataset) -> Result<Self, OkrError> {
        let first = dataset
            .objectives
            .first()
            .map(|o| o.id.clone())
            .ok_or(OkrError::EmptyDataset)?;
        let clicks = vec![None; dataset.objectives.len()];
        Ok(Self {
            dataset,
            active_objective_id: first,
            drawer: Drawer::Closed,
            objective_clicks: clicks,
        })
    }

    /// Start a session with `preferred` selected when it exists, else the
    /// first objective.
    ///
    /// # Errors
    ///
    /// Returns [`OkrError::EmptyDataset`] when there is nothing to select.
    pub fn with_selection(dataset: Dataset, preferred: Option<&str>) -> Result<Self, OkrError> {
        let mut state = Self::new(dataset)?;
        if let Some(id) = preferred {
            state.select_objective(id);
        }
        Ok(state)
    }

    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn active_objective_id(&self) -> &str {
        &self.active_objective_id
    }

    #[must_use]
    pub const fn drawer(&self) -> &Drawer {
        &self.drawer
    }

    /// Make `id` the active objective.
    ///
    /// Returns `true` when state changed. Re-selecting the active objective
    /// and unknown ids are no-ops.
    pub fn select_objective(&mut self, id: &str) -> bool {
        if self.active_objective_id == id {
            return false;
        }
        if self.dataset.objective(id).is_none() {
            debug!(objective_id = id, "ignoring selection of unknown objective");
            return false;
        }
        debug!(from = %self.active_objective_id, to = id, "objective selected");
        self.active_objective_id = id.to_string();
        true
    }

    /// Open the drawer on key result `id`; unknown ids are ignored.
    ///
    /// Opening a different key result while the drawer is open switches to
    /// it directly.
    pub fn open_kr(&mut self, id: &str) -> bool {
        if self.dataset.key_result(id).is_none() {
            debug!(kr_id = id, "ignoring open of unknown key result");
            return false;
        }
        if self.drawer.open_kr_id() == Some(id) {
            return false;
        }
        debug!(kr_id = id, "drawer opened");
        self.drawer = Drawer::Open(id.to_string());
        true
    }

    pub fn close_drawer(&mut self) -> bool {
        if !self.drawer.is_open() {
            return false;
        }
        debug!("drawer closed");
        self.drawer = Drawer::Closed;
        true
    }

    /// Select the objective whose click is most recent.
    ///
    /// `timestamps` is indexed like the dataset's objectives. Ties go to the
    /// lowest index; a batch where nothing fired leaves selection unchanged.
    pub fn select_from_clicks(&mut self, timestamps: &[Option<i64>]) -> bool {
        let Some(index) = latest_click_index(timestamps) else {
            return false;
        };
        let Some(id) = self.dataset.objectives.get(index).map(|o| o.id.clone()) else {
            debug!(index, "click batch index outside objective list");
            return false;
        };
        self.select_objective(&id)
    }

    /// Apply one UI event. Returns `true` when state changed.
    ///
    /// Objective clicks are folded into a per-objective latest-timestamp
    /// table and resolved as a batch, so a late-arriving older click cannot
    /// override a newer one.
    pub fn apply(&mut self, event: &UiEvent) -> bool {
        match event.kind {
            EventKind::ObjectiveClick => {
                let Some(index) = self.dataset.objective_index(&event.id) else {
                    debug!(objective_id = %event.id, "ignoring click on unknown objective");
                    return false;
                };
                let slot = &mut self.objective_clicks[index];
                *slot = Some(slot.map_or(event.timestamp, |prev| prev.max(event.timestamp)));
                let clicks = self.objective_clicks.clone();
                self.select_from_clicks(&clicks)
            }
            EventKind::OpenKrClick => self.open_kr(&event.id),
            EventKind::CloseDrawer => self.close_drawer(),
        }
    }

    /// Swap in a new dataset, re-establishing the selection invariants.
    ///
    /// The active objective is kept when it still exists, otherwise the
    /// first objective is selected. An open drawer whose key result
    /// disappeared is closed. Click history is reset.
    ///
    /// # Errors
    ///
    /// Returns [`OkrError::EmptyDataset`] and leaves state untouched when
    /// the new dataset has no objectives.
    pub fn replace_dataset(&mut self, dataset: Dataset) -> Result<(), OkrError> {
        let Some(first) = dataset.objectives.first().map(|o| o.id.clone()) else {
            return Err(OkrError::EmptyDataset);
        };
        if dataset.objective(&self.active_objective_id).is_none() {
            debug!(
                missing = %self.active_objective_id,
                fallback = %first,
                "active objective removed; falling back to first"
            );
            self.active_objective_id = first;
        }
        if let Some(kr_id) = self.drawer.open_kr_id()
            && dataset.key_result(kr_id).is_none()
        {
            debug!(kr_id, "open key result removed; closing drawer");
            self.drawer = Drawer::Closed;
        }
        self.objective_clicks = vec![None; dataset.objectives.len()];
        self.dataset = dataset;
        Ok(())
    }
}
