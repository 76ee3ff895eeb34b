//! The pending, unpersisted spot the user is editing.
//!
//! `absent -> editing -> (saved | cancelled) -> absent`. Only saving touches
//! the store; see [`SpotController::save_draft`](crate::SpotController::save_draft).

use crate::types::{NewSpot, SpotCategory};

/// A spot-in-progress tied to a map location pick.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotDraft {
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub memo: String,
    pub category: Option<SpotCategory>,
}

impl SpotDraft {
    /// Fresh draft at a picked location, category preset to `wait`.
    pub fn at(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            title: String::new(),
            memo: String::new(),
            category: Some(SpotCategory::Wait),
        }
    }

    pub fn to_new_spot(&self) -> NewSpot {
        NewSpot {
            title: self.title.clone(),
            memo: self.memo.clone(),
            category: self.category,
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Either absent or editing one draft.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftState {
    editing: Option<SpotDraft>,
}

impl DraftState {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn as_draft(&self) -> Option<&SpotDraft> {
        self.editing.as_ref()
    }

    pub fn as_draft_mut(&mut self) -> Option<&mut SpotDraft> {
        self.editing.as_mut()
    }

    /// Start editing at a location, replacing any current draft.
    pub fn begin(&mut self, lat: f64, lng: f64) -> &mut SpotDraft {
        self.editing.insert(SpotDraft::at(lat, lng))
    }

    /// Return to absent, handing back the discarded draft.
    pub fn take(&mut self) -> Option<SpotDraft> {
        self.editing.take()
    }
}
