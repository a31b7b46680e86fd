//! In-memory registry of hosted controls.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::control::file_input::FileInputControl;

/// A hosted control with bookkeeping timestamps.
#[derive(Debug)]
pub struct ControlRecord {
    pub control_id: Uuid,
    pub control: FileInputControl,
    pub updated_at: DateTime<Utc>,
}

impl ControlRecord {
    fn new(control_id: Uuid, control: FileInputControl) -> Self {
        Self {
            control_id,
            control,
            updated_at: Utc::now(),
        }
    }

    /// Mark the control as used.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Store of controls keyed by id.
pub struct ControlStore {
    controls: HashMap<Uuid, ControlRecord>,
}

impl ControlStore {
    /// Create a new control store.
    pub fn new() -> Self {
        Self {
            controls: HashMap::new(),
        }
    }

    /// Register a control and return its id.
    pub fn insert(&mut self, control: FileInputControl) -> Uuid {
        let control_id = Uuid::new_v4();
        self.controls
            .insert(control_id, ControlRecord::new(control_id, control));
        control_id
    }

    pub fn get(&self, control_id: Uuid) -> Option<&ControlRecord> {
        self.controls.get(&control_id)
    }

    /// Get a control for mutation; bumps `updated_at`.
    pub fn get_mut(&mut self, control_id: Uuid) -> Option<&mut FileInputControl> {
        self.controls.get_mut(&control_id).map(|record| {
            record.touch();
            &mut record.control
        })
    }

    /// Remove a control, dropping its validation target with it.
    pub fn remove(&mut self, control_id: Uuid) -> Option<FileInputControl> {
        self.controls.remove(&control_id).map(|r| r.control)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Drop controls not used within `max_idle`.
    ///
    /// A cutoff that falls outside the representable date range drops
    /// nothing.
    pub fn cleanup_idle(&mut self, max_idle: chrono::Duration) -> usize {
        let cutoff = match Utc::now().checked_sub_signed(max_idle) {
            Some(cutoff) => cutoff,
            None => return 0,
        };
        let before = self.controls.len();
        self.controls.retain(|_, record| record.updated_at > cutoff);
        before - self.controls.len()
    }
}

impl Default for ControlStore {
    fn default() -> Self {
        Self::new()
    }
}
