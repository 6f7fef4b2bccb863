use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{AssignedTo, TaskMode, TaskStatus, TaskType, Visibility};

/// A single element of a shipment's workflow task list.
///
/// Invariants enforced by `shipment-workflow` (C3), not by this type
/// itself: `BLOCKED` only valid under `mode = ASSIGNED`; `mode = IGNORED`
/// forces `visibility = HIDDEN` and `status = PENDING`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: String,
    pub task_type: TaskType,
    /// Human-readable label. Derivable from `task_type` at any time via
    /// [`TaskType::display_name`]; stored anyway so a caller can read it
    /// off the row without needing the enum's naming table in hand.
    #[serde(default)]
    pub display_name: String,
    pub leg_level: i16,
    pub status: TaskStatus,
    pub mode: TaskMode,
    pub assigned_to: AssignedTo,
    pub third_party_name: Option<String>,
    pub visibility: Visibility,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub scheduled_end: Option<DateTime<Utc>>,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date_override: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn default_mode_for(task_type: TaskType) -> TaskMode {
        if task_type.is_milestone() {
            TaskMode::Tracked
        } else {
            TaskMode::Assigned
        }
    }
}
