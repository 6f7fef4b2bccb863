//! Workflow task graph (C3): task mutation, cross-task constraints, and
//! cascading timing writes. Operates on an in-memory task list; callers in
//! `shipment-store` are responsible for loading and persisting it inside a
//! single unit of work.

use chrono::{DateTime, NaiveDate, Utc};
use shipment_models::{AssignedTo, Task, TaskMode, TaskStatus, TaskType, TransactionType, Visibility};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("task {0} not found")]
    TaskNotFound(String),
    #[error("status BLOCKED is only valid while mode = ASSIGNED")]
    BlockedRequiresAssignedMode,
}

/// Patch applied to a single task. Every field is an `Option`; fields
/// holding `Option<Option<T>>` distinguish "not present in the patch" from
/// "present and explicitly cleared to null".
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub status: Option<TaskStatus>,
    pub mode: Option<TaskMode>,
    pub assigned_to: Option<AssignedTo>,
    pub visibility: Option<Visibility>,
    pub third_party_name: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub due_date_override: Option<bool>,
    pub notes: Option<Option<String>>,
}

/// Applies `patch` to a single task in place. Mode effects are resolved
/// before the status field: a mode change into or out of `IGNORED` forces
/// `status`/`visibility` and takes precedence over an explicit value for
/// the same field supplied in the same patch.
fn apply_patch(
    task: &mut Task,
    patch: &TaskPatch,
    now: DateTime<Utc>,
) -> Result<(), WorkflowError> {
    let previous_mode = task.mode;
    let effective_mode = patch.mode.unwrap_or(previous_mode);

    if patch.status == Some(TaskStatus::Blocked) && effective_mode != TaskMode::Assigned {
        return Err(WorkflowError::BlockedRequiresAssignedMode);
    }

    let mut status_forced = false;
    let mut visibility_forced = false;

    if let Some(new_mode) = patch.mode {
        task.mode = new_mode;
        if new_mode == TaskMode::Ignored {
            task.visibility = Visibility::Hidden;
            task.status = TaskStatus::Pending;
            status_forced = true;
            visibility_forced = true;
        } else if previous_mode == TaskMode::Ignored {
            task.visibility = Visibility::Visible;
            visibility_forced = true;
        }
    }

    if !status_forced {
        if let Some(new_status) = patch.status {
            match new_status {
                TaskStatus::InProgress => {
                    if task.actual_start.is_none() {
                        task.actual_start = Some(now);
                    }
                }
                TaskStatus::Completed => {
                    if task.mode == TaskMode::Tracked && task.task_type == TaskType::Pod {
                        task.actual_start = Some(now);
                    } else {
                        task.actual_end = Some(now);
                    }
                    task.completed_at = Some(now);
                }
                _ => {}
            }
            task.status = new_status;
        }
    }

    if !visibility_forced {
        if let Some(new_visibility) = patch.visibility {
            task.visibility = new_visibility;
        }
    }

    if let Some(assigned_to) = patch.assigned_to {
        task.assigned_to = assigned_to;
    }
    if let Some(third_party_name) = &patch.third_party_name {
        task.third_party_name = third_party_name.clone();
    }
    if let Some(notes) = &patch.notes {
        task.notes = notes.clone();
    }

    if let Some(new_due) = patch.due_date {
        task.due_date = new_due;
        task.due_date_override = true;
        task.scheduled_end = new_due.map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc());
    } else if patch.due_date_override == Some(false) {
        task.due_date_override = false;
    } else if patch.due_date_override == Some(true) {
        task.due_date_override = true;
    }

    Ok(())
}

/// Applies `patch` to `task_id` within `tasks`, then runs the unblock
/// propagation rule if the patched task is a `FREIGHT_BOOKING` that just
/// transitioned to `COMPLETED`. Returns the patched task plus any
/// warnings (currently just the empty-booking-reference case).
pub fn update_task(
    tasks: &mut [Task],
    task_id: &str,
    patch: &TaskPatch,
    booking_reference: Option<&str>,
    updated_by: &str,
    now: DateTime<Utc>,
) -> Result<(Task, Vec<String>), WorkflowError> {
    let idx = tasks
        .iter()
        .position(|t| t.task_id == task_id)
        .ok_or_else(|| WorkflowError::TaskNotFound(task_id.to_string()))?;

    let previously_completed = tasks[idx].status == TaskStatus::Completed;
    apply_patch(&mut tasks[idx], patch, now)?;
    tasks[idx].updated_by = updated_by.to_string();
    tasks[idx].updated_at = now;

    let mut warnings = Vec::new();
    let just_completed_freight_booking = !previously_completed
        && tasks[idx].task_type == TaskType::FreightBooking
        && tasks[idx].status == TaskStatus::Completed;

    if just_completed_freight_booking {
        let reference_present = booking_reference.is_some_and(|r| !r.trim().is_empty());
        if reference_present {
            for task in tasks.iter_mut() {
                if task.task_type == TaskType::ExportClearance && task.status == TaskStatus::Blocked {
                    task.status = TaskStatus::Pending;
                    task.updated_by = updated_by.to_string();
                    task.updated_at = now;
                }
            }
        } else {
            warnings.push(
                "FREIGHT_BOOKING completed without a booking reference; EXPORT_CLEARANCE remains BLOCKED"
                    .to_string(),
            );
        }
    }

    Ok((tasks[idx].clone(), warnings))
}

/// Whether a shipment needs its task list materialized: it has no tasks
/// yet but does have both classifiers set.
pub fn needs_materialization(
    tasks_is_empty: bool,
    incoterm_code: &str,
    transaction_type: Option<TransactionType>,
) -> bool {
    tasks_is_empty && !incoterm_code.trim().is_empty() && transaction_type.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shipment_rules::{generate_tasks, ScheduleInputs};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn fob_export_tasks() -> Vec<Task> {
        let inputs = ScheduleInputs {
            cargo_ready_date: None,
            etd: Some(Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap()),
            eta: Some(Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap()),
        };
        generate_tasks(1, "FOB", TransactionType::Export, inputs, "system", now())
    }

    fn freight_booking_id(tasks: &[Task]) -> String {
        tasks
            .iter()
            .find(|t| t.task_type == TaskType::FreightBooking)
            .unwrap()
            .task_id
            .clone()
    }

    #[test]
    fn s3_unblocks_export_clearance_with_reference() {
        let mut tasks = fob_export_tasks();
        let clearance_before = tasks
            .iter()
            .find(|t| t.task_type == TaskType::ExportClearance)
            .unwrap();
        assert_eq!(clearance_before.status, TaskStatus::Blocked);

        let booking_id = freight_booking_id(&tasks);
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let (_, warnings) =
            update_task(&mut tasks, &booking_id, &patch, Some("BK123"), "agent", now()).unwrap();

        assert!(warnings.is_empty());
        let clearance_after = tasks
            .iter()
            .find(|t| t.task_type == TaskType::ExportClearance)
            .unwrap();
        assert_eq!(clearance_after.status, TaskStatus::Pending);
    }

    #[test]
    fn s3_warns_and_stays_blocked_without_reference() {
        let mut tasks = fob_export_tasks();
        let booking_id = freight_booking_id(&tasks);
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let (_, warnings) = update_task(&mut tasks, &booking_id, &patch, Some(""), "agent", now())
            .unwrap();

        assert_eq!(warnings.len(), 1);
        let clearance = tasks
            .iter()
            .find(|t| t.task_type == TaskType::ExportClearance)
            .unwrap();
        assert_eq!(clearance.status, TaskStatus::Blocked);
    }

    #[test]
    fn ignored_mode_forces_hidden_and_pending() {
        let mut tasks = fob_export_tasks();
        let origin_id = tasks
            .iter()
            .find(|t| t.task_type == TaskType::OriginHaulage)
            .unwrap()
            .task_id
            .clone();
        let patch = TaskPatch {
            mode: Some(TaskMode::Ignored),
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        };
        let (task, _) = update_task(&mut tasks, &origin_id, &patch, None, "agent", now()).unwrap();
        assert_eq!(task.visibility, Visibility::Hidden);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn blocked_requires_assigned_mode() {
        let mut tasks = fob_export_tasks();
        let origin_id = tasks
            .iter()
            .find(|t| t.task_type == TaskType::OriginHaulage)
            .unwrap()
            .task_id
            .clone();
        // Not passing a mode means the existing ASSIGNED mode is kept, so
        // flip it to TRACKED first.
        let to_tracked = TaskPatch {
            mode: Some(TaskMode::Tracked),
            ..Default::default()
        };
        update_task(&mut tasks, &origin_id, &to_tracked, None, "agent", now()).unwrap();

        let to_blocked = TaskPatch {
            status: Some(TaskStatus::Blocked),
            ..Default::default()
        };
        let result = update_task(&mut tasks, &origin_id, &to_blocked, None, "agent", now());
        assert_eq!(result.unwrap_err(), WorkflowError::BlockedRequiresAssignedMode);
    }

    #[test]
    fn due_date_override_roundtrip() {
        let mut tasks = fob_export_tasks();
        let origin_id = tasks[0].task_id.clone();
        let custom_date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let patch = TaskPatch {
            due_date: Some(Some(custom_date)),
            ..Default::default()
        };
        let (task, _) = update_task(&mut tasks, &origin_id, &patch, None, "agent", now()).unwrap();
        assert!(task.due_date_override);
        assert_eq!(task.due_date, Some(custom_date));

        let clear_patch = TaskPatch {
            due_date_override: Some(false),
            ..Default::default()
        };
        let (task, _) = update_task(&mut tasks, &origin_id, &clear_patch, None, "agent", now()).unwrap();
        assert!(!task.due_date_override);
    }

    #[test]
    fn tracked_pod_completion_sets_actual_start() {
        let mut tasks = fob_export_tasks();
        let pod_id = tasks
            .iter()
            .find(|t| t.task_type == TaskType::Pod)
            .unwrap()
            .task_id
            .clone();
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let (task, _) = update_task(&mut tasks, &pod_id, &patch, None, "agent", now()).unwrap();
        assert_eq!(task.actual_start, Some(now()));
        assert_eq!(task.actual_end, None);
        assert_eq!(task.completed_at, Some(now()));
    }
}
