//! Incoterm rules engine (C1). Pure and deterministic: no I/O, no clock
//! reads beyond what callers pass in, no database access. Everything here
//! is safe to unit-test in isolation, which is the point.

mod matrix;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use shipment_models::{AssignedTo, Task, TaskMode, TaskStatus, TaskType, TransactionType, Visibility};

pub use matrix::{task_types_for, INCOTERMS};

/// Inputs that drive both task generation and due-date recalculation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleInputs {
    pub cargo_ready_date: Option<NaiveDate>,
    pub etd: Option<DateTime<Utc>>,
    pub eta: Option<DateTime<Utc>>,
}

/// Path tag returned by [`status_path`], also embedded in accept responses
/// from the state machine for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathTag {
    A,
    B,
}

impl std::fmt::Display for PathTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PathTag::A => "A",
            PathTag::B => "B",
        })
    }
}

/// The linear reference progression shared by both paths, used as the
/// fallback order when a shipment has no usable incoterm context and by
/// migrated records that sit off their nominal path.
pub const UNION_ORDER: [i32; 8] = [1001, 1002, 2001, 3001, 3002, 4001, 4002, 5001];

fn due_date_for(task_type: TaskType, inputs: ScheduleInputs) -> Option<NaiveDate> {
    match task_type {
        TaskType::OriginHaulage => inputs
            .cargo_ready_date
            .or_else(|| inputs.etd.map(|d| (d - Duration::days(3)).date_naive())),
        TaskType::FreightBooking => inputs.etd.map(|d| (d - Duration::days(7)).date_naive()),
        TaskType::ExportClearance => inputs.etd.map(|d| (d - Duration::days(2)).date_naive()),
        TaskType::Pol => inputs.etd.map(|d| d.date_naive()),
        TaskType::Pod => inputs.eta.map(|d| d.date_naive()),
        TaskType::ImportClearance => inputs.eta.map(|d| (d + Duration::days(1)).date_naive()),
        TaskType::DestinationHaulage => inputs.eta.map(|d| (d + Duration::days(3)).date_naive()),
    }
}

fn task_id_for(shipment_countid: i64, task_type: TaskType) -> String {
    format!("TASK-{shipment_countid}-{task_type}")
}

/// Resolves the canonical task-type sequence for `(incoterm,
/// transaction_type)` and materializes a fresh task list. Returns an empty
/// list for an unknown pair.
pub fn generate_tasks(
    shipment_countid: i64,
    incoterm: &str,
    transaction_type: TransactionType,
    inputs: ScheduleInputs,
    updated_by: &str,
    now: DateTime<Utc>,
) -> Vec<Task> {
    let has_freight_booking =
        task_types_for(incoterm, transaction_type).contains(&TaskType::FreightBooking);

    task_types_for(incoterm, transaction_type)
        .into_iter()
        .map(|task_type| {
            let mode = Task::default_mode_for(task_type);
            let status = if task_type == TaskType::ExportClearance && has_freight_booking {
                TaskStatus::Blocked
            } else {
                TaskStatus::Pending
            };
            let due_date = due_date_for(task_type, inputs);

            Task {
                task_id: task_id_for(shipment_countid, task_type),
                task_type,
                display_name: task_type.display_name().to_string(),
                leg_level: task_type.leg_level(),
                status,
                mode,
                assigned_to: AssignedTo::Af,
                third_party_name: None,
                visibility: Visibility::Visible,
                scheduled_start: None,
                scheduled_end: due_date.map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc()),
                actual_start: None,
                actual_end: None,
                due_date,
                due_date_override: false,
                completed_at: None,
                notes: None,
                updated_by: updated_by.to_string(),
                updated_at: now,
            }
        })
        .collect()
}

/// Recomputes due dates for every task whose `due_date_override` is not
/// set, leaving overridden tasks untouched. Returns a new vector; tasks
/// whose recomputed due date didn't actually change are still copied
/// through unmodified (no spurious `updated_at` bump).
pub fn recalculate_due_dates(
    tasks: Vec<Task>,
    inputs: ScheduleInputs,
    updated_by: &str,
    now: DateTime<Utc>,
) -> Vec<Task> {
    tasks
        .into_iter()
        .map(|mut task| {
            if task.due_date_override {
                return task;
            }
            let new_due = due_date_for(task.task_type, inputs);
            if new_due != task.due_date {
                task.due_date = new_due;
                task.scheduled_end = new_due.map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc());
                task.updated_by = updated_by.to_string();
                task.updated_at = now;
            }
            task
        })
        .collect()
}

/// Legacy `task_type` spellings that predate the current naming scheme,
/// mapped onto their current equivalent.
const TASK_TYPE_ALIASES: &[(&str, TaskType)] = &[
    ("HAULAGE_ORIGIN", TaskType::OriginHaulage),
    ("ORIGIN_TRUCKING", TaskType::OriginHaulage),
    ("BOOKING", TaskType::FreightBooking),
    ("FREIGHT", TaskType::FreightBooking),
    ("CUSTOMS_EXPORT", TaskType::ExportClearance),
    ("EXPORT_CUSTOMS", TaskType::ExportClearance),
    ("CUSTOMS_IMPORT", TaskType::ImportClearance),
    ("IMPORT_CUSTOMS", TaskType::ImportClearance),
    ("HAULAGE_DESTINATION", TaskType::DestinationHaulage),
    ("DESTINATION_TRUCKING", TaskType::DestinationHaulage),
];

fn resolve_task_type(raw: &str) -> Option<TaskType> {
    raw.parse::<TaskType>().ok().or_else(|| {
        TASK_TYPE_ALIASES
            .iter()
            .find(|(name, _)| *name == raw)
            .map(|(_, task_type)| *task_type)
    })
}

/// The subset of a task's shape that storage actually guarantees. A
/// legacy write path left `mode`, `leg_level`, `display_name`, and most
/// timing fields unset more often than not; `task_type` itself may carry
/// a name from before the current naming scheme.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyTask {
    task_id: String,
    task_type: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    leg_level: Option<i16>,
    status: TaskStatus,
    #[serde(default)]
    mode: Option<TaskMode>,
    #[serde(default)]
    assigned_to: Option<AssignedTo>,
    #[serde(default)]
    third_party_name: Option<String>,
    #[serde(default)]
    visibility: Option<Visibility>,
    #[serde(default)]
    scheduled_start: Option<DateTime<Utc>>,
    #[serde(default)]
    scheduled_end: Option<DateTime<Utc>>,
    #[serde(default)]
    actual_start: Option<DateTime<Utc>>,
    #[serde(default)]
    actual_end: Option<DateTime<Utc>>,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    due_date_override: bool,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    updated_by: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Normalizes a task read from storage that may predate the current task
/// shape. Resolves legacy `task_type` spellings via [`TASK_TYPE_ALIASES`],
/// backfills a missing `mode` from [`Task::default_mode_for`], always
/// recomputes `leg_level` and a blank `display_name` from the resolved
/// type, and fills `actual_start`/`actual_end`/`completed_at`/
/// `scheduled_end` that a stale write left unset but the task's own
/// `status`/`due_date` already imply (mirroring the timestamps
/// `shipment-workflow` would have set had the transition gone through
/// the normal path). Returns `None` for a record whose `task_type`
/// resolves to nothing known — the caller drops it rather than fabricate
/// a type.
pub fn migrate_task_on_read(raw: serde_json::Value, now: DateTime<Utc>) -> Option<Task> {
    let legacy: LegacyTask = serde_json::from_value(raw).ok()?;
    let task_type = resolve_task_type(&legacy.task_type)?;
    let mode = legacy.mode.unwrap_or_else(|| Task::default_mode_for(task_type));

    let scheduled_end = legacy.scheduled_end.or_else(|| {
        legacy
            .due_date
            .map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc())
    });

    let mut actual_start = legacy.actual_start;
    let mut actual_end = legacy.actual_end;
    let mut completed_at = legacy.completed_at;
    match legacy.status {
        TaskStatus::InProgress => actual_start = actual_start.or(Some(now)),
        TaskStatus::Completed => {
            completed_at = completed_at.or(Some(now));
            if mode == TaskMode::Tracked && task_type == TaskType::Pod {
                actual_start = actual_start.or(Some(now));
            } else {
                actual_end = actual_end.or(Some(now));
            }
        }
        TaskStatus::Pending | TaskStatus::Blocked => {}
    }

    Some(Task {
        task_id: legacy.task_id,
        task_type,
        display_name: legacy
            .display_name
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| task_type.display_name().to_string()),
        leg_level: task_type.leg_level(),
        status: legacy.status,
        mode,
        assigned_to: legacy.assigned_to.unwrap_or(AssignedTo::Af),
        third_party_name: legacy.third_party_name,
        visibility: legacy.visibility.unwrap_or(Visibility::Visible),
        scheduled_start: legacy.scheduled_start,
        scheduled_end,
        actual_start,
        actual_end,
        due_date: legacy.due_date,
        due_date_override: legacy.due_date_override,
        completed_at,
        notes: legacy.notes,
        updated_by: legacy.updated_by.unwrap_or_else(|| "legacy-migration".to_string()),
        updated_at: legacy.updated_at.unwrap_or(now),
    })
}

/// Path A is returned when the pair's matrix row contains a
/// `FREIGHT_BOOKING` task; Path B otherwise. Total over every pair,
/// including ones unknown to the matrix (those fall to Path B since they
/// never generate a `FREIGHT_BOOKING` task).
pub fn status_path(incoterm: &str, transaction_type: TransactionType) -> PathTag {
    if task_types_for(incoterm, transaction_type).contains(&TaskType::FreightBooking) {
        PathTag::A
    } else {
        PathTag::B
    }
}

/// The ordered status-code progression for a pair's path.
pub fn status_path_list(incoterm: &str, transaction_type: TransactionType) -> Vec<i32> {
    match status_path(incoterm, transaction_type) {
        PathTag::A => vec![1001, 1002, 2001, 3001, 3002, 4001, 4002, 5001],
        PathTag::B => vec![1001, 1002, 2001, 4001, 4002, 5001],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dt(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn s1_fob_export_matches_scenario() {
        let inputs = ScheduleInputs {
            cargo_ready_date: None,
            etd: Some(dt(2026, 3, 10)),
            eta: Some(dt(2026, 4, 1)),
        };
        let tasks = generate_tasks(
            42,
            "FOB",
            TransactionType::Export,
            inputs,
            "system",
            dt(2026, 1, 1),
        );

        let leg_order: Vec<i16> = tasks.iter().map(|t| t.leg_level).collect();
        assert_eq!(leg_order, vec![1, 2, 3, 4, 5]);

        let types: Vec<TaskType> = tasks.iter().map(|t| t.task_type).collect();
        assert_eq!(
            types,
            vec![
                TaskType::OriginHaulage,
                TaskType::FreightBooking,
                TaskType::ExportClearance,
                TaskType::Pol,
                TaskType::Pod,
            ]
        );

        let clearance = tasks
            .iter()
            .find(|t| t.task_type == TaskType::ExportClearance)
            .unwrap();
        assert_eq!(clearance.status, TaskStatus::Blocked);

        let booking = tasks
            .iter()
            .find(|t| t.task_type == TaskType::FreightBooking)
            .unwrap();
        assert_eq!(booking.due_date, Some(NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()));

        let pol = tasks.iter().find(|t| t.task_type == TaskType::Pol).unwrap();
        assert_eq!(pol.mode, TaskMode::Tracked);
        assert_eq!(pol.due_date, Some(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()));

        assert_eq!(status_path("FOB", TransactionType::Export), PathTag::A);
    }

    #[test]
    fn s2_cnf_import_is_path_b() {
        assert_eq!(status_path("CNF", TransactionType::Import), PathTag::B);
        assert_eq!(
            status_path_list("CNF", TransactionType::Import),
            vec![1001, 1002, 2001, 4001, 4002, 5001]
        );
        let types: Vec<TaskType> = task_types_for("CNF", TransactionType::Import);
        assert!(!types.contains(&TaskType::FreightBooking));
        assert!(types.contains(&TaskType::Pol));
        assert!(types.contains(&TaskType::Pod));
    }

    #[test]
    fn unknown_incoterm_generates_nothing() {
        let tasks = generate_tasks(
            1,
            "ZZZ",
            TransactionType::Export,
            ScheduleInputs::default(),
            "system",
            dt(2026, 1, 1),
        );
        assert!(tasks.is_empty());
    }

    #[test]
    fn exw_export_has_only_milestones() {
        let types = task_types_for("EXW", TransactionType::Export);
        assert_eq!(types, vec![TaskType::Pol, TaskType::Pod]);
        assert_eq!(status_path("EXW", TransactionType::Export), PathTag::B);
    }

    #[test]
    fn recalculate_skips_overridden_tasks() {
        let inputs = ScheduleInputs {
            cargo_ready_date: None,
            etd: Some(dt(2026, 3, 10)),
            eta: Some(dt(2026, 4, 1)),
        };
        let mut tasks = generate_tasks(
            7,
            "FOB",
            TransactionType::Export,
            inputs,
            "system",
            dt(2026, 1, 1),
        );
        for t in tasks.iter_mut() {
            if t.task_type == TaskType::Pol {
                t.due_date_override = true;
                t.due_date = Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
            }
        }

        let new_inputs = ScheduleInputs {
            cargo_ready_date: None,
            etd: Some(dt(2026, 5, 1)),
            eta: Some(dt(2026, 6, 1)),
        };
        let recalculated = recalculate_due_dates(tasks, new_inputs, "ops", dt(2026, 2, 1));

        let pol = recalculated
            .iter()
            .find(|t| t.task_type == TaskType::Pol)
            .unwrap();
        assert_eq!(pol.due_date, Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));

        let booking = recalculated
            .iter()
            .find(|t| t.task_type == TaskType::FreightBooking)
            .unwrap();
        assert_eq!(
            booking.due_date,
            Some(NaiveDate::from_ymd_opt(2026, 4, 24).unwrap())
        );
        assert_eq!(booking.updated_by, "ops");
    }

    #[test]
    fn domestic_transactions_generate_nothing() {
        let tasks = generate_tasks(
            1,
            "FOB",
            TransactionType::Domestic,
            ScheduleInputs::default(),
            "system",
            dt(2026, 1, 1),
        );
        assert!(tasks.is_empty());
    }

    #[test]
    fn migrate_resolves_legacy_task_type_alias() {
        let raw = serde_json::json!({
            "taskId": "t-1",
            "taskType": "BOOKING",
            "status": "PENDING",
        });
        let task = migrate_task_on_read(raw, dt(2026, 1, 1)).unwrap();
        assert_eq!(task.task_type, TaskType::FreightBooking);
        assert_eq!(task.leg_level, TaskType::FreightBooking.leg_level());
    }

    #[test]
    fn migrate_unknown_task_type_drops_the_task() {
        let raw = serde_json::json!({
            "taskId": "t-1",
            "taskType": "SOMETHING_MADE_UP",
            "status": "PENDING",
        });
        assert!(migrate_task_on_read(raw, dt(2026, 1, 1)).is_none());
    }

    #[test]
    fn migrate_backfills_mode_and_display_name() {
        let raw = serde_json::json!({
            "taskId": "t-2",
            "taskType": "POL",
            "status": "PENDING",
        });
        let task = migrate_task_on_read(raw, dt(2026, 1, 1)).unwrap();
        assert_eq!(task.mode, Task::default_mode_for(TaskType::Pol));
        assert_eq!(task.display_name, TaskType::Pol.display_name());
    }

    #[test]
    fn migrate_blank_display_name_is_backfilled_not_kept() {
        let raw = serde_json::json!({
            "taskId": "t-3",
            "taskType": "EXPORT_CLEARANCE",
            "displayName": "   ",
            "status": "PENDING",
        });
        let task = migrate_task_on_read(raw, dt(2026, 1, 1)).unwrap();
        assert_eq!(task.display_name, TaskType::ExportClearance.display_name());
    }

    #[test]
    fn migrate_completed_backfills_actual_end_and_completed_at() {
        let raw = serde_json::json!({
            "taskId": "t-4",
            "taskType": "ORIGIN_HAULAGE",
            "status": "COMPLETED",
        });
        let now = dt(2026, 2, 5);
        let task = migrate_task_on_read(raw, now).unwrap();
        assert_eq!(task.completed_at, Some(now));
        assert_eq!(task.actual_end, Some(now));
        assert_eq!(task.actual_start, None);
    }

    #[test]
    fn migrate_completed_pod_tracked_backfills_actual_start_instead() {
        let raw = serde_json::json!({
            "taskId": "t-5",
            "taskType": "POD",
            "status": "COMPLETED",
        });
        let now = dt(2026, 2, 5);
        let task = migrate_task_on_read(raw, now).unwrap();
        assert_eq!(task.mode, TaskMode::Tracked);
        assert_eq!(task.completed_at, Some(now));
        assert_eq!(task.actual_start, Some(now));
        assert_eq!(task.actual_end, None);
    }
}
