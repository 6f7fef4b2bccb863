//! Status state machine (C2). Like `shipment-rules`, this is pure: it
//! takes a current/target pair plus enough context to resolve a path, and
//! returns a decision. Persistence and status-history bookkeeping are the
//! caller's job.

use shipment_models::TransactionType;
use shipment_rules::{status_path, status_path_list, PathTag, UNION_ORDER};

pub const DRAFT: i32 = 1001;
pub const PENDING_REVIEW: i32 = 1002;
pub const CONFIRMED: i32 = 2001;
pub const BOOKING_PENDING: i32 = 3001;
pub const BOOKING_CONFIRMED: i32 = 3002;
pub const DEPARTED: i32 = 4001;
pub const ARRIVED: i32 = 4002;
pub const COMPLETED: i32 = 5001;
pub const CANCELLED: i32 = -1;

/// Human label for a status code, used in status-history entries and in
/// rejection messages. Unknown codes fall back to their numeric string so
/// a caller can always format a message without needing a second lookup.
pub fn status_label(code: i32) -> String {
    match code {
        DRAFT => "Draft",
        PENDING_REVIEW => "Pending Review",
        CONFIRMED => "Confirmed",
        BOOKING_PENDING => "Booking Pending",
        BOOKING_CONFIRMED => "Booking Confirmed",
        DEPARTED => "Departed",
        ARRIVED => "Arrived",
        COMPLETED => "Completed",
        CANCELLED => "Cancelled",
        _ => return code.to_string(),
    }
    .to_string()
}

/// Context a caller supplies alongside `current`/`target`. `incoterm` and
/// `transaction_type` should both be `Some` or both be `None` — a shipment
/// either has classifiers set or it doesn't (see
/// `Shipment::has_classifiers`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionContext<'a> {
    pub incoterm: Option<&'a str>,
    pub transaction_type: Option<TransactionType>,
    pub allow_jump: bool,
    pub reverted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    pub path: Option<PathTag>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RejectReason {
    #[error("Cannot change status of a completed or cancelled shipment")]
    Terminal,
    #[error("Booking statuses not applicable for {incoterm} {transaction_type} (Path B)")]
    BookingNotApplicable {
        incoterm: String,
        transaction_type: String,
    },
    #[error("next step is {label} ({code}), not {attempted}")]
    NotNextStep {
        label: String,
        code: i32,
        attempted: i32,
    },
    #[error("target status {target} is not forward progress from {current}")]
    NotForwardProgress { current: i32, target: i32 },
}

fn union_position(code: i32) -> Option<usize> {
    UNION_ORDER.iter().position(|&c| c == code)
}

fn forward_progress_ok(current: i32, target: i32) -> bool {
    match (union_position(current), union_position(target)) {
        (Some(cur), Some(tgt)) => tgt > cur,
        _ => false,
    }
}

/// Whether `code` is a recognized lifecycle status, used by the legacy
/// migrator to decide whether a source status can pass through unchanged
/// or needs to fall back to `CONFIRMED`.
pub fn is_known_status(code: i32) -> bool {
    code == CANCELLED || union_position(code).is_some()
}

/// Runs the C2 transition decision. Checks are applied in the exact order
/// the rule table specifies: terminal guard, booking-not-applicable guard,
/// unconditional cancellation, jump/revert override, then path-aware
/// sequencing.
pub fn update_status(
    current: i32,
    target: i32,
    ctx: TransitionContext<'_>,
) -> Result<Accepted, RejectReason> {
    if !ctx.reverted && (current == COMPLETED || current == CANCELLED) {
        return Err(RejectReason::Terminal);
    }

    let path = match (ctx.incoterm, ctx.transaction_type) {
        (Some(incoterm), Some(tx)) => Some(status_path(incoterm, tx)),
        _ => None,
    };

    if matches!(path, Some(PathTag::B)) && matches!(target, BOOKING_PENDING | BOOKING_CONFIRMED) {
        return Err(RejectReason::BookingNotApplicable {
            incoterm: ctx.incoterm.unwrap_or_default().to_string(),
            transaction_type: ctx
                .transaction_type
                .map(|t| t.to_string())
                .unwrap_or_default(),
        });
    }

    if target == CANCELLED {
        return Ok(Accepted { path });
    }

    if ctx.allow_jump || ctx.reverted {
        return Ok(Accepted { path });
    }

    match (ctx.incoterm, ctx.transaction_type) {
        (Some(incoterm), Some(tx)) => {
            let path_list = status_path_list(incoterm, tx);
            if let Some(idx) = path_list.iter().position(|&c| c == current) {
                let next = path_list.get(idx + 1).copied();
                match next {
                    Some(expected) if expected == target => Ok(Accepted { path }),
                    Some(expected) => Err(RejectReason::NotNextStep {
                        label: status_label(expected),
                        code: expected,
                        attempted: target,
                    }),
                    None => Err(RejectReason::Terminal),
                }
            } else if forward_progress_ok(current, target) {
                Ok(Accepted { path })
            } else {
                Err(RejectReason::NotForwardProgress { current, target })
            }
        }
        _ => {
            if forward_progress_ok(current, target) {
                Ok(Accepted { path: None })
            } else {
                Err(RejectReason::NotForwardProgress { current, target })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(incoterm: &'a str, tx: TransactionType) -> TransitionContext<'a> {
        TransitionContext {
            incoterm: Some(incoterm),
            transaction_type: Some(tx),
            allow_jump: false,
            reverted: false,
        }
    }

    #[test]
    fn s1_path_a_advances_in_order() {
        let steps = [
            (CONFIRMED, BOOKING_PENDING),
            (BOOKING_PENDING, BOOKING_CONFIRMED),
            (BOOKING_CONFIRMED, DEPARTED),
            (DEPARTED, ARRIVED),
            (ARRIVED, COMPLETED),
        ];
        for (current, target) in steps {
            let result = update_status(current, target, ctx("FOB", TransactionType::Export));
            assert!(result.is_ok(), "{current} -> {target} should be accepted");
            assert_eq!(result.unwrap().path, Some(PathTag::A));
        }
    }

    #[test]
    fn s1_rejects_skipped_step() {
        let result = update_status(CONFIRMED, DEPARTED, ctx("FOB", TransactionType::Export));
        assert_eq!(
            result,
            Err(RejectReason::NotNextStep {
                label: "Booking Pending".to_string(),
                code: BOOKING_PENDING,
                attempted: DEPARTED,
            })
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "next step is Booking Pending (3001), not 4001"
        );
    }

    #[test]
    fn s2_path_b_rejects_booking_status() {
        let result = update_status(
            CONFIRMED,
            BOOKING_PENDING,
            ctx("CNF", TransactionType::Import),
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "Booking statuses not applicable for CNF IMPORT (Path B)"
        );
    }

    #[test]
    fn s5_terminal_protection_and_revert() {
        let mut c = ctx("FOB", TransactionType::Export);
        let rejected = update_status(COMPLETED, ARRIVED, c);
        assert_eq!(rejected, Err(RejectReason::Terminal));

        c.reverted = true;
        let accepted = update_status(COMPLETED, ARRIVED, c);
        assert!(accepted.is_ok());
    }

    #[test]
    fn cancellation_allowed_from_any_non_terminal() {
        let result = update_status(DRAFT, CANCELLED, ctx("FOB", TransactionType::Export));
        assert!(result.is_ok());
    }

    #[test]
    fn migrated_off_path_record_requires_forward_progress() {
        // A path-B shipment (CNF/IMPORT) currently sitting at 3001, a code
        // that isn't part of its own path — e.g. after a reclassification.
        let c = ctx("CNF", TransactionType::Import);
        let forward = update_status(BOOKING_PENDING, DEPARTED, c);
        assert!(forward.is_ok());

        let backward = update_status(BOOKING_PENDING, CONFIRMED, c);
        assert_eq!(
            backward,
            Err(RejectReason::NotForwardProgress {
                current: BOOKING_PENDING,
                target: CONFIRMED,
            })
        );
    }

    #[test]
    fn no_incoterm_context_falls_back_to_union_order() {
        let c = TransitionContext {
            incoterm: None,
            transaction_type: None,
            allow_jump: false,
            reverted: false,
        };
        let result = update_status(CONFIRMED, DEPARTED, c);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().path, None);
    }
}
