use shipment_models::Role;

use crate::claims::Claims;

/// One call per guarded endpoint category; callers that need a finer
/// grain (task field edits) supply the extra detail inline.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    StatusUpdate,
    /// `shipment_status` is the shipment's *current* status; the toggle
    /// additionally requires it to be 5001 (Invoiced-eligible).
    InvoicedToggle { shipment_status: i32 },
    ExceptionFlag,
    /// `touches_visibility` is true when the caller's patch sets the
    /// `visibility` field — AFC managers/admins may edit every other
    /// task field but not that one.
    TaskUpdate { touches_visibility: bool },
    FileUpload,
    FileDelete,
    BlUpdateOrParse,
}

const INVOICE_ELIGIBLE_STATUS: i32 = 5001;

/// Per-endpoint permission matrix. Super-admins short-circuit to
/// always-allowed; everyone else is checked against their role.
pub fn allowed(claims: &Claims, action: Action) -> bool {
    if crate::super_admin::is_super_admin(&claims.email) {
        return true;
    }
    match action {
        Action::StatusUpdate => claims.is_afu(),
        Action::InvoicedToggle { shipment_status } => {
            claims.is_afu() && shipment_status == INVOICE_ELIGIBLE_STATUS
        }
        Action::ExceptionFlag => {
            claims.is_afu()
                || matches!(claims.role, Role::AfcAdmin | Role::AfcManager)
        }
        Action::TaskUpdate { touches_visibility } => {
            if claims.is_afu() {
                true
            } else {
                matches!(claims.role, Role::AfcAdmin | Role::AfcManager) && !touches_visibility
            }
        }
        Action::FileUpload => {
            claims.is_afu() || matches!(claims.role, Role::AfcAdmin | Role::AfcManager)
        }
        Action::FileDelete => claims.is_afu(),
        Action::BlUpdateOrParse => claims.is_afu(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> Claims {
        Claims {
            uid: "u1".into(),
            email: "someone@example.com".into(),
            role,
            company_id: (!role.is_afu()).then(|| "AFC-0001".to_string()),
            access_granted: true,
        }
    }

    #[test]
    fn status_update_is_afu_only() {
        assert!(allowed(&claims(Role::AfuSalesExecutive), Action::StatusUpdate));
        assert!(!allowed(&claims(Role::AfcAdmin), Action::StatusUpdate));
    }

    #[test]
    fn invoiced_toggle_requires_afu_and_status() {
        assert!(allowed(
            &claims(Role::AfuAdmin),
            Action::InvoicedToggle { shipment_status: 5001 }
        ));
        assert!(!allowed(
            &claims(Role::AfuAdmin),
            Action::InvoicedToggle { shipment_status: 4002 }
        ));
    }

    #[test]
    fn task_update_afc_manager_blocked_on_visibility() {
        let claims = claims(Role::AfcManager);
        assert!(allowed(
            &claims,
            Action::TaskUpdate { touches_visibility: false }
        ));
        assert!(!allowed(
            &claims,
            Action::TaskUpdate { touches_visibility: true }
        ));
    }

    #[test]
    fn task_update_afc_regular_always_forbidden() {
        let claims = claims(Role::AfcRegular);
        assert!(!allowed(
            &claims,
            Action::TaskUpdate { touches_visibility: false }
        ));
    }

    #[test]
    fn file_delete_is_afu_only() {
        assert!(!allowed(&claims(Role::AfcAdmin), Action::FileDelete));
    }

    #[test]
    fn super_admin_bypasses_everything() {
        let mut claims = claims(Role::AfcRegular);
        claims.email = "ops-lead@atlasforwarding.example".to_string();
        assert!(allowed(&claims, Action::StatusUpdate));
        assert!(allowed(&claims, Action::FileDelete));
    }
}
