/// Small static allowlist of staff who bypass the normal role matrix
/// entirely.
const SUPER_ADMIN_EMAILS: &[&str] = &[
    "ops-lead@atlasforwarding.example",
    "platform-admin@atlasforwarding.example",
];

pub fn is_super_admin(email: &str) -> bool {
    SUPER_ADMIN_EMAILS
        .iter()
        .any(|e| e.eq_ignore_ascii_case(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        assert!(is_super_admin("Ops-Lead@atlasforwarding.example"));
    }

    #[test]
    fn unknown_email_is_not_super_admin() {
        assert!(!is_super_admin("someone@example.com"));
    }
}
