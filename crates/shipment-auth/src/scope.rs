use crate::claims::Claims;

/// The `company_id` a query should actually be filtered by. AFC callers
/// are always pinned to their own company; any `requested` override they
/// pass is silently ignored rather than rejected.
pub fn effective_company_scope<'a>(claims: &'a Claims, requested: Option<&'a str>) -> Option<&'a str> {
    if claims.is_afc() {
        claims.company_id.as_deref()
    } else {
        requested
    }
}

/// Whether `claims` may observe a resource scoped to `resource_company_id`.
/// AFU always can; AFC only within their own company.
pub fn can_access_company(claims: &Claims, resource_company_id: &str) -> bool {
    if claims.is_afu() {
        return true;
    }
    claims.company_id.as_deref() == Some(resource_company_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipment_models::Role;

    fn afc_claims(company_id: &str) -> Claims {
        Claims {
            uid: "u1".into(),
            email: "afc@example.com".into(),
            role: Role::AfcRegular,
            company_id: Some(company_id.to_string()),
            access_granted: true,
        }
    }

    #[test]
    fn afc_override_is_ignored() {
        let claims = afc_claims("AFC-0007");
        assert_eq!(
            effective_company_scope(&claims, Some("AFC-0009")),
            Some("AFC-0007")
        );
    }

    #[test]
    fn afc_cannot_access_other_company() {
        let claims = afc_claims("AFC-0007");
        assert!(!can_access_company(&claims, "AFC-0009"));
        assert!(can_access_company(&claims, "AFC-0007"));
    }
}
