//! Permission check predicates over flattened `subject:action` keys.

/// Check whether the permission set contains `subject:action`.
pub fn has_permission(permissions: &[String], subject: &str, action: &str) -> bool {
    permissions
        .iter()
        .any(|p| matches_key(p, subject, action))
}

/// Check whether the permission set contains at least one of the checks.
pub fn has_any_permission(permissions: &[String], checks: &[(&str, &str)]) -> bool {
    checks
        .iter()
        .any(|(subject, action)| has_permission(permissions, subject, action))
}

/// Check whether the permission set contains every one of the checks.
pub fn has_all_permissions(permissions: &[String], checks: &[(&str, &str)]) -> bool {
    checks
        .iter()
        .all(|(subject, action)| has_permission(permissions, subject, action))
}

fn matches_key(key: &str, subject: &str, action: &str) -> bool {
    key.split_once(':')
        .is_some_and(|(s, a)| s == subject && a == action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms() -> Vec<String> {
        vec!["user:read".to_string(), "role:manage".to_string()]
    }

    #[test]
    fn single_check() {
        assert!(has_permission(&perms(), "user", "read"));
        assert!(!has_permission(&perms(), "user", "delete"));
        assert!(!has_permission(&[], "user", "read"));
    }

    #[test]
    fn subject_and_action_must_both_match() {
        // "user:read" must not satisfy a check for "user:r" or "us:read".
        assert!(!has_permission(&perms(), "user", "r"));
        assert!(!has_permission(&perms(), "us", "read"));
        assert!(!has_permission(&perms(), "user:read", ""));
    }

    #[test]
    fn any_and_all() {
        assert!(has_any_permission(
            &perms(),
            &[("user", "delete"), ("role", "manage")]
        ));
        assert!(!has_any_permission(&perms(), &[("user", "delete")]));

        assert!(has_all_permissions(
            &perms(),
            &[("user", "read"), ("role", "manage")]
        ));
        assert!(!has_all_permissions(
            &perms(),
            &[("user", "read"), ("user", "delete")]
        ));
        assert!(has_all_permissions(&perms(), &[]));
    }
}
