//! Per-route authentication and authorization requirements consumed by the
//! auth middleware.

/// Whether a route rejects unauthenticated requests or merely records the
/// identity when a valid token is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Required,
    Optional,
}

/// Role requirement attached to a protected scope.
#[derive(Debug, Clone)]
pub enum RequiredRole {
    /// The caller must hold exactly this role.
    Single(&'static str),
    /// The caller must hold at least one of these roles.
    Any(&'static [&'static str]),
}

impl RequiredRole {
    pub fn is_satisfied(&self, roles: &[String]) -> bool {
        match self {
            RequiredRole::Single(required) => roles.iter().any(|r| r == required),
            RequiredRole::Any(required) => {
                required.iter().any(|req| roles.iter().any(|r| r == req))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(list: &[&str]) -> Vec<String> {
        list.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn single_role_must_match() {
        let req = RequiredRole::Single("admin");
        assert!(req.is_satisfied(&roles(&["admin"])));
        assert!(!req.is_satisfied(&roles(&["tutor", "staff"])));
    }

    #[test]
    fn any_role_matches_one_of_set() {
        let req = RequiredRole::Any(&["admin", "tutor"]);
        assert!(req.is_satisfied(&roles(&["tutor"])));
        assert!(!req.is_satisfied(&roles(&["student"])));
        assert!(!req.is_satisfied(&[]));
    }
}
