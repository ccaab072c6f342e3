//! Route/eligibility gate.
//!
//! A live connection is permitted only for an authenticated viewer on a
//! non-public route. This predicate is the single source of truth for that
//! decision: the embedding application re-evaluates it on every route or
//! auth change and drives `connect(eligible)` with the result. It is pure
//! and never consults the connection itself.

use care_session::Viewer;

/// Routes on which a live connection is never established.
pub const PUBLIC_ROUTES: &[&str] = &["/", "/login", "/register", "/password-reset"];

/// Whether `route` is in the known public/unauthenticated set.
///
/// Matches exact entries plus nested paths under them (`/login/help`).
/// The root route matches only exactly.
#[must_use]
pub fn is_public_route(route: &str) -> bool {
    PUBLIC_ROUTES.iter().any(|public| {
        if *public == "/" {
            route == "/"
        } else {
            route == *public || route.starts_with(&format!("{public}/"))
        }
    })
}

/// Whether a live connection is permitted for this route and viewer.
#[must_use]
pub fn eligible(route: &str, viewer: Option<&Viewer>) -> bool {
    !is_public_route(route) && viewer.is_some_and(Viewer::has_valid_identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/", true; "root")]
    #[test_case("/login", true; "login")]
    #[test_case("/login/help", true; "nested under login")]
    #[test_case("/register", true; "register")]
    #[test_case("/password-reset", true; "password reset")]
    #[test_case("/password-reset/confirm", true; "nested password reset")]
    #[test_case("/medications", false; "medications")]
    #[test_case("/appointments/3", false; "appointment detail")]
    #[test_case("/loginopedia", false; "prefix without separator")]
    fn test_is_public_route(route: &str, expected: bool) {
        assert_eq!(is_public_route(route), expected);
    }

    #[test]
    fn test_eligible_requires_viewer() {
        assert!(!eligible("/medications", None));
    }

    #[test]
    fn test_eligible_requires_valid_identity() {
        assert!(!eligible("/medications", Some(&Viewer::new(0))));
        assert!(eligible("/medications", Some(&Viewer::new(12))));
    }

    #[test]
    fn test_not_eligible_on_public_route_even_when_authenticated() {
        assert!(!eligible("/login", Some(&Viewer::new(12))));
    }
}
