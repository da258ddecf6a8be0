//! Route guard decision
//!
//! Pure and synchronous: no fetch, no caching, no session mutation.

use crate::permissions::{can_access, home_route, RouteKey};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still hydrating, show a spinner
    Loading,
    Allow,
    RedirectLogin,
    /// Authenticated but not permitted, go to the country's home route
    RedirectHome(RouteKey),
}

pub fn guard_decision(session: &Session, route: RouteKey) -> GuardDecision {
    if session.is_loading() {
        return GuardDecision::Loading;
    }
    let country = match (session.is_authenticated(), session.country()) {
        (true, Some(country)) => country,
        _ => return GuardDecision::RedirectLogin,
    };
    if can_access(country, route) {
        GuardDecision::Allow
    } else {
        GuardDecision::RedirectHome(home_route(country))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::CountryCode;

    #[test]
    fn test_guard_states() {
        assert_eq!(
            guard_decision(&Session::loading(), RouteKey::Dashboard),
            GuardDecision::Loading
        );
        assert_eq!(
            guard_decision(&Session::unauthenticated(), RouteKey::Prediction),
            GuardDecision::RedirectLogin
        );

        let fr = Session::hydrate(Some("t".into()), Some(CountryCode::Fr));
        assert_eq!(guard_decision(&fr, RouteKey::Analytics), GuardDecision::Allow);
        assert_eq!(
            guard_decision(&fr, RouteKey::DataManagement),
            GuardDecision::RedirectHome(RouteKey::Dashboard)
        );
    }

    #[test]
    fn test_prediction_only_country_never_loops() {
        let ch = Session::hydrate(Some("t".into()), Some(CountryCode::Ch));
        match guard_decision(&ch, RouteKey::Dashboard) {
            GuardDecision::RedirectHome(home) => {
                assert_eq!(guard_decision(&ch, home), GuardDecision::Allow)
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
