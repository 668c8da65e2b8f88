use crate::models::{RoleAllowList, SessionState};
use crate::navigation::History;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// What a protected region should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still loading: neutral placeholder, no redirect.
    Pending,
    Denied { redirect: String },
    Permitted,
}

/// Gate in front of role-restricted content. Redirects at most once.
pub struct NavigationGuard {
    allow: RoleAllowList,
    login_route: String,
    redirected: AtomicBool,
}

impl NavigationGuard {
    pub fn new(allow: RoleAllowList, login_route: impl Into<String>) -> Self {
        Self {
            allow,
            login_route: login_route.into(),
            redirected: AtomicBool::new(false),
        }
    }

    /// Pure decision, no side effects.
    pub fn evaluate(&self, state: &SessionState) -> GuardDecision {
        match state {
            SessionState::Loading => GuardDecision::Pending,
            SessionState::Resolved(None) => GuardDecision::Denied {
                redirect: self.login_route.clone(),
            },
            SessionState::Resolved(Some(session)) if self.allow.allows(session.role()) => {
                GuardDecision::Permitted
            }
            SessionState::Resolved(Some(session)) => GuardDecision::Denied {
                redirect: session.role().dashboard_path(),
            },
        }
    }

    /// Evaluates and performs the denial redirect, once per guard.
    pub fn enforce(&self, state: &SessionState, history: &dyn History) -> GuardDecision {
        let decision = self.evaluate(state);
        if let GuardDecision::Denied { redirect } = &decision {
            if !self.redirected.swap(true, Ordering::SeqCst) {
                tracing::info!(redirect = %redirect, "Guard denied access");
                history.replace(redirect);
            }
        }
        decision
    }

    /// Waits for the session to resolve, then enforces.
    pub async fn resolve(
        &self,
        mut states: watch::Receiver<SessionState>,
        history: &dyn History,
    ) -> GuardDecision {
        let state = match states.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => {
                tracing::warn!("Session channel closed before resolving");
                SessionState::Resolved(None)
            }
        };
        self.enforce(&state, history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, Session, UserProfile};
    use crate::navigation::MemoryHistory;
    use chrono::Utc;

    fn session(role: Role) -> Session {
        Session::new(
            UserProfile {
                id: "d-1".to_string(),
                name: "Rey Detective".to_string(),
                email: "rey@agency.test".to_string(),
                role,
                created_at: Utc::now(),
            },
            "tok".to_string(),
        )
    }

    fn lawyers_only() -> NavigationGuard {
        NavigationGuard::new(RoleAllowList::new([Role::Lawyer]), "/login")
    }

    #[test]
    fn loading_is_pending_without_redirect() {
        let history = MemoryHistory::new("/lawyer/dashboard");
        let decision = lawyers_only().enforce(&SessionState::Loading, &history);

        assert_eq!(decision, GuardDecision::Pending);
        assert_eq!(history.location(), "/lawyer/dashboard");
    }

    #[test]
    fn allowed_role_is_permitted() {
        let state = SessionState::Resolved(Some(session(Role::Lawyer)));
        assert_eq!(lawyers_only().evaluate(&state), GuardDecision::Permitted);
    }

    #[test]
    fn absent_session_goes_to_login() {
        let decision = lawyers_only().evaluate(&SessionState::Resolved(None));
        assert_eq!(
            decision,
            GuardDecision::Denied {
                redirect: "/login".to_string()
            }
        );
    }

    #[tokio::test]
    async fn pending_then_denied_redirects_exactly_once() {
        let history = MemoryHistory::new("/lawyer/case-details?caseId=4");
        let guard = lawyers_only();
        let (tx, rx) = watch::channel(SessionState::Loading);

        assert_eq!(guard.enforce(&rx.borrow().clone(), &history), GuardDecision::Pending);

        tx.send_replace(SessionState::Resolved(Some(session(Role::Detective))));
        let decision = guard.resolve(rx, &history).await;
        assert_eq!(
            decision,
            GuardDecision::Denied {
                redirect: "/detective/dashboard".to_string()
            }
        );
        assert_eq!(history.location(), "/detective/dashboard");

        history.push("/somewhere-else");
        let again = guard.enforce(&SessionState::Resolved(Some(session(Role::Detective))), &history);
        assert!(matches!(again, GuardDecision::Denied { .. }));
        assert_eq!(history.location(), "/somewhere-else");
        assert_eq!(history.len(), 2);
    }
}
