//! Signed-in user and the role checks that gate feedback actions.

use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::feedback::{FeedbackAction, FeedbackRecord, FeedbackStatus};
use crate::lenient;

const ADMIN_PERMISSION: &str = "admin";
const MONITOR_PERMISSIONS: [&str; 2] = ["monitor", "supervisor"];
const AGENT_PERMISSION_PREFIX: &str = "agent_";

/// Ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    Viewer,
    Agent,
    Monitor,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentUser {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub username: String,
    #[serde(alias = "fullName", alias = "nome", deserialize_with = "lenient::opt_string")]
    pub full_name: Option<String>,
    #[serde(alias = "ativo", deserialize_with = "lenient::flag")]
    pub active: bool,
    /// Permission names: `admin`, `monitor`, `agent_<id>`.
    #[serde(deserialize_with = "lenient::names")]
    pub permissions: Vec<String>,
}

impl Default for CurrentUser {
    fn default() -> Self {
        Self {
            id: 0,
            username: String::new(),
            full_name: None,
            active: true,
            permissions: Vec::new(),
        }
    }
}

impl CurrentUser {
    pub fn role(&self) -> Role {
        let has = |name: &str| self.permissions.iter().any(|p| p.eq_ignore_ascii_case(name));
        if has(ADMIN_PERMISSION) {
            Role::Admin
        } else if MONITOR_PERMISSIONS.iter().any(|p| has(*p)) {
            Role::Monitor
        } else if !self.agent_ids().is_empty() {
            Role::Agent
        } else {
            Role::Viewer
        }
    }

    /// Agent ids this user may act for, from `agent_<id>` permissions.
    pub fn agent_ids(&self) -> Vec<&str> {
        self.permissions
            .iter()
            .filter_map(|p| p.strip_prefix(AGENT_PERMISSION_PREFIX))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect()
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<CurrentUser>,
}

impl Session {
    pub fn signed_in(user: CurrentUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Role {
        match &self.user {
            Some(user) if user.active => user.role(),
            _ => Role::Viewer,
        }
    }

    pub fn can_administer(&self) -> bool {
        self.role() == Role::Admin
    }

    pub fn can_review(&self) -> bool {
        self.role() >= Role::Monitor
    }

    /// The agent id an agent-only user's listing is limited to.
    pub fn agent_scope(&self) -> Option<String> {
        if self.role() != Role::Agent {
            return None;
        }
        match self.user.as_ref().map(|u| u.agent_ids()).as_deref() {
            Some([only]) => Some(only.to_string()),
            _ => None,
        }
    }

    pub fn owns(&self, record: &FeedbackRecord) -> bool {
        let agent = record.agent_id.trim();
        !agent.is_empty()
            && self
                .user
                .as_ref()
                .is_some_and(|u| u.agent_ids().contains(&agent))
    }

    /// Whether the signed-in user may run `action` on `record` in its
    /// current state.
    pub fn can_perform(
        &self,
        record: &FeedbackRecord,
        action: &FeedbackAction,
    ) -> Result<(), DashboardError> {
        let role = self.role();
        match action {
            FeedbackAction::Accept | FeedbackAction::Contest { .. } => {
                if !(self.owns(record) || role == Role::Admin) {
                    return Err(DashboardError::Forbidden(format!(
                        "only the evaluated agent can {} this feedback",
                        action.label()
                    )));
                }
                require_status(record, action, |s| s == FeedbackStatus::Pending)
            }
            FeedbackAction::Review { .. } => {
                if role < Role::Monitor {
                    return Err(DashboardError::Forbidden(
                        "only monitors can review contestations".to_string(),
                    ));
                }
                require_status(record, action, |s| s == FeedbackStatus::InReview)
            }
            FeedbackAction::Edit { .. } => {
                if role < Role::Monitor {
                    return Err(DashboardError::Forbidden(
                        "only monitors can edit feedback".to_string(),
                    ));
                }
                require_status(record, action, |s| s != FeedbackStatus::InReview)
            }
        }
    }
}

impl Session {
    /// Look up `id` among the loaded records and check `action` against
    /// it before anything goes over the network.
    pub fn authorize(
        &self,
        records: &[FeedbackRecord],
        id: i64,
        action: &FeedbackAction,
    ) -> Result<(), DashboardError> {
        let record = records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| DashboardError::Invalid(format!("feedback {} is not loaded", id)))?;
        self.can_perform(record, action)
    }
}

fn require_status(
    record: &FeedbackRecord,
    action: &FeedbackAction,
    allowed: impl Fn(FeedbackStatus) -> bool,
) -> Result<(), DashboardError> {
    if allowed(record.status) {
        Ok(())
    } else {
        Err(DashboardError::Forbidden(format!(
            "cannot {} feedback that is {}",
            action.label(),
            record.status.label().to_lowercase()
        )))
    }
}

/// Reactive session shared through context.
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub session: ReadSignal<Session>,
    set_session: WriteSignal<Session>,
}

impl SessionContext {
    pub fn provide() -> Self {
        let (session, set_session) = signal(Session::default());
        let ctx = Self {
            session,
            set_session,
        };
        provide_context(ctx);
        ctx
    }

    pub fn sign_in(&self, user: CurrentUser) {
        self.set_session.set(Session::signed_in(user));
    }
}

pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::ContestationResolution;

    fn user(permissions: &[&str]) -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "user".to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            ..CurrentUser::default()
        }
    }

    fn record(agent: &str, status: FeedbackStatus) -> FeedbackRecord {
        FeedbackRecord {
            id: 1,
            agent_id: agent.to_string(),
            status,
            ..FeedbackRecord::default()
        }
    }

    fn contest() -> FeedbackAction {
        FeedbackAction::Contest {
            reason: "wrong call".to_string(),
        }
    }

    fn review() -> FeedbackAction {
        FeedbackAction::Review {
            resolution: ContestationResolution::Rejected,
            reply: String::new(),
        }
    }

    #[test]
    fn test_roles_from_permissions() {
        assert_eq!(user(&["ADMIN"]).role(), Role::Admin);
        assert_eq!(user(&["monitor", "agent_1"]).role(), Role::Monitor);
        assert_eq!(user(&["agent_1011"]).role(), Role::Agent);
        assert_eq!(user(&[]).role(), Role::Viewer);
        assert_eq!(Session::default().role(), Role::Viewer);
    }

    #[test]
    fn test_inactive_user_is_viewer() {
        let mut admin = user(&["admin"]);
        admin.active = false;
        assert_eq!(Session::signed_in(admin).role(), Role::Viewer);
    }

    #[test]
    fn test_decode_current_user() {
        let decoded: CurrentUser = serde_json::from_value(serde_json::json!({
            "id": "4",
            "username": "kali",
            "full_name": "Kali Vitória",
            "permissions": [{"id": 2, "name": "agent_1116"}]
        }))
        .unwrap();
        assert_eq!(decoded.id, 4);
        assert!(decoded.active);
        assert_eq!(decoded.agent_ids(), vec!["1116"]);
        assert_eq!(decoded.display_name(), "Kali Vitória");
    }

    #[test]
    fn test_agent_may_accept_own_pending_feedback() {
        let session = Session::signed_in(user(&["agent_1011"]));
        let own = record("1011", FeedbackStatus::Pending);
        assert!(session.can_perform(&own, &FeedbackAction::Accept).is_ok());
        assert!(session.can_perform(&own, &contest()).is_ok());
        assert_eq!(session.agent_scope().as_deref(), Some("1011"));
    }

    #[test]
    fn test_agent_may_not_touch_others_feedback() {
        let session = Session::signed_in(user(&["agent_1011"]));
        let other = record("1144", FeedbackStatus::Pending);
        assert!(matches!(
            session.can_perform(&other, &FeedbackAction::Accept),
            Err(DashboardError::Forbidden(_))
        ));
    }

    #[test]
    fn test_accept_requires_pending() {
        let session = Session::signed_in(user(&["agent_1011"]));
        let reviewed = record("1011", FeedbackStatus::InReview);
        assert!(session.can_perform(&reviewed, &FeedbackAction::Accept).is_err());
    }

    #[test]
    fn test_review_requires_monitor_and_in_review() {
        let monitor = Session::signed_in(user(&["monitor"]));
        let agent = Session::signed_in(user(&["agent_1011"]));
        let contested = record("1011", FeedbackStatus::InReview);

        assert!(monitor.can_perform(&contested, &review()).is_ok());
        assert!(agent.can_perform(&contested, &review()).is_err());
        assert!(monitor
            .can_perform(&record("1011", FeedbackStatus::Pending), &review())
            .is_err());
    }

    #[test]
    fn test_admin_overrides_ownership() {
        let admin = Session::signed_in(user(&["admin"]));
        assert!(admin.can_administer());
        assert!(admin
            .can_perform(&record("1144", FeedbackStatus::Pending), &FeedbackAction::Accept)
            .is_ok());
        assert_eq!(admin.agent_scope(), None);
    }

    #[test]
    fn test_authorize_checks_loaded_record() {
        let agent = Session::signed_in(user(&["agent_1011"]));
        let monitor = Session::signed_in(user(&["monitor"]));
        let loaded = vec![record("1011", FeedbackStatus::InReview)];

        assert!(matches!(
            agent.authorize(&loaded, 1, &review()),
            Err(DashboardError::Forbidden(_))
        ));
        assert!(monitor.authorize(&loaded, 1, &review()).is_ok());
        assert!(matches!(
            monitor.authorize(&loaded, 99, &review()),
            Err(DashboardError::Invalid(_))
        ));
    }

    #[test]
    fn test_blank_agent_is_never_owned() {
        let session = Session::signed_in(user(&["agent_1011"]));
        assert!(!session.owns(&record("", FeedbackStatus::Pending)));
    }
}
