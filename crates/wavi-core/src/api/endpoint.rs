//! Route table for the WAVI backend.

use reqwest::Method;

use super::dto::{LogQuery, ReportQuery};
use crate::habit::HabitId;

/// One backend route.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    Main,
    TodayHabits,
    AllHabits,
    Habit(HabitId),
    CreateHabit,
    UpdateHabit(HabitId),
    DeleteHabit(HabitId),
    LogSuccess(HabitId),
    LogFailure(HabitId),
    Logs(LogQuery),
    Reports(ReportQuery),
    Chat,
    Login,
    InitiateSignup,
    CompleteSignup,
    CheckEmail,
    ResetPassword,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Main
            | Endpoint::TodayHabits
            | Endpoint::AllHabits
            | Endpoint::Habit(_)
            | Endpoint::Logs(_)
            | Endpoint::Reports(_) => Method::GET,
            Endpoint::UpdateHabit(_) => Method::PATCH,
            Endpoint::DeleteHabit(_) => Method::DELETE,
            Endpoint::CreateHabit
            | Endpoint::LogSuccess(_)
            | Endpoint::LogFailure(_)
            | Endpoint::Chat
            | Endpoint::Login
            | Endpoint::InitiateSignup
            | Endpoint::CompleteSignup
            | Endpoint::CheckEmail
            | Endpoint::ResetPassword => Method::POST,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::Main => "/api/v1/main".into(),
            Endpoint::TodayHabits => "/api/v1/habit/today".into(),
            Endpoint::AllHabits | Endpoint::CreateHabit => "/api/v1/habit".into(),
            Endpoint::Habit(id) | Endpoint::UpdateHabit(id) | Endpoint::DeleteHabit(id) => {
                format!("/api/v1/habit/{id}")
            }
            Endpoint::LogSuccess(id) => format!("/api/v1/log/success/{id}"),
            Endpoint::LogFailure(id) => format!("/api/v1/log/failure/{id}"),
            Endpoint::Logs(_) => "/api/v1/log".into(),
            Endpoint::Reports(_) => "/api/v1/report".into(),
            Endpoint::Chat => "/api/v1/habit/chat".into(),
            Endpoint::Login => "/api/v1/user/login".into(),
            Endpoint::InitiateSignup => "/api/v1/user/signup/initiate".into(),
            Endpoint::CompleteSignup => "/api/v1/user/signup/complete".into(),
            Endpoint::CheckEmail => "/api/v1/user/check-email".into(),
            Endpoint::ResetPassword => "/api/v1/auth/reset-password".into(),
        }
    }

    /// Whether the call carries the stored bearer token.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Endpoint::Login
                | Endpoint::InitiateSignup
                | Endpoint::CompleteSignup
                | Endpoint::CheckEmail
                | Endpoint::ResetPassword
        )
    }

    /// Query parameters in wire order; absent filters are omitted.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::Logs(q) => {
                let mut items = Vec::new();
                if let Some(id) = q.habit_id {
                    items.push(("habitId", id.to_string()));
                }
                if let Some(d) = q.start_date {
                    items.push(("startDate", d.to_string()));
                }
                if let Some(d) = q.end_date {
                    items.push(("endDate", d.to_string()));
                }
                if let Some(c) = q.completed {
                    items.push(("completed", c.to_string()));
                }
                items
            }
            Endpoint::Reports(q) => {
                let mut items = Vec::new();
                if let Some(kind) = q.kind {
                    items.push(("type", kind.as_str().to_string()));
                }
                if let Some(d) = q.start_date {
                    items.push(("startDate", d.to_string()));
                }
                if let Some(d) = q.end_date {
                    items.push(("endDate", d.to_string()));
                }
                items
            }
            _ => Vec::new(),
        }
    }

    /// Path plus encoded query string, ready to join onto the base URL.
    pub fn path_and_query(&self) -> String {
        let query = self.query();
        if query.is_empty() {
            return self.path();
        }
        let encoded: Vec<String> = query
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect();
        format!("{}?{}", self.path(), encoded.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportKind;
    use chrono::NaiveDate;

    #[test]
    fn habit_routes_share_path_with_different_methods() {
        assert_eq!(Endpoint::Habit(9).path(), "/api/v1/habit/9");
        assert_eq!(Endpoint::UpdateHabit(9).path(), "/api/v1/habit/9");
        assert_eq!(Endpoint::UpdateHabit(9).method(), Method::PATCH);
        assert_eq!(Endpoint::DeleteHabit(9).method(), Method::DELETE);
        assert_eq!(Endpoint::AllHabits.method(), Method::GET);
        assert_eq!(Endpoint::CreateHabit.method(), Method::POST);
    }

    #[test]
    fn auth_routes_skip_bearer_token() {
        assert!(!Endpoint::Login.requires_auth());
        assert!(!Endpoint::CheckEmail.requires_auth());
        assert!(Endpoint::Main.requires_auth());
        assert!(Endpoint::LogSuccess(1).requires_auth());
    }

    #[test]
    fn log_query_omits_absent_filters() {
        let q = LogQuery {
            habit_id: Some(3),
            start_date: NaiveDate::from_ymd_opt(2025, 10, 13),
            end_date: None,
            completed: Some(false),
        };
        assert_eq!(
            Endpoint::Logs(q).path_and_query(),
            "/api/v1/log?habitId=3&startDate=2025-10-13&completed=false"
        );
        assert_eq!(Endpoint::Logs(LogQuery::default()).path_and_query(), "/api/v1/log");
    }

    #[test]
    fn report_query_uses_wire_type_names() {
        let q = ReportQuery {
            kind: Some(ReportKind::Weekly),
            start_date: NaiveDate::from_ymd_opt(2025, 10, 13),
            end_date: NaiveDate::from_ymd_opt(2025, 10, 19),
        };
        assert_eq!(
            Endpoint::Reports(q).path_and_query(),
            "/api/v1/report?type=WEEKLY&startDate=2025-10-13&endDate=2025-10-19"
        );
    }
}
