//! Display model for the session status

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tabled::Tabled;

use crate::session::{SessionState, expiration_instant};

/// Session state flattened for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct SessionDisplay {
    pub state: String,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub expires_at: Option<String>,
    pub remaining: Option<String>,
}

/// One table row per session
#[derive(Debug, Clone, Tabled)]
pub struct SessionRow {
    #[tabled(rename = "STATE")]
    pub state: String,
    #[tabled(rename = "USER")]
    pub user_name: String,
    #[tabled(rename = "EMAIL")]
    pub email: String,
    #[tabled(rename = "ROLE")]
    pub role: String,
    #[tabled(rename = "EXPIRES")]
    pub expires_at: String,
    #[tabled(rename = "REMAINING")]
    pub remaining: String,
}

fn or_placeholder(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "--".to_string())
}

impl From<&SessionDisplay> for SessionRow {
    fn from(display: &SessionDisplay) -> Self {
        Self {
            state: display.state.clone(),
            user_name: or_placeholder(&display.user_name),
            email: or_placeholder(&display.email),
            role: or_placeholder(&display.role),
            expires_at: or_placeholder(&display.expires_at),
            remaining: or_placeholder(&display.remaining),
        }
    }
}

impl SessionDisplay {
    /// Build the display row for a state at a given instant
    pub fn from_state(state: &SessionState, now: DateTime<Utc>) -> Self {
        let label = match state {
            SessionState::Loading => "loading",
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticated(_) => "authenticated",
        };

        let session = state.session();
        let expires = session.and_then(|s| expiration_instant(&s.token));

        Self {
            state: label.to_string(),
            user_name: session.map(|s| s.user.user_name.clone()),
            email: session.map(|s| s.user.email.clone()),
            role: session.map(|s| s.user.role_name.clone()),
            expires_at: expires.map(|e| e.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
            remaining: expires.map(|e| format_remaining(e - now)),
        }
    }
}

/// Format a remaining lifetime as `1h 5m`, `4m 30s` or `expired`
pub fn format_remaining(remaining: Duration) -> String {
    if remaining <= Duration::zero() {
        return "expired".to_string();
    }

    let hours = remaining.num_hours();
    let mins = remaining.num_minutes() % 60;
    let secs = remaining.num_seconds() % 60;

    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m {}s", mins, secs)
    }
}
