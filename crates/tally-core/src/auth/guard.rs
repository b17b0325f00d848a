//! View admission based on session state

use super::session::Session;
use std::fmt;

/// Views of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Signup,
    Dashboard,
    History,
    Upload,
    Insights,
    Anomalies,
    Export,
    Profile,
    Settings,
}

impl View {
    /// Whether the view requires a session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login | Self::Signup)
    }

    /// Route name of the view
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Dashboard => "dashboard",
            Self::History => "history",
            Self::Upload => "upload",
            Self::Insights => "insights",
            Self::Anomalies => "anomalies",
            Self::Export => "export",
            Self::Profile => "profile",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a navigation check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Render the requested view
    Render(View),
    /// Send the user to another view instead
    Redirect(View),
}

/// Admits protected views only while a credential is present.
///
/// Token validity is not checked here: an expired token surfaces as a failed
/// request, and the next navigation after logout redirects.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    session: Session,
}

impl SessionGuard {
    /// Create a guard over `session`
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Decide whether `view` may render
    pub fn admit(&self, view: View) -> Admission {
        if view.is_protected() && !self.session.is_authenticated() {
            tracing::debug!(view = %view, "redirecting unauthenticated view to login");
            Admission::Redirect(View::Login)
        } else {
            Admission::Render(view)
        }
    }
}
