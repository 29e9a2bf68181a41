/// What the surrounding shell should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Nothing observed yet; decide from the stored session.
    Unknown,
    Authenticated,
    /// User logged out on purpose.
    LoggedOut,
    /// Session recovery failed; navigate to `login_path`.
    LoginRequired { login_path: String },
}

impl AuthState {
    pub fn needs_login(&self) -> bool {
        matches!(self, AuthState::LoggedOut | AuthState::LoginRequired { .. })
    }
}
