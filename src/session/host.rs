//! Host application capabilities the session manager drives on forced logout

/// Surface the manager uses to talk to the user.
///
/// Called from timer tasks as well as the caller's thread, hence `Send + Sync`.
pub trait SessionHost: Send + Sync {
    /// Display a short, already localized notice
    fn show_notice(&self, message: &str);

    /// Send the user to the re-authentication entry point
    fn redirect_to_login(&self, login_url: &str);
}

/// Host that records every call, for assertions in tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingHost {
    notices: std::sync::Mutex<Vec<String>>,
    redirects: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingHost {
    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl SessionHost for RecordingHost {
    fn show_notice(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }

    fn redirect_to_login(&self, login_url: &str) {
        self.redirects.lock().unwrap().push(login_url.to_string());
    }
}
