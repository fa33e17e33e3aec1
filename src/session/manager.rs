//! Session lifecycle state machine
//!
//! `Loading` until [`SessionManager::restore`] reads durable storage, then
//! `Anonymous` or `Authenticated`. While authenticated two timers run: a
//! recurring check and a one-shot check at the start of the expiry buffer
//! window. Either timer, or an [`InvalidTokenNotifier`] report from code that
//! saw the backend reject the token, forces a logout with a notice and a
//! redirect to the login entry point.
//!
//! Every authenticated period carries a generation number. Timers remember
//! the generation that armed them and do nothing once it is gone, so a
//! timer left over from an earlier login can never end a newer session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use super::expiry::{expiry_buffer, is_token_expired, time_until_expiry};
use super::{Clock, Session, SessionHost, SessionState, User};
use crate::i18n::{Language, Notice};
use crate::storage::{SessionStore, TOKEN_KEY, USER_KEY};

/// Cadence of the recurring expiry check
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest recurring check interval accepted
pub const MIN_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Longest recurring check interval accepted
pub const MAX_CHECK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Tunables for a session manager
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// How often the recurring expiry check runs
    pub check_interval: Duration,
    /// Where the host should send the user after a forced logout
    pub login_url: String,
    /// Language of the session-expired notice
    pub language: Language,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            check_interval: DEFAULT_CHECK_INTERVAL,
            login_url: "/login".to_string(),
            language: Language::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndReason {
    Logout,
    Expired,
    Rejected,
    ChangedElsewhere,
}

impl EndReason {
    /// Forced logouts tell the user and send them to the login page
    fn is_forced(self) -> bool {
        matches!(self, EndReason::Expired | EndReason::Rejected)
    }
}

/// What durable storage holds
enum Persisted {
    Empty,
    Valid(Session),
    Invalid,
}

/// Cancellation handles for one authenticated period; dropping cancels
struct ExpiryTimers {
    periodic: JoinHandle<()>,
    deadline: JoinHandle<()>,
}

impl Drop for ExpiryTimers {
    fn drop(&mut self) {
        self.periodic.abort();
        self.deadline.abort();
    }
}

struct ManagerState {
    current: SessionState,
    generation: u64,
    timers: Option<ExpiryTimers>,
}

struct Inner {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    host: Arc<dyn SessionHost>,
    settings: SessionSettings,
    state: Mutex<ManagerState>,
    updates: watch::Sender<SessionState>,
}

/// Owns the token and user identity of one running client.
///
/// None of the public methods fail: storage errors are logged, malformed or
/// expired tokens simply leave the manager anonymous.
pub struct SessionManager {
    inner: Arc<Inner>,
}

/// Handle for reporting that the backend rejected the current token
#[derive(Clone)]
pub struct InvalidTokenNotifier {
    inner: Weak<Inner>,
}

impl InvalidTokenNotifier {
    /// Force a logout, as if the token had expired locally
    pub fn notify_invalid_token(&self) {
        match self.inner.upgrade() {
            Some(inner) => {
                inner.end_session(EndReason::Rejected, None);
            }
            None => debug!("Invalid token reported after session manager shut down"),
        }
    }
}

impl SessionManager {
    /// Create a manager in the `Loading` state; call [`restore`](Self::restore) next
    pub fn new(
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        host: Arc<dyn SessionHost>,
        settings: SessionSettings,
    ) -> Self {
        let (updates, _) = watch::channel(SessionState::Loading);
        Self {
            inner: Arc::new(Inner {
                store,
                clock,
                host,
                settings,
                state: Mutex::new(ManagerState {
                    current: SessionState::Loading,
                    generation: 0,
                    timers: None,
                }),
                updates,
            }),
        }
    }

    /// Read the persisted session, leaving `Loading`.
    ///
    /// An expired, malformed or incomplete persisted session is cleared from
    /// storage. Only the first call has any effect.
    pub fn restore(&self) {
        self.inner.restore();
    }

    /// Start a session with a freshly issued token.
    ///
    /// Persists both entries and re-arms the expiry timers. An empty token
    /// is ignored.
    pub fn login(&self, token: impl Into<String>, user: User) {
        self.inner.login(token.into(), user);
    }

    /// End the session without a notice. Safe to call at any time.
    pub fn logout(&self) {
        self.inner.end_session(EndReason::Logout, None);
    }

    /// Report a token rejected by the backend
    pub fn notify_invalid_token(&self) {
        self.inner.end_session(EndReason::Rejected, None);
    }

    /// Handle other components keep to report rejected tokens
    pub fn notifier(&self) -> InvalidTokenNotifier {
        InvalidTokenNotifier {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Run the recurring expiry check now. Returns true if it ended the session.
    pub fn check_expiry(&self) -> bool {
        self.inner.expire_if_needed(None)
    }

    /// Reconcile with storage written by another process
    pub fn sync_from_store(&self) {
        self.inner.sync_from_store();
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().current.clone()
    }

    /// Stream of state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.updates.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().current.is_loading()
    }

    /// True while a token and user are held. Expiry is enforced by the
    /// timers, not re-checked here.
    pub fn is_authenticated(&self) -> bool {
        self.inner.lock().current.is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.lock().current.user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.lock().current.token().map(str::to_string)
    }

    /// True remaining lifetime of the current token
    pub fn time_remaining(&self) -> Option<chrono::Duration> {
        let state = self.inner.lock();
        let token = state.current.token()?;
        time_until_expiry(token, self.inner.clock.now())
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn restore(self: &Arc<Self>) {
        let (token, user_json) = self.read_entries();
        let persisted = self.classify(token, user_json);

        let mut state = self.lock();
        if !state.current.is_loading() {
            debug!("Session already restored");
            return;
        }

        match persisted {
            Persisted::Empty => {
                debug!("No persisted session");
                state.current = SessionState::Anonymous;
            }
            Persisted::Invalid => {
                self.clear_store();
                state.current = SessionState::Anonymous;
            }
            Persisted::Valid(session) => {
                info!("Restored session for {}", session.user.user_name);
                self.establish(&mut state, session);
            }
        }
        self.publish(&state);
    }

    fn login(self: &Arc<Self>, token: String, user: User) {
        if token.is_empty() {
            warn!("Ignoring login with an empty token");
            return;
        }

        let user_json = match serde_json::to_string(&user) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize user record: {}", e);
                return;
            }
        };

        let mut state = self.lock();
        self.write_entry(TOKEN_KEY, &token);
        self.write_entry(USER_KEY, &user_json);

        info!("Signed in as {}", user.user_name);
        self.establish(&mut state, Session { token, user });
        self.publish(&state);
    }

    /// Enter `Authenticated`, replacing any previous period and its timers
    fn establish(self: &Arc<Self>, state: &mut ManagerState, session: Session) {
        state.generation += 1;
        state.timers = None;
        state.timers = self.arm_timers(state.generation, &session.token);
        state.current = SessionState::Authenticated(session);
    }

    fn arm_timers(self: &Arc<Self>, generation: u64, token: &str) -> Option<ExpiryTimers> {
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime available; session expiry timers not armed");
                return None;
            }
        };

        // Fire as the token enters its buffer window; negative means now
        let remaining =
            time_until_expiry(token, self.clock.now()).unwrap_or_else(chrono::Duration::zero);
        let delay = (remaining - expiry_buffer())
            .to_std()
            .unwrap_or(Duration::ZERO);
        let period = self
            .settings
            .check_interval
            .clamp(MIN_CHECK_INTERVAL, MAX_CHECK_INTERVAL);
        if period != self.settings.check_interval {
            warn!(
                "Check interval {:?} out of range; using {:?}",
                self.settings.check_interval, period
            );
        }

        debug!(
            "Arming expiry timers for generation {}: check every {:?}, deadline in {:?}",
            generation, period, delay
        );

        let weak = Arc::downgrade(self);
        let periodic = runtime.spawn({
            let weak = weak.clone();
            async move {
                let first = Instant::now()
                    .checked_add(period)
                    .unwrap_or_else(Instant::now);
                let mut ticker = time::interval_at(first, period);
                loop {
                    ticker.tick().await;
                    let Some(inner) = weak.upgrade() else { break };
                    if inner.expire_if_needed(Some(generation)) {
                        break;
                    }
                }
            }
        });

        let deadline = runtime.spawn(async move {
            time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.expire_if_needed(Some(generation));
            }
        });

        Some(ExpiryTimers { periodic, deadline })
    }

    /// End the session if its token is expired. `generation` pins the check
    /// to one authenticated period.
    fn expire_if_needed(&self, generation: Option<u64>) -> bool {
        let observed = {
            let state = self.lock();
            let Some(token) = state.current.token() else {
                return false;
            };
            if generation.is_some_and(|g| g != state.generation) {
                return false;
            }
            if !is_token_expired(token, self.clock.now()) {
                return false;
            }
            state.generation
        };
        self.end_session(EndReason::Expired, Some(observed))
    }

    /// Transition to `Anonymous`. Returns true if a session was ended.
    fn end_session(&self, reason: EndReason, generation: Option<u64>) -> bool {
        {
            let mut state = self.lock();
            if generation.is_some_and(|g| g != state.generation) {
                return false;
            }

            let was_authenticated = state.current.is_authenticated();
            if !was_authenticated && reason != EndReason::Logout {
                return false;
            }

            if was_authenticated {
                state.generation += 1;
            }
            state.timers = None;
            state.current = SessionState::Anonymous;
            self.clear_store();
            self.publish(&state);

            if !was_authenticated {
                return false;
            }
        }

        info!("Session ended ({:?})", reason);
        if reason.is_forced() {
            self.host
                .show_notice(Notice::SessionExpired.message(self.settings.language));
            self.host.redirect_to_login(&self.settings.login_url);
        }
        true
    }

    fn sync_from_store(self: &Arc<Self>) {
        let (token, user_json) = self.read_entries();

        let ended = {
            let mut state = self.lock();
            if state.current.is_loading() {
                return;
            }
            // Our own session: expiry is the timers' business
            if token.is_some() && state.current.token() == token.as_deref() {
                return;
            }

            match self.classify(token, user_json) {
                Persisted::Valid(session) => {
                    info!(
                        "Adopting session for {} written by another process",
                        session.user.user_name
                    );
                    self.establish(&mut state, session);
                    self.publish(&state);
                    return;
                }
                Persisted::Invalid => self.clear_store(),
                Persisted::Empty => {}
            }

            if !state.current.is_authenticated() {
                return;
            }
            state.generation
        };

        self.end_session(EndReason::ChangedElsewhere, Some(ended));
    }

    fn classify(&self, token: Option<String>, user_json: Option<String>) -> Persisted {
        match (token, user_json) {
            (None, None) => Persisted::Empty,
            (Some(token), Some(user_json)) => {
                let user = match serde_json::from_str::<User>(&user_json) {
                    Ok(user) => user,
                    Err(e) => {
                        warn!("Persisted user record is corrupted: {}", e);
                        return Persisted::Invalid;
                    }
                };
                if is_token_expired(&token, self.clock.now()) {
                    info!("Persisted token is expired or unreadable");
                    return Persisted::Invalid;
                }
                Persisted::Valid(Session { token, user })
            }
            _ => {
                warn!("Persisted session is incomplete");
                Persisted::Invalid
            }
        }
    }

    fn read_entries(&self) -> (Option<String>, Option<String>) {
        (self.read_entry(TOKEN_KEY), self.read_entry(USER_KEY))
    }

    fn read_entry(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {} from session storage: {}", key, e);
                None
            }
        }
    }

    fn write_entry(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!("Failed to persist {}: {}", key, e);
        }
    }

    fn clear_store(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to remove {} from session storage: {}", key, e);
            }
        }
    }

    fn publish(&self, state: &ManagerState) {
        self.updates.send_if_modified(|current| {
            if *current == state.current {
                false
            } else {
                *current = state.current.clone();
                true
            }
        });
    }
}
