/*
[INPUT]:  Services, preference store and user intents
[OUTPUT]: Renderable view state, notices and navigation requests
[POS]:    Container layer - view-state machines consumed by front ends
[UPDATE]: When a container or the shared view plumbing changes
*/

pub mod dashboard;
pub mod profile;
pub mod sign_in;
pub mod sign_up;
pub mod task_form;
pub mod task_list;

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use taskdeck_adapter::{BackendError, CurrentUser};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub use dashboard::{Dashboard, DashboardState};
pub use profile::{Profile, ProfileState};
pub use sign_in::{SignInForm, SignInState};
pub use sign_up::{SignUpForm, SignUpStage, SignUpState};
pub use task_form::{Submission, TaskForm, TaskFormState};
pub use task_list::{TaskList, TaskListState};

/// Primary phase of a session-gated view.
///
/// Transitions:
/// - Loading -> Ready (session present)
/// - Loading -> Unauthenticated (no session)
/// - Ready -> Unauthenticated (sign out)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Loading,
    Unauthenticated,
    Ready(CurrentUser),
}

impl Phase {
    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            Phase::Ready(user) => Some(user),
            _ => None,
        }
    }
}

/// Navigation targets a container may request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    SignUp,
    Dashboard,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Transient user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Message for a failed action, `fallback` when the error carries none.
pub(crate) fn failure_message(err: &BackendError, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Mount lifetime of a container
#[derive(Debug, Clone, Default)]
pub struct ViewGuard {
    token: CancellationToken,
}

impl ViewGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn unmount(&self) {
        self.token.cancel();
    }

    /// Drive `fut` unless the view unmounts first.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            _ = self.token.cancelled() => None,
            output = fut => Some(output),
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// Generation counter for one kind of load
#[derive(Debug, Default)]
pub struct LoadSlot {
    generation: AtomicU64,
}

/// Proof of which load generation produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl LoadSlot {
    /// Start a load; supersedes every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }
}

#[derive(Debug, Default)]
struct Outbox {
    notices: Vec<Notice>,
    navigation: Option<Route>,
}

/// View state plus its outbox, shared by every container
#[derive(Debug)]
pub struct ViewCell<S> {
    state: Mutex<S>,
    outbox: Mutex<Outbox>,
    guard: ViewGuard,
}

impl<S: Clone + Default> Default for ViewCell<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Clone> ViewCell<S> {
    pub fn new(state: S) -> Self {
        Self::with_guard(state, ViewGuard::new())
    }

    /// Share a parent's mount lifetime (embedded containers).
    pub fn with_guard(state: S, guard: ViewGuard) -> Self {
        Self {
            state: Mutex::new(state),
            outbox: Mutex::new(Outbox::default()),
            guard,
        }
    }

    pub fn guard(&self) -> &ViewGuard {
        &self.guard
    }

    pub async fn snapshot(&self) -> S {
        self.state.lock().await.clone()
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut state = self.state.lock().await;
        f(&mut state)
    }

    /// Apply a load result only while mounted and still the latest load.
    pub async fn apply(&self, slot: &LoadSlot, ticket: Ticket, f: impl FnOnce(&mut S)) -> bool {
        let mut state = self.state.lock().await;
        if !self.guard.is_mounted() || !slot.is_current(ticket) {
            return false;
        }
        f(&mut state);
        true
    }

    pub async fn notify(&self, notice: Notice) {
        if self.guard.is_mounted() {
            self.outbox.lock().await.notices.push(notice);
        }
    }

    pub async fn navigate(&self, route: Route) {
        if self.guard.is_mounted() {
            self.outbox.lock().await.navigation = Some(route);
        }
    }

    pub async fn drain_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.outbox.lock().await.notices)
    }

    pub async fn take_navigation(&self) -> Option<Route> {
        self.outbox.lock().await.navigation.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes() {
        let slot = LoadSlot::default();
        let first = slot.begin();
        let second = slot.begin();
        assert!(!slot.is_current(first));
        assert!(slot.is_current(second));
    }

    #[tokio::test]
    async fn test_apply_after_unmount_is_dropped() {
        let cell: ViewCell<u32> = ViewCell::new(0);
        let slot = LoadSlot::default();
        let ticket = slot.begin();

        cell.guard().unmount();
        assert!(!cell.apply(&slot, ticket, |n| *n = 7).await);
        assert_eq!(cell.snapshot().await, 0);
    }

    #[tokio::test]
    async fn test_run_stops_on_unmount() {
        let guard = ViewGuard::new();
        guard.unmount();
        let out = guard.run(std::future::pending::<()>()).await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn test_outbox_drains() {
        let cell: ViewCell<()> = ViewCell::new(());
        cell.notify(Notice::success("saved")).await;
        cell.navigate(Route::Dashboard).await;

        assert_eq!(cell.drain_notices().await, vec![Notice::success("saved")]);
        assert!(cell.drain_notices().await.is_empty());
        assert_eq!(cell.take_navigation().await, Some(Route::Dashboard));
        assert_eq!(cell.take_navigation().await, None);
    }
}
