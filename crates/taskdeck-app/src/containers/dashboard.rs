/*
[INPUT]:  Services and dashboard intents (task form, sign out)
[OUTPUT]: Session phase, task list and form visibility
[POS]:    Container layer - signed-in landing view
[UPDATE]: When dashboard actions or embedded views change
*/

use taskdeck_adapter::CurrentUser;
use tracing::{error, info};

use super::{
    LoadSlot, Notice, Phase, Route, Submission, TaskForm, TaskList, ViewCell, ViewGuard,
    failure_message,
};
use crate::services::Services;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub phase: Phase,
    pub task_form_open: bool,
}

#[derive(Debug)]
pub struct Dashboard {
    services: Services,
    cell: ViewCell<DashboardState>,
    session_slot: LoadSlot,
    task_list: TaskList,
    task_form: TaskForm,
}

impl Dashboard {
    pub fn new(services: Services) -> Self {
        let guard = ViewGuard::new();
        Self {
            task_list: TaskList::with_guard(services.tasks.clone(), guard.clone()),
            task_form: TaskForm::new(services.tasks.clone()),
            cell: ViewCell::with_guard(DashboardState::default(), guard),
            session_slot: LoadSlot::default(),
            services,
        }
    }

    pub fn cell(&self) -> &ViewCell<DashboardState> {
        &self.cell
    }

    pub fn task_list(&self) -> &TaskList {
        &self.task_list
    }

    pub fn task_form(&self) -> &TaskForm {
        &self.task_form
    }

    pub async fn state(&self) -> DashboardState {
        self.cell.snapshot().await
    }

    /// Resolve the session, then load tasks when signed in.
    pub async fn mount(&self) -> Option<CurrentUser> {
        let ticket = self.session_slot.begin();
        self.cell.update(|state| state.phase = Phase::Loading).await;

        let user = self
            .cell
            .guard()
            .run(self.services.auth.get_current_user())
            .await?;
        let applied = self
            .cell
            .apply(&self.session_slot, ticket, |state| {
                state.phase = match &user {
                    Some(user) => Phase::Ready(user.clone()),
                    None => Phase::Unauthenticated,
                };
            })
            .await;
        if !applied {
            return None;
        }
        if user.is_some() {
            self.task_list.load().await;
        }
        user
    }

    /// Send an anonymous visitor to sign-in.
    pub async fn go_to_sign_in(&self) {
        self.cell.navigate(Route::Login).await;
    }

    pub async fn open_task_form(&self) {
        self.cell.update(|state| state.task_form_open = true).await;
    }

    pub async fn cancel_task_form(&self) {
        self.task_form.cancel().await;
        self.cell.update(|state| state.task_form_open = false).await;
    }

    /// Close the form and refresh the list after a stored task.
    pub async fn task_created(&self) {
        self.cell.update(|state| state.task_form_open = false).await;
        self.task_list.load().await;
    }

    /// Submit the embedded form; closes it only on server acknowledgment.
    pub async fn submit_task_form(&self) -> Submission {
        let outcome = self.task_form.submit().await;
        if matches!(outcome, Submission::Submitted(_)) {
            self.task_created().await;
        }
        outcome
    }

    /// Returns whether the provider acknowledged the sign-out.
    pub async fn sign_out(&self) -> bool {
        match self.services.auth.sign_out().await {
            Ok(()) => {
                info!("signed out from dashboard");
                self.cell
                    .update(|state| {
                        state.phase = Phase::Unauthenticated;
                        state.task_form_open = false;
                    })
                    .await;
                self.cell.navigate(Route::Login).await;
                true
            }
            Err(err) => {
                error!(error = %err, "sign out failed");
                self.cell
                    .notify(Notice::error(failure_message(&err, "Sign out failed")))
                    .await;
                false
            }
        }
    }

    pub fn unmount(&self) {
        self.cell.guard().unmount();
    }
}
