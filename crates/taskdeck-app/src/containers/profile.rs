/*
[INPUT]:  Services, preference store and profile intents
[OUTPUT]: Session phase, the user's files with URLs, avatar pointer
[POS]:    Container layer - profile and file management view
[UPDATE]: When file actions or avatar handling change
*/

use std::sync::Arc;

use percent_encoding::percent_decode_str;
use taskdeck_adapter::{CurrentUser, FileEntry, FileUpload};
use tracing::{error, info, warn};
use url::Url;

use super::{LoadSlot, Notice, Phase, Route, ViewCell, failure_message};
use crate::prefs::{self, PreferenceStore};
use crate::services::Services;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub phase: Phase,
    pub files: Vec<FileEntry>,
    pub files_loading: bool,
    pub avatar: Option<String>,
    pub upload_open: bool,
}

pub struct Profile {
    services: Services,
    prefs: Arc<dyn PreferenceStore>,
    cell: ViewCell<ProfileState>,
    session_slot: LoadSlot,
    files_slot: LoadSlot,
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("cell", &self.cell)
            .finish_non_exhaustive()
    }
}

/// Whether `entry` is the file `avatar` points at.
///
/// Signed URLs are re-issued on every listing, so a stale avatar URL still
/// matches when its decoded path ends with the object path.
pub fn avatar_matches(avatar: &str, entry: &FileEntry) -> bool {
    entry.url.as_deref() == Some(avatar) || avatar_points_at(avatar, &entry.path)
}

/// Whether the decoded path of the `avatar` URL ends with `path`.
pub fn avatar_points_at(avatar: &str, path: &str) -> bool {
    let Ok(url) = Url::parse(avatar) else {
        return false;
    };
    percent_decode_str(url.path())
        .decode_utf8()
        .is_ok_and(|decoded| decoded.ends_with(path))
}

impl Profile {
    pub fn new(services: Services, prefs: Arc<dyn PreferenceStore>) -> Self {
        Self {
            services,
            prefs,
            cell: ViewCell::default(),
            session_slot: LoadSlot::default(),
            files_slot: LoadSlot::default(),
        }
    }

    pub fn cell(&self) -> &ViewCell<ProfileState> {
        &self.cell
    }

    pub async fn state(&self) -> ProfileState {
        self.cell.snapshot().await
    }

    pub async fn mount(&self) -> Option<CurrentUser> {
        let ticket = self.session_slot.begin();
        let avatar = prefs::avatar(self.prefs.as_ref()).unwrap_or_else(|err| {
            warn!(error = %err, "failed to read avatar preference");
            None
        });
        self.cell
            .update(|state| {
                state.phase = Phase::Loading;
                state.avatar = avatar;
            })
            .await;

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
            self.load_files().await;
        }
        user
    }

    async fn current_user(&self) -> Option<CurrentUser> {
        self.cell.update(|state| state.phase.user().cloned()).await
    }

    /// List the user's uploads and resolve a URL for each.
    pub async fn load_files(&self) {
        let Some(user) = self.current_user().await else {
            return;
        };
        let ticket = self.files_slot.begin();
        self.cell.update(|state| state.files_loading = true).await;

        let storage = &self.services.storage;
        let load = async {
            let files = storage.list_files(&user.identity_id).await?;
            Ok::<_, taskdeck_adapter::BackendError>(storage.resolve_urls(files).await)
        };
        let Some(result) = self.cell.guard().run(load).await else {
            return;
        };

        let mut failure = None;
        let mut unresolved = 0;
        let applied = self
            .cell
            .apply(&self.files_slot, ticket, |state| {
                state.files_loading = false;
                match result {
                    Ok(files) => {
                        unresolved = files.iter().filter(|f| f.url.is_none()).count();
                        state.files = files;
                    }
                    Err(err) => {
                        error!(error = %err, "failed to list files");
                        failure = Some(failure_message(&err, "Could not load files"));
                    }
                }
            })
            .await;
        if !applied {
            return;
        }
        if let Some(message) = failure {
            self.cell.notify(Notice::error(message)).await;
        } else if unresolved > 0 {
            self.cell
                .notify(Notice::warning(format!("{unresolved} file URL(s) unavailable")))
                .await;
        }
    }

    pub async fn open_upload(&self) {
        self.cell.update(|state| state.upload_open = true).await;
    }

    pub async fn close_upload(&self) {
        self.cell.update(|state| state.upload_open = false).await;
    }

    /// Record `url` as the avatar after a successful upload.
    pub async fn file_uploaded(&self, url: &str) {
        self.set_avatar(url).await;
        self.cell.update(|state| state.upload_open = false).await;
        self.load_files().await;
    }

    /// Upload `file`, then adopt it as the avatar.
    pub async fn upload(&self, file: FileUpload) -> Option<String> {
        let user = self.current_user().await?;
        let storage = &self.services.storage;
        let uploaded = match storage.upload_file(&user.identity_id, file).await {
            Ok(uploaded) => uploaded,
            Err(err) => {
                error!(error = %err, "upload failed");
                self.cell
                    .notify(Notice::error(failure_message(&err, "Upload failed")))
                    .await;
                return None;
            }
        };
        match storage.get_file_url(&uploaded.path).await {
            Ok(url) => {
                self.cell.notify(Notice::success("File uploaded")).await;
                self.file_uploaded(&url).await;
                Some(url)
            }
            Err(err) => {
                warn!(path = %uploaded.path, error = %err, "uploaded file has no URL");
                self.cell
                    .notify(Notice::warning("File uploaded but its URL is unavailable"))
                    .await;
                self.load_files().await;
                None
            }
        }
    }

    pub async fn set_avatar(&self, url: &str) {
        if let Err(err) = prefs::set_avatar(self.prefs.as_ref(), Some(url)) {
            warn!(error = %err, "failed to persist avatar");
        }
        let url = url.to_string();
        self.cell.update(|state| state.avatar = Some(url)).await;
    }

    /// Delete a stored file; clears the avatar when it pointed there.
    /// Returns whether the file was deleted.
    pub async fn delete_file(&self, path: &str) -> bool {
        if let Err(err) = self.services.storage.delete_file(path).await {
            error!(path, error = %err, "failed to delete file");
            self.cell
                .notify(Notice::error(failure_message(&err, "Could not delete file")))
                .await;
            return false;
        }

        let cleared = self
            .cell
            .update(|state| {
                let removed = state
                    .files
                    .iter()
                    .position(|entry| entry.path == path)
                    .map(|idx| state.files.remove(idx));
                let clears = match (&state.avatar, &removed) {
                    (Some(avatar), Some(entry)) => avatar_matches(avatar, entry),
                    (Some(avatar), None) => avatar_points_at(avatar, path),
                    (None, _) => false,
                };
                if clears {
                    state.avatar = None;
                }
                clears
            })
            .await;
        if cleared {
            info!(path, "avatar file deleted; clearing avatar");
            if let Err(err) = prefs::set_avatar(self.prefs.as_ref(), None) {
                warn!(error = %err, "failed to clear avatar preference");
            }
        }
        self.cell.notify(Notice::success("File deleted")).await;
        true
    }

    /// Returns whether the provider acknowledged the sign-out.
    pub async fn sign_out(&self) -> bool {
        match self.services.auth.sign_out().await {
            Ok(()) => {
                self.cell
                    .update(|state| {
                        state.phase = Phase::Unauthenticated;
                        state.files.clear();
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
