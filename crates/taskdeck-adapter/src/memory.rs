/*
[INPUT]:  Identity, object and `Todo` operations
[OUTPUT]: Backend behavior without a network (accounts, confirmation codes, private objects)
[POS]:    Test and demo backend - implements all three service seams
[UPDATE]: When a seam gains operations or the access policy changes
*/

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

use crate::auth::IdentityProvider;
use crate::http::{BackendError, Result};
use crate::storage::ObjectStore;
use crate::storage::path::owner_of;
use crate::tasks::{DataApi, TodoRecord, TodoWrite};
use crate::types::{
    ConfirmSignUpParams, CurrentUser, DownloadedFile, IdentityId, Page, SignInDetails,
    SignInOutcome, SignInParams, SignInStep, SignUpOutcome, SignUpParams, SignUpStep, SignedUrl,
    StoredFile, UploadResult,
};

const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    name: String,
    user_id: String,
    identity_id: IdentityId,
    confirmed: bool,
    code: String,
}

impl Account {
    fn user(&self, email: &str) -> CurrentUser {
        CurrentUser {
            user_id: self.user_id.clone(),
            username: email.to_string(),
            identity_id: self.identity_id.clone(),
            sign_in_details: Some(SignInDetails {
                login_id: email.to_string(),
            }),
            name: Some(self.name.clone()),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
    last_modified: DateTime<Utc>,
    e_tag: String,
}

#[derive(Debug, Clone)]
struct OwnedTodo {
    owner: String,
    record: TodoRecord,
}

#[derive(Debug)]
struct BackendState {
    accounts: HashMap<String, Account>,
    signed_in: Option<String>,
    objects: BTreeMap<String, StoredObject>,
    todos: Vec<OwnedTodo>,
    failing_urls: HashSet<String>,
    page_size: usize,
    latency: Option<Duration>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            accounts: HashMap::new(),
            signed_in: None,
            objects: BTreeMap::new(),
            todos: Vec::new(),
            failing_urls: HashSet::new(),
            page_size: DEFAULT_PAGE_SIZE,
            latency: None,
        }
    }
}

impl BackendState {
    fn session(&self) -> Result<(&str, &Account)> {
        let email = self.signed_in.as_deref().ok_or(BackendError::NotSignedIn)?;
        let account = self
            .accounts
            .get(email)
            .ok_or(BackendError::NotSignedIn)?;
        Ok((email, account))
    }

    /// Enforce the `private/{identityId}/` policy for the signed-in identity.
    fn authorize_path(&self, path: &str) -> Result<()> {
        let (_, account) = self.session()?;
        match owner_of(path) {
            Some(owner) if owner == account.identity_id.as_str() => Ok(()),
            _ => Err(BackendError::AccessDenied(path.to_string())),
        }
    }
}

/// In-process backend shared by clones
///
/// Holds a single session at a time, like a browser tab. Confirmation codes
/// are six random digits readable through [`InMemoryBackend::confirmation_code`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<BackendState>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every operation by `latency` (useful with paused tokio time).
    pub fn with_latency(self, latency: Duration) -> Self {
        if let Ok(mut state) = self.state.try_lock() {
            state.latency = Some(latency);
        }
        self
    }

    /// Page size for `Todo` listings.
    pub fn with_page_size(self, page_size: usize) -> Self {
        if let Ok(mut state) = self.state.try_lock() {
            state.page_size = page_size.max(1);
        }
        self
    }

    /// The code "emailed" on sign-up.
    pub async fn confirmation_code(&self, email: &str) -> Option<String> {
        let state = self.state.lock().await;
        state.accounts.get(email).map(|account| account.code.clone())
    }

    pub async fn is_confirmed(&self, email: &str) -> bool {
        let state = self.state.lock().await;
        state
            .accounts
            .get(email)
            .is_some_and(|account| account.confirmed)
    }

    /// Create an already confirmed account.
    pub async fn register_confirmed(&self, email: &str, password: &str, name: &str) -> CurrentUser {
        let mut state = self.state.lock().await;
        let account = new_account(password, name, true);
        let user = account.user(email);
        state.accounts.insert(email.to_string(), account);
        user
    }

    /// Switch the session to `email` without a password check.
    pub async fn sign_in_as(&self, email: &str) -> Result<CurrentUser> {
        let mut state = self.state.lock().await;
        let account = state
            .accounts
            .get(email)
            .ok_or_else(|| BackendError::NotFound(format!("user {email}")))?;
        let user = account.user(email);
        state.signed_in = Some(email.to_string());
        Ok(user)
    }

    /// Make URL resolution fail for `path`.
    pub async fn fail_url_for(&self, path: &str) {
        self.state.lock().await.failing_urls.insert(path.to_string());
    }

    pub async fn object_count(&self) -> usize {
        self.state.lock().await.objects.len()
    }

    async fn delay(&self) {
        let latency = self.state.lock().await.latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn new_account(password: &str, name: &str, confirmed: bool) -> Account {
    let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
    Account {
        password: password.to_string(),
        name: name.to_string(),
        user_id: Uuid::new_v4().to_string(),
        identity_id: IdentityId::new(format!("local:{}", Uuid::new_v4())),
        confirmed,
        code,
    }
}

#[async_trait]
impl IdentityProvider for InMemoryBackend {
    async fn sign_up(&self, params: &SignUpParams) -> Result<SignUpOutcome> {
        self.delay().await;
        let mut state = self.state.lock().await;
        if state.accounts.contains_key(&params.email) {
            return Err(BackendError::Api {
                code: 400,
                message: "User already exists".to_string(),
            });
        }
        let account = new_account(&params.password, &params.name, false);
        let user_id = account.user_id.clone();
        state.accounts.insert(params.email.clone(), account);
        Ok(SignUpOutcome {
            is_sign_up_complete: false,
            user_id: Some(user_id),
            next_step: SignUpStep::ConfirmSignUp,
        })
    }

    async fn confirm_sign_up(&self, params: &ConfirmSignUpParams) -> Result<SignUpOutcome> {
        self.delay().await;
        let mut state = self.state.lock().await;
        let account = state
            .accounts
            .get_mut(&params.email)
            .ok_or_else(|| BackendError::NotFound("Username/client id combination not found.".to_string()))?;
        if !account.confirmed {
            if account.code != params.code {
                return Err(BackendError::Api {
                    code: 400,
                    message: "Invalid verification code provided, please try again.".to_string(),
                });
            }
            account.confirmed = true;
        }
        Ok(SignUpOutcome {
            is_sign_up_complete: true,
            user_id: Some(account.user_id.clone()),
            next_step: SignUpStep::Done,
        })
    }

    async fn sign_in(&self, params: &SignInParams) -> Result<SignInOutcome> {
        self.delay().await;
        let mut state = self.state.lock().await;
        let confirmed = match state.accounts.get(&params.email) {
            Some(account) if account.password == params.password => account.confirmed,
            _ => {
                return Err(BackendError::Authentication {
                    message: "Incorrect username or password.".to_string(),
                });
            }
        };
        if !confirmed {
            return Ok(SignInOutcome {
                is_signed_in: false,
                next_step: SignInStep::ConfirmSignUp,
            });
        }
        state.signed_in = Some(params.email.clone());
        Ok(SignInOutcome {
            is_signed_in: true,
            next_step: SignInStep::Done,
        })
    }

    async fn sign_out(&self) -> Result<()> {
        self.delay().await;
        self.state.lock().await.signed_in = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<CurrentUser> {
        self.delay().await;
        let state = self.state.lock().await;
        let (email, account) = state.session()?;
        Ok(account.user(email))
    }
}

#[async_trait]
impl ObjectStore for InMemoryBackend {
    async fn put_object(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadResult> {
        self.delay().await;
        let mut state = self.state.lock().await;
        state.authorize_path(path)?;
        let size = data.len() as u64;
        let e_tag = Uuid::new_v4().simple().to_string();
        state.objects.insert(
            path.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                last_modified: Utc::now(),
                e_tag: e_tag.clone(),
            },
        );
        Ok(UploadResult {
            path: path.to_string(),
            size: Some(size),
            e_tag: Some(e_tag),
        })
    }

    async fn get_object(&self, path: &str) -> Result<DownloadedFile> {
        self.delay().await;
        let state = self.state.lock().await;
        state.authorize_path(path)?;
        let object = state
            .objects
            .get(path)
            .ok_or_else(|| BackendError::NotFound(path.to_string()))?;
        Ok(DownloadedFile {
            path: path.to_string(),
            bytes: object.data.clone(),
            content_type: Some(object.content_type.clone()),
        })
    }

    async fn remove_object(&self, path: &str) -> Result<()> {
        self.delay().await;
        let mut state = self.state.lock().await;
        state.authorize_path(path)?;
        state.objects.remove(path);
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<StoredFile>> {
        self.delay().await;
        let state = self.state.lock().await;
        state.authorize_path(prefix)?;
        Ok(state
            .objects
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(path, object)| StoredFile {
                path: path.clone(),
                size: Some(object.data.len() as u64),
                last_modified: Some(object.last_modified),
                e_tag: Some(object.e_tag.clone()),
            })
            .collect())
    }

    async fn signed_url(&self, path: &str, expires_in: Duration) -> Result<SignedUrl> {
        self.delay().await;
        let state = self.state.lock().await;
        state.authorize_path(path)?;
        if !state.objects.contains_key(path) {
            return Err(BackendError::NotFound(path.to_string()));
        }
        if state.failing_urls.contains(path) {
            return Err(BackendError::Api {
                code: 500,
                message: format!("could not sign {path}"),
            });
        }
        let expires_at = Utc::now()
            + chrono::Duration::from_std(expires_in).unwrap_or_else(|_| chrono::Duration::zero());
        let mut url = Url::parse("memory://objects/")?;
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidResponse("memory base URL".to_string()))?
            .pop_if_empty()
            .extend(path.split('/'));
        url.query_pairs_mut()
            .append_pair("expires", &expires_at.timestamp().to_string())
            .append_pair("signature", &Uuid::new_v4().simple().to_string());
        Ok(SignedUrl {
            url: url.into(),
            expires_at: Some(expires_at),
        })
    }
}

#[async_trait]
impl DataApi for InMemoryBackend {
    async fn create_todo(&self, body: &TodoWrite) -> Result<TodoRecord> {
        self.delay().await;
        let mut state = self.state.lock().await;
        let owner = state.session()?.1.user_id.clone();
        let now = Utc::now();
        let mut record = TodoRecord {
            id: Uuid::new_v4().to_string(),
            title: None,
            content: None,
            description: None,
            is_done: None,
            status: None,
            created_at: now,
            updated_at: now,
        };
        body.apply_to(&mut record);
        state.todos.push(OwnedTodo {
            owner,
            record: record.clone(),
        });
        Ok(record)
    }

    async fn list_todos_page(&self, next_token: Option<&str>) -> Result<Page<TodoRecord>> {
        self.delay().await;
        let state = self.state.lock().await;
        let owner = state.session()?.1.user_id.clone();
        let start = match next_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| BackendError::Validation(format!("invalid nextToken: {token}")))?,
            None => 0,
        };
        let owned: Vec<_> = state
            .todos
            .iter()
            .filter(|todo| todo.owner == owner)
            .map(|todo| todo.record.clone())
            .collect();
        let end = (start + state.page_size).min(owned.len());
        let items = owned.get(start..end).map(<[_]>::to_vec).unwrap_or_default();
        let next_token = (end < owned.len()).then(|| end.to_string());
        Ok(Page { items, next_token })
    }

    async fn update_todo(&self, id: &str, body: &TodoWrite) -> Result<TodoRecord> {
        self.delay().await;
        let mut state = self.state.lock().await;
        let owner = state.session()?.1.user_id.clone();
        let todo = state
            .todos
            .iter_mut()
            .find(|todo| todo.owner == owner && todo.record.id == id)
            .ok_or_else(|| BackendError::NotFound(format!("Todo {id}")))?;
        body.apply_to(&mut todo.record);
        todo.record.updated_at = Utc::now();
        Ok(todo.record.clone())
    }

    async fn delete_todo(&self, id: &str) -> Result<()> {
        self.delay().await;
        let mut state = self.state.lock().await;
        let owner = state.session()?.1.user_id.clone();
        let before = state.todos.len();
        state
            .todos
            .retain(|todo| !(todo.owner == owner && todo.record.id == id));
        if state.todos.len() == before {
            return Err(BackendError::NotFound(format!("Todo {id}")));
        }
        Ok(())
    }
}
