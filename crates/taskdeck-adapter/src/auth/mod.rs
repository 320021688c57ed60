/*
[INPUT]:  Identity provider seam and session state
[OUTPUT]: Sign-up/sign-in flows and the current session
[POS]:    Auth layer - wraps the hosted identity provider
[UPDATE]: When auth flow or session handling changes
*/

pub mod provider;
pub mod service;
pub mod session;

pub use provider::IdentityProvider;
pub use service::AuthService;
pub use session::{SessionData, SessionManager};
