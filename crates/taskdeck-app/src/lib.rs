/*
[INPUT]:  Public API exports for taskdeck-app crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod containers;
pub mod prefs;
pub mod services;

// Re-export main types for convenience
pub use config::AppConfig;
pub use containers::{
    Dashboard, Notice, NoticeLevel, Phase, Profile, Route, SignInForm, SignUpForm, TaskForm,
    TaskList, ViewGuard,
};
pub use prefs::{JsonFilePreferences, MemoryPreferences, PreferenceStore};
pub use services::Services;
