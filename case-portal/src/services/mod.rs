pub mod auth_client;
pub mod guard;
pub mod session_manager;
pub mod session_store;

pub use auth_client::{AuthApi, HttpAuthApi};
pub use guard::{GuardDecision, NavigationGuard};
pub use session_manager::AuthSessionManager;
pub use session_store::{
    CookieStore, DurableStore, MemoryCookieStore, MemoryDurableStore, SessionStore,
};
