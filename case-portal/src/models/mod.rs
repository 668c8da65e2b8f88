pub mod role;
pub mod session;

pub use role::{Role, RoleAllowList};
pub use session::{RedirectIdentity, Session, SessionState, UserProfile};
