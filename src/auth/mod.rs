//! Authentication, authorization and session lifecycle

pub mod middleware;
pub mod models;
pub mod policy;
pub mod session;
pub mod token;

pub use middleware::{authenticate, bearer_token, require_admin, resolve_auth_user};
pub use models::{AuthUser, LoginRequest, LoginResponse, RefreshResponse, RegisterRequest, Role};
pub use session::{HttpTokenRefresher, RefreshOutcome, Session, SessionManager, TokenRefresher};
pub use token::{Claims, TokenIdentity, TokenIssuer};
