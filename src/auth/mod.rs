//! Authentication and session management

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod session;
pub mod validation;

pub use jwt::{Claims, TokenIssuer};
pub use middleware::gatekeeper;
pub use models::{User, UserProfile, UserSummary};
pub use password::PasswordHasher;
pub use session::{SessionStatus, Transport};
