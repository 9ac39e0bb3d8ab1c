//! Session orchestration: the `AuthService` composing every other core
//! component, plus the coarse login rate limiter.

pub mod rate_limit;
pub mod service;

pub use rate_limit::LoginRateLimiter;
pub use service::{AuthService, AuthSession, AuthenticatedUser, RegisterUserInput};
