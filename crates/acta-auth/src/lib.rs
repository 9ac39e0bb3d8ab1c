//! # acta-auth
//!
//! The authorization and session core of the Acta portal.
//!
//! ## Modules
//!
//! - `jwt` — token pair issuance, verification, revocation, bearer extraction
//! - `password` — Argon2id password hashing and strength policy
//! - `permission` — role×workspace permission matrix and resolver
//! - `lifecycle` — document status state machine
//! - `session` — the orchestrator (`AuthService`) every other layer calls

pub mod jwt;
pub mod lifecycle;
pub mod password;
pub mod permission;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenBlocklist, TokenPair, extract_bearer};
pub use lifecycle::{DocumentLifecycle, TransitionCheck, TransitionDenial};
pub use password::{PasswordHasher, PasswordValidator, StrengthContext, StrengthReport};
pub use permission::{PermissionMatrix, PermissionResolver, ResolvedPermissions};
pub use session::{AuthService, AuthSession, AuthenticatedUser, RegisterUserInput};
