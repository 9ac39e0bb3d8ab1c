//! Password hashing and strength policy enforcement.

pub mod hasher;
pub mod validator;

pub use hasher::PasswordHasher;
pub use validator::{PasswordValidator, PasswordViolation, StrengthContext, StrengthReport};
