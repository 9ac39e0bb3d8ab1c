//! Document lifecycle state machine.

pub mod machine;

pub use machine::{DocumentLifecycle, TransitionCheck, TransitionDenial, apply};
