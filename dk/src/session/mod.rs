//! Selection session
//!
//! The [`SessionController`] owns the live selection episode: which category
//! is active, the subject, the load state and the resolved queries. Every
//! other component is a pure function the controller calls.
//!
//! ```text
//! Idle --select--> Loading --ok--> Resolved
//!                     |              |  ^
//!                     +--err--> Error   | subject change (local)
//!                               |  ^    +--
//!                               +--+ retry / subject change
//! ```

mod controller;
mod episode;

pub use controller::SessionController;
pub use episode::{Episode, LoadPhase, Outcome, ResolvedSet, SessionError};
