//! Permission policy forwarded to the agent session.

mod modes;

pub use modes::PermissionMode;
