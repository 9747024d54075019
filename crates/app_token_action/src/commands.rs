//! Command implementations for the two entry points of the action: the main
//! step that issues a token, and the post step that revokes it.

pub mod issue_cmd;
pub mod revoke_cmd;
