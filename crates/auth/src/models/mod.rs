//! Resource models the policies reason about.
//!
//! Each model serializes with its `__typename` discriminant so that values
//! crossing a JSON boundary stay classifiable.

mod invite;
mod organization;
mod project;
mod user;

pub use invite::Invite;
pub use organization::Organization;
pub use project::Project;
pub use user::User;
