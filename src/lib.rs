// hubseek library root.
// GitHub user search with bounded caching and superseding request control.

pub mod cache;
pub mod error;
pub mod github;
pub mod request;
pub mod session;

pub use error::{HubseekError, Result};
pub use github::GitHubClient;
pub use session::{Lookup, SearchSession, SessionConfig, UserSource};
