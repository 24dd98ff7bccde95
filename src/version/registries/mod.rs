//! Registry implementations for looking up action versions

pub mod github;

pub use github::GitHubRegistry;
