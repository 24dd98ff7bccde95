//! Freshness checking for GitHub Actions references
//!
//! This module resolves the latest version of each referenced action, caches
//! the answers, and classifies every reference as outdated, exempted, failed
//! or current.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Checker   │────▶│  Resolver   │────▶│  Registry   │
//! │ (fan-out)   │     │ (fallback)  │     │  (GitHub)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │   Policy    │     │  TtlCache   │
//! │(version cmp)│     │  (storage)  │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: In-memory cache with per-entry expiration
//! - [`checker`]: Concurrent fan-out/fan-in over dependency references
//! - [`exemptions`]: Exemption list loader and matcher
//! - [`policy`]: Outdated-version decision table
//! - [`registry`]: Registry trait for remote lookups
//! - [`registries`]: Concrete registry implementations
//! - [`resolver`]: Cache-backed latest version resolution with tag fallback
//! - [`error`]: Error types for registry, exemption and check operations
//! - [`types`]: Dependency references and check results

pub mod cache;
pub mod checker;
pub mod error;
pub mod exemptions;
pub mod policy;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod types;
