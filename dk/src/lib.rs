//! dorkkit - dork template resolution and query composition
//!
//! Builds advanced search-engine queries ("dorks") from curated templates
//! grouped by category, or composes one from individual operator values.
//!
//! # Core Concepts
//!
//! - **Categories**: a fixed catalog; each names the template source it loads from
//! - **Templates**: `label`, `query`, `description`; queries may contain `{input}`
//! - **Subject**: the website, name or company substituted for `{input}`
//! - **Episode**: the live (category, subject, load state) unit; newer loads win
//!
//! # Modules
//!
//! - [`catalog`] - Category registry
//! - [`source`] - Template fetch trait and embedded/directory/HTTP sources
//! - [`templates`] - Payload loading and validation
//! - [`substitute`] - Placeholder substitution
//! - [`compose`] - Custom dork composer
//! - [`filter`] - Keyword filter over resolved queries
//! - [`dispatch`] - Search URL formatting
//! - [`session`] - Selection episode controller
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dorkkit::{Catalog, EmbeddedSource, SessionController};
//!
//! let session = SessionController::new(Catalog::builtin(), Arc::new(EmbeddedSource::new()));
//! session.set_subject("example.com").await;
//! session.select("websites").await?;
//! for query in session.visible().await {
//!     println!("{}", dorkkit::search_url(&query.query)?);
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod compose;
pub mod config;
pub mod dispatch;
pub mod filter;
pub mod render;
pub mod repl;
pub mod session;
pub mod source;
pub mod substitute;
pub mod templates;

// Re-export commonly used types
pub use catalog::{Catalog, Category};
pub use compose::{CustomDorkSpec, Operator, compose};
pub use config::Config;
pub use dispatch::{DispatchError, SearchTarget, search_url};
pub use filter::filter;
pub use session::{Episode, LoadPhase, Outcome, SessionController, SessionError};
pub use source::{DirectorySource, EmbeddedSource, FetchError, HttpSource, TemplateSource, create_source};
pub use substitute::{PLACEHOLDER, ResolvedQuery, substitute};
pub use templates::{DorkTemplate, LoadError, TemplateLoader};
