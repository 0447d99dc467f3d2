//! Output destinations for netsink sessions.
//!
//! A [`DestinationResolver`] turns a session's identity (sequence id, peer IP,
//! peer port) into an [`OutputHandle`] by rendering a [`NamingTemplate`].
//! Handles are cached by resolved name and never reopened, and without a
//! template every session writes to standard output.

pub mod error;
pub mod handle;
pub mod resolver;
pub mod template;

pub use error::{ResolveError, Result, TemplateError};
pub use handle::OutputHandle;
pub use resolver::DestinationResolver;
pub use template::{NamingTemplate, TemplateBinding};
