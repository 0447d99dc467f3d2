use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

use crate::error::{ResolveError, Result, TemplateError};
use crate::handle::OutputHandle;
use crate::template::{NamingTemplate, TemplateBinding};

enum Naming {
    Stdout,
    Literal(String),
    Template(NamingTemplate),
}

/// Maps a session's identity to an open output destination.
///
/// Each distinct resolved name is opened once and the handle is cached until
/// the resolver is dropped. Lookup and open happen under one lock, so two
/// sessions resolving the same new name never both create it.
pub struct DestinationResolver {
    naming: Naming,
    append: bool,
    stdout: OutputHandle,
    handles: Mutex<HashMap<String, OutputHandle>>,
}

impl DestinationResolver {
    /// Build a resolver for an optional naming pattern.
    ///
    /// The pattern is executed once against placeholder values so a bad
    /// pattern is reported here. No pattern, or an empty one, writes every
    /// session to standard output.
    pub fn new(pattern: Option<&str>, append: bool) -> std::result::Result<Self, TemplateError> {
        let naming = match pattern {
            None | Some("") => Naming::Stdout,
            Some(pattern) => {
                let template = NamingTemplate::check(pattern)?;
                if template.is_literal() {
                    Naming::Literal(pattern.to_string())
                } else {
                    Naming::Template(template)
                }
            }
        };
        Ok(Self {
            naming,
            append,
            stdout: OutputHandle::stdout(),
            handles: Mutex::new(HashMap::new()),
        })
    }

    /// Resolve the destination for one session.
    pub fn resolve(&self, binding: &TemplateBinding) -> Result<OutputHandle> {
        let name = match &self.naming {
            Naming::Stdout => return Ok(self.stdout.clone()),
            Naming::Literal(name) => return self.open_cached(name),
            Naming::Template(template) => template.execute(binding)?,
        };
        if name.is_empty() {
            return Ok(self.stdout.clone());
        }
        self.open_cached(&name)
    }

    fn open_cached(&self, name: &str) -> Result<OutputHandle> {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = handles.get(name) {
            debug!(name, "reusing output");
            return Ok(handle.clone());
        }

        let handle =
            OutputHandle::open(name, self.append).map_err(|source| ResolveError::Open {
                path: name.into(),
                source,
            })?;
        info!(name, append = self.append, "opened output");
        handles.insert(name.to_string(), handle.clone());
        Ok(handle)
    }

    /// Number of distinct file destinations opened so far.
    pub fn open_count(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether every session goes to standard output.
    pub fn is_stdout_only(&self) -> bool {
        matches!(self.naming, Naming::Stdout)
    }

    /// Whether every session resolves to one fixed name.
    pub fn is_literal(&self) -> bool {
        matches!(self.naming, Naming::Literal(_))
    }
}

impl std::fmt::Debug for DestinationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let naming = match &self.naming {
            Naming::Stdout => "<stdout>",
            Naming::Literal(name) => name.as_str(),
            Naming::Template(template) => template.source(),
        };
        f.debug_struct("DestinationResolver")
            .field("naming", &naming)
            .field("append", &self.append)
            .field("open", &self.open_count())
            .finish()
    }
}
