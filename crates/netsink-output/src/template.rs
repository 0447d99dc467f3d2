//! Naming templates.
//!
//! A template is literal text with `{{ .Field }}` actions, where the field is
//! one of `Id`, `Ip` or `Port`. Trim markers (`{{- ` and ` -}}`) strip the
//! whitespace of the adjacent literal text.
//!
//! ```text
//! out-{{.Id}}-{{.Ip}}-{{.Port}}.log   ->   out-3-10.0.0.7-51234.log
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::TemplateError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Values a template is executed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBinding {
    /// Session sequence number, starting at 1.
    pub id: u64,
    /// Peer IP address.
    pub ip: IpAddr,
    /// Peer port.
    pub port: u16,
}

impl TemplateBinding {
    pub fn new(id: u64, peer: SocketAddr) -> Self {
        Self {
            id,
            ip: peer.ip().to_canonical(),
            port: peer.port(),
        }
    }

    /// The binding used to validate a template before any traffic arrives.
    pub fn placeholder() -> Self {
        Self {
            id: 1,
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
        }
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "Id" => Some(self.id.to_string()),
            "Ip" => Some(self.ip.to_string()),
            "Port" => Some(self.port.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
}

/// A parsed naming template.
#[derive(Debug, Clone)]
pub struct NamingTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl NamingTemplate {
    /// Parse `source` without executing it.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut trim_next_text = false;

        loop {
            let base = source.len() - rest.len();
            let Some(open) = rest.find(OPEN) else {
                push_text(&mut segments, rest, trim_next_text, false);
                break;
            };

            let after_open = &rest[open + OPEN.len()..];
            let trim_left = starts_with_trim_marker(after_open);
            push_text(&mut segments, &rest[..open], trim_next_text, trim_left);

            let Some(close) = after_open.find(CLOSE) else {
                return Err(TemplateError::Unclosed {
                    offset: base + open,
                });
            };

            let mut action = &after_open[..close];
            if trim_left {
                action = &action[1..];
            }
            trim_next_text = ends_with_trim_marker(action);
            if trim_next_text {
                action = &action[..action.len() - 1];
            }

            segments.push(parse_action(action.trim(), base + open)?);
            rest = &after_open[close + CLOSE.len()..];
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Parse `source` and execute it once against [`TemplateBinding::placeholder`],
    /// so a bad pattern fails before the listener starts.
    pub fn check(source: &str) -> Result<Self, TemplateError> {
        let template = Self::parse(source)?;
        template.execute(&TemplateBinding::placeholder())?;
        Ok(template)
    }

    /// Render the template for one session.
    pub fn execute(&self, binding: &TemplateBinding) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(name) => {
                    let value = binding
                        .field(name)
                        .ok_or_else(|| TemplateError::UnknownField {
                            field: name.clone(),
                        })?;
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }

    /// Whether the template has no actions, so every session renders the same name.
    pub fn is_literal(&self) -> bool {
        !self
            .segments
            .iter()
            .any(|segment| matches!(segment, Segment::Field(_)))
    }

    /// The unparsed pattern.
    pub fn source(&self) -> &str {
        &self.source
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str, trim_start: bool, trim_end: bool) {
    let mut text = text;
    if trim_start {
        text = text.trim_start();
    }
    if trim_end {
        text = text.trim_end();
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
}

// A trim marker is a '-' separated from the action body by ASCII whitespace.
fn starts_with_trim_marker(action: &str) -> bool {
    let bytes = action.as_bytes();
    bytes.len() >= 2 && bytes[0] == b'-' && bytes[1].is_ascii_whitespace()
}

fn ends_with_trim_marker(action: &str) -> bool {
    let bytes = action.as_bytes();
    let len = bytes.len();
    len >= 2 && bytes[len - 1] == b'-' && bytes[len - 2].is_ascii_whitespace()
}

fn parse_action(action: &str, offset: usize) -> Result<Segment, TemplateError> {
    if action.is_empty() {
        return Err(TemplateError::EmptyAction { offset });
    }
    match action.strip_prefix('.') {
        Some(name)
            if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_') =>
        {
            Ok(Segment::Field(name.to_string()))
        }
        _ => Err(TemplateError::UnsupportedAction {
            offset,
            action: action.to_string(),
        }),
    }
}
