//! Location event descriptors and script templating.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of every injected event id.
pub const EVENT_ROOT: &str = "46370";

/// Field of the event data table holding the JSON descriptor list.
pub const EVENTS_FIELD: &str = "Events";

const EVENTS_DIR: &str = "Data/Events/";

/// Errors raised while reading event data or formatting scripts.
#[derive(Debug, Error)]
pub enum EventError {
    /// The event data table has no descriptor list.
    #[error("event data has no 'Events' entry")]
    MissingEvents,
    /// The descriptor list isn't valid JSON.
    #[error("failed to parse event descriptors: {0}")]
    Parse(#[from] serde_json::Error),
    /// The script template is malformed.
    #[error("malformed script template at byte {position}")]
    Template {
        /// Byte offset of the offending brace.
        position: usize,
    },
    /// The script references an argument that wasn't supplied.
    #[error("script placeholder {{{index}}} has no argument")]
    MissingArgument {
        /// Placeholder index.
        index: usize,
    },
}

/// One scripted event offered to a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptor {
    /// Location the event plays in.
    #[serde(rename = "Where")]
    pub location: String,
    /// Raw precondition string.
    #[serde(rename = "Conditions")]
    pub conditions: String,
    /// Script template; `{0}` is the speaker, `{1}` the dialogue line.
    #[serde(rename = "Script")]
    pub script: String,
    /// Speaker key.
    #[serde(rename = "Who")]
    pub who: String,
}

/// Descriptors loaded from the event data table, in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCatalog {
    descriptors: Vec<EventDescriptor>,
}

impl EventCatalog {
    /// Construct from explicit descriptors.
    pub fn new(descriptors: Vec<EventDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Read the descriptor list stored under `Events` in the event data table.
    pub fn from_event_data(table: &BTreeMap<String, String>) -> Result<Self, EventError> {
        let raw = table.get(EVENTS_FIELD).ok_or(EventError::MissingEvents)?;
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    /// First descriptor for `location`, with its list index.
    pub fn find(&self, location: &str) -> Option<(usize, &EventDescriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .find(|(_, event)| event.location == location)
    }

    /// Whether any descriptor targets `location`.
    pub fn has_location(&self, location: &str) -> bool {
        self.find(location).is_some()
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Event id for the descriptor at `index`.
pub fn event_key(index: usize, conditions: &str) -> String {
    format!("{EVENT_ROOT}{index}/{conditions}")
}

/// Location named by an events-by-location asset, e.g. `Data/Events/Farm`.
pub fn events_location(asset_name: &str) -> Option<String> {
    let normalized = asset_name.replace('\\', "/");
    let file = normalized.strip_prefix(EVENTS_DIR)?;
    if file.is_empty() || file.contains('/') {
        return None;
    }
    let stem = match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    };
    Some(stem.to_string())
}

/// Substitute `{n}` placeholders with `args[n]`; `{{` and `}}` are literal braces.
pub fn format_script(template: &str, args: &[&str]) -> Result<String, EventError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    while let Some((position, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some((_, d)) if d.is_ascii_digit() => digits.push(d),
                        Some((_, '}')) if !digits.is_empty() => break,
                        _ => return Err(EventError::Template { position }),
                    }
                }
                let index: usize = digits
                    .parse()
                    .map_err(|_| EventError::Template { position })?;
                let arg = args.get(index).ok_or(EventError::MissingArgument { index })?;
                out.push_str(arg);
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(EventError::Template { position }),
            other => out.push(other),
        }
    }
    Ok(out)
}
