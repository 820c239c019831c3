//! Metric name resolution.
//!
//! Incoming updates carry a raw name that is either a registered metric name
//! (recorded against the aggregate [`TOTAL_INSTANCE`] bucket) or an
//! entity-qualified name such as `system/user/worker-7/ReceivedMessages`,
//! where everything before the registered name, minus one separator
//! character, names the instance bucket.
//!
//! The qualifier is plain text, not a parsed path: whatever precedes the
//! match is kept verbatim, separators included.

use super::definition::MetricDefinition;
use super::registry::DefinitionMap;

/// Instance bucket that aggregates every update for a definition.
pub const TOTAL_INSTANCE: &str = "_Total";

/// A raw name resolved to a definition and instance bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Matched definition.
    pub definition: &'a MetricDefinition,
    /// Instance bucket the update applies to.
    pub instance: &'a str,
}

impl Resolution<'_> {
    /// Check if the update targets the aggregate bucket.
    pub fn is_total(&self) -> bool {
        self.instance == TOTAL_INSTANCE
    }
}

/// Resolve `raw_name` against a kind's definitions.
///
/// Returns `None` when the name is empty, matches nothing, or leaves an
/// empty qualifier once the separator is stripped (e.g. `/DeadLetters`).
/// When several registered names are suffixes of `raw_name`, the longest
/// one wins.
pub fn resolve<'a>(raw_name: &'a str, definitions: &'a DefinitionMap) -> Option<Resolution<'a>> {
    if raw_name.is_empty() {
        return None;
    }

    if let Some(definition) = definitions.get(raw_name) {
        return Some(Resolution {
            definition,
            instance: TOTAL_INSTANCE,
        });
    }

    let Some((name, definition)) = definitions
        .iter()
        .filter(|(name, _)| !name.is_empty() && raw_name.ends_with(name.as_str()))
        .max_by_key(|(name, _)| name.len())
    else {
        tracing::trace!(raw_name, "no metric definition matches");
        return None;
    };

    let split = raw_name.rfind(name.as_str())?;
    let instance = strip_separator(&raw_name[..split]);
    if instance.is_empty() {
        tracing::debug!(raw_name, metric = %name, "empty instance qualifier, dropping update");
        return None;
    }

    Some(Resolution {
        definition,
        instance,
    })
}

/// Drop the final character of the qualifier prefix.
fn strip_separator(prefix: &str) -> &str {
    let mut chars = prefix.chars();
    chars.next_back();
    chars.as_str()
}
