//! Same-document reference resolution
//!
//! Resolves `$ref` strings of the form `#/a/b/0` against the root document.
//! Anything that is not a same-document pointer (external URIs, bare `#`,
//! relative file paths) is reported as unresolvable and skipped by callers.
//! A same-document pointer naming a path that does not exist is fatal.

use serde_json::Value;

use crate::error::{DistributionError, Result};

/// Prefix marking a same-document pointer
pub const LOCAL_PREFIX: &str = "#/";

/// Location of the document root
pub const ROOT_LOCATION: &str = "#";

/// A resolved pointer target
#[derive(Debug, Clone)]
pub struct Target<'a> {
    /// The node the pointer designates
    pub value: &'a Value,
    /// Canonical pointer of that node (re-escaped, indexes normalized)
    pub location: String,
}

/// Resolve `pointer` against `document`.
///
/// Returns `Ok(None)` for pointers that do not use the same-document syntax.
pub fn resolve<'a>(pointer: &str, document: &'a Value) -> Result<Option<Target<'a>>> {
    let Some(path) = pointer.strip_prefix(LOCAL_PREFIX) else {
        return Ok(None);
    };

    let mut target = document;
    let mut location = ROOT_LOCATION.to_string();

    for part in path.split('/') {
        let segment = unescape_segment(part);
        let broken = || DistributionError::BrokenPointer {
            pointer: pointer.to_string(),
            segment: segment.clone(),
        };

        match target {
            Value::Object(map) => {
                target = map.get(&segment).ok_or_else(broken)?;
                location = child_location(&location, &segment);
            }
            Value::Array(items) => {
                let index = array_index(&segment).ok_or_else(broken)?;
                target = items.get(index).ok_or_else(broken)?;
                location = child_location(&location, &segment);
            }
            _ => return Err(broken()),
        }
    }

    Ok(Some(Target { value: target, location }))
}

/// Parse an array index segment: `0`, or ASCII digits without a leading zero
fn array_index(segment: &str) -> Option<usize> {
    let digits_only = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
    if !digits_only || (segment.len() > 1 && segment.starts_with('0')) {
        return None;
    }
    segment.parse().ok()
}

/// Decode the two reserved escapes, `~1` before `~0`
pub fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Encode a key so it can appear as a pointer segment
pub fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Location of the child `segment` under `parent`
pub fn child_location(parent: &str, segment: &str) -> String {
    format!("{}/{}", parent, escape_segment(segment))
}
