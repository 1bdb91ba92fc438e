//! Key-pattern compilation.
//!
//! A map pattern such as `shared/quota/${user}/$kind` mixes literal text with
//! `$name` and `${name}` placeholders. Compiling it produces a skeleton in
//! which every placeholder is reduced to a single [`MARKER`], plus the
//! variable names in the order their markers appear. The lookup layer walks
//! both in lockstep, so `variables[i]` always belongs to the i-th marker.

use serde::Serialize;

/// The placeholder introducer, and the marker left in the skeleton.
pub const MARKER: char = '$';

/// A pattern with its placeholders normalized to [`MARKER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledPattern {
    skeleton: String,
    variables: Vec<String>,
}

impl CompiledPattern {
    /// The pattern with each placeholder replaced by one [`MARKER`].
    pub fn skeleton(&self) -> &str {
        &self.skeleton
    }

    /// Variable names, one per marker, left to right. Duplicates are kept.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Number of markers in the skeleton. Always equals `variables().len()`.
    pub fn marker_count(&self) -> usize {
        self.skeleton.matches(MARKER).count()
    }

    /// True when a placeholder produced no name, e.g. `$/` or an unterminated `${`.
    pub fn has_empty_variable(&self) -> bool {
        self.variables.iter().any(String::is_empty)
    }
}

/// Compile a key pattern.
///
/// Never fails. A `${` without a closing brace swallows the rest of the
/// pattern and yields an empty variable name; a `$` followed by anything
/// other than `{` or a name character also yields an empty name.
pub fn compile(pattern: &str) -> CompiledPattern {
    let mut skeleton = String::with_capacity(pattern.len());
    let mut variables = Vec::new();
    let mut rest = pattern;

    while let Some(pos) = rest.find(MARKER) {
        skeleton.push_str(&rest[..pos]);
        skeleton.push(MARKER);

        let (name, remainder) = read_name(&rest[pos + MARKER.len_utf8()..]);
        variables.push(name.to_string());
        rest = remainder;
    }
    skeleton.push_str(rest);

    CompiledPattern {
        skeleton,
        variables,
    }
}

/// Split the text after a `$` into the variable name and what follows it.
fn read_name(after: &str) -> (&str, &str) {
    if let Some(braced) = after.strip_prefix('{') {
        return match braced.find('}') {
            Some(end) => (&braced[..end], &braced[end + 1..]),
            None => ("", ""),
        };
    }

    let end = after
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(after.len());
    after.split_at(end)
}
