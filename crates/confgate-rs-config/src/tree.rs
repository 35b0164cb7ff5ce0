//! Config tree model, key paths, and depth-first traversal.
//!
//! A config tree is a plain `serde_json::Value` (built with `preserve_order`,
//! so mappings keep the order their source file declared them in). Objects
//! are branches, arrays are sequences, everything else is a leaf.

use serde_json::Value;
use std::fmt;

/// Nested key/value configuration data.
pub type ConfigTree = Value;

/// A single step in a `KeyPath`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping key.
    Key(String),
    /// Sequence index.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(idx) => write!(f, "{idx}"),
        }
    }
}

/// Location of a node inside a config tree, rendered dot-joined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    /// The empty path, addressing the root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted path into key segments (`"a.b"` -> `[a, b]`).
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self {
            segments: dotted
                .split('.')
                .map(|key| Segment::Key(key.to_string()))
                .collect(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path extended by one segment.
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Resolve `path` inside `tree`. A JSON `null` counts as present.
pub fn lookup<'a>(tree: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    path.segments
        .iter()
        .try_fold(tree, |node, segment| match (node, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get(key),
            (Value::Array(items), Segment::Index(idx)) => items.get(*idx),
            _ => None,
        })
}

/// True when a node has no children to descend into.
pub fn is_leaf(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => true,
    }
}

/// A node visited by `walk`.
#[derive(Debug, Clone)]
pub struct Node<'a> {
    pub path: KeyPath,
    pub value: &'a Value,
    pub is_leaf: bool,
}

/// Lazy depth-first, pre-order traversal of every node below the root.
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(KeyPath, &'a Value)>,
}

/// Walk all descendants of `tree` in stored order. The root is not yielded.
pub fn walk(tree: &Value) -> Walk<'_> {
    let mut walk = Walk { stack: Vec::new() };
    walk.push_children(&KeyPath::root(), tree);
    walk
}

/// Walk only the leaves of `tree`.
pub fn walk_leaves(tree: &Value) -> impl Iterator<Item = Node<'_>> {
    walk(tree).filter(|node| node.is_leaf)
}

impl<'a> Walk<'a> {
    fn push_children(&mut self, path: &KeyPath, value: &'a Value) {
        // Pushed in reverse so the first child is popped first.
        match value {
            Value::Object(map) => {
                for (key, child) in map.iter().rev() {
                    self.stack.push((path.child(Segment::Key(key.clone())), child));
                }
            }
            Value::Array(items) => {
                for (idx, child) in items.iter().enumerate().rev() {
                    self.stack.push((path.child(Segment::Index(idx)), child));
                }
            }
            _ => {}
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (path, value) = self.stack.pop()?;
        self.push_children(&path, value);
        Some(Node {
            path,
            value,
            is_leaf: is_leaf(value),
        })
    }
}

/// Runtime type name of a value, used in error messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a value for error messages; strings are shown without quotes.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
