use std::fmt::{self, Display};

use serde_json::Value;

/// One step of a structural path: an object member or an array element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

/// The structural address of a value within its document.
///
/// Paths are the stable identity used by the UI state store and the
/// projections: two values at the same path across different parses are the
/// same logical node, regardless of content. The empty path addresses the
/// document root.
///
/// Rendered form: keys joined with `.`, indices in brackets, e.g.
/// `departments[0].categories`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    steps: Vec<PathStep>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Child path addressing an object member.
    pub fn key(&self, key: &str) -> NodePath {
        let mut steps = self.steps.clone();
        steps.push(PathStep::Key(key.to_string()));
        NodePath { steps }
    }

    /// Child path addressing an array element.
    pub fn index(&self, index: usize) -> NodePath {
        let mut steps = self.steps.clone();
        steps.push(PathStep::Index(index));
        NodePath { steps }
    }

    /// The last key step, if the path ends in one.
    pub fn last_key(&self) -> Option<&str> {
        match self.steps.last() {
            Some(PathStep::Key(k)) => Some(k),
            _ => None,
        }
    }

    /// Walks the path down from `root`, returning the addressed value if
    /// every step still resolves.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for step in &self.steps {
            current = match step {
                PathStep::Key(k) => current.as_object()?.get(k)?,
                PathStep::Index(i) => current.as_array()?.get(*i)?,
            };
        }
        Some(current)
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Key(k) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(k)?;
                }
                PathStep::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}
