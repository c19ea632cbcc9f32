use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::types::{AppResult, EngineError};

/// Where a method lives on its class: `.` addresses associated functions
/// (no `self` parameter), `#` addresses methods taking `self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodScope {
    Singleton,
    Instance,
}

impl MethodScope {
    pub fn separator(&self) -> char {
        match self {
            MethodScope::Singleton => '.',
            MethodScope::Instance => '#',
        }
    }

    pub fn from_separator(sep: char) -> Option<Self> {
        match sep {
            '.' => Some(MethodScope::Singleton),
            '#' => Some(MethodScope::Instance),
            _ => None,
        }
    }
}

/// A parsed target specification: `Class`, `Class.method` or `Class#method`.
///
/// The separator uniquely determines the method scope, and a spec carries a
/// method name iff it carries a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSpec {
    class_name: String,
    method: Option<(MethodScope, String)>,
}

impl TargetSpec {
    pub fn parse(spec: &str) -> AppResult<Self> {
        let dots = spec.matches('.').count();
        let hashes = spec.matches('#').count();
        if dots + hashes > 1 {
            return Err(EngineError::malformed(
                spec,
                "more than one scope separator",
            ));
        }

        let (class_name, method) = match spec.find(['.', '#']) {
            Some(idx) => {
                let sep = spec[idx..].chars().next().unwrap();
                let scope = MethodScope::from_separator(sep).unwrap();
                let name = &spec[idx + 1..];
                if name.is_empty() {
                    return Err(EngineError::malformed(spec, "empty method name"));
                }
                (&spec[..idx], Some((scope, name.to_string())))
            }
            None => (spec, None),
        };

        if class_name.is_empty() {
            return Err(EngineError::malformed(spec, "empty class name"));
        }

        Ok(Self {
            class_name: class_name.to_string(),
            method,
        })
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The scope the spec addresses, or `None` for a bare class spec.
    pub fn scope_type(&self) -> Option<MethodScope> {
        self.method.as_ref().map(|(scope, _)| *scope)
    }

    /// The separator character present in the spec, if any.
    pub fn method_scope(&self) -> Option<char> {
        self.scope_type().map(|scope| scope.separator())
    }

    pub fn method_name(&self) -> Option<&str> {
        self.method.as_ref().map(|(_, name)| name.as_str())
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            Some((scope, name)) => {
                write!(f, "{}{}{}", self.class_name, scope.separator(), name)
            }
            None => write!(f, "{}", self.class_name),
        }
    }
}

impl FromStr for TargetSpec {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Byte range of a node within its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn contains(&self, other: &Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// A single mutable unit: one declared method, resolved against the loaded
/// sources. Read-only after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mutatee {
    pub class_name: String,
    pub scope: MethodScope,
    pub method_name: String,
    /// Index of the declaring file within the loaded source set.
    pub file: usize,
    /// Byte range of the method body block.
    pub body: Span,
    /// 0-based line of the declaration.
    pub line_offset: u32,
}

impl Mutatee {
    /// Fully-qualified spec form, e.g. `Thing#alive`.
    pub fn qualified_name(&self) -> String {
        format!(
            "{}{}{}",
            self.class_name,
            self.scope.separator(),
            self.method_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_class() {
        let spec = TargetSpec::parse("Thing").unwrap();
        assert_eq!(spec.class_name(), "Thing");
        assert_eq!(spec.scope_type(), None);
        assert_eq!(spec.method_scope(), None);
        assert_eq!(spec.method_name(), None);
    }

    #[test]
    fn parse_singleton_method() {
        let spec = TargetSpec::parse("Thing.alive").unwrap();
        assert_eq!(spec.class_name(), "Thing");
        assert_eq!(spec.scope_type(), Some(MethodScope::Singleton));
        assert_eq!(spec.method_scope(), Some('.'));
        assert_eq!(spec.method_name(), Some("alive"));
    }

    #[test]
    fn parse_instance_method() {
        let spec = TargetSpec::parse("Thing#alive").unwrap();
        assert_eq!(spec.scope_type(), Some(MethodScope::Instance));
        assert_eq!(spec.method_scope(), Some('#'));
        assert_eq!(spec.method_name(), Some("alive"));
    }

    #[test]
    fn parse_rejects_two_separators() {
        assert!(TargetSpec::parse("Thing.a#b").is_err());
        assert!(TargetSpec::parse("Thing.a.b").is_err());
        assert!(TargetSpec::parse("Thing#a#b").is_err());
    }

    #[test]
    fn parse_rejects_empty_class_name() {
        assert!(TargetSpec::parse("").is_err());
        assert!(TargetSpec::parse(".alive").is_err());
        assert!(TargetSpec::parse("#alive").is_err());
    }

    #[test]
    fn parse_rejects_empty_method_name() {
        assert!(TargetSpec::parse("Thing.").is_err());
        assert!(TargetSpec::parse("Thing#").is_err());
    }

    #[test]
    fn display_round_trips() {
        for raw in ["Thing", "Thing.alive", "Thing#alive"] {
            let spec = TargetSpec::parse(raw).unwrap();
            assert_eq!(spec.to_string(), raw);
        }
    }
}
