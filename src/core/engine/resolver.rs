use crate::core::engine::source::SourceFile;
use crate::core::engine::symbols::SymbolTable;
use crate::types::{AppResult, EngineError, Mutatee, TargetSpec};

/// Resolves parsed target specifications against the loaded sources.
///
/// Resolution is pure: it never mutates code, and resolving the same spec
/// twice against the same sources yields structurally equal mutatees.
pub struct TargetResolver<'a> {
    files: &'a [SourceFile],
    symbols: SymbolTable,
}

impl<'a> TargetResolver<'a> {
    pub fn new(files: &'a [SourceFile]) -> Self {
        Self {
            files,
            symbols: SymbolTable::build(files),
        }
    }

    pub fn files(&self) -> &'a [SourceFile] {
        self.files
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Enumerate the mutatees a spec denotes.
    ///
    /// A method spec yields exactly one mutatee. A bare class spec yields one
    /// per declared method, singleton methods first, declaration order
    /// preserved; a class declaring no methods yields an empty sequence,
    /// which is not an error.
    pub fn resolve(&self, spec: &TargetSpec) -> AppResult<Vec<Mutatee>> {
        let class_name = spec.class_name();
        let Some(class) = self.symbols.class(class_name) else {
            return Err(EngineError::UnknownClass(class_name.to_string()));
        };

        match (spec.scope_type(), spec.method_name()) {
            (Some(scope), Some(method_name)) => {
                let entry = self
                    .symbols
                    .method(class_name, scope, method_name)
                    .ok_or_else(|| EngineError::UnknownMethod(spec.to_string()))?;
                Ok(vec![self.symbols.mutatee(class_name, entry)])
            }
            _ => {
                let mut mutatees = Vec::new();
                for entry in class.singleton.iter().chain(class.instance.iter()) {
                    mutatees.push(self.symbols.mutatee(class_name, entry));
                }
                Ok(mutatees)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const THING: &str = r#"
pub struct Thing;

impl Thing {
    pub fn kind() -> bool {
        true
    }

    pub fn alive(&self) -> bool {
        true
    }
}

pub struct Empty;
"#;

    fn load(source: &str) -> Vec<SourceFile> {
        vec![SourceFile::from_source(PathBuf::from("thing.rs"), source.to_string()).unwrap()]
    }

    #[test]
    fn method_spec_resolves_to_one_mutatee() {
        let files = load(THING);
        let resolver = TargetResolver::new(&files);
        let mutatees = resolver
            .resolve(&TargetSpec::parse("Thing#alive").unwrap())
            .unwrap();
        assert_eq!(mutatees.len(), 1);
        assert_eq!(mutatees[0].qualified_name(), "Thing#alive");
    }

    #[test]
    fn class_spec_resolves_singletons_first() {
        let files = load(THING);
        let resolver = TargetResolver::new(&files);
        let mutatees = resolver
            .resolve(&TargetSpec::parse("Thing").unwrap())
            .unwrap();
        let names: Vec<String> = mutatees.iter().map(|m| m.qualified_name()).collect();
        assert_eq!(names, vec!["Thing.kind", "Thing#alive"]);
    }

    #[test]
    fn methodless_class_resolves_to_no_mutatees() {
        let files = load(THING);
        let resolver = TargetResolver::new(&files);
        let mutatees = resolver
            .resolve(&TargetSpec::parse("Empty").unwrap())
            .unwrap();
        assert!(mutatees.is_empty());
    }

    #[test]
    fn unknown_class_is_an_error() {
        let files = load(THING);
        let resolver = TargetResolver::new(&files);
        let err = resolver
            .resolve(&TargetSpec::parse("Missing").unwrap())
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownClass(_)));
    }

    #[test]
    fn unknown_method_is_an_error() {
        let files = load(THING);
        let resolver = TargetResolver::new(&files);
        let err = resolver
            .resolve(&TargetSpec::parse("Thing#missing").unwrap())
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownMethod(_)));
    }

    #[test]
    fn wrong_scope_does_not_match() {
        let files = load(THING);
        let resolver = TargetResolver::new(&files);
        // `kind` is a singleton method; addressing it with `#` must fail
        assert!(
            resolver
                .resolve(&TargetSpec::parse("Thing#kind").unwrap())
                .is_err()
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let files = load(THING);
        let resolver = TargetResolver::new(&files);
        let spec = TargetSpec::parse("Thing").unwrap();
        let first = resolver.resolve(&spec).unwrap();
        let second = resolver.resolve(&spec).unwrap();
        assert_eq!(first, second);
    }
}
