use std::sync::Mutex;

use tree_sitter::Node;

use crate::core::engine::operators::{MutationContext, MutationOperator, visit_body};
use crate::types::{Mutant, Mutatee};

/// Source of fresh literal values for `RandomLiteralSubstitution`.
///
/// An explicit injected dependency rather than global RNG state, so engine
/// runs can be seeded and replayed.
pub trait ValueSource: Send {
    fn random_string(&mut self) -> String;

    /// A short identifier-safe token, substituted for char literals.
    fn random_symbol(&mut self) -> char;

    /// An inclusive-exclusive `(low, high)` pair with `low <= high`.
    fn random_range(&mut self) -> (i64, i64);
}

/// Default `ValueSource` over a seeded RNG.
pub struct SeededValues {
    rng: fastrand::Rng,
}

impl SeededValues {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl ValueSource for SeededValues {
    fn random_string(&mut self) -> String {
        (0..8).map(|_| self.rng.lowercase()).collect()
    }

    fn random_symbol(&mut self) -> char {
        self.rng.lowercase()
    }

    fn random_range(&mut self) -> (i64, i64) {
        let low = self.rng.i64(0..100);
        let high = low + self.rng.i64(0..100);
        (low, high)
    }
}

/// Replaces string, char and integer-range literals with freshly generated
/// values of the same kind.
///
/// Probes whether tests assert exact values or merely truthiness/type: a
/// suite that only checks `result.is_empty() == false` will not notice the
/// string changing underneath it.
pub struct RandomLiteralSubstitution<S: ValueSource> {
    values: Mutex<S>,
}

impl<S: ValueSource> RandomLiteralSubstitution<S> {
    pub fn new(values: S) -> Self {
        Self {
            values: Mutex::new(values),
        }
    }
}

impl<S: ValueSource> MutationOperator for RandomLiteralSubstitution<S> {
    fn name(&self) -> &'static str {
        "random-literal"
    }

    fn generate(&self, ctx: &MutationContext, mutatee: &Mutatee) -> Vec<Mutant> {
        let mut mutants = Vec::new();
        let mut values = self.values.lock().expect("value source lock poisoned");
        visit_body(ctx, mutatee, &mut |node, source| {
            let old_text = &source[node.byte_range()];
            let new_text = match node.kind() {
                "string_literal" => Some(format!("\"{}\"", values.random_string())),
                "char_literal" => Some(format!("'{}'", values.random_symbol())),
                "range_expression" if is_integer_range(&node) => {
                    let (low, high) = values.random_range();
                    let op = if old_text.contains("..=") { "..=" } else { ".." };
                    Some(format!("{low}{op}{high}"))
                }
                _ => None,
            };
            if let Some(new_text) = new_text
                && new_text != old_text
            {
                mutants.push(ctx.mutant(mutatee, "random-literal", &node, new_text));
            }
        });
        mutants
    }
}

/// Ranges qualify only when both endpoints are plain integer literals;
/// `0..len` must not be rewritten.
fn is_integer_range(node: &Node) -> bool {
    let mut cursor = node.walk();
    let endpoints: Vec<Node> = node
        .children(&mut cursor)
        .filter(|child| child.is_named())
        .collect();
    endpoints.len() == 2
        && endpoints
            .iter()
            .all(|endpoint| endpoint.kind() == "integer_literal")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::core::engine::resolver::TargetResolver;
    use crate::core::engine::source::SourceFile;
    use crate::types::TargetSpec;

    /// Deterministic stand-in for the injected generator.
    struct FixedValues;

    impl ValueSource for FixedValues {
        fn random_string(&mut self) -> String {
            "zzzz".to_string()
        }

        fn random_symbol(&mut self) -> char {
            'q'
        }

        fn random_range(&mut self) -> (i64, i64) {
            (7, 11)
        }
    }

    fn mutants_for(source: &str, spec: &str) -> Vec<Mutant> {
        let files =
            vec![SourceFile::from_source(PathBuf::from("thing.rs"), source.to_string()).unwrap()];
        let resolver = TargetResolver::new(&files);
        let mutatees = resolver.resolve(&TargetSpec::parse(spec).unwrap()).unwrap();
        let ctx = MutationContext::new(&files);
        let op = RandomLiteralSubstitution::new(FixedValues);
        mutatees.iter().flat_map(|m| op.generate(&ctx, m)).collect()
    }

    #[test]
    fn substitutes_string_literals() {
        let source = r#"
struct Thing;
impl Thing {
    fn name(&self) -> &'static str { "thing" }
}
"#;
        let mutants = mutants_for(source, "Thing#name");
        assert_eq!(mutants.len(), 1);
        assert_eq!(mutants[0].old_text, "\"thing\"");
        assert_eq!(mutants[0].new_text, "\"zzzz\"");
    }

    #[test]
    fn substitutes_char_and_range_literals() {
        let source = r#"
struct Thing;
impl Thing {
    fn scan(&self) -> usize {
        let sep = ',';
        (0..10).filter(|n| n % 2 == 0).count()
    }
}
"#;
        let mutants = mutants_for(source, "Thing#scan");
        let news: Vec<&str> = mutants.iter().map(|m| m.new_text.as_str()).collect();
        assert!(news.contains(&"'q'"));
        assert!(news.contains(&"7..11"));
    }

    #[test]
    fn leaves_non_literal_ranges_alone() {
        let source = r#"
struct Thing;
impl Thing {
    fn slice(&self, len: usize) -> usize {
        (0..len).count()
    }
}
"#;
        assert!(mutants_for(source, "Thing#slice").is_empty());
    }

    #[test]
    fn seeded_source_is_deterministic() {
        let mut a = SeededValues::with_seed(42);
        let mut b = SeededValues::with_seed(42);
        assert_eq!(a.random_string(), b.random_string());
        assert_eq!(a.random_symbol(), b.random_symbol());
        assert_eq!(a.random_range(), b.random_range());

        let (low, high) = a.random_range();
        assert!(low <= high);
    }
}
