use crate::core::engine::operators::{MutationContext, MutationOperator, visit_body};
use crate::types::{Mutant, Mutatee};

/// Flips every boolean literal in the mutatee's body, one mutant per
/// occurrence. A test suite that never distinguishes `true` from `false`
/// for the method lets these survive.
pub struct BooleanNegation;

impl MutationOperator for BooleanNegation {
    fn name(&self) -> &'static str {
        "boolean-negation"
    }

    fn generate(&self, ctx: &MutationContext, mutatee: &Mutatee) -> Vec<Mutant> {
        let mut mutants = Vec::new();
        visit_body(ctx, mutatee, &mut |node, source| {
            if node.kind() == "boolean_literal" {
                let flipped = match &source[node.byte_range()] {
                    "true" => "false",
                    _ => "true",
                };
                mutants.push(ctx.mutant(mutatee, self.name(), &node, flipped.to_string()));
            }
        });
        mutants
    }
}
