use crate::core::engine::source::SourceFile;
use crate::core::engine::utils::{calculate_line_offset, node_text};
use crate::types::{Mutant, Mutatee};
use tree_sitter::Node;

/// Read-only view of the loaded sources handed to operators.
pub struct MutationContext<'a> {
    pub files: &'a [SourceFile],
}

impl<'a> MutationContext<'a> {
    pub fn new(files: &'a [SourceFile]) -> Self {
        Self { files }
    }

    pub fn file(&self, mutatee: &Mutatee) -> &'a SourceFile {
        &self.files[mutatee.file]
    }

    /// Build a mutant replacing `node`'s text within the mutatee's file.
    pub fn mutant(
        &self,
        mutatee: &Mutatee,
        operator: &'static str,
        node: &Node,
        new_text: String,
    ) -> Mutant {
        let file = self.file(mutatee);
        let source = file.text();
        Mutant {
            mutatee: mutatee.qualified_name(),
            operator,
            file: mutatee.file,
            path: file.path.clone(),
            byte_offset: node.start_byte() as u32,
            line_offset: calculate_line_offset(source, node.start_byte()),
            old_text: node_text(node, source).to_string(),
            new_text,
        }
    }
}

/// Core trait every mutation operator implements.
///
/// Operators never fail: one with no applicable site in the mutatee's body
/// simply yields nothing.
pub trait MutationOperator: Send + Sync {
    /// Operator name used in mutant provenance (e.g. "boolean-negation")
    fn name(&self) -> &'static str;

    /// Produce every candidate mutant for one mutatee
    fn generate(&self, ctx: &MutationContext, mutatee: &Mutatee) -> Vec<Mutant>;
}

/// Registry for the open set of mutation operators
pub struct OperatorRegistry {
    operators: Vec<Box<dyn MutationOperator>>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        Self {
            operators: Vec::new(),
        }
    }

    /// Register an operator. Operators are applied in registration order.
    pub fn register<T: MutationOperator + 'static>(&mut self, operator: T) {
        self.operators.push(Box::new(operator));
    }

    pub fn all_operators(&self) -> Vec<&str> {
        self.operators.iter().map(|op| op.name()).collect()
    }

    /// Apply every registered operator to one mutatee, flattened in
    /// registration order.
    pub fn generate(&self, ctx: &MutationContext, mutatee: &Mutatee) -> Vec<Mutant> {
        self.operators
            .iter()
            .flat_map(|op| op.generate(ctx, mutatee))
            .collect()
    }

    /// Apply the full set to each mutatee in turn.
    pub fn generate_all(&self, ctx: &MutationContext, mutatees: &[Mutatee]) -> Vec<Mutant> {
        mutatees
            .iter()
            .flat_map(|mutatee| self.generate(ctx, mutatee))
            .collect()
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Visit the nodes inside a mutatee's body, skipping comments.
pub(crate) fn visit_body<F>(ctx: &MutationContext, mutatee: &Mutatee, callback: &mut F)
where
    F: FnMut(Node, &str),
{
    let file = ctx.file(mutatee);
    let source = file.text();
    let root = file.tree().root_node();
    crate::core::engine::utils::visit_nodes_within(root, mutatee.body, &mut |node| {
        if !crate::core::engine::utils::is_in_comment(&node) {
            callback(node, source);
        }
    });
}
