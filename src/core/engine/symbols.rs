use std::collections::HashMap;

use tree_sitter::Node;

use crate::core::engine::source::SourceFile;
use crate::core::engine::utils::{calculate_line_offset, node_span, node_text};
use crate::types::{MethodScope, Mutatee, Span};

/// One declared method, as found by the symbol pass.
#[derive(Debug, Clone)]
pub struct MethodEntry {
    pub scope: MethodScope,
    pub name: String,
    pub file: usize,
    pub body: Span,
    pub line_offset: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ClassEntry {
    pub singleton: Vec<MethodEntry>,
    pub instance: Vec<MethodEntry>,
}

/// Mapping from class name to its directly declared methods, built in a
/// single static pass over the parsed trees. Replaces the runtime
/// reflection the engine's lineage used: only inherent `impl` blocks are
/// recorded, so trait-provided and inherited methods never appear.
#[derive(Debug, Default)]
pub struct SymbolTable {
    classes: HashMap<String, ClassEntry>,
}

impl SymbolTable {
    pub fn build(files: &[SourceFile]) -> Self {
        let mut table = Self::default();
        for (index, file) in files.iter().enumerate() {
            table.scan_file(index, file);
        }
        table
    }

    pub fn class(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.get(name)
    }

    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(|name| name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Fully-qualified specs for every singleton method declared directly on
    /// the class, in declaration order.
    pub fn all_singleton_methods(&self, class_name: &str) -> Vec<String> {
        self.methods_of(class_name, MethodScope::Singleton)
    }

    /// Fully-qualified specs for every instance method declared directly on
    /// the class, in declaration order.
    pub fn all_instance_methods(&self, class_name: &str) -> Vec<String> {
        self.methods_of(class_name, MethodScope::Instance)
    }

    /// Singleton methods first, then instance methods, relative order
    /// preserved within each group.
    pub fn all_methods(&self, class_name: &str) -> Vec<String> {
        let mut all = self.all_singleton_methods(class_name);
        all.extend(self.all_instance_methods(class_name));
        all
    }

    pub fn method(
        &self,
        class_name: &str,
        scope: MethodScope,
        method_name: &str,
    ) -> Option<&MethodEntry> {
        let class = self.class(class_name)?;
        let entries = match scope {
            MethodScope::Singleton => &class.singleton,
            MethodScope::Instance => &class.instance,
        };
        entries.iter().find(|entry| entry.name == method_name)
    }

    pub fn mutatee(&self, class_name: &str, entry: &MethodEntry) -> Mutatee {
        Mutatee {
            class_name: class_name.to_string(),
            scope: entry.scope,
            method_name: entry.name.clone(),
            file: entry.file,
            body: entry.body,
            line_offset: entry.line_offset,
        }
    }

    fn methods_of(&self, class_name: &str, scope: MethodScope) -> Vec<String> {
        let Some(class) = self.class(class_name) else {
            return Vec::new();
        };
        let entries = match scope {
            MethodScope::Singleton => &class.singleton,
            MethodScope::Instance => &class.instance,
        };
        entries
            .iter()
            .map(|entry| format!("{}{}{}", class_name, scope.separator(), entry.name))
            .collect()
    }

    fn scan_file(&mut self, index: usize, file: &SourceFile) {
        let source = file.text();
        let root = file.tree().root_node();
        let mut cursor = root.walk();
        crate::core::engine::utils::visit_nodes_with_cursor(root, &mut cursor, &mut |node| {
            match node.kind() {
                // Type declarations register the class even when no methods
                // are declared: a methodless class resolves to zero mutatees
                // rather than an unknown-class error.
                "struct_item" | "enum_item" | "union_item" => {
                    if let Some(name_node) = node.child_by_field_name("name") {
                        let name = node_text(&name_node, source).to_string();
                        self.classes.entry(name).or_default();
                    }
                }
                "impl_item" if node.child_by_field_name("trait").is_none() => {
                    self.scan_impl(index, source, &node);
                }
                _ => {}
            }
        });
    }

    fn scan_impl(&mut self, index: usize, source: &str, impl_node: &Node) {
        let Some(type_node) = impl_node.child_by_field_name("type") else {
            return;
        };
        let class_name = base_type_name(&type_node, source);
        let Some(body) = impl_node.child_by_field_name("body") else {
            return;
        };

        let mut cursor = body.walk();
        for item in body.children(&mut cursor) {
            if item.kind() != "function_item" {
                continue;
            }
            let Some(name_node) = item.child_by_field_name("name") else {
                continue;
            };
            let Some(fn_body) = item.child_by_field_name("body") else {
                continue;
            };
            let scope = if takes_self(&item) {
                MethodScope::Instance
            } else {
                MethodScope::Singleton
            };
            let entry = MethodEntry {
                scope,
                name: node_text(&name_node, source).to_string(),
                file: index,
                body: node_span(&fn_body),
                line_offset: calculate_line_offset(source, item.start_byte()),
            };
            let class = self.classes.entry(class_name.clone()).or_default();
            match scope {
                MethodScope::Singleton => class.singleton.push(entry),
                MethodScope::Instance => class.instance.push(entry),
            }
        }
    }
}

/// `impl Thing<T>` declares methods on `Thing`
fn base_type_name(type_node: &Node, source: &str) -> String {
    if type_node.kind() == "generic_type" {
        if let Some(inner) = type_node.child_by_field_name("type") {
            return node_text(&inner, source).to_string();
        }
    }
    node_text(type_node, source).to_string()
}

fn takes_self(function_item: &Node) -> bool {
    let Some(parameters) = function_item.child_by_field_name("parameters") else {
        return false;
    };
    let mut cursor = parameters.walk();
    parameters
        .children(&mut cursor)
        .any(|param| param.kind() == "self_parameter")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn table_for(source: &str) -> SymbolTable {
        let file =
            SourceFile::from_source(PathBuf::from("thing.rs"), source.to_string()).unwrap();
        SymbolTable::build(std::slice::from_ref(&file))
    }

    #[test]
    fn records_singleton_and_instance_scopes() {
        let table = table_for(
            r#"
struct Thing;
impl Thing {
    fn new() -> Self { Thing }
    fn alive(&self) -> bool { true }
}
"#,
        );
        assert_eq!(table.all_singleton_methods("Thing"), vec!["Thing.new"]);
        assert_eq!(table.all_instance_methods("Thing"), vec!["Thing#alive"]);
    }

    #[test]
    fn all_methods_puts_singletons_first() {
        let table = table_for(
            r#"
struct Thing;
impl Thing {
    fn alive(&self) -> bool { true }
    fn new() -> Self { Thing }
    fn dead(&self) -> bool { false }
}
"#,
        );
        assert_eq!(
            table.all_methods("Thing"),
            vec!["Thing.new", "Thing#alive", "Thing#dead"]
        );
    }

    #[test]
    fn trait_impl_methods_are_not_declared_methods() {
        let table = table_for(
            r#"
struct Thing;
impl Default for Thing {
    fn default() -> Self { Thing }
}
"#,
        );
        assert!(table.all_methods("Thing").is_empty());
    }

    #[test]
    fn methodless_class_is_known_but_empty() {
        let table = table_for("struct Empty;");
        assert!(table.class("Empty").is_some());
        assert!(table.all_methods("Empty").is_empty());
    }

    #[test]
    fn generic_impl_registers_base_name() {
        let table = table_for(
            r#"
struct Holder<T>(T);
impl<T> Holder<T> {
    fn get(&self) -> &T { &self.0 }
}
"#,
        );
        assert_eq!(table.all_instance_methods("Holder"), vec!["Holder#get"]);
    }

    #[test]
    fn merges_multiple_impl_blocks_in_order() {
        let table = table_for(
            r#"
struct Thing;
impl Thing {
    fn a(&self) {}
}
impl Thing {
    fn b(&self) {}
}
"#,
        );
        assert_eq!(
            table.all_instance_methods("Thing"),
            vec!["Thing#a", "Thing#b"]
        );
    }
}
