// File: src/dom/mod.rs
// Purpose: Document abstraction the engine reads fields from and renders into

use std::fmt::Debug;

mod locator;
mod markup;
mod memory;

pub use locator::Locator;
pub use memory::{Element, MemoryDocument, NodeId};

/// Element tree operations the engine needs.
///
/// Attribute names are ASCII case-insensitive, as in HTML. Implementations only
/// expose element nodes; text content is read and replaced as a whole.
pub trait Dom {
    /// Cheap handle to an element
    type Node: Clone + PartialEq + Debug;

    /// The document root every lookup can fall back to
    fn document_root(&self) -> Self::Node;

    /// Lowercase tag name
    fn tag_name(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    /// Current value of a form control, `None` for anything else
    fn value(&self, node: &Self::Node) -> Option<String>;

    fn is_checked(&self, node: &Self::Node) -> bool;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Adds `class` unless it is already present
    fn add_class(&mut self, node: &Self::Node, class: &str);

    fn remove_class(&mut self, node: &Self::Node, class: &str);

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Element children in document order
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn next_element_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Creates a detached element
    fn create_element(&mut self, tag: &str) -> Self::Node;

    /// Inserts `child` under `parent` before `reference`, or appends it when
    /// `reference` is `None`
    fn insert_before(&mut self, parent: &Self::Node, child: &Self::Node, reference: Option<&Self::Node>);

    fn text(&self, node: &Self::Node) -> String;

    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// Removes all content from `node`
    fn clear(&mut self, node: &Self::Node);

    fn focus(&mut self, _node: &Self::Node) {}

    /// All elements under `root` (excluding `root`) in document order
    fn descendants(&self, root: &Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(root).into_iter().rev().collect();

        while let Some(node) = stack.pop() {
            stack.extend(self.children(&node).into_iter().rev());
            out.push(node);
        }

        out
    }

    fn select(&self, root: &Self::Node, locator: &Locator) -> Vec<Self::Node> {
        self.descendants(root)
            .into_iter()
            .filter(|node| locator.matches(self, node))
            .collect()
    }

    fn select_first(&self, root: &Self::Node, locator: &Locator) -> Option<Self::Node> {
        self.descendants(root)
            .into_iter()
            .find(|node| locator.matches(self, node))
    }

    fn first_child(&self, node: &Self::Node) -> Option<Self::Node> {
        self.children(node).into_iter().next()
    }

    /// A `<form>` whose `name` or `id` equals `name`
    fn form_named(&self, name: &str) -> Option<Self::Node> {
        let root = self.document_root();
        self.descendants(&root).into_iter().find(|node| {
            self.tag_name(node) == "form"
                && (self.attribute(node, "name").as_deref() == Some(name)
                    || self.attribute(node, "id").as_deref() == Some(name))
        })
    }
}
