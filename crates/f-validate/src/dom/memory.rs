// File: src/dom/memory.rs
// Purpose: Arena-backed document for tests and server-side pre-validation

use super::{markup, Dom};

/// Handle to an element in a [`MemoryDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

const VOID_TAGS: &[&str] = &["input", "br", "hr", "img", "meta", "link"];

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    /// Live value, once set by the user or the test
    value: Option<String>,
    /// Live checkedness, once set
    checked: Option<bool>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            text: String::new(),
            value: None,
            checked: None,
            parent: None,
            children: Vec::new(),
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or("").split_whitespace()
    }
}

/// Builder for an element subtree
///
/// ```
/// use f_validate::{Element, MemoryDocument, Dom};
///
/// let mut doc = MemoryDocument::new();
/// let root = doc.document_root();
/// let form = doc.append(root, Element::new("form").attr("name", "login")
///     .child(Element::new("input").attr("name", "user").flag("required")));
///
/// assert_eq!(doc.children(&form).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    /// Boolean attribute such as `required` or `disabled`
    pub fn flag(self, name: &str) -> Self {
        self.attr(name, "")
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub(super) fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub(super) fn tag_name(&self) -> &str {
        &self.tag
    }
}

/// In-memory element tree implementing [`Dom`]
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
    focused: Option<NodeId>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// An empty document with a single `#document` root
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new("#document")],
            focused: None,
        }
    }

    /// Loads an HTML fragment under the document root
    pub fn parse(html: &str) -> Self {
        let mut doc = Self::new();
        let root = doc.document_root();
        for element in markup::parse_fragment(html) {
            doc.append(root, element);
        }
        doc
    }

    /// Appends a built subtree under `parent`, returning the new subtree root
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut data = NodeData::new(&element.tag);
        data.attributes = element.attributes;
        data.text = element.text;
        data.parent = Some(parent);
        self.nodes.push(data);
        self.nodes[parent.0].children.push(id);

        for child in element.children {
            self.append(id, child);
        }

        id
    }

    /// Sets the live value of a control, as typing or selecting would
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.nodes[node.0].value = Some(value.to_string());
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        self.nodes[node.0].checked = Some(checked);
    }

    /// Element last given focus
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// First element in document order matching a selector
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        let locator = super::Locator::parse(selector)?;
        self.select_first(&self.document_root(), &locator)
    }

    /// All elements in document order matching a selector
    pub fn query_all(&self, selector: &str) -> Vec<NodeId> {
        match super::Locator::parse(selector) {
            Some(locator) => self.select(&self.document_root(), &locator),
            None => Vec::new(),
        }
    }

    /// Serializes `node` and its subtree
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let data = &self.nodes[node.0];
        let is_root = node.0 == 0;

        if !is_root {
            out.push('<');
            out.push_str(&data.tag);
            for (name, value) in &data.attributes {
                out.push(' ');
                out.push_str(name);
                if !value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&markup::escape(value));
                    out.push('"');
                }
            }
            out.push('>');

            if VOID_TAGS.contains(&data.tag.as_str()) {
                return;
            }
        }

        out.push_str(&markup::escape(&data.text));
        for child in &data.children {
            self.write_html(*child, out);
        }

        if !is_root {
            out.push_str("</");
            out.push_str(&data.tag);
            out.push('>');
        }
    }

    fn option_value(&self, option: NodeId) -> String {
        let data = &self.nodes[option.0];
        data.attribute("value")
            .map(str::to_string)
            .unwrap_or_else(|| data.text.trim().to_string())
    }

    fn select_value(&self, select: NodeId) -> String {
        let options: Vec<NodeId> = self
            .descendants(&select)
            .into_iter()
            .filter(|node| self.nodes[node.0].tag == "option")
            .collect();

        options
            .iter()
            .find(|option| self.nodes[option.0].attribute("selected").is_some())
            .or_else(|| options.first())
            .map(|option| self.option_value(*option))
            .unwrap_or_default()
    }
}

impl Dom for MemoryDocument {
    type Node = NodeId;

    fn document_root(&self) -> NodeId {
        NodeId(0)
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.nodes[node.0].tag.clone()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes[node.0].attribute(name).map(str::to_string)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        let data = &mut self.nodes[node.0];
        match data
            .attributes
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => data
                .attributes
                .push((name.to_ascii_lowercase(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        self.nodes[node.0]
            .attributes
            .retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }

    fn value(&self, node: &NodeId) -> Option<String> {
        let data = &self.nodes[node.0];
        if let Some(value) = &data.value {
            return Some(value.clone());
        }

        match data.tag.as_str() {
            "input" => Some(data.attribute("value").unwrap_or("").to_string()),
            "textarea" => Some(data.text.clone()),
            "select" => Some(self.select_value(*node)),
            _ => None,
        }
    }

    fn is_checked(&self, node: &NodeId) -> bool {
        let data = &self.nodes[node.0];
        data.checked
            .unwrap_or_else(|| data.attribute("checked").is_some())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes[node.0].classes().any(|existing| existing == class)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }

        let mut classes: Vec<String> = self.nodes[node.0].classes().map(str::to_string).collect();
        classes.push(class.to_string());
        self.set_attribute(node, "class", &classes.join(" "));
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        if !self.has_class(node, class) {
            return;
        }

        let classes: Vec<String> = self.nodes[node.0]
            .classes()
            .filter(|existing| *existing != class)
            .map(str::to_string)
            .collect();
        self.set_attribute(node, "class", &classes.join(" "));
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    fn next_element_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.nodes[node.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let index = siblings.iter().position(|sibling| sibling == node)?;
        siblings.get(index + 1).copied()
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(NodeData::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    fn insert_before(&mut self, parent: &NodeId, child: &NodeId, reference: Option<&NodeId>) {
        if let Some(previous) = self.nodes[child.0].parent.take() {
            self.nodes[previous.0].children.retain(|existing| existing != child);
        }

        let siblings = &mut self.nodes[parent.0].children;
        let index = reference
            .and_then(|reference| siblings.iter().position(|existing| existing == reference))
            .unwrap_or(siblings.len());
        siblings.insert(index, *child);
        self.nodes[child.0].parent = Some(*parent);
    }

    fn text(&self, node: &NodeId) -> String {
        let mut text = self.nodes[node.0].text.clone();
        for child in &self.nodes[node.0].children {
            text.push_str(&self.text(child));
        }
        text
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        self.clear(node);
        self.nodes[node.0].text = text.to_string();
    }

    fn clear(&mut self, node: &NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        self.nodes[node.0].text.clear();
    }

    fn focus(&mut self, node: &NodeId) {
        self.focused = Some(*node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_values_follow_control_kind() {
        let doc = MemoryDocument::parse(
            r#"<form>
                <input name="a" value="x">
                <textarea name="b">hello</textarea>
                <select name="c"><option value="">-</option><option value="2" selected>2</option></select>
                <select name="d"><option>first</option></select>
                <div data-val-group></div>
            </form>"#,
        );

        assert_eq!(doc.value(&doc.query("[name=a]").unwrap()).as_deref(), Some("x"));
        assert_eq!(doc.value(&doc.query("[name=b]").unwrap()).as_deref(), Some("hello"));
        assert_eq!(doc.value(&doc.query("[name=c]").unwrap()).as_deref(), Some("2"));
        assert_eq!(doc.value(&doc.query("[name=d]").unwrap()).as_deref(), Some("first"));
        assert_eq!(doc.value(&doc.query("div").unwrap()), None);
    }

    #[test]
    fn test_live_value_and_checked_override_markup() {
        let mut doc = MemoryDocument::parse(r#"<input value="a"><input type="checkbox" checked>"#);
        let text = doc.query("input").unwrap();
        let checkbox = doc.query("[type=checkbox]").unwrap();

        doc.set_value(text, "b");
        doc.set_checked(checkbox, false);

        assert_eq!(doc.value(&text).as_deref(), Some("b"));
        assert!(!doc.is_checked(&checkbox));
    }

    #[test]
    fn test_class_toggling_is_idempotent() {
        let mut doc = MemoryDocument::parse("<input>");
        let input = doc.query("input").unwrap();

        doc.add_class(&input, "has-error");
        doc.add_class(&input, "has-error");
        assert_eq!(doc.attribute(&input, "class").as_deref(), Some("has-error"));

        doc.add_class(&input, "other");
        doc.remove_class(&input, "has-error");
        assert_eq!(doc.attribute(&input, "class").as_deref(), Some("other"));
    }

    #[test]
    fn test_insert_before_and_siblings() {
        let mut doc = MemoryDocument::parse("<form><input name=a><input name=b></form>");
        let form = doc.query("form").unwrap();
        let b = doc.query("[name=b]").unwrap();
        let p = doc.create_element("p");

        doc.insert_before(&form, &p, Some(&b));
        assert_eq!(
            doc.outer_html(form),
            r#"<form><input name="a"><p></p><input name="b"></form>"#
        );
        assert_eq!(doc.next_element_sibling(&p), Some(b));

        doc.insert_before(&form, &p, None);
        assert_eq!(doc.children(&form).last(), Some(&p));
    }

    #[test]
    fn test_form_named_matches_name_or_id() {
        let doc = MemoryDocument::parse(r#"<form name="one"></form><form id="two"></form>"#);
        assert!(doc.form_named("one").is_some());
        assert!(doc.form_named("two").is_some());
        assert!(doc.form_named("three").is_none());
    }
}
