// File: src/dom.rs
// Purpose: `Dom` over the browser document

use f_validate::Dom;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, Node,
};

/// The live document, seen through `web-sys`
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
    root: Element,
}

impl WebDom {
    pub fn new(document: Document) -> Option<Self> {
        let root = document.document_element()?;
        Some(Self { document, root })
    }

    /// The document of the current window
    pub fn current() -> Option<Self> {
        Self::new(web_sys::window()?.document()?)
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn document_root(&self) -> Element {
        self.root.clone()
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn has_attribute(&self, node: &Element, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        node.set_attribute(name, value).ok();
    }

    fn remove_attribute(&mut self, node: &Element, name: &str) {
        node.remove_attribute(name).ok();
    }

    fn value(&self, node: &Element) -> Option<String> {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            return Some(select.value());
        }
        node.dyn_ref::<HtmlTextAreaElement>().map(HtmlTextAreaElement::value)
    }

    fn is_checked(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlInputElement>()
            .map_or(false, HtmlInputElement::checked)
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        node.class_list().add_1(class).ok();
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        node.class_list().remove_1(class).ok();
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|index| children.item(index))
            .collect()
    }

    fn next_element_sibling(&self, node: &Element) -> Option<Element> {
        node.next_element_sibling()
    }

    fn create_element(&mut self, tag: &str) -> Element {
        self.document
            .create_element(tag)
            .expect("message elements use valid tag names")
    }

    fn insert_before(&mut self, parent: &Element, child: &Element, reference: Option<&Element>) {
        let reference = reference.map(AsRef::<Node>::as_ref);
        parent.insert_before(child, reference).ok();
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn clear(&mut self, node: &Element) {
        node.set_inner_html("");
    }

    fn focus(&mut self, node: &Element) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            element.focus().ok();
        }
    }
}
