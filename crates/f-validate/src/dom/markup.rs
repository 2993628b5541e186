// File: src/dom/markup.rs
// Purpose: Minimal HTML fragment reader for MemoryDocument fixtures

use super::memory::Element;

const VOID_TAGS: &[&str] = &["input", "br", "hr", "img", "meta", "link"];

/// Parses the HTML subset forms use into top-level elements.
///
/// Handles void and self-closing tags, quoted, unquoted and boolean
/// attributes, comments and text. Text is trimmed and attached to its
/// enclosing element; stray closing tags are ignored.
pub(super) fn parse_fragment(html: &str) -> Vec<Element> {
    let mut roots = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map(|end| &after[end + 3..]).unwrap_or("");
            continue;
        }

        if rest.starts_with("<!") {
            rest = rest.find('>').map(|end| &rest[end + 1..]).unwrap_or("");
            continue;
        }

        if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').unwrap_or(after.len());
            let tag = after[..end].trim().to_ascii_lowercase();
            rest = after.get(end + 1..).unwrap_or("");

            if stack.iter().any(|open| open.tag_name() == tag) {
                while let Some(open) = stack.pop() {
                    let done = open.tag_name() == tag;
                    attach(&mut stack, &mut roots, open);
                    if done {
                        break;
                    }
                }
            }
            continue;
        }

        if rest.starts_with('<') {
            let (element, self_closing, remaining) = parse_open_tag(&rest[1..]);
            rest = remaining;

            if self_closing || VOID_TAGS.contains(&element.tag_name()) {
                attach(&mut stack, &mut roots, element);
            } else {
                stack.push(element);
            }
            continue;
        }

        let end = rest.find('<').unwrap_or(rest.len());
        let text = decode(rest[..end].trim());
        if !text.is_empty() {
            if let Some(open) = stack.pop() {
                stack.push(open.text(&text));
            }
        }
        rest = &rest[end..];
    }

    while let Some(open) = stack.pop() {
        attach(&mut stack, &mut roots, open);
    }

    roots
}

fn attach(stack: &mut [Element], roots: &mut Vec<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.push_child(element),
        None => roots.push(element),
    }
}

/// Returns the element, whether it closed itself, and the input after `>`
fn parse_open_tag(source: &str) -> (Element, bool, &str) {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let mut pos = 0;

    let name_end = chars
        .iter()
        .position(|(_, c)| c.is_whitespace() || *c == '>' || *c == '/')
        .unwrap_or(chars.len());
    let tag: String = chars[..name_end].iter().map(|(_, c)| c).collect();
    let mut element = Element::new(&tag);
    pos += name_end;

    let mut self_closing = false;

    while pos < chars.len() {
        let c = chars[pos].1;

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        if c == '>' {
            let offset = chars[pos].0 + 1;
            return (element, self_closing, &source[offset..]);
        }

        if c == '/' {
            self_closing = true;
            pos += 1;
            continue;
        }

        self_closing = false;
        let start = pos;
        while pos < chars.len() {
            let c = chars[pos].1;
            if c.is_whitespace() || c == '=' || c == '>' || c == '/' {
                break;
            }
            pos += 1;
        }
        let name: String = chars[start..pos].iter().map(|(_, c)| c).collect();

        if chars.get(pos).map(|(_, c)| *c) != Some('=') {
            element = element.flag(&name);
            continue;
        }
        pos += 1;

        let value = match chars.get(pos).map(|(_, c)| *c) {
            Some(quote @ ('"' | '\'')) => {
                pos += 1;
                let start = pos;
                while pos < chars.len() && chars[pos].1 != quote {
                    pos += 1;
                }
                let value: String = chars[start..pos].iter().map(|(_, c)| c).collect();
                pos += 1;
                value
            }
            _ => {
                let start = pos;
                while pos < chars.len() && !chars[pos].1.is_whitespace() && chars[pos].1 != '>' {
                    pos += 1;
                }
                chars[start..pos].iter().map(|(_, c)| c).collect()
            }
        };

        element = element.attr(&name, &decode(&value));
    }

    (element, self_closing, "")
}

fn decode(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

pub(super) fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use crate::dom::{Dom, MemoryDocument};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trips_form_markup() {
        let doc = MemoryDocument::parse(
            r#"<form name="f">
                <!-- fields -->
                <input type="text" required value="a b" />
                <input data-val-equalto=target value=`tick`>
                <p class="form-error is-hidden"></p>
            </form>"#,
        );
        let form = doc.query("form").unwrap();

        assert_eq!(
            doc.outer_html(form),
            r#"<form name="f"><input type="text" required value="a b"><input data-val-equalto="target" value="`tick`"><p class="form-error is-hidden"></p></form>"#
        );
    }

    #[test]
    fn test_nested_groups_and_text() {
        let doc = MemoryDocument::parse(
            r#"<form><div data-val-group><select><option value="1">One &amp; only</option></select></div><textarea>  body </textarea></form>"#,
        );
        let option = doc.query("option").unwrap();
        let textarea = doc.query("textarea").unwrap();

        assert_eq!(doc.text(&option), "One & only");
        assert_eq!(doc.value(&textarea).as_deref(), Some("body"));
        assert_eq!(doc.descendants(&doc.document_root()).len(), 5);
    }

    #[test]
    fn test_unclosed_elements_are_closed_at_end() {
        let doc = MemoryDocument::parse("<form><div><input>");
        let form = doc.query("form").unwrap();
        assert_eq!(doc.outer_html(form), "<form><div><input></div></form>");
    }
}
