//! HTML fragment parsing and serialization
//!
//! The content grammar is whatever a `contenteditable` surface produces:
//! inline formatting elements, `<br>`, `<img>` and text. The parser is a
//! lenient recursive descent over the fragment and never fails:
//! - unknown entities are kept literally
//! - unclosed elements are closed at end of input
//! - stray end tags are ignored
//! - void elements never take children
//!
//! Serialization is deterministic, which is what makes it usable as a
//! selection fingerprint.

use quick_xml::escape::{escape, partial_escape, unescape_with};

use super::node::{is_void_tag, Container, Element, NodeId, NodeKind};

fn resolve_entity(entity: &str) -> Option<&'static str> {
    match entity {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        "nbsp" => Some("\u{a0}"),
        _ => None,
    }
}

/// Longest reference body we try to resolve (`&#x10FFFF;` fits)
const MAX_REFERENCE_LEN: usize = 16;

/// Decode character references one at a time. A bare `&` or an unknown
/// reference stays literal without affecting its neighbours.
pub fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let candidate = rest[1..]
            .find(|c: char| c == ';' || c == '&' || c.is_whitespace())
            .filter(|&end| end <= MAX_REFERENCE_LEN && rest[1 + end..].starts_with(';'))
            .map(|end| &rest[..end + 2]);

        match candidate.and_then(|reference| unescape_with(reference, resolve_entity).ok().map(|d| (reference, d))) {
            Some((reference, decoded)) => {
                out.push_str(&decoded);
                rest = &rest[reference.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_past(&mut self, needle: &str) {
        match self.rest().find(needle) {
            Some(i) => self.pos += i + needle.len(),
            None => self.pos = self.src.len(),
        }
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    /// Does the input continue with `<` followed by a tag name character?
    fn at_start_tag(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('<') && chars.next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false)
    }

    fn at_end_tag(&self) -> bool {
        let rest = self.rest();
        rest.starts_with("</") && rest[2..].chars().next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false)
    }

    fn at_markup_declaration(&self) -> bool {
        let rest = self.rest();
        rest.starts_with("<!") || rest.starts_with("<?")
    }

    fn read_name(&mut self) -> String {
        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/' || c == '=')
            .unwrap_or(rest.len());
        self.pos += len;
        rest[..len].to_ascii_lowercase()
    }

    /// Text up to the next tag-like `<`
    fn read_text(&mut self) -> String {
        let start = self.pos;
        // A lone `<` that does not open markup is literal text
        if self.rest().starts_with('<') {
            self.pos += 1;
        }
        while !self.at_end() {
            match self.rest().find('<') {
                Some(i) => {
                    self.pos += i;
                    if self.at_start_tag() || self.at_end_tag() || self.at_markup_declaration() {
                        break;
                    }
                    self.pos += 1;
                }
                None => self.pos = self.src.len(),
            }
        }
        decode_entities(&self.src[start..self.pos])
    }

    fn read_attr_value(&mut self) -> String {
        let rest = self.rest();
        let quote = rest.chars().next();
        match quote {
            Some(q @ ('"' | '\'')) => {
                let body = &rest[1..];
                let len = body.find(q).unwrap_or(body.len());
                let raw = &body[..len];
                self.pos += 1 + len + if len < body.len() { 1 } else { 0 };
                decode_entities(raw)
            }
            _ => {
                let len = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += len;
                decode_entities(&rest[..len])
            }
        }
    }

    /// Parse `<name attr=...>`; returns the element and whether it self-closed
    fn read_start_tag(&mut self) -> (Element, bool) {
        self.pos += 1; // '<'
        let mut element = Element::new(self.read_name());
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                break;
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }

            let name = self.read_name();
            if name.is_empty() {
                // Unparseable byte inside a tag; drop it and keep going
                let skip = rest.chars().next().map(|c| c.len_utf8()).unwrap_or(1);
                self.pos += skip;
                continue;
            }
            self.skip_whitespace();
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                self.read_attr_value()
            } else {
                String::new()
            };
            element.set_attr(name, value);
        }

        (element, self_closing)
    }

    fn read_end_tag(&mut self) -> String {
        self.pos += 2; // '</'
        let name = self.read_name();
        self.skip_past(">");
        name
    }
}

/// Parse a fragment and append its nodes under `parent`
pub(crate) fn parse_into(container: &mut Container, parent: NodeId, html: &str) {
    let mut parser = Parser::new(html);
    let mut open: Vec<NodeId> = vec![parent];

    while !parser.at_end() {
        let current = *open.last().unwrap_or(&parent);

        if parser.rest().starts_with("<!--") {
            parser.skip_past("-->");
        } else if parser.at_end_tag() {
            let name = parser.read_end_tag();
            // Close up to the innermost matching open element; ignore strays
            if let Some(depth) = open.iter().rposition(|id| {
                *id != parent
                    && container
                        .element(*id)
                        .map(|el| el.tag == name)
                        .unwrap_or(false)
            }) {
                open.truncate(depth);
            }
        } else if parser.at_markup_declaration() {
            parser.skip_past(">");
        } else if parser.at_start_tag() {
            let (element, self_closing) = parser.read_start_tag();
            let void = is_void_tag(&element.tag);
            let id = container.append_child(current, NodeKind::Element(element));
            if !void && !self_closing {
                open.push(id);
            }
        } else {
            let text = parser.read_text();
            if text.is_empty() {
                continue;
            }
            match container.last_child(current) {
                Some(last) if container.is_text(last) => {
                    let merged = format!("{}{}", container.text(last).unwrap_or(""), text);
                    container.set_text(last, merged);
                }
                _ => {
                    container.append_child(current, NodeKind::Text(text));
                }
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    partial_escape(text).replace('\u{a0}', "&nbsp;")
}

fn serialize_node(container: &Container, id: NodeId, out: &mut String) {
    match container.kind(id) {
        NodeKind::Text(text) => out.push_str(&escape_text(text)),
        NodeKind::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape(value.as_str()));
                out.push('"');
            }
            out.push('>');
            if element.is_void() {
                return;
            }
            for child in container.children(id) {
                serialize_node(container, *child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

/// Serialize the children of `id` (the node's inner HTML)
pub fn serialize_children(container: &Container, id: NodeId) -> String {
    let mut out = String::new();
    for child in container.children(id) {
        serialize_node(container, *child, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_formatting() {
        let c = Container::from_html("<b>abc<i>d</i></b>e");
        let root = c.root();
        assert_eq!(c.children(root).len(), 2);

        let b = c.child(root, 0).unwrap();
        assert_eq!(c.element(b).unwrap().tag, "b");
        assert_eq!(c.children(b).len(), 2);
        assert_eq!(c.text_content(root), "abcde");
    }

    #[test]
    fn test_void_elements_take_no_children() {
        let c = Container::from_html("a<br>b<img src=\"x.png\" alt=\"emoji\">c");
        let root = c.root();

        assert_eq!(c.children(root).len(), 5);
        assert_eq!(c.to_html(), "a<br>b<img src=\"x.png\" alt=\"emoji\">c");
    }

    #[test]
    fn test_serialization_round_trip_is_stable() {
        let html = "<font color=\"#ff0000\">red</font> &amp; <u>under</u><br>";
        let c = Container::from_html(html);
        let once = c.to_html();
        let twice = Container::from_html(&once).to_html();

        assert_eq!(once, html);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_lenient_input() {
        // unclosed tag, stray end tag, literal '<', unknown entity
        let c = Container::from_html("<b>bold</i> 1 < 2 &bogus; end");
        assert_eq!(c.text_content(c.root()), "bold 1 < 2 &bogus; end");
        assert_eq!(c.to_html(), "<b>bold 1 &lt; 2 &amp;bogus; end</b>");
    }

    #[test]
    fn test_entities_and_nbsp() {
        let c = Container::from_html("a&nbsp;b &lt;c&gt; &#65;");
        assert_eq!(c.text_content(c.root()), "a\u{a0}b <c> A");
        assert_eq!(c.to_html(), "a&nbsp;b &lt;c&gt; A");
    }

    #[test]
    fn test_bare_ampersand_next_to_valid_reference() {
        let c = Container::from_html("a & b &lt; c");
        assert_eq!(c.text_content(c.root()), "a & b < c");
        assert_eq!(c.to_html(), "a &amp; b &lt; c");

        // serialized output parses back to the same text
        let reloaded = Container::from_html(&c.to_html());
        assert_eq!(reloaded.to_html(), c.to_html());
    }

    #[test]
    fn test_unknown_reference_keeps_neighbours_decoded() {
        assert_eq!(decode_entities("&bogus;&amp;&"), "&bogus;&&");
        assert_eq!(decode_entities("x&;y&#66;"), "x&;yB");
    }

    #[test]
    fn test_unquoted_and_single_quoted_attributes() {
        let c = Container::from_html("<font size=5 face='Courier New'>x</font>");
        let font = c.child(c.root(), 0).unwrap();
        let el = c.element(font).unwrap();

        assert_eq!(el.attr("size"), Some("5"));
        assert_eq!(el.attr("face"), Some("Courier New"));
    }

    #[test]
    fn test_comments_are_dropped() {
        let c = Container::from_html("a<!-- note -->b");
        assert_eq!(c.to_html(), "ab");
    }
}
