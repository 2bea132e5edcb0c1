//! Lenient HTML reading and writing.
//!
//! This is not an HTML5 tree builder. It understands tags, attributes,
//! comments, doctypes, void elements, raw-text elements and the common
//! character references, and otherwise keeps whatever nesting the input
//! spells out. Unmatched end tags are dropped; unclosed elements are closed
//! at end of input.

use super::document::{Document, ReadyState};
use super::node::{Attribute, Node, NodeId, NodeKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is not markup. Script and style content is also
/// written back verbatim; the others are escaped like normal text.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

const UNESCAPED_TEXT_ELEMENTS: &[&str] = &["script", "style"];

fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Whether an element's content is read as plain text rather than markup.
pub fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(name))
}

fn starts_with_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack.len() >= needle.len()
        && haystack.as_bytes()[..needle.len()].eq_ignore_ascii_case(needle.as_bytes())
}

/// Find `</name` (case-insensitive) in `haystack`.
fn find_close_tag(haystack: &str, name: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let mut i = 0;
    while let Some(rel) = haystack[i..].find("</") {
        let start = i + rel;
        let name_start = start + 2;
        let name_end = name_start + name.len();
        if name_end <= bytes.len()
            && bytes[name_start..name_end].eq_ignore_ascii_case(name.as_bytes())
            && bytes
                .get(name_end)
                .is_none_or(|&b| b == b'>' || b == b'/' || b.is_ascii_whitespace())
        {
            return Some(start);
        }
        i = start + 2;
    }
    None
}

/// Decode character references in `input`.
///
/// Named references need a terminating `;`. Unknown or malformed references
/// are kept literally.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_reference(rest) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &rest[consumed..];
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

/// Decode one reference at the start of `s` (which begins with `&`).
fn decode_reference(s: &str) -> Option<(char, usize)> {
    let semi = s[1..].find(';')? + 1;
    let body = &s[1..semi];
    if body.is_empty() || body.len() > 10 {
        return None;
    }
    let ch = if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        char::from_u32(code).filter(|&c| c != '\0')?
    } else {
        match body {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => '\u{a0}',
            _ => return None,
        }
    };
    Some((ch, semi + 1))
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

struct TreeBuilder {
    doc: Document,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(Document::ROOT)
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let parent = self.current();
        self.doc.append_fresh(parent, node)
    }

    fn text(&mut self, raw: &str, decode: bool) {
        if raw.is_empty() {
            return;
        }
        let data = if decode {
            decode_entities(raw)
        } else {
            raw.to_string()
        };
        // Adjacent text (e.g. around a dropped end tag) merges into one node.
        let parent = self.current();
        if let Some(&last) = self.doc.children(parent).last()
            && self.doc.kind(last) == Some(NodeKind::Text)
        {
            self.doc.append_text_data(last, &data);
            return;
        }
        self.insert(Node::text(data));
    }

    fn start_tag(&mut self, name: &str, attributes: Vec<Attribute>, self_closing: bool) {
        let mut node = Node::element(name);
        node.attributes = attributes;
        let id = self.insert(node);
        if !self_closing && !is_void_element(&name.to_ascii_lowercase()) {
            self.open.push(id);
        }
    }

    fn end_tag(&mut self, name: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(pos) = self
            .open
            .iter()
            .rposition(|&id| self.doc.tag_name(id) == Some(name.as_str()))
        {
            self.open.truncate(pos);
        } else {
            log::debug!("Ignoring unmatched end tag </{}>", name);
        }
    }
}

/// Parse `input` into a new document in the `Complete` ready state.
pub fn parse(input: &str) -> Document {
    let mut builder = TreeBuilder {
        doc: Document::new(),
        open: Vec::new(),
    };
    let mut rest = input;

    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            builder.text(rest, true);
            break;
        };
        builder.text(&rest[..lt], true);
        rest = &rest[lt..];

        if let Some(after) = rest.strip_prefix("<!--") {
            let (data, consumed) = match after.find("-->") {
                Some(end) => (&after[..end], 4 + end + 3),
                None => (after, rest.len()),
            };
            builder.insert(Node::comment(data));
            rest = &rest[consumed..];
        } else if starts_with_ignore_ascii_case(rest, "<!doctype") {
            let end = rest.find('>').unwrap_or(rest.len());
            builder.insert(Node::doctype(&rest[2..end]));
            rest = &rest[(end + 1).min(rest.len())..];
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            // Bogus comment
            let end = rest.find('>').unwrap_or(rest.len());
            builder.insert(Node::comment(&rest[2..end]));
            rest = &rest[(end + 1).min(rest.len())..];
        } else if let Some(after) = rest.strip_prefix("</") {
            if after.starts_with(|c: char| c.is_ascii_alphabetic()) {
                let end = after.find('>').unwrap_or(after.len());
                let name: String = after[..end]
                    .chars()
                    .take_while(|c| !c.is_ascii_whitespace() && *c != '/')
                    .collect();
                builder.end_tag(&name);
                rest = &after[(end + 1).min(after.len())..];
            } else {
                builder.text("</", false);
                rest = after;
            }
        } else if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let (tag, consumed) = read_start_tag(&rest[1..]);
            rest = &rest[1 + consumed..];
            let lower = tag.name.to_ascii_lowercase();
            builder.start_tag(&tag.name, tag.attributes, tag.self_closing);
            if !tag.self_closing && is_raw_text_element(&lower) {
                let end = find_close_tag(rest, &lower).unwrap_or(rest.len());
                let decode = !UNESCAPED_TEXT_ELEMENTS.contains(&lower.as_str());
                builder.text(&rest[..end], decode);
                rest = &rest[end..];
                if rest.is_empty() {
                    builder.end_tag(&lower);
                }
            }
        } else {
            builder.text("<", false);
            rest = &rest[1..];
        }
    }

    let mut doc = builder.doc;
    doc.set_ready_state(ReadyState::Complete);
    doc
}

struct StartTag {
    name: String,
    attributes: Vec<Attribute>,
    self_closing: bool,
}

/// Read a start tag from `s` (just after the `<`). Returns the tag and the
/// number of bytes consumed, including the closing `>`.
fn read_start_tag(s: &str) -> (StartTag, usize) {
    let name_end = s
        .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
        .unwrap_or(s.len());
    let mut tag = StartTag {
        name: s[..name_end].to_ascii_lowercase(),
        attributes: Vec::new(),
        self_closing: false,
    };
    let mut i = name_end;
    let bytes = s.as_bytes();

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return (tag, i);
        }
        match bytes[i] {
            b'>' => return (tag, i + 1),
            b'/' => {
                if bytes.get(i + 1) == Some(&b'>') {
                    tag.self_closing = true;
                    return (tag, i + 2);
                }
                i += 1;
                continue;
            }
            _ => {}
        }

        let attr_end = s[i..]
            .find(|c: char| c.is_ascii_whitespace() || c == '=' || c == '>' || c == '/')
            .map_or(s.len(), |p| i + p);
        let name = s[i..attr_end].to_ascii_lowercase();
        i = attr_end;

        let mut j = i;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        let mut value = String::new();
        if bytes.get(j) == Some(&b'=') {
            j += 1;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            match bytes.get(j).copied() {
                Some(q @ (b'"' | b'\'')) => {
                    let start = j + 1;
                    let end = s[start..]
                        .find(q as char)
                        .map_or(s.len(), |p| start + p);
                    value = decode_entities(&s[start..end]);
                    i = (end + 1).min(s.len());
                }
                _ => {
                    let end = s[j..]
                        .find(|c: char| c.is_ascii_whitespace() || c == '>')
                        .map_or(s.len(), |p| j + p);
                    value = decode_entities(&s[j..end]);
                    i = end;
                }
            }
        }

        if !name.is_empty() && !tag.attributes.iter().any(|a| a.name == name) {
            tag.attributes.push(Attribute { name, value });
        }
    }
}

/// Serialize `id` and its subtree as HTML.
pub fn serialize(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

/// Serialize the children of `id` (the node's "inner HTML").
pub fn serialize_children(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    for &child in doc.children(id) {
        write_node(doc, child, &mut out);
    }
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let Some(node) = doc.node(id) else {
        return;
    };
    match node.kind {
        NodeKind::Document => {
            for &child in &node.children {
                write_node(doc, child, out);
            }
        }
        NodeKind::Element => {
            out.push('<');
            out.push_str(&node.name);
            for attr in &node.attributes {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_attribute(&attr.value, out);
                out.push('"');
            }
            out.push('>');
            if is_void_element(&node.name) {
                return;
            }
            for &child in &node.children {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(&node.name);
            out.push('>');
        }
        NodeKind::Text => {
            let raw = node
                .parent
                .and_then(|p| doc.tag_name(p))
                .is_some_and(|tag| UNESCAPED_TEXT_ELEMENTS.contains(&tag));
            if raw {
                out.push_str(&node.data);
            } else {
                escape_text(&node.data, out);
            }
        }
        NodeKind::Comment => {
            out.push_str("<!--");
            out.push_str(&node.data);
            out.push_str("-->");
        }
        NodeKind::Doctype => {
            out.push_str("<!");
            out.push_str(&node.name);
            out.push('>');
        }
    }
}
