//! Fragment parsing and serialization.
//!
//! The parser is forgiving in the way browsers are for fragments: unknown
//! end tags are ignored, unclosed elements are closed at the end of input and
//! a `<` that does not start a tag is kept as text. Only input that ends in
//! the middle of a tag, comment or quoted attribute value is rejected.

use crate::document::Document;
use crate::error::{DomResult, MarkupError};
use crate::node::{NodeId, NodeKind};

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

struct StartTag {
    name: String,
    attributes: Vec<(String, String)>,
    self_closing: bool,
    end: usize,
}

impl Document {
    /// Parse a markup fragment into detached top-level nodes.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] (wrapped in [`crate::DomError::Markup`]) when the
    /// input ends inside a tag, comment or quoted attribute value.
    pub fn parse_fragment(&mut self, markup: &str) -> DomResult<Vec<NodeId>> {
        let bytes = markup.as_bytes();
        let mut top = Vec::new();
        let mut open: Vec<NodeId> = Vec::new();
        let mut text_start = 0;
        let mut pos = 0;

        while pos < bytes.len() {
            if bytes[pos] != b'<' {
                pos += 1;
                continue;
            }
            let next = bytes.get(pos + 1).copied();
            let is_markup = matches!(next, Some(b'!' | b'?' | b'/'))
                || next.is_some_and(|byte| byte.is_ascii_alphabetic());
            if !is_markup {
                pos += 1;
                continue;
            }
            self.flush_text(&markup[text_start..pos], &open, &mut top)?;

            if markup[pos..].starts_with("<!--") {
                let close = markup[pos + 4..]
                    .find("-->")
                    .map(|offset| pos + 4 + offset)
                    .ok_or(MarkupError::UnterminatedComment { position: pos })?;
                let comment = self.create_comment(&markup[pos + 4..close]);
                self.attach(comment, &open, &mut top)?;
                pos = close + 3;
            } else if matches!(next, Some(b'!' | b'?')) {
                pos = find_tag_end(markup, pos)? + 1;
            } else if next == Some(b'/') {
                let close = find_tag_end(markup, pos)?;
                let name = markup[pos + 2..close].trim().to_ascii_lowercase();
                if let Some(depth) = open
                    .iter()
                    .rposition(|node| self.tag(*node) == Some(name.as_str()))
                {
                    open.truncate(depth);
                }
                pos = close + 1;
            } else {
                let tag = parse_start_tag(markup, pos)?;
                let element = self.create_element(&tag.name);
                for (name, value) in &tag.attributes {
                    self.set_attribute(element, name, value);
                }
                self.attach(element, &open, &mut top)?;
                if !tag.self_closing && !is_void(&tag.name) {
                    open.push(element);
                }
                pos = tag.end;
            }
            text_start = pos;
        }
        self.flush_text(&markup[text_start..], &open, &mut top)?;
        Ok(top)
    }

    fn attach(&mut self, node: NodeId, open: &[NodeId], top: &mut Vec<NodeId>) -> DomResult<()> {
        match open.last() {
            Some(parent) => self.append_child(*parent, node),
            None => {
                top.push(node);
                Ok(())
            }
        }
    }

    fn flush_text(&mut self, raw: &str, open: &[NodeId], top: &mut Vec<NodeId>) -> DomResult<()> {
        if raw.is_empty() {
            return Ok(());
        }
        let text = self.create_text(&decode_entities(raw));
        self.attach(text, open, top)
    }

    /// Replace the children of `node` with a parsed fragment.
    ///
    /// # Errors
    ///
    /// Propagates parse failures; the children are left untouched on error.
    pub fn set_inner_html(&mut self, node: NodeId, markup: &str) -> DomResult<()> {
        let parsed = self.parse_fragment(markup)?;
        self.clear_children(node);
        for child in parsed {
            self.append_child(node, child)?;
        }
        Ok(())
    }

    /// Serialize the children of a node.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_node(*child, &mut out);
        }
        out
    }

    /// Serialize a node and its light-tree subtree.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        match self.kind(node) {
            NodeKind::Text(text) => escape_into(text, false, out),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::ShadowRoot => {
                for child in self.children(node) {
                    self.write_node(*child, out);
                }
            }
            NodeKind::Element(data) => {
                out.push('<');
                out.push_str(data.tag());
                for (name, value) in data.attributes() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                let style = self.style_text(node);
                if !style.is_empty() {
                    out.push_str(" style=\"");
                    escape_into(&style, true, out);
                    out.push('"');
                }
                out.push('>');
                if is_void(data.tag()) {
                    return;
                }
                for child in self.children(node) {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(data.tag());
                out.push('>');
            }
        }
    }
}

fn find_tag_end(markup: &str, start: usize) -> Result<usize, MarkupError> {
    markup[start..]
        .find('>')
        .map(|offset| start + offset)
        .ok_or(MarkupError::UnterminatedTag { position: start })
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

fn parse_start_tag(markup: &str, start: usize) -> Result<StartTag, MarkupError> {
    let bytes = markup.as_bytes();
    let unterminated = MarkupError::UnterminatedTag { position: start };
    let mut pos = start + 1;
    while pos < bytes.len() && !is_space(bytes[pos]) && bytes[pos] != b'/' && bytes[pos] != b'>' {
        pos += 1;
    }
    let name = markup[start + 1..pos].to_ascii_lowercase();
    let mut attributes: Vec<(String, String)> = Vec::new();

    loop {
        while pos < bytes.len() && is_space(bytes[pos]) {
            pos += 1;
        }
        match bytes.get(pos) {
            None => return Err(unterminated),
            Some(b'>') => {
                return Ok(StartTag {
                    name,
                    attributes,
                    self_closing: false,
                    end: pos + 1,
                });
            }
            Some(b'/') => {
                if bytes.get(pos + 1) == Some(&b'>') {
                    return Ok(StartTag {
                        name,
                        attributes,
                        self_closing: true,
                        end: pos + 2,
                    });
                }
                pos += 1;
                continue;
            }
            Some(_) => {}
        }

        let name_start = pos;
        while pos < bytes.len()
            && !is_space(bytes[pos])
            && !matches!(bytes[pos], b'=' | b'>' | b'/')
        {
            pos += 1;
        }
        let attr_name = markup[name_start..pos].to_ascii_lowercase();
        while pos < bytes.len() && is_space(bytes[pos]) {
            pos += 1;
        }

        let mut value = String::new();
        if bytes.get(pos) == Some(&b'=') {
            pos += 1;
            while pos < bytes.len() && is_space(bytes[pos]) {
                pos += 1;
            }
            match bytes.get(pos) {
                Some(quote @ (b'"' | b'\'')) => {
                    let close = markup[pos + 1..]
                        .find(char::from(*quote))
                        .map(|offset| pos + 1 + offset)
                        .ok_or(MarkupError::UnterminatedAttribute { position: pos })?;
                    value = decode_entities(&markup[pos + 1..close]);
                    pos = close + 1;
                }
                Some(_) => {
                    let value_start = pos;
                    while pos < bytes.len() && !is_space(bytes[pos]) && bytes[pos] != b'>' {
                        pos += 1;
                    }
                    value = decode_entities(&markup[value_start..pos]);
                }
                None => return Err(unterminated),
            }
        }

        if !attributes.iter().any(|(existing, _)| *existing == attr_name) {
            attributes.push((attr_name, value));
        }
    }
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];
        let decoded = rest
            .find(';')
            .filter(|semi| *semi <= 10)
            .and_then(|semi| entity(&rest[1..semi]).map(|ch| (ch, semi)));
        if let Some((ch, semi)) = decoded {
            out.push(ch);
            rest = &rest[semi + 1..];
        } else {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}

fn entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let numeric = name.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn escape_into(raw: &str, attribute: bool, out: &mut String) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            other => out.push(other),
        }
    }
}
