//! A small element tree over `quick-xml` events.
//!
//! The interface document is read once, so a plain owned tree is enough.
//! Every element keeps the byte range of its start tag for diagnostics.

use std::ops::Range;

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, ScriptingError};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<XmlElement>,
    /// Concatenated text and CDATA content.
    pub text: String,
    pub span: Range<usize>,
}

impl XmlElement {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// First child named `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

fn invalid(position: u64, detail: impl std::fmt::Display) -> ScriptingError {
    ScriptingError::InvalidDocument(format!("at byte {}: {}", position, detail))
}

fn open(start: &BytesStart<'_>, span: Range<usize>, position: u64) -> Result<XmlElement> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| invalid(position, e))?
        .to_string();
    let mut attributes = IndexMap::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| invalid(position, e))?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|e| invalid(position, e))?
            .to_string();
        let value = attribute
            .unescape_value()
            .map_err(|e| invalid(position, e))?
            .into_owned();
        attributes.insert(key, value);
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
        span,
    })
}

/// Parse a document and return its root element.
pub fn parse_xml(source: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        let start = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|e| invalid(reader.error_position() as u64, e))?;
        let end = reader.buffer_position() as u64;
        let span = start as usize..end as usize;
        match event {
            Event::Start(tag) => stack.push(open(&tag, span, start)?),
            Event::Empty(tag) => {
                let element = open(&tag, span, start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => return Err(invalid(start, "more than one root element")),
                }
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| invalid(start, "unbalanced end tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => return Err(invalid(start, "more than one root element")),
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let text = text.unescape().map_err(|e| invalid(start, e))?;
                    current.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    let data = data.into_inner();
                    let text = std::str::from_utf8(&data).map_err(|e| invalid(start, e))?;
                    current.text.push_str(text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(invalid(source.len() as u64, "unclosed element"));
    }
    root.ok_or_else(|| invalid(0, "no root element"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree() {
        let source = r#"<?xml version="1.0"?>
<omcInterface omcVersion="1.22">
  <classes>
    <function id="P.f" comment="a &amp; b"><code><![CDATA[function f end f;]]></code></function>
    <record id="P.R"/>
  </classes>
</omcInterface>"#;
        let root = parse_xml(source).unwrap();
        assert_eq!(root.name, "omcInterface");
        assert_eq!(root.attribute("omcVersion"), Some("1.22"));
        let classes = root.child("classes").unwrap();
        assert_eq!(classes.children.len(), 2);
        let f = &classes.children[0];
        assert_eq!(f.attribute("comment"), Some("a & b"));
        assert_eq!(f.child("code").unwrap().text, "function f end f;");
        assert!(source[f.span.clone()].starts_with("<function"));
        assert_eq!(classes.children_named("record").count(), 1);
    }

    #[test]
    fn test_escaped_text() {
        let root = parse_xml("<a><code>x &lt; 1</code></a>").unwrap();
        assert_eq!(root.child("code").unwrap().text, "x < 1");
    }

    #[test]
    fn test_invalid_documents() {
        assert!(parse_xml("").is_err());
        assert!(parse_xml("<a><b></a>").is_err());
        assert!(parse_xml("<a>").is_err());
    }
}
