//! Minimal XML element tree
//!
//! Device replies are small flat documents such as
//! `<response><SignalIcon>4</SignalIcon>...</response>`, so a plain owned
//! tree built from quick-xml events is all that is needed. Attributes,
//! comments and processing instructions are dropped.

use quick_xml::events::Event;
use quick_xml::Reader;
use super::errors::XmlError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of the first direct child with the given name
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn root(&self) -> &Element {
        &self.root
    }
}

/// Parse raw text into a [`Document`]
///
/// Fails on malformed markup, mismatched or unclosed tags, an empty input,
/// text outside the root and more than one top-level element.
pub fn parse(raw: &str) -> Result<Document, XmlError> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                stack.push(Element::new(name));
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                attach(&mut stack, &mut root, Element::new(name))?;
            }
            Event::End(_) => {
                // quick-xml validates end names, so the top of the stack is the match
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element)?;
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(c) => {
                append_text(&mut stack, &String::from_utf8_lossy(&c.into_inner()))?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }

    root.map(|root| Document { root }).ok_or(XmlError::NoRoot)
}

/// Text belongs to the open element; outside the root only whitespace is allowed
fn append_text(stack: &mut [Element], text: &str) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlError::StrayText(text.trim().to_string())),
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }

    if root.is_some() {
        return Err(XmlError::TrailingElement(element.name));
    }
    *root = Some(element);
    Ok(())
}
