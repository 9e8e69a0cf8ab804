use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::element::{Element, Node};
use crate::error::ProjectError;

/// A parsed document: the root element plus the comments, processing
/// instructions and doctype found before and after it.
#[derive(Debug, Default)]
pub(crate) struct ParsedXml {
    pub prolog: Vec<Node>,
    pub root: Option<Element>,
    pub epilog: Vec<Node>,
}

impl ParsedXml {
    /// Nodes outside the root go to the prolog until the root closes.
    fn push_outside(&mut self, node: Node) {
        if self.root.is_some() {
            self.epilog.push(node);
        } else {
            self.prolog.push(node);
        }
    }
}

/// Parse XML text into an element tree. Whitespace-only text between
/// elements is kept so the document re-serializes with its original layout;
/// text outside the root element is dropped.
pub(crate) fn parse_xml(xml: &str) -> Result<(Vec<Node>, Element, Vec<Node>), ProjectError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut parsed = ParsedXml::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(open_element(&e)?),
            Event::Empty(e) => {
                let element = open_element(&e)?;
                attach(&mut stack, &mut parsed.root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ProjectError::Structure("unexpected closing tag".into()))?;
                attach(&mut stack, &mut parsed.root, element)?;
            }
            Event::Text(t) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push_node(Node::Text(t.unescape()?.into_owned()));
                }
            }
            Event::CData(c) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                    parent.push_node(Node::CData(text));
                }
            }
            Event::Comment(c) => {
                let node = Node::Comment(String::from_utf8_lossy(&c.into_inner()).into_owned());
                match stack.last_mut() {
                    Some(parent) => parent.push_node(node),
                    None => parsed.push_outside(node),
                }
            }
            Event::PI(pi) => {
                let node = Node::ProcessingInstruction(String::from_utf8_lossy(&pi).into_owned());
                match stack.last_mut() {
                    Some(parent) => parent.push_node(node),
                    None => parsed.push_outside(node),
                }
            }
            Event::DocType(d) => {
                let body = String::from_utf8_lossy(&d).trim_start().to_string();
                parsed.push_outside(Node::DocType(body))
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ProjectError::Structure(format!(
            "unclosed element <{}>",
            open.name()
        )));
    }
    let root = parsed
        .root
        .ok_or_else(|| ProjectError::Structure("document has no root element".into()))?;
    Ok((parsed.prolog, root, parsed.epilog))
}

fn open_element(start: &BytesStart) -> Result<Element, ProjectError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.set_attr(&key, value);
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ProjectError> {
    if let Some(parent) = stack.last_mut() {
        parent.push_node(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(ProjectError::Structure(format!(
            "second root element <{}>",
            element.name()
        )));
    }
    *root = Some(element);
    Ok(())
}
