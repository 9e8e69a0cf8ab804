use std::borrow::Cow;
use std::io::Write;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::element::{Element, Node};
use crate::error::ProjectError;

/// Serialize a document as UTF-8 XML with a declaration. Nodes outside the
/// root element are written one per line around it.
pub(crate) fn write_xml(
    prolog: &[Node],
    root: &Element,
    epilog: &[Node],
) -> Result<Vec<u8>, ProjectError> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    newline(&mut writer)?;
    for node in prolog {
        write_node(&mut writer, node)?;
        newline(&mut writer)?;
    }
    write_element(&mut writer, root)?;
    newline(&mut writer)?;
    for node in epilog {
        write_node(&mut writer, node)?;
        newline(&mut writer)?;
    }
    Ok(writer.into_inner())
}

fn newline<W: Write>(writer: &mut Writer<W>) -> Result<(), ProjectError> {
    writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
    Ok(())
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<(), ProjectError> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        let escaped = escape_attr(value);
        start.push_attribute((key.as_bytes(), escaped.as_bytes()));
    }

    if element.nodes().is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for node in element.nodes() {
        write_node(writer, node)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name())))?;
    Ok(())
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<(), ProjectError> {
    match node {
        Node::Element(child) => write_element(writer, child)?,
        Node::Text(text) => {
            writer.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?
        }
        Node::Comment(text) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?
        }
        Node::CData(text) => writer.write_event(Event::CData(BytesCData::new(text.as_str())))?,
        Node::ProcessingInstruction(text) => {
            writer.write_event(Event::PI(BytesPI::new(text.as_str())))?
        }
        Node::DocType(text) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(text.as_str())))?
        }
    }
    Ok(())
}

fn escape_text(text: &str) -> Cow<'_, str> {
    escape(text, false)
}

fn escape_attr(text: &str) -> Cow<'_, str> {
    escape(text, true)
}

fn escape(text: &str, attribute: bool) -> Cow<'_, str> {
    let needs = |c: char| match c {
        '&' | '<' | '>' => true,
        '"' | '\n' | '\r' | '\t' => attribute,
        _ => false,
    };
    if !text.chars().any(needs) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' if attribute => out.push_str("&#13;"),
            '\t' if attribute => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_text("a & b < c"), "a &amp; b &lt; c");
        assert_eq!(escape_text("say \"hi\""), "say \"hi\"");
        assert_eq!(escape_attr("say \"hi\"\n"), "say &quot;hi&quot;&#10;");
        assert!(matches!(escape_attr("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn childless_elements_are_self_closing() {
        let root = Element::new("Devices").with_attr("Id", "3");
        let xml = String::from_utf8(write_xml(&[], &root, &[]).unwrap()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains("<Devices Id=\"3\"/>"));
    }
}
