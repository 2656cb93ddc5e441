//! Minimal namespace-aware XML element tree.
//!
//! The manifest formats we validate are attribute-heavy and small, so a
//! plain owned tree built from a single streaming pass is enough. Text
//! content is not retained.

use std::io::BufRead;

use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

/// One element of the parsed manifest document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Resolved namespace URI, if the element is in a namespace.
    pub namespace: Option<String>,
    /// Local element name without prefix.
    pub local_name: String,
    /// Declared attributes, namespace declarations excluded.
    pub attributes: Vec<XmlAttribute>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

/// One attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Resolved namespace URI; `None` for unprefixed attributes.
    pub namespace: Option<String>,
    /// Local attribute name without prefix.
    pub local_name: String,
    /// Unescaped attribute value.
    pub value: String,
}

impl XmlElement {
    /// Whether this element has the given namespace and local name.
    #[must_use]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == Some(namespace)
    }

    /// Looks up an unprefixed attribute value.
    #[must_use]
    pub fn attr(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Looks up a namespaced attribute value.
    #[must_use]
    pub fn attr_ns(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Child elements with the given namespace and local name.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.is(namespace, local_name))
    }

    /// Depth-first descendants with the given namespace and local name,
    /// in document order.
    #[must_use]
    pub fn descendants_named(&self, namespace: &str, local_name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        collect_descendants(self, namespace, local_name, &mut found);
        found
    }
}

fn collect_descendants<'a>(
    element: &'a XmlElement,
    namespace: &str,
    local_name: &str,
    found: &mut Vec<&'a XmlElement>,
) {
    for child in &element.children {
        if child.is(namespace, local_name) {
            found.push(child);
        }
        collect_descendants(child, namespace, local_name, found);
    }
}

fn namespace_of(resolution: &ResolveResult<'_>) -> Option<String> {
    match resolution {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    }
}

fn build_element<R: BufRead>(
    reader: &NsReader<R>,
    namespace: Option<String>,
    start: &BytesStart<'_>,
) -> Result<XmlElement, String> {
    let local_name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| format!("bad attribute on <{local_name}>: {e}"))?;
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let (attr_resolution, attr_local) = reader.resolve_attribute(attr.key);
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|e| format!("bad attribute value on <{local_name}>: {e}"))?;
        attributes.push(XmlAttribute {
            namespace: namespace_of(&attr_resolution),
            local_name: String::from_utf8_lossy(attr_local.as_ref()).into_owned(),
            value: value.into_owned(),
        });
    }

    Ok(XmlElement {
        namespace,
        local_name,
        attributes,
        children: Vec::new(),
    })
}

/// Parses a document into its root element.
///
/// # Errors
///
/// Returns a diagnostic message for any well-formedness problem:
/// syntax errors, mismatched tags, missing or multiple root elements.
pub fn parse_tree<R: BufRead>(input: R) -> Result<XmlElement, String> {
    let mut reader = NsReader::from_reader(input);
    let mut buf = Vec::new();

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let (resolution, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|e| e.to_string())?;
        let namespace = namespace_of(&resolution);
        match event {
            Event::Start(start) => {
                let element = build_element(&reader, namespace, &start)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = build_element(&reader, namespace, &start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or("unexpected closing tag")?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err("unexpected end of document inside an element".to_owned());
    }
    root.ok_or_else(|| "document has no root element".to_owned())
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_some() {
        Err("document has multiple root elements".to_owned())
    } else {
        *root = Some(element);
        Ok(())
    }
}
