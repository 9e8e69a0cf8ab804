//! Ordered element tree with path navigation.
//!
//! Paths are `/`-separated child element names relative to an element
//! (`DeviceChain/Mixer/Volume`). Child positions used by [`Element::nth_child`]
//! and [`Element::insert_child`] count element children only; text, comments
//! and CDATA keep their place between them.

/// Attribute holding every scalar value in the document.
pub const VALUE_ATTR: &str = "Value";
/// Attribute holding document-unique integer identifiers.
pub const ID_ATTR: &str = "Id";
/// Child element carrying the non-automated value of an automatable parameter.
pub const MANUAL: &str = "Manual";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
    /// `<?target content?>`, stored without the delimiters
    ProcessingInstruction(String),
    /// `<!DOCTYPE ...>` body; only valid outside the root element
    DocType(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    nodes: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.nodes.push(Node::Element(child));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, keeping its original position if it already exists.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn children_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Element> {
        self.nodes.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child_count(&self) -> usize {
        self.children().count()
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children_mut().find(|c| c.name == name)
    }

    /// Element child at an element-only position.
    pub fn nth_child(&self, index: usize) -> Option<&Element> {
        self.children().nth(index)
    }

    pub fn nth_child_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.children_mut().nth(index)
    }

    /// The `n`th (0-based) child element with the given name.
    pub fn nth_named(&self, name: &str, n: usize) -> Option<&Element> {
        self.children().filter(|c| c.name == name).nth(n)
    }

    pub fn nth_named_mut(&mut self, name: &str, n: usize) -> Option<&mut Element> {
        self.children_mut().filter(|c| c.name == name).nth(n)
    }

    /// Follow a relative path of child names. An empty path is `self`.
    pub fn find(&self, path: &str) -> Option<&Element> {
        let mut current = self;
        for part in path_parts(path) {
            current = current.child(part)?;
        }
        Some(current)
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut Element> {
        let mut current = self;
        for part in path_parts(path) {
            current = current.child_mut(part)?;
        }
        Some(current)
    }

    /// First match of `path` rooted at any descendant (or `self`), in document order.
    pub fn find_descendant(&self, path: &str) -> Option<&Element> {
        self.descendants().find_map(|e| e.find(path))
    }

    pub fn find_descendant_mut(&mut self, path: &str) -> Option<&mut Element> {
        let route = self.descendant_route(path)?;
        let mut current = self;
        for index in route {
            current = current.nth_child_mut(index)?;
        }
        current.find_mut(path)
    }

    /// Element-index route from `self` to the first descendant where `path` resolves.
    fn descendant_route(&self, path: &str) -> Option<Vec<usize>> {
        if self.find(path).is_some() {
            return Some(Vec::new());
        }
        for (i, child) in self.children().enumerate() {
            if let Some(mut route) = child.descendant_route(path) {
                route.insert(0, i);
                return Some(route);
            }
        }
        None
    }

    /// Pre-order traversal including `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Insert an element child at an element-only position; past the end appends.
    pub fn insert_child(&mut self, index: usize, child: Element) {
        let node_index = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| matches!(n, Node::Element(_)))
            .nth(index)
            .map(|(i, _)| i);
        match node_index {
            Some(i) => self.nodes.insert(i, Node::Element(child)),
            None => self.nodes.push(Node::Element(child)),
        }
    }

    pub fn push_child(&mut self, child: Element) {
        self.nodes.push(Node::Element(child));
    }

    /// Read a parameter value at `path`: the `Value` of its `Manual` child when
    /// present, otherwise the element's own `Value`.
    pub fn param_value(&self, path: &str) -> Option<&str> {
        let target = self.find(path)?;
        match target.child(MANUAL) {
            Some(manual) => manual.attr(VALUE_ATTR),
            None => target.attr(VALUE_ATTR),
        }
    }

    /// Resolve the writable value location of the parameter at `path`.
    ///
    /// Automatable parameters are written through their `Manual` child; plain
    /// ones through their own `Value`. Elements with neither are not writable.
    pub fn value_slot_mut(&mut self, path: &str) -> Option<ValueSlot<'_>> {
        let target = self.find_mut(path)?;
        if target.child(MANUAL).is_some() {
            return target.child_mut(MANUAL).map(|holder| ValueSlot { holder });
        }
        if target.attr(VALUE_ATTR).is_some() {
            return Some(ValueSlot { holder: target });
        }
        None
    }

    /// Highest integer `Id` anywhere in this subtree, or 0 when there is none.
    pub fn max_id(&self) -> i64 {
        self.descendants()
            .filter_map(|e| e.attr(ID_ATTR))
            .filter_map(|v| v.trim().parse::<i64>().ok())
            .max()
            .unwrap_or(0)
            .max(0)
    }

    /// Renumber every `Id` attribute in this subtree in pre-order starting at
    /// `next`. Returns the next unused identifier.
    pub fn remap_ids(&mut self, next: i64) -> i64 {
        let mut next = next;
        if self.attr(ID_ATTR).is_some() {
            self.set_attr(ID_ATTR, next.to_string());
            next += 1;
        }
        for child in self.children_mut() {
            next = child.remap_ids(next);
        }
        next
    }
}

fn path_parts(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|p| !p.is_empty() && *p != ".")
}

pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children().rev());
        Some(element)
    }
}

/// A resolved, writable parameter value.
pub struct ValueSlot<'a> {
    holder: &'a mut Element,
}

impl ValueSlot<'_> {
    pub fn get(&self) -> Option<&str> {
        self.holder.attr(VALUE_ATTR)
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.holder.set_attr(VALUE_ATTR, value);
    }
}
