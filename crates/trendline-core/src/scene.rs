// File: crates/trendline-core/src/scene.rs
// Summary: Retained element tree (arena of tagged nodes with ordered attributes).
// Notes:
// - Node ids stay valid until the node is removed; removed slots are reused.
// - The root stands for the host container; its children are the content.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize { self.0 }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub tag: &'static str,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(tag: &'static str) -> Self {
        Self { tag, attrs: Vec::new(), text: None, children: Vec::new(), parent: None }
    }

    pub fn attrs(&self) -> &[(String, String)] { &self.attrs }
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
    pub fn text(&self) -> Option<&str> { self.text.as_deref() }
    pub fn children(&self) -> &[NodeId] { &self.children }
    pub fn parent(&self) -> Option<NodeId> { self.parent }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class").is_some_and(|c| c.split_whitespace().any(|x| x == class))
    }
}

#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
    created: usize,
}

impl Default for Document {
    fn default() -> Self { Self::new() }
}

impl Document {
    pub fn new() -> Self {
        Self { nodes: vec![Some(Node::new("root"))], free: Vec::new(), root: NodeId(0), created: 1 }
    }

    pub fn root(&self) -> NodeId { self.root }

    /// Number of nodes ever allocated, including recycled slots.
    pub fn created(&self) -> usize { self.created }

    /// Number of nodes currently alive (root included).
    pub fn live(&self) -> usize { self.nodes.iter().filter(|n| n.is_some()).count() }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool { self.node(id).is_some() }

    /// Allocate a detached node.
    pub fn create(&mut self, tag: &'static str) -> NodeId {
        self.created += 1;
        let node = Some(Node::new(tag));
        match self.free.pop() {
            Some(i) => {
                self.nodes[i] = node;
                NodeId(i)
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.node(child).and_then(Node::parent) {
            if let Some(p) = self.node_mut(old) {
                p.children.retain(|c| *c != child);
            }
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
    }

    /// Create a node and append it to `parent`.
    pub fn append_new(&mut self, parent: NodeId, tag: &'static str) -> NodeId {
        let id = self.create(tag);
        self.append(parent, id);
        id
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(n) = self.node_mut(id) {
            match n.attrs.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value,
                None => n.attrs.push((name.to_string(), value)),
            }
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.attr(name))
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(n) = self.node_mut(id) {
            n.attrs.retain(|(k, _)| k != name);
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(n) = self.node_mut(id) {
            n.text = Some(text.into());
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).is_some_and(|n| n.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) { return; }
        let next = match self.attr(id, "class") {
            Some(c) if !c.is_empty() => format!("{c} {class}"),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", next);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(current) = self.attr(id, "class") else { return };
        let next = current.split_whitespace().filter(|c| *c != class).collect::<Vec<_>>().join(" ");
        self.set_attr(id, "class", next);
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    /// Remove a node and its subtree.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root { return self.clear(); }
        if let Some(parent) = self.node(id).and_then(Node::parent) {
            if let Some(p) = self.node_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        self.release(id);
    }

    pub fn remove_children(&mut self, id: NodeId) {
        let kids = match self.node_mut(id) {
            Some(n) => std::mem::take(&mut n.children),
            None => return,
        };
        for k in kids {
            self.release(k);
        }
    }

    /// Drop all content under the root.
    pub fn clear(&mut self) {
        let root = self.root;
        self.remove_children(root);
    }

    fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(n) = self.nodes.get_mut(cur.0).and_then(Option::take) {
                stack.extend(n.children);
                self.free.push(cur.0);
            }
        }
    }

    /// Depth-first search for descendants of `from` carrying `class`.
    pub fn select_all(&self, from: NodeId, class: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(from).iter().rev().copied().collect();
        while let Some(cur) = stack.pop() {
            if self.has_class(cur, class) {
                out.push(cur);
            }
            stack.extend(self.children(cur).iter().rev().copied());
        }
        out
    }

    pub fn select(&self, from: NodeId, class: &str) -> Option<NodeId> {
        self.select_all(from, class).into_iter().next()
    }

    /// Descendants of `from` with the given tag, in document order.
    pub fn select_tag(&self, from: NodeId, tag: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(from).iter().rev().copied().collect();
        while let Some(cur) = stack.pop() {
            if self.node(cur).is_some_and(|n| n.tag == tag) {
                out.push(cur);
            }
            stack.extend(self.children(cur).iter().rev().copied());
        }
        out
    }
}
