// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// Local Crate Imports
use super::{CodecError, Node, NodeBuilder, TreeWriter};

// Public API ==========================================================================================================

impl Node {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The last value written for `key`
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }
}

impl NodeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes any elements left open and returns every top-level element written
    #[must_use]
    pub fn finish(mut self) -> Vec<Node> {
        while !self.open.is_empty() {
            self.end_element();
        }
        self.finished
    }
}

impl TreeWriter for NodeBuilder {
    fn start_element(&mut self, tag: &str) {
        self.open.push(Node::new(tag));
    }

    // NOTE: Attributes written outside of any element have nowhere to go, so they're dropped
    fn write_attribute(&mut self, key: &str, value: &str) {
        if let Some(node) = self.open.last_mut() {
            node.attributes.push((key.to_owned(), value.to_owned()));
        }
    }

    fn end_element(&mut self) {
        let Some(node) = self.open.pop() else {
            return;
        };
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.finished.push(node),
        }
    }
}

// Crate API ===========================================================================================================

impl Node {
    pub(crate) fn expect_tag(&self, expected: &'static str) -> Result<(), CodecError> {
        if self.tag == expected {
            Ok(())
        } else {
            Err(CodecError::UnexpectedTag {
                expected,
                found: self.tag.clone(),
            })
        }
    }

    pub(crate) fn required(&self, key: &'static str) -> Result<&str, CodecError> {
        self.attribute(key).ok_or_else(|| CodecError::MissingAttribute {
            tag: self.tag.clone(),
            attribute: key,
        })
    }

    pub(crate) fn invalid(&self, key: &'static str, value: &str) -> CodecError {
        CodecError::InvalidValue {
            tag: self.tag.clone(),
            attribute: key,
            value: value.to_owned(),
        }
    }
}

// Display Trait Implementation ========================================================================================

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl Node {
    fn fmt_indented(&self, f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(f, "{indent}<{}", self.tag)?;
        for (key, value) in &self.attributes {
            write!(f, " {key}=\"{}\"", escape(value))?;
        }

        if self.children.is_empty() {
            return write!(f, "/>");
        }
        writeln!(f, ">")?;
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
            writeln!(f)?;
        }
        write!(f, "{indent}</{}>", self.tag)
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn building_trees() {
        let mut builder = NodeBuilder::new();
        builder.start_element("catalog");
        builder.write_attribute("version", "1");
        builder.start_element("entry");
        builder.write_attribute("selected", "true");
        builder.end_element();
        builder.start_element("entry");
        builder.end_element();
        builder.end_element();

        let nodes = builder.finish();
        assert_eq!(nodes.len(), 1);
        let catalog = &nodes[0];
        assert_eq!(catalog.tag(), "catalog");
        assert_eq!(catalog.attribute("version"), Some("1"));
        assert_eq!(catalog.attribute("missing"), None);
        assert_eq!(catalog.children().len(), 2);
        assert_eq!(catalog.children()[0].attribute("selected"), Some("true"));
        assert_eq!(catalog.children()[1], Node::new("entry"));
    }

    #[test]
    fn unbalanced_writes() {
        let mut builder = NodeBuilder::new();
        builder.write_attribute("lost", "1");
        builder.end_element();
        builder.start_element("outer");
        builder.start_element("inner");
        let nodes = builder.finish();
        assert_eq!(nodes, [Node::new("outer").with_child(Node::new("inner"))]);
    }

    #[test]
    fn later_attributes_win() {
        let node = Node::new("part")
            .with_attribute("mass", "1")
            .with_attribute("mass", "2");
        assert_eq!(node.attribute("mass"), Some("2"));
    }

    #[test]
    fn node_display() {
        let node = Node::new("catalog").with_child(
            Node::new("entry")
                .with_attribute("selected", "false")
                .with_child(Node::new("part").with_attribute("name", "<\"&\">")),
        );
        assert_snapshot!(node.to_string(), @r#"
        <catalog>
          <entry selected="false">
            <part name="&lt;&quot;&amp;&quot;&gt;"/>
          </entry>
        </catalog>
        "#);
    }
}
