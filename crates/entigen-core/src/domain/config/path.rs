//! Qualified node paths used in diagnostics.

use std::fmt;

/// The kind of a configuration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Entity,
    Property,
    Operation,
    Parameter,
    Const,
}

impl NodeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Entity => "Entity",
            Self::Property => "Property",
            Self::Operation => "Operation",
            Self::Parameter => "Parameter",
            Self::Const => "Const",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Segment {
    kind: NodeKind,
    name: String,
}

/// Ancestry of a node, assigned once when the tree is built.
///
/// This is the node's up-link: it observes the chain of owners without
/// owning any of them, and renders as `Entity(Person).Operation(Get)`.
/// The root itself renders as `Root`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<Segment>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of a child node of this one.
    pub fn child(&self, kind: NodeKind, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment {
            kind,
            name: name.into(),
        });
        Self { segments }
    }

    /// Path of the owning node, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn kind(&self) -> NodeKind {
        self.segments.last().map_or(NodeKind::Root, |s| s.kind)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("Root");
        }
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}({})", seg.kind, seg.name)?;
        }
        Ok(())
    }
}

/// Name used for a path segment: the node's name, or its position when the
/// name is missing (the missing name is reported during preparation).
pub(crate) fn segment_name(name: Option<&str>, index: usize) -> String {
    match name {
        Some(n) if !n.trim().is_empty() => n.to_string(),
        _ => format!("#{index}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_qualified_names() {
        let path = NodePath::root()
            .child(NodeKind::Entity, "Person")
            .child(NodeKind::Operation, "Get")
            .child(NodeKind::Parameter, "Id");

        assert_eq!(path.to_string(), "Entity(Person).Operation(Get).Parameter(Id)");
        assert_eq!(path.kind(), NodeKind::Parameter);
        assert_eq!(
            path.parent().map(|p| p.to_string()).as_deref(),
            Some("Entity(Person).Operation(Get)")
        );
    }

    #[test]
    fn root_renders_as_root() {
        assert_eq!(NodePath::root().to_string(), "Root");
        assert!(NodePath::root().parent().is_none());
    }

    #[test]
    fn missing_names_fall_back_to_position() {
        assert_eq!(segment_name(None, 2), "#2");
        assert_eq!(segment_name(Some("  "), 0), "#0");
        assert_eq!(segment_name(Some("Person"), 0), "Person");
    }
}
