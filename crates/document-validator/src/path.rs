//! Structural locators attached to every finding
//!
//! A [`Path`] is an ordered list of [`Segment`]s. Paths are immutable: each
//! child call receives a fresh path built with [`Path::join`] (or one of its
//! shorthands), so sibling branches of a tree walk never share a mutable path.
//!
//! Rendering is fixed and stable since callers key off it literally:
//!
//! | segment            | rendered |
//! |--------------------|----------|
//! | root               | `$`      |
//! | schema property    | `.minimum` |
//! | map field          | `.{name}` |
//! | list index         | `.[3]`   |
//! | list element specs | `.[]`    |
//! | tuple position     | `.<1>`   |

use serde::{Serialize, Serializer};
use std::fmt;

/// One step of a [`Path`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A property of a schema node (`minimum`, `length`, `fields`...)
    Property(String),
    /// A field of a map, in a schema or in a value
    Field(String),
    /// An element of a list value
    Index(usize),
    /// The element schema of a list
    Element,
    /// A position of a tuple, in a schema or in a value
    Position(usize),
}

impl Segment {
    /// Whether this segment descends into a nested node (as opposed to
    /// pointing at a property of the current one)
    pub fn is_structural(&self) -> bool {
        !matches!(self, Segment::Property(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Property(name) => write!(f, "{}", name),
            Segment::Field(name) => write!(f, "{{{}}}", name),
            Segment::Index(index) => write!(f, "[{}]", index),
            Segment::Element => write!(f, "[]"),
            Segment::Position(index) => write!(f, "<{}>", index),
        }
    }
}

/// Location of a node inside a schema or a value tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Marker rendered for the root path
    pub const ROOT: &'static str = "$";

    /// The empty path
    pub fn root() -> Self {
        Self::default()
    }

    /// Return a new path with `segment` appended; `self` is left untouched
    pub fn join(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self { segments }
    }

    pub fn property(&self, name: impl Into<String>) -> Self {
        self.join(Segment::Property(name.into()))
    }

    pub fn field(&self, name: impl Into<String>) -> Self {
        self.join(Segment::Field(name.into()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.join(Segment::Index(index))
    }

    pub fn element(&self) -> Self {
        self.join(Segment::Element)
    }

    pub fn position(&self, index: usize) -> Self {
        self.join(Segment::Position(index))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Nesting depth of the node this path points at
    pub fn depth(&self) -> usize {
        self.segments.iter().filter(|s| s.is_structural()).count()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::ROOT)?;
        for segment in &self.segments {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
