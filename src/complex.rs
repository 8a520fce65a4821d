//! Syntax tree for strands and complexes

use serde::Serialize;
use std::fmt;

/// A named domain, e.g. `a` or its complement `a*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Domain {
    pub name: String,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The complementary domain: same name with `*` appended
    pub fn complement(&self) -> Self {
        Self::new(format!("{}*", self.name))
    }
}

/// `pre( inner )`: `pre` binds its complement around a single-stranded loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hairpin {
    pub pre: Domain,
    pub inner: Chain,
    pub post: Domain,
}

/// `pre( left + right )`: `pre` binds its complement across a strand break.
/// Either overhang may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitComplex {
    pub pre: Domain,
    pub left: Option<Chain>,
    pub right: Option<Chain>,
    pub post: Domain,
}

/// Element of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Node {
    Domain(Domain),
    Hairpin(Hairpin),
    SplitComplex(SplitComplex),
}

/// Sequence of elements laid end to end
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chain {
    pub within: Vec<Node>,
}

impl Chain {
    pub fn new(within: Vec<Node>) -> Self {
        Self { within }
    }

    pub fn len(&self) -> usize {
        self.within.len()
    }

    pub fn is_empty(&self) -> bool {
        self.within.is_empty()
    }
}

impl Hairpin {
    pub fn new(pre: Domain, inner: Chain) -> Self {
        let post = pre.complement();
        Self { pre, inner, post }
    }
}

impl SplitComplex {
    pub fn new(pre: Domain, left: Option<Chain>, right: Option<Chain>) -> Self {
        let post = pre.complement();
        Self {
            pre,
            left,
            right,
            post,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Hairpin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}( {} )", self.pre, self.inner)
    }
}

impl fmt::Display for SplitComplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.left, &self.right) {
            (Some(left), Some(right)) => write!(f, "{}( {} + {} )", self.pre, left, right),
            (Some(left), None) => write!(f, "{}( {} + )", self.pre, left),
            (None, Some(right)) => write!(f, "{}( + {} )", self.pre, right),
            (None, None) => write!(f, "{}( + )", self.pre),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Domain(d) => d.fmt(f),
            Node::Hairpin(h) => h.fmt(f),
            Node::SplitComplex(s) => s.fmt(f),
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.within.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            node.fmt(f)?;
        }
        Ok(())
    }
}
