//! 2D layout of strands and complexes
//!
//! Every laid-out element stores two transforms:
//! - `local`: where the element starts, relative to its parent's frame
//! - `end`: how to get from the element's start to its end, in its own frame
//!
//! Positive x is forwards. Positive y is down, as in SVG, so positive
//! rotations turn clockwise on screen.

use crate::complex::{Chain, Domain, Hairpin, Node, SplitComplex};
use crate::LayoutConfig;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::fmt;
use std::ops::Add;

/// A point, or a vector from the origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Length of the vector from (0, 0) to this position
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Angle of the vector from (0, 0) to this position, 0 rad being +x
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn translate(&self, by: Position) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    /// Rotate around (0, 0)
    pub fn rotate(&self, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    pub fn midpoint(&self, other: Position) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Translation followed by rotation (no scaling)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub translation: Position,
    pub rotation: f64,
}

impl Transform {
    pub fn new(translation: Position, rotation: f64) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn translation(x: f64, y: f64) -> Self {
        Self::new(Position::new(x, y), 0.0)
    }

    /// Map a point from this transform's frame into the parent frame
    pub fn apply(&self, point: Position) -> Position {
        self.translation.translate(point.rotate(self.rotation))
    }
}

/// `a + b` is `a` followed by `b`, where `b` is expressed in the frame `a` ends in
impl Add for Transform {
    type Output = Transform;

    fn add(self, other: Transform) -> Transform {
        Transform::new(self.apply(other.translation), self.rotation + other.rotation)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {:.2} rad", self.translation, self.rotation)
    }
}

/// A laid-out domain
#[derive(Debug, Clone, PartialEq)]
pub struct DomainShape {
    pub name: String,
    /// True for the `*` side of a bound pair
    pub complement: bool,
    pub length: f64,
    /// Radius of the circle this domain was placed on, if any
    pub circle_radius: Option<f64>,
    pub local: Transform,
    pub end: Transform,
}

impl DomainShape {
    fn new(domain: &Domain, complement: bool, config: &LayoutConfig) -> Self {
        Self {
            name: domain.name.clone(),
            complement,
            length: config.domain_length,
            circle_radius: None,
            local: Transform::default(),
            end: Transform::default(),
        }
    }

    /// Angle subtended on the layout circle, if laid out on one
    pub fn circle_theta(&self) -> Option<f64> {
        self.circle_radius.map(|r| self.length / r)
    }

    fn layout(&mut self, circle_radius: Option<f64>) {
        self.circle_radius = circle_radius.filter(|r| *r > 0.0);
        self.end = match self.circle_radius {
            Some(r) => {
                let theta = self.length / r;
                Transform::new(
                    Position::new(r * theta.sin(), r * (1.0 - theta.cos())),
                    theta,
                )
            }
            None => Transform::new(Position::new(0.0, -self.length), -FRAC_PI_2),
        };
    }
}

/// A laid-out hairpin: a stem of two bound domains around a circular loop
#[derive(Debug, Clone, PartialEq)]
pub struct HairpinShape {
    pub pre: DomainShape,
    pub inner: ChainShape,
    pub post: DomainShape,
    pub gap: f64,
    pub local: Transform,
    pub end: Transform,
}

impl HairpinShape {
    fn new(hairpin: &Hairpin, config: &LayoutConfig) -> Self {
        Self {
            pre: DomainShape::new(&hairpin.pre, false, config),
            inner: ChainShape::new(&hairpin.inner, config),
            post: DomainShape::new(&hairpin.post, true, config),
            gap: config.bound_gap,
            local: Transform::default(),
            end: Transform::default(),
        }
    }

    fn layout(&mut self) {
        self.pre.layout(None);
        self.pre.local = Transform::default();

        self.post.layout(None);
        self.post.local = Transform::new(Position::new(self.gap, -self.post.length), PI);

        self.inner.layout(true);

        // Turn the loop so its start-to-end chord runs back across the stem
        let inner_angle_error = PI - self.inner.end.translation.angle();
        self.inner.local = Transform::new(
            Position::new(0.0, -self.pre.length),
            PI + inner_angle_error,
        );

        self.end = Transform::translation(self.gap, 0.0);
    }
}

/// A laid-out split complex: a stem of two bound domains with up to two
/// single-stranded overhangs where the strands separate
#[derive(Debug, Clone, PartialEq)]
pub struct SplitShape {
    pub pre: DomainShape,
    pub left: Option<ChainShape>,
    pub right: Option<ChainShape>,
    pub post: DomainShape,
    pub gap: f64,
    pub local: Transform,
    pub end: Transform,
}

impl SplitShape {
    fn new(split: &SplitComplex, config: &LayoutConfig) -> Self {
        Self {
            pre: DomainShape::new(&split.pre, false, config),
            left: split.left.as_ref().map(|c| ChainShape::new(c, config)),
            right: split.right.as_ref().map(|c| ChainShape::new(c, config)),
            post: DomainShape::new(&split.post, true, config),
            gap: config.bound_gap,
            local: Transform::default(),
            end: Transform::default(),
        }
    }

    fn layout(&mut self) {
        self.pre.layout(None);
        self.pre.local = Transform::default();

        self.post.layout(None);
        self.post.local = Transform::new(Position::new(self.gap, -self.post.length), PI);

        // Splay the overhangs apart when both are present
        let splay = if self.left.is_some() && self.right.is_some() {
            FRAC_PI_4
        } else {
            0.0
        };

        if let Some(left) = &mut self.left {
            left.layout(false);
            left.local = Transform::new(Position::new(0.0, -self.pre.length), -splay);
        }
        if let Some(right) = &mut self.right {
            right.layout(false);
            right.local = Transform::new(Position::new(self.gap, -self.post.length), splay);
        }

        self.end = Transform::translation(self.gap, 0.0);
    }
}

/// Element of a laid-out chain
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Domain(DomainShape),
    Hairpin(HairpinShape),
    Split(SplitShape),
}

impl Shape {
    fn new(node: &Node, config: &LayoutConfig) -> Self {
        match node {
            Node::Domain(d) => Shape::Domain(DomainShape::new(d, false, config)),
            Node::Hairpin(h) => Shape::Hairpin(HairpinShape::new(h, config)),
            Node::SplitComplex(s) => Shape::Split(SplitShape::new(s, config)),
        }
    }

    /// Distance covered between start and end when placed on a circle.
    ///
    /// For a domain this is its arc length. Bound structures report the
    /// straight-line gap between their stem domains instead.
    pub fn start_to_end(&self) -> f64 {
        match self {
            Shape::Domain(d) => d.length,
            Shape::Hairpin(h) => h.gap,
            Shape::Split(s) => s.gap,
        }
    }

    fn layout(&mut self, circle_radius: Option<f64>) {
        match self {
            Shape::Domain(d) => d.layout(circle_radius),
            Shape::Hairpin(h) => h.layout(),
            Shape::Split(s) => s.layout(),
        }
    }

    pub fn local(&self) -> Transform {
        match self {
            Shape::Domain(d) => d.local,
            Shape::Hairpin(h) => h.local,
            Shape::Split(s) => s.local,
        }
    }

    fn set_local(&mut self, local: Transform) {
        match self {
            Shape::Domain(d) => d.local = local,
            Shape::Hairpin(h) => h.local = local,
            Shape::Split(s) => s.local = local,
        }
    }

    pub fn end(&self) -> Transform {
        match self {
            Shape::Domain(d) => d.end,
            Shape::Hairpin(h) => h.end,
            Shape::Split(s) => s.end,
        }
    }
}

/// A laid-out chain
#[derive(Debug, Clone, PartialEq)]
pub struct ChainShape {
    pub within: Vec<Shape>,
    pub gap: f64,
    /// Radius used for a circular layout
    pub radius: Option<f64>,
    pub local: Transform,
    pub end: Transform,
}

impl ChainShape {
    fn new(chain: &Chain, config: &LayoutConfig) -> Self {
        Self {
            within: chain.within.iter().map(|n| Shape::new(n, config)).collect(),
            gap: config.bound_gap,
            radius: None,
            local: Transform::default(),
            end: Transform::default(),
        }
    }

    /// Radius of the circle the chain's elements are placed on.
    ///
    /// Arc lengths (domains) and chord lengths (bound structures) are summed
    /// as if both were arcs. This is close enough while the gap is much
    /// smaller than the domain length.
    pub fn inner_radius(&self) -> f64 {
        let circumference: f64 =
            self.within.iter().map(Shape::start_to_end).sum::<f64>() + self.gap;
        circumference / (2.0 * PI)
    }

    /// Place elements end to end, on a circle if `circular`
    fn layout(&mut self, circular: bool) {
        let radius = circular.then(|| self.inner_radius());
        self.radius = radius;

        let mut cursor = Transform::default();
        for shape in &mut self.within {
            shape.layout(self.radius);
            shape.set_local(cursor);
            cursor = cursor + shape.end();
        }

        self.end = cursor;
    }
}

/// Build and lay out the geometry for a parsed chain. The root chain is
/// placed on a circle.
pub fn layout(chain: &Chain, config: &LayoutConfig) -> ChainShape {
    let mut shape = ChainShape::new(chain, config);
    shape.layout(true);
    shape
}
