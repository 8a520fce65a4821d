//! SVG rendering of laid-out complexes

use crate::geometry::{ChainShape, DomainShape, Position, Shape, Transform};
use crate::RenderConfig;
use std::f64::consts::{FRAC_PI_2, PI};

/// One drawn domain in world coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,
    pub complement: bool,
    pub start: Position,
    pub end: Position,
    /// Point half way along the domain, used for labels and bounds
    pub mid: Position,
    /// Set when the domain follows a circular arc
    pub arc: Option<Arc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub radius: f64,
    pub large: bool,
    pub center: Position,
    /// Direction from the center to the start point
    pub start_angle: f64,
    pub sweep: f64,
}

impl Arc {
    /// Points where the arc reaches furthest along either axis
    pub fn extremes(&self) -> Vec<Position> {
        let first = (self.start_angle / FRAC_PI_2).ceil() as i64;
        let last = ((self.start_angle + self.sweep) / FRAC_PI_2).floor() as i64;
        (first..=last)
            .map(|k| {
                let (sin, cos) = (k as f64 * FRAC_PI_2).sin_cos();
                self.center
                    .translate(Position::new(self.radius * cos, self.radius * sin))
            })
            .collect()
    }
}

/// Bounding box of the drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Position,
    pub max: Position,
}

impl Bounds {
    fn around(points: impl IntoIterator<Item = Position>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for p in points {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Walks a laid-out tree and collects world-space segments
pub struct SvgRenderer<'a> {
    config: &'a RenderConfig,
    segments: Vec<Segment>,
}

impl<'a> SvgRenderer<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            segments: Vec::new(),
        }
    }

    /// Segments collected so far
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Collect every domain of `root`, starting at the configured origin
    pub fn visit_root(&mut self, root: &ChainShape) {
        let origin = Transform::translation(self.config.origin_x, self.config.origin_y);
        self.visit_chain(root, origin);
    }

    fn visit_chain(&mut self, chain: &ChainShape, parent: Transform) {
        let world = parent + chain.local;
        for shape in &chain.within {
            self.visit_shape(shape, world);
        }
    }

    fn visit_shape(&mut self, shape: &Shape, parent: Transform) {
        match shape {
            Shape::Domain(d) => self.visit_domain(d, parent + d.local),
            Shape::Hairpin(h) => {
                let world = parent + h.local;
                self.visit_domain(&h.pre, world + h.pre.local);
                self.visit_domain(&h.post, world + h.post.local);
                self.visit_chain(&h.inner, world);
            }
            Shape::Split(s) => {
                let world = parent + s.local;
                self.visit_domain(&s.pre, world + s.pre.local);
                self.visit_domain(&s.post, world + s.post.local);
                if let Some(left) = &s.left {
                    self.visit_chain(left, world);
                }
                if let Some(right) = &s.right {
                    self.visit_chain(right, world);
                }
            }
        }
    }

    fn visit_domain(&mut self, domain: &DomainShape, world: Transform) {
        let start = world.translation;
        let end = world.apply(domain.end.translation);

        let (mid, arc) = match (domain.circle_radius, domain.circle_theta()) {
            (Some(radius), Some(theta)) => {
                let half = theta / 2.0;
                let local_mid = Position::new(radius * half.sin(), radius * (1.0 - half.cos()));
                (
                    world.apply(local_mid),
                    Some(Arc {
                        radius,
                        large: theta > PI,
                        center: world.apply(Position::new(0.0, radius)),
                        start_angle: world.rotation - FRAC_PI_2,
                        sweep: theta,
                    }),
                )
            }
            _ => (start.midpoint(end), None),
        };

        self.segments.push(Segment {
            name: domain.name.clone(),
            complement: domain.complement,
            start,
            end,
            mid,
            arc,
        });
    }

    /// Bounds of every collected segment
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::around(self.segments.iter().flat_map(|s| {
            let mut points = vec![s.start, s.end, s.mid];
            if let Some(arc) = &s.arc {
                points.extend(arc.extremes());
            }
            points
        }))
    }

    /// Emit a standalone SVG document for the collected segments
    pub fn finish(&self) -> String {
        let margin = self.config.margin;
        let bounds = self.bounds().unwrap_or(Bounds {
            min: Position::default(),
            max: Position::default(),
        });
        let width = bounds.width() + 2.0 * margin;
        let height = bounds.height() + 2.0 * margin;

        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{:.2} {:.2} {:.2} {:.2}\" width=\"{:.2}\" height=\"{:.2}\">\n",
            bounds.min.x - margin,
            bounds.min.y - margin,
            width,
            height,
            width,
            height
        );

        svg.push_str(&format!(
            "<g fill=\"none\" stroke-width=\"{}\" stroke-linecap=\"round\">\n",
            self.config.stroke_width
        ));
        for segment in &self.segments {
            let stroke = if segment.complement {
                &self.config.complement_stroke
            } else {
                &self.config.stroke
            };
            let stroke = escape_xml(stroke);
            match segment.arc {
                Some(arc) => svg.push_str(&format!(
                    "<path d=\"M {:.2} {:.2} A {:.2} {:.2} 0 {} 1 {:.2} {:.2}\" stroke=\"{}\"/>\n",
                    segment.start.x,
                    segment.start.y,
                    arc.radius,
                    arc.radius,
                    u8::from(arc.large),
                    segment.end.x,
                    segment.end.y,
                    stroke
                )),
                None => svg.push_str(&format!(
                    "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\"/>\n",
                    segment.start.x, segment.start.y, segment.end.x, segment.end.y, stroke
                )),
            }
        }
        svg.push_str("</g>\n");

        if self.config.labels {
            svg.push_str(&format!(
                "<g font-family=\"monospace\" font-size=\"{}\" text-anchor=\"middle\">\n",
                self.config.font_size
            ));
            for segment in &self.segments {
                svg.push_str(&format!(
                    "<text x=\"{:.2}\" y=\"{:.2}\">{}</text>\n",
                    segment.mid.x,
                    segment.mid.y,
                    escape_xml(&segment.name)
                ));
            }
            svg.push_str("</g>\n");
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// Render a laid-out chain to SVG markup
pub fn render_svg(root: &ChainShape, config: &RenderConfig) -> String {
    let mut renderer = SvgRenderer::new(config);
    renderer.visit_root(root);
    renderer.finish()
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
