//! Line-art illustrations drawn with `genpdf` strokes.
//!
//! Shapes are placed at fractions of a square canvas with the origin in the lower-left corner
//! and y pointing up; [`Sketch`] flips them into page coordinates when drawing. Curves are
//! approximated by closed polylines.

use std::f64::consts::TAU;

use genpdf::error::Error;
use genpdf::style::{Color, Style};
use genpdf::{render, Element, Position, RenderResult, Size};

use crate::elements::{mm_from_f64, mm_to_f64};
use crate::model::Illustration;

/// Edge length of the drawing canvas.
pub const SKETCH_SIZE_MM: f64 = 50.0;

const CURVE_SEGMENTS: usize = 48;

const BLACK: Color = Color::Rgb(0, 0, 0);
const LIGHT_GREY: Color = Color::Greyscale(211);
const DARK_GREY: Color = Color::Greyscale(169);
const GREEN: Color = Color::Rgb(0, 128, 0);
const DARK_GREEN: Color = Color::Rgb(0, 100, 0);

/// Primitive shapes in canvas fractions.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Polygon(Vec<(f64, f64)>),
}

impl Shape {
    /// Returns the outline of the shape as a polyline, in canvas fractions.
    fn outline(&self) -> Vec<(f64, f64)> {
        match self {
            Shape::Ellipse { cx, cy, rx, ry } => ellipse_points(*cx, *cy, *rx, *ry),
            Shape::Circle { cx, cy, r } => ellipse_points(*cx, *cy, *r, *r),
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => vec![
                (*x, *y),
                (x + width, *y),
                (x + width, y + height),
                (*x, y + height),
                (*x, *y),
            ],
            Shape::Line { x1, y1, x2, y2 } => vec![(*x1, *y1), (*x2, *y2)],
            Shape::Polygon(points) => {
                let mut closed = points.clone();
                if let Some(first) = points.first() {
                    closed.push(*first);
                }
                closed
            }
        }
    }
}

fn ellipse_points(cx: f64, cy: f64, rx: f64, ry: f64) -> Vec<(f64, f64)> {
    (0..=CURVE_SEGMENTS)
        .map(|step| {
            let angle = TAU * step as f64 / CURVE_SEGMENTS as f64;
            (cx + rx * angle.cos(), cy + ry * angle.sin())
        })
        .collect()
}

/// A set of stroked shapes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Drawing {
    strokes: Vec<(Shape, Color)>,
}

impl Drawing {
    fn stroke(mut self, shape: Shape, color: Color) -> Self {
        self.strokes.push((shape, color));
        self
    }

    fn ellipse(self, cx: f64, cy: f64, rx: f64, ry: f64) -> Self {
        self.stroke(Shape::Ellipse { cx, cy, rx, ry }, BLACK)
    }

    fn circle(self, cx: f64, cy: f64, r: f64) -> Self {
        self.stroke(Shape::Circle { cx, cy, r }, BLACK)
    }

    fn line(self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color) -> Self {
        self.stroke(Shape::Line { x1, y1, x2, y2 }, color)
    }

    /// Returns the drawing for the given illustration.
    pub fn of(illustration: Illustration) -> Self {
        match illustration {
            Illustration::EngineerPanda => engineer_panda(),
            Illustration::BambooPanda => bamboo_panda(),
        }
    }
}

fn panda() -> Drawing {
    Drawing::default()
        .ellipse(0.5, 0.35, 0.32, 0.25)
        .ellipse(0.28, 0.18, 0.12, 0.08)
        .ellipse(0.72, 0.18, 0.12, 0.08)
        .ellipse(0.25, 0.35, 0.09, 0.06)
        .ellipse(0.75, 0.35, 0.09, 0.06)
        .circle(0.5, 0.7, 0.3)
        .circle(0.28, 0.86, 0.12)
        .circle(0.72, 0.86, 0.12)
        .ellipse(0.4, 0.73, 0.08, 0.11)
        .ellipse(0.6, 0.73, 0.08, 0.11)
        .circle(0.4, 0.73, 0.03)
        .circle(0.6, 0.73, 0.03)
        .circle(0.5, 0.63, 0.035)
        .line(0.5, 0.61, 0.48, 0.57, BLACK)
        .line(0.5, 0.61, 0.52, 0.57, BLACK)
}

fn engineer_panda() -> Drawing {
    let mut drawing = panda()
        .stroke(
            Shape::Rect {
                x: 0.28,
                y: 0.77,
                width: 0.44,
                height: 0.08,
            },
            LIGHT_GREY,
        )
        .stroke(
            Shape::Rect {
                x: 0.24,
                y: 0.77,
                width: 0.52,
                height: 0.03,
            },
            DARK_GREY,
        );
    for x in [0.36, 0.5, 0.64] {
        drawing = drawing.line(x, 0.77, x, 0.85, BLACK);
    }
    drawing
}

fn bamboo_panda() -> Drawing {
    const STALK_X: f64 = 0.15;
    const STALK_WIDTH: f64 = 0.08;
    const SEGMENT_HEIGHT: f64 = 0.12;

    let mut drawing = panda();
    for segment in 0..5 {
        let y = 0.15 + segment as f64 * SEGMENT_HEIGHT;
        drawing = drawing
            .stroke(
                Shape::Rect {
                    x: STALK_X,
                    y,
                    width: STALK_WIDTH,
                    height: SEGMENT_HEIGHT * 0.9,
                },
                GREEN,
            )
            .line(STALK_X, y, STALK_X + STALK_WIDTH, y, DARK_GREEN);
    }

    let leaves = [
        [(0.08, 0.55), (0.18, 0.62), (0.11, 0.66)],
        [(0.07, 0.42), (0.17, 0.35), (0.10, 0.31)],
    ];
    for leaf in leaves {
        let points = leaf.iter().map(|(dx, y)| (STALK_X + dx, *y)).collect();
        drawing = drawing.stroke(Shape::Polygon(points), DARK_GREEN);
    }

    drawing.ellipse(0.23, 0.45, 0.1, 0.07)
}

/// Element drawing a [`Drawing`] on a square canvas of [`SKETCH_SIZE_MM`], centered horizontally.
pub struct Sketch {
    drawing: Drawing,
}

impl Sketch {
    pub fn new(drawing: Drawing) -> Self {
        Self { drawing }
    }

    /// Creates a sketch of one of the built-in illustrations.
    pub fn of(illustration: Illustration) -> Self {
        Self::new(Drawing::of(illustration))
    }
}

impl Element for Sketch {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let canvas = mm_from_f64(SKETCH_SIZE_MM);
        if canvas > area.size().height {
            result.has_more = true;
            return Ok(result);
        }

        let available = area.size().width;
        let x_offset = ((mm_to_f64(available) - SKETCH_SIZE_MM) / 2.0).max(0.0);
        let size = SKETCH_SIZE_MM;

        for (shape, color) in &self.drawing.strokes {
            let points: Vec<Position> = shape
                .outline()
                .into_iter()
                .map(|(x, y)| {
                    Position::new(
                        mm_from_f64(x_offset + x * size),
                        mm_from_f64((1.0 - y) * size),
                    )
                })
                .collect();
            area.draw_line(points, Style::new().with_color(*color));
        }

        result.size = Size::new(available, canvas);
        Ok(result)
    }
}
