use crossterm::style::Color;

use crate::math::{Point, Rotation};

/// Stroke or text styling for a draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Color,
    pub glyph: char,
}

impl Style {
    pub const CIRCLE: Style = Style {
        color: Color::Grey,
        glyph: '·',
    };
    pub const TEXT: Style = Style {
        color: Color::Blue,
        glyph: ' ',
    };
    pub const NEEDLE: Style = Style {
        color: Color::Red,
        glyph: '█',
    };
}

/// Paint target handed to the widget once per pass
pub trait Surface {
    /// Width of `text` in viewport units
    fn measure_text(&self, text: &str) -> f64;

    fn draw_circle(&mut self, center: Point, radius: f64, style: Style);

    /// Draws `text` centred on `anchor.x` with its baseline at `anchor.y`
    fn draw_text(&mut self, text: &str, anchor: Point, style: Style);

    fn draw_line(&mut self, from: Point, to: Point, style: Style);

    /// Rotates every later draw call of this pass around `pivot`
    fn set_rotation(&mut self, rotation: Rotation, pivot: Point);
}

/// One character cell of the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: ' ',
        color: Color::Reset,
    };
}

/// Character-cell raster covering a viewport of logical units
pub struct Canvas {
    cols: usize,
    rows: usize,
    viewport_width: f64,
    viewport_height: f64,
    glyph_width: f64,
    cells: Vec<Cell>,
    transform: Option<(Rotation, Point)>,
}

impl Canvas {
    pub fn new(
        cols: usize,
        rows: usize,
        viewport_width: f64,
        viewport_height: f64,
        glyph_width: f64,
    ) -> Self {
        Canvas {
            cols,
            rows,
            viewport_width,
            viewport_height,
            glyph_width,
            cells: vec![Cell::BLANK; cols * rows],
            transform: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Blanks every cell and drops the pass transform
    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.transform = None;
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    #[cfg(test)]
    pub fn cell(&self, col: usize, row: usize) -> Option<Cell> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }

    /// Converts a cell position back into viewport units (cell centre)
    pub fn to_viewport(&self, col: u16, row: u16) -> Point {
        Point::new(
            (f64::from(col) + 0.5) * self.viewport_width / self.cols as f64,
            (f64::from(row) + 0.5) * self.viewport_height / self.rows as f64,
        )
    }

    fn transformed(&self, point: Point) -> Point {
        match self.transform {
            Some((rotation, pivot)) => rotation.apply(point, pivot),
            None => point,
        }
    }

    fn to_cell(&self, point: Point) -> (isize, isize) {
        let x = point.x * self.cols as f64 / self.viewport_width;
        let y = point.y * self.rows as f64 / self.viewport_height;
        (x.floor() as isize, y.floor() as isize)
    }

    fn plot(&mut self, col: isize, row: isize, cell: Cell) {
        if col >= 0 && (col as usize) < self.cols && row >= 0 && (row as usize) < self.rows {
            self.cells[row as usize * self.cols + col as usize] = cell;
        }
    }
}

impl Surface for Canvas {
    fn measure_text(&self, text: &str) -> f64 {
        self.glyph_width * text.chars().count() as f64
    }

    /// Midpoint circle in viewport units, plotted into cells
    fn draw_circle(&mut self, center: Point, radius: f64, style: Style) {
        let cell = Cell {
            glyph: style.glyph,
            color: style.color,
        };
        let radius = radius.round() as isize;
        let (mut x, mut y) = (radius, 0isize);
        let mut err = 1 - radius;
        while x >= y {
            for (dx, dy) in [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ] {
                let point = self.transformed(center + Point::new(dx as f64, dy as f64));
                let (col, row) = self.to_cell(point);
                self.plot(col, row, cell);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    fn draw_text(&mut self, text: &str, anchor: Point, style: Style) {
        // Lift the anchor from the baseline to the middle of the glyphs
        let middle = self.transformed(anchor - Point::new(0.0, self.glyph_width / 2.0));
        let (col, row) = self.to_cell(middle);
        let len = text.chars().count() as isize;
        let start = col - len / 2;
        for (i, glyph) in text.chars().enumerate() {
            self.plot(
                start + i as isize,
                row,
                Cell {
                    glyph,
                    color: style.color,
                },
            );
        }
    }

    /// Bresenham's line between two points, in cell space
    fn draw_line(&mut self, from: Point, to: Point, style: Style) {
        let cell = Cell {
            glyph: style.glyph,
            color: style.color,
        };
        let (mut x0, mut y0) = self.to_cell(self.transformed(from));
        let (x1, y1) = self.to_cell(self.transformed(to));
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy

        loop {
            self.plot(x0, y0, cell);

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn set_rotation(&mut self, rotation: Rotation, pivot: Point) {
        self.transform = Some((rotation, pivot));
    }
}

/// A draw call captured by [`RecordingSurface`]
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Circle {
        center: Point,
        radius: f64,
    },
    Text {
        text: String,
        anchor: Point,
    },
    Line {
        from: Point,
        to: Point,
        rotation: Option<Rotation>,
    },
}

/// Surface that records draw calls instead of rasterizing them
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    rotation: Option<Rotation>,
}

#[cfg(test)]
impl RecordingSurface {
    /// The last needle line drawn, if any
    pub fn needle(&self) -> Option<(Point, Point, Option<Rotation>)> {
        self.ops.iter().rev().find_map(|op| match op {
            DrawOp::Line { from, to, rotation } => Some((*from, *to, *rotation)),
            _ => None,
        })
    }

    pub fn texts(&self) -> Vec<(String, Point)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, anchor } => Some((text.clone(), *anchor)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn measure_text(&self, text: &str) -> f64 {
        24.0 * text.chars().count() as f64
    }

    fn draw_circle(&mut self, center: Point, radius: f64, _style: Style) {
        self.ops.push(DrawOp::Circle { center, radius });
    }

    fn draw_text(&mut self, text: &str, anchor: Point, _style: Style) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            anchor,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, _style: Style) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            rotation: self.rotation,
        });
    }

    fn set_rotation(&mut self, rotation: Rotation, _pivot: Point) {
        self.rotation = Some(rotation);
    }
}
