use crate::math::{point_on_circle, Position2D};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 2.0;

/// One character cell of the raster
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

/// Character raster covering the whole terminal
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Sets a cell; coordinates outside the canvas are ignored
    pub fn put(&mut self, x: isize, y: isize, glyph: char, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = Cell { glyph, color };
        }
    }

    /// Writes text starting at (x, y), clipped to the canvas
    pub fn draw_text(&mut self, x: isize, y: isize, text: &str, color: Color) {
        for (i, glyph) in text.chars().enumerate() {
            self.put(x + i as isize, y, glyph, color);
        }
    }

    /// Writes text centred horizontally on row `y`
    pub fn draw_text_centered(&mut self, y: isize, text: &str, color: Color) {
        let len = text.chars().count() as isize;
        self.draw_text((self.width as isize - len) / 2, y, text, color);
    }

    /// Fills a rectangle with blanks and draws a border around it
    pub fn draw_box(&mut self, x: isize, y: isize, width: usize, height: usize, color: Color) {
        let (w, h) = (width as isize, height as isize);
        for row in y..y + h {
            for col in x..x + w {
                let glyph = match (row == y || row == y + h - 1, col == x || col == x + w - 1) {
                    (true, true) => '+',
                    (true, false) => '-',
                    (false, true) => '|',
                    (false, false) => ' ',
                };
                self.put(col, row, glyph, color);
            }
        }
    }

    /// Draws the canvas to the terminal, changing colour only where it differs
    pub fn flush<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for y in 0..self.height {
            queue!(out, MoveTo(0, y as u16))?;
            let mut current = None;
            let mut run = String::with_capacity(self.width);
            for cell in &self.cells[y * self.width..(y + 1) * self.width] {
                if current != Some(cell.color) {
                    if !run.is_empty() {
                        queue!(out, Print(&run))?;
                        run.clear();
                    }
                    queue!(out, SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                run.push(cell.glyph);
            }
            queue!(out, Print(&run))?;
        }
        queue!(out, ResetColor)?;
        out.flush()
    }
}

/// Fixed orthographic camera looking down on the orbital plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicCamera {
    /// Visible half-height of the view, in world units
    pub half_height: f64,
    /// Screen column of the world origin
    pub center_x: f64,
    /// Screen row of the world origin
    pub center_y: f64,
    /// Rows per world unit
    pub scale_y: f64,
}

impl OrthographicCamera {
    /// Fits `half_height` world units above and below the centre of the viewport;
    /// the horizontal extent follows the viewport aspect
    pub fn fit(left: usize, top: usize, width: usize, height: usize, half_height: f64) -> Self {
        OrthographicCamera {
            half_height,
            center_x: left as f64 + width as f64 / 2.0,
            center_y: top as f64 + height as f64 / 2.0,
            scale_y: height as f64 / (2.0 * half_height),
        }
    }

    /// Columns per world unit
    pub fn scale_x(&self) -> f64 {
        self.scale_y * CELL_ASPECT
    }

    /// Visible half-width of the view, in world units
    pub fn half_width(&self, width: usize) -> f64 {
        width as f64 / 2.0 / self.scale_x()
    }

    /// Screen position (column, row) of a world point; y grows upwards in the world
    pub fn project(&self, p: &Position2D) -> [f64; 2] {
        [
            self.center_x + p.x * self.scale_x(),
            self.center_y - p.y * self.scale_y,
        ]
    }

    /// World point under the centre of a screen cell
    pub fn unproject(&self, col: isize, row: isize) -> Position2D {
        Position2D {
            x: (col as f64 + 0.5 - self.center_x) / self.scale_x(),
            y: (self.center_y - (row as f64 + 0.5)) / self.scale_y,
        }
    }
}

/// Draws a filled disc; a disc smaller than a cell still covers the cell under its centre
pub fn draw_disc(
    canvas: &mut Canvas,
    camera: &OrthographicCamera,
    center: &Position2D,
    radius: f64,
    glyph: char,
    color: Color,
) {
    let [cx, cy] = camera.project(center);
    let reach_x = (radius * camera.scale_x()).ceil() as isize + 1;
    let reach_y = (radius * camera.scale_y).ceil() as isize + 1;
    let (col0, row0) = (cx.floor() as isize, cy.floor() as isize);

    for row in row0 - reach_y..=row0 + reach_y {
        for col in col0 - reach_x..=col0 + reach_x {
            let offset = camera.unproject(col, row).sub(center);
            if offset.length() <= radius {
                canvas.put(col, row, glyph, color);
            }
        }
    }
    canvas.put(col0, row0, glyph, color);
}

/// Draws a dashed circle as alternating chords of a regular polygon
pub fn draw_dashed_orbit(
    canvas: &mut Canvas,
    camera: &OrthographicCamera,
    center: &Position2D,
    radius: f64,
    segments: usize,
    color: Color,
) {
    let vertex = |i: usize| {
        let theta = (i as f64 / segments as f64) * 360.0;
        camera.project(&point_on_circle(center, radius, theta))
    };
    for i in (0..segments).step_by(2) {
        let [x0, y0] = vertex(i);
        let [x1, y1] = vertex(i + 1);
        draw_line(canvas, x0, y0, x1, y1, '.', color);
    }
}

/// Draws a line between two screen points using Bresenham's algorithm
pub fn draw_line(
    canvas: &mut Canvas,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    glyph: char,
    color: Color,
) {
    let (mut x0, mut y0, x1, y1) = (
        x0.floor() as isize,
        y0.floor() as isize,
        x1.floor() as isize,
        y1.floor() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    loop {
        canvas.put(x0, y0, glyph, color);

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
