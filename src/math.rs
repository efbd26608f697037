use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

/// Point in viewport units, y grows downwards
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }

    /// Length of the point taken as a vector from the origin
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Converts degrees to radians
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * (PI / 180.0)
}

/// Converts radians to degrees
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * (180.0 / PI)
}

/// Endpoint of a needle of length `scalar` pointing at `radians`,
/// measured clockwise from north (up)
pub fn needle_endpoint(center: Point, scalar: f64, radians: f64) -> Point {
    let (sin, cos) = radians.sin_cos();
    Point::new(center.x + scalar * sin, center.y - scalar * cos)
}

/// Multiplies a 2x2 matrix by a 2-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 2]; 2], vector: &[f64; 2]) -> [f64; 2] {
    let mut result = [0.0; 2];
    for i in 0..2 {
        for j in 0..2 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Cumulative rotation in degrees, clockwise on screen.
///
/// Kept as a plain value so each paint pass rebuilds its transform from it
/// instead of mutating a shared matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation(f64);

impl Rotation {
    pub const NONE: Rotation = Rotation(0.0);

    #[cfg(test)]
    pub const fn from_degrees(degrees: f64) -> Self {
        Rotation(degrees)
    }

    pub const fn degrees(self) -> f64 {
        self.0
    }

    /// Returns the rotation extended by `step` degrees
    #[must_use]
    pub fn extend(self, step: f64) -> Rotation {
        Rotation(self.0 + step)
    }

    /// Rotates `point` around `pivot`
    pub fn apply(self, point: Point, pivot: Point) -> Point {
        let (sin, cos) = degrees_to_radians(self.0).sin_cos();
        // Screen coordinates have y pointing down, so this matrix turns clockwise
        let matrix = [[cos, -sin], [sin, cos]];
        let offset = point - pivot;
        let [x, y] = multiply_matrix_vector(&matrix, &[offset.x, offset.y]);
        Point::new(pivot.x + x, pivot.y + y)
    }
}
