//! Declared array shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One declared array dimension.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// A literal size, e.g. `Real[3]`.
    Fixed(usize),
    /// A size given by an uninterpreted expression, e.g. `size(B, 1)`.
    Symbolic(String),
    /// `:`
    Unbounded,
}

impl Dimension {
    /// Parse a `size` attribute or subscript text.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text == ":" {
            Dimension::Unbounded
        } else if let Ok(n) = text.parse::<usize>() {
            Dimension::Fixed(n)
        } else {
            Dimension::Symbolic(text.to_string())
        }
    }

    /// Whether an observed length satisfies this dimension.
    ///
    /// Symbolic sizes are not evaluated, so they accept any length.
    pub fn accepts(&self, len: usize) -> bool {
        match self {
            Dimension::Fixed(n) => *n == len,
            Dimension::Symbolic(_) | Dimension::Unbounded => true,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Fixed(n) => write!(f, "{}", n),
            Dimension::Symbolic(expr) => f.write_str(expr),
            Dimension::Unbounded => f.write_str(":"),
        }
    }
}

/// Ordered dimensions; empty means scalar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(Vec<Dimension>);

impl Shape {
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self(dimensions)
    }

    pub fn scalar() -> Self {
        Self(Vec::new())
    }

    pub fn is_scalar(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.0
    }

    /// The shape of one element along the first axis.
    pub fn inner(&self) -> Shape {
        Shape(self.0.iter().skip(1).cloned().collect())
    }

    /// This shape with `dimension` added as the new first axis.
    pub fn prepend(&self, dimension: Dimension) -> Shape {
        let mut dimensions = Vec::with_capacity(self.0.len() + 1);
        dimensions.push(dimension);
        dimensions.extend(self.0.iter().cloned());
        Shape(dimensions)
    }
}

impl From<Vec<Dimension>> for Shape {
    fn from(dimensions: Vec<Dimension>) -> Self {
        Self(dimensions)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("scalar");
        }
        f.write_str("[")?;
        for (i, dim) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", dim)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_parse() {
        assert_eq!(Dimension::parse("3"), Dimension::Fixed(3));
        assert_eq!(Dimension::parse(" : "), Dimension::Unbounded);
        assert_eq!(
            Dimension::parse("size(B,1)"),
            Dimension::Symbolic("size(B,1)".to_string())
        );
    }

    #[test]
    fn test_shape_display_and_inner() {
        let shape = Shape::new(vec![Dimension::Fixed(2), Dimension::Unbounded]);
        assert_eq!(shape.to_string(), "[2, :]");
        assert_eq!(shape.inner(), Shape::new(vec![Dimension::Unbounded]));
        assert_eq!(Shape::scalar().to_string(), "scalar");
        assert_eq!(shape.inner().prepend(Dimension::Fixed(2)), shape);
    }
}
