//! Core types for the node area
//!
//! Positions and sizes are logical: they are expressed in node space and do
//! not depend on the current zoom of the surface.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for a connection
pub type ConnectionId = String;

/// Arbitrary metadata forwarded verbatim to guards and notifications
pub type Metadata = serde_json::Value;

/// A logical position in node space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Divide both coordinates by a zoom factor
    pub fn unzoom(self, k: f64) -> Self {
        Self {
            x: self.x / k,
            y: self.y / k,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Dimensions of a node's rendered content
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a size, clamping negative dimensions to zero
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Parameters of a node translation, shared by guard and notification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranslateParams {
    /// Target position
    pub position: Position,
    /// Position before the translation
    pub previous: Position,
}

/// Parameters of a node resize, shared by guard and notification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeParams {
    pub size: Size,
}

/// A node as seen by the view layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub id: NodeId,
    pub label: String,
    /// Host-specific payload handed to the renderer
    #[serde(default)]
    pub data: serde_json::Value,
}

impl NodeData {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            data: serde_json::Value::Null,
        }
    }

    /// Attach a renderer payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

/// A connection between an output of one node and an input of another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionData {
    pub id: ConnectionId,
    pub source: NodeId,
    pub source_output: String,
    pub target: NodeId,
    pub target_input: String,
}

impl ConnectionData {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        source_output: impl Into<String>,
        target: impl Into<String>,
        target_input: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            source_output: source_output.into(),
            target: target.into(),
            target_input: target_input.into(),
        }
    }
}

/// Metadata attached to the silent translate performed when a node view is created
pub fn init_metadata() -> Metadata {
    serde_json::json!({ "passive": true, "source": "init" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_arithmetic() {
        let a = Position::new(10.0, 20.0);
        let b = Position::new(4.0, 5.0);
        assert_eq!(a - b, Position::new(6.0, 15.0));
        assert_eq!(a + b, Position::new(14.0, 25.0));
        assert_eq!(a.unzoom(2.0), Position::new(5.0, 10.0));
    }

    #[test]
    fn test_size_clamps_negative() {
        let size = Size::new(-3.0, 12.0);
        assert_eq!(size.width, 0.0);
        assert_eq!(size.height, 12.0);
    }

    #[test]
    fn test_connection_serializes_camel_case() {
        let conn = ConnectionData::new("c1", "a", "out", "b", "in");
        let json = serde_json::to_value(&conn).unwrap();
        assert_eq!(json["sourceOutput"], "out");
        assert_eq!(json["targetInput"], "in");
    }
}
