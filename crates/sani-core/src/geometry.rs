use serde::{Deserialize, Serialize};

/// Axis-aligned box in absolute pixel coordinates, `x1`/`y1` exclusive.
///
/// Serializes as `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct BoundingBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl BoundingBox {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn from_xywh(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Clip to a `width` x `height` canvas. `None` if nothing is left.
    pub fn clamp(&self, width: u32, height: u32) -> Option<Self> {
        let clipped = Self::new(
            self.x0.min(width),
            self.y0.min(height),
            self.x1.min(width),
            self.y1.min(height),
        );
        (!clipped.is_empty()).then_some(clipped)
    }
}

impl From<[u32; 4]> for BoundingBox {
    fn from([x0, y0, x1, y1]: [u32; 4]) -> Self {
        Self::new(x0, y0, x1, y1)
    }
}

impl From<BoundingBox> for [u32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

/// How a region is obscured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionMethod {
    /// Opaque black fill
    #[default]
    Blackbox,
    /// Gaussian blur of the region
    Blur,
}

impl std::str::FromStr for RedactionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blackbox" | "black" => Ok(RedactionMethod::Blackbox),
            "blur" => Ok(RedactionMethod::Blur),
            other => Err(format!("unknown redaction method: {}", other)),
        }
    }
}

/// One recognized word from an OCR pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrWord {
    pub text: String,
    /// 0-100, as reported by the engine
    pub confidence: f32,
    pub bbox: BoundingBox,
    pub block: u32,
    pub paragraph: u32,
    pub line: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_xywh() {
        let b = BoundingBox::from_xywh(10, 20, 30, 5);
        assert_eq!(b, BoundingBox::new(10, 20, 40, 25));
        assert_eq!(b.width(), 30);
        assert_eq!(b.height(), 5);
    }

    #[test]
    fn test_clamp() {
        let b = BoundingBox::new(90, 90, 150, 120);
        assert_eq!(b.clamp(100, 100), Some(BoundingBox::new(90, 90, 100, 100)));
        assert_eq!(BoundingBox::new(120, 0, 130, 10).clamp(100, 100), None);
    }

    #[test]
    fn test_serializes_as_array() {
        let b = BoundingBox::new(1, 2, 3, 4);
        assert_eq!(serde_json::to_string(&b).unwrap(), "[1,2,3,4]");
        let parsed: BoundingBox = serde_json::from_str("[1,2,3,4]").unwrap();
        assert_eq!(parsed, b);
    }
}
