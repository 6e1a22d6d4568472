//! Element and viewport geometry
//!
//! Everything is in document coordinates: `y` grows downward from the top of
//! the page and does not move when the page scrolls. The viewport is a
//! window onto the document at `scroll_y`.

/// Axis-aligned rectangle in document coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.top() && y < self.bottom()
    }
}

/// The visible window onto the document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Document offset of the viewport's top edge
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_y: 0.0,
            width,
            height,
        }
    }

    pub fn with_scroll(mut self, scroll_y: f32) -> Self {
        self.scroll_y = scroll_y;
        self
    }

    /// Document y of the line `fraction` of the way down the viewport
    pub fn line_at(&self, fraction: f32) -> f32 {
        self.scroll_y + self.height * fraction
    }

    pub fn bottom(&self) -> f32 {
        self.scroll_y + self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(0.0, 100.0, 50.0, 40.0);
        assert_eq!(rect.top(), 100.0);
        assert_eq!(rect.bottom(), 140.0);
        assert!(rect.contains_y(100.0));
        assert!(!rect.contains_y(140.0));
    }

    #[test]
    fn test_viewport_line() {
        let viewport = Viewport::new(1000.0, 800.0).with_scroll(200.0);
        assert_eq!(viewport.line_at(0.8), 840.0);
        assert_eq!(viewport.bottom(), 1000.0);
    }
}
