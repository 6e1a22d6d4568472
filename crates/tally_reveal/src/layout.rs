//! Layout provider
//!
//! The engine never measures anything itself. Hosts expose element bounds
//! and the viewport through [`LayoutProvider`]; [`StaticLayout`] is a plain
//! table of rectangles for tests and headless simulation.

use std::borrow::Borrow;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::geometry::{Rect, Viewport};

/// Stable identifier for an element on the page, e.g. `about/stat/2`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Child id under this one: `about` + `stat/2` is `about/stat/2`
    pub fn child(&self, segment: impl fmt::Display) -> Self {
        Self(format!("{}/{}", self.0, segment))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Source of element geometry for the engine
pub trait LayoutProvider {
    /// Current viewport (scroll offset and size)
    fn viewport(&self) -> Viewport;

    /// Document bounds of an element, `None` if it isn't on the page
    fn bounds(&self, element: &ElementId) -> Option<Rect>;

    fn contains(&self, element: &ElementId) -> bool {
        self.bounds(element).is_some()
    }
}

/// Fixed table of element bounds with a scrollable viewport
#[derive(Clone, Debug, Default)]
pub struct StaticLayout {
    viewport: Viewport,
    elements: FxHashMap<ElementId, Rect>,
    document_height: f32,
}

impl StaticLayout {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            elements: FxHashMap::default(),
            document_height: 0.0,
        }
    }

    pub fn insert(&mut self, element: impl Into<ElementId>, bounds: Rect) {
        self.document_height = self.document_height.max(bounds.bottom());
        self.elements.insert(element.into(), bounds);
    }

    pub fn with(mut self, element: impl Into<ElementId>, bounds: Rect) -> Self {
        self.insert(element, bounds);
        self
    }

    pub fn remove(&mut self, element: &str) -> Option<Rect> {
        self.elements.remove(element)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Bottom edge of the lowest element
    pub fn document_height(&self) -> f32 {
        self.document_height
    }

    /// Furthest the viewport can scroll
    pub fn max_scroll(&self) -> f32 {
        (self.document_height - self.viewport.height).max(0.0)
    }

    pub fn scroll_to(&mut self, scroll_y: f32) {
        self.viewport.scroll_y = scroll_y.clamp(0.0, self.max_scroll());
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_to(self.viewport.scroll_y + delta);
    }

    pub fn at_bottom(&self) -> bool {
        self.viewport.scroll_y >= self.max_scroll()
    }
}

impl LayoutProvider for StaticLayout {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn bounds(&self, element: &ElementId) -> Option<Rect> {
        self.elements.get(element).copied()
    }
}
