// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::Serialize;

/// Fixed suggestions offered under the recent searches
pub const STATIC_SUGGESTIONS: [&str; 5] = ["phone", "laptop", "beauty", "eyeshadow", "shoes"];

/// Pointer position in view coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Tells whether a pointer event landed inside the search input region.
///
/// Granted to the overlay by whatever lays out the view.
pub trait HitTest: Send + Sync {
    fn contains(&self, point: Point) -> bool;
}

impl<F> HitTest for F
where
    F: Fn(Point) -> bool + Send + Sync,
{
    fn contains(&self, point: Point) -> bool {
        self(point)
    }
}

/// Axis-aligned rectangle; edges count as inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl HitTest for Rect {
    fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// A previous search of this user
    History,
    /// One of the built-in suggestions
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionEntry {
    pub term: String,
    pub source: SuggestionSource,
}

/// Visibility of the dropdown under the search input
#[derive(Default)]
pub struct SuggestionOverlay {
    visible: bool,
    boundary: Option<Box<dyn HitTest>>,
}

impl SuggestionOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the region used for click-outside detection
    pub fn set_boundary(&mut self, boundary: impl HitTest + 'static) {
        self.boundary = Some(Box::new(boundary));
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Close the overlay when a pointer event lands outside the search input.
    ///
    /// With no boundary granted every event counts as outside.
    /// Returns whether the overlay is still visible.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        let inside = self
            .boundary
            .as_ref()
            .is_some_and(|boundary| boundary.contains(point));
        if !inside {
            self.close();
        }
        self.visible
    }

    /// History entries first, then the static suggestions.
    ///
    /// Terms appearing in both lists are listed twice.
    pub fn entries(&self, history: &[String]) -> Vec<SuggestionEntry> {
        history
            .iter()
            .map(|term| SuggestionEntry {
                term: term.clone(),
                source: SuggestionSource::History,
            })
            .chain(STATIC_SUGGESTIONS.iter().map(|term| SuggestionEntry {
                term: (*term).to_string(),
                source: SuggestionSource::Static,
            }))
            .collect()
    }
}

impl std::fmt::Debug for SuggestionOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionOverlay")
            .field("visible", &self.visible)
            .field("has_boundary", &self.boundary.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_box() -> Rect {
        Rect::new(10.0, 10.0, 400.0, 40.0)
    }

    #[test]
    fn test_overlay_starts_hidden() {
        assert!(!SuggestionOverlay::new().is_visible());
    }

    #[test]
    fn test_open_and_close() {
        let mut overlay = SuggestionOverlay::new();
        overlay.open();
        assert!(overlay.is_visible());
        overlay.close();
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_pointer_inside_keeps_overlay_open() {
        let mut overlay = SuggestionOverlay::new();
        overlay.set_boundary(search_box());
        overlay.open();
        assert!(overlay.pointer_down(Point::new(50.0, 20.0)));
        assert!(overlay.is_visible());
    }

    #[test]
    fn test_pointer_outside_closes_overlay() {
        let mut overlay = SuggestionOverlay::new();
        overlay.set_boundary(search_box());
        overlay.open();
        assert!(!overlay.pointer_down(Point::new(500.0, 300.0)));
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_pointer_without_boundary_closes_overlay() {
        let mut overlay = SuggestionOverlay::new();
        overlay.open();
        assert!(!overlay.pointer_down(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_closure_boundary() {
        let mut overlay = SuggestionOverlay::new();
        overlay.set_boundary(|point: Point| point.y < 100.0);
        overlay.open();
        assert!(overlay.pointer_down(Point::new(900.0, 99.0)));
        assert!(!overlay.pointer_down(Point::new(0.0, 101.0)));
    }

    #[test]
    fn test_rect_edges_are_inside() {
        let rect = search_box();
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(410.0, 50.0)));
        assert!(!rect.contains(Point::new(410.1, 50.0)));
    }

    #[test]
    fn test_entries_history_then_static() {
        let overlay = SuggestionOverlay::new();
        let history = vec!["phone".to_string(), "watch".to_string()];
        let entries = overlay.entries(&history);

        assert_eq!(entries.len(), 2 + STATIC_SUGGESTIONS.len());
        assert_eq!(entries[0].term, "phone");
        assert_eq!(entries[0].source, SuggestionSource::History);
        assert_eq!(entries[1].term, "watch");
        assert_eq!(entries[2].term, "phone");
        assert_eq!(entries[2].source, SuggestionSource::Static);
        assert_eq!(entries.last().unwrap().term, "shoes");
    }

    #[test]
    fn test_entries_without_history() {
        let entries = SuggestionOverlay::new().entries(&[]);
        assert!(entries
            .iter()
            .all(|entry| entry.source == SuggestionSource::Static));
        assert_eq!(entries.len(), STATIC_SUGGESTIONS.len());
    }
}
