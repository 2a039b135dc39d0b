//! FILENAME: core/model/src/layout.rs
//! PURPOSE: Interactive layout geometry for the template designer canvas.
//! CONTEXT: Elements are positioned rectangles in page units. A drag
//! captures a snapshot of the starting rectangle; move/resize apply a raw
//! delta to that snapshot, and snapping rounds only the final committed
//! rectangle so drag feel is unaffected until commit.
//!
//! RULES:
//! - move: uniform delta on x/y, clamped to stay non-negative
//! - resize: one of 8 compass handles, the opposite corner/edge stays fixed
//! - width/height floored at MIN_ELEMENT_WIDTH / MIN_ELEMENT_HEIGHT
//! - snap on commit: position to POSITION_GRID, size to SIZE_GRID

use serde::{Deserialize, Serialize};

/// Smallest width an element rectangle may take, in page units.
pub const MIN_ELEMENT_WIDTH: f64 = 50.0;

/// Smallest height an element rectangle may take, in page units.
pub const MIN_ELEMENT_HEIGHT: f64 = 30.0;

/// Grid step the committed x/y snap to when snapping is enabled.
pub const POSITION_GRID: f64 = 8.0;

/// Grid step the committed width/height snap to when snapping is enabled.
pub const SIZE_GRID: f64 = 4.0;

// ============================================================================
// RECTANGLE
// ============================================================================

/// An element's layout rectangle in page-coordinate units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// X coordinate of the right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect::new(0.0, 0.0, 160.0, 40.0)
    }
}

// ============================================================================
// DRAG INTERACTION
// ============================================================================

/// The 8 compass resize handles around an element rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl ResizeHandle {
    /// True when this handle moves the left edge (x and width change together).
    fn moves_left_edge(&self) -> bool {
        matches!(
            self,
            ResizeHandle::West | ResizeHandle::NorthWest | ResizeHandle::SouthWest
        )
    }

    /// True when this handle moves the right edge (width only).
    fn moves_right_edge(&self) -> bool {
        matches!(
            self,
            ResizeHandle::East | ResizeHandle::NorthEast | ResizeHandle::SouthEast
        )
    }

    /// True when this handle moves the top edge (y and height change together).
    fn moves_top_edge(&self) -> bool {
        matches!(
            self,
            ResizeHandle::North | ResizeHandle::NorthWest | ResizeHandle::NorthEast
        )
    }

    /// True when this handle moves the bottom edge (height only).
    fn moves_bottom_edge(&self) -> bool {
        matches!(
            self,
            ResizeHandle::South | ResizeHandle::SouthWest | ResizeHandle::SouthEast
        )
    }
}

/// What a drag does to the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Move,
    Resize(ResizeHandle),
}

/// A drag in progress: the immutable starting rectangle plus the drag kind.
/// Deltas are always applied to the snapshot, never accumulated, so a jittery
/// pointer cannot make the rectangle drift.
#[derive(Debug, Clone)]
pub struct DragInteraction {
    start: Rect,
    kind: DragKind,
}

impl DragInteraction {
    pub fn new(start: Rect, kind: DragKind) -> Self {
        DragInteraction { start, kind }
    }

    pub fn start_rect(&self) -> Rect {
        self.start
    }

    /// Applies the raw pointer delta to the start snapshot. Minimum sizes and
    /// the non-negative origin are enforced; no snapping happens here.
    pub fn apply(&self, dx: f64, dy: f64) -> Rect {
        match self.kind {
            DragKind::Move => clamp_origin(Rect {
                x: self.start.x + dx,
                y: self.start.y + dy,
                ..self.start
            }),
            DragKind::Resize(handle) => apply_resize(&self.start, handle, dx, dy),
        }
    }

    /// Produces the final committed rectangle. With snapping enabled the
    /// position rounds to POSITION_GRID and the size to SIZE_GRID, then
    /// minima and the non-negative origin are re-enforced.
    pub fn commit(&self, dx: f64, dy: f64, snap: bool) -> Rect {
        let raw = self.apply(dx, dy);
        if !snap {
            return raw;
        }
        let snapped = Rect {
            x: snap_to(raw.x, POSITION_GRID),
            y: snap_to(raw.y, POSITION_GRID),
            width: snap_to(raw.width, SIZE_GRID),
            height: snap_to(raw.height, SIZE_GRID),
        };
        clamp_origin(clamp_min_size(snapped))
    }
}

// ============================================================================
// GEOMETRY HELPERS
// ============================================================================

/// Rounds a coordinate to the nearest multiple of `grid`.
fn snap_to(value: f64, grid: f64) -> f64 {
    (value / grid).round() * grid
}

/// Floors width/height at the documented minima without moving the rect.
fn clamp_min_size(rect: Rect) -> Rect {
    Rect {
        width: rect.width.max(MIN_ELEMENT_WIDTH),
        height: rect.height.max(MIN_ELEMENT_HEIGHT),
        ..rect
    }
}

/// Clamps the origin into the non-negative quadrant. Size is untouched so a
/// move against the page edge stops instead of shrinking the element.
fn clamp_origin(rect: Rect) -> Rect {
    Rect {
        x: rect.x.max(0.0),
        y: rect.y.max(0.0),
        ..rect
    }
}

/// Resizes `start` by (dx, dy) through `handle`. Each handle mutates its
/// fixed subset of {x, y, width, height}; the opposite corner stays fixed,
/// including when the minimum size clamp kicks in.
fn apply_resize(start: &Rect, handle: ResizeHandle, dx: f64, dy: f64) -> Rect {
    let mut x = start.x;
    let mut y = start.y;
    let mut width = start.width;
    let mut height = start.height;

    if handle.moves_left_edge() {
        x += dx;
        width -= dx;
    } else if handle.moves_right_edge() {
        width += dx;
    }

    if handle.moves_top_edge() {
        y += dy;
        height -= dy;
    } else if handle.moves_bottom_edge() {
        height += dy;
    }

    // Re-anchor so the fixed edge does not drift when a clamp applies.
    if handle.moves_left_edge() {
        let right = start.right();
        width = width.max(MIN_ELEMENT_WIDTH);
        x = right - width;
        if x < 0.0 {
            x = 0.0;
            width = right;
        }
    } else {
        width = width.max(MIN_ELEMENT_WIDTH);
    }

    if handle.moves_top_edge() {
        let bottom = start.bottom();
        height = height.max(MIN_ELEMENT_HEIGHT);
        y = bottom - height;
        if y < 0.0 {
            y = 0.0;
            height = bottom;
        }
    } else {
        height = height.max(MIN_ELEMENT_HEIGHT);
    }

    Rect {
        x,
        y,
        width,
        height,
    }
}
