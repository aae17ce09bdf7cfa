//! A bidirectional cursor over a sorted slice of segments.
//!
//! Genes may nest within or start before the end of a gene already visited,
//! so the overlap search cannot be a forward-only stream: the cursor can
//! step back to an earlier segment.

use super::Segment;
use crate::Position;

#[derive(Clone, Debug)]
pub struct SegmentCursor<'s, 'a> {
    segments: &'s [&'a Segment],
    index: usize,
}

impl<'s, 'a> SegmentCursor<'s, 'a> {
    /// Create a cursor at `index`, clamped into the slice. Returns `None`
    /// if there are no segments to point at.
    pub fn new(segments: &'s [&'a Segment], index: usize) -> Option<Self> {
        let last = segments.len().checked_sub(1)?;
        Some(Self {
            segments,
            index: index.min(last),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &'a Segment {
        self.segments[self.index]
    }

    /// Move to the next segment; `false` (and no move) if at the last.
    pub fn advance(&mut self) -> bool {
        if self.index + 1 < self.segments.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous segment; `false` (and no move) if at the first.
    pub fn retreat(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Advance while the current segment ends at or before `position`.
    /// Returns `false` if the segments run out first.
    pub fn skip_ending_before(&mut self, position: Position) -> bool {
        while self.current().end <= position {
            if !self.advance() {
                return false;
            }
        }
        true
    }

    /// Step back while the current segment starts after `position`. Stops at
    /// the first segment.
    pub fn rewind_to(&mut self, position: Position) {
        while self.current().start > position {
            if !self.retreat() {
                break;
            }
        }
    }
}
