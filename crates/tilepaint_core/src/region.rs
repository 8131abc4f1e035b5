//! Integer rectangle sets describing affected cells
//!
//! A [`Region`] is stored as horizontal bands. Each band covers the rows
//! `top..bottom` and holds sorted, disjoint, non-touching x-spans. Vertically
//! adjacent bands with identical spans are coalesced, so two regions covering the
//! same cells always compare equal.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle of cells. The extent is half-open: a rectangle at
/// `(x, y)` with size `(width, height)` covers `x..x + width` and `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle with no area covers no cells
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Exclusive right edge, clamped to `i32::MAX`
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, clamped to `i32::MAX`
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlap of two rectangles, or an empty rectangle if they do not overlap
    pub fn intersected(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::default();
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.intersected(other).is_empty()
    }

    /// Bounding rectangle of both. Empty rectangles do not contribute.
    pub fn united(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }
}

/// Rows `top..bottom` covered by the half-open x-spans in `spans`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Band {
    top: i32,
    bottom: i32,
    spans: Vec<(i32, i32)>,
}

/// A set of cells made of disjoint rectangles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    bands: Vec<Band>,
}

impl Region {
    /// The empty region
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rect(rect: Rect) -> Self {
        let mut region = Self::new();
        if !rect.is_empty() {
            region.bands.push(Band {
                top: rect.y,
                bottom: rect.bottom(),
                spans: vec![(rect.x, rect.right())],
            });
        }
        region
    }

    /// Build a region covering every cell of every rectangle. Overlapping input is fine.
    pub fn from_rects(rects: impl IntoIterator<Item = Rect>) -> Self {
        let mut rects: Vec<Rect> = rects.into_iter().filter(|r| !r.is_empty()).collect();
        rects.sort_unstable_by_key(|r| r.y);

        let mut edges: Vec<i32> = rects.iter().flat_map(|r| [r.y, r.bottom()]).collect();
        edges.sort_unstable();
        edges.dedup();

        let mut region = Self::new();
        let mut active: Vec<Rect> = Vec::new();
        let mut next = 0;

        for window in edges.windows(2) {
            let (top, bottom) = (window[0], window[1]);
            active.retain(|r| r.bottom() > top);
            while next < rects.len() && rects[next].y <= top {
                active.push(rects[next]);
                next += 1;
            }

            let mut spans: Vec<(i32, i32)> = active.iter().map(|r| (r.x, r.right())).collect();
            spans.sort_unstable();
            region.push_band(top, bottom, merge_spans(spans));
        }
        region
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// The disjoint rectangles making up this region, top to bottom
    pub fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.bands.iter().flat_map(|band| {
            band.spans
                .iter()
                .map(move |&(start, end)| Rect::new(start, band.top, end - start, band.bottom - band.top))
        })
    }

    /// Every covered coordinate, rectangle by rectangle, row-major within each
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rects()
            .flat_map(|rect| (rect.y..rect.bottom()).flat_map(move |y| (rect.x..rect.right()).map(move |x| (x, y))))
    }

    /// Number of covered cells
    pub fn cell_count(&self) -> usize {
        self.rects()
            .map(|r| r.width as usize * r.height as usize)
            .sum()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.bands
            .iter()
            .find(|band| band.top <= y && y < band.bottom)
            .is_some_and(|band| band.spans.iter().any(|&(start, end)| start <= x && x < end))
    }

    /// Smallest rectangle containing the whole region; empty for the empty region
    pub fn bounding_rect(&self) -> Rect {
        let (Some(first), Some(last)) = (self.bands.first(), self.bands.last()) else {
            return Rect::default();
        };
        let left = self
            .bands
            .iter()
            .filter_map(|band| band.spans.first().map(|s| s.0))
            .min()
            .unwrap_or(0);
        let right = self
            .bands
            .iter()
            .filter_map(|band| band.spans.last().map(|s| s.1))
            .max()
            .unwrap_or(0);
        Rect::new(left, first.top, right - left, last.bottom - first.top)
    }

    pub fn united(&self, other: &Region) -> Region {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        self.combine(other, |a, b| a || b)
    }

    pub fn subtracted(&self, other: &Region) -> Region {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        self.combine(other, |a, b| a && !b)
    }

    pub fn intersected(&self, other: &Region) -> Region {
        if self.is_empty() || other.is_empty() {
            return Region::new();
        }
        self.combine(other, |a, b| a && b)
    }

    pub fn intersects(&self, other: &Region) -> bool {
        !self.intersected(other).is_empty()
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Region {
        Region {
            bands: self
                .bands
                .iter()
                .map(|band| Band {
                    top: band.top + dy,
                    bottom: band.bottom + dy,
                    spans: band.spans.iter().map(|&(s, e)| (s + dx, e + dx)).collect(),
                })
                .collect(),
        }
    }

    /// Sweep both band lists together, applying `op` to the per-cell membership.
    fn combine(&self, other: &Region, op: impl Fn(bool, bool) -> bool) -> Region {
        let mut edges: Vec<i32> = self
            .bands
            .iter()
            .chain(other.bands.iter())
            .flat_map(|band| [band.top, band.bottom])
            .collect();
        edges.sort_unstable();
        edges.dedup();

        let mut result = Region::new();
        let (mut i, mut j) = (0, 0);

        for window in edges.windows(2) {
            let (top, bottom) = (window[0], window[1]);
            while i < self.bands.len() && self.bands[i].bottom <= top {
                i += 1;
            }
            while j < other.bands.len() && other.bands[j].bottom <= top {
                j += 1;
            }
            let a = spans_covering(&self.bands, i, top);
            let b = spans_covering(&other.bands, j, top);
            result.push_band(top, bottom, combine_spans(a, b, &op));
        }
        result
    }

    /// Append a band below all existing ones, coalescing with the previous band
    /// when it continues it with the same spans.
    fn push_band(&mut self, top: i32, bottom: i32, spans: Vec<(i32, i32)>) {
        if spans.is_empty() || bottom <= top {
            return;
        }
        if let Some(last) = self.bands.last_mut() {
            if last.bottom == top && last.spans == spans {
                last.bottom = bottom;
                return;
            }
        }
        self.bands.push(Band { top, bottom, spans });
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Region::from_rect(rect)
    }
}

fn spans_covering(bands: &[Band], index: usize, y: i32) -> &[(i32, i32)] {
    match bands.get(index) {
        Some(band) if band.top <= y => &band.spans,
        _ => &[],
    }
}

/// Merge sorted spans, joining overlapping and touching ones
fn merge_spans(spans: Vec<(i32, i32)>) -> Vec<(i32, i32)> {
    let mut merged: Vec<(i32, i32)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

fn combine_spans(a: &[(i32, i32)], b: &[(i32, i32)], op: &impl Fn(bool, bool) -> bool) -> Vec<(i32, i32)> {
    let mut edges: Vec<i32> = a.iter().chain(b).flat_map(|&(s, e)| [s, e]).collect();
    edges.sort_unstable();
    edges.dedup();

    let mut out: Vec<(i32, i32)> = Vec::new();
    let (mut ia, mut ib) = (0, 0);

    for window in edges.windows(2) {
        let (x0, x1) = (window[0], window[1]);
        while ia < a.len() && a[ia].1 <= x0 {
            ia += 1;
        }
        while ib < b.len() && b[ib].1 <= x0 {
            ib += 1;
        }
        let in_a = a.get(ia).is_some_and(|s| s.0 <= x0);
        let in_b = b.get(ib).is_some_and(|s| s.0 <= x0);
        if op(in_a, in_b) {
            match out.last_mut() {
                Some(last) if last.1 == x0 => last.1 = x1,
                _ => out.push((x0, x1)),
            }
        }
    }
    out
}
