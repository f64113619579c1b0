use crate::color::Rgb;
use crate::palette::PaletteEntry;

/// Static 3-d tree over a palette, answering nearest-color queries under Manhattan distance.
///
/// The tree is implicit: `order` holds entry positions arranged so that for every range
/// `lo..hi` the median sits at `(lo + hi) / 2`, the left half at or below it on the split
/// axis and the right half at or above. The axis cycles r, g, b with depth.
///
/// Ties resolve to the entry that came first in the input.
#[derive(Debug, Clone)]
pub struct NearestColorIndex {
    entries: Vec<PaletteEntry>,
    order: Vec<usize>,
}

#[derive(Clone, Copy)]
struct Best {
    pos: usize,
    dist: u32,
}

impl NearestColorIndex {
    /// Build the tree. `entries` must not be empty.
    pub fn build(entries: &[PaletteEntry]) -> Self {
        assert!(!entries.is_empty(), "cannot index an empty palette");

        let mut order: Vec<usize> = (0..entries.len()).collect();
        split(entries, &mut order, 0);

        Self {
            entries: entries.to_vec(),
            order,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// The entry closest to `color`.
    pub fn nearest(&self, color: Rgb) -> PaletteEntry {
        let mut best = Best {
            pos: usize::MAX,
            dist: u32::MAX,
        };
        self.search(color, 0, self.order.len(), 0, &mut best);
        self.entries[best.pos]
    }

    fn search(&self, query: Rgb, lo: usize, hi: usize, depth: usize, best: &mut Best) {
        if lo >= hi {
            return;
        }

        let mid = (lo + hi) / 2;
        let pos = self.order[mid];
        let node = self.entries[pos].color;

        let dist = query.manhattan(&node);
        if dist < best.dist || (dist == best.dist && pos < best.pos) {
            *best = Best { pos, dist };
        }

        let axis = depth % 3;
        let q = query.channel(axis);
        let m = node.channel(axis);
        let gap = q.abs_diff(m) as u32;

        let (near, far) = if q < m {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };

        self.search(query, near.0, near.1, depth + 1, best);
        // Everything across the split is at least `gap` away. Equal still gets visited,
        // an earlier entry may be waiting there.
        if gap <= best.dist {
            self.search(query, far.0, far.1, depth + 1, best);
        }
    }
}

fn split(entries: &[PaletteEntry], order: &mut [usize], depth: usize) {
    if order.len() <= 1 {
        return;
    }

    let axis = depth % 3;
    order.sort_unstable_by_key(|&pos| (entries[pos].color.channel(axis), pos));

    let mid = order.len() / 2;
    let (left, rest) = order.split_at_mut(mid);
    split(entries, left, depth + 1);
    split(entries, &mut rest[1..], depth + 1);
}
