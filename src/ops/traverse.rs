//! Incremental multi-axis traversal shared by the reduction and broadcast
//! engines.

use crate::dimension::Dimension;
use crate::storage::IndexOffset;

static SINGLETON: [usize; 1] = [0];

/// Offset table of `axis`, or a single zero entry for axes past the rank.
#[inline]
pub(crate) fn axis_table(offsets: &IndexOffset, axis: usize) -> &[usize] {
    if axis < offsets.ndim() {
        offsets.table(axis)
    } else {
        &SINGLETON
    }
}

/// Axes of `dim` with the longest one first, the rest in ascending order.
pub(crate) fn lead_axis_order(dim: &Dimension) -> Vec<usize> {
    let lead = dim.longest_axis();
    std::iter::once(lead)
        .chain((0..dim.ndim()).filter(|&axis| axis != lead))
        .collect()
}

/// Mixed-radix counter over a set of axes.
///
/// Each of the `N` tracks is a buffer cursor addressed by its own offset
/// tables. The first listed axis varies fastest. Cursors are updated by
/// table deltas on every step, never recomputed from the full index.
pub(crate) struct Odometer<'a, const N: usize> {
    axes: Vec<[&'a [usize]; N]>,
    counters: Vec<usize>,
    cursors: [usize; N],
}

impl<'a, const N: usize> Odometer<'a, N> {
    /// All tables of one axis must have the same, non-zero length.
    pub(crate) fn new(axes: Vec<[&'a [usize]; N]>) -> Self {
        let mut cursors = [0usize; N];
        for tables in &axes {
            for (cursor, table) in cursors.iter_mut().zip(tables) {
                *cursor += table[0];
            }
        }
        Self {
            counters: vec![0; axes.len()],
            axes,
            cursors,
        }
    }

    /// Current buffer position of every track.
    #[inline]
    pub(crate) fn cursors(&self) -> [usize; N] {
        self.cursors
    }

    /// Moves to the next position. Returns `false` once every position has
    /// been visited, leaving the counter back at the start.
    #[inline]
    pub(crate) fn advance(&mut self) -> bool {
        for (counter, tables) in self.counters.iter_mut().zip(&self.axes) {
            let i = *counter;
            if i + 1 < tables[0].len() {
                for (cursor, table) in self.cursors.iter_mut().zip(tables) {
                    *cursor = *cursor - table[i] + table[i + 1];
                }
                *counter = i + 1;
                return true;
            }
            for (cursor, table) in self.cursors.iter_mut().zip(tables) {
                *cursor = *cursor - table[i] + table[0];
            }
            *counter = 0;
        }
        false
    }
}
