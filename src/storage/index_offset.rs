//! Per-axis offset tables for viewed arrays.

use crate::dimension::{Dimension, Stride};
use crate::error::{MaxError, Result};

/// Addressing of a viewed array.
///
/// One table per axis; the buffer position of the element `(i0, .., ik)` is
/// `tables[0][i0] + .. + tables[k][ik]`. Tables are never mutated once built;
/// every view transformation produces a new `IndexOffset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOffset {
    tables: Vec<Vec<usize>>,
}

impl IndexOffset {
    /// Builds tables from explicit per-axis offsets.
    pub fn from_tables(tables: Vec<Vec<usize>>) -> Self {
        Self { tables }
    }

    /// Builds the tables that address a strided buffer of the given shape.
    pub fn from_strides(dim: &Dimension, strides: &Stride) -> Self {
        let tables = dim
            .as_slice()
            .iter()
            .zip(strides.as_slice())
            .map(|(&size, &stride)| (0..size).map(|i| i * stride).collect())
            .collect();
        Self { tables }
    }

    /// The identity view of a canonical dense buffer.
    pub fn dense(dim: &Dimension) -> Self {
        Self::from_strides(dim, &dim.strides())
    }

    /// Returns the number of axes.
    pub fn ndim(&self) -> usize {
        self.tables.len()
    }

    /// Returns the offset table of `axis`.
    #[inline]
    pub fn table(&self, axis: usize) -> &[usize] {
        &self.tables[axis]
    }

    /// Returns the extents described by the tables.
    pub fn dimension(&self) -> Dimension {
        Dimension::new(self.tables.iter().map(Vec::len).collect::<Vec<_>>())
    }

    /// Buffer slots between the first two elements along `axis`, or 0 for a
    /// singleton or repeated axis.
    pub fn delta(&self, axis: usize) -> isize {
        match self.tables.get(axis) {
            Some(table) if table.len() > 1 => table[1] as isize - table[0] as isize,
            _ => 0,
        }
    }

    /// Buffer position of a multi-index.
    pub fn offset(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.ndim() {
            return Err(MaxError::invalid_shape(format!(
                "index of rank {} for view of rank {}",
                index.len(),
                self.ndim()
            )));
        }
        let mut offset = 0;
        for (axis, (&i, table)) in index.iter().zip(&self.tables).enumerate() {
            offset += table
                .get(i)
                .ok_or_else(|| MaxError::index_out_of_bounds(i, table.len(), axis))?;
        }
        Ok(offset)
    }

    /// Buffer position of the element at canonical (column-major) position
    /// `linear`.
    #[inline]
    pub fn offset_of_linear(&self, mut linear: usize) -> usize {
        let mut offset = 0;
        for table in &self.tables {
            let len = table.len();
            offset += table[linear % len];
            linear /= len;
        }
        offset
    }

    /// Largest buffer position any element of this view may touch.
    pub fn max_offset(&self) -> usize {
        self.tables
            .iter()
            .map(|t| t.iter().copied().max().unwrap_or(0))
            .sum()
    }

    /// Reorders the axes: axis `i` of the result is axis `perm[i]` of `self`.
    pub fn permute(&self, perm: &[usize]) -> Result<Self> {
        if perm.len() != self.ndim() {
            return Err(MaxError::invalid_permutation(perm));
        }
        let mut seen = vec![false; perm.len()];
        for &p in perm {
            if p >= perm.len() || seen[p] {
                return Err(MaxError::invalid_permutation(perm));
            }
            seen[p] = true;
        }
        Ok(Self {
            tables: perm.iter().map(|&p| self.tables[p].clone()).collect(),
        })
    }

    /// Reverses the axis order.
    pub fn reversed(&self) -> Self {
        Self {
            tables: self.tables.iter().rev().cloned().collect(),
        }
    }

    /// Keeps only the listed positions of `axis`, in the listed order.
    pub fn select(&self, axis: usize, positions: &[usize]) -> Result<Self> {
        let source = self
            .tables
            .get(axis)
            .ok_or_else(|| MaxError::invalid_axis(axis, self.ndim()))?;
        let mut picked = Vec::with_capacity(positions.len());
        for &p in positions {
            picked.push(
                *source
                    .get(p)
                    .ok_or_else(|| MaxError::index_out_of_bounds(p, source.len(), axis))?,
            );
        }
        let mut tables = self.tables.clone();
        tables[axis] = picked;
        Ok(Self { tables })
    }

    /// Stretches the singleton `axis` to `count` entries that all address
    /// the same slot.
    pub fn repeat(&self, axis: usize, count: usize) -> Result<Self> {
        let source = self
            .tables
            .get(axis)
            .ok_or_else(|| MaxError::invalid_axis(axis, self.ndim()))?;
        if source.len() != 1 {
            return Err(MaxError::invalid_shape(format!(
                "only singleton axes can be repeated, axis {} has size {}",
                axis,
                source.len()
            )));
        }
        let mut tables = self.tables.clone();
        tables[axis] = vec![source[0]; count];
        Ok(Self { tables })
    }
}
