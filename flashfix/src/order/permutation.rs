// SPDX-License-Identifier: MIT

use crate::layout::{ChunkNaming, FlashLayout};
use crate::order::error::OrderError;

/// Order in which a shell glob (`cat part_*.bin`) concatenates `count` chunk
/// files: indices `0..count` sorted by the byte-wise ordering of their names.
///
/// `order[p]` is the chunk index that landed at position `p` of the
/// scrambled image. For the default naming and `count <= 10` this is the
/// identity; from 11 chunks on `part_10.bin` sorts before `part_2.bin`.
pub fn lexicographic_order(naming: &ChunkNaming, count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..count).collect();
    order.sort_by_cached_key(|&i| naming.file_name(i));
    order
}

/// Inverts a chunk ordering: `inverse[order[p]] == p` for every position `p`.
///
/// Fails if `order` is not a permutation of `0..order.len()`.
pub fn invert_order(order: &[usize]) -> Result<Vec<usize>, OrderError> {
    let len = order.len();
    let mut inverse: Vec<Option<usize>> = vec![None; len];

    for (position, &index) in order.iter().enumerate() {
        let slot = inverse.get_mut(index).ok_or(OrderError::OutOfRange {
            position,
            index,
            len,
        })?;
        if let Some(first) = *slot {
            return Err(OrderError::Duplicate {
                index,
                first,
                second: position,
            });
        }
        *slot = Some(position);
    }

    // len entries, no duplicates, all in range: every slot is filled
    Ok(inverse.into_iter().flatten().collect())
}

/// Scrambling order of a layout together with its inverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOrder {
    order: Vec<usize>,
    inverse: Vec<usize>,
}

impl ChunkOrder {
    /// The order a lexicographic glob produced for this layout.
    pub fn lexicographic(layout: &FlashLayout) -> Result<Self, OrderError> {
        let order = lexicographic_order(layout.naming(), layout.chunk_count());
        Self::from_order(layout, order)
    }

    /// Builds from an arbitrary ordering, checked against the layout.
    pub fn from_order(layout: &FlashLayout, order: Vec<usize>) -> Result<Self, OrderError> {
        if order.len() != layout.chunk_count() {
            return Err(OrderError::LengthMismatch {
                expected: layout.chunk_count(),
                actual: order.len(),
            });
        }
        let inverse = invert_order(&order)?;
        Ok(Self { order, inverse })
    }

    /// Position -> chunk index.
    #[inline]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Chunk index -> position in the scrambled image.
    #[inline]
    pub fn inverse(&self) -> &[usize] {
        &self.inverse
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// True when no chunk moves, i.e. the dump was never scrambled.
    pub fn is_identity(&self) -> bool {
        self.order.iter().enumerate().all(|(p, &c)| p == c)
    }

    /// Number of chunks that sit at the wrong position.
    pub fn displaced(&self) -> usize {
        self.order
            .iter()
            .enumerate()
            .filter(|&(p, &c)| p != c)
            .count()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sixteen_chunks_match_shell_glob() {
        let order = lexicographic_order(&ChunkNaming::default(), 16);
        assert_eq!(
            order,
            vec![0, 1, 10, 11, 12, 13, 14, 15, 2, 3, 4, 5, 6, 7, 8, 9]
        );
    }

    #[test]
    fn up_to_ten_chunks_is_identity() {
        for n in 0..=10 {
            let order = lexicographic_order(&ChunkNaming::default(), n);
            assert_eq!(order, (0..n).collect::<Vec<_>>(), "n = {n}");
        }
        let order = lexicographic_order(&ChunkNaming::default(), 11);
        assert_eq!(order, vec![0, 1, 10, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn three_digit_indices() {
        let order = lexicographic_order(&ChunkNaming::default(), 101);
        assert_eq!(&order[..5], &[0, 1, 10, 100, 11]);
        assert_eq!(order.len(), 101);
    }

    #[test]
    fn inverse_of_sixteen() {
        let order = lexicographic_order(&ChunkNaming::default(), 16);
        let inverse = invert_order(&order).unwrap();
        assert_eq!(
            inverse,
            vec![0, 1, 8, 9, 10, 11, 12, 13, 14, 15, 2, 3, 4, 5, 6, 7]
        );
        for (p, &c) in order.iter().enumerate() {
            assert_eq!(inverse[c], p);
        }
    }

    #[test]
    fn invert_twice_is_identity() {
        let perms: [&[usize]; 4] = [&[], &[0], &[2, 0, 1], &[4, 3, 2, 1, 0]];
        for perm in perms {
            let inverse = invert_order(perm).unwrap();
            let mut sorted = inverse.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..perm.len()).collect::<Vec<_>>());
            assert_eq!(invert_order(&inverse).unwrap(), perm);
        }
    }

    #[test]
    fn invert_rejects_non_permutations() {
        assert_eq!(
            invert_order(&[0, 3, 1]).unwrap_err(),
            OrderError::OutOfRange {
                position: 1,
                index: 3,
                len: 3
            }
        );
        assert_eq!(
            invert_order(&[1, 0, 1]).unwrap_err(),
            OrderError::Duplicate {
                index: 1,
                first: 0,
                second: 2
            }
        );
    }

    #[test]
    fn chunk_order_for_default_layout() {
        let order = ChunkOrder::lexicographic(&FlashLayout::default()).unwrap();
        assert_eq!(order.len(), 16);
        assert!(!order.is_identity());
        assert_eq!(order.displaced(), 14);
        assert_eq!(order.inverse()[10], 2);
    }

    #[test]
    fn chunk_order_from_explicit_order() {
        let layout = FlashLayout::new(0x400, 0x100).unwrap();
        let order = ChunkOrder::from_order(&layout, vec![3, 2, 1, 0]).unwrap();
        assert_eq!(order.inverse(), &[3, 2, 1, 0]);

        assert_eq!(
            ChunkOrder::from_order(&layout, vec![0, 1]).unwrap_err(),
            OrderError::LengthMismatch {
                expected: 4,
                actual: 2
            }
        );
        assert!(ChunkOrder::from_order(&layout, vec![0, 0, 1, 2]).is_err());

        let small = ChunkOrder::lexicographic(&layout).unwrap();
        assert!(small.is_identity());
    }
}
