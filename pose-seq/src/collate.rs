//! Stacking of sampled items into batch-major arrays.

use crate::{common::*, dataset::SampledItem, error::SeqError};

/// A batch of sampled items.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Class ids of shape `(batch,)`.
    pub labels: Array1<i64>,
    /// Frames of shape `(batch, frames, dim)`.
    pub sequences: Array3<f32>,
    /// Effective lengths of shape `(batch,)`.
    pub lengths: Array1<i64>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Stacks items of identical shape on a new leading batch axis.
pub fn collate(items: &[SampledItem]) -> Result<Batch, SeqError> {
    let first = items
        .first()
        .ok_or_else(|| SeqError::config("cannot collate an empty list of items"))?;
    let expected = first.sequence.shape();

    items
        .iter()
        .enumerate()
        .try_for_each(|(index, item)| check_shape(index, expected, item.sequence.shape()))?;

    let (frames, dim) = first.sequence.dim();
    Ok(Batch {
        labels: labels_of(items),
        sequences: stack_frames(items, frames, dim),
        lengths: lengths_of(items),
    })
}

/// Stacks items of varying frame counts, zero-padding each to the longest one.
///
/// The frame dimension must agree across items. The reported lengths are
/// taken from the items, so consumers can mask the padded tail.
pub fn collate_padded(items: &[SampledItem]) -> Result<Batch, SeqError> {
    let first = items
        .first()
        .ok_or_else(|| SeqError::config("cannot collate an empty list of items"))?;
    let dim = first.sequence.ncols();

    items.iter().enumerate().try_for_each(|(index, item)| {
        let found = item.sequence.ncols();
        if found == dim {
            Ok(())
        } else {
            Err(SeqError::ShapeMismatch {
                index,
                expected: vec![item.sequence.nrows(), dim],
                found: item.sequence.shape().to_vec(),
            })
        }
    })?;

    let max_frames = items
        .iter()
        .map(|item| item.sequence.nrows())
        .max()
        .unwrap_or(0);

    Ok(Batch {
        labels: labels_of(items),
        sequences: stack_frames(items, max_frames, dim),
        lengths: lengths_of(items),
    })
}

/// Copies every item into a zero-initialized `(batch, frames, dim)` array.
fn stack_frames(items: &[SampledItem], frames: usize, dim: usize) -> Array3<f32> {
    let mut sequences = Array3::zeros((items.len(), frames, dim));
    items
        .iter()
        .zip(sequences.outer_iter_mut())
        .for_each(|(item, mut slot)| {
            let len = item.sequence.nrows();
            slot.slice_mut(s![..len, ..]).assign(&item.sequence);
        });
    sequences
}

fn check_shape(index: usize, expected: &[usize], found: &[usize]) -> Result<(), SeqError> {
    if expected == found {
        Ok(())
    } else {
        Err(SeqError::ShapeMismatch {
            index,
            expected: expected.to_vec(),
            found: found.to_vec(),
        })
    }
}

fn labels_of(items: &[SampledItem]) -> Array1<i64> {
    items.iter().map(|item| item.label as i64).collect()
}

fn lengths_of(items: &[SampledItem]) -> Array1<i64> {
    items.iter().map(|item| item.length as i64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: usize, frames: usize, dim: usize, value: f32) -> SampledItem {
        SampledItem {
            label,
            sequence: Array2::from_elem((frames, dim), value),
            length: frames,
        }
    }

    #[test]
    fn collate_stacks_items() {
        let items = vec![item(0, 4, 3, 1.0), item(2, 4, 3, 2.0), item(1, 4, 3, 3.0)];
        let batch = collate(&items).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.sequences.dim(), (3, 4, 3));
        assert_eq!(batch.labels, ndarray::arr1(&[0i64, 2, 1]));
        assert_eq!(batch.lengths, ndarray::arr1(&[4i64, 4, 4]));
        assert!(batch
            .sequences
            .index_axis(Axis(0), 1)
            .iter()
            .all(|&value| value == 2.0));
    }

    #[test]
    fn collate_rejects_mismatched_shapes() {
        let items = vec![item(0, 4, 3, 1.0), item(0, 4, 3, 1.0), item(1, 5, 3, 1.0)];

        match collate(&items) {
            Err(SeqError::ShapeMismatch {
                index,
                expected,
                found,
            }) => {
                assert_eq!(index, 2);
                assert_eq!(expected, [4, 3]);
                assert_eq!(found, [5, 3]);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn collate_rejects_empty_input() {
        assert!(matches!(collate(&[]), Err(SeqError::Config(_))));
        assert!(matches!(collate_padded(&[]), Err(SeqError::Config(_))));
    }

    #[test]
    fn collate_padded_keeps_true_lengths() {
        let items = vec![item(0, 2, 3, 1.0), item(1, 5, 3, 2.0)];
        let batch = collate_padded(&items).unwrap();

        assert_eq!(batch.sequences.dim(), (2, 5, 3));
        assert_eq!(batch.lengths, ndarray::arr1(&[2i64, 5]));
        assert!(batch
            .sequences
            .slice(s![0, ..2, ..])
            .iter()
            .all(|&value| value == 1.0));
        assert!(batch
            .sequences
            .slice(s![0, 2.., ..])
            .iter()
            .all(|&value| value == 0.0));
    }

    #[test]
    fn collate_padded_rejects_mismatched_dims() {
        let items = vec![item(0, 2, 3, 1.0), item(1, 2, 4, 1.0)];
        assert!(matches!(
            collate_padded(&items),
            Err(SeqError::ShapeMismatch { index: 1, .. })
        ));
    }
}
