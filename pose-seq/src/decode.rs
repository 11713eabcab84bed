//! Deserialization of skeleton files into `(frames, dim)` arrays.
//!
//! `.npy` files hold either `(frames, joints, coords)` arrays, which are
//! flattened per frame, or already flat `(frames, dim)` arrays. Any other file
//! is read as whitespace separated text with one frame per line.

use crate::{common::*, error::SeqError};
use ndarray_npy::ReadNpyExt;

/// Loads the frame sequence stored in `path`.
pub fn load_sequence(path: impl AsRef<Path>) -> Result<Array2<f32>, SeqError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| SeqError::decode(path, err))?;

    let is_npy = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("npy"))
        .unwrap_or(false);

    let sequence = if is_npy {
        decode_npy(&bytes)
    } else {
        let text = std::str::from_utf8(&bytes).map_err(|err| SeqError::decode(path, err))?;
        parse_text(text)
    };
    sequence.map_err(|reason| SeqError::decode(path, reason))
}

/// Decodes an in-memory `.npy` payload of `f32` or `f64` elements.
pub fn decode_npy(bytes: &[u8]) -> Result<Array2<f32>, String> {
    let array = match ArrayD::<f32>::read_npy(Cursor::new(bytes)) {
        Ok(array) => array,
        Err(f32_err) => ArrayD::<f64>::read_npy(Cursor::new(bytes))
            .map(|array| array.mapv(|value| value as f32))
            .map_err(|_| f32_err.to_string())?,
    };
    flatten_frames(array)
}

/// Parses a whitespace separated numeric matrix, skipping blank lines.
pub fn parse_text(text: &str) -> Result<Array2<f32>, String> {
    let mut num_cols = None;
    let mut values = vec![];
    let mut num_rows = 0;

    for (lineno, line) in text.lines().enumerate() {
        let row: Vec<f32> = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse()
                    .map_err(|_| format!("invalid number '{}' at line {}", token, lineno + 1))
            })
            .collect::<Result<_, _>>()?;

        if row.is_empty() {
            continue;
        }

        match num_cols {
            None => num_cols = Some(row.len()),
            Some(expect) if expect != row.len() => {
                return Err(format!(
                    "line {} has {} columns, but {} is expected",
                    lineno + 1,
                    row.len(),
                    expect
                ));
            }
            Some(_) => {}
        }

        values.extend(row);
        num_rows += 1;
    }

    let num_cols = num_cols.ok_or_else(|| "no frames found".to_string())?;
    Array2::from_shape_vec((num_rows, num_cols), values).map_err(|err| err.to_string())
}

fn flatten_frames(array: ArrayD<f32>) -> Result<Array2<f32>, String> {
    let (frames, dim) = match *array.shape() {
        [frames, dim] => (frames, dim),
        [frames, joints, coords] => (frames, joints * coords),
        ref shape => {
            return Err(format!(
                "expect a rank 2 or rank 3 array, but get shape {:?}",
                shape
            ))
        }
    };

    if frames == 0 || dim == 0 {
        return Err(format!("empty array of shape {:?}", array.shape()));
    }

    array
        .as_standard_layout()
        .into_owned()
        .into_shape((frames, dim))
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array3;
    use ndarray_npy::WriteNpyExt;

    fn to_npy<T>(array: &T) -> Vec<u8>
    where
        T: WriteNpyExt,
    {
        let mut bytes = vec![];
        array.write_npy(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn parse_text_matrix() {
        let text = "0.5 1 2\n\n  3 4.25 -5  \n";
        let array = parse_text(text).unwrap();
        assert_eq!(
            array,
            ndarray::arr2(&[[0.5f32, 1.0, 2.0], [3.0, 4.25, -5.0]])
        );
    }

    #[test]
    fn parse_text_single_frame() {
        let array = parse_text("1 2 3 4").unwrap();
        assert_eq!(array.dim(), (1, 4));
    }

    #[test]
    fn parse_text_rejects_bad_input() {
        assert!(parse_text("").is_err());
        assert!(parse_text("\n \n").is_err());
        assert!(parse_text("1 2\n3").is_err());
        assert!(parse_text("1 x").is_err());
    }

    #[test]
    fn decode_rank3_npy_flattens_joints() {
        let array = Array3::from_shape_fn((4, 20, 3), |(t, j, c)| (t * 100 + j * 3 + c) as f64);
        let decoded = decode_npy(&to_npy(&array)).unwrap();

        assert_eq!(decoded.dim(), (4, 60));
        assert_eq!(decoded[[2, 0]], 200.0);
        assert_eq!(decoded[[2, 59]], 259.0);
    }

    #[test]
    fn decode_f64_npy_as_f32() {
        let array = ndarray::arr2(&[[0.1f64, -0.35], [1e-3, 2.5]]);
        let decoded = decode_npy(&to_npy(&array)).unwrap();

        assert_eq!(decoded.dim(), (2, 2));
        decoded
            .iter()
            .zip(array.iter())
            .for_each(|(&lhs, &rhs)| assert_abs_diff_eq!(lhs as f64, rhs, epsilon = 1e-6));
    }

    #[test]
    fn decode_rank2_npy() {
        let array = Array2::from_shape_fn((5, 6), |(t, d)| (t + d) as f32);
        let decoded = decode_npy(&to_npy(&array)).unwrap();
        assert_eq!(decoded, array);
    }

    #[test]
    fn decode_npy_rejects_bad_shapes() {
        let empty = Array3::<f32>::zeros((0, 20, 3));
        assert!(decode_npy(&to_npy(&empty)).is_err());

        let flat = Array1::<f32>::zeros(10);
        assert!(decode_npy(&to_npy(&flat)).is_err());

        assert!(decode_npy(b"not a numpy file").is_err());
    }

    #[test]
    fn load_sequence_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk_s01_e01.txt");
        fs::write(&path, "1 2\n3").unwrap();

        match load_sequence(&path) {
            Err(SeqError::Decode { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
