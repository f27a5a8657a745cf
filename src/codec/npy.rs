//! NumPy `.npy` payload format, as written by `np.save`.
//!
//! Encoding writes `<f8` elements in C order. Decoding accepts any fixed-width
//! numeric dtype in either byte order and widens it to `f64`.

use ndarray::{ArrayD, ArrayViewD};
use ndarray_npy::{ReadNpyError, ReadNpyExt, ReadableElement, WriteNpyExt};

use super::{ArrayCodec, DecodeError, EncodeError};

/// Codec speaking the NumPy `.npy` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpyCodec;

type Reader = fn(&[u8]) -> Result<ArrayD<f64>, ReadNpyError>;

impl ArrayCodec for NpyCodec {
    fn encode(&self, array: ArrayViewD<'_, f64>) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        array
            .write_npy(&mut buf)
            .map_err(|e| EncodeError(e.to_string()))?;
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8]) -> Result<ArrayD<f64>, DecodeError> {
        // f64 first; the rest only run when the descriptor does not match.
        let readers: [Reader; 10] = [
            read_widened::<f64>,
            read_widened::<f32>,
            read_widened::<i32>,
            read_widened::<i16>,
            read_widened::<i8>,
            read_widened::<u32>,
            read_widened::<u16>,
            read_widened::<u8>,
            read_i64,
            read_u64,
        ];

        let mut unsupported = String::new();
        for read in readers {
            match read(bytes) {
                Ok(array) => return Ok(array),
                Err(err @ ReadNpyError::WrongDescriptor(_)) => unsupported = err.to_string(),
                Err(err) => return Err(DecodeError::Malformed(err.to_string())),
            }
        }
        Err(DecodeError::UnsupportedDtype(unsupported))
    }
}

fn read_widened<A>(bytes: &[u8]) -> Result<ArrayD<f64>, ReadNpyError>
where
    A: ReadableElement + Copy + Into<f64>,
{
    Ok(ArrayD::<A>::read_npy(bytes)?.mapv(|v| v.into()))
}

fn read_i64(bytes: &[u8]) -> Result<ArrayD<f64>, ReadNpyError> {
    Ok(ArrayD::<i64>::read_npy(bytes)?.mapv(|v| v as f64))
}

fn read_u64(bytes: &[u8]) -> Result<ArrayD<f64>, ReadNpyError> {
    Ok(ArrayD::<u64>::read_npy(bytes)?.mapv(|v| v as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr0, arr1, arr2, Array1, Array2, ShapeBuilder};

    fn round_trip(array: ArrayD<f64>) {
        let bytes = NpyCodec.encode(array.view()).unwrap();
        assert_eq!(NpyCodec.decode(&bytes).unwrap(), array);
    }

    fn npy<A: ndarray_npy::WritableElement, D: ndarray::Dimension>(
        array: &ndarray::Array<A, D>,
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        array.write_npy(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_round_trip_vector() {
        round_trip(arr1(&[1.5, -2.25, 3.0, f64::MAX, f64::MIN_POSITIVE]).into_dyn());
    }

    #[test]
    fn test_round_trip_matrix_keeps_shape() {
        let matrix = arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).into_dyn();
        let decoded = NpyCodec.decode(&NpyCodec.encode(matrix.view()).unwrap()).unwrap();
        assert_eq!(decoded.shape(), &[2, 3]);
        assert_eq!(decoded, matrix);
    }

    #[test]
    fn test_round_trip_empty_and_single() {
        round_trip(Array1::<f64>::zeros(0).into_dyn());
        round_trip(arr1(&[42.0]).into_dyn());
        round_trip(arr0(7.0).into_dyn());
        round_trip(Array2::<f64>::zeros((3, 0)).into_dyn());
    }

    #[test]
    fn test_round_trip_transposed_view() {
        let matrix = arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).into_dyn();
        let transposed = matrix.t();
        let decoded = NpyCodec.decode(&NpyCodec.encode(transposed.view()).unwrap()).unwrap();
        assert_eq!(decoded, transposed);
    }

    #[test]
    fn test_encoding_is_numpy_compatible() {
        let bytes = NpyCodec.encode(arr1(&[1.0, 2.0]).into_dyn().view()).unwrap();
        assert!(bytes.starts_with(b"\x93NUMPY"));
        let header = String::from_utf8_lossy(&bytes[..bytes.len() - 16]);
        assert!(header.contains("'descr': '<f8'"), "header: {header}");
        assert!(header.contains("'shape': (2,)"), "header: {header}");
    }

    #[test]
    fn test_decode_widens_integer_dtypes() {
        let ints = NpyCodec.decode(&npy(&arr1(&[1i32, -2, 3]))).unwrap();
        assert_eq!(ints, arr1(&[1.0, -2.0, 3.0]).into_dyn());

        let longs = NpyCodec.decode(&npy(&arr1(&[7i64, -8]))).unwrap();
        assert_eq!(longs, arr1(&[7.0, -8.0]).into_dyn());

        let bytes = NpyCodec.decode(&npy(&arr1(&[255u8, 0]))).unwrap();
        assert_eq!(bytes, arr1(&[255.0, 0.0]).into_dyn());
    }

    #[test]
    fn test_decode_widens_float32() {
        let decoded = NpyCodec.decode(&npy(&arr1(&[0.5f32, -1.25]))).unwrap();
        assert_eq!(decoded, arr1(&[0.5, -1.25]).into_dyn());
    }

    #[test]
    fn test_decode_fortran_order() {
        let fortran = Array2::from_shape_vec((2, 3).f(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]).unwrap();
        let decoded = NpyCodec.decode(&npy(&fortran)).unwrap();
        assert_eq!(decoded, arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).into_dyn());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = NpyCodec.decode(b"not an array").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
        assert!(matches!(NpyCodec.decode(&[]), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        let bytes = NpyCodec.encode(arr1(&[1.0, 2.0, 3.0]).into_dyn().view()).unwrap();
        let err = NpyCodec.decode(&bytes[..bytes.len() - 4]).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = NpyCodec.encode(arr1(&[1.0]).into_dyn().view()).unwrap();
        bytes.extend_from_slice(&[0; 8]);
        assert!(matches!(
            NpyCodec.decode(&bytes),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_rejects_boolean_arrays() {
        let err = NpyCodec.decode(&npy(&arr1(&[true, false]))).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedDtype(_)));
    }
}
