//! Integer index-array (fancy indexing) tests

use specr::index::IndexExpr;
use specr::prelude::*;

fn arange_3x4() -> Tensor {
    Tensor::arange(12, DType::I64).reshape(&[3, 4]).unwrap()
}

// ============================================================================
// Reads
// ============================================================================

#[test]
fn test_paired_index_arrays() {
    let y = arange_3x4();
    let rows = Tensor::from_slice(&[0i64, 2], &[2]);
    let cols = Tensor::from_slice(&[3i64, 1], &[2]);
    let got = y
        .get(&[IndexExpr::take(rows), IndexExpr::take(cols)])
        .unwrap();
    assert_eq!(got.shape(), &[2]);
    assert_eq!(got.to_vec::<i64>(), [3, 9]);
}

#[test]
fn test_single_axis_array_appends_remaining_axes() {
    let y = arange_3x4();
    let rows = Tensor::from_slice(&[2i64, 0], &[2]);
    let got = y.get(&[IndexExpr::take(rows)]).unwrap();
    assert_eq!(got.shape(), &[2, 4]);
    assert_eq!(got.to_vec::<i64>(), [8, 9, 10, 11, 0, 1, 2, 3]);
}

#[test]
fn test_index_arrays_broadcast_together() {
    let y = arange_3x4();
    // rows [2,1] x cols [3] broadcast to [2,3]
    let rows = Tensor::from_slice(&[0i64, 2], &[2, 1]);
    let cols = Tensor::from_slice(&[0i64, 1, 2], &[3]);
    let got = y
        .get(&[IndexExpr::take(rows), IndexExpr::take(cols)])
        .unwrap();
    assert_eq!(got.shape(), &[2, 3]);
    assert_eq!(got.to_vec::<i64>(), [0, 1, 2, 8, 9, 10]);
}

#[test]
fn test_negative_array_indices() {
    let y = Tensor::arange(5, DType::I64);
    let idx = Tensor::from_slice(&[-1i64, -5, 2], &[3]);
    let got = y.get(&[IndexExpr::take(idx)]).unwrap();
    assert_eq!(got.to_vec::<i64>(), [4, 0, 2]);
}

#[test]
fn test_int_joins_array_broadcast() {
    let y = arange_3x4();
    let cols = Tensor::from_slice(&[0i64, 3], &[2]);
    let got = y
        .get(&[IndexExpr::Int(1), IndexExpr::take(cols)])
        .unwrap();
    assert_eq!(got.shape(), &[2]);
    assert_eq!(got.to_vec::<i64>(), [4, 7]);
}

#[test]
fn test_array_with_slice() {
    let y = arange_3x4();
    let rows = Tensor::from_slice(&[0i64, 2], &[2]);
    let got = y
        .get(&[IndexExpr::take(rows), IndexExpr::range(1, 3)])
        .unwrap();
    assert_eq!(got.shape(), &[2, 2]);
    assert_eq!(got.to_vec::<i64>(), [1, 2, 9, 10]);
}

#[test]
fn test_multidimensional_index_array() {
    let y = Tensor::arange(5, DType::I64);
    let idx = Tensor::from_slice(&[0i64, 4, 1, 3], &[2, 2]);
    let got = y.get(&[IndexExpr::take(idx)]).unwrap();
    assert_eq!(got.shape(), &[2, 2]);
    assert_eq!(got.to_vec::<i64>(), [0, 4, 1, 3]);
}

#[test]
fn test_i32_index_array() {
    let y = Tensor::arange(5, DType::I64);
    let idx = Tensor::from_slice(&[1i32, 3], &[2]);
    let got = y.get(&[IndexExpr::take(idx)]).unwrap();
    assert_eq!(got.to_vec::<i64>(), [1, 3]);
}

#[test]
fn test_array_index_out_of_bounds() {
    let y = Tensor::arange(5, DType::I64);
    let idx = Tensor::from_slice(&[5i64], &[1]);
    let err = y.get(&[IndexExpr::take(idx)]).unwrap_err();
    assert!(matches!(
        err,
        Error::IndexOutOfBounds {
            index: 5,
            size: 5,
            axis: 0
        }
    ));
}

#[test]
fn test_float_index_array_rejected() {
    let y = Tensor::arange(5, DType::I64);
    let idx = Tensor::from_slice(&[1.0f32], &[1]);
    let err = y.get(&[IndexExpr::take(idx)]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedDType { .. }));
}

#[test]
fn test_mismatched_index_arrays_error() {
    let y = arange_3x4();
    let rows = Tensor::from_slice(&[0i64, 1], &[2]);
    let cols = Tensor::from_slice(&[0i64, 1, 2], &[3]);
    let err = y
        .get(&[IndexExpr::take(rows), IndexExpr::take(cols)])
        .unwrap_err();
    assert!(matches!(err, Error::BroadcastError { .. }));
}

#[test]
fn test_empty_index_array() {
    let y = arange_3x4();
    let rows = Tensor::from_slice(&[] as &[i64], &[0]);
    let got = y.get(&[IndexExpr::take(rows)]).unwrap();
    assert_eq!(got.shape(), &[0, 4]);
    assert_eq!(got.numel(), 0);
}

// ============================================================================
// Writes
// ============================================================================

#[test]
fn test_scatter_scalar_to_positions() {
    let mut y = Tensor::zeros(&[5], DType::I64);
    let idx = Tensor::from_slice(&[0i64, 2, 4], &[3]);
    y.set_scalar(&[IndexExpr::take(idx)], 1.0).unwrap();
    assert_eq!(y.to_vec::<i64>(), [1, 0, 1, 0, 1]);
}

#[test]
fn test_scatter_array_value() {
    let mut y = Tensor::zeros(&[3, 4], DType::I64);
    let rows = Tensor::from_slice(&[0i64, 2], &[2]);
    let cols = Tensor::from_slice(&[3i64, 1], &[2]);
    let vals = Tensor::from_slice(&[7i64, 8], &[2]);
    y.set(&[IndexExpr::take(rows), IndexExpr::take(cols)], &vals)
        .unwrap();
    assert_eq!(y.to_vec::<i64>(), [0, 0, 0, 7, 0, 0, 0, 0, 0, 8, 0, 0]);
}

#[test]
fn test_scatter_rows_broadcasts_value() {
    let mut y = Tensor::zeros(&[3, 4], DType::I64);
    let rows = Tensor::from_slice(&[1i64, 2], &[2]);
    let row_vals = Tensor::from_slice(&[1i64, 2, 3, 4], &[4]);
    y.set(&[IndexExpr::take(rows)], &row_vals).unwrap();
    assert_eq!(y.to_vec::<i64>(), [0, 0, 0, 0, 1, 2, 3, 4, 1, 2, 3, 4]);
}

#[test]
fn test_scatter_value_shape_error() {
    let mut y = Tensor::zeros(&[5], DType::I64);
    let idx = Tensor::from_slice(&[0i64, 2], &[2]);
    let vals = Tensor::from_slice(&[1i64, 2, 3], &[3]);
    let err = y.set(&[IndexExpr::take(idx)], &vals).unwrap_err();
    assert!(matches!(err, Error::BroadcastError { .. }));
}

#[test]
fn test_scatter_then_gather_roundtrip() {
    let mut y = Tensor::zeros(&[4, 3], DType::F64);
    let rows = Tensor::from_slice(&[3i64, 0], &[2]);
    let vals = Tensor::from_slice(&[1.5f64, 2.5, 3.5, 4.5, 5.5, 6.5], &[2, 3]);
    y.set(&[IndexExpr::take(rows.clone())], &vals).unwrap();
    let back = y.get(&[IndexExpr::take(rows)]).unwrap();
    assert_eq!(back.to_vec::<f64>(), vals.to_vec::<f64>());
}
