//! Boolean-mask indexing tests

use specr::index::IndexExpr;
use specr::prelude::*;

fn arange_3x4() -> Tensor {
    Tensor::arange(12, DType::I64).reshape(&[3, 4]).unwrap()
}

// ============================================================================
// Reads
// ============================================================================

#[test]
fn test_full_mask_flattens_row_major() {
    let y = arange_3x4();
    // Select the even entries
    let flags: Vec<bool> = (0..12).map(|v| v % 2 == 0).collect();
    let mask = Tensor::from_bool_slice(&flags, &[3, 4]).unwrap();

    let evens = y.get(&[IndexExpr::mask(mask)]).unwrap();
    assert_eq!(evens.shape(), &[6]);
    assert_eq!(evens.to_vec::<i64>(), [0, 2, 4, 6, 8, 10]);
}

#[test]
fn test_prefix_mask_selects_rows() {
    let y = arange_3x4();
    let mask = Tensor::from_bool_slice(&[true, false, true], &[3]).unwrap();

    let rows = y.get(&[IndexExpr::mask(mask)]).unwrap();
    assert_eq!(rows.shape(), &[2, 4]);
    assert_eq!(rows.to_vec::<i64>(), [0, 1, 2, 3, 8, 9, 10, 11]);
}

#[test]
fn test_u8_mask_accepted() {
    let y = Tensor::arange(4, DType::I64);
    let mask = Tensor::from_slice(&[1u8, 0, 1, 0], &[4]);
    let got = y.get(&[IndexExpr::mask(mask)]).unwrap();
    assert_eq!(got.to_vec::<i64>(), [0, 2]);
}

#[test]
fn test_all_false_mask_yields_empty() {
    let y = arange_3x4();
    let mask = Tensor::from_bool_slice(&[false; 3], &[3]).unwrap();
    let got = y.get(&[IndexExpr::mask(mask)]).unwrap();
    assert_eq!(got.shape(), &[0, 4]);
    assert_eq!(got.numel(), 0);
}

#[test]
fn test_mask_followed_by_slice() {
    let y = arange_3x4();
    let mask = Tensor::from_bool_slice(&[false, true, true], &[3]).unwrap();
    let got = y
        .get(&[IndexExpr::mask(mask), IndexExpr::range(0, 2)])
        .unwrap();
    assert_eq!(got.shape(), &[2, 2]);
    assert_eq!(got.to_vec::<i64>(), [4, 5, 8, 9]);
}

#[test]
fn test_mask_shape_mismatch_error() {
    let y = arange_3x4();
    let mask = Tensor::from_bool_slice(&[true, false], &[2]).unwrap();
    let err = y.get(&[IndexExpr::mask(mask)]).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
}

#[test]
fn test_non_boolean_mask_rejected() {
    let y = Tensor::arange(4, DType::I64);
    let mask = Tensor::from_slice(&[1.0f32, 0.0, 1.0, 0.0], &[4]);
    let err = y.get(&[IndexExpr::mask(mask)]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedDType { .. }));
}

// ============================================================================
// Writes
// ============================================================================

#[test]
fn test_masked_fill_scalar() {
    let mut y = arange_3x4();
    let flags: Vec<bool> = (0..12).map(|v| v % 2 == 0).collect();
    let mask = Tensor::from_bool_slice(&flags, &[3, 4]).unwrap();

    y.set_scalar(&[IndexExpr::mask(mask)], -1.0).unwrap();
    assert_eq!(
        y.to_vec::<i64>(),
        [-1, 1, -1, 3, -1, 5, -1, 7, -1, 9, -1, 11]
    );
}

#[test]
fn test_masked_set_with_array_value() {
    let mut y = Tensor::zeros(&[4], DType::F64);
    let mask = Tensor::from_bool_slice(&[true, false, false, true], &[4]).unwrap();
    let vals = Tensor::from_slice(&[2.5f64, 7.5], &[2]);
    y.set(&[IndexExpr::mask(mask)], &vals).unwrap();
    assert_eq!(y.to_vec::<f64>(), [2.5, 0.0, 0.0, 7.5]);
}

#[test]
fn test_masked_set_rows_broadcast() {
    let mut y = Tensor::zeros(&[3, 4], DType::I64);
    let mask = Tensor::from_bool_slice(&[false, true, false], &[3]).unwrap();
    let row = Tensor::from_slice(&[9i64, 8, 7, 6], &[4]);
    y.set(&[IndexExpr::mask(mask)], &row).unwrap();
    assert_eq!(y.to_vec::<i64>(), [0, 0, 0, 0, 9, 8, 7, 6, 0, 0, 0, 0]);
}

#[test]
fn test_masked_set_all_false_is_noop() {
    let mut y = Tensor::arange(4, DType::I64);
    let mask = Tensor::from_bool_slice(&[false; 4], &[4]).unwrap();
    y.set_scalar(&[IndexExpr::mask(mask)], 100.0).unwrap();
    assert_eq!(y.to_vec::<i64>(), [0, 1, 2, 3]);
}
