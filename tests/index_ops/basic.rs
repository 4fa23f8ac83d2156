//! Scalar-index and slice tests, read and write

use specr::index::IndexExpr;
use specr::prelude::*;

// ============================================================================
// Scalar Index Reads
// ============================================================================

#[test]
fn test_get_scalar_element() {
    let x = Tensor::from_slice(&[1i32, 2, 3, 4], &[2, 2]);
    let v = x.get(&[IndexExpr::Int(0), IndexExpr::Int(1)]).unwrap();
    assert!(v.is_scalar());
    assert_eq!(v.item::<i32>().unwrap(), 2);
}

#[test]
fn test_get_reduces_rank() {
    let y = Tensor::arange(12, DType::I64).reshape(&[3, 4]).unwrap();
    let row = y.get(&[IndexExpr::Int(1)]).unwrap();
    assert_eq!(row.shape(), &[4]);
    assert_eq!(row.to_vec::<i64>(), [4, 5, 6, 7]);
}

#[test]
fn test_get_negative_index() {
    let y = Tensor::arange(10, DType::I64);
    let last = y.get(&[IndexExpr::Int(-1)]).unwrap();
    assert_eq!(last.item::<i64>().unwrap(), 9);

    let second = y.get(&[IndexExpr::Int(-9)]).unwrap();
    assert_eq!(second.item::<i64>().unwrap(), 1);
}

#[test]
fn test_get_out_of_range_error() {
    let y = Tensor::arange(12, DType::I64).reshape(&[3, 4]).unwrap();
    let err = y.get(&[IndexExpr::Int(0), IndexExpr::Int(4)]).unwrap_err();
    match err {
        Error::IndexOutOfBounds { index, size, axis } => {
            assert_eq!(index, 4);
            assert_eq!(size, 4);
            assert_eq!(axis, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(y.get(&[IndexExpr::Int(-4)]).is_err());
}

#[test]
fn test_too_many_indices_error() {
    let y = Tensor::arange(4, DType::I64).reshape(&[2, 2]).unwrap();
    let err = y
        .get(&[IndexExpr::Int(0), IndexExpr::Int(0), IndexExpr::Int(0)])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "index", .. }));
}

// ============================================================================
// Slice Reads
// ============================================================================

#[test]
fn test_get_slice_region() {
    let y = Tensor::arange(12, DType::I64).reshape(&[3, 4]).unwrap();
    let sub = y.get(&[IndexExpr::full(), IndexExpr::range(1, 3)]).unwrap();
    assert_eq!(sub.shape(), &[3, 2]);
    assert_eq!(sub.to_vec::<i64>(), [1, 2, 5, 6, 9, 10]);
}

#[test]
fn test_get_slice_preserves_rank_and_is_view() {
    let y = Tensor::arange(12, DType::I64).reshape(&[3, 4]).unwrap();
    let sub = y.get(&[IndexExpr::range(0, 2)]).unwrap();
    assert_eq!(sub.shape(), &[2, 4]);
    assert!(y.storage().same_buffer(sub.storage()));
}

#[test]
fn test_get_reversed_slice() {
    let y = Tensor::arange(10, DType::I64);
    let rev = y
        .get(&[IndexExpr::slice(None, None, Some(-1))])
        .unwrap();
    assert_eq!(rev.to_vec::<i64>(), [9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
}

#[test]
fn test_get_strided_slices() {
    let y = Tensor::arange(10, DType::I64);

    let every_other = y.get(&[IndexExpr::slice(None, None, Some(2))]).unwrap();
    assert_eq!(every_other.to_vec::<i64>(), [0, 2, 4, 6, 8]);

    let middle_rev = y
        .get(&[IndexExpr::slice(Some(7), Some(2), Some(-2))])
        .unwrap();
    assert_eq!(middle_rev.to_vec::<i64>(), [7, 5, 3]);

    let negative_bounds = y
        .get(&[IndexExpr::slice(Some(-4), Some(-1), None)])
        .unwrap();
    assert_eq!(negative_bounds.to_vec::<i64>(), [6, 7, 8]);
}

#[test]
fn test_slice_step_zero_error() {
    let y = Tensor::arange(4, DType::I64);
    let err = y
        .get(&[IndexExpr::slice(None, None, Some(0))])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "index", .. }));
}

#[test]
fn test_empty_slice_selection() {
    let y = Tensor::arange(5, DType::I64);
    let empty = y.get(&[IndexExpr::range(3, 3)]).unwrap();
    assert_eq!(empty.shape(), &[0]);
    assert_eq!(empty.numel(), 0);

    // Bounds past the end clamp rather than error, as in Python
    let clamped = y.get(&[IndexExpr::range(3, 100)]).unwrap();
    assert_eq!(clamped.to_vec::<i64>(), [3, 4]);
}

// ============================================================================
// Writes
// ============================================================================

#[test]
fn test_set_scalar_element() {
    let mut x = Tensor::from_slice(&[1i32, 2, 3, 4], &[2, 2]);
    x.set_scalar(&[IndexExpr::Int(1), IndexExpr::Int(0)], 99.0)
        .unwrap();
    assert_eq!(x.to_vec::<i32>(), [1, 2, 99, 4]);
}

#[test]
fn test_set_slice_region_with_scalar() {
    let mut y = Tensor::zeros(&[3, 4], DType::I32);
    y.set_scalar(&[IndexExpr::range(0, 2), IndexExpr::range(1, 3)], 7.0)
        .unwrap();
    assert_eq!(
        y.to_vec::<i32>(),
        [0, 7, 7, 0, 0, 7, 7, 0, 0, 0, 0, 0]
    );
}

#[test]
fn test_set_row_with_array_value() {
    let mut y = Tensor::zeros(&[3, 4], DType::I32);
    let row = Tensor::from_slice(&[1i32, 2, 3, 4], &[4]);
    y.set(&[IndexExpr::Int(1)], &row).unwrap();
    assert_eq!(y.to_vec::<i32>(), [0, 0, 0, 0, 1, 2, 3, 4, 0, 0, 0, 0]);
}

#[test]
fn test_set_broadcasts_column_value() {
    // A [2, 1] value broadcasts across the selected [2, 3] region
    let mut y = Tensor::zeros(&[2, 3], DType::F64);
    let col = Tensor::from_slice(&[1.0f64, 2.0], &[2, 1]);
    y.set(&[IndexExpr::full(), IndexExpr::full()], &col).unwrap();
    assert_eq!(y.to_vec::<f64>(), [1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
}

#[test]
fn test_set_non_broadcastable_error() {
    let mut y = Tensor::zeros(&[3, 4], DType::I32);
    let bad = Tensor::from_slice(&[1i32, 2, 3], &[3]);
    let err = y.set(&[IndexExpr::Int(0)], &bad).unwrap_err();
    assert!(matches!(err, Error::BroadcastError { .. }));
}

#[test]
fn test_set_then_get_roundtrip() {
    let mut y = Tensor::zeros(&[3, 4], DType::I64);
    let vals = Tensor::from_slice(&[5i64, 6], &[2]);
    y.set(&[IndexExpr::Int(2), IndexExpr::range(1, 3)], &vals)
        .unwrap();
    let back = y
        .get(&[IndexExpr::Int(2), IndexExpr::range(1, 3)])
        .unwrap();
    assert_eq!(back.to_vec::<i64>(), [5, 6]);
}

#[test]
fn test_set_through_view_is_visible_in_parent() {
    let mut y = Tensor::arange(6, DType::I64).reshape(&[2, 3]).unwrap();
    let mut row = y.get(&[IndexExpr::Int(0)]).unwrap();
    row.set_scalar(&[IndexExpr::Int(1)], 42.0).unwrap();
    assert_eq!(y.to_vec::<i64>(), [0, 42, 2, 3, 4, 5]);
}

#[test]
fn test_set_empty_selection_is_noop() {
    let mut y = Tensor::arange(5, DType::I64);
    y.set_scalar(&[IndexExpr::range(2, 2)], 9.0).unwrap();
    assert_eq!(y.to_vec::<i64>(), [0, 1, 2, 3, 4]);
}

#[test]
fn test_set_converts_value_dtype() {
    let mut y = Tensor::zeros(&[2], DType::I32);
    let v = Tensor::from_slice(&[2.9f64, -1.2], &[2]);
    y.set(&[IndexExpr::full()], &v).unwrap();
    assert_eq!(y.to_vec::<i32>(), [2, -1]);
}

#[test]
fn test_set_reversed_self_view() {
    let mut x = Tensor::from_slice(&[1i64, 2, 3, 4, 5], &[5]);
    let rev = x.get(&[IndexExpr::slice(None, None, Some(-1))]).unwrap();
    x.set(&[IndexExpr::full()], &rev).unwrap();
    assert_eq!(x.to_vec::<i64>(), [5, 4, 3, 2, 1]);
}
