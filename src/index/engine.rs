//! Index-expression resolution for `get` and `set`
//!
//! Resolution happens in two phases. A dispatch pass expands the expression
//! tuple to exactly one entry per axis (boolean masks become integer index
//! arrays, missing trailing axes become full slices). Tuples of integers
//! and slices then resolve to a zero-copy view; tuples containing index
//! arrays go through the gather/scatter path, broadcasting the index arrays
//! together and visiting each selected position.

use super::{IndexExpr, SliceArg};
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::tensor::{broadcast_shapes, Shape, Tensor};

/// Per-axis index after mask expansion
enum AxisIndex {
    Int(isize),
    Slice(SliceArg),
    Array(Tensor),
}

/// A resolved fancy selection: broadcast index vectors over a sliced,
/// permuted view with the fancy axes in front.
struct FancySelection {
    /// Sliced view of the source, fancy axes permuted to the front
    view: Tensor,
    /// One normalized index vector per fancy axis, each `bcount` long
    indices: Vec<Vec<usize>>,
    /// Broadcast shape of the index arrays
    broadcast: Shape,
    /// Shape of the axes not covered by index arrays (after slicing)
    rest_shape: Vec<usize>,
}

impl FancySelection {
    fn bcount(&self) -> usize {
        self.broadcast.iter().product()
    }

    fn rest_numel(&self) -> usize {
        self.rest_shape.iter().product()
    }

    fn result_shape(&self) -> Vec<usize> {
        let mut shape: Vec<usize> = self.broadcast.to_vec();
        shape.extend_from_slice(&self.rest_shape);
        shape
    }

    /// View of the source elements selected by broadcast element `b`
    fn selected(&self, b: usize) -> Tensor {
        let mut layout = self.view.layout().clone();
        for idx in &self.indices {
            layout = layout
                .select(0, idx[b])
                .expect("validated fancy index out of bounds");
        }
        self.view.view_with_layout(layout)
    }
}

impl Tensor {
    /// Read through an index expression tuple
    ///
    /// Integer and slice tuples return a zero-copy view; index arrays and
    /// masks gather into a fresh tensor. Integer indices reduce rank.
    pub fn get(&self, index: &[IndexExpr]) -> Result<Tensor> {
        let axes = self.expand_index(index)?;
        if axes.iter().any(|a| matches!(a, AxisIndex::Array(_))) {
            let sel = self.build_fancy(axes)?;
            self.gather(&sel)
        } else {
            self.basic_view(&axes)
        }
    }

    /// Write through an index expression tuple, in place
    ///
    /// The value broadcasts against the selection shape and is converted to
    /// this tensor's dtype. Writes are visible through every view sharing
    /// this tensor's storage. When index arrays select the same position
    /// more than once, the value written last in row-major order of the
    /// broadcast index shape wins.
    pub fn set(&mut self, index: &[IndexExpr], value: &Tensor) -> Result<()> {
        // A value aliasing our storage must be snapshotted before we write.
        let value = if value.storage().same_buffer(self.storage()) {
            deep_copy(value)?
        } else {
            value.clone()
        };
        let value = if value.dtype() == self.dtype() {
            value
        } else {
            value.astype(self.dtype())?
        };

        let axes = self.expand_index(index)?;
        if axes.iter().any(|a| matches!(a, AxisIndex::Array(_))) {
            let sel = self.build_fancy(axes)?;
            self.scatter(&sel, &value)
        } else {
            let dest = self.basic_view(&axes)?;
            let src = broadcast_value(&value, dest.shape())?;
            copy_same_dtype(&src, &dest);
            Ok(())
        }
    }

    /// Write a scalar through an index expression tuple, in place
    pub fn set_scalar(&mut self, index: &[IndexExpr], value: f64) -> Result<()> {
        let v = Tensor::try_full_scalar(&[], self.dtype(), value)?;
        self.set(index, &v)
    }

    /// Expand an expression tuple to exactly one entry per axis
    fn expand_index(&self, index: &[IndexExpr]) -> Result<Vec<AxisIndex>> {
        let ndim = self.ndim();
        let mut axes: Vec<AxisIndex> = Vec::with_capacity(ndim);

        for expr in index {
            let axis = axes.len();
            match expr {
                IndexExpr::Int(i) => axes.push(AxisIndex::Int(*i)),
                IndexExpr::Slice(s) => axes.push(AxisIndex::Slice(*s)),
                IndexExpr::Array(t) => {
                    if !t.dtype().is_int() {
                        return Err(Error::UnsupportedDType {
                            dtype: t.dtype(),
                            op: "index array",
                        });
                    }
                    axes.push(AxisIndex::Array(t.clone()));
                }
                IndexExpr::Mask(m) => {
                    for arr in self.mask_to_index_arrays(m, axis)? {
                        axes.push(AxisIndex::Array(arr));
                    }
                }
            }
            if axes.len() > ndim {
                return Err(Error::InvalidArgument {
                    arg: "index",
                    reason: format!(
                        "too many indices for array with {} dimensions",
                        ndim
                    ),
                });
            }
        }

        while axes.len() < ndim {
            axes.push(AxisIndex::Slice(SliceArg::full()));
        }
        Ok(axes)
    }

    /// Convert a boolean mask starting at `base_axis` into one integer index
    /// array per covered axis, listing the true positions in row-major order
    fn mask_to_index_arrays(&self, mask: &Tensor, base_axis: usize) -> Result<Vec<Tensor>> {
        if !matches!(mask.dtype(), DType::Bool | DType::U8) {
            return Err(Error::UnsupportedDType {
                dtype: mask.dtype(),
                op: "mask index",
            });
        }
        let mdim = mask.ndim();
        if mdim == 0 {
            return Err(Error::InvalidArgument {
                arg: "index",
                reason: "mask index must have at least one dimension".to_string(),
            });
        }
        if base_axis + mdim > self.ndim() {
            return Err(Error::InvalidArgument {
                arg: "index",
                reason: format!(
                    "mask with {} dimensions does not fit at axis {} of a {}-dimensional array",
                    mdim,
                    base_axis,
                    self.ndim()
                ),
            });
        }
        let covered = &self.shape()[base_axis..base_axis + mdim];
        if mask.shape() != covered {
            return Err(Error::ShapeMismatch {
                expected: covered.to_vec(),
                got: mask.shape().to_vec(),
            });
        }

        let values = mask.to_vec::<u8>();
        let mut coords: Vec<Vec<i64>> = vec![Vec::new(); mdim];
        let mut idx = vec![0usize; mdim];
        for &v in &values {
            if v != 0 {
                for (d, &i) in idx.iter().enumerate() {
                    coords[d].push(i as i64);
                }
            }
            for d in (0..mdim).rev() {
                idx[d] += 1;
                if idx[d] < mask.shape()[d] {
                    break;
                }
                idx[d] = 0;
            }
        }

        coords
            .into_iter()
            .map(|c| {
                let len = c.len();
                Tensor::try_from_slice(&c, &[len])
            })
            .collect()
    }

    /// Resolve a tuple of integers and slices to a zero-copy view
    fn basic_view(&self, axes: &[AxisIndex]) -> Result<Tensor> {
        let mut layout = self.layout().clone();
        // Integer indices remove dimensions, so track the live dimension
        // separately from the original axis.
        let mut dim = 0usize;
        for (axis, ax) in axes.iter().enumerate() {
            let size = self.shape()[axis];
            match ax {
                AxisIndex::Int(i) => {
                    let idx = normalize_index(*i, size, axis)?;
                    layout = layout.select(dim, idx).expect("validated index");
                }
                AxisIndex::Slice(s) => {
                    let (start, step, len) =
                        s.resolve(size).ok_or_else(|| Error::InvalidArgument {
                            arg: "index",
                            reason: "slice step cannot be zero".to_string(),
                        })?;
                    layout = layout
                        .slice_axis(dim, start, step, len)
                        .expect("resolved slice in bounds");
                    dim += 1;
                }
                AxisIndex::Array(_) => unreachable!("basic path has no index arrays"),
            }
        }
        Ok(self.view_with_layout(layout))
    }

    /// Build the gather/scatter selection for a tuple containing arrays
    fn build_fancy(&self, axes: Vec<AxisIndex>) -> Result<FancySelection> {
        let ndim = self.ndim();
        let mut layout = self.layout().clone();
        let mut fancy: Vec<(usize, Tensor)> = Vec::new();

        for (axis, ax) in axes.into_iter().enumerate() {
            let size = self.shape()[axis];
            match ax {
                AxisIndex::Int(i) => {
                    // Scalar indices join the broadcast as 0-d index arrays.
                    let idx = normalize_index(i, size, axis)?;
                    fancy.push((axis, Tensor::try_from_slice(&[idx as i64], &[])?));
                }
                AxisIndex::Slice(s) => {
                    let (start, step, len) =
                        s.resolve(size).ok_or_else(|| Error::InvalidArgument {
                            arg: "index",
                            reason: "slice step cannot be zero".to_string(),
                        })?;
                    layout = layout
                        .slice_axis(axis, start, step, len)
                        .expect("resolved slice in bounds");
                }
                AxisIndex::Array(t) => fancy.push((axis, t)),
            }
        }

        // Broadcast the index arrays together
        let mut bshape: Shape = Shape::new();
        for (_, t) in &fancy {
            bshape = broadcast_shapes(&bshape, t.shape()).ok_or_else(|| Error::BroadcastError {
                lhs: bshape.to_vec(),
                rhs: t.shape().to_vec(),
            })?;
        }
        let bcount: usize = bshape.iter().product();

        // Permute the sliced view so fancy axes come first
        let sliced = self.view_with_layout(layout);
        let fancy_axes: Vec<usize> = fancy.iter().map(|(a, _)| *a).collect();
        let mut perm = fancy_axes.clone();
        perm.extend((0..ndim).filter(|d| !fancy_axes.contains(d)));
        let view = sliced.permute(&perm)?;
        let rest_shape = view.shape()[fancy.len()..].to_vec();

        // Materialize each index array at the broadcast shape and validate
        let mut indices = Vec::with_capacity(fancy.len());
        for (axis, t) in &fancy {
            let size = self.shape()[*axis];
            let expanded = t.broadcast_to(&bshape)?.astype(DType::I64)?;
            let raw = expanded.to_vec::<i64>();
            debug_assert_eq!(raw.len(), bcount);
            let mut normalized = Vec::with_capacity(bcount);
            for &i in &raw {
                normalized.push(normalize_index(i as isize, size, *axis)?);
            }
            indices.push(normalized);
        }

        Ok(FancySelection {
            view,
            indices,
            broadcast: bshape,
            rest_shape,
        })
    }

    /// Gather a fancy selection into a fresh tensor
    fn gather(&self, sel: &FancySelection) -> Result<Tensor> {
        let out = Tensor::try_zeros(&sel.result_shape(), self.dtype())?;
        let elem = self.dtype().size_in_bytes();
        let rest = sel.rest_numel();

        unsafe {
            let dst = out.storage().as_bytes_mut();
            let src = sel.view.storage().as_bytes();
            for b in 0..sel.bcount() {
                let sub = sel.selected(b);
                for (i, pos) in sub.layout().positions().enumerate() {
                    let d = (b * rest + i) * elem;
                    let s = pos * elem;
                    dst[d..d + elem].copy_from_slice(&src[s..s + elem]);
                }
            }
        }
        Ok(out)
    }

    /// Scatter a value over a fancy selection, in place
    fn scatter(&self, sel: &FancySelection, value: &Tensor) -> Result<()> {
        let result_shape = sel.result_shape();
        let src = broadcast_value(value, &result_shape)?;
        // Flatten the broadcast dims of the value into one leading axis so
        // each selection row is a single select() away.
        let mut flat_shape = vec![sel.bcount()];
        flat_shape.extend_from_slice(&sel.rest_shape);
        let src = src.contiguous().reshape(&flat_shape)?;

        for b in 0..sel.bcount() {
            let dst = sel.selected(b);
            let row = src.view_with_layout(
                src.layout().select(0, b).expect("row index in bounds"),
            );
            copy_same_dtype(&row, &dst);
        }
        Ok(())
    }
}

/// Broadcast a `set` value to the selection shape
///
/// Leading singleton dimensions beyond the selection rank are dropped
/// first, matching standard assignment broadcasting.
fn broadcast_value(value: &Tensor, target: &[usize]) -> Result<Tensor> {
    let mut v = value.clone();
    while v.ndim() > target.len() && v.shape()[0] == 1 {
        v = v.squeeze(Some(0));
    }
    v.broadcast_to(target).map_err(|_| Error::BroadcastError {
        lhs: value.shape().to_vec(),
        rhs: target.to_vec(),
    })
}

/// Normalize a possibly negative scalar index against an axis size
fn normalize_index(i: isize, size: usize, axis: usize) -> Result<usize> {
    let idx = if i < 0 { i + size as isize } else { i };
    if idx < 0 || idx >= size as isize {
        return Err(Error::IndexOutOfBounds {
            index: i,
            size,
            axis,
        });
    }
    Ok(idx as usize)
}

/// Element-wise copy between same-shape, same-dtype views
fn copy_same_dtype(src: &Tensor, dst: &Tensor) {
    debug_assert_eq!(src.shape(), dst.shape());
    debug_assert_eq!(src.dtype(), dst.dtype());
    let elem = src.dtype().size_in_bytes();
    unsafe {
        let sbytes = src.storage().as_bytes();
        let dbytes = dst.storage().as_bytes_mut();
        for (spos, dpos) in src.layout().positions().zip(dst.layout().positions()) {
            let s = spos * elem;
            let d = dpos * elem;
            dbytes[d..d + elem].copy_from_slice(&sbytes[s..s + elem]);
        }
    }
}

/// Always-copying clone, used to snapshot aliased `set` values
fn deep_copy(t: &Tensor) -> Result<Tensor> {
    let out = Tensor::try_zeros(t.shape(), t.dtype())?;
    copy_same_dtype(t, &out);
    Ok(out)
}
