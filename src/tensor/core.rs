//! Core Tensor type

use super::{Layout, Storage, TensorId};
use crate::dtype::{Complex64, Complex128, DType, Element};
use crate::error::{Error, Result};
use std::fmt;

/// N-dimensional array
///
/// `Tensor` is the fundamental data structure in specr. It consists of:
/// - **Storage**: reference-counted element buffer
/// - **Layout**: shape, strides, and offset defining the view into storage
/// - **DType**: element type (determined at runtime)
///
/// # Zero-Copy Views
///
/// Operations like `transpose`, `slice`, and `broadcast_to` create new
/// tensors that share the same underlying storage through Arc-wrapped
/// buffers and modified layouts. In-place writes (`set`) are visible
/// through every view of the same storage.
pub struct Tensor {
    /// Unique ID
    id: TensorId,
    /// Shared element buffer
    storage: Storage,
    /// Shape, strides, offset
    layout: Layout,
}

impl Tensor {
    /// Create a tensor from storage and layout
    pub fn from_parts(storage: Storage, layout: Layout) -> Self {
        Self {
            id: TensorId::new(),
            storage,
            layout,
        }
    }

    /// Create a tensor from a slice of data
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of the `shape`
    /// dimensions. For a fallible alternative, use [`Self::try_from_slice`].
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize]) -> Self {
        Self::try_from_slice(data, shape).expect("Tensor::from_slice failed")
    }

    /// Create a tensor from a slice of data (fallible version)
    pub fn try_from_slice<T: Element>(data: &[T], shape: &[usize]) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }

        let storage = Storage::from_slice(data)?;
        let layout = Layout::contiguous(shape);

        Ok(Self {
            id: TensorId::new(),
            storage,
            layout,
        })
    }

    /// Create a boolean tensor from a slice of `bool`
    ///
    /// Booleans are stored one byte per element (0 or 1).
    pub fn from_bool_slice(data: &[bool], shape: &[usize]) -> Result<Self> {
        let bytes: Vec<u8> = data.iter().map(|&b| b as u8).collect();
        let expected_len: usize = shape.iter().product();
        if bytes.len() != expected_len {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![bytes.len()],
            });
        }
        let storage = Storage::new(bytes.len(), DType::Bool)?;
        unsafe {
            storage.as_mut_slice::<u8>().copy_from_slice(&bytes);
        }
        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize], dtype: DType) -> Self {
        Self::try_zeros(shape, dtype).expect("Tensor::zeros failed")
    }

    /// Create a tensor filled with zeros (fallible version)
    pub fn try_zeros(shape: &[usize], dtype: DType) -> Result<Self> {
        let len: usize = shape.iter().product();
        let storage = Storage::new(len, dtype)?;
        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    /// Create a tensor filled with ones
    pub fn ones(shape: &[usize], dtype: DType) -> Self {
        Self::full_scalar(shape, dtype, 1.0)
    }

    /// Create a tensor filled with a scalar value
    ///
    /// The scalar is converted to the target dtype.
    pub fn full_scalar(shape: &[usize], dtype: DType, value: f64) -> Self {
        Self::try_full_scalar(shape, dtype, value).expect("Tensor::full_scalar failed")
    }

    /// Create a tensor filled with a scalar value (fallible version)
    pub fn try_full_scalar(shape: &[usize], dtype: DType, value: f64) -> Result<Self> {
        let out = Self::try_zeros(shape, dtype)?;
        let z = Complex128::new(value, 0.0);
        for pos in 0..out.numel() {
            unsafe { write_scalar(&out.storage, pos, z) };
        }
        Ok(out)
    }

    /// Create a 1-D tensor `[0, 1, ..., n-1]`
    pub fn arange(n: usize, dtype: DType) -> Self {
        let out = Self::zeros(&[n], dtype);
        for pos in 0..n {
            unsafe { write_scalar(&out.storage, pos, Complex128::new(pos as f64, 0.0)) };
        }
        out
    }

    // ===== Accessors =====

    /// Get the tensor ID
    #[inline]
    pub fn id(&self) -> TensorId {
        self.id
    }

    /// Get the storage
    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    /// Get the number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Get the total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.layout.elem_count()
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Check if the tensor is contiguous in memory
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// Check if this is a scalar (0-dimensional tensor)
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.layout.is_scalar()
    }

    /// Get size along a dimension (supports negative indexing)
    pub fn size(&self, dim: isize) -> Option<usize> {
        self.layout.dim(dim)
    }

    // ===== View Operations (Zero-Copy) =====

    /// Build a new tensor sharing this tensor's storage with another layout
    pub(crate) fn view_with_layout(&self, layout: Layout) -> Self {
        Self {
            id: TensorId::new(),
            storage: self.storage.clone(),
            layout,
        }
    }

    /// Transpose two dimensions (zero-copy)
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Result<Self> {
        let new_layout =
            self.layout
                .transpose(dim0, dim1)
                .ok_or_else(|| Error::InvalidDimension {
                    dim: dim0,
                    ndim: self.ndim(),
                })?;
        Ok(self.view_with_layout(new_layout))
    }

    /// Transpose last two dimensions (matrix transpose)
    pub fn t(&self) -> Result<Self> {
        self.transpose(-2, -1)
    }

    /// Permute dimensions (zero-copy)
    ///
    /// `dims` must be a permutation of `0..ndim`.
    pub fn permute(&self, dims: &[usize]) -> Result<Self> {
        let new_layout = self
            .layout
            .permute(dims)
            .ok_or_else(|| Error::InvalidDimension {
                dim: dims.first().copied().unwrap_or(0) as isize,
                ndim: self.ndim(),
            })?;
        Ok(self.view_with_layout(new_layout))
    }

    /// Reshape to a new shape
    ///
    /// Zero-copy when contiguous; otherwise materializes first.
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        let new_count: usize = shape.iter().product();
        if new_count != self.numel() {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: self.shape().to_vec(),
            });
        }
        let base = if self.is_contiguous() {
            self.clone()
        } else {
            self.contiguous()
        };
        let new_layout = base.layout.reshape(shape).ok_or(Error::NotContiguous)?;
        Ok(base.view_with_layout(new_layout))
    }

    /// Flatten to 1-D
    pub fn flatten(&self) -> Result<Self> {
        self.reshape(&[self.numel()])
    }

    /// Remove dimensions of size 1
    pub fn squeeze(&self, dim: Option<isize>) -> Self {
        self.view_with_layout(self.layout.squeeze(dim))
    }

    /// Add a dimension of size 1
    pub fn unsqueeze(&self, dim: isize) -> Result<Self> {
        let new_layout = self
            .layout
            .unsqueeze(dim)
            .ok_or_else(|| Error::InvalidDimension {
                dim,
                ndim: self.ndim(),
            })?;
        Ok(self.view_with_layout(new_layout))
    }

    /// Narrow a dimension (zero-copy slice)
    pub fn narrow(&self, dim: isize, start: usize, length: usize) -> Result<Self> {
        let dim_idx = self
            .layout
            .normalize_dim(dim)
            .ok_or(Error::InvalidDimension {
                dim,
                ndim: self.ndim(),
            })?;

        let new_layout =
            self.layout
                .narrow(dim_idx, start, length)
                .ok_or_else(|| Error::ShapeMismatch {
                    expected: vec![self.shape()[dim_idx]],
                    got: vec![start, length],
                })?;
        Ok(self.view_with_layout(new_layout))
    }

    /// Broadcast to a target shape (zero-copy)
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        let new_layout = self
            .layout
            .broadcast_to(shape)
            .ok_or_else(|| Error::BroadcastError {
                lhs: self.shape().to_vec(),
                rhs: shape.to_vec(),
            })?;
        Ok(self.view_with_layout(new_layout))
    }

    /// Flip (reverse) tensor along a dimension (zero-copy)
    pub fn flip(&self, dim: isize) -> Result<Self> {
        let dim_idx = self
            .layout
            .normalize_dim(dim)
            .ok_or(Error::InvalidDimension {
                dim,
                ndim: self.ndim(),
            })?;
        let new_layout = self.layout.flip(dim_idx).ok_or(Error::InvalidDimension {
            dim,
            ndim: self.ndim(),
        })?;
        Ok(self.view_with_layout(new_layout))
    }

    /// Make tensor contiguous (copy if needed)
    ///
    /// If the tensor is already contiguous, returns a view (zero-copy).
    /// Otherwise allocates fresh storage and copies the viewed elements
    /// into row-major order.
    pub fn contiguous(&self) -> Self {
        if self.is_contiguous() && self.storage.len() == self.numel() {
            return self.clone();
        }

        let dtype = self.dtype();
        let elem_size = dtype.size_in_bytes();
        let new_storage =
            Storage::new(self.numel(), dtype).expect("Tensor::contiguous allocation failed");

        unsafe {
            let src = self.storage.as_bytes();
            let dst = new_storage.as_bytes_mut();
            for (i, pos) in self.layout.positions().enumerate() {
                let s = pos * elem_size;
                let d = i * elem_size;
                dst[d..d + elem_size].copy_from_slice(&src[s..s + elem_size]);
            }
        }

        Self::from_parts(new_storage, Layout::contiguous(self.shape()))
    }

    /// Convert to another dtype (always materializes)
    ///
    /// Real and integer values convert through f64; complex components are
    /// preserved between the complex types; real-to-complex sets a zero
    /// imaginary part and complex-to-real keeps the real component.
    pub fn astype(&self, dtype: DType) -> Result<Self> {
        if dtype == self.dtype() {
            return Ok(self.contiguous());
        }

        let out = Self::try_zeros(self.shape(), dtype)?;
        unsafe {
            for (i, pos) in self.layout.positions().enumerate() {
                let z = read_scalar(&self.storage, pos);
                write_scalar(&out.storage, i, z);
            }
        }
        Ok(out)
    }

    // ===== Data Access =====

    /// Copy tensor data to a Vec on the host, in row-major order
    ///
    /// Materializes non-contiguous views first.
    pub fn to_vec<T: bytemuck::Pod>(&self) -> Vec<T> {
        let dense = self.contiguous();
        let mut v = dense.storage.to_vec::<T>();
        v.truncate(dense.numel());
        v
    }

    /// Extract the scalar value from a single-element tensor
    pub fn item<T: bytemuck::Pod + Copy>(&self) -> Result<T> {
        if self.numel() != 1 {
            return Err(Error::ShapeMismatch {
                expected: vec![1],
                got: self.shape().to_vec(),
            });
        }
        let pos = self
            .layout
            .positions()
            .next()
            .expect("single-element layout");
        let slice = unsafe { self.storage.as_slice::<T>() };
        Ok(slice[pos])
    }
}

impl Clone for Tensor {
    /// Clone creates a new tensor sharing the same storage (zero-copy)
    fn clone(&self) -> Self {
        Self {
            id: TensorId::new(),
            storage: self.storage.clone(),
            layout: self.layout.clone(),
        }
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("id", &self.id)
            .field("shape", &self.shape())
            .field("dtype", &self.dtype())
            .field("contiguous", &self.is_contiguous())
            .finish()
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, dtype={})", self.shape(), self.dtype())
    }
}

/// Read the element at `pos`, widened to Complex128
///
/// # Safety
///
/// `pos` must be in bounds and no mutable borrow of the storage may be live.
unsafe fn read_scalar(storage: &Storage, pos: usize) -> Complex128 {
    match storage.dtype() {
        DType::F64 => Complex128::new(storage.as_slice::<f64>()[pos], 0.0),
        DType::F32 => Complex128::new(storage.as_slice::<f32>()[pos] as f64, 0.0),
        DType::I64 => Complex128::new(storage.as_slice::<i64>()[pos] as f64, 0.0),
        DType::I32 => Complex128::new(storage.as_slice::<i32>()[pos] as f64, 0.0),
        DType::U8 | DType::Bool => Complex128::new(storage.as_slice::<u8>()[pos] as f64, 0.0),
        DType::Complex64 => {
            let z = storage.as_slice::<Complex64>()[pos];
            Complex128::new(z.re as f64, z.im as f64)
        }
        DType::Complex128 => storage.as_slice::<Complex128>()[pos],
    }
}

/// Write the element at `pos`, narrowing from Complex128
///
/// # Safety
///
/// `pos` must be in bounds and the caller must have exclusive access.
unsafe fn write_scalar(storage: &Storage, pos: usize, z: Complex128) {
    match storage.dtype() {
        DType::F64 => storage.as_mut_slice::<f64>()[pos] = z.re,
        DType::F32 => storage.as_mut_slice::<f32>()[pos] = z.re as f32,
        DType::I64 => storage.as_mut_slice::<i64>()[pos] = z.re as i64,
        DType::I32 => storage.as_mut_slice::<i32>()[pos] = z.re as i32,
        DType::U8 => storage.as_mut_slice::<u8>()[pos] = z.re as u8,
        DType::Bool => storage.as_mut_slice::<u8>()[pos] = (z.re != 0.0) as u8,
        DType::Complex64 => {
            storage.as_mut_slice::<Complex64>()[pos] = Complex64::new(z.re as f32, z.im as f32)
        }
        DType::Complex128 => storage.as_mut_slice::<Complex128>()[pos] = z,
    }
}
