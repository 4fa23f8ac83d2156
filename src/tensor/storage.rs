//! Storage: shared, reference-counted element buffers

use crate::dtype::{DType, Element};
use crate::error::Result;
use std::cell::UnsafeCell;
use std::sync::Arc;

/// Shared storage for array data
///
/// Storage wraps a heap buffer with reference counting, enabling zero-copy
/// views (transpose, slice, etc.) that share the underlying memory. Clones
/// are cheap and alias the same buffer; in-place writes (`set`) are visible
/// through every view of the same storage.
///
/// The buffer is allocated as `u128` words so every supported dtype
/// (up to `Complex128`, alignment 8) can be reinterpreted safely.
pub struct Storage {
    inner: Arc<StorageInner>,
}

struct StorageInner {
    /// Backing buffer, sized in 16-byte words for alignment
    data: UnsafeCell<Vec<u128>>,
    /// Number of elements (not bytes)
    len: usize,
    /// Element type
    dtype: DType,
}

// The buffer is plain bytes behind an Arc; mutation goes through the unsafe
// accessors below, whose aliasing contract the callers uphold.
unsafe impl Send for StorageInner {}
unsafe impl Sync for StorageInner {}

fn words_for(len: usize, dtype: DType) -> usize {
    let bytes = len * dtype.size_in_bytes();
    bytes.div_ceil(16)
}

impl Storage {
    /// Allocate zero-initialized storage for `len` elements of `dtype`
    pub fn new(len: usize, dtype: DType) -> Result<Self> {
        let data = vec![0u128; words_for(len, dtype)];
        Ok(Self {
            inner: Arc::new(StorageInner {
                data: UnsafeCell::new(data),
                len,
                dtype,
            }),
        })
    }

    /// Create storage by copying a slice, inferring the dtype from `T`
    pub fn from_slice<T: Element>(data: &[T]) -> Result<Self> {
        let storage = Self::new(data.len(), T::DTYPE)?;
        // Fresh allocation, no aliases yet
        unsafe {
            storage.as_mut_slice::<T>().copy_from_slice(data);
        }
        Ok(storage)
    }

    /// Get the number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len
    }

    /// Check if storage is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.inner.dtype
    }

    /// Get size in bytes
    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        self.inner.len * self.inner.dtype.size_in_bytes()
    }

    /// Check whether two storages alias the same buffer
    #[inline]
    pub fn same_buffer(&self, other: &Storage) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// View the buffer as a typed slice
    ///
    /// # Safety
    ///
    /// `T` must match the storage dtype's size, and no mutable slice of the
    /// same storage may be live for the duration of the borrow.
    #[inline]
    pub unsafe fn as_slice<T: bytemuck::Pod>(&self) -> &[T] {
        debug_assert_eq!(std::mem::size_of::<T>(), self.inner.dtype.size_in_bytes());
        let vec = &*self.inner.data.get();
        std::slice::from_raw_parts(vec.as_ptr() as *const T, self.inner.len)
    }

    /// View the buffer as a mutable typed slice
    ///
    /// # Safety
    ///
    /// Same contract as [`Self::as_slice`], plus exclusivity: the caller
    /// must ensure no other slice of this storage is alive.
    #[allow(clippy::mut_from_ref)]
    #[inline]
    pub unsafe fn as_mut_slice<T: bytemuck::Pod>(&self) -> &mut [T] {
        debug_assert_eq!(std::mem::size_of::<T>(), self.inner.dtype.size_in_bytes());
        let vec = &mut *self.inner.data.get();
        std::slice::from_raw_parts_mut(vec.as_mut_ptr() as *mut T, self.inner.len)
    }

    /// View the buffer as raw bytes
    ///
    /// # Safety
    ///
    /// Same aliasing contract as [`Self::as_slice`].
    #[inline]
    pub unsafe fn as_bytes(&self) -> &[u8] {
        let vec = &*self.inner.data.get();
        std::slice::from_raw_parts(vec.as_ptr() as *const u8, self.size_in_bytes())
    }

    /// View the buffer as mutable raw bytes
    ///
    /// # Safety
    ///
    /// Same exclusivity contract as [`Self::as_mut_slice`].
    #[allow(clippy::mut_from_ref)]
    #[inline]
    pub unsafe fn as_bytes_mut(&self) -> &mut [u8] {
        let vec = &mut *self.inner.data.get();
        std::slice::from_raw_parts_mut(vec.as_mut_ptr() as *mut u8, self.size_in_bytes())
    }

    /// Copy the whole buffer to a typed Vec
    pub fn to_vec<T: bytemuck::Pod>(&self) -> Vec<T> {
        unsafe { self.as_slice::<T>().to_vec() }
    }
}

impl Clone for Storage {
    /// Clone increments the reference count (zero-copy)
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("len", &self.inner.len)
            .field("dtype", &self.inner.dtype)
            .field("refs", &Arc::strong_count(&self.inner))
            .finish()
    }
}
