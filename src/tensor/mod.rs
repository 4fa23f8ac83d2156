//! Tensor types: storage, layout, and the core array type

mod core;
mod id;
mod layout;
mod storage;

pub use self::core::Tensor;
pub use id::TensorId;
pub use layout::{broadcast_shapes, Layout, PositionIter, Shape, Strides};
pub use storage::Storage;
