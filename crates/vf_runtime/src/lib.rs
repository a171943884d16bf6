// crates/vf_runtime/src/lib.rs

//! VoxFlip Runtime Layer (Layer 2)
//!
//! 运行时层，提供计算内核共用的容器与并发原语。
//!
//! # 模块概览
//!
//! - [`array3d`]: 稠密三维缓冲区 `Array3d<T>`，行主序存储
//! - [`grid_index`]: 网格索引 `GridIndex` 与坐标↔索引转换
//! - [`queue`]: 有界并发队列 `BoundedBuffer<T>`，按值移交所有权
//! - [`thread`]: 工作线程数预言
//!
//! # 设计原则
//!
//! 1. **按值移交**: 队列中的元素始终只有一个所有者
//! 2. **零拷贝访问**: 缓冲区提供切片视图供分块并行内核使用

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array3d;
pub mod grid_index;
pub mod queue;
pub mod thread;

pub use array3d::Array3d;
pub use grid_index::{
    grid_index_to_position, node_cell_neighbours, position_to_grid_index, GridIndex,
};
pub use queue::BoundedBuffer;
pub use thread::max_thread_count;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::array3d::Array3d;
    pub use crate::grid_index::{
        grid_index_to_position, node_cell_neighbours, position_to_grid_index, GridIndex,
    };
    pub use crate::queue::BoundedBuffer;
    pub use crate::thread::max_thread_count;
}
