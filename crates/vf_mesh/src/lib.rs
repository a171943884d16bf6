// crates/vf_mesh/src/lib.rs

//! VoxFlip Mesh Layer (Layer 2)
//!
//! 网格层，提供三角网格容器与几何算法。
//!
//! # 模块概览
//!
//! - [`mesh`]: 三角网格 `TriangleMesh`，质心、平移、游离顶点清理
//! - [`aabb`]: 轴对齐包围盒 `Aabb`
//! - [`islands`]: 连通分量拆分（含逐顶点伴随场的同步划分）
//!
//! # 设计原则
//!
//! 1. **快照语义**: 网格一经捕获不做原地修改，插值产生新快照
//! 2. **平行数组契约**: 逐顶点场与顶点数组等长，由调用方保证、
//!    由本层检查

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aabb;
pub mod islands;
pub mod mesh;

pub use aabb::Aabb;
pub use islands::split_into_islands;
pub use mesh::TriangleMesh;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::aabb::Aabb;
    pub use crate::islands::split_into_islands;
    pub use crate::mesh::TriangleMesh;
}
