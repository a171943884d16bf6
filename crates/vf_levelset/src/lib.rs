// crates/vf_levelset/src/lib.rs

//! VoxFlip Level Set Layer (Layer 3)
//!
//! 距离场层，提供网格到符号距离场的窄带计算内核。
//!
//! # 模块概览
//!
//! - [`levelset`]: 节点采样的符号距离场 `MeshLevelSet`，支持子网格
//!   偏移、窄带计算与并集合并
//! - [`inside`]: 网格节点的内外分类（占据查询的底层）
//! - `distance`: 点-三角形最近距离与奇偶性光栅化内核（内部模块）
//!
//! # 符号约定
//!
//! 距离在物体内部为负、外部为正。并集合并取带符号最小值，
//! 可交换、可结合，合并顺序不影响结果。

#![warn(missing_docs)]
#![warn(clippy::all)]

mod distance;
pub mod inside;
pub mod levelset;

pub use inside::grid_nodes_inside_mesh;
pub use levelset::MeshLevelSet;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::inside::grid_nodes_inside_mesh;
    pub use crate::levelset::MeshLevelSet;
}
