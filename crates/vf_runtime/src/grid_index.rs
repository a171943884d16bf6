// crates/vf_runtime/src/grid_index.rs

//! 网格索引与坐标转换
//!
//! 提供三维网格索引类型 `GridIndex`，以及世界坐标↔网格索引的转换
//! 和节点→邻接单元查询。
//!
//! # 约定
//!
//! - 单元 (i,j,k) 覆盖世界区间 `[i*dx, (i+1)*dx) × ...`
//! - 节点 (i,j,k) 位于世界坐标 `(i*dx, j*dx, k*dx)`
//! - 索引分量使用 `i32`：位置转索引的中间结果可以为负或越界，
//!   由调用方逐个做范围检查
//!
//! # 示例
//!
//! ```
//! use glam::DVec3;
//! use vf_runtime::{position_to_grid_index, GridIndex};
//!
//! let g = position_to_grid_index(DVec3::new(2.3, -0.1, 0.0), 1.0);
//! assert_eq!(g, GridIndex::new(2, -1, 0));
//! ```

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 三维网格索引
///
/// 既用于单元索引也用于节点索引，含义由上下文决定。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridIndex {
    /// i 分量
    pub i: i32,
    /// j 分量
    pub j: i32,
    /// k 分量
    pub k: i32,
}

impl GridIndex {
    /// 创建新索引
    #[inline]
    pub const fn new(i: i32, j: i32, k: i32) -> Self {
        Self { i, j, k }
    }
}

impl fmt::Display for GridIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.i, self.j, self.k)
    }
}

/// 世界坐标转网格索引（逐分量向下取整）
#[inline]
pub fn position_to_grid_index(p: DVec3, dx: f64) -> GridIndex {
    debug_assert!(dx > 0.0);
    let inv = 1.0 / dx;
    GridIndex::new(
        (p.x * inv).floor() as i32,
        (p.y * inv).floor() as i32,
        (p.z * inv).floor() as i32,
    )
}

/// 网格索引转世界坐标（单元/节点的最小角点）
#[inline]
pub fn grid_index_to_position(g: GridIndex, dx: f64) -> DVec3 {
    DVec3::new(g.i as f64 * dx, g.j as f64 * dx, g.k as f64 * dx)
}

/// 节点 (i,j,k) 接触的 8 个单元索引
///
/// 返回固定长度数组，分量可能为负或超出网格上界，调用方须逐个
/// 做范围检查后再使用。
#[inline]
pub fn node_cell_neighbours(i: i32, j: i32, k: i32) -> [GridIndex; 8] {
    [
        GridIndex::new(i - 1, j - 1, k - 1),
        GridIndex::new(i, j - 1, k - 1),
        GridIndex::new(i - 1, j, k - 1),
        GridIndex::new(i, j, k - 1),
        GridIndex::new(i - 1, j - 1, k),
        GridIndex::new(i, j - 1, k),
        GridIndex::new(i - 1, j, k),
        GridIndex::new(i, j, k),
    ]
}
