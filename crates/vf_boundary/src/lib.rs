// crates/vf_boundary/src/lib.rs

//! VoxFlip Boundary Object Layer (Layer 4)
//!
//! 边界对象层：流体模拟中的单个几何边界（障碍物、入流、出流、
//! 断裂碎片），回答两类查询：
//!
//! 1. **占据查询**: 物体当前覆盖哪些模拟网格单元
//! 2. **距离场装配**: 按需生成物体表面的窄带符号距离场与逐顶点
//!    速度场，供求解器施加边界条件、计算耦合力
//!
//! # 模块概览
//!
//! - [`object`]: 驱动层门面 [`BoundaryObject`]
//! - [`snapshot`]: 关键帧三元组存储与亚帧插值
//! - [`occupancy`]: 节点泛洪 + 8 邻域膨胀的单元占据
//! - [`rigid`]: 单参考点刚体速度估计
//! - [`assembler`]: 岛屿拆分-裁剪-膨胀-窄带计算-并集装配流水线，
//!   岛屿数量大时走扇出/扇入并行调度
//! - [`config`]: 装配调度的配置项
//!
//! # 生命周期
//!
//! 每个模拟对象构造一个 `BoundaryObject`（网格元数据固定）；
//! 驱动层每帧替换几何快照三元组；岛屿与距离场只在一次装配调用
//! 内存在，不跨帧缓存。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assembler;
pub mod config;
pub mod object;
pub mod occupancy;
pub mod rigid;
pub mod snapshot;

pub use config::AssemblerConfig;
pub use object::{BoundaryObject, BoundaryObjectStatus};
pub use occupancy::occupied_cells;
pub use rigid::RigidBodyVelocity;
pub use snapshot::{GeometrySnapshots, MotionState};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::config::AssemblerConfig;
    pub use crate::object::{BoundaryObject, BoundaryObjectStatus};
    pub use crate::rigid::RigidBodyVelocity;
    pub use crate::snapshot::{GeometrySnapshots, MotionState};
    pub use vf_levelset::MeshLevelSet;
    pub use vf_mesh::TriangleMesh;
    pub use vf_runtime::GridIndex;
}
