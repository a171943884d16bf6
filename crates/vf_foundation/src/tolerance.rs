// crates/vf_foundation/src/tolerance.rs

//! 数值容差常量
//!
//! 集中定义边界对象层使用的数值阈值，替代散落在各处的魔法数。
//! 这些值对行为有实际影响（见各常量说明），修改前需要评估对
//! 模拟输出的影响。
//!
//! # 设计原则
//!
//! 1. **无全局可变状态**: 容差是编译期常量
//! 2. **按用途命名**: 常量名描述用途而非数值

/// 有限差分速度的 dt 下限
///
/// `dt` 小于该值时，顶点速度场直接返回全零，避免除以近零时长
/// 产生 Inf/NaN。
pub const DT_VELOCITY_EPS: f64 = 1e-10;

/// 刚体运动估计的 dt 下限
///
/// 估计前先将 `dt` 抬升到该值，保证倒数运算安全。
pub const DT_RIGID_FLOOR: f64 = 1e-6;

/// 刚体运动估计的几何退化阈值
///
/// 参考顶点到质心的距离、去平移后的位移、叉积模长低于该值时，
/// 一律回退到默认估计（x 轴，零角速度）。
pub const RIGID_GEOMETRY_EPS: f64 = 1e-5;

/// 网格变化检测的逐顶点位移阈值
///
/// 前一帧与当前帧对应顶点位移超过该值即视为网格发生变化。
pub const MESH_CHANGE_EPS: f64 = 1e-5;

/// 网格膨胀的幅值下限
///
/// 膨胀量绝对值低于该值时跳过膨胀；同时用于判定顶点与质心重合
/// （重合顶点不移动，避免归一化退化）。
pub const MESH_EXPANSION_EPS: f64 = 1e-9;
