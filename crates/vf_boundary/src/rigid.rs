// crates/vf_boundary/src/rigid.rs

//! 刚体速度估计
//!
//! 从当前/下一关键帧的顶点对应关系推出近似的刚体线速度与绕质心
//! 的角速度。估计是单参考点式的：扫描第一个在两帧里都离质心足够
//! 远的顶点，去掉质心平移后用两帧方向向量的叉积取转轴、夹角取
//! 角速度。
//!
//! 这是刻意保留的近似（非全顶点最小二乘拟合）：改成拟合会改变
//! 模拟输出，属于产品决策而不是修复。
//!
//! 任何退化（无参考顶点、零向量、零叉积、NaN/Inf）都静默回退到
//! 默认估计（x 轴、零角速度）。这是尽力而为的估计量，不在
//! 正确性关键路径上。

use crate::snapshot::GeometrySnapshots;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use vf_foundation::tolerance::{DT_RIGID_FLOOR, RIGID_GEOMETRY_EPS};

/// 刚体速度估计结果
///
/// 每次查询即时计算，不跨帧持久化。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyVelocity {
    /// 质心
    pub centroid: DVec3,
    /// 线速度
    pub linear: DVec3,
    /// 转轴（单位向量）
    pub axis: DVec3,
    /// 角速度（弧度/秒）
    pub angular: f64,
}

impl Default for RigidBodyVelocity {
    fn default() -> Self {
        Self {
            centroid: DVec3::ZERO,
            linear: DVec3::ZERO,
            axis: DVec3::X,
            angular: 0.0,
        }
    }
}

/// 估计刚体速度
///
/// `dt` 先被抬升到下限再参与倒数运算。静态几何或拓扑变化中时
/// 返回（当前质心、零速度、默认轴）。
pub fn estimate_rigid_body_velocity(
    snapshots: &GeometrySnapshots,
    dt: f64,
    velocity_influence: f64,
) -> RigidBodyVelocity {
    let dt = dt.max(DT_RIGID_FLOOR);
    let eps = RIGID_GEOMETRY_EPS;

    if !snapshots.is_animated() || snapshots.is_changing_topology() {
        return RigidBodyVelocity {
            centroid: snapshots.current().centroid(),
            ..RigidBodyVelocity::default()
        };
    }

    let m1 = snapshots.current();
    let m2 = snapshots.next();
    let centroid = m1.centroid();
    let c2 = m2.centroid();
    let translation = c2 - centroid;
    let linear = translation / dt * velocity_influence;

    let no_rotation = RigidBodyVelocity {
        centroid,
        linear,
        axis: DVec3::X,
        angular: 0.0,
    };

    // 参考顶点：两帧里都离质心足够远的第一个顶点
    let mut reference = None;
    for i in 0..m1.vertex_count() {
        let vert1 = m1.vertices[i];
        let vert2 = m2.vertices[i];
        if (vert1 - centroid).length() > eps && (vert2 - c2).length() > eps {
            reference = Some((vert1, vert2));
            break;
        }
    }
    let Some((vert1, vert2)) = reference else {
        return no_rotation;
    };

    // 去掉质心平移后只剩旋转位移；位移过小视为无旋转
    let vert2_rotational = vert2 - translation;
    if (vert1 - vert2_rotational).length() < eps {
        return no_rotation;
    }

    let v1 = vert1 - centroid;
    let v2 = vert2_rotational - centroid;
    if v1.length() < eps || v2.length() < eps {
        return no_rotation;
    }

    let cross = v1.cross(v2);
    if cross.length() < eps {
        return no_rotation;
    }
    let axis = cross.normalize();

    let n1 = v1.normalize();
    let n2 = v2.normalize();
    let angle = n1.dot(n2).clamp(-1.0, 1.0).acos();
    let angular = angle / dt * velocity_influence;

    if !axis.is_finite() || !angular.is_finite() {
        return no_rotation;
    }

    RigidBodyVelocity {
        centroid,
        linear,
        axis,
        angular,
    }
}
