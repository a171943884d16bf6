// crates/vf_mesh/src/aabb.rs

//! 轴对齐包围盒
//!
//! 岛屿裁剪与子网格定界共用的包围盒类型。闭区间语义：边界上的点
//! 视为在内。

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 轴对齐包围盒
///
/// # 示例
///
/// ```
/// use glam::DVec3;
/// use vf_mesh::Aabb;
///
/// let a = Aabb::new(DVec3::ZERO, 2.0, 2.0, 2.0);
/// let b = Aabb::new(DVec3::new(1.0, 1.0, 1.0), 2.0, 2.0, 2.0);
/// let inter = a.intersection(&b);
/// assert_eq!(inter.width(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// 最小角点
    pub min: DVec3,
    /// 最大角点
    pub max: DVec3,
}

impl Aabb {
    /// 由最小角点与三个方向的尺寸创建
    pub fn new(min: DVec3, width: f64, height: f64, depth: f64) -> Self {
        Self {
            min,
            max: min + DVec3::new(width, height, depth),
        }
    }

    /// 点集包围盒，空集返回原点处的退化盒
    pub fn from_points(points: &[DVec3]) -> Self {
        if points.is_empty() {
            return Self {
                min: DVec3::ZERO,
                max: DVec3::ZERO,
            };
        }
        let mut min = points[0];
        let mut max = points[0];
        for p in &points[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        Self { min, max }
    }

    /// x 方向尺寸
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// y 方向尺寸
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// z 方向尺寸
    #[inline]
    pub fn depth(&self) -> f64 {
        self.max.z - self.min.z
    }

    /// 点是否在盒内（闭区间）
    #[inline]
    pub fn is_point_inside(&self, p: DVec3) -> bool {
        p.x >= self.min.x
            && p.y >= self.min.y
            && p.z >= self.min.z
            && p.x <= self.max.x
            && p.y <= self.max.y
            && p.z <= self.max.z
    }

    /// 两盒交集
    ///
    /// 不相交时各方向尺寸被钳制为 0（退化盒），调用方通过尺寸判断
    /// 是否存在有效重叠。
    pub fn intersection(&self, other: &Aabb) -> Aabb {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        Aabb {
            min,
            max: max.max(min),
        }
    }

    /// 各方向向外扩张 `amount`
    pub fn expand(&self, amount: f64) -> Aabb {
        let half = DVec3::splat(amount * 0.5);
        Aabb {
            min: self.min - half,
            max: self.max + half,
        }
    }
}
