// crates/vf_boundary/src/snapshot.rs

//! 几何快照存储与亚帧插值
//!
//! 保存前一/当前/下一帧三个网格关键帧及派生的逐顶点平移场，
//! 在亚帧比例 t ∈ [0,1] 处产出插值网格、平移场与速度场。
//!
//! # 拓扑变化降级
//!
//! 平移场只在相邻关键帧顶点数一致时有意义。任一侧不一致即进入
//! `AnimatedTopologyChanging` 状态：所有时域查询退化为返回最近的
//! 有效关键帧（当前帧），不做插值。不一致一侧的平移场保留当前帧
//! 顶点数长度的零向量，保证逐顶点平行数组在下游始终对齐。

use glam::DVec3;
use vf_foundation::tolerance::{DT_VELOCITY_EPS, MESH_CHANGE_EPS};
use vf_mesh::TriangleMesh;

/// 几何运动状态
///
/// 取代一对可自由组合的布尔标志，排除无效组合。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    /// 静态几何：三个关键帧相同
    #[default]
    Static,
    /// 动画几何：相邻关键帧顶点一一对应
    Animated,
    /// 动画几何但关键帧间拓扑不一致，时域查询降级
    AnimatedTopologyChanging,
}

/// 关键帧三元组与派生平移场
#[derive(Debug, Clone, Default)]
pub struct GeometrySnapshots {
    previous: TriangleMesh,
    current: TriangleMesh,
    next: TriangleMesh,
    /// 前一帧 → 当前帧的逐顶点平移
    translations_current: Vec<DVec3>,
    /// 当前帧 → 下一帧的逐顶点平移
    translations_next: Vec<DVec3>,
    motion: MotionState,
}

impl GeometrySnapshots {
    /// 设置静态几何：三个关键帧取同一网格，平移场清零
    pub fn set_static(&mut self, mesh: TriangleMesh) {
        let n = mesh.vertex_count();
        self.previous = mesh.clone();
        self.current = mesh.clone();
        self.next = mesh;
        self.translations_current = vec![DVec3::ZERO; n];
        self.translations_next = vec![DVec3::ZERO; n];
        self.motion = MotionState::Static;
    }

    /// 设置动画几何关键帧三元组
    ///
    /// 两侧平移场各自独立计算：顶点数匹配则为逐顶点差，否则保留
    /// 零向量并将状态降级为拓扑变化中。
    pub fn set_animated(
        &mut self,
        previous: TriangleMesh,
        current: TriangleMesh,
        next: TriangleMesh,
    ) {
        let n = current.vertex_count();
        let mut changing_topology = false;

        self.translations_current = vec![DVec3::ZERO; n];
        if previous.vertex_count() == n {
            for i in 0..n {
                self.translations_current[i] = current.vertices[i] - previous.vertices[i];
            }
        } else {
            changing_topology = true;
        }

        self.translations_next = vec![DVec3::ZERO; n];
        if next.vertex_count() == n {
            for i in 0..n {
                self.translations_next[i] = next.vertices[i] - current.vertices[i];
            }
        } else {
            changing_topology = true;
        }

        self.previous = previous;
        self.current = current;
        self.next = next;
        self.motion = if changing_topology {
            MotionState::AnimatedTopologyChanging
        } else {
            MotionState::Animated
        };
    }

    /// 当前运动状态
    #[inline]
    pub fn motion_state(&self) -> MotionState {
        self.motion
    }

    /// 是否为动画几何
    #[inline]
    pub fn is_animated(&self) -> bool {
        matches!(
            self.motion,
            MotionState::Animated | MotionState::AnimatedTopologyChanging
        )
    }

    /// 关键帧间拓扑是否不一致
    #[inline]
    pub fn is_changing_topology(&self) -> bool {
        self.motion == MotionState::AnimatedTopologyChanging
    }

    /// 前一帧关键帧
    #[inline]
    pub fn previous(&self) -> &TriangleMesh {
        &self.previous
    }

    /// 当前关键帧
    #[inline]
    pub fn current(&self) -> &TriangleMesh {
        &self.current
    }

    /// 下一帧关键帧
    #[inline]
    pub fn next(&self) -> &TriangleMesh {
        &self.next
    }

    /// 当前帧平移场
    #[inline]
    pub fn translations(&self) -> &[DVec3] {
        &self.translations_current
    }

    /// 亚帧比例 t 处的插值网格
    ///
    /// 拓扑变化中返回当前关键帧；否则把 t 钳制到 [0,1] 后在
    /// 当前帧与下一帧之间逐顶点线性插值。
    pub fn interpolated_mesh(&self, t: f64) -> TriangleMesh {
        if self.is_changing_topology() {
            return self.current.clone();
        }

        let t = t.clamp(0.0, 1.0);
        let mut out = self.current.clone();
        for (i, v) in out.vertices.iter_mut().enumerate() {
            let v1 = self.current.vertices[i];
            let v2 = self.next.vertices[i];
            *v = v1 + t * (v2 - v1);
        }
        out
    }

    /// 亚帧比例 t 处的插值平移场
    ///
    /// 在当前步与下一步的平移场之间混合（是速度的连续代理，不是
    /// 位置插值）。拓扑变化中退化为当前步平移场。
    pub fn interpolated_translations(&self, t: f64) -> Vec<DVec3> {
        if self.is_changing_topology() {
            return self.translations_current.clone();
        }

        let t = t.clamp(0.0, 1.0);
        self.translations_current
            .iter()
            .zip(self.translations_next.iter())
            .map(|(p1, p2)| *p1 + t * (*p2 - *p1))
            .collect()
    }

    /// 亚帧比例 t 处的逐顶点速度场（插值平移 / dt）
    ///
    /// `dt` 低于下限时返回全零场，避免零时长帧产生 Inf/NaN。
    pub fn vertex_velocities(&self, dt: f64, t: f64) -> Vec<DVec3> {
        let mut velocities = self.interpolated_translations(t);
        if dt < DT_VELOCITY_EPS {
            velocities.iter_mut().for_each(|v| *v = DVec3::ZERO);
            return velocities;
        }

        let inv_dt = 1.0 / dt;
        for v in velocities.iter_mut() {
            *v *= inv_dt;
        }
        velocities
    }

    /// 整帧的逐顶点速度场（当前步平移 / dt）
    pub fn keyframe_vertex_velocities(&self, dt: f64) -> Vec<DVec3> {
        if dt < DT_VELOCITY_EPS {
            return vec![DVec3::ZERO; self.translations_current.len()];
        }
        let inv_dt = 1.0 / dt;
        self.translations_current.iter().map(|v| *v * inv_dt).collect()
    }

    /// 前一帧与当前帧之间网格是否发生变化
    ///
    /// 静态几何恒为 `false`；动画几何在顶点数不一致或任一顶点
    /// 位移超过阈值时为 `true`。
    pub fn is_mesh_changed(&self) -> bool {
        if !self.is_animated() {
            return false;
        }
        if self.previous.vertex_count() != self.current.vertex_count() {
            return true;
        }
        self.previous
            .vertices
            .iter()
            .zip(self.current.vertices.iter())
            .any(|(p, c)| (*p - *c).length() > MESH_CHANGE_EPS)
    }
}
