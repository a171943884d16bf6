// crates/vf_boundary/src/object.rs

//! 边界对象门面
//!
//! 驱动层与单个边界几何交互的唯一入口。网格元数据（尺寸、单元
//! 大小）构造时固定；每帧推入新的几何快照；占据与距离场查询经
//! 时域插值路由到对应内核。
//!
//! # 参数钳制
//!
//! 标量参数在设置时防御性钳制（摩擦 [0,1]、白水/片流 ≥0），
//! 不产生错误。唯一返回 `VfResult` 的入口是装配配置的替换与
//! 距离场装配本身。

use crate::assembler;
use crate::config::AssemblerConfig;
use crate::occupancy::occupied_cells;
use crate::rigid::{estimate_rigid_body_velocity, RigidBodyVelocity};
use crate::snapshot::GeometrySnapshots;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use vf_foundation::VfResult;
use vf_levelset::MeshLevelSet;
use vf_mesh::TriangleMesh;
use vf_runtime::GridIndex;

/// 边界对象状态快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryObjectStatus {
    /// 是否启用
    pub is_enabled: bool,
    /// 是否为动画几何
    pub is_animated: bool,
    /// 是否反相
    pub is_inversed: bool,
    /// 自上次清除以来状态是否被改动
    pub is_state_changed: bool,
    /// 前一帧与当前帧之间网格是否变化
    pub is_mesh_changed: bool,
}

/// 流体模拟中的单个几何边界
///
/// # 示例
///
/// ```
/// use vf_boundary::BoundaryObject;
///
/// let mut object = BoundaryObject::new(10, 10, 10, 1.0);
/// object.set_friction(1.5);
/// assert_eq!(object.friction(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct BoundaryObject {
    ni: usize,
    nj: usize,
    nk: usize,
    dx: f64,

    snapshots: GeometrySnapshots,

    enabled: bool,
    inversed: bool,
    state_changed: bool,

    friction: f64,
    whitewater_influence: f64,
    sheeting_strength: f64,
    mesh_expansion: f64,
    object_velocity_influence: f64,
    append_object_velocity: bool,

    assembler_config: AssemblerConfig,
}

impl BoundaryObject {
    /// 创建边界对象，网格元数据一经设置不再改变
    pub fn new(ni: usize, nj: usize, nk: usize, dx: f64) -> Self {
        debug_assert!(dx > 0.0, "单元尺寸必须为正");
        Self {
            ni,
            nj,
            nk,
            dx,
            snapshots: GeometrySnapshots::default(),
            enabled: true,
            inversed: false,
            state_changed: false,
            friction: 0.0,
            whitewater_influence: 1.0,
            sheeting_strength: 1.0,
            mesh_expansion: 0.0,
            object_velocity_influence: 1.0,
            append_object_velocity: false,
            assembler_config: AssemblerConfig::default(),
        }
    }

    /// 网格尺寸（单元数）
    #[inline]
    pub fn grid_dimensions(&self) -> (usize, usize, usize) {
        (self.ni, self.nj, self.nk)
    }

    /// 单元尺寸
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.dx
    }

    // ========================================================================
    // 几何更新
    // ========================================================================

    /// 推入静态几何（三个关键帧取同一网格）
    pub fn update_mesh_static(&mut self, mesh: TriangleMesh) {
        self.snapshots.set_static(mesh);
    }

    /// 推入动画几何关键帧三元组
    pub fn update_mesh_animated(
        &mut self,
        previous: TriangleMesh,
        current: TriangleMesh,
        next: TriangleMesh,
    ) {
        self.snapshots.set_animated(previous, current, next);
    }

    /// 几何快照存储
    #[inline]
    pub fn snapshots(&self) -> &GeometrySnapshots {
        &self.snapshots
    }

    // ========================================================================
    // 时域查询
    // ========================================================================

    /// 当前关键帧网格
    #[inline]
    pub fn mesh(&self) -> &TriangleMesh {
        self.snapshots.current()
    }

    /// 亚帧比例 t 处的插值网格
    pub fn mesh_at(&self, frame_interpolation: f64) -> TriangleMesh {
        self.snapshots.interpolated_mesh(frame_interpolation)
    }

    /// 当前帧平移场
    #[inline]
    pub fn vertex_translations(&self) -> &[DVec3] {
        self.snapshots.translations()
    }

    /// 亚帧比例 t 处的插值平移场
    pub fn vertex_translations_at(&self, frame_interpolation: f64) -> Vec<DVec3> {
        self.snapshots.interpolated_translations(frame_interpolation)
    }

    /// 逐顶点速度场（帧起点）
    pub fn vertex_velocities(&self, dt: f64) -> Vec<DVec3> {
        self.snapshots.vertex_velocities(dt, 0.0)
    }

    /// 亚帧比例 t 处的逐顶点速度场
    pub fn vertex_velocities_at(&self, dt: f64, frame_interpolation: f64) -> Vec<DVec3> {
        self.snapshots.vertex_velocities(dt, frame_interpolation)
    }

    /// 整帧逐顶点速度场（当前步平移 / dt）
    pub fn keyframe_vertex_velocities(&self, dt: f64) -> Vec<DVec3> {
        self.snapshots.keyframe_vertex_velocities(dt)
    }

    /// 刚体速度估计
    pub fn rigid_body_velocity(&self, dt: f64) -> RigidBodyVelocity {
        estimate_rigid_body_velocity(&self.snapshots, dt, self.object_velocity_influence)
    }

    // ========================================================================
    // 占据与距离场
    // ========================================================================

    /// 物体覆盖的网格单元（帧起点）
    pub fn cells(&self) -> Vec<GridIndex> {
        self.cells_at(0.0)
    }

    /// 亚帧比例 t 处物体覆盖的网格单元
    pub fn cells_at(&self, frame_interpolation: f64) -> Vec<GridIndex> {
        let mesh = self.mesh_at(frame_interpolation);
        occupied_cells(&mesh, self.ni, self.nj, self.nk, self.dx, self.inversed)
    }

    /// 把物体的贡献装配进域距离场（就地并集合并）
    pub fn mesh_level_set(
        &self,
        dt: f64,
        frame_interpolation: f64,
        exact_band: i32,
        levelset: &mut MeshLevelSet,
    ) -> VfResult<()> {
        assembler::add_mesh_to_level_set(
            &self.snapshots,
            dt,
            frame_interpolation,
            exact_band,
            self.mesh_expansion,
            &self.assembler_config,
            levelset,
        )
    }

    // ========================================================================
    // 开关与参数
    // ========================================================================

    /// 启用对象，状态实际翻转时记入变更标志
    pub fn enable(&mut self) {
        if !self.enabled {
            self.state_changed = true;
        }
        self.enabled = true;
    }

    /// 停用对象，状态实际翻转时记入变更标志
    pub fn disable(&mut self) {
        if self.enabled {
            self.state_changed = true;
        }
        self.enabled = false;
    }

    /// 是否启用
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 反相开关取反
    pub fn inverse(&mut self) {
        self.inversed = !self.inversed;
    }

    /// 是否反相
    #[inline]
    pub fn is_inversed(&self) -> bool {
        self.inversed
    }

    /// 是否为动画几何
    #[inline]
    pub fn is_animated(&self) -> bool {
        self.snapshots.is_animated()
    }

    /// 关键帧间拓扑是否不一致
    #[inline]
    pub fn is_changing_topology(&self) -> bool {
        self.snapshots.is_changing_topology()
    }

    /// 设置摩擦系数，钳制到 [0,1]
    pub fn set_friction(&mut self, friction: f64) {
        self.friction = friction.clamp(0.0, 1.0);
    }

    /// 摩擦系数
    #[inline]
    pub fn friction(&self) -> f64 {
        self.friction
    }

    /// 设置白水影响系数，钳制到非负
    pub fn set_whitewater_influence(&mut self, value: f64) {
        self.whitewater_influence = value.max(0.0);
    }

    /// 白水影响系数
    #[inline]
    pub fn whitewater_influence(&self) -> f64 {
        self.whitewater_influence
    }

    /// 设置片流强度，钳制到非负
    pub fn set_sheeting_strength(&mut self, value: f64) {
        self.sheeting_strength = value.max(0.0);
    }

    /// 片流强度
    #[inline]
    pub fn sheeting_strength(&self) -> f64 {
        self.sheeting_strength
    }

    /// 设置网格膨胀量（有符号，不钳制）
    pub fn set_mesh_expansion(&mut self, value: f64) {
        self.mesh_expansion = value;
    }

    /// 网格膨胀量
    #[inline]
    pub fn mesh_expansion(&self) -> f64 {
        self.mesh_expansion
    }

    /// 设置物体速度影响系数
    pub fn set_object_velocity_influence(&mut self, value: f64) {
        self.object_velocity_influence = value;
    }

    /// 物体速度影响系数
    #[inline]
    pub fn object_velocity_influence(&self) -> f64 {
        self.object_velocity_influence
    }

    /// 开启物体速度叠加
    pub fn enable_append_object_velocity(&mut self) {
        self.append_object_velocity = true;
    }

    /// 关闭物体速度叠加
    pub fn disable_append_object_velocity(&mut self) {
        self.append_object_velocity = false;
    }

    /// 物体速度叠加是否开启
    #[inline]
    pub fn is_append_object_velocity_enabled(&self) -> bool {
        self.append_object_velocity
    }

    /// 替换装配配置（先校验）
    pub fn set_assembler_config(&mut self, config: AssemblerConfig) -> VfResult<()> {
        config.validate()?;
        self.assembler_config = config;
        Ok(())
    }

    /// 当前装配配置
    #[inline]
    pub fn assembler_config(&self) -> &AssemblerConfig {
        &self.assembler_config
    }

    // ========================================================================
    // 状态
    // ========================================================================

    /// 状态快照
    pub fn status(&self) -> BoundaryObjectStatus {
        BoundaryObjectStatus {
            is_enabled: self.enabled,
            is_animated: self.snapshots.is_animated(),
            is_inversed: self.inversed,
            is_state_changed: self.state_changed,
            is_mesh_changed: self.snapshots.is_mesh_changed(),
        }
    }

    /// 清除状态变更标志
    pub fn clear_object_status(&mut self) {
        self.state_changed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_clamping() {
        let mut object = BoundaryObject::new(4, 4, 4, 1.0);
        object.set_friction(-0.5);
        assert_eq!(object.friction(), 0.0);
        object.set_friction(2.0);
        assert_eq!(object.friction(), 1.0);
        object.set_whitewater_influence(-3.0);
        assert_eq!(object.whitewater_influence(), 0.0);
        object.set_sheeting_strength(-1.0);
        assert_eq!(object.sheeting_strength(), 0.0);
        // 膨胀量允许为负
        object.set_mesh_expansion(-0.25);
        assert_eq!(object.mesh_expansion(), -0.25);
    }

    #[test]
    fn test_enable_disable_state_changed() {
        let mut object = BoundaryObject::new(4, 4, 4, 1.0);
        assert!(object.is_enabled());
        assert!(!object.status().is_state_changed);

        // 重复启用不算变更
        object.enable();
        assert!(!object.status().is_state_changed);

        object.disable();
        assert!(!object.is_enabled());
        assert!(object.status().is_state_changed);

        object.clear_object_status();
        assert!(!object.status().is_state_changed);
    }

    #[test]
    fn test_inverse_toggle() {
        let mut object = BoundaryObject::new(4, 4, 4, 1.0);
        assert!(!object.is_inversed());
        object.inverse();
        assert!(object.is_inversed());
        object.inverse();
        assert!(!object.is_inversed());
    }

    #[test]
    fn test_append_object_velocity_toggle() {
        let mut object = BoundaryObject::new(4, 4, 4, 1.0);
        assert!(!object.is_append_object_velocity_enabled());
        object.enable_append_object_velocity();
        assert!(object.is_append_object_velocity_enabled());
        object.disable_append_object_velocity();
        assert!(!object.is_append_object_velocity_enabled());
    }

    #[test]
    fn test_set_assembler_config_validated() {
        let mut object = BoundaryObject::new(4, 4, 4, 1.0);
        let bad = AssemblerConfig {
            finished_queue_capacity: 0,
            ..AssemblerConfig::default()
        };
        assert!(object.set_assembler_config(bad).is_err());

        let good = AssemblerConfig {
            island_parallel_threshold: 4,
            ..AssemblerConfig::default()
        };
        assert!(object.set_assembler_config(good.clone()).is_ok());
        assert_eq!(object.assembler_config(), &good);
    }
}
