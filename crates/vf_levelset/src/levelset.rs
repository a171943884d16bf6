// crates/vf_levelset/src/levelset.rs

//! 节点采样的符号距离场
//!
//! `MeshLevelSet` 在 `width × height × depth` 个单元的网格节点上
//! 采样带符号距离（内负外正）与最近表面速度。通过整数网格偏移
//! 支持作为父域的子网格存在：岛屿距离场各自在紧致子网格上计算，
//! 再并集合并回父域距离场。
//!
//! # 窄带
//!
//! 距离仅在每个三角形索引包围盒向外 `exact_band` 个单元的范围内
//! 精确计算；带外节点保留带符号的上界幅值 `(w+h+d)*dx`。
//!
//! # 并行
//!
//! 精确带计算按 k 切片划分并行（rayon）。工作线程内部构建岛屿
//! 距离场时须关闭本层并行（调度层已经在岛屿粒度上并行），否则
//! 会线程超订。

use crate::distance::{for_each_inside_node, point_triangle_closest};
use glam::DVec3;
use log::trace;
use rayon::prelude::*;
use vf_foundation::{VfError, VfResult};
use vf_mesh::TriangleMesh;
use vf_runtime::{grid_index_to_position, Array3d, GridIndex};

/// 一个三角形的窄带节点索引范围（含端点）
struct BandRange {
    i_lo: usize,
    i_hi: usize,
    j_lo: usize,
    j_hi: usize,
    k_lo: usize,
    k_hi: usize,
}

/// 节点采样的符号距离场
#[derive(Debug, Clone)]
pub struct MeshLevelSet {
    width: usize,
    height: usize,
    depth: usize,
    dx: f64,
    grid_offset: GridIndex,
    phi: Array3d<f64>,
    velocities: Array3d<DVec3>,
    multi_threading: bool,
}

impl MeshLevelSet {
    /// 创建覆盖 `width × height × depth` 个单元的距离场
    ///
    /// 节点点阵为 `(width+1) × (height+1) × (depth+1)`，距离初始化
    /// 为上界 `(width+height+depth) * dx`，速度为零，偏移为零。
    pub fn new(width: usize, height: usize, depth: usize, dx: f64) -> Self {
        let upper_bound = (width + height + depth) as f64 * dx;
        Self {
            width,
            height,
            depth,
            dx,
            grid_offset: GridIndex::default(),
            phi: Array3d::new(width + 1, height + 1, depth + 1, upper_bound),
            velocities: Array3d::new(width + 1, height + 1, depth + 1, DVec3::ZERO),
            multi_threading: true,
        }
    }

    /// 网格尺寸（单元数）
    #[inline]
    pub fn grid_dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    /// 单元尺寸
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.dx
    }

    /// 相对父域的节点点阵偏移
    #[inline]
    pub fn grid_offset(&self) -> GridIndex {
        self.grid_offset
    }

    /// 设置相对父域的节点点阵偏移
    #[inline]
    pub fn set_grid_offset(&mut self, offset: GridIndex) {
        self.grid_offset = offset;
    }

    /// 距离初始化上界
    #[inline]
    pub fn upper_bound(&self) -> f64 {
        (self.width + self.height + self.depth) as f64 * self.dx
    }

    /// 关闭内部并行
    #[inline]
    pub fn disable_multi_threading(&mut self) {
        self.multi_threading = false;
    }

    /// 开启内部并行
    #[inline]
    pub fn enable_multi_threading(&mut self) {
        self.multi_threading = true;
    }

    /// 节点 (i,j,k) 的带符号距离
    #[inline]
    pub fn distance(&self, i: usize, j: usize, k: usize) -> f64 {
        *self.phi.get(i, j, k)
    }

    /// 节点 (i,j,k) 的最近表面速度
    #[inline]
    pub fn velocity(&self, i: usize, j: usize, k: usize) -> DVec3 {
        *self.velocities.get(i, j, k)
    }

    /// 由网格与逐顶点速度计算窄带符号距离场
    ///
    /// 先前的内容被重置。`exact_band` 为窄带半宽（单元数），
    /// 负值按 0 处理。
    ///
    /// # 错误
    ///
    /// 速度场长度与顶点数不一致时返回 [`VfError::SizeMismatch`]。
    pub fn fast_calculate_signed_distance_field(
        &mut self,
        mesh: &TriangleMesh,
        vertex_velocities: &[DVec3],
        exact_band: i32,
    ) -> VfResult<()> {
        VfError::check_size(
            "vertex_velocities",
            mesh.vertex_count(),
            vertex_velocities.len(),
        )?;

        trace!(
            "窄带距离场: {} 三角形, band={}, 偏移={}",
            mesh.triangle_count(),
            exact_band,
            self.grid_offset
        );

        let upper_bound = self.upper_bound();
        self.phi.fill(upper_bound);
        self.velocities.fill(DVec3::ZERO);

        let band = exact_band.max(0) as i64;
        let origin = grid_index_to_position(self.grid_offset, self.dx);
        let nx = self.width + 1;
        let ny = self.height + 1;
        let nz = self.depth + 1;

        // 每个三角形的窄带节点范围；点阵外的三角形不参与精确带
        let mut ranges = Vec::with_capacity(mesh.triangle_count());
        for tri in &mesh.triangles {
            ranges.push(band_range(mesh, tri, origin, self.dx, band, nx, ny, nz));
        }

        let dx = self.dx;
        let slab = nx * ny;
        let process_slab = |k: usize, phi_slab: &mut [f64], vel_slab: &mut [DVec3]| {
            for (tri, range) in mesh.triangles.iter().zip(ranges.iter()) {
                let Some(range) = range else {
                    continue;
                };
                if k < range.k_lo || k > range.k_hi {
                    continue;
                }
                let a = mesh.vertices[tri[0] as usize];
                let b = mesh.vertices[tri[1] as usize];
                let c = mesh.vertices[tri[2] as usize];
                let va = vertex_velocities[tri[0] as usize];
                let vb = vertex_velocities[tri[1] as usize];
                let vc = vertex_velocities[tri[2] as usize];

                for j in range.j_lo..=range.j_hi {
                    let row = nx * j;
                    for i in range.i_lo..=range.i_hi {
                        let p = origin
                            + DVec3::new(i as f64, j as f64, k as f64) * dx;
                        let closest = point_triangle_closest(p, a, b, c);
                        let idx = row + i;
                        if closest.distance < phi_slab[idx] {
                            phi_slab[idx] = closest.distance;
                            let w = closest.barycentric;
                            vel_slab[idx] = w.x * va + w.y * vb + w.z * vc;
                        }
                    }
                }
            }
        };

        if self.multi_threading {
            self.phi
                .as_slice_mut()
                .par_chunks_mut(slab)
                .zip(self.velocities.as_slice_mut().par_chunks_mut(slab))
                .enumerate()
                .for_each(|(k, (phi_slab, vel_slab))| process_slab(k, phi_slab, vel_slab));
        } else {
            for (k, (phi_slab, vel_slab)) in self
                .phi
                .as_slice_mut()
                .chunks_mut(slab)
                .zip(self.velocities.as_slice_mut().chunks_mut(slab))
                .enumerate()
            {
                process_slab(k, phi_slab, vel_slab);
            }
        }

        // 内外符号：奇偶性分类，内部取负
        let phi = &mut self.phi;
        for_each_inside_node(mesh, origin, dx, nx, ny, nz, |i, j, k| {
            let idx = phi.flat_index(i, j, k);
            let slice = phi.as_slice_mut();
            slice[idx] = -slice[idx];
        });

        Ok(())
    }

    /// 与另一距离场做并集合并（带符号最小值）
    ///
    /// 对方节点按偏移差映射到本场点阵，重叠区域内对方距离更小的
    /// 节点连同其速度一并拷入。可交换、可结合，合并顺序不影响
    /// 结果距离。
    pub fn calculate_union(&mut self, other: &MeshLevelSet) {
        debug_assert!(
            (self.dx - other.dx).abs() < f64::EPSILON,
            "并集合并要求相同的单元尺寸"
        );

        let di = other.grid_offset.i - self.grid_offset.i;
        let dj = other.grid_offset.j - self.grid_offset.j;
        let dk = other.grid_offset.k - self.grid_offset.k;

        for k in 0..=other.depth {
            let sk = k as i64 + dk as i64;
            if sk < 0 || sk > self.depth as i64 {
                continue;
            }
            for j in 0..=other.height {
                let sj = j as i64 + dj as i64;
                if sj < 0 || sj > self.height as i64 {
                    continue;
                }
                for i in 0..=other.width {
                    let si = i as i64 + di as i64;
                    if si < 0 || si > self.width as i64 {
                        continue;
                    }
                    let other_phi = *other.phi.get(i, j, k);
                    let idx =
                        self.phi
                            .flat_index(si as usize, sj as usize, sk as usize);
                    if other_phi < self.phi.as_slice()[idx] {
                        self.phi.as_slice_mut()[idx] = other_phi;
                        self.velocities.as_slice_mut()[idx] = *other.velocities.get(i, j, k);
                    }
                }
            }
        }
    }
}

/// 三角形包围盒扩 `band` 个单元后与节点点阵的交集范围
#[allow(clippy::too_many_arguments)]
fn band_range(
    mesh: &TriangleMesh,
    tri: &[u32; 3],
    origin: DVec3,
    dx: f64,
    band: i64,
    nx: usize,
    ny: usize,
    nz: usize,
) -> Option<BandRange> {
    let a = mesh.vertices[tri[0] as usize];
    let b = mesh.vertices[tri[1] as usize];
    let c = mesh.vertices[tri[2] as usize];
    let min = a.min(b).min(c) - origin;
    let max = a.max(b).max(c) - origin;
    let inv_dx = 1.0 / dx;

    let lo = |v: f64| ((v * inv_dx).floor() as i64 - band).max(0);
    let hi = |v: f64, n: usize| ((v * inv_dx).ceil() as i64 + band).min(n as i64 - 1);

    let i_lo = lo(min.x);
    let i_hi = hi(max.x, nx);
    let j_lo = lo(min.y);
    let j_hi = hi(max.y, ny);
    let k_lo = lo(min.z);
    let k_hi = hi(max.z, nz);
    if i_lo > i_hi || j_lo > j_hi || k_lo > k_hi {
        return None;
    }
    Some(BandRange {
        i_lo: i_lo as usize,
        i_hi: i_hi as usize,
        j_lo: j_lo as usize,
        j_hi: j_hi as usize,
        k_lo: k_lo as usize,
        k_hi: k_hi as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_mesh(min: DVec3, max: DVec3) -> TriangleMesh {
        let v = vec![
            DVec3::new(min.x, min.y, min.z),
            DVec3::new(max.x, min.y, min.z),
            DVec3::new(max.x, max.y, min.z),
            DVec3::new(min.x, max.y, min.z),
            DVec3::new(min.x, min.y, max.z),
            DVec3::new(max.x, min.y, max.z),
            DVec3::new(max.x, max.y, max.z),
            DVec3::new(min.x, max.y, max.z),
        ];
        let t = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [3, 7, 6],
            [3, 6, 2],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        TriangleMesh::new(v, t)
    }

    fn zero_velocities(mesh: &TriangleMesh) -> Vec<DVec3> {
        vec![DVec3::ZERO; mesh.vertex_count()]
    }

    #[test]
    fn test_new_dimensions() {
        let ls = MeshLevelSet::new(4, 3, 2, 0.5);
        assert_eq!(ls.grid_dimensions(), (4, 3, 2));
        assert_eq!(ls.cell_size(), 0.5);
        assert_eq!(ls.distance(0, 0, 0), ls.upper_bound());
        assert_eq!(ls.velocity(4, 3, 2), DVec3::ZERO);
    }

    #[test]
    fn test_sdf_cube_signs_and_values() {
        let mesh = box_mesh(DVec3::splat(0.5), DVec3::splat(3.5));
        let mut ls = MeshLevelSet::new(4, 4, 4, 1.0);
        ls.fast_calculate_signed_distance_field(&mesh, &zero_velocities(&mesh), 8)
            .unwrap();

        // 中心节点 (2,2,2)：到最近面 1.5，内部为负
        assert!((ls.distance(2, 2, 2) + 1.5).abs() < 1e-9);
        // 内部角落节点 (1,1,1)：最近面 0.5
        assert!((ls.distance(1, 1, 1) + 0.5).abs() < 1e-9);
        // 原点节点在外，距离 sqrt(3*0.25)
        let expect = (3.0f64 * 0.25).sqrt();
        assert!((ls.distance(0, 0, 0) - expect).abs() < 1e-9);
    }

    #[test]
    fn test_sdf_velocity_from_nearest_surface() {
        let mesh = box_mesh(DVec3::splat(0.5), DVec3::splat(3.5));
        let velocities = vec![DVec3::new(2.0, 0.0, 0.0); mesh.vertex_count()];
        let mut ls = MeshLevelSet::new(4, 4, 4, 1.0);
        ls.fast_calculate_signed_distance_field(&mesh, &velocities, 8)
            .unwrap();
        // 均匀顶点速度：任何窄带节点的插值速度都等于该速度
        let v = ls.velocity(2, 2, 2);
        assert!((v - DVec3::new(2.0, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_sdf_velocity_length_mismatch() {
        let mesh = box_mesh(DVec3::ZERO, DVec3::ONE);
        let mut ls = MeshLevelSet::new(2, 2, 2, 1.0);
        let bad = vec![DVec3::ZERO; 3];
        assert!(ls
            .fast_calculate_signed_distance_field(&mesh, &bad, 2)
            .is_err());
    }

    #[test]
    fn test_multithreading_toggle_same_result() {
        let mesh = box_mesh(DVec3::new(0.4, 0.7, 1.1), DVec3::new(2.6, 2.9, 3.3));
        let velocities: Vec<DVec3> = (0..mesh.vertex_count())
            .map(|i| DVec3::splat(i as f64 * 0.1))
            .collect();

        let mut serial = MeshLevelSet::new(4, 4, 4, 1.0);
        serial.disable_multi_threading();
        serial
            .fast_calculate_signed_distance_field(&mesh, &velocities, 3)
            .unwrap();

        let mut parallel = MeshLevelSet::new(4, 4, 4, 1.0);
        parallel
            .fast_calculate_signed_distance_field(&mesh, &velocities, 3)
            .unwrap();

        for k in 0..=4 {
            for j in 0..=4 {
                for i in 0..=4 {
                    assert_eq!(serial.distance(i, j, k), parallel.distance(i, j, k));
                    assert_eq!(serial.velocity(i, j, k), parallel.velocity(i, j, k));
                }
            }
        }
    }

    #[test]
    fn test_union_order_independence() {
        // 三个互不重叠的盒体，任意合并顺序得到相同的距离场
        let meshes = [
            box_mesh(DVec3::new(0.5, 0.5, 0.5), DVec3::new(1.5, 1.5, 1.5)),
            box_mesh(DVec3::new(3.5, 0.5, 0.5), DVec3::new(4.5, 1.5, 1.5)),
            box_mesh(DVec3::new(0.5, 3.5, 0.5), DVec3::new(1.5, 4.5, 1.5)),
        ];
        let mut parts = Vec::new();
        for mesh in &meshes {
            let mut ls = MeshLevelSet::new(6, 6, 6, 1.0);
            ls.fast_calculate_signed_distance_field(mesh, &zero_velocities(mesh), 2)
                .unwrap();
            parts.push(ls);
        }

        let orders: [[usize; 3]; 3] = [[0, 1, 2], [2, 1, 0], [1, 2, 0]];
        let mut results = Vec::new();
        for order in &orders {
            let mut domain = MeshLevelSet::new(6, 6, 6, 1.0);
            for &idx in order {
                domain.calculate_union(&parts[idx]);
            }
            results.push(domain);
        }

        for k in 0..=6 {
            for j in 0..=6 {
                for i in 0..=6 {
                    let d0 = results[0].distance(i, j, k);
                    assert_eq!(d0, results[1].distance(i, j, k));
                    assert_eq!(d0, results[2].distance(i, j, k));
                }
            }
        }
    }

    #[test]
    fn test_union_with_grid_offset() {
        // 子网格距离场按偏移映射回父域
        let mesh = box_mesh(DVec3::new(2.5, 2.5, 2.5), DVec3::new(3.5, 3.5, 3.5));
        let mut island = MeshLevelSet::new(3, 3, 3, 1.0);
        island.set_grid_offset(GridIndex::new(2, 2, 2));
        island
            .fast_calculate_signed_distance_field(&mesh, &zero_velocities(&mesh), 2)
            .unwrap();
        // 岛屿局部节点 (1,1,1) 即全局 (3,3,3)，位于盒心
        assert!((island.distance(1, 1, 1) + 0.5).abs() < 1e-9);

        let mut domain = MeshLevelSet::new(6, 6, 6, 1.0);
        domain.calculate_union(&island);
        assert!((domain.distance(3, 3, 3) + 0.5).abs() < 1e-9);
        // 子网格之外的父域节点不受影响
        assert_eq!(domain.distance(0, 0, 0), domain.upper_bound());
    }

    #[test]
    fn test_union_out_of_range_offset_safe() {
        // 偏移使子网格大部分落在父域之外：不得越界
        let mesh = box_mesh(DVec3::splat(0.2), DVec3::splat(0.8));
        let mut island = MeshLevelSet::new(2, 2, 2, 1.0);
        island.set_grid_offset(GridIndex::new(-1, -1, -1));
        island
            .fast_calculate_signed_distance_field(&mesh, &zero_velocities(&mesh), 1)
            .unwrap();
        let mut domain = MeshLevelSet::new(2, 2, 2, 1.0);
        domain.calculate_union(&island);
        // 仅重叠节点被考虑，调用正常完成
        assert!(domain.distance(2, 2, 2) > 0.0);
    }
}
