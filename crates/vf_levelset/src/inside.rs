// crates/vf_levelset/src/inside.rs

//! 网格节点的内外分类
//!
//! 占据查询的底层：把模拟域的每个网格节点标记为在网格内/外。
//! 节点 (i,j,k) 位于世界坐标 `(i,j,k) * dx`，点阵尺寸即传入
//! 数组的尺寸（单元数 + 1）。

use crate::distance::for_each_inside_node;
use glam::DVec3;
use vf_mesh::TriangleMesh;
use vf_runtime::Array3d;

/// 将位于网格内部的节点标记为 `true`
///
/// 数组先被整体清为 `false`，再按交叉奇偶性标记内部节点。
/// 相同输入产生相同输出。
pub fn grid_nodes_inside_mesh(mesh: &TriangleMesh, dx: f64, nodes: &mut Array3d<bool>) {
    nodes.fill(false);
    let (nx, ny, nz) = (nodes.width(), nodes.height(), nodes.depth());
    for_each_inside_node(mesh, DVec3::ZERO, dx, nx, ny, nz, |i, j, k| {
        nodes.set(i, j, k, true);
    });
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

    #[test]
    fn test_unit_cube_center_node() {
        // 10x10x10 单元网格、dx=1、中心处单位立方体：仅节点 (5,5,5) 在内
        let mesh = box_mesh(DVec3::splat(4.5), DVec3::splat(5.5));
        let mut nodes = Array3d::new(11, 11, 11, false);
        grid_nodes_inside_mesh(&mesh, 1.0, &mut nodes);

        let mut inside = Vec::new();
        for k in 0..11 {
            for j in 0..11 {
                for i in 0..11 {
                    if *nodes.get(i, j, k) {
                        inside.push((i, j, k));
                    }
                }
            }
        }
        assert_eq!(inside, vec![(5, 5, 5)]);
    }

    #[test]
    fn test_repeat_deterministic() {
        let mesh = box_mesh(DVec3::new(1.3, 2.1, 0.7), DVec3::new(6.8, 7.2, 5.9));
        let mut first = Array3d::new(11, 11, 11, false);
        let mut second = Array3d::new(11, 11, 11, false);
        grid_nodes_inside_mesh(&mesh, 1.0, &mut first);
        grid_nodes_inside_mesh(&mesh, 1.0, &mut second);
        assert_eq!(first.as_slice(), second.as_slice());
        // 至少标记了盒心附近的节点
        assert!(*first.get(4, 4, 3));
    }

    #[test]
    fn test_empty_mesh_marks_nothing() {
        let mesh = TriangleMesh::default();
        let mut nodes = Array3d::new(5, 5, 5, true);
        grid_nodes_inside_mesh(&mesh, 1.0, &mut nodes);
        assert!(nodes.as_slice().iter().all(|&v| !v));
    }
}
