// crates/vf_boundary/src/occupancy.rs

//! 单元占据查询
//!
//! 先把每个网格节点（单元角点）按网格内外分类，再做 8 邻域膨胀：
//! 任一角点被标记的单元即视为被占据。反相物体把节点判定取反后走
//! 同一条膨胀路径。
//!
//! 输出按 k 外层、j 中层、i 内层的行主序枚举，无重复，对相同
//! 输入完全确定。

use vf_levelset::grid_nodes_inside_mesh;
use vf_mesh::TriangleMesh;
use vf_runtime::{node_cell_neighbours, Array3d, GridIndex};

/// 物体覆盖的网格单元索引
///
/// `inverted` 为真时节点的内外判定取反（物体占据网格外部）。
pub fn occupied_cells(
    mesh: &TriangleMesh,
    ni: usize,
    nj: usize,
    nk: usize,
    dx: f64,
    inverted: bool,
) -> Vec<GridIndex> {
    let mut nodes = Array3d::new(ni + 1, nj + 1, nk + 1, false);
    grid_nodes_inside_mesh(mesh, dx, &mut nodes);

    let mut cell_grid = Array3d::new(ni, nj, nk, false);
    for k in 0..nodes.depth() {
        for j in 0..nodes.height() {
            for i in 0..nodes.width() {
                if *nodes.get(i, j, k) == inverted {
                    continue;
                }
                for neighbour in node_cell_neighbours(i as i32, j as i32, k as i32) {
                    cell_grid.set_if_in_range(neighbour, true);
                }
            }
        }
    }

    let mut cells = Vec::new();
    for k in 0..nk {
        for j in 0..nj {
            for i in 0..ni {
                if *cell_grid.get(i, j, k) {
                    cells.push(GridIndex::new(i as i32, j as i32, k as i32));
                }
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

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
    fn test_small_cube_dilation() {
        // [0.5,1.5]^3 的立方体在 3^3 网格中：仅节点 (1,1,1) 在内，
        // 膨胀出它接触的 8 个单元
        let mesh = box_mesh(DVec3::splat(0.5), DVec3::splat(1.5));
        let cells = occupied_cells(&mesh, 3, 3, 3, 1.0, false);
        assert_eq!(cells.len(), 8);
        for di in 0..2 {
            for dj in 0..2 {
                for dk in 0..2 {
                    assert!(cells.contains(&GridIndex::new(di, dj, dk)));
                }
            }
        }
    }

    #[test]
    fn test_inverted_complement_dilation() {
        // 反相：网格外的节点经同样的膨胀得到其余单元
        let mesh = box_mesh(DVec3::splat(0.5), DVec3::splat(1.5));
        let cells = occupied_cells(&mesh, 3, 3, 3, 1.0, true);
        // 外部节点膨胀覆盖所有 27 个单元（含与内部节点相邻的单元）
        assert_eq!(cells.len(), 27);
    }

    #[test]
    fn test_empty_mesh_no_cells() {
        let mesh = TriangleMesh::default();
        assert!(occupied_cells(&mesh, 4, 4, 4, 1.0, false).is_empty());
    }

    #[test]
    fn test_deterministic_row_major_order() {
        let mesh = box_mesh(DVec3::splat(0.4), DVec3::splat(2.6));
        let a = occupied_cells(&mesh, 4, 4, 4, 1.0, false);
        let b = occupied_cells(&mesh, 4, 4, 4, 1.0, false);
        assert_eq!(a, b);
        // k 外层 / j 中层 / i 内层的枚举序
        let mut sorted = a.clone();
        sorted.sort_by_key(|g| (g.k, g.j, g.i));
        assert_eq!(a, sorted);
    }
}
