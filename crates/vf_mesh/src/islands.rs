// crates/vf_mesh/src/islands.rs

//! 连通分量拆分
//!
//! 将网格按共享顶点的连通性拆成独立岛屿，并对伴随的逐顶点场做
//! 同步划分。断裂事件后的碎片网格由此获得独立的窄带距离场输入。
//!
//! # 确定性
//!
//! 分量编号按顶点索引升序的首见顺序分配，相同输入产生相同的
//! 岛屿顺序与岛内顶点顺序。
//!
//! # 前置条件
//!
//! 未被三角形引用的顶点不属于任何岛屿，调用方应先执行
//! [`TriangleMesh::remove_extraneous_vertices`]。

use crate::mesh::TriangleMesh;
use glam::DVec3;
use vf_foundation::{VfError, VfResult};

/// 并查集，路径压缩 + 按秩合并
struct DisjointSet {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut cur = x;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra as usize].cmp(&self.rank[rb as usize]) {
            std::cmp::Ordering::Less => self.parent[ra as usize] = rb,
            std::cmp::Ordering::Greater => self.parent[rb as usize] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb as usize] = ra;
                self.rank[ra as usize] += 1;
            }
        }
    }
}

/// 将网格拆分为连通分量岛屿
///
/// `vertex_field` 是与顶点平行的逐顶点场（通常为速度），随顶点
/// 一同划分到各岛屿。
///
/// # 错误
///
/// 场长度与顶点数不一致时返回 [`VfError::SizeMismatch`]。
pub fn split_into_islands(
    mesh: &TriangleMesh,
    vertex_field: &[DVec3],
) -> VfResult<(Vec<TriangleMesh>, Vec<Vec<DVec3>>)> {
    VfError::check_size("vertex_field", mesh.vertex_count(), vertex_field.len())?;

    let n = mesh.vertex_count();
    if n == 0 || mesh.triangle_count() == 0 {
        return Ok((Vec::new(), Vec::new()));
    }

    let mut sets = DisjointSet::new(n);
    for tri in &mesh.triangles {
        sets.union(tri[0], tri[1]);
        sets.union(tri[0], tri[2]);
    }

    // 根 -> 岛屿编号，按顶点升序首见分配
    let mut island_of_root = vec![u32::MAX; n];
    let mut island_count = 0u32;
    let mut island_of_vertex = vec![u32::MAX; n];
    for v in 0..n as u32 {
        let root = sets.find(v) as usize;
        if island_of_root[root] == u32::MAX {
            island_of_root[root] = island_count;
            island_count += 1;
        }
        island_of_vertex[v as usize] = island_of_root[root];
    }

    let mut islands = vec![TriangleMesh::default(); island_count as usize];
    let mut fields = vec![Vec::new(); island_count as usize];
    let mut local_index = vec![u32::MAX; n];
    for v in 0..n {
        let isl = island_of_vertex[v] as usize;
        local_index[v] = islands[isl].vertices.len() as u32;
        islands[isl].vertices.push(mesh.vertices[v]);
        fields[isl].push(vertex_field[v]);
    }

    for tri in &mesh.triangles {
        let isl = island_of_vertex[tri[0] as usize] as usize;
        debug_assert_eq!(isl, island_of_vertex[tri[1] as usize] as usize);
        islands[isl].triangles.push([
            local_index[tri[0] as usize],
            local_index[tri[1] as usize],
            local_index[tri[2] as usize],
        ]);
    }

    Ok((islands, fields))
}
