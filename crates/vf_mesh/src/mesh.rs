// crates/vf_mesh/src/mesh.rs

//! 三角网格容器
//!
//! 顶点数组 + 三角形索引三元组的最小表示。网格是值语义快照：
//! 几何推入边界对象时按值捕获，捕获后不再原地修改。

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 三角网格
///
/// # 示例
///
/// ```
/// use glam::DVec3;
/// use vf_mesh::TriangleMesh;
///
/// let mesh = TriangleMesh::new(
///     vec![
///         DVec3::new(0.0, 0.0, 0.0),
///         DVec3::new(1.0, 0.0, 0.0),
///         DVec3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// 顶点位置
    pub vertices: Vec<DVec3>,
    /// 三角形顶点索引三元组
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// 创建新网格
    pub fn new(vertices: Vec<DVec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// 顶点数
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 三角形数
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// 是否为空网格
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// 顶点质心（算术平均），空网格返回零向量
    pub fn centroid(&self) -> DVec3 {
        if self.vertices.is_empty() {
            return DVec3::ZERO;
        }
        let sum: DVec3 = self.vertices.iter().copied().sum();
        sum / self.vertices.len() as f64
    }

    /// 整体平移
    pub fn translate(&mut self, dv: DVec3) {
        for v in self.vertices.iter_mut() {
            *v += dv;
        }
    }

    /// 删除未被任何三角形引用的顶点
    ///
    /// 重映射三角形索引，返回被删除顶点的原索引（升序）。调用方
    /// 据此对平行的逐顶点数组做同步删除（从后向前）。
    pub fn remove_extraneous_vertices(&mut self) -> Vec<usize> {
        let n = self.vertices.len();
        let mut referenced = vec![false; n];
        for tri in &self.triangles {
            for &vi in tri {
                referenced[vi as usize] = true;
            }
        }

        let mut remap = vec![u32::MAX; n];
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(n);
        for (idx, &keep) in referenced.iter().enumerate() {
            if keep {
                remap[idx] = kept.len() as u32;
                kept.push(self.vertices[idx]);
            } else {
                removed.push(idx);
            }
        }

        if removed.is_empty() {
            return removed;
        }

        self.vertices = kept;
        for tri in self.triangles.iter_mut() {
            for vi in tri.iter_mut() {
                *vi = remap[*vi as usize];
            }
        }
        removed
    }
}
