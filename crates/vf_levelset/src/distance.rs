// crates/vf_levelset/src/distance.rs

//! 几何内核：点-三角形最近距离与交叉奇偶性光栅化
//!
//! 本模块是 crate 内部实现细节，不对外导出。
//!
//! - 最近点计算按 Voronoi 区域分类（顶点/边/面），返回重心坐标
//!   供速度插值使用
//! - 奇偶性光栅化将三角形的 yz 投影栅格化到节点列上，沿 +x 记录
//!   穿越位置；前缀扫描得到节点的内外奇偶性。共享边上的采样点
//!   通过带符号扰动的方向判定恰好归入一个三角形，保证穿越不被
//!   重复计数

use glam::DVec3;
use vf_mesh::TriangleMesh;
use vf_runtime::Array3d;

/// 点到三角形的最近点结果
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClosestPoint {
    /// 最近距离（非负）
    pub distance: f64,
    /// 最近点的重心坐标 (w_a, w_b, w_c)
    pub barycentric: DVec3,
}

/// 点 `p` 到三角形 `abc` 的最近点
///
/// Voronoi 区域分类：先检查三个顶点区域，再检查三条边区域，
/// 否则最近点落在三角形内部。
pub(crate) fn point_triangle_closest(p: DVec3, a: DVec3, b: DVec3, c: DVec3) -> ClosestPoint {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return vertex_result(p, a, DVec3::new(1.0, 0.0, 0.0));
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return vertex_result(p, b, DVec3::new(0.0, 1.0, 0.0));
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let t = d1 / (d1 - d3);
        let q = a + ab * t;
        return ClosestPoint {
            distance: (p - q).length(),
            barycentric: DVec3::new(1.0 - t, t, 0.0),
        };
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return vertex_result(p, c, DVec3::new(0.0, 0.0, 1.0));
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let t = d2 / (d2 - d6);
        let q = a + ac * t;
        return ClosestPoint {
            distance: (p - q).length(),
            barycentric: DVec3::new(1.0 - t, 0.0, t),
        };
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let t = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        let q = b + (c - b) * t;
        return ClosestPoint {
            distance: (p - q).length(),
            barycentric: DVec3::new(0.0, 1.0 - t, t),
        };
    }

    // 内部区域
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    let q = a + ab * v + ac * w;
    ClosestPoint {
        distance: (p - q).length(),
        barycentric: DVec3::new(1.0 - v - w, v, w),
    }
}

#[inline]
fn vertex_result(p: DVec3, v: DVec3, bary: DVec3) -> ClosestPoint {
    ClosestPoint {
        distance: (p - v).length(),
        barycentric: bary,
    }
}

/// 带符号扰动的二维方向判定
///
/// 返回有向面积×2 的符号；面积为零时按 (y 降序, x 升序) 的
/// 字典序扰动给出一致的伪符号。两个共享一条边的三角形因此对
/// 边上的点给出相反的判定，采样点恰好落入其中一个。
#[inline]
fn orientation(x1: f64, y1: f64, x2: f64, y2: f64, twice_signed_area: &mut f64) -> i32 {
    *twice_signed_area = y1 * x2 - x1 * y2;
    if *twice_signed_area > 0.0 {
        1
    } else if *twice_signed_area < 0.0 {
        -1
    } else if y2 > y1 {
        1
    } else if y2 < y1 {
        -1
    } else if x1 > x2 {
        1
    } else if x1 < x2 {
        -1
    } else {
        0
    }
}

/// 点 (x0,y0) 是否落在二维三角形内（含一致的边界归属）
///
/// 命中时输出归一化重心坐标 (a,b,c)。
#[allow(clippy::too_many_arguments)]
fn point_in_triangle_2d(
    x0: f64,
    y0: f64,
    mut x1: f64,
    mut y1: f64,
    mut x2: f64,
    mut y2: f64,
    mut x3: f64,
    mut y3: f64,
    a: &mut f64,
    b: &mut f64,
    c: &mut f64,
) -> bool {
    x1 -= x0;
    x2 -= x0;
    x3 -= x0;
    y1 -= y0;
    y2 -= y0;
    y3 -= y0;

    let sign_a = orientation(x2, y2, x3, y3, a);
    if sign_a == 0 {
        return false;
    }
    let sign_b = orientation(x3, y3, x1, y1, b);
    if sign_b != sign_a {
        return false;
    }
    let sign_c = orientation(x1, y1, x2, y2, c);
    if sign_c != sign_a {
        return false;
    }

    let sum = *a + *b + *c;
    debug_assert!(sum != 0.0);
    *a /= sum;
    *b /= sum;
    *c /= sum;
    true
}

/// 对节点点阵做内外奇偶性分类
///
/// 节点 (i,j,k) 的世界坐标为 `origin + (i,j,k) * dx`，点阵尺寸为
/// `nx × ny × nz`（节点数）。对每个内部节点调用一次 `mark`。
///
/// 点阵范围之外的三角形列被直接跳过，落在点阵 x 下界之前的穿越
/// 归入首个节点、越过上界的穿越丢弃，不会产生越界访问。
pub(crate) fn for_each_inside_node<F>(
    mesh: &TriangleMesh,
    origin: DVec3,
    dx: f64,
    nx: usize,
    ny: usize,
    nz: usize,
    mut mark: F,
) where
    F: FnMut(usize, usize, usize),
{
    if nx == 0 || ny == 0 || nz == 0 || mesh.triangle_count() == 0 {
        return;
    }

    let mut crossings = Array3d::new(nx, ny, nz, 0u32);
    let inv_dx = 1.0 / dx;

    for tri in &mesh.triangles {
        let pa = mesh.vertices[tri[0] as usize];
        let pb = mesh.vertices[tri[1] as usize];
        let pc = mesh.vertices[tri[2] as usize];

        let ymin = pa.y.min(pb.y).min(pc.y);
        let ymax = pa.y.max(pb.y).max(pc.y);
        let zmin = pa.z.min(pb.z).min(pc.z);
        let zmax = pa.z.max(pb.z).max(pc.z);

        let j_lo = (((ymin - origin.y) * inv_dx).ceil() as i64).max(0);
        let j_hi = (((ymax - origin.y) * inv_dx).floor() as i64).min(ny as i64 - 1);
        let k_lo = (((zmin - origin.z) * inv_dx).ceil() as i64).max(0);
        let k_hi = (((zmax - origin.z) * inv_dx).floor() as i64).min(nz as i64 - 1);

        for k in k_lo..=k_hi {
            let qz = origin.z + k as f64 * dx;
            for j in j_lo..=j_hi {
                let qy = origin.y + j as f64 * dx;

                let (mut wa, mut wb, mut wc) = (0.0, 0.0, 0.0);
                if !point_in_triangle_2d(
                    qy, qz, pa.y, pa.z, pb.y, pb.z, pc.y, pc.z, &mut wa, &mut wb, &mut wc,
                ) {
                    continue;
                }

                let x_cross = wa * pa.x + wb * pb.x + wc * pc.x;
                // 首个严格位于穿越点之后的节点
                let i_cross = (((x_cross - origin.x) * inv_dx).floor() as i64 + 1).max(0);
                if i_cross < nx as i64 {
                    let idx = crossings.flat_index(i_cross as usize, j as usize, k as usize);
                    crossings.as_slice_mut()[idx] += 1;
                }
            }
        }
    }

    // 前缀扫描：奇数次穿越在物体内部
    for k in 0..nz {
        for j in 0..ny {
            let mut acc = 0u32;
            for i in 0..nx {
                acc += *crossings.get(i, j, k);
                if acc % 2 == 1 {
                    mark(i, j, k);
                }
            }
        }
    }
}
