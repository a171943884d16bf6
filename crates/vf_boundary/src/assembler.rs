// crates/vf_boundary/src/assembler.rs

//! 岛屿距离场装配流水线
//!
//! 把（可能不连通、可能拓扑变化中的）插值网格装配进域距离场：
//!
//! 1. 剔除游离顶点（游离几何会破坏岛屿拆分），同步裁剪速度场
//! 2. 按连通分量拆分为岛屿
//! 3. 裁剪：包围盒与模拟域无重叠的岛屿直接丢弃
//! 4. 膨胀（可选）：顶点沿质心方向外推半个膨胀量
//! 5. 调度：岛屿少时串行直连，多时（断裂事件后）走扇出/扇入
//!    并行调度；两种模式产出相同的并集结果
//! 6. 逐岛屿：紧致子网格上计算窄带距离场，仅在主线程并集合并
//!
//! # 所有权
//!
//! 工作线程构造并独占岛屿距离场，投递进完成队列即转移所有权；
//! 主线程合并后释放。任何距离场从不被多个线程同时修改。域距离场
//! 的尺寸与单元大小在启动线程前取出，工作线程不接触域距离场本身。

use crate::config::AssemblerConfig;
use crate::snapshot::GeometrySnapshots;
use glam::DVec3;
use log::debug;
use std::thread;
use vf_foundation::tolerance::MESH_EXPANSION_EPS;
use vf_foundation::{VfError, VfResult};
use vf_levelset::MeshLevelSet;
use vf_mesh::{split_into_islands, Aabb, TriangleMesh};
use vf_runtime::{position_to_grid_index, BoundedBuffer, GridIndex};

/// 一个岛屿的装配工作项：网格与其速度子集
struct MeshIslandWorkItem {
    mesh: TriangleMesh,
    vertex_velocities: Vec<DVec3>,
}

/// 把边界对象在亚帧比例 `frame_interpolation` 处的几何装配进
/// `levelset`（就地并集合并）
///
/// # 错误
///
/// 逐顶点速度场与插值网格长度不一致时返回
/// [`VfError::SizeMismatch`](vf_foundation::VfError::SizeMismatch)；
/// 并行模式下工作线程的失败被收集并返回第一个错误。
pub fn add_mesh_to_level_set(
    snapshots: &GeometrySnapshots,
    dt: f64,
    frame_interpolation: f64,
    exact_band: i32,
    mesh_expansion: f64,
    config: &AssemblerConfig,
    levelset: &mut MeshLevelSet,
) -> VfResult<()> {
    let mut mesh = snapshots.interpolated_mesh(frame_interpolation);

    // 游离几何会破坏岛屿拆分，先行剔除并同步裁剪速度场
    let removed = mesh.remove_extraneous_vertices();
    let mut vertex_velocities = snapshots.vertex_velocities(dt, frame_interpolation);
    for &idx in removed.iter().rev() {
        vertex_velocities.remove(idx);
    }

    let (mut islands, island_velocities) =
        culled_mesh_islands(&mesh, &vertex_velocities, levelset)?;
    expand_mesh_islands(&mut islands, mesh_expansion);

    debug!(
        "岛屿装配: {} 个存活岛屿, 并行阈值 {}",
        islands.len(),
        config.island_parallel_threshold
    );

    if islands.len() < config.island_parallel_threshold {
        add_islands_direct(&islands, &island_velocities, exact_band, levelset)
    } else {
        add_islands_parallel(islands, island_velocities, exact_band, config, levelset)
    }
}

/// 拆分岛屿并按模拟域包围盒裁剪
///
/// 保留完全落在域内的岛屿，以及与域有任一方向正向重叠的岛屿；
/// 其余岛屿（完全在模拟区域之外）被丢弃。
fn culled_mesh_islands(
    mesh: &TriangleMesh,
    vertex_velocities: &[DVec3],
    levelset: &MeshLevelSet,
) -> VfResult<(Vec<TriangleMesh>, Vec<Vec<DVec3>>)> {
    let (candidates, candidate_velocities) = split_into_islands(mesh, vertex_velocities)?;

    let (w, h, d) = levelset.grid_dimensions();
    let dx = levelset.cell_size();
    let grid_aabb = Aabb::new(DVec3::ZERO, w as f64 * dx, h as f64 * dx, d as f64 * dx);

    let mut islands = Vec::with_capacity(candidates.len());
    let mut velocities = Vec::with_capacity(candidate_velocities.len());
    for (island, vel) in candidates.into_iter().zip(candidate_velocities) {
        let island_aabb = Aabb::from_points(&island.vertices);
        let keep = if grid_aabb.is_point_inside(island_aabb.min)
            && grid_aabb.is_point_inside(island_aabb.max)
        {
            true
        } else {
            let inter = grid_aabb.intersection(&island_aabb);
            inter.width() > 0.0 || inter.height() > 0.0 || inter.depth() > 0.0
        };
        if keep {
            islands.push(island);
            velocities.push(vel);
        }
    }
    Ok((islands, velocities))
}

/// 对所有岛屿施加网格膨胀
///
/// 膨胀量低于阈值时整体跳过（零膨胀严格不改动顶点）。
fn expand_mesh_islands(islands: &mut [TriangleMesh], mesh_expansion: f64) {
    if mesh_expansion.abs() < MESH_EXPANSION_EPS {
        return;
    }
    for island in islands.iter_mut() {
        expand_mesh_island(island, mesh_expansion);
    }
}

/// 顶点沿质心相对方向外推半个膨胀量
///
/// 与质心重合的顶点不动，避免归一化退化。这只是鲁棒性充气，
/// 不是真正的偏移曲面。
fn expand_mesh_island(mesh: &mut TriangleMesh, mesh_expansion: f64) {
    if mesh.vertices.is_empty() {
        return;
    }

    let centroid = mesh.centroid();
    let expval = 0.5 * mesh_expansion;
    for v in mesh.vertices.iter_mut() {
        let dir = *v - centroid;
        if dir.x.abs() < MESH_EXPANSION_EPS
            && dir.y.abs() < MESH_EXPANSION_EPS
            && dir.z.abs() < MESH_EXPANSION_EPS
        {
            continue;
        }
        *v += expval * dir.normalize();
    }
}

/// 岛屿的紧致子网格距离场
///
/// 包围盒转网格索引盒后向外扩 `exact_band + 1` 个单元、向内钳制
/// 到域网格边界，在该子网格上计算窄带距离场并记录偏移。
fn island_level_set(
    mesh: &TriangleMesh,
    vertex_velocities: &[DVec3],
    domain_dims: (usize, usize, usize),
    dx: f64,
    exact_band: i32,
    multi_threading: bool,
) -> VfResult<MeshLevelSet> {
    let (w, h, d) = domain_dims;
    let aabb = Aabb::from_points(&mesh.vertices);
    let gmin = position_to_grid_index(aabb.min, dx);
    let gmax = position_to_grid_index(aabb.max, dx);

    let gmin = GridIndex::new(
        (gmin.i - exact_band).max(0),
        (gmin.j - exact_band).max(0),
        (gmin.k - exact_band).max(0),
    );
    let gmax = GridIndex::new(
        (gmax.i + exact_band + 1).min(w as i32 - 1),
        (gmax.j + exact_band + 1).min(h as i32 - 1),
        (gmax.k + exact_band + 1).min(d as i32 - 1),
    );

    let gwidth = (gmax.i - gmin.i).max(0) as usize;
    let gheight = (gmax.j - gmin.j).max(0) as usize;
    let gdepth = (gmax.k - gmin.k).max(0) as usize;

    let mut island_levelset = MeshLevelSet::new(gwidth, gheight, gdepth, dx);
    island_levelset.set_grid_offset(gmin);
    if !multi_threading {
        island_levelset.disable_multi_threading();
    }
    island_levelset.fast_calculate_signed_distance_field(mesh, vertex_velocities, exact_band)?;
    Ok(island_levelset)
}

/// 直连模式：逐岛屿串行计算并合并
fn add_islands_direct(
    islands: &[TriangleMesh],
    island_velocities: &[Vec<DVec3>],
    exact_band: i32,
    levelset: &mut MeshLevelSet,
) -> VfResult<()> {
    let dims = levelset.grid_dimensions();
    let dx = levelset.cell_size();
    for (island, velocities) in islands.iter().zip(island_velocities.iter()) {
        let island_levelset =
            island_level_set(island, velocities, dims, dx, exact_band, true)?;
        levelset.calculate_union(&island_levelset);
    }
    Ok(())
}

/// 并行模式：有界队列扇出岛屿、扇入完成的距离场
///
/// 工作队列容量等于岛屿数（生产端预装载、永不阻塞）；完成队列
/// 容量固定且小于岛屿数，由主线程的批量合并推动。工作线程内部的
/// 距离场并行被关闭：并行已经表达在岛屿粒度上，嵌套会超订。
fn add_islands_parallel(
    islands: Vec<TriangleMesh>,
    island_velocities: Vec<Vec<DVec3>>,
    exact_band: i32,
    config: &AssemblerConfig,
    levelset: &mut MeshLevelSet,
) -> VfResult<()> {
    let island_count = islands.len();
    if island_count == 0 {
        return Ok(());
    }

    let dims = levelset.grid_dimensions();
    let dx = levelset.cell_size();

    let work_queue = BoundedBuffer::new(island_count);
    for (mesh, vertex_velocities) in islands.into_iter().zip(island_velocities) {
        work_queue.push(MeshIslandWorkItem {
            mesh,
            vertex_velocities,
        })?;
    }

    let finished_queue: BoundedBuffer<VfResult<MeshLevelSet>> =
        BoundedBuffer::new(config.finished_queue_capacity);
    let num_threads = config.effective_thread_count().max(1);

    debug!("并行装配: {} 个岛屿, {} 个工作线程", island_count, num_threads);

    let mut first_error: Option<VfError> = None;
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(num_threads);
        for _ in 0..num_threads {
            let work_queue = &work_queue;
            let finished_queue = &finished_queue;
            handles.push(scope.spawn(move || {
                island_level_set_worker(work_queue, finished_queue, dims, dx, exact_band);
            }));
        }

        let mut processed = 0;
        while processed < island_count {
            let batch = finished_queue.pop_all();
            for item in batch {
                processed += 1;
                match item {
                    Ok(island_levelset) => levelset.calculate_union(&island_levelset),
                    Err(err) => {
                        if first_error.is_none() {
                            first_error = Some(err);
                        }
                    }
                }
            }
        }

        work_queue.notify_finished();
        for handle in handles {
            work_queue.notify_finished();
            if handle.join().is_err() && first_error.is_none() {
                first_error = Some(VfError::internal("岛屿工作线程异常退出"));
            }
        }
    });

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// 工作线程循环：取岛屿、建距离场、投递成品
///
/// 空弹出是良性重试（元素被其他线程抢走或已收到结束信号），
/// 循环条件由工作队列的剩余量决定。
fn island_level_set_worker(
    work_queue: &BoundedBuffer<MeshIslandWorkItem>,
    finished_queue: &BoundedBuffer<VfResult<MeshLevelSet>>,
    domain_dims: (usize, usize, usize),
    dx: f64,
    exact_band: i32,
) {
    while !work_queue.is_empty() {
        let mut items = work_queue.pop(1);
        let Some(item) = items.pop() else {
            continue;
        };

        let result = island_level_set(
            &item.mesh,
            &item.vertex_velocities,
            domain_dims,
            dx,
            exact_band,
            false,
        );
        if finished_queue.push(result).is_err() {
            break;
        }
    }
}
