// crates/vf_runtime/src/array3d.rs

//! 稠密三维缓冲区
//!
//! 提供行主序（i 最快）的三维网格存储，是占据网格、距离场等
//! 内核的统一底层容器。
//!
//! # 布局
//!
//! ```text
//! flat = i + width * (j + height * k)
//! ```
//!
//! k 方向的一个切片（slab）在内存中连续，分块并行内核按 k 切片
//! 划分可变切片，无需加锁。
//!
//! # 示例
//!
//! ```
//! use vf_runtime::Array3d;
//!
//! let mut grid = Array3d::new(4, 3, 2, 0.0f64);
//! grid.set(1, 2, 1, 5.0);
//! assert_eq!(*grid.get(1, 2, 1), 5.0);
//! assert_eq!(grid.len(), 4 * 3 * 2);
//! ```

use crate::grid_index::GridIndex;
use std::ops::{Index, IndexMut};

/// 稠密三维缓冲区，行主序存储
#[derive(Debug, Clone)]
pub struct Array3d<T> {
    width: usize,
    height: usize,
    depth: usize,
    data: Vec<T>,
}

impl<T: Clone> Array3d<T> {
    /// 创建新缓冲区，所有元素初始化为 `fill`
    pub fn new(width: usize, height: usize, depth: usize, fill: T) -> Self {
        Self {
            width,
            height,
            depth,
            data: vec![fill; width * height * depth],
        }
    }

    /// 用指定值填充所有元素
    pub fn fill(&mut self, value: T) {
        for v in self.data.iter_mut() {
            *v = value.clone();
        }
    }
}

impl<T> Array3d<T> {
    /// 宽度（i 方向元素数）
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// 高度（j 方向元素数）
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// 深度（k 方向元素数）
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// 元素总数
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 扁平化索引
    #[inline]
    pub fn flat_index(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(i < self.width && j < self.height && k < self.depth);
        i + self.width * (j + self.height * k)
    }

    /// 网格索引是否在范围内
    #[inline]
    pub fn is_index_in_range(&self, g: GridIndex) -> bool {
        g.i >= 0
            && g.j >= 0
            && g.k >= 0
            && (g.i as usize) < self.width
            && (g.j as usize) < self.height
            && (g.k as usize) < self.depth
    }

    /// 读取元素
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> &T {
        &self.data[self.flat_index(i, j, k)]
    }

    /// 写入元素
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: T) {
        let idx = self.flat_index(i, j, k);
        self.data[idx] = value;
    }

    /// 按网格索引写入，越界索引被忽略
    ///
    /// 膨胀类内核对节点邻居逐个写入时使用，越界邻居是常态而非错误。
    #[inline]
    pub fn set_if_in_range(&mut self, g: GridIndex, value: T) {
        if self.is_index_in_range(g) {
            let idx = self.flat_index(g.i as usize, g.j as usize, g.k as usize);
            self.data[idx] = value;
        }
    }

    /// 只读切片视图
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// 可变切片视图（供分块并行内核使用）
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// 一个 k 切片的元素数
    #[inline]
    pub fn slab_len(&self) -> usize {
        self.width * self.height
    }
}

impl<T> Index<(usize, usize, usize)> for Array3d<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j, k): (usize, usize, usize)) -> &T {
        &self.data[self.flat_index(i, j, k)]
    }
}

impl<T> IndexMut<(usize, usize, usize)> for Array3d<T> {
    #[inline]
    fn index_mut(&mut self, (i, j, k): (usize, usize, usize)) -> &mut T {
        let idx = self.flat_index(i, j, k);
        &mut self.data[idx]
    }
}
