// crates/vf_runtime/src/thread.rs

//! 工作线程数预言
//!
//! 调度层据此决定扇出宽度。查询失败（受限容器等环境）时回退为 1。

use std::thread;

/// 平台可用的工作线程数
#[inline]
pub fn max_thread_count() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}
