// crates/vf_boundary/src/config.rs

//! 装配调度配置
//!
//! 直连/并行装配的切换阈值与完成队列容量是纯粹的调参量，作为
//! 配置项暴露而不是硬编码。两者只影响性能，不影响装配结果的
//! 正确性（两种模式产出相同的并集）。

use serde::{Deserialize, Serialize};
use vf_foundation::{VfError, VfResult};
use vf_runtime::max_thread_count;

/// 岛屿距离场装配配置
///
/// # 示例
///
/// ```
/// use vf_boundary::AssemblerConfig;
///
/// let config = AssemblerConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.island_parallel_threshold, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// 切换到并行装配的岛屿数阈值
    ///
    /// 存活岛屿数小于该值时串行直连处理，否则走扇出/扇入调度。
    pub island_parallel_threshold: usize,
    /// 完成队列容量
    ///
    /// 工作线程投递完成距离场的有界队列容量，通常远小于岛屿数，
    /// 由主线程的批量合并推动。
    pub finished_queue_capacity: usize,
    /// 工作线程数，0 表示取平台可用线程数
    pub num_threads: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            island_parallel_threshold: 25,
            finished_queue_capacity: 10,
            num_threads: 0,
        }
    }
}

impl AssemblerConfig {
    /// 校验配置
    pub fn validate(&self) -> VfResult<()> {
        if self.island_parallel_threshold == 0 {
            return Err(VfError::config("island_parallel_threshold 必须至少为 1"));
        }
        if self.finished_queue_capacity == 0 {
            return Err(VfError::config("finished_queue_capacity 必须至少为 1"));
        }
        Ok(())
    }

    /// 实际生效的工作线程数
    #[inline]
    pub fn effective_thread_count(&self) -> usize {
        if self.num_threads == 0 {
            max_thread_count()
        } else {
            self.num_threads
        }
    }
}
