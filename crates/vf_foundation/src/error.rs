// crates/vf_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `VfError` 枚举和 `VfResult` 类型别名，用于整个项目的错误处理。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义核心错误，不含任何几何/求解语义
//! 2. **易用性**: 提供便捷的构造方法和检查辅助
//! 3. **钳制优先**: 数值域异常（摩擦系数越界、dt 过小等）由调用方钳制
//!    吸收，不产生错误；本类型只表达契约违规
//!
//! # 示例
//!
//! ```
//! use vf_foundation::error::{VfError, VfResult};
//!
//! fn pair_field(vertices: usize, field: usize) -> VfResult<()> {
//!     VfError::check_size("vertex_velocities", vertices, field)
//! }
//!
//! assert!(pair_field(8, 8).is_ok());
//! assert!(pair_field(8, 7).is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type VfResult<T> = Result<T, VfError>;

/// VoxFlip 错误类型
///
/// 核心错误类型，用于整个项目。几何/装配层直接复用，不再扩展子类型。
#[derive(Error, Debug)]
pub enum VfError {
    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数据超出范围
    #[error("数据超出范围: {field}={value}, 期望范围=[{min}, {max}]")]
    OutOfRange {
        /// 字段名
        field: &'static str,
        /// 实际值
        value: f64,
        /// 最小允许值
        min: f64,
        /// 最大允许值
        max: f64,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 无效网格拓扑
    #[error("无效的网格拓扑: {message}")]
    InvalidMesh {
        /// 具体错误信息
        message: String,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 队列已结束，无法继续投递
    #[error("队列已结束，无法继续投递")]
    QueueFinished,

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl VfError {
    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数据超出范围
    pub fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 无效网格
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh {
            message: message.into(),
        }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl VfError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> VfResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查值是否在范围内
    #[inline]
    pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> VfResult<()> {
        if value < min || value > max {
            Err(Self::out_of_range(field, value, min, max))
        } else {
            Ok(())
        }
    }

    /// 检查索引是否在范围内
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> VfResult<()> {
        if index >= len {
            Err(Self::index_out_of_bounds(index_type, index, len))
        } else {
            Ok(())
        }
    }
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VfError::config("测试配置错误");
        assert!(err.to_string().contains("配置错误"));
    }

    #[test]
    fn test_size_mismatch() {
        let err = VfError::size_mismatch("velocities", 10, 5);
        assert!(err.to_string().contains("velocities"));
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("5"));
    }

    #[test]
    fn test_check_size() {
        assert!(VfError::check_size("test", 10, 10).is_ok());
        assert!(VfError::check_size("test", 10, 5).is_err());
    }

    #[test]
    fn test_check_range() {
        assert!(VfError::check_range("friction", 0.5, 0.0, 1.0).is_ok());
        assert!(VfError::check_range("friction", -0.1, 0.0, 1.0).is_err());
        assert!(VfError::check_range("friction", 1.1, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_check_index() {
        assert!(VfError::check_index("Cell", 5, 10).is_ok());
        assert!(VfError::check_index("Cell", 10, 10).is_err());
    }

    #[test]
    fn test_queue_finished() {
        let err = VfError::QueueFinished;
        assert!(err.to_string().contains("队列"));
    }
}
