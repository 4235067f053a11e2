//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - 日志初始化
//! - 输入校验

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResult, ErrorCode};
