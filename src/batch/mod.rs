//! # 批量计算模块
//!
//! 在能量网格上并行计算事例率。
//!
//! ## 功能
//! - 可配置线程数（0 表示按 CPU 核数）
//! - 进度条显示
//! - 结果保持输入顺序
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod runner;

pub use runner::BatchRunner;
