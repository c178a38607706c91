//! # wimprates - WIMP 直接探测事例率
//!
//! 计算 WIMP 在氙等靶上的微分事例率：弹性核反冲、Migdal 效应、
//! 原子轫致辐射以及暗物质-电子散射。
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (并行逐点计算)
//!   │     └── physics/   (事例率计算)
//!   │           ├── data/    (响应数据表与内置近似)
//!   │           ├── parsers/ (能量网格、日期、CSV 数据表)
//!   │           └── models/  (单位、靶、相互作用标签)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod data;
pub mod error;
pub mod models;
pub mod parsers;
pub mod physics;
pub mod utils;

pub use error::{Result, WimpError};
