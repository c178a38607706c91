//! # 数据模型模块
//!
//! 定义单位制、靶物质和相互作用/探测机制标签。
//!
//! ## 依赖关系
//! - 被 `physics/`、`data/`、`parsers/` 和 `commands/` 使用
//! - 子模块: units, target, interaction

pub mod interaction;
pub mod target;
pub mod units;

pub use interaction::{
    DetectionMechanism, DmFormFactor, Interaction, MigdalOptions, Nucleon, StructureBand,
};
pub use target::{Orbital, Shell, SpinIsotope, Target};
pub use units::{Units, ALPHA};
