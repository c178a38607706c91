//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `physics/`, `data/`, `utils/`
//! - 子模块: common, rate, dme, earth

pub mod common;
pub mod dme;
pub mod earth;
pub mod rate;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Rate(args) => rate::execute(args),
        Commands::Dme(args) => dme::execute(args),
        Commands::Earth(args) => earth::execute(args),
    }
}
