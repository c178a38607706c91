//! # wimprates - WIMP 直接探测事例率计算
//!
//! ## 子命令
//! - `rate`  - 弹性、Migdal、轫致辐射事例率谱
//! - `dme`   - 暗物质-电子散射事例率谱
//! - `earth` - 地球速率与年调制
//!
//! ## 依赖关系
//! - 使用 `wimprates::cli` 解析参数
//! - 使用 `wimprates::commands` 执行命令

use clap::Parser;
use wimprates::cli::Cli;
use wimprates::{commands, utils};

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
