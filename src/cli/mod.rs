//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `rate`: 核反冲类事例率（弹性、Migdal、轫致辐射）
//! - `dme`: 暗物质-电子散射事例率
//! - `earth`: 地球相对银河系的速率
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: common, rate, dme, earth

pub mod common;
pub mod dme;
pub mod earth;
pub mod rate;

use clap::{Parser, Subcommand};

/// wimprates - WIMP 直接探测事例率计算
#[derive(Parser)]
#[command(name = "wimprates")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Differential WIMP direct-detection rates", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Nuclear-recoil based rates (elastic, Migdal, bremsstrahlung)
    Rate(rate::RateArgs),

    /// Dark matter-electron scattering rates (requires ionization tables)
    Dme(dme::DmeArgs),

    /// Earth speed in the galactic frame
    Earth(earth::EarthArgs),
}
