//! # dme 子命令 CLI 定义
//!
//! 暗物质-电子散射电离事例率，需要电离形状因子表。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/dme.rs`

use super::common::{HaloArgs, RunArgs};
use clap::Args;

/// dme 子命令参数
#[derive(Args, Debug)]
pub struct DmeArgs {
    /// Electron recoil energies in keV (same syntax as `rate --energies`)
    #[arg(short, long)]
    pub energies: String,

    /// Atomic shell (e.g. 4d, 5p)
    #[arg(long)]
    pub shell: String,

    /// Dark matter form factor: 1, 1_q or 1_q2
    #[arg(long, default_value = "1")]
    pub form_factor: String,

    /// WIMP mass (GeV/c²)
    #[arg(long)]
    pub mass: f64,

    /// WIMP-electron cross-section (cm²)
    #[arg(long)]
    pub sigma: f64,

    /// Target (only Xe has ionization tables)
    #[arg(long, default_value = "Xe")]
    pub target: String,

    #[command(flatten)]
    pub halo: HaloArgs,

    #[command(flatten)]
    pub run: RunArgs,
}
