//! # rate 子命令 CLI 定义
//!
//! 核反冲类事例率：弹性散射、Migdal 效应、原子轫致辐射。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/rate.rs`

use super::common::{HaloArgs, RunArgs};
use clap::Args;

/// rate 子命令参数
#[derive(Args, Debug)]
pub struct RateArgs {
    /// WIMP mass (GeV/c²)
    #[arg(long)]
    pub mass: f64,

    /// WIMP-nucleon cross-section (cm²)
    #[arg(long)]
    pub sigma: f64,

    /// Interaction: SI or SD_<n|p>_<central|up|down>
    #[arg(long, default_value = "SI")]
    pub interaction: String,

    /// Mediator mass (GeV/c²); heavy mediator if omitted
    #[arg(long)]
    pub mediator_mass: Option<f64>,

    /// Detection mechanism: elastic, migdal, bremsstrahlung
    #[arg(long, default_value = "elastic")]
    pub mechanism: String,

    /// Energies in keV: '1', '1,2,5', '0.5-40:80' or '0.01-10:50:log'
    #[arg(short, long, default_value = "1")]
    pub energies: String,

    /// Target nucleus (Xe, Ar, Ge)
    #[arg(long, default_value = "Xe")]
    pub target: String,

    /// Migdal: add the quenched nuclear recoil energy to the observed energy
    #[arg(long)]
    pub include_approx_nr: bool,

    /// Migdal: nuclear recoil quenching factor
    #[arg(long, default_value_t = 0.15)]
    pub q_nr: f64,

    /// Migdal: comma-separated shells (e.g. '4d,5s,5p'); target default if omitted
    #[arg(long)]
    pub shells: Option<String>,

    #[command(flatten)]
    pub halo: HaloArgs,

    #[command(flatten)]
    pub run: RunArgs,
}
