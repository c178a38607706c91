//! # earth 子命令 CLI 定义
//!
//! 地球在银河系静止系中的速率及其年调制。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/earth.rs`

use clap::Args;

/// earth 子命令参数
#[derive(Args, Debug)]
pub struct EarthArgs {
    /// Local standard of rest speed v_0 (km/s)
    #[arg(long, default_value_t = 238.0)]
    pub v0: f64,

    /// Date (YYYY-MM-DD or 'YYYY-MM-DD HH:MM')
    #[arg(long, conflicts_with = "t")]
    pub date: Option<String>,

    /// Days since J2000.0
    #[arg(long = "t", allow_negative_numbers = true)]
    pub t: Option<f64>,

    /// Also print the mean over one year of uniformly sampled times
    #[arg(long)]
    pub average: bool,

    /// Number of samples for --average
    #[arg(long, default_value_t = 10_000)]
    pub samples: usize,

    /// Print a table of the speed on the first day of each month of this year
    #[arg(long)]
    pub monthly: Option<i32>,
}
