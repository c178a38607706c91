//! # 共享 CLI 参数
//!
//! `rate` 与 `dme` 共用的晕模型、时间、数据表、积分与输出参数。
//! 所有数值都使用 CLI 单位：keV、GeV/c²、cm²、km/s、GeV/c²/cm³。
//!
//! ## 依赖关系
//! - 被 `cli/rate.rs`、`cli/dme.rs` 通过 `#[command(flatten)]` 使用
//! - 由 `commands/common.rs` 转换为物理对象

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 能谱输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SpectrumFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// CSV with energy, rate and warning count
    Csv,
    /// Two-column text
    Xy,
}

impl std::fmt::Display for SpectrumFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpectrumFormat::Png => write!(f, "png"),
            SpectrumFormat::Svg => write!(f, "svg"),
            SpectrumFormat::Csv => write!(f, "csv"),
            SpectrumFormat::Xy => write!(f, "xy"),
        }
    }
}

/// 晕模型与观测时间
#[derive(Args, Debug, Clone)]
pub struct HaloArgs {
    /// Local dark matter density (GeV/c²/cm³)
    #[arg(long, default_value_t = 0.3)]
    pub rho_dm: f64,

    /// Halo velocity dispersion v_0 (km/s)
    #[arg(long, default_value_t = 238.0)]
    pub v0: f64,

    /// Galactic escape velocity (km/s)
    #[arg(long, default_value_t = 544.0)]
    pub v_esc: f64,

    /// Observation date (YYYY-MM-DD or 'YYYY-MM-DD HH:MM'); annual average if omitted
    #[arg(long, conflicts_with = "t")]
    pub date: Option<String>,

    /// Observation time in days since J2000.0
    #[arg(long = "t", allow_negative_numbers = true)]
    pub t: Option<f64>,
}

/// 计算与输出设置
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory with response tables (migdal_xe.csv, sd_xe.csv, brems_xe.csv, dme_xe_4d.csv, ...)
    #[arg(long, env = "WIMPRATES_TABLES")]
    pub tables: Option<PathBuf>,

    /// Output file for the spectrum (.csv, .xy, .png, .svg)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (auto-detected from extension if not specified)
    #[arg(long, value_enum)]
    pub format: Option<SpectrumFormat>,

    /// Number of parallel jobs (0 = number of CPUs)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Fail on the first non-converged integral instead of warning
    #[arg(long)]
    pub strict: bool,

    /// Use built-in analytic approximations for missing SD, Migdal and
    /// bremsstrahlung tables (reduced accuracy, reported as warnings)
    #[arg(long)]
    pub approximate: bool,

    /// Relative tolerance of the adaptive quadrature
    #[arg(long, default_value_t = 1e-4)]
    pub rel_tol: f64,

    /// Maximum number of quadrature subintervals
    #[arg(long, default_value_t = 200)]
    pub max_intervals: usize,

    /// Maximum number of rows printed to the terminal
    #[arg(long, default_value_t = 20)]
    pub show: usize,

    /// Plot title (defaults to a summary of the model)
    #[arg(long)]
    pub title: Option<String>,

    /// Plot width in pixels
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Plot height in pixels
    #[arg(long, default_value_t = 700)]
    pub height: u32,
}
