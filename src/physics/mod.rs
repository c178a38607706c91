//! # 物理计算模块
//!
//! WIMP 直接探测事例率：晕模型、地球速度、形状因子、截面、
//! 各探测机制的积分与结果导出。
//!
//! ## 子模块
//! - `halo`, `earth`: 速度分布与地球运动
//! - `form_factors`, `cross_section`: 核形状因子与微分截面
//! - `integrate`: 基于 `quadrature` 双指数规则的自适应积分
//! - `request`, `dispatch`, `rate`: 请求、策略选择与计算器
//! - `migdal`, `bremsstrahlung`, `electron`: 多维探测机制
//! - `export`, `plot`: 能谱导出与绘图
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`、`data/`

pub mod bremsstrahlung;
pub mod cross_section;
pub mod dispatch;
pub mod earth;
pub mod electron;
pub mod export;
pub mod form_factors;
pub mod halo;
pub mod integrate;
pub mod migdal;
pub mod plot;
pub mod rate;
pub mod request;

pub use cross_section::CrossSectionModel;
pub use dispatch::Strategy;
pub use earth::v_earth;
pub use halo::HaloModel;
pub use integrate::{Diagnostics, IntegrationWarning, Quadrature};
pub use rate::{Evaluation, PreparedRate, RateCalculator, Settings, Spectrum};
pub use request::RateRequest;
