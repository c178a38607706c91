//! # 核/原子响应数据
//!
//! 事例率积分只通过 `ResponseTables` 读取外部数据：自旋相关结构函数、
//! Migdal 电离概率、光子形状因子与电子电离形状因子。
//!
//! ## 实现
//! - `BuiltinResponses`: 默认不提供任何表格，对应的量直接报错；
//!   显式启用后改用解析近似（不含电子电离形状因子）
//! - `TabulatedResponses`: 从 CSV 表格加载，缺失的表同样交给 `BuiltinResponses`
//!
//! 来自解析近似的量由 `is_approximate` 标出，计算结果的诊断中会列出。
//!
//! ## 依赖关系
//! - 被 `physics/` 调用
//! - 使用 `models/`，`parsers/tables.rs` 负责读文件
//! - 子模块: builtin, tables, tabulated

pub mod builtin;
pub mod tables;
pub mod tabulated;

pub use builtin::BuiltinResponses;
pub use tables::{LinearTable, LogGridTable};
pub use tabulated::TabulatedResponses;

use crate::error::Result;
use crate::models::{Interaction, Nucleon, Shell, StructureBand, Target};

use std::fmt::{self, Debug};

/// 可能来自近似的响应量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    SpinStructure { coupling: Nucleon, band: StructureBand },
    Migdal(Shell),
    Photon,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::SpinStructure { coupling, band } => write!(
                f,
                "{} structure function",
                Interaction::SpinDependent {
                    coupling: *coupling,
                    band: *band
                }
            ),
            Response::Migdal(shell) => write!(f, "{} Migdal probability", shell),
            Response::Photon => write!(f, "photon form factor"),
        }
    }
}

/// 外部响应数据（只读）
///
/// 能量、动量都以构造实现时捕获的单位制表示。
pub trait ResponseTables: Debug + Send + Sync {
    /// 数据来源描述
    fn describe(&self) -> String;

    /// 该量是否由解析近似而不是表格给出
    fn is_approximate(&self, target: &Target, response: Response) -> bool;

    /// 丰度加权的 S(q)/(2J+1)，q = √(2 m_A E_R)
    fn spin_structure(
        &self,
        target: &Target,
        e_r: f64,
        coupling: Nucleon,
        band: StructureBand,
    ) -> Result<f64>;

    /// Migdal 微分电离概率 2π·dP/dE_e（q_e = 1 eV/c，单位：1/能量）
    fn migdal_probability(&self, target: &Target, shell: Shell, e_electron: f64) -> Result<f64>;

    /// 原子光子散射形状因子 (f₁, f₂)
    fn photon_form_factor(&self, target: &Target, omega: f64) -> Result<(f64, f64)>;

    /// 电离形状因子 |f_ion(E_e, q)|²
    fn ionization_form_factor(
        &self,
        target: &Target,
        shell: Shell,
        e_electron: f64,
        q: f64,
    ) -> Result<f64>;

    /// 电离形状因子表覆盖的最大动量转移
    fn ionization_q_max(&self, target: &Target, shell: Shell) -> Result<f64>;
}
