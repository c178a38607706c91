//! # 相互作用与探测机制标签
//!
//! 字符串标签（`SI`、`SD_n_central`、`migdal`、`dme:4d` 等）解析为枚举，
//! 未识别的标签直接报错。
//!
//! ## 依赖关系
//! - 被 `physics/dispatch.rs`、`cli/` 使用
//! - 使用 `models/target.rs` 的 Shell

use crate::error::{Result, WimpError};
use crate::models::target::Shell;

use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────
// 相互作用
// ─────────────────────────────────────────────────────────────

/// 自旋相关耦合的核子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nucleon {
    Neutron,
    Proton,
}

/// 结构函数的不确定度带
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureBand {
    Central,
    Up,
    Down,
}

/// WIMP-核子相互作用类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interaction {
    /// 自旋无关
    #[default]
    SpinIndependent,
    /// 自旋相关
    SpinDependent {
        coupling: Nucleon,
        band: StructureBand,
    },
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interaction::SpinIndependent => write!(f, "SI"),
            Interaction::SpinDependent { coupling, band } => {
                let n = match coupling {
                    Nucleon::Neutron => "n",
                    Nucleon::Proton => "p",
                };
                let b = match band {
                    StructureBand::Central => "central",
                    StructureBand::Up => "up",
                    StructureBand::Down => "down",
                };
                write!(f, "SD_{}_{}", n, b)
            }
        }
    }
}

impl FromStr for Interaction {
    type Err = WimpError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim();
        if tag == "SI" {
            return Ok(Interaction::SpinIndependent);
        }
        let parts: Vec<&str> = tag.split('_').collect();
        match parts.as_slice() {
            ["SD", nucleon, band] => {
                let coupling = match *nucleon {
                    "n" => Nucleon::Neutron,
                    "p" => Nucleon::Proton,
                    _ => return Err(WimpError::UnsupportedInteraction(tag.to_string())),
                };
                let band = match *band {
                    "central" => StructureBand::Central,
                    "up" => StructureBand::Up,
                    "down" => StructureBand::Down,
                    _ => return Err(WimpError::UnsupportedInteraction(tag.to_string())),
                };
                Ok(Interaction::SpinDependent { coupling, band })
            }
            _ => Err(WimpError::UnsupportedInteraction(tag.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 暗物质形状因子（电子散射）
// ─────────────────────────────────────────────────────────────

/// 暗物质形状因子 F_DM(q)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DmFormFactor {
    /// F_DM = 1（重传播子）
    #[default]
    Contact,
    /// F_DM = α m_e c / q
    Dipole,
    /// F_DM = (α m_e c / q)²（轻传播子）
    LightMediator,
}

impl DmFormFactor {
    /// F_DM 的幂次：F_DM = (α m_e c / q)^n
    pub fn power(&self) -> i32 {
        match self {
            DmFormFactor::Contact => 0,
            DmFormFactor::Dipole => 1,
            DmFormFactor::LightMediator => 2,
        }
    }
}

impl fmt::Display for DmFormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DmFormFactor::Contact => write!(f, "1"),
            DmFormFactor::Dipole => write!(f, "1_q"),
            DmFormFactor::LightMediator => write!(f, "1_q2"),
        }
    }
}

impl FromStr for DmFormFactor {
    type Err = WimpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(DmFormFactor::Contact),
            "1_q" => Ok(DmFormFactor::Dipole),
            "1_q2" => Ok(DmFormFactor::LightMediator),
            other => Err(WimpError::invalid(
                "form factor",
                format!("'{}' is not one of 1, 1_q, 1_q2", other),
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 探测机制
// ─────────────────────────────────────────────────────────────

/// Migdal 效应选项
#[derive(Debug, Clone, PartialEq)]
pub struct MigdalOptions {
    /// 是否把近似的核反冲能量贡献加入可观测能量
    pub include_approx_nr: bool,
    /// 核反冲淬灭因子（仅在 include_approx_nr 时使用）
    pub q_nr: f64,
    /// 显式指定的壳层；None 表示使用靶的默认壳层
    pub shells: Option<Vec<Shell>>,
}

impl Default for MigdalOptions {
    fn default() -> Self {
        Self {
            include_approx_nr: false,
            q_nr: 0.15,
            shells: None,
        }
    }
}

/// 探测机制
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetectionMechanism {
    /// 弹性核反冲
    #[default]
    Elastic,
    /// Migdal 效应
    Migdal(MigdalOptions),
    /// 轫致辐射
    Bremsstrahlung,
    /// 暗物质-电子散射
    ElectronScattering {
        shell: Shell,
        form_factor: DmFormFactor,
    },
}

impl fmt::Display for DetectionMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionMechanism::Elastic => write!(f, "elastic_nr"),
            DetectionMechanism::Migdal(_) => write!(f, "migdal"),
            DetectionMechanism::Bremsstrahlung => write!(f, "bremsstrahlung"),
            DetectionMechanism::ElectronScattering { shell, form_factor } => {
                write!(f, "dme:{}:{}", shell, form_factor)
            }
        }
    }
}

impl FromStr for DetectionMechanism {
    type Err = WimpError;

    /// 识别 `elastic_nr`/`elastic`/`none`、`migdal`、`bremsstrahlung`，
    /// 以及 `dme:<shell>[:<form factor>]`
    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim();
        match tag.to_lowercase().as_str() {
            "elastic_nr" | "elastic" | "none" => return Ok(DetectionMechanism::Elastic),
            "migdal" => return Ok(DetectionMechanism::Migdal(MigdalOptions::default())),
            "bremsstrahlung" | "brems" => return Ok(DetectionMechanism::Bremsstrahlung),
            _ => {}
        }

        let mut parts = tag.split(':');
        if parts.next().map(str::to_lowercase).as_deref() != Some("dme") {
            return Err(WimpError::UnsupportedMechanism(tag.to_string()));
        }
        let shell = parts
            .next()
            .ok_or_else(|| {
                WimpError::UnsupportedMechanism(format!("{} (expected dme:<shell>, e.g. dme:4d)", tag))
            })?
            .parse::<Shell>()?;
        let form_factor = match parts.next() {
            Some(ff) => ff.parse::<DmFormFactor>()?,
            None => DmFormFactor::default(),
        };
        if parts.next().is_some() {
            return Err(WimpError::UnsupportedMechanism(tag.to_string()));
        }
        Ok(DetectionMechanism::ElectronScattering { shell, form_factor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interaction() {
        assert_eq!("SI".parse::<Interaction>().unwrap(), Interaction::SpinIndependent);
        assert_eq!(
            "SD_n_central".parse::<Interaction>().unwrap(),
            Interaction::SpinDependent {
                coupling: Nucleon::Neutron,
                band: StructureBand::Central
            }
        );
        assert_eq!(
            "SD_p_down".parse::<Interaction>().unwrap().to_string(),
            "SD_p_down"
        );
    }

    #[test]
    fn test_unknown_interaction_fails_closed() {
        for tag in ["si", "SD", "SD_x_central", "SD_n_middle", "scalar"] {
            assert!(
                matches!(
                    tag.parse::<Interaction>(),
                    Err(WimpError::UnsupportedInteraction(_))
                ),
                "{} should be rejected",
                tag
            );
        }
    }

    #[test]
    fn test_parse_mechanism() {
        assert_eq!(
            "none".parse::<DetectionMechanism>().unwrap(),
            DetectionMechanism::Elastic
        );
        assert!(matches!(
            "Migdal".parse::<DetectionMechanism>().unwrap(),
            DetectionMechanism::Migdal(_)
        ));
        assert_eq!(
            "dme:4d:1_q2".parse::<DetectionMechanism>().unwrap(),
            DetectionMechanism::ElectronScattering {
                shell: Shell::new(4, 2),
                form_factor: DmFormFactor::LightMediator
            }
        );
    }

    #[test]
    fn test_unknown_mechanism_fails_closed() {
        assert!(matches!(
            "photoabsorption".parse::<DetectionMechanism>(),
            Err(WimpError::UnsupportedMechanism(_))
        ));
        assert!(matches!(
            "dme".parse::<DetectionMechanism>(),
            Err(WimpError::UnsupportedMechanism(_))
        ));
        assert!("dme:4d:1_q3".parse::<DetectionMechanism>().is_err());
    }

    #[test]
    fn test_dm_form_factor_power() {
        assert_eq!("1".parse::<DmFormFactor>().unwrap().power(), 0);
        assert_eq!("1_q".parse::<DmFormFactor>().unwrap().power(), 1);
        assert_eq!("1_q2".parse::<DmFormFactor>().unwrap().power(), 2);
    }
}
