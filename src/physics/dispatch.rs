//! # 探测机制分派
//!
//! 按 (相互作用, 探测机制) 选择积分策略，并在这里完成所有与能量无关的准备：
//! 壳层束缚能、Migdal 淬灭系数、电离形状因子的动量上限。所需响应数据缺失时
//! 在这里就失败，而不是在积分中途。
//!
//! 维数按嵌套积分计：Migdal 对每个壳层只积 E_R，速度积分已是解析的 η，
//! 所以是 “壳层求和 × 一维 E_R”，记为 2。
//!
//! | 机制 | 维数 | 额外输入 |
//! |---|---|---|
//! | elastic | 1 | 靶核 |
//! | elastic + SD | 1 | 耦合核子、结构函数带 |
//! | migdal | 2 | 壳层集合、q_nr |
//! | bremsstrahlung | 2 | 光子能量 |
//! | dme | 2 | 壳层、暗物质形状因子 |
//!
//! ## 依赖关系
//! - 被 `physics/rate.rs` 调用
//! - 使用 `models/`、`data::ResponseTables`

use crate::data::{Response, ResponseTables};
use crate::error::{Result, WimpError};
use crate::models::{DetectionMechanism, DmFormFactor, Interaction, Shell, Units};
use crate::physics::request::RateRequest;

/// Migdal 计算中的一个壳层
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MigdalShell {
    pub shell: Shell,
    /// 束缚能（单位制能量）
    pub binding: f64,
}

/// 积分策略
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Elastic,
    Migdal {
        shells: Vec<MigdalShell>,
        /// 计入可观测能量的核反冲比例；不计入时为 0
        q_nr: f64,
    },
    Bremsstrahlung,
    ElectronScattering {
        shell: Shell,
        binding: f64,
        form_factor: DmFormFactor,
        /// 电离形状因子表覆盖的最大动量转移
        q_max: f64,
    },
}

impl Strategy {
    /// 积分维数（速度积分计入一维）
    ///
    /// Migdal 的速度积分化为解析 η，数值上只对 E_R 积分，再对壳层求和；
    /// 计作 2 与轫致辐射、电子散射的二维积分并列。
    pub fn dimensions(&self) -> usize {
        match self {
            Strategy::Elastic => 1,
            Strategy::Migdal { .. } | Strategy::Bremsstrahlung => 2,
            Strategy::ElectronScattering { .. } => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Elastic => "elastic",
            Strategy::Migdal { .. } => "migdal",
            Strategy::Bremsstrahlung => "bremsstrahlung",
            Strategy::ElectronScattering { .. } => "dme",
        }
    }
}

/// 选择策略
pub fn select(request: &RateRequest, units: &Units, responses: &dyn ResponseTables) -> Result<Strategy> {
    let target = &request.target;
    match &request.mechanism {
        DetectionMechanism::Elastic => Ok(Strategy::Elastic),

        DetectionMechanism::Migdal(options) => {
            if !(0.0..1.0).contains(&options.q_nr) {
                return Err(WimpError::invalid(
                    "q_nr",
                    format!("must be in [0, 1), got {}", options.q_nr),
                ));
            }
            let selected: Vec<Shell> = match &options.shells {
                Some(shells) if shells.is_empty() => {
                    return Err(WimpError::invalid("shells", "at least one shell is required"));
                }
                Some(shells) => shells.clone(),
                None => target.migdal_shells.to_vec(),
            };
            let shells = selected
                .into_iter()
                .map(|shell| {
                    let orbital = target.orbital(shell)?;
                    Ok(MigdalShell {
                        shell,
                        binding: orbital.binding_ev * units.ev(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            for s in &shells {
                responses.migdal_probability(target, s.shell, 0.0)?;
            }
            Ok(Strategy::Migdal {
                shells,
                q_nr: if options.include_approx_nr {
                    options.q_nr
                } else {
                    0.0
                },
            })
        }

        DetectionMechanism::Bremsstrahlung => {
            responses.photon_form_factor(target, units.kev())?;
            Ok(Strategy::Bremsstrahlung)
        }

        DetectionMechanism::ElectronScattering { shell, form_factor } => {
            if let Interaction::SpinDependent { .. } = request.interaction {
                return Err(WimpError::UnsupportedInteraction(format!(
                    "{} is not defined for electron scattering",
                    request.interaction
                )));
            }
            if request.mediator_mass.is_some() {
                return Err(WimpError::invalid(
                    "mediator mass",
                    "electron scattering uses the dark matter form factor (1, 1_q, 1_q2) instead",
                ));
            }
            let binding = target.ionization_binding_ev(*shell)? * units.ev();
            let q_max = responses.ionization_q_max(target, *shell)?;
            Ok(Strategy::ElectronScattering {
                shell: *shell,
                binding,
                form_factor: *form_factor,
                q_max,
            })
        }
    }
}

/// 该请求用到的、由解析近似给出的响应量
pub fn approximations(
    request: &RateRequest,
    strategy: &Strategy,
    responses: &dyn ResponseTables,
) -> Vec<String> {
    let target = &request.target;
    let mut used = Vec::new();
    if let Interaction::SpinDependent { coupling, band } = request.interaction {
        used.push(Response::SpinStructure { coupling, band });
    }
    match strategy {
        Strategy::Migdal { shells, .. } => {
            used.extend(shells.iter().map(|s| Response::Migdal(s.shell)));
        }
        Strategy::Bremsstrahlung => used.push(Response::Photon),
        Strategy::Elastic | Strategy::ElectronScattering { .. } => {}
    }
    used.into_iter()
        .filter(|r| responses.is_approximate(target, *r))
        .map(|r| format!("{} {}", target.symbol, r))
        .collect()
}
