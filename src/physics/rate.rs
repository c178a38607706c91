//! # 事例率计算器
//!
//! `RateCalculator` 持有单位制、响应数据与积分设置；`prepare` 把一个
//! `RateRequest` 变成与能量无关的 `PreparedRate`（截面模型、积分策略），
//! 之后每个能量点只走 `PreparedRate::evaluate` 这一条路径。
//!
//! ## 事例率
//! - 弹性：ρ/(m_χ m_A) · [dσ/dE_R·v²](E) · η(v_min(E))
//! - Migdal、轫致辐射、电子散射见各自模块
//!
//! 结果与输入同单位制：每质量每时间每能量。
//!
//! ## 依赖关系
//! - 被 `commands/`、`batch/` 调用
//! - 使用 `physics/dispatch.rs` 选择策略，`rayon` 并行计算能量网格

use crate::data::{BuiltinResponses, ResponseTables};
use crate::error::{Result, WimpError};
use crate::models::{DetectionMechanism, DmFormFactor, Shell, Units};
use crate::physics::cross_section::CrossSectionModel;
use crate::physics::dispatch::{self, Strategy};
use crate::physics::halo::HaloModel;
use crate::physics::integrate::{Diagnostics, IntegrationLog, Quadrature};
use crate::physics::request::RateRequest;
use crate::physics::{bremsstrahlung, electron, migdal};

use rayon::prelude::*;

/// 计算设置
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Settings {
    pub quadrature: Quadrature,
    /// 积分未收敛时报错而不是只记录警告
    pub strict: bool,
}

/// 单个能量点的结果
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub energy: f64,
    pub value: f64,
    pub diagnostics: Diagnostics,
}

/// 能量谱（与输入能量同序同长）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    pub energies: Vec<f64>,
    pub rates: Vec<f64>,
    pub diagnostics: Diagnostics,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// 按顺序合并单点结果
    pub fn from_evaluations(evaluations: Vec<Evaluation>) -> Self {
        let mut spectrum = Spectrum::default();
        for evaluation in evaluations {
            spectrum.energies.push(evaluation.energy);
            spectrum.rates.push(evaluation.value);
            spectrum.diagnostics.extend(evaluation.diagnostics);
        }
        spectrum
    }

    /// (能量, 事例率) 对
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.energies.iter().copied().zip(self.rates.iter().copied())
    }
}

// ─────────────────────────────────────────────────────────────
// 计算器
// ─────────────────────────────────────────────────────────────

/// 事例率计算器
pub struct RateCalculator {
    units: Units,
    responses: Box<dyn ResponseTables>,
    settings: Settings,
}

impl RateCalculator {
    /// 不带响应表：弹性 SI 可用，其余机制需要 `with_responses`
    pub fn new(units: Units) -> Self {
        Self::with_responses(units, Box::new(BuiltinResponses::new(units)))
    }

    /// 使用给定的响应数据（须与 `units` 同单位制构造）
    pub fn with_responses(units: Units, responses: Box<dyn ResponseTables>) -> Self {
        Self {
            units,
            responses,
            settings: Settings::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn units(&self) -> &Units {
        &self.units
    }

    pub fn responses(&self) -> &dyn ResponseTables {
        self.responses.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// 完成与能量无关的准备和全部参数校验
    pub fn prepare<'a>(&'a self, request: &'a RateRequest) -> Result<PreparedRate<'a>> {
        let responses = self.responses.as_ref();
        let model = CrossSectionModel::new(
            self.units,
            request.target,
            responses,
            request.wimp_mass,
            request.cross_section,
            request.interaction,
            request.mediator_mass,
        )?;
        let strategy = dispatch::select(request, &self.units, responses)?;
        let approximations = dispatch::approximations(request, &strategy, responses);
        Ok(PreparedRate {
            units: self.units,
            model,
            responses,
            halo: request.halo,
            time: request.time,
            quadrature: self.settings.quadrature,
            strict: self.settings.strict,
            strategy,
            approximations,
        })
    }

    /// 单点微分事例率
    pub fn rate(&self, energy: f64, request: &RateRequest) -> Result<Evaluation> {
        self.prepare(request)?.evaluate(energy)
    }

    /// 能量网格上的微分事例率（并行，保持顺序）
    pub fn rates(&self, energies: &[f64], request: &RateRequest) -> Result<Spectrum> {
        let prepared = self.prepare(request)?;
        let evaluations = energies
            .par_iter()
            .map(|&energy| prepared.evaluate(energy))
            .collect::<Result<Vec<_>>>()?;
        Ok(Spectrum::from_evaluations(evaluations))
    }

    /// 暗物质-电子散射事例率（氙靶）
    #[allow(clippy::too_many_arguments)]
    pub fn rate_dme(
        &self,
        energy: f64,
        shell: Shell,
        form_factor: DmFormFactor,
        wimp_mass: f64,
        sigma_dme: f64,
        halo: &HaloModel,
        t: Option<f64>,
    ) -> Result<Evaluation> {
        let mut request = RateRequest::new(&self.units, wimp_mass, sigma_dme)?
            .with_mechanism(DetectionMechanism::ElectronScattering { shell, form_factor })
            .with_halo(*halo);
        request.time = t;
        self.rate(energy, &request)
    }
}

// ─────────────────────────────────────────────────────────────
// 准备好的计算
// ─────────────────────────────────────────────────────────────

/// 与能量无关的部分已完成的计算
#[derive(Debug, Clone)]
pub struct PreparedRate<'a> {
    pub(crate) units: Units,
    pub(crate) model: CrossSectionModel<'a>,
    pub(crate) responses: &'a dyn ResponseTables,
    pub(crate) halo: HaloModel,
    pub(crate) time: Option<f64>,
    pub(crate) quadrature: Quadrature,
    strict: bool,
    strategy: Strategy,
    approximations: Vec<String>,
}

impl<'a> PreparedRate<'a> {
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// 由解析近似给出的响应量
    pub fn approximations(&self) -> &[String] {
        &self.approximations
    }

    /// ρ/(m_χ m_A)
    pub(crate) fn prefactor(&self) -> f64 {
        self.halo.rho_dm / (self.model.wimp_mass() * self.model.target_mass())
    }

    pub(crate) fn v_max(&self) -> f64 {
        self.halo.v_max(self.time)
    }

    pub(crate) fn eta(&self, v_min: f64) -> f64 {
        self.halo.eta(v_min, self.time)
    }

    /// 计算一个能量点
    pub fn evaluate(&self, energy: f64) -> Result<Evaluation> {
        if !(energy.is_finite() && energy >= 0.0) {
            return Err(WimpError::invalid(
                "energy",
                format!("must be finite and non-negative, got {}", energy),
            ));
        }

        let log = IntegrationLog::new(energy / self.units.kev());
        let value = match &self.strategy {
            Strategy::Elastic => self.elastic(energy)?,
            Strategy::Migdal { shells, q_nr } => migdal::rate(self, shells, *q_nr, energy, &log)?,
            Strategy::Bremsstrahlung => bremsstrahlung::rate(self, energy, &log)?,
            Strategy::ElectronScattering {
                shell,
                binding,
                form_factor,
                q_max,
            } => electron::rate(self, *shell, *binding, *form_factor, *q_max, energy, &log)?,
        };
        let mut diagnostics = log.into_diagnostics();
        diagnostics.approximations = self.approximations.clone();

        if self.strict {
            if let Some(w) = diagnostics.warnings.first() {
                return Err(WimpError::IntegrationNotConverged {
                    context: w.context.to_string(),
                    energy: w.energy,
                    value: w.value,
                    error: w.error,
                });
            }
        }
        Ok(Evaluation {
            energy,
            value,
            diagnostics,
        })
    }

    /// 弹性核反冲
    fn elastic(&self, e_r: f64) -> Result<f64> {
        let eta = self.eta(self.model.v_min(e_r));
        if eta == 0.0 {
            return Ok(0.0);
        }
        Ok(self.prefactor() * self.model.sigma_v2(e_r)? * eta)
    }
}
