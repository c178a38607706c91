//! # WIMP-核散射截面
//!
//! 微分截面 dσ/dE_R 与速度无关的部分 dσ/dE_R · v²。
//!
//! ## 公式
//! - SI: σ_n (μ_A/μ_n)² A² |F_Helm|² · m_A/(2μ_A²)
//! - SD: σ_n (4π/3)(μ_A/μ_n)² S̃(E_R) · m_A/(2μ_A²)，S̃ = Σ 丰度·S(q)/(2J+1)
//! - 轻传播子：再乘 m_med⁴/(m_med² + q²/c²)²，q = √(2 m_A E_R)
//!
//! ## 依赖关系
//! - 被 `physics/rate.rs` 及各探测机制模块调用
//! - 使用 `physics/form_factors.rs`、`data::ResponseTables`

use crate::data::ResponseTables;
use crate::error::{ensure_positive, Result};
use crate::models::{Interaction, Target, Units};
use crate::physics::form_factors::HelmParameters;

use std::f64::consts::PI;

/// 截面模型（构造时完成全部参数校验）
#[derive(Debug, Clone, Copy)]
pub struct CrossSectionModel<'a> {
    units: Units,
    target: Target,
    responses: &'a dyn ResponseTables,
    helm: HelmParameters,
    wimp_mass: f64,
    sigma_nucleon: f64,
    interaction: Interaction,
    mediator_mass: Option<f64>,
}

/// 两体约化质量
pub fn reduced_mass(m1: f64, m2: f64) -> f64 {
    m1 * m2 / (m1 + m2)
}

impl<'a> CrossSectionModel<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        units: Units,
        target: Target,
        responses: &'a dyn ResponseTables,
        wimp_mass: f64,
        sigma_nucleon: f64,
        interaction: Interaction,
        mediator_mass: Option<f64>,
    ) -> Result<Self> {
        ensure_positive("wimp mass", wimp_mass)?;
        ensure_positive("cross section", sigma_nucleon)?;
        if let Some(m) = mediator_mass {
            ensure_positive("mediator mass", m)?;
        }
        if let Interaction::SpinDependent { coupling, band } = interaction {
            // 靶没有结构函数时立即失败
            responses.spin_structure(&target, 0.0, coupling, band)?;
        }
        Ok(Self {
            units,
            target,
            responses,
            helm: HelmParameters::lewin_smith(target.mass_number, &units)?,
            wimp_mass,
            sigma_nucleon,
            interaction,
            mediator_mass,
        })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn wimp_mass(&self) -> f64 {
        self.wimp_mass
    }

    pub fn cross_section(&self) -> f64 {
        self.sigma_nucleon
    }

    pub fn target_mass(&self) -> f64 {
        self.target.mass(&self.units)
    }

    /// WIMP-核约化质量 μ_A
    pub fn reduced_mass(&self) -> f64 {
        reduced_mass(self.wimp_mass, self.target_mass())
    }

    /// 产生反冲能 E_R 所需的最小速率 √(m_A E_R / 2μ_A²)
    pub fn v_min(&self, e_r: f64) -> f64 {
        let mu = self.reduced_mass();
        (self.target_mass() * e_r.max(0.0) / (2.0 * mu * mu)).sqrt()
    }

    /// 速率 v 下的最大反冲能 2μ_A² v² / m_A
    pub fn max_recoil(&self, v: f64) -> f64 {
        let mu = self.reduced_mass();
        2.0 * mu * mu * v * v / self.target_mass()
    }

    /// 动量转移 q = √(2 m_A E_R)
    pub fn momentum_transfer(&self, e_r: f64) -> f64 {
        (2.0 * self.target_mass() * e_r.max(0.0)).sqrt()
    }

    /// 传播子因子 m⁴/(m² + q²/c²)²；重传播子为 1
    pub fn mediator_factor(&self, e_r: f64) -> f64 {
        match self.mediator_mass {
            None => 1.0,
            Some(m) => {
                let q_over_c = self.momentum_transfer(e_r) / self.units.c0();
                let m2 = m * m;
                m2 * m2 / (m2 + q_over_c * q_over_c).powi(2)
            }
        }
    }

    /// dσ/dE_R · v²
    pub fn sigma_v2(&self, e_r: f64) -> Result<f64> {
        let m_a = self.target_mass();
        let mu_a = self.reduced_mass();
        let mu_n = reduced_mass(self.wimp_mass, self.units.amu());
        let kinematics = m_a / (2.0 * mu_a * mu_a);
        let enhancement = (mu_a / mu_n).powi(2);

        let coherent = match self.interaction {
            Interaction::SpinIndependent => {
                let wavenumber = self.momentum_transfer(e_r) / self.units.hbar();
                self.target.mass_number.powi(2) * self.helm.form_factor_squared(wavenumber)
            }
            Interaction::SpinDependent { coupling, band } => {
                4.0 * PI / 3.0 * self.responses.spin_structure(&self.target, e_r, coupling, band)?
            }
        };
        Ok(self.sigma_nucleon * enhancement * coherent * kinematics * self.mediator_factor(e_r))
    }

    /// 速率 v 下的 dσ/dE_R
    pub fn differential(&self, e_r: f64, v: f64) -> Result<f64> {
        if v <= 0.0 {
            return Ok(0.0);
        }
        Ok(self.sigma_v2(e_r)? / (v * v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BuiltinResponses;
    use crate::error::WimpError;
    use crate::models::{Nucleon, StructureBand};

    fn model(responses: &BuiltinResponses, units: Units, mediator: Option<f64>) -> CrossSectionModel<'_> {
        CrossSectionModel::new(
            units,
            Target::xenon(),
            responses,
            50.0 * units.gev_c2(),
            1e-45 * units.cm().powi(2),
            Interaction::SpinIndependent,
            mediator,
        )
        .unwrap()
    }

    #[test]
    fn test_kinematics() {
        let u = Units::si();
        let responses = BuiltinResponses::new(u);
        let m = model(&responses, u, None);
        let e_r = 10.0 * u.kev();
        let v = m.v_min(e_r);
        assert!((m.max_recoil(v) - e_r).abs() / e_r < 1e-12);
        // 50 GeV WIMP 在氙上：v_min(10 keV) ≈ 209 km/s
        let v_km = v / u.km();
        assert!((v_km - 209.0).abs() < 2.0, "v_min = {} km/s", v_km);
    }

    #[test]
    fn test_mediator_factor_limits() {
        let u = Units::si();
        let responses = BuiltinResponses::new(u);
        let heavy = model(&responses, u, Some(1e6 * u.gev_c2()));
        assert!((heavy.mediator_factor(10.0 * u.kev()) - 1.0).abs() < 1e-9);
        let light = model(&responses, u, Some(1e-3 * u.gev_c2()));
        assert!(light.mediator_factor(10.0 * u.kev()) < 1e-4);
        assert_eq!(model(&responses, u, None).mediator_factor(10.0 * u.kev()), 1.0);
    }

    #[test]
    fn test_cross_section_decreases_with_energy() {
        let u = Units::si();
        let responses = BuiltinResponses::new(u);
        let m = model(&responses, u, None);
        let low = m.sigma_v2(u.kev()).unwrap();
        let high = m.sigma_v2(30.0 * u.kev()).unwrap();
        assert!(low > high && high > 0.0);
        let v = 300.0 * u.km();
        assert!((m.differential(u.kev(), v).unwrap() * v * v - low).abs() / low < 1e-12);
    }

    #[test]
    fn test_invalid_inputs_fail_at_construction() {
        let u = Units::si();
        let responses = BuiltinResponses::approximate(u);
        let build = |mass: f64, sigma: f64, interaction, target, mediator| {
            CrossSectionModel::new(u, target, &responses, mass, sigma, interaction, mediator)
        };
        let sd = Interaction::SpinDependent {
            coupling: Nucleon::Neutron,
            band: StructureBand::Central,
        };
        let xe = Target::xenon();
        assert!(build(-1.0, 1e-49, Interaction::SpinIndependent, xe, None).is_err());
        assert!(build(1e-25, 0.0, Interaction::SpinIndependent, xe, None).is_err());
        assert!(build(1e-25, 1e-49, Interaction::SpinIndependent, xe, Some(-1.0)).is_err());
        assert!(matches!(
            build(1e-25, 1e-49, sd, Target::argon(), None),
            Err(WimpError::UnsupportedTarget { .. })
        ));
        assert!(build(1e-25, 1e-49, sd, xe, None).is_ok());

        // 没有结构函数表且未启用近似
        let bare = BuiltinResponses::new(u);
        assert!(matches!(
            CrossSectionModel::new(u, xe, &bare, 1e-25, 1e-49, sd, None),
            Err(WimpError::UnsupportedTarget { .. })
        ));
    }
}
