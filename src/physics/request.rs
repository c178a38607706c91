//! # 事例率请求
//!
//! 一次事例率计算的全部物理输入。按值构造，计算器只读。
//!
//! ## 依赖关系
//! - 被 `physics/rate.rs`、`physics/dispatch.rs`、`commands/` 使用
//! - 使用 `models/`、`physics/halo.rs`

use crate::error::{ensure_positive, Result};
use crate::models::{DetectionMechanism, Interaction, Target, Units};
use crate::physics::halo::HaloModel;

/// 事例率请求
#[derive(Debug, Clone, PartialEq)]
pub struct RateRequest {
    pub wimp_mass: f64,
    /// WIMP-核子截面（电子散射时为 WIMP-电子截面）
    pub cross_section: f64,
    pub interaction: Interaction,
    /// None 表示重传播子
    pub mediator_mass: Option<f64>,
    pub mechanism: DetectionMechanism,
    pub halo: HaloModel,
    /// J2000 日数；None 取年均
    pub time: Option<f64>,
    pub target: Target,
}

impl RateRequest {
    /// 标准晕、氙靶、SI 弹性散射
    pub fn new(units: &Units, wimp_mass: f64, cross_section: f64) -> Result<Self> {
        ensure_positive("wimp mass", wimp_mass)?;
        ensure_positive("cross section", cross_section)?;
        Ok(Self {
            wimp_mass,
            cross_section,
            interaction: Interaction::default(),
            mediator_mass: None,
            mechanism: DetectionMechanism::default(),
            halo: HaloModel::standard(units),
            time: None,
            target: Target::default(),
        })
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn with_mediator_mass(mut self, mediator_mass: f64) -> Result<Self> {
        self.mediator_mass = Some(ensure_positive("mediator mass", mediator_mass)?);
        Ok(self)
    }

    pub fn with_mechanism(mut self, mechanism: DetectionMechanism) -> Self {
        self.mechanism = mechanism;
        self
    }

    pub fn with_halo(mut self, halo: HaloModel) -> Self {
        self.halo = halo;
        self
    }

    /// 指定时间（J2000 日数）
    pub fn at_time(mut self, t: f64) -> Self {
        self.time = Some(t);
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let u = Units::si();
        let req = RateRequest::new(&u, 50.0 * u.gev_c2(), 1e-49).unwrap();
        assert_eq!(req.interaction, Interaction::SpinIndependent);
        assert_eq!(req.mechanism, DetectionMechanism::Elastic);
        assert_eq!(req.target.symbol, "Xe");
        assert_eq!(req.halo, HaloModel::standard(&u));
        assert!(req.time.is_none() && req.mediator_mass.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let u = Units::si();
        assert!(RateRequest::new(&u, -1.0, 1e-49).is_err());
        assert!(RateRequest::new(&u, 1.0, f64::NAN).is_err());
        let req = RateRequest::new(&u, 1.0, 1e-49).unwrap();
        assert!(req.clone().with_mediator_mass(0.0).is_err());
        assert_eq!(req.with_mediator_mass(2.0).unwrap().mediator_mass, Some(2.0));
    }
}
