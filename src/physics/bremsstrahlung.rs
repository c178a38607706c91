//! # 原子轫致辐射
//!
//! Kouvaris & Pradler (2017)：核反冲时原子发出能量 ω 的光子。
//!
//! dσ/dω = ∫ 4α/(3πω) · E_R/(m_A c²) · |f(ω)|² · dσ/dE_R dE_R
//!
//! 对 E_R 和速率 v 做嵌套的二维自适应积分。光子需要 v ≥ √(2ω/μ)。
//!
//! ## 依赖关系
//! - 被 `physics/rate.rs` 调用
//! - 使用 `data::ResponseTables::photon_form_factor`

use crate::error::Result;
use crate::models::ALPHA;
use crate::physics::integrate::{Estimate, IntegrationLog};
use crate::physics::rate::PreparedRate;

use std::f64::consts::PI;

/// 发射能量 ω 的光子所需的最小速率 √(2ω/μ)
pub fn threshold_speed(omega: f64, reduced_mass: f64) -> f64 {
    (2.0 * omega / reduced_mass).sqrt()
}

/// 速率 v 下允许的反冲能范围
///
/// E_± = (μ² v²/m_A)(1 − r/2 ± √(1 − r))，r = v_th²/v²
pub fn recoil_bounds(reduced_mass: f64, target_mass: f64, v: f64, v_threshold: f64) -> (f64, f64) {
    let r = (v_threshold / v).powi(2).min(1.0);
    let scale = reduced_mass * reduced_mass * v * v / target_mass;
    let upper = 1.0 - 0.5 * r + (1.0 - r).sqrt();
    // (1 − r/2)² − (1 − r) = r²/4
    (scale * 0.25 * r * r / upper, scale * upper)
}

pub(crate) fn rate(prepared: &PreparedRate<'_>, omega: f64, log: &IntegrationLog) -> Result<f64> {
    if omega <= 0.0 {
        return Ok(0.0);
    }
    let model = &prepared.model;
    let mu = model.reduced_mass();
    let m_a = model.target_mass();
    let v_threshold = threshold_speed(omega, mu);
    let v_max = prepared.v_max();
    if v_threshold >= v_max {
        return Ok(0.0);
    }

    let (f1, f2) = prepared.responses.photon_form_factor(model.target(), omega)?;
    let c0 = prepared.units.c0();
    let coupling = 4.0 * ALPHA * (f1 * f1 + f2 * f2) / (3.0 * PI * omega * m_a * c0 * c0);

    // 内层积分中相对误差最大的未收敛结果
    let mut worst_inner: Option<Estimate> = None;
    let outer = prepared.quadrature.integrate(
        |v| {
            let (lo, hi) = recoil_bounds(mu, m_a, v, v_threshold);
            let inner = prepared
                .quadrature
                .integrate(|e_r| Ok(coupling * e_r * model.differential(e_r, v)?), lo, hi)?;
            if !inner.converged {
                let relative = |e: &Estimate| e.error / e.value.abs().max(f64::MIN_POSITIVE);
                if worst_inner.map_or(true, |w| relative(&inner) > relative(&w)) {
                    worst_inner = Some(inner);
                }
            }
            Ok(inner.value * v * prepared.halo.speed_distribution(v, prepared.time))
        },
        v_threshold,
        v_max,
    )?;

    if let Some(inner) = worst_inner {
        log.check("bremsstrahlung recoil integral", inner);
    }
    Ok(prepared.prefactor() * log.check("bremsstrahlung", outer))
}
