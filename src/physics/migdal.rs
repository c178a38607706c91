//! # Migdal 效应
//!
//! 核反冲伴随的原子电离。对每个壳层，在中间核反冲能 E_R 上做一维自适应积分，
//! 速度积分化为 η：
//!
//! v_min = √(m_A E_R / 2μ²) + (ω − q_nr E_R)/√(2 m_A E_R)
//!
//! 被积函数 = dσ/dE_R·v² · η(v_min) · (m_e √(2E_R/m_A) / (eV/c))² /(2π) · 2π dP/dE_e，
//! E_e = ω − E_b − q_nr E_R。
//!
//! ## 依赖关系
//! - 被 `physics/rate.rs` 调用
//! - 使用 `data::ResponseTables::migdal_probability`

use crate::error::Result;
use crate::physics::cross_section::CrossSectionModel;
use crate::physics::dispatch::MigdalShell;
use crate::physics::integrate::IntegrationLog;
use crate::physics::rate::PreparedRate;

use std::f64::consts::PI;

/// 允许的核反冲能窗口 [E_lo, E_hi]
///
/// v_min(x) = A x + B/x，x = √E_R，条件 v_min ≤ v_max 是 x 的二次不等式。
pub fn recoil_window(
    model: &CrossSectionModel<'_>,
    omega: f64,
    q_nr: f64,
    v_max: f64,
) -> Option<(f64, f64)> {
    if omega <= 0.0 {
        return None;
    }
    let m_a = model.target_mass();
    let root_2m = (2.0 * m_a).sqrt();
    let a = (0.5 * m_a).sqrt() / model.reduced_mass() - q_nr / root_2m;
    let b = omega / root_2m;
    if a <= 0.0 {
        return None;
    }
    let disc = v_max * v_max - 4.0 * a * b;
    if disc < 0.0 {
        return None;
    }
    let upper = v_max + disc.sqrt();
    let x_lo = 2.0 * b / upper;
    let x_hi = upper / (2.0 * a);
    Some((x_lo * x_lo, x_hi * x_hi))
}

/// 所有壳层 Migdal 事例率之和
pub(crate) fn rate(
    prepared: &PreparedRate<'_>,
    shells: &[MigdalShell],
    q_nr: f64,
    omega: f64,
    log: &IntegrationLog,
) -> Result<f64> {
    let model = &prepared.model;
    let units = &prepared.units;
    let m_a = model.target_mass();
    // 电子动量以 eV/c 为单位
    let electron_momentum_unit = units.ev() / units.c0();

    let mut total = 0.0;
    for shell in shells {
        if omega <= shell.binding {
            continue;
        }
        let Some((lo, mut hi)) = recoil_window(model, omega, q_nr, prepared.v_max()) else {
            continue;
        };
        if q_nr > 0.0 {
            hi = hi.min((omega - shell.binding) / q_nr);
        }
        if hi <= lo {
            continue;
        }

        let integrand = |e_r: f64| -> Result<f64> {
            let e_electron = omega - shell.binding - q_nr * e_r;
            if e_electron < 0.0 || e_r <= 0.0 {
                return Ok(0.0);
            }
            let v_min = model.v_min(e_r) + (omega - q_nr * e_r) / (2.0 * m_a * e_r).sqrt();
            let eta = prepared.eta(v_min);
            if eta == 0.0 {
                return Ok(0.0);
            }
            let q_e = units.electron_mass() * (2.0 * e_r / m_a).sqrt() / electron_momentum_unit;
            let probability = prepared
                .responses
                .migdal_probability(model.target(), shell.shell, e_electron)?;
            Ok(model.sigma_v2(e_r)? * eta * q_e * q_e / (2.0 * PI) * probability)
        };
        let estimate = prepared.quadrature.integrate(integrand, lo, hi)?;
        total += log.check("migdal", estimate);
    }
    Ok(prepared.prefactor() * total)
}
