//! # 暗物质-电子散射 (DME)
//!
//! Essig et al. (2012) 的电离事例率，对动量转移 q 做一维积分：
//!
//! dR/dE = ρ/(m_χ m_A) · σ_e/(8 μ_e²) · 1/E · ∫ q |f_ion(E, q)|² |F_DM(q)|² η(v_min) dq
//!
//! v_min = (E + E_b)/q + q/(2 m_χ)，积分上限取电离形状因子表的 q_max。
//!
//! ## 依赖关系
//! - 被 `physics/rate.rs` 调用
//! - 使用 `data::ResponseTables::ionization_form_factor`

use crate::error::{Result, WimpError};
use crate::models::{DmFormFactor, Shell};
use crate::physics::cross_section::reduced_mass;
use crate::physics::integrate::IntegrationLog;
use crate::physics::rate::PreparedRate;

/// v_min(q) ≤ v_max 的动量转移窗口
pub fn momentum_window(energy_transfer: f64, wimp_mass: f64, v_max: f64) -> Option<(f64, f64)> {
    let pv = wimp_mass * v_max;
    let disc = pv * pv - 2.0 * wimp_mass * energy_transfer;
    if energy_transfer <= 0.0 || disc < 0.0 {
        return None;
    }
    let upper = pv + disc.sqrt();
    Some((2.0 * wimp_mass * energy_transfer / upper, upper))
}

pub(crate) fn rate(
    prepared: &PreparedRate<'_>,
    shell: Shell,
    binding: f64,
    form_factor: DmFormFactor,
    q_max: f64,
    energy: f64,
    log: &IntegrationLog,
) -> Result<f64> {
    if energy <= 0.0 {
        return Err(WimpError::invalid(
            "energy",
            "electron recoil energy must be strictly positive",
        ));
    }
    let model = &prepared.model;
    let units = &prepared.units;
    let m_chi = model.wimp_mass();
    let transfer = energy + binding;

    let Some((lo, hi)) = momentum_window(transfer, m_chi, prepared.v_max()) else {
        return Ok(0.0);
    };
    let hi = hi.min(q_max);
    if hi <= lo {
        return Ok(0.0);
    }

    let q_ref = units.atomic_momentum();
    let power = form_factor.power();
    let integrand = |q: f64| -> Result<f64> {
        let eta = prepared.eta(transfer / q + q / (2.0 * m_chi));
        if eta == 0.0 {
            return Ok(0.0);
        }
        let ff = prepared
            .responses
            .ionization_form_factor(model.target(), shell, energy, q)?;
        let f_dm = (q_ref / q).powi(power);
        Ok(q * ff * f_dm * f_dm * eta)
    };
    let integral = log.check("dme", prepared.quadrature.integrate(integrand, lo, hi)?);

    let mu_e = reduced_mass(m_chi, units.electron_mass());
    Ok(prepared.prefactor() * model.cross_section() / (8.0 * mu_e * mu_e) / energy * integral)
}
