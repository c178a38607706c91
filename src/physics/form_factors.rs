//! # 核形状因子
//!
//! Helm 形状因子（Lewin & Smith 参数化）。
//!
//! ## 公式
//! F(q) = 3 j₁(q r_n)/(q r_n) · exp(−q² s²/2)
//! r_n² = c² + 7/3 π² a² − 5 s²,  c = 1.23 A^{1/3} − 0.60 fm, a = 0.52 fm, s = 0.9 fm
//!
//! ## 依赖关系
//! - 被 `physics/cross_section.rs` 调用
//! - 使用 `models/units.rs`

use crate::error::{ensure_positive, Result};
use crate::models::Units;

use std::f64::consts::PI;

/// Helm 参数（长度单位已换算到单位制）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelmParameters {
    pub c: f64,
    pub a: f64,
    pub s: f64,
}

impl HelmParameters {
    /// Lewin & Smith 推荐参数
    pub fn lewin_smith(mass_number: f64, units: &Units) -> Result<Self> {
        ensure_positive("mass number", mass_number)?;
        let fm = units.fm();
        Ok(Self {
            c: (1.23 * mass_number.cbrt() - 0.60) * fm,
            a: 0.52 * fm,
            s: 0.9 * fm,
        })
    }

    /// 有效核半径 r_n
    pub fn radius(&self) -> f64 {
        (self.c * self.c + 7.0 / 3.0 * PI * PI * self.a * self.a - 5.0 * self.s * self.s).sqrt()
    }

    /// |F|²，`wavenumber` 为 q/ħ
    pub fn form_factor_squared(&self, wavenumber: f64) -> f64 {
        let x = wavenumber * self.radius();
        // 3 j₁(x)/x 在 x → 0 处取级数
        let bessel = if x < 1e-4 {
            1.0 - x * x / 10.0
        } else {
            3.0 * (x.sin() / (x * x) - x.cos() / x) / x
        };
        bessel * bessel * (-(wavenumber * self.s).powi(2)).exp()
    }
}

/// 反冲能量 E_R 处的 Helm |F|²
pub fn helm_form_factor_squared(
    e_r: f64,
    mass_number: f64,
    units: &Units,
) -> Result<f64> {
    let params = HelmParameters::lewin_smith(mass_number, units)?;
    let q = (2.0 * mass_number * units.amu() * e_r.max(0.0)).sqrt();
    Ok(params.form_factor_squared(q / units.hbar()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helm_at_zero_momentum() {
        let u = Units::si();
        let f2 = helm_form_factor_squared(0.0, 131.293, &u).unwrap();
        assert!((f2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_helm_xenon_1kev() {
        let u = Units::si();
        let f2 = helm_form_factor_squared(u.kev(), 131.293, &u).unwrap();
        assert!((f2 - 0.953055).abs() < 1e-5, "F² = {}", f2);
    }

    #[test]
    fn test_helm_decreases_to_first_zero() {
        let u = Units::si();
        let mut previous = 1.0;
        for e in [1.0, 5.0, 10.0, 20.0, 40.0] {
            let f2 = helm_form_factor_squared(e * u.kev(), 131.293, &u).unwrap();
            assert!(f2 < previous, "F²({} keV) = {}", e, f2);
            previous = f2;
        }
    }

    #[test]
    fn test_invalid_mass_number() {
        let u = Units::si();
        assert!(helm_form_factor_squared(u.kev(), 0.0, &u).is_err());
    }

    #[test]
    fn test_unit_independence() {
        let si = Units::si();
        let scaled = Units::randomized(3);
        let a = helm_form_factor_squared(10.0 * si.kev(), 72.63, &si).unwrap();
        let b = helm_form_factor_squared(10.0 * scaled.kev(), 72.63, &scaled).unwrap();
        assert!(((a - b) / a).abs() < 1e-10);
    }
}
