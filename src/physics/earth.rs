//! # 地球速度
//!
//! 探测器在银河系静止系中的速度：本地静止标准 + 太阳本动 + 地球公转。
//!
//! ## 公式
//! v_E(t) = v_LSR + v_pec + v_orbit (e₁ cos φ + e₂ sin φ),  φ = 2π (t − t₁) / 365.25
//!
//! t 为 J2000 日数，t₁ 为 2000 年春分。`t = None` 取 t = 59.37
//! （Lewin & Smith 的年均近似，2000 年 2 月 29 日）。这一约定与老文献
//! 232 km/s 的取值相差约 2.4 km/s，保留不改。
//!
//! ## 依赖关系
//! - 被 `physics/halo.rs`、`commands/earth.rs` 调用
//! - 使用 `models/units.rs`

use crate::error::{Result, WimpError};
use crate::models::Units;

use std::f64::consts::PI;

/// 年均近似对应的 J2000 日数
pub const ANNUAL_AVERAGE_EPOCH: f64 = 59.37;

/// 回归年（天）
pub const DAYS_PER_YEAR: f64 = 365.25;

// 黄道面内的公转基矢（银道坐标）
const E1: [f64; 3] = [0.9931, 0.1170, -0.01032];
const E2: [f64; 3] = [-0.0670, 0.4927, -0.8676];

/// 2000 年春分的 J2000 日数
const VERNAL_EQUINOX: f64 = 79.5;

/// J2000 日数（Lewin & Smith 附录 B）
pub fn j2000(year: i32, month: u32, day: f64) -> Result<f64> {
    if !(1..=12).contains(&month) {
        return Err(WimpError::invalid("month", format!("{} is not in 1-12", month)));
    }
    if !(day >= 1.0 && day < 32.0) {
        return Err(WimpError::invalid("day", format!("{} is out of range", day)));
    }
    let (y, m) = if month <= 2 {
        (year as f64 - 1.0, month as f64 + 12.0)
    } else {
        (year as f64, month as f64)
    };
    Ok((365.25 * y).floor() + (30.61 * (m + 1.0)).floor() + day - 730_563.5)
}

/// 太阳本动速度 (11.1, 12.2, 7.3) km/s
pub fn solar_peculiar_velocity(units: &Units) -> [f64; 3] {
    [11.1 * units.km(), 12.2 * units.km(), 7.3 * units.km()]
}

/// 地球公转速度 29.79 km/s
pub fn earth_orbital_speed(units: &Units) -> f64 {
    29.79 * units.km()
}

/// 地球速度矢量
pub fn earth_velocity(t: Option<f64>, v_0: f64, v_pec: [f64; 3], v_orbit: f64) -> [f64; 3] {
    let t = t.unwrap_or(ANNUAL_AVERAGE_EPOCH);
    let phase = 2.0 * PI * (t - VERNAL_EQUINOX) / DAYS_PER_YEAR;
    let (sin, cos) = phase.sin_cos();
    let v_lsr = [0.0, v_0, 0.0];

    let mut v = [0.0; 3];
    for i in 0..3 {
        v[i] = v_lsr[i] + v_pec[i] + v_orbit * (E1[i] * cos + E2[i] * sin);
    }
    v
}

/// 地球速率 |v_E(t)|
pub fn v_earth(t: Option<f64>, v_0: f64, units: &Units) -> f64 {
    norm(earth_velocity(
        t,
        v_0,
        solar_peculiar_velocity(units),
        earth_orbital_speed(units),
    ))
}

pub(crate) fn norm(v: [f64; 3]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_j2000_epochs() {
        assert!((j2000(2000, 1, 1.5).unwrap() - 0.0).abs() < 1e-12);
        assert!((j2000(2000, 3, 21.0).unwrap() - VERNAL_EQUINOX).abs() < 1e-12);
        assert!((j2000(2000, 2, 29.87).unwrap() - ANNUAL_AVERAGE_EPOCH).abs() < 1e-9);
        assert!(j2000(2000, 13, 1.0).is_err());
    }

    #[test]
    fn test_old_convention_offset() {
        let u = Units::si();
        let v = v_earth(None, 220.0 * u.km(), &u) / u.km();
        assert!(
            ((v - 234.408) / 234.408).abs() < 1e-3,
            "v_earth(None, 220 km/s) = {}",
            v
        );
        // 与老文献 232 km/s 的偏差约 2.4 km/s
        assert!((v - 232.0 - 2.4).abs() < 0.1, "offset = {}", v - 232.0);
    }

    #[test]
    fn test_annual_average_matches_none() {
        let u = Units::si();
        let v_0 = 238.0 * u.km();
        let samples = 10_000;
        let mean: f64 = (0..samples)
            .map(|i| v_earth(Some(DAYS_PER_YEAR * i as f64 / samples as f64), v_0, &u))
            .sum::<f64>()
            / samples as f64;
        let reference = v_earth(None, v_0, &u);
        assert!(
            ((mean - reference) / u.km()).abs() < 0.05,
            "average {} vs {}",
            mean / u.km(),
            reference / u.km()
        );
    }

    #[test]
    fn test_annual_modulation_peaks_in_june() {
        let u = Units::si();
        let v_0 = 238.0 * u.km();
        let june = v_earth(Some(j2000(2000, 6, 2.0).unwrap()), v_0, &u);
        let december = v_earth(Some(j2000(2000, 12, 2.0).unwrap()), v_0, &u);
        assert!(june > december);
        assert!((june - december) / u.km() > 25.0);
    }

    #[test]
    fn test_unit_independence() {
        let si = Units::si();
        let scaled = Units::randomized(5);
        let a = v_earth(Some(100.0), 238.0 * si.km(), &si) / si.km();
        let b = v_earth(Some(100.0), 238.0 * scaled.km(), &scaled) / scaled.km();
        assert!(((a - b) / a).abs() < 1e-12);
    }
}
