//! # 单位制上下文
//!
//! 所有物理量都是同一单位制下的实数。`Units` 记录米、千克、秒三个基本单位
//! 在数值上的取值，其余单位与物理常数都由它们导出。
//!
//! ## 设计
//! - 不可变，按值传递（`Copy`）
//! - 每个物理构造函数都捕获一个 `Units`，计算过程中不缓存换算因子
//! - `Units::randomized(seed)` 把三个基本单位随机缩放，用于检验结果与单位约定无关
//!
//! ## 依赖关系
//! - 被 `physics/`、`data/`、`commands/` 使用
//! - 使用 `rand` 生成随机单位制

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 精细结构常数（无量纲）
pub const ALPHA: f64 = 7.297_352_569_3e-3;

// CODATA 2018 数值（SI）
const SPEED_OF_LIGHT: f64 = 299_792_458.0;
const ELECTRON_VOLT: f64 = 1.602_176_634e-19;
const ATOMIC_MASS_UNIT: f64 = 1.660_539_066_60e-27;
const ELECTRON_MASS: f64 = 9.109_383_701_5e-31;
const REDUCED_PLANCK: f64 = 1.054_571_817e-34;

/// 单位制
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Units {
    metre: f64,
    kilogram: f64,
    second: f64,
}

impl Default for Units {
    fn default() -> Self {
        Self::si()
    }
}

impl Units {
    /// 国际单位制
    pub fn si() -> Self {
        Self {
            metre: 1.0,
            kilogram: 1.0,
            second: 1.0,
        }
    }

    /// 随机缩放基本单位（每个因子在 10^-2 到 10^2 之间）
    pub fn randomized(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut scale = || 10f64.powf(rng.gen_range(-2.0..2.0));
        Self {
            metre: scale(),
            kilogram: scale(),
            second: scale(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // 长度
    // ─────────────────────────────────────────────────────────────

    pub fn metre(&self) -> f64 {
        self.metre
    }

    pub fn km(&self) -> f64 {
        1e3 * self.metre
    }

    pub fn cm(&self) -> f64 {
        1e-2 * self.metre
    }

    /// 飞米
    pub fn fm(&self) -> f64 {
        1e-15 * self.metre
    }

    // ─────────────────────────────────────────────────────────────
    // 质量与时间
    // ─────────────────────────────────────────────────────────────

    pub fn kg(&self) -> f64 {
        self.kilogram
    }

    pub fn tonne(&self) -> f64 {
        1e3 * self.kilogram
    }

    pub fn second(&self) -> f64 {
        self.second
    }

    pub fn day(&self) -> f64 {
        86_400.0 * self.second
    }

    /// 儒略年
    pub fn year(&self) -> f64 {
        365.25 * self.day()
    }

    // ─────────────────────────────────────────────────────────────
    // 能量与导出量
    // ─────────────────────────────────────────────────────────────

    pub fn joule(&self) -> f64 {
        self.kilogram * self.metre * self.metre / (self.second * self.second)
    }

    pub fn ev(&self) -> f64 {
        ELECTRON_VOLT * self.joule()
    }

    pub fn kev(&self) -> f64 {
        1e3 * self.ev()
    }

    pub fn gev(&self) -> f64 {
        1e9 * self.ev()
    }

    /// 光速
    pub fn c0(&self) -> f64 {
        SPEED_OF_LIGHT * self.metre / self.second
    }

    /// GeV/c² 质量单位
    pub fn gev_c2(&self) -> f64 {
        self.gev() / (self.c0() * self.c0())
    }

    /// 原子质量单位
    pub fn amu(&self) -> f64 {
        ATOMIC_MASS_UNIT * self.kilogram
    }

    /// 电子质量
    pub fn electron_mass(&self) -> f64 {
        ELECTRON_MASS * self.kilogram
    }

    /// 约化普朗克常数
    pub fn hbar(&self) -> f64 {
        REDUCED_PLANCK * self.joule() * self.second
    }

    /// 里德伯能量 α² m_e c² / 2
    pub fn rydberg(&self) -> f64 {
        0.5 * ALPHA * ALPHA * self.electron_mass() * self.c0() * self.c0()
    }

    /// 原子动量单位 α m_e c
    pub fn atomic_momentum(&self) -> f64 {
        ALPHA * self.electron_mass() * self.c0()
    }

    // ─────────────────────────────────────────────────────────────
    // 常用组合单位
    // ─────────────────────────────────────────────────────────────

    /// 核反冲事例率单位：每吨每年每 keV
    pub fn per_tonne_year_kev(&self) -> f64 {
        1.0 / (self.tonne() * self.year() * self.kev())
    }

    /// 电子散射事例率单位：每千克每天每 keV
    pub fn per_kg_day_kev(&self) -> f64 {
        1.0 / (self.kg() * self.day() * self.kev())
    }

    /// 暗物质局域密度单位 GeV/c²/cm³
    pub fn gev_c2_per_cm3(&self) -> f64 {
        self.gev_c2() / self.cm().powi(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_si_constants() {
        let u = Units::si();
        assert!((u.kev() - 1.602176634e-16).abs() < 1e-28);
        assert!((u.c0() - 299792458.0).abs() < 1e-6);
        // m_e c² ≈ 510998.95 eV
        let me_ev = u.electron_mass() * u.c0().powi(2) / u.ev();
        assert!((me_ev - 510_998.95).abs() < 0.01, "m_e c² = {}", me_ev);
    }

    #[test]
    fn test_rydberg() {
        let u = Units::si();
        let ry = u.rydberg() / u.ev();
        assert!((ry - 13.605693).abs() < 1e-5, "Ry = {} eV", ry);
    }

    #[test]
    fn test_randomized_units_are_reproducible() {
        let a = Units::randomized(123);
        let b = Units::randomized(123);
        let c = Units::randomized(7);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Units::si());
    }

    #[test]
    fn test_dimensionless_ratios_are_unit_independent() {
        for units in [Units::si(), Units::randomized(42)] {
            let ratio = units.gev_c2() / units.amu();
            assert!(
                (ratio - 1.073_544_1).abs() < 1e-6,
                "GeV/c² in amu = {}",
                ratio
            );
            let hbar_c = units.hbar() * units.c0() / (units.ev() * units.fm());
            assert!((hbar_c - 197_326_980.4).abs() < 1.0, "ħc = {}", hbar_c);
        }
    }
}
