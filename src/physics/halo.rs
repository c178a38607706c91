//! # 暗物质晕模型
//!
//! 截断、平移的 Maxwell 速度分布（标准晕模型）。
//!
//! ## 归一化
//! 速度分布乘以 Lewin–Smith 截断常数
//! k = erf(z) − 2z e^{−z²}/√π，z = v_esc / v_0，
//! 与历史上发表的基准事例率保持一致。
//!
//! ## 提供
//! - `eta(v_min, t)`: 平均倒速度 ∫_{v_min} f(v)/v dv，分段误差函数闭式
//! - `speed_distribution(v, t)`: 地球系速率分布，用于多维积分
//!
//! ## 依赖关系
//! - 被 `physics/rate.rs` 及各探测机制模块调用
//! - 使用 `physics/earth.rs` 计算地球速度
//! - 使用 `libm::erf`

use crate::error::{ensure_positive, Result, WimpError};
use crate::models::Units;
use crate::physics::earth;

use libm::erf;
use std::f64::consts::PI;

/// 标准晕模型参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaloModel {
    /// 局域暗物质密度（质量/体积）
    pub rho_dm: f64,
    /// 速度弥散 v_0
    pub v_0: f64,
    /// 逃逸速度
    pub v_esc: f64,
    /// 太阳本动速度
    pub v_pec: [f64; 3],
    /// 地球公转速度
    pub v_orbit: f64,
}

impl HaloModel {
    /// 标准晕：ρ = 0.3 GeV/c²/cm³, v_0 = 238 km/s, v_esc = 544 km/s
    pub fn standard(units: &Units) -> Self {
        Self {
            rho_dm: 0.3 * units.gev_c2_per_cm3(),
            v_0: 238.0 * units.km(),
            v_esc: 544.0 * units.km(),
            v_pec: earth::solar_peculiar_velocity(units),
            v_orbit: earth::earth_orbital_speed(units),
        }
    }

    /// 自定义密度与速度参数，其余取标准值
    pub fn new(units: &Units, rho_dm: f64, v_0: f64, v_esc: f64) -> Result<Self> {
        let halo = Self {
            rho_dm,
            v_0,
            v_esc,
            ..Self::standard(units)
        };
        halo.validate()?;
        Ok(halo)
    }

    /// 替换局域密度
    pub fn with_rho_dm(self, rho_dm: f64) -> Result<Self> {
        let halo = Self { rho_dm, ..self };
        halo.validate()?;
        Ok(halo)
    }

    fn validate(&self) -> Result<()> {
        ensure_positive("rho_dm", self.rho_dm)?;
        ensure_positive("v_0", self.v_0)?;
        ensure_positive("v_esc", self.v_esc)?;
        if self.v_esc <= self.v_0 {
            return Err(WimpError::invalid(
                "v_esc",
                format!("must exceed v_0 ({} <= {})", self.v_esc, self.v_0),
            ));
        }
        Ok(())
    }

    /// 地球速率
    pub fn v_earth(&self, t: Option<f64>) -> f64 {
        earth::norm(earth::earth_velocity(t, self.v_0, self.v_pec, self.v_orbit))
    }

    /// 地球系中 WIMP 的最大速率 v_esc + v_E
    pub fn v_max(&self, t: Option<f64>) -> f64 {
        self.v_esc + self.v_earth(t)
    }

    /// 截断常数 k
    pub fn truncation_constant(&self) -> f64 {
        let z = self.v_esc / self.v_0;
        erf(z) - 2.0 * z * (-z * z).exp() / PI.sqrt()
    }

    /// 地球系速率分布 f(v)
    pub fn speed_distribution(&self, v: f64, t: Option<f64>) -> f64 {
        let v_e = self.v_earth(t);
        if v <= 0.0 || v > self.v_esc + v_e {
            return 0.0;
        }
        let v0 = self.v_0;
        let x_max = ((self.v_esc.powi(2) - v_e * v_e - v * v) / (2.0 * v_e * v)).min(1.0);
        let norm = self.truncation_constant() * v / (PI.sqrt() * v0 * v_e);
        norm * ((-((v - v_e) / v0).powi(2)).exp()
            - (-(v * v + v_e * v_e + 2.0 * v * v_e * x_max) / (v0 * v0)).exp())
    }

    /// 平均倒速度 η(v_min) = ∫_{v_min}^{v_max} f(v)/v dv
    pub fn eta(&self, v_min: f64, t: Option<f64>) -> f64 {
        let v_e = self.v_earth(t);
        let v_max = self.v_esc + v_e;
        if v_min >= v_max {
            return 0.0;
        }
        let v_min = v_min.max(0.0);
        let v0 = self.v_0;
        let z = self.v_esc / v0;
        let norm = self.truncation_constant() / (PI.sqrt() * v0 * v_e);
        let half = 0.5 * PI.sqrt() * v0;
        let g = |u: f64| erf(u / v0);

        // v < v_esc − v_E 时整个球壳都在逃逸速度以内
        let inner = (self.v_esc - v_e).max(0.0);
        let mut total = 0.0;
        let mut lower = v_min;
        if v_min < inner {
            total += half
                * (g(inner - v_e) - g(v_min - v_e) - g(inner + v_e) + g(v_min + v_e));
            lower = inner;
        }
        total += half * (g(v_max - v_e) - g(lower - v_e)) - (-z * z).exp() * (v_max - lower);
        (norm * total).max(0.0)
    }
}
