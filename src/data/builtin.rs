//! # 内置响应近似
//!
//! 没有表格时的响应数据。`BuiltinResponses::new` 对自旋相关、Migdal、轫致辐射
//! 直接返回 `UnsupportedTarget`，只有 `BuiltinResponses::approximate` 才启用
//! 下列解析近似（与参考表格相差百分之几到数倍，结果诊断中会列出）：
//! - 自旋相关：由自旋期望值得到 S(0)，谐振子长度 b 给出 e^{−u} 衰减，
//!   两体流修正 δ 给出 central/up/down 三条带
//! - Migdal：偶极求和规则给出总概率 N⟨r²⟩q_e²/3（Slater 屏蔽的类氢 ⟨r²⟩），
//!   能谱取 (1 + E/E_b)^{−(4.5+l)} 形状
//! - 轫致辐射：f₁(ω) 取束缚能低于 ω 的电子数，f₂ = 0
//! - 电子电离形状因子：无内置近似，需要加载表格
//!
//! ## 依赖关系
//! - 被 `data/tabulated.rs` 作为回退使用，`physics/rate.rs` 默认使用（不启用近似）
//! - 使用 `models/`

use crate::data::{Response, ResponseTables};
use crate::error::{Result, WimpError};
use crate::models::{Nucleon, Shell, SpinIsotope, StructureBand, Target, Units};

use std::f64::consts::PI;

/// 内置响应
#[derive(Debug, Clone, Copy)]
pub struct BuiltinResponses {
    units: Units,
    approximate: bool,
}

impl BuiltinResponses {
    /// 不提供任何响应表
    pub fn new(units: Units) -> Self {
        Self {
            units,
            approximate: false,
        }
    }

    /// 启用解析近似
    pub fn approximate(units: Units) -> Self {
        Self {
            units,
            approximate: true,
        }
    }

    pub fn approximates(&self) -> bool {
        self.approximate
    }

    /// 未启用近似时报告缺失的表格
    fn require_approximation(&self, target: &Target, response: Response) -> Result<()> {
        if self.approximate {
            return Ok(());
        }
        let file = match response {
            Response::SpinStructure { .. } => "sd",
            Response::Migdal(_) => "migdal",
            Response::Photon => "brems",
        };
        Err(WimpError::unsupported_target(
            target.symbol,
            format!(
                "no {} table; load {}_{}.csv with --tables or pass --approximate",
                response,
                file,
                target.symbol.to_lowercase()
            ),
        ))
    }

    /// 单个同位素的 S(q)
    fn isotope_structure(
        &self,
        isotope: &SpinIsotope,
        momentum: f64,
        coupling: Nucleon,
        band: StructureBand,
    ) -> f64 {
        let u = &self.units;
        let j = isotope.spin;
        let delta = two_body_delta(band);
        let a0 = 1.0;
        let a1 = match coupling {
            Nucleon::Neutron => -(1.0 + delta),
            Nucleon::Proton => 1.0 + delta,
        };
        let amplitude = (a0 + a1) * isotope.spin_proton + (a0 - a1) * isotope.spin_neutron;
        let s0 = (2.0 * j + 1.0) * (j + 1.0) / (4.0 * PI * j) * amplitude * amplitude;

        // 谐振子长度 b = ħ/√(m ħω)，ħω = 45 A^{-1/3} − 25 A^{-2/3} MeV
        let a = isotope.mass_number as f64;
        let hbar_omega = (45.0 * a.powf(-1.0 / 3.0) - 25.0 * a.powf(-2.0 / 3.0)) * 1e6 * u.ev();
        let b = u.hbar() / (a * u.amu() * hbar_omega).sqrt();
        let y = 0.5 * (momentum * b / u.hbar()).powi(2);
        s0 * (-y).exp()
    }
}

/// 两体流修正 δ
fn two_body_delta(band: StructureBand) -> f64 {
    match band {
        StructureBand::Central => -0.28,
        StructureBand::Up => -0.22,
        StructureBand::Down => -0.34,
    }
}

/// Slater 规则的有效核电荷
pub fn slater_effective_charge(target: &Target, shell: Shell) -> f64 {
    let same_group = |other: Shell| {
        if shell.l <= 1 {
            other.n == shell.n && other.l <= 1
        } else {
            other == shell
        }
    };
    // Slater 分组顺序: (1s)(2s2p)(3s3p)(3d)(4s4p)(4d)(4f)(5s5p)...
    let group_key = |s: Shell| (s.n, if s.l <= 1 { 0 } else { s.l - 1 });

    let mut screening = 0.0;
    for orbital in target.orbitals {
        let other = orbital.shell;
        let count = orbital.occupancy as f64;
        if same_group(other) {
            let per_electron = if shell.n == 1 { 0.30 } else { 0.35 };
            screening += per_electron * (count - if other == shell { 1.0 } else { 0.0 });
        } else if group_key(other) < group_key(shell) {
            screening += if shell.l >= 2 {
                count
            } else if other.n + 1 == shell.n {
                0.85 * count
            } else if other.n < shell.n {
                count
            } else {
                0.0
            };
        }
    }
    target.atomic_number as f64 - screening
}

/// Slater 有效主量子数
pub fn effective_principal_number(n: u8) -> f64 {
    match n {
        1 => 1.0,
        2 => 2.0,
        3 => 3.0,
        4 => 3.7,
        5 => 4.0,
        _ => 4.2,
    }
}

impl ResponseTables for BuiltinResponses {
    fn describe(&self) -> String {
        if self.approximate {
            "built-in approximations (reduced accuracy)".to_string()
        } else {
            "no response tables".to_string()
        }
    }

    fn is_approximate(&self, _target: &Target, _response: Response) -> bool {
        self.approximate
    }

    fn spin_structure(
        &self,
        target: &Target,
        e_r: f64,
        coupling: Nucleon,
        band: StructureBand,
    ) -> Result<f64> {
        if target.spin_isotopes.is_empty() {
            return Err(WimpError::unsupported_target(
                target.symbol,
                "no spin-carrying isotopes for spin-dependent scattering",
            ));
        }
        self.require_approximation(target, Response::SpinStructure { coupling, band })?;
        let momentum = (2.0 * target.mass(&self.units) * e_r.max(0.0)).sqrt();
        Ok(target
            .spin_isotopes
            .iter()
            .map(|iso| {
                iso.abundance * self.isotope_structure(iso, momentum, coupling, band)
                    / (2.0 * iso.spin + 1.0)
            })
            .sum())
    }

    fn migdal_probability(&self, target: &Target, shell: Shell, e_electron: f64) -> Result<f64> {
        let orbital = target.orbital(shell)?;
        self.require_approximation(target, Response::Migdal(shell))?;
        if e_electron < 0.0 {
            return Ok(0.0);
        }
        let u = &self.units;
        let z_eff = slater_effective_charge(target, shell);
        let n_star = effective_principal_number(shell.n);
        let l = shell.l as f64;

        // 类氢 ⟨r²⟩
        let bohr = u.hbar() / u.atomic_momentum();
        let r2 = bohr * bohr * n_star * n_star / (2.0 * z_eff * z_eff)
            * (5.0 * n_star * n_star + 1.0 - 3.0 * l * (l + 1.0));
        // q_e = 1 eV/c
        let k_e = u.ev() / (u.hbar() * u.c0());
        let total = orbital.occupancy as f64 * r2 * k_e * k_e / 3.0;

        let e_b = orbital.binding_ev * u.ev();
        let power = 4.5 + l;
        let density = total * (power - 1.0) / e_b * (1.0 + e_electron / e_b).powf(-power);
        Ok(2.0 * PI * density)
    }

    fn photon_form_factor(&self, target: &Target, omega: f64) -> Result<(f64, f64)> {
        self.require_approximation(target, Response::Photon)?;
        let ev = self.units.ev();
        let f1: u32 = target
            .orbitals
            .iter()
            .filter(|o| o.binding_ev * ev < omega)
            .map(|o| o.occupancy)
            .sum();
        Ok((f1 as f64, 0.0))
    }

    fn ionization_form_factor(
        &self,
        target: &Target,
        shell: Shell,
        _e_electron: f64,
        _q: f64,
    ) -> Result<f64> {
        Err(missing_ionization(target, shell))
    }

    fn ionization_q_max(&self, target: &Target, shell: Shell) -> Result<f64> {
        Err(missing_ionization(target, shell))
    }
}

pub(crate) fn missing_ionization(target: &Target, shell: Shell) -> WimpError {
    WimpError::unsupported_target(
        target.symbol,
        format!(
            "no ionization form factor for shell {}; load dme_{}_{}.csv with --tables",
            shell,
            target.symbol.to_lowercase(),
            shell
        ),
    )
}
