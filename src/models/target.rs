//! # 靶物质数据模型
//!
//! 描述探测器靶核：质量数、原子序数、电子组态、Migdal 束缚能、
//! 带自旋的同位素，以及电子散射所用的壳层束缚能。
//!
//! ## 预设靶
//! - `Xe`（默认）、`Ar`、`Ge`
//!
//! ## 数据来源
//! - Migdal 束缚能：Ibe et al. (2018), JHEP 03 194
//! - 电子散射束缚能：Essig et al. (2017), PRD 96 043017
//! - 自旋期望值：Bednyakov & Šimkovic (2005)
//!
//! ## 依赖关系
//! - 被 `physics/`、`data/`、`commands/` 使用
//! - 使用 `regex` 解析壳层名

use crate::error::{Result, WimpError};
use crate::models::units::Units;

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static SHELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-7])([spdf])$").unwrap());

const ORBITAL_LETTERS: [char; 4] = ['s', 'p', 'd', 'f'];

/// 电子壳层 (n, l)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shell {
    pub n: u8,
    pub l: u8,
}

impl Shell {
    pub const fn new(n: u8, l: u8) -> Self {
        Self { n, l }
    }

    /// 最大占据数 2(2l+1)
    pub fn capacity(&self) -> u32 {
        2 * (2 * self.l as u32 + 1)
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.n, ORBITAL_LETTERS[self.l as usize])
    }
}

impl FromStr for Shell {
    type Err = WimpError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = SHELL_RE
            .captures(s.trim())
            .ok_or_else(|| WimpError::invalid("shell", format!("'{}' is not like '4d'", s)))?;
        let n: u8 = caps[1]
            .parse()
            .map_err(|_| WimpError::invalid("shell", format!("bad principal number in '{}'", s)))?;
        let letter = caps[2].chars().next().unwrap_or('s');
        let l = ORBITAL_LETTERS
            .iter()
            .position(|&c| c == letter)
            .unwrap_or(0) as u8;
        if l >= n {
            return Err(WimpError::invalid(
                "shell",
                format!("'{}' violates l < n", s),
            ));
        }
        Ok(Shell::new(n, l))
    }
}

/// 电子轨道：壳层、占据数、束缚能 (eV)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbital {
    pub shell: Shell,
    pub occupancy: u32,
    pub binding_ev: f64,
}

/// 带自旋的同位素
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinIsotope {
    pub mass_number: u32,
    /// 核自旋 J
    pub spin: f64,
    /// 天然丰度
    pub abundance: f64,
    /// 质子自旋期望值 <S_p>
    pub spin_proton: f64,
    /// 中子自旋期望值 <S_n>
    pub spin_neutron: f64,
}

/// 靶物质描述
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub symbol: &'static str,
    /// 同位素平均质量数
    pub mass_number: f64,
    pub atomic_number: u32,
    pub orbitals: &'static [Orbital],
    /// Migdal 默认考虑的壳层
    pub migdal_shells: &'static [Shell],
    pub spin_isotopes: &'static [SpinIsotope],
    /// 电子散射壳层束缚能 (eV)
    pub ionization_binding_ev: &'static [(Shell, f64)],
}

const fn orbital(n: u8, l: u8, occupancy: u32, binding_ev: f64) -> Orbital {
    Orbital {
        shell: Shell::new(n, l),
        occupancy,
        binding_ev,
    }
}

// ─────────────────────────────────────────────────────────────
// 预设靶
// ─────────────────────────────────────────────────────────────

static XENON: Target = Target {
    symbol: "Xe",
    mass_number: 131.293,
    atomic_number: 54,
    orbitals: &[
        orbital(1, 0, 2, 3.5e4),
        orbital(2, 0, 2, 5.4e3),
        orbital(2, 1, 6, 4.9e3),
        orbital(3, 0, 2, 1.1e3),
        orbital(3, 1, 6, 9.3e2),
        orbital(3, 2, 10, 6.6e2),
        orbital(4, 0, 2, 2.0e2),
        orbital(4, 1, 6, 1.4e2),
        orbital(4, 2, 10, 6.1e1),
        orbital(5, 0, 2, 2.1e1),
        orbital(5, 1, 6, 9.8),
    ],
    migdal_shells: &[
        Shell::new(3, 0),
        Shell::new(3, 1),
        Shell::new(3, 2),
        Shell::new(4, 0),
        Shell::new(4, 1),
        Shell::new(4, 2),
    ],
    spin_isotopes: &[
        SpinIsotope {
            mass_number: 129,
            spin: 0.5,
            abundance: 0.264,
            spin_proton: 0.010,
            spin_neutron: 0.329,
        },
        SpinIsotope {
            mass_number: 131,
            spin: 1.5,
            abundance: 0.212,
            spin_proton: -0.009,
            spin_neutron: -0.272,
        },
    ],
    ionization_binding_ev: &[
        (Shell::new(4, 0), 213.8),
        (Shell::new(4, 1), 163.5),
        (Shell::new(4, 2), 75.6),
        (Shell::new(5, 0), 25.7),
        (Shell::new(5, 1), 12.4),
    ],
};

static ARGON: Target = Target {
    symbol: "Ar",
    mass_number: 39.948,
    atomic_number: 18,
    orbitals: &[
        orbital(1, 0, 2, 3.2e3),
        orbital(2, 0, 2, 3.0e2),
        orbital(2, 1, 6, 2.4e2),
        orbital(3, 0, 2, 2.7e1),
        orbital(3, 1, 6, 1.3e1),
    ],
    migdal_shells: &[Shell::new(1, 0), Shell::new(2, 0), Shell::new(2, 1)],
    spin_isotopes: &[],
    ionization_binding_ev: &[],
};

static GERMANIUM: Target = Target {
    symbol: "Ge",
    mass_number: 72.630,
    atomic_number: 32,
    orbitals: &[
        orbital(1, 0, 2, 1.1e4),
        orbital(2, 0, 2, 1.4e3),
        orbital(2, 1, 6, 1.2e3),
        orbital(3, 0, 2, 1.7e2),
        orbital(3, 1, 6, 1.2e2),
        orbital(3, 2, 10, 3.5e1),
        orbital(4, 0, 2, 1.5e1),
        orbital(4, 1, 2, 6.5),
    ],
    migdal_shells: &[
        Shell::new(2, 0),
        Shell::new(2, 1),
        Shell::new(3, 0),
        Shell::new(3, 1),
        Shell::new(3, 2),
    ],
    spin_isotopes: &[SpinIsotope {
        mass_number: 73,
        spin: 4.5,
        abundance: 0.0776,
        spin_proton: 0.030,
        spin_neutron: 0.378,
    }],
    ionization_binding_ev: &[],
};

impl Target {
    pub fn xenon() -> Self {
        XENON
    }

    pub fn argon() -> Self {
        ARGON
    }

    pub fn germanium() -> Self {
        GERMANIUM
    }

    /// 核质量 A·u
    pub fn mass(&self, units: &Units) -> f64 {
        self.mass_number * units.amu()
    }

    /// 查找轨道
    pub fn orbital(&self, shell: Shell) -> Result<&'static Orbital> {
        self.orbitals
            .iter()
            .find(|o| o.shell == shell)
            .ok_or_else(|| {
                WimpError::unsupported_target(self.symbol, format!("no {} orbital", shell))
            })
    }

    /// 电子散射壳层束缚能 (eV)
    pub fn ionization_binding_ev(&self, shell: Shell) -> Result<f64> {
        self.ionization_binding_ev
            .iter()
            .find(|(s, _)| *s == shell)
            .map(|(_, e)| *e)
            .ok_or_else(|| {
                WimpError::unsupported_target(
                    self.symbol,
                    format!("no ionization data for shell {}", shell),
                )
            })
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::xenon()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl FromStr for Target {
    type Err = WimpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "xe" | "xenon" => Ok(Self::xenon()),
            "ar" | "argon" => Ok(Self::argon()),
            "ge" | "germanium" => Ok(Self::germanium()),
            other => Err(WimpError::unsupported_target(other, "unknown target species")),
        }
    }
}
