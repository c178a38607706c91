//! # 解析器模块
//!
//! 命令行输入的解析（能量网格、日期）与数据表格读取。
//!
//! ## 依赖关系
//! - 被 `commands/`、`data/tabulated.rs` 使用
//! - 使用 `physics/earth.rs` 把日期换算成 J2000 日数
//! - 子模块: tables

pub mod tables;

use crate::error::{Result, WimpError};
use crate::physics::earth;

use regex::Regex;
use std::sync::LazyLock;

const NUMBER: &str = r"\d*\.?\d+(?:[eE][-+]?\d+)?";

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^({n})-({n}):(\d+)(:log)?$", n = NUMBER)).unwrap()
});

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2}):(\d{2}))?$").unwrap());

/// 解析能量网格 (e.g., "1", "1,2,5", "0.1-40:100", "1e-3-10:50:log")
///
/// `a-b:n` 为含端点的 n 点线性网格，加 `:log` 为对数网格。结果保持输入顺序。
pub fn parse_energy_grid(expr: &str) -> Result<Vec<f64>> {
    let mut energies = Vec::new();

    for chunk in expr.split(',') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }

        if let Some(caps) = RANGE_RE.captures(chunk) {
            let a: f64 = caps[1]
                .parse()
                .map_err(|_| WimpError::InvalidRange(chunk.to_string()))?;
            let b: f64 = caps[2]
                .parse()
                .map_err(|_| WimpError::InvalidRange(chunk.to_string()))?;
            let n: usize = caps[3]
                .parse()
                .map_err(|_| WimpError::InvalidRange(chunk.to_string()))?;
            let logarithmic = caps.get(4).is_some();
            if n < 2 || b <= a || (logarithmic && a <= 0.0) {
                return Err(WimpError::InvalidRange(chunk.to_string()));
            }
            energies.extend((0..n).map(|i| {
                let f = i as f64 / (n - 1) as f64;
                if logarithmic {
                    a * (b / a).powf(f)
                } else {
                    a + (b - a) * f
                }
            }));
        } else {
            let v: f64 = chunk
                .parse()
                .map_err(|_| WimpError::InvalidRange(chunk.to_string()))?;
            if !(v >= 0.0) || !v.is_finite() {
                return Err(WimpError::InvalidRange(chunk.to_string()));
            }
            energies.push(v);
        }
    }

    if energies.is_empty() {
        return Err(WimpError::InvalidRange(expr.to_string()));
    }
    Ok(energies)
}

/// 解析日期 "YYYY-MM-DD" 或 "YYYY-MM-DD HH:MM"（UTC），返回 J2000 日数
pub fn parse_date(text: &str) -> Result<f64> {
    let caps = DATE_RE
        .captures(text.trim())
        .ok_or_else(|| WimpError::invalid("date", format!("'{}' is not YYYY-MM-DD", text)))?;
    let field = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    let year = field(1) as i32;
    let month = field(2) as u32;
    let day = field(3) + (field(4) + field(5) / 60.0) / 24.0;
    earth::j2000(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_and_list() {
        assert_eq!(parse_energy_grid("1").unwrap(), vec![1.0]);
        assert_eq!(parse_energy_grid("1, 2.5,10").unwrap(), vec![1.0, 2.5, 10.0]);
        assert_eq!(parse_energy_grid("5,1").unwrap(), vec![5.0, 1.0]);
    }

    #[test]
    fn test_linear_range() {
        let grid = parse_energy_grid("0-10:11").unwrap();
        assert_eq!(grid.len(), 11);
        assert!((grid[3] - 3.0).abs() < 1e-12);
        assert_eq!(grid[10], 10.0);
    }

    #[test]
    fn test_log_range_with_exponent() {
        let grid = parse_energy_grid("1e-3-10:5:log").unwrap();
        assert_eq!(grid.len(), 5);
        assert!((grid[0] - 1e-3).abs() < 1e-15);
        assert!((grid[2] - 0.1).abs() < 1e-12);
        assert!((grid[4] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_grids() {
        for expr in ["", "abc", "10-1:5", "1-10:1", "0-10:5:log", "-1", "1-2"] {
            assert!(
                matches!(parse_energy_grid(expr), Err(WimpError::InvalidRange(_))),
                "{} should be rejected",
                expr
            );
        }
    }

    #[test]
    fn test_parse_date() {
        assert!((parse_date("2000-03-21").unwrap() - 79.5).abs() < 1e-12);
        assert!((parse_date("2000-01-01 12:00").unwrap() - 0.0).abs() < 1e-12);
        assert!(parse_date("21/03/2000").is_err());
        assert!(parse_date("2000-13-01").is_err());
    }
}
