//! # earth 子命令实现
//!
//! 打印地球在银河系静止系中的速率、年均值与逐月变化。
//!
//! ## 依赖关系
//! - 使用 `cli/earth.rs` 定义的参数
//! - 使用 `physics/earth.rs`

use crate::cli::earth::EarthArgs;
use crate::commands::common;
use crate::error::{ensure_positive, Result, WimpError};
use crate::models::Units;
use crate::physics::earth::{self, DAYS_PER_YEAR};
use crate::utils::output;

use tabled::{Table, Tabled};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 逐月速率行
#[derive(Debug, Clone, Tabled)]
struct MonthRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "t (days)")]
    t: String,
    #[tabled(rename = "v_E (km/s)")]
    speed: String,
}

/// 执行 earth 计算
pub fn execute(args: EarthArgs) -> Result<()> {
    output::print_header("Earth Velocity");

    let units = Units::si();
    let v_0 = ensure_positive("v0", args.v0)? * units.km();
    let t = common::observation_time(args.date.as_deref(), args.t)?;

    let speed = earth::v_earth(t, v_0, &units) / units.km();
    let when = match t {
        Some(t) => format!("t = {:.3} d after J2000", t),
        None => "annual average epoch".to_string(),
    };
    output::print_info(&format!("v_0 = {} km/s, {}", args.v0, when));
    output::print_success(&format!("v_earth = {:.3} km/s", speed));

    if args.average {
        if args.samples == 0 {
            return Err(WimpError::invalid("samples", "must be at least 1"));
        }
        let mean = annual_mean(v_0, args.samples, &units) / units.km();
        output::print_info(&format!(
            "Mean over one year ({} samples) = {:.3} km/s",
            args.samples, mean
        ));
    }

    if let Some(year) = args.monthly {
        let rows = (1..=12u32)
            .map(|month| {
                let t = earth::j2000(year, month, 1.0)?;
                Ok(MonthRow {
                    date: format!("{} {}", MONTHS[month as usize - 1], year),
                    t: format!("{:.1}", t),
                    speed: format!("{:.3}", earth::v_earth(Some(t), v_0, &units) / units.km()),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        output::print_separator();
        println!("{}", Table::new(&rows));
    }
    Ok(())
}

/// 一年内均匀采样时刻的平均速率
fn annual_mean(v_0: f64, samples: usize, units: &Units) -> f64 {
    (0..samples)
        .map(|i| earth::v_earth(Some(DAYS_PER_YEAR * i as f64 / samples as f64), v_0, units))
        .sum::<f64>()
        / samples as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annual_mean_close_to_average_epoch() {
        let u = Units::si();
        let v_0 = 238.0 * u.km();
        let mean = annual_mean(v_0, 2000, &u);
        let reference = earth::v_earth(None, v_0, &u);
        assert!(((mean - reference) / u.km()).abs() < 0.05);
    }
}
