//! # 命令共享逻辑
//!
//! 把 CLI 单位的参数转换为物理对象，批量计算能谱并输出结果。
//!
//! ## 功能
//! - 晕模型、观测时间、积分设置的构造
//! - 响应数据表加载（`--tables` / `WIMPRATES_TABLES`）
//! - 能谱的终端表格、积分警告与文件导出
//!
//! ## 依赖关系
//! - 被 `commands/rate.rs`、`commands/dme.rs` 使用
//! - 使用 `batch/`、`data/`、`parsers/`、`physics/`
//! - 使用 `tabled` 打印结果表格

use crate::batch::BatchRunner;
use crate::cli::common::{HaloArgs, RunArgs, SpectrumFormat};
use crate::data::{BuiltinResponses, ResponseTables, TabulatedResponses};
use crate::error::{Result, WimpError};
use crate::models::Units;
use crate::parsers;
use crate::physics::export::{self, Scale};
use crate::physics::{plot, HaloModel, PreparedRate, Quadrature, Settings, Spectrum};
use crate::utils::{output, progress};

use std::path::Path;
use tabled::{Table, Tabled};

/// 终端结果行
#[derive(Debug, Clone, Tabled)]
struct SpectrumRow {
    #[tabled(rename = "E (keV)")]
    energy: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

/// 晕模型（CLI 单位）
pub fn halo_model(units: &Units, args: &HaloArgs) -> Result<HaloModel> {
    HaloModel::new(
        units,
        args.rho_dm * units.gev_c2_per_cm3(),
        args.v0 * units.km(),
        args.v_esc * units.km(),
    )
}

/// 观测时间（J2000 日数）；均未指定时为年均
pub fn observation_time(date: Option<&str>, t: Option<f64>) -> Result<Option<f64>> {
    match (date, t) {
        (Some(date), _) => parsers::parse_date(date).map(Some),
        (None, Some(t)) if !t.is_finite() => Err(WimpError::invalid("t", "must be finite")),
        (None, t) => Ok(t),
    }
}

/// 积分设置
pub fn settings(args: &RunArgs) -> Result<Settings> {
    if !(args.rel_tol > 0.0 && args.rel_tol < 1.0) {
        return Err(WimpError::invalid(
            "rel-tol",
            format!("must lie in (0, 1), got {}", args.rel_tol),
        ));
    }
    if args.max_intervals == 0 {
        return Err(WimpError::invalid("max-intervals", "must be at least 1"));
    }
    Ok(Settings {
        quadrature: Quadrature {
            rel_tol: args.rel_tol,
            max_intervals: args.max_intervals,
            ..Quadrature::default()
        },
        strict: args.strict,
    })
}

/// 加载响应数据；缺失的表只有在 `--approximate` 时才用内置近似
pub fn load_responses(units: Units, args: &RunArgs) -> Result<Box<dyn ResponseTables>> {
    let responses: Box<dyn ResponseTables> = match (args.tables.as_deref(), args.approximate) {
        (Some(dir), approximate) => {
            let spinner =
                progress::create_spinner(&format!("Loading tables from '{}'...", dir.display()));
            let loaded = TabulatedResponses::load(dir, units);
            spinner.finish_and_clear();
            let loaded = loaded?;
            if approximate {
                Box::new(loaded.with_approximations())
            } else {
                Box::new(loaded)
            }
        }
        (None, true) => Box::new(BuiltinResponses::approximate(units)),
        (None, false) => Box::new(BuiltinResponses::new(units)),
    };
    output::print_info(&format!("Response data: {}", responses.describe()));
    Ok(responses)
}

/// 解析 keV 能量表达式并换算为内部单位
pub fn energy_grid(units: &Units, expr: &str) -> Result<Vec<f64>> {
    Ok(parsers::parse_energy_grid(expr)?
        .into_iter()
        .map(|e| e * units.kev())
        .collect())
}

/// 并行计算整条能谱
pub fn evaluate_spectrum(prepared: &PreparedRate<'_>, energies: &[f64], jobs: usize) -> Result<Spectrum> {
    let mut runner = BatchRunner::new(jobs).labelled(prepared.strategy().name());
    if energies.len() < 2 {
        runner = runner.quiet();
    }
    let evaluations = runner.run(energies, |energy| prepared.evaluate(energy))?;
    Ok(Spectrum::from_evaluations(evaluations))
}

/// 打印能谱与警告，并按需写出文件
pub fn report(spectrum: &Spectrum, scale: &Scale, args: &RunArgs, default_title: &str) -> Result<()> {
    print_spectrum_table(spectrum, scale, args.show);

    for name in &spectrum.diagnostics.approximations {
        output::print_approximation(name);
    }
    for warning in &spectrum.diagnostics.warnings {
        output::print_integration_warning(warning);
    }

    if let Some(ref path) = args.output {
        let format = args
            .format
            .unwrap_or_else(|| guess_format_from_extension(path));
        let title = args.title.as_deref().unwrap_or(default_title);
        match format {
            SpectrumFormat::Csv => export::to_csv(spectrum, scale, path)?,
            SpectrumFormat::Xy => export::to_xy(spectrum, scale, title, path)?,
            SpectrumFormat::Png | SpectrumFormat::Svg => plot::generate_spectrum_plot(
                spectrum,
                scale,
                path,
                title,
                args.width,
                args.height,
                format == SpectrumFormat::Svg,
            )?,
        }
        output::print_success(&format!("Spectrum ({}) saved to '{}'", format, path.display()));
    }
    Ok(())
}

fn print_spectrum_table(spectrum: &Spectrum, scale: &Scale, show: usize) {
    let points = scale.apply(spectrum);
    let rows: Vec<SpectrumRow> = points
        .iter()
        .take(show)
        .map(|&(energy, rate)| SpectrumRow {
            energy: format!("{:.4e}", energy),
            rate: format!("{:.4e}", rate),
        })
        .collect();

    output::print_info(&format!("Differential rate in {}", scale.rate_label));
    println!("{}", Table::new(&rows));
    if points.len() > show {
        output::print_info(&format!("... {} more points not shown", points.len() - show));
    }
}

/// 从文件扩展名推断输出格式
fn guess_format_from_extension(path: &Path) -> SpectrumFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => SpectrumFormat::Svg,
        Some("csv") => SpectrumFormat::Csv,
        Some("xy") | Some("dat") | Some("txt") => SpectrumFormat::Xy,
        _ => SpectrumFormat::Png,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Response;
    use crate::models::Target;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        run: RunArgs,
    }

    fn run_args() -> RunArgs {
        let mut args = TestCli::parse_from(["wimprates"]).run;
        args.tables = None;
        args
    }

    #[test]
    fn test_guess_format() {
        assert_eq!(guess_format_from_extension(Path::new("a.CSV")), SpectrumFormat::Csv);
        assert_eq!(guess_format_from_extension(Path::new("a.dat")), SpectrumFormat::Xy);
        assert_eq!(guess_format_from_extension(Path::new("a.svg")), SpectrumFormat::Svg);
        assert_eq!(guess_format_from_extension(Path::new("a")), SpectrumFormat::Png);
    }

    #[test]
    fn test_observation_time() {
        assert_eq!(observation_time(None, None).unwrap(), None);
        assert_eq!(observation_time(None, Some(12.5)).unwrap(), Some(12.5));
        let t = observation_time(Some("2000-03-21"), None).unwrap().unwrap();
        assert!((t - 79.5).abs() < 1e-9);
        assert!(observation_time(Some("21/03/2000"), None).is_err());
        assert!(observation_time(None, Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_responses_follow_approximate_flag() {
        let u = Units::si();
        let mut args = run_args();
        let xe = Target::xenon();
        let bare = load_responses(u, &args).unwrap();
        assert!(!bare.is_approximate(&xe, Response::Photon));
        assert!(bare.photon_form_factor(&xe, u.kev()).is_err());

        args.approximate = true;
        let approximate = load_responses(u, &args).unwrap();
        assert!(approximate.is_approximate(&xe, Response::Photon));

        let dir = tempfile::tempdir().unwrap();
        args.tables = Some(dir.path().to_path_buf());
        let tabulated = load_responses(u, &args).unwrap();
        assert!(tabulated.is_approximate(&xe, Response::Photon));
        assert!(tabulated.describe().contains("0 tables"));
    }

    #[test]
    fn test_energy_grid_in_internal_units() {
        let u = Units::randomized(11);
        let grid = energy_grid(&u, "1,2").unwrap();
        assert!(((grid[1] / u.kev()) - 2.0).abs() < 1e-12);
    }
}
