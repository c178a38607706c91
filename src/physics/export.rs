//! # 能谱导出
//!
//! 把 `Spectrum` 按显示单位导出为 CSV 或 XY 文本。
//!
//! ## 支持格式
//! - CSV: `E_keV,rate,warnings` 三列，带表头
//! - XY: `#` 注释头 + 两列制表符分隔
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `physics/rate.rs` 的 Spectrum
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{Result, WimpError};
use crate::models::Units;
use crate::physics::rate::Spectrum;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 显示单位
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub energy: f64,
    pub rate: f64,
    pub rate_label: &'static str,
}

impl Scale {
    /// 核反冲：keV 与 每吨·年·keV
    pub fn nuclear(units: &Units) -> Self {
        Self {
            energy: units.kev(),
            rate: units.per_tonne_year_kev(),
            rate_label: "events/(t yr keV)",
        }
    }

    /// 电子散射：keV 与 每千克·天·keV
    pub fn electron(units: &Units) -> Self {
        Self {
            energy: units.kev(),
            rate: units.per_kg_day_kev(),
            rate_label: "events/(kg day keV)",
        }
    }

    /// 换算后的 (E_keV, rate) 对
    pub fn apply(&self, spectrum: &Spectrum) -> Vec<(f64, f64)> {
        spectrum
            .points()
            .map(|(e, r)| (e / self.energy, r / self.rate))
            .collect()
    }
}

/// 导出为 CSV
pub fn to_csv(spectrum: &Spectrum, scale: &Scale, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    wtr.write_record(["E_keV", "rate", "warnings"])?;

    for (i, (energy, rate)) in scale.apply(spectrum).into_iter().enumerate() {
        let warnings = spectrum
            .diagnostics
            .warnings
            .iter()
            .filter(|w| w.energy.to_bits() == (spectrum.energies[i] / scale.energy).to_bits())
            .count();
        wtr.write_record(&[
            format!("{:.6e}", energy),
            format!("{:.6e}", rate),
            warnings.to_string(),
        ])?;
    }

    wtr.flush().map_err(|e| WimpError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

/// 导出为 XY
pub fn to_xy(spectrum: &Spectrum, scale: &Scale, title: &str, output_path: &Path) -> Result<()> {
    let write_error = |e| WimpError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };
    let file = File::create(output_path).map_err(write_error)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "# {}", title).map_err(write_error)?;
    writeln!(out, "# Columns: E (keV), rate ({})", scale.rate_label).map_err(write_error)?;
    writeln!(out, "#").map_err(write_error)?;
    for (energy, rate) in scale.apply(spectrum) {
        writeln!(out, "{:.6e}\t{:.6e}", energy, rate).map_err(write_error)?;
    }
    out.flush().map_err(write_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn spectrum(u: &Units) -> Spectrum {
        Spectrum {
            energies: vec![u.kev(), 2.0 * u.kev()],
            rates: vec![30.0 * u.per_tonne_year_kev(), 20.0 * u.per_tonne_year_kev()],
            diagnostics: Default::default(),
        }
    }

    #[test]
    fn test_csv_export() {
        let u = Units::randomized(3);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.csv");
        to_csv(&spectrum(&u), &Scale::nuclear(&u), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "E_keV,rate,warnings");
        assert_eq!(lines.len(), 3);
        let fields: Vec<f64> = lines[2]
            .split(',')
            .map(|f| f.parse().unwrap())
            .collect();
        assert!((fields[0] - 2.0).abs() < 1e-5);
        assert!((fields[1] - 20.0).abs() < 1e-4);
        assert_eq!(fields[2], 0.0);
    }

    #[test]
    fn test_xy_export() {
        let u = Units::si();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.xy");
        to_xy(&spectrum(&u), &Scale::nuclear(&u), "SI 50 GeV", &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# SI 50 GeV"));
        assert!(content.contains("events/(t yr keV)"));
        let data: Vec<&str> = content.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(data.len(), 2);
        assert!(data[0].contains('\t'));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let u = Units::si();
        let path = Path::new("/nonexistent/dir/rates.xy");
        assert!(matches!(
            to_xy(&spectrum(&u), &Scale::nuclear(&u), "x", path),
            Err(WimpError::FileWriteError { .. })
        ));
    }
}
