//! # 响应数据表解析器
//!
//! 读取 `TabulatedResponses` 使用的 CSV 表格。
//!
//! ## 格式说明
//! ```text
//! migdal_xe.csv   E_eV,3s,3p,3d,4s,4p,4d        (2π·dP/dE，单位 1/eV)
//! sd_xe.csv       E_keV,SD_n_central,SD_p_up,...
//! brems_xe.csv    E_keV,f1,f2
//! dme_xe_4d.csv   ln_k,ln_q,log10_ff2
//! ```
//!
//! ## 依赖关系
//! - 被 `data/tabulated.rs` 使用
//! - 使用 `csv` + `serde` 读取，`data/tables.rs` 存储

use crate::data::tables::{LinearTable, LogGridTable, OutOfRange};
use crate::error::{Result, WimpError};
use crate::models::{Interaction, Shell, Units};

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 电离形状因子表的一行
#[derive(Debug, Deserialize)]
struct IonizationRow {
    ln_k: f64,
    ln_q: f64,
    log10_ff2: f64,
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| WimpError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 表头 + 数值列
struct Columns {
    headers: Vec<String>,
    /// columns[i] 对应 headers[i]
    columns: Vec<Vec<f64>>,
}

/// 解析"首列为能量、其余为数值列"的 CSV
fn parse_columns(content: &str, format: &str, label: &str, first: &str) -> Result<Columns> {
    let parse_error = |reason: String| WimpError::ParseError {
        format: format.to_string(),
        path: label.to_string(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.first().map(String::as_str) != Some(first) {
        return Err(parse_error(format!("first column must be '{}'", first)));
    }
    if headers.len() < 2 {
        return Err(parse_error("no value columns".to_string()));
    }

    let mut columns = vec![Vec::new(); headers.len()];
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != headers.len() {
            return Err(parse_error(format!(
                "row {} has {} fields, expected {}",
                row + 1,
                record.len(),
                headers.len()
            )));
        }
        for (i, field) in record.iter().enumerate() {
            let v: f64 = field
                .parse()
                .map_err(|_| parse_error(format!("row {}: '{}' is not a number", row + 1, field)))?;
            columns[i].push(v);
        }
    }
    Ok(Columns { headers, columns })
}

// ─────────────────────────────────────────────────────────────
// Migdal
// ─────────────────────────────────────────────────────────────

/// 读取 Migdal 概率表
pub fn load_migdal(path: &Path, units: &Units) -> Result<Vec<(Shell, LinearTable)>> {
    let content = read_file(path)?;
    parse_migdal_content(&content, &path.display().to_string(), units)
}

/// 从字符串解析 Migdal 概率表（能量 eV，概率 1/eV）
pub fn parse_migdal_content(
    content: &str,
    label: &str,
    units: &Units,
) -> Result<Vec<(Shell, LinearTable)>> {
    let Columns { headers, columns } = parse_columns(content, "migdal", label, "E_eV")?;
    let ev = units.ev();
    let energies: Vec<f64> = columns[0].iter().map(|e| e * ev).collect();

    let mut tables = Vec::new();
    for (header, values) in headers.iter().zip(&columns).skip(1) {
        let shell: Shell = header.parse()?;
        let values = values.iter().map(|p| p / ev).collect();
        tables.push((shell, LinearTable::new(energies.clone(), values, OutOfRange::Zero)?));
    }
    Ok(tables)
}

// ─────────────────────────────────────────────────────────────
// 自旋相关结构函数
// ─────────────────────────────────────────────────────────────

/// 读取自旋相关结构函数表
pub fn load_spin_structure(path: &Path, units: &Units) -> Result<Vec<(Interaction, LinearTable)>> {
    let content = read_file(path)?;
    parse_spin_structure_content(&content, &path.display().to_string(), units)
}

/// 从字符串解析结构函数表，列名为相互作用标签
pub fn parse_spin_structure_content(
    content: &str,
    label: &str,
    units: &Units,
) -> Result<Vec<(Interaction, LinearTable)>> {
    let Columns { headers, columns } = parse_columns(content, "structure function", label, "E_keV")?;
    let energies: Vec<f64> = columns[0].iter().map(|e| e * units.kev()).collect();

    let mut tables = Vec::new();
    for (header, values) in headers.iter().zip(&columns).skip(1) {
        let interaction: Interaction = header.parse()?;
        if interaction == Interaction::SpinIndependent {
            return Err(WimpError::ParseError {
                format: "structure function".to_string(),
                path: label.to_string(),
                reason: "column 'SI' has no structure function".to_string(),
            });
        }
        tables.push((
            interaction,
            LinearTable::new(energies.clone(), values.clone(), OutOfRange::Zero)?,
        ));
    }
    Ok(tables)
}

// ─────────────────────────────────────────────────────────────
// 光子形状因子
// ─────────────────────────────────────────────────────────────

/// 读取光子形状因子表，返回 (f₁, f₂)
pub fn load_photon_form_factor(path: &Path, units: &Units) -> Result<(LinearTable, LinearTable)> {
    let content = read_file(path)?;
    parse_photon_form_factor_content(&content, &path.display().to_string(), units)
}

pub fn parse_photon_form_factor_content(
    content: &str,
    label: &str,
    units: &Units,
) -> Result<(LinearTable, LinearTable)> {
    let Columns { headers, mut columns } = parse_columns(content, "photon form factor", label, "E_keV")?;
    if headers != ["E_keV", "f1", "f2"] {
        return Err(WimpError::ParseError {
            format: "photon form factor".to_string(),
            path: label.to_string(),
            reason: format!("expected columns E_keV,f1,f2, got {}", headers.join(",")),
        });
    }
    let f2 = columns.pop().unwrap_or_default();
    let f1 = columns.pop().unwrap_or_default();
    let energies: Vec<f64> = columns[0].iter().map(|e| e * units.kev()).collect();
    Ok((
        LinearTable::new(energies.clone(), f1, OutOfRange::Extrapolate)?,
        LinearTable::new(energies, f2, OutOfRange::Extrapolate)?,
    ))
}

// ─────────────────────────────────────────────────────────────
// 电离形状因子
// ─────────────────────────────────────────────────────────────

/// 读取电离形状因子网格（与单位制无关的对数坐标）
pub fn load_ionization(path: &Path) -> Result<LogGridTable> {
    let content = read_file(path)?;
    parse_ionization_content(&content, &path.display().to_string())
}

pub fn parse_ionization_content(content: &str, label: &str) -> Result<LogGridTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());
    let mut points = Vec::new();
    for row in reader.deserialize() {
        let row: IonizationRow = row?;
        points.push((row.ln_k, row.ln_q, row.log10_ff2));
    }
    LogGridTable::from_points(&points).map_err(|e| WimpError::ParseError {
        format: "ionization form factor".to_string(),
        path: label.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Nucleon, StructureBand};
    use std::io::Write;

    #[test]
    fn test_parse_migdal() {
        let u = Units::si();
        let content = "# Xe\nE_eV,4d,5p\n1,0.5,2.0\n100,0.1,1.0\n";
        let tables = parse_migdal_content(content, "migdal_xe.csv", &u).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].0, Shell::new(4, 2));
        let (shell, table) = &tables[1];
        assert_eq!(*shell, Shell::new(5, 1));
        assert!((table.eval(u.ev()) * u.ev() - 2.0).abs() < 1e-12);
        assert_eq!(table.eval(200.0 * u.ev()), 0.0);
    }

    #[test]
    fn test_parse_spin_structure() {
        let u = Units::si();
        let content = "E_keV,SD_n_central,SD_p_down\n0,0.1,0.01\n10,0.05,0.005\n";
        let tables = parse_spin_structure_content(content, "sd_xe.csv", &u).unwrap();
        assert_eq!(
            tables[0].0,
            Interaction::SpinDependent {
                coupling: Nucleon::Neutron,
                band: StructureBand::Central
            }
        );
        assert!((tables[0].1.eval(5.0 * u.kev()) - 0.075).abs() < 1e-12);

        let bad = "E_keV,SD_n_middle\n0,0.1\n10,0.05\n";
        assert!(matches!(
            parse_spin_structure_content(bad, "sd_xe.csv", &u),
            Err(WimpError::UnsupportedInteraction(_))
        ));
    }

    #[test]
    fn test_parse_photon_form_factor() {
        let u = Units::si();
        let content = "E_keV,f1,f2\n1,40,2\n2,44,1\n";
        let (f1, f2) = parse_photon_form_factor_content(content, "brems_xe.csv", &u).unwrap();
        assert!((f1.eval(1.5 * u.kev()) - 42.0).abs() < 1e-9);
        assert!((f2.eval(3.0 * u.kev()) - 0.0).abs() < 1e-9);

        let wrong = "E_keV,f2,f1\n1,40,2\n2,44,1\n";
        assert!(parse_photon_form_factor_content(wrong, "brems_xe.csv", &u).is_err());
    }

    #[test]
    fn test_bad_number_reports_row() {
        let u = Units::si();
        let content = "E_eV,4d\n1,0.5\n2,abc\n";
        let err = parse_migdal_content(content, "migdal_xe.csv", &u).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 2"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_load_ionization_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dme_xe_4d.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "ln_k,ln_q,log10_ff2").unwrap();
        for (x, y) in [(-1.0, 0.0), (-1.0, 2.0), (1.0, 0.0), (1.0, 2.0)] {
            writeln!(file, "{},{},{}", x, y, -2.0).unwrap();
        }
        drop(file);

        let grid = load_ionization(&path).unwrap();
        assert_eq!(grid.y_max(), 2.0);
        assert!((grid.eval(0.0, 1.0) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_missing_file() {
        let err = load_ionization(Path::new("/nonexistent/dme_xe_4d.csv")).unwrap_err();
        assert!(matches!(err, WimpError::FileReadError { .. }));
    }
}
