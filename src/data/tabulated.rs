//! # 表格响应数据
//!
//! 从数据目录加载一次、之后只读的响应表。没有对应表格的量交给
//! `BuiltinResponses`：默认报错，`with_approximations` 之后改用解析近似
//! （电子电离形状因子始终需要表格）。
//!
//! ## 目录布局
//! - `migdal_<target>.csv`: `E_eV,<shell>,...`，2π 归一化的 dP/dE (1/eV)
//! - `sd_<target>.csv`: `E_keV,SD_n_central,...`，丰度加权的 S/(2J+1)
//! - `brems_<target>.csv`: `E_keV,f1,f2`
//! - `dme_<target>_<shell>.csv`: `ln_k,ln_q,log10_ff2`
//!
//! ## 依赖关系
//! - 被 `commands/` 构造，`physics/` 通过 `ResponseTables` 使用
//! - 使用 `parsers/tables.rs` 读取 CSV
//! - 使用 `data/builtin.rs` 作为回退

use crate::data::builtin::{missing_ionization, BuiltinResponses};
use crate::data::tables::{LinearTable, LogGridTable};
use crate::data::{Response, ResponseTables};
use crate::error::{Result, WimpError};
use crate::models::{Interaction, Nucleon, Shell, StructureBand, Target, Units};
use crate::parsers::tables as loader;

use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static DME_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^dme_([a-z]+)_([1-7][spdf])\.csv$").unwrap());

const KNOWN_TARGETS: [&str; 3] = ["xe", "ar", "ge"];

/// 表格响应数据
#[derive(Debug, Clone)]
pub struct TabulatedResponses {
    units: Units,
    builtin: BuiltinResponses,
    source: Option<PathBuf>,
    migdal: HashMap<(String, Shell), LinearTable>,
    spin: HashMap<(String, Interaction), LinearTable>,
    photon: HashMap<String, (LinearTable, LinearTable)>,
    ionization: HashMap<(String, Shell), LogGridTable>,
}

fn key(target: &Target) -> String {
    target.symbol.to_lowercase()
}

impl TabulatedResponses {
    /// 空表
    pub fn empty(units: Units) -> Self {
        Self {
            units,
            builtin: BuiltinResponses::new(units),
            source: None,
            migdal: HashMap::new(),
            spin: HashMap::new(),
            photon: HashMap::new(),
            ionization: HashMap::new(),
        }
    }

    /// 从数据目录加载全部可识别的表格
    pub fn load(dir: &Path, units: Units) -> Result<Self> {
        if !dir.is_dir() {
            return Err(WimpError::DirectoryNotFound {
                path: dir.display().to_string(),
            });
        }
        let mut tables = Self::empty(units);
        tables.source = Some(dir.to_path_buf());

        for symbol in KNOWN_TARGETS {
            let path = dir.join(format!("migdal_{}.csv", symbol));
            if path.is_file() {
                for (shell, table) in loader::load_migdal(&path, &units)? {
                    tables.migdal.insert((symbol.to_string(), shell), table);
                }
            }
            let path = dir.join(format!("sd_{}.csv", symbol));
            if path.is_file() {
                for (interaction, table) in loader::load_spin_structure(&path, &units)? {
                    tables.spin.insert((symbol.to_string(), interaction), table);
                }
            }
            let path = dir.join(format!("brems_{}.csv", symbol));
            if path.is_file() {
                let pair = loader::load_photon_form_factor(&path, &units)?;
                tables.photon.insert(symbol.to_string(), pair);
            }
        }

        let entries = fs::read_dir(dir).map_err(|e| WimpError::FileReadError {
            path: dir.display().to_string(),
            source: e,
        })?;
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(caps) = DME_FILE_RE.captures(&name) {
                let shell: Shell = caps[2].parse()?;
                let grid = loader::load_ionization(&entry.path())?;
                tables.ionization.insert((caps[1].to_string(), shell), grid);
            }
        }
        Ok(tables)
    }

    /// 缺失的表改用内置解析近似
    pub fn with_approximations(mut self) -> Self {
        self.builtin = BuiltinResponses::approximate(self.units);
        self
    }

    /// 加入电离形状因子网格（`ln_k`, `ln_q` 坐标）
    pub fn insert_ionization(&mut self, target: &Target, shell: Shell, grid: LogGridTable) {
        self.ionization.insert((key(target), shell), grid);
    }

    /// 加入 Migdal 概率表
    pub fn insert_migdal(&mut self, target: &Target, shell: Shell, table: LinearTable) {
        self.migdal.insert((key(target), shell), table);
    }

    /// 已加载表格的数量
    pub fn table_count(&self) -> usize {
        self.migdal.len() + self.spin.len() + self.photon.len() + self.ionization.len()
    }

    fn ionization_grid(&self, target: &Target, shell: Shell) -> Result<&LogGridTable> {
        self.ionization
            .get(&(key(target), shell))
            .ok_or_else(|| missing_ionization(target, shell))
    }
}

impl ResponseTables for TabulatedResponses {
    fn describe(&self) -> String {
        let origin = match &self.source {
            Some(dir) => format!("{} tables from '{}'", self.table_count(), dir.display()),
            None => format!("{} in-memory tables", self.table_count()),
        };
        if self.builtin.approximates() {
            format!("{}, built-in approximations for the rest", origin)
        } else {
            origin
        }
    }

    fn is_approximate(&self, target: &Target, response: Response) -> bool {
        let tabulated = match response {
            Response::SpinStructure { coupling, band } => self
                .spin
                .contains_key(&(key(target), Interaction::SpinDependent { coupling, band })),
            Response::Migdal(shell) => self.migdal.contains_key(&(key(target), shell)),
            Response::Photon => self.photon.contains_key(&key(target)),
        };
        !tabulated && self.builtin.is_approximate(target, response)
    }

    fn spin_structure(
        &self,
        target: &Target,
        e_r: f64,
        coupling: Nucleon,
        band: StructureBand,
    ) -> Result<f64> {
        let interaction = Interaction::SpinDependent { coupling, band };
        match self.spin.get(&(key(target), interaction)) {
            Some(table) => Ok(table.eval(e_r)),
            None => self.builtin.spin_structure(target, e_r, coupling, band),
        }
    }

    fn migdal_probability(&self, target: &Target, shell: Shell, e_electron: f64) -> Result<f64> {
        match self.migdal.get(&(key(target), shell)) {
            Some(table) => Ok(table.eval(e_electron)),
            None => self.builtin.migdal_probability(target, shell, e_electron),
        }
    }

    fn photon_form_factor(&self, target: &Target, omega: f64) -> Result<(f64, f64)> {
        match self.photon.get(&key(target)) {
            Some((f1, f2)) => Ok((f1.eval(omega), f2.eval(omega))),
            None => self.builtin.photon_form_factor(target, omega),
        }
    }

    fn ionization_form_factor(
        &self,
        target: &Target,
        shell: Shell,
        e_electron: f64,
        q: f64,
    ) -> Result<f64> {
        let grid = self.ionization_grid(target, shell)?;
        if e_electron <= 0.0 || q <= 0.0 {
            return Ok(0.0);
        }
        let ln_k = 0.5 * (e_electron / self.units.rydberg()).ln();
        let ln_q = (q / self.units.atomic_momentum()).ln();
        Ok(grid.eval(ln_k, ln_q))
    }

    fn ionization_q_max(&self, target: &Target, shell: Shell) -> Result<f64> {
        let grid = self.ionization_grid(target, shell)?;
        Ok(grid.y_max().exp() * self.units.atomic_momentum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tables::OutOfRange;

    #[test]
    fn test_missing_tables_fail_closed() {
        let u = Units::si();
        let tables = TabulatedResponses::empty(u);
        let xe = Target::xenon();
        let shell: Shell = "4d".parse().unwrap();
        assert!(matches!(
            tables.migdal_probability(&xe, shell, 30.0 * u.ev()),
            Err(WimpError::UnsupportedTarget { .. })
        ));
        assert!(tables.photon_form_factor(&xe, u.kev()).is_err());
        assert!(!tables.is_approximate(&xe, Response::Migdal(shell)));
    }

    #[test]
    fn test_approximations_fill_missing_tables() {
        let u = Units::si();
        let tables = TabulatedResponses::empty(u).with_approximations();
        let builtin = BuiltinResponses::approximate(u);
        let xe = Target::xenon();
        let shell: Shell = "4d".parse().unwrap();
        assert!(tables.is_approximate(&xe, Response::Migdal(shell)));
        assert!(tables.describe().contains("built-in approximations"));
        assert_eq!(
            tables.migdal_probability(&xe, shell, 30.0 * u.ev()).unwrap(),
            builtin.migdal_probability(&xe, shell, 30.0 * u.ev()).unwrap()
        );
        assert!(matches!(
            tables.ionization_q_max(&xe, shell),
            Err(WimpError::UnsupportedTarget { .. })
        ));
    }

    #[test]
    fn test_inserted_tables_take_precedence() {
        let u = Units::si();
        let mut tables = TabulatedResponses::empty(u).with_approximations();
        let xe = Target::xenon();
        let shell: Shell = "4d".parse().unwrap();
        let table = LinearTable::new(
            vec![0.0, 1e3 * u.ev()],
            vec![5.0 / u.ev(), 5.0 / u.ev()],
            OutOfRange::Zero,
        )
        .unwrap();
        tables.insert_migdal(&xe, shell, table);
        assert!(!tables.is_approximate(&xe, Response::Migdal(shell)));
        let p = tables.migdal_probability(&xe, shell, 100.0 * u.ev()).unwrap();
        assert!((p * u.ev() - 5.0).abs() < 1e-12);
        assert_eq!(tables.migdal_probability(&xe, shell, 2e3 * u.ev()).unwrap(), 0.0);
        assert_eq!(tables.table_count(), 1);
    }

    #[test]
    fn test_ionization_lookup() {
        let u = Units::si();
        let mut tables = TabulatedResponses::empty(u);
        let xe = Target::xenon();
        let shell: Shell = "5p".parse().unwrap();
        let points = [
            (-2.0, 0.0, -1.0),
            (4.0, 0.0, -1.0),
            (-2.0, 3.0, -1.0),
            (4.0, 3.0, -1.0),
        ];
        tables.insert_ionization(&xe, shell, LogGridTable::from_points(&points).unwrap());

        let q_max = tables.ionization_q_max(&xe, shell).unwrap();
        assert!((q_max / u.atomic_momentum() - 3f64.exp()).abs() < 1e-9);
        let ff = tables
            .ionization_form_factor(&xe, shell, 50.0 * u.ev(), 2.0 * u.atomic_momentum())
            .unwrap();
        assert!((ff - 0.1).abs() < 1e-12);
        // 网格外
        let ff = tables
            .ionization_form_factor(&xe, shell, 50.0 * u.ev(), 0.5 * u.atomic_momentum())
            .unwrap();
        assert_eq!(ff, 0.0);
    }

    #[test]
    fn test_missing_directory() {
        let err = TabulatedResponses::load(Path::new("/nonexistent/wimprates"), Units::si())
            .unwrap_err();
        assert!(matches!(err, WimpError::DirectoryNotFound { .. }));
    }
}
