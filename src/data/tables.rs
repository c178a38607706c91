//! # 插值表
//!
//! - `LinearTable`: 一维分段线性插值，超出范围时取 0 或线性外推
//! - `LogGridTable`: 规则二维网格上对 log10 值做双线性插值，超出范围时为 None
//!
//! ## 依赖关系
//! - 被 `data/tabulated.rs`、`parsers/tables.rs` 使用
//! - 仅依赖标准库

use crate::error::{Result, WimpError};

/// 超出表格范围时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfRange {
    Zero,
    Extrapolate,
}

/// 一维线性插值表
#[derive(Debug, Clone, PartialEq)]
pub struct LinearTable {
    x: Vec<f64>,
    y: Vec<f64>,
    out_of_range: OutOfRange,
}

impl LinearTable {
    /// x 必须严格递增，至少两个点
    pub fn new(x: Vec<f64>, y: Vec<f64>, out_of_range: OutOfRange) -> Result<Self> {
        if x.len() != y.len() || x.len() < 2 {
            return Err(WimpError::invalid(
                "table",
                format!("need at least two (x, y) pairs, got {} x and {} y", x.len(), y.len()),
            ));
        }
        if x.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(WimpError::invalid("table", "x values must be strictly increasing"));
        }
        Ok(Self { x, y, out_of_range })
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn eval(&self, x: f64) -> f64 {
        let (lo, hi) = self.x_range();
        if (x < lo || x > hi) && self.out_of_range == OutOfRange::Zero {
            return 0.0;
        }
        // 外推时使用端点所在区间
        let i = match self.x.partition_point(|&v| v <= x) {
            0 => 0,
            p if p >= self.x.len() => self.x.len() - 2,
            p => p - 1,
        };
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

/// 二维规则网格（存 log10 值）
#[derive(Debug, Clone, PartialEq)]
pub struct LogGridTable {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// 行主序：values[i * ys.len() + j] 对应 (xs[i], ys[j])
    values: Vec<f64>,
}

impl LogGridTable {
    /// 由散点 (x, y, log10 v) 构造，要求恰好覆盖整个矩形网格
    pub fn from_points(points: &[(f64, f64, f64)]) -> Result<Self> {
        let mut xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let mut ys: Vec<f64> = points.iter().map(|p| p.1).collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup();
        ys.sort_by(f64::total_cmp);
        ys.dedup();

        if xs.len() < 2 || ys.len() < 2 {
            return Err(WimpError::invalid("grid", "need at least a 2x2 grid"));
        }
        if xs.len() * ys.len() != points.len() {
            return Err(WimpError::invalid(
                "grid",
                format!(
                    "{} points do not form a {}x{} rectangular grid",
                    points.len(),
                    xs.len(),
                    ys.len()
                ),
            ));
        }

        let mut values = vec![f64::NAN; xs.len() * ys.len()];
        for &(x, y, v) in points {
            let i = xs.partition_point(|&a| a < x);
            let j = ys.partition_point(|&b| b < y);
            values[i * ys.len() + j] = v;
        }
        if values.iter().any(|v| v.is_nan()) {
            return Err(WimpError::invalid("grid", "duplicate or missing grid points"));
        }
        Ok(Self { xs, ys, values })
    }

    pub fn y_max(&self) -> f64 {
        self.ys[self.ys.len() - 1]
    }

    /// 双线性插值 log10 值；超出网格返回 None
    pub fn eval_log10(&self, x: f64, y: f64) -> Option<f64> {
        let i = bracket(&self.xs, x)?;
        let j = bracket(&self.ys, y)?;
        let tx = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        let ty = (y - self.ys[j]) / (self.ys[j + 1] - self.ys[j]);
        let n = self.ys.len();
        let v00 = self.values[i * n + j];
        let v01 = self.values[i * n + j + 1];
        let v10 = self.values[(i + 1) * n + j];
        let v11 = self.values[(i + 1) * n + j + 1];
        Some(
            v00 * (1.0 - tx) * (1.0 - ty)
                + v10 * tx * (1.0 - ty)
                + v01 * (1.0 - tx) * ty
                + v11 * tx * ty,
        )
    }

    /// 插值后的线性值，网格外为 0
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        self.eval_log10(x, y).map(|v| 10f64.powf(v)).unwrap_or(0.0)
    }
}

/// 找到 axis[i] <= v <= axis[i+1] 的 i
fn bracket(axis: &[f64], v: f64) -> Option<usize> {
    let last = axis.len() - 1;
    if !(v >= axis[0] && v <= axis[last]) {
        return None;
    }
    let p = axis.partition_point(|&a| a <= v);
    Some(p.saturating_sub(1).min(last - 1))
}
