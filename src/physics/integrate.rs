//! # 自适应数值积分
//!
//! 每个子区间用 `quadrature` 的双指数（tanh-sinh）规则求积，误差估计取自该规则；
//! 总误差超出容差时二分误差最大的子区间。双指数规则不在端点取值，
//! 适合 1/v 型端点奇异。
//!
//! ## 诊断
//! - `Estimate::converged` 标记是否达到容差
//! - `IntegrationLog` 在嵌套积分中收集未收敛警告，最后转成 `Diagnostics`
//!
//! ## 依赖关系
//! - 被 `physics/rate.rs`、`migdal.rs`、`bremsstrahlung.rs`、`electron.rs`、`halo.rs` 调用
//! - 使用 `quadrature` crate

use crate::error::{Result, WimpError};

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// 积分设置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature {
    pub rel_tol: f64,
    pub abs_tol: f64,
    /// 子区间数上限
    pub max_intervals: usize,
}

impl Default for Quadrature {
    fn default() -> Self {
        Self {
            rel_tol: 1e-4,
            abs_tol: 0.0,
            max_intervals: 200,
        }
    }
}

/// 积分结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub error: f64,
    pub evaluations: usize,
    pub converged: bool,
}

impl Estimate {
    fn zero() -> Self {
        Self {
            value: 0.0,
            error: 0.0,
            evaluations: 0,
            converged: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
    evaluations: usize,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.error.total_cmp(&other.error) == Ordering::Equal
    }
}

impl Eq for Segment {}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.error.total_cmp(&other.error)
    }
}

impl Quadrature {
    /// 以相对容差构造
    pub fn with_rel_tol(rel_tol: f64) -> Self {
        Self {
            rel_tol,
            ..Self::default()
        }
    }

    /// 计算 ∫_a^b f(x) dx；b ≤ a 时返回 0
    pub fn integrate<F>(&self, f: F, a: f64, b: f64) -> Result<Estimate>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        if !(b > a) {
            return Ok(Estimate::zero());
        }

        let integrand = Integrand::new(f);
        let width = b - a;
        let first = integrand.segment(a, b, self.abs_tol)?;
        let mut evaluations = first.evaluations;
        let mut value = first.value;
        let mut error = first.error;
        let mut heap = BinaryHeap::new();
        heap.push(first);

        loop {
            let tolerance = self.abs_tol.max(self.rel_tol * value.abs());
            if error <= tolerance {
                return Ok(Estimate {
                    value,
                    error,
                    evaluations,
                    converged: true,
                });
            }
            if heap.len() >= self.max_intervals.max(1) {
                break;
            }

            let Some(worst) = heap.pop() else { break };
            let mid = 0.5 * (worst.a + worst.b);
            // 区间已缩到浮点分辨率以下
            if !(mid > worst.a && mid < worst.b) {
                heap.push(worst);
                break;
            }
            let target = tolerance * 0.5 * (worst.b - worst.a) / width;
            let left = integrand.segment(worst.a, mid, target)?;
            let right = integrand.segment(mid, worst.b, target)?;
            evaluations += left.evaluations + right.evaluations;

            value += left.value + right.value - worst.value;
            error += left.error + right.error - worst.error;
            heap.push(left);
            heap.push(right);
        }

        // 重新求和，避免增量累积的舍入误差
        let value: f64 = heap.iter().map(|s| s.value).sum();
        let error: f64 = heap.iter().map(|s| s.error).sum();
        let tolerance = self.abs_tol.max(self.rel_tol * value.abs());
        Ok(Estimate {
            value,
            error,
            evaluations,
            converged: error <= tolerance,
        })
    }
}

/// 可失败被积函数到 `quadrature` 所需 `Fn(f64) -> f64` 的适配
///
/// 第一次出错后其余取值返回 0，子区间求完后把错误交还调用者。
struct Integrand<F> {
    f: RefCell<F>,
    failure: RefCell<Option<WimpError>>,
}

impl<F> Integrand<F>
where
    F: FnMut(f64) -> Result<f64>,
{
    fn new(f: F) -> Self {
        Self {
            f: RefCell::new(f),
            failure: RefCell::new(None),
        }
    }

    fn call(&self, x: f64) -> f64 {
        if self.failure.borrow().is_some() {
            return 0.0;
        }
        let result = (&mut *self.f.borrow_mut())(x);
        match result {
            Ok(y) => y,
            Err(e) => {
                *self.failure.borrow_mut() = Some(e);
                0.0
            }
        }
    }

    fn segment(&self, a: f64, b: f64, target: f64) -> Result<Segment> {
        let output = quadrature::double_exponential::integrate(|x| self.call(x), a, b, target);
        if let Some(e) = self.failure.borrow_mut().take() {
            return Err(e);
        }
        Ok(Segment {
            a,
            b,
            value: output.integral,
            error: output.error_estimate.abs(),
            evaluations: output.num_function_evaluations as usize,
        })
    }
}

// ─────────────────────────────────────────────────────────────
// 诊断信息
// ─────────────────────────────────────────────────────────────

/// 积分未收敛警告
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationWarning {
    /// 哪一个积分
    pub context: &'static str,
    /// 对应的可观测能量 (keV)
    pub energy: f64,
    pub value: f64,
    pub error: f64,
}

/// 单次事例率计算的诊断
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub warnings: Vec<IntegrationWarning>,
    /// 使用了解析近似的响应量（如 "Xe 4d Migdal probability"）
    pub approximations: Vec<String>,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.approximations.is_empty()
    }

    /// 合并；近似列表去重
    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
        for name in other.approximations {
            if !self.approximations.contains(&name) {
                self.approximations.push(name);
            }
        }
    }
}

/// 单个能量点计算过程中的警告收集器
#[derive(Debug)]
pub struct IntegrationLog {
    energy: f64,
    warnings: RefCell<Vec<IntegrationWarning>>,
}

impl IntegrationLog {
    pub fn new(energy: f64) -> Self {
        Self {
            energy,
            warnings: RefCell::new(Vec::new()),
        }
    }

    /// 记录未收敛的积分，返回积分值
    pub fn check(&self, context: &'static str, estimate: Estimate) -> f64 {
        if !estimate.converged {
            self.warnings.borrow_mut().push(IntegrationWarning {
                context,
                energy: self.energy,
                value: estimate.value,
                error: estimate.error,
            });
        }
        estimate.value
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        Diagnostics {
            warnings: self.warnings.into_inner(),
            approximations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_polynomial_is_exact() {
        let quad = Quadrature::default();
        let est = quad.integrate(|x| Ok(x.powi(5) - 3.0 * x * x), 0.0, 2.0).unwrap();
        assert!((est.value - (64.0 / 6.0 - 8.0)).abs() < 1e-10);
        assert!(est.converged);
        assert!(est.evaluations > 0);
        assert!(est.error <= 1e-4 * est.value.abs());
    }

    #[test]
    fn test_sine() {
        let est = Quadrature::default()
            .integrate(|x| Ok(x.sin()), 0.0, PI)
            .unwrap();
        assert!((est.value - 2.0).abs() < 1e-10, "got {}", est.value);
    }

    #[test]
    fn test_sharp_peak_needs_subdivision() {
        // ∫_{-1}^{1} 1/(ε² + x²) dx = 2 atan(1/ε)/ε
        let eps: f64 = 1e-3;
        let exact = 2.0 * (1.0 / eps).atan() / eps;
        let quad = Quadrature::with_rel_tol(1e-8);
        let est = quad
            .integrate(|x| Ok(1.0 / (eps * eps + x * x)), -1.0, 1.0)
            .unwrap();
        assert!(est.converged);
        assert!(((est.value - exact) / exact).abs() < 1e-6, "got {}", est.value);
    }

    #[test]
    fn test_kink_and_step() {
        // 速度分布在 v_esc - v_E 处有拐点，这里用 |x - 0.3| 模拟
        let est = Quadrature::with_rel_tol(1e-9)
            .integrate(|x| Ok((x - 0.3).abs()), 0.0, 1.0)
            .unwrap();
        assert!((est.value - 0.29).abs() < 1e-6, "got {}", est.value);
    }

    #[test]
    fn test_empty_interval_is_zero() {
        let quad = Quadrature::default();
        let est = quad.integrate(|_| Ok(1.0), 2.0, 2.0).unwrap();
        assert_eq!(est.value, 0.0);
        assert!(est.converged);
        let est = quad.integrate(|_| Ok(1.0), 3.0, 2.0).unwrap();
        assert_eq!(est.value, 0.0);
    }

    #[test]
    fn test_non_convergence_is_reported() {
        let quad = Quadrature {
            rel_tol: 1e-12,
            abs_tol: 0.0,
            max_intervals: 2,
        };
        let est = quad.integrate(|x| Ok((50.0 * x).sin().abs()), 0.0, 10.0).unwrap();
        assert!(!est.converged);

        let log = IntegrationLog::new(1.0);
        log.check("test", est);
        let diagnostics = log.into_diagnostics();
        assert_eq!(diagnostics.warnings.len(), 1);
        assert_eq!(diagnostics.warnings[0].context, "test");
    }

    #[test]
    fn test_endpoint_singularity() {
        // ∫_0^1 x^{-1/2} dx = 2
        let est = Quadrature::with_rel_tol(1e-8)
            .integrate(|x| Ok(if x > 0.0 { 1.0 / x.sqrt() } else { 0.0 }), 0.0, 1.0)
            .unwrap();
        assert!((est.value - 2.0).abs() < 1e-6, "got {}", est.value);
    }

    #[test]
    fn test_approximations_merge_without_duplicates() {
        let note = |names: &[&str]| Diagnostics {
            warnings: Vec::new(),
            approximations: names.iter().map(|s| s.to_string()).collect(),
        };
        let mut merged = Diagnostics::default();
        assert!(merged.is_clean());
        merged.extend(note(&["Xe photon form factor"]));
        merged.extend(note(&["Xe photon form factor", "Xe 4d Migdal probability"]));
        assert_eq!(merged.approximations.len(), 2);
        assert!(!merged.is_clean());
    }

    #[test]
    fn test_integrand_error_propagates() {
        let result = Quadrature::default().integrate(
            |x| {
                if x > 0.5 {
                    Err(WimpError::Other("boom".into()))
                } else {
                    Ok(x)
                }
            },
            0.0,
            1.0,
        );
        assert!(result.is_err());
    }
}
