//! # 批量执行器
//!
//! 并行执行逐点计算任务。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代，独立线程池
//! - 进度条显示
//! - 任一点出错即返回该错误
//!
//! ## 依赖关系
//! - 被 `commands/rate.rs`、`commands/dme.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{Result, WimpError};
use crate::utils::progress;

use rayon::prelude::*;

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
    /// 是否显示进度条
    progress: bool,
    /// 进度条上的机制名
    label: String,
}

impl BatchRunner {
    /// 创建新的批量执行器
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            progress: true,
            label: String::from("evaluating"),
        }
    }

    /// 设置进度条标签
    pub fn labelled(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// 关闭进度条
    pub fn quiet(mut self) -> Self {
        self.progress = false;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 对每个能量点并行调用 `evaluate`，结果与输入同序
    pub fn run<T, F>(&self, energies: &[f64], evaluate: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(f64) -> Result<T> + Sync + Send,
    {
        let pb = if self.progress {
            progress::create_energy_bar(energies.len() as u64, &self.label)
        } else {
            indicatif::ProgressBar::hidden()
        };

        // 配置 rayon 线程池
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| WimpError::Other(format!("Failed to build thread pool: {}", e)))?;

        let results = pool.install(|| {
            energies
                .par_iter()
                .map(|&energy| {
                    let result = evaluate(energy);
                    pb.inc(1);
                    result
                })
                .collect::<Result<Vec<T>>>()
        });

        pb.finish_and_clear();
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_preserved() {
        let runner = BatchRunner::new(4).quiet();
        let energies: Vec<f64> = (0..257).map(|i| i as f64).collect();
        let out = runner.run(&energies, |e| Ok(2.0 * e)).unwrap();
        assert_eq!(out.len(), energies.len());
        assert!(out.iter().zip(&energies).all(|(y, x)| *y == 2.0 * x));
    }

    #[test]
    fn test_error_propagates() {
        let runner = BatchRunner::new(2).quiet();
        let result = runner.run(&[1.0, -1.0, 3.0], |e| {
            if e < 0.0 {
                Err(WimpError::invalid("energy", "negative"))
            } else {
                Ok(e)
            }
        });
        assert!(matches!(result, Err(WimpError::InvalidParameter { .. })));
    }

    #[test]
    fn test_zero_jobs_uses_all_cores() {
        assert_eq!(BatchRunner::new(0).jobs(), num_cpus::get());
        assert_eq!(BatchRunner::new(3).jobs(), 3);
    }
}
