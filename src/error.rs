//! # 统一错误处理模块
//!
//! 定义 wimprates 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// wimprates 统一错误类型
#[derive(Error, Debug)]
pub enum WimpError {
    // ─────────────────────────────────────────────────────────────
    // 物理组合错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unsupported interaction: {0}")]
    UnsupportedInteraction(String),

    #[error("Unsupported detection mechanism: {0}")]
    UnsupportedMechanism(String),

    #[error("Unsupported target: {target} ({reason})")]
    UnsupportedTarget { target: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    // ─────────────────────────────────────────────────────────────
    // 数值积分错误
    // ─────────────────────────────────────────────────────────────
    #[error(
        "Numerical integration did not converge at E = {energy:.6e} keV \
         (estimate {value:.6e}, error {error:.3e}) in {context}"
    )]
    IntegrationNotConverged {
        context: String,
        energy: f64,
        value: f64,
        error: f64,
    },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

impl WimpError {
    /// 构造参数错误
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        WimpError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// 构造不支持的靶核错误
    pub fn unsupported_target(target: &str, reason: impl Into<String>) -> Self {
        WimpError::UnsupportedTarget {
            target: target.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, WimpError>;

/// 校验正数参数（质量、截面、密度等）
pub fn ensure_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(WimpError::invalid(
            name,
            format!("must be finite and strictly positive, got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("mass", 50.0).is_ok());
        assert!(ensure_positive("mass", 0.0).is_err());
        assert!(ensure_positive("mass", -1.0).is_err());
        assert!(ensure_positive("mass", f64::NAN).is_err());
    }

    #[test]
    fn test_error_message_names_parameter() {
        let err = ensure_positive("rho_dm", -0.3).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("rho_dm"), "unexpected message: {}", msg);
    }
}
