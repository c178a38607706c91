//! # 终端输出
//!
//! 各子命令共用的状态行前缀、标题栏与模型参数行，以及事例率诊断
//! （积分未收敛、解析近似）的固定措辞。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `main.rs` 使用
//! - 使用 `physics::IntegrationWarning`
//! - 使用 `colored` crate

use crate::physics::IntegrationWarning;

use colored::Colorize;
use std::fmt::Display;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 子命令标题栏，右侧附程序版本
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    let version = format!("wimprates {}", env!("CARGO_PKG_VERSION"));
    println!("\n{}", line.dimmed());
    println!(
        "  {}{}",
        format!("{:<44}", title).bold(),
        format!("{:>14}", version).dimmed()
    );
    println!("{}\n", line.dimmed());
}

/// 模型参数行
pub fn print_parameter(name: &str, value: impl Display) {
    println!("    {} {}", format!("{:<12}", name).cyan(), value);
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}

// ─────────────────────────────────────────────────────────────
// 计算诊断
// ─────────────────────────────────────────────────────────────

pub fn integration_warning_message(warning: &IntegrationWarning) -> String {
    format!(
        "{} integral did not converge at E = {:.4e} keV (estimate {:.4e}, error {:.2e})",
        warning.context, warning.energy, warning.value, warning.error
    )
}

pub fn approximation_message(name: &str) -> String {
    format!("{} from a built-in approximation; not reference accuracy", name)
}

/// 积分未收敛警告
pub fn print_integration_warning(warning: &IntegrationWarning) {
    print_warning(&integration_warning_message(warning));
}

/// 解析近似警告
pub fn print_approximation(name: &str) {
    print_warning(&approximation_message(name));
}
