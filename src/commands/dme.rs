//! # dme 子命令实现
//!
//! 暗物质-电子散射电离事例率。没有电离形状因子表时直接报错。
//!
//! ## 依赖关系
//! - 使用 `cli/dme.rs` 定义的参数
//! - 使用 `commands/common.rs` 构造模型并输出
//! - 使用 `physics::RateCalculator`

use crate::cli::dme::DmeArgs;
use crate::commands::common;
use crate::error::Result;
use crate::models::{DetectionMechanism, DmFormFactor, Shell, Target, Units};
use crate::physics::export::Scale;
use crate::physics::{RateCalculator, RateRequest};
use crate::utils::output;

/// 执行 dme 计算
pub fn execute(args: DmeArgs) -> Result<()> {
    output::print_header("Dark Matter-Electron Scattering");

    let units = Units::si();
    let shell: Shell = args.shell.parse()?;
    let form_factor: DmFormFactor = args.form_factor.parse()?;
    let target: Target = args.target.parse()?;
    let energies = common::energy_grid(&units, &args.energies)?;

    let mut request = RateRequest::new(&units, args.mass * units.gev_c2(), args.sigma * units.cm().powi(2))?
        .with_mechanism(DetectionMechanism::ElectronScattering { shell, form_factor })
        .with_halo(common::halo_model(&units, &args.halo)?)
        .with_target(target);
    if let Some(t) = common::observation_time(args.halo.date.as_deref(), args.halo.t)? {
        request = request.at_time(t);
    }

    output::print_parameter("m_χ", format!("{} GeV/c²", args.mass));
    output::print_parameter("σ_e", format!("{:e} cm²", args.sigma));
    output::print_parameter("shell", format!("{} of {}", shell, request.target));
    output::print_parameter("F_DM", form_factor);
    output::print_parameter("energies", energies.len());

    let responses = common::load_responses(units, &args.run)?;
    let calculator =
        RateCalculator::with_responses(units, responses).with_settings(common::settings(&args.run)?);
    let prepared = calculator.prepare(&request)?;
    let spectrum = common::evaluate_spectrum(&prepared, &energies, args.run.jobs)?;

    let title = format!("{} {} DME {} GeV/c² F_DM={}", request.target, shell, args.mass, form_factor);
    common::report(&spectrum, &Scale::electron(&units), &args.run, &title)?;

    output::print_done(&format!("Evaluated {} energies", spectrum.len()));
    Ok(())
}
