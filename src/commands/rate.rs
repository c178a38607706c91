//! # rate 子命令实现
//!
//! 计算核反冲类机制（弹性、Migdal、轫致辐射）的微分事例率谱。
//!
//! ## 依赖关系
//! - 使用 `cli/rate.rs` 定义的参数
//! - 使用 `commands/common.rs` 构造模型并输出
//! - 使用 `physics::RateCalculator`

use crate::cli::rate::RateArgs;
use crate::commands::common;
use crate::error::{Result, WimpError};
use crate::models::{DetectionMechanism, Interaction, Shell, Target, Units};
use crate::physics::export::Scale;
use crate::physics::{RateCalculator, RateRequest};
use crate::utils::output;

/// 执行 rate 计算
pub fn execute(args: RateArgs) -> Result<()> {
    output::print_header("WIMP Rate Calculation");

    let units = Units::si();
    let request = build_request(&units, &args)?;
    let energies = common::energy_grid(&units, &args.energies)?;

    output::print_parameter("m_χ", format!("{} GeV/c²", args.mass));
    output::print_parameter("σ", format!("{:e} cm²", args.sigma));
    output::print_parameter("interaction", &request.interaction);
    output::print_parameter("target", &request.target);
    output::print_parameter("mechanism", &request.mechanism);
    output::print_parameter("energies", energies.len());
    output::print_parameter(
        "time",
        match request.time {
            Some(t) => format!("t = {:.3} d after J2000", t),
            None => "annual average".to_string(),
        },
    );

    let responses = common::load_responses(units, &args.run)?;
    let calculator =
        RateCalculator::with_responses(units, responses).with_settings(common::settings(&args.run)?);
    let prepared = calculator.prepare(&request)?;
    output::print_info(&format!(
        "Integration: {} ({}-dimensional)",
        prepared.strategy().name(),
        prepared.strategy().dimensions()
    ));
    let spectrum = common::evaluate_spectrum(&prepared, &energies, args.run.jobs)?;

    let title = format!(
        "{} {} GeV/c² {} ({})",
        request.target, args.mass, request.interaction, prepared.strategy().name()
    );
    common::report(&spectrum, &Scale::nuclear(&units), &args.run, &title)?;

    output::print_done(&format!("Evaluated {} energies", spectrum.len()));
    Ok(())
}

/// 由 CLI 参数构造请求
pub fn build_request(units: &Units, args: &RateArgs) -> Result<RateRequest> {
    let interaction: Interaction = args.interaction.parse()?;
    let target: Target = args.target.parse()?;
    let mut mechanism: DetectionMechanism = args.mechanism.parse()?;

    match mechanism {
        DetectionMechanism::Migdal(ref mut options) => {
            options.include_approx_nr = args.include_approx_nr;
            options.q_nr = args.q_nr;
            if let Some(ref list) = args.shells {
                let shells = list
                    .split(',')
                    .map(|s| s.trim().parse::<Shell>())
                    .collect::<Result<Vec<_>>>()?;
                options.shells = Some(shells);
            }
        }
        DetectionMechanism::ElectronScattering { .. } => {
            return Err(WimpError::UnsupportedMechanism(format!(
                "{} (use the `dme` subcommand)",
                args.mechanism
            )));
        }
        _ => {}
    }

    let halo = common::halo_model(units, &args.halo)?;
    let mut request = RateRequest::new(units, args.mass * units.gev_c2(), args.sigma * units.cm().powi(2))?
        .with_interaction(interaction)
        .with_mechanism(mechanism)
        .with_halo(halo)
        .with_target(target);
    if let Some(m) = args.mediator_mass {
        request = request.with_mediator_mass(m * units.gev_c2())?;
    }
    if let Some(t) = common::observation_time(args.halo.date.as_deref(), args.halo.t)? {
        request = request.at_time(t);
    }
    Ok(request)
}
