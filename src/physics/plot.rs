//! # 能谱绘图
//!
//! 使用 `plotters` 绘制对数纵轴的微分事例率谱。
//!
//! ## 功能
//! - 支持 PNG 和 SVG 输出
//! - 非正的事例率（运动学禁区）不画在对数轴上
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `physics/export.rs` 的 Scale 换算显示单位
//! - 使用 `plotters` 渲染图表

use crate::error::{Result, WimpError};
use crate::physics::export::Scale;
use crate::physics::rate::Spectrum;

use plotters::prelude::*;
use std::path::Path;

/// 生成能谱图
pub fn generate_spectrum_plot(
    spectrum: &Spectrum,
    scale: &Scale,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    let data: Vec<(f64, f64)> = scale
        .apply(spectrum)
        .into_iter()
        .filter(|&(_, r)| r > 0.0 && r.is_finite())
        .collect();
    if data.len() < 2 {
        return Err(WimpError::Other(
            "need at least two positive rates to draw a spectrum".to_string(),
        ));
    }

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_spectrum(&root, &data, title, scale.rate_label)?;
        root.present().map_err(|e| WimpError::Other(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_spectrum(&root, &data, title, scale.rate_label)?;
        root.present().map_err(|e| WimpError::Other(e.to_string()))?;
    }
    Ok(())
}

/// 绘图核心逻辑
fn draw_spectrum<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    data: &[(f64, f64)],
    title: &str,
    rate_label: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| WimpError::Other(format!("{:?}", e)))?;

    let x_min = data.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = data.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let y_min = data.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let y_max = data.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    // 纵轴上下各留半个量级
    let y_range = (y_min / 3.0)..(y_max * 3.0);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_range.log_scale())
        .map_err(|e| WimpError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("Energy (keV)")
        .y_desc(format!("Rate ({})", rate_label))
        .y_label_formatter(&|y| format!("{:.0e}", y))
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| WimpError::Other(format!("{:?}", e)))?;

    let line_color = RGBColor(0, 102, 204);
    chart
        .draw_series(LineSeries::new(
            data.iter().copied(),
            line_color.stroke_width(2),
        ))
        .map_err(|e| WimpError::Other(format!("{:?}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Units;

    #[test]
    fn test_svg_plot() {
        let u = Units::si();
        let spectrum = Spectrum {
            energies: (1..=20).map(|i| i as f64 * u.kev()).collect(),
            rates: (1..=20)
                .map(|i| 30.0 * (-(i as f64) / 5.0).exp() * u.per_tonne_year_kev())
                .collect(),
            diagnostics: Default::default(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrum.svg");
        generate_spectrum_plot(&spectrum, &Scale::nuclear(&u), &path, "SI", 800, 600, true).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_all_zero_spectrum_is_rejected() {
        let u = Units::si();
        let spectrum = Spectrum {
            energies: vec![u.kev(), 2.0 * u.kev()],
            rates: vec![0.0, 0.0],
            diagnostics: Default::default(),
        };
        let path = Path::new("/tmp/never-written.png");
        assert!(generate_spectrum_plot(&spectrum, &Scale::nuclear(&u), path, "x", 100, 100, false).is_err());
    }
}
