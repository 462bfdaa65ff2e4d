use sem_metrology::analysis::{LineAnalyzer, MeasurementReport};
use sem_metrology::config::{self, MeasureToolConfig, ScaleSource};
use sem_metrology::image::io::{load_grayscale_image, write_json_file};
use sem_metrology::image::ImageU8;
use sem_metrology::scale::{FixedText, Scale, ScaleProvider, ScaleResolver, SegmentLineDetector};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = config::load_config(Path::new(&config_path))?;

    let gray = load_grayscale_image(&config.input)?;
    let view = gray.as_view();

    let report = match &config.scale {
        ScaleSource::Label { label } => {
            let resolver = ScaleResolver::new(
                FixedText::new(label.as_str()),
                SegmentLineDetector::new(config.lsd),
                config.layout,
            );
            measure(resolver, &config, &view)?
        }
        ScaleSource::Fixed {
            um_per_px,
            uncertainty,
        } => {
            let scale = Scale {
                um_per_px: *um_per_px,
                uncertainty: *uncertainty,
            };
            measure(scale, &config, &view)?
        }
    };

    println!(
        "{}: scale {:.6} ± {:.6} µm/px, {} lines",
        config.input.display(),
        report.scale.um_per_px,
        report.scale.uncertainty,
        report.lines.len()
    );
    for (i, line) in report.lines.iter().enumerate() {
        println!("Line {i}: ({:.4} ± {:.4}) µm", line.width_um, line.std_dev_um);
    }
    if let Some(t) = &report.translation {
        println!(
            "Translation: {:?} µm (std {:.4})",
            t.translations_um, t.std_dev_um
        );
    }
    if let Some(r) = &report.rotation {
        println!("Rotation: ({:.4} ± {:.4})°", r.angle_deg, r.std_dev_deg);
    }
    if let Some(angle) = report.dominant_angle_deg {
        println!("Dominant angle: {angle}°");
    }

    if let Some(path) = &config.output.report_json {
        write_json_file(path, &report)?;
        println!("Saved report to {}", path.display());
    }

    Ok(())
}

fn measure<S: ScaleProvider>(
    provider: S,
    config: &MeasureToolConfig,
    image: &ImageU8<'_>,
) -> Result<MeasurementReport, String> {
    LineAnalyzer::new(provider, config.params)
        .analyze(image)
        .map_err(|e| format!("Measurement of {} failed: {e}", config.input.display()))
}

fn usage() -> String {
    "Usage: measure_lines <config.json>".to_string()
}
