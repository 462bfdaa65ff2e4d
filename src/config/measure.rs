use crate::analysis::AnalysisParams;
use crate::scale::{InfoBarLayout, Scale};
use crate::segments::LsdOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration of the `measure_lines` tool.
#[derive(Debug, Deserialize)]
pub struct MeasureToolConfig {
    pub input: PathBuf,
    pub scale: ScaleSource,
    #[serde(default)]
    pub layout: InfoBarLayout,
    #[serde(default)]
    pub lsd: LsdOptions,
    #[serde(default)]
    pub params: AnalysisParams,
    #[serde(default)]
    pub output: MeasureOutputConfig,
}

/// Where the micrometer-per-pixel scale comes from.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScaleSource {
    /// Known label text; the bar length is measured in the info bar.
    Label { label: String },
    /// Scale known up front; the info bar is not read or cropped.
    Fixed { um_per_px: f64, uncertainty: f64 },
}

impl ScaleSource {
    pub fn fixed_scale(&self) -> Option<Scale> {
        match *self {
            ScaleSource::Fixed {
                um_per_px,
                uncertainty,
            } => Some(Scale {
                um_per_px,
                uncertainty,
            }),
            ScaleSource::Label { .. } => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MeasureOutputConfig {
    /// Report destination; the report is only printed when absent.
    pub report_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<MeasureToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_source_with_defaults() {
        let cfg: MeasureToolConfig = serde_json::from_str(
            r#"{
                "input": "data/sample.tif",
                "scale": { "label": { "label": "100" } },
                "params": { "meanRows": [0, 20], "estimateTranslation": true },
                "output": { "reportJson": "out/sample.json" }
            }"#,
        )
        .unwrap();
        assert_eq!(
            cfg.scale,
            ScaleSource::Label {
                label: "100".to_string()
            }
        );
        assert_eq!(cfg.scale.fixed_scale(), None);
        assert_eq!(cfg.params.mean_rows, (0, 20));
        assert_eq!(cfg.layout, InfoBarLayout::default());
        assert_eq!(
            cfg.output.report_json,
            Some(PathBuf::from("out/sample.json"))
        );
    }

    #[test]
    fn fixed_source() {
        let cfg: MeasureToolConfig = serde_json::from_str(
            r#"{
                "input": "a.png",
                "scale": { "fixed": { "umPerPx": 0.25, "uncertainty": 0.001 } }
            }"#,
        )
        .unwrap();
        let scale = cfg.scale.fixed_scale().unwrap();
        assert_eq!(scale.um_per_px, 0.25);
        assert_eq!(scale.uncertainty, 0.001);
        assert!(cfg.output.report_json.is_none());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_config(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.contains("does/not/exist.json"));
    }
}
