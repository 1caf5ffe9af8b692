use crate::{
    cli::OutputFormat,
    error::{CliError, Result},
};
use cda_parser::decode::RotationBackend;
use cda_parser::media::{Quality, ResultSet, StreamKind};
#[cfg(feature = "colored-output")]
use colored::*;
use std::io::Write;

pub struct OutputManager {
    colored: bool,
}

impl OutputManager {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn format_result(
        &self,
        result: &ResultSet,
        format: &OutputFormat,
        quality: Option<&str>,
    ) -> Result<String> {
        match format {
            OutputFormat::Pretty => self.format_pretty(result, quality),
            OutputFormat::Json => {
                let mut output = result.to_compat_json()?;
                output.push('\n');
                Ok(output)
            }
        }
    }

    fn format_pretty(&self, result: &ResultSet, quality: Option<&str>) -> Result<String> {
        if let Some(filter) = quality {
            if !result.qualities.iter().any(|key| quality_matches(key, filter)) {
                return Err(CliError::no_matching_quality(filter));
            }
        }

        let mut output = String::new();
        match result.kind {
            StreamKind::ProgressiveFile => {
                for (key, url) in result.files() {
                    if quality.is_some_and(|filter| !quality_matches(key, filter)) {
                        continue;
                    }
                    output.push_str(&format!(
                        "Retrieved {} at {}\n",
                        self.colorize(key, &Color::Yellow, true),
                        self.colorize(url, &Color::Blue, false)
                    ));
                }
            }
            StreamKind::AdaptiveManifest => {
                let url = result.manifest_url().unwrap_or_default();
                output.push_str(&format!(
                    "Retrieved {} at {}\n",
                    self.colorize("stream", &Color::Green, true),
                    self.colorize(url, &Color::Blue, false)
                ));
                for key in &result.qualities {
                    if quality.is_some_and(|filter| !quality_matches(key, filter)) {
                        continue;
                    }
                    output.push_str(&format!(
                        "Stream available in: {}\n",
                        self.colorize(key, &Color::Yellow, false)
                    ));
                }
            }
            StreamKind::Unsupported => {}
        }

        Ok(output)
    }

    pub fn format_backends(&self, format: &OutputFormat) -> Result<String> {
        let detected = RotationBackend::detect();

        match format {
            OutputFormat::Json => {
                let backends: Vec<serde_json::Value> = RotationBackend::ALL
                    .iter()
                    .map(|backend| {
                        serde_json::json!({
                            "name": backend.as_str(),
                            "supported": backend.is_supported(),
                            "selected": *backend == detected,
                        })
                    })
                    .collect();
                let mut output = serde_json::to_string_pretty(&backends)?;
                output.push('\n');
                Ok(output)
            }
            OutputFormat::Pretty => {
                let mut output = String::new();
                output.push_str(&self.colorize("Rotation backends:", &Color::Green, true));
                output.push('\n');
                for backend in RotationBackend::ALL {
                    let status = if backend == detected {
                        self.colorize("selected", &Color::Green, false)
                    } else if backend.is_supported() {
                        self.colorize("supported", &Color::Cyan, false)
                    } else {
                        "unsupported".to_string()
                    };
                    output.push_str(&format!(
                        "  {:<8} {}\n",
                        self.colorize(backend.as_str(), &Color::Yellow, false),
                        status
                    ));
                }
                Ok(output)
            }
        }
    }

    fn colorize(&self, text: &str, color: &Color, bold: bool) -> String {
        #[cfg(feature = "colored-output")]
        {
            if self.colored {
                let colored_text = match color {
                    Color::Green => text.green(),
                    Color::Yellow => text.yellow(),
                    Color::Blue => text.blue(),
                    Color::Cyan => text.cyan(),
                };
                if bold {
                    colored_text.bold().to_string()
                } else {
                    colored_text.to_string()
                }
            } else {
                text.to_string()
            }
        }

        #[cfg(not(feature = "colored-output"))]
        {
            let _ = (self.colored, color, bold);
            text.to_string()
        }
    }
}

enum Color {
    Green,
    Yellow,
    Blue,
    Cyan,
}

/// A filter matches a key naming the same rendition, by code or by label.
fn quality_matches(key: &str, filter: &str) -> bool {
    if key == filter {
        return true;
    }
    match (key.parse::<Quality>(), filter.parse::<Quality>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

pub fn write_output(content: &str, output_file: Option<&std::path::Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        None => {
            print!("{content}");
            std::io::stdout().flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progressive() -> ResultSet {
        ResultSet::new(
            StreamKind::ProgressiveFile,
            vec!["sd".to_string(), "hd".to_string()],
            vec![
                "https://v.cda.pl/sd.mp4".to_string(),
                "https://v.cda.pl/hd.mp4".to_string(),
            ],
        )
    }

    fn manifest() -> ResultSet {
        ResultSet::new(
            StreamKind::AdaptiveManifest,
            vec!["480p".to_string(), "720p".to_string()],
            vec!["https://v.cda.pl/master.m3u8".to_string()],
        )
    }

    #[test]
    fn test_pretty_files() {
        let output = OutputManager::new(false)
            .format_result(&progressive(), &OutputFormat::Pretty, None)
            .unwrap();
        assert_eq!(
            output,
            "Retrieved sd at https://v.cda.pl/sd.mp4\nRetrieved hd at https://v.cda.pl/hd.mp4\n"
        );
    }

    #[test]
    fn test_pretty_manifest() {
        let output = OutputManager::new(false)
            .format_result(&manifest(), &OutputFormat::Pretty, None)
            .unwrap();
        assert_eq!(
            output,
            "Retrieved stream at https://v.cda.pl/master.m3u8\nStream available in: 480p\nStream available in: 720p\n"
        );
    }

    #[test]
    fn test_quality_filter_accepts_label() {
        let manager = OutputManager::new(false);
        let output = manager
            .format_result(&progressive(), &OutputFormat::Pretty, Some("1080p"))
            .unwrap();
        assert_eq!(output, "Retrieved hd at https://v.cda.pl/hd.mp4\n");

        let output = manager
            .format_result(&manifest(), &OutputFormat::Pretty, Some("lq"))
            .unwrap();
        assert_eq!(
            output,
            "Retrieved stream at https://v.cda.pl/master.m3u8\nStream available in: 480p\n"
        );
    }

    #[test]
    fn test_quality_filter_without_match() {
        let manager = OutputManager::new(false);
        let err = manager
            .format_result(&progressive(), &OutputFormat::Pretty, Some("4K"))
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidFilter(_)));

        let err = manager
            .format_result(&manifest(), &OutputFormat::Pretty, Some("uhd"))
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidFilter(_)));
    }

    #[test]
    fn test_json_output() {
        let output = OutputManager::new(true)
            .format_result(&progressive(), &OutputFormat::Json, None)
            .unwrap();
        assert_eq!(
            output,
            "{\"json_type\":\"file\",\"qualities\":[\"sd\",\"hd\"],\"urls\":[\"https://v.cda.pl/sd.mp4\",\"https://v.cda.pl/hd.mp4\"]}\n"
        );
    }

    #[test]
    fn test_backends_listing() {
        let manager = OutputManager::new(false);
        let output = manager.format_backends(&OutputFormat::Pretty).unwrap();
        assert!(output.contains("scalar"));
        assert!(output.contains("selected"));

        let json = manager.format_backends(&OutputFormat::Json).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), RotationBackend::ALL.len());
        assert_eq!(
            parsed.iter().filter(|b| b["selected"] == true).count(),
            1
        );
    }
}
