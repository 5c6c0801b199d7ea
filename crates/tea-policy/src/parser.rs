//! Policy file loading.
//!
//! The format is chosen by extension: `.json` goes through `serde_json`,
//! `.yaml`/`.yml` through `serde_yaml`. Both land in the same
//! [`PolicyDocument`] and are then validated into a [`PolicyConfig`].
//! All errors carry the path of the file being loaded.

use std::path::Path;

use crate::config::{PolicyConfig, PolicyDocument};
use crate::error::{PolicyError, PolicyResult};

/// Serialization format of a policy file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyFormat {
    Json,
    Yaml,
}

impl PolicyFormat {
    /// Infer the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

fn read_policy_text(path: &Path) -> PolicyResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PolicyError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PolicyError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Load a policy file into its unvalidated document form.
pub fn load_policy_document(path: &Path) -> PolicyResult<PolicyDocument> {
    let format = PolicyFormat::from_path(path).ok_or_else(|| PolicyError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let content = read_policy_text(path)?;
    match format {
        PolicyFormat::Json => serde_json::from_str(&content).map_err(|e| PolicyError::JsonParse {
            path: path.to_path_buf(),
            source: e,
        }),
        PolicyFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| PolicyError::YamlParse {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Load and validate a policy file.
pub fn load_policy(path: &Path) -> PolicyResult<PolicyConfig> {
    let doc = load_policy_document(path)?;
    let config = PolicyConfig::from_document(doc)?;
    tracing::debug!(
        path = %path.display(),
        therapy_types = config.therapy_types().len(),
        "loaded policy"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const JSON_POLICY: &str = r#"{
        "elegibilidade": {"idade_maxima": 21},
        "cobertura": {"cid_validos": ["F84"], "tipos_terapia": ["ABA"]},
        "frequencia_maxima": {"ABA": {"periodo": "mensal", "quantidade": 10}}
    }"#;

    const YAML_POLICY: &str = "
elegibilidade:
  idade_maxima: 21
cobertura:
  cid_validos: [F84]
  tipos_terapia: [ABA]
frequencia_maxima:
  ABA:
    periodo: mensal
    quantidade: 10
";

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(PolicyFormat::from_path(Path::new("p.json")), Some(PolicyFormat::Json));
        assert_eq!(PolicyFormat::from_path(Path::new("p.YML")), Some(PolicyFormat::Yaml));
        assert_eq!(PolicyFormat::from_path(Path::new("p.yaml")), Some(PolicyFormat::Yaml));
        assert_eq!(PolicyFormat::from_path(Path::new("p.toml")), None);
        assert_eq!(PolicyFormat::from_path(Path::new("policy")), None);
    }

    #[test]
    fn loads_json_and_yaml_equally() {
        let json = write_temp(".json", JSON_POLICY);
        let yaml = write_temp(".yaml", YAML_POLICY);
        assert_eq!(load_policy(json.path()).unwrap(), load_policy(yaml.path()).unwrap());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_policy(Path::new("/nonexistent/policy.json")).unwrap_err();
        assert!(matches!(err, PolicyError::FileNotFound { .. }));
        assert!(err.to_string().contains("/nonexistent/policy.json"));
    }

    #[test]
    fn unsupported_extension() {
        let file = write_temp(".toml", JSON_POLICY);
        assert!(matches!(
            load_policy(file.path()),
            Err(PolicyError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn malformed_json_reports_path() {
        let file = write_temp(".json", "{\"elegibilidade\": ");
        let err = load_policy(file.path()).unwrap_err();
        assert!(matches!(err, PolicyError::JsonParse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn invalid_policy_is_configuration_error() {
        let file = write_temp(
            ".yml",
            "elegibilidade: {idade_maxima: 21}\ncobertura: {cid_validos: [F84], tipos_terapia: [ABA]}\nfrequencia_maxima: {ABA: {periodo: hora, quantidade: 1}}\n",
        );
        assert!(matches!(load_policy(file.path()), Err(PolicyError::Invalid(_))));
    }
}
