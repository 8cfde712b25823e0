use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use personaai_api::{GeminiConfig, DEFAULT_MODEL, GEMINI_API_BASE};
use personaai_models::{builtin_personas, Persona};

use crate::cli::Cli;

/// Resolved client configuration. The credential is read from the
/// environment exactly once, here, and carried as an explicit value;
/// nothing downstream touches the process environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub verbose: bool,
}

impl ClientConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let api_key = env::var("GOOGLE_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self {
            api_key,
            api_url: cli
                .api_url
                .clone()
                .unwrap_or_else(|| GEMINI_API_BASE.to_string()),
            model: cli.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            verbose: cli.verbose,
        }
    }

    /// Provider settings, present only when a credential was configured.
    pub fn gemini_config(&self) -> Option<GeminiConfig> {
        self.api_key.as_ref().map(|key| GeminiConfig {
            api_key: key.clone(),
            model: self.model.clone(),
            base_url: self.api_url.clone(),
            verbose: self.verbose,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PersonaFile {
    #[serde(default)]
    personas: Vec<Persona>,
}

/// Load persona presets. An explicit `--personas-file` must exist and
/// parse; the implicit `personas.toml` is picked up only when present;
/// otherwise the built-in set is used.
pub fn load_personas(personas_file: Option<&str>) -> Result<Vec<Persona>> {
    let path: PathBuf = match personas_file {
        Some(path) => PathBuf::from(path),
        None => {
            let default = Path::new("personas.toml");
            if !default.exists() {
                return Ok(builtin_personas());
            }
            default.to_path_buf()
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read persona file {}", path.display()))?;
    let file: PersonaFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse persona file {}", path.display()))?;

    if file.personas.is_empty() {
        anyhow::bail!("Persona file {} defines no personas", path.display());
    }
    Ok(file.personas)
}

/// Pick a persona by 1-based index or label (case-insensitive). With no
/// selector the first preset wins.
pub fn resolve_persona(personas: &[Persona], selector: Option<&str>) -> Result<Persona> {
    let first = personas
        .first()
        .context("No personas are configured")?;

    let Some(selector) = selector else {
        return Ok(first.clone());
    };

    if let Ok(index) = selector.parse::<usize>() {
        return personas
            .get(index.wrapping_sub(1))
            .cloned()
            .with_context(|| format!("No persona at index {} (1-{})", index, personas.len()));
    }

    personas
        .iter()
        .find(|p| p.label.eq_ignore_ascii_case(selector))
        .cloned()
        .with_context(|| format!("Unknown persona '{}'", selector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn resolve_defaults_to_first_preset() {
        let personas = builtin_personas();
        let persona = resolve_persona(&personas, None).unwrap();
        assert_eq!(persona.label, "Default");
    }

    #[test]
    fn resolve_by_index_is_one_based() {
        let personas = builtin_personas();
        let persona = resolve_persona(&personas, Some("4")).unwrap();
        assert_eq!(persona.label, "Concise and Direct");
        assert!(resolve_persona(&personas, Some("0")).is_err());
        assert!(resolve_persona(&personas, Some("8")).is_err());
    }

    #[test]
    fn resolve_by_label_ignores_case() {
        let personas = builtin_personas();
        let persona = resolve_persona(&personas, Some("concise and direct")).unwrap();
        assert_eq!(persona.directive, "Respond concisely and directly.");
    }

    #[test]
    fn resolve_unknown_label_is_an_error() {
        let personas = builtin_personas();
        assert!(resolve_persona(&personas, Some("Pirate")).is_err());
    }

    #[test]
    fn load_personas_reads_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[personas]]\nlabel = \"Pirate\"\ndirective = \"Respond like a pirate.\"\n"
        )
        .unwrap();

        let personas = load_personas(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(personas.len(), 1);
        assert_eq!(personas[0].label, "Pirate");
    }

    #[test]
    fn load_personas_rejects_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_personas(Some(file.path().to_str().unwrap())).is_err());
    }

    #[test]
    fn load_personas_missing_explicit_file_is_an_error() {
        assert!(load_personas(Some("/nonexistent/personas.toml")).is_err());
    }
}
