use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::config::{read_toml, ConfigError};
use crate::css::variant_group::expand_variant_groups;
use crate::css::web_fonts::{FontFamily, FontProvider};

pub mod variant_group;
pub mod web_fonts;

/// Design-system presets of the CSS utility engine, in declaration order.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Preset {
    Uno,
    WebFonts {
        #[serde(default)]
        provider: FontProvider,
        /// Font role (`sans`, `mono`...) to family spec.
        fonts: BTreeMap<String, String>,
    },
    Icons {
        #[serde(default = "default_icon_prefix")]
        prefix: String,
    },
    Typography {
        #[serde(default = "default_typography_selector")]
        selector: String,
    },
}

fn default_icon_prefix() -> String {
    "i-".to_string()
}

fn default_typography_selector() -> String {
    "prose".to_string()
}

impl Preset {
    pub fn kind(&self) -> &'static str {
        match self {
            Preset::Uno => "uno",
            Preset::WebFonts { .. } => "web_fonts",
            Preset::Icons { .. } => "icons",
            Preset::Typography { .. } => "typography",
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Transformer {
    VariantGroup,
}

impl Transformer {
    pub fn apply(&self, classes: &str) -> String {
        match self {
            Transformer::VariantGroup => expand_variant_groups(classes),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct CssConfig {
    #[serde(default)]
    pub presets: Vec<Preset>,
    #[serde(default)]
    pub transformers: Vec<Transformer>,
}

impl CssConfig {
    pub fn read(path: &Path) -> Result<CssConfig, ConfigError> {
        let cfg: CssConfig = read_toml(path)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for preset in &self.presets {
            if !seen.insert(preset.kind()) {
                return Err(ConfigError::DuplicatePreset(preset.kind()));
            }
        }
        self.font_families()?;
        Ok(())
    }

    /// Parsed web-font families, keyed by role.
    pub fn font_families(&self) -> Result<Vec<(String, FontFamily)>, ConfigError> {
        let mut families = vec![];
        for preset in &self.presets {
            if let Preset::WebFonts { fonts, .. } = preset {
                for (role, spec) in fonts {
                    let family = spec.parse::<FontFamily>().map_err(|reason| ConfigError::InvalidFont {
                        spec: spec.clone(),
                        reason,
                    })?;
                    families.push((role.clone(), family));
                }
            }
        }
        Ok(families)
    }

    /// Stylesheet links the page head needs for the web fonts.
    pub fn stylesheets(&self) -> Result<Vec<String>, ConfigError> {
        let families = self.font_families()?;
        let families: Vec<FontFamily> = families.into_iter().map(|(_, family)| family).collect();

        let mut links = vec![];
        for preset in &self.presets {
            if let Preset::WebFonts { provider, .. } = preset {
                if let Some(url) = provider.stylesheet_url(&families) {
                    links.push(url);
                }
            }
        }
        Ok(links)
    }

    /// Runs the transformers over every `class` / `className` attribute.
    /// The attribute name must follow whitespace, so `data-class` is skipped.
    pub fn apply_transformers(&self, source: &str) -> String {
        lazy_static! {
            static ref CLASS_REGEX: Regex = Regex::new(r#"(\sclass(?:Name)?=")([^"\n]*)(")"#).unwrap();
        }

        if self.transformers.is_empty() {
            return source.to_string();
        }

        let result = CLASS_REGEX.replace_all(source, |captures: &Captures| {
            let classes = self.transformers.iter().fold(captures[2].to_string(), |classes, t| t.apply(&classes));
            format!("{}{}{}", &captures[1], classes, &captures[3])
        });

        result.to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::CSS_CONFIG;

    use super::*;

    fn parse(src: &str) -> CssConfig {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn test_read_presets() {
        let cfg = parse(CSS_CONFIG);
        cfg.validate().unwrap();
        let kinds: Vec<&str> = cfg.presets.iter().map(Preset::kind).collect();
        assert_eq!(kinds, vec!["uno", "web_fonts", "icons", "typography"]);
        assert_eq!(cfg.transformers, vec![Transformer::VariantGroup]);
        assert_eq!(cfg.presets[2], Preset::Icons { prefix: "i-".to_string() });

        let families = cfg.font_families().unwrap();
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].0, "sans");
        assert_eq!(families[0].1.weights, vec![100, 300, 400, 600, 700]);

        assert_eq!(cfg.stylesheets().unwrap(), vec![
            "https://fonts.googleapis.com/css2?family=Asap%3Awght%40100%3B300%3B400%3B600%3B700&display=swap".to_string(),
        ]);
    }

    #[test]
    fn test_duplicate_preset() {
        let cfg = parse("presets = [{ kind = \"icons\" }, { kind = \"icons\", prefix = \"icon-\" }]");
        assert!(matches!(cfg.validate(), Err(ConfigError::DuplicatePreset("icons"))));
    }

    #[test]
    fn test_invalid_font() {
        let cfg = parse("presets = [{ kind = \"web_fonts\", fonts = { sans = \"Asap:bold\" } }]");
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidFont { .. })));
    }

    #[test]
    fn test_apply_transformers_on_class_attributes() {
        let cfg = parse(CSS_CONFIG);
        let source = r#"<div className="hover:(bg-gray-100 text-black) p-2">note:(keep this)</div>"#;
        assert_eq!(
            cfg.apply_transformers(source),
            r#"<div className="hover:bg-gray-100 hover:text-black p-2">note:(keep this)</div>"#
        );

        let plain = CssConfig::default();
        assert_eq!(plain.apply_transformers(source), source);
    }

    #[test]
    fn test_apply_transformers_skips_other_attributes() {
        let cfg = parse(CSS_CONFIG);
        let source = r#"<i data-class="hover:(a b)" class="hover:(a b)">"#;
        assert_eq!(cfg.apply_transformers(source), r#"<i data-class="hover:(a b)" class="hover:a hover:b">"#);

        let multiline = "<p class=\"hover:(a\nb)\">";
        assert_eq!(cfg.apply_transformers(multiline), multiline);
    }
}
