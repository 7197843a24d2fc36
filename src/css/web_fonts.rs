use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use url::Url;

/// A web-font family as written in the CSS config: `Asap:100,300,400`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFamily {
    pub name: String,
    /// Sorted, without duplicates. Empty means the provider default.
    pub weights: Vec<u16>,
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (name, weights) = match spec.split_once(':') {
            Some((name, weights)) => (name.trim(), Some(weights)),
            None => (spec.trim(), None),
        };

        if name.is_empty() {
            return Err("missing family name".to_string());
        }

        let mut parsed = vec![];
        if let Some(weights) = weights {
            for weight in weights.split(',') {
                let weight = weight.trim();
                let value: u16 = weight.parse().map_err(|_| format!("invalid weight '{}'", weight))?;
                if !(100..=900).contains(&value) || value % 100 != 0 {
                    return Err(format!("weight {} must be a multiple of 100 between 100 and 900", value));
                }
                parsed.push(value);
            }
        }
        parsed.sort_unstable();
        parsed.dedup();

        Ok(FontFamily {
            name: name.to_string(),
            weights: parsed,
        })
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.weights.is_empty() {
            let weights: Vec<String> = self.weights.iter().map(|w| w.to_string()).collect();
            write!(f, ":{}", weights.join(","))?;
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontProvider {
    #[default]
    Google,
    Bunny,
    /// Fonts are self-hosted, no stylesheet is linked.
    None,
}

impl FontProvider {
    pub fn stylesheet_url(&self, families: &[FontFamily]) -> Option<String> {
        lazy_static! {
            static ref GOOGLE_FONTS: Url = Url::parse("https://fonts.googleapis.com/css2").unwrap();
            static ref BUNNY_FONTS: Url = Url::parse("https://fonts.bunny.net/css").unwrap();
        }

        if families.is_empty() {
            return None;
        }

        let mut url = match self {
            FontProvider::Google => GOOGLE_FONTS.clone(),
            FontProvider::Bunny => BUNNY_FONTS.clone(),
            FontProvider::None => return None,
        };

        {
            let mut query = url.query_pairs_mut();
            match self {
                FontProvider::Google => {
                    for family in families {
                        query.append_pair("family", &google_family(family));
                    }
                }
                _ => {
                    let params: Vec<String> = families.iter().map(bunny_family).collect();
                    query.append_pair("family", &params.join("|"));
                }
            }
            query.append_pair("display", "swap");
        }

        Some(url.to_string())
    }
}

fn google_family(family: &FontFamily) -> String {
    if family.weights.is_empty() {
        return family.name.clone();
    }
    let weights: Vec<String> = family.weights.iter().map(|w| w.to_string()).collect();
    format!("{}:wght@{}", family.name, weights.join(";"))
}

fn bunny_family(family: &FontFamily) -> String {
    let name = family.name.to_lowercase().replace(' ', "-");
    if family.weights.is_empty() {
        return name;
    }
    let weights: Vec<String> = family.weights.iter().map(|w| w.to_string()).collect();
    format!("{}:{}", name, weights.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_family() {
        let family: FontFamily = "Asap:100,300,400,600,700".parse().unwrap();
        assert_eq!(family.name, "Asap");
        assert_eq!(family.weights, vec![100, 300, 400, 600, 700]);
        assert_eq!(family.to_string(), "Asap:100,300,400,600,700");

        let family: FontFamily = "Fira Code:700, 400,400".parse().unwrap();
        assert_eq!(family.name, "Fira Code");
        assert_eq!(family.weights, vec![400, 700]);

        let family: FontFamily = "Inter".parse().unwrap();
        assert!(family.weights.is_empty());
    }

    #[test]
    fn test_invalid_family() {
        assert!("".parse::<FontFamily>().is_err());
        assert!(":400".parse::<FontFamily>().is_err());
        assert!("Asap:bold".parse::<FontFamily>().is_err());
        assert!("Asap:450".parse::<FontFamily>().is_err());
        assert!("Asap:1000".parse::<FontFamily>().is_err());
    }

    #[test]
    fn test_google_url() {
        let families = vec![
            "Asap:100,300".parse::<FontFamily>().unwrap(),
            "Fira Code".parse::<FontFamily>().unwrap(),
        ];
        assert_eq!(
            FontProvider::Google.stylesheet_url(&families).unwrap(),
            "https://fonts.googleapis.com/css2?family=Asap%3Awght%40100%3B300&family=Fira+Code&display=swap"
        );
    }

    #[test]
    fn test_bunny_and_none() {
        let families = vec!["Fira Code:400".parse::<FontFamily>().unwrap()];
        assert_eq!(
            FontProvider::Bunny.stylesheet_url(&families).unwrap(),
            "https://fonts.bunny.net/css?family=fira-code%3A400&display=swap"
        );
        assert_eq!(FontProvider::None.stylesheet_url(&families), None);
        assert_eq!(FontProvider::Google.stylesheet_url(&[]), None);
    }

    #[test]
    fn test_family_name_is_escaped() {
        let families = vec!["Noto Sans & Symbols:400".parse::<FontFamily>().unwrap()];
        let link = FontProvider::Google.stylesheet_url(&families).unwrap();
        let url = Url::parse(&link).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        assert_eq!(pairs, vec![
            ("family".to_string(), "Noto Sans & Symbols:wght@400".to_string()),
            ("display".to_string(), "swap".to_string()),
        ]);
    }
}
