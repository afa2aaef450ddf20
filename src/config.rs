//! Dataset heuristics loaded from an optional YAML file.
//!
//! Column roles, the monetary total, and chart labels all key off column-name
//! keywords tuned for Portuguese inventory sheets. Every keyword is a default
//! that a `--config` file may override; omitted keys keep their defaults.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Heuristics {
    /// Name fragments marking the variant (chart label) column.
    pub variant_keywords: Vec<String>,
    /// Name fragments marking the stock/quantity column.
    pub stock_keywords: Vec<String>,
    /// Name fragments marking the BRL monetary column.
    pub monetary_keywords: Vec<String>,
    /// File extensions that mark a column as holding image references.
    pub image_extensions: Vec<String>,
    /// Chart label used when a record has no variant.
    pub missing_label: String,
    /// Explicit column for free-text search; falls back to the first
    /// categorical column, then the first header column.
    pub search_column: Option<String>,
    /// Product count treated as 100% in the summary.
    pub product_goal: u32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            variant_keywords: vec!["variante".to_string()],
            stock_keywords: vec!["estoque".to_string(), "stock".to_string()],
            monetary_keywords: vec!["valor total".to_string()],
            image_extensions: ["jpg", "jpeg", "png", "gif"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            missing_label: "Sem Variante".to_string(),
            search_column: None,
            product_goal: 500,
        }
    }
}

impl Heuristics {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let heuristics = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing config YAML {path:?}"))?;
        Ok(heuristics)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn is_variant_name(&self, name: &str) -> bool {
        name_matches(name, &self.variant_keywords)
    }

    pub fn is_stock_name(&self, name: &str) -> bool {
        name_matches(name, &self.stock_keywords)
    }

    pub fn is_monetary_name(&self, name: &str) -> bool {
        name_matches(name, &self.monetary_keywords)
    }

    pub fn is_image_reference(&self, value: &str) -> bool {
        let lowered = value.to_lowercase();
        self.image_extensions.iter().any(|ext| {
            let ext = ext.trim_start_matches('.').to_lowercase();
            !ext.is_empty()
                && lowered.len() > ext.len()
                && lowered.ends_with(&ext)
                && lowered[..lowered.len() - ext.len()].ends_with('.')
        })
    }
}

fn name_matches(name: &str, keywords: &[String]) -> bool {
    let lowered = name.to_lowercase();
    keywords
        .iter()
        .any(|keyword| lowered.contains(&keyword.to_lowercase()))
}
