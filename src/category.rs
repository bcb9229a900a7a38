//! category.rs — ordered keyword rules for news categorization.
//!
//! The table is deliberately a first-match-wins heuristic, kept in TOML so
//! keyword sets, priority order, and per-category upstream query strings can
//! change without touching code. The category set itself is fixed by the
//! schema (`NewsCategory`); a rule naming anything else fails to load.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::model::NewsCategory;

pub const DEFAULT_CATEGORIES_PATH: &str = "config/categories.toml";
pub const ENV_CATEGORIES_PATH: &str = "CATEGORIES_CONFIG_PATH";

/// Built-in copy of the shipped rule table, used when no override file is
/// configured. Keeps tests and fresh deployments independent of the CWD.
const EMBEDDED_RULES: &str = include_str!("../config/categories.toml");

#[derive(Debug, Deserialize)]
struct RulesFile {
    default: String,
    all: AllSection,
    categories: Vec<RuleCfg>,
}

#[derive(Debug, Deserialize)]
struct AllSection {
    query: String,
}

#[derive(Debug, Deserialize)]
struct RuleCfg {
    name: String,
    keywords: Vec<String>,
    query: String,
}

#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: NewsCategory,
    keywords: Vec<String>,
    query: String,
}

#[derive(Debug, Clone)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
    default: NewsCategory,
    all_query: String,
}

impl CategoryRules {
    /// Load from `$CATEGORIES_CONFIG_PATH` if set, else the default path if it
    /// exists, else the embedded table.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(ENV_CATEGORIES_PATH) {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading category rules from {path}"))?;
            return Self::from_toml_str(&content);
        }
        if let Ok(content) = std::fs::read_to_string(DEFAULT_CATEGORIES_PATH) {
            return Self::from_toml_str(&content);
        }
        Self::from_toml_str(EMBEDDED_RULES)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: RulesFile = toml::from_str(s).context("parsing category rules")?;
        let default = NewsCategory::parse(&file.default)
            .ok_or_else(|| anyhow!("unknown default category `{}`", file.default))?;
        let rules = file
            .categories
            .into_iter()
            .map(|cfg| {
                let category = NewsCategory::parse(&cfg.name)
                    .ok_or_else(|| anyhow!("unknown category `{}` in rules", cfg.name))?;
                let keywords = cfg
                    .keywords
                    .into_iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect::<Vec<_>>();
                Ok(CategoryRule {
                    category,
                    keywords,
                    query: cfg.query,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if rules.is_empty() {
            return Err(anyhow!("category rules table is empty"));
        }
        Ok(Self {
            rules,
            default,
            all_query: file.all.query,
        })
    }

    /// First rule (in table order) with any keyword appearing as a
    /// case-insensitive substring wins; no hit yields the default category.
    pub fn classify(&self, text: &str) -> NewsCategory {
        let haystack = text.to_lowercase();
        for rule in &self.rules {
            if rule.keywords.iter().any(|k| haystack.contains(k.as_str())) {
                return rule.category;
            }
        }
        self.default
    }

    /// Upstream query string for a category filter, or the broad "all" query.
    pub fn query_for(&self, category: Option<NewsCategory>) -> &str {
        match category {
            None => &self.all_query,
            Some(c) => self
                .rules
                .iter()
                .find(|r| r.category == c)
                .map(|r| r.query.as_str())
                .unwrap_or(&self.all_query),
        }
    }
}
