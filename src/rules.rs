//! Typed rule table mapping `(label, condition)` to a narrative fragment.
//!
//! The external document looks like
//!
//! ```json
//! { "linhas": { "coracao": { "presenca": "...", "robusta": "..." }, "vida": {} } }
//! ```
//!
//! Unknown labels or condition keys and non-string values are skipped with a
//! log line; only a document whose shape is not an object with a `linhas`
//! object is rejected. Empty strings count as "no fragment".
use crate::error::{PalmError, Result};
use crate::image::io::read_text_file;
use crate::types::PalmLabel;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Predicate a fragment can be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Presenca,
    Ausencia,
    Robusta,
    Palida,
    Longa,
    Curta,
    Ascendente,
    Descendente,
    BifurcadaParaJupiter,
    TerminaEmSaturno,
    OrigemEmMercurio,
    Diagonal,
    Ramificada,
    TerminaEmJupiter,
    TerminaEmMercurio,
    OrigemEmVenus,
    Vertical,
}

impl Condition {
    pub const ALL: [Condition; 17] = [
        Condition::Presenca,
        Condition::Ausencia,
        Condition::Robusta,
        Condition::Palida,
        Condition::Longa,
        Condition::Curta,
        Condition::Ascendente,
        Condition::Descendente,
        Condition::BifurcadaParaJupiter,
        Condition::TerminaEmSaturno,
        Condition::OrigemEmMercurio,
        Condition::Diagonal,
        Condition::Ramificada,
        Condition::TerminaEmJupiter,
        Condition::TerminaEmMercurio,
        Condition::OrigemEmVenus,
        Condition::Vertical,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Condition::Presenca => "presenca",
            Condition::Ausencia => "ausencia",
            Condition::Robusta => "robusta",
            Condition::Palida => "palida",
            Condition::Longa => "longa",
            Condition::Curta => "curta",
            Condition::Ascendente => "ascendente",
            Condition::Descendente => "descendente",
            Condition::BifurcadaParaJupiter => "bifurcada_para_jupiter",
            Condition::TerminaEmSaturno => "termina_em_saturno",
            Condition::OrigemEmMercurio => "origem_em_mercurio",
            Condition::Diagonal => "diagonal",
            Condition::Ramificada => "ramificada",
            Condition::TerminaEmJupiter => "termina_em_jupiter",
            Condition::TerminaEmMercurio => "termina_em_mercurio",
            Condition::OrigemEmVenus => "origem_em_venus",
            Condition::Vertical => "vertical",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RulesTable {
    entries: BTreeMap<(PalmLabel, Condition), String>,
}

impl RulesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and programmatic tables.
    pub fn with(mut self, label: PalmLabel, condition: Condition, text: impl Into<String>) -> Self {
        self.insert(label, condition, text);
        self
    }

    pub fn insert(&mut self, label: PalmLabel, condition: Condition, text: impl Into<String>) {
        self.entries.insert((label, condition), text.into());
    }

    /// Fragment for `(label, condition)`; `None` when missing or empty.
    pub fn get(&self, label: PalmLabel, condition: Condition) -> Option<&str> {
        self.entries
            .get(&(label, condition))
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the `{"linhas": {...}}` document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| PalmError::malformed_rules(format!("invalid JSON: {e}")))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let lines = value
            .as_object()
            .ok_or_else(|| PalmError::malformed_rules("top level is not an object"))?
            .get("linhas")
            .ok_or_else(|| PalmError::malformed_rules("missing \"linhas\" section"))?
            .as_object()
            .ok_or_else(|| PalmError::malformed_rules("\"linhas\" is not an object"))?;

        let mut table = Self::new();
        for (label_key, conditions) in lines {
            let Some(label) = PalmLabel::from_key(label_key) else {
                debug!("rules: ignoring unknown label {label_key:?}");
                continue;
            };
            let Some(conditions) = conditions.as_object() else {
                warn!("rules: entry for {label} is not an object, skipped");
                continue;
            };
            for (cond_key, text) in conditions {
                let Some(condition) = Condition::from_key(cond_key) else {
                    debug!("rules: ignoring unknown condition {label}.{cond_key}");
                    continue;
                };
                match text.as_str() {
                    Some(text) => table.insert(label, condition, text),
                    None => warn!("rules: {label}.{cond_key} is not a string, skipped"),
                }
            }
        }
        Ok(table)
    }
}

/// Read and parse a rules document from disk.
pub fn load_rules(path: &Path) -> Result<RulesTable> {
    RulesTable::from_json_str(&read_text_file(path)?)
}
