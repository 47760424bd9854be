//! Asset universe configuration.

use crate::types::Symbol;
use crate::{Result, VigilError};
use serde::{Deserialize, Serialize};

/// Offensive (risk) and defensive (safety) asset lists.
///
/// The two lists are non-empty, free of duplicates and disjoint. List order
/// matters: it breaks ties between equal momentum scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUniverse")]
pub struct AssetUniverse {
    offensive: Vec<Symbol>,
    defensive: Vec<Symbol>,
}

/// Unvalidated form used for deserialization.
#[derive(Deserialize)]
struct RawUniverse {
    offensive: Vec<Symbol>,
    defensive: Vec<Symbol>,
}

impl TryFrom<RawUniverse> for AssetUniverse {
    type Error = VigilError;

    fn try_from(raw: RawUniverse) -> Result<Self> {
        Self::new(raw.offensive, raw.defensive)
    }
}

impl AssetUniverse {
    /// Creates a validated universe.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InvalidConfig`] when either list is empty,
    /// contains a duplicate, or shares a symbol with the other list.
    pub fn new<S: Into<Symbol>>(
        offensive: impl IntoIterator<Item = S>,
        defensive: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let offensive: Vec<Symbol> = offensive.into_iter().map(Into::into).collect();
        let defensive: Vec<Symbol> = defensive.into_iter().map(Into::into).collect();

        for (label, list) in [("offensive", &offensive), ("defensive", &defensive)] {
            if list.is_empty() {
                return Err(VigilError::InvalidConfig(format!(
                    "{label} universe is empty"
                )));
            }
            for (i, symbol) in list.iter().enumerate() {
                if list[..i].contains(symbol) {
                    return Err(VigilError::InvalidConfig(format!(
                        "{symbol} listed twice in the {label} universe"
                    )));
                }
            }
        }
        if let Some(shared) = offensive.iter().find(|s| defensive.contains(s)) {
            return Err(VigilError::InvalidConfig(format!(
                "{shared} is both offensive and defensive"
            )));
        }

        Ok(Self {
            offensive,
            defensive,
        })
    }

    /// Risk assets.
    pub fn offensive(&self) -> &[Symbol] {
        &self.offensive
    }

    /// Safety assets.
    pub fn defensive(&self) -> &[Symbol] {
        &self.defensive
    }

    /// Offensive assets followed by defensive assets.
    pub fn combined(&self) -> Vec<Symbol> {
        self.offensive
            .iter()
            .chain(&self.defensive)
            .cloned()
            .collect()
    }

    /// Whether `symbol` belongs to either list.
    pub fn contains(&self, symbol: &str) -> bool {
        self.offensive.iter().chain(&self.defensive).any(|s| s == symbol)
    }
}

impl Default for AssetUniverse {
    /// The classical VAA-G4 universe.
    fn default() -> Self {
        Self {
            offensive: ["SPY", "VEA", "VWO", "AGG"].map(String::from).to_vec(),
            defensive: ["SHY", "IEF", "LQD"].map(String::from).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_universe() {
        let universe = AssetUniverse::default();
        assert_eq!(universe.offensive(), &["SPY", "VEA", "VWO", "AGG"]);
        assert_eq!(universe.defensive(), &["SHY", "IEF", "LQD"]);
        assert_eq!(universe.combined().len(), 7);
        assert_eq!(universe.combined()[4], "SHY");
        assert!(universe.contains("LQD"));
        assert!(!universe.contains("BND"));
    }

    #[test]
    fn test_overlap_rejected() {
        let result = AssetUniverse::new(["SPY", "AGG"], ["AGG"]);
        assert!(matches!(result, Err(VigilError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_rejected() {
        let result = AssetUniverse::new(Vec::<String>::new(), vec!["SHY".to_string()]);
        assert!(matches!(result, Err(VigilError::InvalidConfig(_))));
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = AssetUniverse::new(["SPY", "SPY"], ["SHY"]);
        assert!(matches!(result, Err(VigilError::InvalidConfig(_))));
    }

    #[test]
    fn test_serde_validates() {
        let universe: AssetUniverse =
            serde_json::from_str(r#"{"offensive":["SPY"],"defensive":["SHY"]}"#).unwrap();
        assert_eq!(universe.offensive(), &["SPY"]);

        let overlap =
            serde_json::from_str::<AssetUniverse>(r#"{"offensive":["SPY"],"defensive":["SPY"]}"#);
        assert!(overlap.is_err());
    }
}
