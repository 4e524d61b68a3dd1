//! Market catalog files.
//!
//! A catalog is a JSON document listing every market the engine should know
//! about:
//!
//! ```json
//! {
//!   "markets": [
//!     { "condition_id": "p", "question": "Above 50?", "yes_token": "p-yes",
//!       "no_token": "p-no", "kind": "range_parent", "lower": "50" },
//!     { "condition_id": "c", "question": "Above 60?", "yes_token": "c-yes",
//!       "no_token": "c-no", "kind": "range_child", "lower": "60", "parent": "p" }
//!   ]
//! }
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{ConditionId, Market, MarketIndex, MarketKind, OutcomeRange, TokenId};
use crate::error::{EngineError, Result};

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub condition_id: ConditionId,
    #[serde(default)]
    pub question: String,
    pub yes_token: TokenId,
    pub no_token: TokenId,
    pub kind: MarketKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ConditionId>,
}

impl MarketRecord {
    fn into_market(self) -> std::result::Result<Market, EngineError> {
        let range = match (self.lower, self.upper) {
            (None, None) => None,
            (lower, upper) => Some(OutcomeRange::new(lower, upper).ok_or_else(|| {
                EngineError::malformed(
                    &self.condition_id,
                    format!("empty range [{lower:?}, {upper:?})"),
                )
            })?),
        };
        Ok(Market::from_parts(
            self.condition_id,
            self.question,
            self.yes_token,
            self.no_token,
            self.kind,
            range,
            self.parent,
        ))
    }
}

/// A market catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub markets: Vec<MarketRecord>,
}

impl Catalog {
    /// Parse a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the catalog shape.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Convert every record into a market.
    ///
    /// # Errors
    ///
    /// Returns `MalformedGroup` for a record whose bounds describe an empty
    /// range.
    pub fn into_markets(self) -> Result<Vec<Market>> {
        let markets = self
            .markets
            .into_iter()
            .map(MarketRecord::into_market)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(markets)
    }

    /// Convert the catalog and build the market index.
    ///
    /// # Errors
    ///
    /// Returns any error of [`into_markets`](Self::into_markets) or
    /// [`MarketIndex::build`].
    pub fn into_index(self) -> Result<MarketIndex> {
        Ok(MarketIndex::build(self.into_markets()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    const CATALOG: &str = r#"{
        "markets": [
            { "condition_id": "p", "question": "Above 50?", "yes_token": "p-yes",
              "no_token": "p-no", "kind": "range_parent", "lower": "50" },
            { "condition_id": "c", "question": "Below 50?", "yes_token": "c-yes",
              "no_token": "c-no", "kind": "range_child", "upper": "50", "parent": "p" },
            { "condition_id": "b", "yes_token": "b-yes", "no_token": "b-no",
              "kind": "plain_binary" }
        ]
    }"#;

    #[test]
    fn test_parses_records() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.markets.len(), 3);

        let child = &catalog.markets[1];
        assert_eq!(child.kind, MarketKind::RangeChild);
        assert_eq!(child.lower, None);
        assert_eq!(child.upper, Some(dec!(50)));
        assert_eq!(child.parent, Some(ConditionId::from("p")));
        assert_eq!(catalog.markets[2].question, "");
    }

    #[test]
    fn test_into_index_builds_groups() {
        let index = Catalog::from_json(CATALOG).unwrap().into_index().unwrap();
        let census = index.census();
        assert_eq!(census.binary, 3);
        assert_eq!(census.complement, 1);
    }

    #[test]
    fn test_into_markets_carries_ranges() {
        let markets = Catalog::from_json(CATALOG).unwrap().into_markets().unwrap();
        assert_eq!(markets[0].range(), Some(&OutcomeRange::at_or_above(dec!(50))));
        assert_eq!(markets[1].range(), Some(&OutcomeRange::below(dec!(50))));
        assert!(markets[2].range().is_none());
    }

    #[test]
    fn test_nested_ladder_catalog_builds() {
        let json = r#"{"markets":[
            {"condition_id":"p","question":"Above 50?","yes_token":"p-yes","no_token":"p-no","kind":"range_parent","lower":"50"},
            {"condition_id":"c","question":"Above 60?","yes_token":"c-yes","no_token":"c-no","kind":"range_child","lower":"60","parent":"p"}
        ]}"#;
        let index = Catalog::from_json(json).unwrap().into_index().unwrap();
        assert_eq!(index.census().binary, 2);
        assert_eq!(index.groups().len(), 2);
    }

    #[test]
    fn test_rejects_empty_range() {
        let catalog = Catalog {
            markets: vec![MarketRecord {
                condition_id: ConditionId::from("x"),
                question: String::new(),
                yes_token: TokenId::from("x-yes"),
                no_token: TokenId::from("x-no"),
                kind: MarketKind::RangeParent,
                lower: Some(dec!(10)),
                upper: Some(dec!(10)),
                parent: None,
            }],
        };
        let err = catalog.into_markets().unwrap_err();
        assert!(matches!(err, Error::Engine(EngineError::MalformedGroup { .. })));
    }

    #[test]
    fn test_rejects_unknown_kind() {
        let json = r#"{"markets":[{"condition_id":"x","yes_token":"a","no_token":"b","kind":"scalar"}]}"#;
        assert!(matches!(Catalog::from_json(json), Err(Error::Json(_))));
    }
}
