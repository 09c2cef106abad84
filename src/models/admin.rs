//! Administrative hierarchy parsed from a catalog geographic string.

use serde::{Deserialize, Serialize};

/// Positional administrative slots, broadest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
    /// Nation ("Norge")
    Country,
    /// County / fylke
    County,
    /// Municipality / kommune
    Municipality,
    /// Named place below the municipality (farm, mountain, lake, ...)
    Locality,
}

impl AdminLevel {
    /// The three fixed slots in positional order (country first)
    pub fn fixed() -> &'static [AdminLevel] {
        &[
            AdminLevel::Country,
            AdminLevel::County,
            AdminLevel::Municipality,
        ]
    }

    /// Get the column name for this level
    pub fn field_name(&self) -> &'static str {
        match self {
            AdminLevel::Country => "country",
            AdminLevel::County => "county",
            AdminLevel::Municipality => "municipality",
            AdminLevel::Locality => "locality",
        }
    }
}

/// Administrative levels extracted from one geographic string.
///
/// `localities[0]` is exported as `locality_1`. `tokens` holds every distinct
/// non-empty token in first-seen order and is what per-token resolution queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeographicFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub localities: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<String>,
}

impl GeographicFields {
    /// Set a fixed slot. Locality values are appended.
    pub fn set(&mut self, level: AdminLevel, value: String) {
        match level {
            AdminLevel::Country => self.country = Some(value),
            AdminLevel::County => self.county = Some(value),
            AdminLevel::Municipality => self.municipality = Some(value),
            AdminLevel::Locality => self.localities.push(value),
        }
    }

    /// Get a slot. For `Locality` this is `locality_1`.
    pub fn get(&self, level: AdminLevel) -> Option<&str> {
        match level {
            AdminLevel::Country => self.country.as_deref(),
            AdminLevel::County => self.county.as_deref(),
            AdminLevel::Municipality => self.municipality.as_deref(),
            AdminLevel::Locality => self.localities.first().map(String::as_str),
        }
    }

    /// 1-based locality lookup, matching the `locality_N` column names
    pub fn locality(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.localities.get(i))
            .map(String::as_str)
    }

    /// True when any positional slot holds a value
    pub fn has_positional(&self) -> bool {
        AdminLevel::fixed().iter().any(|l| self.get(*l).is_some()) || !self.localities.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_positional() && self.tokens.is_empty()
    }

    /// Lookup candidates, most specific first.
    ///
    /// Positional fields yield localities in listed order, then municipality,
    /// county and country. Token-set fields yield their tokens in order.
    pub fn candidates(&self) -> Vec<&str> {
        if !self.has_positional() {
            return self.tokens.iter().map(String::as_str).collect();
        }

        let mut out: Vec<&str> = self.localities.iter().map(String::as_str).collect();
        for level in AdminLevel::fixed().iter().rev() {
            if let Some(value) = self.get(*level) {
                out.push(value);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steinkjer() -> GeographicFields {
        let mut fields = GeographicFields::default();
        fields.set(AdminLevel::Country, "Norge".into());
        fields.set(AdminLevel::County, "Trøndelag".into());
        fields.set(AdminLevel::Municipality, "Steinkjer".into());
        fields.set(AdminLevel::Locality, "Vakkerlifjellet".into());
        fields.set(AdminLevel::Locality, "Skjækervatnet".into());
        fields
    }

    #[test]
    fn test_candidates_most_specific_first() {
        let fields = steinkjer();
        assert_eq!(
            fields.candidates(),
            vec![
                "Vakkerlifjellet",
                "Skjækervatnet",
                "Steinkjer",
                "Trøndelag",
                "Norge"
            ]
        );
    }

    #[test]
    fn test_candidates_skip_missing_slots() {
        let mut fields = GeographicFields::default();
        fields.set(AdminLevel::County, "Nordland".into());
        assert_eq!(fields.candidates(), vec!["Nordland"]);
    }

    #[test]
    fn test_candidates_fall_back_to_tokens() {
        let fields = GeographicFields {
            tokens: vec!["Bodø".into(), "Nordland".into()],
            ..Default::default()
        };
        assert!(!fields.has_positional());
        assert_eq!(fields.candidates(), vec!["Bodø", "Nordland"]);
    }

    #[test]
    fn test_locality_is_one_based() {
        let fields = steinkjer();
        assert_eq!(fields.locality(0), None);
        assert_eq!(fields.locality(1), Some("Vakkerlifjellet"));
        assert_eq!(fields.locality(2), Some("Skjækervatnet"));
        assert_eq!(fields.locality(3), None);
        assert_eq!(fields.get(AdminLevel::Locality), Some("Vakkerlifjellet"));
    }

    #[test]
    fn test_empty() {
        assert!(GeographicFields::default().is_empty());
        assert!(!steinkjer().is_empty());
    }
}
