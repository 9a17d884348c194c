use serde::Deserialize;
use std::fmt::{Display, Formatter};

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ASC")]
    Asc,
    #[serde(alias = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Single field sort applied before pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    field: String,
    direction: SortDirection,
}

impl SortOrder {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::new("entity_id", SortDirection::Asc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{assert_de_tokens, Token};

    #[test]
    fn deserializes_direction_in_both_letter_cases() {
        assert_de_tokens(&SortDirection::Asc, &[Token::UnitVariant { name: "SortDirection", variant: "asc" }]);
        assert_de_tokens(&SortDirection::Desc, &[Token::UnitVariant { name: "SortDirection", variant: "DESC" }]);
    }

    #[test]
    fn sorts_by_entity_id_ascending_by_default() {
        assert_eq!(
            SortOrder::default(),
            SortOrder::new("entity_id", SortDirection::Asc)
        );
    }
}
