//! Exact decimal deserialization.
//!
//! JSON numbers go through their textual form so `9.99` stays `9.99`
//! instead of the nearest binary float.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalInput {
    Number(serde_json::Number),
    Text(String),
}

impl DecimalInput {
    fn parse<E: serde::de::Error>(self) -> Result<BigDecimal, E> {
        let text = match self {
            DecimalInput::Number(n) => n.to_string(),
            DecimalInput::Text(s) => s,
        };
        BigDecimal::from_str(text.trim())
            .map_err(|_| E::custom(format!("invalid decimal value '{}'", text)))
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    DecimalInput::deserialize(deserializer)?.parse()
}

pub mod option {
    use super::DecimalInput;
    use bigdecimal::BigDecimal;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<DecimalInput>::deserialize(deserializer)?
            .map(DecimalInput::parse)
            .transpose()
    }
}
