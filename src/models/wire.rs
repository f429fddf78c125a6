// src/models/wire.rs

// Desserializadores para os formatos "soltos" do backend:
// ids que chegam como número ou texto, dinheiro como número ou texto,
// e a decisão de cotização como null / bool / texto.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::models::work_request::QuoteDecision;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    Flag(bool),
}

fn scalar_to_id(value: Scalar) -> String {
    match value {
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(f) if f.fract() == 0.0 => format!("{}", f as i64),
        Scalar::Float(f) => f.to_string(),
        Scalar::Text(s) => s,
        Scalar::Flag(b) => b.to_string(),
    }
}

pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(scalar_to_id)
}

pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(scalar_to_id))
}

pub fn opt_money<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Int(n)) => Ok(Some(Decimal::from(n))),
        Some(Scalar::Float(f)) => Decimal::try_from(f)
            .map(|d| Some(d.round_dp(2)))
            .map_err(D::Error::custom),
        Some(Scalar::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Scalar::Text(s)) => Decimal::from_str(s.trim())
            .map(|d| Some(d.round_dp(2)))
            .map_err(D::Error::custom),
        Some(Scalar::Flag(_)) => Err(D::Error::custom("valor monetário inválido")),
    }
}

/// Aprovação de usuário pendente: bool, "true"/"Sí" ou ausente.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => false,
        Some(Scalar::Flag(b)) => b,
        Some(Scalar::Int(n)) => n != 0,
        Some(Scalar::Float(f)) => f != 0.0,
        Some(Scalar::Text(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "si" | "sí" | "1" | "aprobado"
        ),
    })
}

pub fn quote_decision<'de, D>(deserializer: D) -> Result<QuoteDecision, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => QuoteDecision::Pending,
        Some(Scalar::Flag(true)) => QuoteDecision::Accepted,
        Some(Scalar::Flag(false)) => QuoteDecision::Rejected,
        Some(Scalar::Text(s)) => QuoteDecision::parse(&s),
        Some(_) => QuoteDecision::Pending,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "id")]
        id: String,
        #[serde(default, deserialize_with = "opt_money")]
        money: Option<Decimal>,
        #[serde(default, deserialize_with = "quote_decision")]
        decision: QuoteDecision,
    }

    fn sample(value: serde_json::Value) -> Sample {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn ids_are_normalised_to_text() {
        assert_eq!(sample(json!({ "id": 17 })).id, "17");
        assert_eq!(sample(json!({ "id": "S-17" })).id, "S-17");
    }

    #[test]
    fn money_accepts_numbers_and_text() {
        assert_eq!(sample(json!({ "id": 1, "money": 120.5 })).money, Some(Decimal::new(12050, 2)));
        assert_eq!(sample(json!({ "id": 1, "money": "80.00" })).money, Some(Decimal::new(8000, 2)));
        assert_eq!(sample(json!({ "id": 1, "money": null })).money, None);
        assert_eq!(sample(json!({ "id": 1 })).money, None);
    }

    #[test]
    fn quote_decision_from_every_wire_shape() {
        assert_eq!(sample(json!({ "id": 1 })).decision, QuoteDecision::Pending);
        assert_eq!(sample(json!({ "id": 1, "decision": null })).decision, QuoteDecision::Pending);
        assert_eq!(sample(json!({ "id": 1, "decision": true })).decision, QuoteDecision::Accepted);
        assert_eq!(sample(json!({ "id": 1, "decision": "RECHAZADA" })).decision, QuoteDecision::Rejected);
        assert_eq!(sample(json!({ "id": 1, "decision": "NO ACEPTADA" })).decision, QuoteDecision::Pending);
        assert_eq!(sample(json!({ "id": 1, "decision": "PENDIENTE" })).decision, QuoteDecision::Pending);
    }
}
