//! Serde helpers for partial-update payloads.

use serde::{Deserialize, Deserializer};

/// Distinguish "field absent" (keep current value) from "field null" (clear).
///
/// Use as `#[serde(default, deserialize_with = "double_option")]` on an
/// `Option<Option<T>>` field: absent → `None`, `null` → `Some(None)`,
/// a value → `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "double_option")]
        value: Option<Option<i64>>,
    }

    #[test]
    fn absent_null_and_value_are_distinguished() {
        let absent: Payload = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.value, None);

        let null: Payload = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(null.value, Some(None));

        let set: Payload = serde_json::from_str(r#"{"value": 3}"#).unwrap();
        assert_eq!(set.value, Some(Some(3)));
    }
}
