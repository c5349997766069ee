use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A dish as served by `GET /menu`. Never mutated client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MenuItem {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_bestseller: bool,
}

/// Items flagged as bestsellers, in menu order.
pub fn bestsellers(menu: &[MenuItem]) -> Vec<&MenuItem> {
    menu.iter().filter(|item| item.is_bestseller).collect()
}

/// Identifiers arrive as strings from document stores and as integers from
/// SQL backends; both are kept as strings.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for menu item id, got {}",
            other
        ))),
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_item() {
        let json = r#"[{"_id":"1","name":"Soup","price":5,"is_bestseller":true}]"#;
        let menu: Vec<MenuItem> = serde_json::from_str(json).unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].id, "1");
        assert_eq!(menu[0].price, 5.0);
        assert!(menu[0].is_bestseller);
        assert_eq!(menu[0].description, None);
        assert_eq!(menu[0].image, None);
    }

    #[test]
    fn test_numeric_id_and_missing_flag() {
        let json = r#"{"_id":42,"name":"Bread","description":"Sourdough","price":3.5,"image":"/img/bread.jpg"}"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "42");
        assert!(!item.is_bestseller);
        assert_eq!(item.image.as_deref(), Some("/img/bread.jpg"));
    }

    #[test]
    fn test_null_bestseller_flag() {
        let json = r#"{"id":"7","name":"Tea","price":2,"is_bestseller":null}"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "7");
        assert!(!item.is_bestseller);
    }

    #[test]
    fn test_invalid_id_rejected() {
        let json = r#"{"_id":true,"name":"Tea","price":2}"#;
        assert!(serde_json::from_str::<MenuItem>(json).is_err());
    }

    #[test]
    fn test_bestsellers_keeps_order() {
        let json = r#"[
            {"_id":"1","name":"Soup","price":5,"is_bestseller":true},
            {"_id":"2","name":"Salad","price":7},
            {"_id":"3","name":"Pie","price":4,"is_bestseller":true}
        ]"#;
        let menu: Vec<MenuItem> = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = bestsellers(&menu).iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Soup", "Pie"]);
    }
}
