use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A record map as returned by Notion's private API and cached per page.
///
/// Only the `block` table is interpreted. Other tables (`collection`,
/// `notion_user`, ...) and unknown fields are carried through untouched so
/// a sanitized map can be written back out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMap {
    #[serde(default)]
    pub block: IndexMap<String, BlockRecord>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// One entry of the block table: the block value plus record metadata
/// (`role`, `spaceId`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<BlockValue>,
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

/// The raw fields of a block.
///
/// Field deserialization is lenient: a field of the wrong JSON type is read
/// as absent instead of failing the whole map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockValue {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub block_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub properties: Option<Map<String, Value>>,
    #[serde(
        default,
        deserialize_with = "lenient_id_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockValue {
    /// Whether the value carries the identity a live block needs.
    pub fn has_identity(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }

    /// Pointer of a synced-block reference, if present and non-empty.
    pub fn transclusion_pointer(&self) -> Option<&str> {
        self.format
            .as_ref()?
            .get("transclusion_reference_pointer")?
            .get("id")?
            .as_str()
            .filter(|id| !id.trim().is_empty())
    }
}

impl RecordMap {
    /// Parses a record map from JSON text.
    ///
    /// Accepts both a bare record map and the `{ "recordMap": {...} }`
    /// envelope the API and some caches wrap it in.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Converts an already parsed JSON document into a record map.
    pub fn from_value(mut value: Value) -> Result<Self, serde_json::Error> {
        if let Some(inner) = value.get_mut("recordMap").map(Value::take) {
            return serde_json::from_value(inner);
        }
        serde_json::from_value(value)
    }

    /// Number of entries in the block table, valid or not.
    pub fn len(&self) -> usize {
        self.block.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    /// Inserts a block value under its own id.
    pub fn insert(&mut self, value: BlockValue) {
        let key = value.id.clone().unwrap_or_default();
        self.block.insert(
            key,
            BlockRecord {
                value: Some(value),
                meta: Map::new(),
            },
        );
    }

    /// Merges the block table of `other` into this map.
    ///
    /// Entries already present win, so a later chunk cannot replace a block
    /// with a partial copy of itself.
    pub fn merge(&mut self, other: RecordMap) {
        for (key, record) in other.block {
            self.block.entry(key).or_insert(record);
        }
        for (table, value) in other.other {
            self.other.entry(table).or_insert(value);
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_object<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    })
}

fn lenient_id_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_envelope_and_bare_maps() {
        let bare = json!({ "block": { "a": { "value": { "id": "a", "type": "text" } } } });
        let wrapped = json!({ "recordMap": bare.clone(), "cursor": { "stack": [] } });

        let from_bare = RecordMap::from_value(bare).unwrap();
        let from_wrapped = RecordMap::from_value(wrapped).unwrap();
        assert_eq!(from_bare, from_wrapped);
        assert_eq!(from_bare.len(), 1);
    }

    #[test]
    fn wrong_field_types_read_as_absent() {
        let map = RecordMap::from_value(json!({
            "block": {
                "a": { "value": { "id": 7, "type": ["text"], "content": ["b", 3, null, "c"] } }
            }
        }))
        .unwrap();

        let value = map.block["a"].value.as_ref().unwrap();
        assert_eq!(value.id, None);
        assert_eq!(value.block_type, None);
        assert_eq!(value.content, Some(vec!["b".to_string(), "c".to_string()]));
        assert!(!value.has_identity());
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let source = json!({
            "block": {
                "a": {
                    "role": "reader",
                    "value": { "id": "a", "type": "text", "version": 12, "alive": true }
                }
            },
            "collection": { "c": { "value": { "id": "c" } } }
        });

        let map = RecordMap::from_value(source.clone()).unwrap();
        assert_eq!(serde_json::to_value(&map).unwrap(), source);
    }

    #[test]
    fn merge_keeps_existing_entries() {
        let mut first = RecordMap::default();
        first.insert(BlockValue {
            id: Some("a".into()),
            block_type: Some("text".into()),
            ..Default::default()
        });

        let mut second = RecordMap::default();
        second.insert(BlockValue {
            id: Some("a".into()),
            ..Default::default()
        });
        second.insert(BlockValue {
            id: Some("b".into()),
            ..Default::default()
        });

        first.merge(second);
        assert_eq!(first.len(), 2);
        assert_eq!(
            first.block["a"].value.as_ref().unwrap().block_type.as_deref(),
            Some("text")
        );
    }

    #[test]
    fn transclusion_pointer_requires_non_empty_id() {
        let with_pointer = BlockValue {
            format: Some(json!({ "transclusion_reference_pointer": { "id": "target" } })),
            ..Default::default()
        };
        let blank_pointer = BlockValue {
            format: Some(json!({ "transclusion_reference_pointer": { "id": " " } })),
            ..Default::default()
        };
        assert_eq!(with_pointer.transclusion_pointer(), Some("target"));
        assert_eq!(blank_pointer.transclusion_pointer(), None);
        assert_eq!(BlockValue::default().transclusion_pointer(), None);
    }
}
