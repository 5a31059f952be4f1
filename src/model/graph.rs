use super::block::Block;
use super::record_map::{BlockValue, RecordMap};
use crate::types::canonical_block_key;
use std::collections::HashMap;

/// Typed, canonically keyed index over a record map's block table.
///
/// Built once per page and shared by the text and outline walks. Entries
/// without a usable id never make it into the index, so the walks see the
/// same thing with or without a prior sanitize pass.
#[derive(Debug, Clone)]
pub struct BlockGraph<'a> {
    source: &'a RecordMap,
    blocks: HashMap<String, Block<'a>>,
}

impl<'a> BlockGraph<'a> {
    pub fn new(record_map: &'a RecordMap) -> Self {
        let mut blocks = HashMap::with_capacity(record_map.len());
        for (key, record) in &record_map.block {
            let Some(block) = record.value.as_ref().and_then(Block::from_value) else {
                continue;
            };
            blocks.entry(canonical_block_key(key)).or_insert(block);
        }
        Self {
            source: record_map,
            blocks,
        }
    }

    /// Looks a block up by id in either of its textual forms.
    pub fn get(&self, id: &str) -> Option<&Block<'a>> {
        self.blocks.get(&canonical_block_key(id))
    }

    /// Raw value of the valid block stored under `id`, in either id form.
    ///
    /// Unlike [`BlockGraph::get`] this tells an absent `content` key apart
    /// from an empty list.
    pub fn value(&self, id: &str) -> Option<&'a BlockValue> {
        let key = canonical_block_key(id);
        let source: &'a RecordMap = self.source;
        source
            .block
            .iter()
            .filter(|(raw_key, _)| canonical_block_key(raw_key) == key)
            .find_map(|(_, record)| {
                record
                    .value
                    .as_ref()
                    .filter(|value| Block::from_value(value).is_some())
            })
    }

    /// Valid blocks in record-map order.
    pub fn blocks_in_order(&self) -> impl Iterator<Item = Block<'a>> + 'a {
        let source: &'a RecordMap = self.source;
        source
            .block
            .values()
            .filter_map(|record| record.value.as_ref().and_then(Block::from_value))
    }

    /// Number of valid blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookups_accept_both_id_forms() {
        let map = RecordMap::from_value(json!({
            "block": {
                "550e8400-e29b-41d4-a716-446655440000": {
                    "value": { "id": "550e8400-e29b-41d4-a716-446655440000", "type": "page" }
                }
            }
        }))
        .unwrap();
        let graph = BlockGraph::new(&map);

        assert!(graph.get("550e8400e29b41d4a716446655440000").is_some());
        assert!(graph.get("550e8400-e29b-41d4-a716-446655440000").is_some());
        assert!(graph.get("missing").is_none());
    }

    #[test]
    fn invalid_entries_are_not_indexed() {
        let map = RecordMap::from_value(json!({
            "block": {
                "ok": { "value": { "id": "ok", "type": "text" } },
                "no-id": { "value": { "type": "text" } },
                "no-value": {}
            }
        }))
        .unwrap();
        let graph = BlockGraph::new(&map);

        assert_eq!(graph.len(), 1);
        assert!(graph.get("no-id").is_none());
        assert!(graph.get("no-value").is_none());
        assert_eq!(graph.blocks_in_order().count(), 1);
    }
}
