//! Block-map hygiene: drops entries that have no identity.
//!
//! Dangling child references are left alone; the walks skip them lazily.

use crate::model::RecordMap;

/// Result of a sanitize pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SanitizeReport {
    pub record_map: RecordMap,
    /// Keys of the entries that were dropped, in map order.
    pub dropped: Vec<String>,
}

/// Returns a copy of `record_map` without entries lacking `value` or `value.id`.
pub fn sanitize(record_map: &RecordMap) -> RecordMap {
    sanitize_report(record_map).record_map
}

/// Same as [`sanitize`], also naming what was dropped.
pub fn sanitize_report(record_map: &RecordMap) -> SanitizeReport {
    let mut report = SanitizeReport {
        record_map: RecordMap {
            block: Default::default(),
            other: record_map.other.clone(),
        },
        dropped: Vec::new(),
    };

    for (key, record) in &record_map.block {
        let alive = record.value.as_ref().is_some_and(|v| v.has_identity());
        if alive {
            report.record_map.block.insert(key.clone(), record.clone());
        } else {
            report.dropped.push(key.clone());
        }
    }

    if !report.dropped.is_empty() {
        log::debug!(
            "Sanitize dropped {} of {} block entries",
            report.dropped.len(),
            record_map.len()
        );
    }
    report
}

/// Consuming variant used after fetches, avoiding a full clone.
pub fn sanitize_owned(mut record_map: RecordMap) -> RecordMap {
    let before = record_map.len();
    record_map
        .block
        .retain(|_, record| record.value.as_ref().is_some_and(|v| v.has_identity()));
    let dropped = before - record_map.len();
    if dropped > 0 {
        log::debug!("Sanitize dropped {} of {} block entries", dropped, before);
    }
    record_map
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mixed_map() -> RecordMap {
        RecordMap::from_value(json!({
            "block": {
                "block-1": { "value": { "id": "block-1", "type": "text", "properties": { "title": [["Hello"]] } } },
                "block-2": { "value": { "type": "text", "properties": { "title": [["World"]] } } },
                "block-3": {}
            }
        }))
        .unwrap()
    }

    #[test]
    fn keeps_only_entries_with_identity() {
        let report = sanitize_report(&mixed_map());
        assert_eq!(report.record_map.len(), 1);
        assert!(report.record_map.block.contains_key("block-1"));
        assert_eq!(report.dropped, vec!["block-2", "block-3"]);
    }

    #[test]
    fn owned_variant_agrees() {
        let map = mixed_map();
        assert_eq!(sanitize_owned(map.clone()), sanitize(&map));
    }

    #[test]
    fn input_is_untouched() {
        let map = mixed_map();
        let _ = sanitize(&map);
        assert_eq!(map.len(), 3);
    }
}
