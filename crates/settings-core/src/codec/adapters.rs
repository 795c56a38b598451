//! Serde adapters for [`PersistentList`] and [`PersistentMap`].
//!
//! Serde natively understands plain sequences and maps.  These impls teach
//! it the two immutable containers by delegating every element (or entry) to
//! that element's own `Serialize` / `Deserialize` impl and rebuilding the
//! immutable container on the way back in.
//!
//! Each container is announced to the serializer as a newtype struct with a
//! distinguishing logical name ([`PERSISTENT_LIST_NAME`],
//! [`PERSISTENT_MAP_NAME`]).  Self-describing formats such as JSON treat a
//! newtype as its inner value, so the bytes are identical to a plain array or
//! object; formats that do record type names can tell the two apart.
//!
//! A failing element makes the whole container fail with the deserializer's
//! error.  There is no partial recovery at this layer.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::domain::persistent::{PersistentList, PersistentMap};

/// Logical type name under which [`PersistentList`] is serialized.
pub const PERSISTENT_LIST_NAME: &str = "PersistentList";

/// Logical type name under which [`PersistentMap`] is serialized.
pub const PERSISTENT_MAP_NAME: &str = "PersistentMap";

/// Upper bound on pre-allocation from an untrusted size hint.
const MAX_PREALLOC: usize = 4096;

// ── List adapter ──────────────────────────────────────────────────────────────

/// Writes the elements as a plain sequence, in order.
struct ListElements<'a, T>(&'a [T]);

impl<T: Serialize> Serialize for ListElements<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in self.0 {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl<T: Serialize> Serialize for PersistentList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(PERSISTENT_LIST_NAME, &ListElements(self.as_slice()))
    }
}

struct ListVisitor<T> {
    marker: PhantomData<fn() -> T>,
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for ListVisitor<T> {
    type Value = PersistentList<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(MAX_PREALLOC));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(PersistentList::from(items))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PersistentList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_newtype_struct(
            PERSISTENT_LIST_NAME,
            ListVisitor {
                marker: PhantomData,
            },
        )
    }
}

// ── Map adapter ───────────────────────────────────────────────────────────────

/// Writes the entries one by one, key then value.
struct MapEntries<'a, K, V>(&'a PersistentMap<K, V>);

impl<K: Serialize, V: Serialize> Serialize for MapEntries<'_, K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K: Serialize, V: Serialize> Serialize for PersistentMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(PERSISTENT_MAP_NAME, &MapEntries(self))
    }
}

struct MapVisitor<K, V> {
    marker: PhantomData<fn() -> (K, V)>,
}

impl<'de, K, V> Visitor<'de> for MapVisitor<K, V>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
{
    type Value = PersistentMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = HashMap::with_capacity(access.size_hint().unwrap_or(0).min(MAX_PREALLOC));
        // A repeated key keeps its last value.
        while let Some((key, value)) = access.next_entry()? {
            entries.insert(key, value);
        }
        Ok(PersistentMap::from(entries))
    }
}

impl<'de, K, V> Deserialize<'de> for PersistentMap<K, V>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_newtype_struct(
            PERSISTENT_MAP_NAME,
            MapVisitor {
                marker: PhantomData,
            },
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::{Location, ThemeSetting};

    #[test]
    fn test_list_of_three_locations_round_trips_in_order() {
        // Arrange
        let list: PersistentList<Location> = vec![
            Location::new(0.1, 0.2),
            Location::new(-45.0, 170.5),
            Location::new(0.1, 0.2),
        ]
        .into();

        // Act
        let json = serde_json::to_string(&list).expect("serialize");
        let restored: PersistentList<Location> = serde_json::from_str(&json).expect("deserialize");

        // Assert
        assert_eq!(restored, list);
        assert_eq!(restored.get(1), Some(&Location::new(-45.0, 170.5)));
    }

    #[test]
    fn test_list_is_wire_identical_to_plain_vec() {
        let items = vec![Location::new(1.0, 2.0), Location::new(3.0, 4.0)];
        let list: PersistentList<Location> = items.clone().into();

        assert_eq!(
            serde_json::to_string(&list).unwrap(),
            serde_json::to_string(&items).unwrap()
        );
    }

    #[test]
    fn test_list_reads_plain_json_array() {
        let list: PersistentList<u32> = serde_json::from_str("[3, 1, 2]").unwrap();
        assert_eq!(list.as_slice(), &[3, 1, 2]);
    }

    #[test]
    fn test_list_with_bad_element_fails_whole_decode() {
        // Arrange: second element is missing `lng`
        let json = r#"[{"lat":1.0,"lng":2.0},{"lat":3.0}]"#;

        // Act
        let result: Result<PersistentList<Location>, _> = serde_json::from_str(json);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_list_rejects_non_array() {
        let result: Result<PersistentList<u32>, _> = serde_json::from_str(r#"{"a":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_map_with_two_keys_round_trips() {
        // Arrange
        let map = PersistentMap::new()
            .insert("a".to_string(), ThemeSetting::new("1", "First", true))
            .insert("b".to_string(), ThemeSetting::new("2", "Second", false));

        // Act
        let json = serde_json::to_string(&map).expect("serialize");
        let restored: PersistentMap<String, ThemeSetting> =
            serde_json::from_str(&json).expect("deserialize");

        // Assert
        assert_eq!(restored, map);
        assert_eq!(restored.get("b").map(|t| t.is_enabled), Some(false));
    }

    #[test]
    fn test_map_is_wire_identical_to_plain_hash_map() {
        let map = PersistentMap::new().insert("only".to_string(), 7u32);
        let plain: HashMap<String, u32> = [("only".to_string(), 7)].into_iter().collect();

        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            serde_json::to_value(&plain).unwrap()
        );
    }

    #[test]
    fn test_map_repeated_key_keeps_last_value() {
        let map: PersistentMap<String, u32> = serde_json::from_str(r#"{"k":1,"k":2}"#).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("k"), Some(&2));
    }

    #[test]
    fn test_map_with_bad_value_fails_whole_decode() {
        let json = r#"{"a":{"id":"1","title":"t","isEnabled":"yes"}}"#;
        let result: Result<PersistentMap<String, ThemeSetting>, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
