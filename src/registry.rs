//! registry: определения namespace (id → имя), "последняя запись побеждает".
//!
//! Определение namespace: item типа U8 с nsIndex == 0: ключ = имя, байт @24 = id.
//! Id 0 и 255 зарезервированы: запись принимается, но с предупреждением.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::item::{Item, ItemType, Recency};
use crate::page::common::{NS_DEFINITION_INDEX, NS_RESERVED_ANY};

/// Namespace в итоговом результате.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceInfo {
    pub id: u8,
    pub name: String,
}

#[derive(Debug, Clone)]
struct NamespaceRecord {
    name: String,
    recency: Recency,
}

/// Реестр namespace.
#[derive(Debug, Default)]
pub struct NamespaceRegistry {
    records: BTreeMap<u8, NamespaceRecord>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Является ли item определением namespace.
    #[inline]
    pub fn is_definition(item: &Item) -> bool {
        item.ns_index == NS_DEFINITION_INDEX && item.item_type == ItemType::U8
    }

    /// Зарегистрировать определение. Предупреждения: в `diag`.
    pub fn register(&mut self, item: &Item, diag: &mut Vec<String>) {
        let id = item.value_area[0];
        if id == NS_DEFINITION_INDEX || id == NS_RESERVED_ANY {
            diag.push(format!(
                "Page {} entry {}: namespace id {} is reserved ({:?}).",
                item.page_index, item.entry_index, id, item.key
            ));
        }
        for w in &item.warnings {
            diag.push(format!(
                "Page {} entry {}: namespace {:?}: {}",
                item.page_index, item.entry_index, item.key, w
            ));
        }
        self.insert(id, item.key.clone(), item.recency);
    }

    /// Вставить запись, если она новее текущей для этого id.
    pub fn insert(&mut self, id: u8, name: String, recency: Recency) {
        match self.records.get(&id) {
            Some(existing) if existing.recency >= recency => {}
            _ => {
                self.records.insert(id, NamespaceRecord { name, recency });
            }
        }
    }

    /// Имя по id (или `namespace#<id>`).
    pub fn resolve(&self, id: u8) -> String {
        match self.records.get(&id) {
            Some(r) => r.name.clone(),
            None => format!("namespace#{}", id),
        }
    }

    /// Список namespace по возрастанию id.
    pub fn list(&self) -> Vec<NamespaceInfo> {
        self.records
            .iter()
            .map(|(&id, r)| NamespaceInfo { id, name: r.name.clone() })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins_by_recency() {
        let mut reg = NamespaceRegistry::new();
        reg.insert(3, "wifi2".into(), Recency::new(Some(2), 1, 0));
        reg.insert(3, "wifi".into(), Recency::new(Some(1), 0, 5));
        reg.insert(1, "nvs.net80211".into(), Recency::new(Some(1), 0, 0));
        assert_eq!(
            reg.list(),
            vec![
                NamespaceInfo { id: 1, name: "nvs.net80211".into() },
                NamespaceInfo { id: 3, name: "wifi2".into() },
            ]
        );
    }

    #[test]
    fn same_seq_later_entry_wins() {
        let mut reg = NamespaceRegistry::new();
        reg.insert(7, "a".into(), Recency::new(Some(4), 2, 10));
        reg.insert(7, "b".into(), Recency::new(Some(4), 2, 11));
        assert_eq!(reg.resolve(7), "b");
    }

    #[test]
    fn unknown_id_placeholder() {
        let reg = NamespaceRegistry::new();
        assert_eq!(reg.resolve(9), "namespace#9");
        assert!(reg.is_empty());
    }
}
