use contracts::usecases::u501_import_sales::session::EntityKind;
use std::collections::HashMap;

/// Кеш сущностей, созданных за время одной сессии импорта.
///
/// Ключ — `(тип сущности, имя в нижнем регистре)`. Заполняется
/// исключительно действием "создать недостающую сущность": имя,
/// резолвнутое один раз, больше никогда не даёт повторного запроса на
/// создание в той же сессии. Живёт ровно одну сессию.
#[derive(Debug, Clone, Default)]
pub struct EntityCache {
    entries: HashMap<(EntityKind, String), i64>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str) -> String {
        name.trim().to_lowercase()
    }

    pub fn get(&self, kind: EntityKind, name: &str) -> Option<i64> {
        self.entries.get(&(kind, Self::key(name))).copied()
    }

    pub fn put(&mut self, kind: EntityKind, name: &str, id: i64) {
        self.entries.insert((kind, Self::key(name)), id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut cache = EntityCache::new();
        cache.put(EntityKind::Customer, "Acme", 501);

        assert_eq!(cache.get(EntityKind::Customer, "acme"), Some(501));
        assert_eq!(cache.get(EntityKind::Customer, "ACME"), Some(501));
        assert_eq!(cache.get(EntityKind::Customer, " Acme "), Some(501));
    }

    #[test]
    fn kinds_do_not_collide() {
        let mut cache = EntityCache::new();
        cache.put(EntityKind::Customer, "Acme", 501);

        assert_eq!(cache.get(EntityKind::Product, "Acme"), None);
        assert_eq!(cache.get(EntityKind::Offer, "Acme"), None);
    }

    #[test]
    fn put_overwrites_same_key() {
        let mut cache = EntityCache::new();
        cache.put(EntityKind::Product, "Wheat", 1);
        cache.put(EntityKind::Product, "WHEAT", 2);

        assert_eq!(cache.get(EntityKind::Product, "wheat"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn new_cache_is_empty() {
        // Новая сессия — новый кеш: имена прошлых сессий не резолвятся
        let cache = EntityCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get(EntityKind::Customer, "Acme"), None);
    }
}
