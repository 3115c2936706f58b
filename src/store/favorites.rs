use std::rc::Rc;

use crate::store::{KeyValueStore, load_list, save_list};

pub const FAVORITES_KEY: &str = "favorites";

/// Favorite category ids.
#[derive(Clone)]
pub struct Favorites {
    backend: Rc<dyn KeyValueStore>,
}

impl Favorites {
    pub fn new(backend: Rc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn load(&self) -> Vec<String> {
        load_list(self.backend.as_ref(), FAVORITES_KEY)
    }

    /// Flip membership of `category_id` and persist. Returns the new list.
    pub fn toggle(&self, category_id: &str) -> Vec<String> {
        let mut favorites = self.load();
        if let Some(pos) = favorites.iter().position(|f| f == category_id) {
            favorites.remove(pos);
        } else {
            favorites.push(category_id.to_string());
        }
        save_list(self.backend.as_ref(), FAVORITES_KEY, &favorites);
        favorites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn toggle_adds_then_removes() {
        let f = Favorites::new(Rc::new(MemoryStore::new()));
        assert_eq!(f.toggle("math"), vec!["math".to_string()]);
        assert_eq!(f.toggle("art"), vec!["math".to_string(), "art".to_string()]);
        assert_eq!(f.toggle("math"), vec!["art".to_string()]);
        assert_eq!(f.load(), vec!["art".to_string()]);
    }

    #[test]
    fn stored_as_plain_id_array() {
        let backend = Rc::new(MemoryStore::new());
        let f = Favorites::new(backend.clone());
        f.toggle("tech_db");
        assert_eq!(backend.read(FAVORITES_KEY).as_deref(), Some("[\"tech_db\"]"));
    }
}
