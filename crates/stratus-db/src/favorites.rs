use tracing::debug;

use stratus_types::UserId;
use stratus_types::models::FavoriteLocation;

use crate::models::FavoritesDoc;
use crate::{Database, Document, Result};

impl Database {
    /// A user's favorites in insertion order.
    pub fn list_favorites(&self, user_id: UserId) -> Vec<FavoriteLocation> {
        let mut favorites: FavoritesDoc = self.read(Document::Favorites);
        favorites.remove(&user_id).unwrap_or_default()
    }

    /// Append a favorite. Duplicates are kept.
    pub fn add_favorite(&self, user_id: UserId, city: &str, country: &str) -> Result<()> {
        self.update(Document::Favorites, |favorites: &mut FavoritesDoc| {
            favorites
                .entry(user_id)
                .or_default()
                .push(FavoriteLocation::new(city, country));
        })
    }

    /// Drop every favorite matching city and country exactly.
    pub fn remove_favorite(&self, user_id: UserId, city: &str, country: &str) -> Result<()> {
        let removed = self.update(Document::Favorites, |favorites: &mut FavoritesDoc| {
            let entries = favorites.entry(user_id).or_default();
            let before = entries.len();
            entries.retain(|f| !(f.city == city && f.country == country));
            before - entries.len()
        })?;

        debug!(user_id, removed, "Removed favorite {},{}", city, country);
        Ok(())
    }
}
