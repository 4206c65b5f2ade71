//! Core types for the shared category catalog.

/// Alias for category row IDs.
pub type CategoryId = i64;

/// A category from the global catalog shared by all users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
    pub color: String,
}

/// A catalog category annotated with one user's relationship to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryWithUserState {
    pub category: Category,
    /// Whether the user has added this category to their collection.
    pub in_collection: bool,
    /// Only meaningful when `in_collection` is true.
    pub is_favorite: bool,
}
