pub use super::favorites::Entity as Favorites;
pub use super::movie_list_items::Entity as MovieListItems;
pub use super::movie_lists::Entity as MovieLists;
pub use super::users::Entity as Users;
