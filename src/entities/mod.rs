pub mod prelude;

pub mod favorites;
pub mod movie_list_items;
pub mod movie_lists;
pub mod users;
