pub mod favorite;
pub mod movie_list;
pub mod user;
