pub mod favorite;
pub mod movie_list;
pub mod user;

pub use favorite::{Favorite, NewFavorite};
pub use movie_list::{MovieList, MovieListChanges, NewMovieList};
pub use user::{NewUser, User, UserChanges};
