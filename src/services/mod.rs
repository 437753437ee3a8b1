pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, AuthSession};
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub use catalog_service::{CatalogError, CatalogProvider};

pub mod favorite_service;
pub mod favorite_service_impl;
pub use favorite_service::{DeleteResult, FavoriteError, FavoriteService};
pub use favorite_service_impl::SeaOrmFavoriteService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserError, UserService};
pub use user_service_impl::SeaOrmUserService;
