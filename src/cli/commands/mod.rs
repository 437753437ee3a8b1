mod user;

pub use user::{cmd_user_create, cmd_user_list, cmd_user_promote};
