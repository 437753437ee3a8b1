use sea_orm::entity::prelude::*;

/// Join table between a list and its owner's favorites.
///
/// `user_id` is duplicated here so the favorite foreign key can target the
/// composite (`user_id`, `movie_id`) key, which keeps a list from ever
/// referencing another user's favorite.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movie_list_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub list_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub movie_id: i64,

    pub user_id: i32,

    pub added_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie_lists::Entity",
        from = "Column::ListId",
        to = "super::movie_lists::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    MovieLists,
    #[sea_orm(
        belongs_to = "super::favorites::Entity",
        from = "(Column::UserId, Column::MovieId)",
        to = "(super::favorites::Column::UserId, super::favorites::Column::MovieId)",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Favorites,
}

impl Related<super::movie_lists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieLists.def()
    }
}

impl Related<super::favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
