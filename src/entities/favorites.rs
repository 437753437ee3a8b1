use sea_orm::entity::prelude::*;

/// One row per (user, movie). The movie id comes from the catalog provider.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "favorites")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub movie_id: i64,

    pub title: String,

    pub thumbnail: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::movie_list_items::Entity")]
    MovieListItems,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::movie_list_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieListItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
