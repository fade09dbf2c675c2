//! Shared test fixtures: a minimal entity to render real SQL against.

pub mod customer {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "customers")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub age: i32,
        pub team: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Render the query a handler built, with values inlined.
pub fn to_sql(mut query: sea_orm::Select<customer::Entity>) -> String {
    use sea_orm::QueryTrait;
    use sea_orm::sea_query::SqliteQueryBuilder;
    QueryTrait::query(&mut query).to_string(SqliteQueryBuilder)
}
