use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string(Movies::Title))
                    .col(string(Movies::Type).default("movie"))
                    .col(string(Movies::Genre).default("[]"))
                    .col(boolean(Movies::Watched).default(false))
                    .col(integer(Movies::Priority).default(3))
                    .col(integer_null(Movies::Rating))
                    .col(string(Movies::Review).default(""))
                    .col(string_null(Movies::Poster))
                    .col(string(Movies::CreatedAt))
                    .col(string(Movies::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_created_at")
                    .table(Movies::Table)
                    .col(Movies::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    Type,
    Genre,
    Watched,
    Priority,
    Rating,
    Review,
    Poster,
    CreatedAt,
    UpdatedAt,
}
