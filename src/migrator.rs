use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_categories_table::Migration),
            Box::new(m20240101_000003_create_clients_table::Migration),
            Box::new(m20240101_000004_create_co_clients_table::Migration),
            Box::new(m20240101_000005_create_products_table::Migration),
            Box::new(m20240101_000006_create_product_photos_table::Migration),
            Box::new(m20240101_000007_create_commands_table::Migration),
            Box::new(m20240101_000008_create_command_details_table::Migration),
        ]
    }
}

mod m20240101_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::FirstName).string().not_null())
                        .col(ColumnDef::new(Users::LastName).string().not_null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Email,
        PasswordHash,
        FirstName,
        LastName,
        CreatedAt,
    }
}

mod m20240101_000002_create_categories_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_categories_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Categories::Name).string().not_null())
                        .col(ColumnDef::new(Categories::Description).string().null())
                        .col(
                            ColumnDef::new(Categories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Categories {
        Table,
        Id,
        Name,
        Description,
        CreatedAt,
    }
}

mod m20240101_000003_create_clients_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_clients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Clients::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Clients::FirstName).string().not_null())
                        .col(ColumnDef::new(Clients::LastName).string().not_null())
                        .col(ColumnDef::new(Clients::Email).string().not_null())
                        .col(ColumnDef::new(Clients::PhoneNumber).string().not_null())
                        .col(ColumnDef::new(Clients::Address).string().not_null())
                        .col(
                            ColumnDef::new(Clients::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Clients {
        Table,
        Id,
        FirstName,
        LastName,
        Email,
        PhoneNumber,
        Address,
        CreatedAt,
    }
}

mod m20240101_000004_create_co_clients_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_co_clients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CoClients::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CoClients::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CoClients::FirstName).string().not_null())
                        .col(ColumnDef::new(CoClients::LastName).string().not_null())
                        .col(ColumnDef::new(CoClients::Email).string().not_null())
                        .col(ColumnDef::new(CoClients::PhoneNumber).string().not_null())
                        .col(ColumnDef::new(CoClients::Address).string().not_null())
                        .col(ColumnDef::new(CoClients::Rib).string().not_null())
                        .col(
                            ColumnDef::new(CoClients::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CoClients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum CoClients {
        Table,
        Id,
        FirstName,
        LastName,
        Email,
        PhoneNumber,
        Address,
        Rib,
        CreatedAt,
    }
}

mod m20240101_000005_create_products_table {
    use super::m20240101_000002_create_categories_table::Categories;
    use super::m20240101_000004_create_co_clients_table::CoClients;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Description).string().null())
                        .col(ColumnDef::new(Products::SalePrice).decimal().not_null())
                        .col(ColumnDef::new(Products::PurchasePrice).decimal().null())
                        .col(
                            ColumnDef::new(Products::StockQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::IsConsigned)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Products::ConsignmentPercent)
                                .decimal()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Products::Surcharge)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::Gain)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::IsAvailable)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Products::CategoryId).uuid().not_null())
                        .col(ColumnDef::new(Products::CoClientId).uuid().null())
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_category_id")
                                .from(Products::Table, Products::CategoryId)
                                .to(Categories::Table, Categories::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_co_client_id")
                                .from(Products::Table, Products::CoClientId)
                                .to(CoClients::Table, CoClients::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_category_id")
                        .table(Products::Table)
                        .col(Products::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_co_client_id")
                        .table(Products::Table)
                        .col(Products::CoClientId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Products {
        Table,
        Id,
        Name,
        Description,
        SalePrice,
        PurchasePrice,
        StockQuantity,
        IsConsigned,
        ConsignmentPercent,
        Surcharge,
        Gain,
        IsAvailable,
        CategoryId,
        CoClientId,
        CreatedAt,
    }
}

mod m20240101_000006_create_product_photos_table {
    use super::m20240101_000005_create_products_table::Products;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_product_photos_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductPhotos::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductPhotos::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductPhotos::ProductId).uuid().not_null())
                        .col(ColumnDef::new(ProductPhotos::Path).string().not_null())
                        .col(
                            ColumnDef::new(ProductPhotos::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_photos_product_id")
                                .from(ProductPhotos::Table, ProductPhotos::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_product_photos_product_id")
                        .table(ProductPhotos::Table)
                        .col(ProductPhotos::ProductId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductPhotos::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ProductPhotos {
        Table,
        Id,
        ProductId,
        Path,
        CreatedAt,
    }
}

mod m20240101_000007_create_commands_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_commands_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Commands::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Commands::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Commands::ProductCount).integer().not_null())
                        .col(
                            ColumnDef::new(Commands::SalePrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Commands::PurchasePrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Commands::Status).string().not_null())
                        .col(
                            ColumnDef::new(Commands::DeliveryAddress)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Commands::DeliveryDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Commands::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_commands_status")
                        .table(Commands::Table)
                        .col(Commands::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Commands::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Commands {
        Table,
        Id,
        ProductCount,
        SalePrice,
        PurchasePrice,
        Status,
        DeliveryAddress,
        DeliveryDate,
        CreatedAt,
    }
}

mod m20240101_000008_create_command_details_table {
    use super::m20240101_000003_create_clients_table::Clients;
    use super::m20240101_000004_create_co_clients_table::CoClients;
    use super::m20240101_000005_create_products_table::Products;
    use super::m20240101_000007_create_commands_table::Commands;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_command_details_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CommandDetails::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CommandDetails::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CommandDetails::CommandId).uuid().not_null())
                        .col(ColumnDef::new(CommandDetails::ProductId).uuid().not_null())
                        .col(ColumnDef::new(CommandDetails::ClientId).uuid().not_null())
                        .col(ColumnDef::new(CommandDetails::CoClientId).uuid().null())
                        .col(
                            ColumnDef::new(CommandDetails::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_command_details_command_id")
                                .from(CommandDetails::Table, CommandDetails::CommandId)
                                .to(Commands::Table, Commands::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_command_details_product_id")
                                .from(CommandDetails::Table, CommandDetails::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_command_details_client_id")
                                .from(CommandDetails::Table, CommandDetails::ClientId)
                                .to(Clients::Table, Clients::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_command_details_co_client_id")
                                .from(CommandDetails::Table, CommandDetails::CoClientId)
                                .to(CoClients::Table, CoClients::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_command_details_command_id")
                        .table(CommandDetails::Table)
                        .col(CommandDetails::CommandId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_command_details_product_id")
                        .table(CommandDetails::Table)
                        .col(CommandDetails::ProductId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CommandDetails::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum CommandDetails {
        Table,
        Id,
        CommandId,
        ProductId,
        ClientId,
        CoClientId,
        CreatedAt,
    }
}
