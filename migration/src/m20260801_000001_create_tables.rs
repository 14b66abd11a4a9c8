use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .col(
                        ColumnDef::new(Customer::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customer::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Customer::Business).string().not_null())
                    .col(ColumnDef::new(Customer::Siren).big_integer().not_null())
                    .col(ColumnDef::new(Customer::Logo).string())
                    .col(ColumnDef::new(Customer::Address).string().not_null())
                    .col(ColumnDef::new(Customer::Zipcode).string().not_null())
                    .col(ColumnDef::new(Customer::City).string().not_null())
                    .col(ColumnDef::new(Customer::Country).string())
                    .col(ColumnDef::new(Customer::FirstName).string().not_null())
                    .col(ColumnDef::new(Customer::LastName).string().not_null())
                    .col(ColumnDef::new(Customer::Email).string().not_null())
                    .col(
                        ColumnDef::new(Customer::AccountId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .col(
                        ColumnDef::new(Product::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Product::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Product::Name).string().not_null())
                    .col(ColumnDef::new(Product::Description).text().not_null())
                    .col(ColumnDef::new(Product::ShortDesc).string().not_null())
                    .col(ColumnDef::new(Product::Picture).string().not_null())
                    .col(
                        ColumnDef::new(Product::Price)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Quotation::Table)
                    .col(
                        ColumnDef::new(Quotation::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Quotation::Date).date_time().not_null())
                    .col(ColumnDef::new(Quotation::Status).string().not_null())
                    .col(ColumnDef::new(Quotation::CustomerId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-quotation-customer_id")
                            .from(Quotation::Table, Quotation::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuotationLine::Table)
                    .col(
                        ColumnDef::new(QuotationLine::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuotationLine::QuotationId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuotationLine::ProductId).integer().not_null())
                    .col(ColumnDef::new(QuotationLine::Quantity).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-quotation_line-quotation_id")
                            .from(QuotationLine::Table, QuotationLine::QuotationId)
                            .to(Quotation::Table, Quotation::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-quotation_line-product_id")
                            .from(QuotationLine::Table, QuotationLine::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bill::Table)
                    .col(
                        ColumnDef::new(Bill::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bill::Date).date_time().not_null())
                    .col(ColumnDef::new(Bill::Status).string().not_null())
                    .col(
                        ColumnDef::new(Bill::QuotationId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bill-quotation_id")
                            .from(Bill::Table, Bill::QuotationId)
                            .to(Quotation::Table, Quotation::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BillLine::Table)
                    .col(
                        ColumnDef::new(BillLine::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BillLine::BillId).integer().not_null())
                    .col(ColumnDef::new(BillLine::ProductId).integer().not_null())
                    .col(ColumnDef::new(BillLine::Quantity).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bill_line-bill_id")
                            .from(BillLine::Table, BillLine::BillId)
                            .to(Bill::Table, Bill::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bill_line-product_id")
                            .from(BillLine::Table, BillLine::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-quotation-customer_id")
                    .table(Quotation::Table)
                    .col(Quotation::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-quotation_line-quotation_id")
                    .table(QuotationLine::Table)
                    .col(QuotationLine::QuotationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bill_line-bill_id")
                    .table(BillLine::Table)
                    .col(BillLine::BillId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BillLine::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bill::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuotationLine::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quotation::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Product::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customer::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Customer {
    Table,
    Id,
    Slug,
    Business,
    Siren,
    Logo,
    Address,
    Zipcode,
    City,
    Country,
    FirstName,
    LastName,
    Email,
    AccountId,
}

#[derive(Iden)]
enum Product {
    Table,
    Id,
    Code,
    Name,
    Description,
    ShortDesc,
    Picture,
    Price,
}

#[derive(Iden)]
enum Quotation {
    Table,
    Id,
    Date,
    Status,
    CustomerId,
}

#[derive(Iden)]
enum QuotationLine {
    Table,
    Id,
    QuotationId,
    ProductId,
    Quantity,
}

#[derive(Iden)]
enum Bill {
    Table,
    Id,
    Date,
    Status,
    QuotationId,
}

#[derive(Iden)]
enum BillLine {
    Table,
    Id,
    BillId,
    ProductId,
    Quantity,
}
