use comptoir_service::{
    connect, CustomerInput, Mutation, ProductInput, Query, QuotationInput, QuotationLineInput,
    ServiceError,
};
use entity::prelude::*;
use entity::sea_orm_active_enums::Status;
use rust_decimal_macros::dec;
use sea_orm::{ConnectionTrait, DbConn, EntityTrait, PaginatorTrait, Schema};

async fn setup() -> DbConn {
    let db = connect("sqlite::memory:")
        .await
        .expect("could not open database");
    let schema = Schema::new(db.get_database_backend());
    for stmt in [
        schema.create_table_from_entity(Customer),
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(Quotation),
        schema.create_table_from_entity(QuotationLine),
        schema.create_table_from_entity(Bill),
        schema.create_table_from_entity(BillLine),
    ] {
        db.execute(db.get_database_backend().build(&stmt))
            .await
            .expect("could not create table");
    }
    db
}

/// One customer, two products (P1 at 10.0, P2 at 2.5) and a quotation
/// holding P1 x 2 and P2 x 1.
async fn seed_quotation(db: &DbConn) -> i32 {
    let customer = Mutation::create_customer(
        db,
        CustomerInput {
            business: "Maison Dupont".to_owned(),
            siren: 732829320,
            logo: None,
            address: "3 rue de la Paix".to_owned(),
            zipcode: "75002".to_owned(),
            city: "Paris".to_owned(),
            country: None,
            first_name: "Jean".to_owned(),
            last_name: "Dupont".to_owned(),
            email: "jean@dupont.example".to_owned(),
            account_id: 41,
        },
    )
    .await
    .expect("could not insert customer");

    for (code, price) in [("P1", dec!(10.0)), ("P2", dec!(2.5))] {
        Mutation::create_product(
            db,
            ProductInput {
                code: code.to_owned(),
                name: format!("Product {code}"),
                description: format!("Description of {code}."),
                short_desc: format!("short {code}"),
                picture: format!("{code}.png"),
                price,
            },
        )
        .await
        .expect("could not insert product");
    }

    Mutation::create_quotation(
        db,
        QuotationInput {
            customer_id: customer.id,
            status: None,
            lines: vec![
                QuotationLineInput {
                    product_code: "P1".to_owned(),
                    quantity: 2,
                },
                QuotationLineInput {
                    product_code: "P2".to_owned(),
                    quantity: 1,
                },
            ],
        },
    )
    .await
    .expect("could not create quotation")
    .quotation
    .id
}

fn multiset(pairs: impl IntoIterator<Item = (i32, i32)>) -> Vec<(i32, i32)> {
    let mut pairs: Vec<(i32, i32)> = pairs.into_iter().collect();
    pairs.sort_unstable();
    pairs
}

#[tokio::test]
async fn billing_copies_the_quotation_lines() {
    let db = &setup().await;
    let quotation_id = seed_quotation(db).await;

    let bill = Mutation::bill_quotation(db, quotation_id)
        .await
        .expect("could not bill quotation");

    assert_eq!(bill.bill.quotation_id, quotation_id);
    assert_eq!(bill.bill.status, Status::AwaitingSettlement);
    assert_eq!(bill.quotation.id, quotation_id);

    let quotation = Query::load_quotation(db, quotation_id)
        .await
        .expect("could not load quotation");
    let expected = multiset(
        quotation
            .lines
            .iter()
            .map(|(line, _)| (line.product_id, line.quantity)),
    );
    let copied = multiset(
        bill.lines
            .iter()
            .map(|(line, _)| (line.product_id, line.quantity)),
    );
    assert_eq!(copied, expected);

    // Same lines, same prices, same totals.
    assert_eq!(bill.totals(), quotation.totals());
    assert_eq!(bill.totals().total, dec!(22.5));
    assert_eq!(bill.totals().tax_inclusive, dec!(27.135));
}

#[tokio::test]
async fn a_quotation_can_only_be_billed_once() {
    let db = &setup().await;
    let quotation_id = seed_quotation(db).await;

    Mutation::bill_quotation(db, quotation_id)
        .await
        .expect("could not bill quotation");

    let err = Mutation::bill_quotation(db, quotation_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::AlreadyBilled(id) if id == quotation_id));

    assert_eq!(Bill::find().count(db).await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_billing_produces_one_bill_and_one_conflict() {
    let db = &setup().await;
    let quotation_id = seed_quotation(db).await;

    let (first, second) = tokio::join!(
        Mutation::bill_quotation(db, quotation_id),
        Mutation::bill_quotation(db, quotation_id),
    );

    let mut errors = Vec::new();
    for outcome in [first, second] {
        if let Err(err) = outcome {
            errors.push(err);
        }
    }
    assert_eq!(errors.len(), 1);
    // The loser sees the conflict, never a bare database error.
    assert!(matches!(errors[0], ServiceError::AlreadyBilled(id) if id == quotation_id));

    assert_eq!(Bill::find().count(db).await.unwrap(), 1);
}

#[tokio::test]
async fn billing_a_missing_quotation_is_not_found() {
    let db = &setup().await;

    let err = Mutation::bill_quotation(db, 99).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("quotation")));
}

#[tokio::test]
async fn the_bill_keeps_its_snapshot_when_the_quotation_changes() {
    let db = &setup().await;
    let quotation_id = seed_quotation(db).await;

    let bill = Mutation::bill_quotation(db, quotation_id)
        .await
        .expect("could not bill quotation");
    assert_eq!(bill.lines.len(), 2);

    Mutation::add_quotation_line(
        db,
        quotation_id,
        QuotationLineInput {
            product_code: "P2".to_owned(),
            quantity: 5,
        },
    )
    .await
    .expect("could not add line");

    let quotation = Query::load_quotation(db, quotation_id)
        .await
        .expect("could not load quotation");
    assert_eq!(quotation.lines.len(), 3);

    let reloaded = Query::load_bill(db, bill.bill.id)
        .await
        .expect("could not load bill");
    assert_eq!(reloaded.lines.len(), 2);
    assert_eq!(reloaded.totals().total, dec!(22.5));
}

#[tokio::test]
async fn deleting_the_quotation_removes_its_bill() {
    let db = &setup().await;
    let quotation_id = seed_quotation(db).await;

    Mutation::bill_quotation(db, quotation_id)
        .await
        .expect("could not bill quotation");

    Mutation::delete_quotation(db, quotation_id)
        .await
        .expect("could not delete quotation");

    assert_eq!(Bill::find().count(db).await.unwrap(), 0);
    assert_eq!(BillLine::find().count(db).await.unwrap(), 0);
}

#[tokio::test]
async fn deleting_the_bill_leaves_the_quotation_alone() {
    let db = &setup().await;
    let quotation_id = seed_quotation(db).await;

    let bill = Mutation::bill_quotation(db, quotation_id)
        .await
        .expect("could not bill quotation");

    Mutation::delete_bill(db, bill.bill.id)
        .await
        .expect("could not delete bill");

    assert_eq!(Bill::find().count(db).await.unwrap(), 0);
    assert_eq!(BillLine::find().count(db).await.unwrap(), 0);

    let quotation = Query::load_quotation(db, quotation_id)
        .await
        .expect("could not load quotation");
    assert_eq!(quotation.lines.len(), 2);

    // A deleted bill frees the quotation for billing again.
    Mutation::bill_quotation(db, quotation_id)
        .await
        .expect("could not bill quotation");
}
