use comptoir_service::{
    connect, CustomerInput, Mutation, ProductInput, Query, QuotationInput, ServiceError,
};
use entity::prelude::*;
use entity::sea_orm_active_enums::Status;
use rust_decimal_macros::dec;
use sea_orm::{ConnectionTrait, DbConn, Schema};

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

fn customer(
    business: &str,
    first_name: &str,
    last_name: &str,
    zipcode: &str,
    account_id: i64,
) -> CustomerInput {
    CustomerInput {
        business: business.to_owned(),
        siren: 512378436,
        logo: None,
        address: "1 rue Principale".to_owned(),
        zipcode: zipcode.to_owned(),
        city: "Paris".to_owned(),
        country: None,
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: format!("{}@example.net", account_id),
        account_id,
    }
}

async fn seed_customers(db: &DbConn) -> Vec<i32> {
    let inputs = [
        customer("Maison Dupont", "Jean", "Dupont", "75002", 1),
        customer("Duplo SARL", "Marie", "Martin", "69001", 2),
        customer("dupont freres", "Paul", "Bernard", "33000", 3),
        customer("Atelier Petit", "Anne", "Petit", "13001", 4),
    ];
    let mut ids = Vec::new();
    for input in inputs {
        let created = Mutation::create_customer(db, input)
            .await
            .expect("could not insert customer");
        ids.push(created.id);
    }
    ids
}

async fn quick_quotation(db: &DbConn, customer_id: i32, status: Status) -> i32 {
    Mutation::create_quotation(
        db,
        QuotationInput {
            customer_id,
            status: Some(status),
            lines: vec![],
        },
    )
    .await
    .expect("could not create quotation")
    .quotation
    .id
}

#[tokio::test]
async fn customers_without_a_term_all_come_back() {
    let db = &setup().await;
    seed_customers(db).await;

    let all = Query::list_customers(db, None)
        .await
        .expect("could not list customers");
    assert_eq!(all.len(), 4);

    // An empty term is not a filter.
    let all = Query::list_customers(db, Some(""))
        .await
        .expect("could not list customers");
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn customer_term_matches_case_sensitively_across_fields() {
    let db = &setup().await;
    let ids = seed_customers(db).await;

    let hits = Query::list_customers(db, Some("Dup"))
        .await
        .expect("could not list customers");
    let hit_ids: Vec<i32> = hits.iter().map(|c| c.id).collect();
    assert_eq!(hit_ids, vec![ids[0], ids[1]]);

    // Lowercase only reaches the lowercase business name.
    let hits = Query::list_customers(db, Some("dup"))
        .await
        .expect("could not list customers");
    let hit_ids: Vec<i32> = hits.iter().map(|c| c.id).collect();
    assert_eq!(hit_ids, vec![ids[2]]);

    // Zipcode, first name and last name are all searched.
    for (term, expected) in [("75002", ids[0]), ("Marie", ids[1]), ("Bernard", ids[2])] {
        let hits = Query::list_customers(db, Some(term))
            .await
            .expect("could not list customers");
        let hit_ids: Vec<i32> = hits.iter().map(|c| c.id).collect();
        assert_eq!(hit_ids, vec![expected], "term {term:?}");
    }

    let hits = Query::list_customers(db, Some("zzz"))
        .await
        .expect("could not list customers");
    assert!(hits.is_empty());
}

#[tokio::test]
async fn products_match_on_name_or_code() {
    let db = &setup().await;
    for (code, name) in [("P1", "Widget"), ("P2", "Gadget"), ("GIZMO-1", "Gizmo")] {
        Mutation::create_product(
            db,
            ProductInput {
                code: code.to_owned(),
                name: name.to_owned(),
                description: format!("{name} description."),
                short_desc: name.to_lowercase(),
                picture: format!("{code}.png"),
                price: dec!(5.0),
            },
        )
        .await
        .expect("could not insert product");
    }

    let all = Query::list_products(db, None)
        .await
        .expect("could not list products");
    assert_eq!(all.len(), 3);

    let hits = Query::list_products(db, Some("Wid"))
        .await
        .expect("could not list products");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].code, "P1");

    let hits = Query::list_products(db, Some("GIZMO"))
        .await
        .expect("could not list products");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Gizmo");

    let hits = Query::list_products(db, Some("P"))
        .await
        .expect("could not list products");
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn quotations_filter_only_when_both_params_are_given() {
    let db = &setup().await;
    let ids = seed_customers(db).await;

    let q1 = quick_quotation(db, ids[0], Status::Accepted).await;
    quick_quotation(db, ids[0], Status::AwaitingPayment).await;
    let q3 = quick_quotation(db, ids[1], Status::Accepted).await;

    let all = Query::list_quotations(db, None, None)
        .await
        .expect("could not list quotations");
    assert_eq!(all.len(), 3);

    // A lone term or a lone status leaves the listing unfiltered.
    let all = Query::list_quotations(db, Some("Dupont"), None)
        .await
        .expect("could not list quotations");
    assert_eq!(all.len(), 3);
    let all = Query::list_quotations(db, None, Some(Status::Accepted))
        .await
        .expect("could not list quotations");
    assert_eq!(all.len(), 3);

    let hits = Query::list_quotations(db, Some("Dupont"), Some(Status::Accepted))
        .await
        .expect("could not list quotations");
    let hit_ids: Vec<i32> = hits.iter().map(|q| q.id).collect();
    assert_eq!(hit_ids, vec![q1]);

    // An empty term still counts as given: it matches every customer,
    // so only the status narrows the listing.
    let hits = Query::list_quotations(db, Some(""), Some(Status::Accepted))
        .await
        .expect("could not list quotations");
    let hit_ids: Vec<i32> = hits.iter().map(|q| q.id).collect();
    assert_eq!(hit_ids, vec![q1, q3]);

    let hits = Query::list_quotations(db, Some("Martin"), Some(Status::Accepted))
        .await
        .expect("could not list quotations");
    let hit_ids: Vec<i32> = hits.iter().map(|q| q.id).collect();
    assert_eq!(hit_ids, vec![q3]);

    let hits = Query::list_quotations(db, Some("Nobody"), Some(Status::Accepted))
        .await
        .expect("could not list quotations");
    assert!(hits.is_empty());
}

#[tokio::test]
async fn bills_filter_through_the_quotation_customer() {
    let db = &setup().await;
    let ids = seed_customers(db).await;

    let q1 = quick_quotation(db, ids[0], Status::Accepted).await;
    let q2 = quick_quotation(db, ids[1], Status::Accepted).await;
    let b1 = Mutation::bill_quotation(db, q1)
        .await
        .expect("could not bill quotation")
        .bill
        .id;
    let b2 = Mutation::bill_quotation(db, q2)
        .await
        .expect("could not bill quotation")
        .bill
        .id;

    let all = Query::list_bills(db, None, None)
        .await
        .expect("could not list bills");
    assert_eq!(all.len(), 2);

    let all = Query::list_bills(db, Some("Dupont"), None)
        .await
        .expect("could not list bills");
    assert_eq!(all.len(), 2);

    let hits = Query::list_bills(db, Some(""), Some(Status::AwaitingSettlement))
        .await
        .expect("could not list bills");
    let hit_ids: Vec<i32> = hits.iter().map(|b| b.id).collect();
    assert_eq!(hit_ids, vec![b1, b2]);

    let hits = Query::list_bills(db, Some("Dupont"), Some(Status::AwaitingSettlement))
        .await
        .expect("could not list bills");
    let hit_ids: Vec<i32> = hits.iter().map(|b| b.id).collect();
    assert_eq!(hit_ids, vec![b1]);

    Mutation::set_bill_status(db, b1, Status::Settled)
        .await
        .expect("could not update bill status");

    let hits = Query::list_bills(db, Some("Dupont"), Some(Status::AwaitingSettlement))
        .await
        .expect("could not list bills");
    assert!(hits.is_empty());

    let hits = Query::list_bills(db, Some("Dupont"), Some(Status::Settled))
        .await
        .expect("could not list bills");
    let hit_ids: Vec<i32> = hits.iter().map(|b| b.id).collect();
    assert_eq!(hit_ids, vec![b1]);

    let hits = Query::list_bills(db, Some("Martin"), Some(Status::AwaitingSettlement))
        .await
        .expect("could not list bills");
    let hit_ids: Vec<i32> = hits.iter().map(|b| b.id).collect();
    assert_eq!(hit_ids, vec![b2]);
}

#[tokio::test]
async fn load_missing_documents_is_not_found() {
    let db = &setup().await;

    let err = Query::load_quotation(db, 1).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("quotation")));
    let err = Query::load_bill(db, 1).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("bill")));
}
