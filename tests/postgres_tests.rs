//! Integration tests for the PostgreSQL entity store.
//!
//! # Requirements
//!
//! - Docker must be running (testcontainers launches a PostgreSQL container)
//! - Feature flag `postgres` must be enabled
//!
//! # Running
//!
//! ```sh
//! cargo test --features postgres --test postgres_tests -- --test-threads=1
//! ```
//!
//! All tests share one container. Each test opens its own pool and truncates
//! the tables first.

#![cfg(feature = "postgres")]

use axum::http::StatusCode;
use axum_test::TestServer;
use pizzeria::app::{Stores, router};
use pizzeria::config::AppConfig;
use pizzeria::core::filter::{Criteria, RangeFilter, StringFilter};
use pizzeria::core::predicate::Predicate;
use pizzeria::core::query::{PageRequest, Sort};
use pizzeria::core::store::EntityStore;
use pizzeria::entities::topping::ToppingField;
use pizzeria::entities::{Pizza, PizzaSize, Topping, ToppingCriteria, ToppingDto};
use pizzeria::storage::PostgresStore;
use pizzeria::storage::postgres::{connect, ensure_schema};
use serde_json::json;
use sqlx::PgPool;
use std::sync::OnceLock;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;

// ---------------------------------------------------------------------------
// Shared test environment (single container, fresh pool per test)
// ---------------------------------------------------------------------------

/// Keeps the container alive for the whole test binary.
struct PgTestEnv {
    _container: testcontainers::ContainerAsync<Postgres>,
    connection_url: String,
}

static TEST_ENV: OnceLock<PgTestEnv> = OnceLock::new();

async fn init_pg_env() -> &'static PgTestEnv {
    if let Some(env) = TEST_ENV.get() {
        return env;
    }

    let container = Postgres::default()
        .start()
        .await
        .expect("Failed to start PostgreSQL container, is Docker running?");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = connect(&url, 1).await.expect("Failed to connect");
    ensure_schema(&pool).await.expect("Failed to create schema");
    pool.close().await;

    let _ = TEST_ENV.set(PgTestEnv {
        _container: container,
        connection_url: url,
    });
    TEST_ENV.get().unwrap()
}

/// Fresh pool on empty tables with restarted id sequences
async fn fresh_pool() -> PgPool {
    let env = init_pg_env().await;
    let pool = connect(&env.connection_url, 5).await.unwrap();
    sqlx::query("TRUNCATE pizza, topping RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();
    pool
}

async fn seeded_toppings(pool: &PgPool) -> PostgresStore<Topping> {
    let store = PostgresStore::<Topping>::new(pool.clone());
    for (name, price, description) in [
        ("Ham", 1.5, Some("smoked")),
        ("Olives", 0.5, None),
        ("Mushrooms", 1.0, Some("button")),
        ("Basil", 0.25, Some("fresh")),
    ] {
        store
            .save(Topping::new(name.into(), price, description.map(Into::into)))
            .await
            .unwrap();
    }
    store
}

fn names(toppings: &[Topping]) -> Vec<&str> {
    toppings.iter().map(|t| t.name.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_save_find_and_delete() {
    let pool = fresh_pool().await;
    let store = PostgresStore::<Pizza>::new(pool);

    let saved = store
        .save(Pizza::new(PizzaSize::ExtraLarge, 14.0))
        .await
        .unwrap();
    let id = saved.id.unwrap();

    let found = store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.size, PizzaSize::ExtraLarge);
    assert_eq!(found.price, 14.0);
    assert!(store.exists_by_id(id).await.unwrap());

    let mut changed = found.clone();
    changed.price = 15.0;
    store.save(changed).await.unwrap();
    assert_eq!(store.find_by_id(id).await.unwrap().unwrap().price, 15.0);
    assert_eq!(store.count_matching(&Predicate::always()).await.unwrap(), 1);

    store.delete_by_id(id).await.unwrap();
    store.delete_by_id(id).await.unwrap();
    assert!(store.find_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_check_constraint_is_integrity_error() {
    let pool = fresh_pool().await;
    let store = PostgresStore::<Pizza>::new(pool);

    let err = store
        .save(Pizza::new(PizzaSize::Small, 0.5))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "STORAGE_ERROR");
    assert!(err.to_string().contains("integrity"));
}

#[tokio::test]
async fn test_criteria_match_in_memory_semantics() {
    let pool = fresh_pool().await;
    let store = seeded_toppings(&pool).await;

    let cases = vec![
        (ToppingCriteria::default(), vec!["Ham", "Olives", "Mushrooms", "Basil"]),
        (
            ToppingCriteria {
                name: Some(StringFilter::containing("as")),
                ..ToppingCriteria::default()
            },
            vec!["Basil"],
        ),
        (
            ToppingCriteria {
                description: Some(StringFilter {
                    does_not_contain: Some("o".into()),
                    ..StringFilter::default()
                }),
                ..ToppingCriteria::default()
            },
            vec!["Basil"],
        ),
        (
            ToppingCriteria {
                description: Some(StringFilter {
                    range: RangeFilter {
                        specified: Some(false),
                        ..RangeFilter::default()
                    },
                    ..StringFilter::default()
                }),
                ..ToppingCriteria::default()
            },
            vec!["Olives"],
        ),
        (
            ToppingCriteria {
                price: Some(RangeFilter {
                    greater_than: Some(0.3),
                    less_than_or_equal: Some(1.0),
                    ..RangeFilter::default()
                }),
                distinct: Some(true),
                ..ToppingCriteria::default()
            },
            vec!["Olives", "Mushrooms"],
        ),
        (
            ToppingCriteria {
                id: Some(RangeFilter {
                    in_: Some(vec![]),
                    ..RangeFilter::default()
                }),
                ..ToppingCriteria::default()
            },
            vec![],
        ),
        (
            ToppingCriteria {
                name: Some(StringFilter {
                    range: RangeFilter {
                        less_than: Some("a".into()),
                        ..RangeFilter::default()
                    },
                    ..StringFilter::default()
                }),
                ..ToppingCriteria::default()
            },
            vec!["Ham", "Olives", "Mushrooms", "Basil"],
        ),
        (
            ToppingCriteria {
                name: Some(StringFilter {
                    range: RangeFilter {
                        greater_than_or_equal: Some("basil".into()),
                        ..RangeFilter::default()
                    },
                    ..StringFilter::default()
                }),
                ..ToppingCriteria::default()
            },
            vec![],
        ),
    ];

    for (criteria, expected) in cases {
        let predicate = criteria.to_predicate();
        let found = store.find_matching(&predicate, None).await.unwrap();
        assert_eq!(names(&found), expected, "criteria {:?}", criteria);
        assert_eq!(
            store.count_matching(&predicate).await.unwrap(),
            expected.len() as u64
        );
    }

    // Uppercase sorts before lowercase
    store
        .save(Topping::new("anchovy".into(), 0.75, None))
        .await
        .unwrap();
    let request = PageRequest::new(0, 10).with_sort(Sort::asc(ToppingField::Name));
    let found = store
        .find_matching(&Predicate::always(), Some(&request))
        .await
        .unwrap();
    assert_eq!(
        names(&found),
        vec!["Basil", "Ham", "Mushrooms", "Olives", "anchovy"]
    );
}

#[tokio::test]
async fn test_paging_and_null_ordering() {
    let pool = fresh_pool().await;
    let store = seeded_toppings(&pool).await;

    let request = PageRequest::new(0, 10).with_sort(Sort::asc(ToppingField::Description));
    let found = store
        .find_matching(&Predicate::always(), Some(&request))
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Mushrooms", "Basil", "Ham", "Olives"]);

    let request = PageRequest::new(1, 3).with_sort(Sort::desc(ToppingField::Price));
    let page = store.find_page(&Predicate::always(), &request).await.unwrap();
    assert_eq!(names(&page.content), vec!["Basil"]);
    assert_eq!(page.total_elements, 4);
    assert!(!page.has_next());
}

// ---------------------------------------------------------------------------
// REST over postgres
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_rest_topping_flow() {
    let pool = fresh_pool().await;
    let app = router(&AppConfig::default(), Stores::postgres(pool)).unwrap();
    let server = TestServer::new(app);

    let response = server
        .post("/api/toppings")
        .json(&json!({"name": "Pepperoni", "price": 2.0}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: ToppingDto = response.json();
    let id = created.id.unwrap();

    let patched: ToppingDto = server
        .patch(&format!("/api/toppings/{}", id))
        .content_type("application/merge-patch+json")
        .bytes(json!({"id": id, "description": "spicy"}).to_string().into())
        .await
        .json();
    assert_eq!(patched.name, "Pepperoni");
    assert_eq!(patched.description.as_deref(), Some("spicy"));

    let found: Vec<ToppingDto> = server
        .get("/api/toppings")
        .add_query_param("description.contains", "pic")
        .await
        .json();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, Some(id));

    let count: u64 = server
        .get("/api/toppings/count")
        .add_query_param("name.equals", "Salami")
        .await
        .json();
    assert_eq!(count, 0);
}
