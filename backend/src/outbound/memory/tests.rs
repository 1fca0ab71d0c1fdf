//! Behavioural coverage for the in-memory store.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{ItemName, UnitPrice};

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::default()
}

async fn seed_user(store: &InMemoryStore, name: &str, is_admin: bool) -> User {
    UserRepository::create(
        store,
        &NewUser {
            username: Username::new(name).expect("username"),
            password_hash: PasswordHash::new("hash"),
            is_admin,
        },
    )
    .await
    .expect("create user")
}

async fn seed_item(store: &InMemoryStore, name: &str, quantity: i32, price: f64) -> InventoryItem {
    store
        .insert(&NewInventoryItem {
            name: ItemName::new(name).expect("name"),
            quantity: StockQuantity::new(quantity).expect("quantity"),
            price: UnitPrice::new(price).expect("price"),
        })
        .await
        .expect("insert item")
}

fn request(user: &User, item: &InventoryItem, quantity: i32) -> AllocationRequest {
    AllocationRequest {
        user_id: user.id(),
        inventory_id: item.id,
        quantity: AllocationQuantity::new(quantity).expect("quantity"),
    }
}

async fn stock_of(store: &InMemoryStore, item: &InventoryItem) -> i32 {
    InventoryRepository::find_by_id(store, item.id)
        .await
        .expect("lookup")
        .map(|found| found.quantity.get())
        .expect("item exists")
}

#[rstest]
#[tokio::test]
async fn usernames_are_unique(store: InMemoryStore) {
    seed_user(&store, "alice", false).await;
    let err = UserRepository::create(
        &store,
        &NewUser {
            username: Username::new("alice").expect("username"),
            password_hash: PasswordHash::new("other"),
            is_admin: false,
        },
    )
    .await
    .expect_err("duplicate");
    assert!(matches!(err, UserPersistenceError::DuplicateUsername { .. }));
}

#[rstest]
#[tokio::test]
async fn list_non_admin_skips_admins_and_orders_by_id(store: InMemoryStore) {
    seed_user(&store, "admin", true).await;
    seed_user(&store, "bob", false).await;
    seed_user(&store, "carol", false).await;

    let names: Vec<String> = store
        .list_non_admin()
        .await
        .expect("list")
        .iter()
        .map(|user| user.username().to_string())
        .collect();
    assert_eq!(names, vec!["bob", "carol"]);
}

#[rstest]
#[tokio::test]
async fn repeated_allocations_merge_into_one_row(store: InMemoryStore) {
    let user = seed_user(&store, "alice", false).await;
    let item = seed_item(&store, "Widget", 10, 2.5).await;

    for quantity in [2, 3, 4] {
        store
            .allocate(&request(&user, &item, quantity))
            .await
            .expect("allocate");
    }

    let allocation = store
        .find(user.id(), item.id)
        .await
        .expect("find")
        .expect("allocation exists");
    assert_eq!(allocation.quantity.get(), 9);
    assert_eq!(stock_of(&store, &item).await, 1);
    let holdings = store.holdings_for(user.id()).await.expect("holdings");
    assert_eq!(holdings.len(), 1);
}

#[rstest]
#[tokio::test]
async fn overdraw_leaves_state_unchanged(store: InMemoryStore) {
    let user = seed_user(&store, "alice", false).await;
    let item = seed_item(&store, "Widget", 3, 2.5).await;

    let err = store
        .allocate(&request(&user, &item, 4))
        .await
        .expect_err("overdraw");

    assert!(matches!(err, AllocationRepositoryError::InsufficientStock { .. }));
    assert_eq!(stock_of(&store, &item).await, 3);
    assert!(store.find(user.id(), item.id).await.expect("find").is_none());
}

#[rstest]
#[tokio::test]
async fn allocation_for_missing_item_reports_insufficient_stock(store: InMemoryStore) {
    let user = seed_user(&store, "alice", false).await;
    let request = AllocationRequest {
        user_id: user.id(),
        inventory_id: InventoryItemId::new(99).expect("id"),
        quantity: AllocationQuantity::new(1).expect("quantity"),
    };

    let err = store.allocate(&request).await.expect_err("missing item");
    assert!(matches!(err, AllocationRepositoryError::InsufficientStock { .. }));
}

#[rstest]
#[tokio::test]
async fn allocation_for_unknown_user_is_rejected(store: InMemoryStore) {
    let item = seed_item(&store, "Widget", 3, 2.5).await;
    let request = AllocationRequest {
        user_id: UserId::new(42).expect("id"),
        inventory_id: item.id,
        quantity: AllocationQuantity::new(1).expect("quantity"),
    };

    let err = store.allocate(&request).await.expect_err("unknown user");
    assert!(matches!(err, AllocationRepositoryError::UnknownUser { .. }));
    assert_eq!(stock_of(&store, &item).await, 3);
}

#[rstest]
#[tokio::test]
async fn concurrent_allocations_never_overdraw(store: InMemoryStore) {
    let user = seed_user(&store, "alice", false).await;
    let item = seed_item(&store, "Widget", 10, 1.0).await;

    let attempts = (0..8).map(|_| {
        let store = store.clone();
        let req = request(&user, &item, 3);
        tokio::spawn(async move { store.allocate(&req).await })
    });
    let mut granted = 0;
    for handle in attempts.collect::<Vec<_>>() {
        if handle.await.expect("task joins").is_ok() {
            granted += 1;
        }
    }

    assert_eq!(granted, 3);
    assert_eq!(stock_of(&store, &item).await, 1);
    let allocation = store
        .find(user.id(), item.id)
        .await
        .expect("find")
        .expect("allocation");
    assert_eq!(allocation.quantity.get(), 9);
}

#[rstest]
#[tokio::test]
async fn deleting_an_item_orphans_its_allocations(store: InMemoryStore) {
    let user = seed_user(&store, "alice", false).await;
    let item = seed_item(&store, "Widget", 5, 1.0).await;
    let other = seed_item(&store, "Gadget", 5, 2.0).await;
    store.allocate(&request(&user, &item, 2)).await.expect("allocate");
    store.allocate(&request(&user, &other, 1)).await.expect("allocate");

    assert!(InventoryRepository::delete(&store, item.id).await.expect("delete"));

    assert!(store.find(user.id(), item.id).await.expect("find").is_none());
    let holdings = store.holdings_for(user.id()).await.expect("holdings");
    let held: Vec<i32> = holdings.iter().map(|row| row.item_id.get()).collect();
    assert_eq!(held, vec![other.id.get()]);
}

#[rstest]
#[tokio::test]
async fn update_applies_partial_patch(store: InMemoryStore) {
    let item = seed_item(&store, "Widget", 5, 1.0).await;
    let patch = InventoryItemPatch {
        price: Some(UnitPrice::new(3.0).expect("price")),
        ..InventoryItemPatch::default()
    };

    let updated = store
        .update(item.id, &patch)
        .await
        .expect("update")
        .expect("item exists");

    assert_eq!(updated.price.get(), 3.0);
    assert_eq!(updated.quantity.get(), 5);
    assert_eq!(updated.name.as_ref(), "Widget");
}

#[rstest]
#[tokio::test]
async fn allocations_are_stamped_with_the_clock() {
    let stamp = Utc
        .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(stamp);
    let store = InMemoryStore::new(Arc::new(clock));
    let user = seed_user(&store, "alice", false).await;
    let item = seed_item(&store, "Widget", 5, 1.0).await;

    let allocation = store
        .allocate(&request(&user, &item, 1))
        .await
        .expect("allocate");
    assert_eq!(allocation.allocated_at, stamp);
}
