//! Tests for the inventory services.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockAllocationRepository, MockInventoryRepository};
use crate::domain::{ErrorCode, HoldingRow, ItemName, StockQuantity, UnitPrice};

fn item(id: i32, name: &str, quantity: i32, price: f64) -> InventoryItem {
    InventoryItem {
        id: InventoryItemId::new(id).expect("id"),
        name: ItemName::new(name).expect("name"),
        quantity: StockQuantity::new(quantity).expect("quantity"),
        price: UnitPrice::new(price).expect("price"),
    }
}

fn item_id(id: i32) -> InventoryItemId {
    InventoryItemId::new(id).expect("id")
}

#[rstest]
#[tokio::test]
async fn add_item_returns_stored_item() {
    let mut repo = MockInventoryRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|new_item| {
            Ok(InventoryItem {
                id: item_id(9),
                name: new_item.name.clone(),
                quantity: new_item.quantity,
                price: new_item.price,
            })
        });

    let created = InventoryCommandService::new(Arc::new(repo))
        .add_item(NewInventoryItem {
            name: ItemName::new("Widget").expect("name"),
            quantity: StockQuantity::new(0).expect("quantity"),
            price: UnitPrice::new(0.0).expect("price"),
        })
        .await
        .expect("add succeeds");

    assert_eq!(created.id.get(), 9);
    assert_eq!(created.quantity.get(), 0);
}

#[rstest]
#[tokio::test]
async fn update_item_reports_missing_item() {
    let mut repo = MockInventoryRepository::new();
    repo.expect_update().times(1).return_once(|_, _| Ok(None));

    let error = InventoryCommandService::new(Arc::new(repo))
        .update_item(item_id(42), InventoryItemPatch::default())
        .await
        .expect_err("missing item");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_item_maps_existence(#[case] existed: bool, #[case] expected: Option<ErrorCode>) {
    let mut repo = MockInventoryRepository::new();
    repo.expect_delete().times(1).return_once(move |_| Ok(existed));

    let result = InventoryCommandService::new(Arc::new(repo))
        .delete_item(item_id(1))
        .await;

    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[rstest]
#[tokio::test]
async fn summary_totals_catalogue() {
    let mut repo = MockInventoryRepository::new();
    repo.expect_list()
        .times(1)
        .return_once(|| Ok(vec![item(1, "Widget", 10, 2.50), item(2, "Gadget", 4, 1.25)]));

    let summary = InventoryQueryService::new(Arc::new(repo), Arc::new(MockAllocationRepository::new()))
        .summary()
        .await
        .expect("summary");

    assert_eq!(summary.total_items, 2);
    assert_eq!(summary.total_value, 30.00);
}

#[rstest]
#[tokio::test]
async fn summary_maps_repository_failure_to_internal_error() {
    let mut repo = MockInventoryRepository::new();
    repo.expect_list()
        .return_once(|| Err(InventoryRepositoryError::query("relation does not exist")));

    let error = InventoryQueryService::new(Arc::new(repo), Arc::new(MockAllocationRepository::new()))
        .summary()
        .await
        .expect_err("failure");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn holdings_merge_rows_per_item() {
    let mut ledger = MockAllocationRepository::new();
    ledger.expect_holdings_for().times(1).return_once(|_| {
        Ok(vec![
            HoldingRow {
                item_id: item_id(3),
                name: ItemName::new("Gadget").expect("name"),
                price: UnitPrice::new(1.25).expect("price"),
                allocated: 2,
            },
            HoldingRow {
                item_id: item_id(3),
                name: ItemName::new("Gadget").expect("name"),
                price: UnitPrice::new(1.25).expect("price"),
                allocated: 5,
            },
        ])
    });

    let holdings = InventoryQueryService::new(Arc::new(MockInventoryRepository::new()), Arc::new(ledger))
        .holdings_for(UserId::new(2).expect("user id"))
        .await
        .expect("holdings");

    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings.first().map(|holding| holding.quantity), Some(7));
}
