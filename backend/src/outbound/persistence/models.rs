//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{allocations, inventory, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
}

/// Row struct for reading from the inventory table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = inventory)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InventoryRow {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
}

/// Insertable struct for creating catalogue items.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = inventory)]
pub(crate) struct NewInventoryRow<'a> {
    pub name: &'a str,
    pub quantity: i32,
    pub price: f64,
}

/// Changeset for partial catalogue updates; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = inventory)]
pub(crate) struct InventoryChangeset<'a> {
    pub name: Option<&'a str>,
    pub quantity: Option<i32>,
    pub price: Option<f64>,
}

/// Row struct for reading from the allocations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = allocations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AllocationRow {
    pub id: i32,
    pub user_id: i32,
    pub inventory_id: Option<i32>,
    pub quantity: i32,
    pub allocation_date: DateTime<Utc>,
}

/// Insertable struct for new ledger entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = allocations)]
pub(crate) struct NewAllocationRow {
    pub user_id: i32,
    pub inventory_id: i32,
    pub quantity: i32,
}
