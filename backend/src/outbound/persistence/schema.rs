//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// User accounts.
    users (id) {
        /// Primary key.
        id -> Int4,
        /// Unique login name (max 50 characters).
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        /// Administrative privileges flag.
        is_admin -> Bool,
    }
}

diesel::table! {
    /// Catalogue items.
    inventory (id) {
        /// Primary key.
        id -> Int4,
        /// Item name (max 100 characters).
        name -> Varchar,
        /// Quantity on hand, never negative.
        quantity -> Int4,
        /// Unit price, never negative.
        price -> Float8,
    }
}

diesel::table! {
    /// Allocation ledger, unique per (user_id, inventory_id).
    allocations (id) {
        /// Primary key.
        id -> Int4,
        /// Owning user.
        user_id -> Int4,
        /// Allocated item; cleared when the item is deleted.
        inventory_id -> Nullable<Int4>,
        /// Allocated quantity, always positive.
        quantity -> Int4,
        /// Creation timestamp.
        allocation_date -> Timestamptz,
    }
}

diesel::joinable!(allocations -> inventory (inventory_id));
diesel::joinable!(allocations -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(allocations, inventory, users);
