//! In-process store implementing the user, inventory and allocation ports.
//!
//! Used when no database URL is configured and by the HTTP integration tests.
//! All three tables live behind a single mutex, so the allocate operation's
//! stock check, ledger merge and decrement are atomic with respect to every
//! other store operation.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    AllocationRepository, AllocationRepositoryError, InventoryRepository,
    InventoryRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Allocation, AllocationId, AllocationQuantity, AllocationRequest, HoldingRow, InventoryItem,
    InventoryItemId, InventoryItemPatch, NewInventoryItem, NewUser, PasswordHash, StockQuantity,
    StoredUser, User, UserId, Username,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Clone)]
struct UserEntry {
    username: Username,
    password_hash: PasswordHash,
    is_admin: bool,
}

#[derive(Debug, Clone)]
struct AllocationEntry {
    user_id: UserId,
    inventory_id: Option<InventoryItemId>,
    quantity: AllocationQuantity,
    allocated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, UserEntry>,
    inventory: BTreeMap<i32, InventoryItem>,
    allocations: BTreeMap<i32, AllocationEntry>,
    next_user_id: i32,
    next_item_id: i32,
    next_allocation_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

impl Tables {
    fn user(&self, id: i32, entry: &UserEntry) -> Result<User, String> {
        let user_id = UserId::new(id).map_err(|err| err.to_string())?;
        Ok(User::new(user_id, entry.username.clone(), entry.is_admin))
    }

    fn allocation(id: i32, entry: &AllocationEntry) -> Result<Allocation, String> {
        let inventory_id = entry
            .inventory_id
            .ok_or_else(|| format!("allocation {id} has no item"))?;
        Ok(Allocation {
            id: AllocationId::new(id).map_err(|err| err.to_string())?,
            user_id: entry.user_id,
            inventory_id,
            quantity: entry.quantity,
            allocated_at: entry.allocated_at,
        })
    }
}

/// Shared in-memory tables for users, catalogue items and allocations.
///
/// Cloning yields another handle onto the same tables.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryStore {
    /// Create an empty store stamping allocations with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables.lock().map_err(|_| POISONED.to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if tables
            .users
            .values()
            .any(|entry| entry.username == user.username)
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username.as_ref(),
            ));
        }
        let id = next_id(&mut tables.next_user_id);
        let entry = UserEntry {
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            is_admin: user.is_admin,
        };
        let created = tables.user(id, &entry).map_err(UserPersistenceError::query)?;
        tables.users.insert(id, entry);
        Ok(created)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        tables
            .users
            .iter()
            .find(|(_, entry)| &entry.username == username)
            .map(|(id, entry)| {
                Ok::<_, String>(StoredUser {
                    user: tables.user(*id, entry)?,
                    password_hash: entry.password_hash.clone(),
                })
            })
            .transpose()
            .map_err(UserPersistenceError::query)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        tables
            .users
            .get(&id.get())
            .map(|entry| tables.user(id.get(), entry))
            .transpose()
            .map_err(UserPersistenceError::query)
    }

    async fn list_non_admin(&self) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        tables
            .users
            .iter()
            .filter(|(_, entry)| !entry.is_admin)
            .map(|(id, entry)| tables.user(*id, entry))
            .collect::<Result<_, _>>()
            .map_err(UserPersistenceError::query)
    }
}

#[async_trait]
impl InventoryRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<InventoryItem>, InventoryRepositoryError> {
        let tables = self.lock().map_err(InventoryRepositoryError::query)?;
        Ok(tables.inventory.values().cloned().collect())
    }

    async fn find_by_id(
        &self,
        id: InventoryItemId,
    ) -> Result<Option<InventoryItem>, InventoryRepositoryError> {
        let tables = self.lock().map_err(InventoryRepositoryError::query)?;
        Ok(tables.inventory.get(&id.get()).cloned())
    }

    async fn insert(
        &self,
        item: &NewInventoryItem,
    ) -> Result<InventoryItem, InventoryRepositoryError> {
        let mut tables = self.lock().map_err(InventoryRepositoryError::query)?;
        let raw_id = next_id(&mut tables.next_item_id);
        let id = InventoryItemId::new(raw_id)
            .map_err(|err| InventoryRepositoryError::query(err.to_string()))?;
        let created = InventoryItem {
            id,
            name: item.name.clone(),
            quantity: item.quantity,
            price: item.price,
        };
        tables.inventory.insert(raw_id, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: InventoryItemId,
        patch: &InventoryItemPatch,
    ) -> Result<Option<InventoryItem>, InventoryRepositoryError> {
        let mut tables = self.lock().map_err(InventoryRepositoryError::query)?;
        let Some(current) = tables.inventory.remove(&id.get()) else {
            return Ok(None);
        };
        let updated = patch.apply_to(current);
        tables.inventory.insert(id.get(), updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: InventoryItemId) -> Result<bool, InventoryRepositoryError> {
        let mut tables = self.lock().map_err(InventoryRepositoryError::query)?;
        if tables.inventory.remove(&id.get()).is_none() {
            return Ok(false);
        }
        for entry in tables.allocations.values_mut() {
            if entry.inventory_id == Some(id) {
                entry.inventory_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl AllocationRepository for InMemoryStore {
    async fn find(
        &self,
        user_id: UserId,
        inventory_id: InventoryItemId,
    ) -> Result<Option<Allocation>, AllocationRepositoryError> {
        let tables = self.lock().map_err(AllocationRepositoryError::query)?;
        tables
            .allocations
            .iter()
            .find(|(_, entry)| entry.user_id == user_id && entry.inventory_id == Some(inventory_id))
            .map(|(id, entry)| Tables::allocation(*id, entry))
            .transpose()
            .map_err(AllocationRepositoryError::query)
    }

    async fn allocate(
        &self,
        request: &AllocationRequest,
    ) -> Result<Allocation, AllocationRepositoryError> {
        let mut tables = self.lock().map_err(AllocationRepositoryError::query)?;
        let item_key = request.inventory_id.get();
        let requested = request.quantity.get();

        if !tables.users.contains_key(&request.user_id.get()) {
            return Err(AllocationRepositoryError::unknown_user(
                request.user_id.get(),
            ));
        }

        // Compute every new value before mutating anything so a failure
        // leaves the tables untouched.
        let remaining = tables
            .inventory
            .get(&item_key)
            .and_then(|item| StockQuantity::new(item.quantity.get() - requested).ok())
            .ok_or_else(|| AllocationRepositoryError::insufficient_stock(item_key))?;

        let existing = tables
            .allocations
            .iter()
            .find(|(_, entry)| {
                entry.user_id == request.user_id && entry.inventory_id == Some(request.inventory_id)
            })
            .map(|(id, entry)| (*id, entry.quantity.get()));

        let (allocation_id, merged) = match existing {
            Some((id, held)) => {
                let total = held
                    .checked_add(requested)
                    .and_then(|total| AllocationQuantity::new(total).ok())
                    .ok_or_else(|| AllocationRepositoryError::query("allocation quantity overflow"))?;
                (id, total)
            }
            None => (next_id(&mut tables.next_allocation_id), request.quantity),
        };

        if let Some(item) = tables.inventory.get_mut(&item_key) {
            item.quantity = remaining;
        }
        let now = self.clock.utc();
        let entry = tables
            .allocations
            .entry(allocation_id)
            .and_modify(|entry| entry.quantity = merged)
            .or_insert_with(|| AllocationEntry {
                user_id: request.user_id,
                inventory_id: Some(request.inventory_id),
                quantity: merged,
                allocated_at: now,
            })
            .clone();

        Tables::allocation(allocation_id, &entry).map_err(AllocationRepositoryError::query)
    }

    async fn holdings_for(
        &self,
        user_id: UserId,
    ) -> Result<Vec<HoldingRow>, AllocationRepositoryError> {
        let tables = self.lock().map_err(AllocationRepositoryError::query)?;
        Ok(tables
            .allocations
            .values()
            .filter(|entry| entry.user_id == user_id)
            .filter_map(|entry| {
                let item = tables.inventory.get(&entry.inventory_id?.get())?;
                Some(HoldingRow {
                    item_id: item.id,
                    name: item.name.clone(),
                    price: item.price,
                    allocated: entry.quantity.get(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests;
