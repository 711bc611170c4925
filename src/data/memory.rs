use crate::domain::expense::Expense;
use crate::domain::repository::ExpenseRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

// Expenses are kept in insertion order so listing a user's records is
// deterministic between writes.
#[derive(Clone)]
pub struct InMemoryExpenseRepository {
    storage: Arc<RwLock<Vec<Expense>>>,
}

impl InMemoryExpenseRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryExpenseRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryExpenseRepository {
    async fn save(&self, expense: Expense) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.push(expense);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Expense>> {
        let storage = self.storage.read().await;
        Ok(storage.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Expense>> {
        let storage = self.storage.read().await;
        Ok(storage
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut storage = self.storage.write().await;
        match storage.iter().position(|e| e.id == id) {
            Some(index) => {
                storage.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
