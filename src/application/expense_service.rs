use crate::domain::error::DomainError;
use crate::domain::expense::{Amount, Expense, NewExpense};
use crate::domain::repository::ExpenseRepository;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct ExpenseService<R: ExpenseRepository> {
    repository: Arc<R>,
}

impl<R: ExpenseRepository> ExpenseService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists the caller's expenses in insertion order.
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: &str) -> Result<Vec<Expense>> {
        self.repository.find_by_owner(user_id).await
    }

    #[instrument(skip(self, req), fields(title = %req.title))]
    pub async fn add(&self, user_id: &str, req: NewExpense) -> Result<Expense> {
        let amount = Amount::new(req.amount)?;

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: req.title,
            category: req.category,
            amount,
            date: req.date,
        };

        self.repository.save(expense.clone()).await?;

        info!(expense_id = %expense.id, "Expense recorded");
        Ok(expense)
    }

    /// Deletes an expense the caller owns. A missing id and an id owned by
    /// another user fail with the same error, so callers cannot probe for
    /// the existence of other users' records.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: &str, expense_id: &str) -> Result<()> {
        let expense = self
            .repository
            .find_by_id(expense_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Expense not found".to_string()))?;

        if expense.user_id != user_id {
            warn!(expense_id = expense_id, "Refusing to delete foreign expense");
            return Err(DomainError::NotFound("Expense not found".to_string()).into());
        }

        if !self.repository.delete(expense_id).await? {
            return Err(DomainError::NotFound("Expense not found".to_string()).into());
        }

        info!(expense_id = expense_id, "Expense deleted");
        Ok(())
    }
}
