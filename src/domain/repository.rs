use crate::domain::expense::Expense;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save_user(&self, user: User) -> Result<()>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn save(&self, expense: Expense) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Expense>>;
    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Expense>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}
