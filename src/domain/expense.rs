use crate::domain::error::DomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub category: String,
    pub amount: Amount,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    // Rejects NaN/infinity and negative values; zero is a valid amount.
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() {
            return Err(DomainError::InvalidInput(
                "Amount must be a finite number".to_string(),
            ));
        }
        if value < 0.0 {
            return Err(DomainError::InvalidInput(
                "Amount must not be negative".to_string(),
            ));
        }
        Ok(Amount(value))
    }

    pub fn inner(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewExpense {
    pub title: String,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
}
