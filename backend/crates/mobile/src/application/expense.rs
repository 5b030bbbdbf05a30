//! Expense Use Case
//!
//! Household spending records. Amounts arrive as decimal text and are kept as
//! integer minor units from here on.

use std::sync::Arc;

use kernel::id::ExpenseId;

use crate::application::common::{
    Page, optional_text, parse_date, parse_date_range, required_text,
};
use crate::application::config::MobileConfig;
use crate::domain::entities::{Expense, NewExpense};
use crate::domain::repository::{ExpenseFilter, ExpenseRepository};
use crate::domain::value_objects::{Currency, ExpenseCategory, Money};
use crate::error::{MobileError, MobileResult};

/// Create / replace input
#[derive(Debug, Clone, Default)]
pub struct ExpenseInput {
    pub title: String,
    /// Decimal literal, e.g. `"12.50"`
    pub amount: String,
    pub currency: Option<String>,
    pub category: String,
    pub spent_on: String,
    pub paid_by: Option<String>,
    pub note: Option<String>,
}

/// List input
#[derive(Debug, Clone, Default)]
pub struct ExpenseListInput {
    pub category: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Expense use case
pub struct ExpenseUseCase<R>
where
    R: ExpenseRepository,
{
    repo: Arc<R>,
    config: Arc<MobileConfig>,
}

impl<R> ExpenseUseCase<R>
where
    R: ExpenseRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<MobileConfig>) -> Self {
        Self { repo, config }
    }

    fn to_new(&self, input: ExpenseInput) -> MobileResult<NewExpense> {
        let title = required_text("title", &input.title, 120)?;
        let amount = input
            .amount
            .parse::<Money>()
            .map_err(|e| MobileError::invalid("amount", e))?;
        let currency = match input.currency.as_deref().map(str::trim) {
            None | Some("") => self.config.default_currency.clone(),
            Some(code) => Currency::new(code).map_err(|e| MobileError::invalid("currency", e))?,
        };
        let category = input
            .category
            .parse::<ExpenseCategory>()
            .map_err(|e| MobileError::invalid("category", e))?;
        let spent_on = parse_date("spentOn", &input.spent_on)?;
        let paid_by = optional_text("paidBy", input.paid_by.as_deref(), 80)?;
        let note = optional_text("note", input.note.as_deref(), 500)?;

        Ok(NewExpense {
            title,
            amount,
            currency,
            category,
            spent_on,
            paid_by,
            note,
        })
    }

    /// Record an expense in the configured default currency unless one is given
    pub async fn create(&self, input: ExpenseInput) -> MobileResult<Expense> {
        let new_expense = self.to_new(input)?;
        let expense = self.repo.create(&new_expense).await?;

        tracing::info!(
            expense_id = %expense.id,
            amount = %expense.amount,
            currency = %expense.currency,
            category = %expense.category,
            "Expense created"
        );

        Ok(expense)
    }

    /// List expenses, optionally by category, date window and exact amount
    pub async fn list(&self, input: ExpenseListInput) -> MobileResult<Page<Expense>> {
        let (from, to) = parse_date_range(input.from.as_deref(), input.to.as_deref())?;
        let category = input
            .category
            .as_deref()
            .map(str::parse::<ExpenseCategory>)
            .transpose()
            .map_err(|e| MobileError::invalid("category", e))?;
        let amount = input
            .amount
            .as_deref()
            .map(str::parse::<Money>)
            .transpose()
            .map_err(|e| MobileError::invalid("amount", e))?;

        let filter = ExpenseFilter {
            category,
            from,
            to,
            amount,
        };
        let page = self.config.page(input.limit, input.offset);
        let items = self.repo.list(&filter, page).await?;
        Ok(Page::new(items, page))
    }

    pub async fn get(&self, id: ExpenseId) -> MobileResult<Expense> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| MobileError::not_found("Expense", id))
    }

    /// Full replacement
    pub async fn update(&self, id: ExpenseId, input: ExpenseInput) -> MobileResult<Expense> {
        let new_expense = self.to_new(input)?;
        let expense = self
            .repo
            .update(id, &new_expense)
            .await?
            .ok_or_else(|| MobileError::not_found("Expense", id))?;

        tracing::info!(expense_id = %expense.id, "Expense updated");

        Ok(expense)
    }

    pub async fn delete(&self, id: ExpenseId) -> MobileResult<()> {
        if !self.repo.delete(id).await? {
            return Err(MobileError::not_found("Expense", id));
        }

        tracing::info!(expense_id = %id, "Expense deleted");

        Ok(())
    }
}
