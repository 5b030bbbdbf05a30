//! Circle Type Use Case

use std::sync::Arc;

use kernel::id::CircleTypeId;

use crate::application::common::{Page, optional_text};
use crate::application::config::MobileConfig;
use crate::domain::entities::{CircleType, NewCircleType};
use crate::domain::repository::CircleTypeRepository;
use crate::domain::value_objects::CircleTypeName;
use crate::error::{MobileError, MobileResult};

/// Create / replace input
#[derive(Debug, Clone, Default)]
pub struct CircleTypeInput {
    pub name: String,
    pub description: Option<String>,
    pub max_members: Option<i64>,
}

impl CircleTypeInput {
    fn into_new(self) -> MobileResult<NewCircleType> {
        let name = CircleTypeName::new(&self.name).map_err(|e| MobileError::invalid("name", e))?;
        let description = optional_text("description", self.description.as_deref(), 500)?;
        let max_members = self
            .max_members
            .map(|n| match i32::try_from(n) {
                Ok(n) if (1..=100).contains(&n) => Ok(n),
                _ => Err(MobileError::invalid("maxMembers", "must be between 1 and 100")),
            })
            .transpose()?;

        Ok(NewCircleType {
            name,
            description,
            max_members,
        })
    }
}

/// Circle type use case
pub struct CircleTypeUseCase<R>
where
    R: CircleTypeRepository,
{
    repo: Arc<R>,
    config: Arc<MobileConfig>,
}

impl<R> CircleTypeUseCase<R>
where
    R: CircleTypeRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<MobileConfig>) -> Self {
        Self { repo, config }
    }

    /// Create a circle type with a name unique ignoring case
    pub async fn create(&self, input: CircleTypeInput) -> MobileResult<CircleType> {
        let new_type = input.into_new()?;

        // Check if name is taken
        if self.repo.exists_by_name(&new_type.name, None).await? {
            return Err(duplicate(&new_type.name));
        }

        let circle_type = self.repo.create(&new_type).await?;

        tracing::info!(
            circle_type_id = %circle_type.id,
            name = %circle_type.name,
            "Circle type created"
        );

        Ok(circle_type)
    }

    pub async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> MobileResult<Page<CircleType>> {
        let page = self.config.page(limit, offset);
        let items = self.repo.list(page).await?;
        Ok(Page::new(items, page))
    }

    pub async fn get(&self, id: CircleTypeId) -> MobileResult<CircleType> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| MobileError::not_found("Circle type", id))
    }

    /// Replace a circle type
    ///
    /// A missing id is `NotFound` even when the new name is taken.
    pub async fn update(
        &self,
        id: CircleTypeId,
        input: CircleTypeInput,
    ) -> MobileResult<CircleType> {
        let new_type = input.into_new()?;

        // A missing record is reported before any name conflict
        self.get(id).await?;

        // Renaming to its own name (any case) is allowed
        if self.repo.exists_by_name(&new_type.name, Some(id)).await? {
            return Err(duplicate(&new_type.name));
        }

        let circle_type = self
            .repo
            .update(id, &new_type)
            .await?
            .ok_or_else(|| MobileError::not_found("Circle type", id))?;

        tracing::info!(circle_type_id = %circle_type.id, "Circle type updated");

        Ok(circle_type)
    }

    pub async fn delete(&self, id: CircleTypeId) -> MobileResult<()> {
        if !self.repo.delete(id).await? {
            return Err(MobileError::not_found("Circle type", id));
        }

        tracing::info!(circle_type_id = %id, "Circle type deleted");

        Ok(())
    }
}

pub(crate) fn duplicate(name: &CircleTypeName) -> MobileError {
    MobileError::Duplicate(format!("Circle type \"{name}\" already exists"))
}
