//! Gallery Use Case

use std::sync::Arc;

use kernel::id::GalleryItemId;

use crate::application::common::{Page, optional_text, parse_optional_date};
use crate::application::config::MobileConfig;
use crate::domain::entities::{GalleryItem, NewGalleryItem};
use crate::domain::repository::{GalleryFilter, GalleryRepository};
use crate::domain::value_objects::{MediaKind, MediaUrl};
use crate::error::{MobileError, MobileResult};

/// Create / replace input
#[derive(Debug, Clone, Default)]
pub struct GalleryItemInput {
    pub media_url: String,
    pub media_kind: String,
    pub caption: Option<String>,
    pub album: Option<String>,
    pub taken_on: Option<String>,
}

impl GalleryItemInput {
    fn into_new(self) -> MobileResult<NewGalleryItem> {
        let media_url =
            MediaUrl::new(self.media_url.trim()).map_err(|e| MobileError::invalid("mediaUrl", e))?;
        let media_kind = self
            .media_kind
            .parse::<MediaKind>()
            .map_err(|e| MobileError::invalid("mediaKind", e))?;
        let caption = optional_text("caption", self.caption.as_deref(), 500)?;
        let album = optional_text("album", self.album.as_deref(), 60)?;
        let taken_on = parse_optional_date("takenOn", self.taken_on.as_deref())?;

        Ok(NewGalleryItem {
            media_url,
            media_kind,
            caption,
            album,
            taken_on,
        })
    }
}

/// List input
#[derive(Debug, Clone, Default)]
pub struct GalleryListInput {
    pub album: Option<String>,
    pub media_kind: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Gallery use case
pub struct GalleryUseCase<R>
where
    R: GalleryRepository,
{
    repo: Arc<R>,
    config: Arc<MobileConfig>,
}

impl<R> GalleryUseCase<R>
where
    R: GalleryRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<MobileConfig>) -> Self {
        Self { repo, config }
    }

    /// Store a gallery item after checking its media URL
    pub async fn create(&self, input: GalleryItemInput) -> MobileResult<GalleryItem> {
        let new_item = input.into_new()?;
        let item = self.repo.create(&new_item).await?;

        tracing::info!(
            gallery_item_id = %item.id,
            media_kind = %item.media_kind,
            "Gallery item created"
        );

        Ok(item)
    }

    /// List items newest first, optionally by album and media kind
    pub async fn list(&self, input: GalleryListInput) -> MobileResult<Page<GalleryItem>> {
        let media_kind = input
            .media_kind
            .as_deref()
            .map(str::parse::<MediaKind>)
            .transpose()
            .map_err(|e| MobileError::invalid("mediaKind", e))?;
        let album = optional_text("album", input.album.as_deref(), 60)?;

        let page = self.config.page(input.limit, input.offset);
        let items = self
            .repo
            .list(&GalleryFilter { album, media_kind }, page)
            .await?;
        Ok(Page::new(items, page))
    }

    pub async fn get(&self, id: GalleryItemId) -> MobileResult<GalleryItem> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| MobileError::not_found("Gallery item", id))
    }

    pub async fn update(
        &self,
        id: GalleryItemId,
        input: GalleryItemInput,
    ) -> MobileResult<GalleryItem> {
        let new_item = input.into_new()?;
        let item = self
            .repo
            .update(id, &new_item)
            .await?
            .ok_or_else(|| MobileError::not_found("Gallery item", id))?;

        tracing::info!(gallery_item_id = %item.id, "Gallery item updated");

        Ok(item)
    }

    pub async fn delete(&self, id: GalleryItemId) -> MobileResult<()> {
        if !self.repo.delete(id).await? {
            return Err(MobileError::not_found("Gallery item", id));
        }

        tracing::info!(gallery_item_id = %id, "Gallery item deleted");

        Ok(())
    }
}
