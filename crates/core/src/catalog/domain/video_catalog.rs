use crate::catalog::domain::group_key::GroupKey;
use crate::catalog::domain::video_handle::VideoHandle;
use crate::shared::error::DatasetError;

pub type CatalogEntry = Result<(GroupKey, VideoHandle), DatasetError>;

/// Source of grouped, opened videos.
///
/// A dataset build walks the catalog twice (counting, then extracting), so
/// `scan` must be callable repeatedly and every call must yield an
/// independent sequence of freshly opened handles. Each handle is dropped by
/// the consumer before the next entry is pulled.
pub trait VideoCatalog {
    fn scan(&self) -> Result<Box<dyn Iterator<Item = CatalogEntry> + '_>, DatasetError>;
}
