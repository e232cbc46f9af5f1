use serde::Serialize;
use sqlx::postgres::PgRow;

use super::{ContentKind, ReviewState};
use crate::common::Id;
use crate::domains::audience::AudienceDescriptor;

/// The capability the moderation lifecycle works on.
///
/// Each content kind is its own record type; the state machine, archival and
/// listing code only ever touch what this trait exposes.
pub trait Moderatable:
    for<'r> sqlx::FromRow<'r, PgRow> + Serialize + std::fmt::Debug + Send + Sync + Unpin + 'static
{
    /// Marker type the item's `Id` is tagged with.
    type Entity: 'static;

    const KIND: ContentKind;

    fn id(&self) -> Id<Self::Entity>;

    fn review(&self) -> &ReviewState;

    /// Targeting of the item, for kinds that have one.
    fn audience(&self) -> Option<&AudienceDescriptor> {
        None
    }
}
