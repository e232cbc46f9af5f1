//! Integration tests for the shared moderation lifecycle.
//!
//! - approve / reject only from pending
//! - rejection reasons validated before any write
//! - soft delete hides items from every action
//! - concurrent approvals: exactly one wins
//! - a write that loses its conditional UPDATE is stale, or NotFound if the
//!   row was deleted meanwhile

mod common;

use crate::common::*;
use backoffice_core::common::{MemberId, ModerationError, MAX_REASON_LEN};
use backoffice_core::domains::ads::Ad;
use backoffice_core::domains::campaigns::Campaign;
use backoffice_core::domains::moderation::models::store;
use backoffice_core::domains::moderation::{
    approve, archive, delete, reject, status_counts, ContentKind, ModerationStatus, PresetReason,
    RejectionReason,
};
use test_context::test_context;

// =============================================================================
// Approve
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn approve_records_reviewer(ctx: &TestHarness) {
    let ad = create_pending_ad(ctx, "Sofa for sale").await.unwrap();
    assert_eq!(ad.review.status, ModerationStatus::Pending);
    assert!(ad.review.reviewed_by.is_none());
    assert!(ad.review.reviewed_at.is_none());

    let reviewer = MemberId::new();
    let outcome = approve::<Ad>(ad.id, reviewer, &ctx.deps).await.unwrap();

    assert_eq!(outcome.item.review.status, ModerationStatus::Approved);
    assert_eq!(outcome.item.review.reviewed_by, Some(reviewer));
    assert!(outcome.item.review.reviewed_at.is_some());
    assert!(outcome.item.review.rejection_reason.is_none());
    assert!(outcome.estimated_recipients.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn approve_twice_is_an_invalid_transition(ctx: &TestHarness) {
    let ad = create_pending_ad(ctx, "Lamp").await.unwrap();
    let first_reviewer = MemberId::new();
    approve::<Ad>(ad.id, first_reviewer, &ctx.deps).await.unwrap();

    let err = approve::<Ad>(ad.id, MemberId::new(), &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::InvalidTransition { .. }));

    let stored = Ad::find_live(ad.id, &ctx.db_pool).await.unwrap();
    assert_eq!(stored.review.reviewed_by, Some(first_reviewer));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rejected_items_cannot_be_approved(ctx: &TestHarness) {
    let ad = create_pending_ad(ctx, "Duplicate listing").await.unwrap();
    reject::<Ad>(ad.id, MemberId::new(), PresetReason::Duplicate, &ctx.deps)
        .await
        .unwrap();

    let err = approve::<Ad>(ad.id, MemberId::new(), &ctx.deps)
        .await
        .unwrap_err();
    assert!(err.is_stale_state());

    let stored = Ad::find_live(ad.id, &ctx.db_pool).await.unwrap();
    assert_eq!(stored.review.status, ModerationStatus::Rejected);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn staff_authored_items_start_approved(ctx: &TestHarness) {
    let campaign = create_campaign(ctx, "Food drive", staff()).await.unwrap();
    assert_eq!(campaign.review.status, ModerationStatus::Approved);
    assert_eq!(campaign.review.reviewed_by, Some(campaign.review.submitted_by));
    assert!(campaign.review.reviewed_at.is_some());

    let err = approve::<Campaign>(campaign.id, MemberId::new(), &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::InvalidTransition { .. }));
}

// =============================================================================
// Reject
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn reject_stores_reason(ctx: &TestHarness) {
    let ad = create_pending_ad(ctx, "Suspicious offer").await.unwrap();

    let outcome = reject::<Ad>(
        ad.id,
        MemberId::new(),
        RejectionReason::other("  Phone number does not work  "),
        &ctx.deps,
    )
    .await
    .unwrap();

    assert_eq!(outcome.item.review.status, ModerationStatus::Rejected);
    assert_eq!(
        outcome.item.review.rejection_reason.as_deref(),
        Some("Phone number does not work")
    );
    assert!(outcome.item.review.reviewed_by.is_some());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reject_with_empty_reason_leaves_item_pending(ctx: &TestHarness) {
    let ad = create_pending_ad(ctx, "Guitar").await.unwrap();

    let err = reject::<Ad>(ad.id, MemberId::new(), "   ", &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::Validation(_)));

    let stored = Ad::find_live(ad.id, &ctx.db_pool).await.unwrap();
    assert_eq!(stored.review.status, ModerationStatus::Pending);
    assert!(stored.review.reviewed_by.is_none());
    assert!(stored.review.rejection_reason.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reject_with_overlong_reason_is_a_validation_error(ctx: &TestHarness) {
    let ad = create_pending_ad(ctx, "Bookshelf").await.unwrap();
    let reason = "x".repeat(MAX_REASON_LEN + 1);

    let err = reject::<Ad>(ad.id, MemberId::new(), reason, &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::Validation(_)));
}

// =============================================================================
// Archive
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn manual_archive_only_from_approved(ctx: &TestHarness) {
    let ad = create_pending_ad(ctx, "Winter tyres").await.unwrap();

    let err = archive::<Ad>(ad.id, &ctx.deps).await.unwrap_err();
    assert!(matches!(err, ModerationError::InvalidTransition { .. }));

    approve::<Ad>(ad.id, MemberId::new(), &ctx.deps).await.unwrap();
    let outcome = archive::<Ad>(ad.id, &ctx.deps).await.unwrap();
    assert_eq!(outcome.item.review.status, ModerationStatus::Archived);

    let err = archive::<Ad>(ad.id, &ctx.deps).await.unwrap_err();
    assert!(matches!(err, ModerationError::InvalidTransition { .. }));
}

// =============================================================================
// Soft delete
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn deleted_items_are_not_found_by_actions(ctx: &TestHarness) {
    let ad = create_pending_ad(ctx, "Old bike").await.unwrap();
    delete::<Ad>(ad.id, &ctx.deps).await.unwrap();

    let err = approve::<Ad>(ad.id, MemberId::new(), &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::NotFound { .. }));

    let err = reject::<Ad>(ad.id, MemberId::new(), PresetReason::Spam, &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::NotFound { .. }));

    let err = archive::<Ad>(ad.id, &ctx.deps).await.unwrap_err();
    assert!(matches!(err, ModerationError::NotFound { .. }));

    let err = Ad::find_live(ad.id, &ctx.db_pool).await.unwrap_err();
    assert!(matches!(err, ModerationError::NotFound { .. }));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn delete_keeps_status_and_is_repeatable(ctx: &TestHarness) {
    let ad = create_ad(ctx, "Table", uuid::Uuid::now_v7(), staff())
        .await
        .unwrap();

    delete::<Ad>(ad.id, &ctx.deps).await.unwrap();
    let tombstone = store::find_by_id::<Ad>(ad.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    let deleted_at = tombstone.review.deleted_at.unwrap();
    assert_eq!(tombstone.review.status, ModerationStatus::Approved);

    delete::<Ad>(ad.id, &ctx.deps).await.unwrap();
    let again = store::find_by_id::<Ad>(ad.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.review.deleted_at, Some(deleted_at));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn delete_of_unknown_id_is_not_found(ctx: &TestHarness) {
    let err = delete::<Ad>(backoffice_core::common::AdId::new(), &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::NotFound { .. }));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_approvals_apply_exactly_once(ctx: &TestHarness) {
    let ad = create_pending_ad(ctx, "Contested item").await.unwrap();
    let first = MemberId::new();
    let second = MemberId::new();

    let (a, b) = tokio::join!(
        approve::<Ad>(ad.id, first, &ctx.deps),
        approve::<Ad>(ad.id, second, &ctx.deps),
    );

    let winners: Vec<_> = [&a, &b].into_iter().filter(|r| r.is_ok()).collect();
    assert_eq!(winners.len(), 1, "exactly one approval must win");

    let loser = if a.is_ok() { b.unwrap_err() } else { a.unwrap_err() };
    assert!(
        loser.is_stale_state(),
        "loser should see InvalidTransition or ConflictWriteLost, got {loser:?}"
    );

    let stored = Ad::find_live(ad.id, &ctx.db_pool).await.unwrap();
    assert_eq!(stored.review.status, ModerationStatus::Approved);
    let reviewer = stored.review.reviewed_by.unwrap();
    assert!(reviewer == first || reviewer == second);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn approval_overtaken_by_a_committed_approval_is_write_lost(ctx: &TestHarness) {
    let ad = create_pending_ad(ctx, "Overtaken approval").await.unwrap();
    let held = HeldWrite::start(
        &ctx.db_pool,
        "UPDATE ads SET status = 'approved', reviewed_by = gen_random_uuid(), \
         reviewed_at = NOW() WHERE id = $1",
        ad.id.into_uuid(),
    )
    .await
    .unwrap();

    let reviewer = MemberId::new();
    let (result, committed) = tokio::join!(
        approve::<Ad>(ad.id, reviewer, &ctx.deps),
        held.commit_when_blocked(&ctx.db_pool),
    );
    committed.unwrap();

    let err = result.unwrap_err();
    assert!(
        matches!(err, ModerationError::ConflictWriteLost { action: "approve", .. }),
        "expected ConflictWriteLost, got {err:?}"
    );
    assert!(err.is_stale_state());

    let stored = Ad::find_live(ad.id, &ctx.db_pool).await.unwrap();
    assert_eq!(stored.review.status, ModerationStatus::Approved);
    assert_ne!(stored.review.reviewed_by, Some(reviewer));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rejection_overtaken_by_a_delete_is_not_found(ctx: &TestHarness) {
    let ad = create_pending_ad(ctx, "Deleted mid-review").await.unwrap();
    let held = HeldWrite::start(
        &ctx.db_pool,
        "UPDATE ads SET deleted_at = NOW() WHERE id = $1",
        ad.id.into_uuid(),
    )
    .await
    .unwrap();

    let (result, committed) = tokio::join!(
        reject::<Ad>(ad.id, MemberId::new(), "Duplicate listing", &ctx.deps),
        held.commit_when_blocked(&ctx.db_pool),
    );
    committed.unwrap();

    let err = result.unwrap_err();
    assert!(
        matches!(err, ModerationError::NotFound { .. }),
        "expected NotFound, got {err:?}"
    );

    let stored = store::find_by_id::<Ad>(ad.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.review.is_deleted());
    assert_eq!(stored.review.status, ModerationStatus::Pending);
}

// =============================================================================
// Queue statistics
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn status_counts_cover_every_status(ctx: &TestHarness) {
    let pending = create_pending_ad(ctx, "Counted pending").await.unwrap();
    let rejected = create_pending_ad(ctx, "Counted rejected").await.unwrap();
    reject::<Ad>(rejected.id, MemberId::new(), PresetReason::OutOfArea, &ctx.deps)
        .await
        .unwrap();
    let deleted = create_pending_ad(ctx, "Counted deleted").await.unwrap();
    delete::<Ad>(deleted.id, &ctx.deps).await.unwrap();

    let counts = status_counts(ContentKind::Ad, &ctx.deps).await.unwrap();
    assert_eq!(counts.kind, ContentKind::Ad);
    assert!(counts.get(ModerationStatus::Pending) >= 1);
    assert!(counts.get(ModerationStatus::Rejected) >= 1);
    assert_eq!(
        counts.total(),
        counts.pending + counts.approved + counts.rejected + counts.archived
    );

    let stored = Ad::find_live(pending.id, &ctx.db_pool).await.unwrap();
    assert_eq!(stored.review.status, ModerationStatus::Pending);
}
