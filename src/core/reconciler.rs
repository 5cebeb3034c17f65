//! Request reconciler: completes open requests that reached the library.

use crate::core::notify::{dispatch, Notification, NotificationKind, NotifiedItem, Notifier};
use crate::models::library::LibraryIndex;
use crate::models::request::{PendingRequest, RequestStatus};
use chrono::{DateTime, Utc};

/// Flip every open (`pending` or `processing`) request whose title is in
/// `index` to `completed`.
///
/// Returns copies of the requests completed by this pass. Completed and
/// rejected requests are never touched, so repeated passes are no-ops.
pub fn reconcile_requests(
    requests: &mut [PendingRequest],
    index: &LibraryIndex,
    now: DateTime<Utc>,
) -> Vec<PendingRequest> {
    let mut completed = Vec::new();

    for request in requests
        .iter_mut()
        .filter(|r| r.status.is_open())
    {
        if index.contains(&request.library_key()) {
            request.status = RequestStatus::Completed;
            request.completed_at = Some(now);
            tracing::info!(
                request = %request.id,
                key = %request.library_key(),
                requested_by = %request.requested_by,
                "Request completed"
            );
            completed.push(request.clone());
        }
    }

    completed
}

/// Send one `completed` notification per request. Returns how many were
/// delivered; failures are logged and do not affect request state.
pub async fn notify_completed(notifier: &dyn Notifier, completed: &[PendingRequest]) -> usize {
    let mut delivered = 0;
    for request in completed {
        let notification = Notification {
            kind: NotificationKind::Completed,
            item: NotifiedItem::from_request(request),
            requested_by: request.requested_by.clone(),
            poster_override: None,
        };
        if dispatch(notifier, &notification).await {
            delivered += 1;
        }
    }
    delivered
}
