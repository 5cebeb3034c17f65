//! Request administration: submit, approve, reject and list.

use crate::core::notify::{dispatch, Notification, NotificationKind, NotifiedItem, Notifier};
use crate::core::store::StateStore;
use crate::models::request::{PendingRequest, RequestStatus};
use crate::{Error, Result};

/// All stored requests, newest first.
pub fn list_requests(store: &StateStore) -> Result<Vec<PendingRequest>> {
    let mut requests = store.requests()?;
    requests.sort_by(|a, b| b.request_date.cmp(&a.request_date));
    Ok(requests)
}

/// Store a new request and announce it.
///
/// Fails if an open request for the same title already exists.
pub async fn add_request(
    store: &StateStore,
    notifier: &dyn Notifier,
    request: PendingRequest,
) -> Result<PendingRequest> {
    let mut requests = store.requests()?;
    let key = request.library_key();
    if requests
        .iter()
        .any(|r| r.status.is_open() && r.library_key() == key)
    {
        return Err(Error::DuplicateRequest(key.to_string()));
    }

    requests.push(request.clone());
    store.set_requests(&requests)?;
    tracing::info!(key = %key, requested_by = %request.requested_by, "Request submitted");

    let notification = Notification {
        kind: NotificationKind::Request,
        item: NotifiedItem::from_request(&request),
        requested_by: request.requested_by.clone(),
        poster_override: None,
    };
    dispatch(notifier, &notification).await;

    Ok(request)
}

/// Move a pending request to `processing`.
///
/// Approved requests stay open and are completed by the reconciler like
/// pending ones.
pub fn approve_request(store: &StateStore, id: &str) -> Result<PendingRequest> {
    let mut requests = store.requests()?;
    let request = requests
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| Error::RequestNotFound(id.to_string()))?;

    if request.status != RequestStatus::Pending {
        return Err(Error::other(format!(
            "Request {} is {}, only pending requests can be approved",
            id,
            request.status.label()
        )));
    }
    request.status = RequestStatus::Processing;
    let approved = request.clone();

    store.set_requests(&requests)?;
    tracing::info!(request = %id, "Request approved");
    Ok(approved)
}

/// Mark a request as rejected. Completed requests cannot be rejected.
pub fn reject_request(store: &StateStore, id: &str) -> Result<PendingRequest> {
    let mut requests = store.requests()?;
    let request = requests
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| Error::RequestNotFound(id.to_string()))?;

    if request.status == RequestStatus::Completed {
        return Err(Error::other(format!("Request {} is already completed", id)));
    }
    request.status = RequestStatus::Rejected;
    let rejected = request.clone();

    store.set_requests(&requests)?;
    tracing::info!(request = %id, "Request rejected");
    Ok(rejected)
}
