//! Read-only fetches of events and builds.
//!
//! Public listings degrade to an empty list on failure (logged at `warn`);
//! the address-scoped draft listing surfaces `ApiError::FetchFailed`.
//! Records are decoded one by one: an entry that is not an object is
//! skipped without dropping the rest of the listing.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::api::signed_write::DEFAULT_ADDRESS_HEADER;
use crate::api::types::{Build, Event};
use crate::transport::{ApiRequest, HttpTransport, TransportError};

/// Client for the unauthenticated and address-scoped listings.
#[derive(Debug, Clone)]
pub struct ReadClient<T> {
    transport: T,
    address_header: String,
}

impl<T: HttpTransport> ReadClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            address_header: DEFAULT_ADDRESS_HEADER.to_string(),
        }
    }

    pub fn with_address_header(mut self, name: impl Into<String>) -> Self {
        self.address_header = name.into();
        self
    }

    async fn fetch_list<D: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Vec<D>, TransportError> {
        let path = request.path_string();
        let records: Vec<Value> = self.transport.send(request).await?.json()?;
        Ok(decode_records(&path, records))
    }

    /// `GET /events`, newest first as returned by the backend.
    pub async fn get_all_events(&self, limit: Option<u32>) -> Vec<Event> {
        let mut request = ApiRequest::get(["events"]);
        if let Some(limit) = limit {
            request = request.query("limit", limit);
        }

        self.fetch_list(request).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Error fetching events");
            Vec::new()
        })
    }

    /// `GET /builds`, optionally filtered on the featured flag.
    pub async fn get_all_builds(&self, featured: Option<bool>) -> Vec<Build> {
        let mut request = ApiRequest::get(["builds"]);
        if let Some(featured) = featured {
            request = request.query("featured", featured);
        }

        self.fetch_list(request).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, ?featured, "Error fetching builds");
            Vec::new()
        })
    }

    pub async fn get_featured_builds(&self) -> Vec<Build> {
        self.get_all_builds(Some(true)).await
    }

    /// Draft builds visible to `address`.
    pub async fn get_draft_builds(&self, address: &str) -> ApiResult<Vec<Build>> {
        let request = ApiRequest::get(["builds"])
            .query("isDraft", true)
            .header(self.address_header.clone(), address);

        self.fetch_list(request).await.map_err(|e| {
            tracing::error!(error = %e, %address, "Error fetching draft builds");
            ApiError::FetchFailed {
                message: "Error fetching draft builds".to_string(),
                source: e,
            }
        })
    }
}

fn decode_records<D: DeserializeOwned>(path: &str, records: Vec<Value>) -> Vec<D> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(%path, index, error = %e, "Skipping undecodable record");
                None
            }
        })
        .collect()
}
