//! HTTP client for the geospatial zone service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use altwatch_core::Zone;

use super::ZoneQuery;
use crate::error::ZoneQueryError;

pub struct HttpZoneQuery {
    client: Client,
    base_url: String,
}

impl HttpZoneQuery {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ZoneQueryError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Full zone list, used to refresh the local fallback copy.
    pub async fn list_zones(&self) -> Result<Vec<Zone>, ZoneQueryError> {
        let url = format!("{}/v1/zones", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ZoneQueryError::Status(response.status().as_u16()));
        }
        Ok(response.json::<Vec<Zone>>().await?)
    }
}

#[async_trait]
impl ZoneQuery for HttpZoneQuery {
    async fn zones_containing(&self, lat: f64, lon: f64) -> Result<Vec<Zone>, ZoneQueryError> {
        let url = format!("{}/v1/zones/containing", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("lat", lat), ("lon", lon)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ZoneQueryError::Status(response.status().as_u16()));
        }
        Ok(response.json::<Vec<Zone>>().await?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::zones::tests::runway_zone;
    use axum::extract::State;
    use axum::http::{header, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::Router;
    use std::sync::atomic::{AtomicU16, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-process zone service answering every route with a settable status and body.
    pub(crate) struct ZoneServiceStub {
        status: AtomicU16,
        body: Mutex<String>,
    }

    impl ZoneServiceStub {
        pub(crate) fn serving(zones: &[Zone]) -> Arc<Self> {
            let stub = Arc::new(Self {
                status: AtomicU16::new(200),
                body: Mutex::new(String::new()),
            });
            stub.set_zones(zones);
            stub
        }

        pub(crate) fn set(&self, status: u16, body: impl Into<String>) {
            self.status.store(status, Ordering::SeqCst);
            *self.body.lock().unwrap() = body.into();
        }

        pub(crate) fn set_zones(&self, zones: &[Zone]) {
            self.set(200, serde_json::to_string(zones).unwrap());
        }
    }

    async fn respond(State(stub): State<Arc<ZoneServiceStub>>) -> Response {
        let status = StatusCode::from_u16(stub.status.load(Ordering::SeqCst)).unwrap();
        let body = stub.body.lock().unwrap().clone();
        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    }

    /// Serve the stub on an ephemeral local port and return its base URL.
    pub(crate) async fn spawn_zone_service(stub: Arc<ZoneServiceStub>) -> String {
        let app = Router::new()
            .route("/v1/zones", get(respond))
            .route("/v1/zones/containing", get(respond))
            .with_state(stub);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error() {
        // Port 9 (discard) is not expected to serve HTTP locally.
        let query = HttpZoneQuery::new("http://127.0.0.1:9/", Duration::from_millis(200)).unwrap();
        assert_eq!(query.base_url, "http://127.0.0.1:9");
        assert!(query.zones_containing(40.0, -73.0).await.is_err());
    }

    #[tokio::test]
    async fn lists_zones_from_service() {
        let base = spawn_zone_service(ZoneServiceStub::serving(&[runway_zone()])).await;
        let query = HttpZoneQuery::new(base, Duration::from_secs(2)).unwrap();

        assert_eq!(query.list_zones().await.unwrap(), vec![runway_zone()]);
        assert_eq!(
            query.zones_containing(40.6413, -73.7781).await.unwrap(),
            vec![runway_zone()]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let stub = ZoneServiceStub::serving(&[]);
        stub.set(503, "maintenance");
        let base = spawn_zone_service(stub).await;
        let query = HttpZoneQuery::new(base, Duration::from_secs(2)).unwrap();

        assert!(matches!(query.list_zones().await, Err(ZoneQueryError::Status(503))));
        assert!(matches!(
            query.zones_containing(40.0, -73.0).await,
            Err(ZoneQueryError::Status(503))
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let stub = ZoneServiceStub::serving(&[]);
        stub.set(200, "[{\"name\": 42}]");
        let base = spawn_zone_service(stub).await;
        let query = HttpZoneQuery::new(base, Duration::from_secs(2)).unwrap();

        assert!(matches!(query.list_zones().await, Err(ZoneQueryError::Http(_))));
    }

    #[tokio::test]
    async fn oracle_falls_back_when_service_errors() {
        use crate::zones::{LocalZones, ZoneOracle};
        use altwatch_core::ContainmentSource;

        let stub = ZoneServiceStub::serving(&[]);
        stub.set(500, "boom");
        let base = spawn_zone_service(stub).await;
        let oracle = ZoneOracle::new(
            Arc::new(HttpZoneQuery::new(base, Duration::from_secs(2)).unwrap()),
            Arc::new(LocalZones::new(vec![runway_zone()])),
            Duration::from_secs(2),
        );

        let containment = oracle.contains(40.6413, -73.7781).await;
        assert!(containment.inside());
        assert_eq!(containment.source, ContainmentSource::Fallback);
    }
}
