use crate::{Coordinates, LocationError, SearchError, SearchResponse};
use async_trait::async_trait;

#[async_trait]
pub trait LocationProvider {
    async fn acquire_location(&self) -> Result<Coordinates, LocationError>;
}

#[async_trait]
pub trait PlacesBackend {
    async fn search(
        &self,
        query: &str,
        coordinates: Coordinates,
    ) -> Result<SearchResponse, SearchError>;
}
