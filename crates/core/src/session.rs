use crate::traits::{LocationProvider, PlacesBackend};
use crate::{Coordinates, LocationError, SearchError, SearchOutcome, SearchResponse, SearchResult};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const EMPTY_QUERY_NOTICE: &str = "Please enter what you're looking for.";
pub const LOCATION_NEEDED_NOTICE: &str =
    "We need your location to find nearby DJs. Please allow location access.";
pub const REQUESTING_LOCATION_BANNER: &str = "Requesting location access to find DJs near you...";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    AwaitingLocation,
    LocationDenied(String),
    Ready,
    Searching,
    Error(String),
    Result(SearchResult),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    pub request_id: u64,
    pub query: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    AcquireLocation,
    Search(SearchTicket),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    // a search is already in flight
    Rejected,
    EmptyQuery,
    NeedsLocation,
    Started(SearchTicket),
}

impl Submission {
    pub fn effect(&self) -> Option<Effect> {
        match self {
            Self::Rejected | Self::EmptyQuery => None,
            Self::NeedsLocation => Some(Effect::AcquireLocation),
            Self::Started(ticket) => Some(Effect::Search(ticket.clone())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    state: SessionState,
    coordinates: Option<Coordinates>,
    notice: Option<String>,
    last_request_id: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            coordinates: None,
            notice: None,
            last_request_id: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        self.coordinates.is_some() && self.state != SessionState::Searching
    }

    pub fn outcome(&self) -> SearchOutcome<'_> {
        match &self.state {
            SessionState::Searching => SearchOutcome::Loading,
            SessionState::Error(message) => SearchOutcome::Failed(message),
            SessionState::Result(result) => SearchOutcome::Succeeded(result),
            _ => SearchOutcome::Empty,
        }
    }

    pub fn location_banner(&self) -> Option<&str> {
        match &self.state {
            SessionState::LocationDenied(reason) => Some(reason.as_str()),
            _ if self.coordinates.is_none() => Some(REQUESTING_LOCATION_BANNER),
            _ => None,
        }
    }

    pub fn mount(&mut self) -> Option<Effect> {
        if self.state != SessionState::Idle {
            return None;
        }
        self.request_location()
    }

    pub fn retry_location(&mut self) -> Option<Effect> {
        match self.state {
            SessionState::Idle | SessionState::LocationDenied(_) => self.request_location(),
            _ => None,
        }
    }

    pub fn location_resolved(&mut self, result: Result<Coordinates, LocationError>) {
        if self.state != SessionState::AwaitingLocation {
            debug!(session = %self.id, state = ?self.state, "ignoring late location result");
            return;
        }

        match result {
            Ok(coordinates) => {
                info!(
                    session = %self.id,
                    latitude = coordinates.latitude,
                    longitude = coordinates.longitude,
                    "location acquired"
                );
                self.coordinates = Some(coordinates);
                self.state = SessionState::Ready;
            }
            Err(error) => {
                warn!(session = %self.id, %error, "location unavailable");
                self.state = SessionState::LocationDenied(error.to_string());
            }
        }
    }

    pub fn submit(&mut self, query: &str) -> Submission {
        if self.state == SessionState::Searching {
            return Submission::Rejected;
        }

        if query.trim().is_empty() {
            self.notice = Some(EMPTY_QUERY_NOTICE.to_string());
            return Submission::EmptyQuery;
        }

        let Some(coordinates) = self.coordinates else {
            self.notice = Some(LOCATION_NEEDED_NOTICE.to_string());
            self.request_location();
            return Submission::NeedsLocation;
        };

        self.last_request_id += 1;
        self.notice = None;
        self.state = SessionState::Searching;
        info!(session = %self.id, request_id = self.last_request_id, "search started");

        Submission::Started(SearchTicket {
            request_id: self.last_request_id,
            query: query.to_string(),
            coordinates,
        })
    }

    pub fn search_resolved(
        &mut self,
        request_id: u64,
        result: Result<SearchResponse, SearchError>,
    ) -> bool {
        if self.state != SessionState::Searching || request_id != self.last_request_id {
            warn!(
                session = %self.id,
                request_id,
                latest = self.last_request_id,
                "discarding stale search reply"
            );
            return false;
        }

        self.state = match result {
            Ok(response) => {
                let result = SearchResult::from(response);
                info!(session = %self.id, request_id, places = result.places.len(), "search finished");
                SessionState::Result(result)
            }
            Err(error) => {
                warn!(session = %self.id, request_id, %error, "search failed");
                SessionState::Error(error.to_string())
            }
        };
        true
    }

    fn request_location(&mut self) -> Option<Effect> {
        self.state = SessionState::AwaitingLocation;
        Some(Effect::AcquireLocation)
    }
}

pub struct SessionController<L, B>
where
    L: LocationProvider,
    B: PlacesBackend,
{
    location: L,
    backend: B,
    session: Session,
}

impl<L, B> SessionController<L, B>
where
    L: LocationProvider + Send + Sync,
    B: PlacesBackend + Send + Sync,
{
    pub fn new(location: L, backend: B) -> Self {
        Self {
            location,
            backend,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn start(&mut self) -> &Session {
        let effect = self.session.mount();
        self.run(effect).await;
        &self.session
    }

    pub async fn retry_location(&mut self) -> &Session {
        let effect = self.session.retry_location();
        self.run(effect).await;
        &self.session
    }

    pub async fn submit(&mut self, query: &str) -> Submission {
        let submission = self.session.submit(query);
        self.run(submission.effect()).await;
        submission
    }

    async fn run(&mut self, effect: Option<Effect>) {
        match effect {
            None => {}
            Some(Effect::AcquireLocation) => {
                let result = self.location.acquire_location().await;
                self.session.location_resolved(result);
            }
            Some(Effect::Search(ticket)) => {
                let result = self.backend.search(&ticket.query, ticket.coordinates).await;
                self.session.search_resolved(ticket.request_id, result);
            }
        }
    }
}
