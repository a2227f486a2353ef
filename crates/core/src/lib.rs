pub mod error;
pub mod gemini;
pub mod location;
pub mod models;
pub mod normalize;
pub mod prompt;
pub mod session;
pub mod traits;
pub mod view;

pub use error::{ConfigError, LocationError, SearchError};
pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL};
pub use location::{
    IpLocationConfig, IpLocationProvider, LocationCapability, DEFAULT_GEOLOCATION_TIMEOUT,
    DEFAULT_GEOLOCATION_URL,
};
pub use models::{
    Coordinates, GroundingChunk, GroundingSource, MapPlace, PlaceAnswerSource, ReviewSnippet,
    SearchOutcome, SearchResponse, SearchResult, MAX_DISPLAY_SNIPPETS,
};
pub use normalize::{classify, normalize};
pub use prompt::build_prompt;
pub use session::{Effect, SearchTicket, Session, SessionController, SessionState, Submission};
pub use traits::{LocationProvider, PlacesBackend};
pub use view::render;
