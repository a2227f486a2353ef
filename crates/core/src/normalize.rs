use crate::{GroundingChunk, GroundingSource, MapPlace};
use serde_json::Value;
use tracing::debug;

pub fn classify(value: Value) -> GroundingSource {
    let Value::Object(mut fields) = value else {
        return GroundingSource::Unmapped;
    };

    match fields.remove("maps") {
        Some(maps @ Value::Object(_)) => match serde_json::from_value::<MapPlace>(maps) {
            Ok(place) => GroundingSource::Maps(place),
            Err(error) => {
                debug!(%error, "maps grounding chunk has an unexpected shape");
                GroundingSource::Unmapped
            }
        },
        _ => GroundingSource::Unmapped,
    }
}

pub fn normalize(raw_chunks: Vec<Value>) -> Vec<GroundingChunk> {
    let total = raw_chunks.len();
    let chunks: Vec<GroundingChunk> = raw_chunks
        .into_iter()
        .filter_map(|value| match classify(value) {
            GroundingSource::Maps(maps) => Some(GroundingChunk { maps }),
            GroundingSource::Unmapped => None,
        })
        .collect();

    if chunks.len() < total {
        debug!(
            kept = chunks.len(),
            dropped = total - chunks.len(),
            "dropped grounding chunks without a map place"
        );
    }

    chunks
}
