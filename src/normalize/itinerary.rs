use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::services::{search::ENGINE_IMAGES, SearchProvider};
use crate::types::{Itinerary, TripRequest};

/// Image hosts that block hot-linking; results served from these domains
/// are unusable as cover images.
const BLOCKED_IMAGE_HOSTS: &[&str] = &["gstatic"];

/// Validate an extracted itinerary tree and backfill its cover image.
///
/// Structural mismatches propagate as [`ApiError::Validation`] naming the
/// first offending field. Image resolution never fails past this function:
/// search errors and empty result sets both collapse into the placeholder
/// URL derived from the destination.
pub async fn normalize_itinerary(
    tree: Value,
    request: &TripRequest,
    search: Option<&dyn SearchProvider>,
) -> Result<Itinerary> {
    let mut itinerary = decode_itinerary(tree)?;

    if itinerary.days.len() != request.duration as usize {
        tracing::warn!(
            requested = request.duration,
            generated = itinerary.days.len(),
            "generated day count differs from requested duration"
        );
    }

    let missing_image = itinerary
        .image_url
        .as_deref()
        .map_or(true, |url| url.trim().is_empty());
    if missing_image {
        itinerary.image_url = Some(resolve_cover_image(search, &request.destination).await);
    }

    Ok(itinerary)
}

/// Typed decode with the first mismatched field named in the error.
fn decode_itinerary(tree: Value) -> Result<Itinerary> {
    let raw = tree.to_string();
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() {
            "<root>".to_string()
        } else {
            path
        };
        ApiError::Validation(format!("itinerary field `{location}`: {}", err.inner()))
    })
}

/// Three-tier cover image lookup: best search hit, else placeholder;
/// the placeholder also absorbs search failures.
async fn resolve_cover_image(search: Option<&dyn SearchProvider>, destination: &str) -> String {
    let Some(search) = search else {
        return placeholder_image_url(destination);
    };

    match search.search(ENGINE_IMAGES, &[("q", destination)]).await {
        Ok(results) => {
            best_image_url(&results).unwrap_or_else(|| placeholder_image_url(destination))
        }
        Err(err) => {
            tracing::warn!(destination, error = %err, "cover image search failed");
            placeholder_image_url(destination)
        }
    }
}

/// Pick the largest usable image from an image-search result tree.
fn best_image_url(results: &Value) -> Option<String> {
    let images = results.get("images_results")?.as_array()?;

    images
        .iter()
        .filter_map(|img| {
            let original = img.get("original")?.as_str()?;
            if BLOCKED_IMAGE_HOSTS.iter().any(|host| original.contains(host)) {
                return None;
            }
            let width = img.get("original_width").and_then(Value::as_u64).unwrap_or(0);
            let height = img
                .get("original_height")
                .and_then(Value::as_u64)
                .unwrap_or(0);
            Some((width * height, original.to_string()))
        })
        .max_by_key(|(area, _)| *area)
        .map(|(_, url)| url)
}

/// Generic fallback image parameterized by the destination name.
fn placeholder_image_url(destination: &str) -> String {
    let encoded = destination.replace(' ', "+");
    format!("https://source.unsplash.com/1200x600/?{encoded},travel")
}
