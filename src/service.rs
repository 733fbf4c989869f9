/// External AI transformation service
///
/// The service is an opaque async collaborator: it accepts a source photo
/// plus a style definition and returns the URI of the result image. This
/// module does not define the transformation itself, only the call. The
/// photo is downscaled before upload so a 45 MP capture does not go over
/// the wire at full size.

use std::io::Cursor;
use std::path::PathBuf;

use image::imageops::FilterType;
use serde::Deserialize;
use thiserror::Error;
use tokio::task;

use crate::state::data::Transformation;

/// Base URL of the transformation service
const SERVICE_ENDPOINT: &str = "https://api.restyle.app/v1";

/// Longest edge of the upload copy
const UPLOAD_MAX_EDGE: u32 = 1280;

/// JPEG quality of the upload copy
const UPLOAD_JPEG_QUALITY: u8 = 88;

/// Failure of a service call, worded for direct display
#[derive(Debug, Error)]
pub enum StylistError {
    #[error("Could not read the photo: {0}")]
    Photo(String),
    #[error("Could not reach the style service: {0}")]
    Request(String),
    #[error("The style service rejected the request: {0}")]
    Rejected(String),
    #[error("Your session was not accepted. Sign in again and retry.")]
    Unauthorized,
}

#[derive(Debug, Deserialize)]
struct TransformResponse {
    result_url: String,
}

/// Refreshed credentials returned by the auth endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: Option<i64>,
}

/// Apply a style to a captured photo
///
/// Returns the URI of the result image. The caller must hold a valid
/// session; a stale token comes back as `Unauthorized`.
pub async fn apply_style(
    access_token: String,
    photo_path: PathBuf,
    transformation: Transformation,
) -> Result<String, StylistError> {
    let jpeg = prepare_upload(photo_path).await?;

    let parameters = transformation
        .parameters
        .to_json()
        .map_err(|e| StylistError::Request(e.to_string()))?;

    let part = reqwest::multipart::Part::bytes(jpeg)
        .file_name("photo.jpg")
        .mime_str("image/jpeg")
        .map_err(|e| StylistError::Request(e.to_string()))?;

    let form = reqwest::multipart::Form::new()
        .part("photo", part)
        .text("style_id", transformation.id.clone())
        .text("parameters", parameters);

    println!("🎨 Applying style '{}'...", transformation.name);

    let response = reqwest::Client::new()
        .post(format!("{SERVICE_ENDPOINT}/transform"))
        .bearer_auth(access_token)
        .multipart(form)
        .send()
        .await
        .map_err(|e| StylistError::Request(e.to_string()))?;

    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Err(StylistError::Unauthorized);
    }
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(StylistError::Rejected(format!("{status}: {body}")));
    }

    let parsed: TransformResponse = response
        .json()
        .await
        .map_err(|e| StylistError::Request(e.to_string()))?;

    println!("✅ Style '{}' complete", transformation.name);
    Ok(parsed.result_url)
}

/// Exchange the refresh token for fresh session credentials
pub async fn refresh_session(refresh_token: String) -> Result<RefreshedTokens, StylistError> {
    let response = reqwest::Client::new()
        .post(format!("{SERVICE_ENDPOINT}/auth/refresh"))
        .json(&serde_json::json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .map_err(|e| StylistError::Request(e.to_string()))?;

    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Err(StylistError::Unauthorized);
    }
    if !response.status().is_success() {
        return Err(StylistError::Rejected(response.status().to_string()));
    }

    response
        .json()
        .await
        .map_err(|e| StylistError::Request(e.to_string()))
}

/// Decode the captured photo and re-encode a bounded upload copy
///
/// Runs the decode/resize on a blocking thread; image work is CPU-bound.
async fn prepare_upload(photo_path: PathBuf) -> Result<Vec<u8>, StylistError> {
    let bytes = tokio::fs::read(&photo_path)
        .await
        .map_err(|e| StylistError::Photo(format!("{}: {e}", photo_path.display())))?;

    task::spawn_blocking(move || {
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| StylistError::Photo(e.to_string()))?;

        let bounded = if decoded.width().max(decoded.height()) > UPLOAD_MAX_EDGE {
            decoded.resize(UPLOAD_MAX_EDGE, UPLOAD_MAX_EDGE, FilterType::Lanczos3)
        } else {
            decoded
        };

        let mut out = Cursor::new(Vec::new());
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
            &mut out,
            UPLOAD_JPEG_QUALITY,
        );
        bounded
            .to_rgb8()
            .write_with_encoder(encoder)
            .map_err(|e| StylistError::Photo(e.to_string()))?;

        Ok(out.into_inner())
    })
    .await
    .map_err(|e| StylistError::Photo(format!("task join error: {e}")))?
}
