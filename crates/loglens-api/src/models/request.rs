use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
    Json,
};

use super::response::ApiError;

/// Fields of the `/api/analyze` multipart form
#[derive(Debug)]
pub struct AnalyzeUpload {
    pub filename: String,
    pub bytes: Bytes,
    /// empty when the form has no `query` field
    pub query: String,
}

impl AnalyzeUpload {
    pub async fn from_multipart(
        multipart: &mut Multipart,
    ) -> Result<Self, (StatusCode, Json<ApiError>)> {
        let mut file: Option<(String, Bytes)> = None;
        let mut query = String::new();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("file") => {
                    let filename = field.file_name().unwrap_or("upload").to_string();
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    file = Some((filename, bytes));
                }
                Some("query") => {
                    query = field.text().await.map_err(multipart_error)?;
                }
                // unknown form fields are ignored
                _ => {}
            }
        }

        let (filename, bytes) =
            file.ok_or_else(|| ApiError::unprocessable("Missing required form field 'file'"))?;

        Ok(Self {
            filename,
            bytes,
            query,
        })
    }
}

fn multipart_error(e: MultipartError) -> (StatusCode, Json<ApiError>) {
    ApiError::new(e.status(), e.body_text())
}
