use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use std::collections::HashMap;

use crate::api::error::ApiError;
use crate::logic::ValidationError;
use crate::model::{non_empty, Id};

/// A file part of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Fields of a create/upload request, gathered from the query string and an
/// optional multipart body. Names are matched case-insensitively and body
/// fields override query fields of the same name.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub async fn collect(
        query: HashMap<String, String>,
        multipart: Option<Multipart>,
    ) -> Result<Self, ApiError> {
        let mut form = FormData::default();
        for (name, value) in query {
            form.fields.insert(name.to_lowercase(), value);
        }

        let Some(mut multipart) = multipart else {
            return Ok(form);
        };

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let Some(name) = field.name().map(str::to_lowercase) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(multipart_error)?;
                    // Browsers send an empty part when no file was picked
                    if !bytes.is_empty() {
                        form.files.insert(name, UploadedFile { file_name, bytes });
                    }
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(multipart_error)?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Required integer field.
    pub fn id(&self, name: &str) -> Result<Id, ValidationError> {
        let value = non_empty(self.text(name))
            .ok_or_else(|| ValidationError::MissingFields(name.to_string()))?;
        value
            .trim()
            .parse()
            .map_err(|_| ValidationError::Malformed(format!("'{value}' is not a valid {name}.")))
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(&name.to_lowercase())
    }
}

/// A body cut off by the request size limit is a 413; anything else is a
/// malformed form.
fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("Upload exceeds the request size limit: {}", err.body_text()))
    } else {
        ValidationError::Malformed(err.body_text()).into()
    }
}
