use actix_multipart::Multipart;
use actix_web::{HttpMessage, HttpRequest, web};
use futures_util::{StreamExt, TryStreamExt};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::errors::AppError;

/// Upper bound on a whole request body; per-field image limits are enforced by the rules.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// A file part received in a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn size_kib(&self) -> usize {
        self.bytes.len().div_ceil(1024)
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
    }
}

/// Raw request input: scalar/array fields plus uploaded files, before validation.
#[derive(Debug, Clone, Default)]
pub struct RequestForm {
    pub fields: Map<String, Value>,
    pub files: HashMap<String, UploadedFile>,
}

impl RequestForm {
    /// Read the body as multipart when the request says so, JSON otherwise.
    pub async fn from_request(req: &HttpRequest, payload: web::Payload) -> Result<Self, AppError> {
        if req.content_type().starts_with("multipart/") {
            Self::from_multipart(Multipart::new(req.headers(), payload)).await
        } else {
            let body = read_body(payload).await?;
            Self::from_json_bytes(&body)
        }
    }

    pub fn from_json_bytes(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Malformed JSON body: {e}")))?;
        Self::from_json(value)
    }

    pub fn from_json(value: Value) -> Result<Self, AppError> {
        match value {
            Value::Object(fields) => Ok(Self {
                fields,
                files: HashMap::new(),
            }),
            _ => Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            )),
        }
    }

    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();
        let mut total = 0usize;

        while let Some(mut field) = multipart
            .try_next()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_owned);
            let content_type = field.content_type().map(|m| m.essence_str().to_owned());

            let mut bytes = Vec::new();
            while let Some(chunk) = field
                .try_next()
                .await
                .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
            {
                total += chunk.len();
                if total > MAX_BODY_BYTES {
                    return Err(AppError::BadRequest("Request body too large".to_string()));
                }
                bytes.extend_from_slice(&chunk);
            }

            match file_name {
                // An empty file input still arrives as a part; treat it as absent.
                Some(file_name) if file_name.is_empty() && bytes.is_empty() => {}
                Some(file_name) => {
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name: Some(file_name),
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let text = String::from_utf8(bytes).map_err(|_| {
                        AppError::BadRequest(format!("Field {name} is not valid UTF-8"))
                    })?;
                    form.insert_text(&name, text);
                }
            }
        }

        Ok(form)
    }

    /// Insert a text part, honouring the `name[]` and `name[key]` form conventions.
    pub fn insert_text(&mut self, name: &str, text: String) {
        if let Some(base) = name.strip_suffix("[]") {
            let entry = self
                .fields
                .entry(base.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = entry {
                items.push(Value::String(text));
            }
            return;
        }

        if let Some((base, rest)) = name.split_once('[') {
            if let Some(key) = rest.strip_suffix(']') {
                let entry = self
                    .fields
                    .entry(base.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(map) = entry {
                    map.insert(key.to_string(), Value::String(text));
                }
                return;
            }
        }

        self.fields.insert(name.to_string(), Value::String(text));
    }
}

async fn read_body(mut payload: web::Payload) -> Result<web::BytesMut, AppError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(format!("Failed to read body: {e}")))?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(AppError::BadRequest("Request body too large".to_string()));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
