use serde::{Deserialize, Serialize};

/// Body of `POST /posts` and `POST /posts/comment/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct TextRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: &'static str,
}
