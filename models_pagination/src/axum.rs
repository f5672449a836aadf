use crate::{InvalidPage, PageRequest};
use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::{StatusCode, request::Parts};
use axum::response::IntoResponse;
use axum::{Json, async_trait};
use model_error_response::ErrorResponse;
use url::form_urlencoded;

/// The parsed `page` parameter together with the request uri needed to build page links
#[derive(Debug, Clone)]
pub struct PageExtractor {
    /// the validated page request
    pub request: PageRequest,
    /// the path the client called, including any router nesting
    pub path: String,
    /// the raw query string the client sent
    pub query: Option<String>,
}

impl PageExtractor {
    /// build the response envelope for a page of results
    pub fn respond<T>(
        &self,
        page: crate::Page<T>,
    ) -> Result<crate::PaginatedResponse<T>, InvalidPage> {
        crate::PaginatedResponse::from_page(page, &self.request, &self.path, self.query.as_deref())
    }
}

impl IntoResponse for InvalidPage {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                message: "Invalid page.",
            }),
        )
            .into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PageExtractor
where
    S: Send + Sync,
{
    type Rejection = InvalidPage;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // nested routers strip their prefix from `parts.uri`
        let uri = match OriginalUri::from_request_parts(parts, state).await {
            Ok(OriginalUri(uri)) => uri,
            Err(never) => match never {},
        };

        let raw_page = uri.query().and_then(|q| {
            form_urlencoded::parse(q.as_bytes())
                .find(|(k, _)| k == "page")
                .map(|(_, v)| v.into_owned())
        });

        let request = PageRequest::parse(raw_page.as_deref())?;

        Ok(PageExtractor {
            request,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
        })
    }
}
