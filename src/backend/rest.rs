use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, header};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{ExerciseCatalog, WorkoutBackend};
use crate::error::BackendError;
use crate::models::{CatalogExercise, NewWorkout, WorkoutExerciseRow, WorkoutRecord};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote store speaking PostgREST (`/rest/v1/<table>`), as exposed by a
/// hosted Postgres service.
#[derive(Debug, Clone)]
pub struct RestBackend {
    base_url: String,
    api_key: String,
    access_token: Option<String>,
    http: Client,
}

impl RestBackend {
    pub fn new(base_url: &str, api_key: &str, access_token: Option<String>) -> Result<Self, BackendError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token,
            http,
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Bearer token: the user's session if there is one, otherwise the
    /// anonymous key.
    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.as_deref().unwrap_or(&self.api_key))
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = self.endpoint(table);
        debug!(%method, %url, "building request");

        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, self.bearer())
            .header(header::CONTENT_TYPE, "application/json")
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, BackendError> {
        let resp = check(req.send().await?).await?;
        Ok(resp.json::<T>().await?)
    }

    pub async fn list_workouts(&self) -> Result<Vec<WorkoutRecord>, BackendError> {
        let req = self
            .request(Method::GET, "workouts")
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        self.fetch(req).await
    }

    pub async fn find_workout(&self, workout_id: &str) -> Result<Option<WorkoutRecord>, BackendError> {
        let filter = format!("eq.{}", workout_id);
        let req = self
            .request(Method::GET, "workouts")
            .query(&[("select", "*"), ("id", filter.as_str())]);
        let rows: Vec<WorkoutRecord> = self.fetch(req).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn workout_exercises(&self, workout_id: &str) -> Result<Vec<WorkoutExerciseRow>, BackendError> {
        let filter = format!("eq.{}", workout_id);
        let req = self.request(Method::GET, "workout_exercises").query(&[
            ("select", "*"),
            ("workout_id", filter.as_str()),
            ("order", "position.asc"),
        ]);
        self.fetch(req).await
    }
}

/// `ilike` filter matching `query` anywhere in the value. `%`, `_` and `\`
/// are escaped for Postgres; `*` has no escape in PostgREST and becomes a
/// single-character wildcard.
fn ilike_filter(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 8);
    pattern.push_str("ilike.*");
    for c in query.chars() {
        match c {
            '\\' | '%' | '_' => {
                pattern.push('\\');
                pattern.push(c);
            }
            '*' => pattern.push('_'),
            c => pattern.push(c),
        }
    }
    pattern.push('*');
    pattern
}

/// Turn a non-2xx response into [`BackendError::Rejected`] carrying the body.
async fn check(resp: Response) -> Result<Response, BackendError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = resp.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), %message, "backend rejected request");
    Err(BackendError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl WorkoutBackend for RestBackend {
    async fn insert_workout(&self, record: &NewWorkout) -> Result<Option<WorkoutRecord>, BackendError> {
        let req = self
            .request(Method::POST, "workouts")
            .header("Prefer", "return=representation")
            .json(record);
        let rows: Vec<WorkoutRecord> = self.fetch(req).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_workout_exercises(&self, rows: &[WorkoutExerciseRow]) -> Result<(), BackendError> {
        if rows.is_empty() {
            return Ok(());
        }

        let req = self
            .request(Method::POST, "workout_exercises")
            .header("Prefer", "return=minimal")
            .json(rows);
        check(req.send().await?).await?;
        Ok(())
    }

    async fn delete_workout(&self, workout_id: &str) -> Result<(), BackendError> {
        let filter = format!("eq.{}", workout_id);
        let req = self
            .request(Method::DELETE, "workouts")
            .query(&[("id", filter.as_str())]);
        check(req.send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl ExerciseCatalog for RestBackend {
    async fn search(&self, query: &str) -> Result<Vec<CatalogExercise>, BackendError> {
        let mut params = vec![
            ("select", "id,name,description".to_string()),
            ("order", "name.asc".to_string()),
        ];
        let query = query.trim();
        if !query.is_empty() {
            params.push(("name", ilike_filter(query)));
        }

        let req = self.request(Method::GET, "exercises").query(&params);
        let mut rows: Vec<CatalogExercise> = self.fetch(req).await?;

        // The server filter can over-match where `*` was widened; narrow to a
        // plain substring here.
        let needle = query.to_lowercase();
        rows.retain(|ex| ex.name.to_lowercase().contains(&needle));
        Ok(rows)
    }

    async fn find(&self, id: &str) -> Result<Option<CatalogExercise>, BackendError> {
        let filter = format!("eq.{}", id);
        let req = self
            .request(Method::GET, "exercises")
            .query(&[("select", "id,name,description"), ("id", filter.as_str())]);
        let rows: Vec<CatalogExercise> = self.fetch(req).await?;
        Ok(rows.into_iter().next())
    }

    async fn add(&self, name: &str, description: Option<&str>) -> Result<CatalogExercise, BackendError> {
        let body = serde_json::json!({ "name": name, "description": description });
        let req = self
            .request(Method::POST, "exercises")
            .header("Prefer", "return=representation")
            .json(&body);
        let rows: Vec<CatalogExercise> = self.fetch(req).await?;
        rows.into_iter().next().ok_or_else(|| BackendError::Rejected {
            status: 200,
            message: "exercise insert returned no row".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let rest = RestBackend::new("https://db.example.com/", "anon", None).unwrap();
        assert_eq!(rest.endpoint("workouts"), "https://db.example.com/rest/v1/workouts");
    }

    #[test]
    fn bearer_prefers_session_token() {
        let anon = RestBackend::new("https://db.example.com", "anon", None).unwrap();
        assert_eq!(anon.bearer(), "Bearer anon");

        let user = RestBackend::new("https://db.example.com", "anon", Some("jwt".into())).unwrap();
        assert_eq!(user.bearer(), "Bearer jwt");
    }

    #[test]
    fn insert_request_carries_headers() {
        let rest = RestBackend::new("https://db.example.com", "anon", None).unwrap();
        let req = rest
            .request(Method::POST, "workouts")
            .header("Prefer", "return=representation")
            .build()
            .unwrap();

        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.headers()["apikey"], "anon");
        assert_eq!(req.headers()[header::AUTHORIZATION], "Bearer anon");
        assert_eq!(req.headers()["Prefer"], "return=representation");
    }

    #[test]
    fn ilike_filter_escapes_wildcards() {
        assert_eq!(ilike_filter("squat"), "ilike.*squat*");
        assert_eq!(ilike_filter("80%"), r"ilike.*80\%*");
        assert_eq!(ilike_filter("a_b"), r"ilike.*a\_b*");
        assert_eq!(ilike_filter(r"a\b"), r"ilike.*a\\b*");
        assert_eq!(ilike_filter("a*b"), "ilike.*a_b*");
    }

    #[test]
    fn delete_filters_by_id() {
        let rest = RestBackend::new("https://db.example.com", "anon", None).unwrap();
        let req = rest
            .request(Method::DELETE, "workouts")
            .query(&[("id", "eq.w-1")])
            .build()
            .unwrap();
        assert_eq!(req.url().query(), Some("id=eq.w-1"));
    }
}
