use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt;

use super::{ClientConfig, ClientError, decode};
use crate::auth::admin_key::ADMIN_KEY_HEADER;
use crate::models::education::{EducationView, EducationWithPortfolio};
use crate::models::experiences::{ExperienceView, ExperienceWithPortfolio};
use crate::models::portfolio::{PortfolioSummary, PortfolioWithSkills};
use crate::models::projects::ProjectWithPortfolio;
use crate::models::skills;
use crate::models::{Deleted, Paginated};

/// The admin secret, passed explicitly to [`AdminApi::new`]. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredential(String);

impl AdminCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminCredential(***)")
    }
}

/// Admin collections under `/api/admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Portfolios,
    Projects,
    Experiences,
    Education,
    Skills,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Portfolios,
        Resource::Projects,
        Resource::Experiences,
        Resource::Education,
        Resource::Skills,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Resource::Portfolios => "portfolios",
            Resource::Projects => "projects",
            Resource::Experiences => "experiences",
            Resource::Education => "education",
            Resource::Skills => "skills",
        }
    }
}

/// An image sent as a multipart file part.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// HTTP client for the admin API; every request carries `X-Admin-Key`.
#[derive(Debug, Clone)]
pub struct AdminApi {
    http: reqwest::Client,
    config: ClientConfig,
    credential: AdminCredential,
}

impl AdminApi {
    pub fn new(config: ClientConfig, credential: AdminCredential) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            credential,
        }
    }

    // ---- generic resource calls ----

    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        page: u64,
    ) -> Result<Paginated<T>, ClientError> {
        let request = self
            .request(Method::GET, resource.path())
            .query(&[("page", page)]);
        self.send(request).await
    }

    pub async fn create<T: DeserializeOwned>(
        &self,
        resource: Resource,
        body: &Value,
    ) -> Result<T, ClientError> {
        self.send(self.request(Method::POST, resource.path()).json(body))
            .await
    }

    pub async fn update<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: i32,
        body: &Value,
    ) -> Result<T, ClientError> {
        let path = format!("{}/{id}", resource.path());
        self.send(self.request(Method::PUT, &path).json(body)).await
    }

    pub async fn delete(&self, resource: Resource, id: i32) -> Result<Deleted, ClientError> {
        let path = format!("{}/{id}", resource.path());
        self.send(self.request(Method::DELETE, &path)).await
    }

    // ---- portfolios ----

    pub async fn list_portfolios(
        &self,
        page: u64,
    ) -> Result<Paginated<PortfolioWithSkills>, ClientError> {
        self.list(Resource::Portfolios, page).await
    }

    /// `{id, name, title}` for every portfolio, for pickers.
    pub async fn list_portfolios_simple(&self) -> Result<Vec<PortfolioSummary>, ClientError> {
        let request = self
            .request(Method::GET, "portfolios")
            .query(&[("simple", "1")]);
        self.send(request).await
    }

    pub async fn create_portfolio(&self, body: &Value) -> Result<PortfolioWithSkills, ClientError> {
        self.create(Resource::Portfolios, body).await
    }

    pub async fn update_portfolio(
        &self,
        id: i32,
        body: &Value,
    ) -> Result<PortfolioWithSkills, ClientError> {
        self.update(Resource::Portfolios, id, body).await
    }

    pub async fn sync_skills(
        &self,
        portfolio_id: i32,
        skill_ids: &[i32],
    ) -> Result<PortfolioWithSkills, ClientError> {
        let path = format!("portfolios/{portfolio_id}/skills/sync");
        let request = self
            .request(Method::POST, &path)
            .json(&json!({ "skill_ids": skill_ids }));
        self.send(request).await
    }

    // ---- projects ----

    pub async fn list_projects(
        &self,
        page: u64,
    ) -> Result<Paginated<ProjectWithPortfolio>, ClientError> {
        self.list(Resource::Projects, page).await
    }

    /// Create a project from text fields plus an optional image, as multipart.
    /// `technologies` may be sent as a JSON-encoded array string.
    pub async fn upload_project(
        &self,
        fields: &[(&str, String)],
        image: Option<ImageUpload>,
    ) -> Result<ProjectWithPortfolio, ClientError> {
        let form = multipart_form(fields, image)?;
        self.send(self.request(Method::POST, "projects").multipart(form))
            .await
    }

    pub async fn update_project_upload(
        &self,
        id: i32,
        fields: &[(&str, String)],
        image: Option<ImageUpload>,
    ) -> Result<ProjectWithPortfolio, ClientError> {
        let form = multipart_form(fields, image)?;
        let path = format!("projects/{id}");
        self.send(self.request(Method::PUT, &path).multipart(form))
            .await
    }

    // ---- experiences / education / skills ----

    pub async fn list_experiences(
        &self,
        page: u64,
    ) -> Result<Paginated<ExperienceWithPortfolio>, ClientError> {
        self.list(Resource::Experiences, page).await
    }

    pub async fn create_experience(&self, body: &Value) -> Result<ExperienceView, ClientError> {
        self.create(Resource::Experiences, body).await
    }

    pub async fn list_education(
        &self,
        page: u64,
    ) -> Result<Paginated<EducationWithPortfolio>, ClientError> {
        self.list(Resource::Education, page).await
    }

    pub async fn create_education(&self, body: &Value) -> Result<EducationView, ClientError> {
        self.create(Resource::Education, body).await
    }

    pub async fn list_skills(&self, page: u64) -> Result<Paginated<skills::Model>, ClientError> {
        self.list(Resource::Skills, page).await
    }

    pub async fn create_skill(&self, body: &Value) -> Result<skills::Model, ClientError> {
        self.create(Resource::Skills, body).await
    }

    // ---- private helpers ----

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.config.url(&format!("admin/{path}")))
            .header(ADMIN_KEY_HEADER, self.credential.expose())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Unreachable {
                base: self.config.api_base_url.clone(),
                source,
            })?;
        decode(response).await
    }
}

fn multipart_form(
    fields: &[(&str, String)],
    image: Option<ImageUpload>,
) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name.to_string(), value.clone());
    }
    if let Some(image) = image {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        form = form.part("image", part);
    }
    Ok(form)
}

/// Admin screen state: one list per resource, refreshed after every mutation.
#[derive(Debug)]
pub struct AdminConsole {
    api: AdminApi,
    pub portfolios: Vec<PortfolioWithSkills>,
    pub projects: Vec<ProjectWithPortfolio>,
    pub experiences: Vec<ExperienceWithPortfolio>,
    pub education: Vec<EducationWithPortfolio>,
    pub skills: Vec<skills::Model>,
    pub error: Option<String>,
}

impl AdminConsole {
    pub fn new(api: AdminApi) -> Self {
        Self {
            api,
            portfolios: Vec::new(),
            projects: Vec::new(),
            experiences: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            error: None,
        }
    }

    pub fn api(&self) -> &AdminApi {
        &self.api
    }

    /// Reload the first page of `resource`.
    pub async fn refresh(&mut self, resource: Resource) -> Result<(), ClientError> {
        let result = match resource {
            Resource::Portfolios => self.api.list_portfolios(1).await.map(|p| self.portfolios = p.data),
            Resource::Projects => self.api.list_projects(1).await.map(|p| self.projects = p.data),
            Resource::Experiences => self
                .api
                .list_experiences(1)
                .await
                .map(|p| self.experiences = p.data),
            Resource::Education => self.api.list_education(1).await.map(|p| self.education = p.data),
            Resource::Skills => self.api.list_skills(1).await.map(|p| self.skills = p.data),
        };
        self.record(result)
    }

    pub async fn refresh_all(&mut self) -> Result<(), ClientError> {
        for resource in Resource::ALL {
            self.refresh(resource).await?;
        }
        Ok(())
    }

    pub async fn create(&mut self, resource: Resource, body: &Value) -> Result<Value, ClientError> {
        let result = self.api.create(resource, body).await;
        self.after_mutation(resource, result).await
    }

    pub async fn update(
        &mut self,
        resource: Resource,
        id: i32,
        body: &Value,
    ) -> Result<Value, ClientError> {
        let result = self.api.update(resource, id, body).await;
        self.after_mutation(resource, result).await
    }

    pub async fn delete(&mut self, resource: Resource, id: i32) -> Result<Deleted, ClientError> {
        let result = self.api.delete(resource, id).await;
        self.after_mutation(resource, result).await
    }

    pub async fn sync_skills(
        &mut self,
        portfolio_id: i32,
        skill_ids: &[i32],
    ) -> Result<PortfolioWithSkills, ClientError> {
        let result = self.api.sync_skills(portfolio_id, skill_ids).await;
        self.after_mutation(Resource::Portfolios, result).await
    }

    pub async fn upload_project(
        &mut self,
        fields: &[(&str, String)],
        image: Option<ImageUpload>,
    ) -> Result<ProjectWithPortfolio, ClientError> {
        let result = self.api.upload_project(fields, image).await;
        self.after_mutation(Resource::Projects, result).await
    }

    async fn after_mutation<T>(
        &mut self,
        resource: Resource,
        result: Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let value = self.record(result)?;
        self.refresh(resource).await?;
        Ok(value)
    }

    fn record<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match result {
            Ok(value) => {
                self.error = None;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(error = %err, "admin request failed");
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }
}
