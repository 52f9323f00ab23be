//! Blocking client for the project-management REST API.
//!
//! # Invariants
//! - Every request carries `Content-Type: application/json` and, when a
//!   token is stored, `Authorization: Bearer <token>`.
//! - A 401 response clears the stored session before the error is returned.
//! - Log lines carry method, path and status; never bodies or tokens.

use crate::error::{ApiError, ApiResult, LOGIN_ROUTE};
use crate::model::{
    AuthResponse, ErrorBody, LoginRequest, NewComment, NewDependency, NewMember, ProjectDraft,
    ProjectUpdate, RegisterRequest, RemoteComment, RemoteDependency, RemoteMember,
    RemoteNotification, RemoteProject, RemoteTask, RemoteUser, TaskDraft, TaskUpdate,
};
use crate::session::SessionStore;
use log::{debug, error, warn};
use planboard_core::KeyValueBackend;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiClient<B: KeyValueBackend> {
    base_url: String,
    http: Client,
    session: SessionStore<B>,
}

impl<B: KeyValueBackend> ApiClient<B> {
    pub fn new(base_url: &str, session: SessionStore<B>) -> ApiResult<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore<B> {
        &self.session
    }

    // Auth

    pub fn register(&self, username: &str, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let body = RegisterRequest {
            username,
            email,
            password,
        };
        let response: AuthResponse = self.send(Method::POST, "/auth/register", Some(&body))?;
        self.session
            .set_user(&response.user, &response.access_token)?;
        Ok(response)
    }

    pub fn login(&self, username: &str, password: &str) -> ApiResult<AuthResponse> {
        let body = LoginRequest { username, password };
        let response: AuthResponse = self.send(Method::POST, "/auth/login", Some(&body))?;
        self.session
            .set_user(&response.user, &response.access_token)?;
        Ok(response)
    }

    pub fn current_user(&self) -> ApiResult<RemoteUser> {
        self.get("/auth/me")
    }

    /// Local sign-out; the server keeps no session state.
    pub fn logout(&self) -> ApiResult<()> {
        self.session.logout()?;
        Ok(())
    }

    // Projects

    pub fn projects(&self) -> ApiResult<Vec<RemoteProject>> {
        self.get("/projects")
    }

    pub fn project(&self, id: &str) -> ApiResult<RemoteProject> {
        self.get(&format!("/projects/{id}"))
    }

    pub fn create_project(&self, draft: &ProjectDraft) -> ApiResult<RemoteProject> {
        self.send(Method::POST, "/projects", Some(draft))
    }

    pub fn update_project(&self, id: &str, update: &ProjectUpdate) -> ApiResult<RemoteProject> {
        self.send(Method::PUT, &format!("/projects/{id}"), Some(update))
    }

    pub fn delete_project(&self, id: &str) -> ApiResult<()> {
        self.send_discarding(Method::DELETE, &format!("/projects/{id}"))
    }

    pub fn add_member(&self, project_id: &str, member: &NewMember) -> ApiResult<RemoteMember> {
        self.send(
            Method::POST,
            &format!("/projects/{project_id}/members"),
            Some(member),
        )
    }

    pub fn remove_member(&self, project_id: &str, user_id: &str) -> ApiResult<()> {
        self.send_discarding(
            Method::DELETE,
            &format!("/projects/{project_id}/members/{user_id}"),
        )
    }

    // Tasks

    pub fn project_tasks(&self, project_id: &str) -> ApiResult<Vec<RemoteTask>> {
        self.get(&format!("/projects/{project_id}/tasks"))
    }

    pub fn task(&self, id: &str) -> ApiResult<RemoteTask> {
        self.get(&format!("/tasks/{id}"))
    }

    pub fn create_task(&self, project_id: &str, draft: &TaskDraft) -> ApiResult<RemoteTask> {
        self.send(
            Method::POST,
            &format!("/projects/{project_id}/tasks"),
            Some(draft),
        )
    }

    pub fn update_task(&self, id: &str, update: &TaskUpdate) -> ApiResult<RemoteTask> {
        self.send(Method::PUT, &format!("/tasks/{id}"), Some(update))
    }

    pub fn delete_task(&self, id: &str) -> ApiResult<()> {
        self.send_discarding(Method::DELETE, &format!("/tasks/{id}"))
    }

    pub fn add_dependency(
        &self,
        task_id: &str,
        dependency: &NewDependency,
    ) -> ApiResult<RemoteDependency> {
        self.send(
            Method::POST,
            &format!("/tasks/{task_id}/dependencies"),
            Some(dependency),
        )
    }

    pub fn delete_dependency(&self, id: &str) -> ApiResult<()> {
        self.send_discarding(Method::DELETE, &format!("/dependencies/{id}"))
    }

    // Comments

    pub fn comments(&self, task_id: &str) -> ApiResult<Vec<RemoteComment>> {
        self.get(&format!("/tasks/{task_id}/comments"))
    }

    pub fn add_comment(&self, task_id: &str, content: &str) -> ApiResult<RemoteComment> {
        self.send(
            Method::POST,
            &format!("/tasks/{task_id}/comments"),
            Some(&NewComment { content }),
        )
    }

    pub fn delete_comment(&self, id: &str) -> ApiResult<()> {
        self.send_discarding(Method::DELETE, &format!("/comments/{id}"))
    }

    // Notifications

    pub fn notifications(&self) -> ApiResult<Vec<RemoteNotification>> {
        self.get("/notifications")
    }

    pub fn mark_notification_read(&self, id: &str) -> ApiResult<RemoteNotification> {
        self.send::<_, ()>(Method::PUT, &format!("/notifications/{id}/read"), None)
    }

    pub fn mark_all_notifications_read(&self) -> ApiResult<()> {
        self.send_discarding(Method::PUT, "/notifications/mark_all_read")
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send::<T, ()>(Method::GET, path, None)
    }

    fn send<T, P>(&self, method: Method, path: &str, body: Option<&P>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let response = self.execute(method, path, body)?;
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    fn send_discarding(&self, method: Method, path: &str) -> ApiResult<()> {
        self.execute::<()>(method, path, None).map(|_| ())
    }

    fn execute<P>(&self, method: Method, path: &str, body: Option<&P>) -> ApiResult<Response>
    where
        P: Serialize + ?Sized,
    {
        let mut request = self.request(method.clone(), path);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().map_err(|err| {
            error!(
                "event=api_request module=remote status=error method={} path={} error_code=transport",
                method, path
            );
            ApiError::from(err)
        })?;
        self.check(method, path, response)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(CONTENT_TYPE, "application/json");
        match self.session.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    fn check(&self, method: Method, path: &str, response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            if let Err(err) = self.session.logout() {
                error!(
                    "event=session_clear module=remote status=error error_code={}",
                    err.code()
                );
            }
            warn!(
                "event=api_request module=remote status=error method={} path={} http_status=401 error_code=session_expired",
                method, path
            );
            return Err(ApiError::SessionExpired {
                redirect_to: LOGIN_ROUTE,
            });
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|parsed| parsed.error)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            warn!(
                "event=api_request module=remote status=error method={} path={} http_status={}",
                method,
                path,
                status.as_u16()
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        debug!(
            "event=api_request module=remote status=ok method={} path={} http_status={}",
            method,
            path,
            status.as_u16()
        );
        Ok(response)
    }
}
