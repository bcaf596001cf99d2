#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: "test-admin-id".to_string(),
        email: Some("admin@example.test".to_string()),
        roles: vec!["admin".to_string()],
    }
}

#[cfg(test)]
pub fn create_member_user(id: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        id: id.to_string(),
        email: Some(format!("{}@example.test", id)),
        roles: vec!["member".to_string()],
    }
}

#[cfg(test)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

#[cfg(test)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}
