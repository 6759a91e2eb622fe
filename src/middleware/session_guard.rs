/// Session Guard Middleware
///
/// Wraps a scope so that only callers whose session cookie passes the access
/// gate for `required` reach the wrapped handlers. Verified claims are placed
/// in request extensions (`web::ReqData<VerifiedClaims>`); the request itself
/// is forwarded untouched.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::account::Role;
use crate::auth::authorize_request;
use crate::configuration::JwtSettings;
use crate::error::AppError;

pub struct SessionGuard {
    jwt_config: JwtSettings,
    required: Role,
}

impl SessionGuard {
    pub fn new(jwt_config: JwtSettings, required: Role) -> Self {
        Self {
            jwt_config,
            required,
        }
    }

    pub fn admin(jwt_config: JwtSettings) -> Self {
        Self::new(jwt_config, Role::Admin)
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGuardService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(SessionGuardService {
            service: Rc::new(service),
            jwt_config: self.jwt_config.clone(),
            required: self.required,
        }))
    }
}

pub struct SessionGuardService<S> {
    service: Rc<S>,
    jwt_config: JwtSettings,
    required: Role,
}

impl<S, B> Service<ServiceRequest> for SessionGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authorize_request(req.request(), self.required, &self.jwt_config) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let service = self.service.clone();
                Box::pin(async move {
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                })
            }
            Err(reason) => {
                let response = req
                    .into_response(AppError::from(reason).error_response())
                    .map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_session_token, VerifiedClaims, SESSION_COOKIE};
    use crate::error::{ErrorResponse, PERMISSION_DENIED};
    use actix_web::cookie::Cookie;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    fn config() -> JwtSettings {
        JwtSettings {
            secret: "guard-test-secret".to_string(),
            token_lifetime_seconds: 600,
            cookie_lifetime_seconds: 600,
        }
    }

    async fn whoami(claims: web::ReqData<VerifiedClaims>) -> HttpResponse {
        HttpResponse::Ok().body(claims.account_id.to_string())
    }

    #[actix_web::test]
    async fn test_guard_forwards_admin_with_claims() {
        let app = test::init_service(
            App::new().service(
                web::scope("/guarded")
                    .wrap(SessionGuard::admin(config()))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let token = generate_session_token(17, Role::Admin, &config()).unwrap();
        let req = test::TestRequest::get()
            .uri("/guarded")
            .cookie(Cookie::new(SESSION_COOKIE, token))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "17");
    }

    #[actix_web::test]
    async fn test_guard_denials_are_uniform() {
        let app = test::init_service(
            App::new().service(
                web::scope("/guarded")
                    .wrap(SessionGuard::admin(config()))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let regular = generate_session_token(1, Role::Regular, &config()).unwrap();
        let cookies = vec![None, Some("garbage".to_string()), Some(regular)];

        for cookie in cookies {
            let mut req = test::TestRequest::get().uri("/guarded");
            if let Some(value) = cookie {
                req = req.cookie(Cookie::new(SESSION_COOKIE, value));
            }
            let resp = test::call_service(&app, req.to_request()).await;

            assert_eq!(resp.status(), StatusCode::FORBIDDEN);
            let body: ErrorResponse = test::read_body_json(resp).await;
            assert_eq!(body, ErrorResponse::new(PERMISSION_DENIED));
        }
    }
}
