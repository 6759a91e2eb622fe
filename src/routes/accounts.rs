/// Account management routes
///
/// Mounted under `/accounts` behind `SessionGuard::admin`; handlers receive the
/// caller's verified claims from the guard.

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::account::{AccountId, AccountService};
use crate::auth::VerifiedClaims;
use crate::error::AppError;
use crate::routes::auth::SignupRequest;
use crate::validators::parse_account_id;

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: AccountId,
}

/// POST /accounts
pub async fn create_account(
    form: web::Json<SignupRequest>,
    caller: web::ReqData<VerifiedClaims>,
    accounts: web::Data<AccountService>,
) -> Result<HttpResponse, AppError> {
    let account = accounts
        .signup(&form.username, &form.password, form.role)
        .await?;

    tracing::info!(
        admin_id = caller.account_id,
        account_id = account.id,
        "Account created by administrator"
    );
    Ok(HttpResponse::Ok().json(account))
}

/// GET /accounts/{id}
pub async fn get_account(
    path: web::Path<String>,
    accounts: web::Data<AccountService>,
) -> Result<HttpResponse, AppError> {
    let id = parse_account_id(&path)?;
    let account = accounts.get_by_id(id).await?;
    Ok(HttpResponse::Ok().json(account))
}

/// DELETE /accounts/{id}
pub async fn delete_account(
    path: web::Path<String>,
    caller: web::ReqData<VerifiedClaims>,
    accounts: web::Data<AccountService>,
) -> Result<HttpResponse, AppError> {
    let id = parse_account_id(&path)?;
    accounts.delete_by_id(id).await?;

    tracing::info!(admin_id = caller.account_id, account_id = id, "Account deleted by administrator");
    Ok(HttpResponse::Ok().json(DeletedResponse { deleted: id }))
}
