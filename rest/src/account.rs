use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Extension, Json, Router,
};
use rest_types::AccountTO;
use service::account::{Account, AccountService};
use tracing::instrument;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::{error_handler, json_response, Context, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_accounts::<RestState>))
        .route("/", post(create_account::<RestState>))
        .route("/{id}", get(get_account::<RestState>))
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "",
    tags = ["Accounts"],
    responses(
        (status = 200, description = "All accounts", body = [AccountTO]),
        (status = 403, description = "Requires an elevated role"),
    ),
)]
pub async fn get_all_accounts<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
) -> Response {
    error_handler(
        (async {
            let accounts: Arc<[AccountTO]> = rest_state
                .account_service()
                .get_all(context.into(), None)
                .await?
                .iter()
                .map(AccountTO::from)
                .collect();
            json_response(200, &accounts)
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Accounts"],
    params(
        ("id", description = "Account id", example = "1a2b3c4d-5e6f-4a8b-9c0d-e1f2a3b4c5d6"),
    ),
    responses(
        (status = 200, description = "Account found", body = AccountTO),
        (status = 403, description = "Restricted users may only read their own account"),
        (status = 404, description = "Account not found"),
    ),
)]
pub async fn get_account<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(account_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let account = rest_state
                .account_service()
                .get(account_id, context.into(), None)
                .await?;
            json_response(200, &AccountTO::from(&account))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    post,
    path = "",
    tags = ["Accounts"],
    request_body = AccountTO,
    responses(
        (status = 201, description = "Account created", body = AccountTO),
        (status = 403, description = "Requires an elevated role"),
        (status = 409, description = "Account name already taken"),
        (status = 422, description = "Invalid account"),
    ),
)]
pub async fn create_account<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Json(account): Json<AccountTO>,
) -> Response {
    error_handler(
        (async {
            let account = rest_state
                .account_service()
                .create(&Account::from(&account), context.into(), None)
                .await?;
            json_response(201, &AccountTO::from(&account))
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(get_all_accounts, get_account, create_account),
    components(schemas(AccountTO))
)]
pub struct AccountApiDoc;
