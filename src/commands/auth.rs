//! Authentication and user administration commands.
//!
//! Tokens are kept in the OS keychain, the profile in the local database.
//! Restarting the app restores both through `get_session`.

use crate::commands::settings::load_settings;
use crate::commands::{expire_on_unauthorized, Session, SessionState};
use crate::db::{pool::DbPool, session as profile};
use crate::error::AppError;
use crate::models::{
    company::FALLBACK_CURRENCY, AuthToken, DirectoryUser, NewUser, SignupRequest, User, UserRole,
};
use crate::services::{ExpenseApiClient, ExpenseApiConfig, TokenStore, UserDirectory};
use serde::{Deserialize, Serialize};
use tauri::{AppHandle, State};

/// What the frontend needs after sign-in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user: User,
    pub company_currency: String,
}

/// Input for the signup command.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub currency_code: String,
}

/// Input for the create_user command.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub manager_id: Option<i64>,
    #[serde(default)]
    pub is_manager_approver: bool,
}

/// Persist a fresh token and populate the session.
async fn start_session(
    app: &AppHandle,
    pool: &DbPool,
    state: &SessionState,
    token: AuthToken,
) -> Result<SessionInfo, AppError> {
    let settings = load_settings(app)?;
    TokenStore::save(&settings.api.base_url, &token.access_token)?;
    profile::save_profile(pool, &token.user, chrono::Utc::now().timestamp()).await?;

    let api = ExpenseApiClient::new(ExpenseApiConfig::from_settings(
        &settings.api,
        Some(token.access_token),
    ))?;

    let user = token.user;
    let mut session = Session {
        api: Some(api),
        user: Some(user.clone()),
        ..Session::default()
    };
    let company_currency = refresh_company_currency(pool, &mut session).await;
    *state.0.lock().await = session;

    Ok(SessionInfo {
        user,
        company_currency,
    })
}

/// Fetch the company currency, falling back to the cached or default one.
async fn refresh_company_currency(pool: &DbPool, session: &mut Session) -> String {
    let (Some(api), Some(user)) = (&session.api, &session.user) else {
        return FALLBACK_CURRENCY.to_string();
    };

    match api.get_company(user.company_id).await {
        Ok(company) => {
            if let Err(e) = profile::set_company_currency(pool, &company.default_currency_code).await {
                log::warn!("Failed to cache company currency: {}", e);
            }
            session.company_currency = Some(company.default_currency_code);
        }
        Err(e) => {
            log::warn!(
                "Failed to load company {}, using {}: {}",
                user.company_id,
                session.company_currency(),
                e
            );
        }
    }

    session.company_currency().to_string()
}

/// Create the first admin and their company, then sign in.
#[tauri::command]
pub async fn signup(
    app: AppHandle,
    pool: State<'_, DbPool>,
    state: State<'_, SessionState>,
    input: SignupInput,
) -> Result<SessionInfo, AppError> {
    let settings = load_settings(&app)?;
    let client = ExpenseApiClient::new(ExpenseApiConfig::from_settings(&settings.api, None))?;

    let token = client
        .signup(&SignupRequest {
            email: input.email.trim().to_string(),
            name: input.name.trim().to_string(),
            role: UserRole::Admin,
            password: input.password,
            company_name: input.company_name.trim().to_string(),
            currency_code: input.currency_code.trim().to_uppercase(),
        })
        .await?;

    start_session(&app, pool.inner(), state.inner(), token).await
}

#[tauri::command]
pub async fn login(
    app: AppHandle,
    pool: State<'_, DbPool>,
    state: State<'_, SessionState>,
    email: String,
    password: String,
) -> Result<SessionInfo, AppError> {
    let settings = load_settings(&app)?;
    let client = ExpenseApiClient::new(ExpenseApiConfig::from_settings(&settings.api, None))?;

    let token = client.login(&email, &password).await?;
    start_session(&app, pool.inner(), state.inner(), token).await
}

/// Sign out and forget the token and cached profile.
#[tauri::command]
pub async fn logout(
    app: AppHandle,
    pool: State<'_, DbPool>,
    state: State<'_, SessionState>,
) -> Result<(), AppError> {
    let settings = load_settings(&app)?;
    TokenStore::clear(&settings.api.base_url)?;
    profile::clear_profile(pool.inner()).await?;
    state.0.lock().await.clear();

    log::info!("Signed out");
    Ok(())
}

/// Restore the previous session, if a token and profile are on disk.
#[tauri::command]
pub async fn get_session(
    app: AppHandle,
    pool: State<'_, DbPool>,
    state: State<'_, SessionState>,
) -> Result<Option<SessionInfo>, AppError> {
    {
        let session = state.0.lock().await;
        if let (Some(_), Some(user)) = (&session.api, &session.user) {
            return Ok(Some(SessionInfo {
                user: user.clone(),
                company_currency: session.company_currency().to_string(),
            }));
        }
    }

    let settings = load_settings(&app)?;
    let Some(token) = TokenStore::load(&settings.api.base_url)? else {
        return Ok(None);
    };
    let Some(cached) = profile::load_profile(pool.inner()).await? else {
        return Ok(None);
    };

    let api = ExpenseApiClient::new(ExpenseApiConfig::from_settings(&settings.api, Some(token)))?;
    let mut session = Session {
        api: Some(api),
        user: Some(cached.user.clone()),
        company_currency: cached.company_currency,
        ..Session::default()
    };
    let company_currency = refresh_company_currency(pool.inner(), &mut session).await;
    *state.0.lock().await = session;

    log::info!("Restored session for {}", cached.user.email);
    Ok(Some(SessionInfo {
        user: cached.user,
        company_currency,
    }))
}

/// Refresh and return the company's user directory.
#[tauri::command]
pub async fn list_users(state: State<'_, SessionState>) -> Result<Vec<DirectoryUser>, AppError> {
    let api = state.0.lock().await.api()?;
    let users = expire_on_unauthorized(state.inner(), api.list_directory().await).await?;

    let mut session = state.0.lock().await;
    session.directory = UserDirectory::new(users);
    Ok(session.directory.users().to_vec())
}

/// Users that can be picked as a new user's manager.
#[tauri::command]
pub async fn list_managers(
    state: State<'_, SessionState>,
) -> Result<Vec<DirectoryUser>, AppError> {
    let api = {
        let session = state.0.lock().await;
        session.require_admin()?;
        session.api()?
    };
    let users = expire_on_unauthorized(state.inner(), api.list_directory().await).await?;

    let mut session = state.0.lock().await;
    session.directory = UserDirectory::new(users);
    Ok(session.directory.managers().cloned().collect())
}

/// Create a user in the admin's company.
///
/// `manager_id` must name a manager or admin of the company.
#[tauri::command]
pub async fn create_user(
    state: State<'_, SessionState>,
    input: CreateUserInput,
) -> Result<User, AppError> {
    let api = {
        let session = state.0.lock().await;
        session.require_admin()?;
        session.api()?
    };

    let users = expire_on_unauthorized(state.inner(), api.list_directory().await).await?;
    let directory = UserDirectory::new(users);
    directory.check_manager(input.manager_id)?;

    let request = NewUser {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
        password: input.password,
        role: input.role,
        manager_id: input.manager_id,
        is_manager_approver: input.is_manager_approver,
    };
    let user = expire_on_unauthorized(state.inner(), api.create_user(&request).await).await?;

    let users = expire_on_unauthorized(state.inner(), api.list_directory().await).await?;
    state.0.lock().await.directory = UserDirectory::new(users);
    Ok(user)
}
