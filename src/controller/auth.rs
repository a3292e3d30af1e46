use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpResponse};

use secrecy::Secret;

use crate::auth::AuthenticatedUser;
use crate::client::SupabaseClient;
use crate::crypto::{hash_password, verify_password, TokenIssuer};
use crate::database::Database;
use crate::domain::EmailAddress;
use crate::error::{RestError, RestResult};
use crate::model::{
    AccessToken, LoginRecord, LoginRequest, LoginSuccess, NewLogin, StoredCredentials, TokenData,
    TokenRequest,
};
use crate::repo::{LoginsRepo, UsersRepo};

const BAD_CREDENTIALS: &str = "Incorrect email or password";

fn bad_credentials() -> RestError {
    RestError::Unauthorized(BAD_CREDENTIALS.into())
}

/// Look up the login for `email` and check `password` against it
#[tracing::instrument(name = "Validate credentials", skip(db, password))]
async fn validate_credentials(
    db: &SupabaseClient,
    email: &EmailAddress,
    password: Secret<String>,
) -> RestResult<StoredCredentials> {
    let mut credentials = LoginsRepo::fetch_credentials(db, email)
        .await?
        .ok_or_else(bad_credentials)?;
    let Some(password_hash) = credentials.password_hash.take() else {
        tracing::warn!("Stored login has no password hash");
        return Err(bad_credentials());
    };

    if verify_password(password, password_hash).await? {
        Ok(credentials)
    } else {
        Err(bad_credentials())
    }
}

#[tracing::instrument(
    name = "Register login credentials",
    skip(database, body),
    fields(user_id = body.user_id.get(), email = %body.email)
)]
#[post("/register_login")]
async fn register_login(
    database: web::Data<Database>,
    body: web::Json<NewLogin>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let NewLogin {
        user_id,
        email,
        password,
    } = body.into_inner();
    let user_id = user_id.get();

    if !UsersRepo::exists(db, user_id).await? {
        return Err(RestError::NotFound(format!(
            "User with ID {} not found. Cannot create login credentials.",
            user_id
        )));
    }

    let password_hash = hash_password(password.into()).await?;
    let record = LoginRecord {
        user_id,
        email: email.as_ref(),
        password_hash: &password_hash,
    };
    let created = LoginsRepo::insert(db, &record).await.map_err(|e| {
        if e.is_unique_violation() && e.mentions("email") {
            RestError::Conflict(format!("Email '{}' already exists.", email))
        } else if e.is_foreign_key_violation() {
            RestError::BadRequest(format!(
                "Invalid user_id: {}. Ensure the user exists before adding login credentials.",
                user_id
            ))
        } else {
            e.into()
        }
    })?;

    let created = match created {
        Some(created) => created,
        None => LoginsRepo::fetch(db, user_id, &email).await?.ok_or_else(|| {
            RestError::InternalError("Failed to create user login or retrieve it after creation.".into())
        })?,
    };

    tracing::info!(login_id = created.login_id, "Login credentials created");
    Ok(HttpResponse::Created().json(created))
}

#[tracing::instrument(name = "Login", skip(database, body), fields(email = %body.email))]
#[post("/login")]
async fn login(
    database: web::Data<Database>,
    body: web::Json<LoginRequest>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let LoginRequest { email, password } = body.into_inner();

    let credentials = validate_credentials(db, &email, password).await?;

    // A stale last_login is not worth failing the login over
    match LoginsRepo::touch_last_login(db, &email).await {
        Ok(true) => {}
        Ok(false) => tracing::warn!("No login row updated with last_login"),
        Err(e) => tracing::error!(error.cause_chain = ?e, "Failed to update last_login"),
    }

    Ok(HttpResponse::Ok().json(LoginSuccess {
        user_id: credentials.user_id,
        message: format!("Login successful for user_id {}.", credentials.user_id),
        email: credentials.email,
    }))
}

/// OAuth2 password flow: the username is the e-mail address
#[tracing::instrument(name = "Issue access token", skip(database, issuer, form), fields(username = %form.username))]
#[post("/token")]
async fn token(
    database: web::Data<Database>,
    issuer: web::Data<TokenIssuer>,
    form: web::Form<TokenRequest>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let TokenRequest { username, password } = form.into_inner();

    let email: EmailAddress = username.parse().map_err(|_| bad_credentials())?;
    let credentials = validate_credentials(db, &email, password).await?;

    let access_token = issuer.issue(&TokenData {
        email: Some(credentials.email),
        user_id: Some(credentials.user_id),
    })?;

    Ok(HttpResponse::Ok().json(AccessToken::bearer(access_token)))
}

#[tracing::instrument(name = "Current user", skip(user))]
#[get("/me")]
async fn me(user: AuthenticatedUser) -> RestResult<HttpResponse> {
    let data = user.into_inner();
    if let Some(email) = &data.email {
        tracing::debug!(email = %email, "Token verified");
    }

    Ok(HttpResponse::Ok().json(data))
}

/// Everything under `/auth`
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/auth")
        .service(register_login)
        .service(login)
        .service(token)
        .service(me)
}
