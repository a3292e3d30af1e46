use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;

use reqwest::{Client, Method, Response};

use secrecy::Secret;

use serde::Serialize;
use serde_json::{json, Value};

use url::Url;

use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

use finsight::app::{self, AppInfo};
use finsight::client::SupabaseClient;
use finsight::crypto::{SigningKey, TokenIssuer};
use finsight::database::Database;
use finsight::insights::{Advisor, LanguageModel};
use finsight::telemetry;

lazy_static! {
    /// Logs are only printed when `TEST_LOG` is set
    static ref TRACING: () = {
        let filter = "debug";
        if std::env::var("TEST_LOG").is_ok() {
            let subscriber = telemetry::create_subscriber(filter, std::io::stdout);
            telemetry::set_subscriber(subscriber).expect("Failed to set subscriber");
        } else {
            let subscriber = telemetry::create_subscriber(filter, std::io::sink);
            telemetry::set_subscriber(subscriber).expect("Failed to set subscriber");
        }
    };
}

pub const SERVICE_KEY: &str = "test-service-key";
pub const TITLE: &str = "User Financial Details API";
pub const VERSION: &str = "1.2.0";

pub struct TestApp {
    addr: String,

    pub client: Client,
    pub supabase: MockServer,
    pub token_issuer: TokenIssuer,
}

impl TestApp {
    /// An app backed by a mock Supabase project and no language model
    pub async fn spawn() -> Self {
        Self::spawn_with(true, Advisor::disabled()).await
    }

    /// An app whose advisor runs against `model`
    pub async fn spawn_with_model(model: impl LanguageModel + 'static) -> Self {
        Self::spawn_with(true, Advisor::new(Arc::new(model))).await
    }

    /// An app started without Supabase configuration
    pub async fn spawn_unconfigured() -> Self {
        Self::spawn_with(false, Advisor::disabled()).await
    }

    async fn spawn_with(configured: bool, advisor: Advisor) -> Self {
        lazy_static::initialize(&TRACING);

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();

        let addr = format!("http://127.0.0.1:{}", port);

        let supabase = MockServer::start().await;

        let database = if configured {
            let base_url = Url::parse(&supabase.uri()).expect("Failed to parse mock server uri");
            let client = SupabaseClient::new(
                base_url,
                Secret::new(SERVICE_KEY.into()),
                Duration::from_secs(2),
            )
            .expect("Failed to create Supabase client");
            Database::new(client)
        } else {
            Database::unconfigured()
        };

        let token_issuer = {
            let key = SigningKey::random().expect("Failed to create crypto signing key");
            TokenIssuer::new(key, chrono::Duration::minutes(30))
        };

        let info = AppInfo {
            title: TITLE.into(),
            version: VERSION.into(),
            description: "Test instance".into(),
        };

        let server = app::run(listener, database, advisor, token_issuer.clone(), info)
            .expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        let client = Client::new();

        Self {
            addr,
            client,
            supabase,
            token_issuer,
        }
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub async fn get(&self, url: &str) -> Response {
        self.request(Method::GET, url)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Response {
        self.request(Method::POST, url)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Response {
        self.request(Method::PUT, url)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, url: &str) -> Response {
        self.request(Method::DELETE, url)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Mount a response for a Supabase table, narrowed by `matcher`
    pub async fn mock_table<M>(&self, http_method: &str, table: &str, matcher: M, status: u16, body: Value)
    where
        M: wiremock::Match + 'static,
    {
        Mock::given(method(http_method))
            .and(path(format!("/rest/v1/{}", table)))
            .and(matcher)
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.supabase)
            .await;
    }

    /// A stored user with a complete profile
    pub async fn mock_user(&self, user_id: i64) {
        self.mock_table(
            "GET",
            "users",
            query_param("user_id", format!("eq.{}", user_id)),
            200,
            json!([profile_json(user_id)]),
        )
        .await;
    }

    pub async fn mock_missing_user(&self, user_id: i64) {
        self.mock_table(
            "GET",
            "users",
            query_param("user_id", format!("eq.{}", user_id)),
            200,
            json!([]),
        )
        .await;
    }

    /// The shared definitions catalog
    pub async fn mock_catalog(&self) {
        self.mock_table(
            "GET",
            "financial_knowledge_definitions",
            query_param("select", "id,category,level,description"),
            200,
            json!([
                { "id": 1, "category": "Budgeting", "level": 1, "description": "Knows where the money goes" },
                { "id": 2, "category": "Budgeting", "level": 2, "description": "Keeps a monthly budget" },
                { "id": 3, "category": "Investing", "level": 1, "description": "Has heard of index funds" },
            ]),
        )
        .await;
    }

    /// Every per-user table answers with no rows
    pub async fn mock_empty_records(&self, user_id: i64) {
        for table in ["user_financial_knowledge", "income", "debts", "expenses"] {
            self.mock_table(
                "GET",
                table,
                query_param("user_id", format!("eq.{}", user_id)),
                200,
                json!([]),
            )
            .await;
        }
    }

    /// Bodies of every request the mock Supabase project saw for `table`
    pub async fn received_bodies(&self, http_method: &str, table: &str) -> Vec<Value> {
        let table_path = format!("/rest/v1/{}", table);
        self.supabase
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.to_string() == http_method && r.url.path() == table_path)
            .map(|r| serde_json::from_slice(&r.body).expect("Request body was not JSON"))
            .collect()
    }
}

pub fn profile_json(user_id: i64) -> Value {
    json!({
        "user_id": user_id,
        "age": 34,
        "marital_status": "married",
        "num_children": 2,
        "retirement_status": "working",
        "goals": { "house": "save a deposit" },
    })
}

/// Postgres error body as PostgREST returns it
pub fn postgres_error(code: &str, message: &str, details: &str) -> Value {
    json!({
        "code": code,
        "message": message,
        "details": details,
        "hint": null,
    })
}

pub async fn body_json(res: Response) -> Value {
    res.json().await.expect("Response body was not JSON")
}
