use std::{collections::BTreeMap, net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{error, info};

pub mod stub;

/// Id handed to the first account created on a fresh store.
pub const FIRST_ID: u64 = 1234567890;
const DEFAULT_PER_PAGE: usize = 30;

/// Stored account. Everything except `id` and `name` is kept as opaque JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AwsAccount {
    pub id: u64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AwsAccounts {
    pub aws_accounts: Vec<AwsAccount>,
}

#[derive(Deserialize)]
pub struct CreateAwsAccount {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Only the fields present in the JSON are applied.
#[derive(Deserialize)]
pub struct UpdateAwsAccount {
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug)]
pub struct Store {
    next_id: u64,
    accounts: BTreeMap<u64, AwsAccount>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: FIRST_ID,
            accounts: BTreeMap::new(),
        }
    }
}

impl Store {
    /// Store pre-populated with `accounts`; new ids continue after the highest.
    pub fn with_accounts(accounts: impl IntoIterator<Item = AwsAccount>) -> Self {
        let mut store = Self::default();
        for account in accounts {
            store.next_id = store.next_id.max(account.id + 1);
            store.accounts.insert(account.id, account);
        }
        store
    }

    fn name_taken(&self, name: &str, except: Option<u64>) -> bool {
        self.accounts
            .values()
            .any(|a| a.name == name && Some(a.id) != except)
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

fn reject(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

pub fn app() -> Router {
    app_with_store(Store::default())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/aws_accounts", get(list_accounts).post(create_account))
        .route(
            "/aws_accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .layer(middleware::from_fn(require_api_key))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serve `app` on an ephemeral localhost port from a background thread.
///
/// Lets blocking clients talk to the server without an async test harness.
pub fn spawn(app: Router) -> std::io::Result<SocketAddr> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(err) => {
                error!(%err, "failed to build runtime");
                return;
            }
        };
        let result = rt.block_on(async {
            let listener = TcpListener::from_std(std_listener)?;
            axum::serve(listener, app).await
        });
        if let Err(err) = result {
            error!(%err, "mock server stopped");
        }
    });

    Ok(addr)
}

async fn require_api_key(request: Request, next: Next) -> Response {
    let has_key = request.uri().query().is_some_and(|query| {
        query
            .split('&')
            .filter_map(|pair| pair.strip_prefix("api_key="))
            .any(|value| !value.is_empty())
    });
    if !has_key {
        return reject(StatusCode::UNAUTHORIZED, "api_key is required").into_response();
    }
    next.run(request).await
}

async fn list_accounts(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<AwsAccounts> {
    let per_page = params.per_page.filter(|n| *n > 0).unwrap_or(DEFAULT_PER_PAGE);
    let page = params.page.unwrap_or(1).max(1);

    let store = db.read().await;
    let aws_accounts = store
        .accounts
        .values()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();
    Json(AwsAccounts { aws_accounts })
}

async fn create_account(
    State(db): State<Db>,
    Json(input): Json<CreateAwsAccount>,
) -> ApiResult<(StatusCode, Json<AwsAccount>)> {
    if input.name.trim().is_empty() {
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "Name can't be blank"));
    }

    let mut store = db.write().await;
    if store.name_taken(&input.name, None) {
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "Name has already been taken"));
    }

    let mut extra = input.extra;
    extra.remove("id");
    let account = AwsAccount {
        id: store.next_id,
        name: input.name,
        extra,
    };
    store.next_id += 1;
    store.accounts.insert(account.id, account.clone());
    info!(id = account.id, name = %account.name, "created aws account");

    Ok((StatusCode::CREATED, Json(account)))
}

async fn get_account(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<AwsAccount>> {
    let store = db.read().await;
    store
        .accounts
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Record not found"))
}

async fn update_account(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateAwsAccount>,
) -> ApiResult<Json<AwsAccount>> {
    let mut store = db.write().await;
    if !store.accounts.contains_key(&id) {
        return Err(reject(StatusCode::NOT_FOUND, "Record not found"));
    }
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "Name can't be blank"));
        }
        if store.name_taken(name, Some(id)) {
            return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "Name has already been taken"));
        }
    }

    let account = store
        .accounts
        .get_mut(&id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Record not found"))?;
    if let Some(name) = input.name {
        account.name = name;
    }
    for (key, value) in input.extra {
        if key != "id" {
            account.extra.insert(key, value);
        }
    }
    Ok(Json(account.clone()))
}

async fn delete_account(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    match store.accounts.remove(&id) {
        Some(account) => {
            info!(id, name = %account.name, "deleted aws account");
            Ok(StatusCode::OK)
        }
        None => Err(reject(StatusCode::NOT_FOUND, "Record not found")),
    }
}
