use anyhow::{Context, Result};
use std::future::IntoFuture;
use std::time::Duration;

use tracing::{error, info};

use crate::admin::{
    dashboard, delete_product_cascade, filter_rows, load_product_rows, AdminError, Notification,
    PriceHistoryForm, ProductForm, ProductRow, PRICE_DELETED_MESSAGE, PRODUCT_DELETED_MESSAGE,
};
use crate::catalog_store::{
    format_effdate, format_price, PriceEntry, Product, ProductStore, EFFDATE_FORMAT,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tower_http::services::ServeDir;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "slowdown")]
use super::slowdown_request;
use super::{log_requests, metrics, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub products: usize,
    pub price_entries: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Error body returned by every failing endpoint.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

struct ApiError(AdminError);

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        ApiError(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError(AdminError::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            err if err.is_validation() => StatusCode::BAD_REQUEST,
            AdminError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Store call failed: {}", self.0);
            metrics::record_error("store", "/v1/products");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Serialize, Deserialize, Debug)]
pub struct ProductRowBody {
    pub prodcode: String,
    pub description: String,
    pub unit: String,
    pub current_price: Decimal,
    pub display_price: String,
}

impl From<&ProductRow> for ProductRowBody {
    fn from(row: &ProductRow) -> Self {
        ProductRowBody {
            prodcode: row.prodcode.clone(),
            description: row.description.clone(),
            unit: row.unit.clone(),
            current_price: row.current_price,
            display_price: row.display_price(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PriceEntryBody {
    pub effdate: NaiveDate,
    pub unitprice: Decimal,
    pub display_effdate: String,
    pub display_price: String,
}

impl From<&PriceEntry> for PriceEntryBody {
    fn from(entry: &PriceEntry) -> Self {
        PriceEntryBody {
            effdate: entry.effdate,
            unitprice: entry.unitprice,
            display_effdate: format_effdate(&entry.effdate),
            display_price: format_price(&entry.unitprice),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProductDetailBody {
    pub product: Product,
    pub history: Vec<PriceEntryBody>,
}

#[derive(Deserialize, Debug, Default)]
struct ListProductsQuery {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct CreateProductBody {
    prodcode: String,
    description: String,
    unit: String,
}

/// `prodcode` is accepted but ignored, the key comes from the path.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct UpdateProductBody {
    #[allow(dead_code)]
    prodcode: Option<String>,
    description: String,
    unit: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct CreatePriceBody {
    effdate: String,
    unitprice: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct UpdatePriceBody {
    unitprice: String,
}

fn parse_path_effdate(value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value, EFFDATE_FORMAT)
        .map_err(|_| ApiError(AdminError::InvalidDate(value.to_string())))
}

fn success(status: StatusCode, message: &str) -> Response {
    (status, Json(Notification::success(message))).into_response()
}

async fn home(State(state): State<ServerState>) -> ApiResult<Json<ServerStats>> {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        products: state.product_store.count_products()?,
        price_entries: state.product_store.count_price_entries()?,
    };
    Ok(Json(stats))
}

async fn get_dashboard() -> Json<dashboard::Dashboard> {
    Json(dashboard::dashboard())
}

async fn get_shell() -> Json<dashboard::Shell> {
    Json(dashboard::shell())
}

async fn list_products(
    State(store): State<GuardedProductStore>,
    Query(query): Query<ListProductsQuery>,
) -> ApiResult<Json<Vec<ProductRowBody>>> {
    let rows = load_product_rows(store.as_ref())?;
    let visible = filter_rows(rows.values(), &query.q)
        .into_iter()
        .map(ProductRowBody::from)
        .collect();
    Ok(Json(visible))
}

async fn get_product(
    State(store): State<GuardedProductStore>,
    Path(prodcode): Path<String>,
) -> ApiResult<Json<ProductDetailBody>> {
    let product = store
        .get_product(&prodcode)?
        .ok_or_else(|| AdminError::ProductNotFound(prodcode.clone()))?;
    let history = store
        .list_price_history(&prodcode)?
        .iter()
        .map(PriceEntryBody::from)
        .collect();
    Ok(Json(ProductDetailBody { product, history }))
}

async fn create_product(
    State(store): State<GuardedProductStore>,
    Json(body): Json<CreateProductBody>,
) -> ApiResult<Response> {
    let mut form = ProductForm::add();
    form.set_prodcode(body.prodcode);
    form.set_description(body.description);
    form.set_unit(body.unit);
    let kind = form.save(store.as_ref())?;
    metrics::record_mutation("product", "create");
    metrics::refresh_catalog_counts(store.as_ref());
    Ok(success(StatusCode::CREATED, ProductForm::success_message(kind)))
}

async fn update_product(
    State(store): State<GuardedProductStore>,
    Path(prodcode): Path<String>,
    Json(body): Json<UpdateProductBody>,
) -> ApiResult<Response> {
    let original = Product {
        prodcode,
        description: String::new(),
        unit: String::new(),
    };
    let mut form = ProductForm::edit(&original);
    form.set_description(body.description);
    form.set_unit(body.unit);
    let kind = form.save(store.as_ref())?;
    metrics::record_mutation("product", "update");
    Ok(success(StatusCode::OK, ProductForm::success_message(kind)))
}

async fn delete_product(
    State(store): State<GuardedProductStore>,
    Path(prodcode): Path<String>,
) -> ApiResult<Response> {
    delete_product_cascade(store.as_ref(), &prodcode)?;
    metrics::record_mutation("product", "delete");
    metrics::refresh_catalog_counts(store.as_ref());
    Ok(success(StatusCode::OK, PRODUCT_DELETED_MESSAGE))
}

async fn list_prices(
    State(store): State<GuardedProductStore>,
    Path(prodcode): Path<String>,
) -> ApiResult<Json<Vec<PriceEntryBody>>> {
    let history = store
        .list_price_history(&prodcode)?
        .iter()
        .map(PriceEntryBody::from)
        .collect();
    Ok(Json(history))
}

async fn create_price(
    State(store): State<GuardedProductStore>,
    Path(prodcode): Path<String>,
    Json(body): Json<CreatePriceBody>,
) -> ApiResult<Response> {
    let mut form = PriceHistoryForm::add(prodcode);
    form.set_effdate(body.effdate);
    form.set_unitprice(body.unitprice);
    let kind = form.save(store.as_ref())?;
    metrics::record_mutation("price", "create");
    metrics::refresh_catalog_counts(store.as_ref());
    Ok(success(StatusCode::CREATED, PriceHistoryForm::success_message(kind)))
}

async fn update_price(
    State(store): State<GuardedProductStore>,
    Path((prodcode, effdate)): Path<(String, String)>,
    Json(body): Json<UpdatePriceBody>,
) -> ApiResult<Response> {
    let original = PriceEntry {
        prodcode,
        effdate: parse_path_effdate(&effdate)?,
        unitprice: Decimal::ZERO,
    };
    let mut form = PriceHistoryForm::edit(&original);
    form.set_unitprice(body.unitprice);
    let kind = form.save(store.as_ref())?;
    metrics::record_mutation("price", "update");
    Ok(success(StatusCode::OK, PriceHistoryForm::success_message(kind)))
}

async fn delete_price(
    State(store): State<GuardedProductStore>,
    Path((prodcode, effdate)): Path<(String, String)>,
) -> ApiResult<Response> {
    let effdate = parse_path_effdate(&effdate)?;
    store.delete_price(&prodcode, effdate)?;
    info!("Deleted price of {} effective {}", prodcode, effdate);
    metrics::record_mutation("price", "delete");
    metrics::refresh_catalog_counts(store.as_ref());
    Ok(success(StatusCode::OK, PRICE_DELETED_MESSAGE))
}

pub fn make_app(config: ServerConfig, product_store: GuardedProductStore) -> Result<Router> {
    let state = ServerState::new(config.clone(), product_store);

    let product_routes: Router = Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{prodcode}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{prodcode}/prices", get(list_prices).post(create_price))
        .route(
            "/{prodcode}/prices/{effdate}",
            put(update_price).delete(delete_price),
        )
        .with_state(state.clone());

    let shell_routes: Router = Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/navigation", get(get_shell));

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new().route("/", get(home)).with_state(state.clone()),
    };

    let mut app: Router = home_router
        .nest("/v1/products", product_routes)
        .nest("/v1", shell_routes);

    #[cfg(feature = "slowdown")]
    {
        app = app.layer(middleware::from_fn(slowdown_request));
    }
    app = app.layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics::metrics_handler))
}

pub async fn run_server(config: ServerConfig, product_store: GuardedProductStore) -> Result<()> {
    let port = config.port;
    let metrics_port = config.metrics_port;
    let app = make_app(config, product_store)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);

    tokio::select! {
        result = axum::serve(listener, app).into_future() => result?,
        result = axum::serve(metrics_listener, make_metrics_app()).into_future() => result?,
    }
    Ok(())
}
