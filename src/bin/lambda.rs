//! AWS Lambda entry point for tier comparisons
//!
//! Accepts a JSON [`CompareRequest`](tier_compare::CompareRequest) body (an
//! empty body means all defaults) and answers with the comparison as JSON.

use lambda_http::{run, service_fn, Body, Error, Request, Response};

use tier_compare::rates::DEFAULT_RATES_PATH;
use tier_compare::service::compare_body;
use tier_compare::RateTable;

async fn function_handler(table: &RateTable, event: Request) -> Result<Response<Body>, Error> {
    let (status, payload) = compare_body(table, event.body().as_ref());
    let response = Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let path = std::env::var("TIER_RATES_PATH").unwrap_or_else(|_| DEFAULT_RATES_PATH.to_string());
    let (table, _) = RateTable::load_or_builtin(&path);
    let table: &'static RateTable = Box::leak(Box::new(table));

    run(service_fn(move |event: Request| function_handler(table, event))).await
}
