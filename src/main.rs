use gamer_profile_store::{
    config::Config,
    logging,
    router::{self, ApiRequest},
    store::RecordStore,
};
use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use tracing::info;

async fn function_handler(store: &RecordStore, event: Request) -> Result<Response<Body>, Error> {
    let request = ApiRequest {
        method: event.method().as_str().to_string(),
        body: String::from_utf8_lossy(event.body()).into_owned(),
        path_parameters: event
            .path_parameters()
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    };

    let response = router::route(store, &request).await;

    Ok(Response::builder()
        .status(response.status_code)
        .header("content-type", "application/json")
        .body(Body::Text(response.body))?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init_logging()?;

    let config = Config::from_env()?;
    let store = RecordStore::new(config.connect_backend().await, &config.table_name);
    info!(table = store.table_name(), "Handler ready");

    run(service_fn(|event| function_handler(&store, event))).await
}
