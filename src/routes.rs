// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;

use log::info;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::sentiment::{get_sentiment, show_form, submit_form, TickerForm};
use crate::services::pipeline::SentimentService;

const MAX_FORM_BYTES: u64 = 16 * 1024;

// Turn rejections into JSON error bodies
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status();
        message = api_error.message.clone();
    } else if err.find::<warp::reject::InvalidQuery>().is_some()
        || err.find::<warp::body::BodyDeserializeError>().is_some()
    {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Bad Request".to_string();
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        code = warp::http::StatusCode::PAYLOAD_TOO_LARGE;
        message = "Payload Too Large".to_string();
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        code = warp::http::StatusCode::LENGTH_REQUIRED;
        message = "Length Required".to_string();
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        code = warp::http::StatusCode::UNSUPPORTED_MEDIA_TYPE;
        message = "Unsupported Media Type".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    service: Arc<SentimentService>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let service_filter = warp::any().map(move || service.clone());

    let form_route = warp::path::end().and(warp::get()).and_then(show_form);

    let submit_route = warp::path::end()
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_FORM_BYTES))
        .and(warp::body::form::<TickerForm>())
        .and(service_filter.clone())
        .and_then(submit_form);

    let api_route = warp::path!("api" / "v1" / "sentiment")
        .and(warp::get())
        .and(warp::query::<TickerForm>())
        .and(service_filter.clone())
        .and_then(get_sentiment);

    info!("All routes configured successfully.");

    form_route
        .or(submit_route)
        .or(api_route)
        .recover(handle_rejection)
}
