#[cfg(feature = "lambda")]
use lambda_http::{run, service_fn, Body, Error, Request, Response};
#[cfg(feature = "lambda")]
use lead_intake::domain::ports::ConfigProvider;
#[cfg(feature = "lambda")]
use lead_intake::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use lead_intake::{LeadConfig, LeadIntake, ResendClient};

#[cfg(feature = "lambda")]
async fn function_handler(
    intake: &LeadIntake<ResendClient>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let (parts, body) = event.into_parts();
    let body: &[u8] = body.as_ref();

    // 轉成 core 用的 http::Request，再轉回 Lambda 的 Body
    let response = intake
        .handle_request(http::Request::from_parts(parts, body))
        .await;

    Ok(response.map(Body::from))
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 冷啟動時讀一次設定
    let config = LeadConfig::from_env()?;
    config.validate()?;
    if config.api_key().is_none() {
        tracing::warn!("RESEND_API_KEY is not set; submissions will be rejected with 500");
    }

    let sender = ResendClient::from_config(&config)?;
    let intake = LeadIntake::new(sender, config);
    let intake = &intake;

    tracing::info!("Lead intake Lambda function ready");
    run(service_fn(move |event: Request| async move {
        function_handler(intake, event).await
    }))
    .await
}
