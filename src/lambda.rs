use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tinywebdb_edge::adapters::function_url::{handle_event, FunctionUrlRequest, FunctionUrlResponse};
use tinywebdb_edge::core::ConfigProvider;
use tinywebdb_edge::utils::{logger, validation::Validate};
use tinywebdb_edge::{connect_pool, Env, LambdaConfig};

async fn function_handler(
    event: LambdaEvent<FunctionUrlRequest>,
    env: &Env,
) -> Result<FunctionUrlResponse, Error> {
    Ok(handle_event(event.payload, env).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = LambdaConfig::from_env()?;
    config.validate()?;

    // 連線池在 cold start 時建立一次，之後每個請求共用
    let pool = connect_pool(config.database_url(), config.max_connections()).await?;
    let env = Env { db: pool };

    tracing::info!("TinyWebDB Lambda function ready");
    run(service_fn(|event: LambdaEvent<FunctionUrlRequest>| {
        let env = env.clone();
        async move { function_handler(event, &env).await }
    }))
    .await
}
