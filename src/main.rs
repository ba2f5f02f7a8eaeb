use clap::Parser;
use custom_tax_udf::config::RunMode;
use custom_tax_udf::core::ConfigProvider;
use custom_tax_udf::utils::{logger, validation::Validate};
use custom_tax_udf::{CliConfig, CustomTax, EtlEngine, LocalStorage, TaxError, TaxPipeline, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 驗證配置
    if let Err(e) = config.validate() {
        init_logger(config.verbose, config.json_logs);
        fail(&e, 1);
    }

    match config.mode()? {
        RunMode::Lookup(location) => {
            init_logger(config.verbose, config.json_logs);
            let rate = CustomTax::new().eval(location);
            tracing::debug!("{}({:?}) = {}", CustomTax::NAME, location, rate);
            println!("{}", rate);
        }
        RunMode::Batch => {
            init_logger(config.verbose, config.json_logs);
            tracing::info!("Starting custom-tax batch run");
            run_batch(config.clone()).await;
        }
        RunMode::Job(path) => {
            // 載入 TOML 配置，日誌設定可能來自檔案
            let job = match TomlConfig::from_file(path) {
                Ok(job) => job,
                Err(e) => {
                    init_logger(config.verbose, config.json_logs);
                    eprintln!("❌ Failed to load job file '{}': {}", path, e);
                    eprintln!("💡 {}", e.recovery_suggestion());
                    std::process::exit(1);
                }
            };
            init_logger(
                config.verbose || job.verbose(),
                config.json_logs || job.json_logs(),
            );

            if let Err(e) = job.validate() {
                fail(&e, 1);
            }

            tracing::info!("📁 Running job '{}' from {}", job.job.name, path);
            if let Some(description) = &job.job.description {
                tracing::debug!("Job description: {}", description);
            }
            run_batch(job).await;
        }
    }

    Ok(())
}

fn init_logger(verbose: bool, json: bool) {
    if json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(verbose);
    }
}

async fn run_batch<C: ConfigProvider + 'static>(config: C) {
    tracing::debug!(
        "Input: {}, location column: {}, rate column: {}",
        config.input_path(),
        config.location_column(),
        config.rate_column()
    );

    let storage = LocalStorage::new(".");
    let pipeline = TaxPipeline::new(storage, config, CustomTax::new());
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Batch run completed successfully");
            println!("{}", output_path);
        }
        Err(e) => fail(&e, 2),
    }
}

fn fail(e: &TaxError, exit_code: i32) -> ! {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code);
}
