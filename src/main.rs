use clap::Parser;
use up_harvest::config::prompt::prompt_owner_id;
use up_harvest::domain::model::Termination;
use up_harvest::utils::error::HarvestError;
use up_harvest::utils::{logger, validation::Validate};
use up_harvest::{
    BiliListingClient, CliConfig, FixedPacer, HarvestEngine, JsonlPageSink, LocalStorage,
};

fn exit_with(e: &HarvestError) -> ! {
    tracing::error!(
        "❌ Harvest failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting up-harvest");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let owner_id = match cli.uid {
        Some(uid) => uid,
        None => {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut output = std::io::stdout();
            match prompt_owner_id(&mut input, &mut output) {
                Ok(uid) => uid,
                Err(e) => exit_with(&e),
            }
        }
    };

    let client = match BiliListingClient::new(&config.client) {
        Ok(client) => client,
        Err(e) => exit_with(&e),
    };

    tracing::info!(
        "🔧 page_size={}, max_pages={}, pace={:?}, categories={}",
        config.settings.page_size,
        config.settings.max_pages,
        config.pace,
        config.settings.filter
    );

    let storage = LocalStorage::new(config.output_dir.clone());
    let mut engine = HarvestEngine::new(
        client,
        FixedPacer::new(config.pace),
        config.settings.clone(),
        storage,
    );
    if let Some(path) = &config.archive_path {
        tracing::info!("🗄️ Archiving raw pages to {}", path);
        engine = engine.with_sink(Box::new(JsonlPageSink::new(path)));
    }

    match engine.run(owner_id).await {
        Ok(summary) => {
            let output_path = std::path::Path::new(&config.output_dir).join(&summary.output_file);
            if let Termination::FetchFailed(reason) = &summary.termination {
                println!("⚠️ 抓取中途失敗: {}", reason);
            }
            println!(
                "✅ 已保存 {} 個視頻的BV號和標題到 {}",
                summary.records,
                output_path.display()
            );
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
