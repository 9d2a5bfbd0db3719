use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use up_harvest::core::songlist::{annotate_timeline, parse_songlist};
use up_harvest::core::timeshift::{format_seconds_hms, parse_time_adjustment, shift_timestamps};
use up_harvest::utils::logger;

#[derive(Parser)]
#[command(name = "songlist")]
#[command(about = "Songlist helpers: annotate timelines with BV ids, shift timestamps")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// 將時間軸中的歌名替換為歌單裡的 BV 號
    Annotate {
        /// 歌單檔 (BV, 歌名, ...)
        #[arg(short, long)]
        songlist: String,

        /// 時間軸文字檔
        #[arg(short, long)]
        input: String,

        /// 輸出檔，省略時覆寫輸入檔
        #[arg(short, long)]
        output: Option<String>,
    },
    /// 平移所有時間戳，例如 `1h2m3s` 或 `-30s`
    Shift {
        #[arg(long, allow_hyphen_values = true)]
        by: String,

        #[arg(short, long)]
        input: String,

        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    match args.command {
        Command::Annotate {
            songlist,
            input,
            output,
        } => {
            let content = std::fs::read_to_string(&songlist)
                .with_context(|| format!("Failed to read songlist {}", songlist))?;
            let (index, warnings) = parse_songlist(&content);
            for warning in &warnings {
                tracing::warn!(
                    "第 {} 行格式異常，文件為 {}: {}",
                    warning.line,
                    songlist,
                    warning.content
                );
            }
            if index.is_empty() {
                anyhow::bail!("No songs with BV numbers found in {}", songlist);
            }
            tracing::info!("📚 Loaded {} song names from {}", index.len(), songlist);

            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input))?;
            let target = output.unwrap_or(input);
            std::fs::write(&target, annotate_timeline(&text, &index))
                .with_context(|| format!("Failed to write {}", target))?;
            println!("✅ Annotated timeline saved to {}", target);
        }
        Command::Shift { by, input, output } => {
            let seconds = parse_time_adjustment(&by)?;
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input))?;
            let target = output.unwrap_or(input);
            std::fs::write(&target, shift_timestamps(&text, seconds))
                .with_context(|| format!("Failed to write {}", target))?;
            println!(
                "✅ Shifted timestamps by {} in {}",
                format_seconds_hms(seconds),
                target
            );
        }
    }

    Ok(())
}
