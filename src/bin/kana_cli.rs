use kana_pipeline::{
    OtherTranslationRequest, PipelineConfig, TranslationPipeline, TranslationRequest,
};
use tracing_subscriber::EnvFilter;

struct CliArgs {
    target_lang: Option<String>,
    phrase: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1).collect())?;
    let config = PipelineConfig::from_env()?;
    let pipeline = TranslationPipeline::from_config(&config)?;

    let (rendered, failed) = match args.target_lang {
        Some(target_lang) if !is_japanese(&target_lang) => {
            let request = OtherTranslationRequest::new(args.phrase, target_lang);
            match pipeline.other_language().execute(&request).await {
                Ok(result) => (serde_json::to_string_pretty(&result)?, false),
                Err(failure) => (serde_json::to_string_pretty(&failure.into_result())?, true),
            }
        }
        _ => {
            let request = TranslationRequest::new(args.phrase);
            match pipeline.execute(&request).await {
                Ok(result) => (serde_json::to_string_pretty(&result)?, false),
                Err(failure) => (serde_json::to_string_pretty(&failure.into_result())?, true),
            }
        }
    };

    println!("{rendered}");
    if failed {
        std::process::exit(1);
    }
    Ok(())
}

fn is_japanese(target_lang: &str) -> bool {
    matches!(target_lang.trim().to_ascii_lowercase().as_str(), "ja" | "jap" | "jp")
}

fn parse_args(args: Vec<String>) -> Result<CliArgs, Box<dyn std::error::Error>> {
    let mut target_lang = None;
    let mut words = Vec::new();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--target" => {
                let value = args
                    .get(i + 1)
                    .ok_or("missing value for --target")?
                    .trim()
                    .to_string();
                if value.is_empty() {
                    return Err("--target must be non-empty".into());
                }
                target_lang = Some(value);
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                words.push(other.to_string());
                i += 1;
            }
        }
    }

    let phrase = words.join(" ");
    if phrase.trim().is_empty() {
        print_help();
        return Err("missing phrase to translate".into());
    }

    Ok(CliArgs {
        target_lang,
        phrase,
    })
}

fn print_help() {
    eprintln!(
        "Usage:\n  kana_cli [--target LANG] PHRASE...\n\nWithout --target (or with --target ja) the phrase is translated to Japanese\nwith hiragana, katakana and romaji readings.\n\nEnv:\n  HUGGINGFACE_API_KEY / HUGGINGFACE_TRANSLATION_MODEL / HUGGINGFACE_TEXTGEN_MODEL\n  HUGGINGFACE_READING_MODEL (\"none\" keeps readings to the dictionary)\n  CHATGPT_API_KEY / DEEPSEEK_API_KEY / OLLAMA_API_URL\n  GATEWAY_TIMEOUT_MS / READING_DICTIONARY_PATH\n  RUST_LOG"
    );
}
