use chart_analysis::aggregator::aggregate_with_interval;
use chart_analysis::analyzer::analyze;
use chart_analysis::candle_store::CandleStore;
use chart_analysis::config_loader::{AnalysisConfig, ConfigFormat, ConfigLoader};
use chart_analysis::error::{AnalysisError, AnalysisResult};
use chart_analysis::model::{OhlcvCandle, Tick};
use log::{debug, error, info};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

const MAX_CANDLES: usize = 5_000;
const DEFAULT_ASSET_NAME: &str = "Unknown Asset";

/// 캔들 입력 파일 형식: 배열 또는 `{candles, assetName}`
#[derive(Deserialize)]
#[serde(untagged)]
enum CandleInput {
    Bare(Vec<OhlcvCandle>),
    Wrapped {
        candles: Vec<OhlcvCandle>,
        #[serde(rename = "assetName")]
        asset_name: Option<String>,
    },
}

enum Command {
    Candles {
        path: PathBuf,
        config: Option<PathBuf>,
    },
    Ticks {
        path: PathBuf,
        interval: String,
        config: Option<PathBuf>,
    },
}

fn print_usage(program: &str) {
    println!("사용법: {} <candles.json> [설정_파일_경로]", program);
    println!("        {} --ticks <ticks.json> <간격> [설정_파일_경로]", program);
    println!("간격 예시: 30s, 1m, 5m, 1h");
}

fn parse_args(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("--ticks") => Some(Command::Ticks {
            path: PathBuf::from(args.get(2)?),
            interval: args.get(3)?.clone(),
            config: args.get(4).map(PathBuf::from),
        }),
        Some(path) => Some(Command::Candles {
            path: PathBuf::from(path),
            config: args.get(2).map(PathBuf::from),
        }),
        None => None,
    }
}

fn load_config(path: Option<&Path>) -> AnalysisResult<AnalysisConfig> {
    match path {
        Some(path) => {
            debug!("사용자 지정 설정 파일 사용: {}", path.display());
            Ok(ConfigLoader::load_from_file(path, ConfigFormat::Auto)?)
        }
        None => {
            debug!("기본 설정 사용");
            Ok(AnalysisConfig::default())
        }
    }
}

fn read_candles(path: &Path) -> AnalysisResult<(Vec<OhlcvCandle>, String)> {
    let content = std::fs::read_to_string(path)?;
    let input: CandleInput = serde_json::from_str(&content)?;
    Ok(match input {
        CandleInput::Bare(candles) => (candles, DEFAULT_ASSET_NAME.to_string()),
        CandleInput::Wrapped {
            candles,
            asset_name,
        } => (
            candles,
            asset_name.unwrap_or_else(|| DEFAULT_ASSET_NAME.to_string()),
        ),
    })
}

fn read_ticks(path: &Path, interval: &str) -> AnalysisResult<Vec<OhlcvCandle>> {
    let content = std::fs::read_to_string(path)?;
    let ticks: Vec<Tick> = serde_json::from_str(&content)?;
    info!("틱 {}개를 {} 간격으로 집계", ticks.len(), interval);
    aggregate_with_interval(&ticks, interval)
}

fn run(command: Command) -> AnalysisResult<()> {
    let (candles, asset_name, config_path) = match command {
        Command::Candles { path, config } => {
            let (candles, asset_name) = read_candles(&path)?;
            (candles, asset_name, config)
        }
        Command::Ticks {
            path,
            interval,
            config,
        } => (read_ticks(&path, &interval)?, DEFAULT_ASSET_NAME.to_string(), config),
    };
    let config = load_config(config_path.as_deref())?;

    if candles.is_empty() {
        return Err(AnalysisError::DegenerateWindow(
            "캔들 배열이 비어 있습니다".to_string(),
        ));
    }

    let store = CandleStore::new(candles, MAX_CANDLES);
    store.validate()?;
    info!("{}: 캔들 {}개 분석 시작", asset_name, store.len());

    let report = analyze(store.items(), &config);
    let mut output = serde_json::to_value(&report)?;
    if let Some(object) = output.as_object_mut() {
        object.insert("assetName".to_string(), serde_json::Value::String(asset_name));
    }
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn main() {
    // 로그 초기화
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    debug!("커맨드 라인 인수: {:?}", args);

    let Some(command) = parse_args(&args) else {
        error!("인수가 충분하지 않습니다.");
        print_usage(args.first().map(String::as_str).unwrap_or("analyze_chart"));
        std::process::exit(2);
    };

    if let Err(err) = run(command) {
        error!("분석 실패: {}", err);
        let output = serde_json::json!({ "success": false, "error": err.to_string() });
        println!("{}", output);
        std::process::exit(1);
    }

    info!("분석 종료");
}
