use crate::analyzer::chart_pattern_analyzer::PatternConfig;
use crate::analyzer::support_resistance_analyzer::SupportResistanceConfig;
use crate::analyzer::trend_analyzer::TrendConfig;
use crate::analyzer::volume_analyzer::VolumeConfig;
use crate::indicator::IndicatorConfig;
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// 설정 로드 오류
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 오류
    #[error("설정 파일 오류: {0}")]
    FileError(String),
    /// 파싱 오류
    #[error("설정 파싱 오류: {0}")]
    ParseError(String),
    /// 유효성 검사 오류
    #[error("설정 유효성 검사 오류: {0}")]
    ValidationError(String),
}

/// 설정 로드 결과
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 설정 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON 형식
    Json,
    /// TOML 형식
    Toml,
    /// 자동 감지 (파일 확장자로부터)
    Auto,
}

/// 설정 유효성 검사 트레이트
pub trait ConfigValidation {
    /// 설정 유효성 검사
    fn validate(&self) -> ConfigResult<()>;
}

/// 분석 전체 설정
///
/// 모든 임계값은 기본값을 가지므로 설정 파일에는 바꿀 항목만 적으면 됩니다.
///
/// ```toml
/// [trend]
/// short_period = 7
///
/// [patterns.head_shoulders]
/// window = 2
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub indicators: IndicatorConfig,
    pub volume: VolumeConfig,
    pub trend: TrendConfig,
    pub support_resistance: SupportResistanceConfig,
    pub patterns: PatternConfig,
}

impl ConfigValidation for AnalysisConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.indicators.validate()?;
        self.volume.validate()?;
        self.trend.validate()?;
        self.support_resistance.validate()?;
        self.patterns.validate()
    }
}

/// 설정 파일 로더
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// 파일에서 설정 로드
    ///
    /// # Arguments
    /// * `path` - 설정 파일 경로
    /// * `format` - 설정 파일 형식 (Auto면 확장자로 감지)
    ///
    /// # Returns
    /// * `ConfigResult<T>` - 설정 객체 또는 오류
    pub fn load_from_file<T>(path: &Path, format: ConfigFormat) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
    {
        debug!("설정 파일 로드 시작: {}", path.display());

        let format = match format {
            ConfigFormat::Auto => Self::detect_format(path)?,
            other => other,
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            error!("설정 파일 읽기 실패: {} - {}", path.display(), e);
            ConfigError::FileError(format!("파일 읽기 실패: {}", e))
        })?;

        let config = Self::load_from_string(&content, format).inspect_err(|e| {
            error!("설정 파일 로드 실패: {} - {}", path.display(), e);
        })?;

        info!("설정 파일 로드 완료: {}", path.display());
        Ok(config)
    }

    /// 문자열에서 설정 로드
    ///
    /// # Arguments
    /// * `content` - 설정 문자열
    /// * `format` - 설정 형식 (Auto면 JSON 후 TOML 순으로 시도)
    pub fn load_from_string<T>(content: &str, format: ConfigFormat) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
    {
        let config: T = match format {
            ConfigFormat::Json => Self::parse_json(content)?,
            ConfigFormat::Toml => Self::parse_toml(content)?,
            ConfigFormat::Auto => match Self::parse_json::<T>(content) {
                Ok(config) => config,
                Err(_) => Self::parse_toml(content)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// HashMap에서 설정 로드
    ///
    /// # Arguments
    /// * `map` - 설정 맵 (최상위 섹션 이름 -> 값)
    pub fn load_from_map<T, V>(map: &HashMap<String, V>) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
        V: Serialize,
    {
        // HashMap을 JSON으로 변환 후 다시 역직렬화
        let json = serde_json::to_string(map)
            .map_err(|e| ConfigError::ParseError(format!("맵을 JSON으로 변환 실패: {}", e)))?;

        Self::load_from_string(&json, ConfigFormat::Json)
    }

    /// 설정 파일 저장
    ///
    /// # Arguments
    /// * `config` - 설정 객체
    /// * `path` - 저장할 파일 경로
    /// * `format` - 설정 파일 형식 (Auto면 확장자, 없으면 TOML)
    pub fn save_to_file<T>(config: &T, path: &Path, format: ConfigFormat) -> ConfigResult<()>
    where
        T: Serialize + ConfigValidation,
    {
        debug!("설정 파일 저장 시작: {}", path.display());
        config.validate()?;

        let format = match format {
            ConfigFormat::Auto => Self::detect_format(path).unwrap_or_else(|_| {
                debug!("확장자 없음, 기본 TOML 형식 선택됨");
                ConfigFormat::Toml
            }),
            other => other,
        };

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config)
                .map_err(|e| ConfigError::ParseError(format!("JSON 직렬화 실패: {}", e)))?,
            ConfigFormat::Toml | ConfigFormat::Auto => toml::to_string_pretty(config)
                .map_err(|e| ConfigError::ParseError(format!("TOML 직렬화 실패: {}", e)))?,
        };

        std::fs::write(path, &content).map_err(|e| {
            error!("설정 파일 쓰기 실패: {} - {}", path.display(), e);
            ConfigError::FileError(format!("파일 쓰기 실패: {}", e))
        })?;

        info!("설정 파일 저장 완료: {}", path.display());
        Ok(())
    }

    /// JSON 파싱
    fn parse_json<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
        serde_json::from_str(content).map_err(|e| {
            warn!("JSON 파싱 실패: {}", e);
            ConfigError::ParseError(format!("JSON 파싱 실패: {}", e))
        })
    }

    /// TOML 파싱
    fn parse_toml<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
        toml::from_str(content).map_err(|e| {
            warn!("TOML 파싱 실패: {}", e);
            ConfigError::ParseError(format!("TOML 파싱 실패: {}", e))
        })
    }

    /// 파일 형식 감지
    fn detect_format(path: &Path) -> ConfigResult<ConfigFormat> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => {
                warn!("지원되지 않는 파일 형식: {}", path.display());
                Err(ConfigError::FileError(format!(
                    "파일 형식을 감지할 수 없음: {}",
                    path.display()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::ma::MAType;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_str = r#"
            [trend]
            short_period = 7
            ma_type = "EMA"

            [patterns.head_shoulders]
            window = 1
        "#;
        let config =
            ConfigLoader::load_from_string::<AnalysisConfig>(toml_str, ConfigFormat::Toml).unwrap();
        assert_eq!(config.trend.short_period, 7);
        assert_eq!(config.trend.long_period, 30);
        assert_eq!(config.trend.ma_type, MAType::EMA);
        assert_eq!(config.patterns.head_shoulders.window, 1);
        assert_eq!(config.patterns.double_extremum.max_distance, 50);
        assert_eq!(config.volume, VolumeConfig::default());
    }

    #[test]
    fn test_partial_json_auto_detect() {
        let json = r#"{"volume": {"lookback": 10}}"#;
        let config =
            ConfigLoader::load_from_string::<AnalysisConfig>(json, ConfigFormat::Auto).unwrap();
        assert_eq!(config.volume.lookback, 10);
        assert_eq!(config.volume.spike_ratio, 1.6);
    }

    #[test]
    fn test_validation_error() {
        let json = r#"{"patterns": {"double_extremum": {"min_distance": 60}}}"#;
        match ConfigLoader::load_from_string::<AnalysisConfig>(json, ConfigFormat::Json) {
            Err(ConfigError::ValidationError(_)) => (),
            other => panic!("유효성 검사 오류가 발생해야 함: {:?}", other),
        }
    }

    #[test]
    fn test_oversized_window_rejected() {
        let json = r#"{"patterns": {"head_shoulders": {"window": 9223372036854775808}}}"#;
        let result = ConfigLoader::load_from_string::<AnalysisConfig>(json, ConfigFormat::Json);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let mut config = AnalysisConfig::default();
        config.patterns.ascending_triangle.window = usize::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        let result = ConfigLoader::load_from_string::<AnalysisConfig>("{", ConfigFormat::Json);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_from_map() {
        let mut map = HashMap::new();
        map.insert(
            "support_resistance".to_string(),
            serde_json::json!({"lookback": 50}),
        );
        let config = ConfigLoader::load_from_map::<AnalysisConfig, _>(&map).unwrap();
        assert_eq!(config.support_resistance.lookback, 50);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = TempDir::new().unwrap();
        let mut config = AnalysisConfig::default();
        config.trend.band = 0.02;
        config.patterns.ascending_triangle.confidence = 0.75;

        let json_path = dir.path().join("analysis.json");
        ConfigLoader::save_to_file(&config, &json_path, ConfigFormat::Auto).unwrap();
        let loaded =
            ConfigLoader::load_from_file::<AnalysisConfig>(&json_path, ConfigFormat::Auto).unwrap();
        assert_eq!(loaded, config);

        let toml_path = dir.path().join("analysis.toml");
        ConfigLoader::save_to_file(&config, &toml_path, ConfigFormat::Auto).unwrap();
        let loaded =
            ConfigLoader::load_from_file::<AnalysisConfig>(&toml_path, ConfigFormat::Auto).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("analysis.yaml");
        std::fs::write(&path, "trend: {}").unwrap();
        let result = ConfigLoader::load_from_file::<AnalysisConfig>(&path, ConfigFormat::Auto);
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }
}
