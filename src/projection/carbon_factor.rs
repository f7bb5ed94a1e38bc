/// 국가별 전력 배출계수 테이블을 제공한다.
/// 값은 전력망 평균 배출계수(kg CO₂/kWh)의 참고치이며 보고서 작성 시 최신 공시값으로 검증해야 한다.
use serde::{Deserialize, Serialize};

use super::error::{require_non_negative, ProjectionError};

/// 사용자 지정 배출계수를 선택하는 키.
pub const CUSTOM_KEY: &str = "Custom";

#[derive(Debug)]
pub struct CountryFactor {
    /// ISO 3166-1 alpha-2 코드
    pub code: &'static str,
    pub name: &'static str,
    /// 배출계수 [kg CO₂/kWh]
    pub factor_kg_per_kwh: f64,
}

impl CountryFactor {
    pub const fn new(code: &'static str, name: &'static str, factor_kg_per_kwh: f64) -> Self {
        Self {
            code,
            name,
            factor_kg_per_kwh,
        }
    }
}

/// 배출계수 출처. 문자열 키 대신 타입으로 국가/사용자 지정을 구분할 때 사용한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CarbonSource {
    /// 국가명 또는 코드
    Country(String),
    /// 사용자 지정 배출계수 [kg CO₂/kWh]
    Custom(f64),
}

impl CarbonSource {
    /// 국가 키 문자열과 사용자 지정 값으로부터 출처를 만든다. "Custom" 키면 사용자 지정으로 본다.
    pub fn from_key(country_key: &str, custom_value: f64) -> Self {
        if is_custom_key(country_key) {
            CarbonSource::Custom(custom_value)
        } else {
            CarbonSource::Country(country_key.trim().to_string())
        }
    }

    /// 배출계수를 결정한다.
    pub fn factor(&self) -> Result<f64, ProjectionError> {
        match self {
            CarbonSource::Country(key) => find_country(key)
                .map(|c| c.factor_kg_per_kwh)
                .ok_or_else(|| unknown_key(key)),
            CarbonSource::Custom(value) => require_non_negative("carbon_factor", *value),
        }
    }

    /// 표시용 라벨.
    pub fn label(&self) -> String {
        match self {
            CarbonSource::Country(key) => find_country(key)
                .map(|c| c.name.to_string())
                .unwrap_or_else(|| key.clone()),
            CarbonSource::Custom(_) => CUSTOM_KEY.to_string(),
        }
    }
}

pub fn countries() -> &'static [CountryFactor] {
    COUNTRY_FACTORS
}

/// 국가명 또는 코드로 배출계수 항목을 찾는다. 대소문자는 구분하지 않는다.
pub fn find_country(key: &str) -> Option<&'static CountryFactor> {
    let key = key.trim();
    COUNTRY_FACTORS
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(key) || c.name.eq_ignore_ascii_case(key))
}

pub fn is_custom_key(key: &str) -> bool {
    key.trim().eq_ignore_ascii_case(CUSTOM_KEY)
}

/// 국가 키를 배출계수로 변환한다. "Custom"이면 `custom_value`를 그대로 사용한다.
pub fn resolve(country_key: &str, custom_value: f64) -> Result<f64, ProjectionError> {
    CarbonSource::from_key(country_key, custom_value).factor()
}

fn unknown_key(key: &str) -> ProjectionError {
    ProjectionError::invalid(
        "country",
        format!("알 수 없는 국가 키: {key} (국가명, 코드 또는 \"{CUSTOM_KEY}\")"),
    )
}

const COUNTRY_FACTORS: &[CountryFactor] = &[
    CountryFactor::new("AU", "Australia", 0.656),
    CountryFactor::new("BR", "Brazil", 0.074),
    CountryFactor::new("CA", "Canada", 0.130),
    CountryFactor::new("CN", "China", 0.581),
    CountryFactor::new("FR", "France", 0.056),
    CountryFactor::new("DE", "Germany", 0.350),
    CountryFactor::new("IN", "India", 0.708),
    CountryFactor::new("ID", "Indonesia", 0.761),
    CountryFactor::new("JP", "Japan", 0.462),
    CountryFactor::new("MY", "Malaysia", 0.585),
    CountryFactor::new("SG", "Singapore", 0.408),
    CountryFactor::new("KR", "South Korea", 0.459),
    CountryFactor::new("TH", "Thailand", 0.513),
    CountryFactor::new("GB", "United Kingdom", 0.233),
    CountryFactor::new("US", "United States", 0.386),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_or_code_ignores_case() {
        assert_eq!(resolve("germany", 0.0).unwrap(), 0.350);
        assert_eq!(resolve("DE", 0.0).unwrap(), 0.350);
        assert_eq!(resolve(" United States ", 0.0).unwrap(), 0.386);
    }

    #[test]
    fn custom_key_returns_caller_value() {
        assert_eq!(resolve("Custom", 0.42).unwrap(), 0.42);
        assert_eq!(resolve("custom", 0.0).unwrap(), 0.0);
    }

    #[test]
    fn custom_value_must_be_non_negative() {
        let err = resolve("Custom", -0.1).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::InvalidInput {
                field: "carbon_factor",
                ..
            }
        ));
        assert!(resolve("Custom", f64::NAN).is_err());
    }

    #[test]
    fn unknown_country_is_invalid_input() {
        let err = resolve("Atlantis", 0.3).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidInput { field: "country", .. }));
    }

    #[test]
    fn table_has_unique_codes_and_sane_factors() {
        for (i, a) in countries().iter().enumerate() {
            assert!(a.factor_kg_per_kwh >= 0.0 && a.factor_kg_per_kwh < 2.0, "{}", a.name);
            for b in &countries()[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
    }

    #[test]
    fn source_label_prefers_table_name() {
        assert_eq!(CarbonSource::from_key("jp", 0.0).label(), "Japan");
        assert_eq!(CarbonSource::from_key("CUSTOM", 0.3).label(), CUSTOM_KEY);
    }
}
