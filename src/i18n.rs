use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const APP_TITLE: &str = "general.app_title";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_PROJECTION: &str = "main_menu.projection";
    pub const MAIN_MENU_COUNTRIES: &str = "main_menu.countries";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const PROJECTION_HEADING: &str = "projection.heading";
    pub const PROMPT_ENERGY_SAVINGS: &str = "prompt.energy_savings";
    pub const PROMPT_SAVINGS_PERCENTAGE: &str = "prompt.savings_percentage";
    pub const PROMPT_ELECTRICITY_RATE: &str = "prompt.electricity_rate";
    pub const PROMPT_COUNTRY: &str = "prompt.country";
    pub const PROMPT_CUSTOM_FACTOR: &str = "prompt.custom_factor";
    pub const PROMPT_INITIAL_INVESTMENT: &str = "prompt.initial_investment";
    pub const PROMPT_ANNUAL_FEE: &str = "prompt.annual_fee";
    pub const PROMPT_HORIZON: &str = "prompt.horizon";
    pub const PROMPT_SAVE_REPORT: &str = "prompt.save_report";

    pub const RESULT_ANNUAL_SAVINGS: &str = "result.annual_savings";
    pub const RESULT_CO2_REDUCTION: &str = "result.co2_reduction";
    pub const RESULT_NET_INCOME_Y3: &str = "result.net_income_y3";
    pub const RESULT_PAYBACK: &str = "result.payback";
    pub const RESULT_PAYBACK_MONTHS: &str = "result.payback_months";
    pub const RESULT_NOT_RECOVERED: &str = "result.not_recovered";
    pub const RESULT_NOT_AVAILABLE: &str = "result.not_available";
    pub const RESULT_ENERGY_BEFORE: &str = "result.energy_before";
    pub const RESULT_ENERGY_AFTER: &str = "result.energy_after";
    pub const RESULT_COST_BEFORE: &str = "result.cost_before";
    pub const RESULT_COST_AFTER: &str = "result.cost_after";
    pub const TABLE_YEAR: &str = "table.year";
    pub const TABLE_SAVINGS: &str = "table.savings";
    pub const TABLE_COST: &str = "table.cost";
    pub const TABLE_NET: &str = "table.net";
    pub const TABLE_CUMULATIVE: &str = "table.cumulative";

    pub const REPORT_TITLE: &str = "report.title";
    pub const REPORT_ENERGY_SAVINGS: &str = "report.energy_savings";
    pub const REPORT_ELECTRICITY_RATE: &str = "report.electricity_rate";
    pub const REPORT_SAVINGS_PERCENTAGE: &str = "report.savings_percentage";
    pub const REPORT_INITIAL_INVESTMENT: &str = "report.initial_investment";
    pub const REPORT_ANNUAL_FEE: &str = "report.annual_fee";
    pub const REPORT_CASH_FLOW: &str = "report.cash_flow";
    pub const REPORT_SAVED: &str = "report.saved";
    pub const UNIT_ENERGY_PER_YEAR: &str = "unit.energy_per_year";
    pub const UNIT_CO2_PER_YEAR: &str = "unit.co2_per_year";

    pub const COUNTRIES_HEADING: &str = "countries.heading";
    pub const COUNTRIES_CUSTOM_NOTE: &str = "countries.custom_note";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT: &str = "settings.current";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_PROMPT_HORIZON: &str = "settings.prompt_horizon";
    pub const SETTINGS_PROMPT_LANGUAGE: &str = "settings.prompt_language";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const CHART_CURRENT_YEAR: &str = "chart.current_year";
    pub const CHART_CASH_FLOW: &str = "chart.cash_flow";

    pub const GUI_INPUTS: &str = "gui.inputs";
    pub const GUI_RESULTS: &str = "gui.results";
    pub const GUI_COUNTRY: &str = "gui.country";
    pub const GUI_CUSTOM_FACTOR: &str = "gui.custom_factor";
    pub const GUI_HORIZON: &str = "gui.horizon";
    pub const GUI_SAVE_REPORT: &str = "gui.save_report";
    pub const GUI_SETTINGS: &str = "gui.settings";
    pub const GUI_LANGUAGE: &str = "gui.language";
    pub const GUI_LANGUAGE_AUTO: &str = "gui.language_auto";
    pub const GUI_DEFAULT_HORIZON: &str = "gui.default_horizon";
    pub const GUI_ALPHA: &str = "gui.alpha";
    pub const GUI_CURRENCY_SYMBOL: &str = "gui.currency_symbol";
    pub const GUI_CURRENCY_CODE: &str = "gui.currency_code";
    pub const GUI_FONT_PATH: &str = "gui.font_path";
    pub const GUI_SAVE_SETTINGS: &str = "gui.save_settings";
    pub const GUI_SAVED: &str = "gui.saved";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        if overrides.is_some() {
            log::debug!("언어팩 적용: {lang_code}");
        }
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 번역을 가져온다. 언어팩 → 내장 언어 → 영어 순으로 찾는다.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v.clone();
        }
        let builtin = match self.lang {
            Language::Ko => ko(key).or_else(|| en(key)),
            Language::En => en(key),
        };
        builtin.unwrap_or("[missing translation]").to_string()
    }

    /// 번역 후 `{name}` 자리표시자를 치환한다.
    pub fn tf(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(&self.t(key), vars)
    }
}

/// `{key}` 형태의 자리표시자를 값으로 바꾼다.
pub fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en-us".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        "ko" | "ko-kr" => Some("ko-kr".into()),
        "en" | "en-us" | "en-uk" | "en-gb" => Some("en-us".into()),
        other if other.starts_with("ko") => Some("ko-kr".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko-kr".into()),
        "en" => Some("en-us".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [section] 아래 key = "value".
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    let (base, _) = lang.split_once(['-', '_'])?;
    try_load(base)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        APP_TITLE => "CO₂ 감축 / ROI 계산기",
        MAIN_MENU_TITLE => "\n=== CO₂ 감축 / ROI 계산기 ===",
        MAIN_MENU_PROJECTION => "1) 투자 회수 예측",
        MAIN_MENU_COUNTRIES => "2) 국가별 배출계수",
        MAIN_MENU_SETTINGS => "3) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        PROJECTION_HEADING => "\n-- 투자 회수 예측 --",
        PROMPT_ENERGY_SAVINGS => "연간 에너지 절감량 [{energy}/년]: ",
        PROMPT_SAVINGS_PERCENTAGE => "절감 비율 (0~1, 예: 0.2): ",
        PROMPT_ELECTRICITY_RATE => "전력 단가 [{currency}/{energy}]: ",
        PROMPT_COUNTRY => "국가 (이름/코드, 또는 Custom) [엔터={default}]: ",
        PROMPT_CUSTOM_FACTOR => "사용자 배출계수 [{co2} CO₂/{energy}]: ",
        PROMPT_INITIAL_INVESTMENT => "초기 투자비 [{currency}]: ",
        PROMPT_ANNUAL_FEE => "연간 수수료 [{currency}/년]: ",
        PROMPT_HORIZON => "예측 기간 [년] [엔터={default}]: ",
        PROMPT_SAVE_REPORT => "보고서 저장 경로 (엔터=건너뛰기): ",
        RESULT_ANNUAL_SAVINGS => "연간 절감액",
        RESULT_CO2_REDUCTION => "연간 CO₂ 감축량",
        RESULT_NET_INCOME_Y3 => "3년 누적 순이익",
        RESULT_PAYBACK => "회수기간",
        RESULT_PAYBACK_MONTHS => "{months} 개월",
        RESULT_NOT_RECOVERED => "예측 기간 내 회수 불가",
        RESULT_NOT_AVAILABLE => "해당 없음 (예측 기간 3년 미만)",
        RESULT_ENERGY_BEFORE => "절감 전 사용량",
        RESULT_ENERGY_AFTER => "절감 후 사용량",
        RESULT_COST_BEFORE => "절감 전 전력비",
        RESULT_COST_AFTER => "절감 후 전력비",
        TABLE_YEAR => "연도",
        TABLE_SAVINGS => "절감액",
        TABLE_COST => "비용",
        TABLE_NET => "순이익",
        TABLE_CUMULATIVE => "누적 순이익",
        REPORT_TITLE => "CO₂ 감축 및 투자 회수 보고서",
        REPORT_ENERGY_SAVINGS => "연간 에너지 절감량",
        REPORT_ELECTRICITY_RATE => "전력 단가",
        REPORT_SAVINGS_PERCENTAGE => "절감 비율",
        REPORT_INITIAL_INVESTMENT => "초기 투자비",
        REPORT_ANNUAL_FEE => "연간 수수료",
        REPORT_CASH_FLOW => "연도별 현금흐름",
        REPORT_SAVED => "보고서를 저장했습니다:",
        UNIT_ENERGY_PER_YEAR => "{energy}/년",
        UNIT_CO2_PER_YEAR => "{co2} CO₂/년",
        COUNTRIES_HEADING => "\n-- 국가별 배출계수 [kg CO₂/kWh] --",
        COUNTRIES_CUSTOM_NOTE => "목록에 없으면 Custom을 선택하고 배출계수를 직접 입력하세요.",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_CURRENT => "현재 예측 기간: {horizon}년, 언어: {lang}",
        SETTINGS_OPTIONS => "1) 예측 기간  2) 언어",
        SETTINGS_PROMPT_CHANGE => "변경할 번호(취소하려면 엔터): ",
        SETTINGS_PROMPT_HORIZON => "새 예측 기간 [년]: ",
        SETTINGS_PROMPT_LANGUAGE => "언어 코드 (auto/ko-kr/en-us): ",
        SETTINGS_INVALID => "잘못된 입력이므로 변경하지 않습니다.",
        SETTINGS_SAVED => "설정이 변경되었습니다.",
        CHART_CURRENT_YEAR => "올해 절감",
        CHART_CASH_FLOW => "연도별 절감액 / 비용 / 누적 순이익",
        GUI_INPUTS => "입력",
        GUI_RESULTS => "결과",
        GUI_COUNTRY => "국가",
        GUI_CUSTOM_FACTOR => "사용자 배출계수",
        GUI_HORIZON => "예측 기간 [년]",
        GUI_SAVE_REPORT => "보고서 저장",
        GUI_SETTINGS => "설정",
        GUI_LANGUAGE => "언어",
        GUI_LANGUAGE_AUTO => "시스템",
        GUI_DEFAULT_HORIZON => "기본 예측 기간 [년]",
        GUI_ALPHA => "창 투명도",
        GUI_CURRENCY_SYMBOL => "통화 기호",
        GUI_CURRENCY_CODE => "통화 코드",
        GUI_FONT_PATH => "사용자 폰트 경로",
        GUI_SAVE_SETTINGS => "설정 저장",
        GUI_SAVED => "저장했습니다.",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting application.",
        APP_TITLE => "CO₂ Reduction / ROI Calculator",
        MAIN_MENU_TITLE => "\n=== CO₂ Reduction / ROI Calculator ===",
        MAIN_MENU_PROJECTION => "1) ROI projection",
        MAIN_MENU_COUNTRIES => "2) Carbon factors by country",
        MAIN_MENU_SETTINGS => "3) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        PROJECTION_HEADING => "\n-- ROI Projection --",
        PROMPT_ENERGY_SAVINGS => "Energy savings [{energy}/year]: ",
        PROMPT_SAVINGS_PERCENTAGE => "Savings percentage (0-1, e.g. 0.2): ",
        PROMPT_ELECTRICITY_RATE => "Electricity rate [{currency}/{energy}]: ",
        PROMPT_COUNTRY => "Country (name/code, or Custom) [enter={default}]: ",
        PROMPT_CUSTOM_FACTOR => "Custom carbon factor [{co2} CO₂/{energy}]: ",
        PROMPT_INITIAL_INVESTMENT => "Initial investment [{currency}]: ",
        PROMPT_ANNUAL_FEE => "Annual fee [{currency}/year]: ",
        PROMPT_HORIZON => "Horizon [years] [enter={default}]: ",
        PROMPT_SAVE_REPORT => "Report path (enter to skip): ",
        RESULT_ANNUAL_SAVINGS => "Annual savings",
        RESULT_CO2_REDUCTION => "Annual CO₂ reduction",
        RESULT_NET_INCOME_Y3 => "3-year net income",
        RESULT_PAYBACK => "Payback period",
        RESULT_PAYBACK_MONTHS => "{months} months",
        RESULT_NOT_RECOVERED => "Not recovered within horizon",
        RESULT_NOT_AVAILABLE => "N/A (horizon shorter than 3 years)",
        RESULT_ENERGY_BEFORE => "Energy before",
        RESULT_ENERGY_AFTER => "Energy after",
        RESULT_COST_BEFORE => "Cost before",
        RESULT_COST_AFTER => "Cost after",
        TABLE_YEAR => "Year",
        TABLE_SAVINGS => "Savings",
        TABLE_COST => "Cost",
        TABLE_NET => "Net",
        TABLE_CUMULATIVE => "Cumulative net",
        REPORT_TITLE => "CO₂ Reduction & ROI Report",
        REPORT_ENERGY_SAVINGS => "Energy savings",
        REPORT_ELECTRICITY_RATE => "Electricity rate",
        REPORT_SAVINGS_PERCENTAGE => "Savings percentage",
        REPORT_INITIAL_INVESTMENT => "Initial investment",
        REPORT_ANNUAL_FEE => "Annual fee",
        REPORT_CASH_FLOW => "Yearly cash flow",
        REPORT_SAVED => "Report saved:",
        UNIT_ENERGY_PER_YEAR => "{energy}/yr",
        UNIT_CO2_PER_YEAR => "{co2} CO₂/yr",
        COUNTRIES_HEADING => "\n-- Carbon factors [kg CO₂/kWh] --",
        COUNTRIES_CUSTOM_NOTE => "Not listed? Choose Custom and enter the factor directly.",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT => "Current horizon: {horizon} years, language: {lang}",
        SETTINGS_OPTIONS => "1) Horizon  2) Language",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_PROMPT_HORIZON => "New horizon [years]: ",
        SETTINGS_PROMPT_LANGUAGE => "Language code (auto/ko-kr/en-us): ",
        SETTINGS_INVALID => "Invalid input; nothing changed.",
        SETTINGS_SAVED => "Settings updated.",
        CHART_CURRENT_YEAR => "Current-year savings",
        CHART_CASH_FLOW => "Savings / cost / cumulative net by year",
        GUI_INPUTS => "Inputs",
        GUI_RESULTS => "Results",
        GUI_COUNTRY => "Country",
        GUI_CUSTOM_FACTOR => "Custom carbon factor",
        GUI_HORIZON => "Horizon [years]",
        GUI_SAVE_REPORT => "Save report",
        GUI_SETTINGS => "Settings",
        GUI_LANGUAGE => "Language",
        GUI_LANGUAGE_AUTO => "System",
        GUI_DEFAULT_HORIZON => "Default horizon [years]",
        GUI_ALPHA => "Window transparency",
        GUI_CURRENCY_SYMBOL => "Currency symbol",
        GUI_CURRENCY_CODE => "Currency code",
        GUI_FONT_PATH => "User font path",
        GUI_SAVE_SETTINGS => "Save settings",
        GUI_SAVED => "Saved.",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_code_wins_over_config() {
        assert_eq!(resolve_language("ko", Some("en-us")), "ko-kr");
        assert_eq!(resolve_language("auto", Some("en-gb")), "en-us");
    }

    #[test]
    fn korean_falls_back_to_builtin_strings() {
        let tr = Translator::new("ko-kr");
        assert_eq!(tr.language(), Language::Ko);
        assert_eq!(tr.t(keys::ERROR_PREFIX), "오류");
        assert_eq!(Translator::new("fr").t(keys::ERROR_PREFIX), "Error");
    }

    #[test]
    fn unknown_key_is_marked() {
        assert_eq!(Translator::new("en").t("nope"), "[missing translation]");
    }

    #[test]
    fn template_uses_caption_vars() {
        let tr = Translator::new("en");
        let text = tr.tf(
            keys::PROMPT_ELECTRICITY_RATE,
            &[("currency", "€".into()), ("energy", "MWh".into())],
        );
        assert_eq!(text, "Electricity rate [€/MWh]: ");
    }

    #[test]
    fn nested_pack_flattens_to_dotted_keys() {
        let map = parse_toml_to_map("[result]\nannual_savings = \"Yearly savings\"\n").unwrap();
        assert_eq!(map.get(keys::RESULT_ANNUAL_SAVINGS).map(String::as_str), Some("Yearly savings"));
    }

    #[test]
    fn every_korean_key_has_english() {
        use keys::*;
        for key in [
            APP_TITLE,
            PROJECTION_HEADING,
            RESULT_PAYBACK_MONTHS,
            RESULT_NOT_RECOVERED,
            REPORT_TITLE,
            SETTINGS_CURRENT,
            CHART_CASH_FLOW,
            GUI_SAVE_REPORT,
            GUI_SETTINGS,
            GUI_CUSTOM_FACTOR,
            UNIT_ENERGY_PER_YEAR,
            UNIT_CO2_PER_YEAR,
        ] {
            assert!(ko(key).is_some() && en(key).is_some(), "{key}");
        }
    }
}
