#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 대시보드 진입점.

use clap::Parser;
use co2_roi_calculator::{
    config::{self, Captions, ProjectionDefaults},
    i18n::{self, keys},
    projection::{
        self, carbon_factor, CarbonSource, EnergyProfile, InvestmentProfile, ProjectionError,
        ProjectionResult, CUSTOM_KEY,
    },
    report::{self, ReportFields},
    ui_cli,
};
use eframe::{egui, App, Frame};
use env_logger::Env;
use image::GenericImageView;
use rfd::FileDialog;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// 데스크톱 대시보드 실행 옵션.
#[derive(Debug, Parser)]
#[command(name = "co2_roi_calculator", version, about)]
struct GuiArgs {
    /// 언어 (auto/ko-kr/en-us)
    #[arg(long, short = 'L')]
    lang: Option<String>,
    /// 설정 파일 경로 (기본: ./config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// 디버그 로그 출력
    #[arg(long, short)]
    verbose: bool,
}

const SAVINGS_COLOR: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);
const COST_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 110, 80);
const CUMULATIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(90, 150, 240);

fn main() -> Result<(), eframe::Error> {
    let args = GuiArgs::parse();
    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    let config_path = config::resolve_path(args.config.as_deref());
    let mut app_cfg = config::load_or_default_from(&config_path).unwrap_or_else(|e| {
        log::warn!("설정을 읽지 못해 기본값을 사용합니다: {e}");
        config::Config::default()
    });
    if let Some(lang_cli) = args.lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(egui::vec2(1100.0, 760.0))
        .with_transparent(true);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "CO₂ Reduction / ROI Calculator",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx, app_cfg.font_path.as_deref()) {
                log::warn!("Font error: {e}");
            }
            Box::new(GuiApp::new(app_cfg, config_path))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: img.to_rgba8().into_raw(),
        width: w,
        height: h,
    })
}

/// 공통: 바이너리 폰트 바이트를 egui에 등록.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(name.to_string(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .insert(0, name.to_string());
    }
    ctx.set_fonts(fonts);
}

/// 한글 표시용 폰트를 찾는다.
/// 1) 설정의 사용자 폰트
/// 2) Windows 시스템 폰트(맑은 고딕/굴림)
/// 3) 리눅스 나눔고딕
fn setup_fonts(ctx: &egui::Context, user_font: Option<&str>) -> Result<(), String> {
    if let Some(path) = user_font.filter(|p| !p.trim().is_empty()) {
        return load_custom_font(ctx, path);
    }

    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(windir) = std::env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        candidates.extend(["malgun.ttf", "gulim.ttc"].iter().map(|f| fonts.join(f)));
    }
    candidates.push(PathBuf::from(
        "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    ));

    for p in candidates.iter().filter(|p| p.exists()) {
        let bytes =
            fs::read(p).map_err(|e| format!("Failed to read system font ({}): {e}", p.display()))?;
        apply_font_bytes(ctx, bytes, "korean_font");
        log::debug!("폰트 적용: {}", p.display());
        return Ok(());
    }
    Err("Font not found. Please set a user font (.ttf/.ttc) in settings.".into())
}

/// 사용자가 선택한 경로의 폰트를 egui에 등록한다.
fn load_custom_font(ctx: &egui::Context, path: &str) -> Result<(), String> {
    let p = Path::new(path);
    if !p.exists() {
        return Err(format!("Font file not found: {path}"));
    }
    let bytes = fs::read(p).map_err(|e| format!("Failed to read font file: {e}"))?;
    apply_font_bytes(ctx, bytes, "user_font");
    Ok(())
}

fn label_with_tip(ui: &mut egui::Ui, text: &str, tip: &str) -> egui::Response {
    ui.label(text).on_hover_text(tip)
}

/// 입력 폼 상태.
#[derive(Debug, Clone, PartialEq)]
struct FormState {
    energy_savings: f64,
    savings_percentage: f64,
    electricity_rate: f64,
    country: String,
    custom_factor: f64,
    initial_investment: f64,
    annual_fee: f64,
    horizon_years: u32,
}

impl FormState {
    fn from_defaults(d: &ProjectionDefaults) -> Self {
        let country = if carbon_factor::is_custom_key(&d.country) {
            CUSTOM_KEY.to_string()
        } else {
            carbon_factor::find_country(&d.country)
                .map(|c| c.name.to_string())
                .unwrap_or_else(|| d.country.clone())
        };
        Self {
            energy_savings: d.energy_savings_kwh_per_year,
            savings_percentage: d.savings_percentage,
            electricity_rate: d.electricity_rate_usd_per_kwh,
            country,
            custom_factor: d.custom_carbon_factor,
            initial_investment: d.initial_investment_usd,
            annual_fee: d.annual_fee_usd,
            horizon_years: d.horizon_years,
        }
    }

    fn carbon_source(&self) -> CarbonSource {
        CarbonSource::from_key(&self.country, self.custom_factor)
    }

    fn compute(&self) -> Result<Computed, ProjectionError> {
        let energy = EnergyProfile::with_carbon_source(
            self.energy_savings,
            self.savings_percentage,
            self.electricity_rate,
            &self.carbon_source(),
        )?;
        let investment = InvestmentProfile {
            initial_investment_usd: self.initial_investment,
            annual_fee_usd: self.annual_fee,
            horizon_years: self.horizon_years,
        };
        let result = projection::compute_projection(&energy, &investment)?;
        Ok(Computed {
            energy,
            investment,
            result,
        })
    }
}

/// 마지막으로 성공한 계산과 그 입력.
#[derive(Debug, Clone)]
struct Computed {
    energy: EnergyProfile,
    investment: InvestmentProfile,
    result: ProjectionResult,
}

struct GuiApp {
    config: config::Config,
    config_path: PathBuf,
    tr: i18n::Translator,
    form: FormState,
    outcome: Result<Computed, ProjectionError>,
    window_alpha: f32,
    show_settings: bool,
    lang_input: String,
    font_input: String,
    status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config, config_path: PathBuf) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        log::info!("GUI language resolved: {lang_code}");
        let form = FormState::from_defaults(&config.projection);
        let outcome = form.compute();
        Self {
            window_alpha: config.window_alpha.clamp(0.3, 1.0),
            lang_input: config.language.clone(),
            font_input: config.font_path.clone().unwrap_or_default(),
            config,
            config_path,
            tr,
            form,
            outcome,
            show_settings: false,
            status: None,
        }
    }

    fn recompute(&mut self) {
        self.outcome = self.form.compute();
        if let Err(e) = &self.outcome {
            log::debug!("입력 오류: {e}");
        }
    }

    fn ui_inputs(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let vars = self.config.captions.vars();
        let unit = |key: &str| tr.tf(key, &vars).trim_end_matches([':', ' ']).to_string();
        let mut changed = false;

        ui.heading(tr.t(keys::GUI_INPUTS));
        egui::Grid::new("inputs_grid")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                label_with_tip(ui, &tr.t(keys::REPORT_ENERGY_SAVINGS), &unit(keys::PROMPT_ENERGY_SAVINGS));
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.form.energy_savings)
                            .speed(1_000.0)
                            .clamp_range(0.0..=f64::MAX),
                    )
                    .changed();
                ui.end_row();

                label_with_tip(ui, &tr.t(keys::REPORT_SAVINGS_PERCENTAGE), &unit(keys::PROMPT_SAVINGS_PERCENTAGE));
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.form.savings_percentage)
                            .speed(0.005)
                            .clamp_range(0.0..=1.0)
                            .fixed_decimals(3),
                    )
                    .changed();
                ui.end_row();

                label_with_tip(ui, &tr.t(keys::REPORT_ELECTRICITY_RATE), &unit(keys::PROMPT_ELECTRICITY_RATE));
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.form.electricity_rate)
                            .speed(0.001)
                            .clamp_range(0.0..=f64::MAX)
                            .fixed_decimals(4),
                    )
                    .changed();
                ui.end_row();

                ui.label(tr.t(keys::GUI_COUNTRY));
                let before = self.form.country.clone();
                egui::ComboBox::from_id_source("country_choice")
                    .selected_text(&self.form.country)
                    .show_ui(ui, |ui| {
                        for c in carbon_factor::countries() {
                            ui.selectable_value(
                                &mut self.form.country,
                                c.name.to_string(),
                                format!("{} ({:.3})", c.name, c.factor_kg_per_kwh),
                            );
                        }
                        ui.selectable_value(&mut self.form.country, CUSTOM_KEY.to_string(), CUSTOM_KEY);
                    });
                changed |= before != self.form.country;
                ui.end_row();

                if carbon_factor::is_custom_key(&self.form.country) {
                    label_with_tip(ui, &tr.t(keys::GUI_CUSTOM_FACTOR), &unit(keys::PROMPT_CUSTOM_FACTOR));
                    changed |= ui
                        .add(
                            egui::DragValue::new(&mut self.form.custom_factor)
                                .speed(0.005)
                                .clamp_range(0.0..=10.0)
                                .fixed_decimals(3),
                        )
                        .changed();
                    ui.end_row();
                }

                label_with_tip(ui, &tr.t(keys::REPORT_INITIAL_INVESTMENT), &unit(keys::PROMPT_INITIAL_INVESTMENT));
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.form.initial_investment)
                            .speed(100.0)
                            .clamp_range(0.0..=f64::MAX),
                    )
                    .changed();
                ui.end_row();

                label_with_tip(ui, &tr.t(keys::REPORT_ANNUAL_FEE), &unit(keys::PROMPT_ANNUAL_FEE));
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.form.annual_fee)
                            .speed(100.0)
                            .clamp_range(0.0..=f64::MAX),
                    )
                    .changed();
                ui.end_row();

                ui.label(tr.t(keys::GUI_HORIZON));
                changed |= ui
                    .add(egui::DragValue::new(&mut self.form.horizon_years).clamp_range(1..=50))
                    .changed();
                ui.end_row();
            });

        if changed {
            self.recompute();
        }
    }

    fn ui_results(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(tr.t(keys::GUI_RESULTS));
        let computed = match &self.outcome {
            Ok(c) => c.clone(),
            Err(e) => {
                ui.colored_label(
                    ui.visuals().warn_fg_color,
                    format!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
                );
                return;
            }
        };
        let captions = self.config.captions.clone();
        let result = &computed.result;

        for line in ui_cli::summary_lines(result, &tr, &captions) {
            ui.label(line);
        }
        if ui.button(tr.t(keys::GUI_SAVE_REPORT)).clicked() {
            self.save_report(&computed);
        }
        if let Some(msg) = &self.status {
            ui.label(msg);
        }

        ui.separator();
        ui.label(tr.t(keys::CHART_CURRENT_YEAR));
        current_year_chart(ui, result, &tr, &captions);
        ui.separator();
        ui.label(tr.t(keys::CHART_CASH_FLOW));
        cash_flow_chart(ui, result);
        chart_legend(ui, &tr);
        ui.separator();
        yearly_table(ui, result, &tr, &captions);
    }

    fn save_report(&mut self, computed: &Computed) {
        let Some(path) = FileDialog::new()
            .add_filter("Text", &["txt"])
            .set_file_name("roi_report.txt")
            .save_file()
        else {
            return;
        };
        let fields =
            ReportFields::from_projection(&computed.energy, &computed.investment, &computed.result);
        let text = report::render_text(&fields, &self.tr, &self.config.captions);
        self.status = Some(match report::save_report(&path, &text) {
            Ok(()) => format!("{} {}", self.tr.t(keys::REPORT_SAVED), path.display()),
            Err(e) => format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)),
        });
    }

    fn ui_settings(&mut self, ctx: &egui::Context) {
        let tr = self.tr.clone();
        let mut open = self.show_settings;
        egui::Window::new(tr.t(keys::GUI_SETTINGS))
            .collapsible(false)
            .resizable(true)
            .open(&mut open)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid").num_columns(2).show(ui, |ui| {
                    ui.label(tr.t(keys::GUI_LANGUAGE));
                    egui::ComboBox::from_id_source("lang_choice")
                        .selected_text(&self.lang_input)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.lang_input, "auto".into(), tr.t(keys::GUI_LANGUAGE_AUTO));
                            ui.selectable_value(&mut self.lang_input, "en-us".into(), "English (US)");
                            ui.selectable_value(&mut self.lang_input, "ko-kr".into(), "한국어");
                        });
                    ui.end_row();

                    ui.label(tr.t(keys::GUI_DEFAULT_HORIZON));
                    ui.add(
                        egui::DragValue::new(&mut self.config.projection.horizon_years)
                            .clamp_range(1..=50),
                    );
                    ui.end_row();

                    ui.label(tr.t(keys::GUI_CURRENCY_SYMBOL));
                    ui.text_edit_singleline(&mut self.config.captions.currency_symbol);
                    ui.end_row();

                    ui.label(tr.t(keys::GUI_CURRENCY_CODE));
                    ui.text_edit_singleline(&mut self.config.captions.currency_code);
                    ui.end_row();

                    ui.label(tr.t(keys::GUI_ALPHA));
                    ui.add(egui::Slider::new(&mut self.window_alpha, 0.3..=1.0).text("alpha"));
                    ui.end_row();

                    ui.label(tr.t(keys::GUI_FONT_PATH));
                    ui.text_edit_singleline(&mut self.font_input);
                    ui.end_row();
                });

                if ui.button(tr.t(keys::GUI_SAVE_SETTINGS)).clicked() {
                    self.apply_settings(ctx);
                }
            });
        self.show_settings = open;
    }

    fn apply_settings(&mut self, ctx: &egui::Context) {
        self.config.language = self.lang_input.clone();
        self.config.window_alpha = self.window_alpha;
        let font = self.font_input.trim();
        self.config.font_path = (!font.is_empty()).then(|| font.to_string());
        let font_result = match self.config.font_path.as_deref() {
            Some(path) => load_custom_font(ctx, path),
            None => Ok(()),
        };

        let resolved = i18n::resolve_language("auto", Some(self.config.language.as_str()));
        self.tr = i18n::Translator::new_with_pack(&resolved, self.config.language_pack_dir.as_deref());

        self.status = Some(match (self.config.save_to(&self.config_path), font_result) {
            (Err(e), _) => format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)),
            (Ok(()), Err(e)) => format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)),
            (Ok(()), Ok(())) => self.tr.t(keys::GUI_SAVED),
        });
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let mut style = (*ctx.style()).clone();
        style.interaction.selectable_labels = false;
        style.visuals.window_fill = style.visuals.window_fill.linear_multiply(self.window_alpha);
        style.visuals.panel_fill = style.visuals.panel_fill.linear_multiply(self.window_alpha);
        ctx.set_style(style);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.tr.t(keys::APP_TITLE));
                ui.separator();
                if ui.button(self.tr.t(keys::GUI_SETTINGS)).clicked() {
                    self.show_settings = true;
                }
            });
        });

        if self.show_settings {
            self.ui_settings(ctx);
        }

        egui::SidePanel::left("inputs")
            .resizable(true)
            .min_width(260.0)
            .default_width(320.0)
            .show(ctx, |ui| self.ui_inputs(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| self.ui_results(ui));
        });
    }
}

/// 절감 전/후 전력비와 절감액을 가로 막대로 비교한다.
fn current_year_chart(
    ui: &mut egui::Ui,
    result: &ProjectionResult,
    tr: &i18n::Translator,
    captions: &Captions,
) {
    let full = result.energy.cost_before_usd;
    for (label, value, color) in current_year_rows(result, tr) {
        ui.horizontal(|ui| {
            ui.add_sized([110.0, 14.0], egui::Label::new(label));
            let desired = egui::vec2(260.0, 14.0);
            let (rect, _) = ui.allocate_exact_size(desired, egui::Sense::hover());
            let painter = ui.painter();
            painter.rect_filled(rect, 2.0, egui::Color32::from_gray(40));
            let mut fill_rect = rect;
            fill_rect.set_right(rect.left() + bar_fraction(value, full) * rect.width());
            painter.rect_filled(fill_rect, 2.0, color);
            ui.label(captions.money(value));
        });
    }
}

/// 올해 비교 막대의 (라벨, 값, 색).
fn current_year_rows(
    result: &ProjectionResult,
    tr: &i18n::Translator,
) -> [(String, f64, egui::Color32); 3] {
    [
        (tr.t(keys::RESULT_COST_BEFORE), result.energy.cost_before_usd, COST_COLOR),
        (tr.t(keys::RESULT_COST_AFTER), result.energy.cost_after_usd, CUMULATIVE_COLOR),
        (tr.t(keys::TABLE_SAVINGS), result.annual_savings_usd, SAVINGS_COLOR),
    ]
}

/// 연도별 절감액/비용 묶음 막대와 누적 순이익 꺾은선.
fn cash_flow_chart(ui: &mut egui::Ui, result: &ProjectionResult) {
    let series = &result.cumulative_series;
    let width = ui.available_width().clamp(240.0, 900.0);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 220.0), egui::Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(rect, 2.0, egui::Color32::from_gray(30));
    if series.is_empty() {
        return;
    }

    let (lo, hi) = value_range(result);
    let zero_y = y_for(0.0, lo, hi, rect);
    painter.line_segment(
        [egui::pos2(rect.left(), zero_y), egui::pos2(rect.right(), zero_y)],
        egui::Stroke::new(1.0, egui::Color32::from_gray(160)),
    );

    let slot = rect.width() / series.len() as f32;
    let bar_w = (slot * 0.35).max(1.0);
    let mut points = Vec::with_capacity(series.len());
    for (i, entry) in series.iter().enumerate() {
        let x0 = rect.left() + slot * i as f32 + slot * 0.15;
        for (offset, value, color) in [
            (0.0, result.annual_savings_usd, SAVINGS_COLOR),
            (bar_w, entry.cost, COST_COLOR),
        ] {
            let y = y_for(value, lo, hi, rect);
            let bar = egui::Rect::from_min_max(
                egui::pos2(x0 + offset, y.min(zero_y)),
                egui::pos2(x0 + offset + bar_w, y.max(zero_y)),
            );
            painter.rect_filled(bar, 1.0, color);
        }
        let center = egui::pos2(
            rect.left() + slot * (i as f32 + 0.5),
            y_for(entry.cumulative_net, lo, hi, rect),
        );
        points.push(center);
        painter.text(
            egui::pos2(center.x, rect.bottom() - 2.0),
            egui::Align2::CENTER_BOTTOM,
            entry.year_index.to_string(),
            egui::FontId::proportional(11.0),
            egui::Color32::from_gray(200),
        );
    }
    for pair in points.windows(2) {
        painter.line_segment([pair[0], pair[1]], egui::Stroke::new(2.0, CUMULATIVE_COLOR));
    }
    for p in points {
        painter.circle_filled(p, 3.0, CUMULATIVE_COLOR);
    }
}

fn chart_legend(ui: &mut egui::Ui, tr: &i18n::Translator) {
    ui.horizontal(|ui| {
        for (key, color) in [
            (keys::TABLE_SAVINGS, SAVINGS_COLOR),
            (keys::TABLE_COST, COST_COLOR),
            (keys::TABLE_CUMULATIVE, CUMULATIVE_COLOR),
        ] {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, 1.0, color);
            ui.label(tr.t(key));
        }
    });
}

fn yearly_table(ui: &mut egui::Ui, result: &ProjectionResult, tr: &i18n::Translator, captions: &Captions) {
    egui::Grid::new("yearly_table")
        .num_columns(5)
        .striped(true)
        .show(ui, |ui| {
            for key in [
                keys::TABLE_YEAR,
                keys::TABLE_SAVINGS,
                keys::TABLE_COST,
                keys::TABLE_NET,
                keys::TABLE_CUMULATIVE,
            ] {
                ui.strong(tr.t(key));
            }
            ui.end_row();
            for e in &result.cumulative_series {
                ui.label(e.year_index.to_string());
                ui.label(captions.money(result.annual_savings_usd));
                ui.label(captions.money(e.cost));
                ui.label(captions.money(e.net_this_year));
                let cumulative = captions.money(e.cumulative_net);
                if e.cumulative_net < 0.0 {
                    ui.colored_label(COST_COLOR, cumulative);
                } else {
                    ui.label(cumulative);
                }
                ui.end_row();
            }
        });
}

/// 막대 길이 비율 (0~1). 기준값이 0 이하면 0.
fn bar_fraction(value: f64, full: f64) -> f32 {
    if full <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / full).clamp(0.0, 1.0) as f32
}

/// 차트 세로축 범위. 0을 항상 포함한다.
fn value_range(result: &ProjectionResult) -> (f64, f64) {
    let mut lo = 0.0_f64;
    let mut hi = result.annual_savings_usd.max(0.0);
    for e in &result.cumulative_series {
        lo = lo.min(e.cost).min(e.cumulative_net);
        hi = hi.max(e.cost).max(e.cumulative_net);
    }
    if hi - lo <= f64::EPSILON {
        hi = lo + 1.0;
    }
    (lo, hi)
}

/// 값을 차트 영역의 y 좌표로 바꾼다. 위쪽이 큰 값.
fn y_for(value: f64, lo: f64, hi: f64, rect: egui::Rect) -> f32 {
    let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0) as f32;
    rect.bottom() - t * rect.height()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a() -> ProjectionResult {
        FormState::from_defaults(&ProjectionDefaults::default())
            .compute()
            .unwrap()
            .result
    }

    #[test]
    fn form_starts_from_config_defaults() {
        let form = FormState::from_defaults(&ProjectionDefaults::default());
        assert_eq!(form.country, "United States");
        assert_eq!(form.horizon_years, 5);
        assert_eq!(form.carbon_source(), CarbonSource::Country("United States".into()));
    }

    #[test]
    fn invalid_input_replaces_result_with_error() {
        let mut form = FormState::from_defaults(&ProjectionDefaults::default());
        form.savings_percentage = 0.0;
        assert!(matches!(
            form.compute(),
            Err(ProjectionError::InvalidInput { field: "savings_percentage", .. })
        ));
    }

    #[test]
    fn custom_country_uses_custom_factor() {
        let mut form = FormState::from_defaults(&ProjectionDefaults::default());
        form.country = CUSTOM_KEY.into();
        form.custom_factor = 0.25;
        let computed = form.compute().unwrap();
        assert_eq!(computed.energy.carbon_factor_kg_per_kwh, 0.25);
        assert_eq!(computed.result.annual_co2_reduction_kg, 250_000.0);
    }

    #[test]
    fn current_year_labels_follow_language() {
        let result = scenario_a();
        let ko: Vec<String> = current_year_rows(&result, &i18n::Translator::new("ko"))
            .into_iter()
            .map(|(label, _, _)| label)
            .collect();
        assert_eq!(ko, ["절감 전 전력비", "절감 후 전력비", "절감액"]);
        let en = current_year_rows(&result, &i18n::Translator::new("en"));
        assert_eq!(en[0].0, "Cost before");
        assert_eq!(en[2].1, 140_000.0);
    }

    #[test]
    fn bar_fraction_is_clamped() {
        assert_eq!(bar_fraction(50.0, 100.0), 0.5);
        assert_eq!(bar_fraction(150.0, 100.0), 1.0);
        assert_eq!(bar_fraction(-5.0, 100.0), 0.0);
        assert_eq!(bar_fraction(5.0, 0.0), 0.0);
    }

    #[test]
    fn value_range_spans_costs_and_cumulative() {
        let result = scenario_a();
        let (lo, hi) = value_range(&result);
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 319_915.0);
    }

    #[test]
    fn y_axis_maps_extremes_to_edges() {
        let rect = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(100.0, 200.0));
        assert_eq!(y_for(-10.0, -10.0, 30.0, rect), 200.0);
        assert_eq!(y_for(30.0, -10.0, 30.0, rect), 0.0);
        assert_eq!(y_for(10.0, -10.0, 30.0, rect), 100.0);
    }
}
