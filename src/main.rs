use eframe::egui;
use egui::{Color32, CornerRadius, RichText, ScrollArea, Stroke, Ui, ViewportBuilder};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod algolia;
mod models;

use crate::algolia::{SearchClient, DEFAULT_QUERY};
use crate::models::{sorted_hits, Hit, PageResult, ResultStore, SortKey, SortState};

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1080.0, 760.0])
            .with_min_inner_size([760.0, 520.0])
            .with_title("Hacker News Search"),
        ..Default::default()
    };

    eframe::run_native(
        "Hacker News Search",
        options,
        Box::new(|cc| {
            let mut app = SearchApp::new();

            if let Some(storage) = cc.storage {
                // Restore the saved theme preference
                if let Some(theme_str) = storage.get_string("is_dark_mode") {
                    if let Ok(is_dark_mode) = theme_str.parse::<bool>() {
                        app.is_dark_mode = is_dark_mode;
                        app.theme = if is_dark_mode {
                            AppTheme::dark()
                        } else {
                            AppTheme::light()
                        };
                    }
                }
            }

            Ok(Box::new(app))
        }),
    )
}

struct AppTheme {
    background: Color32,
    card_background: Color32,
    text: Color32,
    secondary_text: Color32,
    highlight: Color32,
    separator: Color32,
    link_color: Color32,
    score_high: Color32,
    score_medium: Color32,
    score_low: Color32,
    button_background: Color32,
    button_foreground: Color32,
    button_active_background: Color32,
    button_hover_background: Color32,
}

impl AppTheme {
    fn dark() -> Self {
        Self {
            background: Color32::from_rgb(18, 18, 18),
            card_background: Color32::from_rgb(30, 30, 30),
            text: Color32::from_rgb(240, 240, 240),
            secondary_text: Color32::from_rgb(180, 180, 180),
            highlight: Color32::from_rgb(255, 102, 0), // HN orange
            separator: Color32::from_rgb(60, 60, 60),
            link_color: Color32::from_rgb(100, 181, 246),
            score_high: Color32::from_rgb(76, 175, 80),
            score_medium: Color32::from_rgb(255, 193, 7),
            score_low: Color32::from_rgb(158, 158, 158),
            button_background: Color32::from_rgb(66, 66, 66),
            button_foreground: Color32::from_rgb(240, 240, 240),
            button_active_background: Color32::from_rgb(255, 102, 0),
            button_hover_background: Color32::from_rgb(80, 80, 80),
        }
    }

    fn light() -> Self {
        Self {
            background: Color32::from_rgb(245, 245, 245),
            card_background: Color32::from_rgb(255, 255, 255),
            text: Color32::from_rgb(20, 20, 20),
            secondary_text: Color32::from_rgb(90, 90, 90),
            highlight: Color32::from_rgb(235, 92, 0),
            separator: Color32::from_rgb(200, 200, 200),
            link_color: Color32::from_rgb(20, 100, 200),
            score_high: Color32::from_rgb(30, 110, 40),
            score_medium: Color32::from_rgb(190, 130, 0),
            score_low: Color32::from_rgb(80, 80, 80),
            button_background: Color32::from_rgb(235, 235, 235),
            button_foreground: Color32::from_rgb(20, 20, 20),
            button_active_background: Color32::from_rgb(235, 92, 0),
            button_hover_background: Color32::from_rgb(210, 210, 210),
        }
    }

    fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.card_background;
        style.visuals.window_stroke = Stroke::new(1.0, self.separator);
        style.visuals.widgets.noninteractive.bg_fill = self.card_background;
        style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text);

        style.visuals.widgets.inactive.bg_fill = self.button_background;
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.active.bg_fill = self.button_active_background;
        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.hovered.bg_fill = self.button_hover_background;
        style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.button_foreground);

        style.visuals.selection.bg_fill = self.highlight;
        style.visuals.selection.stroke = Stroke::new(1.0, self.highlight);
        style.visuals.hyperlink_color = self.link_color;

        style.visuals.window_corner_radius = CornerRadius::same(8);
        style.visuals.widgets.noninteractive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.inactive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.hovered.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.active.corner_radius = CornerRadius::same(4);

        ctx.set_style(style);
    }

    fn score_color(&self, points: i32) -> Color32 {
        if points >= 300 {
            self.score_high
        } else if points >= 100 {
            self.score_medium
        } else {
            self.score_low
        }
    }
}

/// The one fetch that may be outstanding. Holds the term it was issued for,
/// so the response is merged under that term even if the search box has
/// moved on, and the channel end the worker thread reports through.
struct InFlight {
    term: String,
    receiver: mpsc::Receiver<anyhow::Result<PageResult>>,
}

struct SearchApp {
    client: SearchClient,
    store: ResultStore,
    // Live text-box value; becomes the search key on submit
    search_term: String,
    // The term whose results are displayed
    search_key: String,
    sort: SortState,
    in_flight: Option<InFlight>,
    // Dismiss clicked during table rendering, applied next frame
    pending_dismiss: Option<String>,
    theme: AppTheme,
    is_dark_mode: bool,
    initialized: bool,
    needs_repaint: bool,
}

impl SearchApp {
    fn new() -> Self {
        Self {
            client: SearchClient::new(),
            store: ResultStore::new(),
            search_term: DEFAULT_QUERY.to_string(),
            search_key: String::new(),
            sort: SortState::default(),
            in_flight: None,
            pending_dismiss: None,
            theme: AppTheme::dark(),
            is_dark_mode: true,
            initialized: false,
            needs_repaint: false,
        }
    }

    fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Kicks off a fetch on a worker thread. Replaces any outstanding fetch;
    /// the superseded worker's send fails against the dropped receiver and
    /// its response is discarded.
    fn start_fetch(&mut self, term: &str, page: u32) {
        let client = self.client.clone();
        let fetch_term = term.to_string();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let _ = tx.send(client.fetch_page(&fetch_term, page));
        });

        self.in_flight = Some(InFlight {
            term: term.to_string(),
            receiver: rx,
        });
    }

    fn submit_search(&mut self) {
        let term = self.search_term.trim().to_string();
        self.search_key = term.clone();

        // Cache hit: switch the displayed key without touching the network
        if !self.store.contains(&term) {
            self.start_fetch(&term, 0);
        }
    }

    fn load_more(&mut self) {
        if self.is_loading() {
            return;
        }

        let next_page = self
            .store
            .get(&self.search_key)
            .map(|entry| entry.page)
            .unwrap_or(0)
            + 1;
        let key = self.search_key.clone();
        self.start_fetch(&key, next_page);
    }

    /// Re-fetches page 0 for the active key; the merge replaces the entry.
    fn refresh(&mut self) {
        if self.is_loading() {
            return;
        }

        let key = self.search_key.clone();
        self.start_fetch(&key, 0);
    }

    fn check_fetch(&mut self) {
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };

        match in_flight.receiver.try_recv() {
            Err(mpsc::TryRecvError::Empty) => {
                // Still waiting, put it back
                self.in_flight = Some(in_flight);
            }
            Ok(Ok(result)) => {
                self.store
                    .merge(&in_flight.term, result.hits, result.page);
                self.needs_repaint = true;
            }
            Ok(Err(err)) => {
                // Log only; the table keeps whatever is cached, and the
                // loading state is already gone with the in-flight slot
                tracing::error!("search for '{}' failed: {:#}", in_flight.term, err);
                self.needs_repaint = true;
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::error!(
                    "search worker for '{}' exited without a result",
                    in_flight.term
                );
                self.needs_repaint = true;
            }
        }
    }

    fn toggle_theme(&mut self) {
        self.is_dark_mode = !self.is_dark_mode;
        self.theme = if self.is_dark_mode {
            AppTheme::dark()
        } else {
            AppTheme::light()
        };
    }

    fn open_link(&self, url: &str) {
        if let Err(err) = open::that(url) {
            tracing::warn!("failed to open '{}': {}", url, err);
        }
    }

    fn render_header(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading(
                RichText::new("Hacker News Search")
                    .color(self.theme.highlight)
                    .size(24.0),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let theme_icon = if self.is_dark_mode { "☀" } else { "🌙" };
                let theme_btn = ui.add(
                    egui::Button::new(
                        RichText::new(theme_icon)
                            .color(self.theme.button_foreground)
                            .size(18.0),
                    )
                    .min_size(egui::Vec2::new(32.0, 32.0))
                    .corner_radius(CornerRadius::same(16))
                    .fill(self.theme.button_background),
                );
                if theme_btn
                    .on_hover_text(if self.is_dark_mode {
                        "Switch to light mode"
                    } else {
                        "Switch to dark mode"
                    })
                    .clicked()
                {
                    self.toggle_theme();
                }

                ui.add_space(8.0);

                let refresh_btn = ui.add(
                    egui::Button::new(
                        RichText::new("⟳")
                            .color(self.theme.button_foreground)
                            .size(18.0),
                    )
                    .min_size(egui::Vec2::new(32.0, 32.0))
                    .corner_radius(CornerRadius::same(16))
                    .fill(self.theme.button_background),
                );
                if refresh_btn
                    .on_hover_text("Re-fetch the current search")
                    .clicked()
                {
                    self.refresh();
                }
            });
        });
    }

    fn render_search_row(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Search:").color(self.theme.text).size(16.0));
            ui.add_space(8.0);

            let text_edit = ui.add_sized(
                [ui.available_width() - 110.0, 32.0],
                egui::TextEdit::singleline(&mut self.search_term)
                    .hint_text("Search Hacker News stories...")
                    .text_color(self.theme.text)
                    .cursor_at_end(true)
                    .id(egui::Id::new("search_input")),
            );
            let submitted =
                text_edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.add_space(8.0);
            let search_btn = ui.add_sized(
                [90.0, 32.0],
                egui::Button::new(
                    RichText::new("Search")
                        .color(self.theme.button_foreground)
                        .size(15.0),
                )
                .corner_radius(CornerRadius::same(6))
                .fill(self.theme.button_background),
            );

            if submitted || search_btn.clicked() {
                self.submit_search();
                if submitted {
                    text_edit.request_focus();
                }
            }
        });
    }

    fn render_summary(&mut self, ui: &mut Ui) {
        if let Some(entry) = self.store.get(&self.search_key) {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!(
                        "{} results for '{}'",
                        entry.hits.len(),
                        self.search_key
                    ))
                    .color(self.theme.secondary_text)
                    .size(14.0)
                    .italics(),
                );

                if entry.page > 0 {
                    ui.label(
                        RichText::new(format!("(through page {})", entry.page))
                            .color(self.theme.secondary_text)
                            .size(13.0),
                    );
                }
            });
            ui.add_space(4.0);
        }
    }

    fn sort_button(&mut self, ui: &mut Ui, label: &str, key: SortKey, width: f32) {
        let active = self.sort.key == key;
        let arrow = if active {
            if self.sort.reverse {
                " ▲"
            } else {
                " ▼"
            }
        } else {
            ""
        };

        let button = ui.add_sized(
            [width, 28.0],
            egui::Button::new(
                RichText::new(format!("{label}{arrow}"))
                    .color(self.theme.button_foreground)
                    .size(14.0),
            )
            .corner_radius(CornerRadius::same(4))
            .fill(if active {
                self.theme.button_active_background
            } else {
                self.theme.button_background
            }),
        );

        if button.hovered() {
            ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
        }
        if button.clicked() {
            self.sort.select(key);
        }
    }

    fn render_table_header(&mut self, ui: &mut Ui) {
        let width = ui.available_width();
        ui.horizontal(|ui| {
            self.sort_button(ui, "Title", SortKey::Title, width * 0.40);
            self.sort_button(ui, "Author", SortKey::Author, width * 0.27);
            self.sort_button(ui, "Comments", SortKey::Comments, width * 0.11);
            self.sort_button(ui, "Points", SortKey::Points, width * 0.11);
            ui.add_sized(
                [width * 0.08, 28.0],
                egui::Label::new(
                    RichText::new("Archive")
                        .color(self.theme.secondary_text)
                        .size(14.0),
                ),
            );
        });
    }

    fn render_hit_row(&mut self, ui: &mut Ui, hit: &Hit, width: f32) {
        ui.horizontal(|ui| {
            // Title cell: clickable when the hit carries a URL
            ui.allocate_ui_with_layout(
                egui::Vec2::new(width * 0.40, 24.0),
                egui::Layout::left_to_right(egui::Align::Center),
                |ui| {
                    let shown_title = if hit.title.is_empty() {
                        "(untitled)"
                    } else {
                        &hit.title
                    };
                    if hit.url.is_empty() {
                        ui.add(
                            egui::Label::new(
                                RichText::new(shown_title).color(self.theme.text).size(15.0),
                            )
                            .truncate(),
                        );
                    } else {
                        let title = ui.add(
                            egui::Label::new(
                                RichText::new(shown_title)
                                    .color(self.theme.link_color)
                                    .size(15.0),
                            )
                            .truncate()
                            .sense(egui::Sense::click()),
                        );
                        if title.hovered() {
                            ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                        }
                        if title.on_hover_text(&hit.url).clicked() {
                            self.open_link(&hit.url);
                        }
                    }
                },
            );

            ui.allocate_ui_with_layout(
                egui::Vec2::new(width * 0.27, 24.0),
                egui::Layout::left_to_right(egui::Align::Center),
                |ui| {
                    ui.add(
                        egui::Label::new(
                            RichText::new(&hit.author)
                                .color(self.theme.text)
                                .size(14.0),
                        )
                        .truncate(),
                    );
                },
            );

            ui.add_sized(
                [width * 0.11, 24.0],
                egui::Label::new(
                    RichText::new(hit.num_comments.to_string())
                        .color(self.theme.secondary_text)
                        .size(14.0),
                ),
            );

            ui.add_sized(
                [width * 0.11, 24.0],
                egui::Label::new(
                    RichText::new(hit.points.to_string())
                        .color(self.theme.score_color(hit.points))
                        .size(14.0),
                ),
            );

            ui.allocate_ui_with_layout(
                egui::Vec2::new(width * 0.08, 24.0),
                egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                |ui| {
                    let dismiss_btn = ui.add(
                        egui::Button::new(
                            RichText::new("Dismiss")
                                .color(self.theme.button_foreground)
                                .size(13.0),
                        )
                        .corner_radius(CornerRadius::same(4))
                        .fill(self.theme.button_background),
                    );
                    if dismiss_btn.clicked() {
                        self.pending_dismiss = Some(hit.object_id.clone());
                    }
                },
            );
        });
    }

    fn render_table(&mut self, ui: &mut Ui) {
        self.render_table_header(ui);
        ui.add(egui::Separator::default().spacing(8.0));

        let list = self
            .store
            .get(&self.search_key)
            .map(|entry| entry.hits.clone())
            .unwrap_or_default();
        let ordered = sorted_hits(&list, self.sort);
        let width = ui.available_width();

        if ordered.is_empty() && !self.is_loading() && self.store.contains(&self.search_key) {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(format!("No results for '{}'", self.search_key))
                        .color(self.theme.secondary_text)
                        .size(16.0),
                );
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for hit in &ordered {
                    self.render_hit_row(ui, hit, width);
                    ui.add(egui::Separator::default().spacing(4.0));
                }
            });
    }

    fn render_more_footer(&mut self, ui: &mut Ui) {
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            if self.is_loading() {
                // More swaps for a spinner while a fetch is outstanding
                ui.spinner();
            } else {
                let more_btn = ui.add_sized(
                    [120.0, 32.0],
                    egui::Button::new(
                        RichText::new("More")
                            .color(self.theme.button_foreground)
                            .size(15.0),
                    )
                    .corner_radius(CornerRadius::same(6))
                    .fill(self.theme.button_background),
                );
                if more_btn.clicked() {
                    self.load_more();
                }
            }
        });
    }
}

impl eframe::App for SearchApp {
    // Save the theme preference when the app is closing
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        storage.set_string("is_dark_mode", self.is_dark_mode.to_string());
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme.apply_to_ctx(ctx);

        self.check_fetch();

        // First frame: the default term becomes the active key and loads
        if !self.initialized {
            self.initialized = true;
            self.search_key = self.search_term.clone();
            let key = self.search_key.clone();
            self.start_fetch(&key, 0);
        }

        if let Some(object_id) = self.pending_dismiss.take() {
            let key = self.search_key.clone();
            self.store.dismiss(&key, &object_id);
            self.needs_repaint = true;
        }

        // Keep polling the worker channel while a fetch is outstanding
        if self.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
        if self.needs_repaint {
            ctx.request_repaint();
            self.needs_repaint = false;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_header(ui);
            ui.add(egui::Separator::default().spacing(12.0));

            self.render_search_row(ui);
            ui.add_space(10.0);
            self.render_summary(ui);

            // Reserve the footer height so the scroll area doesn't swallow it
            let footer_height = 52.0;
            let table_height = (ui.available_height() - footer_height).max(0.0);
            ui.allocate_ui_with_layout(
                egui::Vec2::new(ui.available_width(), table_height),
                egui::Layout::top_down(egui::Align::Min),
                |ui| {
                    self.render_table(ui);
                },
            );

            self.render_more_footer(ui);
        });
    }
}
