//! Production screen: push-to-production form, last-result/undo card and the
//! product browser. All state lives in the core view-models; this file only
//! draws them and forwards actions to the backend worker.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use production_core::{
    CatalogStore, ConfirmationDialog, ConsoleError, ConsoleEvent, FileStore, ProductBrowser,
    ProductionForm, ProductionResultCache, RefreshOutcome, ResultSlot, Settings, SortDirection,
    SortField, SortState, StatusMessage, UndoWorkflow,
};
use shared::{domain::Operation, error::ErrorCode};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogChoice {
    Cancel,
    Confirm,
}

pub struct ProductionApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    endpoint_url: String,
    username: String,
    catalog: CatalogStore,
    form: ProductionForm,
    undo: UndoWorkflow,
    browser: ProductBrowser,
    results: ResultSlot<FileStore>,
    banner: Option<StatusMessage>,
}

impl ProductionApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, settings: &Settings) -> Self {
        let store = FileStore::open(&settings.storage_path);
        let mut app = Self::with_store(
            cmd_tx,
            ui_rx,
            settings.endpoint_url.clone(),
            settings.username().unwrap_or_default().to_string(),
            store,
        );
        app.request_refresh();
        app
    }

    fn with_store(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        endpoint_url: String,
        username: String,
        store: FileStore,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            endpoint_url,
            username,
            catalog: CatalogStore::new(),
            form: ProductionForm::new(),
            undo: UndoWorkflow::new(),
            browser: ProductBrowser::new(),
            results: ResultSlot::restore(ProductionResultCache::new(store)),
            banner: None,
        }
    }

    pub fn report_error(&mut self, message: impl Into<String>) {
        self.banner = Some(StatusMessage::error(message));
    }

    fn request_refresh(&mut self) {
        let ticket = self.catalog.begin_refresh();
        if let Err(reason) =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::LoadProducts { ticket })
        {
            let outcome = self
                .catalog
                .apply_refresh(ticket, Err(unavailable(Operation::GetAllProducts, &reason)));
            if let RefreshOutcome::Failed { message } = outcome {
                self.report_error(message);
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::ProductsLoaded { ticket, result } => {
                    match self.catalog.apply_refresh(ticket, result) {
                        RefreshOutcome::Applied { .. } => {
                            if self.banner.as_ref().is_some_and(StatusMessage::is_error) {
                                self.banner = None;
                            }
                        }
                        RefreshOutcome::Failed { message } => self.report_error(message),
                        RefreshOutcome::Stale => {}
                    }
                }
                UiEvent::ProductionFinished(outcome) => {
                    let events = self.form.finish_submit(outcome, &mut self.results);
                    self.apply_console_events(events);
                }
                UiEvent::UndoFinished(outcome) => {
                    let events = self.undo.finish_undo(outcome, &mut self.results);
                    self.apply_console_events(events);
                }
                UiEvent::DeleteFinished {
                    product_id,
                    outcome,
                } => {
                    let events = self
                        .browser
                        .finish_delete(&product_id, outcome, &mut self.catalog);
                    self.apply_console_events(events);
                }
                UiEvent::BackendUnavailable(message) => self.report_error(message),
            }
        }
    }

    fn apply_console_events(&mut self, events: Vec<ConsoleEvent>) {
        for event in events {
            match event {
                ConsoleEvent::CatalogRefreshRequested => self.request_refresh(),
                ConsoleEvent::InventoryRefreshRequested => {
                    tracing::debug!("inventory refresh requested");
                }
                ConsoleEvent::ProductionUndone { .. } => self.form.clear_status(),
                ConsoleEvent::Error(message) => {
                    tracing::debug!(%message, "workflow reported an error");
                }
                ConsoleEvent::CatalogRefreshed { .. }
                | ConsoleEvent::ProductionRecorded(_)
                | ConsoleEvent::ProductDeleted(_) => {}
            }
        }
    }

    fn submit_production(&mut self) {
        // begin_submit records its own validation message on the form.
        let Ok(request) = self.form.begin_submit(&self.catalog, &self.username) else {
            return;
        };
        if let Err(reason) =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::PushToProduction(request))
        {
            let events = self.form.finish_submit(
                Err(unavailable(Operation::PushToProduction, &reason)),
                &mut self.results,
            );
            self.apply_console_events(events);
        }
    }

    fn confirm_undo(&mut self) {
        match self.undo.begin_undo(self.results.current(), &self.username) {
            Ok(request) => {
                if let Err(reason) =
                    dispatch_backend_command(&self.cmd_tx, BackendCommand::UndoProduction(request))
                {
                    let events = self.undo.finish_undo(
                        Err(unavailable(Operation::UndoProduction, &reason)),
                        &mut self.results,
                    );
                    self.apply_console_events(events);
                }
            }
            Err(err) => {
                self.undo.cancel();
                self.report_error(err.to_string());
            }
        }
    }

    fn confirm_delete(&mut self) {
        match self.browser.begin_delete(&self.username) {
            Ok(request) => {
                let product_id = request.product_id.clone();
                if let Err(reason) =
                    dispatch_backend_command(&self.cmd_tx, BackendCommand::DeleteProduct(request))
                {
                    let events = self.browser.finish_delete(
                        &product_id,
                        Err(unavailable(Operation::DeleteProduct, &reason)),
                        &mut self.catalog,
                    );
                    self.apply_console_events(events);
                }
            }
            Err(err) => {
                self.browser.cancel_delete();
                self.report_error(err.to_string());
            }
        }
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Production Console");
            ui.weak(self.endpoint_url.as_str());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let loading = self.catalog.is_loading();
                if ui
                    .add_enabled(!loading, egui::Button::new("Refresh"))
                    .clicked()
                {
                    self.request_refresh();
                }
                if loading {
                    ui.spinner();
                }
                ui.add(
                    egui::TextEdit::singleline(&mut self.username)
                        .hint_text("Username")
                        .desired_width(160.0),
                );
                ui.label("User");
            });
        });
        show_status(ui, self.banner.as_ref());
    }

    fn show_production_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Push to production");
        ui.add_space(6.0);

        let selected_label = self
            .form
            .selector()
            .selected_product(&self.catalog)
            .map(|product| product.name.clone())
            .unwrap_or_else(|| "Select a product".to_string());

        let mut chosen = None;
        let dropdown = ui.vertical(|ui| {
            if ui.button(format!("{selected_label} ⏷")).clicked() {
                self.form.selector_mut().toggle();
            }
            if !self.form.selector().is_open() {
                return;
            }

            let mut query = self.form.selector().query().to_string();
            let search = ui.add(egui::TextEdit::singleline(&mut query).hint_text("Search products"));
            if search.changed() {
                self.form.selector_mut().set_query(query);
            }

            egui::ScrollArea::vertical()
                .max_height(220.0)
                .show(ui, |ui| {
                    let selected = self.form.selector().selected();
                    let options = self.form.selector().options(&self.catalog);
                    if options.is_empty() {
                        ui.weak("No products found");
                    }
                    for option in options {
                        let marker = if selected == Some(&option.product.id) {
                            "✔ "
                        } else {
                            ""
                        };
                        let label = format!(
                            "{marker}{} (max {})",
                            option.product.name, option.product.max_produce
                        );
                        let response = ui.add_enabled(option.enabled, egui::Button::new(label));
                        let response = match option.disabled_reason {
                            Some(reason) => response.on_disabled_hover_text(reason),
                            None => response,
                        };
                        if response.clicked() {
                            chosen = Some(option.product.id.clone());
                        }
                    }
                });
        });
        if let Some(id) = chosen {
            if let Err(err) = self.form.selector_mut().select(&id, &self.catalog) {
                self.report_error(err.to_string());
            }
        } else if self.form.selector().is_open() && dropdown.response.clicked_elsewhere() {
            self.form.selector_mut().interaction_outside();
        }

        ui.add_space(6.0);
        let mut quantity = self.form.quantity_input().to_string();
        let quantity_field = ui.add_enabled(
            !self.form.is_submitting(),
            egui::TextEdit::singleline(&mut quantity).hint_text("Quantity"),
        );
        if quantity_field.changed() {
            self.form.set_quantity_input(quantity);
        }

        if let Some(product) = self.form.selector().selected_product(&self.catalog) {
            ui.label(format!("Max producible: {}", product.max_produce));
            if !product.materials.is_empty() {
                ui.label("Materials per unit:");
                for material in &product.materials {
                    ui.weak(format!("  {}: {}", material.name, material.quantity_per_unit));
                }
            }
        }
        if let Some(preview) = self.form.cost_preview(&self.catalog) {
            ui.label(format!("Unit cost: {:.2}", preview.unit_cost));
            ui.strong(format!("Total cost: {:.2}", preview.total));
        }

        let submit_label = if self.form.is_submitting() {
            "Processing..."
        } else {
            "Push to production"
        };
        if ui
            .add_enabled(
                self.form.can_submit(&self.catalog),
                egui::Button::new(submit_label),
            )
            .clicked()
        {
            self.submit_production();
        }
        show_status(ui, self.form.status());

        ui.separator();
        ui.heading("Last production");
        match self.results.current() {
            Some(result) => {
                ui.label(format!("Push id: {}", result.push_id));
                ui.label(format!(
                    "{} unit(s) of {}",
                    result.quantity_produced, result.product_id
                ));
                ui.label(format!("Total cost: {:.2}", result.total_production_cost));
            }
            None => {
                ui.weak("Nothing recorded yet");
            }
        }
        let undo_label = if self.undo.is_undoing() {
            "Undoing..."
        } else {
            "Undo"
        };
        if ui
            .add_enabled(
                self.undo.can_undo(self.results.current()),
                egui::Button::new(undo_label),
            )
            .clicked()
        {
            self.undo.request(self.results.current());
        }
        show_status(ui, self.undo.status());
    }

    fn show_product_browser(&mut self, ui: &mut egui::Ui) {
        ui.heading("Products");
        let mut search = self.browser.search().to_string();
        if ui
            .add(egui::TextEdit::singleline(&mut search).hint_text("Search by name or id"))
            .changed()
        {
            self.browser.set_search(search);
        }
        show_status(ui, self.browser.status());
        ui.add_space(6.0);

        if self.catalog.is_empty() {
            if self.catalog.is_loading() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading products...");
                });
            } else {
                ui.weak("No products");
            }
            return;
        }

        let sort = self.browser.sort();
        let mut toggle = None;
        let mut delete = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("product_browser")
                .striped(true)
                .num_columns(5)
                .show(ui, |ui| {
                    for (field, title) in [
                        (SortField::Name, "Name"),
                        (SortField::MaxProduce, "Max produce"),
                        (SortField::ProductionCost, "Production cost"),
                    ] {
                        if ui.button(sort_label(sort, field, title)).clicked() {
                            toggle = Some(field);
                        }
                    }
                    ui.strong("ID");
                    ui.label("");
                    ui.end_row();

                    let rows = self.browser.visible(&self.catalog);
                    for product in &rows {
                        ui.label(product.name.as_str());
                        ui.label(product.max_produce.to_string());
                        ui.label(format!("{:.2}", product.production_cost_total));
                        ui.weak(product.id.as_str());
                        let deleting = self.browser.is_deleting(&product.id);
                        let label = if deleting { "Deleting..." } else { "Delete" };
                        if ui
                            .add_enabled(!deleting, egui::Button::new(label))
                            .clicked()
                        {
                            delete = Some(product.id.clone());
                        }
                        ui.end_row();
                    }
                    if rows.is_empty() {
                        ui.weak("No products match the search");
                        ui.end_row();
                    }
                });
        });

        if let Some(field) = toggle {
            self.browser.toggle_sort(field);
        }
        if let Some(id) = delete {
            if let Err(err) = self.browser.request_delete(id) {
                self.report_error(err.to_string());
            }
        }
    }

    fn show_dialogs(&mut self, ctx: &egui::Context) {
        let undo_dialog = self.undo.dialog(self.results.current());
        match show_confirmation(ctx, "undo_production", &undo_dialog) {
            Some(DialogChoice::Confirm) => self.confirm_undo(),
            Some(DialogChoice::Cancel) => self.undo.cancel(),
            None => {}
        }

        let delete_dialog = self.browser.delete_dialog(&self.catalog);
        match show_confirmation(ctx, "delete_product", &delete_dialog) {
            Some(DialogChoice::Confirm) => self.confirm_delete(),
            Some(DialogChoice::Cancel) => self.browser.cancel_delete(),
            None => {}
        }
    }
}

impl eframe::App for ProductionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("header").show(ctx, |ui| self.show_header(ui));
        egui::SidePanel::left("production")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.show_production_panel(ui));
            });
        egui::CentralPanel::default().show(ctx, |ui| self.show_product_browser(ui));
        self.show_dialogs(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn unavailable(operation: Operation, reason: &str) -> ConsoleError {
    ConsoleError::remote(operation, ErrorCode::Unavailable, Some(reason))
}

fn sort_label(sort: SortState, field: SortField, title: &str) -> String {
    if sort.field != field {
        return title.to_string();
    }
    match sort.direction {
        SortDirection::Ascending => format!("{title} ⏶"),
        SortDirection::Descending => format!("{title} ⏷"),
    }
}

fn show_status(ui: &mut egui::Ui, status: Option<&StatusMessage>) {
    let Some(status) = status else {
        return;
    };
    let color = if status.is_error() {
        ui.visuals().error_fg_color
    } else {
        egui::Color32::from_rgb(70, 170, 90)
    };
    ui.colored_label(color, status.text.as_str());
}

fn show_confirmation(
    ctx: &egui::Context,
    id: &str,
    dialog: &ConfirmationDialog,
) -> Option<DialogChoice> {
    let view = dialog.view()?;
    let mut choice = None;
    let response = egui::Modal::new(egui::Id::new(id)).show(ctx, |ui| {
        ui.set_width(380.0);
        ui.heading(view.title);
        ui.label(view.message);
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(view.cancel.enabled, egui::Button::new(view.cancel.label))
                .clicked()
            {
                choice = Some(DialogChoice::Cancel);
            }
            if ui
                .add_enabled(view.confirm.enabled, egui::Button::new(view.confirm.label))
                .clicked()
            {
                choice = Some(DialogChoice::Confirm);
            }
        });
    });
    if choice.is_none() && view.cancel.enabled && response.should_close() {
        choice = Some(DialogChoice::Cancel);
    }
    choice
}
