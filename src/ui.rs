use chrono::NaiveDate;
use eframe::egui;

use crate::app::{Client, DocumentManagerApp, PaymentAccount, Tab};
use crate::totals;
use crate::types::{AccountType, DocumentStatus, DocumentType, FieldType, FieldValue};

const EDIT_DATE_FMT: &str = "%Y-%m-%d";

impl eframe::App for DocumentManagerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Document Manager");
                ui.separator();
                ui.selectable_value(&mut self.selected_tab, Tab::Documents, "Documents");
                ui.selectable_value(&mut self.selected_tab, Tab::Clients, "Clients");
                ui.selectable_value(&mut self.selected_tab, Tab::Templates, "Templates");
                ui.selectable_value(&mut self.selected_tab, Tab::Settings, "Settings");
            });
        });

        if let Some(toast) = self.toast.clone() {
            egui::TopBottomPanel::bottom("toast_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, toast);
                    if ui.button("Dismiss").clicked() {
                        self.toast = None;
                    }
                });
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.selected_tab {
            Tab::Documents => show_documents_tab(self, ui),
            Tab::Clients => show_clients_tab(self, ui),
            Tab::Templates => show_templates_tab(self, ui),
            Tab::Settings => show_settings_tab(self, ui),
        });

        // Modal dialogs
        if self.show_client_form {
            show_client_form_window(self, ctx);
        }

        if self.show_document_form {
            show_document_form_window(self, ctx);
        }

        if self.show_account_form {
            show_account_form_window(self, ctx);
        }
    }
}

fn show_documents_tab(app: &mut DocumentManagerApp, ui: &mut egui::Ui) {
    ui.heading("Documents");
    ui.separator();

    ui.horizontal(|ui| {
        if ui.button("➕ New Quotation").clicked() {
            app.editing_document = Some(app.new_document(DocumentType::Quotation));
            app.show_document_form = true;
        }
        if ui.button("➕ New Invoice").clicked() {
            app.editing_document = Some(app.new_document(DocumentType::Invoice));
            app.show_document_form = true;
        }

        ui.separator();
        ui.selectable_value(&mut app.document_filter, None, "All");
        ui.selectable_value(
            &mut app.document_filter,
            Some(DocumentType::Quotation),
            "Quotations",
        );
        ui.selectable_value(
            &mut app.document_filter,
            Some(DocumentType::Invoice),
            "Invoices",
        );
    });

    ui.add_space(10.0);

    let mut doc_to_delete: Option<i64> = None;
    let mut doc_to_edit: Option<i64> = None;
    let mut doc_to_convert: Option<i64> = None;

    let date_format = app.settings.date_format.clone();
    let currency = app.settings.currency.clone();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for doc in app.documents.clone().iter() {
            if let Some(filter) = app.document_filter {
                if doc.doc_type != filter {
                    continue;
                }
            }

            let totals = totals::compute(&doc.items);
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.horizontal(|ui| {
                            ui.strong(&doc.document_number);
                            ui.label("-");
                            ui.label(&doc.title);
                        });
                        if !doc.client_name.is_empty() {
                            ui.label(&doc.client_name);
                        }
                        ui.label(format!(
                            "{}, {}",
                            doc.doc_type,
                            doc.date.format(&date_format)
                        ));
                        ui.label(format!("Total: {currency} {:.2}", totals.total));
                        ui.label(format!("Status: {}", doc.status));
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🗑 Delete").clicked() {
                            doc_to_delete = Some(doc.id);
                        }
                        if ui.button("✏ Edit").clicked() {
                            doc_to_edit = Some(doc.id);
                        }
                        if doc.doc_type == DocumentType::Quotation
                            && ui.button("📄 To Invoice").clicked()
                        {
                            doc_to_convert = Some(doc.id);
                        }
                    });
                });
            });
            ui.add_space(5.0);
        }
    });

    if let Some(id) = doc_to_delete {
        if let Err(e) = app.delete_document(id) {
            app.handle_error(e);
        }
    }
    if let Some(id) = doc_to_edit {
        // deep-copied draft; the committed document stays untouched
        app.editing_document = app.documents.iter().find(|d| d.id == id).cloned();
        app.show_document_form = app.editing_document.is_some();
    }
    if let Some(id) = doc_to_convert {
        if let Err(e) = app.convert_to_invoice(id) {
            app.handle_error(e);
        }
    }
}

fn show_clients_tab(app: &mut DocumentManagerApp, ui: &mut egui::Ui) {
    ui.heading("Clients");
    ui.separator();

    if ui.button("➕ Add Client").clicked() {
        app.editing_client = Some(Client::default());
        app.show_client_form = true;
    }

    ui.add_space(10.0);

    egui::ScrollArea::vertical().show(ui, |ui| {
        for client in app.clients.clone().iter() {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.strong(&client.name);
                        if let Some(company) = &client.company {
                            ui.label(company);
                        }
                        ui.label(&client.email);
                        ui.label(&client.phone);
                        ui.label(&client.address);
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🗑 Delete").clicked() {
                            if let Err(e) = app.delete_client(client.id) {
                                app.handle_error(e);
                            }
                        }
                        if ui.button("✏ Edit").clicked() {
                            app.editing_client = Some(client.clone());
                            app.show_client_form = true;
                        }
                    });
                });
            });
            ui.add_space(5.0);
        }
    });
}

fn show_client_form_window(app: &mut DocumentManagerApp, ctx: &egui::Context) {
    let mut open = true;
    egui::Window::new("Client Details")
        .open(&mut open)
        .resizable(true)
        .show(ctx, |ui| {
            if let Some(client) = &mut app.editing_client {
                ui.horizontal(|ui| {
                    ui.label("Name:");
                    ui.text_edit_singleline(&mut client.name);
                });

                ui.horizontal(|ui| {
                    ui.label("Email:");
                    ui.text_edit_singleline(&mut client.email);
                });

                ui.horizontal(|ui| {
                    ui.label("Phone:");
                    ui.text_edit_singleline(&mut client.phone);
                });

                ui.horizontal(|ui| {
                    ui.label("Address:");
                    ui.text_edit_singleline(&mut client.address);
                });

                ui.horizontal(|ui| {
                    ui.label("Company:");
                    let mut company = client.company.clone().unwrap_or_default();
                    if ui.text_edit_singleline(&mut company).changed() {
                        client.company = if company.is_empty() {
                            None
                        } else {
                            Some(company)
                        };
                    }
                });

                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("💾 Save").clicked() {
                        let client = app.editing_client.take().unwrap();
                        let result = if client.id == 0 {
                            app.add_client(client)
                        } else {
                            app.update_client(client)
                        };
                        if let Err(e) = result {
                            app.handle_error(e);
                        }
                        app.show_client_form = false;
                    }

                    if ui.button("❌ Cancel").clicked() {
                        app.editing_client = None;
                        app.show_client_form = false;
                    }
                });
            }
        });

    if !open {
        app.editing_client = None;
        app.show_client_form = false;
    }
}

fn show_document_form_window(app: &mut DocumentManagerApp, ctx: &egui::Context) {
    let mut open = true;
    let mut save_doc = false;
    let mut cancel_doc = false;

    let clients = app.clients.clone();
    let currency = app.settings.currency.clone();
    let schema = app
        .editing_document
        .as_ref()
        .map(|d| app.schema(d.doc_type).clone());

    egui::Window::new("Document Details")
        .open(&mut open)
        .resizable(true)
        .default_width(640.0)
        .show(ctx, |ui| {
            let Some(schema) = &schema else { return };
            if let Some(doc) = &mut app.editing_document {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    if let Some(error) = &app.form_error {
                        ui.colored_label(egui::Color32::RED, error);
                        ui.separator();
                    }

                    ui.horizontal(|ui| {
                        ui.label("Number:");
                        ui.strong(&doc.document_number);
                        ui.label(format!("({})", doc.doc_type));
                    });

                    ui.horizontal(|ui| {
                        ui.label("Title:");
                        if ui.text_edit_singleline(&mut doc.title).changed() {
                            app.form_error = None;
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.label("Client:");
                        let selected = if doc.client_name.is_empty() {
                            "Select Client".to_string()
                        } else {
                            doc.client_name.clone()
                        };
                        egui::ComboBox::from_id_salt("client_select")
                            .selected_text(selected)
                            .show_ui(ui, |ui| {
                                for client in &clients {
                                    ui.selectable_value(
                                        &mut doc.client_name,
                                        client.name.clone(),
                                        &client.name,
                                    );
                                }
                            });
                    });

                    ui.horizontal(|ui| {
                        ui.label("Date:");
                        let mut date_str = doc.date.format(EDIT_DATE_FMT).to_string();
                        if ui.text_edit_singleline(&mut date_str).changed() {
                            if let Ok(date) = NaiveDate::parse_from_str(&date_str, EDIT_DATE_FMT) {
                                doc.date = date;
                            }
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.label("Due Date:");
                        let mut due_str = doc
                            .due_date
                            .map(|d| d.format(EDIT_DATE_FMT).to_string())
                            .unwrap_or_default();
                        if ui.text_edit_singleline(&mut due_str).changed() {
                            doc.due_date = NaiveDate::parse_from_str(&due_str, EDIT_DATE_FMT).ok();
                        }
                        if ui.button("+7d").clicked() {
                            let base = doc.due_date.unwrap_or(doc.date);
                            doc.due_date = Some(base + chrono::Duration::days(7));
                        }
                        if ui.button("+30d").clicked() {
                            let base = doc.due_date.unwrap_or(doc.date);
                            doc.due_date = Some(base + chrono::Duration::days(30));
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.label("Status:");
                        egui::ComboBox::from_id_salt("status_select")
                            .selected_text(format!("{}", doc.status))
                            .show_ui(ui, |ui| {
                                for status in DocumentStatus::ALL {
                                    ui.selectable_value(
                                        &mut doc.status,
                                        status,
                                        format!("{status}"),
                                    );
                                }
                            });
                    });

                    ui.horizontal(|ui| {
                        ui.label("Notes:");
                        ui.text_edit_multiline(&mut doc.notes);
                    });

                    ui.separator();
                    ui.strong("Items");

                    let mut item_to_remove: Option<usize> = None;
                    let items_count = doc.items.len();

                    for (idx, item) in doc.items.iter_mut().enumerate() {
                        ui.group(|ui| {
                            if schema.field("description").is_some_and(|f| f.enabled) {
                                ui.horizontal(|ui| {
                                    ui.label("Description:");
                                    ui.text_edit_singleline(&mut item.description);
                                });
                            }

                            ui.horizontal(|ui| {
                                if schema.field("quantity").is_some_and(|f| f.enabled) {
                                    ui.label("Quantity:");
                                    ui.add(egui::DragValue::new(&mut item.quantity).speed(0.1));
                                }

                                if schema.field("unit_price").is_some_and(|f| f.enabled) {
                                    ui.label("Unit Price:");
                                    ui.add(egui::DragValue::new(&mut item.unit_price).speed(0.1));
                                }

                                if schema.field("tax").is_some_and(|f| f.enabled) {
                                    ui.label("Tax %:");
                                    let mut tax = item.tax.unwrap_or(0.0);
                                    if ui
                                        .add(egui::DragValue::new(&mut tax).speed(0.1))
                                        .changed()
                                    {
                                        item.tax = Some(tax);
                                    }
                                }

                                ui.label(format!(
                                    "Total: {currency} {:.2}",
                                    item.quantity * item.unit_price
                                ));

                                if items_count > 1 && ui.button("🗑").clicked() {
                                    item_to_remove = Some(idx);
                                }
                            });

                            for field in schema.enabled_fields().filter(|f| f.is_custom()) {
                                ui.horizontal(|ui| {
                                    ui.label(format!("{}:", field.name));
                                    match item.value_mut(field) {
                                        FieldValue::Text(s) | FieldValue::Image(s) => {
                                            ui.text_edit_singleline(s);
                                        }
                                        FieldValue::Date(s) => {
                                            ui.text_edit_singleline(s);
                                            ui.label("(YYYY-MM-DD)");
                                        }
                                        FieldValue::Number(n) => {
                                            ui.add(egui::DragValue::new(n).speed(0.1));
                                        }
                                        FieldValue::Select(s) => {
                                            egui::ComboBox::from_id_salt(format!(
                                                "select_{}_{idx}",
                                                field.id
                                            ))
                                            .selected_text(s.clone())
                                            .show_ui(ui, |ui| {
                                                for option in &field.options {
                                                    ui.selectable_value(
                                                        s,
                                                        option.clone(),
                                                        option,
                                                    );
                                                }
                                            });
                                        }
                                    }
                                });
                            }
                        });
                    }

                    if let Some(idx) = item_to_remove {
                        doc.items.remove(idx);
                    }

                    if ui.button("➕ Add Item").clicked() {
                        doc.items.push(Default::default());
                        app.form_error = None;
                    }

                    ui.separator();
                    let totals = totals::compute(&doc.items);
                    ui.label(format!("Subtotal: {currency} {:.2}", totals.subtotal));
                    ui.label(format!("Tax: {currency} {:.2}", totals.tax));
                    ui.strong(format!("Total: {currency} {:.2}", totals.total));

                    ui.separator();

                    ui.horizontal(|ui| {
                        if ui.button("💾 Save").clicked() {
                            save_doc = true;
                        }

                        if ui.button("❌ Cancel").clicked() {
                            cancel_doc = true;
                        }
                    });
                });
            }
        });

    if save_doc {
        if let Some(doc) = app.editing_document.clone() {
            match app.save_document(doc) {
                Ok(()) => {
                    app.editing_document = None;
                    app.show_document_form = false;
                    app.form_error = None;
                }
                // validation errors stay inline, store errors toast;
                // the form stays open either way
                Err(e) => app.handle_error(e),
            }
        }
    }

    if cancel_doc || !open {
        app.editing_document = None;
        app.show_document_form = false;
        app.form_error = None;
    }
}

fn show_templates_tab(app: &mut DocumentManagerApp, ui: &mut egui::Ui) {
    ui.heading("Field Templates");
    ui.separator();

    ui.horizontal(|ui| {
        ui.selectable_value(
            &mut app.template_doc_type,
            DocumentType::Quotation,
            "Quotation",
        );
        ui.selectable_value(&mut app.template_doc_type, DocumentType::Invoice, "Invoice");
    });

    ui.add_space(10.0);

    let doc_type = app.template_doc_type;
    let schema = app.schema(doc_type).clone();

    let mut field_to_toggle: Option<(String, bool)> = None;
    let mut field_to_remove: Option<String> = None;

    for field in &schema.fields {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                let mut enabled = field.enabled;
                if ui.checkbox(&mut enabled, "").changed() {
                    field_to_toggle = Some((field.id.clone(), enabled));
                }
                ui.strong(&field.name);
                ui.label(format!("{}", field.field_type));
                if field.required {
                    ui.label("required");
                }
                if !field.options.is_empty() {
                    ui.label(field.options.join(" | "));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if field.is_custom() {
                        if ui.button("🗑 Remove").clicked() {
                            field_to_remove = Some(field.id.clone());
                        }
                    } else {
                        ui.label("built-in");
                    }
                });
            });
        });
        ui.add_space(3.0);
    }

    if let Some((id, enabled)) = field_to_toggle {
        app.schema_mut(doc_type).set_enabled(&id, enabled);
        if let Err(e) = app.save_schema(doc_type) {
            app.handle_error(e);
        }
    }
    if let Some(id) = field_to_remove {
        let result = app.schema_mut(doc_type).remove(&id);
        match result {
            Ok(()) => {
                if let Err(e) = app.save_schema(doc_type) {
                    app.handle_error(e);
                }
            }
            Err(e) => app.handle_error(e),
        }
    }

    ui.add_space(10.0);
    ui.separator();
    ui.strong("Add Custom Field");

    if let Some(error) = &app.form_error {
        ui.colored_label(egui::Color32::RED, error);
    }

    ui.horizontal(|ui| {
        ui.label("Name:");
        if ui.text_edit_singleline(&mut app.new_field.name).changed() {
            app.form_error = None;
        }
    });

    ui.horizontal(|ui| {
        ui.label("Type:");
        egui::ComboBox::from_id_salt("new_field_type")
            .selected_text(format!("{}", app.new_field.field_type))
            .show_ui(ui, |ui| {
                for field_type in FieldType::ALL {
                    ui.selectable_value(
                        &mut app.new_field.field_type,
                        field_type,
                        format!("{field_type}"),
                    );
                }
            });

        ui.checkbox(&mut app.new_field.required, "Required");
    });

    if app.new_field.field_type == FieldType::Select {
        ui.horizontal(|ui| {
            ui.label("Options (comma-separated):");
            ui.text_edit_singleline(&mut app.new_field.options);
        });
    }

    if ui.button("➕ Add Field").clicked() {
        let options: Vec<String> = if app.new_field.field_type == FieldType::Select {
            app.new_field
                .options
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        } else {
            Vec::new()
        };
        let name = app.new_field.name.clone();
        let field_type = app.new_field.field_type;
        let required = app.new_field.required;

        let result = app
            .schema_mut(doc_type)
            .add_custom(&name, field_type, required, options);
        match result {
            Ok(()) => {
                app.new_field = Default::default();
                app.form_error = None;
                if let Err(e) = app.save_schema(doc_type) {
                    app.handle_error(e);
                }
            }
            Err(e) => app.handle_error(e),
        }
    }
}

fn show_settings_tab(app: &mut DocumentManagerApp, ui: &mut egui::Ui) {
    ui.heading("Settings");
    ui.separator();
    ui.add_space(10.0);

    egui::ScrollArea::vertical().show(ui, |ui| {
        show_business_section(app, ui);
        ui.add_space(10.0);
        show_payment_accounts_section(app, ui);
        ui.add_space(10.0);
        show_general_section(app, ui);
    });
}

fn show_business_section(app: &mut DocumentManagerApp, ui: &mut egui::Ui) {
    let mut business_changed = false;
    let mut pick_logo = false;

    ui.group(|ui| {
        ui.strong("Business Details");
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Business Name:");
            if ui.text_edit_singleline(&mut app.business.name).changed() {
                business_changed = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Email:");
            if ui.text_edit_singleline(&mut app.business.email).changed() {
                business_changed = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Phone:");
            if ui.text_edit_singleline(&mut app.business.phone).changed() {
                business_changed = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Address:");
            if ui.text_edit_singleline(&mut app.business.address).changed() {
                business_changed = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Logo:");
            match &app.business.logo_path {
                Some(path) => ui.label(path),
                None => ui.label("none"),
            };
            if ui.button("📁 Choose…").clicked() {
                pick_logo = true;
            }
        });
    });

    if business_changed {
        if let Err(e) = app.save_business() {
            app.handle_error(e);
        }
    }
    if pick_logo {
        if let Err(e) = app.pick_logo() {
            app.handle_error(e);
        }
    }
}

fn show_payment_accounts_section(app: &mut DocumentManagerApp, ui: &mut egui::Ui) {
    ui.group(|ui| {
        ui.strong("Payment Accounts");
        ui.separator();

        if ui.button("➕ Add Account").clicked() {
            app.editing_account = Some(PaymentAccount::default());
            app.show_account_form = true;
        }

        for account in app.payment_accounts.clone().iter() {
            ui.horizontal(|ui| {
                ui.label(format!("{}", account.account_type));
                ui.strong(&account.account_name);
                ui.label(&account.account_number);
                if account.account_type == AccountType::Bank {
                    ui.label(&account.bank_name);
                    ui.label(&account.swift_code);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("🗑 Delete").clicked() {
                        if let Err(e) = app.delete_payment_account(account.id) {
                            app.handle_error(e);
                        }
                    }
                    if ui.button("✏ Edit").clicked() {
                        app.editing_account = Some(account.clone());
                        app.show_account_form = true;
                    }
                });
            });
        }
    });
}

fn show_general_section(app: &mut DocumentManagerApp, ui: &mut egui::Ui) {
    let mut settings_changed = false;

    ui.group(|ui| {
        ui.strong("General");
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Currency:");
            if ui.text_edit_singleline(&mut app.settings.currency).changed() {
                settings_changed = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Date Format:");
            egui::ComboBox::from_id_salt("date_format_select")
                .selected_text(app.settings.date_format.clone())
                .show_ui(ui, |ui| {
                    for format in ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"] {
                        if ui
                            .selectable_value(
                                &mut app.settings.date_format,
                                format.to_string(),
                                format,
                            )
                            .clicked()
                        {
                            settings_changed = true;
                        }
                    }
                });
        });

        ui.horizontal(|ui| {
            ui.label("Font Size:");
            if ui
                .add(egui::DragValue::new(&mut app.settings.font_size).range(10.0..=24.0))
                .changed()
            {
                settings_changed = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Theme:");
            egui::ComboBox::from_id_salt("theme_select")
                .selected_text(app.settings.theme.clone())
                .show_ui(ui, |ui| {
                    for theme in ["light", "dark"] {
                        if ui
                            .selectable_value(&mut app.settings.theme, theme.to_string(), theme)
                            .clicked()
                        {
                            settings_changed = true;
                        }
                    }
                });
        });

        ui.separator();
        ui.strong("Document Numbering");

        ui.horizontal(|ui| {
            ui.label("Quotation Prefix:");
            if ui
                .text_edit_singleline(&mut app.settings.quotation_prefix)
                .changed()
            {
                settings_changed = true;
            }
            ui.label("Start:");
            if ui
                .add(egui::DragValue::new(&mut app.settings.quotation_start))
                .changed()
            {
                settings_changed = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Invoice Prefix:");
            if ui
                .text_edit_singleline(&mut app.settings.invoice_prefix)
                .changed()
            {
                settings_changed = true;
            }
            ui.label("Start:");
            if ui
                .add(egui::DragValue::new(&mut app.settings.invoice_start))
                .changed()
            {
                settings_changed = true;
            }
        });
    });

    if settings_changed {
        if let Err(e) = app.save_settings() {
            app.handle_error(e);
        }
        app.apply_preferences(ui.ctx());
    }
}

fn show_account_form_window(app: &mut DocumentManagerApp, ctx: &egui::Context) {
    let mut open = true;
    egui::Window::new("Payment Account")
        .open(&mut open)
        .resizable(true)
        .show(ctx, |ui| {
            if let Some(account) = &mut app.editing_account {
                ui.horizontal(|ui| {
                    ui.label("Type:");
                    egui::ComboBox::from_id_salt("account_type_select")
                        .selected_text(format!("{}", account.account_type))
                        .show_ui(ui, |ui| {
                            ui.selectable_value(
                                &mut account.account_type,
                                AccountType::Bank,
                                "Bank",
                            );
                            ui.selectable_value(
                                &mut account.account_type,
                                AccountType::Paypal,
                                "PayPal",
                            );
                        });
                });

                ui.horizontal(|ui| {
                    ui.label("Account Name:");
                    ui.text_edit_singleline(&mut account.account_name);
                });

                ui.horizontal(|ui| {
                    if account.account_type == AccountType::Paypal {
                        ui.label("PayPal Email:");
                    } else {
                        ui.label("Account Number:");
                    }
                    ui.text_edit_singleline(&mut account.account_number);
                });

                if account.account_type == AccountType::Bank {
                    ui.horizontal(|ui| {
                        ui.label("Bank Name:");
                        ui.text_edit_singleline(&mut account.bank_name);
                    });

                    ui.horizontal(|ui| {
                        ui.label("SWIFT Code:");
                        ui.text_edit_singleline(&mut account.swift_code);
                    });
                }

                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("💾 Save").clicked() {
                        let account = app.editing_account.take().unwrap();
                        let result = if account.id == 0 {
                            app.add_payment_account(account)
                        } else {
                            app.update_payment_account(account)
                        };
                        if let Err(e) = result {
                            app.handle_error(e);
                        }
                        app.show_account_form = false;
                    }

                    if ui.button("❌ Cancel").clicked() {
                        app.editing_account = None;
                        app.show_account_form = false;
                    }
                });
            }
        });

    if !open {
        app.editing_account = None;
        app.show_account_form = false;
    }
}
