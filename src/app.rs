use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::numbering;
use crate::template::{FieldDef, FieldSchema};
use crate::types::{AccountType, DocumentStatus, DocumentType, FieldType, FieldValue};

/// Base point size the zoom factor is derived from.
pub const BASE_FONT_SIZE: f32 = 14.0;

const FONT_SIZE_KEY: &str = "font_size";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub company: Option<String>,
}

impl Default for Client {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            company: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentItem {
    pub id: i64,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    /// Tax percentage for the row, when the tax column is in use.
    pub tax: Option<f64>,
    /// Values of enabled custom columns, in schema order.
    pub custom_values: Vec<(String, FieldValue)>,
}

impl DocumentItem {
    /// The cell for a custom column, created with the column's default when
    /// the row has no value for it yet.
    pub fn value_mut(&mut self, field: &FieldDef) -> &mut FieldValue {
        let idx = match self.custom_values.iter().position(|(id, _)| id == &field.id) {
            Some(idx) => idx,
            None => {
                self.custom_values
                    .push((field.id.clone(), FieldValue::default_for(field.field_type)));
                self.custom_values.len() - 1
            }
        };
        &mut self.custom_values[idx].1
    }
}

impl Default for DocumentItem {
    fn default() -> Self {
        Self {
            id: 0,
            description: String::new(),
            quantity: 1.0,
            unit_price: 0.0,
            tax: None,
            custom_values: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub doc_type: DocumentType,
    pub document_number: String,
    pub title: String,
    pub client_name: String,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub notes: String,
    pub status: DocumentStatus,
    pub items: Vec<DocumentItem>,
}

impl Document {
    pub fn new(doc_type: DocumentType, document_number: String) -> Self {
        let today = Local::now().date_naive();
        let due_date = match doc_type {
            DocumentType::Invoice => Some(today + chrono::Duration::days(30)),
            DocumentType::Quotation => None,
        };
        Self {
            id: 0,
            doc_type,
            document_number,
            title: String::new(),
            client_name: String::new(),
            date: today,
            due_date,
            notes: String::new(),
            status: DocumentStatus::Draft,
            items: vec![DocumentItem::default()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAccount {
    pub id: i64,
    pub account_type: AccountType,
    pub account_name: String,
    pub account_number: String,
    // Bank-only fields, ignored for PayPal accounts.
    pub bank_name: String,
    pub swift_code: String,
}

impl Default for PaymentAccount {
    fn default() -> Self {
        Self {
            id: 0,
            account_type: AccountType::Bank,
            account_name: String::new(),
            account_number: String::new(),
            bank_name: String::new(),
            swift_code: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BusinessDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub currency: String,
    pub date_format: String,
    pub font_size: f32,
    pub theme: String,
    pub quotation_prefix: String,
    pub quotation_start: u64,
    pub invoice_prefix: String,
    pub invoice_start: u64,
}

impl UserSettings {
    pub fn numbering_for(&self, doc_type: DocumentType) -> (&str, u64) {
        match doc_type {
            DocumentType::Quotation => (&self.quotation_prefix, self.quotation_start),
            DocumentType::Invoice => (&self.invoice_prefix, self.invoice_start),
        }
    }
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            font_size: BASE_FONT_SIZE,
            theme: "light".to_string(),
            quotation_prefix: "QUO-".to_string(),
            quotation_start: 1000,
            invoice_prefix: "INV-".to_string(),
            invoice_start: 1000,
        }
    }
}

/// Rejects a draft before any store call is made.
pub fn validate_document(doc: &Document) -> AppResult<()> {
    if doc.title.trim().is_empty() {
        return Err(AppError::validation("Please enter a title before saving."));
    }
    if doc.items.is_empty() {
        return Err(AppError::validation(
            "Add at least one item row before saving.",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tab {
    Documents,
    Clients,
    Templates,
    Settings,
}

impl Default for Tab {
    fn default() -> Self {
        Tab::Documents
    }
}

/// Form buffer for the add-custom-field section of the Templates tab.
#[derive(Debug, Clone)]
pub struct NewFieldForm {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub options: String,
}

impl Default for NewFieldForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            field_type: FieldType::Text,
            required: false,
            options: String::new(),
        }
    }
}

pub struct DocumentManagerApp {
    pub clients: Vec<Client>,
    pub documents: Vec<Document>,
    pub schemas: HashMap<DocumentType, FieldSchema>,
    pub payment_accounts: Vec<PaymentAccount>,
    pub business: BusinessDetails,
    pub settings: UserSettings,

    // UI state
    pub selected_tab: Tab,
    pub document_filter: Option<DocumentType>,
    pub editing_client: Option<Client>,
    pub editing_document: Option<Document>,
    pub editing_account: Option<PaymentAccount>,
    pub show_client_form: bool,
    pub show_document_form: bool,
    pub show_account_form: bool,
    pub form_error: Option<String>,
    pub toast: Option<String>,
    pub template_doc_type: DocumentType,
    pub new_field: NewFieldForm,

    // Database
    pub db: Arc<Mutex<Database>>,
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("document-manager")
}

impl DocumentManagerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let dir = data_dir();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("could not create data directory {}: {e}", dir.display());
        }
        let db = Database::new(&dir.join("documents.db")).expect("Failed to open database");

        let app = Self::with_database(db);
        app.apply_preferences(&cc.egui_ctx);
        app
    }

    pub fn with_database(db: Database) -> Self {
        let db = Arc::new(Mutex::new(db));

        fn load_or_empty<T>(name: &str, result: AppResult<Vec<T>>) -> Vec<T> {
            match result {
                Ok(v) => v,
                Err(e) => {
                    error!("failed to load {name}: {e}");
                    Vec::new()
                }
            }
        }

        let (clients, documents, payment_accounts, business, settings, schemas, stored_font) = {
            let db = db.lock().unwrap();

            let clients = load_or_empty("clients", db.get_all_clients());
            let documents = load_or_empty("documents", db.get_all_documents());
            let payment_accounts =
                load_or_empty("payment accounts", db.get_all_payment_accounts());

            let business = db.get_business_details().unwrap_or_default().unwrap_or_default();
            let settings = db.get_user_settings().unwrap_or_default().unwrap_or_default();

            let mut schemas = HashMap::new();
            for doc_type in [DocumentType::Quotation, DocumentType::Invoice] {
                let schema = db
                    .get_field_schema(doc_type)
                    .unwrap_or_default()
                    .unwrap_or_default();
                schemas.insert(doc_type, schema);
            }

            let stored_font = db.get_setting(FONT_SIZE_KEY).unwrap_or_default();
            (clients, documents, payment_accounts, business, settings, schemas, stored_font)
        };

        let mut settings = settings;
        if let Some(size) = stored_font.and_then(|s| s.parse::<f32>().ok()) {
            settings.font_size = size;
        }

        Self {
            clients,
            documents,
            schemas,
            payment_accounts,
            business,
            settings,
            selected_tab: Tab::default(),
            document_filter: None,
            editing_client: None,
            editing_document: None,
            editing_account: None,
            show_client_form: false,
            show_document_form: false,
            show_account_form: false,
            form_error: None,
            toast: None,
            template_doc_type: DocumentType::Quotation,
            new_field: NewFieldForm::default(),
            db,
        }
    }

    /// Applies the persisted font size and theme as global style on load.
    pub fn apply_preferences(&self, ctx: &egui::Context) {
        ctx.set_zoom_factor(self.settings.font_size / BASE_FONT_SIZE);
        if self.settings.theme == "dark" {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }
    }

    /// Routes a failure to the right surface: validation errors stay inline
    /// in the open form, everything else becomes a toast and a log entry.
    pub fn handle_error(&mut self, err: AppError) {
        if err.is_validation() {
            self.form_error = Some(err.to_string());
        } else {
            error!("operation failed: {err}");
            self.toast = Some(format!("Operation failed: {err}"));
        }
    }

    // Client operations
    pub fn add_client(&mut self, mut client: Client) -> AppResult<()> {
        let id = self.db.lock().unwrap().save_client(&client)?;
        client.id = id;
        self.clients.push(client);
        self.clients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(())
    }

    pub fn update_client(&mut self, client: Client) -> AppResult<()> {
        self.db.lock().unwrap().save_client(&client)?;
        if let Some(pos) = self.clients.iter().position(|c| c.id == client.id) {
            self.clients[pos] = client;
        }
        Ok(())
    }

    pub fn delete_client(&mut self, id: i64) -> AppResult<()> {
        self.db.lock().unwrap().delete_client(id)?;
        self.clients.retain(|c| c.id != id);
        Ok(())
    }

    // Document numbering
    /// Next full number for the type. A store failure degrades silently to
    /// the configured start number.
    pub fn next_number_for(&self, doc_type: DocumentType) -> String {
        let (prefix, start) = self.settings.numbering_for(doc_type);
        match self.db.lock().unwrap().document_numbers(doc_type) {
            Ok(numbers) => {
                numbering::next_document_number(numbers.iter().map(String::as_str), prefix, start)
            }
            Err(e) => {
                warn!("could not read stored {doc_type} numbers, using start number: {e}");
                format!("{prefix}{start}")
            }
        }
    }

    pub fn new_document(&self, doc_type: DocumentType) -> Document {
        Document::new(doc_type, self.next_number_for(doc_type))
    }

    // Document operations
    /// Persists a draft. The header insert and the per-item inserts are
    /// separate sequential store calls; a partial failure leaves the rows
    /// already written in place and names the failing step.
    pub fn save_document(&mut self, mut doc: Document) -> AppResult<()> {
        validate_document(&doc)?;

        // drop cell values whose custom column has since been removed from
        // the schema, so stale pairs do not accumulate in the stored rows
        let schema = self.schema(doc.doc_type);
        for item in &mut doc.items {
            item.custom_values
                .retain(|(id, _)| schema.field(id).is_some());
        }

        let db = self.db.lock().unwrap();
        if doc.id == 0 {
            let id = db
                .insert_document(&doc)
                .map_err(|e| e.during("insert document"))?;
            doc.id = id;
            for item in &mut doc.items {
                item.id = db
                    .insert_item(id, item)
                    .map_err(|e| e.during("insert document item"))?;
            }
            drop(db);
            self.documents.insert(0, doc);
        } else {
            db.update_document(&doc)
                .map_err(|e| e.during("update document"))?;
            for item in &mut doc.items {
                if item.id == 0 {
                    item.id = db
                        .insert_item(doc.id, item)
                        .map_err(|e| e.during("insert document item"))?;
                } else {
                    db.update_item(doc.id, item)
                        .map_err(|e| e.during("update document item"))?;
                }
            }
            let keep: Vec<i64> = doc.items.iter().map(|i| i.id).collect();
            db.delete_items_except(doc.id, &keep)
                .map_err(|e| e.during("delete removed items"))?;
            drop(db);
            if let Some(pos) = self.documents.iter().position(|d| d.id == doc.id) {
                self.documents[pos] = doc;
            }
        }
        Ok(())
    }

    pub fn delete_document(&mut self, id: i64) -> AppResult<()> {
        self.db.lock().unwrap().delete_document(id)?;
        self.documents.retain(|d| d.id != id);
        Ok(())
    }

    /// Creates a new invoice from a quotation: fresh invoice number, items
    /// copied, status reset to Draft. The quotation is left untouched.
    pub fn convert_to_invoice(&mut self, quotation_id: i64) -> AppResult<()> {
        let quotation = self
            .documents
            .iter()
            .find(|d| d.id == quotation_id)
            .ok_or(AppError::NotFound("document"))?;
        if quotation.doc_type != DocumentType::Quotation {
            return Err(AppError::validation(
                "Only quotations can be converted to invoices.",
            ));
        }

        let mut invoice = Document::new(
            DocumentType::Invoice,
            self.next_number_for(DocumentType::Invoice),
        );
        invoice.title = quotation.title.clone();
        invoice.client_name = quotation.client_name.clone();
        invoice.notes = quotation.notes.clone();
        invoice.items = quotation
            .items
            .iter()
            .map(|item| DocumentItem {
                id: 0,
                ..item.clone()
            })
            .collect();

        self.save_document(invoice)
    }

    // Field template operations
    pub fn schema(&self, doc_type: DocumentType) -> &FieldSchema {
        &self.schemas[&doc_type]
    }

    pub fn schema_mut(&mut self, doc_type: DocumentType) -> &mut FieldSchema {
        self.schemas.entry(doc_type).or_default()
    }

    pub fn save_schema(&mut self, doc_type: DocumentType) -> AppResult<()> {
        let schema = self.schemas.entry(doc_type).or_default().clone();
        self.db.lock().unwrap().save_field_schema(doc_type, &schema)
    }

    // Settings operations
    pub fn save_business(&mut self) -> AppResult<()> {
        self.db.lock().unwrap().save_business_details(&self.business)
    }

    /// Copies a picked logo image into the app data directory and stores the
    /// resulting path on the business record. Returns false when the dialog
    /// was dismissed.
    pub fn pick_logo(&mut self) -> AppResult<bool> {
        let picked = rfd::FileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg"])
            .pick_file();
        let Some(path) = picked else {
            return Ok(false);
        };

        let dir = data_dir().join("logos");
        std::fs::create_dir_all(&dir)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "logo.png".to_string());
        let dest = dir.join(file_name);
        std::fs::copy(&path, &dest)?;

        self.business.logo_path = Some(dest.to_string_lossy().into_owned());
        self.save_business()?;
        Ok(true)
    }

    pub fn save_settings(&mut self) -> AppResult<()> {
        let db = self.db.lock().unwrap();
        db.save_user_settings(&self.settings)?;
        db.save_setting(FONT_SIZE_KEY, &self.settings.font_size.to_string())?;
        Ok(())
    }

    // Payment account operations
    pub fn add_payment_account(&mut self, mut account: PaymentAccount) -> AppResult<()> {
        if account.account_type == AccountType::Paypal {
            // fields beyond name/number carry no meaning for PayPal
            account.bank_name.clear();
            account.swift_code.clear();
        }
        let id = self.db.lock().unwrap().save_payment_account(&account)?;
        account.id = id;
        self.payment_accounts.push(account);
        Ok(())
    }

    pub fn update_payment_account(&mut self, mut account: PaymentAccount) -> AppResult<()> {
        if account.account_type == AccountType::Paypal {
            account.bank_name.clear();
            account.swift_code.clear();
        }
        self.db.lock().unwrap().save_payment_account(&account)?;
        if let Some(pos) = self.payment_accounts.iter().position(|a| a.id == account.id) {
            self.payment_accounts[pos] = account;
        }
        Ok(())
    }

    pub fn delete_payment_account(&mut self, id: i64) -> AppResult<()> {
        self.db.lock().unwrap().delete_payment_account(id)?;
        self.payment_accounts.retain(|a| a.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_app() -> (TempDir, DocumentManagerApp) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(&dir.path().join("test.db")).unwrap();
        (dir, DocumentManagerApp::with_database(db))
    }

    fn draft(app: &DocumentManagerApp) -> Document {
        let mut doc = app.new_document(DocumentType::Quotation);
        doc.title = "Garden fence".to_string();
        doc.client_name = "Acme GmbH".to_string();
        doc.items[0].description = "Posts".to_string();
        doc.items[0].quantity = 10.0;
        doc.items[0].unit_price = 12.5;
        doc
    }

    #[test]
    fn empty_title_rejected_before_any_store_call() {
        let (_dir, mut app) = open_app();
        let mut doc = draft(&app);
        doc.title = "  ".to_string();

        let err = app.save_document(doc).unwrap_err();
        assert!(err.is_validation());
        assert!(app.documents.is_empty());
        assert!(app.db.lock().unwrap().get_all_documents().unwrap().is_empty());
    }

    #[test]
    fn document_without_items_rejected() {
        let (_dir, mut app) = open_app();
        let mut doc = draft(&app);
        doc.items.clear();
        assert!(app.save_document(doc).unwrap_err().is_validation());
    }

    #[test]
    fn first_number_uses_configured_start() {
        let (_dir, app) = open_app();
        assert_eq!(app.next_number_for(DocumentType::Invoice), "INV-1000");
        assert_eq!(app.next_number_for(DocumentType::Quotation), "QUO-1000");
    }

    #[test]
    fn numbers_increment_from_highest_stored() {
        let (_dir, mut app) = open_app();
        let mut doc = draft(&app);
        doc.document_number = "QUO-1042".to_string();
        app.save_document(doc).unwrap();

        assert_eq!(app.next_number_for(DocumentType::Quotation), "QUO-1043");
        // the other type is unaffected
        assert_eq!(app.next_number_for(DocumentType::Invoice), "INV-1000");
    }

    #[test]
    fn cancel_discards_the_draft_and_keeps_the_committed_document() {
        let (_dir, mut app) = open_app();
        app.save_document(draft(&app)).unwrap();
        let committed = app.documents[0].clone();

        // edit: deep-copied draft, mutated freely
        app.editing_document = Some(committed.clone());
        {
            let d = app.editing_document.as_mut().unwrap();
            d.title = "Changed".to_string();
            d.items[0].quantity = 99.0;
            d.items.push(DocumentItem::default());
        }

        // cancel
        app.editing_document = None;
        assert_eq!(app.documents[0], committed);
        assert_eq!(
            app.db.lock().unwrap().get_all_documents().unwrap()[0],
            committed
        );
    }

    #[test]
    fn editing_updates_scalars_and_items_individually() {
        let (_dir, mut app) = open_app();
        app.save_document(draft(&app)).unwrap();

        let mut edited = app.documents[0].clone();
        edited.title = "Garden fence v2".to_string();
        edited.items[0].unit_price = 15.0;
        edited.items.push(DocumentItem {
            description: "Paint".to_string(),
            quantity: 2.0,
            unit_price: 30.0,
            ..DocumentItem::default()
        });
        app.save_document(edited).unwrap();

        let stored = &app.db.lock().unwrap().get_all_documents().unwrap()[0];
        assert_eq!(stored.title, "Garden fence v2");
        assert_eq!(stored.items.len(), 2);
        assert_eq!(stored.items[0].unit_price, 15.0);
    }

    #[test]
    fn removed_rows_disappear_on_save() {
        let (_dir, mut app) = open_app();
        let mut doc = draft(&app);
        doc.items.push(DocumentItem {
            description: "Extra".to_string(),
            ..DocumentItem::default()
        });
        app.save_document(doc).unwrap();

        let mut edited = app.documents[0].clone();
        edited.items.remove(1);
        app.save_document(edited).unwrap();

        let stored = &app.db.lock().unwrap().get_all_documents().unwrap()[0];
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.items[0].description, "Posts");
    }

    #[test]
    fn values_for_removed_custom_fields_are_pruned_on_save() {
        let (_dir, mut app) = open_app();
        app.schema_mut(DocumentType::Quotation)
            .add_custom("Color", FieldType::Text, false, Vec::new())
            .unwrap();

        let mut doc = draft(&app);
        doc.items[0]
            .custom_values
            .push(("custom_1".to_string(), FieldValue::Text("red".to_string())));
        app.save_document(doc).unwrap();
        assert_eq!(app.documents[0].items[0].custom_values.len(), 1);

        app.schema_mut(DocumentType::Quotation)
            .remove("custom_1")
            .unwrap();
        let edited = app.documents[0].clone();
        app.save_document(edited).unwrap();

        assert!(app.documents[0].items[0].custom_values.is_empty());
        let stored = &app.db.lock().unwrap().get_all_documents().unwrap()[0];
        assert!(stored.items[0].custom_values.is_empty());
    }

    #[test]
    fn convert_quotation_to_invoice() {
        let (_dir, mut app) = open_app();
        app.save_document(draft(&app)).unwrap();
        let quotation_id = app.documents[0].id;

        app.convert_to_invoice(quotation_id).unwrap();

        let invoice = app
            .documents
            .iter()
            .find(|d| d.doc_type == DocumentType::Invoice)
            .unwrap();
        assert_eq!(invoice.document_number, "INV-1000");
        assert_eq!(invoice.status, DocumentStatus::Draft);
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.title, "Garden fence");

        // quotation untouched
        let quotation = app.documents.iter().find(|d| d.id == quotation_id).unwrap();
        assert_eq!(quotation.doc_type, DocumentType::Quotation);
    }

    #[test]
    fn converting_an_invoice_is_rejected() {
        let (_dir, mut app) = open_app();
        let mut doc = draft(&app);
        doc.doc_type = DocumentType::Invoice;
        doc.document_number = "INV-1000".to_string();
        app.save_document(doc).unwrap();
        let id = app.documents[0].id;

        assert!(app.convert_to_invoice(id).unwrap_err().is_validation());
    }

    #[test]
    fn paypal_account_drops_bank_fields() {
        let (_dir, mut app) = open_app();
        app.add_payment_account(PaymentAccount {
            account_type: AccountType::Paypal,
            account_name: "Shop".to_string(),
            account_number: "pay@shop.example".to_string(),
            bank_name: "ignored".to_string(),
            swift_code: "ignored".to_string(),
            ..PaymentAccount::default()
        })
        .unwrap();

        assert!(app.payment_accounts[0].bank_name.is_empty());
        assert!(app.payment_accounts[0].swift_code.is_empty());
    }

    #[test]
    fn font_size_preference_survives_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");

        let mut app = DocumentManagerApp::with_database(Database::new(&path).unwrap());
        app.settings.font_size = 18.0;
        app.save_settings().unwrap();
        drop(app);

        let app = DocumentManagerApp::with_database(Database::new(&path).unwrap());
        assert_eq!(app.settings.font_size, 18.0);
    }
}
