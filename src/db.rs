use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};

use crate::app::{BusinessDetails, Client, Document, DocumentItem, PaymentAccount, UserSettings};
use crate::error::AppResult;
use crate::template::FieldSchema;
use crate::types::{AccountType, DocumentStatus, DocumentType, FieldValue};

const DATE_FMT: &str = "%Y-%m-%d";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(db_path: &Path) -> AppResult<Self> {
        let conn = Connection::open(db_path)?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> AppResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS clients (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                address TEXT NOT NULL,
                company TEXT
            );

            CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY,
                doc_type TEXT NOT NULL,
                document_number TEXT NOT NULL,
                title TEXT NOT NULL,
                client_name TEXT NOT NULL,
                date TEXT NOT NULL,
                due_date TEXT,
                notes TEXT NOT NULL,
                status TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS document_items (
                id INTEGER PRIMARY KEY,
                document_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                quantity REAL NOT NULL,
                unit_price REAL NOT NULL,
                tax REAL,
                custom_values TEXT NOT NULL,
                FOREIGN KEY (document_id) REFERENCES documents(id)
            );

            CREATE TABLE IF NOT EXISTS business_details (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                address TEXT NOT NULL,
                logo_path TEXT
            );

            CREATE TABLE IF NOT EXISTS payment_accounts (
                id INTEGER PRIMARY KEY,
                account_type TEXT NOT NULL,
                account_name TEXT NOT NULL,
                account_number TEXT NOT NULL,
                bank_name TEXT NOT NULL,
                swift_code TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS user_settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                currency TEXT NOT NULL,
                date_format TEXT NOT NULL,
                font_size REAL NOT NULL,
                theme TEXT NOT NULL,
                quotation_prefix TEXT NOT NULL,
                quotation_start INTEGER NOT NULL,
                invoice_prefix TEXT NOT NULL,
                invoice_start INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS document_templates (
                doc_type TEXT PRIMARY KEY,
                schema TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    // Settings operations (local key-value preferences)
    pub fn save_setting(&self, key: &str, value: &str) -> AppResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> AppResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    // Client operations
    pub fn save_client(&self, client: &Client) -> AppResult<i64> {
        if client.id == 0 {
            self.conn.execute(
                r#"INSERT INTO clients (name, email, phone, address, company)
                VALUES (?1, ?2, ?3, ?4, ?5)"#,
                params![
                    client.name,
                    client.email,
                    client.phone,
                    client.address,
                    client.company,
                ],
            )?;
            Ok(self.conn.last_insert_rowid())
        } else {
            self.conn.execute(
                r#"UPDATE clients SET
                name = ?1, email = ?2, phone = ?3, address = ?4, company = ?5
                WHERE id = ?6"#,
                params![
                    client.name,
                    client.email,
                    client.phone,
                    client.address,
                    client.company,
                    client.id,
                ],
            )?;
            Ok(client.id)
        }
    }

    pub fn get_all_clients(&self) -> AppResult<Vec<Client>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, phone, address, company FROM clients ORDER BY name",
        )?;

        let clients = stmt
            .query_map([], |row| {
                Ok(Client {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    phone: row.get(3)?,
                    address: row.get(4)?,
                    company: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(clients)
    }

    pub fn delete_client(&self, id: i64) -> AppResult<()> {
        self.conn
            .execute("DELETE FROM clients WHERE id = ?1", params![id])?;
        Ok(())
    }

    // Document operations. Header and items are written in separate
    // statements; the item insert depends on the generated document id.
    pub fn insert_document(&self, doc: &Document) -> AppResult<i64> {
        self.conn.execute(
            r#"INSERT INTO documents
            (doc_type, document_number, title, client_name, date, due_date, notes, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![
                doc.doc_type.as_str(),
                doc.document_number,
                doc.title,
                doc.client_name,
                doc.date.format(DATE_FMT).to_string(),
                doc.due_date.map(|d| d.format(DATE_FMT).to_string()),
                doc.notes,
                doc.status.as_str(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update_document(&self, doc: &Document) -> AppResult<()> {
        self.conn.execute(
            r#"UPDATE documents SET
            doc_type = ?1, document_number = ?2, title = ?3, client_name = ?4,
            date = ?5, due_date = ?6, notes = ?7, status = ?8
            WHERE id = ?9"#,
            params![
                doc.doc_type.as_str(),
                doc.document_number,
                doc.title,
                doc.client_name,
                doc.date.format(DATE_FMT).to_string(),
                doc.due_date.map(|d| d.format(DATE_FMT).to_string()),
                doc.notes,
                doc.status.as_str(),
                doc.id,
            ],
        )?;
        Ok(())
    }

    pub fn insert_item(&self, document_id: i64, item: &DocumentItem) -> AppResult<i64> {
        let custom_json = serde_json::to_string(&item.custom_values)?;
        self.conn.execute(
            r#"INSERT INTO document_items
            (document_id, description, quantity, unit_price, tax, custom_values)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![
                document_id,
                item.description,
                item.quantity,
                item.unit_price,
                item.tax,
                custom_json,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update_item(&self, document_id: i64, item: &DocumentItem) -> AppResult<()> {
        let custom_json = serde_json::to_string(&item.custom_values)?;
        self.conn.execute(
            r#"UPDATE document_items SET
            description = ?1, quantity = ?2, unit_price = ?3, tax = ?4, custom_values = ?5
            WHERE id = ?6 AND document_id = ?7"#,
            params![
                item.description,
                item.quantity,
                item.unit_price,
                item.tax,
                custom_json,
                item.id,
                document_id,
            ],
        )?;
        Ok(())
    }

    /// Drops item rows that are no longer present in the edited document.
    pub fn delete_items_except(&self, document_id: i64, keep: &[i64]) -> AppResult<()> {
        if keep.is_empty() {
            self.conn.execute(
                "DELETE FROM document_items WHERE document_id = ?1",
                params![document_id],
            )?;
            return Ok(());
        }
        let placeholders = vec!["?"; keep.len()].join(", ");
        let sql = format!(
            "DELETE FROM document_items WHERE document_id = ? AND id NOT IN ({placeholders})"
        );
        let mut values: Vec<i64> = vec![document_id];
        values.extend_from_slice(keep);
        self.conn
            .execute(&sql, rusqlite::params_from_iter(values))?;
        Ok(())
    }

    pub fn get_all_documents(&self) -> AppResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, doc_type, document_number, title, client_name, date, due_date, notes, status
               FROM documents ORDER BY date DESC, id DESC"#,
        )?;

        let headers = stmt
            .query_map([], |row| {
                let doc_type: String = row.get(1)?;
                let date: String = row.get(5)?;
                let due_date: Option<String> = row.get(6)?;
                let status: String = row.get(8)?;
                Ok(Document {
                    id: row.get(0)?,
                    doc_type: DocumentType::parse(&doc_type),
                    document_number: row.get(2)?,
                    title: row.get(3)?,
                    client_name: row.get(4)?,
                    date: NaiveDate::parse_from_str(&date, DATE_FMT).unwrap_or_default(),
                    due_date: due_date
                        .and_then(|d| NaiveDate::parse_from_str(&d, DATE_FMT).ok()),
                    notes: row.get(7)?,
                    status: DocumentStatus::parse(&status),
                    items: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut documents = Vec::with_capacity(headers.len());
        for mut doc in headers {
            doc.items = self.get_items(doc.id)?;
            documents.push(doc);
        }
        Ok(documents)
    }

    fn get_items(&self, document_id: i64) -> AppResult<Vec<DocumentItem>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, description, quantity, unit_price, tax, custom_values
               FROM document_items WHERE document_id = ?1 ORDER BY id"#,
        )?;

        let rows = stmt
            .query_map(params![document_id], |row| {
                let custom_json: String = row.get(5)?;
                Ok((
                    DocumentItem {
                        id: row.get(0)?,
                        description: row.get(1)?,
                        quantity: row.get(2)?,
                        unit_price: row.get(3)?,
                        tax: row.get(4)?,
                        custom_values: Vec::new(),
                    },
                    custom_json,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut items = Vec::with_capacity(rows.len());
        for (mut item, custom_json) in rows {
            item.custom_values =
                serde_json::from_str::<Vec<(String, FieldValue)>>(&custom_json)?;
            items.push(item);
        }
        Ok(items)
    }

    /// Deletes a document and cascades to its items.
    pub fn delete_document(&self, id: i64) -> AppResult<()> {
        self.conn.execute(
            "DELETE FROM document_items WHERE document_id = ?1",
            params![id],
        )?;
        self.conn
            .execute("DELETE FROM documents WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// All stored numbers for a document type, for deriving the next one.
    pub fn document_numbers(&self, doc_type: DocumentType) -> AppResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT document_number FROM documents WHERE doc_type = ?1")?;
        let numbers = stmt
            .query_map(params![doc_type.as_str()], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(numbers)
    }

    // Business details (singleton row)
    pub fn save_business_details(&self, business: &BusinessDetails) -> AppResult<()> {
        self.conn.execute(
            r#"INSERT OR REPLACE INTO business_details
            (id, name, email, phone, address, logo_path)
            VALUES (1, ?1, ?2, ?3, ?4, ?5)"#,
            params![
                business.name,
                business.email,
                business.phone,
                business.address,
                business.logo_path,
            ],
        )?;
        Ok(())
    }

    pub fn get_business_details(&self) -> AppResult<Option<BusinessDetails>> {
        let business = self
            .conn
            .query_row(
                "SELECT name, email, phone, address, logo_path FROM business_details WHERE id = 1",
                [],
                |row| {
                    Ok(BusinessDetails {
                        name: row.get(0)?,
                        email: row.get(1)?,
                        phone: row.get(2)?,
                        address: row.get(3)?,
                        logo_path: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(business)
    }

    // Payment account operations
    pub fn save_payment_account(&self, account: &PaymentAccount) -> AppResult<i64> {
        if account.id == 0 {
            self.conn.execute(
                r#"INSERT INTO payment_accounts
                (account_type, account_name, account_number, bank_name, swift_code)
                VALUES (?1, ?2, ?3, ?4, ?5)"#,
                params![
                    account.account_type.as_str(),
                    account.account_name,
                    account.account_number,
                    account.bank_name,
                    account.swift_code,
                ],
            )?;
            Ok(self.conn.last_insert_rowid())
        } else {
            self.conn.execute(
                r#"UPDATE payment_accounts SET
                account_type = ?1, account_name = ?2, account_number = ?3,
                bank_name = ?4, swift_code = ?5
                WHERE id = ?6"#,
                params![
                    account.account_type.as_str(),
                    account.account_name,
                    account.account_number,
                    account.bank_name,
                    account.swift_code,
                    account.id,
                ],
            )?;
            Ok(account.id)
        }
    }

    pub fn get_all_payment_accounts(&self) -> AppResult<Vec<PaymentAccount>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, account_type, account_name, account_number, bank_name, swift_code
               FROM payment_accounts ORDER BY account_name"#,
        )?;

        let accounts = stmt
            .query_map([], |row| {
                let account_type: String = row.get(1)?;
                Ok(PaymentAccount {
                    id: row.get(0)?,
                    account_type: AccountType::parse(&account_type),
                    account_name: row.get(2)?,
                    account_number: row.get(3)?,
                    bank_name: row.get(4)?,
                    swift_code: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(accounts)
    }

    pub fn delete_payment_account(&self, id: i64) -> AppResult<()> {
        self.conn
            .execute("DELETE FROM payment_accounts WHERE id = ?1", params![id])?;
        Ok(())
    }

    // User settings (singleton row)
    pub fn save_user_settings(&self, settings: &UserSettings) -> AppResult<()> {
        self.conn.execute(
            r#"INSERT OR REPLACE INTO user_settings
            (id, currency, date_format, font_size, theme,
             quotation_prefix, quotation_start, invoice_prefix, invoice_start)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![
                settings.currency,
                settings.date_format,
                settings.font_size,
                settings.theme,
                settings.quotation_prefix,
                settings.quotation_start as i64,
                settings.invoice_prefix,
                settings.invoice_start as i64,
            ],
        )?;
        Ok(())
    }

    pub fn get_user_settings(&self) -> AppResult<Option<UserSettings>> {
        let settings = self
            .conn
            .query_row(
                r#"SELECT currency, date_format, font_size, theme,
                   quotation_prefix, quotation_start, invoice_prefix, invoice_start
                   FROM user_settings WHERE id = 1"#,
                [],
                |row| {
                    Ok(UserSettings {
                        currency: row.get(0)?,
                        date_format: row.get(1)?,
                        font_size: row.get(2)?,
                        theme: row.get(3)?,
                        quotation_prefix: row.get(4)?,
                        quotation_start: row.get::<_, i64>(5)? as u64,
                        invoice_prefix: row.get(6)?,
                        invoice_start: row.get::<_, i64>(7)? as u64,
                    })
                },
            )
            .optional()?;
        Ok(settings)
    }

    // Field template blobs, one per document type
    pub fn save_field_schema(&self, doc_type: DocumentType, schema: &FieldSchema) -> AppResult<()> {
        let json = serde_json::to_string(schema)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO document_templates (doc_type, schema) VALUES (?1, ?2)",
            params![doc_type.as_str(), json],
        )?;
        Ok(())
    }

    pub fn get_field_schema(&self, doc_type: DocumentType) -> AppResult<Option<FieldSchema>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT schema FROM document_templates WHERE doc_type = ?1",
                params![doc_type.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn open_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    fn sample_document(doc_type: DocumentType, number: &str) -> Document {
        Document {
            id: 0,
            doc_type,
            document_number: number.to_string(),
            title: "Office refit".to_string(),
            client_name: "Acme GmbH".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 4, 14),
            notes: "Net 30".to_string(),
            status: DocumentStatus::Draft,
            items: vec![DocumentItem {
                id: 0,
                description: "Desks".to_string(),
                quantity: 4.0,
                unit_price: 250.0,
                tax: Some(7.7),
                custom_values: vec![(
                    "custom_1".to_string(),
                    FieldValue::Text("oak".to_string()),
                )],
            }],
        }
    }

    #[test]
    fn client_roundtrip() {
        let (_dir, db) = open_db();
        let mut client = Client {
            id: 0,
            name: "Acme GmbH".to_string(),
            email: "billing@acme.example".to_string(),
            phone: "+41 44 000 00 00".to_string(),
            address: "Bahnhofstrasse 1, 8001 Zurich".to_string(),
            company: Some("Acme Holding".to_string()),
        };
        client.id = db.save_client(&client).unwrap();
        assert!(client.id > 0);

        client.email = "accounts@acme.example".to_string();
        db.save_client(&client).unwrap();

        let clients = db.get_all_clients().unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].email, "accounts@acme.example");

        db.delete_client(client.id).unwrap();
        assert!(db.get_all_clients().unwrap().is_empty());
    }

    #[test]
    fn document_roundtrip_with_items() {
        let (_dir, db) = open_db();
        let doc = sample_document(DocumentType::Invoice, "INV-1001");
        let id = db.insert_document(&doc).unwrap();
        for item in &doc.items {
            db.insert_item(id, item).unwrap();
        }

        let stored = db.get_all_documents().unwrap();
        assert_eq!(stored.len(), 1);
        let stored = &stored[0];
        assert_eq!(stored.document_number, "INV-1001");
        assert_eq!(stored.due_date, doc.due_date);
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.items[0].tax, Some(7.7));
        assert_eq!(
            stored.items[0].custom_values,
            vec![("custom_1".to_string(), FieldValue::Text("oak".to_string()))]
        );
    }

    #[test]
    fn delete_document_cascades_to_items() {
        let (_dir, db) = open_db();
        let doc = sample_document(DocumentType::Quotation, "Q-1");
        let id = db.insert_document(&doc).unwrap();
        db.insert_item(id, &doc.items[0]).unwrap();

        db.delete_document(id).unwrap();
        assert!(db.get_all_documents().unwrap().is_empty());
        assert!(db.get_items(id).unwrap().is_empty());
    }

    #[test]
    fn delete_items_except_keeps_listed_rows() {
        let (_dir, db) = open_db();
        let doc = sample_document(DocumentType::Invoice, "INV-1");
        let id = db.insert_document(&doc).unwrap();
        let keep = db.insert_item(id, &doc.items[0]).unwrap();
        let stale = db.insert_item(id, &doc.items[0]).unwrap();

        db.delete_items_except(id, &[keep]).unwrap();
        let items = db.get_items(id).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, keep);
        assert_ne!(items[0].id, stale);
    }

    #[test]
    fn document_numbers_are_scoped_by_type() {
        let (_dir, db) = open_db();
        db.insert_document(&sample_document(DocumentType::Invoice, "INV-5"))
            .unwrap();
        db.insert_document(&sample_document(DocumentType::Quotation, "Q-9"))
            .unwrap();

        let numbers = db.document_numbers(DocumentType::Invoice).unwrap();
        assert_eq!(numbers, vec!["INV-5".to_string()]);
    }

    #[test]
    fn singleton_rows_upsert() {
        let (_dir, db) = open_db();
        assert!(db.get_user_settings().unwrap().is_none());

        let mut settings = UserSettings::default();
        db.save_user_settings(&settings).unwrap();
        settings.currency = "EUR".to_string();
        db.save_user_settings(&settings).unwrap();

        let stored = db.get_user_settings().unwrap().unwrap();
        assert_eq!(stored.currency, "EUR");

        let business = BusinessDetails {
            name: "My Shop".to_string(),
            ..BusinessDetails::default()
        };
        db.save_business_details(&business).unwrap();
        db.save_business_details(&business).unwrap();
        assert_eq!(db.get_business_details().unwrap().unwrap().name, "My Shop");
    }

    #[test]
    fn field_schema_blob_roundtrip() {
        let (_dir, db) = open_db();
        assert!(db.get_field_schema(DocumentType::Quotation).unwrap().is_none());

        let mut schema = FieldSchema::default();
        schema
            .add_custom("Color", FieldType::Select, false, vec!["red".to_string()])
            .unwrap();
        db.save_field_schema(DocumentType::Quotation, &schema).unwrap();

        let stored = db.get_field_schema(DocumentType::Quotation).unwrap().unwrap();
        assert_eq!(stored, schema);
        assert!(db.get_field_schema(DocumentType::Invoice).unwrap().is_none());
    }

    #[test]
    fn settings_key_value_roundtrip() {
        let (_dir, db) = open_db();
        assert_eq!(db.get_setting("font_size").unwrap(), None);
        db.save_setting("font_size", "16").unwrap();
        db.save_setting("font_size", "18").unwrap();
        assert_eq!(db.get_setting("font_size").unwrap().as_deref(), Some("18"));
    }

    #[test]
    fn paypal_account_roundtrip() {
        let (_dir, db) = open_db();
        let mut account = PaymentAccount {
            id: 0,
            account_type: AccountType::Paypal,
            account_name: "Shop PayPal".to_string(),
            account_number: "pay@shop.example".to_string(),
            bank_name: String::new(),
            swift_code: String::new(),
        };
        account.id = db.save_payment_account(&account).unwrap();

        let accounts = db.get_all_payment_accounts().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account_type, AccountType::Paypal);

        db.delete_payment_account(account.id).unwrap();
        assert!(db.get_all_payment_accounts().unwrap().is_empty());
    }
}
