//! Membership invoice creation, lookup and export
//!
//! Invoice creation is the one write in the system with a real
//! concurrency constraint: two checkouts racing for the next invoice
//! number must never both commit with the same one. The whole
//! assignment runs in a single transaction that first locks the
//! session's branch row (`FOR UPDATE`), which serializes number
//! allocation per
//! branch; a `UNIQUE (branch_id, invoice_number)` constraint backstops
//! the discipline. A failed transaction rolls back completely, so no
//! number is consumed by a failed attempt.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::billing::{calculate_invoice_totals, invoice_code, next_invoice_number, LineItem};
use shared::models::{BranchInfo, Invoice, InvoiceItem};
use shared::periods::lookback_start;
use shared::types::InvoiceItemType;
use shared::validation::{
    validate_customer_name, validate_indian_phone, validate_non_negative_amount,
    validate_positive_amount,
};
use shared::{CUSTOM_PLAN_CODE, PERSONAL_TRAINER_PLAN_CODE};

/// Invoice service
#[derive(Clone)]
pub struct InvoiceService {
    db: PgPool,
}

/// Input for creating an invoice
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceInput {
    pub customer_name: String,
    pub customer_phone: String,
    pub membership: MembershipSelection,
    pub custom_membership: Option<CustomMembership>,
    pub registration_fee: Option<Decimal>,
    #[serde(default)]
    pub include_personal_trainer: bool,
}

/// Which membership plan the invoice is for
#[derive(Debug, Deserialize)]
pub struct MembershipSelection {
    pub plan_code: String,
}

/// Caller-specified membership when the plan code is `CUSTOM`
#[derive(Debug, Deserialize)]
pub struct CustomMembership {
    pub label: String,
    pub amount: Decimal,
    pub duration_days: Option<i32>,
}

/// Query parameters for listing/exporting invoices
#[derive(Debug, Default, Deserialize)]
pub struct InvoiceListQuery {
    pub search: Option<String>,
    /// today | week | month (default) | all
    pub range: Option<String>,
}

/// Compact invoice row for list views
#[derive(Debug, Serialize, FromRow)]
pub struct InvoiceSummary {
    pub id: Uuid,
    pub invoice_number: i32,
    pub invoice_code: String,
    pub invoice_date: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    pub grand_total: Decimal,
    pub is_void: bool,
}

#[derive(FromRow)]
struct BranchRow {
    id: Uuid,
    name: String,
    address: Option<String>,
    phone: Option<String>,
    gstin: Option<String>,
    logo_url: Option<String>,
}

#[derive(FromRow)]
struct InvoiceHeaderRow {
    id: Uuid,
    branch_id: Uuid,
    invoice_number: i32,
    invoice_code: String,
    invoice_date: DateTime<Utc>,
    customer_name: String,
    customer_phone: String,
    taxable_subtotal: Decimal,
    cgst_amount: Decimal,
    sgst_amount: Decimal,
    total_gst: Decimal,
    nontaxable_subtotal: Decimal,
    grand_total: Decimal,
    is_void: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct InvoiceItemRow {
    id: Uuid,
    invoice_id: Uuid,
    item_type: String,
    description: String,
    duration_days: Option<i32>,
    quantity: i32,
    base_amount: Decimal,
    line_total_before_tax: Decimal,
    is_taxable: bool,
    gst_rate: Decimal,
    plan_id: Option<Uuid>,
}

#[derive(FromRow)]
struct PlanRow {
    id: Uuid,
    name: String,
    duration_days: Option<i32>,
    base_amount: Decimal,
    is_taxable: bool,
    gst_rate: Decimal,
}

/// An invoice line resolved from input, before persistence
struct PendingItem {
    item_type: InvoiceItemType,
    description: String,
    duration_days: Option<i32>,
    base_amount: Decimal,
    is_taxable: bool,
    gst_rate: Decimal,
    plan_id: Option<Uuid>,
}

impl InvoiceService {
    /// Create a new InvoiceService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an invoice: resolve plan pricing, compute GST totals,
    /// assign the next invoice number and persist header plus items in
    /// one transaction. `branch_id` comes from the login session.
    pub async fn create_invoice(
        &self,
        branch_id: Uuid,
        input: CreateInvoiceInput,
    ) -> AppResult<Invoice> {
        let customer_name = input.customer_name.trim().to_string();
        let customer_phone = input.customer_phone.trim().to_string();

        validate_customer_name(&customer_name)
            .map_err(|msg| AppError::validation("customer_name", msg))?;
        validate_indian_phone(&customer_phone)
            .map_err(|msg| AppError::validation("customer_phone", msg))?;

        let items = self.resolve_items(&input).await?;

        let calc_items: Vec<LineItem> = items
            .iter()
            .map(|item| LineItem {
                amount: item.base_amount,
                is_taxable: item.is_taxable,
                gst_rate: item.gst_rate,
            })
            .collect();
        let totals = calculate_invoice_totals(&calc_items);

        let mut tx = self.db.begin().await?;

        // Lock the branch row for the duration of the transaction.
        // Number allocation below is read-max-then-insert; the lock
        // serializes concurrent creators on the same branch.
        let branch = sqlx::query_as::<_, BranchRow>(
            r#"
            SELECT id, name, address, phone, gstin, logo_url
            FROM branches
            WHERE id = $1 AND is_active = TRUE
            FOR UPDATE
            "#,
        )
        .bind(branch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::Configuration("Session branch is missing or inactive".to_string())
        })?;

        let last_number = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(invoice_number) FROM invoices WHERE branch_id = $1",
        )
        .bind(branch.id)
        .fetch_one(&mut *tx)
        .await?;

        let number = next_invoice_number(last_number);
        let code = invoice_code(number);
        let invoice_date = Utc::now();

        let header = sqlx::query_as::<_, InvoiceHeaderRow>(
            r#"
            INSERT INTO invoices (
                branch_id, invoice_number, invoice_code, invoice_date,
                customer_name, customer_phone,
                taxable_subtotal, cgst_amount, sgst_amount, total_gst,
                nontaxable_subtotal, grand_total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, branch_id, invoice_number, invoice_code, invoice_date,
                      customer_name, customer_phone,
                      taxable_subtotal, cgst_amount, sgst_amount, total_gst,
                      nontaxable_subtotal, grand_total, is_void, created_at, updated_at
            "#,
        )
        .bind(branch.id)
        .bind(number)
        .bind(&code)
        .bind(invoice_date)
        .bind(&customer_name)
        .bind(&customer_phone)
        .bind(totals.taxable_subtotal)
        .bind(totals.cgst_amount)
        .bind(totals.sgst_amount)
        .bind(totals.total_gst)
        .bind(totals.nontaxable_subtotal)
        .bind(totals.grand_total)
        .fetch_one(&mut *tx)
        .await?;

        let mut persisted_items = Vec::with_capacity(items.len());
        for item in &items {
            let row = sqlx::query_as::<_, InvoiceItemRow>(
                r#"
                INSERT INTO invoice_items (
                    invoice_id, item_type, description, duration_days, quantity,
                    base_amount, line_total_before_tax, is_taxable, gst_rate, plan_id
                )
                VALUES ($1, $2, $3, $4, 1, $5, $5, $6, $7, $8)
                RETURNING id, invoice_id, item_type, description, duration_days, quantity,
                          base_amount, line_total_before_tax, is_taxable, gst_rate, plan_id
                "#,
            )
            .bind(header.id)
            .bind(item.item_type.as_str())
            .bind(&item.description)
            .bind(item.duration_days)
            .bind(item.base_amount)
            .bind(item.is_taxable)
            .bind(item.gst_rate)
            .bind(item.plan_id)
            .fetch_one(&mut *tx)
            .await?;
            persisted_items.push(row);
        }

        tx.commit().await?;

        tracing::info!(
            invoice_code = %header.invoice_code,
            grand_total = %header.grand_total,
            "Invoice created"
        );

        build_invoice(header, persisted_items, Some(&branch))
    }

    /// Resolve input into pending invoice lines: membership first, then
    /// registration fee, then the personal-trainer add-on.
    async fn resolve_items(&self, input: &CreateInvoiceInput) -> AppResult<Vec<PendingItem>> {
        let plan_code = input.membership.plan_code.trim();
        if plan_code.is_empty() {
            return Err(AppError::validation(
                "membership.plan_code",
                "Plan code is required",
            ));
        }

        let mut items = Vec::new();

        if plan_code == CUSTOM_PLAN_CODE {
            let custom = input.custom_membership.as_ref().ok_or_else(|| {
                AppError::validation("custom_membership", "Custom membership details are required")
            })?;

            let label = custom.label.trim().to_string();
            if label.is_empty() {
                return Err(AppError::validation(
                    "custom_membership.label",
                    "Custom label is required",
                ));
            }
            validate_positive_amount(custom.amount)
                .map_err(|msg| AppError::validation("custom_membership.amount", msg))?;

            items.push(PendingItem {
                item_type: InvoiceItemType::Membership,
                description: label,
                duration_days: custom.duration_days,
                base_amount: custom.amount,
                is_taxable: true,
                gst_rate: Decimal::from(18),
                plan_id: None,
            });
        } else {
            let plan = self.find_active_plan(plan_code).await?.ok_or_else(|| {
                AppError::validation("membership.plan_code", "Plan not found or inactive")
            })?;

            items.push(PendingItem {
                item_type: InvoiceItemType::Membership,
                description: plan.name,
                duration_days: plan.duration_days,
                base_amount: plan.base_amount,
                is_taxable: plan.is_taxable,
                gst_rate: plan.gst_rate,
                plan_id: Some(plan.id),
            });
        }

        let registration_fee = input.registration_fee.unwrap_or(Decimal::ZERO);
        validate_non_negative_amount(registration_fee)
            .map_err(|msg| AppError::validation("registration_fee", msg))?;
        if registration_fee > Decimal::ZERO {
            items.push(PendingItem {
                item_type: InvoiceItemType::RegistrationFee,
                description: "Registration Fee".to_string(),
                duration_days: None,
                base_amount: registration_fee,
                is_taxable: false,
                gst_rate: Decimal::ZERO,
                plan_id: None,
            });
        }

        if input.include_personal_trainer {
            // The PT plan is seeded configuration; its absence is a
            // server problem, not a bad request.
            let pt_plan = self
                .find_active_plan(PERSONAL_TRAINER_PLAN_CODE)
                .await?
                .ok_or_else(|| {
                    AppError::Configuration(
                        "Personal Trainer plan not configured in database".to_string(),
                    )
                })?;

            items.push(PendingItem {
                item_type: InvoiceItemType::PersonalTrainer,
                description: pt_plan.name,
                duration_days: None,
                base_amount: pt_plan.base_amount,
                is_taxable: false,
                gst_rate: Decimal::ZERO,
                plan_id: Some(pt_plan.id),
            });
        }

        Ok(items)
    }

    async fn find_active_plan(&self, code: &str) -> AppResult<Option<PlanRow>> {
        let plan = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, name, duration_days, base_amount, is_taxable, gst_rate
            FROM plans
            WHERE code = $1 AND is_active = TRUE
            "#,
        )
        .bind(code)
        .fetch_optional(&self.db)
        .await?;
        Ok(plan)
    }

    /// List invoices newest-first, filtered by lookback range and an
    /// optional case-insensitive search over name, phone and code.
    pub async fn list(&self, query: &InvoiceListQuery) -> AppResult<Vec<InvoiceSummary>> {
        let from = lookback_start(query.range.as_deref(), Utc::now());
        let pattern = search_pattern(query.search.as_deref());

        let invoices = sqlx::query_as::<_, InvoiceSummary>(
            r#"
            SELECT id, invoice_number, invoice_code, invoice_date,
                   customer_name, customer_phone, grand_total, is_void
            FROM invoices
            WHERE ($1::timestamptz IS NULL OR invoice_date >= $1)
              AND ($2::text IS NULL
                   OR customer_name ILIKE $2
                   OR customer_phone ILIKE $2
                   OR invoice_code ILIKE $2)
            ORDER BY invoice_date DESC
            LIMIT 1000
            "#,
        )
        .bind(from)
        .bind(pattern)
        .fetch_all(&self.db)
        .await?;

        Ok(invoices)
    }

    /// Fetch a single invoice by its display code, with items and
    /// branch details for rendering.
    pub async fn get_by_code(&self, code: &str) -> AppResult<Invoice> {
        let header = sqlx::query_as::<_, InvoiceHeaderRow>(
            r#"
            SELECT id, branch_id, invoice_number, invoice_code, invoice_date,
                   customer_name, customer_phone,
                   taxable_subtotal, cgst_amount, sgst_amount, total_gst,
                   nontaxable_subtotal, grand_total, is_void, created_at, updated_at
            FROM invoices
            WHERE invoice_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        let branch = sqlx::query_as::<_, BranchRow>(
            "SELECT id, name, address, phone, gstin, logo_url FROM branches WHERE id = $1",
        )
        .bind(header.branch_id)
        .fetch_optional(&self.db)
        .await?;

        let items = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT id, invoice_id, item_type, description, duration_days, quantity,
                   base_amount, line_total_before_tax, is_taxable, gst_rate, plan_id
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY id
            "#,
        )
        .bind(header.id)
        .fetch_all(&self.db)
        .await?;

        build_invoice(header, items, branch.as_ref())
    }

    /// Export filtered invoices as CSV, one row per invoice with its
    /// primary (membership) line as the "Main Item" column.
    pub async fn export_csv(&self, query: &InvoiceListQuery) -> AppResult<String> {
        let from = lookback_start(query.range.as_deref(), Utc::now());
        let pattern = search_pattern(query.search.as_deref());

        let headers = sqlx::query_as::<_, InvoiceHeaderRow>(
            r#"
            SELECT id, branch_id, invoice_number, invoice_code, invoice_date,
                   customer_name, customer_phone,
                   taxable_subtotal, cgst_amount, sgst_amount, total_gst,
                   nontaxable_subtotal, grand_total, is_void, created_at, updated_at
            FROM invoices
            WHERE ($1::timestamptz IS NULL OR invoice_date >= $1)
              AND ($2::text IS NULL
                   OR customer_name ILIKE $2
                   OR customer_phone ILIKE $2
                   OR invoice_code ILIKE $2)
            ORDER BY invoice_date DESC
            LIMIT 1000
            "#,
        )
        .bind(from)
        .bind(pattern)
        .fetch_all(&self.db)
        .await?;

        let ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();
        let items = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT id, invoice_id, item_type, description, duration_days, quantity,
                   base_amount, line_total_before_tax, is_taxable, gst_rate, plan_id
            FROM invoice_items
            WHERE invoice_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "Invoice Code",
                "Invoice Number",
                "Date",
                "Customer Name",
                "Customer Phone",
                "Main Item",
                "Taxable Subtotal",
                "Total GST",
                "Non-taxable Subtotal",
                "Grand Total",
            ])
            .map_err(|e| AppError::Internal(e.to_string()))?;

        for header in &headers {
            let main_item = items
                .iter()
                .filter(|i| i.invoice_id == header.id)
                .find(|i| i.item_type == InvoiceItemType::Membership.as_str())
                .or_else(|| items.iter().find(|i| i.invoice_id == header.id));

            writer
                .write_record([
                    header.invoice_code.clone(),
                    header.invoice_number.to_string(),
                    header.invoice_date.format("%Y-%m-%d").to_string(),
                    header.customer_name.clone(),
                    header.customer_phone.clone(),
                    main_item.map(|i| i.description.clone()).unwrap_or_default(),
                    format!("{:.2}", header.taxable_subtotal),
                    format!("{:.2}", header.total_gst),
                    format!("{:.2}", header.nontaxable_subtotal),
                    format!("{:.2}", header.grand_total),
                ])
                .map_err(|e| AppError::Internal(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
    }
}

fn search_pattern(search: Option<&str>) -> Option<String> {
    let search = search?.trim();
    if search.is_empty() {
        None
    } else {
        Some(format!("%{}%", search))
    }
}

fn build_invoice(
    header: InvoiceHeaderRow,
    items: Vec<InvoiceItemRow>,
    branch: Option<&BranchRow>,
) -> AppResult<Invoice> {
    let items = items
        .into_iter()
        .map(|row| {
            let item_type = row
                .item_type
                .parse::<InvoiceItemType>()
                .map_err(AppError::Internal)?;
            Ok(InvoiceItem {
                id: row.id,
                item_type,
                description: row.description,
                duration_days: row.duration_days,
                quantity: row.quantity,
                base_amount: row.base_amount,
                line_total_before_tax: row.line_total_before_tax,
                is_taxable: row.is_taxable,
                gst_rate: row.gst_rate,
                plan_id: row.plan_id,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Invoice {
        id: header.id,
        invoice_number: header.invoice_number,
        invoice_code: header.invoice_code,
        invoice_date: header.invoice_date,
        customer_name: header.customer_name,
        customer_phone: header.customer_phone,
        taxable_subtotal: header.taxable_subtotal,
        cgst_amount: header.cgst_amount,
        sgst_amount: header.sgst_amount,
        total_gst: header.total_gst,
        nontaxable_subtotal: header.nontaxable_subtotal,
        grand_total: header.grand_total,
        is_void: header.is_void,
        created_at: header.created_at,
        updated_at: header.updated_at,
        branch: branch.map(|b| BranchInfo {
            name: b.name.clone(),
            address: b.address.clone(),
            phone: b.phone.clone(),
            gstin: b.gstin.clone(),
            logo_url: b.logo_url.clone(),
        }),
        items,
    })
}
