use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgPoolOptions, postgres::PgRow};

use crate::{
    InventoryStore, Item, ItemField, ItemId, NewItem, NewPayment, Payment, PaymentId, Result,
    StockMovement, StockTransaction, StoreConfig, StoreError, TextField, TransactionId, UpdateId,
    UpdateRecord,
};

const ITEM_COLUMNS: &str = "id, name, contact_info, description, quantity";
const TRANSACTION_COLUMNS: &str = "id, item_id, action_type, quantity, timestamp, description";
const UPDATE_COLUMNS: &str = "id, item_id, updated_field, old_value, new_value, timestamp";
const PAYMENT_COLUMNS: &str =
    "id, transaction_id, amount_paid, payment_method, payment_status";

/// Statements for one text column.
///
/// Column names are fixed per [`TextField`] variant; caller-supplied text is
/// only ever bound as a parameter.
struct TextColumn {
    select_for_update: &'static str,
    update: &'static str,
}

impl TextColumn {
    fn of(field: TextField) -> Self {
        match field {
            TextField::Name => Self {
                select_for_update: "SELECT name FROM items WHERE id = $1 FOR UPDATE",
                update: "UPDATE items SET name = $1 WHERE id = $2",
            },
            TextField::ContactInfo => Self {
                select_for_update: "SELECT contact_info FROM items WHERE id = $1 FOR UPDATE",
                update: "UPDATE items SET contact_info = $1 WHERE id = $2",
            },
            TextField::Description => Self {
                select_for_update: "SELECT description FROM items WHERE id = $1 FOR UPDATE",
                update: "UPDATE items SET description = $1 WHERE id = $2",
            },
        }
    }
}

/// PostgreSQL-backed inventory store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool using `config`.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        tracing::info!(
            max_connections = config.max_connections,
            "connected to inventory database"
        );
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations, creating the four relations if needed.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Closes every connection in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn row_to_item(row: PgRow) -> Result<Item> {
        Ok(Item {
            id: ItemId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            contact_info: row.try_get("contact_info")?,
            description: row.try_get("description")?,
            quantity: row.try_get("quantity")?,
        })
    }

    fn row_to_transaction(row: PgRow) -> Result<StockTransaction> {
        let action: String = row.try_get("action_type")?;

        Ok(StockTransaction {
            id: TransactionId::new(row.try_get("id")?),
            item_id: ItemId::new(row.try_get("item_id")?),
            action: action.parse()?,
            quantity: row.try_get("quantity")?,
            timestamp: row.try_get("timestamp")?,
            description: row.try_get("description")?,
        })
    }

    fn row_to_update(row: PgRow) -> Result<UpdateRecord> {
        let field: String = row.try_get("updated_field")?;

        Ok(UpdateRecord {
            id: UpdateId::new(row.try_get("id")?),
            item_id: ItemId::new(row.try_get("item_id")?),
            field: field.parse()?,
            old_value: row.try_get("old_value")?,
            new_value: row.try_get("new_value")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn row_to_payment(row: PgRow) -> Result<Payment> {
        let method: String = row.try_get("payment_method")?;
        let status: String = row.try_get("payment_status")?;

        Ok(Payment {
            id: PaymentId::new(row.try_get("id")?),
            transaction_id: TransactionId::new(row.try_get("transaction_id")?),
            amount: row.try_get("amount_paid")?,
            method: method.parse()?,
            status: status.parse()?,
        })
    }
}

#[async_trait]
impl InventoryStore for PostgresStore {
    async fn insert_item(&self, item: NewItem) -> Result<Item> {
        let row = sqlx::query(&format!(
            "INSERT INTO items (name, contact_info, description, quantity) \
             VALUES ($1, $2, $3, $4) RETURNING {ITEM_COLUMNS}"
        ))
        .bind(&item.name)
        .bind(&item.contact_info)
        .bind(&item.description)
        .bind(item.quantity)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_item(row)
    }

    async fn get_item(&self, item_id: ItemId) -> Result<Option<Item>> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
            .bind(item_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_item).transpose()
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_item).collect()
    }

    async fn record_stock_movement(&self, movement: StockMovement) -> Result<StockTransaction> {
        let item_id = movement.item_id;

        // Start a transaction
        let mut tx = self.pool.begin().await?;

        // Compare-and-set the quantity; the row lock taken here is held until commit
        let updated = sqlx::query("UPDATE items SET quantity = $1 WHERE id = $2 AND quantity = $3")
            .bind(movement.new_quantity)
            .bind(item_id.as_i64())
            .bind(movement.expected_quantity)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            let actual: Option<i64> =
                sqlx::query_scalar("SELECT quantity FROM items WHERE id = $1")
                    .bind(item_id.as_i64())
                    .fetch_optional(&mut *tx)
                    .await?;

            return Err(match actual {
                None => StoreError::ItemNotFound(item_id),
                Some(actual) => StoreError::QuantityConflict {
                    item_id,
                    expected: movement.expected_quantity,
                    actual,
                },
            });
        }

        let row = sqlx::query(&format!(
            "INSERT INTO transactions (item_id, action_type, quantity, timestamp, description) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(item_id.as_i64())
        .bind(movement.action.as_str())
        .bind(movement.quantity)
        .bind(Utc::now())
        .bind(&movement.description)
        .fetch_one(&mut *tx)
        .await?;

        let transaction = Self::row_to_transaction(row)?;
        tx.commit().await?;

        Ok(transaction)
    }

    async fn update_item_text(
        &self,
        item_id: ItemId,
        field: TextField,
        new_value: String,
    ) -> Result<UpdateRecord> {
        let column = TextColumn::of(field);

        let mut tx = self.pool.begin().await?;

        let old_value: String = sqlx::query_scalar(column.select_for_update)
            .bind(item_id.as_i64())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::ItemNotFound(item_id))?;

        sqlx::query(column.update)
            .bind(&new_value)
            .bind(item_id.as_i64())
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(&format!(
            "INSERT INTO updates (item_id, updated_field, old_value, new_value, timestamp) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {UPDATE_COLUMNS}"
        ))
        .bind(item_id.as_i64())
        .bind(ItemField::from(field).as_str())
        .bind(&old_value)
        .bind(&new_value)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let update = Self::row_to_update(row)?;
        tx.commit().await?;

        Ok(update)
    }

    async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<StockTransaction>> {
        let row = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(transaction_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_transaction).transpose()
    }

    async fn list_transactions(&self) -> Result<Vec<StockTransaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_transaction).collect()
    }

    async fn list_transactions_for_item(&self, item_id: ItemId) -> Result<Vec<StockTransaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE item_id = $1 ORDER BY id ASC"
        ))
        .bind(item_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_transaction).collect()
    }

    async fn list_updates(&self) -> Result<Vec<UpdateRecord>> {
        let rows = sqlx::query(&format!("SELECT {UPDATE_COLUMNS} FROM updates ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_update).collect()
    }

    async fn list_updates_for_item(&self, item_id: ItemId) -> Result<Vec<UpdateRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {UPDATE_COLUMNS} FROM updates WHERE item_id = $1 ORDER BY id ASC"
        ))
        .bind(item_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_update).collect()
    }

    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment> {
        let row = sqlx::query(&format!(
            "INSERT INTO payments (transaction_id, amount_paid, payment_method, payment_status) \
             VALUES ($1, $2, $3, $4) RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(payment.transaction_id.as_i64())
        .bind(payment.amount)
        .bind(payment.method.as_str())
        .bind(payment.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_payment(row)
    }

    async fn list_payments(&self) -> Result<Vec<Payment>> {
        let rows = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }
}
