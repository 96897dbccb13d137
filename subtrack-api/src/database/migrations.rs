use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS subscriptions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            company VARCHAR NOT NULL,
            service_name VARCHAR,
            email VARCHAR,
            monthly_cost REAL NOT NULL DEFAULT 0.0,
            yearly_cost REAL NOT NULL DEFAULT 0.0,
            currency VARCHAR NOT NULL DEFAULT 'USD',
            billing_cycle VARCHAR NOT NULL DEFAULT 'monthly',
            status VARCHAR NOT NULL DEFAULT 'active',
            cancel_url TEXT,
            notes TEXT,
            created_at BIGINT NOT NULL,
            updated_at BIGINT,
            next_billing_date BIGINT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_subscriptions_company
            ON subscriptions(company)",
        [],
    )?;

    // Discovery checks for an existing (company, email) pair before inserting
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_subscriptions_company_email
            ON subscriptions(company, email)",
        [],
    )?;

    Ok(())
}
