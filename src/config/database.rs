//! Database configuration module for homie.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Table creation uses `Schema::create_table_from_entity` so the
//! database schema is generated from the entity definitions and stays in sync
//! with the Rust structs without manual SQL.

use crate::entities::{
    Colocation, Conversation, Event, Expense, ExpenseShare, Member, Message, Payment,
    ShoppingItem, Task,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database at the given URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all database tables from the entity definitions.
///
/// Safe to call on a fresh database; the schema is derived from the
/// `DeriveEntityModel` macros on each entity.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let statements = [
        schema.create_table_from_entity(Colocation),
        schema.create_table_from_entity(Member),
        schema.create_table_from_entity(Expense),
        schema.create_table_from_entity(ExpenseShare),
        schema.create_table_from_entity(Payment),
        schema.create_table_from_entity(Task),
        schema.create_table_from_entity(ShoppingItem),
        schema.create_table_from_entity(Event),
        schema.create_table_from_entity(Conversation),
        schema.create_table_from_entity(Message),
    ];

    for statement in &statements {
        db.execute(builder.build(statement)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ColocationModel, ExpenseModel, MemberModel, PaymentModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_connection_in_memory() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Verify the connection works with a simple query
        let _: Vec<ColocationModel> = Colocation::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Every table should be queryable after creation
        let _: Vec<ColocationModel> = Colocation::find().limit(1).all(&db).await?;
        let _: Vec<MemberModel> = Member::find().limit(1).all(&db).await?;
        let _: Vec<ExpenseModel> = Expense::find().limit(1).all(&db).await?;
        let _: Vec<PaymentModel> = Payment::find().limit(1).all(&db).await?;

        Ok(())
    }
}
