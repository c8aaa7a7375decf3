use savour_sql::{
    ColumnPolicy, ColumnValues, InsertBuilder, MutationBuilder, SchemaRegistry, SqlBuilder,
    SqlResult, TableDescriptor, UpdateBuilder, row_exists,
};
use tokio_postgres::NoTls;

fn registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .with_table(TableDescriptor::new("pantry", "p"))
        .with_columns(&[ColumnPolicy::numeric("id"), ColumnPolicy::text("item")])
        .with_writable("pantry")
}

#[tokio::test]
async fn guard_and_assemblers_against_postgres() -> SqlResult<()> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping guard_and_assemblers_against_postgres");
            return Ok(());
        }
    };

    let (mut client, connection) = tokio_postgres::connect(&database_url, NoTls).await?;
    tokio::spawn(async move {
        let _ = connection.await;
    });

    let reg = registry();
    let tx = client.transaction().await?;
    tx.batch_execute(
        "CREATE TEMP TABLE pantry (id SERIAL PRIMARY KEY, item TEXT NOT NULL) ON COMMIT DROP",
    )
    .await?;

    let inserted = InsertBuilder::new(&reg, "pantry")
        .set("item", "flour")
        .returning(&["id", "item"])
        .build()?
        .query_one(&tx)
        .await?;
    let id: i32 = inserted.get("id");
    assert_eq!(inserted.get::<_, String>("item"), "flour");

    let rows = row_exists(
        &tx,
        &reg,
        "pantry item",
        "item",
        "pantry",
        &ColumnValues::new().with("id", id.to_string()),
    )
    .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<_, String>("item"), "flour");

    let affected = UpdateBuilder::new(&reg, "pantry")
        .set("item", "rye flour")
        .and_eq("id", id)
        .build()?
        .execute(&tx)
        .await?;
    assert_eq!(affected, 1);

    let err = row_exists(
        &tx,
        &reg,
        "pantry item",
        "id",
        "pantry",
        &ColumnValues::new().with("id", id + 1000),
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "pantry item not found!");

    tx.rollback().await?;
    Ok(())
}
