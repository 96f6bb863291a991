use catalog_admin_api::{
    config::database_url,
    db::{create_orm_conn, run_migrations},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let orm = create_orm_conn(&database_url()?).await?;
    run_migrations(&orm).await?;
    println!("Migrations applied");
    Ok(())
}
