use mongodb::{Client, Database};

use super::Settings;

pub async fn connect(settings: &Settings) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(&settings.mongodb_uri).await?;

    Ok(client.database(&settings.mongodb_database))
}
