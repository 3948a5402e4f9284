use mongodb::{options::ClientOptions, Client};

use crate::store::StoreResult;

pub async fn init_client(mongo_uri: &str) -> StoreResult<Client> {
    let mut client_options = ClientOptions::parse(mongo_uri).await?;

    client_options.app_name = Some("PollingApp".to_string());

    let client = Client::with_options(client_options)?;

    tracing::info!("MongoDB client initialised");

    Ok(client)
}
