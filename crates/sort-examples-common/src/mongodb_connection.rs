use mongodb::{
    options::{ClientOptions, DriverInfo},
    Client,
};

use crate::interface_types::SortExamplesError;

const DRIVER_NAME: &str = "sort-examples";

pub async fn get_mongodb_client(database_uri: &str) -> Result<Client, SortExamplesError> {
    let mut options = ClientOptions::parse(database_uri).await?;

    // Identifies these examples in server logs and statistics
    options.driver_info = Some(DriverInfo::builder().name(DRIVER_NAME).build());

    let client = Client::with_options(options)?;
    Ok(client)
}
