//! Restock command.

use tracing::info;

use sugarplum_core::SweetId;

use super::CliError;

/// Restock a sweet by id.
///
/// # Errors
///
/// Returns an error if admin login fails or the backend rejects the
/// restock.
pub async fn run(id: &str, quantity: u32) -> Result<(), CliError> {
    let client = super::client()?;
    let token = super::admin_token(&client).await?;

    let sweet_id = SweetId::new(id);
    client.restock(&token, &sweet_id, quantity).await?;

    info!("Restocked {sweet_id} with {quantity} units");
    Ok(())
}
