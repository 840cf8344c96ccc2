//! SAAS admin bootstrap.

use washboard_admin::db::{SaasAdminRepository, TenantDb, bind_schema};
use washboard_admin::models::CreateSaasAdminRequest;
use washboard_admin::services::password::{
    GENERATED_PASSWORD_LENGTH, generate_password, hash_password,
};
use washboard_core::SchemaName;

use super::CliError;

/// Create a SAAS admin with a generated password.
///
/// The password is printed exactly once; only its bcrypt hash is stored.
///
/// # Errors
///
/// Returns `CliError` if validation, hashing, or the insert fails.
pub async fn create(
    email: &str,
    username: &str,
    first_name: &str,
    last_name: &str,
    phone: &str,
    schema: Option<&str>,
) -> Result<(), CliError> {
    let schema = match schema {
        Some(raw) => SchemaName::parse(raw)?,
        None => SchemaName::public(),
    };

    let new_admin = CreateSaasAdminRequest {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        username: username.to_owned(),
        email: email.to_owned(),
        phone_number: phone.to_owned(),
    }
    .validate()
    .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let password = generate_password(GENERATED_PASSWORD_LENGTH);
    let password_hash =
        hash_password(&password).map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let pool = super::connect().await?;
    let db = TenantDb::new(pool);
    let mut conn = db.pool().acquire().await?;
    bind_schema(&mut conn, &schema).await?;

    let mut repo = SaasAdminRepository::new(&mut conn);
    if repo.email_exists(&new_admin.email, None).await? {
        return Err(CliError::InvalidInput(format!(
            "{} SAAS admin already exists",
            new_admin.email
        )));
    }
    let admin = repo.create(&new_admin, &password_hash).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Created SAAS admin {} (id {})", admin.email, admin.id);
        println!("Temporary password: {password}");
        println!("It will not be shown again.");
    }

    Ok(())
}
