use std::io::{self, Write};

use affdash_core::auth::CredentialStore;
use affdash_core::{ApiClient, Config};
use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::cli::{LoginArgs, LogoutArgs};
use crate::output::{print_json, print_success};

pub async fn login(client: &ApiClient, config: &mut Config, args: &LoginArgs) -> Result<()> {
    let email = match &args.email {
        Some(email) => email.trim().to_string(),
        None => prompt_email(config.last_email.as_deref())?,
    };
    if email.is_empty() {
        bail!("Email is required");
    }

    let password = match CredentialStore::get_password(&email) {
        Ok(password) => {
            info!(email = %email, "Using remembered password");
            password
        }
        Err(_) => rpassword::prompt_password("Password: ")?,
    };
    if password.is_empty() {
        bail!("Password is required");
    }

    let session = client.auth().login(&email, &password).await?;

    if args.remember {
        if let Err(e) = CredentialStore::store(&email, &password) {
            warn!(error = %e, "Failed to store credentials");
        }
    }

    config.last_email = Some(email.clone());
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    let name = session
        .user
        .as_ref()
        .map(|u| u.display_name())
        .unwrap_or(email);
    print_success(&format!("Logged in as {}", name));
    Ok(())
}

pub async fn logout(client: &ApiClient, config: &Config, args: &LogoutArgs) -> Result<()> {
    client.auth().logout().await?;

    if args.forget {
        if let Some(email) = &config.last_email {
            if let Err(e) = CredentialStore::delete(email) {
                warn!(error = %e, "Failed to remove remembered password");
            }
        }
    }
    print_success("Logged out");
    Ok(())
}

pub fn whoami(client: &ApiClient) -> Result<()> {
    match client.auth().current_user()? {
        Some(user) => print_json(&user),
        None if client.auth().is_authenticated()? => {
            print_success("Signed in (no profile cached)");
            Ok(())
        }
        None => bail!("Not logged in. Run `affdash login`."),
    }
}

fn prompt_email(last: Option<&str>) -> Result<String> {
    match last {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    let email = email.trim();
    Ok(match (email.is_empty(), last) {
        (true, Some(last)) => last.to_string(),
        _ => email.to_string(),
    })
}
