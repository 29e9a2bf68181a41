use affdash_core::ApiError;
use anyhow::Result;
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(message: &str) {
    eprintln!("{}", message);
}

pub fn print_error(err: &anyhow::Error) {
    eprintln!("Error: {err:#}");
    if let Some(api_err) = err.downcast_ref::<ApiError>() {
        if api_err.requires_login() {
            eprintln!("Your session has ended. Run `affdash login` to sign in again.");
        }
    }
}
