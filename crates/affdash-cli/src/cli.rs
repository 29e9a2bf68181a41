use std::path::PathBuf;

use affdash_core::models::pagination::DEFAULT_PER_PAGE;
use affdash_core::models::{
    ApplicationStatus, CommissionStatus, GraphPeriod, PageParams, RequestStatus, ServerStatus,
    ServerType, WithdrawalStatus,
};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;

#[derive(Parser)]
#[command(name = "affdash", version, about = "Admin console for the affiliate backend")]
pub struct Cli {
    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true, env = "AFFDASH_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Backend root URL (overrides config and AFFDASH_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Passphrase used to encrypt the saved session
    #[arg(long, global = true, env = "AFFDASH_SESSION_KEY", hide_env_values = true)]
    pub session_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and save the session
    Login(LoginArgs),
    /// Sign out and delete the saved session
    Logout(LogoutArgs),
    /// Show the signed-in admin
    Whoami,
    #[command(subcommand)]
    Users(UserCommands),
    #[command(subcommand)]
    Servers(ServerCommands),
    #[command(subcommand)]
    ServerRequests(ServerRequestCommands),
    /// Affiliate applications
    #[command(subcommand)]
    Applications(ApplicationCommands),
    #[command(subcommand)]
    Affiliates(AffiliateCommands),
    #[command(subcommand)]
    Commissions(CommissionCommands),
    #[command(subcommand)]
    Withdrawals(WithdrawalCommands),
    #[command(subcommand)]
    AdminRoles(AdminRoleCommands),
    #[command(subcommand)]
    Dashboard(DashboardCommands),
}

#[derive(Args)]
pub struct LoginArgs {
    /// Admin email (defaults to the last one used)
    #[arg(long)]
    pub email: Option<String>,
    /// Remember the password in the OS keychain
    #[arg(long)]
    pub remember: bool,
}

#[derive(Args)]
pub struct LogoutArgs {
    /// Also remove the remembered password
    #[arg(long)]
    pub forget: bool,
}

#[derive(Args, Clone, Copy)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,
}

impl PageArgs {
    pub fn params(&self) -> PageParams {
        PageParams::new(self.page, self.per_page)
    }
}

#[derive(Args)]
pub struct IdArg {
    pub id: String,
}

#[derive(Args)]
pub struct RejectArgs {
    pub id: String,
    #[arg(long)]
    pub reason: String,
}

#[derive(Subcommand)]
pub enum UserCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    Show(IdArg),
    Devices(IdArg),
}

#[derive(Subcommand)]
pub enum ServerCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, value_parser = parse_enum::<ServerStatus>)]
        status: Option<ServerStatus>,
        #[arg(long = "type", value_parser = parse_enum::<ServerType>)]
        server_type: Option<ServerType>,
    },
    Show(IdArg),
    Delete(IdArg),
}

#[derive(Subcommand)]
pub enum ServerRequestCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, value_parser = parse_enum::<RequestStatus>, conflicts_with = "pending")]
        status: Option<RequestStatus>,
        /// Only pending requests
        #[arg(long)]
        pending: bool,
    },
    Show(IdArg),
    Approve(IdArg),
    Reject {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ApplicationCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, value_parser = parse_enum::<ApplicationStatus>)]
        status: Option<ApplicationStatus>,
    },
    Show(IdArg),
    Approve(IdArg),
    Reject(RejectArgs),
}

#[derive(Subcommand)]
pub enum AffiliateCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
pub enum CommissionCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, value_parser = parse_enum::<CommissionStatus>)]
        status: Option<CommissionStatus>,
        #[arg(long)]
        affiliate_id: Option<String>,
        /// Earliest creation date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest creation date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    Show(IdArg),
    Approve(IdArg),
    Release(IdArg),
    Reject(RejectArgs),
}

#[derive(Subcommand)]
pub enum WithdrawalCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, value_parser = parse_enum::<WithdrawalStatus>)]
        status: Option<WithdrawalStatus>,
        #[arg(long)]
        affiliate_id: Option<i64>,
    },
    Show(IdArg),
    Approve(IdArg),
    Reject(RejectArgs),
    Complete(IdArg),
}

#[derive(Subcommand)]
pub enum AdminRoleCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        role_type: Option<String>,
        /// `true` or `false`
        #[arg(long)]
        active: Option<String>,
    },
    Show(IdArg),
    /// Default permissions for each role type
    Permissions,
}

#[derive(Subcommand)]
pub enum DashboardCommands {
    /// Headline counts plus this week's pending applications
    Stats,
    Graph {
        #[arg(long, value_parser = parse_enum::<GraphPeriod>, default_value = "month")]
        period: GraphPeriod,
    },
    Affiliates,
    Tree {
        #[arg(long)]
        affiliate_id: Option<String>,
    },
}

/// Parse a lowercase wire name into one of the model enums.
fn parse_enum<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_lowercase()))
        .map_err(|_| format!("unknown value '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_status_arguments() {
        let cli = Cli::try_parse_from([
            "affdash", "commissions", "list", "--status", "Released", "--per-page", "50",
        ])
        .unwrap();
        match cli.command {
            Commands::Commissions(CommissionCommands::List { page, status, .. }) => {
                assert_eq!(status, Some(CommissionStatus::Released));
                assert_eq!(page.params(), PageParams::new(1, 50));
            }
            _ => panic!("wrong command"),
        }

        assert!(Cli::try_parse_from(["affdash", "servers", "list", "--status", "melted"]).is_err());
    }

    #[test]
    fn test_kebab_case_groups() {
        let cli = Cli::try_parse_from(["affdash", "server-requests", "list", "--pending"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::ServerRequests(ServerRequestCommands::List { pending: true, .. })
        ));
        assert!(Cli::try_parse_from(["affdash", "admin-roles", "permissions"]).is_ok());
    }
}
