//! List / show / approve / reject commands for each admin resource.

use affdash_core::models::{
    AdminRoleFilters, CommissionFilters, ServerFilters, UserFilters, WithdrawalFilters,
};
use affdash_core::ApiClient;
use anyhow::Result;

use crate::cli::{
    AdminRoleCommands, AffiliateCommands, ApplicationCommands, CommissionCommands,
    ServerCommands, ServerRequestCommands, UserCommands, WithdrawalCommands,
};
use crate::output::{print_json, print_success};

pub async fn users(client: &ApiClient, command: UserCommands) -> Result<()> {
    let users = client.users();
    match command {
        UserCommands::List { page, search, status } => {
            let filters = UserFilters {
                search,
                status,
                ..Default::default()
            };
            print_json(&users.list(page.params(), &filters).await?)
        }
        UserCommands::Show(arg) => print_json(&users.get(&arg.id).await?),
        UserCommands::Devices(arg) => print_json(&users.devices(&arg.id).await?),
    }
}

pub async fn servers(client: &ApiClient, command: ServerCommands) -> Result<()> {
    let servers = client.servers();
    match command {
        ServerCommands::List {
            page,
            status,
            server_type,
        } => {
            let filters = ServerFilters { status, server_type };
            print_json(&servers.list(page.params(), &filters).await?)
        }
        ServerCommands::Show(arg) => print_json(&servers.get(&arg.id).await?),
        ServerCommands::Delete(arg) => {
            servers.delete(&arg.id).await?;
            print_success(&format!("Deleted server {}", arg.id));
            Ok(())
        }
    }
}

pub async fn server_requests(client: &ApiClient, command: ServerRequestCommands) -> Result<()> {
    let requests = client.server_requests();
    match command {
        ServerRequestCommands::List {
            page,
            status,
            pending,
        } => {
            let list = if pending {
                requests.pending(page.params()).await?
            } else {
                requests.list(page.params(), status).await?
            };
            print_json(&list)
        }
        ServerRequestCommands::Show(arg) => print_json(&requests.get(&arg.id).await?),
        ServerRequestCommands::Approve(arg) => print_json(&requests.approve(&arg.id).await?),
        ServerRequestCommands::Reject { id, reason } => {
            print_json(&requests.reject(&id, reason.as_deref()).await?)
        }
    }
}

pub async fn applications(client: &ApiClient, command: ApplicationCommands) -> Result<()> {
    let affiliates = client.affiliates();
    match command {
        ApplicationCommands::List { page, status } => {
            print_json(&affiliates.applications(page.params(), status).await?)
        }
        ApplicationCommands::Show(arg) => print_json(&affiliates.application(&arg.id).await?),
        ApplicationCommands::Approve(arg) => print_json(&affiliates.approve(&arg.id).await?),
        ApplicationCommands::Reject(args) => {
            print_json(&affiliates.reject(&args.id, &args.reason).await?)
        }
    }
}

pub async fn affiliates(client: &ApiClient, command: AffiliateCommands) -> Result<()> {
    match command {
        AffiliateCommands::List { page } => print_json(&client.affiliates().list(page.params()).await?),
    }
}

pub async fn commissions(client: &ApiClient, command: CommissionCommands) -> Result<()> {
    let commissions = client.commissions();
    match command {
        CommissionCommands::List {
            page,
            status,
            affiliate_id,
            from,
            to,
        } => {
            let filters = CommissionFilters {
                status,
                affiliate_id,
                start_date: from,
                end_date: to,
            };
            print_json(&commissions.list(page.params(), &filters).await?)
        }
        CommissionCommands::Show(arg) => print_json(&commissions.get(&arg.id).await?),
        CommissionCommands::Approve(arg) => print_json(&commissions.approve(&arg.id).await?),
        CommissionCommands::Release(arg) => print_json(&commissions.release(&arg.id).await?),
        CommissionCommands::Reject(args) => {
            print_json(&commissions.reject(&args.id, &args.reason).await?)
        }
    }
}

pub async fn withdrawals(client: &ApiClient, command: WithdrawalCommands) -> Result<()> {
    let withdrawals = client.withdrawals();
    match command {
        WithdrawalCommands::List {
            page,
            status,
            affiliate_id,
        } => {
            let filters = WithdrawalFilters {
                status,
                affiliate_id,
            };
            print_json(&withdrawals.list(page.params(), &filters).await?)
        }
        WithdrawalCommands::Show(arg) => print_json(&withdrawals.get(&arg.id).await?),
        WithdrawalCommands::Approve(arg) => print_json(&withdrawals.approve(&arg.id).await?),
        WithdrawalCommands::Reject(args) => {
            print_json(&withdrawals.reject(&args.id, &args.reason).await?)
        }
        WithdrawalCommands::Complete(arg) => print_json(&withdrawals.complete(&arg.id).await?),
    }
}

pub async fn admin_roles(client: &ApiClient, command: AdminRoleCommands) -> Result<()> {
    let roles = client.admin_roles();
    match command {
        AdminRoleCommands::List {
            page,
            role_type,
            active,
        } => {
            let mut filters = AdminRoleFilters {
                role_type,
                ..Default::default()
            };
            if let Some(active) = active {
                filters = filters.parse_active(&active);
            }
            print_json(&roles.list(page.params(), &filters).await?)
        }
        AdminRoleCommands::Show(arg) => print_json(&roles.get(&arg.id).await?),
        AdminRoleCommands::Permissions => print_json(&roles.available_permissions().await?),
    }
}
