//! Permission-matrix CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use acta_core::config::AppConfig;
use acta_core::error::AppError;
use acta_entity::permission::PermissionFlags;
use acta_entity::user::{Role, Workspace};
use acta_store::postgres::PgPermissionStore;
use acta_store::traits::PermissionStore;

use crate::output::{self, OutputFormat};

/// Arguments for permission commands
#[derive(Debug, Args)]
pub struct PermissionArgs {
    /// Permission subcommand
    #[command(subcommand)]
    pub command: PermissionCommand,
}

/// Permission subcommands
#[derive(Debug, Subcommand)]
pub enum PermissionCommand {
    /// Grant capabilities to a role in a workspace (replaces the row)
    Grant {
        /// Role
        role: Role,
        /// Workspace
        workspace: Workspace,
        /// Allow viewing documents
        #[arg(long)]
        view: bool,
        /// Allow downloading document content
        #[arg(long)]
        download: bool,
        /// Allow archiving others' documents
        #[arg(long)]
        archive: bool,
        /// Allow managing the workspace
        #[arg(long)]
        manage: bool,
    },
    /// List the full matrix
    List,
    /// Seed the default matrix (idempotent)
    Seed,
}

/// Matrix display row for table output
#[derive(Debug, Serialize, Tabled)]
struct MatrixRow {
    /// Role
    role: String,
    /// Workspace
    workspace: String,
    /// View flag
    view: bool,
    /// Download flag
    download: bool,
    /// Archive flag
    archive: bool,
    /// Manage flag
    manage: bool,
}

/// The matrix a fresh deployment starts from.
fn default_grants() -> Vec<(Role, Workspace, PermissionFlags)> {
    let view_only = PermissionFlags {
        view: true,
        ..Default::default()
    };
    let view_download = PermissionFlags {
        view: true,
        download: true,
        ..Default::default()
    };

    let mut grants = Vec::new();

    // The administrator and presidency see everything.
    for workspace in Workspace::ALL {
        grants.push((Role::Admin, workspace, PermissionFlags::all()));
        grants.push((Role::President, workspace, view_download));
        grants.push((Role::VicePresident, workspace, view_download));
    }

    // Each secretary runs their own department.
    grants.push((
        Role::AdministrationSecretary,
        Workspace::Administration,
        PermissionFlags::all(),
    ));
    grants.push((
        Role::FinanceSecretary,
        Workspace::Finance,
        PermissionFlags::all(),
    ));
    grants.push((Role::LegalSecretary, Workspace::Legal, PermissionFlags::all()));
    grants.push((
        Role::CommunicationsSecretary,
        Workspace::Communications,
        PermissionFlags::all(),
    ));

    // Cross-department access.
    grants.push((Role::TerritorialOfficer, Workspace::Administration, view_download));
    grants.push((Role::TerritorialOfficer, Workspace::Communications, view_only));
    grants.push((Role::CommissionMember, Workspace::Administration, view_only));
    grants.push((Role::CommissionMember, Workspace::Legal, view_only));

    grants
}

/// Execute permission commands
pub async fn execute(
    args: &PermissionArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::connect(config).await?;
    let store = PgPermissionStore::new(pool.pool().clone());

    match &args.command {
        PermissionCommand::Grant {
            role,
            workspace,
            view,
            download,
            archive,
            manage,
        } => {
            let row = store
                .upsert(
                    *role,
                    *workspace,
                    PermissionFlags {
                        view: *view,
                        download: *download,
                        archive: *archive,
                        manage: *manage,
                    },
                )
                .await?;
            output::print_success(&format!(
                "Granted {} in {}: view={} download={} archive={} manage={}",
                row.role,
                row.workspace,
                row.can_view,
                row.can_download,
                row.can_archive_others,
                row.can_manage_workspace
            ));
        }
        PermissionCommand::List => {
            let rows = store.find_all().await?;
            let rows: Vec<MatrixRow> = rows
                .iter()
                .map(|r| MatrixRow {
                    role: r.role.to_string(),
                    workspace: r.workspace.to_string(),
                    view: r.can_view,
                    download: r.can_download,
                    archive: r.can_archive_others,
                    manage: r.can_manage_workspace,
                })
                .collect();
            output::print_list(&rows, format);
        }
        PermissionCommand::Seed => {
            let grants = default_grants();
            let count = grants.len();
            for (role, workspace, flags) in grants {
                store.upsert(role, workspace, flags).await?;
            }
            output::print_success(&format!("Seeded {count} matrix rows"));
        }
    }

    Ok(())
}
