//! Tag manager command handlers.

use tabled::Tabled;

use wirelesstag_core::{Account, TagManagerInfo};

use crate::cli::{ManagersArgs, ManagersCommand};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

#[derive(Tabled)]
struct ManagerRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Online")]
    online: String,
    #[tabled(rename = "Selected")]
    selected: String,
}

impl From<&TagManagerInfo> for ManagerRow {
    fn from(m: &TagManagerInfo) -> Self {
        Self {
            mac: m.mac.clone(),
            name: m.name.clone().unwrap_or_default(),
            online: yes_no(m.online),
            selected: if m.selected { "*".into() } else { String::new() },
        }
    }
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.into()
}

pub async fn handle(account: &Account, args: ManagersArgs, out: OutputOpts) -> Result<(), CliError> {
    match args.command.unwrap_or(ManagersCommand::List) {
        ManagersCommand::List => {
            let managers = account.tag_managers().await?;
            let rendered = output::render_list(out.format, &managers, |m| ManagerRow::from(m));
            output::print_output(&rendered, out.quiet);
            Ok(())
        }

        ManagersCommand::Select { mac } => {
            let managers = account.tag_managers().await?;
            if !managers.iter().any(|m| m.mac.eq_ignore_ascii_case(&mac)) {
                return Err(CliError::NotFound {
                    resource_type: "tag manager".into(),
                    identifier: mac,
                    list_command: "managers".into(),
                });
            }
            account.select_tag_manager(&mac).await?;
            output::status(&format!("Tag manager {mac} selected"), out.quiet);
            Ok(())
        }
    }
}
